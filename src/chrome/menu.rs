use std::cell::Cell;
use std::rc::Rc;

use gloo::events::EventListener;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Node};

use crate::dom;

const ACTIVE: &str = "active";

/// The mobile menu and its toggle button.
struct MobileMenu {
	toggle: Element,
	menu: Element,
	open: Cell<bool>,
}

impl MobileMenu {
	fn set_open(&self, open: bool) {
		self.open.set(open);
		dom::set_class(&self.menu, ACTIVE, open);
		dom::set_class(&self.toggle, ACTIVE, open);
	}

	fn contains(&self, target: Option<&Node>) -> bool {
		self.menu.contains(target) || self.toggle.contains(target)
	}
}

/// Opens and closes `#mobile-menu` from `#menu-toggle`; clicks outside the
/// menu or on one of its links close it.
pub(super) fn install(document: &Document) -> Vec<EventListener> {
	let (Some(toggle), Some(menu)) = (
		document.get_element_by_id("menu-toggle"),
		document.get_element_by_id("mobile-menu"),
	) else {
		return Vec::new();
	};
	let state = Rc::new(MobileMenu {
		open: Cell::new(menu.class_list().contains(ACTIVE)),
		toggle,
		menu,
	});

	let mut listeners = Vec::new();

	let toggled = state.clone();
	listeners.push(EventListener::new(&state.toggle, "click", move |_| {
		toggled.set_open(!toggled.open.get());
	}));

	let outside = state.clone();
	listeners.push(EventListener::new(document, "click", move |event| {
		let target = event.target().and_then(|t| t.dyn_into::<Node>().ok());
		if !outside.contains(target.as_ref()) {
			outside.set_open(false);
		}
	}));

	for link in dom::query_all_in(&state.menu, "a") {
		let closing = state.clone();
		listeners.push(EventListener::new(&link, "click", move |_| {
			closing.set_open(false);
		}));
	}

	listeners
}
