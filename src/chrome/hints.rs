use std::cell::RefCell;
use std::rc::Rc;

use gloo::events::EventListener;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement};

use crate::components::architecture::{Rect, Viewport};
use crate::dom;

const HINT_MARGIN: f64 = 10.0;

/// Document position of a `width` x `height` hint centred above `anchor`.
pub fn hint_position(anchor: Rect, width: f64, height: f64, viewport: Viewport) -> (f64, f64) {
	(
		anchor.center_x() - width / 2.0,
		anchor.top - height - HINT_MARGIN + viewport.scroll_y,
	)
}

fn show(document: &Document, anchor: &Element, text: &str) -> Option<HtmlElement> {
	let hint: HtmlElement = document.create_element("div").ok()?.dyn_into().ok()?;
	hint.set_class_name("tooltip");
	hint.set_text_content(Some(text));
	document.body()?.append_child(&hint).ok()?;

	let window = web_sys::window()?;
	let (left, top) = hint_position(
		dom::client_rect(anchor),
		f64::from(hint.offset_width()),
		f64::from(hint.offset_height()),
		dom::viewport(&window),
	);
	dom::set_style(&hint, "left", &format!("{left}px"));
	dom::set_style(&hint, "top", &format!("{top}px"));
	dom::set_class(&hint, "tooltip-visible", true);
	Some(hint)
}

/// Shows the `data-tooltip` text of an element while it is hovered.
pub(super) fn install(document: &Document) -> Vec<EventListener> {
	let mut listeners = Vec::new();
	for element in dom::query_all(document, "[data-tooltip]") {
		let text = element.get_attribute("data-tooltip").unwrap_or_default();
		let current: Rc<RefCell<Option<HtmlElement>>> = Rc::default();

		let (shown, doc, anchor) = (current.clone(), document.clone(), element.clone());
		listeners.push(EventListener::new(&element, "mouseenter", move |_| {
			let mut shown = shown.borrow_mut();
			if let Some(stale) = shown.take() {
				stale.remove();
			}
			*shown = show(&doc, &anchor, &text);
		}));

		listeners.push(EventListener::new(&element, "mouseleave", move |_| {
			if let Some(hint) = current.borrow_mut().take() {
				hint.remove();
			}
		}));
	}
	listeners
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn hint_is_centred_above_its_anchor() {
		let anchor = Rect {
			left: 100.0,
			top: 400.0,
			width: 80.0,
			height: 20.0,
		};
		let viewport = Viewport {
			width: 1024.0,
			scroll_y: 250.0,
		};
		assert_eq!(hint_position(anchor, 120.0, 30.0, viewport), (80.0, 610.0));
	}
}
