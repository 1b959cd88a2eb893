//! Page chrome: nav links, navbar, scroll spy, hints, copy buttons, theme
//! and mobile menu. Each piece is optional and independent; a page missing
//! the elements for one simply goes without it.

mod clipboard;
mod hints;
mod menu;
mod nav;
mod theme;

use gloo::events::EventListener;
use js_sys::{Function, Reflect};
use log::{debug, info};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Window};

pub use clipboard::{COPIED_LABEL, COPY_LABEL, CopyFeedback, CopyOutcome, FAILED_LABEL};
pub use hints::hint_position;
pub use nav::{NavbarScroll, NavbarView, Section, current_section, is_active_link};
pub use theme::{LocalStore, MemoryStore, PreferenceStore, Theme, ThemePreference};

use crate::config::ChromeConfig;

/// The installed page chrome. Dropping it detaches every listener.
pub struct PageChrome {
	listeners: Vec<EventListener>,
}

impl PageChrome {
	/// Wires every chrome feature the page has elements for.
	pub fn install(window: &Window, document: &Document, config: &ChromeConfig) -> Self {
		let path = window.location().pathname().unwrap_or_default();
		nav::mark_active_links(document, &path);
		highlight_code(window);

		let mut listeners = Vec::new();
		listeners.extend(nav::watch_navbar(window, document, config));
		listeners.extend(nav::watch_sections(window, document, config));
		listeners.extend(hints::install(document));
		listeners.extend(clipboard::install(document, config.copy_feedback()));
		listeners.extend(install_theme(document, config));
		listeners.extend(menu::install(document));

		info!("page chrome ready ({} listeners)", listeners.len());
		Self { listeners }
	}

	/// Number of attached event listeners.
	pub fn listener_count(&self) -> usize {
		self.listeners.len()
	}
}

fn install_theme(document: &Document, config: &ChromeConfig) -> Option<EventListener> {
	match LocalStore::open() {
		Some(store) => theme::install(document, ThemePreference::new(store, &config.theme_key)),
		None => {
			debug!("local storage unavailable, theme will not persist");
			theme::install(
				document,
				ThemePreference::new(MemoryStore::default(), &config.theme_key),
			)
		}
	}
}

/// Runs `Prism.highlightAll()` when the page loaded Prism.
fn highlight_code(window: &Window) {
	let Ok(prism) = Reflect::get(window, &JsValue::from_str("Prism")) else {
		return;
	};
	if prism.is_undefined() {
		return;
	}
	let highlight = Reflect::get(&prism, &JsValue::from_str("highlightAll"))
		.ok()
		.and_then(|f| f.dyn_into::<Function>().ok());
	if let Some(highlight) = highlight {
		if let Err(err) = highlight.call0(&prism) {
			debug!("Prism.highlightAll failed: {}", crate::error::describe(&err));
		}
	}
}
