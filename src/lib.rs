//! Client-side behaviour for the documentation site: the architecture
//! diagram and the page chrome around it.

use std::any::Any;
use std::cell::RefCell;

use log::{Level, info};
use wasm_bindgen::prelude::*;

// Modules
pub mod chrome;
pub mod components;
pub mod config;
pub mod dom;
pub mod error;
pub mod schedule;

use crate::chrome::PageChrome;
use crate::config::SiteConfig;

/// Everything installed on the current page.
pub struct Site {
	/// Chrome listeners.
	pub chrome: PageChrome,
	/// Mount handle of the diagram, when the page has one.
	pub diagram: Option<Box<dyn Any>>,
}

thread_local! {
	static SITE: RefCell<Option<Site>> = const { RefCell::new(None) };
}

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("Logging initialized");
}

/// Installs the chrome and the diagram on `window`'s document.
pub fn install(window: &web_sys::Window) -> Option<Site> {
	let document = window.document()?;
	let config = SiteConfig::from_document(&document);
	let chrome = PageChrome::install(window, &document, &config.chrome);
	let diagram = components::architecture::mount(&document, &config.diagram);
	Some(Site { chrome, diagram })
}

/// Entry point run when the module is loaded.
#[wasm_bindgen(start)]
pub fn start() {
	init_logging();
	let Some(window) = web_sys::window() else {
		return;
	};
	let site = install(&window);
	SITE.with(|slot| *slot.borrow_mut() = site);
}
