use gloo::events::EventListener;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, Window};

use crate::config::ChromeConfig;
use crate::dom;

const ACTIVE: &str = "active";

/// Whether a nav link pointing at `href` belongs to the page at `path`.
///
/// `/docs/` matches `/docs/index.html`, and `/index.html` matches the site
/// root.
pub fn is_active_link(path: &str, href: &str) -> bool {
	href == path
		|| (path.ends_with('/') && href.strip_prefix(path) == Some("index.html"))
		|| (href == "/index.html" && (path == "/" || path.is_empty()))
}

/// Classes the navbar should carry at the current scroll position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NavbarView {
	/// `navbar-scrolled`: the page is scrolled past the first threshold.
	pub scrolled: bool,
	/// `navbar-hidden`: scrolling down past the second threshold.
	pub hidden: bool,
}

/// Tracks scroll direction to hide the navbar while scrolling down.
#[derive(Clone, Debug)]
pub struct NavbarScroll {
	last_top: f64,
	scrolled_after: f64,
	hide_after: f64,
}

impl NavbarScroll {
	/// Tracker starting at the top of the page.
	pub fn new(config: &ChromeConfig) -> Self {
		Self {
			last_top: 0.0,
			scrolled_after: config.navbar_scrolled_after,
			hide_after: config.navbar_hide_after,
		}
	}

	/// Records a new scroll offset and returns the classes for it.
	pub fn observe(&mut self, top: f64) -> NavbarView {
		let view = NavbarView {
			scrolled: top > self.scrolled_after,
			hidden: top > self.last_top && top > self.hide_after,
		};
		self.last_top = top;
		view
	}
}

/// Vertical extent of a page section.
#[derive(Clone, Debug, PartialEq)]
pub struct Section {
	/// Element id, matched against nav link hrefs.
	pub id: String,
	/// Offset from the top of the document.
	pub top: f64,
	/// Height in CSS pixels.
	pub height: f64,
}

/// The section under the navbar: the last one containing `scroll_y + offset`.
pub fn current_section(sections: &[Section], scroll_y: f64, offset: f64) -> Option<&str> {
	let position = scroll_y + offset;
	sections
		.iter()
		.rev()
		.find(|s| position >= s.top && position < s.top + s.height)
		.map(|s| s.id.as_str())
}

/// Marks the nav links pointing at the current page.
pub(super) fn mark_active_links(document: &Document, path: &str) {
	for link in dom::query_all(document, ".nav-link") {
		let href = link.get_attribute("href").unwrap_or_default();
		if is_active_link(path, &href) {
			dom::set_class(&link, ACTIVE, true);
		}
	}
}

/// Applies `navbar-scrolled` / `navbar-hidden` while scrolling.
pub(super) fn watch_navbar(
	window: &Window,
	document: &Document,
	config: &ChromeConfig,
) -> Option<EventListener> {
	let navbar = dom::query(document, ".navbar")?;
	let mut tracker = NavbarScroll::new(config);
	let win = window.clone();
	Some(EventListener::new(window, "scroll", move |_| {
		let top = win.scroll_y().unwrap_or_default();
		let view = tracker.observe(top);
		dom::set_class(&navbar, "navbar-scrolled", view.scrolled);
		dom::set_class(&navbar, "navbar-hidden", view.hidden);
	}))
}

fn measure(section: &Element) -> Option<Section> {
	let element = section.dyn_ref::<HtmlElement>()?;
	Some(Section {
		id: section.id(),
		top: f64::from(element.offset_top()),
		height: f64::from(element.offset_height()),
	})
}

/// Highlights the nav link of the section currently scrolled into view.
pub(super) fn watch_sections(
	window: &Window,
	document: &Document,
	config: &ChromeConfig,
) -> Option<EventListener> {
	let sections = dom::query_all(document, "section[id]");
	let links = dom::query_all(document, ".nav-link");
	if sections.is_empty() || links.is_empty() {
		return None;
	}
	let offset = config.scroll_spy_offset;
	let win = window.clone();
	Some(EventListener::new(window, "scroll", move |_| {
		// Sections can move as images load, so measure on every scroll.
		let measured: Vec<Section> = sections.iter().filter_map(measure).collect();
		let scroll_y = win.scroll_y().unwrap_or_default();
		let Some(current) = current_section(&measured, scroll_y, offset) else {
			return;
		};
		for link in &links {
			let href = link.get_attribute("href").unwrap_or_default();
			dom::set_class(link, ACTIVE, href.contains(current));
		}
	}))
}
