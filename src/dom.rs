//! Small `web_sys` helpers shared by the diagram and the page chrome.

use log::debug;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, NodeList, Window};

use crate::components::architecture::{Rect, Viewport};
use crate::error::{Result, SiteError, describe};

fn elements(list: NodeList) -> Vec<Element> {
	(0..list.length())
		.filter_map(|i| list.item(i))
		.filter_map(|node| node.dyn_into::<Element>().ok())
		.collect()
}

/// Every element in the document matching `selector`.
pub fn query_all(document: &Document, selector: &str) -> Vec<Element> {
	document
		.query_selector_all(selector)
		.map(elements)
		.unwrap_or_default()
}

/// Every descendant of `root` matching `selector`.
pub fn query_all_in(root: &Element, selector: &str) -> Vec<Element> {
	root.query_selector_all(selector)
		.map(elements)
		.unwrap_or_default()
}

/// First element matching `selector`, if any.
pub fn query(document: &Document, selector: &str) -> Option<Element> {
	document.query_selector(selector).ok().flatten()
}

/// Element by id, as an `HtmlElement`.
pub fn html_by_id(document: &Document, id: &str) -> Option<HtmlElement> {
	document
		.get_element_by_id(id)
		.and_then(|el| el.dyn_into::<HtmlElement>().ok())
}

/// Adds or removes a class.
pub fn set_class(element: &Element, class: &str, on: bool) {
	let classes = element.class_list();
	let result = if on {
		classes.add_1(class)
	} else {
		classes.remove_1(class)
	};
	if let Err(err) = result {
		debug!("class {class:?} not updated: {}", describe(&err));
	}
}

/// Sets one inline style property.
pub fn set_style(element: &HtmlElement, property: &str, value: &str) {
	if let Err(err) = element.style().set_property(property, value) {
		debug!("style {property}: {value} not set: {}", describe(&err));
	}
}

/// Appends a `<style id=..>` block to the head unless one with that id exists.
pub fn ensure_style(document: &Document, id: &str, css: &str) -> Result<()> {
	if document.get_element_by_id(id).is_some() {
		return Ok(());
	}
	let head = document
		.head()
		.ok_or_else(|| SiteError::MissingElement("head".into()))?;
	let style = document.create_element("style").map_err(SiteError::js)?;
	style.set_id(id);
	style.set_text_content(Some(css));
	head.append_child(&style).map_err(SiteError::js)?;
	Ok(())
}

/// Bounding box of `element` in viewport coordinates.
pub fn client_rect(element: &Element) -> Rect {
	let rect = element.get_bounding_client_rect();
	Rect {
		left: rect.left(),
		top: rect.top(),
		width: rect.width(),
		height: rect.height(),
	}
}

/// Current viewport width and vertical scroll offset.
pub fn viewport(window: &Window) -> Viewport {
	Viewport {
		width: window
			.inner_width()
			.ok()
			.and_then(|w| w.as_f64())
			.unwrap_or_default(),
		scroll_y: window.scroll_y().unwrap_or_default(),
	}
}

/// Nearest ancestor (or self) of an event target matching `selector`.
pub fn closest(target: Option<web_sys::EventTarget>, selector: &str) -> Option<Element> {
	target?
		.dyn_into::<Element>()
		.ok()?
		.closest(selector)
		.ok()
		.flatten()
}
