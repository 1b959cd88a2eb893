//! Error type shared by the diagram and page chrome.

use wasm_bindgen::JsValue;

/// Failures that can occur while wiring the page.
///
/// None of these are fatal: callers log them and leave the affected feature
/// disabled.
#[derive(Debug, thiserror::Error)]
pub enum SiteError {
	/// An element the feature needs is not on this page.
	#[error("missing element: {0}")]
	MissingElement(String),
	/// A DOM call threw.
	#[error("DOM call failed: {0}")]
	Js(String),
	/// The clipboard rejected a write.
	#[error("clipboard write failed: {0}")]
	Clipboard(String),
	/// Local storage is unavailable or rejected a write.
	#[error("storage unavailable: {0}")]
	Storage(String),
	/// The embedded site configuration is not valid JSON.
	#[error("invalid site configuration: {0}")]
	Config(#[from] serde_json::Error),
	/// A breakpoint or the full-width scale has no zoom button.
	#[error("zoom scale {0} is not one of the configured zoom levels")]
	UnlistedScale(f64),
	/// Two components in a diagram table share an id.
	#[error("duplicate component id in diagram table: {0}")]
	DuplicateComponent(String),
}

/// Result alias for fallible site operations.
pub type Result<T> = std::result::Result<T, SiteError>;

impl SiteError {
	/// Wraps a thrown `JsValue`, keeping its message when it has one.
	pub fn js(value: JsValue) -> Self {
		Self::Js(describe(&value))
	}
}

/// Renders a `JsValue` for logs.
pub(crate) fn describe(value: &JsValue) -> String {
	value.as_string().unwrap_or_else(|| format!("{value:?}"))
}
