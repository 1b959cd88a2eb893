use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use gloo::events::EventListener;
use log::{debug, warn};
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlInputElement, Storage};

use crate::error::{Result, SiteError, describe};

const THEME_ATTRIBUTE: &str = "data-theme";
const TOGGLE_ID: &str = "theme-toggle";

/// Colour scheme of the site.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Theme {
	/// Unchecked toggle.
	#[default]
	Light,
	/// Checked toggle.
	Dark,
}

impl Theme {
	/// Value stored and written to `data-theme`.
	pub fn as_str(self) -> &'static str {
		match self {
			Theme::Light => "light",
			Theme::Dark => "dark",
		}
	}

	/// Reads a stored value; anything but `light` or `dark` is `None`.
	pub fn parse(value: &str) -> Option<Self> {
		match value {
			"light" => Some(Theme::Light),
			"dark" => Some(Theme::Dark),
			_ => None,
		}
	}

	/// The theme selected by the toggle checkbox.
	pub fn from_checked(checked: bool) -> Self {
		if checked { Theme::Dark } else { Theme::Light }
	}

	/// Whether the toggle should be checked.
	pub fn is_dark(self) -> bool {
		self == Theme::Dark
	}
}

/// Key-value persistence for preferences.
pub trait PreferenceStore {
	/// Value saved under `key`, if any.
	fn load(&self, key: &str) -> Option<String>;
	/// Saves `value` under `key`.
	fn save(&self, key: &str, value: &str) -> Result<()>;
}

/// Browser local storage.
pub struct LocalStore(Storage);

impl LocalStore {
	/// The window's local storage, when the browser allows it.
	pub fn open() -> Option<Self> {
		web_sys::window()?.local_storage().ok().flatten().map(Self)
	}
}

impl PreferenceStore for LocalStore {
	fn load(&self, key: &str) -> Option<String> {
		self.0.get_item(key).ok().flatten()
	}

	fn save(&self, key: &str, value: &str) -> Result<()> {
		self.0
			.set_item(key, value)
			.map_err(|err| SiteError::Storage(describe(&err)))
	}
}

/// In-memory store, used when local storage is unavailable.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(Rc<RefCell<HashMap<String, String>>>);

impl PreferenceStore for MemoryStore {
	fn load(&self, key: &str) -> Option<String> {
		self.0.borrow().get(key).cloned()
	}

	fn save(&self, key: &str, value: &str) -> Result<()> {
		self.0.borrow_mut().insert(key.into(), value.into());
		Ok(())
	}
}

/// The persisted theme flag.
pub struct ThemePreference<S> {
	store: S,
	key: String,
}

impl<S: PreferenceStore> ThemePreference<S> {
	/// Preference kept in `store` under `key`.
	pub fn new(store: S, key: impl Into<String>) -> Self {
		Self {
			store,
			key: key.into(),
		}
	}

	/// The stored theme, if one was saved and is recognised.
	pub fn restore(&self) -> Option<Theme> {
		let value = self.store.load(&self.key)?;
		let theme = Theme::parse(&value);
		if theme.is_none() {
			debug!("ignoring stored theme {value:?}");
		}
		theme
	}

	/// Persists the theme chosen by the checkbox and returns it. A storage
	/// failure is logged; the theme still applies for this page view.
	pub fn toggle(&self, checked: bool) -> Theme {
		let theme = Theme::from_checked(checked);
		if let Err(err) = self.store.save(&self.key, theme.as_str()) {
			warn!("{err}");
		}
		theme
	}
}

fn apply(document: &Document, theme: Theme) {
	if let Some(root) = document.document_element() {
		if let Err(err) = root.set_attribute(THEME_ATTRIBUTE, theme.as_str()) {
			debug!("{THEME_ATTRIBUTE} not set: {}", describe(&err));
		}
	}
}

fn toggle_input(document: &Document) -> Option<HtmlInputElement> {
	document
		.get_element_by_id(TOGGLE_ID)?
		.dyn_into::<HtmlInputElement>()
		.ok()
}

/// Restores the saved theme and persists every change of `#theme-toggle`.
pub(super) fn install<S>(document: &Document, preference: ThemePreference<S>) -> Option<EventListener>
where
	S: PreferenceStore + 'static,
{
	let toggle = toggle_input(document)?;
	if let Some(theme) = preference.restore() {
		apply(document, theme);
		toggle.set_checked(theme.is_dark());
	}

	let (document, input) = (document.clone(), toggle.clone());
	Some(EventListener::new(&toggle, "change", move |_| {
		let theme = preference.toggle(input.checked());
		apply(&document, theme);
	}))
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn checkbox_state_maps_to_theme() {
		assert_eq!(Theme::from_checked(true), Theme::Dark);
		assert_eq!(Theme::from_checked(false), Theme::Light);
	}

	#[test]
	fn toggle_persists_the_value() {
		let store = MemoryStore::default();
		let preference = ThemePreference::new(store.clone(), "theme");

		assert_eq!(preference.toggle(true), Theme::Dark);
		assert_eq!(store.load("theme").as_deref(), Some("dark"));

		assert_eq!(preference.toggle(false), Theme::Light);
		assert_eq!(store.load("theme").as_deref(), Some("light"));
	}

	#[test]
	fn restore_reads_a_previous_toggle() {
		let store = MemoryStore::default();
		ThemePreference::new(store.clone(), "theme").toggle(true);

		let reloaded = ThemePreference::new(store, "theme");
		assert_eq!(reloaded.restore(), Some(Theme::Dark));
	}

	#[test]
	fn nothing_stored_restores_nothing() {
		let preference = ThemePreference::new(MemoryStore::default(), "theme");
		assert_eq!(preference.restore(), None);
	}

	#[test]
	fn unknown_stored_values_are_ignored() {
		let store = MemoryStore::default();
		store.save("theme", "sepia").unwrap();
		assert_eq!(ThemePreference::new(store, "theme").restore(), None);
	}

	#[test]
	fn custom_keys_are_respected() {
		let store = MemoryStore::default();
		ThemePreference::new(store.clone(), "docs-theme").toggle(true);
		assert_eq!(store.load("theme"), None);
		assert_eq!(store.load("docs-theme").as_deref(), Some("dark"));
	}
}
