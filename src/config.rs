//! Site configuration.
//!
//! Pages may embed a JSON object in
//! `<script type="application/json" id="site-config">` to override any of the
//! defaults below; every field is optional.

use std::time::Duration;

use log::{debug, warn};
use serde::Deserialize;
use web_sys::Document;

use crate::components::architecture::{Breakpoint, DiagramSpec, ZoomState};
use crate::error::{Result, SiteError};

/// Id of the script element holding the page's configuration.
pub const CONFIG_ELEMENT_ID: &str = "site-config";

/// Everything the page wiring can be tuned with.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct SiteConfig {
	/// Architecture diagram settings.
	pub diagram: DiagramConfig,
	/// Navbar, theme, copy button and menu settings.
	pub chrome: ChromeConfig,
}

/// Settings for the architecture diagram.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct DiagramConfig {
	/// Id of the element the diagram is mounted into.
	pub container_id: String,
	/// Width of the drawing surface at 100%.
	pub base_width: f64,
	/// Height of the drawing surface at 100%.
	pub base_height: f64,
	/// Scales offered as zoom buttons, smallest first.
	pub zoom_levels: Vec<f64>,
	/// Viewport width thresholds for the automatic zoom.
	pub breakpoints: Vec<Breakpoint>,
	/// Scale used when the viewport is wider than every breakpoint.
	pub full_scale: f64,
	/// Quiet window before a resize re-evaluates the zoom.
	pub resize_debounce_ms: u64,
	/// Delay between starting the tooltip fade and hiding it.
	pub tooltip_fade_ms: u64,
	/// Width the tooltip is positioned with.
	pub tooltip_width: f64,
	/// Minimum distance between the tooltip and the viewport edge.
	pub tooltip_margin: f64,
	/// Replaces the built-in component table.
	pub table: Option<DiagramSpec>,
}

impl Default for DiagramConfig {
	fn default() -> Self {
		Self {
			container_id: "diagram-container".into(),
			base_width: 1000.0,
			base_height: 700.0,
			zoom_levels: vec![0.5, 0.75, 1.0],
			breakpoints: vec![
				Breakpoint {
					below: 576.0,
					scale: 0.5,
				},
				Breakpoint {
					below: 992.0,
					scale: 0.75,
				},
			],
			full_scale: 1.0,
			resize_debounce_ms: 250,
			tooltip_fade_ms: 200,
			tooltip_width: 300.0,
			tooltip_margin: 10.0,
			table: None,
		}
	}
}

impl DiagramConfig {
	/// Resize debounce window.
	pub fn resize_debounce(&self) -> Duration {
		Duration::from_millis(self.resize_debounce_ms)
	}

	/// Tooltip fade-out delay.
	pub fn tooltip_fade(&self) -> Duration {
		Duration::from_millis(self.tooltip_fade_ms)
	}

	/// Checks that every scale the automatic zoom can pick is offered as a
	/// zoom level, so one button is always active.
	pub fn check_scales(&self) -> Result<()> {
		let listed = |scale: f64| {
			self.zoom_levels
				.iter()
				.any(|level| ZoomState::new(scale).is_active(*level))
		};
		let scales = self.breakpoints.iter().map(|bp| bp.scale);
		match std::iter::once(self.full_scale).chain(scales).find(|s| !listed(*s)) {
			Some(scale) => Err(SiteError::UnlistedScale(scale)),
			None => Ok(()),
		}
	}
}

/// Settings for the page chrome.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct ChromeConfig {
	/// Local storage key of the theme flag.
	pub theme_key: String,
	/// Scroll offset after which the navbar gets `navbar-scrolled`.
	pub navbar_scrolled_after: f64,
	/// Scroll offset after which scrolling down hides the navbar.
	pub navbar_hide_after: f64,
	/// Navbar height compensation for the scroll spy.
	pub scroll_spy_offset: f64,
	/// How long "Copied!" / "Failed" stays on a copy button.
	pub copy_feedback_ms: u64,
}

impl Default for ChromeConfig {
	fn default() -> Self {
		Self {
			theme_key: "theme".into(),
			navbar_scrolled_after: 100.0,
			navbar_hide_after: 200.0,
			scroll_spy_offset: 100.0,
			copy_feedback_ms: 2000,
		}
	}
}

impl ChromeConfig {
	/// Copy button feedback duration.
	pub fn copy_feedback(&self) -> Duration {
		Duration::from_millis(self.copy_feedback_ms)
	}
}

impl SiteConfig {
	/// Parses a configuration object and checks its zoom scales.
	pub fn from_json(json: &str) -> Result<Self> {
		let config: Self = serde_json::from_str(json)?;
		config.diagram.check_scales()?;
		Ok(config)
	}

	/// Reads the page's embedded configuration, falling back to defaults when
	/// it is malformed or names a zoom scale without a button.
	pub fn from_document(document: &Document) -> Self {
		let Some(element) = document.get_element_by_id(CONFIG_ELEMENT_ID) else {
			debug!("no #{CONFIG_ELEMENT_ID} element, using default configuration");
			return Self::default();
		};
		let json = element.text_content().unwrap_or_default();
		match Self::from_json(&json) {
			Ok(config) => config,
			Err(err) => {
				warn!("{err}; using default configuration");
				Self::default()
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;
	use crate::components::architecture::scale_for_width;

	#[test]
	fn empty_object_yields_defaults() {
		let config = SiteConfig::from_json("{}").unwrap();
		assert_eq!(config, SiteConfig::default());
	}

	#[test]
	fn partial_sections_keep_remaining_defaults() {
		let config = SiteConfig::from_json(
			r#"{ "diagram": { "base_width": 1200, "zoom_levels": [0.5, 0.75, 1.0, 1.5] },
			     "chrome": { "theme_key": "docs-theme" } }"#,
		)
		.unwrap();

		assert_eq!(config.diagram.base_width, 1200.0);
		assert_eq!(config.diagram.base_height, 700.0);
		assert_eq!(config.diagram.zoom_levels, vec![0.5, 0.75, 1.0, 1.5]);
		assert_eq!(config.chrome.theme_key, "docs-theme");
		assert_eq!(config.chrome.copy_feedback_ms, 2000);
	}

	#[test]
	fn malformed_json_is_a_config_error() {
		let err = SiteConfig::from_json("{ diagram: ").unwrap_err();
		assert!(matches!(err, crate::error::SiteError::Config(_)));
	}

	#[test]
	fn breakpoint_scales_must_have_a_zoom_button() {
		let err = SiteConfig::from_json(
			r#"{ "diagram": { "breakpoints": [{ "below": 576, "scale": 0.6 }] } }"#,
		)
		.unwrap_err();
		assert!(matches!(err, crate::error::SiteError::UnlistedScale(s) if s == 0.6));
	}

	#[test]
	fn full_scale_must_have_a_zoom_button() {
		let err = SiteConfig::from_json(r#"{ "diagram": { "full_scale": 1.25 } }"#).unwrap_err();
		assert!(matches!(err, crate::error::SiteError::UnlistedScale(s) if s == 1.25));
	}

	#[test]
	fn default_scales_each_activate_one_level() {
		let config = DiagramConfig::default();
		assert!(config.check_scales().is_ok());
		for width in [320.0, 800.0, 1600.0] {
			let zoom = ZoomState::new(scale_for_width(&config.breakpoints, config.full_scale, width));
			let active = config.zoom_levels.iter().filter(|l| zoom.is_active(**l)).count();
			assert_eq!(active, 1, "width {width}");
		}
	}

	#[test]
	fn extra_levels_may_go_unused_by_breakpoints() {
		let config = SiteConfig::from_json(
			r#"{ "diagram": { "zoom_levels": [0.25, 0.5, 0.75, 1.0],
			                  "breakpoints": [{ "below": 400, "scale": 0.25 }] } }"#,
		)
		.unwrap();
		assert_eq!(config.diagram.breakpoints.len(), 1);
	}

	#[test]
	fn durations_follow_millisecond_fields() {
		let config = SiteConfig::default();
		assert_eq!(config.diagram.resize_debounce(), Duration::from_millis(250));
		assert_eq!(config.diagram.tooltip_fade(), Duration::from_millis(200));
		assert_eq!(config.chrome.copy_feedback(), Duration::from_millis(2000));
	}
}
