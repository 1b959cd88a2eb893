use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SiteError};

/// A labelled box in the architecture diagram.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ComponentBox {
	/// Unique key, referenced by connections and `data-id`.
	pub id: String,
	/// Left edge in diagram units.
	pub x: f64,
	/// Top edge in diagram units.
	pub y: f64,
	/// Width in diagram units.
	pub width: f64,
	/// Height in diagram units.
	pub height: f64,
	/// Fill colour.
	pub color: String,
	/// Title drawn in the box and shown in the tooltip.
	pub name: String,
	/// Tooltip body.
	pub description: String,
}

/// Stroke family of a connection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StyleCategory {
	/// Primary control flow.
	Main,
	/// Data moving between components.
	Data,
	/// Settings being read.
	Config,
	/// Errors being raised.
	Error,
	/// Anything else; drawn with the fallback stroke.
	#[serde(other)]
	Other,
}

/// Edge of a box a connector attaches to, at its horizontal centre.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
	/// Top edge.
	Top,
	/// Bottom edge.
	Bottom,
}

impl Side {
	fn top() -> Self {
		Side::Top
	}

	fn bottom() -> Self {
		Side::Bottom
	}
}

/// A directed, labelled curve between two boxes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Connection {
	/// Source component id.
	pub from: String,
	/// Target component id.
	pub to: String,
	/// Text drawn at the curve's midpoint.
	pub label: String,
	/// Selects the stroke.
	pub style: StyleCategory,
	/// Where the curve leaves the source box.
	#[serde(default = "Side::top")]
	pub exit: Side,
	/// Where the curve enters the target box.
	#[serde(default = "Side::bottom")]
	pub entry: Side,
}

impl Connection {
	/// Connection leaving the top of `from` and entering the bottom of `to`.
	pub fn new(from: &str, to: &str, label: &str, style: StyleCategory) -> Self {
		Self {
			from: from.into(),
			to: to.into(),
			label: label.into(),
			style,
			exit: Side::Top,
			entry: Side::Bottom,
		}
	}

	/// Overrides the attachment sides.
	pub fn routed(mut self, exit: Side, entry: Side) -> Self {
		self.exit = exit;
		self.entry = entry;
		self
	}
}

/// The full component and connection table of one diagram.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DiagramSpec {
	/// Boxes, drawn in order.
	pub components: Vec<ComponentBox>,
	/// Curves between boxes, drawn under them.
	pub connections: Vec<Connection>,
}

impl DiagramSpec {
	/// Checks that every component id is unique.
	pub fn validate(&self) -> Result<()> {
		let mut seen = HashSet::new();
		for component in &self.components {
			if !seen.insert(component.id.as_str()) {
				return Err(SiteError::DuplicateComponent(component.id.clone()));
			}
		}
		Ok(())
	}

	/// Looks up a component by id.
	pub fn component(&self, id: &str) -> Option<&ComponentBox> {
		self.components.iter().find(|c| c.id == id)
	}
}
