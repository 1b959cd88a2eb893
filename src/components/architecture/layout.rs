use log::debug;

use super::types::{ComponentBox, Connection, DiagramSpec, Side, StyleCategory};

/// Vertical distance between a connector endpoint and its control point.
pub const CURVE_OFFSET: f64 = 50.0;
/// How far a connector label sits above the curve.
pub const LABEL_LIFT: f64 = 6.0;

/// A position in diagram units.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
	/// Rightwards.
	pub x: f64,
	/// Downwards.
	pub y: f64,
}

impl Point {
	/// Point at `(x, y)`.
	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}
}

/// How a connection's line is drawn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stroke {
	/// Line and arrowhead colour.
	pub color: &'static str,
	/// Line width.
	pub width: f64,
	/// `stroke-dasharray`, `None` for a solid line.
	pub dash: Option<&'static str>,
	/// Id of the arrowhead marker.
	pub marker: &'static str,
}

const STROKES: [(StyleCategory, Stroke); 4] = [
	(
		StyleCategory::Main,
		Stroke {
			color: "#5865F2",
			width: 3.0,
			dash: None,
			marker: "arrow-main",
		},
	),
	(
		StyleCategory::Data,
		Stroke {
			color: "#3BA55D",
			width: 2.0,
			dash: Some("6,4"),
			marker: "arrow-data",
		},
	),
	(
		StyleCategory::Config,
		Stroke {
			color: "#FAA61A",
			width: 2.0,
			dash: Some("2,4"),
			marker: "arrow-config",
		},
	),
	(
		StyleCategory::Error,
		Stroke {
			color: "#ED4245",
			width: 2.0,
			dash: Some("8,3,2,3"),
			marker: "arrow-error",
		},
	),
];

/// Stroke for categories missing from the table.
pub const FALLBACK_STROKE: Stroke = Stroke {
	color: "#333333",
	width: 2.0,
	dash: None,
	marker: "arrow-default",
};

/// Looks up the stroke of a style category.
pub fn stroke_for(style: StyleCategory) -> Stroke {
	STROKES
		.iter()
		.find(|(category, _)| *category == style)
		.map(|(_, stroke)| *stroke)
		.unwrap_or(FALLBACK_STROKE)
}

/// Every stroke an arrowhead marker has to exist for.
pub fn all_strokes() -> impl Iterator<Item = Stroke> {
	STROKES
		.iter()
		.map(|(_, stroke)| *stroke)
		.chain(std::iter::once(FALLBACK_STROKE))
}

/// Centre of the given edge of a box.
pub fn anchor(component: &ComponentBox, side: Side) -> Point {
	let x = component.x + component.width / 2.0;
	match side {
		Side::Top => Point::new(x, component.y),
		Side::Bottom => Point::new(x, component.y + component.height),
	}
}

/// Control point pulled away from the box edge the curve attaches to.
fn control(point: Point, side: Side) -> Point {
	match side {
		Side::Top => Point::new(point.x, point.y - CURVE_OFFSET),
		Side::Bottom => Point::new(point.x, point.y + CURVE_OFFSET),
	}
}

/// A cubic Bezier segment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Curve {
	/// Where the curve leaves the source box.
	pub start: Point,
	/// Control point next to `start`.
	pub c1: Point,
	/// Control point next to `end`.
	pub c2: Point,
	/// Where the curve enters the target box.
	pub end: Point,
}

impl Curve {
	/// Point at parameter `t` in `[0, 1]`.
	pub fn at(&self, t: f64) -> Point {
		let u = 1.0 - t;
		let (a, b, c, d) = (u * u * u, 3.0 * u * u * t, 3.0 * u * t * t, t * t * t);
		Point::new(
			a * self.start.x + b * self.c1.x + c * self.c2.x + d * self.end.x,
			a * self.start.y + b * self.c1.y + c * self.c2.y + d * self.end.y,
		)
	}

	/// SVG path data.
	pub fn path_data(&self) -> String {
		format!(
			"M {} {} C {} {}, {} {}, {} {}",
			fmt(self.start.x),
			fmt(self.start.y),
			fmt(self.c1.x),
			fmt(self.c1.y),
			fmt(self.c2.x),
			fmt(self.c2.y),
			fmt(self.end.x),
			fmt(self.end.y),
		)
	}
}

/// A resolved connection, ready to draw.
#[derive(Clone, Debug, PartialEq)]
pub struct Connector {
	/// Source component id.
	pub from: String,
	/// Target component id.
	pub to: String,
	/// Label text.
	pub label: String,
	/// The S-curve between the two anchors.
	pub curve: Curve,
	/// Label position, just above the curve's midpoint.
	pub label_at: Point,
	/// How the curve is drawn.
	pub stroke: Stroke,
}

/// Boxes and connectors of one diagram.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DiagramLayout {
	/// Boxes in drawing order.
	pub boxes: Vec<ComponentBox>,
	/// Connectors whose endpoints both exist.
	pub connectors: Vec<Connector>,
}

fn route(connection: &Connection, from: &ComponentBox, to: &ComponentBox) -> Connector {
	let start = anchor(from, connection.exit);
	let end = anchor(to, connection.entry);
	let curve = Curve {
		start,
		c1: control(start, connection.exit),
		c2: control(end, connection.entry),
		end,
	};
	let mid = curve.at(0.5);
	Connector {
		from: connection.from.clone(),
		to: connection.to.clone(),
		label: connection.label.clone(),
		curve,
		label_at: Point::new(mid.x, mid.y - LABEL_LIFT),
		stroke: stroke_for(connection.style),
	}
}

/// Places every box and routes every connection whose endpoints exist.
pub fn layout(spec: &DiagramSpec) -> DiagramLayout {
	let connectors = spec
		.connections
		.iter()
		.filter_map(|connection| {
			match (spec.component(&connection.from), spec.component(&connection.to)) {
				(Some(from), Some(to)) => Some(route(connection, from, to)),
				_ => {
					debug!(
						"skipping connection {} -> {}: unknown endpoint",
						connection.from, connection.to
					);
					None
				}
			}
		})
		.collect();

	DiagramLayout {
		boxes: spec.components.clone(),
		connectors,
	}
}

/// Formats a coordinate without a trailing `.0`.
pub(crate) fn fmt(value: f64) -> String {
	let rounded = (value * 100.0).round() / 100.0;
	if rounded == 0.0 {
		return "0".into();
	}
	let text = format!("{rounded:.2}");
	text.trim_end_matches('0').trim_end_matches('.').to_string()
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;
	use crate::components::architecture::table::default_spec;

	fn boxed(id: &str, x: f64, y: f64) -> ComponentBox {
		ComponentBox {
			id: id.into(),
			x,
			y,
			width: 200.0,
			height: 60.0,
			color: "#000".into(),
			name: id.to_uppercase(),
			description: String::new(),
		}
	}

	#[test]
	fn connector_joins_top_of_source_to_bottom_of_target() {
		let spec = DiagramSpec {
			components: vec![boxed("a", 100.0, 400.0), boxed("b", 300.0, 100.0)],
			connections: vec![Connection::new("a", "b", "calls", StyleCategory::Main)],
		};
		let layout = layout(&spec);
		let curve = layout.connectors[0].curve;

		assert_eq!(curve.start, Point::new(200.0, 400.0));
		assert_eq!(curve.c1, Point::new(200.0, 350.0));
		assert_eq!(curve.c2, Point::new(400.0, 210.0));
		assert_eq!(curve.end, Point::new(400.0, 160.0));
		assert_eq!(
			curve.path_data(),
			"M 200 400 C 200 350, 400 210, 400 160"
		);
	}

	#[test]
	fn routed_sides_push_control_points_away_from_each_box() {
		let spec = DiagramSpec {
			components: vec![boxed("a", 0.0, 0.0), boxed("b", 0.0, 300.0)],
			connections: vec![
				Connection::new("a", "b", "down", StyleCategory::Data)
					.routed(Side::Bottom, Side::Top),
			],
		};
		let curve = layout(&spec).connectors[0].curve;

		assert_eq!(curve.start, Point::new(100.0, 60.0));
		assert_eq!(curve.c1, Point::new(100.0, 110.0));
		assert_eq!(curve.c2, Point::new(100.0, 250.0));
		assert_eq!(curve.end, Point::new(100.0, 300.0));
	}

	#[test]
	fn label_sits_above_the_curve_midpoint() {
		let spec = DiagramSpec {
			components: vec![boxed("a", 0.0, 0.0), boxed("b", 0.0, 300.0)],
			connections: vec![
				Connection::new("a", "b", "down", StyleCategory::Data)
					.routed(Side::Bottom, Side::Top),
			],
		};
		let connector = &layout(&spec).connectors[0];
		assert_eq!(connector.label_at, Point::new(100.0, 180.0 - LABEL_LIFT));
	}

	#[test]
	fn dangling_connections_are_skipped() {
		let spec = DiagramSpec {
			components: vec![boxed("a", 0.0, 0.0), boxed("b", 0.0, 300.0)],
			connections: vec![
				Connection::new("a", "ghost", "lost", StyleCategory::Main),
				Connection::new("ghost", "b", "lost", StyleCategory::Main),
				Connection::new("a", "b", "kept", StyleCategory::Main),
			],
		};
		let layout = layout(&spec);

		assert_eq!(layout.boxes.len(), 2);
		assert_eq!(layout.connectors.len(), 1);
		assert_eq!(layout.connectors[0].label, "kept");
	}

	#[test]
	fn strokes_follow_the_category_table() {
		assert_eq!(stroke_for(StyleCategory::Main).color, "#5865F2");
		assert_eq!(stroke_for(StyleCategory::Main).dash, None);
		assert_eq!(stroke_for(StyleCategory::Data).dash, Some("6,4"));
		assert_eq!(stroke_for(StyleCategory::Error).marker, "arrow-error");
		assert_eq!(stroke_for(StyleCategory::Other), FALLBACK_STROKE);
	}

	#[test]
	fn every_stroke_has_a_distinct_marker() {
		let mut markers: Vec<_> = all_strokes().map(|s| s.marker).collect();
		let total = markers.len();
		markers.sort_unstable();
		markers.dedup();
		assert_eq!(markers.len(), total);
	}

	#[test]
	fn default_table_routes_every_connection() {
		let spec = default_spec();
		assert_eq!(layout(&spec).connectors.len(), spec.connections.len());
	}

	#[test]
	fn coordinates_format_compactly() {
		assert_eq!(fmt(200.0), "200");
		assert_eq!(fmt(12.5), "12.5");
		assert_eq!(fmt(1.0 / 3.0), "0.33");
		assert_eq!(fmt(-0.001), "0");
	}
}
