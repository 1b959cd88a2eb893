use std::fmt::Write as _;

use super::layout::{Connector, DiagramLayout, all_strokes, fmt};
use super::types::ComponentBox;

const SVG_NS: &str = "http://www.w3.org/2000/svg";
const CORNER_RADIUS: f64 = 8.0;

/// Styles for the shared component tooltip.
pub const TOOLTIP_CSS: &str = r#"
.component-tooltip {
	position: absolute;
	background-color: rgba(255, 255, 255, 0.95);
	border: 1px solid #ccc;
	border-radius: 4px;
	padding: 8px 12px;
	font-size: 14px;
	max-width: 300px;
	box-shadow: 0 2px 10px rgba(0, 0, 0, 0.1);
	z-index: 1000;
	pointer-events: none;
	transition: opacity 0.2s ease;
}
.component-tooltip strong {
	display: block;
	margin-bottom: 5px;
	color: #5865F2;
	border-bottom: 1px solid #eee;
	padding-bottom: 3px;
}
[data-theme="dark"] .component-tooltip {
	background-color: rgba(47, 49, 54, 0.95);
	border-color: #202225;
	color: #dcddde;
}
.architecture-svg .component { cursor: pointer; }
.architecture-svg .component:hover rect { filter: brightness(1.1); }
"#;

fn escape_xml_into(out: &mut String, text: &str) {
	for ch in text.chars() {
		match ch {
			'&' => out.push_str("&amp;"),
			'<' => out.push_str("&lt;"),
			'>' => out.push_str("&gt;"),
			'"' => out.push_str("&quot;"),
			'\'' => out.push_str("&#39;"),
			_ => out.push(ch),
		}
	}
}

pub(crate) fn escape_xml(text: &str) -> String {
	let mut out = String::with_capacity(text.len());
	escape_xml_into(&mut out, text);
	out
}

fn write_markers(out: &mut String) {
	out.push_str("<defs>");
	for stroke in all_strokes() {
		let _ = write!(
			out,
			r#"<marker id="{id}" viewBox="0 0 10 10" refX="9" refY="5" markerWidth="6" markerHeight="6" orient="auto-start-reverse"><path d="M 0 0 L 10 5 L 0 10 z" fill="{color}"/></marker>"#,
			id = stroke.marker,
			color = stroke.color,
		);
	}
	out.push_str("</defs>");
}

fn write_connector(out: &mut String, connector: &Connector) {
	let stroke = connector.stroke;
	let _ = write!(
		out,
		r#"<g class="connection" data-from="{}" data-to="{}">"#,
		escape_xml(&connector.from),
		escape_xml(&connector.to),
	);
	let _ = write!(
		out,
		r#"<path d="{d}" fill="none" stroke="{color}" stroke-width="{width}""#,
		d = connector.curve.path_data(),
		color = stroke.color,
		width = fmt(stroke.width),
	);
	if let Some(dash) = stroke.dash {
		let _ = write!(out, r#" stroke-dasharray="{dash}""#);
	}
	let _ = write!(out, r#" marker-end="url(#{})"/>"#, stroke.marker);
	let _ = write!(
		out,
		r#"<text class="connection-label" x="{}" y="{}" text-anchor="middle" font-size="12" fill="{}">"#,
		fmt(connector.label_at.x),
		fmt(connector.label_at.y),
		stroke.color,
	);
	escape_xml_into(out, &connector.label);
	out.push_str("</text></g>");
}

fn write_component(out: &mut String, component: &ComponentBox) {
	let _ = write!(
		out,
		r#"<g class="component" data-id="{}" data-name="{}" data-description="{}">"#,
		escape_xml(&component.id),
		escape_xml(&component.name),
		escape_xml(&component.description),
	);
	let _ = write!(
		out,
		r#"<rect x="{}" y="{}" width="{}" height="{}" rx="{r}" ry="{r}" fill="{}"/>"#,
		fmt(component.x),
		fmt(component.y),
		fmt(component.width),
		fmt(component.height),
		escape_xml(&component.color),
		r = fmt(CORNER_RADIUS),
	);
	let _ = write!(
		out,
		r##"<text x="{}" y="{}" text-anchor="middle" dominant-baseline="middle" font-size="16" font-weight="bold" fill="#ffffff">"##,
		fmt(component.x + component.width / 2.0),
		fmt(component.y + component.height / 2.0),
	);
	escape_xml_into(out, &component.name);
	out.push_str("</text></g>");
}

/// SVG document for a laid out diagram. The surface fills its parent; the
/// view box is the unscaled base size.
pub fn svg_markup(layout: &DiagramLayout, base_width: f64, base_height: f64) -> String {
	let mut out = String::new();
	let _ = write!(
		out,
		r#"<svg class="architecture-svg" xmlns="{SVG_NS}" width="100%" height="100%" viewBox="0 0 {} {}" preserveAspectRatio="xMidYMid meet" role="img" aria-label="Architecture diagram">"#,
		fmt(base_width),
		fmt(base_height),
	);
	write_markers(&mut out);
	// Connectors first so boxes are drawn over the curve ends.
	out.push_str(r#"<g class="connections">"#);
	for connector in &layout.connectors {
		write_connector(&mut out, connector);
	}
	out.push_str(r#"</g><g class="components">"#);
	for component in &layout.boxes {
		write_component(&mut out, component);
	}
	out.push_str("</g></svg>");
	out
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::architecture::layout::layout;
	use crate::components::architecture::table::default_spec;
	use crate::components::architecture::types::{Connection, DiagramSpec, StyleCategory};

	fn markup(spec: &DiagramSpec) -> String {
		svg_markup(&layout(spec), 1000.0, 700.0)
	}

	#[test]
	fn every_box_carries_its_metadata() {
		let spec = default_spec();
		let svg = markup(&spec);
		assert_eq!(svg.matches(r#"<g class="component""#).count(), spec.components.len());
		assert!(svg.contains(r#"data-id="cli" data-name="CLI""#));
		assert!(svg.contains(r#"data-name="Message Processor""#));
	}

	#[test]
	fn dangling_connections_render_no_path() {
		let mut spec = default_spec();
		let routed = spec.connections.len();
		spec
			.connections
			.push(Connection::new("cli", "nowhere", "lost", StyleCategory::Main));
		let svg = markup(&spec);
		assert_eq!(svg.matches(r#"<g class="connection" "#).count(), routed);
		assert!(!svg.contains(">lost<"));
	}

	#[test]
	fn labels_use_the_stroke_colour() {
		let svg = markup(&default_spec());
		assert!(svg.contains(r##"fill="#ED4245">HTTP errors</text>"##));
	}

	#[test]
	fn one_marker_per_category() {
		let svg = markup(&DiagramSpec::default());
		for id in ["arrow-main", "arrow-data", "arrow-config", "arrow-error", "arrow-default"] {
			assert!(svg.contains(&format!(r#"<marker id="{id}""#)), "{id}");
		}
	}

	#[test]
	fn text_is_escaped() {
		let mut spec = default_spec();
		spec.components[0].description = r#"<b>"quoted" & more</b>"#.into();
		let svg = markup(&spec);
		assert!(svg.contains("&lt;b&gt;&quot;quoted&quot; &amp; more&lt;/b&gt;"));
	}

	#[test]
	fn view_box_is_the_base_size() {
		let svg = markup(&DiagramSpec::default());
		assert!(svg.contains(r#"viewBox="0 0 1000 700""#));
	}
}
