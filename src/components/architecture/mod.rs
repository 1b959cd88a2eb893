//! Architecture diagram: a hand-placed table of boxes joined by S-curves,
//! with a shared hover tooltip and zoom buttons.

mod component;
mod layout;
mod render;
mod state;
mod table;
mod types;

pub use component::{ArchitectureDiagram, mount};
pub use layout::{Connector, Curve, DiagramLayout, Point, Stroke, layout, stroke_for};
pub use render::svg_markup;
pub use state::{
	Breakpoint, Placement, Rect, TooltipMachine, TooltipPhase, TooltipPosition, Viewport,
	ZoomState, place_tooltip, scale_for_width,
};
pub use table::default_spec;
pub use types::{ComponentBox, Connection, DiagramSpec, Side, StyleCategory};
