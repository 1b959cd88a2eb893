use serde::{Deserialize, Serialize};

use crate::schedule::{Generation, Ticket};

/// Zoom levels closer than this are the same level.
const SCALE_EPSILON: f64 = 1e-6;

/// Current display scale of the diagram.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoomState {
	/// Factor applied to the base surface size.
	pub scale: f64,
}

impl Default for ZoomState {
	fn default() -> Self {
		Self { scale: 1.0 }
	}
}

impl ZoomState {
	/// Zoom at `scale`.
	pub fn new(scale: f64) -> Self {
		Self { scale }
	}

	/// Switches to `scale`, as a zoom button click does.
	pub fn select(&mut self, scale: f64) {
		self.scale = scale;
	}

	/// Whether the control for `level` should be shown as active.
	pub fn is_active(&self, level: f64) -> bool {
		(self.scale - level).abs() < SCALE_EPSILON
	}

	/// Declared size of the drawing surface at this scale.
	pub fn surface_size(&self, base_width: f64, base_height: f64) -> (f64, f64) {
		(base_width * self.scale, base_height * self.scale)
	}
}

/// Viewports narrower than `below` use `scale`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Breakpoint {
	/// Exclusive upper bound of the viewport width, in CSS pixels.
	pub below: f64,
	/// Zoom used under that width.
	pub scale: f64,
}

/// Picks the zoom for a viewport width: the first breakpoint (in ascending
/// order of `below`) the width falls under, else `full`.
pub fn scale_for_width(breakpoints: &[Breakpoint], full: f64, width: f64) -> f64 {
	let mut sorted = breakpoints.to_vec();
	sorted.sort_by(|a, b| a.below.total_cmp(&b.below));
	sorted
		.iter()
		.find(|bp| width < bp.below)
		.map(|bp| bp.scale)
		.unwrap_or(full)
}

/// Axis-aligned rectangle in viewport coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[allow(missing_docs)]
pub struct Rect {
	pub left: f64,
	pub top: f64,
	pub width: f64,
	pub height: f64,
}

impl Rect {
	/// Bottom edge.
	pub fn bottom(&self) -> f64 {
		self.top + self.height
	}

	/// Horizontal centre.
	pub fn center_x(&self) -> f64 {
		self.left + self.width / 2.0
	}
}

/// Visible part of the page.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Viewport {
	/// Viewport width in CSS pixels.
	pub width: f64,
	/// Vertical scroll offset of the document.
	pub scroll_y: f64,
}

/// Which side of its anchor the tooltip ended up on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Placement {
	/// The default.
	Above,
	/// Flipped, because above would leave the viewport.
	Below,
}

/// Document coordinates for the tooltip.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TooltipPosition {
	/// Left edge in document coordinates.
	pub left: f64,
	/// Top edge in document coordinates.
	pub top: f64,
	/// Side of the anchor the tooltip is on.
	pub placement: Placement,
}

/// Centres a `width` x `height` tooltip above `anchor`, keeping it `margin`
/// away from the viewport sides, and moves it under the anchor when it would
/// leave the top of the viewport.
pub fn place_tooltip(
	anchor: Rect,
	width: f64,
	height: f64,
	viewport: Viewport,
	margin: f64,
) -> TooltipPosition {
	let mut left = anchor.center_x() - width / 2.0;
	if left + width > viewport.width - margin {
		left = viewport.width - width - margin;
	}
	left = left.max(margin);

	let top = anchor.top - height - margin + viewport.scroll_y;
	if top < viewport.scroll_y + margin {
		TooltipPosition {
			left,
			top: anchor.bottom() + margin + viewport.scroll_y,
			placement: Placement::Below,
		}
	} else {
		TooltipPosition {
			left,
			top,
			placement: Placement::Above,
		}
	}
}

/// Where the tooltip is in its hover lifecycle.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum TooltipPhase {
	/// Hidden.
	#[default]
	Idle,
	/// Showing the box with this id.
	Visible(String),
	/// Fading out after the pointer left; hidden when the ticket's timer fires.
	Fading(String, Ticket),
}

/// Hover lifecycle of the shared tooltip: `Idle -> Visible -> Fading -> Idle`.
#[derive(Clone, Debug, Default)]
pub struct TooltipMachine {
	phase: TooltipPhase,
	generation: Generation,
}

impl TooltipMachine {
	/// Current phase.
	pub fn phase(&self) -> &TooltipPhase {
		&self.phase
	}

	/// Pointer entered the box `id`. Cancels any fade in progress and returns
	/// the ticket for the deferred fade-in.
	pub fn enter(&mut self, id: &str) -> Ticket {
		self.phase = TooltipPhase::Visible(id.to_string());
		self.generation.advance()
	}

	/// Pointer left the box. Returns the fade ticket, or `None` when nothing
	/// was showing.
	pub fn leave(&mut self) -> Option<Ticket> {
		match std::mem::take(&mut self.phase) {
			TooltipPhase::Visible(id) => {
				let ticket = self.generation.advance();
				self.phase = TooltipPhase::Fading(id, ticket);
				Some(ticket)
			}
			other => {
				self.phase = other;
				None
			}
		}
	}

	/// Whether a deferred fade-in is still wanted.
	pub fn should_reveal(&self, ticket: Ticket) -> bool {
		matches!(self.phase, TooltipPhase::Visible(_)) && self.generation.is_current(ticket)
	}

	/// The fade delay ran out. Returns `true` when the tooltip should be
	/// hidden now.
	pub fn fade_elapsed(&mut self, ticket: Ticket) -> bool {
		match &self.phase {
			TooltipPhase::Fading(_, current) if *current == ticket => {
				self.phase = TooltipPhase::Idle;
				true
			}
			_ => false,
		}
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	fn breakpoints() -> Vec<Breakpoint> {
		vec![
			Breakpoint {
				below: 576.0,
				scale: 0.5,
			},
			Breakpoint {
				below: 992.0,
				scale: 0.75,
			},
		]
	}

	#[test]
	fn zoom_scales_the_surface() {
		let mut zoom = ZoomState::default();
		zoom.select(0.75);
		assert_eq!(zoom.surface_size(1000.0, 700.0), (750.0, 525.0));
		zoom.select(0.5);
		assert_eq!(zoom.surface_size(1000.0, 700.0), (500.0, 350.0));
	}

	#[test]
	fn exactly_one_level_is_active() {
		let levels = [0.5, 0.75, 1.0];
		for selected in levels {
			let zoom = ZoomState::new(selected);
			let active: Vec<f64> = levels.into_iter().filter(|l| zoom.is_active(*l)).collect();
			assert_eq!(active, vec![selected]);
		}
	}

	#[test]
	fn breakpoints_pick_scale_by_viewport_width() {
		let bps = breakpoints();
		assert_eq!(scale_for_width(&bps, 1.0, 320.0), 0.5);
		assert_eq!(scale_for_width(&bps, 1.0, 575.9), 0.5);
		assert_eq!(scale_for_width(&bps, 1.0, 576.0), 0.75);
		assert_eq!(scale_for_width(&bps, 1.0, 991.0), 0.75);
		assert_eq!(scale_for_width(&bps, 1.0, 992.0), 1.0);
		assert_eq!(scale_for_width(&bps, 1.0, 1920.0), 1.0);
	}

	#[test]
	fn breakpoint_order_does_not_matter() {
		let mut bps = breakpoints();
		bps.reverse();
		assert_eq!(scale_for_width(&bps, 1.0, 500.0), 0.5);
		assert_eq!(scale_for_width(&bps, 1.0, 700.0), 0.75);
	}

	#[test]
	fn tooltip_is_centred_above_the_anchor() {
		let anchor = Rect {
			left: 400.0,
			top: 300.0,
			width: 200.0,
			height: 70.0,
		};
		let viewport = Viewport {
			width: 1280.0,
			scroll_y: 0.0,
		};
		let pos = place_tooltip(anchor, 300.0, 80.0, viewport, 10.0);
		assert_eq!(
			pos,
			TooltipPosition {
				left: 350.0,
				top: 210.0,
				placement: Placement::Above,
			}
		);
	}

	#[test]
	fn tooltip_is_clamped_to_the_viewport_sides() {
		let viewport = Viewport {
			width: 800.0,
			scroll_y: 0.0,
		};
		let near_left = Rect {
			left: 0.0,
			top: 300.0,
			width: 100.0,
			height: 50.0,
		};
		assert_eq!(place_tooltip(near_left, 300.0, 80.0, viewport, 10.0).left, 10.0);

		let near_right = Rect {
			left: 750.0,
			..near_left
		};
		assert_eq!(place_tooltip(near_right, 300.0, 80.0, viewport, 10.0).left, 490.0);
	}

	#[test]
	fn tooltip_never_starts_left_of_the_margin_on_narrow_viewports() {
		let anchor = Rect {
			left: 50.0,
			top: 300.0,
			width: 100.0,
			height: 50.0,
		};
		let viewport = Viewport {
			width: 250.0,
			scroll_y: 0.0,
		};
		assert_eq!(place_tooltip(anchor, 300.0, 80.0, viewport, 10.0).left, 10.0);
	}

	#[test]
	fn tooltip_flips_below_near_the_top_of_the_scrolled_viewport() {
		let anchor = Rect {
			left: 400.0,
			top: 40.0,
			width: 200.0,
			height: 70.0,
		};
		let viewport = Viewport {
			width: 1280.0,
			scroll_y: 500.0,
		};
		let pos = place_tooltip(anchor, 300.0, 80.0, viewport, 10.0);
		assert_eq!(pos.placement, Placement::Below);
		assert_eq!(pos.top, 110.0 + 10.0 + 500.0);
	}

	#[test]
	fn leaving_then_fading_hides_the_tooltip() {
		let mut machine = TooltipMachine::default();
		machine.enter("cli");
		let ticket = machine.leave().unwrap();
		assert_eq!(machine.phase(), &TooltipPhase::Fading("cli".into(), ticket));
		assert!(machine.fade_elapsed(ticket));
		assert_eq!(machine.phase(), &TooltipPhase::Idle);
	}

	#[test]
	fn re_entering_during_the_fade_keeps_the_tooltip() {
		let mut machine = TooltipMachine::default();
		machine.enter("cli");
		let fade = machine.leave().unwrap();
		machine.enter("config");
		assert!(!machine.fade_elapsed(fade));
		assert_eq!(machine.phase(), &TooltipPhase::Visible("config".into()));
	}

	#[test]
	fn a_stale_fade_does_not_hide_a_later_one() {
		let mut machine = TooltipMachine::default();
		machine.enter("cli");
		let first = machine.leave().unwrap();
		machine.enter("cli");
		let second = machine.leave().unwrap();
		assert!(!machine.fade_elapsed(first));
		assert!(machine.fade_elapsed(second));
	}

	#[test]
	fn leaving_while_idle_is_a_no_op() {
		let mut machine = TooltipMachine::default();
		assert_eq!(machine.leave(), None);
		assert_eq!(machine.phase(), &TooltipPhase::Idle);
	}

	#[test]
	fn reveal_is_skipped_after_leaving() {
		let mut machine = TooltipMachine::default();
		let reveal = machine.enter("cli");
		assert!(machine.should_reveal(reveal));
		machine.leave();
		assert!(!machine.should_reveal(reveal));
	}
}
