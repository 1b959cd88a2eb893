use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;

use gloo::events::EventListener;
use leptos::prelude::*;
use log::{debug, warn};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, MouseEvent};

use super::layout::layout;
use super::render::{self, TOOLTIP_CSS, escape_xml};
use super::state::{TooltipMachine, TooltipPhase, ZoomState, place_tooltip, scale_for_width};
use super::table::default_spec;
use super::types::DiagramSpec;
use crate::config::DiagramConfig;
use crate::dom;
use crate::schedule::{Debounce, Deferred};

const TOOLTIP_ID: &str = "component-tooltip";
const TOOLTIP_STYLE_ID: &str = "tooltip-styles";
const COMPONENT_SELECTOR: &str = ".component";
const FADE_IN_DELAY: Duration = Duration::from_millis(10);
const CONTAINER_STYLE: [(&str, &str); 4] = [
	("display", "flex"),
	("justify-content", "center"),
	("align-items", "center"),
	("overflow", "auto"),
];

/// The shared tooltip element and how it is placed.
struct TooltipView {
	element: HtmlElement,
	width: f64,
	margin: f64,
	fade: Duration,
}

impl TooltipView {
	/// Finds the page's tooltip element, creating it on first use.
	fn attach(document: &Document, config: &DiagramConfig) -> Option<Self> {
		let element = match dom::html_by_id(document, TOOLTIP_ID) {
			Some(element) => element,
			None => {
				let element: HtmlElement = document.create_element("div").ok()?.dyn_into().ok()?;
				element.set_id(TOOLTIP_ID);
				element.set_class_name("component-tooltip");
				dom::set_style(&element, "display", "none");
				document.body()?.append_child(&element).ok()?;
				element
			}
		};
		Some(Self {
			element,
			width: config.tooltip_width,
			margin: config.tooltip_margin,
			fade: config.tooltip_fade(),
		})
	}

	/// Fills the tooltip from the box's data attributes and positions it,
	/// still transparent.
	fn show(&self, component: &Element) {
		let name = component.get_attribute("data-name").unwrap_or_default();
		let description = component
			.get_attribute("data-description")
			.unwrap_or_default();
		self.element.set_inner_html(&format!(
			"<strong>{}</strong>{}",
			escape_xml(&name),
			escape_xml(&description)
		));
		dom::set_style(&self.element, "display", "block");
		dom::set_style(&self.element, "opacity", "0");

		let Some(window) = web_sys::window() else {
			return;
		};
		let height = f64::from(self.element.offset_height());
		let position = place_tooltip(
			dom::client_rect(component),
			self.width,
			height,
			dom::viewport(&window),
			self.margin,
		);
		dom::set_style(&self.element, "left", &format!("{}px", position.left));
		dom::set_style(&self.element, "top", &format!("{}px", position.top));
	}

	fn set_opacity(&self, opacity: &str) {
		dom::set_style(&self.element, "opacity", opacity);
	}

	fn hide(&self) {
		dom::set_style(&self.element, "display", "none");
	}
}

/// Transient state of one mounted diagram.
struct DiagramRuntime {
	tooltip: Option<TooltipView>,
	hover: TooltipMachine,
	reveal_timer: Deferred,
	fade_timer: Deferred,
	resize: Debounce,
	resize_timer: Deferred,
	resize_listener: Option<EventListener>,
}

fn on_component_over(runtime: &Rc<RefCell<DiagramRuntime>>, ev: &MouseEvent) {
	let Some(component) = dom::closest(ev.target(), COMPONENT_SELECTOR) else {
		return;
	};
	let id = component.get_attribute("data-id").unwrap_or_default();
	let mut rt = runtime.borrow_mut();
	if matches!(rt.hover.phase(), TooltipPhase::Visible(current) if *current == id) {
		return;
	}

	let ticket = rt.hover.enter(&id);
	rt.fade_timer.cancel();
	let Some(tooltip) = &rt.tooltip else {
		return;
	};
	tooltip.show(&component);

	let weak = Rc::downgrade(runtime);
	rt.reveal_timer.schedule(FADE_IN_DELAY, move || {
		let Some(runtime) = weak.upgrade() else {
			return;
		};
		let rt = runtime.borrow();
		if rt.hover.should_reveal(ticket) {
			if let Some(tooltip) = &rt.tooltip {
				tooltip.set_opacity("1");
			}
		}
	});
}

fn on_component_out(runtime: &Rc<RefCell<DiagramRuntime>>, ev: &MouseEvent) {
	let Some(component) = dom::closest(ev.target(), COMPONENT_SELECTOR) else {
		return;
	};
	// Moving between the rect and the label of the same box.
	let entering = dom::closest(ev.related_target(), COMPONENT_SELECTOR);
	if entering.is_some_and(|e| e.get_attribute("data-id") == component.get_attribute("data-id")) {
		return;
	}

	let mut rt = runtime.borrow_mut();
	let Some(ticket) = rt.hover.leave() else {
		return;
	};
	rt.reveal_timer.cancel();
	let Some(tooltip) = &rt.tooltip else {
		return;
	};
	tooltip.set_opacity("0");
	let fade = tooltip.fade;

	let weak = Rc::downgrade(runtime);
	rt.fade_timer.schedule(fade, move || {
		let Some(runtime) = weak.upgrade() else {
			return;
		};
		let mut rt = runtime.borrow_mut();
		if rt.hover.fade_elapsed(ticket) {
			if let Some(tooltip) = &rt.tooltip {
				tooltip.hide();
			}
		}
	});
}

fn current_scale(config: &DiagramConfig) -> f64 {
	let width = web_sys::window()
		.map(|window| dom::viewport(&window).width)
		.unwrap_or_default();
	scale_for_width(&config.breakpoints, config.full_scale, width)
}

fn listen_for_resize(
	weak: Weak<RefCell<DiagramRuntime>>,
	zoom: RwSignal<ZoomState>,
	config: &DiagramConfig,
) -> Option<EventListener> {
	let window = web_sys::window()?;
	let config = config.clone();
	Some(EventListener::new(&window, "resize", move |_| {
		let Some(runtime) = weak.upgrade() else {
			return;
		};
		let mut rt = runtime.borrow_mut();
		let ticket = rt.resize.trigger();
		let quiet = rt.resize.quiet();
		let (weak, config) = (weak.clone(), config.clone());
		rt.resize_timer.schedule(quiet, move || {
			let Some(runtime) = weak.upgrade() else {
				return;
			};
			if !runtime.borrow_mut().resize.settle(ticket) {
				return;
			}
			let scale = current_scale(&config);
			debug!("viewport resized, zoom {scale}");
			zoom.set(ZoomState::new(scale));
		});
	}))
}

fn zoom_button_class(active: bool) -> &'static str {
	if active {
		"zoom-btn btn btn-sm btn-primary active"
	} else {
		"zoom-btn btn btn-sm btn-outline-primary"
	}
}

/// Architecture diagram with zoom buttons and hover tooltips.
#[component]
pub fn ArchitectureDiagram(
	/// Boxes and connections to draw.
	#[prop(into)]
	spec: Signal<DiagramSpec>,
	/// Sizes, zoom levels and timings.
	#[prop(optional)]
	config: DiagramConfig,
) -> impl IntoView {
	let zoom = RwSignal::new(ZoomState::new(current_scale(&config)));
	let tooltip = document_for_tooltip().and_then(|document| TooltipView::attach(&document, &config));
	if tooltip.is_none() {
		debug!("tooltip element unavailable, hover details disabled");
	}

	let runtime = Rc::new(RefCell::new(DiagramRuntime {
		tooltip,
		hover: TooltipMachine::default(),
		reveal_timer: Deferred::default(),
		fade_timer: Deferred::default(),
		resize: Debounce::new(config.resize_debounce()),
		resize_timer: Deferred::default(),
		resize_listener: None,
	}));
	let listener = listen_for_resize(Rc::downgrade(&runtime), zoom, &config);
	runtime.borrow_mut().resize_listener = listener;

	let (base_width, base_height) = (config.base_width, config.base_height);
	let markup = move || spec.with(|spec| render::svg_markup(&layout(spec), base_width, base_height));

	let buttons = config
		.zoom_levels
		.iter()
		.copied()
		.map(|level| {
			view! {
				<button
					type="button"
					class=move || zoom_button_class(zoom.get().is_active(level))
					data-scale=level.to_string()
					on:click=move |_| zoom.update(|z| z.select(level))
				>
					{format!("{}%", (level * 100.0).round())}
				</button>
			}
		})
		.collect_view();

	let (runtime_over, runtime_out) = (runtime.clone(), runtime);
	view! {
		<div class="architecture-diagram" style="margin: auto;">
			<div class="zoom-controls" role="group" aria-label="Diagram zoom">
				{buttons}
			</div>
			<div
				class="diagram-surface"
				style:width=move || format!("{}px", zoom.get().surface_size(base_width, base_height).0)
				style:height=move || format!("{}px", zoom.get().surface_size(base_width, base_height).1)
				inner_html=markup
				on:mouseover=move |ev: MouseEvent| on_component_over(&runtime_over, &ev)
				on:mouseout=move |ev: MouseEvent| on_component_out(&runtime_out, &ev)
			/>
		</div>
	}
}

fn document_for_tooltip() -> Option<Document> {
	web_sys::window()?.document()
}

/// Uses the page's table when it has a valid one.
fn resolve_spec(config: &DiagramConfig) -> DiagramSpec {
	match &config.table {
		Some(table) => match table.validate() {
			Ok(()) => table.clone(),
			Err(err) => {
				warn!("{err}; using the built-in diagram");
				default_spec()
			}
		},
		None => default_spec(),
	}
}

/// Mounts the diagram into its container. Returns the mount handle, or
/// `None` when the page has no container.
pub fn mount(document: &Document, config: &DiagramConfig) -> Option<Box<dyn std::any::Any>> {
	let Some(container) = dom::html_by_id(document, &config.container_id) else {
		debug!("no #{} on this page, diagram disabled", config.container_id);
		return None;
	};
	if let Err(err) = dom::ensure_style(document, TOOLTIP_STYLE_ID, TOOLTIP_CSS) {
		warn!("{err}");
	}
	for (property, value) in CONTAINER_STYLE {
		dom::set_style(&container, property, value);
	}

	let spec = resolve_spec(config);
	let config = config.clone();
	let handle = leptos::mount::mount_to(container, move || {
		view! { <ArchitectureDiagram spec=spec config=config /> }
	});
	Some(Box::new(handle))
}
