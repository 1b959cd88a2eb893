use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use gloo::events::EventListener;
use log::{error, warn};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Document, Element};

use crate::dom;
use crate::error::{Result, SiteError, describe};
use crate::schedule::{Deferred, Generation, Ticket};

/// Resting label of a copy button.
pub const COPY_LABEL: &str = "Copy";
/// Label after a successful copy.
pub const COPIED_LABEL: &str = "Copied!";
/// Label after a rejected copy.
pub const FAILED_LABEL: &str = "Failed";

const BUTTON_CLASS: &str = "copy-button";
const STYLE_ID: &str = "command-box-styles";
const COMMAND_BOX_CSS: &str = r#"
.command-box {
	position: relative;
	display: block;
	font-family: SFMono-Regular, Menlo, Consolas, monospace;
	background-color: #2f3136;
	color: #dcddde;
	border-radius: 4px;
	padding: 8px 72px 8px 12px;
	margin: 8px 0;
	white-space: pre-wrap;
}
.command-box .copy-button,
pre .copy-button {
	position: absolute;
	top: 6px;
	right: 6px;
	font-size: 12px;
	padding: 2px 8px;
	border: none;
	border-radius: 3px;
	background-color: #5865F2;
	color: #ffffff;
	cursor: pointer;
}
pre { position: relative; }
"#;

/// Result of one clipboard write.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CopyOutcome {
	/// The clipboard accepted the text.
	Copied,
	/// The clipboard is unavailable or refused.
	Failed,
}

impl CopyOutcome {
	/// Label the button shows for this outcome.
	pub fn label(self) -> &'static str {
		match self {
			CopyOutcome::Copied => COPIED_LABEL,
			CopyOutcome::Failed => FAILED_LABEL,
		}
	}
}

/// Label lifecycle of one copy button. Each outcome shows for a while, then
/// the button reverts; a newer outcome supersedes an older pending revert.
#[derive(Clone, Debug, Default)]
pub struct CopyFeedback {
	generation: Generation,
}

impl CopyFeedback {
	/// Label to show now, and the ticket for reverting it.
	pub fn record(&mut self, outcome: CopyOutcome) -> (&'static str, Ticket) {
		(outcome.label(), self.generation.advance())
	}

	/// Label to restore when the feedback period of `ticket` ends, or `None`
	/// if a newer outcome is showing.
	pub fn revert(&self, ticket: Ticket) -> Option<&'static str> {
		self.generation.is_current(ticket).then_some(COPY_LABEL)
	}
}

/// Writes `text` with `navigator.clipboard.writeText`.
async fn write_text(text: &str) -> Result<()> {
	let window = web_sys::window().ok_or_else(|| SiteError::Clipboard("no window".into()))?;
	let clipboard = window.navigator().clipboard();
	// Insecure contexts have no clipboard object at all.
	if clipboard.is_undefined() {
		return Err(SiteError::Clipboard("clipboard API unavailable".into()));
	}
	JsFuture::from(clipboard.write_text(text))
		.await
		.map(|_| ())
		.map_err(|err| SiteError::Clipboard(describe(&err)))
}

/// A copy button and its feedback state.
struct CopyButton {
	element: Element,
	feedback: CopyFeedback,
	revert: Deferred,
	hold: Duration,
}

impl CopyButton {
	fn show(button: &Rc<RefCell<Self>>, outcome: CopyOutcome) {
		let mut this = button.borrow_mut();
		let (label, ticket) = this.feedback.record(outcome);
		this.element.set_text_content(Some(label));

		let weak = Rc::downgrade(button);
		let hold = this.hold;
		this.revert.schedule(hold, move || {
			let Some(button) = weak.upgrade() else {
				return;
			};
			let this = button.borrow();
			if let Some(label) = this.feedback.revert(ticket) {
				this.element.set_text_content(Some(label));
			}
		});
	}
}

fn create_button(document: &Document, aria_label: &str) -> Result<Element> {
	let button = document.create_element("button").map_err(SiteError::js)?;
	button.set_class_name(BUTTON_CLASS);
	button.set_text_content(Some(COPY_LABEL));
	button.set_attribute("type", "button").map_err(SiteError::js)?;
	button
		.set_attribute("aria-label", aria_label)
		.map_err(SiteError::js)?;
	Ok(button)
}

/// Copies `text` on every click of `element`.
fn wire(element: Element, text: String, hold: Duration) -> EventListener {
	let button = Rc::new(RefCell::new(CopyButton {
		element: element.clone(),
		feedback: CopyFeedback::default(),
		revert: Deferred::default(),
		hold,
	}));
	EventListener::new(&element, "click", move |_| {
		let (button, text) = (button.clone(), text.clone());
		wasm_bindgen_futures::spawn_local(async move {
			let outcome = match write_text(&text).await {
				Ok(()) => CopyOutcome::Copied,
				Err(err) => {
					error!("Failed to copy: {err}");
					CopyOutcome::Failed
				}
			};
			CopyButton::show(&button, outcome);
		});
	})
}

fn add_code_button(document: &Document, code: &Element, hold: Duration) -> Result<Option<EventListener>> {
	let Some(pre) = code.parent_element() else {
		return Ok(None);
	};
	if pre.query_selector(&format!(".{BUTTON_CLASS}")).map_err(SiteError::js)?.is_some() {
		return Ok(None);
	}
	let button = create_button(document, "Copy code to clipboard")?;
	pre.append_child(&button).map_err(SiteError::js)?;
	let text = code.text_content().unwrap_or_default();
	Ok(Some(wire(button, text, hold)))
}

fn add_command_box(document: &Document, code: &Element, hold: Duration) -> Result<Option<EventListener>> {
	let Some(parent) = code.parent_node() else {
		return Ok(None);
	};
	let command = code.text_content().unwrap_or_default().trim().to_string();
	let command_box = document.create_element("div").map_err(SiteError::js)?;
	command_box.set_class_name("command-box");
	command_box.set_text_content(Some(&command));

	let button = create_button(document, "Copy command to clipboard")?;
	command_box.append_child(&button).map_err(SiteError::js)?;
	parent
		.replace_child(&command_box, code)
		.map_err(SiteError::js)?;
	Ok(Some(wire(button, command, hold)))
}

/// Adds copy buttons to `pre code` blocks and turns `code.command` into
/// command boxes.
pub(super) fn install(document: &Document, hold: Duration) -> Vec<EventListener> {
	let code_blocks = dom::query_all(document, "pre code");
	let commands = dom::query_all(document, "code.command");
	if code_blocks.is_empty() && commands.is_empty() {
		return Vec::new();
	}
	if let Err(err) = dom::ensure_style(document, STYLE_ID, COMMAND_BOX_CSS) {
		warn!("{err}");
	}

	let blocks = code_blocks
		.iter()
		.map(|code| add_code_button(document, code, hold));
	let boxes = commands
		.iter()
		.map(|code| add_command_box(document, code, hold));
	blocks
		.chain(boxes)
		.filter_map(|added| match added {
			Ok(listener) => listener,
			Err(err) => {
				warn!("copy button not added: {err}");
				None
			}
		})
		.collect()
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn outcomes_have_their_labels() {
		let mut feedback = CopyFeedback::default();
		assert_eq!(feedback.record(CopyOutcome::Copied).0, "Copied!");
		assert_eq!(feedback.record(CopyOutcome::Failed).0, "Failed");
	}

	#[test]
	fn feedback_reverts_to_copy() {
		let mut feedback = CopyFeedback::default();
		let (_, ticket) = feedback.record(CopyOutcome::Copied);
		assert_eq!(feedback.revert(ticket), Some(COPY_LABEL));
	}

	#[test]
	fn a_newer_outcome_keeps_its_label_when_the_older_revert_fires() {
		let mut feedback = CopyFeedback::default();
		let (_, first) = feedback.record(CopyOutcome::Failed);
		let (_, second) = feedback.record(CopyOutcome::Copied);
		assert_eq!(feedback.revert(first), None);
		assert_eq!(feedback.revert(second), Some("Copy"));
	}
}
