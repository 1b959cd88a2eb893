//! Built-in component table for the exporter's architecture page.

use super::types::{ComponentBox, Connection, DiagramSpec, Side, StyleCategory};

const BOX_WIDTH: f64 = 200.0;
const BOX_HEIGHT: f64 = 70.0;

fn component(id: &str, x: f64, y: f64, color: &str, name: &str, description: &str) -> ComponentBox {
	ComponentBox {
		id: id.into(),
		x,
		y,
		width: BOX_WIDTH,
		height: BOX_HEIGHT,
		color: color.into(),
		name: name.into(),
		description: description.into(),
	}
}

/// The diagram shown when a page does not supply its own table.
pub fn default_spec() -> DiagramSpec {
	use StyleCategory::*;

	let components = vec![
		component(
			"discord",
			400.0,
			40.0,
			"#5865F2",
			"Discord API",
			"REST endpoint serving channel message history, paginated 100 messages at a time.",
		),
		component(
			"exceptions",
			60.0,
			220.0,
			"#ED4245",
			"Exceptions",
			"Typed errors for authentication, permission, rate limit and not-found responses.",
		),
		component(
			"api_client",
			400.0,
			220.0,
			"#7289DA",
			"API Client",
			"Authenticated HTTP client with rate limit handling and exponential backoff.",
		),
		component(
			"processor",
			740.0,
			220.0,
			"#3BA55D",
			"Message Processor",
			"Filters messages by date or author and formats them as text, JSON, CSV or Markdown.",
		),
		component(
			"config",
			60.0,
			400.0,
			"#99AAB5",
			"Config",
			"Loads the token and defaults from the environment, a .env file or the keyring.",
		),
		component(
			"file_handler",
			740.0,
			400.0,
			"#FAA61A",
			"File Handler",
			"Chooses the output path and extension and writes the formatted export.",
		),
		component(
			"logging",
			60.0,
			580.0,
			"#4F545C",
			"Logging",
			"Coloured console output and rotating log files.",
		),
		component(
			"cli",
			400.0,
			580.0,
			"#2C2F33",
			"CLI",
			"Command line entry point: parses options, runs the export and reports progress.",
		),
		component(
			"output",
			740.0,
			580.0,
			"#747F8D",
			"Output File",
			"The exported conversation on disk.",
		),
	];

	let connections = vec![
		Connection::new("cli", "api_client", "fetch messages", Main),
		Connection::new("api_client", "discord", "GET /channels/{id}/messages", Main),
		Connection::new("cli", "config", "load settings", Config),
		Connection::new("config", "api_client", "token", Config),
		Connection::new("discord", "processor", "message JSON", Data).routed(Side::Bottom, Side::Top),
		Connection::new("processor", "file_handler", "formatted export", Data)
			.routed(Side::Bottom, Side::Top),
		Connection::new("file_handler", "output", "write", Data).routed(Side::Bottom, Side::Top),
		Connection::new("api_client", "exceptions", "HTTP errors", Error),
		Connection::new("cli", "logging", "log records", Data).routed(Side::Top, Side::Top),
	];

	DiagramSpec {
		components,
		connections,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn default_table_is_valid() {
		default_spec().validate().unwrap();
	}

	#[test]
	fn default_connections_reference_known_components() {
		let spec = default_spec();
		for connection in &spec.connections {
			assert!(spec.component(&connection.from).is_some(), "{}", connection.from);
			assert!(spec.component(&connection.to).is_some(), "{}", connection.to);
		}
	}

	#[test]
	fn default_boxes_fit_the_base_surface() {
		for component in default_spec().components {
			assert!(component.x + component.width <= 1000.0, "{}", component.id);
			assert!(component.y + component.height <= 700.0, "{}", component.id);
		}
	}
}
