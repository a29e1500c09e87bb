use esp32_panel_core::{ConnectionState, Model};

pub const CONNECTING_BANNER: &str = "Trying to connect to the ESP32...";

/// Format the view model as the text panel
pub fn render_view(model: &Model) -> String {
    let banner = match model.connection_state() {
        ConnectionState::Connected => format!("Connected to {}", model.device_address),
        ConnectionState::Connecting | ConnectionState::Disconnected => {
            format!("{CONNECTING_BANNER} ({})", model.device_address)
        }
    };

    let error = model
        .error_message
        .as_ref()
        .map(|error| format!("error: {error}\n"))
        .unwrap_or_default();

    let outputs = model
        .status
        .outputs()
        .iter()
        .enumerate()
        .map(|(i, state)| format!("LED{}={state}", i + 1))
        .collect::<Vec<_>>()
        .join(" ");

    let loading = if model.is_loading { " [loading]" } else { "" };

    format!(
        "{banner}\n{error}{outputs}\nservo={}{loading}",
        model.status.servo
    )
}

/// Prints the panel whenever its text changes
#[derive(Default)]
pub struct Renderer {
    last: Option<String>,
}

impl Renderer {
    /// Returns the new panel text, or `None` if nothing visible changed
    pub fn render(&mut self, model: &Model) -> Option<&str> {
        let text = render_view(model);
        if self.last.as_deref() == Some(text.as_str()) {
            return None;
        }
        self.last = Some(text);
        self.last.as_deref()
    }
}
