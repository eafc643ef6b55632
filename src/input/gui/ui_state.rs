use crate::controllers::render::RenderSummary;
use crate::core::actions::encode_request::RequestDescriptor;
use crate::core::data::render_request::RenderMode;

/// The values the control panel edits.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelSelection {
    pub equation: String,
    pub colour_scheme: String,
    pub iterations: u32,
    pub mode: RenderMode,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PanelChange {
    Equation(String),
    ColourScheme(String),
    Iterations(u32),
    Mode(RenderMode),
}

impl PanelSelection {
    /// Edits that turn `applied` into `self`, equation first: selecting an
    /// equation resets the view, iterations included.
    #[must_use]
    pub fn changes_from(&self, applied: &PanelSelection) -> Vec<PanelChange> {
        let mut changes = Vec::new();

        if self.equation != applied.equation {
            changes.push(PanelChange::Equation(self.equation.clone()));
        }
        if self.colour_scheme != applied.colour_scheme {
            changes.push(PanelChange::ColourScheme(self.colour_scheme.clone()));
        }
        if self.iterations != applied.iterations {
            changes.push(PanelChange::Iterations(self.iterations));
        }
        if self.mode != applied.mode {
            changes.push(PanelChange::Mode(self.mode));
        }

        changes
    }
}

#[derive(Debug, Default)]
pub struct UiState {
    pub panel: Option<PanelSelection>,
    pub render_requested: bool,
    pub reset_requested: bool,
    pub zoom_out_requested: bool,
    last_submitted: Option<RequestDescriptor>,
    pub latest_session_id: Option<u64>,
    pub frames_received: u64,
    pub last_summary: Option<RenderSummary>,
    pub last_error: Option<String>,
}

impl UiState {
    /// A descriptor is only streamed again when the render button asks for it.
    #[must_use]
    pub fn should_submit(&self, descriptor: &RequestDescriptor) -> bool {
        self.render_requested || self.last_submitted.as_ref() != Some(descriptor)
    }

    pub fn record_submission(&mut self, descriptor: RequestDescriptor, session_id: u64) {
        self.last_submitted = Some(descriptor);
        self.latest_session_id = Some(session_id);
        self.render_requested = false;
        self.frames_received = 0;
        self.last_summary = None;
        self.last_error = None;
    }

    pub fn record_summary(&mut self, summary: RenderSummary) {
        self.last_summary = Some(summary);
    }

    pub fn record_error(&mut self, message: String) {
        self.render_requested = false;
        self.last_error = Some(message);
    }
}
