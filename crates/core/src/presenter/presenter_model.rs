use serde::{Deserialize, Serialize};

/// Snapshot of the presentation application.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PresenterStatus {
    pub document_open: bool,
    pub is_playing: bool,
    pub slide_number: Option<u32>,
    pub document_name: Option<String>,
}

impl PresenterStatus {
    /// No document open.
    pub fn closed() -> Self {
        Self::default()
    }

    pub fn open(document_name: impl Into<String>, slide_number: u32, is_playing: bool) -> Self {
        Self {
            document_open: true,
            is_playing,
            slide_number: Some(slide_number),
            document_name: Some(document_name.into()),
        }
    }
}

/// Wire names of events pushed to connected remotes.
pub const SLIDE_UPDATE: &str = "slide_update";
pub const PRESENTATION_STARTED: &str = "presentation_started";
pub const PRESENTATION_STOPPED: &str = "presentation_stopped";
pub const PRESENTATION_CLOSED: &str = "presentation_closed";

/// A change in the presentation application worth telling the remotes about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenterEvent {
    SlideUpdate { slide_number: u32 },
    PresentationStarted,
    PresentationStopped,
    PresentationClosed,
}

impl PresenterEvent {
    pub fn name(&self) -> &'static str {
        match self {
            PresenterEvent::SlideUpdate { .. } => SLIDE_UPDATE,
            PresenterEvent::PresentationStarted => PRESENTATION_STARTED,
            PresenterEvent::PresentationStopped => PRESENTATION_STOPPED,
            PresenterEvent::PresentationClosed => PRESENTATION_CLOSED,
        }
    }

    /// JSON payload carried with the event, if any.
    pub fn payload(&self) -> Option<serde_json::Value> {
        match self {
            PresenterEvent::SlideUpdate { slide_number } => {
                Some(serde_json::json!({ "slide_number": slide_number }))
            }
            _ => None,
        }
    }

    /// Rebuilds an event from its wire name and payload.
    pub fn from_wire(name: &str, payload: Option<&serde_json::Value>) -> Option<Self> {
        match name {
            SLIDE_UPDATE => {
                let slide_number = payload?.get("slide_number")?.as_u64()?;
                Some(PresenterEvent::SlideUpdate {
                    slide_number: u32::try_from(slide_number).ok()?,
                })
            }
            PRESENTATION_STARTED => Some(PresenterEvent::PresentationStarted),
            PRESENTATION_STOPPED => Some(PresenterEvent::PresentationStopped),
            PRESENTATION_CLOSED => Some(PresenterEvent::PresentationClosed),
            _ => None,
        }
    }
}
