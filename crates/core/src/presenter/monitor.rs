use super::presenter_model::{PresenterEvent, PresenterStatus};

/// Turns successive [`PresenterStatus`] polls into at most one event each.
///
/// The first observation only records the state. After that, a change is
/// reported with this precedence: document closed, slideshow stopped,
/// slideshow started, slide changed.
#[derive(Debug, Default)]
pub struct Monitor {
    last: Option<PresenterStatus>,
}

impl Monitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, status: PresenterStatus) -> Option<PresenterEvent> {
        let previous = self.last.replace(status.clone());
        let previous = previous?;

        if previous.document_open && !status.document_open {
            return Some(PresenterEvent::PresentationClosed);
        }
        // Play-state changes count only while the same document stays open.
        let stayed_open = previous.document_open && status.document_open;
        if stayed_open && previous.is_playing && !status.is_playing {
            return Some(PresenterEvent::PresentationStopped);
        }
        if stayed_open && !previous.is_playing && status.is_playing {
            return Some(PresenterEvent::PresentationStarted);
        }
        match status.slide_number {
            Some(slide_number) if status.slide_number != previous.slide_number => {
                Some(PresenterEvent::SlideUpdate { slide_number })
            }
            _ => None,
        }
    }
}
