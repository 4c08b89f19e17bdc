use keymote_core::presenter::PresenterEvent;
use serde_json::Value;
use tokio::sync::broadcast;

/// Serializable envelope that carries event names and optional payloads.
#[derive(Clone, Debug)]
pub struct ServerEvent {
    pub name: &'static str,
    pub payload: Option<Value>,
}

impl From<PresenterEvent> for ServerEvent {
    fn from(event: PresenterEvent) -> Self {
        Self {
            name: event.name(),
            payload: event.payload(),
        }
    }
}

/// Lightweight broadcast bus that fans out events to any connected remotes.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<ServerEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _receiver) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ServerEvent> {
        self.sender.subscribe()
    }

    pub fn publish(&self, event: impl Into<ServerEvent>) {
        // Nobody listening is fine.
        let _ = self.sender.send(event.into());
    }
}
