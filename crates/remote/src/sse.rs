//! Incremental decoder for a `text/event-stream` body.

use keymote_core::presenter::PresenterEvent;
use log::debug;

/// One dispatched server-sent event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SseFrame {
    pub event: String,
    pub data: String,
}

impl SseFrame {
    /// Maps the frame onto a presenter event; unknown names yield `None`.
    pub fn into_presenter_event(self) -> Option<PresenterEvent> {
        let payload = serde_json::from_str::<serde_json::Value>(&self.data).ok();
        let event = PresenterEvent::from_wire(&self.event, payload.as_ref());
        if event.is_none() {
            debug!("[RemoteApi] Ignoring event '{}'", self.event);
        }
        event
    }
}

/// Buffers raw chunks and yields complete frames.
///
/// Bytes are kept undecoded until a frame is complete, so a character split
/// across chunks survives.
#[derive(Debug, Default)]
pub(crate) struct SseDecoder {
    buffer: Vec<u8>,
}

impl SseDecoder {
    pub fn push(&mut self, chunk: &[u8]) -> Vec<SseFrame> {
        self.buffer.extend(chunk.iter().copied().filter(|&b| b != b'\r'));

        let mut frames = Vec::new();
        while let Some(end) = self.buffer.windows(2).position(|w| w == b"\n\n") {
            let block: Vec<u8> = self.buffer.drain(..end + 2).collect();
            if let Some(frame) = parse_block(&String::from_utf8_lossy(&block)) {
                frames.push(frame);
            }
        }
        frames
    }
}

fn parse_block(block: &str) -> Option<SseFrame> {
    let mut event = None;
    let mut data: Vec<&str> = Vec::new();
    for line in block.lines() {
        // Comments carry the keep-alive pings.
        if line.is_empty() || line.starts_with(':') {
            continue;
        }
        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };
        match field {
            "event" => event = Some(value.to_string()),
            "data" => data.push(value),
            _ => {}
        }
    }
    if event.is_none() && data.is_empty() {
        return None;
    }
    Some(SseFrame {
        event: event.unwrap_or_else(|| "message".to_string()),
        data: data.join("\n"),
    })
}
