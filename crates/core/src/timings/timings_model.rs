//! Timings domain models.
//!
//! These mirror the `slide_timings.json` document shared by the server and
//! every connected remote.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::constants::{BREAK_MARKER, DEFAULT_SLIDE_SECONDS};

/// What a timeline entry points at: a presentation slide or a break.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideRef {
    Slide(u32),
    Break,
}

impl SlideRef {
    pub fn is_break(&self) -> bool {
        matches!(self, SlideRef::Break)
    }
}

impl fmt::Display for SlideRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlideRef::Slide(n) => write!(f, "{n}"),
            SlideRef::Break => f.write_str(BREAK_MARKER),
        }
    }
}

impl Serialize for SlideRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SlideRef::Slide(n) => serializer.serialize_u32(*n),
            SlideRef::Break => serializer.serialize_str(BREAK_MARKER),
        }
    }
}

impl<'de> Deserialize<'de> for SlideRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(u32),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Ok(SlideRef::Slide(n)),
            Raw::Text(text) if text == BREAK_MARKER => Ok(SlideRef::Break),
            Raw::Text(text) => text.parse::<u32>().map(SlideRef::Slide).map_err(|_| {
                serde::de::Error::custom(format!(
                    "expected a slide number or \"{BREAK_MARKER}\", got \"{text}\""
                ))
            }),
        }
    }
}

/// Planned vs. recorded time for one timeline entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideTiming {
    pub slide: SlideRef,
    #[serde(default)]
    pub estimated_time_seconds: u64,
    #[serde(default)]
    pub actual_time_seconds: Option<u64>,
}

impl SlideTiming {
    pub fn slide(number: u32, estimated_time_seconds: u64) -> Self {
        Self {
            slide: SlideRef::Slide(number),
            estimated_time_seconds,
            actual_time_seconds: None,
        }
    }

    pub fn break_of(estimated_time_seconds: u64) -> Self {
        Self {
            slide: SlideRef::Break,
            estimated_time_seconds,
            actual_time_seconds: None,
        }
    }
}

/// One presentation's timeline as stored in the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Presentation {
    pub name: String,
    #[serde(default)]
    pub slides: Vec<SlideTiming>,
    /// Last presentation-elapsed value reported by a remote.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elapsed_seconds: Option<u64>,
}

impl Presentation {
    /// A fresh presentation with `slide_count` slides of the default length.
    pub fn with_default_slides(name: impl Into<String>, slide_count: u32) -> Self {
        Self {
            name: name.into(),
            slides: (1..=slide_count)
                .map(|n| SlideTiming::slide(n, DEFAULT_SLIDE_SECONDS))
                .collect(),
            elapsed_seconds: None,
        }
    }
}

/// The whole `slide_timings.json` document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingsDocument {
    #[serde(default)]
    pub current_presentation_id: Option<String>,
    #[serde(default)]
    pub presentations: BTreeMap<String, Presentation>,
}

impl TimingsDocument {
    pub fn current(&self) -> Option<&Presentation> {
        self.current_presentation_id
            .as_ref()
            .and_then(|id| self.presentations.get(id))
    }

    pub fn current_mut(&mut self) -> Option<&mut Presentation> {
        match self.current_presentation_id.as_ref() {
            Some(id) => self.presentations.get_mut(id),
            None => None,
        }
    }

    /// Makes `id` the current presentation, adding it with default timings
    /// when the document has never seen it. Existing timings are kept.
    pub fn register(&mut self, id: &str, slide_count: u32) -> &mut Presentation {
        let name = Path::new(id)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| id.to_string());
        self.current_presentation_id = Some(id.to_string());
        self.presentations
            .entry(id.to_string())
            .or_insert_with(|| Presentation::with_default_slides(name, slide_count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn slide_refs_use_numbers_and_break_marker() {
        let slides = vec![SlideTiming::slide(1, 60), SlideTiming::break_of(900)];
        let value = serde_json::to_value(&slides).unwrap();
        assert_eq!(
            value,
            json!([
                {"slide": 1, "estimated_time_seconds": 60, "actual_time_seconds": null},
                {"slide": "BREAK", "estimated_time_seconds": 900, "actual_time_seconds": null}
            ])
        );
    }

    #[test]
    fn rejects_unknown_slide_marker() {
        let err = serde_json::from_value::<SlideTiming>(json!({"slide": "PAUSE"})).unwrap_err();
        assert!(err.to_string().contains("BREAK"));
    }

    #[test]
    fn reads_document_written_by_older_remotes() {
        let doc: TimingsDocument = serde_json::from_value(json!({
            "current_presentation_id": "talks/deck.key",
            "presentations": {
                "talks/deck.key": {
                    "name": "deck.key",
                    "slides": [
                        {"slide": 1, "estimated_time_seconds": 30, "actual_time_seconds": 41},
                        {"slide": "2", "estimated_time_seconds": 45}
                    ]
                }
            }
        }))
        .unwrap();

        let current = doc.current().unwrap();
        assert_eq!(current.slides[0].actual_time_seconds, Some(41));
        assert_eq!(current.slides[1].slide, SlideRef::Slide(2));
        assert_eq!(current.slides[1].actual_time_seconds, None);
    }

    #[test]
    fn register_keeps_existing_timings() {
        let mut doc = TimingsDocument::default();
        doc.register("talks/deck.key", 3).slides[0].estimated_time_seconds = 5;
        doc.current_presentation_id = None;

        let again = doc.register("talks/deck.key", 10);
        assert_eq!(again.name, "deck.key");
        assert_eq!(again.slides.len(), 3);
        assert_eq!(again.slides[0].estimated_time_seconds, 5);
        assert_eq!(doc.current_presentation_id.as_deref(), Some("talks/deck.key"));
    }
}
