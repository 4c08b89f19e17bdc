use std::path::PathBuf;

use async_trait::async_trait;

use crate::errors::Result;
use crate::timings::timings_model::TimingsDocument;
use crate::timings::timings_status::{ScheduleStatus, SlideTimingStatus};

/// Trait for timings document storage
#[async_trait]
pub trait TimingsRepositoryTrait: Send + Sync {
    async fn load(&self) -> Result<TimingsDocument>;
    async fn save(&self, document: &TimingsDocument) -> Result<()>;
    /// Applies `op` to the stored document and persists the result as one
    /// step; concurrent updates are serialized.
    async fn update(
        &self,
        op: Box<dyn for<'a> FnOnce(&'a mut TimingsDocument) -> Result<()> + Send>,
    ) -> Result<TimingsDocument>;
    /// Writes a standalone copy of the current presentation's timings and
    /// clears the current id, both under the update lock. Returns the export
    /// path, or `None` when nothing was current.
    async fn close_current(&self) -> Result<Option<PathBuf>>;
}

/// Trait for timings service operations
#[async_trait]
pub trait TimingsServiceTrait: Send + Sync {
    async fn get_document(&self) -> Result<TimingsDocument>;
    async fn replace_document(&self, document: TimingsDocument) -> Result<()>;
    async fn register_opened(&self, presentation_id: &str, slide_count: u32)
        -> Result<TimingsDocument>;
    async fn record_elapsed(&self, elapsed_seconds: u64) -> Result<()>;
    async fn update_estimate(&self, index: usize, seconds: u64) -> Result<TimingsDocument>;
    async fn close_current(&self) -> Result<Option<PathBuf>>;
    async fn schedule_status(&self, slide_number: u32) -> Result<Option<ScheduleStatus>>;
    /// Planned vs. recorded time of one slide of the current presentation.
    async fn slide_status(&self, slide_number: u32) -> Result<Option<SlideTimingStatus>>;
}
