use std::path::Path;

use async_trait::async_trait;

use crate::errors::Result;
use crate::presenter::presenter_model::PresenterStatus;

/// Drives the application that actually shows the slides.
///
/// Slide numbers are the application's own 1-based numbering; breaks never
/// reach this layer.
#[async_trait]
pub trait PresenterTrait: Send + Sync {
    async fn status(&self) -> Result<PresenterStatus>;
    async fn open(&self, path: &Path) -> Result<()>;
    async fn slide_count(&self) -> Result<u32>;
    /// `None` when no document is open.
    async fn current_slide(&self) -> Result<Option<u32>>;
    async fn start(&self) -> Result<()>;
    /// Stopping when no slideshow runs is not an error.
    async fn stop(&self) -> Result<()>;
    /// Closing when no document is open is not an error.
    async fn close(&self) -> Result<()>;
    async fn next_slide(&self) -> Result<u32>;
    async fn previous_slide(&self) -> Result<u32>;
    async fn goto_slide(&self, slide_number: u32) -> Result<u32>;
}
