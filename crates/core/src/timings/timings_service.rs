use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info};

use crate::errors::{Result, ValidationError};

use super::timeline::Timeline;
use super::timings_model::TimingsDocument;
use super::timings_status::{ScheduleStatus, SlideTimingStatus};
use super::timings_traits::{TimingsRepositoryTrait, TimingsServiceTrait};

pub struct TimingsService {
    repository: Arc<dyn TimingsRepositoryTrait>,
}

impl TimingsService {
    pub fn new(repository: Arc<dyn TimingsRepositoryTrait>) -> Self {
        TimingsService { repository }
    }
}

#[async_trait]
impl TimingsServiceTrait for TimingsService {
    async fn get_document(&self) -> Result<TimingsDocument> {
        self.repository.load().await
    }

    async fn replace_document(&self, document: TimingsDocument) -> Result<()> {
        if let Some(id) = document.current_presentation_id.as_deref() {
            if !document.presentations.contains_key(id) {
                return Err(ValidationError::InvalidInput(format!(
                    "current_presentation_id '{id}' has no matching presentation"
                ))
                .into());
            }
        }
        self.repository.save(&document).await
    }

    async fn register_opened(
        &self,
        presentation_id: &str,
        slide_count: u32,
    ) -> Result<TimingsDocument> {
        let id = presentation_id.to_string();
        let document = self
            .repository
            .update(Box::new(move |doc: &mut TimingsDocument| -> Result<()> {
                doc.register(&id, slide_count);
                Ok(())
            }))
            .await?;
        info!("Presentation '{}' is now current", presentation_id);
        Ok(document)
    }

    async fn record_elapsed(&self, elapsed_seconds: u64) -> Result<()> {
        self.repository
            .update(Box::new(move |doc: &mut TimingsDocument| -> Result<()> {
                let current = doc
                    .current_mut()
                    .ok_or(ValidationError::NoCurrentPresentation)?;
                current.elapsed_seconds = Some(elapsed_seconds);
                Ok(())
            }))
            .await?;
        Ok(())
    }

    async fn update_estimate(&self, index: usize, seconds: u64) -> Result<TimingsDocument> {
        self.repository
            .update(Box::new(move |doc: &mut TimingsDocument| -> Result<()> {
                let current = doc
                    .current_mut()
                    .ok_or(ValidationError::NoCurrentPresentation)?;
                let mut timeline = Timeline::from_slides(std::mem::take(&mut current.slides));
                let outcome = timeline.set_estimate(index, seconds);
                current.slides = timeline.into_slides();
                outcome
            }))
            .await
    }

    async fn close_current(&self) -> Result<Option<PathBuf>> {
        let exported = self.repository.close_current().await?;
        if let Some(path) = &exported {
            debug!("Exported timings to {}", path.display());
        }
        Ok(exported)
    }

    async fn schedule_status(&self, slide_number: u32) -> Result<Option<ScheduleStatus>> {
        let document = self.repository.load().await?;
        let Some(current) = document.current() else {
            return Ok(None);
        };
        let timeline = Timeline::from_slides(current.slides.clone());
        let elapsed = current.elapsed_seconds.unwrap_or(0);
        Ok(timeline
            .index_of_slide(slide_number)
            .and_then(|index| ScheduleStatus::evaluate(&timeline, index, elapsed)))
    }

    async fn slide_status(&self, slide_number: u32) -> Result<Option<SlideTimingStatus>> {
        let document = self.repository.load().await?;
        let Some(current) = document.current() else {
            return Ok(None);
        };
        let timeline = Timeline::from_slides(current.slides.clone());
        Ok(timeline
            .index_of_slide(slide_number)
            .and_then(|index| timeline.get(index))
            .map(|entry| {
                SlideTimingStatus::evaluate(
                    Some(entry.timing.estimated_time_seconds),
                    entry.timing.actual_time_seconds.unwrap_or(0),
                )
            }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timings::{JsonTimingsRepository, Presentation, SlideRef};
    use tempfile::{tempdir, TempDir};

    fn service() -> (TempDir, TimingsService) {
        let dir = tempdir().unwrap();
        let repo = JsonTimingsRepository::new(
            dir.path().join("slide_timings.json"),
            dir.path().join("elapsed_times"),
        );
        (dir, TimingsService::new(Arc::new(repo)))
    }

    #[tokio::test]
    async fn register_then_close_exports_and_clears() {
        let (dir, service) = service();
        service.register_opened("talks/keynote.key", 4).await.unwrap();
        service.record_elapsed(95).await.unwrap();

        let exported = service.close_current().await.unwrap().unwrap();
        assert!(exported.starts_with(dir.path().join("elapsed_times")));
        assert!(exported
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("keynote_elapsed_"));

        let doc = service.get_document().await.unwrap();
        assert_eq!(doc.current_presentation_id, None);
        assert_eq!(doc.presentations["talks/keynote.key"].elapsed_seconds, Some(95));
    }

    #[tokio::test]
    async fn close_exports_the_state_it_leaves_behind() {
        let (_dir, service) = service();
        service.register_opened("deck.key", 3).await.unwrap();

        let (exported, _, _) = tokio::join!(
            service.close_current(),
            service.record_elapsed(10),
            service.record_elapsed(20),
        );
        let exported = exported.unwrap().unwrap();
        let written: Presentation =
            serde_json::from_slice(&std::fs::read(&exported).unwrap()).unwrap();

        let doc = service.get_document().await.unwrap();
        assert_eq!(doc.current_presentation_id, None);
        assert_eq!(written, doc.presentations["deck.key"]);
    }

    #[tokio::test]
    async fn close_without_current_presentation_exports_nothing() {
        let (_dir, service) = service();
        assert_eq!(service.close_current().await.unwrap(), None);
    }

    #[tokio::test]
    async fn update_estimate_requires_open_presentation() {
        let (_dir, service) = service();
        assert!(service.update_estimate(0, 30).await.is_err());

        service.register_opened("deck.key", 2).await.unwrap();
        let doc = service.update_estimate(1, 30).await.unwrap();
        assert_eq!(doc.current().unwrap().slides[1].estimated_time_seconds, 30);
        assert!(service.update_estimate(5, 30).await.is_err());
    }

    #[tokio::test]
    async fn replace_rejects_dangling_current_id() {
        let (_dir, service) = service();
        let doc = TimingsDocument {
            current_presentation_id: Some("missing.key".into()),
            ..Default::default()
        };
        assert!(service.replace_document(doc).await.is_err());
    }

    #[tokio::test]
    async fn schedule_status_maps_presenter_slide_through_breaks() {
        let (_dir, service) = service();
        let mut doc = service.register_opened("deck.key", 3).await.unwrap();
        let current = doc.current_mut().unwrap();
        current.slides.insert(1, crate::timings::SlideTiming::break_of(600));
        current.elapsed_seconds = Some(700);
        service.replace_document(doc).await.unwrap();

        let status = service.schedule_status(2).await.unwrap().unwrap();
        assert_eq!(status.current_index, 2);
        assert_eq!(status.expected_time_to_current_slide, 660);
        assert_eq!(status.variance, -40);

        let doc = service.get_document().await.unwrap();
        assert_eq!(doc.current().unwrap().slides[1].slide, SlideRef::Break);
    }

    #[tokio::test]
    async fn slide_status_compares_recorded_time() {
        let (_dir, service) = service();
        let mut doc = service.register_opened("deck.key", 2).await.unwrap();
        doc.current_mut().unwrap().slides[1].actual_time_seconds = Some(57);
        service.replace_document(doc).await.unwrap();

        let first = service.slide_status(1).await.unwrap().unwrap();
        assert_eq!(first.actual_time, 0);
        assert_eq!(first.status, crate::timings::SlideTimingState::OnTime);

        let second = service.slide_status(2).await.unwrap().unwrap();
        assert_eq!(second.status, crate::timings::SlideTimingState::Warning);
        assert_eq!(second.variance, Some(-3));
        assert!(service.slide_status(3).await.unwrap().is_none());
    }
}
