//! Timings module - slide timeline, document models, storage and services.

mod timeline;
mod timings_model;
mod timings_repository;
mod timings_service;
mod timings_status;
mod timings_traits;

pub use timeline::{Timeline, TimelineEntry};
pub use timings_model::{Presentation, SlideRef, SlideTiming, TimingsDocument};
pub use timings_repository::JsonTimingsRepository;
pub use timings_service::TimingsService;
pub use timings_status::{ScheduleState, ScheduleStatus, SlideTimingState, SlideTimingStatus};
pub use timings_traits::{TimingsRepositoryTrait, TimingsServiceTrait};
