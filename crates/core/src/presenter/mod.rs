//! Presentation application control and change detection.

mod keynote;
mod monitor;
mod presenter_model;
mod presenter_traits;

pub use keynote::{parse_status, KeynotePresenter};
pub use monitor::Monitor;
pub use presenter_model::*;
pub use presenter_traits::PresenterTrait;
