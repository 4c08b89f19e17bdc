//! Remote-side view state: selection, presentation clock and slide timers.

mod session_model;

pub use session_model::{Direction, NavigationTarget, Session};
