/// Wire marker for a break entry in the timeline.
pub const BREAK_MARKER: &str = "BREAK";

/// Planned seconds assigned to each slide of a newly registered presentation.
pub const DEFAULT_SLIDE_SECONDS: u64 = 60;

/// Planned seconds of a break inserted from the remote.
pub const DEFAULT_BREAK_SECONDS: u64 = 15 * 60;

/// File extension of presentations listed by the library browser.
pub const PRESENTATION_EXTENSION: &str = "key";

/// Share of the planned time under which a slide still counts as on time.
pub const SLIDE_WARNING_RATIO: f64 = 0.9;

/// Seconds behind schedule tolerated before the talk is "losing progress".
pub const SCHEDULE_ON_TIME_SLACK_SECS: i64 = 60;

/// Seconds behind schedule tolerated before the talk is "off track".
pub const SCHEDULE_LOSING_SLACK_SECS: i64 = 120;

/// Timestamp layout of elapsed-time export files.
pub const EXPORT_TIMESTAMP_FORMAT: &str = "%Y%m%d-%H%M%S";
