use log::debug;

use crate::errors::{Result, ValidationError};
use crate::presenter::PresenterEvent;
use crate::timings::{Timeline, TimingsDocument};
use crate::utils::time_format::{format_tracking, join_hms, parse_time_input};

const INITIAL_TRACKING: &str = "0:00";
const CLOSED_TRACKING: &str = "-";

/// Which way the remote's arrow buttons move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Previous,
}

/// Where a navigation request should go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationTarget {
    /// A break: selected locally, the presentation application is not asked.
    Local(usize),
    /// A real slide, by the presentation application's own numbering.
    Presenter(u32),
}

/// View state of one remote: the working timeline plus its two timers.
///
/// Everything here is synchronous and clock-free; a driver calls [`Session::tick`]
/// once per second.
#[derive(Debug, Clone)]
pub struct Session {
    document: TimingsDocument,
    timeline: Timeline,
    selected: Option<usize>,
    elapsed_seconds: u64,
    slide_elapsed_seconds: u64,
    last_timed_index: Option<usize>,
    slide_timer_running: bool,
    running: bool,
    play_mode: bool,
    last_tracking: String,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            document: TimingsDocument::default(),
            timeline: Timeline::default(),
            selected: None,
            elapsed_seconds: 0,
            slide_elapsed_seconds: 0,
            last_timed_index: None,
            slide_timer_running: false,
            running: false,
            play_mode: false,
            last_tracking: INITIAL_TRACKING.to_string(),
        }
    }
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the working copy with `document`'s current presentation.
    ///
    /// The presentation clock resumes from the stored elapsed time; slide
    /// timers start over.
    pub fn load(&mut self, document: TimingsDocument) {
        let (slides, elapsed) = document
            .current()
            .map(|p| (p.slides.clone(), p.elapsed_seconds.unwrap_or(0)))
            .unwrap_or_default();
        self.timeline = Timeline::from_slides(slides);
        self.document = document;
        self.elapsed_seconds = elapsed;
        self.slide_elapsed_seconds = 0;
        self.last_timed_index = None;
        self.slide_timer_running = false;
        self.selected = (!self.timeline.is_empty()).then_some(0);
        debug!(
            "Loaded {} timeline entries for {:?}",
            self.timeline.len(),
            self.document.current_presentation_id
        );
    }

    pub fn has_presentation(&self) -> bool {
        self.document.current().is_some()
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed_seconds
    }

    pub fn slide_elapsed_seconds(&self) -> u64 {
        self.slide_elapsed_seconds
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_play_mode(&self) -> bool {
        self.play_mode
    }

    /// Selects entry `index`, clamped to the timeline.
    pub fn select_index(&mut self, index: usize) -> Option<usize> {
        if self.timeline.is_empty() {
            return None;
        }
        let index = index.min(self.timeline.len() - 1);
        self.selected = Some(index);
        self.refresh_tracking();
        Some(index)
    }

    /// Selects the entry the presentation application calls `slide_number`.
    pub fn select_slide_number(&mut self, slide_number: u32) -> Option<usize> {
        let index = self.timeline.index_of_slide(slide_number)?;
        self.select_index(index)
    }

    /// Starts the presentation clock. Returns `false` if it already ran.
    pub fn start(&mut self) -> bool {
        if self.running {
            return false;
        }
        self.running = true;
        self.refresh_tracking();
        true
    }

    /// Stops the presentation clock and leaves play mode.
    ///
    /// Returns `true` when a slide's recorded time changed.
    pub fn pause(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.running = false;
        self.play_mode = false;
        self.stop_slide_timer()
    }

    /// The slideshow ended: both clocks stop and play mode is left.
    ///
    /// Returns `true` when a slide's recorded time changed.
    pub fn stop(&mut self) -> bool {
        self.running = false;
        self.play_mode = false;
        self.stop_slide_timer()
    }

    /// The document went away: like [`Session::stop`], and the presentation
    /// clock is reset with tracking shown as `-`.
    pub fn close(&mut self) -> bool {
        let changed = self.stop();
        self.elapsed_seconds = 0;
        self.last_tracking = CLOSED_TRACKING.to_string();
        changed
    }

    /// Advances both clocks by one second where they are running.
    pub fn tick(&mut self) {
        if self.running {
            self.elapsed_seconds += 1;
            self.refresh_tracking();
        }
        if self.play_mode && self.slide_timer_running {
            self.slide_elapsed_seconds += 1;
        }
    }

    /// Switches the slide timer to entry `index`.
    ///
    /// Outside play mode this just stops the timer. Otherwise the time spent
    /// on the previously timed entry is recorded and `index` resumes from
    /// its own recorded time. Returns `true` when a recorded time changed.
    pub fn begin_slide_timer(&mut self, index: usize) -> bool {
        if !self.play_mode {
            return self.stop_slide_timer();
        }
        let Some(entry) = self.timeline.get(index) else {
            return false;
        };
        let resume_from = entry.timing.actual_time_seconds.unwrap_or(0);

        let mut changed = false;
        if let Some(last) = self.last_timed_index.filter(|last| *last != index) {
            changed = self.timeline.set_actual(last, self.slide_elapsed_seconds).is_ok();
        }
        self.slide_elapsed_seconds = resume_from;
        self.last_timed_index = Some(index);
        self.slide_timer_running = true;
        changed
    }

    /// Stops the slide timer and records the time spent on the last timed
    /// entry. Returns `true` when a recorded time changed.
    pub fn stop_slide_timer(&mut self) -> bool {
        self.slide_timer_running = false;
        match self.last_timed_index {
            Some(last) => self.timeline.set_actual(last, self.slide_elapsed_seconds).is_ok(),
            None => false,
        }
    }

    /// Sets the presentation clock from the "edit elapsed time" fields.
    pub fn set_elapsed(&mut self, hours: &str, minutes: &str, seconds: &str) -> u64 {
        self.elapsed_seconds = join_hms(hours, minutes, seconds);
        self.refresh_tracking();
        self.elapsed_seconds
    }

    fn refresh_tracking(&mut self) {
        if !self.running {
            return;
        }
        if let Some(diff) = self
            .selected
            .and_then(|i| self.timeline.tracking(i, self.elapsed_seconds))
        {
            self.last_tracking = format_tracking(diff);
        }
    }

    /// The schedule delta shown next to the clock. Frozen while paused.
    pub fn tracking_text(&self) -> &str {
        &self.last_tracking
    }

    /// Planned seconds after the selected entry, or the whole plan when
    /// nothing is selected.
    pub fn time_left(&self) -> u64 {
        match self.selected {
            Some(index) => self.timeline.time_left(index),
            None => self.timeline.total_seconds(),
        }
    }

    /// What selecting entry `index` should do.
    pub fn target_for(&self, index: usize) -> Option<NavigationTarget> {
        let entry = self.timeline.get(index)?;
        if entry.timing.slide.is_break() {
            return Some(NavigationTarget::Local(index));
        }
        match self.timeline.presenter_slide_number(index) {
            0 => None,
            n => Some(NavigationTarget::Presenter(n)),
        }
    }

    /// Target of the next/previous buttons, `None` at either end.
    pub fn navigation_target(&self, direction: Direction) -> Option<NavigationTarget> {
        if self.timeline.is_empty() {
            return None;
        }
        let current = self.selected.unwrap_or(0);
        let index = match direction {
            Direction::Next => current.checked_add(1)?,
            Direction::Previous => current.checked_sub(1)?,
        };
        self.target_for(index)
    }

    /// Inserts a break after the selected entry and returns its index.
    pub fn add_break(&mut self) -> Result<usize> {
        if !self.has_presentation() || self.timeline.is_empty() {
            return Err(ValidationError::NoCurrentPresentation.into());
        }
        let at = self.timeline.insert_break_after(self.selected);
        if let Some(last) = self.last_timed_index.filter(|last| *last >= at) {
            self.last_timed_index = Some(last + 1);
        }
        Ok(at)
    }

    pub fn delete_break(&mut self, index: usize) -> Result<()> {
        self.timeline.delete_break(index)?;
        let shift = |slot: Option<usize>| match slot {
            Some(i) if i > index => Some(i - 1),
            Some(i) if i == index => None,
            other => other,
        };
        self.last_timed_index = shift(self.last_timed_index);
        self.selected = match self.selected {
            Some(i) if i == index => {
                (!self.timeline.is_empty()).then(|| index.min(self.timeline.len() - 1))
            }
            other => shift(other),
        };
        Ok(())
    }

    /// Parses `text` and sets entry `index`'s planned time.
    ///
    /// Returns the previous value so a failed mirror can put it back. Invalid
    /// input leaves the entry untouched.
    pub fn edit_estimate(&mut self, index: usize, text: &str) -> Result<u64> {
        let seconds = parse_time_input(text)
            .ok_or_else(|| ValidationError::InvalidTime(text.trim().to_string()))?;
        let previous = self
            .timeline
            .get(index)
            .map(|e| e.timing.estimated_time_seconds)
            .ok_or(ValidationError::IndexOutOfRange {
                index,
                len: self.timeline.len(),
            })?;
        self.timeline.set_estimate(index, seconds)?;
        Ok(previous)
    }

    pub fn set_estimate(&mut self, index: usize, seconds: u64) -> Result<()> {
        self.timeline.set_estimate(index, seconds)
    }

    /// Clears every recorded slide time and the slide timer.
    pub fn reset_actuals(&mut self) {
        self.timeline.reset_actuals();
        self.slide_elapsed_seconds = 0;
        self.last_timed_index = None;
        self.slide_timer_running = false;
    }

    /// The full document with the working timeline written back, for the
    /// wholesale re-post.
    pub fn document_snapshot(&self) -> TimingsDocument {
        let mut document = self.document.clone();
        if let Some(presentation) = document.current_mut() {
            presentation.slides = self.timeline.slides();
            presentation.elapsed_seconds = Some(self.elapsed_seconds);
        }
        document
    }

    /// Applies a pushed presenter event. Returns `true` when recorded slide
    /// times changed and the document should be re-posted.
    pub fn apply_event(&mut self, event: &PresenterEvent) -> bool {
        match *event {
            PresenterEvent::SlideUpdate { slide_number } => {
                match self.select_slide_number(slide_number) {
                    Some(index) if self.play_mode => self.begin_slide_timer(index),
                    _ => self.stop_slide_timer(),
                }
            }
            PresenterEvent::PresentationStarted => {
                self.play_mode = true;
                match self.selected {
                    Some(index) => self.begin_slide_timer(index),
                    None => false,
                }
            }
            PresenterEvent::PresentationStopped => self.stop(),
            PresenterEvent::PresentationClosed => self.close(),
        }
    }
}
