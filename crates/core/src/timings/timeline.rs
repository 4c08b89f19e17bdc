//! Ordered slide/break timeline with derived cumulative times.

use crate::constants::DEFAULT_BREAK_SECONDS;
use crate::errors::{Result, ValidationError};

use super::timings_model::{SlideRef, SlideTiming};

/// A timing plus the running sum of planned seconds up to and including it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineEntry {
    pub timing: SlideTiming,
    pub cumulative_seconds: u64,
}

/// The working copy of a presentation's slide timings.
///
/// Every mutation recomputes `cumulative_seconds`, so entry `i` always holds
/// the sum of the planned seconds of entries `0..=i`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Timeline {
    entries: Vec<TimelineEntry>,
}

impl Timeline {
    pub fn from_slides(slides: Vec<SlideTiming>) -> Self {
        let mut timeline = Self {
            entries: slides
                .into_iter()
                .map(|timing| TimelineEntry {
                    timing,
                    cumulative_seconds: 0,
                })
                .collect(),
        };
        timeline.recompute();
        timeline
    }

    /// Drops the derived column for persistence.
    pub fn into_slides(self) -> Vec<SlideTiming> {
        self.entries.into_iter().map(|e| e.timing).collect()
    }

    pub fn slides(&self) -> Vec<SlideTiming> {
        self.entries.iter().map(|e| e.timing.clone()).collect()
    }

    pub fn entries(&self) -> &[TimelineEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&TimelineEntry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_seconds(&self) -> u64 {
        self.entries.last().map(|e| e.cumulative_seconds).unwrap_or(0)
    }

    fn recompute(&mut self) {
        let mut running = 0u64;
        for entry in &mut self.entries {
            running += entry.timing.estimated_time_seconds;
            entry.cumulative_seconds = running;
        }
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.entries.len() {
            return Err(ValidationError::IndexOutOfRange {
                index,
                len: self.entries.len(),
            }
            .into());
        }
        Ok(())
    }

    /// Inserts a default-length break after `current`, or at the end when no
    /// entry is selected. Returns the index of the new break.
    pub fn insert_break_after(&mut self, current: Option<usize>) -> usize {
        let at = current
            .map(|i| (i + 1).min(self.entries.len()))
            .unwrap_or(self.entries.len());
        self.entries.insert(
            at,
            TimelineEntry {
                timing: SlideTiming::break_of(DEFAULT_BREAK_SECONDS),
                cumulative_seconds: 0,
            },
        );
        self.recompute();
        at
    }

    /// Removes the entry at `index`; only breaks can be removed.
    pub fn delete_break(&mut self, index: usize) -> Result<SlideTiming> {
        self.check_index(index)?;
        if !self.entries[index].timing.slide.is_break() {
            return Err(ValidationError::NotABreak(index).into());
        }
        let removed = self.entries.remove(index);
        self.recompute();
        Ok(removed.timing)
    }

    pub fn set_estimate(&mut self, index: usize, seconds: u64) -> Result<()> {
        self.check_index(index)?;
        self.entries[index].timing.estimated_time_seconds = seconds;
        self.recompute();
        Ok(())
    }

    pub fn set_actual(&mut self, index: usize, seconds: u64) -> Result<()> {
        self.check_index(index)?;
        self.entries[index].timing.actual_time_seconds = Some(seconds);
        Ok(())
    }

    pub fn reset_actuals(&mut self) {
        for entry in &mut self.entries {
            entry.timing.actual_time_seconds = None;
        }
    }

    /// The slide number the presentation application uses for entry `index`:
    /// the count of non-break entries up to and including it. Zero when the
    /// timeline starts with breaks only.
    pub fn presenter_slide_number(&self, index: usize) -> u32 {
        self.entries
            .iter()
            .take(index.saturating_add(1))
            .filter(|e| !e.timing.slide.is_break())
            .count() as u32
    }

    /// Inverse of [`Timeline::presenter_slide_number`] for real slides.
    pub fn index_of_slide(&self, slide_number: u32) -> Option<usize> {
        if slide_number == 0 {
            return None;
        }
        let mut seen = 0u32;
        for (index, entry) in self.entries.iter().enumerate() {
            if let SlideRef::Slide(_) = entry.timing.slide {
                seen += 1;
                if seen == slide_number {
                    return Some(index);
                }
            }
        }
        None
    }

    /// Planned seconds of everything after `index`.
    pub fn time_left(&self, index: usize) -> u64 {
        self.entries
            .iter()
            .skip(index.saturating_add(1))
            .map(|e| e.timing.estimated_time_seconds)
            .sum()
    }

    /// Planned seconds before `index` starts.
    pub fn planned_before(&self, index: usize) -> u64 {
        match index {
            0 => 0,
            i => self
                .entries
                .get(i - 1)
                .map(|e| e.cumulative_seconds)
                .unwrap_or_else(|| self.total_seconds()),
        }
    }

    /// Schedule delta at `index`: planned cumulative seconds minus elapsed.
    /// Positive means ahead of plan.
    pub fn tracking(&self, index: usize, elapsed: u64) -> Option<i64> {
        self.entries
            .get(index)
            .map(|e| e.cumulative_seconds as i64 - elapsed as i64)
    }
}
