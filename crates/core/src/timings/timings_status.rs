//! Per-slide and whole-talk schedule assessments.

use serde::{Deserialize, Serialize};

use crate::constants::{
    SCHEDULE_LOSING_SLACK_SECS, SCHEDULE_ON_TIME_SLACK_SECS, SLIDE_WARNING_RATIO,
};

use super::timeline::Timeline;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlideTimingState {
    NoTiming,
    OnTime,
    Warning,
    OverTime,
}

/// How the time spent on one slide compares to its plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlideTimingStatus {
    pub planned_time: Option<u64>,
    pub actual_time: u64,
    pub status: SlideTimingState,
    pub variance: Option<i64>,
    pub percentage_used: Option<f64>,
}

impl SlideTimingStatus {
    pub fn evaluate(planned: Option<u64>, actual: u64) -> Self {
        let Some(planned) = planned else {
            return Self {
                planned_time: None,
                actual_time: actual,
                status: SlideTimingState::NoTiming,
                variance: None,
                percentage_used: None,
            };
        };

        let status = if (actual as f64) <= planned as f64 * SLIDE_WARNING_RATIO {
            SlideTimingState::OnTime
        } else if actual <= planned {
            SlideTimingState::Warning
        } else {
            SlideTimingState::OverTime
        };
        let percentage_used = if planned > 0 {
            actual as f64 / planned as f64 * 100.0
        } else {
            0.0
        };

        Self {
            planned_time: Some(planned),
            actual_time: actual,
            status,
            variance: Some(actual as i64 - planned as i64),
            percentage_used: Some(percentage_used),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleState {
    OnTime,
    LosingProgress,
    OffTrack,
}

/// Where the talk as a whole stands against its plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleStatus {
    pub current_index: usize,
    pub elapsed_time: u64,
    pub total_planned_time: u64,
    pub remaining_planned_time: u64,
    pub projected_total_time: u64,
    pub expected_time_to_current_slide: u64,
    /// Positive when ahead of plan.
    pub variance: i64,
    pub status: ScheduleState,
}

impl ScheduleStatus {
    /// Assesses the schedule at timeline entry `index` after `elapsed` seconds.
    pub fn evaluate(timeline: &Timeline, index: usize, elapsed: u64) -> Option<Self> {
        timeline.get(index)?;

        let expected = timeline.planned_before(index);
        let variance = expected as i64 - elapsed as i64;
        let status = if variance >= -SCHEDULE_ON_TIME_SLACK_SECS {
            ScheduleState::OnTime
        } else if variance >= -SCHEDULE_LOSING_SLACK_SECS {
            ScheduleState::LosingProgress
        } else {
            ScheduleState::OffTrack
        };
        let remaining = timeline.time_left(index);

        Some(Self {
            current_index: index,
            elapsed_time: elapsed,
            total_planned_time: timeline.total_seconds(),
            remaining_planned_time: remaining,
            projected_total_time: elapsed + remaining,
            expected_time_to_current_slide: expected,
            variance,
            status,
        })
    }
}
