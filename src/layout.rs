//! Month layout assembly: the entry point of the layout engine.
//!
//! `compute_month_layout` runs the stages in order (spans, week segments,
//! slots) and combines their result with per-day cell metadata. It is pure:
//! identical inputs always give identical layouts, and no state survives
//! between calls, so months can be computed in any order or in parallel.

use std::collections::HashSet;

use chrono::{Datelike, NaiveDate};
use tracing::debug;

use crate::calendar::{days_in_month, first_weekday_offset, is_weekend};
use crate::segments::split_into_segments;
use crate::slots::assign_slots;
use crate::spans::group_into_spans;
use crate::types::{
    DAYS_PER_WEEK, DayCell, EventSegment, EventsByDate, LayoutConfig, MonthLayout, WeekRow,
};

/// Compute the layout of `month` (1-based) of `year`.
///
/// `events` may hold dates outside the month; only the month's own days are read.
pub fn compute_month_layout(
    year: i32,
    month: u32,
    events: &EventsByDate,
    today: NaiveDate,
    config: &LayoutConfig,
) -> MonthLayout {
    let cap = config.visible_slot_cap();
    debug_assert!(cap > 0, "visible slot cap must be positive");

    let days = days_in_month(year, month);
    let offset = first_weekday_offset(year, month);
    let spans = group_into_spans(year, month, events);
    let weeks_segments = assign_slots(split_into_segments(&spans, offset, days));

    let weeks = weeks_segments
        .into_iter()
        .enumerate()
        .map(|(week, segments)| WeekRow {
            cells: std::array::from_fn(|col| {
                let cell = week * DAYS_PER_WEEK + col;
                day_cell(year, month, cell as i64 - offset as i64 + 1, events, today, cap)
            }),
            slot_count: slot_count(&segments, cap),
            segments: segments.into_iter().filter(|s| s.row_slot < cap).collect(),
        })
        .collect::<Vec<_>>();

    debug!(year, month, weeks = weeks.len(), cap, "computed month layout");
    MonthLayout { year, month, weeks }
}

/// Layouts of all twelve months of `year`.
pub fn compute_year_layout(
    year: i32,
    events: &EventsByDate,
    today: NaiveDate,
    config: &LayoutConfig,
) -> Vec<MonthLayout> {
    (1..=12)
        .map(|month| compute_month_layout(year, month, events, today, config))
        .collect()
}

fn slot_count(segments: &[EventSegment], cap: usize) -> usize {
    segments
        .iter()
        .map(|s| s.row_slot + 1)
        .max()
        .unwrap_or(0)
        .min(cap)
}

fn day_cell(
    year: i32,
    month: u32,
    day: i64,
    events: &EventsByDate,
    today: NaiveDate,
    cap: usize,
) -> DayCell {
    let Some(date) = u32::try_from(day)
        .ok()
        .and_then(|d| NaiveDate::from_ymd_opt(year, month, d))
    else {
        return DayCell::default();
    };

    let records = events.get(&date).cloned().unwrap_or_default();
    let national_label = records
        .iter()
        .find(|r| r.is_national())
        .map(|r| r.name.clone());
    // exact duplicates of one identity on a date count once
    let visible_events = records
        .iter()
        .filter(|r| !r.is_national())
        .map(|r| r.identity())
        .collect::<HashSet<_>>()
        .len();

    DayCell {
        day: date.day(),
        date: Some(date),
        national_label,
        is_weekend: is_weekend(date),
        is_today: date == today,
        overflow_count: visible_events.saturating_sub(cap),
        records,
    }
}
