//! Splitting of spans at week-row boundaries.

use crate::calendar::week_count;
use crate::types::{DAYS_PER_WEEK, EventSpan, SegmentDraft};

/// Cut every span into per-week drafts.
///
/// Returns one list per week row of the month grid, in span order.
pub fn split_into_segments(
    spans: &[EventSpan],
    first_day_offset: usize,
    days_in_month: u32,
) -> Vec<Vec<SegmentDraft>> {
    let mut by_week: Vec<Vec<SegmentDraft>> = vec![Vec::new(); week_count(first_day_offset, days_in_month)];

    for span in spans {
        debug_assert!(span.start_day <= span.end_day, "span ends before it starts");
        debug_assert!(span.end_day <= days_in_month, "span leaves its month");

        let start_cell = first_day_offset + span.start_day as usize - 1;
        let end_cell = first_day_offset + span.end_day as usize - 1;
        let start_week = start_cell / DAYS_PER_WEEK;
        let end_week = end_cell / DAYS_PER_WEEK;

        for (week, drafts) in by_week
            .iter_mut()
            .enumerate()
            .take(end_week + 1)
            .skip(start_week)
        {
            let week_start = week * DAYS_PER_WEEK;
            let week_end = week_start + DAYS_PER_WEEK - 1;
            let seg_start = start_cell.max(week_start);
            let seg_end = end_cell.min(week_end);

            drafts.push(SegmentDraft {
                identity: span.identity.clone(),
                start_col: seg_start - week_start,
                col_span: seg_end - seg_start + 1,
                is_start: week == start_week,
                is_end: week == end_week,
            });
        }
    }

    by_week
}
