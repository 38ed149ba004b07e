//! Grouping of one month's records into contiguous per-identity day runs.

use std::collections::HashMap;

use chrono::NaiveDate;
use tracing::debug;

use crate::calendar::days_in_month;
use crate::types::{EventIdentity, EventSpan, EventsByDate};

/// Collapse the non-national records of `year`/`month` into spans.
///
/// Spans are ordered longest first, then by start day. Ties keep the order in
/// which identities first appear while scanning the month, so the result never
/// depends on hash iteration order.
pub fn group_into_spans(year: i32, month: u32, events: &EventsByDate) -> Vec<EventSpan> {
    let mut order: Vec<(EventIdentity, Vec<u32>)> = Vec::new();
    let mut index: HashMap<EventIdentity, usize> = HashMap::new();

    for day in 1..=days_in_month(year, month) {
        let Some(records) = NaiveDate::from_ymd_opt(year, month, day).and_then(|d| events.get(&d))
        else {
            continue;
        };
        for record in records.iter().filter(|r| !r.is_national()) {
            let identity = record.identity();
            let slot = *index.entry(identity.clone()).or_insert_with(|| {
                order.push((identity, Vec::new()));
                order.len() - 1
            });
            order[slot].1.push(day);
        }
    }

    let mut spans = Vec::new();
    for (identity, mut days) in order {
        days.sort_unstable();
        days.dedup();
        spans.extend(runs(&days).into_iter().map(|(start_day, end_day)| EventSpan {
            identity: identity.clone(),
            start_day,
            end_day,
        }));
    }

    spans.sort_by(|a, b| {
        (b.end_day - b.start_day)
            .cmp(&(a.end_day - a.start_day))
            .then(a.start_day.cmp(&b.start_day))
    });

    debug!(year, month, spans = spans.len(), "grouped records into spans");
    spans
}

/// Run-length encode sorted, unique day numbers into inclusive `(start, end)` runs.
fn runs(days: &[u32]) -> Vec<(u32, u32)> {
    let mut result = Vec::new();
    let Some((&first, rest)) = days.split_first() else {
        return result;
    };

    let (mut start, mut prev) = (first, first);
    for &day in rest {
        if day == prev + 1 {
            prev = day;
        } else {
            result.push((start, prev));
            start = day;
            prev = day;
        }
    }
    result.push((start, prev));
    result
}
