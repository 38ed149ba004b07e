//! Vertical slot assignment for week segments.
//!
//! Each week is a small interval-colouring problem: every event group gets the
//! lowest bar row that is free across all of its columns. Groups continuing
//! from the previous week try to keep the row they already had, so a multi-week
//! bar stays on one line unless something forces it down.

use std::collections::{BTreeSet, HashMap};

use tracing::debug;

use crate::types::{DAYS_PER_WEEK, EventIdentity, EventSegment, SegmentDraft};

/// Slot chosen for each identity present in a week.
pub type SlotMap = HashMap<EventIdentity, usize>;

/// Assign row slots to every week of a month, carrying slots from week to week.
pub fn assign_slots(weeks: Vec<Vec<SegmentDraft>>) -> Vec<Vec<EventSegment>> {
    let mut previous = SlotMap::new();
    weeks
        .into_iter()
        .enumerate()
        .map(|(week, drafts)| {
            let (segments, slots) = assign_week(drafts, &previous);
            debug!(
                week,
                segments = segments.len(),
                slots = slots.values().max().map_or(0, |s| s + 1),
                "assigned week slots"
            );
            previous = slots;
            segments
        })
        .collect()
}

/// All fragments of one identity inside a week.
struct Group {
    identity: EventIdentity,
    drafts: Vec<SegmentDraft>,
    start: usize,
    end: usize,
}

impl Group {
    fn len(&self) -> usize {
        self.end - self.start + 1
    }

    /// Carries on a span that was already visible in an earlier week.
    fn is_continuation(&self) -> bool {
        self.drafts.iter().any(|d| !d.is_start)
    }

    fn merged(self, row_slot: usize) -> EventSegment {
        let is_start = self
            .drafts
            .iter()
            .min_by_key(|d| d.start_col)
            .is_some_and(|d| d.is_start);
        let is_end = self
            .drafts
            .iter()
            .max_by_key(|d| d.end_col())
            .is_some_and(|d| d.is_end);
        let col_span = self.len();
        EventSegment {
            identity: self.identity,
            start_col: self.start,
            col_span,
            row_slot,
            is_start,
            is_end,
        }
    }
}

/// Occupied slot numbers per column of a week.
struct Occupancy {
    columns: [BTreeSet<usize>; DAYS_PER_WEEK],
}

impl Occupancy {
    fn new() -> Self {
        Occupancy {
            columns: Default::default(),
        }
    }

    fn is_free(&self, slot: usize, start: usize, end: usize) -> bool {
        self.columns[start..=end].iter().all(|c| !c.contains(&slot))
    }

    fn lowest_free(&self, start: usize, end: usize) -> usize {
        let mut slot = 0;
        while !self.is_free(slot, start, end) {
            slot += 1;
        }
        slot
    }

    fn reserve(&mut self, slot: usize, start: usize, end: usize) {
        for column in &mut self.columns[start..=end] {
            column.insert(slot);
        }
    }
}

fn group_by_identity(drafts: Vec<SegmentDraft>) -> Vec<Group> {
    let mut groups: Vec<Group> = Vec::new();
    let mut index: HashMap<EventIdentity, usize> = HashMap::new();

    for draft in drafts {
        debug_assert!(draft.col_span >= 1, "empty segment");
        debug_assert!(
            draft.start_col + draft.col_span <= DAYS_PER_WEEK,
            "segment overflows its week"
        );
        match index.get(&draft.identity) {
            Some(&i) => {
                let group = &mut groups[i];
                group.start = group.start.min(draft.start_col);
                group.end = group.end.max(draft.end_col());
                group.drafts.push(draft);
            }
            None => {
                index.insert(draft.identity.clone(), groups.len());
                groups.push(Group {
                    identity: draft.identity.clone(),
                    start: draft.start_col,
                    end: draft.end_col(),
                    drafts: vec![draft],
                });
            }
        }
    }

    groups
}

/// Assign one week. Returns its merged segments, ordered by slot then column,
/// and the identity→slot map for the following week.
fn assign_week(drafts: Vec<SegmentDraft>, previous: &SlotMap) -> (Vec<EventSegment>, SlotMap) {
    let (mut continuing, mut fresh): (Vec<_>, Vec<_>) = group_by_identity(drafts)
        .into_iter()
        .map(|g| {
            let prev = previous.get(&g.identity).copied().filter(|_| g.is_continuation());
            (g, prev)
        })
        .partition(|(_, prev)| prev.is_some());

    continuing.sort_by_key(|(_, prev)| *prev);
    fresh.sort_by(|(a, _), (b, _)| b.len().cmp(&a.len()).then(a.start.cmp(&b.start)));

    let mut occupancy = Occupancy::new();
    let mut slots = SlotMap::new();
    let mut segments = Vec::new();

    for (group, prev) in continuing.into_iter().chain(fresh) {
        let slot = match prev {
            Some(p) if occupancy.is_free(p, group.start, group.end) => p,
            _ => occupancy.lowest_free(group.start, group.end),
        };
        occupancy.reserve(slot, group.start, group.end);
        slots.insert(group.identity.clone(), slot);
        segments.push(group.merged(slot));
    }

    segments.sort_by_key(|s| (s.row_slot, s.start_col));
    (segments, slots)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EventKind;

    fn ident(name: &str) -> EventIdentity {
        EventIdentity::new(name, EventKind::Event, Some("Team"))
    }

    fn draft(name: &str, start_col: usize, col_span: usize, is_start: bool, is_end: bool) -> SegmentDraft {
        SegmentDraft {
            identity: ident(name),
            start_col,
            col_span,
            is_start,
            is_end,
        }
    }

    fn slot_of(segments: &[EventSegment], name: &str) -> usize {
        segments
            .iter()
            .find(|s| s.identity.name == name)
            .map(|s| s.row_slot)
            .unwrap()
    }

    #[test]
    fn overlapping_groups_get_distinct_slots() {
        let weeks = assign_slots(vec![vec![
            draft("A", 1, 3, true, true),
            draft("B", 1, 3, true, true),
        ]]);
        assert_eq!(slot_of(&weeks[0], "A"), 0);
        assert_eq!(slot_of(&weeks[0], "B"), 1);
    }

    #[test]
    fn disjoint_groups_share_slot_zero() {
        let weeks = assign_slots(vec![vec![
            draft("A", 0, 2, true, true),
            draft("B", 4, 3, true, true),
        ]]);
        assert!(weeks[0].iter().all(|s| s.row_slot == 0));
    }

    #[test]
    fn longer_new_group_goes_first() {
        let weeks = assign_slots(vec![vec![
            draft("Short", 2, 1, true, true),
            draft("Long", 0, 5, true, true),
        ]]);
        assert_eq!(slot_of(&weeks[0], "Long"), 0);
        assert_eq!(slot_of(&weeks[0], "Short"), 1);
    }

    #[test]
    fn continuation_keeps_slot_across_weeks() {
        let weeks = assign_slots(vec![
            vec![draft("A", 0, 7, true, false), draft("B", 3, 4, true, false)],
            vec![draft("A", 0, 2, false, true), draft("B", 0, 7, false, false)],
            vec![draft("B", 0, 3, false, true), draft("C", 0, 7, true, true)],
        ]);
        assert_eq!(slot_of(&weeks[0], "B"), 1);
        // B is now the longest group but keeps its row
        assert_eq!(slot_of(&weeks[1], "A"), 0);
        assert_eq!(slot_of(&weeks[1], "B"), 1);
        // the new, longer C takes the free top row instead of pushing B
        assert_eq!(slot_of(&weeks[2], "B"), 1);
        assert_eq!(slot_of(&weeks[2], "C"), 0);
    }

    #[test]
    fn occupied_previous_slot_falls_back_to_search() {
        let previous = SlotMap::from([(ident("A"), 0), (ident("B"), 0)]);
        let (segments, slots) = assign_week(
            vec![draft("A", 0, 3, false, true), draft("B", 1, 3, false, true)],
            &previous,
        );
        assert_eq!(slot_of(&segments, "A"), 0);
        assert_eq!(slot_of(&segments, "B"), 1);
        assert_eq!(slots[&ident("B")], 1);
    }

    #[test]
    fn new_span_of_known_identity_is_not_a_continuation() {
        let previous = SlotMap::from([(ident("A"), 2)]);
        let (segments, _) = assign_week(vec![draft("A", 3, 2, true, true)], &previous);
        assert_eq!(segments[0].row_slot, 0);
    }

    #[test]
    fn fragments_of_one_identity_merge_and_block_the_gap() {
        let (segments, _) = assign_week(
            vec![
                draft("A", 0, 2, true, true),
                draft("A", 4, 2, true, false),
                draft("B", 2, 2, true, true),
            ],
            &SlotMap::new(),
        );
        assert_eq!(segments.len(), 2);
        let a = segments.iter().find(|s| s.identity.name == "A").unwrap();
        assert_eq!((a.start_col, a.col_span, a.row_slot), (0, 6, 0));
        assert!(a.is_start);
        assert!(!a.is_end);
        assert_eq!(slot_of(&segments, "B"), 1);
    }

    #[test]
    fn no_collisions_in_dense_week() {
        let mut drafts = Vec::new();
        let mut seed = 7usize;
        for i in 0..40 {
            seed = (seed * 1103515245 + 12345) % 2147483648;
            let start = seed % 7;
            let span = 1 + (seed / 7) % (7 - start);
            drafts.push(draft(&format!("E{i}"), start, span, true, true));
        }
        let weeks = assign_slots(vec![drafts]);
        let segments = &weeks[0];
        assert_eq!(segments.len(), 40);
        for (i, a) in segments.iter().enumerate() {
            for b in &segments[i + 1..] {
                let overlap = a.start_col <= b.end_col() && b.start_col <= a.end_col();
                assert!(!(overlap && a.row_slot == b.row_slot), "{a:?} collides with {b:?}");
            }
        }
    }

    #[test]
    fn segments_sorted_by_slot_then_column() {
        let weeks = assign_slots(vec![vec![
            draft("A", 4, 2, true, true),
            draft("B", 0, 7, true, true),
            draft("C", 0, 2, true, true),
        ]]);
        let order: Vec<_> = weeks[0]
            .iter()
            .map(|s| (s.row_slot, s.start_col))
            .collect();
        assert_eq!(order, [(0, 0), (1, 0), (1, 4)]);
    }
}
