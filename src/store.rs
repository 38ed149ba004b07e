//! In-memory event record store.
//!
//! Implements the storage side of the calendar: bulk creation across dates and
//! owners with `(date, kind, owner)` uniqueness, group rename/retype, single
//! and group deletion, per-year queries and PTO-day counting. Nothing here is
//! persisted; records live as long as the store.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, NaiveDate};
use tracing::{debug, info};

use crate::calendar::is_weekend;
use crate::error::{Error, Result};
use crate::types::{EventIdentity, EventKind, EventRecord, EventsByDate};

#[derive(Debug, Default)]
pub struct EventStore {
    records: Vec<EventRecord>,
    users: Vec<String>,
    next_id: u64,
}

impl EventStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Create one record per `(date, owner)` pair.
    ///
    /// A pair that collides with an existing `(date, kind, owner)` record is
    /// skipped. Returns every record now matching the request, old or new.
    /// National holidays may be created without owners; every other kind
    /// needs at least one.
    pub fn create(
        &mut self,
        dates: &[NaiveDate],
        name: &str,
        kind: EventKind,
        owners: &[String],
    ) -> Result<Vec<EventRecord>> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::Validation("event name must not be empty".to_string()));
        }
        if dates.is_empty() {
            return Err(Error::Validation("at least one date is required".to_string()));
        }

        let owners: Vec<Option<String>> = owners
            .iter()
            .map(|o| o.trim())
            .filter(|o| !o.is_empty())
            .map(|o| Some(o.to_string()))
            .collect();
        let owners = match (owners.is_empty(), kind.requires_owner()) {
            (true, true) => {
                return Err(Error::Validation(format!(
                    "{kind} events need at least one owner"
                )));
            }
            (true, false) => vec![None],
            (false, _) => owners,
        };

        let mut created = 0;
        for owner in &owners {
            if let Some(owner) = owner {
                self.ensure_user(owner);
            }
            for &date in dates {
                if self.find(date, kind, owner.as_deref()).is_some() {
                    continue;
                }
                self.next_id += 1;
                self.records.push(EventRecord {
                    id: self.next_id,
                    date,
                    name: name.to_string(),
                    kind,
                    owner: owner.clone(),
                });
                created += 1;
            }
        }
        info!(event = name, %kind, created, "created event records");

        Ok(self
            .records
            .iter()
            .filter(|r| r.kind == kind && dates.contains(&r.date) && owners.contains(&r.owner))
            .cloned()
            .collect())
    }

    /// Rename/retype every record of `identity` dated in `year`.
    ///
    /// Records that would collide with an existing `(date, kind, owner)` record
    /// after a retype are left untouched. Returns the number changed.
    pub fn update_group(
        &mut self,
        year: i32,
        identity: &EventIdentity,
        new_name: &str,
        new_kind: EventKind,
    ) -> Result<usize> {
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Err(Error::Validation("event name must not be empty".to_string()));
        }
        if identity.owner.is_none() && new_kind.requires_owner() {
            return Err(Error::Validation(format!(
                "cannot turn owner-less '{}' into a {new_kind} event",
                identity.name
            )));
        }

        let taken: BTreeSet<(NaiveDate, Option<String>)> = if new_kind == identity.kind {
            BTreeSet::new()
        } else {
            self.records
                .iter()
                .filter(|r| r.kind == new_kind)
                .map(|r| (r.date, r.owner.clone()))
                .collect()
        };

        let mut changed = 0;
        for record in self
            .records
            .iter_mut()
            .filter(|r| r.date.year() == year && r.identity() == *identity)
        {
            if taken.contains(&(record.date, record.owner.clone())) {
                continue;
            }
            record.name = new_name.to_string();
            record.kind = new_kind;
            changed += 1;
        }
        info!(year, from = %identity.name, to = new_name, changed, "updated event group");
        Ok(changed)
    }

    /// Delete a single record by id.
    pub fn delete(&mut self, id: u64) -> Result<()> {
        let index = self
            .records
            .iter()
            .position(|r| r.id == id)
            .ok_or(Error::NotFound(id))?;
        self.records.remove(index);
        debug!(id, "deleted event record");
        Ok(())
    }

    /// Delete every `(name, kind)` record of `year`, for one owner or, with
    /// `owner = None`, for all of them. Returns the number removed.
    pub fn delete_group(&mut self, year: i32, name: &str, kind: EventKind, owner: Option<&str>) -> usize {
        let before = self.records.len();
        self.records.retain(|r| {
            !(r.date.year() == year
                && r.name == name
                && r.kind == kind
                && owner.is_none_or(|o| r.owner.as_deref() == Some(o)))
        });
        let removed = before - self.records.len();
        info!(year, event = name, %kind, removed, "deleted event group");
        removed
    }

    /// Records dated in `year`, by date then id.
    pub fn records_for_year(&self, year: i32) -> Vec<EventRecord> {
        let mut records: Vec<EventRecord> = self
            .records
            .iter()
            .filter(|r| r.date.year() == year)
            .cloned()
            .collect();
        records.sort_by_key(|r| (r.date, r.id));
        records
    }

    /// Records of `year` keyed by date, ready for the layout engine.
    pub fn events_by_date(&self, year: i32) -> EventsByDate {
        let mut map = EventsByDate::new();
        for record in self.records_for_year(year) {
            map.entry(record.date).or_default().push(record);
        }
        map
    }

    /// Known users, sorted and unique ignoring case.
    pub fn users(&self) -> Vec<String> {
        let mut users = self.users.clone();
        users.sort_by_key(|u| u.to_lowercase());
        users
    }

    /// PTO days per owner in `year`, ignoring weekends and national holidays.
    pub fn pto_counts(&self, year: i32) -> BTreeMap<String, usize> {
        let national: BTreeSet<NaiveDate> = self
            .records
            .iter()
            .filter(|r| r.date.year() == year && r.is_national())
            .map(|r| r.date)
            .collect();

        let mut counts = BTreeMap::new();
        for record in &self.records {
            let Some(owner) = &record.owner else {
                continue;
            };
            if record.kind != EventKind::Pto
                || record.date.year() != year
                || is_weekend(record.date)
                || national.contains(&record.date)
            {
                continue;
            }
            *counts.entry(owner.clone()).or_insert(0) += 1;
        }
        counts
    }

    fn find(&self, date: NaiveDate, kind: EventKind, owner: Option<&str>) -> Option<&EventRecord> {
        self.records
            .iter()
            .find(|r| r.date == date && r.kind == kind && r.owner.as_deref() == owner)
    }

    fn ensure_user(&mut self, name: &str) {
        if !self.users.iter().any(|u| u.to_lowercase() == name.to_lowercase()) {
            self.users.push(name.to_string());
        }
    }
}
