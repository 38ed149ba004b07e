//! TOML events file: the read-only data source behind the CLI.
//!
//! ```toml
//! [[event]]
//! name = "Ski trip"
//! kind = "pto"
//! owners = ["Alice"]
//! from = "2024-03-08"
//! to = "2024-03-13"
//!
//! [[event]]
//! name = "Good Friday"
//! kind = "national"
//! dates = ["2024-03-29"]
//! ```

use std::path::Path;

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::info;

use crate::calendar::{date_range, parse_date_key};
use crate::error::{Error, Result};
use crate::store::EventStore;
use crate::types::EventKind;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EventsFile {
    #[serde(default, rename = "event")]
    pub events: Vec<EventEntry>,
}

/// One `[[event]]` table: a name and kind shared across dates and owners.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EventEntry {
    pub name: String,
    pub kind: EventKind,
    #[serde(default)]
    pub owners: Vec<String>,
    #[serde(default)]
    pub dates: Vec<String>,
    /// First day of an inclusive range.
    pub from: Option<String>,
    /// Last day of the range, defaults to `from`.
    pub to: Option<String>,
}

impl EventEntry {
    /// Every date the entry covers, sorted and without duplicates.
    pub fn expand_dates(&self) -> Result<Vec<NaiveDate>> {
        let mut dates = self
            .dates
            .iter()
            .map(|d| parse_date_key(d))
            .collect::<Result<Vec<_>>>()?;

        match (&self.from, &self.to) {
            (Some(from), to) => {
                let start = parse_date_key(from)?;
                let end = to.as_deref().map(parse_date_key).transpose()?.unwrap_or(start);
                if end < start {
                    return Err(Error::Validation(format!(
                        "'{}' ends ({end}) before it starts ({start})",
                        self.name
                    )));
                }
                dates.extend(date_range(start, end));
            }
            (None, Some(_)) => {
                return Err(Error::Validation(format!(
                    "'{}' has `to` without `from`",
                    self.name
                )));
            }
            (None, None) => {}
        }

        dates.sort_unstable();
        dates.dedup();
        Ok(dates)
    }
}

impl EventsFile {
    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Feed every entry into a fresh store.
    pub fn into_store(self) -> Result<EventStore> {
        let mut store = EventStore::new();
        for entry in &self.events {
            let dates = entry.expand_dates()?;
            store.create(&dates, &entry.name, entry.kind, &entry.owners)?;
        }
        Ok(store)
    }
}

/// Load an events file from disk into a store. `~` is expanded.
pub fn load_events_file(path: &str) -> Result<EventStore> {
    let expanded = shellexpand::tilde(path);
    let content = std::fs::read_to_string(Path::new(expanded.as_ref()))?;
    let store = EventsFile::parse(&content)?.into_store()?;
    info!(path = %expanded, records = store.len(), "loaded events file");
    Ok(store)
}
