//! Type definitions and constants for event records and month layouts.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::Deserialize;

use crate::calendar::format_date;
use crate::error::{Error, Result};

/// Category of an event record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(try_from = "String")]
pub enum EventKind {
    /// Public holiday, rendered as a label inside its day cell.
    National,
    /// Company-wide day off.
    Company,
    /// Personal paid time off.
    Pto,
    /// Anything else worth a bar.
    Event,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::National => "national",
            EventKind::Company => "company",
            EventKind::Pto => "pto",
            EventKind::Event => "event",
        }
    }

    /// National holidays are shared by everyone; every other kind belongs to someone.
    pub fn requires_owner(self) -> bool {
        !matches!(self, EventKind::National)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "national" => Ok(EventKind::National),
            "company" => Ok(EventKind::Company),
            "pto" => Ok(EventKind::Pto),
            "event" => Ok(EventKind::Event),
            _ => Err(Error::InvalidKind(s.to_string())),
        }
    }
}

impl TryFrom<String> for EventKind {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

/// One stored record: a single named event on a single date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRecord {
    /// Store-assigned identifier, unused by the layout engine.
    pub id: u64,
    pub date: NaiveDate,
    pub name: String,
    pub kind: EventKind,
    pub owner: Option<String>,
}

impl EventRecord {
    pub fn identity(&self) -> EventIdentity {
        EventIdentity {
            name: self.name.clone(),
            kind: self.kind,
            owner: self.owner.clone(),
        }
    }

    pub fn is_national(&self) -> bool {
        self.kind == EventKind::National
    }
}

/// The `(name, kind, owner)` tuple deciding whether two records are the same logical event.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EventIdentity {
    pub name: String,
    pub kind: EventKind,
    pub owner: Option<String>,
}

impl EventIdentity {
    pub fn new(name: impl Into<String>, kind: EventKind, owner: Option<&str>) -> Self {
        EventIdentity {
            name: name.into(),
            kind,
            owner: owner.map(str::to_string),
        }
    }

    /// Text shown on a bar: `name (owner)` or just `name`.
    pub fn label(&self) -> String {
        match &self.owner {
            Some(owner) => format!("{} ({})", self.name, owner),
            None => self.name.clone(),
        }
    }
}

/// Records grouped by calendar date, as supplied by the data source.
pub type EventsByDate = BTreeMap<NaiveDate, Vec<EventRecord>>;

/// Maximal run of consecutive days of one identity within one month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventSpan {
    pub identity: EventIdentity,
    /// First day of month (1-indexed, inclusive).
    pub start_day: u32,
    /// Last day of month (inclusive).
    pub end_day: u32,
}

/// Part of a span inside one week row, before a row slot is chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentDraft {
    pub identity: EventIdentity,
    pub start_col: usize,
    pub col_span: usize,
    pub is_start: bool,
    pub is_end: bool,
}

impl SegmentDraft {
    /// Last column covered (inclusive).
    pub fn end_col(&self) -> usize {
        self.start_col + self.col_span - 1
    }
}

/// A visible bar fragment inside one week row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventSegment {
    pub identity: EventIdentity,
    /// Column within the week (0 = Monday).
    pub start_col: usize,
    /// Number of columns covered (1..=7).
    pub col_span: usize,
    /// Vertical slot within the week, 0 is the top bar.
    pub row_slot: usize,
    /// Touches the true first day of the parent span.
    pub is_start: bool,
    /// Touches the true last day of the parent span.
    pub is_end: bool,
}

impl EventSegment {
    pub fn end_col(&self) -> usize {
        self.start_col + self.col_span - 1
    }
}

/// One cell of a week row.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DayCell {
    /// Day of month, 0 for padding cells outside the month.
    pub day: u32,
    /// `None` for padding cells.
    pub date: Option<NaiveDate>,
    /// Every raw record of the date, national ones included.
    pub records: Vec<EventRecord>,
    pub national_label: Option<String>,
    pub is_weekend: bool,
    pub is_today: bool,
    /// Non-national events on this day that do not fit under the slot cap.
    pub overflow_count: usize,
}

impl DayCell {
    pub fn is_padding(&self) -> bool {
        self.day == 0
    }

    /// Canonical `YYYY-MM-DD` key, empty for padding cells.
    pub fn date_key(&self) -> String {
        self.date
            .map(|d| format_date(d.year(), d.month(), d.day()))
            .unwrap_or_default()
    }
}

/// One calendar week of a month grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekRow {
    pub cells: [DayCell; DAYS_PER_WEEK],
    /// Segments with a slot below the visible cap.
    pub segments: Vec<EventSegment>,
    /// Bar rows the renderer must reserve for this week.
    pub slot_count: usize,
}

/// Complete layout of one month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthLayout {
    pub year: i32,
    pub month: u32,
    pub weeks: Vec<WeekRow>,
}

/// Engine settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutConfig {
    visible_slot_cap: usize,
}

impl LayoutConfig {
    pub fn new(visible_slot_cap: usize) -> Result<Self> {
        if visible_slot_cap == 0 {
            return Err(Error::InvalidSlotCap(visible_slot_cap));
        }
        Ok(LayoutConfig { visible_slot_cap })
    }

    /// A cap large enough that overflow never triggers.
    pub fn unbounded() -> Self {
        LayoutConfig {
            visible_slot_cap: usize::MAX,
        }
    }

    pub fn visible_slot_cap(&self) -> usize {
        self.visible_slot_cap
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        LayoutConfig {
            visible_slot_cap: DEFAULT_VISIBLE_SLOT_CAP,
        }
    }
}

/// Column display mode for multi-month layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnsMode {
    /// Fixed number of columns.
    Fixed(u32),
    /// Auto-detect from terminal width.
    Auto,
}

/// Rendering context containing all display options.
#[derive(Clone, Debug)]
pub struct CalContext {
    pub layout: LayoutConfig,
    /// Whether to use ANSI color codes in output.
    pub color: bool,
    /// Today's date for highlighting.
    pub today: NaiveDate,
    /// Whether to show year in month headers.
    pub show_year_in_header: bool,
    /// Width of gutter between months in multi-month display.
    pub gutter_width: usize,
    /// Column display mode.
    pub columns: ColumnsMode,
}

pub const DAYS_PER_WEEK: usize = 7;
pub const DEFAULT_VISIBLE_SLOT_CAP: usize = 3;

// Terminal grid geometry: every day column is CELL_WIDTH chars plus a separator.
pub const CELL_WIDTH: usize = 4;
pub const MONTH_WIDTH: usize = DAYS_PER_WEEK * (CELL_WIDTH + 1) - 1;
pub const GUTTER_WIDTH_REGULAR: usize = 2;
pub const GUTTER_WIDTH_YEAR: usize = 3;

// Color is enabled by default for better user experience
pub const COLOR_ENABLED_BY_DEFAULT: bool = true;

// ANSI color codes
pub const COLOR_RESET: &str = "\x1b[0m";
pub const COLOR_REVERSE: &str = "\x1b[7m";
pub const COLOR_RED: &str = "\x1b[91m";
pub const COLOR_GREY: &str = "\x1b[90m";
pub const COLOR_TEAL: &str = "\x1b[96m";
pub const COLOR_SAND_YELLOW: &str = "\x1b[93m";
pub const COLOR_BLUE_BG: &str = "\x1b[44;97m";
pub const COLOR_GREEN_BG: &str = "\x1b[42;30m";
pub const COLOR_PURPLE_BG: &str = "\x1b[45;97m";
