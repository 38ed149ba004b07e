//! Command-line argument parsing using clap.
//!
//! Positional arguments follow the cal convention: `[month] [year]`, where a
//! lone four-digit value is a year.

use chrono::Datelike;
use clap::{Parser, ValueHint};
use std::io::IsTerminal;

use crate::config::{Config, SlotCap};
use crate::error::{Error, Result};
use crate::formatter::parse_month;
use crate::types::{COLOR_ENABLED_BY_DEFAULT, CalContext, ColumnsMode, GUTTER_WIDTH_REGULAR, GUTTER_WIDTH_YEAR};

/// Environment variable overriding today's date (YYYY-MM-DD), used by tests.
pub const TODAY_ENV_VAR: &str = "HOLICAL_TODAY";

#[derive(Parser, Debug)]
#[command(name = "holical")]
#[command(about = "Displays a holiday/PTO calendar for a month or a whole year", long_about = None)]
#[command(version)]
#[command(after_help = HELP_MESSAGE)]
pub struct Args {
    /// Display whole year.
    #[arg(short = 'y', long, help_heading = "Display options")]
    pub year: bool,

    /// Bar rows shown per week before "+N" markers (number or "unlimited").
    #[arg(long, value_name = "N", value_parser = parse_cap, help_heading = "Display options")]
    pub cap: Option<SlotCap>,

    /// Print each user's PTO day count below the calendar.
    #[arg(long, help_heading = "Display options")]
    pub pto: bool,

    /// Print the color legend and the national holidays shown.
    #[arg(long, help_heading = "Display options")]
    pub legend: bool,

    /// Events file (TOML).
    #[arg(short = 'e', long, value_name = "FILE", value_hint = ValueHint::FilePath, help_heading = "Input options")]
    pub events: Option<String>,

    /// Configuration file (default: ~/.config/holical/config.toml).
    #[arg(long, value_name = "FILE", value_hint = ValueHint::FilePath, help_heading = "Input options")]
    pub config: Option<String>,

    /// Month (1-12 or name), or a four-digit year.
    #[arg(index = 1, value_name = "month", value_hint = ValueHint::Other)]
    pub first_arg: Option<String>,

    /// Year (1-9999).
    #[arg(index = 2, value_name = "year", value_hint = ValueHint::Other)]
    pub second_arg: Option<String>,

    /// Disable colorized output.
    #[arg(long, help_heading = "Output options")]
    pub no_color: bool,

    /// Number of months per row in year view (or "auto" for terminal width).
    #[arg(short = 'c', long = "columns", help_heading = "Output options", value_name = "width")]
    pub columns: Option<String>,
}

/// Help message displayed with --help.
const HELP_MESSAGE: &str = "Display a holiday calendar, or one month of it.

Without any arguments, display the current month.

Examples:
  holical -e team.toml            Current month
  holical -e team.toml -y         Current year
  holical -e team.toml 2026       Year 2026
  holical -e team.toml 3 2024     March 2024
  holical --cap unlimited -y      Never collapse bars into +N markers
  holical --pto -y                Year view with PTO day counts";

fn parse_cap(s: &str) -> std::result::Result<SlotCap, String> {
    s.parse().map_err(|e: Error| e.to_string())
}

impl Args {
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Slot cap from the command line, falling back to the config file.
    pub fn slot_cap(&self, config: &Config) -> SlotCap {
        self.cap.unwrap_or(config.visible_slot_cap)
    }
}

impl CalContext {
    pub fn new(args: &Args, config: &Config) -> Result<Self> {
        let today = get_today_date()?;

        let color = !args.no_color
            && config.color
            && COLOR_ENABLED_BY_DEFAULT
            && std::io::stdout().is_terminal();

        let columns = match args.columns.as_deref() {
            Some("auto") => ColumnsMode::Auto,
            Some(s) => {
                let n = s
                    .parse::<u32>()
                    .map_err(|_| Error::Args(format!("Invalid columns value: {}", s)))?;
                if n == 0 {
                    return Err(Error::Args("Columns must be positive".to_string()));
                }
                ColumnsMode::Fixed(n)
            }
            None => config.columns.map_or(ColumnsMode::Auto, ColumnsMode::Fixed),
        };

        // Year view uses a wider gutter between months
        let gutter_width = if args.year || is_year_argument(args) {
            GUTTER_WIDTH_YEAR
        } else {
            GUTTER_WIDTH_REGULAR
        };

        Ok(CalContext {
            layout: args.slot_cap(config).to_layout_config()?,
            color,
            today,
            show_year_in_header: true,
            gutter_width,
            columns,
        })
    }
}

/// Get today's date, respecting HOLICAL_TODAY for testing.
pub fn get_today_date() -> Result<chrono::NaiveDate> {
    match std::env::var(TODAY_ENV_VAR) {
        Ok(value) => crate::calendar::parse_date_key(&value),
        Err(_) => Ok(chrono::Local::now().date_naive()),
    }
}

fn is_year_argument(args: &Args) -> bool {
    args.second_arg.is_none()
        && args
            .first_arg
            .as_deref()
            .and_then(|v| v.parse::<i32>().ok())
            .is_some_and(|n| (1000..=9999).contains(&n))
}

fn parse_year(value: &str) -> Result<i32> {
    let year = value
        .parse::<i32>()
        .map_err(|_| Error::Args(format!("Invalid year: {}", value)))?;
    if !(1..=9999).contains(&year) {
        return Err(Error::Args(format!("Invalid year: {} (must be 1-9999)", year)));
    }
    Ok(year)
}

/// Calculate what to display from positional arguments.
///
/// Returns the year and, for single-month display, the month.
/// - no args: current month (current year with `-y`)
/// - 1 arg: year (4 digits) or month (1-2 digits or name)
/// - 2 args: month year
pub fn get_display_date(args: &Args) -> Result<(i32, Option<u32>)> {
    let today = get_today_date()?;

    match (args.first_arg.as_deref(), args.second_arg.as_deref()) {
        (None, _) if args.year => Ok((today.year(), None)),
        (None, _) => Ok((today.year(), Some(today.month()))),
        (Some(value), None) => {
            if is_year_argument(args) {
                return Ok((parse_year(value)?, None));
            }
            let month =
                parse_month(value).ok_or_else(|| Error::Args(format!("Invalid argument: {}", value)))?;
            if args.year {
                return Err(Error::Args("Option -y cannot be combined with a month".to_string()));
            }
            Ok((today.year(), Some(month)))
        }
        (Some(month), Some(year)) => {
            let month =
                parse_month(month).ok_or_else(|| Error::Args(format!("Invalid month: {}", month)))?;
            let year = parse_year(year)?;
            if args.year {
                return Ok((year, None));
            }
            Ok((year, Some(month)))
        }
    }
}
