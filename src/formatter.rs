//! Terminal rendering of month layouts with localization and color support.
//!
//! Every month renders to lines of exactly `MONTH_WIDTH` visible characters:
//! a header, weekday names, then per week a row of day numbers, one row per
//! visible bar slot and, when needed, a row of `+N` overflow markers.

use std::collections::BTreeMap;

use chrono::{Locale, Month, NaiveDate, Weekday};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::types::{
    CELL_WIDTH, COLOR_BLUE_BG, COLOR_GREEN_BG, COLOR_GREY, COLOR_PURPLE_BG, COLOR_RED,
    COLOR_RESET, COLOR_REVERSE, COLOR_SAND_YELLOW, COLOR_TEAL, CalContext, DAYS_PER_WEEK,
    DayCell, EventKind, EventSegment, MONTH_WIDTH, MonthLayout, WeekRow,
};

const WEEK: [Weekday; DAYS_PER_WEEK] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Get system locale from environment (LC_ALL > LC_TIME > LANG > en_US).
pub fn get_system_locale() -> Locale {
    std::env::var("LC_ALL")
        .or_else(|_| std::env::var("LC_TIME"))
        .or_else(|_| std::env::var("LANG"))
        .unwrap_or_else(|_| "en_US.UTF-8".to_string())
        .split(['.', '@'])
        .next()
        .unwrap_or("en_US")
        .parse()
        .unwrap_or(Locale::en_US)
}

/// Get month name in the current locale.
pub fn get_month_name(month: u32) -> String {
    NaiveDate::from_ymd_opt(2000, month, 1)
        .map(|d| d.format_localized("%B", get_system_locale()).to_string())
        .unwrap_or_default()
}

/// Parse month from string: numeric 1-12, or an English name or abbreviation.
pub fn parse_month(s: &str) -> Option<u32> {
    if let Ok(n) = s.parse::<u32>() {
        return (1..=12).contains(&n).then_some(n);
    }
    s.parse::<Month>().ok().map(|m| m.number_from_month())
}

/// Center text within a specified width, accounting for Unicode character widths.
pub fn center_text(text: &str, width: usize) -> String {
    let text_width = text.width();
    if text_width >= width {
        return text.to_string();
    }
    let total_padding = width - text_width;
    let left_padding = total_padding.div_ceil(2);
    let right_padding = total_padding - left_padding;
    format!(
        "{}{}{}",
        " ".repeat(left_padding),
        text,
        " ".repeat(right_padding)
    )
}

/// Display width of `s` ignoring ANSI escape sequences.
pub fn visible_width(s: &str) -> usize {
    let mut width = 0;
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\x1b' {
            for c in chars.by_ref() {
                if c == 'm' {
                    break;
                }
            }
        } else {
            width += c.width().unwrap_or(0);
        }
    }
    width
}

/// Cut or pad `text` to exactly `width` display columns.
fn fit(text: &str, width: usize) -> String {
    let mut result = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        result.push(c);
        used += w;
    }
    result.push_str(&" ".repeat(width - used));
    result
}

fn paint(text: &str, color: &str, enabled: bool) -> String {
    if enabled {
        format!("{}{}{}", color, text, COLOR_RESET)
    } else {
        text.to_string()
    }
}

fn kind_color(kind: EventKind) -> &'static str {
    match kind {
        EventKind::Company => COLOR_BLUE_BG,
        EventKind::Pto => COLOR_GREEN_BG,
        EventKind::Event => COLOR_PURPLE_BG,
        EventKind::National => COLOR_RED,
    }
}

/// Format month header with optional year and color.
pub fn format_month_header(year: i32, month: u32, width: usize, show_year: bool, color: bool) -> String {
    let month_name = get_month_name(month);
    let header = if show_year {
        format!("{} {}", month_name, year)
    } else {
        month_name
    };
    paint(&center_text(&header, width), COLOR_TEAL, color)
}

/// Get 2-character weekday abbreviation for current locale.
pub fn get_weekday_short_name(weekday: Weekday, locale: Locale) -> String {
    // 2000-01-03 was a Monday
    NaiveDate::from_ymd_opt(2000, 1, 3 + weekday.num_days_from_monday())
        .map(|d| d.format_localized("%a", locale).to_string())
        .unwrap_or_default()
        .chars()
        .take(2)
        .collect()
}

/// Format the Monday-first weekday header row.
pub fn format_weekday_headers(ctx: &CalContext) -> String {
    let locale = get_system_locale();
    let names: Vec<String> = WEEK
        .iter()
        .map(|&w| format!("{:>width$}", get_weekday_short_name(w, locale), width = CELL_WIDTH))
        .collect();
    paint(&fit(&names.join(" "), MONTH_WIDTH), COLOR_SAND_YELLOW, ctx.color)
}

/// Format one day number cell.
///
/// Color priority: today > national holiday > weekend > regular.
/// National holidays carry a `*` marker so they stay visible without color.
fn format_day(ctx: &CalContext, cell: &DayCell) -> String {
    if cell.is_padding() {
        return " ".repeat(CELL_WIDTH);
    }
    let marker = if cell.national_label.is_some() { '*' } else { ' ' };
    let text = format!("{:>w$}{}", cell.day, marker, w = CELL_WIDTH - 1);

    if cell.is_today {
        paint(&text, COLOR_REVERSE, ctx.color)
    } else if cell.national_label.is_some() {
        paint(&text, COLOR_RED, ctx.color)
    } else if cell.is_weekend {
        paint(&text, COLOR_GREY, ctx.color)
    } else {
        text
    }
}

/// Draw one bar: end caps `[`/`]` on the true ends of the event, `<`/`>` where
/// it continues into a neighbouring week.
pub fn format_bar(segment: &EventSegment, color: bool) -> String {
    let width = segment.col_span * (CELL_WIDTH + 1) - 1;
    let left = if segment.is_start { '[' } else { '<' };
    let right = if segment.is_end { ']' } else { '>' };
    let inner = fit(&segment.identity.label(), width.saturating_sub(2));
    paint(
        &format!("{left}{inner}{right}"),
        kind_color(segment.identity.kind),
        color,
    )
}

fn format_slot_line(ctx: &CalContext, week: &WeekRow, slot: usize) -> String {
    let mut line = String::new();
    let mut pos = 0;
    for segment in week.segments.iter().filter(|s| s.row_slot == slot) {
        let start = segment.start_col * (CELL_WIDTH + 1);
        line.push_str(&" ".repeat(start.saturating_sub(pos)));
        line.push_str(&format_bar(segment, ctx.color));
        pos = start + segment.col_span * (CELL_WIDTH + 1) - 1;
    }
    line.push_str(&" ".repeat(MONTH_WIDTH.saturating_sub(pos)));
    line
}

fn format_overflow_line(week: &WeekRow) -> Option<String> {
    if week.cells.iter().all(|c| c.overflow_count == 0) {
        return None;
    }
    let cells: Vec<String> = week
        .cells
        .iter()
        .map(|c| match c.overflow_count {
            0 => " ".repeat(CELL_WIDTH),
            n => format!("{:>w$}", format!("+{n}"), w = CELL_WIDTH),
        })
        .collect();
    Some(cells.join(" "))
}

/// Format a month layout as grid of lines.
pub fn format_month_grid(ctx: &CalContext, layout: &MonthLayout) -> Vec<String> {
    let mut lines = Vec::with_capacity(2 + layout.weeks.len() * 2);
    lines.push(format_month_header(
        layout.year,
        layout.month,
        MONTH_WIDTH,
        ctx.show_year_in_header,
        ctx.color,
    ));
    lines.push(format_weekday_headers(ctx));

    for week in &layout.weeks {
        let days: Vec<String> = week.cells.iter().map(|c| format_day(ctx, c)).collect();
        lines.push(days.join(" "));
        for slot in 0..week.slot_count {
            lines.push(format_slot_line(ctx, week, slot));
        }
        if let Some(overflow) = format_overflow_line(week) {
            lines.push(overflow);
        }
    }

    lines
}

/// Lay out already formatted month grids side by side.
pub fn join_side_by_side(grids: &[Vec<String>], gutter_width: usize) -> Vec<String> {
    let max_height = grids.iter().map(|g| g.len()).max().unwrap_or(0);
    let blank = " ".repeat(MONTH_WIDTH);
    let gutter = " ".repeat(gutter_width);

    (0..max_height)
        .map(|row| {
            grids
                .iter()
                .map(|grid| {
                    let text = grid.get(row).unwrap_or(&blank);
                    let padding = MONTH_WIDTH.saturating_sub(visible_width(text));
                    format!("{}{}", text, " ".repeat(padding))
                })
                .collect::<Vec<_>>()
                .join(&gutter)
                .trim_end()
                .to_string()
        })
        .collect()
}

/// Print a single month.
pub fn print_month(ctx: &CalContext, layout: &MonthLayout) {
    for line in format_month_grid(ctx, layout) {
        println!("{}", line);
    }
}

/// Print all months of a year, `months_per_row` abreast.
pub fn print_year(ctx: &CalContext, year: i32, layouts: &[MonthLayout]) {
    let mut month_ctx = ctx.clone();
    month_ctx.show_year_in_header = false;

    let per_row = ctx.months_per_row().max(1) as usize;
    let total_width = per_row * MONTH_WIDTH + (per_row - 1) * ctx.gutter_width;
    println!("{}", center_text(&year.to_string(), total_width).trim_end());
    println!();

    for chunk in layouts.chunks(per_row) {
        let grids: Vec<Vec<String>> = chunk.iter().map(|l| format_month_grid(&month_ctx, l)).collect();
        for line in join_side_by_side(&grids, ctx.gutter_width) {
            println!("{}", line);
        }
        println!();
    }
}

/// Legend explaining the bar colors and day markers.
pub fn format_legend(ctx: &CalContext) -> String {
    let bars = [
        ("Company", EventKind::Company),
        ("PTO", EventKind::Pto),
        ("Event", EventKind::Event),
    ]
    .iter()
    .map(|(label, kind)| paint(&format!("[{label}]"), kind_color(*kind), ctx.color))
    .collect::<Vec<_>>()
    .join(" ");

    format!(
        "{}  {}  {}  {}",
        bars,
        paint("1*", COLOR_RED, ctx.color) + " national holiday",
        paint(" 1", COLOR_GREY, ctx.color) + " weekend",
        paint(" 1", COLOR_REVERSE, ctx.color) + " today",
    )
}

/// `date  name` lines for every national holiday label in the layouts.
pub fn format_national_holidays(layouts: &[MonthLayout]) -> Vec<String> {
    layouts
        .iter()
        .flat_map(|l| l.weeks.iter())
        .flat_map(|w| w.cells.iter())
        .filter_map(|c| c.national_label.as_ref().map(|label| format!("{}  {}", c.date_key(), label)))
        .collect()
}

/// One `name: N PTO` entry per user, zero when they took none.
pub fn format_pto_counts(users: &[String], counts: &BTreeMap<String, usize>) -> String {
    users
        .iter()
        .map(|u| format!("{}: {} PTO", u, counts.get(u).copied().unwrap_or(0)))
        .collect::<Vec<_>>()
        .join("  ")
}
