//! Integration tests: events file -> store -> layout -> terminal output.

use assert_cmd::Command;
use chrono::NaiveDate;
use predicates::prelude::*;

use holical::args::{Args, get_display_date};
use holical::config::{Config, SlotCap};
use holical::events_file::{EventsFile, load_events_file};
use holical::formatter::{
    format_bar, format_month_grid, format_national_holidays, format_pto_counts, join_side_by_side,
    parse_month, visible_width,
};
use holical::layout::compute_month_layout;
use holical::store::EventStore;
use holical::types::{
    CalContext, ColumnsMode, EventIdentity, EventKind, EventSegment, GUTTER_WIDTH_REGULAR,
    LayoutConfig, MONTH_WIDTH, MonthLayout,
};

const TEAM_FILE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/team.toml");
const CONFIG_FILE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/config.toml");

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn test_context(cap: usize) -> CalContext {
    CalContext {
        layout: LayoutConfig::new(cap).unwrap(),
        color: false,
        today: date(2024, 3, 15),
        show_year_in_header: true,
        gutter_width: GUTTER_WIDTH_REGULAR,
        columns: ColumnsMode::Auto,
    }
}

fn team_store() -> EventStore {
    load_events_file(TEAM_FILE).unwrap()
}

fn team_march(cap: usize) -> MonthLayout {
    let ctx = test_context(cap);
    compute_month_layout(2024, 3, &team_store().events_by_date(2024), ctx.today, &ctx.layout)
}

fn segment(name: &str, kind: EventKind, owner: &str, start_col: usize, col_span: usize) -> EventSegment {
    EventSegment {
        identity: EventIdentity::new(name, kind, Some(owner)),
        start_col,
        col_span,
        is_start: true,
        is_end: true,
        row_slot: 0,
    }
}

fn cli() -> Command {
    let mut cmd = Command::cargo_bin("holical").unwrap();
    cmd.env("HOLICAL_TODAY", "2024-03-15")
        .env("LANG", "en_US.UTF-8")
        .env_remove("LC_ALL")
        .env_remove("LC_TIME")
        .env_remove("HOLICAL_LOG")
        .args(["--config", CONFIG_FILE]);
    cmd
}

mod events_file_tests {
    use super::*;

    #[test]
    fn test_team_file_loads() {
        let store = team_store();
        // 6 ski days + 3 offsite + 1 dentist + 1 holiday
        assert_eq!(store.len(), 11);
        assert_eq!(store.users(), ["Alice", "Bob", "Carol"]);
    }

    #[test]
    fn test_range_and_dates_combine() {
        let file = EventsFile::parse(
            r#"
            [[event]]
            name = "Course"
            kind = "event"
            owners = ["Dave"]
            dates = ["2024-05-02", "2024-05-10"]
            from = "2024-05-01"
            to = "2024-05-03"
            "#,
        )
        .unwrap();
        let dates = file.events[0].expand_dates().unwrap();
        assert_eq!(
            dates,
            [date(2024, 5, 1), date(2024, 5, 2), date(2024, 5, 3), date(2024, 5, 10)]
        );
    }

    #[test]
    fn test_owner_required_for_pto() {
        let file = EventsFile::parse(
            r#"
            [[event]]
            name = "PTO"
            kind = "pto"
            dates = ["2024-05-02"]
            "#,
        )
        .unwrap();
        assert!(file.into_store().is_err());
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let result = EventsFile::parse(
            r#"
            [[event]]
            name = "Party"
            kind = "birthday"
            owners = ["Eve"]
            dates = ["2024-05-02"]
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = load_events_file("/nonexistent/holical/events.toml");
        assert!(matches!(result, Err(holical::error::Error::Io(_))));
    }
}

mod store_tests {
    use super::*;

    #[test]
    fn test_pto_counts_skip_weekend() {
        let counts = team_store().pto_counts(2024);
        assert_eq!(counts.get("Alice"), Some(&4));
        assert_eq!(counts.get("Bob"), None);
    }

    #[test]
    fn test_pto_counts_line() {
        let store = team_store();
        assert_eq!(
            format_pto_counts(&store.users(), &store.pto_counts(2024)),
            "Alice: 4 PTO  Bob: 0 PTO  Carol: 0 PTO"
        );
    }

    #[test]
    fn test_delete_group_changes_layout() {
        let mut store = team_store();
        let removed = store.delete_group(2024, "Offsite", EventKind::Company, None);
        assert_eq!(removed, 3);

        let layout = compute_month_layout(
            2024,
            3,
            &store.events_by_date(2024),
            date(2024, 3, 15),
            &LayoutConfig::default(),
        );
        let week = &layout.weeks[2];
        assert_eq!(week.slot_count, 2);
        assert!(week.cells.iter().all(|c| c.overflow_count == 0));
    }

    #[test]
    fn test_update_group_renames_bars() {
        let mut store = team_store();
        let identity = EventIdentity::new("Dentist", EventKind::Event, Some("Bob"));
        assert_eq!(store.update_group(2024, &identity, "Checkup", EventKind::Event).unwrap(), 1);

        let layout = compute_month_layout(
            2024,
            3,
            &store.events_by_date(2024),
            date(2024, 3, 15),
            &LayoutConfig::unbounded(),
        );
        let names: Vec<_> = layout.weeks[2].segments.iter().map(|s| s.identity.name.as_str()).collect();
        assert!(names.contains(&"Checkup"));
        assert!(!names.contains(&"Dentist"));
    }
}

mod layout_tests {
    use super::*;

    #[test]
    fn test_busy_day_overflows() {
        let layout = team_march(3);
        let week = &layout.weeks[2];
        assert_eq!(week.slot_count, 3);
        assert_eq!(week.cells[1].day, 12);
        assert_eq!(week.cells[1].overflow_count, 2);
        assert_eq!(week.segments.len(), 3);
    }

    #[test]
    fn test_continuation_takes_first_row() {
        let layout = team_march(3);
        let ski = &layout.weeks[2].segments[0];
        assert_eq!(ski.identity.name, "Ski trip");
        assert_eq!(ski.row_slot, 0);
        assert!(!ski.is_start && ski.is_end);
    }

    #[test]
    fn test_national_holiday_listed() {
        let layouts = vec![team_march(3)];
        assert_eq!(format_national_holidays(&layouts), ["2024-03-29  Good Friday"]);
    }
}

mod formatter_tests {
    use super::*;

    #[test]
    fn test_parse_month() {
        assert_eq!(parse_month("1"), Some(1));
        assert_eq!(parse_month("12"), Some(12));
        assert_eq!(parse_month("march"), Some(3));
        assert_eq!(parse_month("Sep"), Some(9));
        assert_eq!(parse_month("0"), None);
        assert_eq!(parse_month("13"), None);
        assert_eq!(parse_month("smarch"), None);
    }

    #[test]
    fn test_every_grid_line_has_month_width() {
        let ctx = test_context(3);
        for line in format_month_grid(&ctx, &team_march(3)) {
            assert_eq!(visible_width(&line), MONTH_WIDTH, "{line:?}");
        }
    }

    #[test]
    fn test_colored_grid_keeps_width() {
        let mut ctx = test_context(3);
        ctx.color = true;
        for line in format_month_grid(&ctx, &team_march(3)) {
            assert_eq!(visible_width(&line), MONTH_WIDTH, "{line:?}");
        }
    }

    #[test]
    fn test_overflow_marker_rendered() {
        let grid = format_month_grid(&test_context(3), &team_march(3));
        assert!(grid.iter().any(|l| l.contains("+2")));
    }

    #[test]
    fn test_national_day_marked() {
        let grid = format_month_grid(&test_context(3), &team_march(3));
        assert!(grid.iter().any(|l| l.contains("29*")));
    }

    #[test]
    fn test_bar_caps() {
        let mut bar = segment("Ski trip", EventKind::Pto, "Alice", 0, 3);
        assert_eq!(format_bar(&bar, false), "[Ski trip (Al]");
        bar.is_start = false;
        bar.is_end = false;
        assert_eq!(format_bar(&bar, false), "<Ski trip (Al>");
    }

    #[test]
    fn test_bar_width_follows_span() {
        for span in 1..=7 {
            let bar = segment("X", EventKind::Event, "Bob", 0, span);
            assert_eq!(visible_width(&format_bar(&bar, false)), span * 5 - 1);
        }
    }

    #[test]
    fn test_side_by_side_layout() {
        let grids = vec![
            vec!["a".to_string(), "b".to_string()],
            vec!["c".to_string()],
        ];
        let lines = join_side_by_side(&grids, 2);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], format!("a{}c", " ".repeat(MONTH_WIDTH - 1 + 2)));
        assert_eq!(lines[1], "b");
    }
}

mod args_tests {
    use super::*;
    use clap::Parser;

    fn parse(argv: &[&str]) -> Args {
        Args::parse_from(std::iter::once("holical").chain(argv.iter().copied()))
    }

    // HOLICAL_TODAY is never set in this process, so only explicit dates are checked

    #[test]
    fn test_month_and_year() {
        assert_eq!(get_display_date(&parse(&["3", "2024"])).unwrap(), (2024, Some(3)));
        assert_eq!(get_display_date(&parse(&["march", "2024"])).unwrap(), (2024, Some(3)));
    }

    #[test]
    fn test_lone_year() {
        assert_eq!(get_display_date(&parse(&["2024"])).unwrap(), (2024, None));
    }

    #[test]
    fn test_year_flag_with_month_and_year() {
        assert_eq!(get_display_date(&parse(&["-y", "3", "2024"])).unwrap(), (2024, None));
    }

    #[test]
    fn test_invalid_month() {
        assert!(get_display_date(&parse(&["13", "2024"])).is_err());
    }

    #[test]
    fn test_invalid_year() {
        assert!(get_display_date(&parse(&["3", "0"])).is_err());
    }

    #[test]
    fn test_cap_flag_overrides_config() {
        let config = Config::default();
        assert_eq!(parse(&[]).slot_cap(&config), SlotCap::Limited(3));
        assert_eq!(parse(&["--cap", "5"]).slot_cap(&config), SlotCap::Limited(5));
        assert_eq!(parse(&["--cap", "unlimited"]).slot_cap(&config), SlotCap::Unlimited);
    }

    #[test]
    fn test_zero_cap_rejected() {
        assert!(Args::try_parse_from(["holical", "--cap", "0"]).is_err());
    }
}

mod cli_tests {
    use super::*;

    #[test]
    fn test_month_view() {
        cli()
            .args(["-e", TEAM_FILE, "3", "2024"])
            .assert()
            .success()
            .stdout(predicate::str::contains("March 2024"))
            .stdout(predicate::str::contains("[Ski trip (Al>"))
            .stdout(predicate::str::contains("<Ski trip (Al]"))
            .stdout(predicate::str::contains("+2"));
    }

    #[test]
    fn test_pto_and_legend() {
        cli()
            .args(["-e", TEAM_FILE, "--pto", "--legend", "3", "2024"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Alice: 4 PTO"))
            .stdout(predicate::str::contains("2024-03-29  Good Friday"))
            .stdout(predicate::str::contains("national holiday"));
    }

    #[test]
    fn test_unlimited_cap_shows_every_bar() {
        cli()
            .args(["-e", TEAM_FILE, "--cap", "unlimited", "3", "2024"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[De]"))
            .stdout(predicate::str::contains("+2").not());
    }

    #[test]
    fn test_year_view() {
        cli()
            .args(["-e", TEAM_FILE, "2024"])
            .assert()
            .success()
            .stdout(predicate::str::contains("2024"))
            .stdout(predicate::str::contains("December"));
    }

    #[test]
    fn test_empty_calendar_without_events() {
        cli()
            .args(["3", "2024"])
            .assert()
            .success()
            .stdout(predicate::str::contains("March 2024"))
            .stderr(predicate::str::is_empty());
    }

    #[test]
    fn test_invalid_month_fails() {
        cli()
            .args(["13", "2024"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("holical: "));
    }

    #[test]
    fn test_missing_events_file_fails() {
        cli()
            .args(["-e", "/nonexistent/holical/events.toml", "3", "2024"])
            .assert()
            .failure();
    }

    #[test]
    fn test_zero_cap_fails() {
        cli().args(["--cap", "0"]).assert().failure();
    }
}
