//! Holiday calendar CLI application.
//!
//! # Usage
//! ```ignore
//! holical -e team.toml          // Current month
//! holical -e team.toml 2026     // Year 2026
//! holical -e team.toml 3 2024   // March 2024
//! holical -e team.toml -y --pto // Whole year with PTO counts
//! ```

use holical::args::{Args, get_display_date};
use holical::config::Config;
use holical::error::Result;
use holical::events_file::load_events_file;
use holical::formatter::{
    format_legend, format_national_holidays, format_pto_counts, print_month, print_year,
};
use holical::layout::{compute_month_layout, compute_year_layout};
use holical::logging::init_logging;
use holical::store::EventStore;
use holical::types::CalContext;
use tracing::info;

fn main() {
    let args = Args::parse();

    if let Err(e) = run(&args) {
        eprintln!("holical: {}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    init_logging()?;

    let config = Config::load(args.config.as_deref())?;
    let ctx = CalContext::new(args, &config)?;
    let (year, month) = get_display_date(args)?;

    let store = match args.events.as_deref().or(config.events.as_deref()) {
        Some(path) => load_events_file(path)?,
        None => {
            info!("no events file given, showing an empty calendar");
            EventStore::new()
        }
    };
    let events = store.events_by_date(year);
    info!(year, month, records = store.len(), cap = ctx.layout.visible_slot_cap(), "rendering");

    let layouts = match month {
        Some(month) => {
            let layout = compute_month_layout(year, month, &events, ctx.today, &ctx.layout);
            print_month(&ctx, &layout);
            vec![layout]
        }
        None => {
            let layouts = compute_year_layout(year, &events, ctx.today, &ctx.layout);
            print_year(&ctx, year, &layouts);
            layouts
        }
    };

    if args.legend {
        println!();
        println!("{}", format_legend(&ctx));
        for line in format_national_holidays(&layouts) {
            println!("{}", line);
        }
    }

    if args.pto {
        println!();
        println!("{}", format_pto_counts(&store.users(), &store.pto_counts(year)));
    }

    Ok(())
}
