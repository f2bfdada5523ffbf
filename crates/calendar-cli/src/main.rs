//! `calendar` CLI -- add, edit, move, and view events from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # A one-off event
//! calendar add --date 2025-06-25 --time 09:00 --title "Deadline" --description "ship v1"
//!
//! # Every Friday until the end of the year
//! calendar add --date 2025-06-27 --time 10:15 --title Standup --description sync \
//!     --repeat weekly --days 5 --until 2025-12-31
//!
//! # Every other month
//! calendar add --date 2025-01-15 --time 12:00 --title Review --description quarterly \
//!     --repeat custom --unit month --interval 2
//!
//! # Change fields, move a one-off event, delete
//! calendar edit 3 --time 11:00
//! calendar move 0 --to 2025-06-30
//! calendar delete 2
//!
//! # What is on a day, a month grid, everything
//! calendar day 2025-07-04
//! calendar month 2025-07
//! calendar list
//! ```
//!
//! Rejected changes print `error: <reason>` and exit with status 1 without
//! touching the store.

mod config;
mod render;

use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use calendar_engine::{
    apply_add, apply_delete, apply_move, apply_update, expand_occurrences, month_view, Calendar,
    EventDraft, EventId, EventStore, Rejection, RecurrenceRule, RecurrenceUnit,
};
use chrono::{Datelike, NaiveDate, NaiveTime};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

#[derive(Parser)]
#[command(
    name = "calendar",
    version,
    about = "Personal calendar with recurring events"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Event store file (overrides CALENDAR_STORE and the config file)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Configuration file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a new event
    Add {
        #[arg(long)]
        date: NaiveDate,
        /// Time of day, HH:MM (24-hour)
        #[arg(long, value_parser = parse_time)]
        time: NaiveTime,
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
        #[command(flatten)]
        rule: RuleArgs,
    },
    /// Change fields of an existing event; unspecified fields keep their values
    Edit {
        #[arg(value_parser = parse_id)]
        id: EventId,
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long, value_parser = parse_time)]
        time: Option<NaiveTime>,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[command(flatten)]
        rule: RuleArgs,
    },
    /// Move a one-off event to another date
    Move {
        #[arg(value_parser = parse_id)]
        id: EventId,
        #[arg(long)]
        to: NaiveDate,
    },
    /// Delete an event
    Delete {
        #[arg(value_parser = parse_id)]
        id: EventId,
    },
    /// Show the events occurring on a date
    Day { date: NaiveDate },
    /// Show a month grid (YYYY-MM) and its agenda
    Month {
        #[arg(value_parser = parse_month)]
        month: YearMonth,
    },
    /// List every stored event
    List,
}

#[derive(Args)]
struct RuleArgs {
    /// Recurrence kind
    #[arg(long, value_enum)]
    repeat: Option<Repeat>,
    /// Weekdays for --repeat weekly, 0 = Sunday .. 6 = Saturday (e.g. 1,3,5)
    #[arg(long, value_delimiter = ',')]
    days: Vec<u8>,
    /// Unit for --repeat custom
    #[arg(long, value_enum)]
    unit: Option<Unit>,
    /// Interval for --repeat custom
    #[arg(long)]
    interval: Option<u32>,
    /// Last date the rule may occur on (inclusive)
    #[arg(long)]
    until: Option<NaiveDate>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Repeat {
    None,
    Daily,
    Weekly,
    Monthly,
    Custom,
}

#[derive(Clone, Copy, ValueEnum)]
enum Unit {
    Day,
    Week,
    Month,
}

impl From<Unit> for RecurrenceUnit {
    fn from(unit: Unit) -> Self {
        match unit {
            Unit::Day => RecurrenceUnit::Day,
            Unit::Week => RecurrenceUnit::Week,
            Unit::Month => RecurrenceUnit::Month,
        }
    }
}

impl RuleArgs {
    fn has_rule_details(&self) -> bool {
        !self.days.is_empty()
            || self.unit.is_some()
            || self.interval.is_some()
            || self.until.is_some()
    }

    /// `Ok(None)` means no `--repeat` was given.
    fn build(&self) -> Result<Option<RecurrenceRule>> {
        let Some(repeat) = self.repeat else {
            if self.has_rule_details() {
                anyhow::bail!("--days, --unit, --interval and --until require --repeat");
            }
            return Ok(None);
        };

        let rule = match repeat {
            Repeat::None => {
                if self.has_rule_details() {
                    anyhow::bail!("--repeat none takes no other rule options");
                }
                return Ok(Some(RecurrenceRule::None));
            }
            Repeat::Daily => RecurrenceRule::Daily { end_date: None },
            Repeat::Weekly => {
                if self.days.is_empty() {
                    anyhow::bail!("--repeat weekly requires --days");
                }
                RecurrenceRule::weekly(self.days.iter().copied())
            }
            Repeat::Monthly => RecurrenceRule::Monthly { end_date: None },
            Repeat::Custom => {
                let unit = self
                    .unit
                    .context("--repeat custom requires --unit day|week|month")?;
                RecurrenceRule::custom(unit.into(), self.interval.unwrap_or(1))
            }
        };

        Ok(Some(match self.until {
            Some(cutoff) => rule.until(cutoff),
            None => rule,
        }))
    }
}

fn parse_time(s: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(s.trim(), "%H:%M")
        .map_err(|_| format!("expected HH:MM (24-hour), got '{}'", s))
}

fn parse_id(s: &str) -> Result<EventId, String> {
    s.trim()
        .trim_start_matches('#')
        .parse::<u64>()
        .map(EventId)
        .map_err(|_| format!("expected an event id such as 3 or #3, got '{}'", s))
}

#[derive(Clone, Copy)]
struct YearMonth {
    year: i32,
    month: u32,
}

fn parse_month(s: &str) -> Result<YearMonth, String> {
    let first = NaiveDate::parse_from_str(&format!("{}-01", s.trim()), "%Y-%m-%d")
        .map_err(|_| format!("expected YYYY-MM, got '{}'", s))?;
    Ok(YearMonth {
        year: first.year(),
        month: first.month(),
    })
}

fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        eprintln!("error: {:#}", err);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?;
    init_tracing(&config.log_filter);
    match &config.source {
        Some(path) => info!(path = %path.display(), "loaded config"),
        None => info!("no config file found, using defaults"),
    }

    let store = EventStore::new(config.resolve_store_path(cli.store));
    let calendar = store
        .load()
        .with_context(|| format!("Failed to load events from {}", store.path().display()))?;

    match cli.command {
        Commands::Add {
            date,
            time,
            title,
            description,
            rule,
        } => {
            let mut draft = EventDraft::new(date, time, title, description);
            draft.recurrence = rule.build()?;
            let (next, id) = apply_add(&calendar, draft)?;
            save(&store, &next)?;
            if let Some(event) = next.get(id) {
                println!("Added {}", render::event_line(event));
            }
        }
        Commands::Edit {
            id,
            date,
            time,
            title,
            description,
            rule,
        } => {
            let existing = calendar
                .get(id)
                .ok_or(Rejection::EventNotFound { id })?;
            let mut draft = EventDraft::from(existing);
            if date.is_some() {
                draft.date = date;
            }
            if time.is_some() {
                draft.time = time;
            }
            if let Some(title) = title {
                draft.title = title;
            }
            if let Some(description) = description {
                draft.description = description;
            }
            if let Some(recurrence) = rule.build()? {
                draft.recurrence = Some(recurrence);
            }
            let next = apply_update(&calendar, id, draft)?;
            save(&store, &next)?;
            if let Some(event) = next.get(id) {
                println!("Updated {}", render::event_line(event));
            }
        }
        Commands::Move { id, to } => {
            let next = apply_move(&calendar, id, to)?;
            save(&store, &next)?;
            println!("Moved {} to {}", id, to);
        }
        Commands::Delete { id } => {
            let existed = calendar.contains(id);
            let next = apply_delete(&calendar, id);
            save(&store, &next)?;
            if existed {
                println!("Deleted {}", id);
            } else {
                println!("No event {}; nothing deleted", id);
            }
        }
        Commands::Day { date } => {
            let events = expand_occurrences(&calendar, date);
            print!("{}", render::day(date, &events));
        }
        Commands::Month {
            month: YearMonth { year, month },
        } => {
            let view = month_view(&calendar, year, month)
                .with_context(|| format!("Invalid month: {}-{:02}", year, month))?;
            print!("{}", render::month(&view));
        }
        Commands::List => {
            if calendar.is_empty() {
                println!("No events.");
            }
            for event in &calendar {
                println!("{}", render::event_line(event));
            }
        }
    }

    Ok(())
}

fn save(store: &EventStore, calendar: &Calendar) -> Result<()> {
    store
        .save(calendar)
        .with_context(|| format!("Failed to save events to {}", store.path().display()))
}

/// Log to stderr so stdout stays clean for the command's own output.
fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
