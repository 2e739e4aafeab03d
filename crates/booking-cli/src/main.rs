//! `roomctl`: run the accommodation console's booking checks from the command line.
//!
//! Reads a bookings payload as returned by `GET /accommodation/admin/bookings`
//! (either `{"bookings": [...]}` or a bare array) and prints JSON results.
//!
//! ## Usage
//!
//! ```sh
//! # Which days of 2–4 May are already taken in room R1?
//! roomctl -i bookings.json conflicts --room R1 --from 2024-05-02 --to 2024-05-04
//!
//! # Would a female guest share R1 with a male guest on 1 May?
//! roomctl -i bookings.json gender --room R1 --gender Female --date 2024-05-01
//!
//! # Current maintenance blocks as ranges
//! curl -s "$API/accommodation/admin/bookings?year=2024&month=5" | roomctl groups --blocks-only
//!
//! # Monthly overview grid, timestamps read in Lagos time
//! ROOMCTL_TZ=Africa/Lagos roomctl -i bookings.json overview --year 2024 --month 5
//! ```

use std::io::{self, Read};

use anyhow::{Context, Result};
use booking_engine::{
    api, current_blocks, find_conflicts, gender_conflict_days, group, month_overview,
    month_overview_for_rooms, parse_bookings_json, resolve, Booking, DateNormalizer, DayKey,
    Gender,
};
use clap::{Parser, Subcommand};
use serde_json::json;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "roomctl",
    version,
    about = "Staff-house room booking checks"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Bookings payload file (reads from stdin if omitted)
    #[arg(short, long, global = true)]
    input: Option<String>,

    /// IANA timezone used to read offset timestamps into calendar days
    #[arg(long, env = "ROOMCTL_TZ", default_value = "UTC", global = true)]
    tz: String,

    /// Log filter, e.g. "debug" or "booking_engine=debug" (falls back to RUST_LOG, then "warn")
    #[arg(long, env = "ROOMCTL_LOG", global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// List occupied days in a room over an inclusive date range
    Conflicts {
        #[arg(long)]
        room: String,
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
    },
    /// Check a candidate guest's gender against the room's other guests
    Gender {
        #[arg(long)]
        room: String,
        #[arg(long)]
        gender: String,
        #[arg(long)]
        date: String,
        /// Check every day from --date through this day
        #[arg(long)]
        until: Option<String>,
    },
    /// Merge consecutive-day bookings into ranges
    Groups {
        /// Only Blocked bookings (the unblockable "current blocks")
        #[arg(long)]
        blocks_only: bool,
        /// Only this room
        #[arg(long)]
        room: Option<String>,
        /// Also print the delete requests that would lift each range
        #[arg(long)]
        with_requests: bool,
    },
    /// Show the booking the calendar paints for one room and day
    Resolve {
        #[arg(long)]
        room: String,
        #[arg(long)]
        date: String,
    },
    /// Build the monthly room × day grid
    Overview {
        #[arg(long)]
        year: i32,
        #[arg(long)]
        month: u32,
        /// Comma-separated rooms, in display order (default: rooms in the payload)
        #[arg(long, value_delimiter = ',')]
        rooms: Vec<String>,
    },
    /// Normalize date values to calendar days (does not read bookings)
    Normalize {
        #[arg(required = true)]
        values: Vec<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref());

    let normalizer = DateNormalizer::from_timezone(&cli.tz)
        .with_context(|| format!("Unusable --tz value: {}", cli.tz))?;

    let output = match cli.command {
        Commands::Normalize { values } => {
            let days: Vec<serde_json::Value> = values
                .iter()
                .map(|v| json!({ "input": v, "day": normalizer.normalize(v.as_str()) }))
                .collect();
            serde_json::Value::Array(days)
        }
        Commands::Conflicts { room, from, to } => {
            let bookings = load_bookings(cli.input.as_deref(), &normalizer)?;
            let start = parse_day(&normalizer, "--from", &from)?;
            let end = parse_day(&normalizer, "--to", &to)?;
            serde_json::to_value(find_conflicts(&room, start, end, &bookings))?
        }
        Commands::Gender {
            room,
            gender,
            date,
            until,
        } => {
            let bookings = load_bookings(cli.input.as_deref(), &normalizer)?;
            let start = parse_day(&normalizer, "--date", &date)?;
            let end = match until.as_deref() {
                Some(until) => parse_day(&normalizer, "--until", until)?,
                None => start,
            };
            let candidate = Gender::parse(&gender);
            let days = gender_conflict_days(&room, candidate.as_ref(), start, end, &bookings);
            json!({
                "room": room,
                "gender": candidate,
                "conflict": !days.is_empty(),
                "days": days,
            })
        }
        Commands::Groups {
            blocks_only,
            room,
            with_requests,
        } => {
            let bookings = load_bookings(cli.input.as_deref(), &normalizer)?;
            let bookings: Vec<Booking> = match room {
                Some(room) => bookings.into_iter().filter(|b| b.room_id == room).collect(),
                None => bookings,
            };
            let groups = if blocks_only {
                current_blocks(&bookings)
            } else {
                group(&bookings)
            };
            if with_requests {
                let rows: Vec<serde_json::Value> = groups
                    .iter()
                    .map(|g| json!({ "group": g, "deleteRequests": api::unblock_requests(g) }))
                    .collect();
                serde_json::Value::Array(rows)
            } else {
                serde_json::to_value(groups)?
            }
        }
        Commands::Resolve { room, date } => {
            let bookings = load_bookings(cli.input.as_deref(), &normalizer)?;
            let day = parse_day(&normalizer, "--date", &date)?;
            serde_json::to_value(resolve(bookings.iter().filter(|b| b.occupies(&room, day))))?
        }
        Commands::Overview { year, month, rooms } => {
            let bookings = load_bookings(cli.input.as_deref(), &normalizer)?;
            let rooms: Vec<&str> = rooms.iter().map(String::as_str).collect();
            let grid = if rooms.is_empty() {
                month_overview(year, month, &bookings)
            } else {
                month_overview_for_rooms(year, month, &rooms, &bookings)
            };
            serde_json::to_value(grid.context("Failed to build overview")?)?
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn init_logging(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn parse_day(normalizer: &DateNormalizer, flag: &str, value: &str) -> Result<DayKey> {
    normalizer
        .try_normalize(value)
        .with_context(|| format!("Invalid {} date: {}", flag, value))
}

fn load_bookings(path: Option<&str>, normalizer: &DateNormalizer) -> Result<Vec<Booking>> {
    let json = read_input(path)?;
    let bookings = parse_bookings_json(&json, normalizer).context("Failed to parse bookings")?;
    debug!(count = bookings.len(), "loaded bookings");
    Ok(bookings)
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}
