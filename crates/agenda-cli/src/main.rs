//! `agenda` CLI — build day views, parse conflict parameters, merge calendar
//! feeds, and look up contacts from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Day view for today from provider JSON on stdin
//! cat events.json | agenda day
//!
//! # A specific day, with conflicts reported by an upstream assistant
//! agenda day -i events.json --date 2026-03-16 --conflicts "12 PM - 1 PM|3:30 PM - 4 PM"
//!
//! # Human-readable layout using a deployment config
//! agenda day -i events.json --config agenda.toml --format text
//!
//! # Parse a raw conflicts query parameter
//! agenda conflicts "12%20PM%20-%201%20PM"
//!
//! # Merge per-calendar feeds into one list
//! agenda merge --feed work@example.com=work.json --feed family=family.json --config agenda.toml
//!
//! # Contact card by name
//! agenda contact --name alice -i contacts.json
//! ```
//!
//! Diagnostics go to stderr. Set `RUST_LOG` or pass `-v` for more detail.

use agenda_engine::config::AgendaConfig;
use agenda_engine::contact::{Contact, ContactCard, ContactResponse};
use agenda_engine::day_view::{self, DayView};
use agenda_engine::feed::{self, EventsPayload};
use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use clap::{Parser, Subcommand, ValueEnum};
use std::io::{self, Read};
use std::path::Path;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "agenda",
    version,
    about = "Scheduling-assistant day views from calendar JSON"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log engine decisions (conflict matching, feed merging) to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Text,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the day view for one date
    Day {
        /// Events JSON: provider envelope or bare array (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Target date, YYYY-MM-DD (defaults to today; invalid dates fall back to today)
        #[arg(long)]
        date: Option<String>,
        /// Override "today", YYYY-MM-DD
        #[arg(long)]
        today: Option<String>,
        /// Raw conflicts parameter, e.g. "12 PM - 1 PM|3 PM - 4 PM"
        #[arg(long)]
        conflicts: Option<String>,
        /// TOML configuration file
        #[arg(long)]
        config: Option<String>,
        /// IANA timezone, overriding the config file
        #[arg(long)]
        timezone: Option<String>,
        #[arg(long, value_enum, default_value = "json")]
        format: Format,
    },
    /// Parse a conflicts parameter into 24-hour ranges
    Conflicts {
        /// The raw (optionally URL-encoded) parameter value
        param: String,
    },
    /// Merge per-calendar event files into one list ordered by start
    Merge {
        /// A calendar feed as CALENDAR_ID=PATH (repeatable)
        #[arg(long = "feed", required = true)]
        feeds: Vec<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// TOML configuration file
        #[arg(long)]
        config: Option<String>,
        /// IANA timezone, overriding the config file
        #[arg(long)]
        timezone: Option<String>,
    },
    /// Look up a contact by name and print its card
    Contact {
        /// Name, or part of a name, to search for
        #[arg(long)]
        name: String,
        /// Contacts JSON: an array or a provider response (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Day {
            input,
            output,
            date,
            today,
            conflicts,
            config,
            timezone,
            format,
        } => {
            let config = load_config(config.as_deref(), timezone.as_deref())?;
            let today = match today.as_deref() {
                Some(raw) => parse_date(raw)?,
                None => today_in(config.timezone),
            };
            let date = day_view::resolve_target_date(date.as_deref(), today);

            let json = read_input(input.as_deref())?;
            let events =
                feed::parse_events_payload(&json).context("Failed to load events")?;
            let ranges = agenda_engine::parse_conflict_param(conflicts.as_deref());

            let view = day_view::build_day_view(events, &ranges, date, today, &config);
            let rendered = match format {
                Format::Json => format!("{}\n", serde_json::to_string_pretty(&view)?),
                Format::Text => render_text(&view, config.timezone),
            };
            write_output(output.as_deref(), &rendered)?;
        }
        Commands::Conflicts { param } => {
            let ranges = agenda_engine::parse_conflict_param(Some(&param));
            println!("{}", serde_json::to_string_pretty(&ranges)?);
        }
        Commands::Merge {
            feeds,
            output,
            config,
            timezone,
        } => {
            let config = load_config(config.as_deref(), timezone.as_deref())?;
            let loads = feeds
                .iter()
                .map(|spec| -> Result<(String, agenda_engine::error::Result<EventsPayload>)> {
                    let (calendar_id, path) = parse_feed_arg(spec)?;
                    Ok((calendar_id.to_string(), load_feed(path)))
                })
                .collect::<Result<Vec<_>>>()?;

            let merged = feed::merge_loaded(loads, &config.calendars, config.timezone)
                .context("No calendar feed could be loaded")?;
            let rendered = format!("{}\n", serde_json::to_string_pretty(&merged)?);
            write_output(output.as_deref(), &rendered)?;
        }
        Commands::Contact { name, input } => {
            let json = read_input(input.as_deref())?;
            let contact = lookup_contact(&json, &name)?;
            let card = ContactCard::from(&contact);
            println!("{}", serde_json::to_string_pretty(&card)?);
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Load the TOML config (or defaults) and apply the `--timezone` override.
fn load_config(path: Option<&str>, timezone: Option<&str>) -> Result<AgendaConfig> {
    let config = match path {
        Some(path) => AgendaConfig::load(Path::new(path))
            .with_context(|| format!("Failed to load config: {}", path))?,
        None => AgendaConfig::default(),
    };

    match timezone {
        Some(name) => config
            .with_timezone(name)
            .with_context(|| format!("Unknown timezone: '{}'", name)),
        None => Ok(config),
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    day_view::parse_date(raw).context("Invalid --today")
}

fn today_in(tz: Tz) -> NaiveDate {
    Utc::now().with_timezone(&tz).date_naive()
}

/// Split one `CALENDAR_ID=PATH` feed argument.
fn parse_feed_arg(spec: &str) -> Result<(&str, &str)> {
    let Some((calendar_id, path)) = spec.split_once('=') else {
        anyhow::bail!("Invalid feed '{}': expected CALENDAR_ID=PATH", spec);
    };
    if calendar_id.is_empty() {
        anyhow::bail!("Invalid feed '{}': calendar id is empty", spec);
    }
    Ok((calendar_id, path))
}

/// Read and decode one calendar's events. Failures are returned, not raised,
/// so the other calendars can still be merged.
fn load_feed(path: &str) -> agenda_engine::error::Result<EventsPayload> {
    let json = std::fs::read_to_string(path)?;
    feed::parse_payload(&json)
}

/// Find a contact in either a bare JSON array or a provider response.
fn lookup_contact(json: &str, name: &str) -> Result<Contact> {
    if json.trim_start().starts_with('[') {
        let contacts: Vec<Contact> =
            serde_json::from_str(json).context("Failed to parse contacts JSON")?;
        return match agenda_engine::find_contact(&contacts, name) {
            Some(contact) => Ok(contact.clone()),
            None => anyhow::bail!("Contact not found: '{}'", name),
        };
    }

    let response: ContactResponse =
        serde_json::from_str(json).context("Failed to parse contact response")?;
    Ok(response.into_contact()?)
}

/// Plain-text layout: one line per hour, primary event first, then any
/// "also scheduled" annotation and the busy-day advisory.
fn render_text(view: &DayView, tz: Tz) -> String {
    let mut out = format!(
        "{} ({}): {}\n",
        view.heading,
        view.date.format("%Y-%m-%d"),
        view.summary()
    );

    if let Some(advisory) = &view.advisory {
        out.push_str(&format!("! {}\n", advisory.message));
    }

    for slot in &view.slots {
        if slot.is_free() {
            out.push_str(&format!("{:>8}  (free)\n", slot.label));
            continue;
        }

        for (i, group) in slot.groups.iter().enumerate() {
            let label = if i == 0 { slot.label.as_str() } else { "" };
            let primary = &group.primary;
            let mut line = format!(
                "{:>8}  {}  {}",
                label,
                primary.time_range_label(tz),
                primary.title
            );
            if let Some(calendar) = &primary.calendar_name {
                line.push_str(&format!(" [{}]", calendar));
            }
            if primary.is_conflict() {
                line.push_str("  CONFLICT");
            }
            out.push_str(&line);
            out.push('\n');

            if let Some(summary) = group.also_scheduled_summary() {
                out.push_str(&format!("{:>8}    {}\n", "", summary));
            }
        }
    }

    out
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

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            print!("{}", content);
        }
    }
    Ok(())
}
