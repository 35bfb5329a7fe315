use std::error::Error;
use std::process;

use argh::FromArgs;
use chrono::NaiveDate;
use flexi_logger::Logger;
use log::{debug, warn};

use iso_week::{verify, week_date_at, week_date_now, weeks_in_iso_year, IsoWeekDate, VerifyRange, Week, Zone};

use crate::app_config::{AppConfig, OutputMode};

mod app_config;

/// Compute ISO 8601 week dates (`%G-W%V`).
#[derive(Debug, FromArgs)]
struct Cli {
    /// log debug output to stderr
    #[argh(switch, short = 'v')]
    verbose: bool,
    /// name of the config file, without extension
    #[argh(option, default = "String::from(\"iso_week\")")]
    config: String,
    #[argh(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, FromArgs)]
#[argh(subcommand)]
enum Command {
    Week(WeekCmd),
    Weeks(WeeksCmd),
    Verify(VerifyCmd),
}

/// Print the ISO week of an instant (default: now).
#[derive(Debug, Default, FromArgs)]
#[argh(subcommand, name = "week")]
struct WeekCmd {
    /// seconds since the unix epoch
    #[argh(option)]
    at: Option<i64>,
    /// a calendar date (YYYY-MM-DD) instead of an instant
    #[argh(option)]
    date: Option<NaiveDate>,
    /// local, utc or an offset like +02:00
    #[argh(option)]
    zone: Option<Zone>,
    /// print a `(year, week)` pair
    #[argh(switch)]
    tuple: bool,
    /// print json
    #[argh(switch)]
    json: bool,
}

/// Print the number of ISO weeks in a year.
#[derive(Debug, FromArgs)]
#[argh(subcommand, name = "weeks")]
struct WeeksCmd {
    /// the week-year
    #[argh(positional)]
    year: i32,
}

/// Compare every date around each new year against chrono.
#[derive(Debug, FromArgs)]
#[argh(subcommand, name = "verify")]
struct VerifyCmd {
    /// first year to check
    #[argh(option)]
    from: Option<i32>,
    /// year to stop before
    #[argh(option)]
    to: Option<i32>,
    /// days to check on either side of December 31
    #[argh(option)]
    window: Option<u32>,
    /// local, utc or an offset like +02:00
    #[argh(option)]
    zone: Option<Zone>,
}

fn resolve_week(cmd: &WeekCmd, settings: &AppConfig) -> Result<IsoWeekDate, Box<dyn Error>> {
    let zone = cmd.zone.unwrap_or(settings.zone);
    let week = match (cmd.date, cmd.at) {
        (Some(date), _) => {
            if cmd.zone.is_some() || cmd.at.is_some() {
                warn!("--date {} is a calendar date, ignoring --zone and --at", date);
            }
            date.week_date()
        }
        (None, Some(at)) => week_date_at(at, zone)?,
        (None, None) => week_date_now(zone)?,
    };
    Ok(week)
}

fn run_week(cmd: WeekCmd, settings: &AppConfig) -> Result<(), Box<dyn Error>> {
    let week = resolve_week(&cmd, settings)?;
    let mode = if cmd.json {
        OutputMode::Json
    } else if cmd.tuple {
        OutputMode::Tuple
    } else {
        settings.output
    };
    match mode.as_output() {
        Some(output) => println!("{}", week.render(output)),
        None => println!("{}", serde_json::to_string(&week)?),
    }
    Ok(())
}

fn run_verify(cmd: VerifyCmd, settings: &AppConfig) -> Result<(), Box<dyn Error>> {
    let defaults = settings.verify;
    let range = VerifyRange {
        from_year: cmd.from.unwrap_or(defaults.from_year),
        to_year: cmd.to.unwrap_or(defaults.to_year),
        window: cmd.window.unwrap_or(defaults.window),
    };
    let report = verify(range, cmd.zone.unwrap_or(settings.zone))?;
    println!("{}", report);
    if !report.passed() {
        process::exit(1);
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli: Cli = argh::from_env();

    let level = if cli.verbose { "debug" } else { "warn" };
    let _logger = Logger::try_with_env_or_str(level)?.start()?;

    let settings = AppConfig::load(&cli.config)?;
    debug!("settings: {:?}", settings);

    match cli.command.unwrap_or(Command::Week(WeekCmd::default())) {
        Command::Week(cmd) => run_week(cmd, &settings),
        Command::Weeks(cmd) => {
            println!("{}", weeks_in_iso_year(cmd.year));
            Ok(())
        }
        Command::Verify(cmd) => run_verify(cmd, &settings),
    }
}
