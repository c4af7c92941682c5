//! # Rambam Sky Command Line
//!
//! Prints the Kiddush HaChodesh positions of the Sun and Moon for a date:
//! a table plus an ASCII sky chart by default, JSON with `--json`, or one
//! line per day with `--days N`.

use anyhow::Context;
use chrono::{NaiveDate, Utc};
use clap::Parser;
use rambam_sky::engine::start_of_day;
use rambam_sky::renderer::{draw_ascii, render_series};
use rambam_sky::{AstronomicalConstants, PositionEngine};
use std::path::PathBuf;

/// Longest run `--days` accepts, one century.
const MAX_SERIES_DAYS: i64 = 36_525;

#[derive(Parser)]
#[command(name = "rambam-sky")]
#[command(about = "Sun and Moon positions from Rambam's Kiddush HaChodesh model")]
struct Cli {
    /// Date as YYYY-MM-DD (proleptic Gregorian, midnight UTC); defaults to today
    #[arg(long)]
    date: Option<String>,

    /// Print a run of this many consecutive days instead of a single table
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=MAX_SERIES_DAYS))]
    days: Option<u32>,

    /// Constants file; missing or invalid files fall back to Rambam's values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Fail instead of falling back when the constants file is invalid
    #[arg(long, requires = "config")]
    strict: bool,

    /// Emit JSON instead of text
    #[arg(long)]
    json: bool,
}

fn parse_date(text: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .with_context(|| format!("invalid date `{text}`, expected YYYY-MM-DD"))
}

fn load_constants(cli: &Cli) -> anyhow::Result<AstronomicalConstants> {
    match &cli.config {
        Some(path) if cli.strict => AstronomicalConstants::try_load_from_path(path)
            .with_context(|| format!("loading constants from {}", path.display())),
        Some(path) => Ok(AstronomicalConstants::load_from_path(path)),
        None => Ok(AstronomicalConstants::load()),
    }
}

/// Main application entry point.
fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let date = match &cli.date {
        Some(text) => parse_date(text)?,
        None => Utc::now().date_naive(),
    };
    let engine = PositionEngine::new(load_constants(&cli)?);
    log::debug!("rendering {date} against epoch {}", engine.constants().epoch.base_date);

    if let Some(days) = cli.days {
        let snapshots = engine.series(start_of_day(date), days);
        if cli.json {
            println!("{}", serde_json::to_string_pretty(&snapshots)?);
        } else {
            print!("{}", render_series(date, &snapshots));
        }
        return Ok(());
    }

    let snapshot = engine.snapshot_on(date);
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        println!("{date}\n");
        draw_ascii(&snapshot);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_iso_dates() {
        assert_eq!(
            parse_date("1177-04-03").unwrap(),
            NaiveDate::from_ymd_opt(1177, 4, 3).unwrap()
        );
        assert!(parse_date("03/04/1177").is_err());
        assert!(parse_date("2024-02-30").is_err());
    }

    #[test]
    fn cli_accepts_all_flags() {
        let cli = Cli::try_parse_from([
            "rambam-sky",
            "--date",
            "2024-03-11",
            "--days",
            "30",
            "--config",
            "sky.toml",
            "--strict",
            "--json",
        ])
        .unwrap();
        assert_eq!(cli.date.as_deref(), Some("2024-03-11"));
        assert_eq!(cli.days, Some(30));
        assert!(cli.strict && cli.json);
    }

    #[test]
    fn days_are_bounded() {
        let longest = MAX_SERIES_DAYS.to_string();
        let cli = Cli::try_parse_from(["rambam-sky", "--days", longest.as_str()]).unwrap();
        assert_eq!(cli.days, Some(36_525));

        assert!(Cli::try_parse_from(["rambam-sky", "--days", "0"]).is_err());
        assert!(Cli::try_parse_from(["rambam-sky", "--days", "36526"]).is_err());
        assert!(Cli::try_parse_from(["rambam-sky", "--days", "4000000000"]).is_err());
    }

    #[test]
    fn strict_needs_a_config_path() {
        assert!(Cli::try_parse_from(["rambam-sky", "--strict"]).is_err());
    }
}
