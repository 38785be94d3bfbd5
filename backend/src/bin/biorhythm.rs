//! Biorhythm command-line binary.
//!
//! Generates a biorhythm series for one birthdate, stores it in the configured
//! repository and prints the series with its statistics as JSON.
//!
//! # Usage
//!
//! ```bash
//! # 365 days ending today
//! cargo run --bin biorhythm -- 1990-05-17
//!
//! # 30 days ending on a given date
//! cargo run --bin biorhythm -- 1990-05-17 30 2024-06-30
//! ```
//!
//! # Environment Variables
//!
//! - `REPOSITORY_TYPE`: Repository backend; overrides `[repository] type` (default: local)
//! - `RUST_LOG`: Log level (default: info)
//!
//! A `biorhythm.toml` in the standard locations sets the repository type, the
//! calculation defaults and the recent-activity window (`[statistics]`).

use std::env;

use anyhow::{bail, Context};
use chrono::{NaiveDate, Utc};
use serde_json::json;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use biorhythm_engine::config::EngineConfig;
use biorhythm_engine::db::{self, services as db_services};
use biorhythm_engine::models::NewPerson;
use biorhythm_engine::routes::calculations::CalculationRequest;
use biorhythm_engine::routes::timeseries::TimeseriesQuery;
use biorhythm_engine::services;

const USAGE: &str = "usage: biorhythm <BIRTHDATE> [DAYS] [TARGET_DATE]  (dates as YYYY-MM-DD)";

struct Args {
    birthdate: NaiveDate,
    days: Option<u32>,
    target_date: Option<NaiveDate>,
}

fn parse_date(value: &str, name: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .with_context(|| format!("Invalid {} '{}'. Use YYYY-MM-DD", name, value))
}

fn parse_args() -> anyhow::Result<Args> {
    let args: Vec<String> = env::args().skip(1).collect();
    if args.is_empty() || args.len() > 3 || args.iter().any(|a| a == "-h" || a == "--help") {
        bail!(USAGE);
    }

    let birthdate = parse_date(&args[0], "birthdate")?;
    let days = args
        .get(1)
        .map(|d| d.parse::<u32>().with_context(|| format!("Invalid day count '{}'", d)))
        .transpose()?;
    let target_date = args
        .get(2)
        .map(|d| parse_date(d, "target date"))
        .transpose()?;

    Ok(Args {
        birthdate,
        days,
        target_date,
    })
}

fn load_config() -> EngineConfig {
    match EngineConfig::from_default_location() {
        Ok(config) => config,
        Err(e) => {
            warn!("Using default configuration: {}", e);
            EngineConfig::default()
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = parse_args()?;
    let config = load_config();

    db::init_repository(&config)?;
    let repo = db::get_repository()?.as_ref();
    info!("Repository initialized successfully");

    let now = Utc::now();
    let person = db_services::create_person(repo, &NewPerson::new("cli", args.birthdate), now)
        .await
        .context("Failed to store person")?;

    let mut request = CalculationRequest::new(person.id);
    request.days = args.days;
    request.target_date = args.target_date;

    let outcome = services::calculate(repo, &request, &config.calculation, now).await?;
    info!(
        "{} ({} data points)",
        outcome.message, outcome.data_points_created
    );

    let series = services::person_timeseries(repo, person.id, &TimeseriesQuery::default()).await?;
    let statistics = services::person_statistics(repo, person.id).await?;
    let global =
        services::global_statistics(repo, now, config.statistics.recent_activity_days).await?;

    let output = json!({
        "calculation": outcome.calculation,
        "series": series,
        "statistics": statistics.statistics,
        "recent_activity": global.recent_activity,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
