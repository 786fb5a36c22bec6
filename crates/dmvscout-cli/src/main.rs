//! Command line entry point: scrape (or re-parse a checkpoint), enrich with
//! travel times, rank, report, and optionally email the result.

mod notify;
mod report;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use chrono::NaiveDate;
use clap::{ArgAction, Parser};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use dmvscout_core::store::{FINAL_FILE, PRE_ENRICHMENT_FILE};
use dmvscout_core::{load_offices, save_offices, sort_by_travel_time, AppConfig, OfficeRecord};
use dmvscout_distance::{enrich_offices, DistanceClient};
use dmvscout_scraper::{scrape_offices, Applicant, ScrapePolicy, WebDriverSession};

const HTTP_TIMEOUT_SECS: u64 = 30;

/// Exit status when `--target-date` was given but no office qualified, so
/// no email went out. Scripts key off this to tell "ran fine, nothing
/// closer" apart from a hard failure.
const NO_EMAIL_EXIT: u8 = 10;

#[derive(Debug, Parser)]
#[command(name = "dmvscout")]
#[command(about = "Scrape DMV appointment availability and rank offices by travel time")]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Skip scraping and load offices from a previously written JSON file.
    #[arg(short, long, value_name = "FILE")]
    parse: Option<PathBuf>,

    /// Query the distance matrix API and attach travel times.
    #[arg(short, long, default_value_t = true, action = ArgAction::Set)]
    update_distance: bool,

    /// Send an email showing the 2 closest offices, if either has an
    /// appointment before this date (YYYY-MM-DD).
    #[arg(short = 'd', long)]
    target_date: Option<NaiveDate>,

    /// Only scrape the first N listing pages.
    #[arg(short, long)]
    max_page_count: Option<usize>,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let config = dmvscout_core::load_config(&cli.config)?;
    let mut offices = gather_offices(&cli, &config).await?;

    if cli.update_distance {
        let client = DistanceClient::new(&config.maps_api_key, HTTP_TIMEOUT_SECS)?;
        enrich_offices(&client, &config.starting_addr, &mut offices).await;
    }

    sort_by_travel_time(&mut offices);
    save_offices(Path::new(FINAL_FILE), &offices)?;

    let Some(target_date) = cli.target_date else {
        print!("{}", report::render_table(&offices));
        return Ok(ExitCode::SUCCESS);
    };

    if !notify::any_qualifies(&offices, target_date) {
        println!("No email sent.");
        return Ok(ExitCode::from(NO_EMAIL_EXIT));
    }

    let closest = &offices[..offices.len().min(2)];
    notify::send_report(&config, report::render_table(closest))?;
    println!("Email sent.");
    Ok(ExitCode::SUCCESS)
}

/// Produces the office list, either by re-parsing a checkpoint file or by
/// running a full browser scrape. A fresh scrape is checkpointed to
/// `most_recent_pre.json` before enrichment so a distance-stage failure
/// never costs the scraped data.
async fn gather_offices(cli: &Cli, config: &AppConfig) -> anyhow::Result<Vec<OfficeRecord>> {
    if let Some(input) = &cli.parse {
        info!(file = %input.display(), "loading offices from file, skipping scrape");
        return Ok(load_offices(input)?);
    }

    info!("scraping the DMV website for office/appointment info");
    let session =
        WebDriverSession::connect(&config.scrape.webdriver_url, config.scrape.headless).await?;
    let applicant = Applicant {
        license_number: config.driver_license_number.clone(),
        date_of_birth: config.dob.clone(),
    };
    let max_pages = cli.max_page_count.or(config.max_page_count);
    let offices = scrape_offices(
        session,
        ScrapePolicy::from(&config.scrape),
        &applicant,
        max_pages,
    )
    .await?;

    if let Err(e) = save_offices(Path::new(PRE_ENRICHMENT_FILE), &offices) {
        warn!(error = %e, "failed to write pre-enrichment checkpoint");
    }
    Ok(offices)
}
