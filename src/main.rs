//! # tenki_weather
//!
//! Scrapes one public tenki.jp city forecast page and republishes today's and
//! tomorrow's forecast plus the 10-day outlook as structured JSON, served over
//! HTTP or mailed as an attachment.
//!
//! ## Features
//!
//! - Locates the today/tomorrow/10-day sections by heading text, not ids
//! - Extracts high/low temperature, weather text, wind, sunrise/sunset and
//!   precipitation bands, each field independently
//! - Serves `GET /today` with CORS for spreadsheet clients
//! - Mails `<YYYYMMDD>_today.json` over SMTP with a fixed-delay retry
//!
//! ## Usage
//!
//! ```sh
//! tenki_weather serve --port 8000
//! tenki_weather scrape --mode daily -o ./json
//! tenki_weather mail
//! ```
//!
//! ## Architecture
//!
//! 1. **Fetching**: download the forecast page (30 s timeout, fixed identity)
//! 2. **Parsing**: build an HTML tree with `scraper`
//! 3. **Extracting**: anchor headings → per-field patterns → flat rows
//! 4. **Output**: HTTP response, stdout/file, or mail attachment

use clap::Parser;
use std::error::Error;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod errors;
mod extract;
mod mail;
mod models;
mod outputs;
mod retry;
mod scrapers;
mod server;
mod utils;

use chrono::Utc;
use cli::{Cli, Command};
use mail::{MailJob, MailSettings, Mailer, TodaySource};
use retry::{Attempt, Retry};
use scrapers::tenki::{Fetcher, scrape};
use server::{AppState, run_http_server};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("tenki_weather starting up");

    let args = Cli::parse();
    debug!(url = %args.url, city = %args.city, "Parsed CLI arguments");

    let fetcher = Fetcher::new()?;

    match args.command {
        Command::Serve(serve) => {
            let state = AppState {
                fetcher,
                default_url: args.url,
                city: Arc::from(args.city),
            };
            run_http_server(state, &serve.bind, serve.port).await?;
        }
        Command::Scrape(opts) => {
            let extraction = match scrape(&fetcher, &args.url, opts.mode, &args.city).await {
                Ok(extraction) => extraction,
                Err(e) => {
                    error!(error = %e, "Scrape failed");
                    return Err(e.into());
                }
            };
            let payload = extraction.to_json()?;
            match opts.output_dir {
                Some(dir) => {
                    outputs::json::write_today(&payload, &dir, Utc::now()).await?;
                }
                None => println!("{}", serde_json::to_string_pretty(&payload)?),
            }
        }
        Command::Mail(mail_args) => {
            let settings = MailSettings::from_args(&mail_args)?;
            let mailer = Mailer::new(settings)?;
            let job = MailJob {
                source: TodaySource {
                    fetcher: &fetcher,
                    api_url: mail_args.api_url.clone(),
                    page_url: args.url.clone(),
                    city: args.city.clone(),
                },
                mailer: &mailer,
            };
            let retry = Retry::new(
                job,
                mail_args.attempts,
                Duration::from_secs(mail_args.delay_secs),
            );
            retry.attempt().await?;
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    Ok(())
}
