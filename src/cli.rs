//! Command-line interface definitions for tenki_weather.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! All arguments can be provided via command-line flags or environment variables.

use crate::extract::ExtractMode;
use crate::scrapers::tenki::{DEFAULT_CITY, DEFAULT_URL, parse_url};
use clap::{Args, Parser, Subcommand};
use url::Url;

/// Command-line arguments for the tenki_weather application.
///
/// # Examples
///
/// ```sh
/// # Serve GET /today on port 8000
/// tenki_weather serve
///
/// # Print today, tomorrow and the 10-day outlook once
/// tenki_weather scrape --mode full
///
/// # Mail today's JSON (SMTP_* and TO_ADDR from the environment)
/// tenki_weather mail
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Forecast page to scrape
    #[arg(long, global = true, env = "TENKI_URL", default_value = DEFAULT_URL, value_parser = parse_url)]
    pub url: Url,

    /// City label stamped on every row
    #[arg(long, global = true, env = "TENKI_CITY", default_value = DEFAULT_CITY)]
    pub city: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the extraction over HTTP
    Serve(ServeArgs),
    /// Scrape once and print or write the JSON
    Scrape(ScrapeArgs),
    /// Scrape (or fetch from a deployed endpoint) and mail the JSON as an attachment
    Mail(MailArgs),
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Address to bind
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0")]
    pub bind: String,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = 8000)]
    pub port: u16,
}

#[derive(Args, Debug)]
pub struct ScrapeArgs {
    /// Which sections to extract
    #[arg(short, long, value_enum, default_value = "full")]
    pub mode: ExtractMode,

    /// Write `<YYYYMMDD>_today.json` here instead of printing to stdout
    #[arg(short, long)]
    pub output_dir: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct MailArgs {
    /// SMTP relay host
    #[arg(long, env = "SMTP_HOST", default_value = "smtp.gmail.com")]
    pub smtp_host: String,

    /// SMTP relay port (STARTTLS)
    #[arg(long, env = "SMTP_PORT", default_value_t = 587)]
    pub smtp_port: u16,

    /// SMTP login user
    #[arg(long, env = "SMTP_USER")]
    pub smtp_user: Option<String>,

    /// SMTP login password
    #[arg(long, env = "SMTP_PASS", hide_env_values = true)]
    pub smtp_pass: Option<String>,

    /// Recipient address
    #[arg(long, env = "TO_ADDR")]
    pub to_addr: Option<String>,

    /// Sender address (defaults to the SMTP user)
    #[arg(long, env = "MAIL_FROM")]
    pub mail_from: Option<String>,

    /// Prefix for the mail subject
    #[arg(long, env = "MAIL_SUBJECT_PREFIX", default_value = "[GET_TEMP]")]
    pub subject_prefix: String,

    /// Deployed `/today` endpoint to try before scraping locally
    #[arg(long, env = "TEMP_API_URL", value_parser = parse_url)]
    pub api_url: Option<Url>,

    /// Total fetch+send attempts
    #[arg(long, default_value_t = 3)]
    pub attempts: usize,

    /// Seconds to wait between attempts
    #[arg(long, default_value_t = 20)]
    pub delay_secs: u64,
}
