//! Email delivery of the day's forecast JSON.
//!
//! The mail command obtains today's rows (from a deployed `/today` endpoint
//! when one is configured, otherwise or on failure by scraping directly) and
//! sends them as a `<YYYYMMDD>_today.json` attachment over a STARTTLS SMTP
//! relay. The date in the file name and subject is the current date in Japan.
//!
//! Every SMTP setting must be present; a missing one fails before any
//! connection is attempted.

use crate::cli::MailArgs;
use crate::errors::MailError;
use crate::extract::{ExtractMode, Extraction};
use crate::models::Rows;
use crate::retry::Attempt;
use crate::scrapers::tenki::{Fetcher, scrape};
use crate::utils::{jst_date_stamp, today_file_name, truncate_for_log};
use chrono::{DateTime, Utc};
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::fmt;
use std::time::Duration;
use tracing::{info, instrument, warn};
use url::Url;

/// Validated SMTP and message settings.
#[derive(Clone)]
pub struct MailSettings {
    pub host: String,
    pub port: u16,
    pub user: String,
    pass: String,
    pub from: String,
    pub to: String,
    pub subject_prefix: String,
}

impl fmt::Debug for MailSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("from", &self.from)
            .field("to", &self.to)
            .field("subject_prefix", &self.subject_prefix)
            .finish_non_exhaustive()
    }
}

fn required(value: Option<&str>, name: &'static str) -> Result<String, MailError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(MailError::MissingConfig(name)),
    }
}

impl MailSettings {
    pub fn from_args(args: &MailArgs) -> Result<Self, MailError> {
        let host = required(Some(args.smtp_host.as_str()), "SMTP_HOST")?;
        if args.smtp_port == 0 {
            return Err(MailError::MissingConfig("SMTP_PORT"));
        }
        let user = required(args.smtp_user.as_deref(), "SMTP_USER")?;
        let pass = required(args.smtp_pass.as_deref(), "SMTP_PASS")?;
        let to = required(args.to_addr.as_deref(), "TO_ADDR")?;
        let from = required(args.mail_from.as_deref(), "MAIL_FROM").unwrap_or_else(|_| user.clone());

        Ok(Self {
            host,
            port: args.smtp_port,
            user,
            pass,
            from,
            to,
            subject_prefix: args.subject_prefix.clone(),
        })
    }
}

/// Build the message carrying `rows` as a JSON attachment.
pub fn build_message(
    settings: &MailSettings,
    city: &str,
    rows: &Rows,
    now: DateTime<Utc>,
) -> Result<Message, MailError> {
    let stamp = jst_date_stamp(now);
    let filename = today_file_name(now);
    let subject = format!("{} {} today weather JSON", settings.subject_prefix, stamp);
    let body = format!(
        "Automatic delivery: {} {} weather data for today, see attachment {}.",
        stamp, city, filename
    );

    let payload = serde_json::to_vec(rows)?;
    let attachment =
        Attachment::new(filename).body(payload, ContentType::parse("application/json")?);

    let message = Message::builder()
        .from(settings.from.parse::<Mailbox>()?)
        .to(settings.to.parse::<Mailbox>()?)
        .subject(subject)
        .multipart(
            MultiPart::mixed()
                .singlepart(SinglePart::plain(body))
                .singlepart(attachment),
        )?;
    Ok(message)
}

/// STARTTLS SMTP sender.
pub struct Mailer {
    settings: MailSettings,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl fmt::Debug for Mailer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mailer")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl Mailer {
    pub fn new(settings: MailSettings) -> Result<Self, MailError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)?
            .port(settings.port)
            .credentials(Credentials::new(
                settings.user.clone(),
                settings.pass.clone(),
            ))
            .timeout(Some(Duration::from_secs(30)))
            .build();
        Ok(Self {
            settings,
            transport,
        })
    }

    #[instrument(level = "info", skip_all, fields(host = %self.settings.host, port = self.settings.port))]
    pub async fn send(&self, city: &str, rows: &Rows) -> Result<(), MailError> {
        let message = build_message(&self.settings, city, rows, Utc::now())?;
        info!(user = %self.settings.user, to = %self.settings.to, "Connecting to SMTP relay");
        self.transport.send(message).await?;
        info!("Mail sent");
        Ok(())
    }
}

/// Where today's rows come from: a deployed `/today` endpoint first, a local
/// scrape as fallback.
#[derive(Debug)]
pub struct TodaySource<'a> {
    pub fetcher: &'a Fetcher,
    pub api_url: Option<Url>,
    pub page_url: Url,
    pub city: String,
}

impl TodaySource<'_> {
    #[instrument(level = "info", skip_all, fields(%api_url))]
    async fn from_api(&self, api_url: &Url) -> Result<Rows, MailError> {
        let response = self
            .fetcher
            .client()
            .get(api_url.clone())
            .send()
            .await
            .map_err(|e| MailError::Source(e.to_string()))?;
        info!(status = %response.status(), "Fetched today endpoint");
        let body = response
            .error_for_status()
            .map_err(|e| MailError::Source(e.to_string()))?
            .text()
            .await
            .map_err(|e| MailError::Source(e.to_string()))?;

        let rows: Rows = serde_json::from_str(&body).map_err(|e| {
            MailError::Source(format!(
                "unexpected payload ({e}): {}",
                truncate_for_log(&body, 300)
            ))
        })?;
        if rows.rows.is_empty() {
            return Err(MailError::Source("endpoint returned no rows".to_string()));
        }
        Ok(rows)
    }

    #[instrument(level = "info", skip_all, fields(url = %self.page_url))]
    async fn from_local(&self) -> Result<Rows, MailError> {
        match scrape(self.fetcher, &self.page_url, ExtractMode::Full, &self.city).await? {
            Extraction::Rows(set) => Ok(set.to_rows()),
            Extraction::Minimal(_) => Err(MailError::Source(
                "unexpected minimal extraction".to_string(),
            )),
        }
    }

    /// Today's rows, from the endpoint if configured and working, else scraped locally.
    pub async fn fetch_today(&self) -> Result<Rows, MailError> {
        if let Some(api_url) = &self.api_url {
            match self.from_api(api_url).await {
                Ok(rows) => return Ok(rows),
                Err(e) => warn!(error = %e, "Today endpoint failed; falling back to local scrape"),
            }
        }
        self.from_local().await
    }
}

/// One fetch+send run, retried as a whole.
#[derive(Debug)]
pub struct MailJob<'a> {
    pub source: TodaySource<'a>,
    pub mailer: &'a Mailer,
}

impl Attempt for MailJob<'_> {
    type Output = ();
    type Error = MailError;

    async fn attempt(&self) -> Result<(), MailError> {
        let rows = self.source.fetch_today().await?;
        if let Some(first) = rows.rows.first() {
            info!(
                city = %first.city,
                date = %first.date,
                t_max = ?first.t_max,
                t_min = ?first.t_min,
                rows = rows.rows.len(),
                "Obtained today's data"
            );
        }
        self.mailer.send(&self.source.city, &rows).await
    }
}
