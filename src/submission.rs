//! Webhook submission of a chosen plan.
//!
//! A [`Submitter`] allows one request in flight at a time. A second call made
//! while the first is outstanding fails fast with
//! [`AppError::SubmissionInFlight`]. Requests carry a bounded timeout and are
//! never retried automatically: the user has to submit again.

use crate::config::WebhookSettings;
use crate::error::AppError;
use crate::pricing::{Configuration, Quote};
use crate::session::PlanSession;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Offset, SecondsFormat, TimeZone, Utc};
use reqwest::Client;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{error, info, warn};

/// JSON body posted to the webhook
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionPayload {
    pub name: String,
    pub total_price: i64,
    pub deposit: i64,
    pub monthly_payment: f64,
    pub months: u32,
    #[serde(serialize_with = "serialize_utc_iso")]
    pub payoff_date: DateTime<Utc>,
    pub due_date: Option<NaiveDate>,
    pub is_sliding_scale: bool,
    pub original_price: Option<i64>,
    pub is_extended: bool,
    #[serde(serialize_with = "serialize_utc_iso")]
    pub timestamp: DateTime<Utc>,
    pub deposit_percent: Option<f64>,
    pub custom_deposit: Option<i64>,
}

impl SubmissionPayload {
    /// Snapshot `quote` for submission under `name`.
    ///
    /// `now` is the moment the quote was computed for. Its time zone turns
    /// the quote's local payoff date-time into an instant, and the instant
    /// itself becomes the submission timestamp.
    pub fn build<Tz: TimeZone>(
        name: &str,
        config: &Configuration,
        quote: &Quote,
        now: &DateTime<Tz>,
    ) -> Result<Self, AppError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::EmptyName);
        }

        Ok(Self {
            name: name.to_string(),
            total_price: quote.total_price,
            deposit: quote.deposit,
            monthly_payment: quote.monthly_payment,
            months: quote.months,
            payoff_date: local_to_utc(&now.timezone(), now.offset().fix(), quote.payoff_date),
            due_date: config.due_date,
            is_sliding_scale: config.sliding_scale_enabled,
            original_price: config.original_price,
            is_extended: config.extended_term,
            timestamp: now.with_timezone(&Utc),
            deposit_percent: quote.deposit_selection.preset_fraction(),
            custom_deposit: quote.deposit_selection.custom_amount(),
        })
    }
}

/// Resolve a wall-clock time in `tz`. A time skipped by a DST jump falls
/// back to `fallback`, the offset in force when the quote was made.
fn local_to_utc<Tz: TimeZone>(
    tz: &Tz,
    fallback: FixedOffset,
    local: NaiveDateTime,
) -> DateTime<Utc> {
    match tz.from_local_datetime(&local).earliest() {
        Some(resolved) => resolved.with_timezone(&Utc),
        None => Utc.from_utc_datetime(&(local - fallback)),
    }
}

fn serialize_utc_iso<S: serde::Serializer>(
    value: &DateTime<Utc>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Posts plans to the configured webhook
pub struct Submitter {
    client: Client,
    settings: WebhookSettings,
    in_flight: AtomicBool,
}

/// Releases the in-flight latch on every exit path
struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Submitter {
    pub fn new(settings: WebhookSettings) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .build()?;
        Ok(Self::with_client(client, settings))
    }

    /// Use a prebuilt client, e.g. one with a shorter timeout
    pub fn with_client(client: Client, settings: WebhookSettings) -> Self {
        Self {
            client,
            settings,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// POST `payload` to the webhook, succeeding on any 2xx status
    pub async fn send(&self, payload: &SubmissionPayload) -> Result<(), AppError> {
        if !self.settings.enabled {
            return Err(AppError::ConfigError(
                "Plan submission is disabled".to_string(),
            ));
        }

        let _guard = InFlightGuard::acquire(&self.in_flight).ok_or_else(|| {
            warn!("Submission rejected, another one is in flight");
            AppError::SubmissionInFlight
        })?;

        info!(
            name = %payload.name,
            total_price = payload.total_price,
            months = payload.months,
            "Submitting payment plan"
        );

        let response = self
            .client
            .post(&self.settings.url)
            .header("Content-Type", "application/json")
            .json(payload)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, timeout = e.is_timeout(), "Submission request failed");
                AppError::HttpRequest(e)
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!(%status, "Webhook rejected submission");
            return Err(AppError::UpstreamError { status, message });
        }

        info!(status = %response.status(), "Payment plan submitted");
        Ok(())
    }
}

/// Confirm the session's plan under `name` and close the session on success
///
/// Refused while the quote has warnings or the name is blank. A failed
/// request leaves the session editable so the user can try again.
pub async fn submit_plan<Tz: TimeZone>(
    session: &mut PlanSession,
    submitter: &Submitter,
    name: &str,
    now: &DateTime<Tz>,
) -> Result<SubmissionPayload, AppError> {
    if session.is_submitted() {
        return Err(AppError::SessionClosed);
    }

    let quote = session.quote(now.naive_local());
    if quote.has_warnings() {
        return Err(AppError::ValidationFailed(
            quote.warnings.iter().copied().collect(),
        ));
    }

    let payload = SubmissionPayload::build(name, session.config(), &quote, now)?;
    submitter.send(&payload).await?;

    session.mark_submitted();
    Ok(payload)
}
