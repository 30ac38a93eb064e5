//! Command implementations for the CLI
//!
//! - quote: compute and display a payment plan
//! - submit: compute a plan and post it to the webhook
//! - config: configuration display and validation

pub mod config;
pub mod quote;
pub mod submit;

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Local, NaiveDate, TimeZone};
use payplan::config::Settings;
use payplan::{Configuration, PlanSession};
use tracing::debug;

use crate::cli::PlanArgs;

/// Build a session from the launch query and replay the user's selections
pub fn prepare_session(settings: &Settings, plan: &PlanArgs) -> Result<PlanSession> {
    let config = Configuration::from_query(&plan.query, &settings.pricing);
    debug!(?config, "Configuration built from query");

    let mut session = PlanSession::new(config);

    if let Some(price) = plan.price {
        if !session.set_price(price)? {
            debug!("--price ignored, sliding scale is not enabled");
        }
    }
    if let Some(months) = plan.months {
        session.set_months(months)?;
    }
    if let Some(fraction) = plan.preset {
        session.select_preset(fraction)?;
    }
    if let Some(custom) = &plan.custom {
        session.set_custom_deposit_input(custom)?;
    }

    Ok(session)
}

/// The current local time, or the start of the `--today` date.
///
/// A pinned date always resolves to the same instant so repeated runs print
/// the same plan. Where a DST change skips midnight the first hour after it
/// is used.
pub fn resolve_now(today: Option<&str>) -> Result<DateTime<Local>> {
    let Some(text) = today else {
        return Ok(Local::now());
    };

    let date = NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .with_context(|| format!("Invalid --today date '{}', expected YYYY-MM-DD", text))?;
    start_of_day(&Local, date)
        .with_context(|| format!("--today date '{}' has no local midnight", text))
}

fn start_of_day<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> Option<DateTime<Tz>> {
    let midnight = date.and_hms_opt(0, 0, 0)?;
    tz.from_local_datetime(&midnight)
        .earliest()
        .or_else(|| tz.from_local_datetime(&(midnight + Duration::hours(1))).earliest())
}

#[cfg(test)]
mod tests {
    use super::*;
    use payplan::DepositSelection;

    #[test]
    fn test_prepare_session_applies_selections() {
        let plan = PlanArgs {
            query: "slidingScale=true&extended=true".to_string(),
            price: Some(6000),
            months: Some(12),
            custom: Some("900".to_string()),
            ..PlanArgs::default()
        };
        let session = prepare_session(&Settings::default(), &plan).unwrap();

        assert_eq!(session.inputs().selected_price, 6000);
        assert_eq!(session.inputs().months, 12);
        assert_eq!(session.inputs().deposit, DepositSelection::Custom(900));
    }

    #[test]
    fn test_prepare_session_rejects_bad_preset() {
        let plan = PlanArgs {
            preset: Some(2.0),
            ..PlanArgs::default()
        };
        assert!(prepare_session(&Settings::default(), &plan).is_err());
    }

    #[test]
    fn test_resolve_now() {
        let now = resolve_now(Some("2025-03-01")).unwrap();
        assert_eq!(now.date_naive(), NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
        assert!(resolve_now(Some("March 1st")).is_err());
        assert!(resolve_now(None).is_ok());
    }

    #[test]
    fn test_pinned_today_is_reproducible() {
        let first = resolve_now(Some("2025-03-01")).unwrap();
        let second = resolve_now(Some("2025-03-01")).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.time(), chrono::NaiveTime::from_hms_opt(0, 0, 0).unwrap());

        // same quote on every run
        let session = prepare_session(&Settings::default(), &PlanArgs::default()).unwrap();
        assert_eq!(
            session.quote(first.naive_local()),
            session.quote(second.naive_local())
        );
    }

    #[test]
    fn test_start_of_day_in_fixed_offset() {
        let tz = chrono::FixedOffset::west_opt(5 * 3600).unwrap();
        let start = start_of_day(&tz, NaiveDate::from_ymd_opt(2025, 11, 2).unwrap()).unwrap();
        assert_eq!(start.to_rfc3339(), "2025-11-02T00:00:00-05:00");
    }
}
