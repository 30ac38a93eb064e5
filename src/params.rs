//! Builds the session [`Configuration`] from launch query parameters.
//!
//! Recognised parameters: `slidingScale`, `originalPrice`, `dueDate`,
//! `extended` and `maxPrice`. Everything else is ignored.

use crate::config::PricingSettings;
use crate::pricing::Configuration;
use chrono::NaiveDate;
use tracing::{debug, warn};

/// Raw launch parameters, before settings are applied
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchParams {
    pub sliding_scale: bool,
    pub original_price: Option<i64>,
    pub due_date: Option<NaiveDate>,
    pub extended: bool,
    pub max_price: Option<i64>,
}

impl LaunchParams {
    /// Parse a query string such as `?slidingScale=true&dueDate=2025-06-01`
    pub fn parse(query: &str) -> Self {
        let query = query.trim().trim_start_matches('?');
        let mut params = Self::default();

        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "slidingScale" => params.sliding_scale = value == "true",
                "extended" => params.extended = value == "true",
                // zero or unparseable counts as absent
                "originalPrice" => {
                    params.original_price = parse_leading_int(&value).filter(|v| *v != 0)
                }
                "maxPrice" => params.max_price = parse_leading_int(&value).filter(|v| *v != 0),
                "dueDate" => {
                    params.due_date = match NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d") {
                        Ok(date) => Some(date),
                        Err(e) => {
                            warn!(value = %value, error = %e, "Ignoring unparseable dueDate");
                            None
                        }
                    }
                }
                other => debug!(param = other, "Ignoring unknown query parameter"),
            }
        }

        params
    }
}

impl Configuration {
    /// Build the configuration for a session launched with `query`
    pub fn from_query(query: &str, settings: &PricingSettings) -> Self {
        Self::from_params(&LaunchParams::parse(query), settings)
    }

    pub fn from_params(params: &LaunchParams, settings: &PricingSettings) -> Self {
        let max_override = if settings.allow_max_price_override {
            params.max_price
        } else {
            None
        };

        let fixed_price = max_override.unwrap_or(settings.fixed_price);
        let sliding_scale_max = max_override.unwrap_or(settings.sliding_scale_max);
        let sliding_scale_min = params.original_price.unwrap_or(settings.default_sliding_min);

        Self {
            fixed_price,
            sliding_scale_enabled: params.sliding_scale,
            sliding_scale_min,
            sliding_scale_max,
            sliding_scale_step: settings.sliding_scale_step,
            original_price: params.original_price,
            due_date: params.due_date,
            extended_term: params.extended,
            deposit_presets: settings.deposit_presets.clone(),
            default_deposit_fraction: settings.default_deposit_fraction,
            default_months: settings.default_months,
            min_deposit: settings.min_deposit,
            min_monthly_payment: settings.min_monthly_payment,
            percent_floor: settings.percent_floor,
            month_rollover: settings.month_rollover,
        }
    }
}

/// Integer prefix of `text`, in the manner of a lenient form field:
/// `"4500"` and `"4500abc"` give 4500, `"abc"` and `""` give `None`.
pub fn parse_leading_int(text: &str) -> Option<i64> {
    let text = text.trim_start();
    let (sign, rest) = match text.as_bytes().first() {
        Some(b'-') => (-1, &text[1..]),
        Some(b'+') => (1, &text[1..]),
        _ => (1, text),
    };

    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return None;
    }

    rest[..digits_len].parse::<i64>().ok().map(|v| sign * v)
}
