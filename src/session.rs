//! Form state of a single customer session.
//!
//! The session owns the user's selections and recomputes the quote on demand.
//! Once a plan has been submitted the session is closed and every edit is
//! rejected with [`AppError::SessionClosed`].

use crate::calendar::add_months;
use crate::config::is_valid_fraction;
use crate::error::AppError;
use crate::params::parse_leading_int;
use crate::pricing::{compute_quote, Configuration, DepositSelection, Quote, QuoteInputs};
use chrono::{NaiveDate, NaiveDateTime};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Editing,
    Submitted,
}

#[derive(Debug, Clone)]
pub struct PlanSession {
    config: Configuration,
    inputs: QuoteInputs,
    status: SessionStatus,
}

impl PlanSession {
    pub fn new(config: Configuration) -> Self {
        let selected_price = if config.sliding_scale_enabled {
            config.sliding_scale_min
        } else {
            config.fixed_price
        };
        let inputs = QuoteInputs {
            selected_price,
            months: config.default_months.clamp(1, config.max_months()),
            deposit: DepositSelection::Preset(config.default_deposit_fraction),
        };

        Self {
            config,
            inputs,
            status: SessionStatus::Editing,
        }
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    pub fn inputs(&self) -> &QuoteInputs {
        &self.inputs
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn is_submitted(&self) -> bool {
        self.status == SessionStatus::Submitted
    }

    pub fn quote(&self, now: NaiveDateTime) -> Quote {
        compute_quote(&self.config, &self.inputs, now)
    }

    /// Move the price slider. Returns `Ok(false)` when the price is fixed.
    pub fn set_price(&mut self, price: i64) -> Result<bool, AppError> {
        self.ensure_editable()?;
        if !self.config.sliding_scale_enabled {
            debug!(price, "Price is fixed, ignoring price change");
            return Ok(false);
        }

        self.inputs.selected_price = snap_to_slider(
            price,
            self.config.sliding_scale_min,
            self.config.sliding_scale_max,
            self.config.sliding_scale_step,
        );
        Ok(true)
    }

    pub fn set_months(&mut self, months: u32) -> Result<(), AppError> {
        self.ensure_editable()?;
        self.inputs.months = months.clamp(1, self.config.max_months());
        Ok(())
    }

    /// Pick a preset deposit fraction, replacing any custom amount
    pub fn select_preset(&mut self, fraction: f64) -> Result<(), AppError> {
        self.ensure_editable()?;
        if !is_valid_fraction(fraction) {
            return Err(AppError::InvalidInput(format!(
                "Deposit fraction {} must be in (0, 1]",
                fraction
            )));
        }
        self.inputs.deposit = DepositSelection::Preset(fraction);
        Ok(())
    }

    /// Apply the text of the custom deposit field
    ///
    /// Blank text reverts to the default preset. Text without a leading
    /// integer is ignored and the previous selection kept.
    pub fn set_custom_deposit_input(&mut self, text: &str) -> Result<(), AppError> {
        self.ensure_editable()?;
        if text.trim().is_empty() {
            self.inputs.deposit = DepositSelection::Preset(self.config.default_deposit_fraction);
            return Ok(());
        }

        match parse_leading_int(text) {
            Some(amount) => self.inputs.deposit = DepositSelection::Custom(amount),
            None => debug!(input = text, "Ignoring non-numeric deposit input"),
        }
        Ok(())
    }

    /// Whether the preset button for `fraction` shows as active
    pub fn is_preset_active(&self, fraction: f64) -> bool {
        self.inputs.deposit.preset_fraction() == Some(fraction)
    }

    /// One month before the due date, the date the balance should be paid by
    pub fn recommended_payoff_by(&self) -> Option<NaiveDate> {
        let due = self.config.due_date?;
        add_months(due, -1, self.config.month_rollover)
    }

    /// Position of the selected price along the slider, in `[0, 1]`
    pub fn slider_progress(&self) -> f64 {
        let min = self.config.sliding_scale_min as i128;
        let span = self.config.sliding_scale_max as i128 - min;
        if span <= 0 {
            return 0.0;
        }
        let offset = self.inputs.selected_price as i128 - min;
        (offset as f64 / span as f64).clamp(0.0, 1.0)
    }

    pub(crate) fn mark_submitted(&mut self) {
        self.status = SessionStatus::Submitted;
    }

    fn ensure_editable(&self) -> Result<(), AppError> {
        match self.status {
            SessionStatus::Editing => Ok(()),
            SessionStatus::Submitted => Err(AppError::SessionClosed),
        }
    }
}

/// Snap `value` onto the grid `min + k * step` inside `[min, max]`, rounding
/// half up. Bounds come from the launch query and may sit anywhere in the
/// `i64` range, so the grid math runs in `i128`.
fn snap_to_slider(value: i64, min: i64, max: i64, step: i64) -> i64 {
    let max = max.max(min);
    let value = value.clamp(min, max);
    if step <= 0 {
        return value;
    }

    let (value, min, max, step) = (value as i128, min as i128, max as i128, step as i128);
    let steps = (2 * (value - min) + step) / (2 * step);
    let mut snapped = min + steps * step;
    if snapped > max {
        snapped -= step;
    }
    // min <= snapped <= max, so the conversion cannot fail
    i64::try_from(snapped).unwrap_or(min as i64)
}
