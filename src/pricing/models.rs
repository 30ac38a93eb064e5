use crate::calendar::MonthRollover;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Fraction of the total used for the percent deposit floor
pub const MIN_DEPOSIT_PERCENT: f64 = 0.10;

pub const STANDARD_MAX_MONTHS: u32 = 9;
pub const EXTENDED_MAX_MONTHS: u32 = 12;

/// Price configuration for one session, built once and never mutated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    pub fixed_price: i64,
    pub sliding_scale_enabled: bool,
    pub sliding_scale_min: i64,
    pub sliding_scale_max: i64,
    pub sliding_scale_step: i64,
    pub original_price: Option<i64>,
    pub due_date: Option<NaiveDate>,
    pub extended_term: bool,
    pub deposit_presets: Vec<f64>,
    pub default_deposit_fraction: f64,
    pub default_months: u32,
    pub min_deposit: i64,
    pub min_monthly_payment: i64,
    pub percent_floor: bool,
    pub month_rollover: MonthRollover,
}

impl Configuration {
    pub fn max_months(&self) -> u32 {
        if self.extended_term {
            EXTENDED_MAX_MONTHS
        } else {
            STANDARD_MAX_MONTHS
        }
    }

    /// Whether the 10%-of-total deposit floor applies to this configuration
    pub fn percent_floor_active(&self) -> bool {
        self.percent_floor && !self.sliding_scale_enabled
    }
}

/// The deposit choice. Exactly one of preset or custom is active.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum DepositSelection {
    /// Fraction of the total price, `0 < f <= 1`
    Preset(f64),
    /// Amount typed by the user, kept raw even when out of range
    Custom(i64),
}

impl DepositSelection {
    pub fn preset_fraction(&self) -> Option<f64> {
        match self {
            Self::Preset(f) => Some(*f),
            Self::Custom(_) => None,
        }
    }

    pub fn custom_amount(&self) -> Option<i64> {
        match self {
            Self::Preset(_) => None,
            Self::Custom(a) => Some(*a),
        }
    }
}

/// User-adjustable inputs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuoteInputs {
    pub selected_price: i64,
    pub months: u32,
    pub deposit: DepositSelection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Warning {
    PastDueDate,
    BelowMinMonthly,
    DepositBelowMin,
    DepositBelowPercent,
    DepositExceedsTotal,
}

impl Warning {
    pub fn code(&self) -> &'static str {
        match self {
            Self::PastDueDate => "PAST_DUE_DATE",
            Self::BelowMinMonthly => "BELOW_MIN_MONTHLY",
            Self::DepositBelowMin => "DEPOSIT_BELOW_MIN",
            Self::DepositBelowPercent => "DEPOSIT_BELOW_PERCENT",
            Self::DepositExceedsTotal => "DEPOSIT_EXCEEDS_TOTAL",
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Derived payment plan
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quote {
    pub total_price: i64,
    pub months: u32,
    pub deposit_selection: DepositSelection,
    pub min_deposit_amount: i64,
    pub deposit: i64,
    pub monthly_payment: f64,
    pub payoff_date: NaiveDateTime,
    pub warnings: BTreeSet<Warning>,
}

impl Quote {
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn has_warning(&self, warning: Warning) -> bool {
        self.warnings.contains(&warning)
    }
}
