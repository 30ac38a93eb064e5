use crate::calendar::add_months_datetime;
use crate::format::format_currency;
use crate::pricing::models::{
    Configuration, DepositSelection, Quote, QuoteInputs, Warning, MIN_DEPOSIT_PERCENT,
};
use chrono::NaiveDateTime;
use std::collections::BTreeSet;
use tracing::warn;

/// Round half up, the way the price widgets have always rounded
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// Compute the payment plan for the current inputs
///
/// Pure function of its arguments: the clock is passed in as `now` and the
/// result is identical for identical inputs.
pub fn compute_quote(config: &Configuration, inputs: &QuoteInputs, now: NaiveDateTime) -> Quote {
    let total_price = if config.sliding_scale_enabled {
        inputs.selected_price
    } else {
        config.fixed_price
    }
    .max(0);

    let months = inputs.months.clamp(1, config.max_months());

    let percent_floor_amount = round_half_up(total_price as f64 * MIN_DEPOSIT_PERCENT);
    let min_deposit_amount = if config.percent_floor_active() {
        config.min_deposit.max(percent_floor_amount)
    } else {
        config.min_deposit
    };

    let deposit = match inputs.deposit {
        DepositSelection::Custom(amount) => min_deposit_amount.max(amount.min(total_price)),
        DepositSelection::Preset(fraction) => {
            min_deposit_amount.max(round_half_up(total_price as f64 * fraction))
        }
    }
    // a minimum deposit above a small total must not push the deposit past it
    .clamp(0, total_price);

    let monthly_payment = (total_price - deposit) as f64 / months as f64;

    let payoff_date = match add_months_datetime(now, months as i32, config.month_rollover) {
        Some(date) => date,
        None => {
            warn!(%now, months, "Payoff date out of calendar range, using current date");
            now
        }
    };

    let mut warnings = BTreeSet::new();

    if let Some(due_midnight) = config.due_date.and_then(|due| due.and_hms_opt(0, 0, 0)) {
        if payoff_date > due_midnight {
            warnings.insert(Warning::PastDueDate);
        }
    }

    if monthly_payment < config.min_monthly_payment as f64 {
        warnings.insert(Warning::BelowMinMonthly);
    }

    let custom = inputs.deposit.custom_amount();
    let below_min = custom.is_some_and(|amount| amount < min_deposit_amount);
    if below_min {
        warnings.insert(Warning::DepositBelowMin);
    }

    if config.percent_floor_active() && !below_min && deposit < percent_floor_amount {
        warnings.insert(Warning::DepositBelowPercent);
    }

    if custom.is_some_and(|amount| amount > total_price) {
        warnings.insert(Warning::DepositExceedsTotal);
    }

    Quote {
        total_price,
        months,
        deposit_selection: inputs.deposit,
        min_deposit_amount,
        deposit,
        monthly_payment,
        payoff_date,
        warnings,
    }
}

/// User-facing text for a warning raised on `quote`
pub fn warning_message(warning: Warning, config: &Configuration, quote: &Quote) -> String {
    match warning {
        Warning::PastDueDate => {
            "This plan extends past your due date, adjust months to finish earlier.".to_string()
        }
        Warning::BelowMinMonthly => format!(
            "The minimum payment is {}/mo. Try a shorter timeframe or higher deposit.",
            format_currency(config.min_monthly_payment as f64)
        ),
        Warning::DepositBelowMin => format!(
            "Minimum deposit is {}",
            format_currency(quote.min_deposit_amount as f64)
        ),
        Warning::DepositBelowPercent => format!(
            "Minimum down payment is 10% ({})",
            format_currency(round_half_up(quote.total_price as f64 * MIN_DEPOSIT_PERCENT) as f64)
        ),
        Warning::DepositExceedsTotal => "Deposit cannot exceed total price".to_string(),
    }
}
