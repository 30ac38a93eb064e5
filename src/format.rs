//! Display helpers for amounts and dates.
//!
//! Amounts are shown in whole dollars; rounding happens here only, never in
//! the pricing math.

use chrono::NaiveDate;

/// `1275.4` -> `"$1,275"`, `-50.0` -> `"-$50"`
pub fn format_currency(amount: f64) -> String {
    let rounded = amount.abs().round() as u64;
    let digits = rounded.to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if amount < 0.0 && rounded != 0 {
        format!("-${}", grouped)
    } else {
        format!("${}", grouped)
    }
}

/// `2025-07-04` -> `"Jul 4, 2025"`
pub fn format_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// `"1 month"` / `"6 months"`
pub fn format_months(months: u32) -> String {
    if months == 1 {
        "1 month".to_string()
    } else {
        format!("{} months", months)
    }
}
