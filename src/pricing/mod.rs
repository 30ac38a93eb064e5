pub mod calculator;
pub mod models;

pub use calculator::{compute_quote, round_half_up, warning_message};
pub use models::{Configuration, DepositSelection, Quote, QuoteInputs, Warning};
