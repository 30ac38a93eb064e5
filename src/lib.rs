pub mod calendar;
pub mod config;
pub mod error;
pub mod format;
pub mod params;
pub mod pricing;
pub mod session;
pub mod submission;

pub use error::AppError;
pub use pricing::{compute_quote, Configuration, DepositSelection, Quote, QuoteInputs, Warning};
pub use session::PlanSession;
pub use submission::{submit_plan, SubmissionPayload, Submitter};

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize tracing/logging
///
/// Note: This function can only be called once. Logs go to stderr so that
/// `--json` output on stdout stays machine readable.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .init();
}
