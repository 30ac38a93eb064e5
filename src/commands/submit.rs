use anyhow::Result;
use colored::Colorize;
use payplan::config::Settings;
use payplan::format::{format_currency, format_date};
use payplan::pricing::warning_message;
use payplan::{submit_plan, AppError, Submitter};
use tracing::{error, info};

use super::{prepare_session, resolve_now};
use crate::cli::PlanArgs;

/// Execute the submit command
///
/// Computes the plan, refuses to send it while warnings are active and
/// prints the done view on success.
pub async fn execute(settings: &Settings, plan: &PlanArgs, name: &str) -> Result<()> {
    let mut session = prepare_session(settings, plan)?;
    let now = resolve_now(plan.today.as_deref())?;
    let submitter = Submitter::new(settings.webhook.clone())?;

    println!("{}", "Saving...".yellow());

    match submit_plan(&mut session, &submitter, name, &now).await {
        Ok(payload) => {
            println!("{}", "✓ You're all set!".green().bold());
            println!("We've saved your payment plan. We'll be in touch to confirm.");
            println!("{}", "Made a mistake? Just let us know and we'll update it.".dimmed());
            println!();
            println!("  {}: {}", "Total".cyan(), format_currency(payload.total_price as f64));
            println!("  {}: {}", "Deposit Today".cyan(), format_currency(payload.deposit as f64));
            println!(
                "  {}: {}",
                format!("{}× Monthly", payload.months).cyan(),
                format_currency(payload.monthly_payment)
            );
            println!(
                "  {}: {}",
                "Payoff Date".cyan(),
                format_date(payload.payoff_date.with_timezone(&now.timezone()).date_naive())
            );
            info!(name = %payload.name, "Submission completed");
            Ok(())
        }
        Err(AppError::ValidationFailed(warnings)) => {
            let quote = session.quote(now.naive_local());
            println!("{}", "Plan cannot be saved until these are resolved:".red());
            for warning in &warnings {
                println!(
                    "  {} {}",
                    "!".yellow(),
                    warning_message(*warning, session.config(), &quote)
                );
            }
            Err(AppError::ValidationFailed(warnings).into())
        }
        Err(e) => {
            error!(kind = e.kind(), error = %e, "Submission failed");
            println!("{} {}", "✗".red(), e);
            if e.is_retryable() {
                println!("{}", "Failed to submit. Please try again.".dimmed());
            }
            Err(e.into())
        }
    }
}
