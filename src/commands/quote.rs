use anyhow::Result;
use colored::Colorize;
use payplan::config::{ContactSettings, Settings};
use payplan::format::{format_currency, format_date, format_months};
use payplan::pricing::warning_message;
use payplan::{PlanSession, Quote};
use tracing::info;

use super::{prepare_session, resolve_now};
use crate::cli::PlanArgs;

/// Execute the quote command
pub fn execute(settings: &Settings, plan: &PlanArgs, json: bool) -> Result<()> {
    let session = prepare_session(settings, plan)?;
    let now = resolve_now(plan.today.as_deref())?;
    let quote = session.quote(now.naive_local());

    info!(
        total_price = quote.total_price,
        deposit = quote.deposit,
        months = quote.months,
        warnings = quote.warnings.len(),
        "Quote computed"
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&quote)?);
    } else {
        print_quote(&session, &quote);
        print_info(&settings.contact);
    }
    Ok(())
}

/// Render the summary cards, warnings and timing note
pub fn print_quote(session: &PlanSession, quote: &Quote) {
    let config = session.config();

    println!("{}", "Payment Calculator".bold());
    if let Some(due) = config.due_date {
        println!("  {}: {}", "Due Date".cyan(), format_date(due));
    }
    println!();

    if config.sliding_scale_enabled {
        println!(
            "  {}: {} ({} – {})",
            "Price".cyan(),
            format_currency(quote.total_price as f64).bold(),
            format_currency(config.sliding_scale_min as f64),
            format_currency(config.sliding_scale_max as f64),
        );
    } else {
        println!(
            "  {}: {}",
            "Total".cyan(),
            format_currency(quote.total_price as f64).bold()
        );
    }
    println!("  {}: {}", "Pay over".cyan(), format_months(quote.months));

    let presets: Vec<String> = config
        .deposit_presets
        .iter()
        .map(|&f| {
            let label = format!("{}%", (f * 100.0).round());
            if session.is_preset_active(f) {
                format!("[{}]", label).green().to_string()
            } else {
                label
            }
        })
        .collect();
    let custom = match quote.deposit_selection.custom_amount() {
        Some(amount) => format!("[custom {}]", amount).green().to_string(),
        None => "custom".dimmed().to_string(),
    };
    println!("  {}: {} {}", "Deposit".cyan(), presets.join(" "), custom);
    println!();

    println!(
        "  {}: {}",
        "Deposit Today".bold(),
        format_currency(quote.deposit as f64)
    );
    println!(
        "  {}: {}",
        format!("{}× Monthly", quote.months).bold(),
        format_currency(quote.monthly_payment)
    );
    println!(
        "  {}: {}",
        "Payoff Date".bold(),
        format_date(quote.payoff_date.date())
    );
    println!();

    if quote.has_warnings() {
        println!("{}", "Warnings:".yellow().bold());
        for warning in &quote.warnings {
            println!("  {} {}", "!".yellow(), warning_message(*warning, config, quote));
        }
        println!();
    }

    match session.recommended_payoff_by() {
        Some(by) => println!(
            "{}",
            format!(
                "We typically ask that your balance be paid off 1 month before your due date (by {}).",
                format_date(by)
            )
            .dimmed()
        ),
        None => println!(
            "{}",
            "We typically ask that your balance be paid off 1 month before your due date."
                .dimmed()
        ),
    }
}

/// Payment methods and contact details printed under the quote
pub fn info_lines(contact: &ContactSettings) -> Vec<String> {
    vec![
        "Payment Methods".to_string(),
        "  Pay by ACH, debit, or credit card, with no processing fees.".to_string(),
        "  ACH is preferred; it's how we keep it fee-free for everyone.".to_string(),
        "  Monthly payments are just our default. We can adjust the schedule or payoff date to fit your situation.".to_string(),
        String::new(),
        "Need more flexibility? Contact us".to_string(),
        format!("  Phone: {}", contact.phone),
        format!("  Email: {}", contact.email),
    ]
}

fn print_info(contact: &ContactSettings) {
    println!();
    for line in info_lines(contact) {
        if line.starts_with(' ') || line.is_empty() {
            println!("{}", line);
        } else {
            println!("{}", line.bold());
        }
    }
}
