use anyhow::Result;
use colored::Colorize;
use payplan::config::Settings;
use tracing::info;

/// Execute the config show command
pub fn show(settings: &Settings) -> Result<()> {
    println!("{}", "Current Configuration:".green().bold());
    println!();

    // Serialize to TOML format
    let toml_string = toml::to_string_pretty(settings)?;
    println!("{}", toml_string);

    info!("Configuration displayed successfully");
    Ok(())
}

/// Execute the config validate command
///
/// Settings were already validated while loading; this prints a summary.
pub fn validate(settings: &Settings) -> Result<()> {
    let pricing = &settings.pricing;

    println!("{}", "✓ Configuration is valid".green());
    println!();
    println!("{}", "Summary:".bold());
    println!("  Fixed Price: {}", pricing.fixed_price);
    println!(
        "  Sliding Scale: {} – {} (step {})",
        pricing.default_sliding_min, pricing.sliding_scale_max, pricing.sliding_scale_step
    );
    println!(
        "  Deposit Presets: {}",
        pricing
            .deposit_presets
            .iter()
            .map(|f| format!("{}%", (f * 100.0).round()))
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!(
        "  10% Deposit Floor: {}",
        if pricing.percent_floor {
            "enabled".green()
        } else {
            "disabled".red()
        }
    );
    println!(
        "  Webhook: {}",
        if settings.webhook.enabled {
            format!("{} (timeout {}s)", settings.webhook.url, settings.webhook.timeout_seconds)
                .green()
        } else {
            "disabled".red()
        }
    );

    info!("Configuration validation successful");
    Ok(())
}
