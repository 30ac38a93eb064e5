use crate::calendar::MonthRollover;
use serde::de::{self, Deserializer, SeqAccess, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Default settings file name, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "payplan.toml";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub pricing: PricingSettings,
    #[serde(default)]
    pub webhook: WebhookSettings,
    #[serde(default)]
    pub contact: ContactSettings,
}

/// Price list and variant toggles. Query parameters are applied on top of these.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PricingSettings {
    pub fixed_price: i64,
    pub sliding_scale_max: i64,
    pub sliding_scale_step: i64,
    /// Sliding-scale floor used when no `originalPrice` is given
    pub default_sliding_min: i64,
    pub min_deposit: i64,
    pub min_monthly_payment: i64,
    #[serde(deserialize_with = "deserialize_presets")]
    pub deposit_presets: Vec<f64>,
    pub default_deposit_fraction: f64,
    pub default_months: u32,
    /// Enforce a 10%-of-total deposit floor outside sliding-scale mode
    pub percent_floor: bool,
    /// Honour the `maxPrice` query parameter
    pub allow_max_price_override: bool,
    pub month_rollover: MonthRollover,
}

impl Default for PricingSettings {
    fn default() -> Self {
        Self {
            fixed_price: 8500,
            sliding_scale_max: 8500,
            sliding_scale_step: 250,
            default_sliding_min: 4000,
            min_deposit: 250,
            min_monthly_payment: 250,
            deposit_presets: vec![0.10, 0.25, 0.50],
            default_deposit_fraction: 0.10,
            default_months: 6,
            percent_floor: true,
            allow_max_price_override: true,
            month_rollover: MonthRollover::Normalize,
        }
    }
}

/// Accepts a list or a single fraction. A one-item env list arrives as a
/// plain number.
fn deserialize_presets<'de, D>(deserializer: D) -> Result<Vec<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    struct Presets;

    impl<'de> Visitor<'de> for Presets {
        type Value = Vec<f64>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a fraction or a list of fractions")
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
            Ok(vec![v])
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
            Ok(vec![v as f64])
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
            Ok(vec![v as f64])
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            v.split(',')
                .map(|part| part.trim().parse::<f64>().map_err(E::custom))
                .collect()
        }

        fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
            let mut presets = Vec::new();
            while let Some(preset) = seq.next_element::<f64>()? {
                presets.push(preset);
            }
            Ok(presets)
        }
    }

    deserializer.deserialize_any(Presets)
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WebhookSettings {
    /// Variants without submission run with the webhook disabled
    pub enabled: bool,
    pub url: String,
    pub timeout_seconds: u64,
}

impl Default for WebhookSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            url: "https://hook.us2.make.com/5xso5d5tyu3ubbz45isvoohto6jx1mfo".to_string(),
            timeout_seconds: 15,
        }
    }
}

/// Contact details shown next to the payment methods
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ContactSettings {
    pub phone: String,
    pub email: String,
}

impl Default for ContactSettings {
    fn default() -> Self {
        Self {
            phone: "805 364-0996".to_string(),
            email: "hello@drjuliaray.com".to_string(),
        }
    }
}

/// `PAYPLAN__SECTION__KEY` variables. `deposit_presets` takes a
/// comma-separated list, e.g. `PAYPLAN__PRICING__DEPOSIT_PRESETS=0.2,0.4`.
fn env_source() -> config::Environment {
    config::Environment::with_prefix("PAYPLAN")
        .separator("__")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("pricing.deposit_presets")
}

/// Load settings from `path` (optional) and `PAYPLAN__*` environment variables
pub fn load_settings(path: &Path) -> anyhow::Result<Settings> {
    load_settings_with_env(path, env_source())
}

fn load_settings_with_env(path: &Path, env: config::Environment) -> anyhow::Result<Settings> {
    let settings = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(env)
        .build()?;

    let cfg: Settings = settings.try_deserialize()?;
    validate_settings(&cfg)?;

    Ok(cfg)
}

pub fn validate_settings(cfg: &Settings) -> anyhow::Result<()> {
    let p = &cfg.pricing;

    if p.fixed_price <= 0 {
        anyhow::bail!("fixed_price must be positive");
    }
    if p.sliding_scale_step <= 0 {
        anyhow::bail!("sliding_scale_step must be positive");
    }
    if p.min_deposit < 0 || p.min_monthly_payment < 0 {
        anyhow::bail!("min_deposit and min_monthly_payment cannot be negative");
    }
    if p.deposit_presets.is_empty() {
        anyhow::bail!("At least one deposit preset must be configured");
    }
    for preset in &p.deposit_presets {
        if !is_valid_fraction(*preset) {
            anyhow::bail!("Deposit preset {} must be in (0, 1]", preset);
        }
    }
    if !is_valid_fraction(p.default_deposit_fraction) {
        anyhow::bail!(
            "default_deposit_fraction {} must be in (0, 1]",
            p.default_deposit_fraction
        );
    }
    if p.default_months == 0 {
        anyhow::bail!("default_months must be at least 1");
    }

    if cfg.webhook.enabled {
        let url = url::Url::parse(&cfg.webhook.url)
            .map_err(|e| anyhow::anyhow!("Invalid webhook url '{}': {}", cfg.webhook.url, e))?;
        if !matches!(url.scheme(), "http" | "https") {
            anyhow::bail!("Webhook url must use http or https");
        }
        if cfg.webhook.timeout_seconds == 0 {
            anyhow::bail!("Webhook timeout_seconds must be at least 1");
        }
    }

    Ok(())
}

pub(crate) fn is_valid_fraction(f: f64) -> bool {
    f > 0.0 && f <= 1.0
}
