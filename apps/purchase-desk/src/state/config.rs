//! # Desk Configuration
//!
//! Store identity, billing rules and log filter, loaded once at startup.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     CHALLAN_STORE_NAME="Sharma General Stores"                         │
//! │     CHALLAN_GST_RATE=12        (percent)                               │
//! │     CHALLAN_LINE_TAX=product_rate                                      │
//! │     CHALLAN_LOG=debug                                                  │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     --config <path>, or the platform config dir:                       │
//! │     ~/.config/purchase-desk/desk.toml (Linux)                          │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     18% GST, fixed 9% SGST/CGST on bill lines                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [store]
//! name = "Sharma General Stores"
//! currency_symbol = "₹"
//! currency_decimals = 2
//!
//! [billing]
//! default_gst_rate_bps = 1800
//! line_tax = "fixed"           # fixed | product_rate
//! fixed_component_bps = 900
//!
//! [logging]
//! filter = "info,purchase_desk=debug,challan_core=debug"
//! ```
//!
//! ## Thread Safety
//! Read-only after startup, so no mutex.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use challan_core::{
    BillingPolicy, LineTaxPolicy, Money, Rate, DEFAULT_GST_RATE_BPS, FIXED_TAX_COMPONENT_BPS,
    MAX_RATE_BPS,
};

use crate::error::{ConfigError, ConfigResult};

// =============================================================================
// Sections
// =============================================================================

/// Store identity, shown on bill printouts and in log lines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSettings {
    #[serde(default = "default_store_name")]
    pub name: String,

    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,

    /// Decimal places when formatting amounts (0 to 2; money is kept in paise).
    #[serde(default = "default_currency_decimals")]
    pub currency_decimals: u8,
}

fn default_store_name() -> String {
    "Purchase Desk".to_string()
}

fn default_currency_symbol() -> String {
    "₹".to_string()
}

fn default_currency_decimals() -> u8 {
    2
}

impl Default for StoreSettings {
    fn default() -> Self {
        StoreSettings {
            name: default_store_name(),
            currency_symbol: default_currency_symbol(),
            currency_decimals: default_currency_decimals(),
        }
    }
}

/// GST defaults and the bill line tax rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillingSettings {
    /// Applied to stock-in lines without their own rate.
    #[serde(default = "default_gst_rate_bps")]
    pub default_gst_rate_bps: u32,

    #[serde(default)]
    pub line_tax: LineTaxPolicy,

    /// SGST and CGST rate each, under `line_tax = "fixed"`.
    #[serde(default = "default_fixed_component_bps")]
    pub fixed_component_bps: u32,
}

fn default_gst_rate_bps() -> u32 {
    DEFAULT_GST_RATE_BPS
}

fn default_fixed_component_bps() -> u32 {
    FIXED_TAX_COMPONENT_BPS
}

impl Default for BillingSettings {
    fn default() -> Self {
        BillingSettings {
            default_gst_rate_bps: default_gst_rate_bps(),
            line_tax: LineTaxPolicy::default(),
            fixed_component_bps: default_fixed_component_bps(),
        }
    }
}

/// Log filter in `EnvFilter` syntax. `RUST_LOG` still wins at runtime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_log_filter() -> String {
    "info,purchase_desk=debug,challan_core=debug".to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        LoggingSettings {
            filter: default_log_filter(),
        }
    }
}

// =============================================================================
// Desk Configuration
// =============================================================================

/// Complete desk configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeskConfig {
    #[serde(default)]
    pub store: StoreSettings,

    #[serde(default)]
    pub billing: BillingSettings,

    #[serde(default)]
    pub logging: LoggingSettings,
}

impl DeskConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (desk.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading desk config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load desk config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> ConfigResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| ConfigError::SaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ConfigError::SaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| ConfigError::SaveFailed(e.to_string()))?;

        info!(?path, "Desk config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.store.name.trim().is_empty() {
            return Err(ConfigError::Invalid("store.name must not be empty".into()));
        }

        if self.store.currency_decimals > 2 {
            return Err(ConfigError::Invalid(format!(
                "store.currency_decimals must be 0, 1 or 2, got {}",
                self.store.currency_decimals
            )));
        }

        if self.billing.default_gst_rate_bps > MAX_RATE_BPS {
            return Err(ConfigError::Invalid(format!(
                "billing.default_gst_rate_bps must be at most {}, got {}",
                MAX_RATE_BPS, self.billing.default_gst_rate_bps
            )));
        }

        if self.billing.fixed_component_bps > MAX_RATE_BPS {
            return Err(ConfigError::Invalid(format!(
                "billing.fixed_component_bps must be at most {}, got {}",
                MAX_RATE_BPS, self.billing.fixed_component_bps
            )));
        }

        EnvFilter::try_new(&self.logging.filter).map_err(|e| {
            ConfigError::Invalid(format!("logging.filter '{}': {}", self.logging.filter, e))
        })?;

        Ok(())
    }

    /// Applies `CHALLAN_*` environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(name) = lookup("CHALLAN_STORE_NAME") {
            debug!(store_name = %name, "Overriding store name from environment");
            self.store.name = name;
        }

        if let Some(rate) = lookup("CHALLAN_GST_RATE") {
            match rate.trim().parse::<f64>().ok().map(Rate::from_percentage) {
                Some(Ok(parsed)) => self.billing.default_gst_rate_bps = parsed.bps(),
                Some(Err(e)) => warn!(rate = %rate, error = %e, "Ignoring out-of-range CHALLAN_GST_RATE"),
                None => warn!(rate = %rate, "Ignoring unparseable CHALLAN_GST_RATE"),
            }
        }

        if let Some(policy) = lookup("CHALLAN_LINE_TAX") {
            match policy.to_lowercase().as_str() {
                "fixed" => self.billing.line_tax = LineTaxPolicy::Fixed,
                "product_rate" => self.billing.line_tax = LineTaxPolicy::ProductRate,
                _ => warn!(policy = %policy, "Unknown line tax policy in environment"),
            }
        }

        if let Some(filter) = lookup("CHALLAN_LOG") {
            self.logging.filter = filter;
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("in", "challan", "purchase-desk")
            .map(|dirs| dirs.config_dir().join("desk.toml"))
    }

    /// Billing rules handed to the core.
    pub fn billing_policy(&self) -> BillingPolicy {
        BillingPolicy {
            default_gst_rate: Rate::from_bps(self.billing.default_gst_rate_bps),
            line_tax: self.billing.line_tax,
            fixed_component: Rate::from_bps(self.billing.fixed_component_bps),
        }
    }

    /// Formats an amount for display with the configured symbol and precision.
    pub fn format_money(&self, amount: Money) -> String {
        let paise = amount.paise();
        let whole = (paise / 100).abs();
        let frac = (paise % 100).abs();
        let sign = if paise < 0 { "-" } else { "" };

        match self.store.currency_decimals {
            0 => format!("{}{}{}", sign, self.store.currency_symbol, whole),
            1 => format!("{}{}{}.{}", sign, self.store.currency_symbol, whole, frac / 10),
            _ => format!("{}{}{}.{:02}", sign, self.store.currency_symbol, whole, frac),
        }
    }
}
