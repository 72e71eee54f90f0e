//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Ledger policy configuration.
    #[serde(default)]
    pub ledger: LedgerConfig,
    /// Stats cache configuration for the request layer.
    #[serde(default)]
    pub stats_cache: StatsCacheConfig,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// Payout policy knobs.
///
/// Amounts are in minor currency units.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct LedgerConfig {
    /// Calendar days an earning is held before it can be withdrawn.
    #[serde(default = "default_hold_period_days")]
    pub hold_period_days: u32,
    /// Smallest amount a creator may withdraw.
    #[serde(default = "default_minimum_withdrawal")]
    pub minimum_withdrawal: i64,
    /// Flat fee charged for bank transfers.
    #[serde(default = "default_bank_transfer_fee")]
    pub bank_transfer_fee: i64,
    /// Flat fee charged for PayPal payouts.
    #[serde(default)]
    pub paypal_fee: i64,
    /// IANA timezone in which hold days and months are counted.
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

fn default_hold_period_days() -> u32 {
    14
}

fn default_minimum_withdrawal() -> i64 {
    1000
}

fn default_bank_transfer_fee() -> i64 {
    250
}

fn default_timezone() -> String {
    "UTC".to_string()
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            hold_period_days: default_hold_period_days(),
            minimum_withdrawal: default_minimum_withdrawal(),
            bank_transfer_fee: default_bank_transfer_fee(),
            paypal_fee: 0,
            timezone: default_timezone(),
        }
    }
}

/// Read-through stats cache configuration.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct StatsCacheConfig {
    /// Maximum number of cached users.
    #[serde(default = "default_cache_capacity")]
    pub max_capacity: u64,
    /// Time-to-live in seconds for each entry.
    #[serde(default = "default_cache_ttl")]
    pub ttl_secs: u64,
}

fn default_cache_capacity() -> u64 {
    10_000
}

fn default_cache_ttl() -> u64 {
    60
}

impl Default for StatsCacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: default_cache_capacity(),
            ttl_secs: default_cache_ttl(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("PAYOUT").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
