//! Application configuration management.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// JWT configuration.
    pub jwt: JwtSettings,
    /// Sales analytics thresholds and defaults.
    #[serde(default)]
    pub analytics: AnalyticsConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
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

/// JWT settings as read from configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtSettings {
    /// Secret key for verifying tokens.
    pub secret: String,
    /// Access token expiration in seconds.
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry_secs: u64,
}

fn default_access_token_expiry() -> u64 {
    900 // 15 minutes
}

/// Business thresholds used by the sales analytics reports.
///
/// These are policy values, tuned per deployment without touching the
/// aggregation code.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AnalyticsConfig {
    /// A salesperson's monthly total must exceed this to appear in the
    /// monthly top-salesperson ranking.
    #[serde(default = "default_monthly_floor")]
    pub monthly_top_salesperson_floor: Decimal,
    /// A salesperson's yearly total must exceed this to appear in the
    /// yearly salesperson ranking.
    #[serde(default = "default_annual_floor")]
    pub annual_top_salesperson_floor: Decimal,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            monthly_top_salesperson_floor: default_monthly_floor(),
            annual_top_salesperson_floor: default_annual_floor(),
        }
    }
}

fn default_monthly_floor() -> Decimal {
    Decimal::from(100_000_000_i64)
}

fn default_annual_floor() -> Decimal {
    // 300M per month over twelve months
    Decimal::from(300_000_000_i64) * Decimal::from(12)
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
            .add_source(config::Environment::with_prefix("SALESDESK").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_analytics_defaults() {
        let analytics = AnalyticsConfig::default();
        assert_eq!(analytics.monthly_top_salesperson_floor, dec!(100000000));
        assert_eq!(analytics.annual_top_salesperson_floor, dec!(3600000000));
    }

    #[test]
    fn test_load_from_environment() {
        temp_env::with_vars(
            [
                ("RUN_MODE", Some("config-test")),
                ("SALESDESK__DATABASE__URL", Some("postgres://localhost/sales")),
                ("SALESDESK__JWT__SECRET", Some("secret")),
                (
                    "SALESDESK__ANALYTICS__MONTHLY_TOP_SALESPERSON_FLOOR",
                    Some("250000000"),
                ),
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert_eq!(config.database.url, "postgres://localhost/sales");
                assert_eq!(config.database.max_connections, 10);
                assert_eq!(config.jwt.secret, "secret");
                assert_eq!(config.jwt.access_token_expiry_secs, 900);
                assert_eq!(config.server.port, 8080);
                assert_eq!(
                    config.analytics.monthly_top_salesperson_floor,
                    dec!(250000000)
                );
                assert_eq!(
                    config.analytics.annual_top_salesperson_floor,
                    dec!(3600000000)
                );
            },
        );
    }

    #[test]
    fn test_load_requires_database_url() {
        temp_env::with_vars(
            [
                ("RUN_MODE", Some("config-test")),
                ("SALESDESK__DATABASE__URL", None),
                ("SALESDESK__JWT__SECRET", Some("secret")),
            ],
            || {
                assert!(AppConfig::load().is_err());
            },
        );
    }
}
