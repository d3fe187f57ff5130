//! Server configuration, read from flags, the environment and `.env`.

use clap::{Args, Parser};

use crate::config::{
    auth::AuthConfig,
    db::DatabaseConfig,
    observability::{LoggingConfig, ObservabilityConfig},
};

pub(crate) mod auth;
pub(crate) mod db;
pub(crate) mod observability;

/// Gabinet JSON API server configuration
#[derive(Debug, Parser)]
#[command(name = "gabinet-json", about = "Gabinet JSON API server", long_about = None)]
pub struct ServerConfig {
    #[command(flatten)]
    pub listen: ListenConfig,

    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Trace export and slow-request settings.
    #[command(flatten)]
    pub observability: ObservabilityConfig,

    #[command(flatten)]
    pub database: DatabaseConfig,

    /// `OpenBao` Transit settings for staff API tokens.
    #[command(flatten)]
    pub auth: AuthConfig,
}

/// Where the server listens.
#[derive(Debug, Args)]
pub struct ListenConfig {
    /// Interface to bind
    #[arg(short = 'H', long, env = "SERVER_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to bind
    #[arg(short, long, env = "SERVER_PORT", default_value_t = 8698)]
    pub port: u16,
}

impl ServerConfig {
    /// Load `.env` if present, then parse flags and environment.
    ///
    /// # Errors
    ///
    /// Returns the `clap` error for missing or malformed settings.
    pub fn load() -> Result<Self, clap::Error> {
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    #[must_use]
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.listen.host, self.listen.port)
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    const REQUIRED: [&str; 7] = [
        "gabinet-json",
        "--database-url",
        "postgres://gabinet@localhost/gabinet",
        "--addr",
        "http://localhost:8200",
        "--token",
        "root",
    ];

    #[test]
    fn defaults_fill_everything_optional() -> TestResult {
        let config = ServerConfig::try_parse_from(REQUIRED)?;

        assert_eq!(config.socket_addr(), "0.0.0.0:8698");
        assert_eq!(config.auth.transit_key, "gabinet-api-tokens");
        assert!(!config.observability.otel_enabled, "tracing export is opt-in");

        Ok(())
    }

    #[test]
    fn listen_address_can_be_overridden() -> TestResult {
        let config = ServerConfig::try_parse_from(
            REQUIRED.into_iter().chain(["--host", "127.0.0.1", "--port", "9000"]),
        )?;

        assert_eq!(config.socket_addr(), "127.0.0.1:9000");

        Ok(())
    }

    #[test]
    fn sample_ratio_outside_unit_interval_is_rejected() {
        let result = ServerConfig::try_parse_from(
            REQUIRED.into_iter().chain(["--otel-trace-sample-ratio", "1.5"]),
        );

        assert!(result.is_err(), "expected out-of-range ratio to be rejected");
    }
}
