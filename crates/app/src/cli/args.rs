use std::sync::Arc;

use clap::Args;
use gabinet_app::{
    auth::{OpenBaoClient, OpenBaoConfig, TokenVerifier},
    database::{self, Db},
};

#[derive(Debug, Clone, Args)]
pub(crate) struct DatabaseArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: String,
}

impl DatabaseArgs {
    pub(crate) async fn connect(&self) -> Result<Db, String> {
        database::connect(&self.database_url)
            .await
            .map(Db::new)
            .map_err(|error| format!("failed to connect to database: {error}"))
    }
}

#[derive(Debug, Clone, Args)]
pub(crate) struct OpenBaoArgs {
    /// OpenBao server address
    #[arg(long, env = "OPENBAO_ADDR")]
    pub openbao_addr: String,

    /// OpenBao authentication token
    #[arg(long, env = "OPENBAO_TOKEN", hide_env_values = true)]
    pub openbao_token: String,

    /// OpenBao Transit key name
    #[arg(long, env = "OPENBAO_TRANSIT_KEY", default_value = "gabinet-api-tokens")]
    pub openbao_transit_key: String,
}

impl OpenBaoArgs {
    pub(crate) fn verifier(self) -> Arc<dyn TokenVerifier> {
        Arc::new(OpenBaoClient::new(OpenBaoConfig {
            addr: self.openbao_addr,
            token: self.openbao_token,
            transit_key: self.openbao_transit_key,
        }))
    }
}

pub(crate) fn or_dash<T: ToString>(value: Option<T>, missing: &str) -> String {
    value.map_or_else(|| missing.to_string(), |value| value.to_string())
}
