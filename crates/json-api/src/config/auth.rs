//! Auth Config

use clap::Args;
use gabinet_app::auth::OpenBaoConfig;

/// `OpenBao` authentication settings.
#[derive(Debug, Args)]
pub struct AuthConfig {
    /// `OpenBao` server address
    #[arg(long, env = "OPENBAO_ADDR")]
    pub addr: String,

    /// `OpenBao` authentication token
    #[arg(long, env = "OPENBAO_TOKEN", hide_env_values = true)]
    pub token: String,

    /// `OpenBao` Transit key name
    #[arg(long, env = "OPENBAO_TRANSIT_KEY", default_value = "gabinet-api-tokens")]
    pub transit_key: String,
}

impl AuthConfig {
    /// Transit client settings.
    #[must_use]
    pub fn openbao(&self) -> OpenBaoConfig {
        OpenBaoConfig {
            addr: self.addr.clone(),
            token: self.token.clone(),
            transit_key: self.transit_key.clone(),
        }
    }
}
