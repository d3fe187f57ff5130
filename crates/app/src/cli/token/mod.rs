use clap::{Args, Subcommand};
use gabinet_app::{
    auth::{ApiTokenMetadata, ApiTokenUuid, AuthService, PgAuthService},
    domain::tenants::records::TenantUuid,
};
use jiff::Timestamp;
use uuid::Uuid;

use crate::cli::args::{DatabaseArgs, OpenBaoArgs, or_dash};

#[derive(Debug, Args)]
pub(crate) struct TokenCommand {
    #[command(subcommand)]
    command: TokenSubcommand,

    #[command(flatten)]
    database: DatabaseArgs,

    #[command(flatten)]
    openbao: OpenBaoArgs,
}

#[derive(Debug, Subcommand)]
enum TokenSubcommand {
    /// Issue a token. The raw token is printed once.
    Create {
        /// Tenant that owns the token
        #[arg(long)]
        tenant_uuid: Uuid,

        /// Expiry timestamp (RFC 3339)
        #[arg(long)]
        expires_at: Option<Timestamp>,
    },

    /// List a tenant's tokens.
    List {
        /// Tenant whose tokens are listed
        #[arg(long)]
        tenant_uuid: Uuid,
    },

    /// Revoke a token.
    Revoke {
        /// Token to revoke
        #[arg(long)]
        token_uuid: Uuid,
    },
}

pub(crate) async fn run(command: TokenCommand) -> Result<(), String> {
    let service = PgAuthService::new(command.database.connect().await?, command.openbao.verifier());

    match command.command {
        TokenSubcommand::Create {
            tenant_uuid,
            expires_at,
        } => {
            let issued = service
                .issue_api_token(TenantUuid::from_uuid(tenant_uuid), expires_at)
                .await
                .map_err(|error| format!("failed to create token: {error}"))?;

            print_metadata(&issued.metadata);
            println!("api_token: {}", issued.token);
            println!("store this token now; it is only shown once");
        }
        TokenSubcommand::List { tenant_uuid } => {
            let tokens = service
                .list_api_tokens(TenantUuid::from_uuid(tenant_uuid))
                .await
                .map_err(|error| format!("failed to list tokens: {error}"))?;

            if tokens.is_empty() {
                println!("no tokens found for tenant {tenant_uuid}");
            }

            for token in &tokens {
                print_metadata(token);
                println!();
            }
        }
        TokenSubcommand::Revoke { token_uuid } => {
            let revoked = service
                .revoke_api_token(ApiTokenUuid::from_uuid(token_uuid))
                .await
                .map_err(|error| format!("failed to revoke token {token_uuid}: {error}"))?;

            println!("revoked token {} at {}", revoked.uuid, or_dash(revoked.revoked_at, "-"));
        }
    }

    Ok(())
}

fn print_metadata(token: &ApiTokenMetadata) {
    println!("token_uuid: {}", token.uuid);
    println!("tenant_uuid: {}", token.tenant_uuid);
    println!("token_version: {}", token.version.segment());
    println!("created_at: {}", token.created_at);
    println!("last_used_at: {}", or_dash(token.last_used_at, "never"));
    println!("expires_at: {}", or_dash(token.expires_at, "none"));
    println!("revoked_at: {}", or_dash(token.revoked_at, "active"));
}
