//! Administrative commands.

use clap::{Parser, Subcommand};

mod args;
mod db;
mod tenant;
mod token;

#[derive(Debug, Parser)]
#[command(name = "gabinet-app", about = "Gabinet administration", long_about = None)]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Manage tenants.
    Tenant(tenant::TenantCommand),

    /// Manage staff API tokens.
    Token(token::TokenCommand),

    /// Database administration.
    Db(db::DbCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        match self.command {
            Commands::Tenant(command) => tenant::run(command).await,
            Commands::Token(command) => token::run(command).await,
            Commands::Db(command) => db::run(command).await,
        }
    }
}
