use clap::{Args, Subcommand};
use gabinet_app::domain::tenants::{
    PgTenantsService, TenantsService,
    data::NewTenant,
    records::TenantUuid,
};
use uuid::Uuid;

use crate::cli::args::DatabaseArgs;

#[derive(Debug, Args)]
pub(crate) struct TenantCommand {
    #[command(subcommand)]
    command: TenantSubcommand,
}

#[derive(Debug, Subcommand)]
enum TenantSubcommand {
    /// Create a tenant and seed its system views.
    Create(CreateTenantArgs),
}

#[derive(Debug, Args)]
struct CreateTenantArgs {
    /// Practice or company name
    #[arg(long)]
    name: String,

    /// Tenant UUID; generated when omitted
    #[arg(long)]
    tenant_uuid: Option<Uuid>,

    #[command(flatten)]
    database: DatabaseArgs,
}

pub(crate) async fn run(command: TenantCommand) -> Result<(), String> {
    match command.command {
        TenantSubcommand::Create(args) => create(args).await,
    }
}

async fn create(args: CreateTenantArgs) -> Result<(), String> {
    let service = PgTenantsService::new(args.database.connect().await?);

    let created = service
        .create_tenant(NewTenant {
            uuid: args.tenant_uuid.map_or_else(TenantUuid::new, TenantUuid::from_uuid),
            name: args.name,
        })
        .await
        .map_err(|error| format!("failed to create tenant: {error}"))?;

    println!("tenant_uuid: {}", created.tenant.uuid);
    println!("tenant_name: {}", created.tenant.name);

    for view in &created.system_views {
        println!(
            "system_view: {} {} ({})",
            view.entity_type,
            view.slug.as_deref().unwrap_or_default(),
            view.name
        );
    }

    Ok(())
}
