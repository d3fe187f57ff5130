use clap::Args;
use sqlx::{Postgres, Transaction, query, query_scalar};

use crate::cli::args::DatabaseArgs;

const RUNTIME_ROLE_FLAGS: &str = "LOGIN NOSUPERUSER NOCREATEDB NOCREATEROLE NOREPLICATION NOBYPASSRLS";

#[derive(Debug, Args)]
pub(crate) struct EnsureAppRoleArgs {
    /// Connection with privileges to manage roles
    #[command(flatten)]
    database: DatabaseArgs,

    /// Runtime role name
    #[arg(long, default_value = "gabinet_app")]
    role_name: String,

    /// Runtime role password
    #[arg(long, env = "APP_DB_PASSWORD", hide_env_values = true)]
    password: String,
}

pub(crate) async fn run(args: EnsureAppRoleArgs) -> Result<(), String> {
    if args.role_name.trim().is_empty() {
        return Err("role_name cannot be empty".to_string());
    }

    if args.password.trim().is_empty() {
        return Err("password cannot be empty".to_string());
    }

    let db = args.database.connect().await?;

    let mut tx = db
        .begin_transaction()
        .await
        .map_err(|error| format!("failed to start transaction: {error}"))?;

    // Identifiers and role passwords cannot be bound, so both are quoted server-side.
    let role = quoted(&mut tx, "SELECT quote_ident($1)", &args.role_name).await?;
    let password = quoted(&mut tx, "SELECT quote_literal($1)", &args.password).await?;

    let exists: bool = query_scalar("SELECT EXISTS (SELECT 1 FROM pg_roles WHERE rolname = $1)")
        .bind(&args.role_name)
        .fetch_one(&mut *tx)
        .await
        .map_err(|error| format!("failed to look up role: {error}"))?;

    let verb = if exists { "ALTER" } else { "CREATE" };

    let database: String = query_scalar("SELECT quote_ident(current_database())")
        .fetch_one(&mut *tx)
        .await
        .map_err(|error| format!("failed to resolve database name: {error}"))?;

    let statements = [
        format!("{verb} ROLE {role} {RUNTIME_ROLE_FLAGS} PASSWORD {password}"),
        format!("GRANT CONNECT ON DATABASE {database} TO {role}"),
        format!("GRANT USAGE ON SCHEMA public TO {role}"),
        format!("GRANT SELECT, INSERT, UPDATE, DELETE ON ALL TABLES IN SCHEMA public TO {role}"),
        format!("GRANT USAGE, SELECT ON ALL SEQUENCES IN SCHEMA public TO {role}"),
        format!(
            "ALTER DEFAULT PRIVILEGES IN SCHEMA public GRANT SELECT, INSERT, UPDATE, DELETE ON TABLES TO {role}"
        ),
        format!("ALTER DEFAULT PRIVILEGES IN SCHEMA public GRANT USAGE, SELECT ON SEQUENCES TO {role}"),
    ];

    for (index, sql) in statements.iter().enumerate() {
        query(sql)
            .execute(&mut *tx)
            .await
            // The first statement carries the password; never echo it.
            .map_err(|error| match index {
                0 => format!("failed to {} role: {error}", verb.to_lowercase()),
                _ => format!("failed to apply `{sql}`: {error}"),
            })?;
    }

    tx.commit()
        .await
        .map_err(|error| format!("failed to commit role changes: {error}"))?;

    println!("ensured runtime role: {}", args.role_name);
    println!("granted table access in database {database}");

    Ok(())
}

async fn quoted(
    tx: &mut Transaction<'_, Postgres>,
    sql: &str,
    value: &str,
) -> Result<String, String> {
    query_scalar(sql)
        .bind(value)
        .fetch_one(&mut **tx)
        .await
        .map_err(|error| format!("failed to quote value: {error}"))
}
