//! Database connection management

use std::{error::Error as StdError, str::FromStr};

use sqlx::{PgPool, Postgres, Row, Transaction, postgres::PgRow, query, query_as};
use thiserror::Error;

use crate::domain::tenants::records::TenantUuid;

/// SQL used to set tenant context for row-level security.
pub const SET_TENANT_CONTEXT_SQL: &str = "SELECT set_config('app.current_tenant_uuid', $1, true)";

const CURRENT_ROLE_FLAGS_SQL: &str =
    "SELECT current_user::text, rolsuper, rolbypassrls FROM pg_roles WHERE rolname = current_user";

/// Connection role checks.
#[derive(Debug, Error)]
pub enum DatabaseRoleError {
    /// The connected role ignores row-level security.
    #[error("database role {0:?} bypasses row-level security")]
    BypassesRowLevelSecurity(String),

    /// The role could not be inspected.
    #[error("failed to inspect database role")]
    Sql(#[from] sqlx::Error),
}

/// Shared pool with tenant-aware transactions.
#[derive(Debug, Clone)]
pub struct Db {
    pool: PgPool,
}

impl Db {
    /// Wrap a pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Underlying pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Begin a transaction and set tenant context for RLS policies.
    ///
    /// # Errors
    ///
    /// Returns an error when starting the transaction or setting tenant context fails.
    pub async fn begin_tenant_transaction(
        &self,
        tenant: TenantUuid,
    ) -> Result<Transaction<'static, Postgres>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        query(SET_TENANT_CONTEXT_SQL)
            .bind(tenant.into_uuid().to_string())
            .execute(&mut *tx)
            .await?;

        Ok(tx)
    }

    /// Begin a transaction without tenant context. Only tables outside row-level security
    /// are visible.
    ///
    /// # Errors
    ///
    /// Returns an error when starting the transaction fails.
    pub async fn begin_transaction(&self) -> Result<Transaction<'static, Postgres>, sqlx::Error> {
        self.pool.begin().await
    }
}

/// Connect to `PostgreSQL`.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPool::connect(database_url).await
}

/// Refuse to serve tenants through a role that skips row-level security.
///
/// Superusers and `BYPASSRLS` roles see every tenant's rows regardless of policies.
///
/// # Errors
///
/// Returns [`DatabaseRoleError::BypassesRowLevelSecurity`] for such roles.
pub async fn ensure_rls_enforced_role(pool: &PgPool) -> Result<(), DatabaseRoleError> {
    let (role, superuser, bypass_rls): (String, bool, bool) =
        query_as(CURRENT_ROLE_FLAGS_SQL).fetch_one(pool).await?;

    if superuser || bypass_rls {
        return Err(DatabaseRoleError::BypassesRowLevelSecurity(role));
    }

    tracing::debug!(role, "database role enforces row-level security");

    Ok(())
}

/// Read a text column through [`FromStr`], reporting parse failures as decode errors.
pub(crate) fn parse_column<T>(row: &PgRow, column: &str) -> sqlx::Result<T>
where
    T: FromStr,
    T::Err: StdError + Send + Sync + 'static,
{
    let raw: String = row.try_get(column)?;

    raw.parse().map_err(|error: T::Err| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(error),
    })
}
