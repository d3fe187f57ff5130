//! Tenants service.

use async_trait::async_trait;
use gabinet::views::system_views;
use mockall::automock;
use tracing::info;

use crate::{
    database::Db,
    domain::{
        tenants::{
            data::NewTenant,
            errors::TenantsServiceError,
            records::{CreatedTenant, TenantRecord, TenantUuid},
            repository::PgTenantsRepository,
        },
        views::repository::PgViewsRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgTenantsService {
    db: Db,
    repository: PgTenantsRepository,
    views: PgViewsRepository,
}

impl PgTenantsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgTenantsRepository::new(),
            views: PgViewsRepository::new(),
        }
    }
}

#[async_trait]
impl TenantsService for PgTenantsService {
    async fn create_tenant(&self, tenant: NewTenant) -> Result<CreatedTenant, TenantsServiceError> {
        if tenant.name.trim().is_empty() {
            return Err(TenantsServiceError::InvalidData);
        }

        let bundled = system_views()?;

        // Seeded views are written under the new tenant's RLS context.
        let mut tx = self.db.begin_tenant_transaction(tenant.uuid).await?;

        let tenant = self.repository.create_tenant(&mut tx, tenant).await?;
        let system_views = self.views.seed_system_views(&mut tx, &bundled).await?;

        tx.commit().await?;

        info!(
            tenant = %tenant.uuid,
            system_views = system_views.len(),
            "created tenant"
        );

        Ok(CreatedTenant {
            tenant,
            system_views,
        })
    }

    async fn get_tenant(&self, tenant: TenantUuid) -> Result<TenantRecord, TenantsServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let record = self.repository.get_tenant(&mut tx, tenant).await?;

        tx.commit().await?;

        Ok(record)
    }
}

#[automock]
#[async_trait]
/// Tenant persistence operations.
pub trait TenantsService: Send + Sync {
    /// Creates a new tenant and seeds its system views.
    async fn create_tenant(&self, tenant: NewTenant) -> Result<CreatedTenant, TenantsServiceError>;

    /// Retrieve an active tenant.
    async fn get_tenant(&self, tenant: TenantUuid) -> Result<TenantRecord, TenantsServiceError>;
}
