//! Saved views service.

use async_trait::async_trait;
use gabinet::{fields::EntityType, views::validate_name};
use mockall::automock;
use tracing::debug;

use crate::{
    database::Db,
    domain::{
        tenants::records::TenantUuid,
        views::{
            data::{NewSavedView, SavedViewUpdate},
            errors::ViewsServiceError,
            records::{SavedViewRecord, SavedViewUuid},
            repository::PgViewsRepository,
        },
    },
};

#[derive(Debug, Clone)]
pub struct PgViewsService {
    db: Db,
    repository: PgViewsRepository,
}

impl PgViewsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgViewsRepository::new(),
        }
    }
}

#[async_trait]
impl ViewsService for PgViewsService {
    async fn list_views(
        &self,
        tenant: TenantUuid,
        entity_type: EntityType,
    ) -> Result<Vec<SavedViewRecord>, ViewsServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let views = self.repository.list_views(&mut tx, entity_type).await?;

        tx.commit().await?;

        Ok(views)
    }

    async fn get_view(
        &self,
        tenant: TenantUuid,
        view: SavedViewUuid,
    ) -> Result<SavedViewRecord, ViewsServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let view = self.repository.get_view(&mut tx, view).await?;

        tx.commit().await?;

        Ok(view)
    }

    async fn create_view(
        &self,
        tenant: TenantUuid,
        view: NewSavedView,
    ) -> Result<SavedViewRecord, ViewsServiceError> {
        validate_name(&view.name)?;
        view.config.validate()?;

        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let created = self
            .repository
            .create_view(
                &mut tx,
                view.uuid,
                view.entity_type,
                view.name.trim(),
                &view.config,
            )
            .await?;

        tx.commit().await?;

        debug!(view = %created.uuid, entity_type = %created.entity_type, "created saved view");

        Ok(created)
    }

    async fn update_view(
        &self,
        tenant: TenantUuid,
        view: SavedViewUuid,
        update: SavedViewUpdate,
    ) -> Result<SavedViewRecord, ViewsServiceError> {
        validate_name(&update.name)?;
        update.config.validate()?;

        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        if self.repository.lock_view(&mut tx, view).await?.is_system {
            return Err(ViewsServiceError::Immutable);
        }

        let updated = self
            .repository
            .update_view(&mut tx, view, update.name.trim(), &update.config)
            .await?;

        tx.commit().await?;

        debug!(view = %updated.uuid, "updated saved view");

        Ok(updated)
    }

    async fn delete_view(
        &self,
        tenant: TenantUuid,
        view: SavedViewUuid,
    ) -> Result<(), ViewsServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        if self.repository.lock_view(&mut tx, view).await?.is_system {
            return Err(ViewsServiceError::Immutable);
        }

        let rows_affected = self.repository.delete_view(&mut tx, view).await?;

        if rows_affected == 0 {
            return Err(ViewsServiceError::NotFound);
        }

        tx.commit().await?;

        debug!(%view, "deleted saved view");

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait ViewsService: Send + Sync {
    /// Views for an entity type, system views first, then by name.
    async fn list_views(
        &self,
        tenant: TenantUuid,
        entity_type: EntityType,
    ) -> Result<Vec<SavedViewRecord>, ViewsServiceError>;

    /// Retrieve a single view.
    async fn get_view(
        &self,
        tenant: TenantUuid,
        view: SavedViewUuid,
    ) -> Result<SavedViewRecord, ViewsServiceError>;

    /// Create a user view. Filters with unknown operators or blank fields are rejected.
    async fn create_view(
        &self,
        tenant: TenantUuid,
        view: NewSavedView,
    ) -> Result<SavedViewRecord, ViewsServiceError>;

    /// Rename a user view or replace its configuration.
    async fn update_view(
        &self,
        tenant: TenantUuid,
        view: SavedViewUuid,
        update: SavedViewUpdate,
    ) -> Result<SavedViewRecord, ViewsServiceError>;

    /// Delete a user view.
    async fn delete_view(
        &self,
        tenant: TenantUuid,
        view: SavedViewUuid,
    ) -> Result<(), ViewsServiceError>;
}
