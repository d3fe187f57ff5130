//! Custom fields service.

use async_trait::async_trait;
use gabinet::fields::{EntityType, FieldDefinition, FieldValues};
use mockall::automock;
use rustc_hash::FxHashMap;
use tracing::debug;
use uuid::Uuid;

use crate::{
    database::Db,
    domain::{
        custom_fields::{
            data::{CustomFieldUpdate, CustomFieldValue, NewCustomField},
            errors::CustomFieldsServiceError,
            records::{CustomFieldRecord, CustomFieldUuid},
            repository::PgCustomFieldsRepository,
        },
        tenants::records::TenantUuid,
    },
};

#[derive(Debug, Clone)]
pub struct PgCustomFieldsService {
    db: Db,
    repository: PgCustomFieldsRepository,
}

impl PgCustomFieldsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgCustomFieldsRepository::new(),
        }
    }
}

#[async_trait]
impl CustomFieldsService for PgCustomFieldsService {
    async fn list_definitions(
        &self,
        tenant: TenantUuid,
        entity_type: EntityType,
    ) -> Result<Vec<CustomFieldRecord>, CustomFieldsServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let definitions = self
            .repository
            .list_definitions(&mut tx, entity_type)
            .await?;

        tx.commit().await?;

        Ok(definitions)
    }

    async fn create_definition(
        &self,
        tenant: TenantUuid,
        field: NewCustomField,
    ) -> Result<CustomFieldRecord, CustomFieldsServiceError> {
        let definition = field.definition();

        definition.validate()?;

        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let created = self
            .repository
            .create_definition(&mut tx, &definition)
            .await?;

        tx.commit().await?;

        debug!(
            field = %created.uuid,
            key = %created.key,
            entity_type = %created.entity_type,
            "created custom field"
        );

        Ok(created)
    }

    async fn update_definition(
        &self,
        tenant: TenantUuid,
        field: CustomFieldUuid,
        update: CustomFieldUpdate,
    ) -> Result<CustomFieldRecord, CustomFieldsServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let current = self.repository.lock_definition(&mut tx, field).await?;
        let definition = update.apply_to(&current);

        definition.validate()?;

        let updated = self
            .repository
            .update_definition(&mut tx, &definition)
            .await?;

        tx.commit().await?;

        debug!(%field, "updated custom field");

        Ok(updated)
    }

    async fn delete_definition(
        &self,
        tenant: TenantUuid,
        field: CustomFieldUuid,
    ) -> Result<(), CustomFieldsServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let rows_affected = self.repository.delete_definition(&mut tx, field).await?;

        if rows_affected == 0 {
            return Err(CustomFieldsServiceError::NotFound);
        }

        tx.commit().await?;

        debug!(%field, "deleted custom field and its values");

        Ok(())
    }

    async fn set_values(
        &self,
        tenant: TenantUuid,
        entity_type: EntityType,
        entity: Uuid,
        values: Vec<CustomFieldValue>,
    ) -> Result<(), CustomFieldsServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let fields: Vec<CustomFieldUuid> = values.iter().map(|value| value.field).collect();

        let definitions: FxHashMap<CustomFieldUuid, FieldDefinition> = self
            .repository
            .get_definitions(&mut tx, &fields)
            .await?
            .iter()
            .map(|record| (record.uuid, FieldDefinition::from(record)))
            .collect();

        for CustomFieldValue { field, value } in &values {
            let definition = definitions
                .get(field)
                .ok_or(CustomFieldsServiceError::NotFound)?;

            definition.check_entity_type(entity_type)?;
            definition.check_value(value)?;

            if value.is_null() {
                self.repository.delete_value(&mut tx, *field, entity).await?;
            } else {
                self.repository
                    .upsert_value(&mut tx, *field, entity, value)
                    .await?;
            }
        }

        tx.commit().await?;

        debug!(%entity, %entity_type, value_count = values.len(), "wrote custom field values");

        Ok(())
    }

    async fn values_for(
        &self,
        tenant: TenantUuid,
        entity_type: EntityType,
        entities: Vec<Uuid>,
    ) -> Result<FieldValues, CustomFieldsServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let values = self
            .repository
            .list_values(&mut tx, entity_type, &entities)
            .await?;

        tx.commit().await?;

        Ok(values)
    }
}

#[automock]
#[async_trait]
pub trait CustomFieldsService: Send + Sync {
    /// Definitions for an entity type, in display order.
    async fn list_definitions(
        &self,
        tenant: TenantUuid,
        entity_type: EntityType,
    ) -> Result<Vec<CustomFieldRecord>, CustomFieldsServiceError>;

    /// Creates a field definition.
    async fn create_definition(
        &self,
        tenant: TenantUuid,
        field: NewCustomField,
    ) -> Result<CustomFieldRecord, CustomFieldsServiceError>;

    /// Updates the display attributes of a field definition.
    async fn update_definition(
        &self,
        tenant: TenantUuid,
        field: CustomFieldUuid,
        update: CustomFieldUpdate,
    ) -> Result<CustomFieldRecord, CustomFieldsServiceError>;

    /// Deletes a field definition together with its stored values.
    async fn delete_definition(
        &self,
        tenant: TenantUuid,
        field: CustomFieldUuid,
    ) -> Result<(), CustomFieldsServiceError>;

    /// Writes values for one entity in a single transaction. `null` clears a value.
    async fn set_values(
        &self,
        tenant: TenantUuid,
        entity_type: EntityType,
        entity: Uuid,
        values: Vec<CustomFieldValue>,
    ) -> Result<(), CustomFieldsServiceError>;

    /// Stored values for the given entities, grouped by entity then field.
    async fn values_for(
        &self,
        tenant: TenantUuid,
        entity_type: EntityType,
        entities: Vec<Uuid>,
    ) -> Result<FieldValues, CustomFieldsServiceError>;
}
