//! Custom Fields Repository

use gabinet::fields::{EntityType, FieldDefinition, FieldValues};
use jiff_sqlx::Timestamp as SqlxTimestamp;
use serde_json::Value;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, types::Json};
use uuid::Uuid;

use crate::{
    database::parse_column,
    domain::custom_fields::records::{CustomFieldRecord, CustomFieldUuid},
    uuids::into_uuids,
};

const LIST_DEFINITIONS_SQL: &str = include_str!("sql/list_definitions.sql");
const GET_DEFINITIONS_SQL: &str = include_str!("sql/get_definitions.sql");
const LOCK_DEFINITION_SQL: &str = include_str!("sql/lock_definition.sql");
const CREATE_DEFINITION_SQL: &str = include_str!("sql/create_definition.sql");
const UPDATE_DEFINITION_SQL: &str = include_str!("sql/update_definition.sql");
const DELETE_DEFINITION_SQL: &str = include_str!("sql/delete_definition.sql");
const UPSERT_VALUE_SQL: &str = include_str!("sql/upsert_value.sql");
const DELETE_VALUE_SQL: &str = include_str!("sql/delete_value.sql");
const LIST_VALUES_SQL: &str = include_str!("sql/list_values.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCustomFieldsRepository;

impl PgCustomFieldsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    #[tracing::instrument(
        name = "custom_fields.repository.list_definitions",
        skip(self, tx),
        fields(entity_type = %entity_type, definition_count = tracing::field::Empty),
        err
    )]
    pub(crate) async fn list_definitions(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        entity_type: EntityType,
    ) -> Result<Vec<CustomFieldRecord>, sqlx::Error> {
        let definitions = query_as::<Postgres, CustomFieldRecord>(LIST_DEFINITIONS_SQL)
            .bind(entity_type.as_str())
            .fetch_all(&mut **tx)
            .await?;

        tracing::Span::current().record("definition_count", definitions.len());

        Ok(definitions)
    }

    pub(crate) async fn get_definitions(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        fields: &[CustomFieldUuid],
    ) -> Result<Vec<CustomFieldRecord>, sqlx::Error> {
        query_as::<Postgres, CustomFieldRecord>(GET_DEFINITIONS_SQL)
            .bind(into_uuids(fields))
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn lock_definition(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        field: CustomFieldUuid,
    ) -> Result<CustomFieldRecord, sqlx::Error> {
        query_as::<Postgres, CustomFieldRecord>(LOCK_DEFINITION_SQL)
            .bind(field.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn create_definition(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        definition: &FieldDefinition,
    ) -> Result<CustomFieldRecord, sqlx::Error> {
        query_as::<Postgres, CustomFieldRecord>(CREATE_DEFINITION_SQL)
            .bind(definition.uuid)
            .bind(definition.entity_type.as_str())
            .bind(definition.key.as_str())
            .bind(definition.name.trim())
            .bind(definition.field_type.as_str())
            .bind(Json(&definition.options))
            .bind(definition.required)
            .bind(definition.group.as_deref())
            .bind(definition.position)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_definition(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        definition: &FieldDefinition,
    ) -> Result<CustomFieldRecord, sqlx::Error> {
        query_as::<Postgres, CustomFieldRecord>(UPDATE_DEFINITION_SQL)
            .bind(definition.uuid)
            .bind(definition.name.trim())
            .bind(Json(&definition.options))
            .bind(definition.required)
            .bind(definition.group.as_deref())
            .bind(definition.position)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn delete_definition(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        field: CustomFieldUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_DEFINITION_SQL)
            .bind(field.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn upsert_value(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        field: CustomFieldUuid,
        entity: Uuid,
        value: &Value,
    ) -> Result<(), sqlx::Error> {
        query(UPSERT_VALUE_SQL)
            .bind(field.into_uuid())
            .bind(entity)
            .bind(Json(value))
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    pub(crate) async fn delete_value(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        field: CustomFieldUuid,
        entity: Uuid,
    ) -> Result<(), sqlx::Error> {
        query(DELETE_VALUE_SQL)
            .bind(field.into_uuid())
            .bind(entity)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    #[tracing::instrument(
        name = "custom_fields.repository.list_values",
        skip(self, tx, entities),
        fields(
            entity_type = %entity_type,
            entity_count = entities.len(),
            value_count = tracing::field::Empty
        ),
        err
    )]
    pub(crate) async fn list_values(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        entity_type: EntityType,
        entities: &[Uuid],
    ) -> Result<FieldValues, sqlx::Error> {
        let rows: Vec<(Uuid, Uuid, Json<Value>)> = query_as(LIST_VALUES_SQL)
            .bind(entity_type.as_str())
            .bind(entities)
            .fetch_all(&mut **tx)
            .await?;

        tracing::Span::current().record("value_count", rows.len());

        let mut values = FieldValues::default();

        for (entity, definition, Json(value)) in rows {
            values.entry(entity).or_default().insert(definition, value);
        }

        Ok(values)
    }
}

impl<'r> FromRow<'r, PgRow> for CustomFieldRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: CustomFieldUuid::from_uuid(row.try_get("uuid")?),
            entity_type: parse_column(row, "entity_type")?,
            key: parse_column(row, "key")?,
            name: row.try_get("name")?,
            field_type: parse_column(row, "field_type")?,
            options: row.try_get::<Json<Vec<String>>, _>("options")?.0,
            required: row.try_get("required")?,
            group: row.try_get("field_group")?,
            position: row.try_get("position")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
