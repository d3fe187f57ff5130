//! Contacts service.

use async_trait::async_trait;
use gabinet::{
    fields::{EntityType, FieldDefinition, merge_custom_fields},
    values::Row,
};
use mockall::automock;
use tracing::debug;
use uuid::Uuid;

use crate::{
    database::Db,
    domain::{
        contacts::{
            data::{ContactUpdate, NewContact},
            errors::ContactsServiceError,
            records::{CONTACT_COLUMNS, ContactRecord, ContactTable, ContactUuid},
            repository::PgContactsRepository,
        },
        custom_fields::repository::PgCustomFieldsRepository,
        tenants::records::TenantUuid,
        views::{records::SavedViewUuid, repository::PgViewsRepository},
    },
};

#[derive(Debug, Clone)]
pub struct PgContactsService {
    db: Db,
    repository: PgContactsRepository,
    custom_fields: PgCustomFieldsRepository,
    views: PgViewsRepository,
}

impl PgContactsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgContactsRepository::new(),
            custom_fields: PgCustomFieldsRepository::new(),
            views: PgViewsRepository::new(),
        }
    }
}

#[async_trait]
impl ContactsService for PgContactsService {
    async fn list_contacts(
        &self,
        tenant: TenantUuid,
        view: Option<SavedViewUuid>,
    ) -> Result<ContactTable, ContactsServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let config = match view {
            Some(view) => {
                let view = self
                    .views
                    .get_view(&mut tx, view)
                    .await
                    .map_err(|error| match error {
                        sqlx::Error::RowNotFound => ContactsServiceError::ViewNotFound,
                        error => error.into(),
                    })?;

                if view.entity_type != EntityType::Contact {
                    return Err(ContactsServiceError::InvalidView);
                }

                Some(view.config)
            }
            None => None,
        };

        let contacts = self.repository.list_contacts(&mut tx).await?;

        let definitions: Vec<FieldDefinition> = self
            .custom_fields
            .list_definitions(&mut tx, EntityType::Contact)
            .await?
            .iter()
            .map(FieldDefinition::from)
            .collect();

        let entities: Vec<Uuid> = contacts.iter().map(|c| c.uuid.into_uuid()).collect();

        let values = self
            .custom_fields
            .list_values(&mut tx, EntityType::Contact, &entities)
            .await?;

        tx.commit().await?;

        let mut rows: Vec<Row> = contacts.iter().map(ContactRecord::to_row).collect();

        merge_custom_fields(&mut rows, EntityType::Contact, &definitions, &values);

        let columns = match &config {
            Some(config) if !config.columns.is_empty() => config.columns.to_vec(),
            _ => CONTACT_COLUMNS
                .iter()
                .map(ToString::to_string)
                .chain(definitions.iter().map(|d| d.key.column_name()))
                .collect(),
        };

        let rows = match &config {
            Some(config) => config.apply(rows),
            None => rows,
        };

        debug!(row_count = rows.len(), view = ?view, "rendered contacts table");

        Ok(ContactTable { columns, rows })
    }

    async fn get_contact(
        &self,
        tenant: TenantUuid,
        contact: ContactUuid,
    ) -> Result<ContactRecord, ContactsServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let contact = self.repository.get_contact(&mut tx, contact).await?;

        tx.commit().await?;

        Ok(contact)
    }

    async fn create_contact(
        &self,
        tenant: TenantUuid,
        contact: NewContact,
    ) -> Result<ContactRecord, ContactsServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let created = self.repository.create_contact(&mut tx, &contact).await?;

        tx.commit().await?;

        debug!(contact = %created.uuid, "created contact");

        Ok(created)
    }

    async fn update_contact(
        &self,
        tenant: TenantUuid,
        contact: ContactUuid,
        update: ContactUpdate,
    ) -> Result<ContactRecord, ContactsServiceError> {
        if update.status.trim().is_empty() {
            return Err(ContactsServiceError::InvalidData);
        }

        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let updated = self
            .repository
            .update_contact(&mut tx, contact, &update)
            .await?;

        tx.commit().await?;

        debug!(%contact, "updated contact");

        Ok(updated)
    }

    async fn delete_contact(
        &self,
        tenant: TenantUuid,
        contact: ContactUuid,
    ) -> Result<(), ContactsServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let rows_affected = self.repository.delete_contact(&mut tx, contact).await?;

        if rows_affected == 0 {
            return Err(ContactsServiceError::NotFound);
        }

        tx.commit().await?;

        debug!(%contact, "deleted contact");

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait ContactsService: Send + Sync {
    /// Contacts as table rows with custom fields merged, optionally shaped by a saved view.
    async fn list_contacts(
        &self,
        tenant: TenantUuid,
        view: Option<SavedViewUuid>,
    ) -> Result<ContactTable, ContactsServiceError>;

    /// Retrieve a contact that has not been deleted.
    async fn get_contact(
        &self,
        tenant: TenantUuid,
        contact: ContactUuid,
    ) -> Result<ContactRecord, ContactsServiceError>;

    /// Create a contact.
    async fn create_contact(
        &self,
        tenant: TenantUuid,
        contact: NewContact,
    ) -> Result<ContactRecord, ContactsServiceError>;

    /// Replace a contact's details.
    async fn update_contact(
        &self,
        tenant: TenantUuid,
        contact: ContactUuid,
        update: ContactUpdate,
    ) -> Result<ContactRecord, ContactsServiceError>;

    /// Soft-delete a contact.
    async fn delete_contact(
        &self,
        tenant: TenantUuid,
        contact: ContactUuid,
    ) -> Result<(), ContactsServiceError>;
}

#[cfg(test)]
mod tests {
    use gabinet::{
        fields::{FieldKey, FieldType},
        filters::{FilterCondition, FilterLogic, FilterOperator, ViewFilter},
        views::{SortDirection, SortSpec, ViewConfig},
    };
    use serde_json::{Value, json};
    use smallvec::smallvec;
    use testresult::TestResult;

    use crate::{
        domain::{
            custom_fields::{
                CustomFieldsService,
                data::{CustomFieldValue, NewCustomField},
                records::CustomFieldUuid,
            },
            views::{ViewsService, data::NewSavedView},
        },
        test::TestContext,
    };

    use super::*;

    fn new_contact(first_name: &str, last_name: &str, email: Option<&str>) -> NewContact {
        NewContact {
            uuid: ContactUuid::new(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            email: email.map(ToString::to_string),
            phone: None,
            company_name: None,
            status: None,
        }
    }

    fn last_names(table: &ContactTable) -> Vec<&str> {
        table
            .rows
            .iter()
            .filter_map(|row| row.get("last_name").and_then(Value::as_str))
            .collect()
    }

    async fn create_tier_field(ctx: &TestContext) -> TestResult<CustomFieldUuid> {
        let uuid = CustomFieldUuid::new();

        ctx.custom_fields
            .create_definition(
                ctx.tenant_uuid,
                NewCustomField {
                    uuid,
                    entity_type: EntityType::Contact,
                    key: FieldKey::parse("tier")?,
                    name: "Tier".to_string(),
                    field_type: FieldType::Select,
                    options: vec!["gold".to_string(), "silver".to_string()],
                    required: false,
                    group: None,
                    position: 0,
                },
            )
            .await?;

        Ok(uuid)
    }

    async fn set_tier(
        ctx: &TestContext,
        field: CustomFieldUuid,
        contact: ContactUuid,
        tier: &str,
    ) -> TestResult {
        ctx.custom_fields
            .set_values(
                ctx.tenant_uuid,
                EntityType::Contact,
                contact.into_uuid(),
                vec![CustomFieldValue {
                    field,
                    value: json!(tier),
                }],
            )
            .await?;

        Ok(())
    }

    #[tokio::test]
    async fn create_contact_defaults_status_to_active() -> TestResult {
        let ctx = TestContext::new().await;

        let created = ctx
            .contacts
            .create_contact(ctx.tenant_uuid, new_contact("Anna", "Nowak", None))
            .await?;

        assert_eq!(created.status, "active");
        assert!(created.deleted_at.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn create_contact_rejects_blank_names() {
        let ctx = TestContext::new().await;

        let result = ctx
            .contacts
            .create_contact(ctx.tenant_uuid, new_contact(" ", "", None))
            .await;

        assert!(
            matches!(result, Err(ContactsServiceError::InvalidData)),
            "expected InvalidData, got {result:?}"
        );
    }

    #[tokio::test]
    async fn update_contact_replaces_details() -> TestResult {
        let ctx = TestContext::new().await;
        let contact = new_contact("Anna", "Nowak", None);

        ctx.contacts
            .create_contact(ctx.tenant_uuid, contact.clone())
            .await?;

        let updated = ctx
            .contacts
            .update_contact(
                ctx.tenant_uuid,
                contact.uuid,
                ContactUpdate {
                    first_name: "Anna".to_string(),
                    last_name: "Kowalska".to_string(),
                    email: Some("anna@example.com".to_string()),
                    phone: None,
                    company_name: Some("Apteka".to_string()),
                    status: "inactive".to_string(),
                },
            )
            .await?;

        assert_eq!(updated.last_name, "Kowalska");
        assert_eq!(updated.email.as_deref(), Some("anna@example.com"));
        assert_eq!(updated.status, "inactive");

        Ok(())
    }

    #[tokio::test]
    async fn deleted_contacts_are_hidden() -> TestResult {
        let ctx = TestContext::new().await;
        let contact = new_contact("Jan", "Zieliński", None);

        ctx.contacts
            .create_contact(ctx.tenant_uuid, contact.clone())
            .await?;
        ctx.contacts
            .delete_contact(ctx.tenant_uuid, contact.uuid)
            .await?;

        let get = ctx.contacts.get_contact(ctx.tenant_uuid, contact.uuid).await;
        let delete_again = ctx
            .contacts
            .delete_contact(ctx.tenant_uuid, contact.uuid)
            .await;
        let table = ctx.contacts.list_contacts(ctx.tenant_uuid, None).await?;

        assert!(
            matches!(get, Err(ContactsServiceError::NotFound)),
            "expected NotFound, got {get:?}"
        );
        assert!(
            matches!(delete_again, Err(ContactsServiceError::NotFound)),
            "expected NotFound, got {delete_again:?}"
        );
        assert!(table.rows.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn list_contacts_merges_custom_field_columns() -> TestResult {
        let ctx = TestContext::new().await;
        let tier = create_tier_field(&ctx).await?;
        let gold = new_contact("Anna", "Nowak", None);
        let plain = new_contact("Jan", "Kowalski", None);

        ctx.contacts.create_contact(ctx.tenant_uuid, gold.clone()).await?;
        ctx.contacts.create_contact(ctx.tenant_uuid, plain.clone()).await?;
        set_tier(&ctx, tier, gold.uuid, "gold").await?;

        let table = ctx.contacts.list_contacts(ctx.tenant_uuid, None).await?;

        let tier_of = |contact: ContactUuid| {
            table
                .rows
                .iter()
                .find(|row| row.get("uuid") == Some(&json!(contact.to_string())))
                .and_then(|row| row.get("cf_tier"))
                .cloned()
        };

        assert!(table.columns.contains(&"cf_tier".to_string()));
        assert_eq!(tier_of(gold.uuid), Some(json!("gold")));
        assert_eq!(tier_of(plain.uuid), Some(Value::Null));

        Ok(())
    }

    #[tokio::test]
    async fn list_contacts_applies_saved_view() -> TestResult {
        let ctx = TestContext::new().await;
        let tier = create_tier_field(&ctx).await?;

        for (first, last, value) in [
            ("Ewa", "Wójcik", "gold"),
            ("Piotr", "Adamski", "gold"),
            ("Marek", "Lis", "silver"),
        ] {
            let contact = new_contact(first, last, None);

            ctx.contacts
                .create_contact(ctx.tenant_uuid, contact.clone())
                .await?;
            set_tier(&ctx, tier, contact.uuid, value).await?;
        }

        let view = SavedViewUuid::new();

        ctx.views
            .create_view(
                ctx.tenant_uuid,
                NewSavedView {
                    uuid: view,
                    entity_type: EntityType::Contact,
                    name: "Gold tier".to_string(),
                    config: ViewConfig {
                        filters: ViewFilter::new(
                            vec![FilterCondition::new(
                                "cf_tier",
                                FilterOperator::Equals,
                                "gold",
                            )],
                            FilterLogic::And,
                        ),
                        sort: Some(SortSpec {
                            field: "last_name".to_string(),
                            direction: SortDirection::Asc,
                        }),
                        columns: smallvec!["first_name".to_string(), "last_name".to_string()],
                    },
                },
            )
            .await?;

        let table = ctx
            .contacts
            .list_contacts(ctx.tenant_uuid, Some(view))
            .await?;

        assert_eq!(last_names(&table), vec!["Adamski", "Wójcik"]);
        assert_eq!(table.columns, vec!["first_name", "last_name"]);

        Ok(())
    }

    #[tokio::test]
    async fn list_contacts_with_missing_email_system_view() -> TestResult {
        let ctx = TestContext::new().await;

        ctx.contacts
            .create_contact(ctx.tenant_uuid, new_contact("Anna", "Nowak", None))
            .await?;
        ctx.contacts
            .create_contact(
                ctx.tenant_uuid,
                new_contact("Jan", "Kowalski", Some("jan@example.com")),
            )
            .await?;

        let view = ctx
            .views
            .list_views(ctx.tenant_uuid, EntityType::Contact)
            .await?
            .into_iter()
            .find(|view| view.slug.as_deref() == Some("missing-email"))
            .ok_or("expected the missing-email system view")?;

        let table = ctx
            .contacts
            .list_contacts(ctx.tenant_uuid, Some(view.uuid))
            .await?;

        assert_eq!(last_names(&table), vec!["Nowak"]);

        Ok(())
    }

    #[tokio::test]
    async fn list_contacts_rejects_views_of_other_entities() -> TestResult {
        let ctx = TestContext::new().await;

        let lead_view = ctx
            .views
            .list_views(ctx.tenant_uuid, EntityType::Lead)
            .await?
            .into_iter()
            .next()
            .ok_or("expected a lead system view")?;

        let wrong_entity = ctx
            .contacts
            .list_contacts(ctx.tenant_uuid, Some(lead_view.uuid))
            .await;
        let unknown = ctx
            .contacts
            .list_contacts(ctx.tenant_uuid, Some(SavedViewUuid::new()))
            .await;

        assert!(
            matches!(wrong_entity, Err(ContactsServiceError::InvalidView)),
            "expected InvalidView, got {wrong_entity:?}"
        );
        assert!(
            matches!(unknown, Err(ContactsServiceError::ViewNotFound)),
            "expected ViewNotFound, got {unknown:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn contacts_are_not_visible_to_other_tenants() -> TestResult {
        let ctx = TestContext::new().await;
        let contact = new_contact("Anna", "Nowak", None);

        ctx.contacts
            .create_contact(ctx.tenant_uuid, contact.clone())
            .await?;

        let tenant_b = ctx.create_tenant("Tenant B").await;

        let result = ctx.contacts.get_contact(tenant_b, contact.uuid).await;
        let table = ctx.contacts.list_contacts(tenant_b, None).await?;

        assert!(
            matches!(result, Err(ContactsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
        assert!(table.rows.is_empty());

        Ok(())
    }
}
