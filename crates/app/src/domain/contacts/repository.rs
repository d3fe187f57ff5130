//! Contacts Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};

use crate::domain::contacts::{
    data::{ContactUpdate, NewContact},
    records::{ContactRecord, ContactUuid},
};

const LIST_CONTACTS_SQL: &str = include_str!("sql/list_contacts.sql");
const GET_CONTACT_SQL: &str = include_str!("sql/get_contact.sql");
const CREATE_CONTACT_SQL: &str = include_str!("sql/create_contact.sql");
const UPDATE_CONTACT_SQL: &str = include_str!("sql/update_contact.sql");
const DELETE_CONTACT_SQL: &str = include_str!("sql/delete_contact.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgContactsRepository;

impl PgContactsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    #[tracing::instrument(
        name = "contacts.repository.list_contacts",
        skip(self, tx),
        fields(contact_count = tracing::field::Empty),
        err
    )]
    pub(crate) async fn list_contacts(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<ContactRecord>, sqlx::Error> {
        let contacts = query_as::<Postgres, ContactRecord>(LIST_CONTACTS_SQL)
            .fetch_all(&mut **tx)
            .await?;

        tracing::Span::current().record("contact_count", contacts.len());

        Ok(contacts)
    }

    pub(crate) async fn get_contact(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        contact: ContactUuid,
    ) -> Result<ContactRecord, sqlx::Error> {
        query_as::<Postgres, ContactRecord>(GET_CONTACT_SQL)
            .bind(contact.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn create_contact(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        contact: &NewContact,
    ) -> Result<ContactRecord, sqlx::Error> {
        query_as::<Postgres, ContactRecord>(CREATE_CONTACT_SQL)
            .bind(contact.uuid.into_uuid())
            .bind(contact.first_name.trim())
            .bind(contact.last_name.trim())
            .bind(contact.email.as_deref())
            .bind(contact.phone.as_deref())
            .bind(contact.company_name.as_deref())
            .bind(contact.status.as_deref())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_contact(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        contact: ContactUuid,
        update: &ContactUpdate,
    ) -> Result<ContactRecord, sqlx::Error> {
        query_as::<Postgres, ContactRecord>(UPDATE_CONTACT_SQL)
            .bind(contact.into_uuid())
            .bind(update.first_name.trim())
            .bind(update.last_name.trim())
            .bind(update.email.as_deref())
            .bind(update.phone.as_deref())
            .bind(update.company_name.as_deref())
            .bind(&update.status)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn delete_contact(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        contact: ContactUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_CONTACT_SQL)
            .bind(contact.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for ContactRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: ContactUuid::from_uuid(row.try_get("uuid")?),
            first_name: row.try_get("first_name")?,
            last_name: row.try_get("last_name")?,
            email: row.try_get("email")?,
            phone: row.try_get("phone")?,
            company_name: row.try_get("company_name")?,
            status: row.try_get("status")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
            deleted_at: row
                .try_get::<Option<SqlxTimestamp>, _>("deleted_at")?
                .map(|ts| ts.to_jiff()),
        })
    }
}
