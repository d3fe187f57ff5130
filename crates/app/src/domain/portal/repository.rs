//! Portal Sessions Repository

use gabinet::portal::PortalSession;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};

use crate::domain::{
    patients::records::PatientUuid,
    portal::records::{PortalSessionRecord, PortalSessionUuid},
    tenants::records::TenantUuid,
};

const UPSERT_OTP_SQL: &str = include_str!("sql/upsert_otp.sql");
const LOCK_FOR_PATIENT_SQL: &str = include_str!("sql/lock_for_patient.sql");
const GET_SESSION_SQL: &str = include_str!("sql/get_session.sql");
const LOCK_SESSION_SQL: &str = include_str!("sql/lock_session.sql");
const SAVE_SESSION_SQL: &str = include_str!("sql/save_session.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgPortalRepository;

impl PgPortalRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Put the patient's session into the code-pending state, creating it if needed.
    ///
    /// An existing session keeps its UUID.
    #[tracing::instrument(
        name = "portal.repository.upsert_otp",
        skip(self, tx, session),
        fields(patient = %session.patient_uuid),
        err
    )]
    pub(crate) async fn upsert_otp(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        tenant: TenantUuid,
        session: &PortalSession,
    ) -> Result<PortalSessionRecord, sqlx::Error> {
        query_as::<Postgres, PortalSessionRecord>(UPSERT_OTP_SQL)
            .bind(session.uuid)
            .bind(tenant.into_uuid())
            .bind(session.patient_uuid)
            .bind(session.otp_hash.as_deref())
            .bind(session.otp_expires_at.map(SqlxTimestamp::from))
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn lock_for_patient(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        tenant: TenantUuid,
        patient: PatientUuid,
    ) -> Result<Option<PortalSessionRecord>, sqlx::Error> {
        query_as::<Postgres, PortalSessionRecord>(LOCK_FOR_PATIENT_SQL)
            .bind(patient.into_uuid())
            .bind(tenant.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn get_session(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        session: PortalSessionUuid,
    ) -> Result<Option<PortalSessionRecord>, sqlx::Error> {
        query_as::<Postgres, PortalSessionRecord>(GET_SESSION_SQL)
            .bind(session.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn lock_session(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        tenant: TenantUuid,
        session: PortalSessionUuid,
    ) -> Result<PortalSessionRecord, sqlx::Error> {
        query_as::<Postgres, PortalSessionRecord>(LOCK_SESSION_SQL)
            .bind(session.into_uuid())
            .bind(tenant.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn save_session(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        session: &PortalSession,
    ) -> Result<(), sqlx::Error> {
        query(SAVE_SESSION_SQL)
            .bind(session.uuid)
            .bind(session.otp_hash.as_deref())
            .bind(session.otp_expires_at.map(SqlxTimestamp::from))
            .bind(i16::from(session.otp_attempts))
            .bind(session.token_hash.as_deref())
            .bind(session.token_expires_at.map(SqlxTimestamp::from))
            .bind(session.is_active)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }
}

impl<'r> FromRow<'r, PgRow> for PortalSessionRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let attempts: i16 = row.try_get("otp_attempts")?;

        let otp_attempts = u8::try_from(attempts).map_err(|error| sqlx::Error::ColumnDecode {
            index: "otp_attempts".to_string(),
            source: Box::new(error),
        })?;

        Ok(Self {
            tenant_uuid: TenantUuid::from_uuid(row.try_get("tenant_uuid")?),
            session: PortalSession {
                uuid: row.try_get("uuid")?,
                patient_uuid: row.try_get("patient_uuid")?,
                otp_hash: row.try_get("otp_hash")?,
                otp_expires_at: row
                    .try_get::<Option<SqlxTimestamp>, _>("otp_expires_at")?
                    .map(|ts| ts.to_jiff()),
                otp_attempts,
                token_hash: row.try_get("token_hash")?,
                token_expires_at: row
                    .try_get::<Option<SqlxTimestamp>, _>("token_expires_at")?
                    .map(|ts| ts.to_jiff()),
                is_active: row.try_get("is_active")?,
            },
        })
    }
}
