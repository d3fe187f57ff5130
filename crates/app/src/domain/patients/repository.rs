//! Patients Repository

use jiff_sqlx::{Date as SqlxDate, Timestamp as SqlxTimestamp};
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};

use crate::domain::patients::{
    data::{NewPatient, PatientProfileUpdate},
    records::{PatientRecord, PatientUuid},
};

const LIST_PATIENTS_SQL: &str = include_str!("sql/list_patients.sql");
const GET_PATIENT_SQL: &str = include_str!("sql/get_patient.sql");
const FIND_BY_EMAIL_SQL: &str = include_str!("sql/find_by_email.sql");
const CREATE_PATIENT_SQL: &str = include_str!("sql/create_patient.sql");
const UPDATE_PATIENT_SQL: &str = include_str!("sql/update_patient.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgPatientsRepository;

impl PgPatientsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    #[tracing::instrument(
        name = "patients.repository.list_patients",
        skip(self, tx),
        fields(patient_count = tracing::field::Empty),
        err
    )]
    pub(crate) async fn list_patients(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<PatientRecord>, sqlx::Error> {
        let patients = query_as::<Postgres, PatientRecord>(LIST_PATIENTS_SQL)
            .fetch_all(&mut **tx)
            .await?;

        tracing::Span::current().record("patient_count", patients.len());

        Ok(patients)
    }

    pub(crate) async fn get_patient(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        patient: PatientUuid,
    ) -> Result<PatientRecord, sqlx::Error> {
        query_as::<Postgres, PatientRecord>(GET_PATIENT_SQL)
            .bind(patient.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn find_by_email(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        email: &str,
    ) -> Result<Option<PatientRecord>, sqlx::Error> {
        query_as::<Postgres, PatientRecord>(FIND_BY_EMAIL_SQL)
            .bind(email.trim())
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn create_patient(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        patient: &NewPatient,
    ) -> Result<PatientRecord, sqlx::Error> {
        query_as::<Postgres, PatientRecord>(CREATE_PATIENT_SQL)
            .bind(patient.uuid.into_uuid())
            .bind(patient.first_name.trim())
            .bind(patient.last_name.trim())
            .bind(patient.email.trim())
            .bind(patient.phone.as_deref())
            .bind(patient.date_of_birth.map(SqlxDate::from))
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_patient(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        patient: PatientUuid,
        update: &PatientProfileUpdate,
    ) -> Result<PatientRecord, sqlx::Error> {
        query_as::<Postgres, PatientRecord>(UPDATE_PATIENT_SQL)
            .bind(patient.into_uuid())
            .bind(update.first_name.trim())
            .bind(update.last_name.trim())
            .bind(update.phone.as_deref())
            .bind(update.date_of_birth.map(SqlxDate::from))
            .fetch_one(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for PatientRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: PatientUuid::from_uuid(row.try_get("uuid")?),
            first_name: row.try_get("first_name")?,
            last_name: row.try_get("last_name")?,
            email: row.try_get("email")?,
            phone: row.try_get("phone")?,
            date_of_birth: row
                .try_get::<Option<SqlxDate>, _>("date_of_birth")?
                .map(|date| date.to_jiff()),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
