//! Appointments Repository

use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};

use crate::{
    database::parse_column,
    domain::{
        appointments::{
            data::NewAppointment,
            records::{AppointmentRecord, AppointmentStatus, AppointmentUuid},
        },
        patients::records::PatientUuid,
    },
};

const CREATE_APPOINTMENT_SQL: &str = include_str!("sql/create_appointment.sql");
const GET_APPOINTMENT_SQL: &str = include_str!("sql/get_appointment.sql");
const LIST_FOR_PATIENT_SQL: &str = include_str!("sql/list_for_patient.sql");
const LIST_BETWEEN_SQL: &str = include_str!("sql/list_between.sql");
const UPDATE_STATUS_SQL: &str = include_str!("sql/update_status.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgAppointmentsRepository;

impl PgAppointmentsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_appointment(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        appointment: &NewAppointment,
    ) -> Result<AppointmentRecord, sqlx::Error> {
        query_as::<Postgres, AppointmentRecord>(CREATE_APPOINTMENT_SQL)
            .bind(appointment.uuid.into_uuid())
            .bind(appointment.patient_uuid.into_uuid())
            .bind(appointment.title.trim())
            .bind(SqlxTimestamp::from(appointment.starts_at))
            .bind(SqlxTimestamp::from(appointment.ends_at))
            .bind(appointment.notes.as_deref())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_appointment(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        appointment: AppointmentUuid,
    ) -> Result<AppointmentRecord, sqlx::Error> {
        query_as::<Postgres, AppointmentRecord>(GET_APPOINTMENT_SQL)
            .bind(appointment.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    #[tracing::instrument(
        name = "appointments.repository.list_for_patient",
        skip(self, tx),
        fields(appointment_count = tracing::field::Empty),
        err
    )]
    pub(crate) async fn list_for_patient(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        patient: PatientUuid,
    ) -> Result<Vec<AppointmentRecord>, sqlx::Error> {
        let appointments = query_as::<Postgres, AppointmentRecord>(LIST_FOR_PATIENT_SQL)
            .bind(patient.into_uuid())
            .fetch_all(&mut **tx)
            .await?;

        tracing::Span::current().record("appointment_count", appointments.len());

        Ok(appointments)
    }

    #[tracing::instrument(
        name = "appointments.repository.list_between",
        skip(self, tx),
        fields(appointment_count = tracing::field::Empty),
        err
    )]
    pub(crate) async fn list_between(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        from: Timestamp,
        until: Timestamp,
    ) -> Result<Vec<AppointmentRecord>, sqlx::Error> {
        let appointments = query_as::<Postgres, AppointmentRecord>(LIST_BETWEEN_SQL)
            .bind(SqlxTimestamp::from(from))
            .bind(SqlxTimestamp::from(until))
            .fetch_all(&mut **tx)
            .await?;

        tracing::Span::current().record("appointment_count", appointments.len());

        Ok(appointments)
    }

    pub(crate) async fn update_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        appointment: AppointmentUuid,
        status: AppointmentStatus,
    ) -> Result<AppointmentRecord, sqlx::Error> {
        query_as::<Postgres, AppointmentRecord>(UPDATE_STATUS_SQL)
            .bind(appointment.into_uuid())
            .bind(status.as_str())
            .fetch_one(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for AppointmentRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: AppointmentUuid::from_uuid(row.try_get("uuid")?),
            patient_uuid: PatientUuid::from_uuid(row.try_get("patient_uuid")?),
            title: row.try_get("title")?,
            starts_at: row.try_get::<SqlxTimestamp, _>("starts_at")?.to_jiff(),
            ends_at: row.try_get::<SqlxTimestamp, _>("ends_at")?.to_jiff(),
            status: parse_column(row, "status")?,
            notes: row.try_get("notes")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
