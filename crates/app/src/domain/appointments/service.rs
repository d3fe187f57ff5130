//! Appointments service.

use async_trait::async_trait;
use gabinet::calendar::{WeekStart, month_grid};
use jiff::{Timestamp, tz::TimeZone};
use mockall::automock;
use tracing::debug;

use crate::{
    database::Db,
    domain::{
        appointments::{
            data::NewAppointment,
            errors::AppointmentsServiceError,
            records::{AppointmentRecord, AppointmentStatus, AppointmentUuid, MonthCalendar},
            repository::PgAppointmentsRepository,
        },
        patients::records::PatientUuid,
        tenants::records::TenantUuid,
    },
};

#[derive(Debug, Clone)]
pub struct PgAppointmentsService {
    db: Db,
    repository: PgAppointmentsRepository,
}

impl PgAppointmentsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgAppointmentsRepository::new(),
        }
    }
}

#[async_trait]
impl AppointmentsService for PgAppointmentsService {
    async fn create_appointment(
        &self,
        tenant: TenantUuid,
        appointment: NewAppointment,
    ) -> Result<AppointmentRecord, AppointmentsServiceError> {
        if appointment.ends_at <= appointment.starts_at {
            return Err(AppointmentsServiceError::InvalidData);
        }

        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let created = self
            .repository
            .create_appointment(&mut tx, &appointment)
            .await?;

        tx.commit().await?;

        debug!(
            appointment = %created.uuid,
            patient = %created.patient_uuid,
            starts_at = %created.starts_at,
            "created appointment"
        );

        Ok(created)
    }

    async fn get_appointment(
        &self,
        tenant: TenantUuid,
        appointment: AppointmentUuid,
    ) -> Result<AppointmentRecord, AppointmentsServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let appointment = self.repository.get_appointment(&mut tx, appointment).await?;

        tx.commit().await?;

        Ok(appointment)
    }

    async fn update_status(
        &self,
        tenant: TenantUuid,
        appointment: AppointmentUuid,
        status: AppointmentStatus,
    ) -> Result<AppointmentRecord, AppointmentsServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let updated = self
            .repository
            .update_status(&mut tx, appointment, status)
            .await?;

        tx.commit().await?;

        debug!(%appointment, %status, "updated appointment status");

        Ok(updated)
    }

    async fn list_for_patient(
        &self,
        tenant: TenantUuid,
        patient: PatientUuid,
    ) -> Result<Vec<AppointmentRecord>, AppointmentsServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let appointments = self.repository.list_for_patient(&mut tx, patient).await?;

        tx.commit().await?;

        Ok(appointments)
    }

    async fn list_between(
        &self,
        tenant: TenantUuid,
        from: Timestamp,
        until: Timestamp,
    ) -> Result<Vec<AppointmentRecord>, AppointmentsServiceError> {
        if until < from {
            return Err(AppointmentsServiceError::InvalidData);
        }

        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let appointments = self.repository.list_between(&mut tx, from, until).await?;

        tx.commit().await?;

        Ok(appointments)
    }

    async fn month_calendar(
        &self,
        tenant: TenantUuid,
        year: i16,
        month: i8,
        week_start: WeekStart,
        time_zone: TimeZone,
    ) -> Result<MonthCalendar, AppointmentsServiceError> {
        let grid = month_grid(year, month, week_start)?;

        let (Some(first_day), Some(last_day)) = (grid.first_day(), grid.last_day()) else {
            return Err(AppointmentsServiceError::InvalidData);
        };

        let from = first_day
            .to_zoned(time_zone.clone())
            .map_err(AppointmentsServiceError::TimeZone)?
            .timestamp();

        let until = last_day
            .tomorrow()
            .and_then(|day| day.to_zoned(time_zone.clone()))
            .map_err(AppointmentsServiceError::TimeZone)?
            .timestamp();

        let appointments = self.list_between(tenant, from, until).await?;

        let appointments = grid.bucket_by_day(appointments, |appointment| {
            appointment.starts_at.to_zoned(time_zone.clone()).date()
        });

        Ok(MonthCalendar { grid, appointments })
    }
}

#[automock]
#[async_trait]
pub trait AppointmentsService: Send + Sync {
    /// Book an appointment. The end must come after the start.
    async fn create_appointment(
        &self,
        tenant: TenantUuid,
        appointment: NewAppointment,
    ) -> Result<AppointmentRecord, AppointmentsServiceError>;

    /// Retrieve an appointment.
    async fn get_appointment(
        &self,
        tenant: TenantUuid,
        appointment: AppointmentUuid,
    ) -> Result<AppointmentRecord, AppointmentsServiceError>;

    /// Mark an appointment completed or cancelled.
    async fn update_status(
        &self,
        tenant: TenantUuid,
        appointment: AppointmentUuid,
        status: AppointmentStatus,
    ) -> Result<AppointmentRecord, AppointmentsServiceError>;

    /// A patient's appointments, earliest first.
    async fn list_for_patient(
        &self,
        tenant: TenantUuid,
        patient: PatientUuid,
    ) -> Result<Vec<AppointmentRecord>, AppointmentsServiceError>;

    /// Appointments starting in `[from, until)`, earliest first.
    async fn list_between(
        &self,
        tenant: TenantUuid,
        from: Timestamp,
        until: Timestamp,
    ) -> Result<Vec<AppointmentRecord>, AppointmentsServiceError>;

    /// A month laid out in whole weeks with appointments bucketed by local start date.
    async fn month_calendar(
        &self,
        tenant: TenantUuid,
        year: i16,
        month: i8,
        week_start: WeekStart,
        time_zone: TimeZone,
    ) -> Result<MonthCalendar, AppointmentsServiceError>;
}
