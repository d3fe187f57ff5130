//! Patient portal service.

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use gabinet::portal::{IssuedPortalToken, OtpCode, PortalError, PortalSession, parse_portal_token};
use jiff::Timestamp;
use mockall::automock;
use tracing::{Instrument, debug, info, warn};
use uuid::Uuid;

use crate::{
    database::Db,
    domain::{
        appointments::{records::AppointmentRecord, repository::PgAppointmentsRepository},
        patients::{
            data::PatientProfileUpdate,
            records::{PatientRecord, PatientUuid},
            repository::PgPatientsRepository,
        },
        portal::{
            errors::PortalServiceError,
            records::{PortalPrincipal, PortalSessionUuid},
            repository::PgPortalRepository,
            sender::OtpSender,
        },
        tenants::records::TenantUuid,
    },
};

#[derive(Clone)]
pub struct PgPortalService {
    db: Db,
    repository: PgPortalRepository,
    patients: PgPatientsRepository,
    appointments: PgAppointmentsRepository,
    sender: Arc<dyn OtpSender>,
}

impl fmt::Debug for PgPortalService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PgPortalService").field("db", &self.db).finish_non_exhaustive()
    }
}

impl PgPortalService {
    #[must_use]
    pub fn new(db: Db, sender: Arc<dyn OtpSender>) -> Self {
        Self {
            db,
            repository: PgPortalRepository::new(),
            patients: PgPatientsRepository::new(),
            appointments: PgAppointmentsRepository::new(),
            sender,
        }
    }
}

#[async_trait]
impl PortalService for PgPortalService {
    async fn send_otp(&self, tenant: TenantUuid, email: &str) -> Result<(), PortalServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let Some(patient) = self.patients.find_by_email(&mut tx, email).await? else {
            tx.commit().await?;

            debug!(%tenant, "sign-in code requested for unknown email");

            return Ok(());
        };

        let (session, code) =
            PortalSession::issue_otp(Uuid::now_v7(), patient.uuid.into_uuid(), Timestamp::now());

        let stored = self.repository.upsert_otp(&mut tx, tenant, &session).await?;

        tx.commit().await?;

        debug!(
            %tenant,
            patient = %patient.uuid,
            session = %stored.session.uuid,
            "issued portal sign-in code"
        );

        let sender = Arc::clone(&self.sender);

        tokio::spawn(
            async move {
                if let Err(error) = sender.send_otp(&patient, &code).await {
                    warn!(%tenant, patient = %patient.uuid, %error, "sign-in code was not delivered");
                }
            }
            .in_current_span(),
        );

        Ok(())
    }

    async fn verify_otp(
        &self,
        tenant: TenantUuid,
        email: &str,
        code: &str,
    ) -> Result<IssuedPortalToken, PortalServiceError> {
        let code: OtpCode = code.parse()?;

        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let Some(patient) = self.patients.find_by_email(&mut tx, email).await? else {
            return Err(PortalError::NoSession.into());
        };

        let Some(mut record) = self
            .repository
            .lock_for_patient(&mut tx, tenant, patient.uuid)
            .await?
        else {
            return Err(PortalError::NoSession.into());
        };

        let outcome = record.session.verify_otp(&code, Timestamp::now());

        self.repository.save_session(&mut tx, &record.session).await?;

        tx.commit().await?;

        match &outcome {
            Ok(_) => info!(%tenant, patient = %patient.uuid, "portal session activated"),
            Err(error) => debug!(%tenant, patient = %patient.uuid, %error, "sign-in code rejected"),
        }

        Ok(outcome?)
    }

    async fn authenticate(&self, token: &str) -> Result<PortalPrincipal, PortalServiceError> {
        let parsed = parse_portal_token(token)?;

        let mut tx = self.db.begin_transaction().await?;

        let record = self
            .repository
            .get_session(&mut tx, PortalSessionUuid::from_uuid(parsed.session_uuid))
            .await?
            .ok_or(PortalError::InvalidToken)?;

        tx.commit().await?;

        record.session.authenticate(&parsed, Timestamp::now())?;

        Ok(PortalPrincipal {
            tenant: record.tenant_uuid,
            patient: PatientUuid::from_uuid(record.session.patient_uuid),
            session: PortalSessionUuid::from_uuid(record.session.uuid),
        })
    }

    async fn logout(&self, principal: PortalPrincipal) -> Result<(), PortalServiceError> {
        let mut tx = self.db.begin_tenant_transaction(principal.tenant).await?;

        let mut record = self
            .repository
            .lock_session(&mut tx, principal.tenant, principal.session)
            .await?;

        record.session.logout();

        self.repository.save_session(&mut tx, &record.session).await?;

        tx.commit().await?;

        info!(
            tenant = %principal.tenant,
            patient = %principal.patient,
            "portal session signed out"
        );

        Ok(())
    }

    async fn me(&self, principal: PortalPrincipal) -> Result<PatientRecord, PortalServiceError> {
        let mut tx = self.db.begin_tenant_transaction(principal.tenant).await?;

        let patient = self.patients.get_patient(&mut tx, principal.patient).await?;

        tx.commit().await?;

        Ok(patient)
    }

    async fn update_me(
        &self,
        principal: PortalPrincipal,
        update: PatientProfileUpdate,
    ) -> Result<PatientRecord, PortalServiceError> {
        let mut tx = self.db.begin_tenant_transaction(principal.tenant).await?;

        let patient = self
            .patients
            .update_patient(&mut tx, principal.patient, &update)
            .await?;

        tx.commit().await?;

        debug!(patient = %principal.patient, "patient updated own profile");

        Ok(patient)
    }

    async fn my_appointments(
        &self,
        principal: PortalPrincipal,
    ) -> Result<Vec<AppointmentRecord>, PortalServiceError> {
        let mut tx = self.db.begin_tenant_transaction(principal.tenant).await?;

        let appointments = self
            .appointments
            .list_for_patient(&mut tx, principal.patient)
            .await?;

        tx.commit().await?;

        Ok(appointments)
    }
}

#[automock]
#[async_trait]
pub trait PortalService: Send + Sync {
    /// Issue a sign-in code to the patient registered under `email`.
    ///
    /// Succeeds whether or not the email belongs to a patient. Delivery runs in the background
    /// and failures are only logged, so the response never depends on the address being known.
    async fn send_otp(&self, tenant: TenantUuid, email: &str) -> Result<(), PortalServiceError>;

    /// Exchange a sign-in code for a bearer token.
    async fn verify_otp(
        &self,
        tenant: TenantUuid,
        email: &str,
        code: &str,
    ) -> Result<IssuedPortalToken, PortalServiceError>;

    /// Resolve a bearer token to the patient it was issued to.
    async fn authenticate(&self, token: &str) -> Result<PortalPrincipal, PortalServiceError>;

    /// Sign the session out. The token stops working immediately.
    async fn logout(&self, principal: PortalPrincipal) -> Result<(), PortalServiceError>;

    /// The signed-in patient's profile.
    async fn me(&self, principal: PortalPrincipal) -> Result<PatientRecord, PortalServiceError>;

    /// Update the signed-in patient's profile.
    async fn update_me(
        &self,
        principal: PortalPrincipal,
        update: PatientProfileUpdate,
    ) -> Result<PatientRecord, PortalServiceError>;

    /// The signed-in patient's appointments.
    async fn my_appointments(
        &self,
        principal: PortalPrincipal,
    ) -> Result<Vec<AppointmentRecord>, PortalServiceError>;
}
