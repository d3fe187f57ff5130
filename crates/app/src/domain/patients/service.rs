//! Patients service.

use async_trait::async_trait;
use mockall::automock;
use tracing::debug;

use crate::{
    database::Db,
    domain::{
        patients::{
            data::{NewPatient, PatientProfileUpdate},
            errors::PatientsServiceError,
            records::{PatientRecord, PatientUuid},
            repository::PgPatientsRepository,
        },
        tenants::records::TenantUuid,
    },
};

#[derive(Debug, Clone)]
pub struct PgPatientsService {
    db: Db,
    repository: PgPatientsRepository,
}

impl PgPatientsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgPatientsRepository::new(),
        }
    }
}

#[async_trait]
impl PatientsService for PgPatientsService {
    async fn list_patients(
        &self,
        tenant: TenantUuid,
    ) -> Result<Vec<PatientRecord>, PatientsServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let patients = self.repository.list_patients(&mut tx).await?;

        tx.commit().await?;

        Ok(patients)
    }

    async fn get_patient(
        &self,
        tenant: TenantUuid,
        patient: PatientUuid,
    ) -> Result<PatientRecord, PatientsServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let patient = self.repository.get_patient(&mut tx, patient).await?;

        tx.commit().await?;

        Ok(patient)
    }

    async fn create_patient(
        &self,
        tenant: TenantUuid,
        patient: NewPatient,
    ) -> Result<PatientRecord, PatientsServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let created = self.repository.create_patient(&mut tx, &patient).await?;

        tx.commit().await?;

        debug!(patient = %created.uuid, "created patient");

        Ok(created)
    }

    async fn update_profile(
        &self,
        tenant: TenantUuid,
        patient: PatientUuid,
        update: PatientProfileUpdate,
    ) -> Result<PatientRecord, PatientsServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let updated = self
            .repository
            .update_patient(&mut tx, patient, &update)
            .await?;

        tx.commit().await?;

        debug!(%patient, "updated patient profile");

        Ok(updated)
    }
}

#[automock]
#[async_trait]
pub trait PatientsService: Send + Sync {
    /// Patients ordered by name.
    async fn list_patients(
        &self,
        tenant: TenantUuid,
    ) -> Result<Vec<PatientRecord>, PatientsServiceError>;

    /// Retrieve a patient.
    async fn get_patient(
        &self,
        tenant: TenantUuid,
        patient: PatientUuid,
    ) -> Result<PatientRecord, PatientsServiceError>;

    /// Register a patient. Emails are unique per tenant regardless of case.
    async fn create_patient(
        &self,
        tenant: TenantUuid,
        patient: NewPatient,
    ) -> Result<PatientRecord, PatientsServiceError>;

    /// Update a patient's name, phone and date of birth.
    async fn update_profile(
        &self,
        tenant: TenantUuid,
        patient: PatientUuid,
        update: PatientProfileUpdate,
    ) -> Result<PatientRecord, PatientsServiceError>;
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;
    use testresult::TestResult;

    use crate::test::{TestContext, helpers::new_patient};

    use super::*;

    #[tokio::test]
    async fn create_patient_round_trips_date_of_birth() -> TestResult {
        let ctx = TestContext::new().await;
        let mut patient = new_patient("anna@example.com");
        patient.date_of_birth = Some(date(1988, 4, 17));

        let created = ctx
            .patients
            .create_patient(ctx.tenant_uuid, patient.clone())
            .await?;
        let fetched = ctx.patients.get_patient(ctx.tenant_uuid, patient.uuid).await?;

        assert_eq!(created, fetched);
        assert_eq!(fetched.date_of_birth, Some(date(1988, 4, 17)));

        Ok(())
    }

    #[tokio::test]
    async fn email_is_unique_per_tenant_ignoring_case() -> TestResult {
        let ctx = TestContext::new().await;

        ctx.patients
            .create_patient(ctx.tenant_uuid, new_patient("anna@example.com"))
            .await?;

        let duplicate = ctx
            .patients
            .create_patient(ctx.tenant_uuid, new_patient("Anna@Example.com"))
            .await;

        let tenant_b = ctx.create_tenant("Tenant B").await;

        ctx.patients
            .create_patient(tenant_b, new_patient("anna@example.com"))
            .await?;

        assert!(
            matches!(duplicate, Err(PatientsServiceError::AlreadyExists)),
            "expected AlreadyExists, got {duplicate:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn create_patient_rejects_invalid_email() {
        let ctx = TestContext::new().await;

        let result = ctx
            .patients
            .create_patient(ctx.tenant_uuid, new_patient("not-an-email"))
            .await;

        assert!(
            matches!(result, Err(PatientsServiceError::InvalidData)),
            "expected InvalidData, got {result:?}"
        );
    }

    #[tokio::test]
    async fn update_profile_keeps_email() -> TestResult {
        let ctx = TestContext::new().await;
        let patient = new_patient("anna@example.com");

        ctx.patients
            .create_patient(ctx.tenant_uuid, patient.clone())
            .await?;

        let updated = ctx
            .patients
            .update_profile(
                ctx.tenant_uuid,
                patient.uuid,
                PatientProfileUpdate {
                    first_name: "Anna".to_string(),
                    last_name: "Kowalska".to_string(),
                    phone: Some("+48 600 100 200".to_string()),
                    date_of_birth: None,
                },
            )
            .await?;

        assert_eq!(updated.last_name, "Kowalska");
        assert_eq!(updated.phone.as_deref(), Some("+48 600 100 200"));
        assert_eq!(updated.email, "anna@example.com");

        Ok(())
    }

    #[tokio::test]
    async fn list_patients_orders_by_last_name() -> TestResult {
        let ctx = TestContext::new().await;

        for (email, last_name) in [("z@example.com", "Zając"), ("a@example.com", "Adamska")] {
            let mut patient = new_patient(email);
            patient.last_name = last_name.to_string();

            ctx.patients.create_patient(ctx.tenant_uuid, patient).await?;
        }

        let names: Vec<String> = ctx
            .patients
            .list_patients(ctx.tenant_uuid)
            .await?
            .into_iter()
            .map(|patient| patient.last_name)
            .collect();

        assert_eq!(names, vec!["Adamska", "Zając"]);

        Ok(())
    }

    #[tokio::test]
    async fn patients_are_not_visible_to_other_tenants() -> TestResult {
        let ctx = TestContext::new().await;
        let patient = new_patient("anna@example.com");

        ctx.patients
            .create_patient(ctx.tenant_uuid, patient.clone())
            .await?;

        let tenant_b = ctx.create_tenant("Tenant B").await;

        let result = ctx.patients.get_patient(tenant_b, patient.uuid).await;

        assert!(
            matches!(result, Err(PatientsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }
}
