//! App Context

use std::sync::Arc;

use thiserror::Error;

use crate::{
    auth::{AuthService, PgAuthService, TokenVerifier},
    database::{self, DatabaseRoleError, Db},
    domain::{
        appointments::{AppointmentsService, PgAppointmentsService},
        contacts::{ContactsService, PgContactsService},
        custom_fields::{CustomFieldsService, PgCustomFieldsService},
        patients::{PatientsService, PgPatientsService},
        portal::{OtpSender, PgPortalService, PortalService},
        tenants::{PgTenantsService, TenantsService},
        views::{PgViewsService, ViewsService},
    },
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),

    #[error(transparent)]
    Role(#[from] DatabaseRoleError),
}

/// Every service the HTTP surface depends on, behind trait objects so handlers can be tested
/// against mocks.
#[derive(Clone)]
pub struct AppContext {
    pub tenants: Arc<dyn TenantsService>,
    pub custom_fields: Arc<dyn CustomFieldsService>,
    pub views: Arc<dyn ViewsService>,
    pub contacts: Arc<dyn ContactsService>,
    pub patients: Arc<dyn PatientsService>,
    pub appointments: Arc<dyn AppointmentsService>,
    pub portal: Arc<dyn PortalService>,
    pub auth: Arc<dyn AuthService>,
}

impl AppContext {
    /// Build application context from a database URL.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection fails or the connected role
    /// bypasses row-level security.
    pub async fn from_database_url(
        url: &str,
        verifier: Arc<dyn TokenVerifier>,
        sender: Arc<dyn OtpSender>,
    ) -> Result<Self, AppInitError> {
        let pool = database::connect(url)
            .await
            .map_err(AppInitError::Database)?;

        database::ensure_rls_enforced_role(&pool).await?;

        Ok(Self::from_db(&Db::new(pool), verifier, sender))
    }

    /// Build application context over an existing pool wrapper.
    #[must_use]
    pub fn from_db(db: &Db, verifier: Arc<dyn TokenVerifier>, sender: Arc<dyn OtpSender>) -> Self {
        Self {
            tenants: Arc::new(PgTenantsService::new(db.clone())),
            custom_fields: Arc::new(PgCustomFieldsService::new(db.clone())),
            views: Arc::new(PgViewsService::new(db.clone())),
            contacts: Arc::new(PgContactsService::new(db.clone())),
            patients: Arc::new(PgPatientsService::new(db.clone())),
            appointments: Arc::new(PgAppointmentsService::new(db.clone())),
            portal: Arc::new(PgPortalService::new(db.clone(), sender)),
            auth: Arc::new(PgAuthService::new(db.clone(), verifier)),
        }
    }
}
