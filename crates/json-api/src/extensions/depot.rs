//! Depot helper extensions.

use std::any::Any;

use gabinet_app::domain::{portal::records::PortalPrincipal, tenants::records::TenantUuid};
use salvo::prelude::{Depot, StatusError};

/// Typed access to what the middleware leaves in the depot.
pub(crate) trait DepotExt {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError>;

    fn insert_tenant_uuid(&mut self, tenant: TenantUuid);

    /// Tenant resolved by the staff token middleware.
    fn tenant_uuid_or_401(&self) -> Result<TenantUuid, StatusError>;

    fn insert_portal_principal(&mut self, principal: PortalPrincipal);

    /// Patient resolved by the portal token middleware.
    fn portal_principal_or_401(&self) -> Result<PortalPrincipal, StatusError>;
}

impl DepotExt for Depot {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError> {
        self.obtain::<T>()
            .map_err(|_ignored| StatusError::internal_server_error())
    }

    fn insert_tenant_uuid(&mut self, tenant: TenantUuid) {
        self.inject(tenant);
    }

    fn tenant_uuid_or_401(&self) -> Result<TenantUuid, StatusError> {
        self.obtain::<TenantUuid>()
            .copied()
            .map_err(|_ignored| StatusError::unauthorized())
    }

    fn insert_portal_principal(&mut self, principal: PortalPrincipal) {
        self.inject(principal);
    }

    fn portal_principal_or_401(&self) -> Result<PortalPrincipal, StatusError> {
        self.obtain::<PortalPrincipal>()
            .copied()
            .map_err(|_ignored| StatusError::unauthorized())
    }
}
