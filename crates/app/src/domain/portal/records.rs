//! Portal Session Records

use gabinet::portal::PortalSession;

use crate::{
    domain::{patients::records::PatientUuid, tenants::records::TenantUuid},
    uuids::TypedUuid,
};

/// Portal Session UUID
pub type PortalSessionUuid = TypedUuid<PortalSessionRecord>;

/// Portal Session Record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortalSessionRecord {
    pub tenant_uuid: TenantUuid,
    pub session: PortalSession,
}

/// The patient behind an authenticated portal request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortalPrincipal {
    pub tenant: TenantUuid,
    pub patient: PatientUuid,
    pub session: PortalSessionUuid,
}
