//! Tenant Records

use jiff::Timestamp;

use crate::{domain::views::records::SavedViewRecord, uuids::TypedUuid};

/// Tenant UUID
pub type TenantUuid = TypedUuid<TenantRecord>;

/// Tenant Record
#[derive(Debug, Clone)]
pub struct TenantRecord {
    /// Unique tenant identifier.
    pub uuid: TenantUuid,

    /// Practice or company name.
    pub name: String,

    /// Tenant creation timestamp.
    pub created_at: Timestamp,

    /// Last update timestamp.
    pub updated_at: Timestamp,

    /// Soft-delete timestamp when deleted.
    pub deleted_at: Option<Timestamp>,
}

/// A newly created tenant together with the system views seeded for it.
#[derive(Debug, Clone)]
pub struct CreatedTenant {
    /// The tenant row.
    pub tenant: TenantRecord,

    /// Bundled views copied into the tenant.
    pub system_views: Vec<SavedViewRecord>,
}
