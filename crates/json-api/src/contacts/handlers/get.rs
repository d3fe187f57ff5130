//! Get Contact Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use gabinet_app::domain::contacts::records::ContactRecord;

use crate::{contacts::errors::into_status_error, extensions::*, state::State};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ContactResponse {
    pub uuid: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company_name: Option<String>,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<ContactRecord> for ContactResponse {
    fn from(contact: ContactRecord) -> Self {
        ContactResponse {
            uuid: contact.uuid.into(),
            first_name: contact.first_name,
            last_name: contact.last_name,
            email: contact.email,
            phone: contact.phone,
            company_name: contact.company_name,
            status: contact.status,
            created_at: contact.created_at.to_string(),
            updated_at: contact.updated_at.to_string(),
        }
    }
}

/// Get Contact Handler
#[endpoint(
    tags("contacts"),
    summary = "Get Contact",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Contact found"),
        (status_code = StatusCode::NOT_FOUND, description = "Contact not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    contact: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<ContactResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tenant = depot.tenant_uuid_or_401()?;

    let contact = state
        .app
        .contacts
        .get_contact(tenant, contact.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(contact.into()))
}
