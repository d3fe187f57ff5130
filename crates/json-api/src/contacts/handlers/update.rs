//! Update Contact Handler

use std::sync::Arc;

use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use gabinet_app::domain::contacts::data::ContactUpdate;

use crate::{
    contacts::{errors::into_status_error, get::ContactResponse},
    extensions::*,
    state::State,
};

/// Update Contact Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateContactRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company_name: Option<String>,
    pub status: String,
}

impl From<UpdateContactRequest> for ContactUpdate {
    fn from(request: UpdateContactRequest) -> Self {
        ContactUpdate {
            first_name: request.first_name,
            last_name: request.last_name,
            email: request.email,
            phone: request.phone,
            company_name: request.company_name,
            status: request.status,
        }
    }
}

/// Update Contact Handler
#[endpoint(
    tags("contacts"),
    summary = "Update Contact",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Contact updated"),
        (status_code = StatusCode::NOT_FOUND, description = "Contact not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    contact: PathParam<Uuid>,
    json: JsonBody<UpdateContactRequest>,
    depot: &mut Depot,
) -> Result<Json<ContactResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tenant = depot.tenant_uuid_or_401()?;

    let contact = state
        .app
        .contacts
        .update_contact(tenant, contact.into_inner().into(), json.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(contact.into()))
}
