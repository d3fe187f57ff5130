//! Create Contact Handler

use std::sync::Arc;

use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use gabinet_app::domain::contacts::data::NewContact;

use crate::{
    contacts::{errors::into_status_error, get::ContactResponse},
    extensions::*,
    state::State,
};

/// Create Contact Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateContactRequest {
    pub uuid: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company_name: Option<String>,

    /// Defaults to `active`
    pub status: Option<String>,
}

impl From<CreateContactRequest> for NewContact {
    fn from(request: CreateContactRequest) -> Self {
        NewContact {
            uuid: request.uuid.into(),
            first_name: request.first_name,
            last_name: request.last_name,
            email: request.email,
            phone: request.phone,
            company_name: request.company_name,
            status: request.status,
        }
    }
}

/// Create Contact Handler
#[endpoint(
    tags("contacts"),
    summary = "Create Contact",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Contact created"),
        (status_code = StatusCode::CONFLICT, description = "Contact already exists"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CreateContactRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<ContactResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tenant = depot.tenant_uuid_or_401()?;

    let contact = state
        .app
        .contacts
        .create_contact(tenant, json.into_inner().into())
        .await
        .map_err(into_status_error)?;

    res.add_header(LOCATION, format!("/contacts/{}", contact.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(contact.into()))
}
