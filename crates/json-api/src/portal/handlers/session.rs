//! Start Portal Session Handler

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

use crate::{
    extensions::*,
    observability::{PortalAuthStep, observe_portal_auth},
    portal::errors::{into_status_error, outcome},
    state::State,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct SessionRequest {
    pub email: String,

    /// Six-digit sign-in code
    pub code: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct SessionResponse {
    /// Bearer token for the portal endpoints. Shown once.
    pub token: String,

    /// When the token stops working
    pub expires_at: String,
}

/// Start Portal Session Handler
///
/// Exchanges a sign-in code for a bearer token.
#[endpoint(
    tags("portal"),
    summary = "Start Portal Session",
    responses(
        (status_code = StatusCode::OK, description = "Session started"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Code missing, expired, wrong or locked"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    tenant: PathParam<Uuid>,
    json: JsonBody<SessionRequest>,
    depot: &mut Depot,
) -> Result<Json<SessionResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let request = json.into_inner();

    let issued = state
        .app
        .portal
        .verify_otp(
            tenant.into_inner().into(),
            request.email.trim(),
            request.code.trim(),
        )
        .await
        .inspect(|_| observe_portal_auth(PortalAuthStep::SignIn, "ok"))
        .map_err(|error| {
            observe_portal_auth(PortalAuthStep::SignIn, outcome(&error));

            into_status_error(error)
        })?;

    Ok(Json(SessionResponse {
        token: issued.token,
        expires_at: issued.expires_at.to_string(),
    }))
}
