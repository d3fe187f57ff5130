//! Own Profile Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    extensions::*, patients::get::PatientResponse, portal::errors::into_status_error,
    state::State,
};

/// Own Profile Handler
#[endpoint(
    tags("portal"),
    summary = "Own Profile",
    security(("portal_auth" = []))
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<PatientResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.portal_principal_or_401()?;

    let patient = state
        .app
        .portal
        .me(principal)
        .await
        .map_err(into_status_error)?;

    Ok(Json(patient.into()))
}
