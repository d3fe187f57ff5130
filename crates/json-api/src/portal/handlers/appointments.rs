//! Own Appointments Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    appointments::get::AppointmentsResponse, extensions::*, portal::errors::into_status_error,
    state::State,
};

/// Own Appointments Handler
#[endpoint(
    tags("portal"),
    summary = "Own Appointments",
    security(("portal_auth" = []))
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<AppointmentsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.portal_principal_or_401()?;

    let appointments = state
        .app
        .portal
        .my_appointments(principal)
        .await
        .map_err(into_status_error)?;

    Ok(Json(appointments.into()))
}
