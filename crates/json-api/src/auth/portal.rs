//! Patient portal token middleware.

use std::sync::Arc;

use gabinet_app::domain::portal::PortalServiceError;
use salvo::prelude::*;

use crate::{
    auth::extract_bearer_token,
    extensions::*,
    observability::{PortalAuthStep, observe_portal_auth},
    portal::errors::{into_status_error, outcome},
    state::State,
};

#[salvo::handler]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    let Some(token) = extract_bearer_token(req) else {
        res.render(StatusError::unauthorized().brief("Missing or invalid Authorization header"));
        ctrl.skip_rest();

        return;
    };

    let state = match depot.obtain_or_500::<Arc<State>>() {
        Ok(state) => state,
        Err(status) => {
            res.render(status);
            ctrl.skip_rest();

            return;
        }
    };

    let result = state.app.portal.authenticate(token).await;

    observe_portal_auth(
        PortalAuthStep::Token,
        result.as_ref().map_or_else(outcome, |_| "ok"),
    );

    let principal = match result {
        Ok(principal) => principal,
        Err(PortalServiceError::NotFound) => {
            res.render(StatusError::unauthorized().brief("Invalid portal token"));
            ctrl.skip_rest();

            return;
        }
        Err(error) => {
            res.render(into_status_error(error));
            ctrl.skip_rest();

            return;
        }
    };

    depot.insert_portal_principal(principal);

    ctrl.call_next(req, depot, res).await;
}
