//! Staff API token middleware.

use std::sync::Arc;

use gabinet_app::auth::AuthServiceError;
use salvo::prelude::*;
use tracing::error;

use crate::{auth::extract_bearer_token, extensions::*, state::State};

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

    let tenant_uuid = match state.app.auth.authenticate_bearer(token).await {
        Ok(tenant_uuid) => tenant_uuid,
        Err(AuthServiceError::NotFound | AuthServiceError::Token(_) | AuthServiceError::InvalidData) => {
            res.render(StatusError::unauthorized().brief("Invalid API token"));
            ctrl.skip_rest();

            return;
        }
        Err(AuthServiceError::Sql(source)) => {
            error!("failed to validate api token: {source}");

            res.render(StatusError::internal_server_error());
            ctrl.skip_rest();

            return;
        }
        Err(AuthServiceError::OpenBao(source)) => {
            error!("OpenBao error during token authentication: {source}");

            res.render(StatusError::internal_server_error());
            ctrl.skip_rest();

            return;
        }
    };

    depot.insert_tenant_uuid(tenant_uuid);

    ctrl.call_next(req, depot, res).await;
}
