//! End Portal Session Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{extensions::*, portal::errors::into_status_error, state::State};

/// End Portal Session Handler
#[endpoint(
    tags("portal"),
    summary = "Sign Out",
    security(("portal_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Signed out"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Unauthorized"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<StatusCode, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.portal_principal_or_401()?;

    state
        .app
        .portal
        .logout(principal)
        .await
        .map_err(into_status_error)?;

    Ok(StatusCode::OK)
}

#[cfg(test)]
mod tests {
    use salvo::test::TestClient;
    use testresult::TestResult;

    use crate::test_helpers::{Mocks, TEST_PRINCIPAL, portal_service};

    use super::*;

    #[tokio::test]
    async fn test_logout_ends_the_callers_session() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .portal
            .expect_logout()
            .once()
            .withf(|principal| *principal == TEST_PRINCIPAL)
            .return_once(|_| Ok(()));

        let res = TestClient::delete("http://example.com/portal/session")
            .send(&portal_service(
                mocks,
                Router::with_path("portal/session").delete(handler),
            ))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }
}
