//! Delete Contact Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{contacts::errors::into_status_error, extensions::*, state::State};

/// Delete Contact Handler
///
/// Contacts are soft-deleted and drop out of every listing.
#[endpoint(
    tags("contacts"),
    summary = "Delete Contact",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Contact deleted"),
        (status_code = StatusCode::NOT_FOUND, description = "Contact not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    contact: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<StatusCode, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tenant = depot.tenant_uuid_or_401()?;

    state
        .app
        .contacts
        .delete_contact(tenant, contact.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(StatusCode::OK)
}

#[cfg(test)]
mod tests {
    use salvo::test::TestClient;
    use testresult::TestResult;

    use gabinet_app::domain::contacts::{ContactsServiceError, records::ContactUuid};

    use crate::test_helpers::{Mocks, TEST_TENANT_UUID, tenant_service};

    use super::*;

    fn make_service(mocks: Mocks) -> Service {
        tenant_service(mocks, Router::with_path("contacts/{contact}").delete(handler))
    }

    #[tokio::test]
    async fn test_delete_contact_success() -> TestResult {
        let uuid = ContactUuid::new();
        let mut mocks = Mocks::default();

        mocks
            .contacts
            .expect_delete_contact()
            .once()
            .withf(move |tenant, contact| *tenant == TEST_TENANT_UUID && *contact == uuid)
            .return_once(|_, _| Ok(()));

        let res = TestClient::delete(format!("http://example.com/contacts/{uuid}"))
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_missing_contact_returns_404() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .contacts
            .expect_delete_contact()
            .once()
            .return_once(|_, _| Err(ContactsServiceError::NotFound));

        let res = TestClient::delete(format!("http://example.com/contacts/{}", Uuid::now_v7()))
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
