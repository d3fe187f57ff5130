//! Contact Index Handler

use std::{collections::BTreeMap, sync::Arc};

use salvo::{
    oapi::{ToSchema, extract::QueryParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use gabinet_app::domain::contacts::records::ContactTable;

use crate::{contacts::errors::into_status_error, extensions::*, state::State};

/// Contacts as a table.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ContactTableResponse {
    /// Column names in display order. Custom fields appear as `cf_<key>`.
    pub columns: Vec<String>,

    /// Rows keyed by column name
    pub rows: Vec<BTreeMap<String, Value>>,
}

impl From<ContactTable> for ContactTableResponse {
    fn from(table: ContactTable) -> Self {
        ContactTableResponse {
            columns: table.columns,
            rows: table
                .rows
                .into_iter()
                .map(|row| row.into_iter().collect())
                .collect(),
        }
    }
}

/// Contact Index Handler
///
/// Returns contacts with their custom field values merged in. With `view`, the saved view's
/// filters, sort and columns are applied.
#[endpoint(
    tags("contacts"),
    summary = "List Contacts",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Contact table"),
        (status_code = StatusCode::NOT_FOUND, description = "View not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "View does not list contacts"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "contacts.index",
    skip(view, depot),
    fields(
        tenant_uuid = tracing::field::Empty,
        view_uuid = tracing::field::Empty,
        row_count = tracing::field::Empty
    ),
    err
)]
pub(crate) async fn handler(
    view: QueryParam<Uuid, false>,
    depot: &mut Depot,
) -> Result<Json<ContactTableResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tenant = depot.tenant_uuid_or_401()?;
    let view = view.into_inner();

    let span = tracing::Span::current();

    span.record("tenant_uuid", tracing::field::display(tenant));

    if let Some(view) = view {
        span.record("view_uuid", tracing::field::display(view));
    }

    let table = state
        .app
        .contacts
        .list_contacts(tenant, view.map(Into::into))
        .await
        .map_err(into_status_error)?;

    span.record("row_count", table.rows.len());

    Ok(Json(table.into()))
}
