//! Per-request span, request ids and completion logging.

mod parent_context;
mod request_ids;
mod spans;

use std::time::{Duration, Instant};

use gabinet_app::domain::{portal::records::PortalPrincipal, tenants::records::TenantUuid};
use salvo::{
    Request, handler,
    http::StatusCode,
    prelude::{Depot, FlowCtrl, Response},
};
use tracing::{Instrument as _, Span, error, info, warn};
use tracing_opentelemetry::OpenTelemetrySpanExt as _;

use super::{metrics, settings};

const REQUEST_ID_DEPOT_KEY: &str = "request_id";

const UNTRACED_PATHS: [&str; 2] = ["/metrics", "/healthcheck"];

#[handler]
pub(crate) async fn request_logging(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    if UNTRACED_PATHS.contains(&req.uri().path()) {
        ctrl.call_next(req, depot, res).await;
        return;
    }

    let started = Instant::now();

    let request_id =
        request_ids::resolve_request_id(req.header::<String>(request_ids::REQUEST_ID_HEADER));

    depot.insert(REQUEST_ID_DEPOT_KEY, request_id.clone());
    request_ids::set_request_id_header(res, &request_id);

    let method = req.method().to_string();

    // Only the path is logged. Portal requests carry codes and tokens in bodies and headers.
    let path = req.uri().path().to_owned();
    let route = spans::route_template(&path);
    let _in_flight = metrics::InFlightRequestGuard::track();

    let span = tracing::info_span!(
        parent: None,
        "http.request",
        otel.name = %format!("{method} {route}"),
        otel.kind = "server",
        request_id = %request_id,
        method = %method,
        path = %path,
        remote_addr = %req.remote_addr(),
        tenant = tracing::field::Empty,
        patient = tracing::field::Empty,
        status = tracing::field::Empty,
        duration_ms = tracing::field::Empty
    );

    if settings::otel_parent_propagation_enabled()
        && let Some(parent) = parent_context::extract_parent_context(req.headers())
        && let Err(source) = span.set_parent(parent)
    {
        warn!("failed to set parent context on request span: {source}");
    }

    ctrl.call_next(req, depot, res).instrument(span.clone()).await;

    record_caller(&span, depot);

    let status = request_ids::response_status_or_ok(res.status_code);
    let duration = started.elapsed();

    metrics::observe_request(&method, &route, status.as_u16(), duration.as_secs_f64());

    span.in_scope(|| log_completion(&span, status, duration));
}

/// Staff requests carry a tenant; portal requests a tenant and a patient.
fn record_caller(span: &Span, depot: &Depot) {
    if let Ok(principal) = depot.obtain::<PortalPrincipal>() {
        span.record("tenant", tracing::field::display(principal.tenant));
        span.record("patient", tracing::field::display(principal.patient));
    } else if let Ok(tenant) = depot.obtain::<TenantUuid>() {
        span.record("tenant", tracing::field::display(tenant));
    }
}

fn log_completion(span: &Span, status: StatusCode, duration: Duration) {
    let status_code = status.as_u16();
    let duration_ms = duration.as_millis();
    let threshold_ms = u128::from(settings::slow_request_threshold_ms());

    span.record("status", status_code);
    span.record("duration_ms", duration_ms);

    if status.is_server_error() {
        error!(status = status_code, duration_ms, "request.failed");
    } else if status.is_client_error() {
        warn!(status = status_code, duration_ms, "request.rejected");
    } else {
        info!(status = status_code, duration_ms, "request.completed");
    }

    if duration_ms > threshold_ms {
        warn!(duration_ms, threshold_ms, "request.slow");
    }
}
