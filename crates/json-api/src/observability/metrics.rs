//! Prometheus metrics and the `/metrics` endpoint.

use std::sync::OnceLock;

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry, TextEncoder,
    core::Collector,
};
use salvo::{
    Request, Response, handler,
    http::{
        StatusCode,
        header::{CONTENT_TYPE, HeaderValue},
    },
};
use tracing::error;

const DURATION_BUCKETS: [f64; 13] = [
    0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

#[derive(Debug)]
struct Metrics {
    registry: Registry,
    requests_total: IntCounterVec,
    request_duration_seconds: HistogramVec,
    requests_in_flight: IntGauge,
    portal_auth_total: IntCounterVec,
}

static METRICS: OnceLock<Option<Metrics>> = OnceLock::new();

/// Which portal credential was checked.
#[derive(Debug, Clone, Copy)]
pub(crate) enum PortalAuthStep {
    /// Sign-in code exchanged for a token.
    SignIn,

    /// Bearer token presented on a portal route.
    Token,
}

impl PortalAuthStep {
    fn as_str(self) -> &'static str {
        match self {
            Self::SignIn => "sign_in",
            Self::Token => "token",
        }
    }
}

/// Decrements the in-flight gauge when the request finishes, whichever way it exits.
#[derive(Debug)]
pub(super) struct InFlightRequestGuard {
    tracked: bool,
}

impl InFlightRequestGuard {
    pub(super) fn track() -> Self {
        let Some(metrics) = metrics() else {
            return Self { tracked: false };
        };

        metrics.requests_in_flight.inc();

        Self { tracked: true }
    }
}

impl Drop for InFlightRequestGuard {
    fn drop(&mut self) {
        if self.tracked
            && let Some(metrics) = metrics()
        {
            metrics.requests_in_flight.dec();
        }
    }
}

pub(super) fn observe_request(method: &str, route: &str, status_code: u16, duration_seconds: f64) {
    let Some(metrics) = metrics() else {
        return;
    };

    let status_code_label = status_code.to_string();

    metrics
        .requests_total
        .with_label_values(&[method, route, status_class(status_code), &status_code_label])
        .inc();

    metrics
        .request_duration_seconds
        .with_label_values(&[method, route])
        .observe(duration_seconds);
}

/// Count a portal credential check. `outcome` is `ok` or a failure label.
pub(crate) fn observe_portal_auth(step: PortalAuthStep, outcome: &str) {
    if let Some(metrics) = metrics() {
        metrics
            .portal_auth_total
            .with_label_values(&[step.as_str(), outcome])
            .inc();
    }
}

#[handler]
pub(crate) async fn metrics_handler(_req: &mut Request, res: &mut Response) {
    let Some(metrics) = metrics() else {
        res.status_code(StatusCode::INTERNAL_SERVER_ERROR);
        return;
    };

    let encoder = TextEncoder::new();
    let mut encoded = Vec::new();

    if let Err(source) = encoder.encode(&metrics.registry.gather(), &mut encoded) {
        error!("failed to encode metrics: {source}");
        res.status_code(StatusCode::INTERNAL_SERVER_ERROR);

        return;
    }

    match HeaderValue::from_str(encoder.format_type()) {
        Ok(content_type) => {
            res.headers_mut().insert(CONTENT_TYPE, content_type);
        }
        Err(source) => {
            error!("invalid metrics content type: {source}");
            res.status_code(StatusCode::INTERNAL_SERVER_ERROR);

            return;
        }
    }

    res.render(String::from_utf8_lossy(&encoded).into_owned());
}

fn metrics() -> Option<&'static Metrics> {
    METRICS
        .get_or_init(|| match build_metrics() {
            Ok(metrics) => Some(metrics),
            Err(source) => {
                error!("failed to build metrics registry, metrics are disabled: {source}");
                None
            }
        })
        .as_ref()
}

fn register<C>(registry: &Registry, collector: C) -> Result<C, prometheus::Error>
where
    C: Collector + Clone + 'static,
{
    registry.register(Box::new(collector.clone()))?;

    Ok(collector)
}

fn build_metrics() -> Result<Metrics, prometheus::Error> {
    let registry = Registry::new();

    let requests_total = register(
        &registry,
        IntCounterVec::new(
            Opts::new(
                "gabinet_json_http_requests_total",
                "HTTP requests by method, route, status class and status code.",
            ),
            &["method", "route", "status_class", "status_code"],
        )?,
    )?;

    let request_duration_seconds = register(
        &registry,
        HistogramVec::new(
            HistogramOpts::new(
                "gabinet_json_http_request_duration_seconds",
                "HTTP request duration in seconds by method and route.",
            )
            .buckets(DURATION_BUCKETS.to_vec()),
            &["method", "route"],
        )?,
    )?;

    let requests_in_flight = register(
        &registry,
        IntGauge::with_opts(Opts::new(
            "gabinet_json_http_requests_in_flight",
            "HTTP requests currently being served.",
        ))?,
    )?;

    let portal_auth_total = register(
        &registry,
        IntCounterVec::new(
            Opts::new(
                "gabinet_json_portal_auth_total",
                "Patient portal sign-ins and token checks by outcome.",
            ),
            &["step", "outcome"],
        )?,
    )?;

    Ok(Metrics {
        registry,
        requests_total,
        request_duration_seconds,
        requests_in_flight,
        portal_auth_total,
    })
}

fn status_class(status_code: u16) -> &'static str {
    match status_code {
        100..=199 => "1xx",
        200..=299 => "2xx",
        300..=399 => "3xx",
        400..=499 => "4xx",
        500..=599 => "5xx",
        _ => "other",
    }
}

#[cfg(test)]
mod tests {
    use salvo::{
        Router, Service,
        test::{ResponseExt, TestClient},
    };
    use testresult::TestResult;

    use super::*;

    async fn scrape() -> TestResult<String> {
        let service =
            Service::new(Router::new().push(Router::with_path("metrics").get(metrics_handler)));

        Ok(TestClient::get("http://example.com/metrics")
            .send(&service)
            .await
            .take_string()
            .await?)
    }

    #[tokio::test]
    async fn metrics_endpoint_exposes_http_metrics() -> TestResult {
        observe_request("GET", "/contacts", 200, 0.042);
        observe_request("POST", "/portal/{tenant}/session", 401, 0.123);

        let body = scrape().await?;

        assert!(
            body.contains("gabinet_json_http_requests_total"),
            "expected request counter"
        );
        assert!(
            body.contains("gabinet_json_http_request_duration_seconds"),
            "expected duration histogram"
        );
        assert!(
            body.contains("gabinet_json_http_requests_in_flight"),
            "expected in-flight gauge"
        );
        assert!(
            body.contains(r#"status_class="4xx""#),
            "expected client errors to be labelled"
        );

        Ok(())
    }

    #[tokio::test]
    async fn portal_auth_outcomes_are_counted() -> TestResult {
        observe_portal_auth(PortalAuthStep::SignIn, "invalid_otp");
        observe_portal_auth(PortalAuthStep::Token, "ok");

        let body = scrape().await?;

        let portal_lines: Vec<&str> = body
            .lines()
            .filter(|line| line.starts_with("gabinet_json_portal_auth_total{"))
            .collect();

        assert!(
            portal_lines
                .iter()
                .any(|line| line.contains(r#"outcome="invalid_otp""#) && line.contains(r#"step="sign_in""#)),
            "expected sign-in failure to be counted"
        );
        assert!(
            portal_lines
                .iter()
                .any(|line| line.contains(r#"outcome="ok""#) && line.contains(r#"step="token""#)),
            "expected token success to be counted"
        );

        Ok(())
    }

    #[test]
    fn status_codes_fall_into_their_class() {
        assert_eq!(status_class(204), "2xx");
        assert_eq!(status_class(401), "4xx");
        assert_eq!(status_class(503), "5xx");
        assert_eq!(status_class(42), "other");
    }
}
