//! Prometheus metrics for upstream calls and served standings.
//!
//! Recording without an installed recorder is a no-op, so library code and
//! tests can call these freely.

use std::fmt;
use std::net::SocketAddr;
use std::sync::Once;
use tracing::{info, warn};

use crate::constants::{DEFAULT_METRICS_ADDR, METRICS_ADDR_ENV};

static INIT: Once = Once::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricName {
    UpstreamRequestsSuccess,
    UpstreamRequestsError,
    UpstreamRequestDuration,
    StandingsServed,
    StandingsRows,
    RosterHits,
}

impl MetricName {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricName::UpstreamRequestsSuccess => "cf_upstream_requests_success_total",
            MetricName::UpstreamRequestsError => "cf_upstream_requests_error_total",
            MetricName::UpstreamRequestDuration => "cf_upstream_request_duration_seconds",
            MetricName::StandingsServed => "cf_standings_served_total",
            MetricName::StandingsRows => "cf_standings_rows",
            MetricName::RosterHits => "cf_standings_roster_hits",
        }
    }

    pub fn all_metrics() -> impl Iterator<Item = MetricName> {
        use MetricName::*;
        [
            UpstreamRequestsSuccess,
            UpstreamRequestsError,
            UpstreamRequestDuration,
            StandingsServed,
            StandingsRows,
            RosterHits,
        ]
        .into_iter()
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Install the Prometheus exporter once per process
pub fn init_metrics() {
    INIT.call_once(|| {
        let addr_str =
            std::env::var(METRICS_ADDR_ENV).unwrap_or_else(|_| DEFAULT_METRICS_ADDR.to_string());
        let addr: SocketAddr = match addr_str.parse() {
            Ok(addr) => addr,
            Err(_) => {
                warn!("Invalid metrics addr '{}', using {}", addr_str, DEFAULT_METRICS_ADDR);
                match DEFAULT_METRICS_ADDR.parse() {
                    Ok(addr) => addr,
                    Err(_) => return,
                }
            }
        };

        let builder = metrics_exporter_prometheus::PrometheusBuilder::new().with_http_listener(addr);
        match builder.install() {
            Ok(()) => {
                info!("Prometheus exporter listening on http://{}/metrics", addr);
                register_metrics();
            }
            Err(e) => warn!("Prometheus exporter install failed: {}", e),
        }
    });
}

/// Touch every metric so it shows up before first use
fn register_metrics() {
    for name in MetricName::all_metrics() {
        match name {
            MetricName::UpstreamRequestDuration | MetricName::StandingsRows | MetricName::RosterHits => {
                let _ = ::metrics::histogram!(name.as_str());
            }
            _ => {
                let _ = ::metrics::counter!(name.as_str());
            }
        }
    }
}

pub struct UpstreamMetrics;

impl UpstreamMetrics {
    pub fn record_request_success(method: &'static str, duration_secs: f64) {
        ::metrics::counter!(MetricName::UpstreamRequestsSuccess.as_str(), "method" => method)
            .increment(1);
        ::metrics::histogram!(MetricName::UpstreamRequestDuration.as_str(), "method" => method)
            .record(duration_secs);
    }

    pub fn record_request_error(method: &'static str, error_kind: &'static str) {
        ::metrics::counter!(
            MetricName::UpstreamRequestsError.as_str(),
            "method" => method,
            "error" => error_kind
        )
        .increment(1);
    }
}

pub struct StandingsMetrics;

impl StandingsMetrics {
    pub fn record_served(scope: &'static str, rows: usize, roster_hits: usize) {
        ::metrics::counter!(MetricName::StandingsServed.as_str(), "scope" => scope).increment(1);
        ::metrics::histogram!(MetricName::StandingsRows.as_str()).record(rows as f64);
        ::metrics::histogram!(MetricName::RosterHits.as_str()).record(roster_hits as f64);
    }
}
