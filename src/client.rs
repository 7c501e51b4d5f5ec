use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};
use tracing::{debug, instrument, warn};

use crate::config::UpstreamConfig;
use crate::constants::{HANDLE_SEPARATOR, STANDINGS_FIRST_ROW, UPSTREAM_STATUS_OK};
use crate::error::{Result, StandingsError};
use crate::metrics::UpstreamMetrics;
use crate::types::{ApiEnvelope, Contest, StandingsResult};

/// Parameters of one `contest.standings` request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StandingsQuery {
    pub contest_id: u64,
    pub from: u32,
    pub count: u32,
    pub show_unofficial: bool,
    /// Restrict rows to these handles
    pub handles: Option<Vec<String>>,
}

impl StandingsQuery {
    /// Whole leaderboard, official participants only
    pub fn full(contest_id: u64, count: u32) -> Self {
        Self {
            contest_id,
            from: STANDINGS_FIRST_ROW,
            count,
            show_unofficial: false,
            handles: None,
        }
    }

    /// Only the given handles, unofficial participation included
    pub fn for_handles(contest_id: u64, count: u32, handles: Vec<String>) -> Self {
        Self {
            contest_id,
            from: STANDINGS_FIRST_ROW,
            count,
            show_unofficial: true,
            handles: Some(handles),
        }
    }

    fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("contestId", self.contest_id.to_string()),
            ("from", self.from.to_string()),
            ("count", self.count.to_string()),
            ("showUnofficial", self.show_unofficial.to_string()),
        ];
        if let Some(handles) = &self.handles {
            params.push(("handles", handles.join(HANDLE_SEPARATOR)));
        }
        params
    }
}

/// Where raw standings come from
#[async_trait]
pub trait StandingsSource: Send + Sync {
    async fn fetch_standings(&self, query: &StandingsQuery) -> Result<StandingsResult>;

    async fn fetch_contests(&self, gym: bool) -> Result<Vec<Contest>>;
}

pub struct CodeforcesClient {
    client: reqwest::Client,
    base_url: String,
}

impl CodeforcesClient {
    pub fn new(config: &UpstreamConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &'static str,
        params: &[(&'static str, String)],
    ) -> Result<T> {
        let url = format!("{}/{}", self.base_url, method);
        let started = Instant::now();

        let outcome = async {
            let resp = self.client.get(&url).query(params).send().await?;
            let status = resp.status();
            let bytes = resp.bytes().await?;
            debug!(method, %status, bytes = bytes.len(), "Upstream responded");
            decode_envelope(status, &bytes)
        }
        .await;

        match &outcome {
            Ok(_) => UpstreamMetrics::record_request_success(method, started.elapsed().as_secs_f64()),
            Err(e) => {
                warn!(method, error = %e, "Upstream call failed");
                UpstreamMetrics::record_request_error(method, error_kind(e));
            }
        }
        outcome
    }
}

#[async_trait]
impl StandingsSource for CodeforcesClient {
    #[instrument(skip(self), fields(contest_id = query.contest_id))]
    async fn fetch_standings(&self, query: &StandingsQuery) -> Result<StandingsResult> {
        self.call("contest.standings", &query.params()).await
    }

    #[instrument(skip(self))]
    async fn fetch_contests(&self, gym: bool) -> Result<Vec<Contest>> {
        self.call("contest.list", &[("gym", gym.to_string())]).await
    }
}

/// Decode `{status, comment, result}` and the `result` inside it.
///
/// The upstream answers rejected requests with a 400 and a FAILED envelope, so
/// the HTTP status only matters when the body is not an envelope at all.
pub fn decode_envelope<T: DeserializeOwned>(status: reqwest::StatusCode, body: &[u8]) -> Result<T> {
    let envelope: ApiEnvelope = match serde_json::from_slice(body) {
        Ok(envelope) => envelope,
        Err(e) if !status.is_success() => {
            return Err(StandingsError::UpstreamUnavailable {
                message: format!("HTTP {} with unreadable body: {}", status, e),
            })
        }
        Err(e) => return Err(e.into()),
    };

    if envelope.status != UPSTREAM_STATUS_OK {
        return Err(StandingsError::UpstreamRejected {
            message: envelope
                .comment
                .unwrap_or_else(|| format!("status {}", envelope.status)),
        });
    }

    let result = envelope.result.ok_or_else(|| StandingsError::MalformedPayload {
        message: "envelope has no result".to_string(),
    })?;
    Ok(serde_json::from_value(result)?)
}

fn error_kind(err: &StandingsError) -> &'static str {
    match err {
        StandingsError::UpstreamUnavailable { .. } => "unavailable",
        StandingsError::UpstreamRejected { .. } => "rejected",
        StandingsError::MalformedPayload { .. } => "malformed",
        _ => "other",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;
    use serde_json::json;

    fn body(value: serde_json::Value) -> Vec<u8> {
        serde_json::to_vec(&value).unwrap()
    }

    #[test]
    fn test_full_query_params() {
        let params = StandingsQuery::full(1900, 30_000).params();
        assert_eq!(
            params,
            vec![
                ("contestId", "1900".to_string()),
                ("from", "1".to_string()),
                ("count", "30000".to_string()),
                ("showUnofficial", "false".to_string()),
            ]
        );
    }

    #[test]
    fn test_handles_query_joins_with_semicolon() {
        let query = StandingsQuery::for_handles(5, 100, vec!["a".into(), "b.c".into()]);
        let params = query.params();
        assert!(params.contains(&("showUnofficial", "true".to_string())));
        assert!(params.contains(&("handles", "a;b.c".to_string())));
    }

    #[test]
    fn test_decode_ok_envelope() {
        let raw = body(json!({
            "status": "OK",
            "result": {
                "contest": { "id": 1, "name": "Good Bye 2023" },
                "rows": [{ "party": { "members": [{ "handle": "x" }] }, "rank": 1 }]
            }
        }));
        let result: StandingsResult = decode_envelope(StatusCode::OK, &raw).unwrap();
        assert_eq!(result.contest.name, "Good Bye 2023");
        assert_eq!(result.rows.len(), 1);
    }

    #[test]
    fn test_failed_status_is_rejection() {
        let raw = body(json!({
            "status": "FAILED",
            "comment": "contestId: Contest with id 424242 not found"
        }));
        let err = decode_envelope::<StandingsResult>(StatusCode::BAD_REQUEST, &raw).unwrap_err();
        match err {
            StandingsError::UpstreamRejected { message } => assert!(message.contains("424242")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_missing_result_is_malformed() {
        let raw = body(json!({ "status": "OK" }));
        let err = decode_envelope::<StandingsResult>(StatusCode::OK, &raw).unwrap_err();
        assert!(matches!(err, StandingsError::MalformedPayload { .. }));
    }

    #[test]
    fn test_missing_rows_is_malformed() {
        let raw = body(json!({ "status": "OK", "result": { "contest": { "name": "X" } } }));
        let err = decode_envelope::<StandingsResult>(StatusCode::OK, &raw).unwrap_err();
        assert!(matches!(err, StandingsError::MalformedPayload { .. }));
    }

    #[test]
    fn test_non_json_error_page_is_unavailable() {
        let err = decode_envelope::<StandingsResult>(StatusCode::SERVICE_UNAVAILABLE, b"<html>")
            .unwrap_err();
        assert!(matches!(err, StandingsError::UpstreamUnavailable { .. }));
    }

    #[test]
    fn test_non_json_success_is_malformed() {
        let err = decode_envelope::<StandingsResult>(StatusCode::OK, b"<html>").unwrap_err();
        assert!(matches!(err, StandingsError::MalformedPayload { .. }));
    }
}
