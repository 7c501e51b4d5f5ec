use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StandingsError {
    #[error("upstream unavailable: {message}")]
    UpstreamUnavailable { message: String },

    #[error("upstream rejected request: {message}")]
    UpstreamRejected { message: String },

    #[error("malformed upstream payload: {message}")]
    MalformedPayload { message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for StandingsError {
    fn from(err: reqwest::Error) -> Self {
        StandingsError::UpstreamUnavailable {
            message: err.to_string(),
        }
    }
}

// A payload that does not decode into the expected shape is structurally
// malformed; upstream transport failures never reach serde.
impl From<serde_json::Error> for StandingsError {
    fn from(err: serde_json::Error) -> Self {
        StandingsError::MalformedPayload {
            message: err.to_string(),
        }
    }
}

impl StandingsError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            StandingsError::UpstreamRejected { .. } => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message shown to API callers
    pub fn detail(&self) -> String {
        match self {
            StandingsError::UpstreamUnavailable { message } => {
                format!("Failed to fetch standings: {}", message)
            }
            StandingsError::UpstreamRejected { .. } => {
                "Contest not found or failed to fetch standings.".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl IntoResponse for StandingsError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({ "detail": self.detail() }));
        (self.status_code(), body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, StandingsError>;
