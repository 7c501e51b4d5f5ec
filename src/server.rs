use axum::{
    extract::{Path, Query, State},
    http::Method,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use hyper::Server;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::error::Result;
use crate::service::StandingsService;
use crate::standings::{Participant, StandingsView};
use crate::types::Contest;

/// Wire shape of a standings response
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StandingsResponse {
    pub contest_name: String,
    pub global_standings: Vec<Participant>,
    pub aust_standings: Vec<Participant>,
    pub aust_avg: Option<f64>,
}

impl From<StandingsView> for StandingsResponse {
    fn from(view: StandingsView) -> Self {
        Self {
            contest_name: view.contest_name,
            global_standings: view.global_standings,
            aust_standings: view.roster_standings,
            aust_avg: view.roster_average,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ContestListParams {
    #[serde(default)]
    pub gym: bool,
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "cf-standings",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn get_standings(
    State(service): State<Arc<StandingsService>>,
    Path(contest_id): Path<u64>,
) -> Result<Json<StandingsResponse>> {
    let view = service.standings(contest_id).await?;
    Ok(Json(view.into()))
}

async fn get_roster_standings(
    State(service): State<Arc<StandingsService>>,
    Path(contest_id): Path<u64>,
) -> Result<Json<StandingsResponse>> {
    let view = service.roster_standings(contest_id).await?;
    Ok(Json(view.into()))
}

async fn list_contests(
    State(service): State<Arc<StandingsService>>,
    Query(params): Query<ContestListParams>,
) -> Result<Json<Vec<Contest>>> {
    Ok(Json(service.contests(params.gym).await?))
}

/// Build the router with all routes and the CORS layer
pub fn create_server(service: Arc<StandingsService>) -> Router {
    // Browser frontends call this from any origin during development
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/standings/:contest_id", get(get_standings))
        .route("/standings/:contest_id/roster", get(get_roster_standings))
        .route("/contests", get(list_contests))
        .with_state(service)
        .layer(ServiceBuilder::new().layer(cors))
}

/// Serve until ctrl-c
pub async fn start_server(service: Arc<StandingsService>, port: u16) -> anyhow::Result<()> {
    let app = create_server(service);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    info!("HTTP server running on http://localhost:{}", port);
    info!("Health check: http://localhost:{}/health", port);

    Server::bind(&addr)
        .serve(app.into_make_service())
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown signal received");
        })
        .await?;

    Ok(())
}
