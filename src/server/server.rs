use anyhow::{Context, Result};
use std::time::Duration;

use tracing::{error, info};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::{log_requests, state::*, ServerConfig};
use crate::matching::{MatchError, MatchRequest, Registries};

#[derive(Serialize)]
struct ServerStats {
    pub uptime: String,
    pub version: &'static str,
}

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

fn error_response(status: StatusCode, error: &'static str, message: String) -> Response {
    (status, Json(ErrorBody { error, message })).into_response()
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct MatchPreviewBody {
    pub tone_id: Option<String>,
    pub target_guitar_id: Option<String>,
    pub target_amp_id: Option<String>,
}

impl MatchPreviewBody {
    fn into_request(self) -> Result<MatchRequest, String> {
        fn required(value: Option<String>, field: &str) -> Result<String, String> {
            match value {
                Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
                _ => Err(format!("{} is required", field)),
            }
        }
        Ok(MatchRequest {
            tone_id: required(self.tone_id, "toneId")?,
            target_guitar_id: required(self.target_guitar_id, "targetGuitarId")?,
            target_amp_id: required(self.target_amp_id, "targetAmpId")?,
        })
    }
}

async fn home(State(state): State<ServerState>) -> impl IntoResponse {
    let stats = ServerStats {
        uptime: format_uptime(state.start_time.elapsed()),
        version: env!("CARGO_PKG_VERSION"),
    };
    Json(stats)
}

fn record_response<T: Serialize>(kind: &str, id: &str, result: Result<Option<T>>) -> Response {
    match result {
        Ok(Some(record)) => Json(record).into_response(),
        Ok(None) => error_response(
            StatusCode::NOT_FOUND,
            "not_found",
            format!("{} '{}' not found", kind, id),
        ),
        Err(err) => {
            error!("Failed to load {} {}: {:#}", kind, id, err);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                format!("Failed to load {}", kind),
            )
        }
    }
}

async fn get_guitar(State(store): State<GuardedGearStore>, Path(id): Path<String>) -> Response {
    record_response("Guitar", &id, store.get_guitar(&id).await)
}

async fn get_amp(State(store): State<GuardedGearStore>, Path(id): Path<String>) -> Response {
    record_response("Amp", &id, store.get_amp(&id).await)
}

async fn get_tone(State(store): State<GuardedGearStore>, Path(id): Path<String>) -> Response {
    record_response("Tone", &id, store.get_tone(&id).await)
}

async fn post_match_preview(
    State(service): State<GuardedMatchPreviewService>,
    Json(body): Json<MatchPreviewBody>,
) -> Response {
    let request = match body.into_request() {
        Ok(request) => request,
        Err(message) => return error_response(StatusCode::BAD_REQUEST, "bad_request", message),
    };

    match service.build_match_preview(&request).await {
        Ok(preview) => Json(preview).into_response(),
        Err(err @ MatchError::NotFound { .. }) => {
            error_response(StatusCode::NOT_FOUND, "not_found", err.to_string())
        }
        Err(err @ MatchError::Store(_)) => {
            error!("Match preview failed for {:?}: {}", request, err);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "Failed to load gear".to_string(),
            )
        }
    }
}

pub fn make_app(
    config: ServerConfig,
    gear_store: GuardedGearStore,
    registries: Registries,
) -> Result<Router> {
    let state = ServerState::new(config.clone(), gear_store, registries);

    let gear_routes: Router = Router::new()
        .route("/guitar/{id}", get(get_guitar))
        .route("/amp/{id}", get(get_amp))
        .route("/tone/{id}", get(get_tone))
        .with_state(state.clone());

    let match_routes: Router = Router::new()
        .route("/preview", post(post_match_preview))
        .with_state(state.clone());

    let home_router: Router = Router::new()
        .route("/", get(home))
        .with_state(state.clone());

    let app: Router = home_router
        .nest("/v1/gear", gear_routes)
        .nest("/v1/match", match_routes)
        .layer(middleware::from_fn_with_state(config, log_requests));

    Ok(app)
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", err);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

pub async fn run_server(
    gear_store: GuardedGearStore,
    registries: Registries,
    config: ServerConfig,
) -> Result<()> {
    let port = config.port;
    let app = make_app(config, gear_store, registries)?;

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port))
        .await
        .with_context(|| format!("Failed to bind port {}", port))?;
    info!("Listening on port {}", port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}
