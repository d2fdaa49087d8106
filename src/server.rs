use crate::app_config::AppConfig;
use crate::firmware_repository::FirmwareRepository;
use crate::request_validator::{validate, ValidationError};
use crate::update_decision::decide;
use crate::update_response::response_for;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use axum::Router;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, error, instrument, warn};

struct AppState {
    user_agent: String,
    repository: FirmwareRepository,
}

pub fn router(config: &AppConfig) -> Router {
    let state = Arc::new(AppState {
        user_agent: config.ota().user_agent().to_string(),
        repository: FirmwareRepository::new(config.ota().firmware_directory()),
    });

    Router::new().route("/ota/update", get(update)).with_state(state)
}

#[instrument(skip_all)]
async fn update(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let request = match validate(&headers, &state.user_agent) {
        Ok(request) => request,
        Err(error) => return rejection(error),
    };

    debug!(
        chip_size = %request.chip_size,
        free_space = %request.free_space,
        sketch_size = %request.sketch_size,
        sdk_version = %request.sdk_version,
        "Update request from {} (installed <{}>)", request.identity, request.sketch_version
    );

    let latest = state.repository.latest_firmware(&request.identity).await;
    match decide(&request, latest).await {
        Ok(decision) => response_for(decision).await,
        Err(error) => {
            error!("❌ {}", error);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

fn rejection(error: ValidationError) -> Response {
    warn!("⚠️ Rejected update request: {:?}", error);
    if error.is_access_denied() {
        (StatusCode::FORBIDDEN, Json(json!({ "message": error.to_string() }))).into_response()
    } else {
        (StatusCode::BAD_REQUEST, error.to_string()).into_response()
    }
}
