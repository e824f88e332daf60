use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    Extension,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tripwire_core::{CoreError, Services};
use tripwire_protocol::{
    EnqueueCommandRequest, PairConfirmRequest, PairConfirmResponse, PairInitRequest,
    PairStatusResponse, PollRequest, PollResponse,
};

use crate::auth::AuthConfig;

macro_rules! require_scope {
    ($auth_config:expr, $scopes:expr, $required:expr) => {
        if !$auth_config.authorize($scopes, $required) {
            return Err((
                StatusCode::FORBIDDEN,
                Json(json!({"status": "error", "message": "Insufficient permissions"})),
            ));
        }
    };
}

#[derive(Clone)]
pub struct AppState {
    pub auth_config: AuthConfig,
    pub services: Arc<Services>,
}

pub type ApiResult = Result<Json<Value>, (StatusCode, Json<Value>)>;

fn error_response(err: CoreError) -> (StatusCode, Json<Value>) {
    let (code, label) = match &err {
        CoreError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "invalid_request"),
        CoreError::UnsupportedAction(_) => (StatusCode::BAD_REQUEST, "unsupported_action"),
        CoreError::NotFound => (StatusCode::NOT_FOUND, "not_found"),
        CoreError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized"),
    };
    (code, Json(json!({"status": label, "message": err.to_string()})))
}

pub async fn init_pairing(
    State(state): State<AppState>,
    Json(payload): Json<PairInitRequest>,
) -> ApiResult {
    state
        .services
        .pairing
        .init(&payload.agent_id, &payload.pair_code)
        .map(|()| Json(json!({"status": "success"})))
        .map_err(error_response)
}

pub async fn confirm_pairing(
    State(state): State<AppState>,
    Json(payload): Json<PairConfirmRequest>,
) -> ApiResult {
    let device_token = state
        .services
        .pairing
        .confirm(&payload.agent_id, &payload.pair_code)
        .map_err(error_response)?;
    let resp = PairConfirmResponse { device_token };
    Ok(Json(json!(resp)))
}

/// Never fails: an unknown agent is simply reported as unpaired.
pub async fn pairing_status(
    Path(agent_id): Path<String>,
    State(state): State<AppState>,
) -> Json<Value> {
    let status = state.services.pairing.status(&agent_id);
    let resp = PairStatusResponse {
        paired: status.paired,
        device_token: status.device_token,
    };
    Json(json!(resp))
}

pub async fn enqueue_command(
    Path(agent_id): Path<String>,
    State(state): State<AppState>,
    Json(payload): Json<EnqueueCommandRequest>,
) -> ApiResult {
    state
        .services
        .commands
        .enqueue(&agent_id, &payload.action)
        .map(|()| Json(json!({"status": "success"})))
        .map_err(error_response)
}

pub async fn poll_commands(
    Path(agent_id): Path<String>,
    State(state): State<AppState>,
    Json(payload): Json<PollRequest>,
) -> ApiResult {
    let action = state
        .services
        .poll
        .poll(&agent_id, &payload.device_token)
        .map_err(error_response)?;
    let resp = PollResponse::from_action(action);
    Ok(Json(json!(resp)))
}

pub async fn list_agents(
    State(state): State<AppState>,
    Extension(scopes): Extension<Vec<String>>,
) -> ApiResult {
    require_scope!(&state.auth_config, &scopes, "agents:read");

    let summaries = state.services.status.list_all();
    Ok(Json(json!({"status": "success", "data": summaries})))
}

pub async fn get_health(
    State(state): State<AppState>,
    Extension(scopes): Extension<Vec<String>>,
) -> ApiResult {
    require_scope!(&state.auth_config, &scopes, "health:read");

    let agents = state.services.status.list_all().len();
    Ok(Json(json!({"status": "success", "data": {"agents": agents}})))
}
