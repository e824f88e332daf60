use axum::{
    extract::{Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::{Json, Response},
};
use serde_json::json;

use crate::handlers::AppState;

/// Bearer API-key check for the operator routes. Resolved scopes are
/// stashed in the request extensions for the handlers to authorize
/// against.
pub async fn auth_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, (StatusCode, Json<serde_json::Value>)> {
    let api_key = headers
        .get("authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or_else(|| unauthorized("Missing or invalid Authorization header"))?;

    let scopes = state
        .auth_config
        .authenticate(api_key)
        .ok_or_else(|| unauthorized("Invalid API key"))?;

    request.extensions_mut().insert(scopes);

    Ok(next.run(request).await)
}

fn unauthorized(message: &str) -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"status": "error", "message": message})),
    )
}
