use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{
    confirm_pairing, enqueue_command, get_health, init_pairing, list_agents, pairing_status,
    poll_commands, AppState,
};
use crate::middleware::auth_middleware;

/// Device routes carry their own credentials (pair code / device
/// token), so only the operator surface sits behind the API-key
/// middleware.
pub fn build_router(state: AppState) -> Router {
    let operator_routes = Router::new()
        .route("/api/agents", get(list_agents))
        .route("/api/health", get(get_health))
        .layer(from_fn_with_state(state.clone(), auth_middleware));

    let device_routes = Router::new()
        .route("/api/pairings/init", post(init_pairing))
        .route("/api/pairings/confirm", post(confirm_pairing))
        .route("/api/pairings/:agent_id", get(pairing_status))
        .route("/api/agents/:agent_id/commands", post(enqueue_command))
        .route("/api/agents/:agent_id/poll", post(poll_commands));

    Router::new()
        .merge(device_routes)
        .merge(operator_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
