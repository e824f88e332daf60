pub mod auth;
pub mod handlers;
pub mod middleware;
pub mod routes;

pub use auth::AuthConfig;
pub use handlers::AppState;
pub use routes::build_router;
