use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

use tripwire_core::Services;
use tripwire_rest::{build_router, AppState, AuthConfig};

#[derive(Parser)]
#[command(name = "tripwire-rest")]
#[command(about = "Pairing and one-shot command server for tripwire agents")]
struct Args {
    #[arg(long, default_value = "0.0.0.0")]
    bind_address: String,

    #[arg(long, default_value = "8080")]
    port: u16,

    #[arg(long, default_value = "/etc/tripwire/rest-auth.toml")]
    auth_config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    // Load operator authentication configuration
    let auth_config = match AuthConfig::load(&args.auth_config).await {
        Ok(config) => {
            info!("Loaded auth config from {:?}", args.auth_config);
            config
        }
        Err(e) => {
            error!("Failed to load auth config: {}", e);
            info!("Creating default auth config...");
            create_default_auth_config(&args.auth_config).await?;
            AuthConfig::load(&args.auth_config).await?
        }
    };

    // All agent state is in-memory and lost on restart; this is a
    // documented limitation of the service, not an oversight.
    let state = AppState {
        auth_config,
        services: Arc::new(Services::in_memory()),
    };

    let app = build_router(state);

    let bind_addr = format!("{}:{}", args.bind_address, args.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("tripwire REST server listening on {}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

async fn create_default_auth_config(path: &PathBuf) -> Result<()> {
    let default_config = r#"[identities.operator]
api_key = "tripwire-operator-key-change-me"
scopes = ["*"]

[identities.viewer]
api_key = "tripwire-viewer-key-change-me"
scopes = ["agents:read", "health:read"]
"#;

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    tokio::fs::write(path, default_config).await?;
    info!("Created default auth config at {:?}", path);
    info!("WARNING: Please change the default API keys!");

    Ok(())
}
