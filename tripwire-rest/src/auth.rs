use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Operator identity: an API key and the scopes it grants. This guards
/// only the operator surface; agents authenticate with their device
/// token inside the poll operation itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    pub api_key: String,
    pub scopes: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub identities: HashMap<String, Identity>,
}

impl AuthConfig {
    pub async fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = tokio::fs::read_to_string(path).await?;
        let config: AuthConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Resolve an API key to its scopes, or `None` for an unknown key.
    pub fn authenticate(&self, api_key: &str) -> Option<Vec<String>> {
        self.identities
            .values()
            .find(|id| id.api_key == api_key)
            .map(|id| id.scopes.clone())
    }

    pub fn authorize(&self, scopes: &[String], required_scope: &str) -> bool {
        scopes.iter().any(|s| s == "*" || s == required_scope)
    }
}
