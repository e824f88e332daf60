use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Actions an agent can be told to run. One-shot: delivered at most once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandAction {
    Destroy,
}

impl CommandAction {
    /// Parse the wire form of an action. Returns `None` for anything
    /// outside the allowed set.
    pub fn parse(action: &str) -> Option<Self> {
        match action {
            "destroy" => Some(Self::Destroy),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Destroy => "destroy",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairInitRequest {
    pub agent_id: String,
    pub pair_code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairConfirmRequest {
    pub agent_id: String,
    pub pair_code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairConfirmResponse {
    pub device_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairStatusResponse {
    pub paired: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnqueueCommandRequest {
    pub action: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollRequest {
    pub device_token: String,
}

/// Poll result. An empty `command` means "nothing queued right now" and
/// is the common case, not an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollResponse {
    pub command: String,
}

impl PollResponse {
    pub fn from_action(action: Option<CommandAction>) -> Self {
        Self {
            command: action.map(|a| a.as_str().to_string()).unwrap_or_default(),
        }
    }
}

/// Operator-facing view of a single agent record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentSummary {
    pub agent_id: String,
    pub paired: bool,
    pub last_seen: DateTime<Utc>,
    pub has_token: bool,
    pub pending_command: Option<CommandAction>,
}
