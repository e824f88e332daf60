use thiserror::Error;

/// Request-level failures. All are terminal for the request and none
/// corrupt shared state: validation happens before any mutation.
///
/// `NotFound` and `Unauthorized` deliberately carry no detail about
/// whether the agent was unknown or the secret was wrong, so the API
/// cannot be used as an oracle against pairing codes or tokens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("invalid request: {0}")]
    InvalidRequest(&'static str),

    #[error("unknown agent or pairing code")]
    NotFound,

    #[error("unsupported action '{0}'")]
    UnsupportedAction(String),

    #[error("unauthorized")]
    Unauthorized,
}
