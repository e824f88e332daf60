use std::sync::Arc;
use tracing::{info, warn};

use crate::clock::Clock;
use crate::error::CoreError;
use crate::store::{AgentRecord, AgentStore};
use crate::token::TokenSource;

/// Result of a pairing status read. Unknown agents report
/// `paired: false` rather than an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairingStatus {
    pub paired: bool,
    pub device_token: Option<String>,
}

/// The init/confirm handshake. Init establishes the shared pair code;
/// confirm proves knowledge of it and yields the device token the agent
/// uses for all later polls.
#[derive(Clone)]
pub struct PairingService {
    store: Arc<dyn AgentStore>,
    tokens: Arc<dyn TokenSource>,
    clock: Arc<dyn Clock>,
}

impl PairingService {
    pub fn new(
        store: Arc<dyn AgentStore>,
        tokens: Arc<dyn TokenSource>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            tokens,
            clock,
        }
    }

    /// Register (or re-register) an agent with a pairing code. An
    /// existing record is rebuilt outright: pairing, token and any
    /// queued command are discarded. This is the recovery path for an
    /// agent that lost its token.
    pub fn init(&self, agent_id: &str, pair_code: &str) -> Result<(), CoreError> {
        if agent_id.is_empty() || pair_code.is_empty() {
            return Err(CoreError::InvalidRequest(
                "agent_id and pair_code are required",
            ));
        }

        if let Some(existing) = self.store.get(agent_id) {
            if existing.paired {
                warn!(agent_id, "re-init discards an existing pairing and token");
            }
        }

        self.store
            .insert(AgentRecord::initialized(agent_id, pair_code, self.clock.now()));
        info!(agent_id, "pairing initialized");
        Ok(())
    }

    /// Complete the handshake. Fails with `NotFound` whether the agent
    /// is unknown or the code is wrong; callers cannot tell which. On
    /// match the device token is minted once and returned; repeating a
    /// correct confirm returns the same token.
    pub fn confirm(&self, agent_id: &str, pair_code: &str) -> Result<String, CoreError> {
        if agent_id.is_empty() || pair_code.is_empty() {
            return Err(CoreError::InvalidRequest(
                "agent_id and pair_code are required",
            ));
        }

        let mut token = None;
        self.store.update(agent_id, &mut |rec| {
            if rec.pair_code != pair_code {
                return;
            }
            if !rec.paired {
                info!(agent_id, "pairing confirmed");
            }
            rec.paired = true;
            if rec.device_token.is_none() {
                rec.device_token = Some(self.tokens.mint());
            }
            rec.last_seen = self.clock.now();
            token = rec.device_token.clone();
        });

        token.ok_or(CoreError::NotFound)
    }

    /// Pairing state as seen by the companion app. The token is only
    /// exposed once paired. Reading status counts as a liveness signal
    /// and touches `last_seen`.
    pub fn status(&self, agent_id: &str) -> PairingStatus {
        let mut status = PairingStatus {
            paired: false,
            device_token: None,
        };
        self.store.update(agent_id, &mut |rec| {
            rec.last_seen = self.clock.now();
            status.paired = rec.paired;
            if rec.paired {
                status.device_token = rec.device_token.clone();
            }
        });
        status
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::fixed_clock;
    use crate::store::MemoryStore;
    use crate::token::SeqTokenSource;

    fn service() -> (PairingService, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let service = PairingService::new(
            store.clone(),
            Arc::new(SeqTokenSource::new()),
            fixed_clock(),
        );
        (service, store)
    }

    #[test]
    fn init_rejects_empty_fields() {
        let (service, _) = service();
        assert!(matches!(
            service.init("", "CODE1"),
            Err(CoreError::InvalidRequest(_))
        ));
        assert!(matches!(
            service.init("a1", ""),
            Err(CoreError::InvalidRequest(_))
        ));
    }

    #[test]
    fn confirm_unknown_agent_is_not_found() {
        let (service, _) = service();
        assert_eq!(service.confirm("ghost", "X"), Err(CoreError::NotFound));
    }

    #[test]
    fn confirm_wrong_code_is_not_found() {
        let (service, store) = service();
        service.init("a1", "CODE1").unwrap();
        assert_eq!(service.confirm("a1", "WRONG"), Err(CoreError::NotFound));
        // A failed confirm leaves the record untouched.
        let rec = store.get("a1").unwrap();
        assert!(!rec.paired);
        assert!(rec.device_token.is_none());
    }

    #[test]
    fn repeated_confirm_returns_same_token() {
        let (service, _) = service();
        service.init("a1", "CODE1").unwrap();
        let first = service.confirm("a1", "CODE1").unwrap();
        let second = service.confirm("a1", "CODE1").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn reinit_discards_pairing_and_token() {
        let (service, store) = service();
        service.init("a1", "CODE1").unwrap();
        let token = service.confirm("a1", "CODE1").unwrap();

        service.init("a1", "CODE2").unwrap();
        let rec = store.get("a1").unwrap();
        assert!(!rec.paired);
        assert!(rec.device_token.is_none());

        // The old code no longer confirms; the new one mints a new token.
        assert_eq!(service.confirm("a1", "CODE1"), Err(CoreError::NotFound));
        let fresh = service.confirm("a1", "CODE2").unwrap();
        assert_ne!(token, fresh);
    }

    #[test]
    fn status_hides_token_until_paired() {
        let (service, _) = service();
        service.init("a1", "CODE1").unwrap();
        let status = service.status("a1");
        assert!(!status.paired);
        assert!(status.device_token.is_none());

        let token = service.confirm("a1", "CODE1").unwrap();
        let status = service.status("a1");
        assert!(status.paired);
        assert_eq!(status.device_token, Some(token));
    }

    #[test]
    fn status_read_touches_last_seen() {
        let store = Arc::new(MemoryStore::new());
        let clock = fixed_clock();
        let service = PairingService::new(
            store.clone(),
            Arc::new(SeqTokenSource::new()),
            clock.clone(),
        );
        service.init("a1", "CODE1").unwrap();
        let t0 = store.get("a1").unwrap().last_seen;

        clock.advance(30);
        service.status("a1");
        assert_eq!(
            store.get("a1").unwrap().last_seen,
            t0 + chrono::Duration::seconds(30)
        );
    }

    #[test]
    fn status_of_unknown_agent_is_unpaired() {
        let (service, _) = service();
        assert_eq!(
            service.status("ghost"),
            PairingStatus {
                paired: false,
                device_token: None
            }
        );
    }
}
