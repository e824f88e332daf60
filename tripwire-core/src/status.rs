use std::sync::Arc;
use tripwire_protocol::AgentSummary;

use crate::store::AgentStore;

/// Read-only listing of every agent record, for operator inspection.
/// Unlike the pairing status read this does not touch `last_seen`.
#[derive(Clone)]
pub struct StatusReporter {
    store: Arc<dyn AgentStore>,
}

impl StatusReporter {
    pub fn new(store: Arc<dyn AgentStore>) -> Self {
        Self { store }
    }

    pub fn list_all(&self) -> Vec<AgentSummary> {
        self.store
            .list()
            .into_iter()
            .map(|rec| AgentSummary {
                agent_id: rec.agent_id,
                paired: rec.paired,
                last_seen: rec.last_seen,
                has_token: rec.device_token.is_some(),
                pending_command: rec.pending_command,
            })
            .collect()
    }
}
