use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Mutex;
use tripwire_protocol::CommandAction;

/// One record per agent identity. Created (or reset) by init, promoted
/// by confirm, mutated by enqueue/poll, read by the status reporter.
/// Records live for the process lifetime; there is no deletion path.
#[derive(Debug, Clone)]
pub struct AgentRecord {
    pub agent_id: String,
    pub paired: bool,
    pub pair_code: String,
    pub device_token: Option<String>,
    pub last_seen: DateTime<Utc>,
    pub pending_command: Option<CommandAction>,
}

impl AgentRecord {
    /// A freshly initialized record: not paired, no token, nothing
    /// queued. Any prior pairing for the same id is discarded by
    /// inserting this over it.
    pub fn initialized(agent_id: &str, pair_code: &str, now: DateTime<Utc>) -> Self {
        Self {
            agent_id: agent_id.to_string(),
            paired: false,
            pair_code: pair_code.to_string(),
            device_token: None,
            last_seen: now,
            pending_command: None,
        }
    }
}

/// Storage seam for agent records. Object-safe so the services can hold
/// `Arc<dyn AgentStore>` and tests can substitute a fake; a persistent
/// implementation can later replace `MemoryStore` without touching the
/// protocol logic.
pub trait AgentStore: Send + Sync {
    /// Snapshot of a record. Never creates one as a side effect.
    fn get(&self, agent_id: &str) -> Option<AgentRecord>;

    /// Insert a record, replacing any existing one for the same id.
    fn insert(&self, record: AgentRecord);

    /// Run `apply` against the record under the store lock. Returns
    /// false when the agent is unknown. This is the atomicity primitive:
    /// confirm's check-then-mint and poll's read-then-clear each happen
    /// inside a single `update` call.
    fn update(&self, agent_id: &str, apply: &mut dyn FnMut(&mut AgentRecord)) -> bool;

    /// Snapshot of every record, for operational listing.
    fn list(&self) -> Vec<AgentRecord>;
}

/// In-memory store: one mutex over the whole map. Contention is low,
/// agents are independent, and no caller ever holds two locks.
pub struct MemoryStore {
    records: Mutex<HashMap<String, AgentRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AgentStore for MemoryStore {
    fn get(&self, agent_id: &str) -> Option<AgentRecord> {
        self.records.lock().unwrap().get(agent_id).cloned()
    }

    fn insert(&self, record: AgentRecord) {
        self.records
            .lock()
            .unwrap()
            .insert(record.agent_id.clone(), record);
    }

    fn update(&self, agent_id: &str, apply: &mut dyn FnMut(&mut AgentRecord)) -> bool {
        let mut records = self.records.lock().unwrap();
        match records.get_mut(agent_id) {
            Some(record) => {
                apply(record);
                true
            }
            None => false,
        }
    }

    fn list(&self) -> Vec<AgentRecord> {
        self.records.lock().unwrap().values().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn get_never_creates() {
        let store = MemoryStore::new();
        assert!(store.get("ghost").is_none());
        assert!(store.list().is_empty());
    }

    #[test]
    fn insert_replaces_existing_record() {
        let store = MemoryStore::new();
        let now = Utc::now();
        store.insert(AgentRecord::initialized("a1", "CODE1", now));
        store.update("a1", &mut |rec| rec.paired = true);

        store.insert(AgentRecord::initialized("a1", "CODE2", now));
        let rec = store.get("a1").unwrap();
        assert!(!rec.paired);
        assert_eq!(rec.pair_code, "CODE2");
        assert_eq!(store.list().len(), 1);
    }

    #[test]
    fn update_reports_unknown_agent() {
        let store = MemoryStore::new();
        let mut called = false;
        assert!(!store.update("ghost", &mut |_| called = true));
        assert!(!called);
    }
}
