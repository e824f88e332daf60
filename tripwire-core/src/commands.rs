use std::sync::Arc;
use tracing::{debug, info};
use tripwire_protocol::CommandAction;

use crate::clock::Clock;
use crate::error::CoreError;
use crate::store::AgentStore;

/// One-shot command delivery. Each agent holds at most one pending
/// command; a new enqueue silently overwrites an undelivered one.
#[derive(Clone)]
pub struct CommandQueue {
    store: Arc<dyn AgentStore>,
    clock: Arc<dyn Clock>,
}

impl CommandQueue {
    pub fn new(store: Arc<dyn AgentStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Queue an action for a paired agent. Unknown and unpaired agents
    /// both report `NotFound`: an agent that never completed the
    /// handshake cannot receive commands.
    pub fn enqueue(&self, agent_id: &str, action: &str) -> Result<(), CoreError> {
        if agent_id.is_empty() || action.is_empty() {
            return Err(CoreError::InvalidRequest("agent_id and action are required"));
        }
        let action = CommandAction::parse(action)
            .ok_or_else(|| CoreError::UnsupportedAction(action.to_string()))?;

        let mut queued = false;
        self.store.update(agent_id, &mut |rec| {
            if !rec.paired {
                return;
            }
            if rec.pending_command.is_some() {
                debug!(agent_id, "overwriting undelivered command");
            }
            rec.pending_command = Some(action);
            rec.last_seen = self.clock.now();
            queued = true;
        });

        if queued {
            info!(agent_id, action = action.as_str(), "command queued");
            Ok(())
        } else {
            Err(CoreError::NotFound)
        }
    }

    /// Read and clear the pending command in one step under the store
    /// lock, so two concurrent pollers can never both see the same
    /// command. `None` is the common "nothing queued" result.
    pub fn take_and_clear(&self, agent_id: &str) -> Option<CommandAction> {
        let mut taken = None;
        self.store.update(agent_id, &mut |rec| {
            taken = rec.pending_command.take();
            rec.last_seen = self.clock.now();
        });
        if let Some(action) = taken {
            info!(agent_id, action = action.as_str(), "command delivered");
        }
        taken
    }
}
