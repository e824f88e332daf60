use std::sync::Arc;
use tripwire_protocol::CommandAction;

use crate::commands::CommandQueue;
use crate::error::CoreError;
use crate::store::AgentStore;

/// Authenticated poll surface for agents. The bearer token issued at
/// confirm time is the only credential; anything short of an exact
/// match is `Unauthorized`, with no hint of which part was wrong.
#[derive(Clone)]
pub struct PollGateway {
    store: Arc<dyn AgentStore>,
    queue: CommandQueue,
}

impl PollGateway {
    pub fn new(store: Arc<dyn AgentStore>, queue: CommandQueue) -> Self {
        Self { store, queue }
    }

    /// Check the token, then hand over (and clear) the pending command.
    /// A failed check neither reveals nor clears it. An absent stored
    /// token never matches, so unconfirmed agents cannot poll.
    pub fn poll(
        &self,
        agent_id: &str,
        supplied_token: &str,
    ) -> Result<Option<CommandAction>, CoreError> {
        let authorized = match self.store.get(agent_id) {
            Some(rec) => rec.device_token.as_deref() == Some(supplied_token),
            None => false,
        };
        if !authorized {
            return Err(CoreError::Unauthorized);
        }
        Ok(self.queue.take_and_clear(agent_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::fixed_clock;
    use crate::pairing::PairingService;
    use crate::store::MemoryStore;
    use crate::token::SeqTokenSource;

    fn gateway() -> (PollGateway, CommandQueue, String) {
        let store = Arc::new(MemoryStore::new());
        let clock = fixed_clock();
        let pairing =
            PairingService::new(store.clone(), Arc::new(SeqTokenSource::new()), clock.clone());
        pairing.init("a1", "CODE1").unwrap();
        let token = pairing.confirm("a1", "CODE1").unwrap();
        let queue = CommandQueue::new(store.clone(), clock);
        (PollGateway::new(store, queue.clone()), queue, token)
    }

    #[test]
    fn poll_with_correct_token_drains_command() {
        let (gateway, queue, token) = gateway();
        queue.enqueue("a1", "destroy").unwrap();

        assert_eq!(
            gateway.poll("a1", &token),
            Ok(Some(CommandAction::Destroy))
        );
        assert_eq!(gateway.poll("a1", &token), Ok(None));
    }

    #[test]
    fn wrong_token_leaves_command_queued() {
        let (gateway, queue, token) = gateway();
        queue.enqueue("a1", "destroy").unwrap();

        assert_eq!(
            gateway.poll("a1", "wrong-token"),
            Err(CoreError::Unauthorized)
        );
        // The command survives a rejected poll.
        assert_eq!(
            gateway.poll("a1", &token),
            Ok(Some(CommandAction::Destroy))
        );
    }

    #[test]
    fn unknown_agent_and_empty_token_are_unauthorized() {
        let (gateway, _, token) = gateway();
        assert_eq!(gateway.poll("ghost", &token), Err(CoreError::Unauthorized));
        assert_eq!(gateway.poll("a1", ""), Err(CoreError::Unauthorized));
    }

    #[test]
    fn unconfirmed_agent_cannot_poll() {
        let store = Arc::new(MemoryStore::new());
        let clock = fixed_clock();
        let pairing =
            PairingService::new(store.clone(), Arc::new(SeqTokenSource::new()), clock.clone());
        pairing.init("a1", "CODE1").unwrap();
        let gateway = PollGateway::new(store.clone(), CommandQueue::new(store, clock));

        assert_eq!(gateway.poll("a1", ""), Err(CoreError::Unauthorized));
    }
}
