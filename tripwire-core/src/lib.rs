pub mod clock;
pub mod commands;
pub mod error;
pub mod pairing;
pub mod poll;
pub mod status;
pub mod store;
pub mod token;

use std::sync::Arc;

pub use clock::{Clock, SystemClock};
pub use commands::CommandQueue;
pub use error::CoreError;
pub use pairing::{PairingService, PairingStatus};
pub use poll::PollGateway;
pub use status::StatusReporter;
pub use store::{AgentRecord, AgentStore, MemoryStore};
pub use token::{TokenSource, UuidTokenSource};

/// Bundle of the services that make up the pairing/command core, wired
/// over a shared store.
#[derive(Clone)]
pub struct Services {
    pub pairing: PairingService,
    pub commands: CommandQueue,
    pub poll: PollGateway,
    pub status: StatusReporter,
}

impl Services {
    pub fn new(
        store: Arc<dyn AgentStore>,
        tokens: Arc<dyn TokenSource>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let commands = CommandQueue::new(store.clone(), clock.clone());
        Self {
            pairing: PairingService::new(store.clone(), tokens, clock),
            poll: PollGateway::new(store.clone(), commands.clone()),
            status: StatusReporter::new(store),
            commands,
        }
    }

    /// Production wiring: in-memory store, uuid tokens, system clock.
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(MemoryStore::new()),
            Arc::new(UuidTokenSource),
            Arc::new(SystemClock),
        )
    }
}
