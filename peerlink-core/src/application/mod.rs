pub mod commands;
pub mod config;
pub mod orchestrator;
pub mod runtime;

pub use commands::SessionCommand;
pub use config::SessionConfig;
pub use orchestrator::{Orchestrator, SessionSnapshot};
pub use runtime::{OutboundQueue, PendingOutboundMessage, QueueError};
