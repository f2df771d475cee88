//! Capabilities the orchestrator consumes. Implementations live outside
//! this crate (media engine bindings, signaling clients, UI layers).

mod engine;
mod observer;
mod transport;

pub use crate::domain::EngineHandle;
pub use engine::{EngineConfig, EngineError, EngineEvent, NegotiationEngine};
pub use observer::{NoopObserver, SessionObserver};
pub use transport::{ServerAddress, SignalingTransport, TransportError, TransportEvent};
