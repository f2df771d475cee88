//! Tokio control task for the peerlink session orchestrator.
//!
//! Commands, signaling-transport events and engine callbacks are all
//! funnelled through one unbounded channel onto a single task that owns the
//! [`Orchestrator`](peerlink_core::Orchestrator).

pub mod builder;
pub mod control;
pub mod error;
pub mod handle;
pub mod observer;
pub mod sinks;

pub use builder::RuntimeBuilder;
pub use control::{ControlEvent, ControlLoop};
pub use error::{Result, RuntimeError};
pub use handle::SessionHandle;
pub use observer::{ChannelObserver, PresentationEvent};
pub use sinks::{EngineEventSink, TransportEventSink};
