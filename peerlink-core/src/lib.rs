//! Session negotiation orchestrator for two-party real-time media sessions
//! set up through a signaling relay.

// Domain layer (wire types, session state)
pub mod domain;

// Signaling codec (pure functions)
pub mod codec;

// Ports to external collaborators
pub mod ports;

// Application layer (orchestrator, outbound queue)
pub mod application;

pub mod error;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

// Re-exports for convenience
pub use application::{
    OutboundQueue, Orchestrator, PendingOutboundMessage, QueueError, SessionCommand,
    SessionConfig, SessionSnapshot,
};
pub use codec::DecodeError;
pub use domain::{
    CandidateError, CloseReason, DescriptionError, IceCandidate, IceServer, MediaTrack, PeerId,
    PeerSession, SdpKind, SessionDescription, SessionGeneration, SessionState, SignalingMessage,
    TrackBinding, TrackKind,
};
pub use error::{Result, SessionError};
pub use ports::{
    EngineConfig, EngineError, EngineEvent, EngineHandle, NegotiationEngine, NoopObserver,
    ServerAddress, SessionObserver, SignalingTransport, TransportError, TransportEvent,
};
