use crate::codec::DecodeError;
use crate::domain::PeerId;
use crate::ports::{EngineError, TransportError};

/// Errors surfaced at the orchestrator boundary
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Engine initialization failed: {0}")]
    EngineInitFailure(EngineError),

    #[error("Apply failed: {0}")]
    ApplyFailure(String),

    #[error("Transport failure: {0}")]
    TransportFailure(#[from] TransportError),

    #[error("Message from peer {actual} while bound to peer {expected}")]
    PeerMismatch { expected: PeerId, actual: PeerId },
}

impl SessionError {
    /// Whether this class of error ends the current session
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            SessionError::EngineInitFailure(_) | SessionError::TransportFailure(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, SessionError>;
