use peerlink_core::SessionError;

/// Runtime errors
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("Control task is no longer running")]
    ChannelClosed,
}

pub type Result<T> = std::result::Result<T, RuntimeError>;
