mod candidate;
mod ice_server;
mod media;
mod message;
mod peer;
mod session;

pub use candidate::{CandidateError, IceCandidate};
pub use ice_server::IceServer;
pub use media::{MediaTrack, TrackBinding, TrackKind};
pub use message::{DescriptionError, SdpKind, SessionDescription, SignalingMessage};
pub use peer::PeerId;
pub use session::{CloseReason, EngineHandle, PeerSession, SessionGeneration, SessionState};
