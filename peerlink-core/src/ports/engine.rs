use crate::domain::{
    EngineHandle, IceCandidate, IceServer, MediaTrack, SessionDescription, SessionGeneration,
    TrackBinding,
};

/// Parameters for creating one engine instance
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// DTLS-SRTP; disabled only for loopback
    pub security_enabled: bool,
    pub ice_servers: Vec<IceServer>,
    /// Tag to attach to every callback this instance delivers
    pub generation: SessionGeneration,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("Engine unavailable: {0}")]
    Unavailable(String),

    #[error("Unknown engine handle: {0}")]
    UnknownHandle(EngineHandle),

    #[error("Engine rejected operation: {0}")]
    Rejected(String),
}

/// Asynchronous callbacks from the engine.
///
/// The engine delivers these from its own threads; they must be funnelled
/// back to the orchestrator's control context together with the handle of
/// the engine instance that produced them and the generation it was
/// created with.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// Result of `create_offer` / `create_answer`
    LocalDescriptionReady(SessionDescription),
    /// A local candidate was gathered
    LocalCandidateReady(IceCandidate),
    /// Remote side started sending a track
    TrackAdded(String),
    /// Remote side stopped sending a track
    TrackRemoved(String),
    /// An asynchronous engine operation failed
    NegotiationFailure(String),
}

/// Narrow interface to the external media / negotiation engine.
///
/// Offer and answer creation are asynchronous: the call only starts the
/// work, the result arrives as [`EngineEvent::LocalDescriptionReady`].
/// Asynchronous failures of `set_remote_description` arrive as
/// [`EngineEvent::NegotiationFailure`].
pub trait NegotiationEngine {
    fn create_engine(&mut self, config: &EngineConfig) -> Result<EngineHandle, EngineError>;

    fn destroy_engine(&mut self, handle: EngineHandle);

    fn create_offer(&mut self, handle: EngineHandle) -> Result<(), EngineError>;

    fn create_answer(&mut self, handle: EngineHandle) -> Result<(), EngineError>;

    fn set_local_description(
        &mut self,
        handle: EngineHandle,
        description: &SessionDescription,
    ) -> Result<(), EngineError>;

    fn set_remote_description(
        &mut self,
        handle: EngineHandle,
        description: SessionDescription,
    ) -> Result<(), EngineError>;

    fn add_remote_candidate(
        &mut self,
        handle: EngineHandle,
        candidate: &IceCandidate,
    ) -> Result<(), EngineError>;

    fn list_senders(&self, handle: EngineHandle) -> Vec<TrackBinding>;

    fn add_track(
        &mut self,
        handle: EngineHandle,
        track: &MediaTrack,
        stream_ids: &[String],
    ) -> Result<(), EngineError>;

    /// Enable or disable local audio. Engines without audio control ignore it.
    fn set_audio_enabled(&mut self, _handle: EngineHandle, _enabled: bool) -> Result<(), EngineError> {
        Ok(())
    }
}
