use cucumber::World;
use peerlink_core::codec::DecodeError;
use peerlink_core::testing::{RecordingEngine, RecordingObserver, RecordingTransport};
use peerlink_core::{
    EngineEvent, EngineHandle, Orchestrator, PeerId, SessionConfig, SessionError,
    SessionGeneration, SignalingMessage, TransportEvent,
};

pub type TestOrchestrator = Orchestrator<RecordingEngine, RecordingTransport, RecordingObserver>;

/// Our own id on the signaling server in every scenario
pub const LOCAL_PEER: PeerId = PeerId(1);

#[derive(Debug, World)]
pub struct PeerlinkWorld {
    /// The system under test
    pub orchestrator: TestOrchestrator,

    pub engine: RecordingEngine,
    pub transport: RecordingTransport,
    pub observer: RecordingObserver,

    /// Result of the last command
    pub last_result: Option<Result<(), SessionError>>,

    /// Engine instance remembered for stale-callback scenarios
    pub remembered_engine: Option<(EngineHandle, SessionGeneration)>,

    /// Result of the last decode
    pub decoded: Option<Result<SignalingMessage, DecodeError>>,
}

impl Default for PeerlinkWorld {
    fn default() -> Self {
        Self::with_transport(RecordingTransport::signed_in(LOCAL_PEER))
    }
}

impl PeerlinkWorld {
    pub fn with_transport(transport: RecordingTransport) -> Self {
        let engine = RecordingEngine::new();
        let observer = RecordingObserver::new();
        let orchestrator = Orchestrator::new(
            SessionConfig::default().with_display_name("alice@box"),
            engine.clone(),
            transport.clone(),
            observer.clone(),
        );
        Self {
            orchestrator,
            engine,
            transport,
            observer,
            last_result: None,
            remembered_engine: None,
            decoded: None,
        }
    }

    /// Rebuild around a transport that has not signed in
    pub fn reset_signed_out(&mut self) {
        *self = Self::with_transport(RecordingTransport::new(LOCAL_PEER));
    }

    pub fn connect_to(&mut self, peer: u64) {
        self.last_result = Some(self.orchestrator.connect_to_peer(PeerId(peer)));
    }

    /// Deliver a raw signaling message from `peer`
    pub fn receive(&mut self, peer: u64, message: String) {
        self.orchestrator
            .handle_transport_event(TransportEvent::MessageFromPeer {
                from: PeerId(peer),
                message,
            });
    }

    /// Emit a callback from the live engine
    pub fn emit(&mut self, event: EngineEvent) {
        let (handle, generation) = self.engine.last_engine().expect("No engine created yet");
        self.orchestrator.handle_engine_event(handle, generation, event);
    }

    /// Name of the error variant of the last command, if it failed
    pub fn last_error_kind(&self) -> Option<&'static str> {
        match self.last_result.as_ref()? {
            Ok(()) => None,
            Err(SessionError::Decode(_)) => Some("Decode"),
            Err(SessionError::InvalidState(_)) => Some("InvalidState"),
            Err(SessionError::InvalidArgument(_)) => Some("InvalidArgument"),
            Err(SessionError::EngineInitFailure(_)) => Some("EngineInitFailure"),
            Err(SessionError::ApplyFailure(_)) => Some("ApplyFailure"),
            Err(SessionError::TransportFailure(_)) => Some("TransportFailure"),
            Err(SessionError::PeerMismatch { .. }) => Some("PeerMismatch"),
        }
    }
}
