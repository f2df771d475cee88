use crate::domain::PeerId;
use instant::{Duration, Instant};
use std::fmt;

/// Opaque handle the negotiation engine hands out for one engine instance.
///
/// Adapters may reuse handle values once an engine is destroyed; callbacks
/// are told apart by the [`SessionGeneration`] they carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EngineHandle(pub u64);

impl fmt::Display for EngineHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "engine#{}", self.0)
    }
}

/// Monotonic counter distinguishing successive engine instances of one
/// orchestrator. Handed to the engine in `EngineConfig` and echoed back on
/// every callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SessionGeneration(pub u64);

impl SessionGeneration {
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for SessionGeneration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gen{}", self.0)
    }
}

/// Negotiation lifecycle of the orchestrator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    /// No peer bound
    Idle,
    /// Engine created, no description applied yet
    Negotiating,
    /// At least one local or remote description applied
    Established,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::Idle => "Idle",
            SessionState::Negotiating => "Negotiating",
            SessionState::Established => "Established",
        };
        f.write_str(name)
    }
}

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CloseReason {
    LocalHangUp,
    LocalClose,
    PeerDisconnected,
    TransportDisconnected,
    TransportFailure,
    EngineInitFailure,
    SwitchedToLoopback,
    LoopbackRestartFailed,
}

impl fmt::Display for CloseReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CloseReason::LocalHangUp => "local hang-up",
            CloseReason::LocalClose => "local close",
            CloseReason::PeerDisconnected => "peer disconnected",
            CloseReason::TransportDisconnected => "transport disconnected",
            CloseReason::TransportFailure => "transport failure",
            CloseReason::EngineInitFailure => "engine init failure",
            CloseReason::SwitchedToLoopback => "switched to loopback",
            CloseReason::LoopbackRestartFailed => "loopback restart failed",
        };
        f.write_str(name)
    }
}

/// The single active negotiation context.
///
/// The peer binding is fixed at construction. The engine handle is owned
/// exclusively; switching engines means building a successor session.
#[derive(Debug, Clone)]
pub struct PeerSession {
    peer_id: PeerId,
    engine: EngineHandle,
    loopback: bool,
    state: SessionState,
    generation: SessionGeneration,
    started_at: Instant,
}

impl PeerSession {
    pub fn new(peer_id: PeerId, engine: EngineHandle, generation: SessionGeneration) -> Self {
        Self {
            peer_id,
            engine,
            loopback: false,
            state: SessionState::Negotiating,
            generation,
            started_at: Instant::now(),
        }
    }

    /// Successor bound to the same peer, running on a freshly created
    /// loopback engine. Negotiation restarts from scratch.
    pub fn loopback_successor(
        &self,
        engine: EngineHandle,
        generation: SessionGeneration,
    ) -> Self {
        Self {
            peer_id: self.peer_id,
            engine,
            loopback: true,
            state: SessionState::Negotiating,
            generation,
            started_at: self.started_at,
        }
    }

    pub fn peer_id(&self) -> PeerId {
        self.peer_id
    }

    pub fn engine(&self) -> EngineHandle {
        self.engine
    }

    pub fn is_loopback(&self) -> bool {
        self.loopback
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn generation(&self) -> SessionGeneration {
        self.generation
    }

    pub fn age(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Record that a description was applied on either side
    pub fn mark_established(&mut self) {
        if self.state == SessionState::Negotiating {
            self.state = SessionState::Established;
        }
    }

    /// Whether a callback from `engine` tagged with `generation` belongs to
    /// this session
    pub fn owns(&self, engine: EngineHandle, generation: SessionGeneration) -> bool {
        self.engine == engine && self.generation == generation
    }
}
