use crate::domain::{CloseReason, PeerId};

/// Presentation-layer callbacks. Every method defaults to a no-op so
/// implementors only override what they display.
pub trait SessionObserver {
    fn on_signed_in(&mut self) {}

    fn on_server_disconnected(&mut self) {}

    fn on_server_connection_failure(&mut self) {}

    fn on_peer_connected(&mut self, _peer: PeerId, _name: &str) {}

    fn on_peer_disconnected(&mut self, _peer: PeerId) {}

    fn on_session_started(&mut self, _peer: PeerId, _loopback: bool) {}

    fn on_session_closed(&mut self, _peer: PeerId, _reason: CloseReason) {}

    fn on_track_added(&mut self, _track_id: &str) {}

    fn on_track_removed(&mut self, _track_id: &str) {}

    fn on_negotiation_failure(&mut self, _reason: &str) {}
}

/// Observer that ignores everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl SessionObserver for NoopObserver {}
