use peerlink_core::{CloseReason, PeerId, SessionObserver};
use tokio::sync::mpsc;

/// Presentation event forwarded by [`ChannelObserver`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresentationEvent {
    SignedIn,
    ServerDisconnected,
    ServerConnectionFailure,
    PeerConnected { id: PeerId, name: String },
    PeerDisconnected(PeerId),
    SessionStarted { peer: PeerId, loopback: bool },
    SessionClosed { peer: PeerId, reason: CloseReason },
    TrackAdded(String),
    TrackRemoved(String),
    NegotiationFailure(String),
}

/// Observer that forwards every callback over an unbounded channel,
/// for UI layers living on another task or thread.
#[derive(Debug, Clone)]
pub struct ChannelObserver {
    tx: mpsc::UnboundedSender<PresentationEvent>,
}

impl ChannelObserver {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<PresentationEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    fn emit(&self, event: PresentationEvent) {
        if self.tx.send(event).is_err() {
            tracing::trace!("Presentation receiver dropped");
        }
    }
}

impl SessionObserver for ChannelObserver {
    fn on_signed_in(&mut self) {
        self.emit(PresentationEvent::SignedIn);
    }

    fn on_server_disconnected(&mut self) {
        self.emit(PresentationEvent::ServerDisconnected);
    }

    fn on_server_connection_failure(&mut self) {
        self.emit(PresentationEvent::ServerConnectionFailure);
    }

    fn on_peer_connected(&mut self, peer: PeerId, name: &str) {
        self.emit(PresentationEvent::PeerConnected {
            id: peer,
            name: name.to_string(),
        });
    }

    fn on_peer_disconnected(&mut self, peer: PeerId) {
        self.emit(PresentationEvent::PeerDisconnected(peer));
    }

    fn on_session_started(&mut self, peer: PeerId, loopback: bool) {
        self.emit(PresentationEvent::SessionStarted { peer, loopback });
    }

    fn on_session_closed(&mut self, peer: PeerId, reason: CloseReason) {
        self.emit(PresentationEvent::SessionClosed { peer, reason });
    }

    fn on_track_added(&mut self, track_id: &str) {
        self.emit(PresentationEvent::TrackAdded(track_id.to_string()));
    }

    fn on_track_removed(&mut self, track_id: &str) {
        self.emit(PresentationEvent::TrackRemoved(track_id.to_string()));
    }

    fn on_negotiation_failure(&mut self, reason: &str) {
        self.emit(PresentationEvent::NegotiationFailure(reason.to_string()));
    }
}
