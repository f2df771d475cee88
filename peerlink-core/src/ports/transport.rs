use crate::domain::PeerId;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerAddress {
    pub host: String,
    pub port: u16,
}

impl ServerAddress {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl fmt::Display for ServerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("Not connected to the signaling server")]
    NotConnected,

    #[error("Connect failed: {0}")]
    ConnectFailed(String),

    #[error("Send failed: {0}")]
    SendFailed(String),
}

/// Events delivered by the signaling transport, in server order
#[derive(Debug, Clone, PartialEq)]
pub enum TransportEvent {
    SignedIn,
    Disconnected,
    PeerConnected { id: PeerId, name: String },
    PeerDisconnected(PeerId),
    MessageFromPeer { from: PeerId, message: String },
    /// Completion of the last `send_to_peer`
    MessageSent(Result<(), TransportError>),
    ServerConnectionFailure,
}

/// Reliable, ordered message pipe to the signaling server.
///
/// At most one `send_to_peer` is outstanding at a time; its completion is
/// reported through [`TransportEvent::MessageSent`].
pub trait SignalingTransport {
    fn connect(&mut self, server: &ServerAddress, display_name: &str) -> Result<(), TransportError>;

    fn sign_out(&mut self);

    fn send_to_peer(&mut self, peer: PeerId, message: &str) -> Result<(), TransportError>;

    /// Tell the server we hung up on `peer`
    fn send_hang_up(&mut self, _peer: PeerId) -> Result<(), TransportError> {
        Ok(())
    }

    fn is_sending_message(&self) -> bool;

    fn is_connected(&self) -> bool;

    /// Our own id once signed in
    fn local_peer_id(&self) -> Option<PeerId>;
}
