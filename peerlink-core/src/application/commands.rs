use crate::domain::PeerId;

/// Commands issued by the presentation layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    /// Sign in to the signaling server
    StartLogin { server: String, port: u16 },

    /// Sign out of the signaling server
    DisconnectFromServer,

    /// Start negotiating with a remote peer
    ConnectToPeer { peer_id: PeerId },

    /// Hang up the active session
    DisconnectFromCurrentPeer,

    /// Negotiate with ourselves, security disabled
    StartLoopbackTest,

    /// Toggle local audio
    SetAudioMuted { muted: bool },

    /// Tear everything down
    Close,
}

impl SessionCommand {
    pub fn name(&self) -> &'static str {
        match self {
            SessionCommand::StartLogin { .. } => "StartLogin",
            SessionCommand::DisconnectFromServer => "DisconnectFromServer",
            SessionCommand::ConnectToPeer { .. } => "ConnectToPeer",
            SessionCommand::DisconnectFromCurrentPeer => "DisconnectFromCurrentPeer",
            SessionCommand::StartLoopbackTest => "StartLoopbackTest",
            SessionCommand::SetAudioMuted { .. } => "SetAudioMuted",
            SessionCommand::Close => "Close",
        }
    }
}
