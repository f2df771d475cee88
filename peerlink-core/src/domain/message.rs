use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of a session description exchanged during negotiation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SdpKind {
    Offer,
    Answer,
}

impl SdpKind {
    /// Wire tag used in the `type` field
    pub fn as_str(&self) -> &'static str {
        match self {
            SdpKind::Offer => "offer",
            SdpKind::Answer => "answer",
        }
    }

    /// Resolve a wire tag; anything outside the recognized set is `None`
    pub fn from_wire(tag: &str) -> Option<Self> {
        match tag {
            "offer" => Some(SdpKind::Offer),
            "answer" => Some(SdpKind::Answer),
            _ => None,
        }
    }
}

impl fmt::Display for SdpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structural problems with a received session description
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DescriptionError {
    #[error("Session description is empty")]
    Empty,

    #[error("Session description does not start with a version line")]
    MissingVersionLine,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionDescription {
    pub kind: SdpKind,
    pub sdp: String,
}

impl SessionDescription {
    pub fn new(kind: SdpKind, sdp: impl Into<String>) -> Self {
        Self {
            kind,
            sdp: sdp.into(),
        }
    }

    pub fn offer(sdp: impl Into<String>) -> Self {
        Self::new(SdpKind::Offer, sdp)
    }

    pub fn answer(sdp: impl Into<String>) -> Self {
        Self::new(SdpKind::Answer, sdp)
    }

    /// Cheap structural check before the description is handed to the engine.
    /// The engine still does the full SDP parse.
    pub fn validate(&self) -> Result<(), DescriptionError> {
        let body = self.sdp.trim_start();
        if body.is_empty() {
            return Err(DescriptionError::Empty);
        }
        if !body.starts_with("v=") {
            return Err(DescriptionError::MissingVersionLine);
        }
        Ok(())
    }
}

/// A decoded signaling message. Exactly one variant per wire message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignalingMessage {
    /// Offer or answer
    SessionDescription(SessionDescription),

    /// Remote ICE candidate, still unvalidated
    IceCandidate {
        sdp_mid: String,
        sdp_mline_index: u32,
        candidate: String,
    },

    /// Peer asks us to run the session as a self-test
    ControlLoopbackOffer,
}

impl SignalingMessage {
    pub fn kind_name(&self) -> &'static str {
        match self {
            SignalingMessage::SessionDescription(desc) => match desc.kind {
                SdpKind::Offer => "offer",
                SdpKind::Answer => "answer",
            },
            SignalingMessage::IceCandidate { .. } => "candidate",
            SignalingMessage::ControlLoopbackOffer => "offer-loopback",
        }
    }
}
