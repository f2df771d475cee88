use serde::{Deserialize, Serialize};

/// Environment variable overriding the default ICE server URL
pub const ICE_SERVER_ENV: &str = "WEBRTC_CONNECT";

const DEFAULT_STUN_URL: &str = "stun:stun.l.google.com:19302";

/// ICE server the negotiation engine uses for network traversal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IceServer {
    /// Server URLs (can have multiple for failover)
    pub urls: Vec<String>,
    /// Username (TURN only)
    pub username: Option<String>,
    /// Credential (TURN only)
    pub credential: Option<String>,
}

impl IceServer {
    pub fn stun(url: impl Into<String>) -> Self {
        Self {
            urls: vec![url.into()],
            username: None,
            credential: None,
        }
    }

    pub fn turn(
        url: impl Into<String>,
        username: impl Into<String>,
        credential: impl Into<String>,
    ) -> Self {
        Self::stun(url).with_auth(username, credential)
    }

    pub fn from_urls(urls: Vec<String>) -> Self {
        Self {
            urls,
            username: None,
            credential: None,
        }
    }

    pub fn with_auth(mut self, username: impl Into<String>, credential: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.credential = Some(credential.into());
        self
    }

    /// `WEBRTC_CONNECT` if set and non-empty, otherwise Google's public STUN server
    pub fn from_env() -> Self {
        std::env::var(ICE_SERVER_ENV)
            .ok()
            .and_then(|value| Self::parse_urls(&value))
            .unwrap_or_default()
    }

    /// Comma-separated URL list; `None` when it holds no URL
    pub fn parse_urls(value: &str) -> Option<Self> {
        let urls: Vec<String> = value
            .split(',')
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(str::to_string)
            .collect();
        if urls.is_empty() {
            None
        } else {
            Some(Self::from_urls(urls))
        }
    }
}

impl Default for IceServer {
    fn default() -> Self {
        Self::stun(DEFAULT_STUN_URL)
    }
}
