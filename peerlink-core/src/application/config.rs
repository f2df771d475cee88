use crate::domain::IceServer;
use std::env;

pub const DEFAULT_SERVER: &str = "localhost";
pub const DEFAULT_PORT: u16 = 8888;
pub const DEFAULT_AUDIO_LABEL: &str = "audio_label";
pub const DEFAULT_STREAM_ID: &str = "stream_id";

/// Configuration for the session orchestrator
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// ICE servers handed to every new engine
    pub ice_servers: Vec<IceServer>,

    /// Name announced to the signaling server
    pub display_name: String,

    pub default_server: String,

    pub default_port: u16,

    /// Label of the local audio track
    pub audio_label: String,

    /// Stream the local audio track is attached to
    pub stream_id: String,

    /// Maximum number of queued outbound messages (`None` = unbounded)
    pub outbound_queue_limit: Option<usize>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ice_servers: vec![IceServer::default()],
            display_name: "user@host".to_string(),
            default_server: DEFAULT_SERVER.to_string(),
            default_port: DEFAULT_PORT,
            audio_label: DEFAULT_AUDIO_LABEL.to_string(),
            stream_id: DEFAULT_STREAM_ID.to_string(),
            outbound_queue_limit: None,
        }
    }
}

impl SessionConfig {
    /// Read ICE server and display name from the process environment
    pub fn from_env() -> Self {
        Self {
            ice_servers: vec![IceServer::from_env()],
            display_name: display_name_from_env(),
            ..Default::default()
        }
    }

    pub fn with_ice_servers(mut self, servers: Vec<IceServer>) -> Self {
        self.ice_servers = servers;
        self
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = name.into();
        self
    }

    pub fn with_default_server(mut self, server: impl Into<String>, port: u16) -> Self {
        self.default_server = server.into();
        self.default_port = port;
        self
    }

    pub fn with_audio_label(mut self, label: impl Into<String>) -> Self {
        self.audio_label = label.into();
        self
    }

    pub fn with_stream_id(mut self, stream_id: impl Into<String>) -> Self {
        self.stream_id = stream_id.into();
        self
    }

    pub fn with_outbound_queue_limit(mut self, limit: usize) -> Self {
        self.outbound_queue_limit = Some(limit);
        self
    }
}

fn display_name_from_env() -> String {
    let user = env::var("USERNAME")
        .or_else(|_| env::var("USER"))
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "user".to_string());
    let host = env::var("HOSTNAME")
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "host".to_string());
    format!("{user}@{host}")
}
