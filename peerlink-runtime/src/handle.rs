use crate::control::ControlEvent;
use crate::error::{Result, RuntimeError};
use crate::sinks::{EngineEventSink, TransportEventSink};
use peerlink_core::{PeerId, SessionCommand, SessionSnapshot};
use tokio::sync::{mpsc, oneshot, watch};

/// Clonable front end to a running control task
#[derive(Debug, Clone)]
pub struct SessionHandle {
    events: mpsc::UnboundedSender<ControlEvent>,
    snapshots: watch::Receiver<SessionSnapshot>,
}

impl SessionHandle {
    pub(crate) fn new(
        events: mpsc::UnboundedSender<ControlEvent>,
        snapshots: watch::Receiver<SessionSnapshot>,
    ) -> Self {
        Self { events, snapshots }
    }

    /// Run a command on the control task and wait for its result
    pub async fn execute(&self, command: SessionCommand) -> Result<()> {
        let (reply, result) = oneshot::channel();
        self.events
            .send(ControlEvent::Command { command, reply })
            .map_err(|_| RuntimeError::ChannelClosed)?;
        result.await.map_err(|_| RuntimeError::ChannelClosed)??;
        Ok(())
    }

    pub async fn start_login(&self, server: impl Into<String>, port: u16) -> Result<()> {
        self.execute(SessionCommand::StartLogin {
            server: server.into(),
            port,
        })
        .await
    }

    pub async fn disconnect_from_server(&self) -> Result<()> {
        self.execute(SessionCommand::DisconnectFromServer).await
    }

    pub async fn connect_to_peer(&self, peer_id: PeerId) -> Result<()> {
        self.execute(SessionCommand::ConnectToPeer { peer_id }).await
    }

    pub async fn disconnect_from_current_peer(&self) -> Result<()> {
        self.execute(SessionCommand::DisconnectFromCurrentPeer).await
    }

    pub async fn start_loopback_test(&self) -> Result<()> {
        self.execute(SessionCommand::StartLoopbackTest).await
    }

    pub async fn set_audio_muted(&self, muted: bool) -> Result<()> {
        self.execute(SessionCommand::SetAudioMuted { muted }).await
    }

    pub async fn close(&self) -> Result<()> {
        self.execute(SessionCommand::Close).await
    }

    /// Close the orchestrator and stop the control task
    pub fn shutdown(&self) -> Result<()> {
        self.events
            .send(ControlEvent::Shutdown)
            .map_err(|_| RuntimeError::ChannelClosed)
    }

    /// Latest published snapshot (never blocks)
    pub fn state(&self) -> SessionSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Snapshot taken after every event queued so far was handled
    pub async fn query_state(&self) -> Result<SessionSnapshot> {
        let (reply, snapshot) = oneshot::channel();
        self.events
            .send(ControlEvent::Query(reply))
            .map_err(|_| RuntimeError::ChannelClosed)?;
        snapshot.await.map_err(|_| RuntimeError::ChannelClosed)
    }

    /// Subscribe to snapshot changes
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshots.clone()
    }

    pub fn engine_sink(&self) -> EngineEventSink {
        EngineEventSink::new(self.events.clone())
    }

    pub fn transport_sink(&self) -> TransportEventSink {
        TransportEventSink::new(self.events.clone())
    }
}
