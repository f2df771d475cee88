use crate::control::{ControlEvent, ControlLoop};
use crate::handle::SessionHandle;
use crate::sinks::{EngineEventSink, TransportEventSink};
use peerlink_core::{
    NegotiationEngine, Orchestrator, SessionConfig, SessionObserver, SessionSnapshot,
    SignalingTransport,
};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

/// Builder for the control task.
///
/// The event channel exists from `new()` on, so engine and transport
/// adapters can be handed their sinks before `build` spawns the task.
pub struct RuntimeBuilder {
    config: SessionConfig,
    tx: mpsc::UnboundedSender<ControlEvent>,
    rx: mpsc::UnboundedReceiver<ControlEvent>,
}

impl Default for RuntimeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RuntimeBuilder {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            config: SessionConfig::default(),
            tx,
            rx,
        }
    }

    pub fn config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn engine_sink(&self) -> EngineEventSink {
        EngineEventSink::new(self.tx.clone())
    }

    pub fn transport_sink(&self) -> TransportEventSink {
        TransportEventSink::new(self.tx.clone())
    }

    /// Spawn the control task on the current tokio runtime.
    ///
    /// Must be called from within a runtime context.
    pub fn build<E, T, O>(
        self,
        engine: E,
        transport: T,
        observer: O,
    ) -> (SessionHandle, JoinHandle<SessionSnapshot>)
    where
        E: NegotiationEngine + Send + 'static,
        T: SignalingTransport + Send + 'static,
        O: SessionObserver + Send + 'static,
    {
        let orchestrator = Orchestrator::new(self.config, engine, transport, observer);
        let (snap_tx, snap_rx) = watch::channel(orchestrator.snapshot());

        tracing::info!(
            "🎯 Spawning control task (display name {})",
            orchestrator.config().display_name
        );

        let control = ControlLoop::new(orchestrator, self.rx, snap_tx);
        let task = tokio::spawn(control.run());

        (SessionHandle::new(self.tx, snap_rx), task)
    }
}
