use peerlink_core::{
    EngineEvent, EngineHandle, NegotiationEngine, Orchestrator, SessionCommand,
    SessionGeneration, SessionObserver, SessionSnapshot, SignalingTransport, TransportEvent,
};
use tokio::sync::{mpsc, oneshot, watch};
use tracing::Instrument;

/// Everything the control task reacts to, in arrival order
#[derive(Debug)]
pub enum ControlEvent {
    /// Presentation command with its reply slot
    Command {
        command: SessionCommand,
        reply: oneshot::Sender<peerlink_core::Result<()>>,
    },

    /// Event from the signaling transport
    Transport(TransportEvent),

    /// Callback from one engine instance
    Engine {
        handle: EngineHandle,
        generation: SessionGeneration,
        event: EngineEvent,
    },

    /// Snapshot taken after every earlier event was handled
    Query(oneshot::Sender<SessionSnapshot>),

    /// Close the orchestrator and stop the task
    Shutdown,
}

/// Serial control context owning the orchestrator
pub struct ControlLoop<E, T, O> {
    orchestrator: Orchestrator<E, T, O>,
    events: mpsc::UnboundedReceiver<ControlEvent>,
    snapshots: watch::Sender<SessionSnapshot>,
}

impl<E, T, O> ControlLoop<E, T, O>
where
    E: NegotiationEngine,
    T: SignalingTransport,
    O: SessionObserver,
{
    pub fn new(
        orchestrator: Orchestrator<E, T, O>,
        events: mpsc::UnboundedReceiver<ControlEvent>,
        snapshots: watch::Sender<SessionSnapshot>,
    ) -> Self {
        Self {
            orchestrator,
            events,
            snapshots,
        }
    }

    /// Handle one event. Returns `false` once the loop should stop.
    pub fn handle(&mut self, event: ControlEvent) -> bool {
        match event {
            ControlEvent::Command { command, reply } => {
                let name = command.name();
                let result = self.orchestrator.execute(command);
                if let Err(e) = &result {
                    tracing::warn!("⚠️ {} rejected: {}", name, e);
                }
                if reply.send(result).is_err() {
                    tracing::debug!("Caller dropped reply for {}", name);
                }
            }
            ControlEvent::Transport(event) => self.orchestrator.handle_transport_event(event),
            ControlEvent::Engine {
                handle,
                generation,
                event,
            } => self.orchestrator.handle_engine_event(handle, generation, event),
            ControlEvent::Query(reply) => {
                let _ = reply.send(self.orchestrator.snapshot());
            }
            ControlEvent::Shutdown => {
                let _ = self.orchestrator.close();
                self.publish();
                return false;
            }
        }
        self.publish();
        true
    }

    fn publish(&self) {
        self.snapshots.send_if_modified(|current| {
            let latest = self.orchestrator.snapshot();
            if *current == latest {
                false
            } else {
                *current = latest;
                true
            }
        });
    }

    /// Drain events until shutdown or until every sender is gone.
    /// Resolves to the final snapshot.
    pub async fn run(mut self) -> SessionSnapshot {
        let span = tracing::info_span!("peerlink::control");
        async move {
            tracing::info!("🚀 Control task started");
            while let Some(event) = self.events.recv().await {
                if !self.handle(event) {
                    break;
                }
            }
            tracing::info!("🛑 Control task stopped");
            self.orchestrator.snapshot()
        }
        .instrument(span)
        .await
    }
}
