use crate::control::ControlEvent;
use crate::error::{Result, RuntimeError};
use peerlink_core::{EngineEvent, EngineHandle, SessionGeneration, TransportEvent};
use tokio::sync::mpsc;

/// Entry point for engine callbacks.
///
/// `deliver` never blocks and may be called from the engine's own threads.
#[derive(Debug, Clone)]
pub struct EngineEventSink {
    events: mpsc::UnboundedSender<ControlEvent>,
}

impl EngineEventSink {
    pub(crate) fn new(events: mpsc::UnboundedSender<ControlEvent>) -> Self {
        Self { events }
    }

    /// Queue a callback from engine instance `handle`, tagged with the
    /// generation it was created with
    pub fn deliver(
        &self,
        handle: EngineHandle,
        generation: SessionGeneration,
        event: EngineEvent,
    ) -> Result<()> {
        self.events
            .send(ControlEvent::Engine {
                handle,
                generation,
                event,
            })
            .map_err(|_| RuntimeError::ChannelClosed)
    }
}

/// Entry point for signaling transport events
#[derive(Debug, Clone)]
pub struct TransportEventSink {
    events: mpsc::UnboundedSender<ControlEvent>,
}

impl TransportEventSink {
    pub(crate) fn new(events: mpsc::UnboundedSender<ControlEvent>) -> Self {
        Self { events }
    }

    pub fn deliver(&self, event: TransportEvent) -> Result<()> {
        self.events
            .send(ControlEvent::Transport(event))
            .map_err(|_| RuntimeError::ChannelClosed)
    }
}
