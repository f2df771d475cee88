#![allow(dead_code)]

use peerlink_core::testing::{RecordingEngine, RecordingTransport};
use peerlink_core::{PeerId, SessionConfig, SessionSnapshot};
use peerlink_runtime::{
    ChannelObserver, EngineEventSink, PresentationEvent, RuntimeBuilder, SessionHandle,
    TransportEventSink,
};
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinHandle;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const LOCAL: PeerId = PeerId(1);
pub const REMOTE: PeerId = PeerId(42);
pub const OFFER_SDP: &str = "v=0\r\no=- 4611 2 IN IP4 127.0.0.1\r\ns=-\r\n";
pub const CANDIDATE: &str = "candidate:1 1 UDP 2122252543 192.168.1.2 54321 typ host";

pub fn init_test_tracing() {
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::new("debug"))
        .with(fmt::layer().with_test_writer())
        .try_init();
}

/// A running control task wired to recording doubles
pub struct RuntimeFixture {
    pub handle: SessionHandle,
    pub task: JoinHandle<SessionSnapshot>,
    pub engine: RecordingEngine,
    pub transport: RecordingTransport,
    pub engine_sink: EngineEventSink,
    pub transport_sink: TransportEventSink,
    pub presentation: UnboundedReceiver<PresentationEvent>,
}

impl RuntimeFixture {
    /// Spawn with a transport that is already signed in as [`LOCAL`]
    pub fn spawn() -> Self {
        init_test_tracing();

        let engine = RecordingEngine::new();
        let transport = RecordingTransport::signed_in(LOCAL);
        let (observer, presentation) = ChannelObserver::new();

        let builder =
            RuntimeBuilder::new().config(SessionConfig::default().with_display_name("alice@box"));
        let engine_sink = builder.engine_sink();
        let transport_sink = builder.transport_sink();
        let (handle, task) = builder.build(engine.clone(), transport.clone(), observer);

        Self {
            handle,
            task,
            engine,
            transport,
            engine_sink,
            transport_sink,
            presentation,
        }
    }

    /// Everything the observer received so far
    pub fn drain_presentation(&mut self) -> Vec<PresentationEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.presentation.try_recv() {
            events.push(event);
        }
        events
    }
}
