use super::session_steps::local_candidate;
use cucumber::{given, then, when};
use peerlink_core::{
    EngineEvent, PeerId, SessionDescription, TransportError, TransportEvent,
};
use peerlink_tests::PeerlinkWorld;

// ===== Given Steps =====

#[given("the engine refuses to start")]
async fn engine_refuses(world: &mut PeerlinkWorld) {
    world.engine.fail_next_creates(1);
}

#[given("the engine recycles handles")]
async fn engine_recycles_handles(world: &mut PeerlinkWorld) {
    world.engine.reuse_handles(true);
}

#[given("the user hangs up")]
async fn given_hangs_up(world: &mut PeerlinkWorld) {
    world.last_result = Some(world.orchestrator.disconnect_from_current_peer());
}

// ===== When Steps =====

#[when("the user hangs up")]
async fn when_hangs_up(world: &mut PeerlinkWorld) {
    world.last_result = Some(world.orchestrator.disconnect_from_current_peer());
}

#[when("the previous engine produces a local candidate")]
async fn stale_candidate(world: &mut PeerlinkWorld) {
    let (previous, generation) = world.remembered_engine.expect("No engine remembered");
    world
        .orchestrator
        .handle_engine_event(previous, generation, local_candidate());
}

#[when("the previous engine produces a local offer")]
async fn stale_offer(world: &mut PeerlinkWorld) {
    let (previous, generation) = world.remembered_engine.expect("No engine remembered");
    world.orchestrator.handle_engine_event(
        previous,
        generation,
        EngineEvent::LocalDescriptionReady(SessionDescription::offer("v=0 stale")),
    );
}

#[when("the signaling server disconnects")]
async fn server_disconnects(world: &mut PeerlinkWorld) {
    world
        .orchestrator
        .handle_transport_event(TransportEvent::Disconnected);
}

#[when("the transport reports the last send failed")]
async fn send_failed(world: &mut PeerlinkWorld) {
    world
        .orchestrator
        .handle_transport_event(TransportEvent::MessageSent(Err(TransportError::SendFailed(
            "connection reset".to_string(),
        ))));
}

#[when(expr = "peer {int} goes offline")]
async fn peer_offline(world: &mut PeerlinkWorld, peer: u64) {
    world
        .orchestrator
        .handle_transport_event(TransportEvent::PeerDisconnected(PeerId(peer)));
}

// ===== Then Steps =====

#[then(expr = "a hang-up is sent for peer {int}")]
async fn hang_up_sent(world: &mut PeerlinkWorld, peer: u64) {
    assert_eq!(world.transport.hang_ups(), vec![PeerId(peer)]);
}

#[then("no engine is alive")]
async fn no_engine_alive(world: &mut PeerlinkWorld) {
    assert!(world.engine.live_handles().is_empty());
}

#[then(expr = "the session closed because of {string}")]
async fn closed_because(world: &mut PeerlinkWorld, reason: String) {
    let last = world
        .observer
        .close_reasons()
        .pop()
        .expect("No session was closed");
    assert_eq!(last.to_string(), reason);
}

#[then(expr = "the transport signed out {int} time(s)")]
async fn signed_out_times(world: &mut PeerlinkWorld, count: usize) {
    assert_eq!(world.transport.sign_outs(), count);
}
