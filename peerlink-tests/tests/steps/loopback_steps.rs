use cucumber::{given, then, when};
use peerlink_core::codec;
use peerlink_core::testing::{EngineCall, ObservedEvent};
use peerlink_core::MediaTrack;
use peerlink_tests::PeerlinkWorld;

#[given("the orchestrator is not signed in")]
async fn not_signed_in(world: &mut PeerlinkWorld) {
    world.reset_signed_out();
}

#[when(expr = "peer {int} sends a loopback offer")]
async fn peer_sends_loopback(world: &mut PeerlinkWorld, peer: u64) {
    world.receive(peer, codec::encode_loopback_offer());
}

#[when("the user starts a loopback test")]
async fn start_loopback(world: &mut PeerlinkWorld) {
    world.last_result = Some(world.orchestrator.start_loopback_test());
}

#[then("the session is in loopback mode")]
async fn in_loopback(world: &mut PeerlinkWorld) {
    assert!(world.orchestrator.is_loopback());
}

#[then("the live engine was created with security disabled")]
async fn created_without_security(world: &mut PeerlinkWorld) {
    let live = world.engine.last_handle().expect("No engine");
    assert!(world.engine.calls().contains(&EngineCall::Create {
        handle: live,
        security_enabled: false,
    }));
    assert_eq!(world.engine.live_handles(), vec![live]);
}

#[then("the previous engine was destroyed")]
async fn previous_destroyed(world: &mut PeerlinkWorld) {
    let (previous, _) = world.remembered_engine.expect("No engine remembered");
    assert!(world.engine.calls().contains(&EngineCall::Destroy(previous)));
}

#[then(expr = "the observer saw {int} session start(s)")]
async fn session_starts(world: &mut PeerlinkWorld, count: usize) {
    let starts = world
        .observer
        .events()
        .iter()
        .filter(|e| matches!(e, ObservedEvent::SessionStarted { .. }))
        .count();
    assert_eq!(starts, count);
}

#[then("the local audio track was carried over")]
async fn audio_carried_over(world: &mut PeerlinkWorld) {
    let live = world.engine.last_handle().expect("No engine");
    let config = world.orchestrator.config().clone();
    assert!(world.engine.calls().contains(&EngineCall::AddTrack(
        live,
        MediaTrack::audio(config.audio_label),
        vec![config.stream_id],
    )));
}
