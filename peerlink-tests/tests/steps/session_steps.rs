use cucumber::{given, then, when};
use peerlink_core::codec;
use peerlink_core::testing::EngineCall;
use peerlink_core::{
    EngineEvent, IceCandidate, PeerId, SdpKind, SessionDescription, SessionState,
    SignalingTransport,
};
use peerlink_tests::PeerlinkWorld;

pub const OFFER_SDP: &str = "v=0\r\no=- 4611 2 IN IP4 127.0.0.1\r\ns=-\r\n";

pub fn local_candidate() -> EngineEvent {
    let line = "candidate:7 1 udp 2122252543 10.0.0.1 5000 typ host";
    EngineEvent::LocalCandidateReady(IceCandidate::new("audio", 0, line).expect("valid candidate"))
}

// ===== Given Steps =====

#[given(expr = "the orchestrator is signed in as peer {int}")]
async fn signed_in_as(world: &mut PeerlinkWorld, peer: u64) {
    assert_eq!(world.transport.local_peer_id(), Some(PeerId(peer)));
}

#[given(expr = "the user is connected to peer {int} with the offer sent")]
async fn connected_with_offer(world: &mut PeerlinkWorld, peer: u64) {
    world.connect_to(peer);
    world.emit(EngineEvent::LocalDescriptionReady(SessionDescription::offer(
        OFFER_SDP,
    )));
    world.remembered_engine = world.engine.last_engine();
    world.engine.clear_calls();
}

#[given(expr = "the user connects to peer {int}")]
async fn given_connects(world: &mut PeerlinkWorld, peer: u64) {
    world.connect_to(peer);
}

// ===== When Steps =====

#[when(expr = "the user connects to peer {int}")]
async fn when_connects(world: &mut PeerlinkWorld, peer: u64) {
    world.connect_to(peer);
}

#[when("the engine produces a local offer")]
async fn engine_produces_offer(world: &mut PeerlinkWorld) {
    world.emit(EngineEvent::LocalDescriptionReady(SessionDescription::offer(
        OFFER_SDP,
    )));
}

#[when("the engine produces a local candidate")]
async fn engine_produces_candidate(world: &mut PeerlinkWorld) {
    world.emit(local_candidate());
}

#[when(expr = "peer {int} sends an offer")]
async fn peer_sends_offer(world: &mut PeerlinkWorld, peer: u64) {
    world.receive(peer, codec::encode_description(SdpKind::Offer, OFFER_SDP));
}

#[when(expr = "peer {int} sends an answer")]
async fn peer_sends_answer(world: &mut PeerlinkWorld, peer: u64) {
    world.receive(peer, codec::encode_description(SdpKind::Answer, OFFER_SDP));
}

#[when(expr = "peer {int} sends the candidate {string} for mid {string} at index {int}")]
async fn peer_sends_candidate(
    world: &mut PeerlinkWorld,
    peer: u64,
    candidate: String,
    mid: String,
    index: u32,
) {
    world.receive(peer, codec::encode_candidate(&mid, index, &candidate));
}

#[when(expr = "peer {int} sends {string}")]
async fn peer_sends_raw(world: &mut PeerlinkWorld, peer: u64, raw: String) {
    world.receive(peer, raw);
}

// ===== Then Steps =====

#[then(expr = "the session is bound to peer {int}")]
async fn session_bound_to(world: &mut PeerlinkWorld, peer: u64) {
    assert_eq!(world.orchestrator.peer_id(), Some(PeerId(peer)));
}

#[then("the orchestrator is idle")]
async fn orchestrator_idle(world: &mut PeerlinkWorld) {
    assert_eq!(world.orchestrator.state(), SessionState::Idle);
    assert_eq!(world.orchestrator.peer_id(), None);
}

#[then("the orchestrator is negotiating")]
async fn orchestrator_negotiating(world: &mut PeerlinkWorld) {
    assert_eq!(world.orchestrator.state(), SessionState::Negotiating);
}

#[then(expr = "exactly {int} message(s) is/are sent to peer {int}")]
async fn messages_sent_to(world: &mut PeerlinkWorld, count: usize, peer: u64) {
    let sent = world
        .transport
        .sent()
        .into_iter()
        .filter(|(to, _)| *to == PeerId(peer))
        .count();
    assert_eq!(sent, count, "messages sent to peer {peer}");
}

#[then(expr = "no message is sent to peer {int}")]
async fn no_message_sent_to(world: &mut PeerlinkWorld, peer: u64) {
    assert!(world
        .transport
        .sent()
        .iter()
        .all(|(to, _)| *to != PeerId(peer)));
}

#[then("no message is sent")]
async fn no_message_sent(world: &mut PeerlinkWorld) {
    assert!(world.transport.sent().is_empty());
    assert!(world.orchestrator.outbound().is_empty());
}

#[then(expr = "the last sent message has type {string}")]
async fn last_message_type(world: &mut PeerlinkWorld, kind: String) {
    let (_, payload) = world.transport.sent().pop().expect("Nothing sent");
    let wire: serde_json::Value = serde_json::from_str(&payload).expect("Sent message is JSON");
    assert_eq!(wire["type"], kind.as_str());
}

#[then(expr = "the engine received exactly {int} remote candidate(s) for mid {string} at index {int}")]
async fn remote_candidates_for(world: &mut PeerlinkWorld, count: usize, mid: String, index: u32) {
    let candidates = world.engine.remote_candidates();
    assert_eq!(candidates.len(), count);
    for candidate in candidates {
        assert_eq!(candidate.sdp_mid(), mid);
        assert_eq!(candidate.sdp_mline_index(), index);
    }
}

#[then(expr = "the engine received exactly {int} remote candidate(s)")]
async fn remote_candidates(world: &mut PeerlinkWorld, count: usize) {
    assert_eq!(world.engine.remote_candidates().len(), count);
}

#[then(expr = "the engine was asked for {int} answer(s)")]
async fn answers_requested(world: &mut PeerlinkWorld, count: usize) {
    assert_eq!(world.engine.create_answer_count(), count);
}

#[then(expr = "the engine was asked for {int} offer(s)")]
async fn offers_requested(world: &mut PeerlinkWorld, count: usize) {
    assert_eq!(world.engine.create_offer_count(), count);
}

#[then("the engine was not called")]
async fn engine_not_called(world: &mut PeerlinkWorld) {
    let calls: Vec<EngineCall> = world.engine.calls();
    assert!(calls.is_empty(), "unexpected engine calls: {calls:?}");
}

#[then(expr = "the command fails with {string}")]
async fn command_fails_with(world: &mut PeerlinkWorld, kind: String) {
    assert_eq!(world.last_error_kind(), Some(kind.as_str()));
}
