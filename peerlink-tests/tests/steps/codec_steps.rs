use cucumber::{then, when};
use peerlink_core::codec;
use peerlink_core::{SdpKind, SignalingMessage};
use peerlink_tests::PeerlinkWorld;

#[when(regex = r"^the raw message '(.*)' is decoded$")]
async fn decode_raw(world: &mut PeerlinkWorld, raw: String) {
    world.decoded = Some(codec::decode(&raw));
}

#[when(expr = "an {word} with sdp {string} is encoded and decoded")]
async fn round_trip_description(world: &mut PeerlinkWorld, kind: String, sdp: String) {
    let kind = SdpKind::from_wire(&kind).expect("offer or answer");
    world.decoded = Some(codec::decode(&codec::encode_description(kind, &sdp)));
}

#[when(expr = "a candidate {string} for mid {string} at index {int} is encoded and decoded")]
async fn round_trip_candidate(world: &mut PeerlinkWorld, candidate: String, mid: String, index: u32) {
    world.decoded = Some(codec::decode(&codec::encode_candidate(&mid, index, &candidate)));
}

#[then("decoding fails")]
async fn decoding_fails(world: &mut PeerlinkWorld) {
    let decoded = world.decoded.as_ref().expect("Nothing decoded");
    assert!(decoded.is_err(), "decoded to {decoded:?}");
}

#[then(expr = "the decoded message is an {word} with sdp {string}")]
async fn decoded_description(world: &mut PeerlinkWorld, kind: String, sdp: String) {
    match world.decoded.as_ref().expect("Nothing decoded") {
        Ok(SignalingMessage::SessionDescription(description)) => {
            assert_eq!(description.kind.as_str(), kind);
            assert_eq!(description.sdp, sdp);
        }
        other => panic!("Expected a session description, got {other:?}"),
    }
}

#[then(expr = "the decoded message is a candidate {string} for mid {string} at index {int}")]
async fn decoded_candidate(world: &mut PeerlinkWorld, candidate: String, mid: String, index: u32) {
    match world.decoded.as_ref().expect("Nothing decoded") {
        Ok(SignalingMessage::IceCandidate {
            sdp_mid,
            sdp_mline_index,
            candidate: line,
        }) => {
            assert_eq!(sdp_mid, &mid);
            assert_eq!(*sdp_mline_index, index);
            assert_eq!(line, &candidate);
        }
        other => panic!("Expected a candidate, got {other:?}"),
    }
}

#[then("the decoded message is a loopback request")]
async fn decoded_loopback(world: &mut PeerlinkWorld) {
    assert!(matches!(
        world.decoded.as_ref().expect("Nothing decoded"),
        Ok(SignalingMessage::ControlLoopbackOffer)
    ));
}

#[when("a loopback request is encoded and decoded")]
async fn round_trip_loopback(world: &mut PeerlinkWorld) {
    world.decoded = Some(codec::decode(&codec::encode_loopback_offer()));
}
