//! Signaling codec: the two disjoint wire shapes of the relay protocol.
//!
//! Session description: `{"type": "offer" | "answer" | "offer-loopback", "sdp": "..."}`
//! ICE candidate: `{"sdpMid": "...", "sdpMLineIndex": 0, "candidate": "..."}`
//!
//! All functions are pure.

mod schema;

pub use schema::{wire_schemas, CandidateShape, DescriptionShape};

use crate::domain::{IceCandidate, SdpKind, SessionDescription, SignalingMessage};
use serde_json::{json, Map, Value};

pub const FIELD_TYPE: &str = "type";
pub const FIELD_SDP: &str = "sdp";
pub const FIELD_SDP_MID: &str = "sdpMid";
pub const FIELD_SDP_MLINE_INDEX: &str = "sdpMLineIndex";
pub const FIELD_CANDIDATE: &str = "candidate";

/// Wire tag of the loopback control message
pub const LOOPBACK_OFFER_TAG: &str = "offer-loopback";

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("Malformed JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Signaling message is not a JSON object")]
    NotAnObject,

    #[error("Unknown session description type: {0}")]
    UnknownDescriptionKind(String),

    #[error("Missing field: {0}")]
    MissingField(&'static str),

    #[error("Invalid field {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("Message matches neither a session description nor a candidate")]
    UnrecognizedShape,
}

pub fn encode_description(kind: SdpKind, sdp: &str) -> String {
    json!({
        FIELD_TYPE: kind.as_str(),
        FIELD_SDP: sdp,
    })
    .to_string()
}

pub fn encode_candidate(sdp_mid: &str, sdp_mline_index: u32, candidate: &str) -> String {
    json!({
        FIELD_SDP_MID: sdp_mid,
        FIELD_SDP_MLINE_INDEX: sdp_mline_index,
        FIELD_CANDIDATE: candidate,
    })
    .to_string()
}

pub fn encode_loopback_offer() -> String {
    json!({ FIELD_TYPE: LOOPBACK_OFFER_TAG }).to_string()
}

pub fn encode_session_description(description: &SessionDescription) -> String {
    encode_description(description.kind, &description.sdp)
}

pub fn encode_ice_candidate(candidate: &IceCandidate) -> String {
    encode_candidate(
        candidate.sdp_mid(),
        candidate.sdp_mline_index(),
        candidate.candidate(),
    )
}

/// Encode any message variant
pub fn encode(message: &SignalingMessage) -> String {
    match message {
        SignalingMessage::SessionDescription(desc) => encode_session_description(desc),
        SignalingMessage::IceCandidate {
            sdp_mid,
            sdp_mline_index,
            candidate,
        } => encode_candidate(sdp_mid, *sdp_mline_index, candidate),
        SignalingMessage::ControlLoopbackOffer => encode_loopback_offer(),
    }
}

/// Decode one wire message.
///
/// A non-empty `type` selects the description shape; otherwise all three
/// candidate fields are mandatory. Unknown `type` tags are rejected before
/// `sdp` is looked at.
pub fn decode(raw: &str) -> Result<SignalingMessage, DecodeError> {
    let value: Value = serde_json::from_str(raw)?;
    let object = value.as_object().ok_or(DecodeError::NotAnObject)?;

    match optional_string(object, FIELD_TYPE)? {
        Some(tag) if !tag.is_empty() => decode_description(object, tag),
        _ => decode_candidate(object),
    }
}

fn decode_description(
    object: &Map<String, Value>,
    tag: &str,
) -> Result<SignalingMessage, DecodeError> {
    if tag == LOOPBACK_OFFER_TAG {
        return Ok(SignalingMessage::ControlLoopbackOffer);
    }

    let kind = SdpKind::from_wire(tag)
        .ok_or_else(|| DecodeError::UnknownDescriptionKind(tag.to_string()))?;
    let sdp = required_string(object, FIELD_SDP)?;

    Ok(SignalingMessage::SessionDescription(SessionDescription::new(
        kind, sdp,
    )))
}

fn decode_candidate(object: &Map<String, Value>) -> Result<SignalingMessage, DecodeError> {
    let has_any = [FIELD_SDP_MID, FIELD_SDP_MLINE_INDEX, FIELD_CANDIDATE]
        .iter()
        .any(|field| object.contains_key(*field));
    if !has_any {
        return Err(DecodeError::UnrecognizedShape);
    }

    let sdp_mid = required_string(object, FIELD_SDP_MID)?;
    let sdp_mline_index = required_index(object, FIELD_SDP_MLINE_INDEX)?;
    let candidate = required_string(object, FIELD_CANDIDATE)?;

    Ok(SignalingMessage::IceCandidate {
        sdp_mid: sdp_mid.to_string(),
        sdp_mline_index,
        candidate: candidate.to_string(),
    })
}

fn optional_string<'a>(
    object: &'a Map<String, Value>,
    field: &'static str,
) -> Result<Option<&'a str>, DecodeError> {
    match object.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(other) => Err(DecodeError::InvalidField {
            field,
            reason: format!("expected string, got {}", type_name(other)),
        }),
    }
}

fn required_string<'a>(
    object: &'a Map<String, Value>,
    field: &'static str,
) -> Result<&'a str, DecodeError> {
    optional_string(object, field)?.ok_or(DecodeError::MissingField(field))
}

fn required_index(object: &Map<String, Value>, field: &'static str) -> Result<u32, DecodeError> {
    let value = match object.get(field) {
        None | Some(Value::Null) => return Err(DecodeError::MissingField(field)),
        Some(value) => value,
    };

    let invalid = |reason: String| DecodeError::InvalidField { field, reason };

    match value {
        Value::Number(n) => {
            if let Some(index) = n.as_u64() {
                u32::try_from(index).map_err(|_| invalid(format!("{index} out of range")))
            } else if n.as_i64().is_some() {
                Err(invalid(format!("{n} is negative")))
            } else {
                Err(invalid(format!("{n} is not an integer")))
            }
        }
        other => Err(invalid(format!("expected integer, got {}", type_name(other)))),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SDP: &str = "v=0\r\no=- 4611731400430051336 2 IN IP4 127.0.0.1\r\ns=-\r\n";
    const CANDIDATE: &str = "candidate:1 1 UDP 2130706431 192.168.1.5 50000 typ host";

    #[test]
    fn test_description_round_trip() {
        for kind in [SdpKind::Offer, SdpKind::Answer] {
            let encoded = encode_description(kind, SDP);
            match decode(&encoded).unwrap() {
                SignalingMessage::SessionDescription(desc) => {
                    assert_eq!(desc.kind, kind);
                    assert_eq!(desc.sdp, SDP);
                }
                other => panic!("Expected description, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_candidate_round_trip_with_zero_index() {
        let encoded = encode_candidate("audio", 0, CANDIDATE);
        assert_eq!(
            decode(&encoded).unwrap(),
            SignalingMessage::IceCandidate {
                sdp_mid: "audio".to_string(),
                sdp_mline_index: 0,
                candidate: CANDIDATE.to_string(),
            }
        );
    }

    #[test]
    fn test_encoded_description_shape() {
        let value: Value = serde_json::from_str(&encode_description(SdpKind::Offer, "v=0")).unwrap();
        assert_eq!(value, json!({"type": "offer", "sdp": "v=0"}));
    }

    #[test]
    fn test_loopback_offer() {
        assert_eq!(
            decode(&encode_loopback_offer()).unwrap(),
            SignalingMessage::ControlLoopbackOffer
        );
        // sdp is not required for the control shape
        assert_eq!(
            decode(r#"{"type":"offer-loopback","sdp":"v=0"}"#).unwrap(),
            SignalingMessage::ControlLoopbackOffer
        );
    }

    #[test]
    fn test_missing_sdp() {
        assert!(matches!(
            decode(r#"{"type":"offer"}"#),
            Err(DecodeError::MissingField(FIELD_SDP))
        ));
    }

    #[test]
    fn test_unknown_kind_rejected_before_sdp() {
        match decode(r#"{"type":"pranswer"}"#) {
            Err(DecodeError::UnknownDescriptionKind(kind)) => assert_eq!(kind, "pranswer"),
            other => panic!("Expected UnknownDescriptionKind, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_candidate_fields() {
        let cases = [
            (r#"{"sdpMLineIndex":0,"candidate":"c"}"#, FIELD_SDP_MID),
            (r#"{"sdpMid":"audio","candidate":"c"}"#, FIELD_SDP_MLINE_INDEX),
            (r#"{"sdpMid":"audio","sdpMLineIndex":0}"#, FIELD_CANDIDATE),
        ];
        for (raw, field) in cases {
            match decode(raw) {
                Err(DecodeError::MissingField(missing)) => assert_eq!(missing, field),
                other => panic!("Expected MissingField({}), got {:?}", field, other),
            }
        }
    }

    #[test]
    fn test_negative_index_rejected() {
        assert!(matches!(
            decode(r#"{"sdpMid":"audio","sdpMLineIndex":-1,"candidate":"c"}"#),
            Err(DecodeError::InvalidField {
                field: FIELD_SDP_MLINE_INDEX,
                ..
            })
        ));
        assert!(matches!(
            decode(r#"{"sdpMid":"audio","sdpMLineIndex":"0","candidate":"c"}"#),
            Err(DecodeError::InvalidField { .. })
        ));
    }

    #[test]
    fn test_unrecognized_and_malformed() {
        assert!(matches!(decode(r#"{"hello":"world"}"#), Err(DecodeError::UnrecognizedShape)));
        assert!(matches!(decode("[1,2,3]"), Err(DecodeError::NotAnObject)));
        assert!(matches!(decode("not json"), Err(DecodeError::Malformed(_))));
        assert!(matches!(
            decode(r#"{"type":7,"sdp":"v=0"}"#),
            Err(DecodeError::InvalidField { field: FIELD_TYPE, .. })
        ));
    }

    #[test]
    fn test_empty_type_falls_through_to_candidate() {
        let raw = format!(
            r#"{{"type":"","sdpMid":"video","sdpMLineIndex":1,"candidate":"{}"}}"#,
            CANDIDATE
        );
        assert!(matches!(
            decode(&raw).unwrap(),
            SignalingMessage::IceCandidate { sdp_mline_index: 1, .. }
        ));
    }

    #[test]
    fn test_encode_dispatch() {
        let msg = SignalingMessage::SessionDescription(SessionDescription::answer(SDP));
        assert_eq!(decode(&encode(&msg)).unwrap(), msg);
        assert_eq!(
            decode(&encode(&SignalingMessage::ControlLoopbackOffer)).unwrap(),
            SignalingMessage::ControlLoopbackOffer
        );
    }
}
