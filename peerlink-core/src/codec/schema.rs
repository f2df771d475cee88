use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Published JSON shape of a session description message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DescriptionShape {
    /// `offer`, `answer` or `offer-loopback`
    #[serde(rename = "type")]
    pub kind: String,
    /// SDP body; ignored for `offer-loopback`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sdp: Option<String>,
}

/// Published JSON shape of an ICE candidate message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CandidateShape {
    #[serde(rename = "sdpMid")]
    pub sdp_mid: String,
    #[serde(rename = "sdpMLineIndex")]
    pub sdp_mline_index: u32,
    pub candidate: String,
}

/// JSON Schemas for both wire shapes, keyed by shape name
pub fn wire_schemas() -> Vec<(&'static str, serde_json::Value)> {
    let description = serde_json::to_value(schemars::schema_for!(DescriptionShape))
        .unwrap_or(serde_json::Value::Null);
    let candidate = serde_json::to_value(schemars::schema_for!(CandidateShape))
        .unwrap_or(serde_json::Value::Null);
    vec![("session_description", description), ("ice_candidate", candidate)]
}
