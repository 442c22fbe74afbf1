use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Transcript of one recorded call turn.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProcessResponse {
    pub transcript: String,
}

/// Spoken reply for a call turn. `audio` carries base64 WAV when server
/// side synthesis worked; otherwise `use_browser_tts` tells the client
/// to speak the text itself.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CallReply {
    pub reply: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio: Option<String>,
    pub use_browser_tts: bool,
}
