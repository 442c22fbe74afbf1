use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::analysis::{AudioAnalysis, TextAnalysis, VisionAnalysis};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisState {
    Pending,
    Analyzed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Audio,
}

/// Metadata for one stored attachment. The payload itself is served from
/// a dedicated media route, never inlined into entry responses.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    pub kind: MediaKind,
    pub position: i32,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub filename: Option<String>,
    pub mime_type: String,
    pub size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub text: String,
    pub analysis_state: AnalysisState,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub text_analysis: Option<TextAnalysis>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub audio_analysis: Option<AudioAnalysis>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub vision_analysis: Option<VisionAnalysis>,
    /// Always on the wire, `[]` when the entry has no images.
    #[serde(default)]
    pub images: Vec<MediaItem>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub audio: Option<MediaItem>,
    pub created_at: chrono::DateTime<FixedOffset>,
    pub updated_at: chrono::DateTime<FixedOffset>,
}
