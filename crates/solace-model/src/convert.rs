use solace_entity::journal::{journal_entry, journal_media};
use solace_entity::user;

use crate::analysis::{AudioAnalysis, TextAnalysis, VisionAnalysis};
use crate::journal::{AnalysisState, JournalEntry, MediaItem, MediaKind};
use crate::user::User;

impl From<journal_entry::AnalysisState> for AnalysisState {
    fn from(value: journal_entry::AnalysisState) -> Self {
        match value {
            journal_entry::AnalysisState::Pending => Self::Pending,
            journal_entry::AnalysisState::Analyzed => Self::Analyzed,
        }
    }
}

impl From<journal_media::MediaKind> for MediaKind {
    fn from(value: journal_media::MediaKind) -> Self {
        match value {
            journal_media::MediaKind::Image => Self::Image,
            journal_media::MediaKind::Audio => Self::Audio,
        }
    }
}

impl From<&journal_media::Model> for MediaItem {
    fn from(media: &journal_media::Model) -> Self {
        Self {
            kind: media.kind.into(),
            position: media.position,
            filename: media.filename.clone(),
            mime_type: media.mime_type.clone(),
            size: media.bytes.len(),
        }
    }
}

impl From<user::Model> for User {
    fn from(user: user::Model) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            has_profile_image: user.profile_image.is_some(),
            created_at: user.created_at,
        }
    }
}

impl From<(journal_entry::Model, Vec<journal_media::Model>)> for JournalEntry {
    fn from((entry, media): (journal_entry::Model, Vec<journal_media::Model>)) -> Self {
        let text_analysis = match (entry.text_mood, entry.text_anxiety) {
            (Some(mood), Some(anxiety_score)) => Some(TextAnalysis {
                mood,
                anxiety_score,
            }),
            _ => None,
        };
        let audio_analysis = match (entry.audio_transcription, entry.audio_mood, entry.audio_anxiety) {
            (Some(transcription), Some(mood), Some(anxiety_score)) => Some(AudioAnalysis {
                transcription,
                mood,
                anxiety_score,
            }),
            _ => None,
        };
        let vision_analysis = match (entry.vision_objects, entry.vision_impact) {
            (Some(objects), Some(emotional_impact)) => Some(VisionAnalysis {
                detected_objects: serde_json::from_value(objects).unwrap_or_default(),
                emotional_impact,
            }),
            _ => None,
        };
        let images = media
            .iter()
            .filter(|item| item.kind == journal_media::MediaKind::Image)
            .map(MediaItem::from)
            .collect();
        let audio = media
            .iter()
            .find(|item| item.kind == journal_media::MediaKind::Audio)
            .map(MediaItem::from);
        Self {
            id: entry.id,
            user_id: entry.user_id,
            text: entry.text_body,
            analysis_state: entry.analysis_state.into(),
            text_analysis,
            audio_analysis,
            vision_analysis,
            images,
            audio,
            created_at: entry.created_at,
            updated_at: entry.updated_at,
        }
    }
}
