use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Mood classification of a piece of journal text.
///
/// `anxiety_score` is always within `0.0..=10.0`; analyzers clamp
/// out-of-range model output before it reaches this type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TextAnalysis {
    #[schema(example = "calm")]
    pub mood: String,
    pub anxiety_score: f32,
}

impl Default for TextAnalysis {
    fn default() -> Self {
        Self {
            mood: "neutral".to_owned(),
            anxiety_score: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AudioAnalysis {
    pub transcription: String,
    #[schema(example = "anxious")]
    pub mood: String,
    pub anxiety_score: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VisionAnalysis {
    #[serde(default)]
    pub detected_objects: Vec<String>,
    #[schema(example = "neutral")]
    pub emotional_impact: String,
}

impl Default for VisionAnalysis {
    fn default() -> Self {
        Self {
            detected_objects: Vec::new(),
            emotional_impact: "neutral".to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_camel_case() {
        let analysis = TextAnalysis {
            mood: "calm".to_owned(),
            anxiety_score: 2.5,
        };
        assert_eq!(
            r#"{"mood":"calm","anxietyScore":2.5}"#,
            serde_json::to_string(&analysis).unwrap()
        );

        let vision = VisionAnalysis::default();
        assert_eq!(
            r#"{"detectedObjects":[],"emotionalImpact":"neutral"}"#,
            serde_json::to_string(&vision).unwrap()
        );
    }

    #[test]
    fn test_defaults() {
        let analysis = TextAnalysis::default();
        assert_eq!("neutral", analysis.mood);
        assert_eq!(0.0, analysis.anxiety_score);
    }
}
