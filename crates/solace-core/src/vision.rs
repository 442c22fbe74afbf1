use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use solace_model::analysis::VisionAnalysis;
use std::error::Error;

use crate::provider::{ChatMessage, ChatRequest, Provider, ProviderError};

const VISION_PROMPT: &str = "Look at this photo from a personal journal. \
    Respond with a JSON object with exactly two fields: \
    \"detectedObjects\", an array of short names for the things you see, \
    and \"emotionalImpact\", a single lowercase word for the feeling the image conveys.";

/// Describes a journal photo. Like the sentiment analyzer, unparseable
/// output falls back to the neutral default while transport failures
/// propagate.
pub async fn analyze_image(
    provider: &dyn Provider,
    model: &str,
    image: &[u8],
    mime_type: &str,
) -> Result<VisionAnalysis, ProviderError> {
    let data_url = format!("data:{mime_type};base64,{}", STANDARD.encode(image));
    let request = ChatRequest::builder()
        .model(model)
        .messages(vec![ChatMessage::user_with_image(VISION_PROMPT, data_url)])
        .json_object(true)
        .build();

    let raw = provider.chat(request).await.inspect_err(|error| {
        tracing::warn!(error = error as &dyn Error, "vision analysis failed");
    })?;
    Ok(parse_vision(&raw))
}

#[must_use]
pub fn parse_vision(raw: &str) -> VisionAnalysis {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(raw) else {
        tracing::debug!(raw, "unparseable vision response, using default");
        return VisionAnalysis::default();
    };

    let detected_objects = value
        .get("detectedObjects")
        .and_then(|objects| objects.as_array())
        .map(|objects| {
            objects
                .iter()
                .filter_map(|object| object.as_str())
                .map(str::to_owned)
                .collect()
        })
        .unwrap_or_default();
    let emotional_impact = value
        .get("emotionalImpact")
        .and_then(|impact| impact.as_str())
        .map_or_else(|| "neutral".to_owned(), str::to_lowercase);

    VisionAnalysis {
        detected_objects,
        emotional_impact,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{SpeechRequest, TranscriptionRequest};
    use async_trait::async_trait;

    struct DownProvider;

    #[async_trait]
    impl Provider for DownProvider {
        async fn chat(&self, _request: ChatRequest) -> Result<String, ProviderError> {
            Err(ProviderError::EmptyResponse)
        }

        async fn transcribe(&self, _request: TranscriptionRequest) -> Result<String, ProviderError> {
            Err(ProviderError::EmptyResponse)
        }

        async fn synthesize(&self, _request: SpeechRequest) -> Result<Vec<u8>, ProviderError> {
            Err(ProviderError::EmptyResponse)
        }
    }

    #[test_log::test(tokio::test)]
    async fn test_transport_failure_propagates() {
        let result = analyze_image(&DownProvider, "vision", &[1, 2, 3], "image/png").await;
        assert!(matches!(result, Err(ProviderError::EmptyResponse)));
    }

    #[test]
    fn test_parse_vision_response() {
        let analysis = parse_vision(r#"{"detectedObjects": ["tree", "bench"], "emotionalImpact": "Peaceful"}"#);
        assert_eq!(vec!["tree".to_owned(), "bench".to_owned()], analysis.detected_objects);
        assert_eq!("peaceful", analysis.emotional_impact);
    }

    #[test]
    fn test_parse_vision_garbage_is_default() {
        assert_eq!(VisionAnalysis::default(), parse_vision("not json"));
    }

    #[test]
    fn test_parse_vision_partial_response() {
        let analysis = parse_vision(r#"{"emotionalImpact": "warm"}"#);
        assert!(analysis.detected_objects.is_empty());
        assert_eq!("warm", analysis.emotional_impact);
    }
}
