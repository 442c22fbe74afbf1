use std::error::Error;
use typed_builder::TypedBuilder;

use crate::provider::{Provider, TranscriptionRequest};

/// Largest payload the transcription endpoint accepts reliably.
pub const SAFE_UPLOAD_LIMIT: usize = 250_000;
/// How much of an oversized recording is still submitted.
pub const PARTIAL_PREFIX_LIMIT: usize = 100_000;

pub const PARTIAL_SUFFIX: &str = " [transcription truncated: recording exceeded the size limit]";
pub const UNAVAILABLE_TEXT: &str =
    "Audio transcription is temporarily unavailable. Your recording was saved and can be transcribed later.";

#[derive(TypedBuilder, Debug, Clone)]
pub struct TranscribePolicy {
    #[builder(setter(into))]
    pub primary_model: String,
    #[builder(default, setter(into, strip_option))]
    pub fallback_model: Option<String>,
    #[builder(default)]
    pub language: Option<String>,
    #[builder(default = SAFE_UPLOAD_LIMIT)]
    pub safe_limit: usize,
    #[builder(default = PARTIAL_PREFIX_LIMIT)]
    pub prefix_limit: usize,
}

/// Outcome of a transcription attempt chain. `Partial` carries the text
/// of a truncated upload; `Unavailable` means every attempt failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transcription {
    Complete(String),
    Partial(String),
    Unavailable,
}

impl Transcription {
    /// Collapses the outcome into text suitable for storage. The caller
    /// loses the distinction, so routes that must react to failure check
    /// the variant first.
    #[must_use]
    pub fn into_text(self) -> String {
        match self {
            Self::Complete(text) => text,
            Self::Partial(text) => format!("{text}{PARTIAL_SUFFIX}"),
            Self::Unavailable => UNAVAILABLE_TEXT.to_owned(),
        }
    }

    #[must_use]
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable)
    }
}

/// Runs the ordered attempt chain: primary model, then the fallback
/// model, each on the full recording when it fits the upload limit and
/// on a bounded prefix otherwise. Never submits an oversized payload.
pub async fn transcribe(
    provider: &dyn Provider,
    policy: &TranscribePolicy,
    audio: &[u8],
    filename: &str,
    mime_type: &str,
) -> Transcription {
    let (payload, partial) = if audio.len() <= policy.safe_limit {
        (audio, false)
    } else {
        tracing::warn!(
            size = audio.len(),
            limit = policy.safe_limit,
            "recording exceeds upload limit, transcribing prefix only"
        );
        (&audio[..policy.prefix_limit.min(audio.len())], true)
    };

    let mut models = vec![policy.primary_model.as_str()];
    if let Some(fallback) = &policy.fallback_model {
        models.push(fallback);
    }

    for model in models {
        let request = TranscriptionRequest::builder()
            .model(model)
            .audio(payload.to_vec())
            .filename(filename)
            .mime_type(mime_type)
            .language(policy.language.clone())
            .build();
        match provider.transcribe(request).await {
            Ok(text) => {
                let text = text.trim().to_owned();
                return if partial {
                    Transcription::Partial(text)
                } else {
                    Transcription::Complete(text)
                };
            }
            Err(error) => {
                tracing::warn!(error = &error as &dyn Error, model, "transcription attempt failed");
            }
        }
    }

    Transcription::Unavailable
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{ChatRequest, ProviderError, SpeechRequest};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Records every transcription request and answers from a script of
    /// per-attempt results.
    struct ScriptedProvider {
        requests: Mutex<Vec<(String, usize)>>,
        results: Mutex<Vec<Result<String, ProviderError>>>,
    }

    impl ScriptedProvider {
        fn new(results: Vec<Result<String, ProviderError>>) -> Self {
            Self {
                requests: Mutex::new(Vec::new()),
                results: Mutex::new(results),
            }
        }

        fn requests(&self) -> Vec<(String, usize)> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Provider for ScriptedProvider {
        async fn chat(&self, _request: ChatRequest) -> Result<String, ProviderError> {
            Err(ProviderError::EmptyResponse)
        }

        async fn transcribe(&self, request: TranscriptionRequest) -> Result<String, ProviderError> {
            self.requests
                .lock()
                .unwrap()
                .push((request.model, request.audio.len()));
            let mut results = self.results.lock().unwrap();
            if results.is_empty() {
                Err(ProviderError::EmptyResponse)
            } else {
                results.remove(0)
            }
        }

        async fn synthesize(&self, _request: SpeechRequest) -> Result<Vec<u8>, ProviderError> {
            Err(ProviderError::EmptyResponse)
        }
    }

    fn policy() -> TranscribePolicy {
        TranscribePolicy::builder()
            .primary_model("primary")
            .fallback_model("fallback")
            .build()
    }

    #[test_log::test(tokio::test)]
    async fn test_primary_model_used_first() {
        let provider = ScriptedProvider::new(vec![Ok("  hello world ".to_owned())]);
        let result = transcribe(&provider, &policy(), &[0u8; 1000], "a.webm", "audio/webm").await;
        assert_eq!(Transcription::Complete("hello world".to_owned()), result);
        assert_eq!(vec![("primary".to_owned(), 1000)], provider.requests());
    }

    #[test_log::test(tokio::test)]
    async fn test_fallback_model_on_failure() {
        let provider = ScriptedProvider::new(vec![Err(ProviderError::EmptyResponse), Ok("ok".to_owned())]);
        let result = transcribe(&provider, &policy(), &[0u8; 1000], "a.webm", "audio/webm").await;
        assert_eq!(Transcription::Complete("ok".to_owned()), result);
        let models: Vec<String> = provider.requests().into_iter().map(|(model, _)| model).collect();
        assert_eq!(vec!["primary".to_owned(), "fallback".to_owned()], models);
    }

    #[test_log::test(tokio::test)]
    async fn test_oversized_recording_never_submitted_whole() {
        let provider = ScriptedProvider::new(vec![Ok("partial text".to_owned())]);
        let audio = vec![0u8; SAFE_UPLOAD_LIMIT + 1];
        let result = transcribe(&provider, &policy(), &audio, "a.webm", "audio/webm").await;
        assert_eq!(Transcription::Partial("partial text".to_owned()), result);
        for (_, size) in provider.requests() {
            assert!(size <= PARTIAL_PREFIX_LIMIT);
        }
    }

    #[test_log::test(tokio::test)]
    async fn test_all_attempts_failing_is_unavailable() {
        let provider = ScriptedProvider::new(vec![
            Err(ProviderError::EmptyResponse),
            Err(ProviderError::EmptyResponse),
        ]);
        let result = transcribe(&provider, &policy(), &[0u8; 10], "a.webm", "audio/webm").await;
        assert!(result.is_unavailable());
        assert_eq!(UNAVAILABLE_TEXT, result.into_text());
    }

    #[test]
    fn test_partial_text_is_marked() {
        let text = Transcription::Partial("so far".to_owned()).into_text();
        assert!(text.starts_with("so far"));
        assert!(text.ends_with(PARTIAL_SUFFIX));
    }
}
