use solace_model::analysis::{TextAnalysis, VisionAnalysis};
use std::error::Error;
use typed_builder::TypedBuilder;

use crate::provider::Provider;
use crate::transcribe::TranscribePolicy;
use crate::{audio, sentiment, transcribe, vision};

#[derive(TypedBuilder, Debug, Clone)]
pub struct AnalyzerConfig {
    #[builder(setter(into))]
    pub sentiment_model: String,
    #[builder(setter(into))]
    pub vision_model: String,
    pub transcribe_policy: TranscribePolicy,
}

#[derive(Debug)]
pub struct AudioInput {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub mime_type: String,
}

#[derive(Debug)]
pub struct ImageInput {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

/// What the audio branch produced. When every transcription attempt
/// failed, `transcription` holds the stored apology text and
/// `sentiment` stays empty.
#[derive(Debug)]
pub struct AudioOutcome {
    pub transcription: String,
    pub sentiment: Option<TextAnalysis>,
}

#[derive(Debug, Default)]
pub struct EntryAnalysis {
    pub text: Option<TextAnalysis>,
    pub audio: Option<AudioOutcome>,
    pub vision: Option<VisionAnalysis>,
}

/// Runs all applicable analyzers for a new journal entry concurrently.
/// Text runs always; audio and vision only when a payload exists. A
/// failing branch ends up empty without cancelling its siblings — for
/// the entry itself an absent analysis is not an error.
pub async fn analyze_entry(
    provider: &dyn Provider,
    config: &AnalyzerConfig,
    text: &str,
    audio_input: Option<AudioInput>,
    image_input: Option<ImageInput>,
) -> EntryAnalysis {
    let text_branch = async {
        sentiment::analyze_text(provider, &config.sentiment_model, text)
            .await
            .inspect_err(|error| {
                tracing::warn!(error = error as &dyn Error, "text analysis branch failed");
            })
            .ok()
    };

    let audio_branch = async {
        let input = audio_input?;
        let prepared = audio::compress_for_transcription(&input.bytes).await;
        let transcription = transcribe::transcribe(
            provider,
            &config.transcribe_policy,
            &prepared,
            &input.filename,
            &input.mime_type,
        )
        .await;

        if transcription.is_unavailable() {
            return Some(AudioOutcome {
                transcription: transcription.into_text(),
                sentiment: None,
            });
        }
        let transcript = transcription.into_text();
        let sentiment = sentiment::analyze_text(provider, &config.sentiment_model, &transcript)
            .await
            .inspect_err(|error| {
                tracing::warn!(error = error as &dyn Error, "transcript analysis failed");
            })
            .ok();
        Some(AudioOutcome {
            transcription: transcript,
            sentiment,
        })
    };

    let vision_branch = async {
        let input = image_input?;
        vision::analyze_image(provider, &config.vision_model, &input.bytes, &input.mime_type)
            .await
            .inspect_err(|error| {
                tracing::warn!(error = error as &dyn Error, "vision analysis branch failed");
            })
            .ok()
    };

    let (text, audio, vision) = tokio::join!(text_branch, audio_branch, vision_branch);
    EntryAnalysis { text, audio, vision }
}
