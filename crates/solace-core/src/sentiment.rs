use regex::Regex;
use solace_model::analysis::TextAnalysis;
use std::error::Error;
use std::sync::LazyLock;

use crate::provider::{ChatMessage, ChatRequest, Provider, ProviderError};

const SENTIMENT_PROMPT: &str = "You are an emotional analysis assistant. \
    Analyze the mood of the journal text the user sends. \
    Respond with a JSON object with exactly two fields: \
    \"mood\", a single lowercase word such as happy, sad, anxious, calm or neutral, \
    and \"anxietyScore\", a number between 0 and 10.";

static MOOD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)"?mood"?\s*[:=]\s*"?([a-zA-Z]+)"#).expect("mood pattern is valid"));
static ANXIETY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)"?anxiety[_ ]?score"?\s*[:=]\s*"?([0-9]+(?:\.[0-9]+)?)"#).expect("anxiety pattern is valid")
});

/// Classifies the mood of a journal text. Unparseable model output
/// degrades to the neutral default; transport failures propagate.
pub async fn analyze_text(provider: &dyn Provider, model: &str, text: &str) -> Result<TextAnalysis, ProviderError> {
    let request = ChatRequest::builder()
        .model(model)
        .messages(vec![
            ChatMessage::system(SENTIMENT_PROMPT),
            ChatMessage::user(text),
        ])
        .json_object(true)
        .build();

    let raw = provider.chat(request).await.inspect_err(|error| {
        tracing::warn!(error = error as &dyn Error, "sentiment analysis failed");
    })?;
    Ok(parse_analysis(&raw))
}

/// Parses model output in decreasing strictness: JSON first, then a
/// regex scrape of free text, then the neutral default.
#[must_use]
pub fn parse_analysis(raw: &str) -> TextAnalysis {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(raw) {
        let mood = value.get("mood").and_then(|mood| mood.as_str());
        let anxiety = value.get("anxietyScore").and_then(extract_number);
        if let Some(mood) = mood {
            return TextAnalysis {
                mood: mood.to_lowercase(),
                anxiety_score: clamp_score(anxiety.unwrap_or(0.0)),
            };
        }
    }

    let mood = MOOD_RE
        .captures(raw)
        .and_then(|captures| captures.get(1))
        .map(|capture| capture.as_str().to_lowercase());
    let anxiety = ANXIETY_RE
        .captures(raw)
        .and_then(|captures| captures.get(1))
        .and_then(|capture| capture.as_str().parse::<f32>().ok());

    match (mood, anxiety) {
        (None, None) => {
            tracing::debug!(raw, "unparseable sentiment response, using default");
            TextAnalysis::default()
        }
        (mood, anxiety) => TextAnalysis {
            mood: mood.unwrap_or_else(|| "neutral".to_owned()),
            anxiety_score: clamp_score(anxiety.unwrap_or(0.0)),
        },
    }
}

fn extract_number(value: &serde_json::Value) -> Option<f32> {
    match value {
        serde_json::Value::Number(number) => number.as_f64().map(|number| number as f32),
        serde_json::Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

fn clamp_score(score: f32) -> f32 {
    score.clamp(0.0, 10.0)
}
