use regex::Regex;
use std::error::Error;
use std::sync::LazyLock;

use crate::provider::{Provider, SpeechRequest};

/// Result of a speech synthesis attempt. `Unavailable` tells the client
/// to fall back to its own on-device speech engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Synthesis {
    Audio(Vec<u8>),
    Unavailable,
}

impl Synthesis {
    #[must_use]
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable)
    }
}

pub async fn synthesize_speech(provider: &dyn Provider, model: &str, voice: &str, text: &str) -> Synthesis {
    let request = SpeechRequest::builder()
        .model(model)
        .voice(voice)
        .text(demoji(text))
        .build();

    match provider.synthesize(request).await {
        Ok(audio) if !audio.is_empty() => Synthesis::Audio(audio),
        Ok(_) => {
            tracing::warn!("speech synthesis returned no audio");
            Synthesis::Unavailable
        }
        Err(error) => {
            tracing::warn!(error = &error as &dyn Error, "speech synthesis failed");
            Synthesis::Unavailable
        }
    }
}

static EMOJI_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        "[",
        "\u{01F600}-\u{01F64F}",
        "\u{01F300}-\u{01F5FF}",
        "\u{01F680}-\u{01F6FF}",
        "\u{01F1E0}-\u{01F1FF}",
        "\u{002702}-\u{0027B0}",
        "\u{0024C2}-\u{01F251}",
        "]+",
    ))
    .expect("emoji pattern is valid")
});

/// Strips emoji and decodes HTML entities; speech models read both aloud.
#[must_use]
pub fn demoji(string: &str) -> String {
    let string = EMOJI_RE.replace_all(string, "").to_string();
    html_escape::decode_html_entities(&string).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demoji_strips_emoji() {
        assert_eq!("Have a great day !", demoji("Have a great day 🌞😀!"));
    }

    #[test]
    fn test_demoji_decodes_entities() {
        assert_eq!("you & me", demoji("you &amp; me"));
    }

    #[test]
    fn test_demoji_passes_plain_text() {
        assert_eq!("nothing to do", demoji("nothing to do"));
    }
}
