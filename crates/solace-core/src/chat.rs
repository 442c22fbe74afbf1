use solace_model::chat::{ConversationTurn, Role};
use typed_builder::TypedBuilder;

use crate::provider::{ChatMessage, ChatRequest, Provider, ProviderError};

/// Turns of client-supplied history kept per request, newest last.
pub const HISTORY_LIMIT: usize = 10;
/// Character budget for each journal digest fed into the voice call.
pub const DIGEST_LIMIT: usize = 100;

pub const SUPPORT_PERSONA: &str = "You are a supportive, empathetic friend. \
    The user writes a mental wellness journal and sometimes wants to talk. \
    Be warm and conversational, validate feelings before offering suggestions, \
    and never present yourself as a therapist or give medical advice.";

pub const CALL_PERSONA: &str = "You are a caring mental wellness assistant on a voice call. \
    Your replies are spoken aloud, so keep them under 150 words, use natural spoken \
    language without lists or markdown, and end with a gentle question when it fits.";

pub const POSITIVITY_PERSONA: &str = "You help the user notice positive moments in their \
    own journal. Ground every reply in what they actually wrote, point out small wins \
    and progress, and stay honest: do not invent events that are not in the entries.";

#[derive(TypedBuilder)]
pub struct ReplyRequest<'a> {
    pub model: &'a str,
    pub persona: &'a str,
    /// Digest of recent journal entries woven into the system prompt.
    #[builder(default)]
    pub context: Option<String>,
    #[builder(default = &[])]
    pub history: &'a [ConversationTurn],
    pub message: &'a str,
    #[builder(default)]
    pub temperature: Option<f32>,
    #[builder(default)]
    pub max_tokens: Option<u32>,
}

pub async fn generate_reply(provider: &dyn Provider, request: ReplyRequest<'_>) -> Result<String, ProviderError> {
    let messages = build_messages(request.persona, request.context.as_deref(), request.history, request.message);
    let chat_request = ChatRequest::builder()
        .model(request.model)
        .messages(messages)
        .temperature(request.temperature)
        .max_tokens(request.max_tokens)
        .build();
    provider.chat(chat_request).await
}

fn build_messages(persona: &str, context: Option<&str>, history: &[ConversationTurn], message: &str) -> Vec<ChatMessage> {
    let system = match context {
        Some(context) if !context.is_empty() => {
            format!("{persona}\n\nRecent journal entries of the user: {context}")
        }
        _ => persona.to_owned(),
    };

    let recent = &history[history.len().saturating_sub(HISTORY_LIMIT)..];

    let mut messages = Vec::with_capacity(recent.len() + 2);
    messages.push(ChatMessage::system(system));
    for turn in recent {
        messages.push(match turn.role {
            Role::User => ChatMessage::user(turn.content.clone()),
            Role::Assistant => ChatMessage::assistant(turn.content.clone()),
        });
    }
    messages.push(ChatMessage::user(message));
    messages
}

/// Builds the digest string for chat context: each text capped at
/// `max_len` characters, newest first, joined with semicolons.
#[must_use]
pub fn journal_digest(texts: &[String], max_len: usize) -> Option<String> {
    if texts.is_empty() {
        return None;
    }
    let digest = texts
        .iter()
        .map(|text| {
            if text.chars().count() > max_len {
                let truncated: String = text.chars().take(max_len).collect();
                format!("{truncated}...")
            } else {
                text.clone()
            }
        })
        .collect::<Vec<_>>()
        .join("; ");
    Some(digest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ChatRole;

    #[test]
    fn test_history_is_capped_to_most_recent() {
        let history: Vec<ConversationTurn> = (0..15)
            .map(|index| ConversationTurn::user(format!("turn {index}")))
            .collect();
        let messages = build_messages(SUPPORT_PERSONA, None, &history, "latest");

        // system + 10 history turns + current message
        assert_eq!(12, messages.len());
        assert_eq!("turn 5", messages[1].content);
        assert_eq!("turn 14", messages[10].content);
        assert_eq!("latest", messages[11].content);
    }

    #[test]
    fn test_context_lands_in_system_prompt() {
        let messages = build_messages(CALL_PERSONA, Some("walked the dog"), &[], "hi");
        assert_eq!(ChatRole::System, messages[0].role);
        assert!(messages[0].content.contains("walked the dog"));
        assert!(messages[0].content.starts_with(CALL_PERSONA));
    }

    #[test]
    fn test_roles_are_preserved() {
        let history = vec![
            ConversationTurn::user("hello"),
            ConversationTurn::assistant("hi there"),
        ];
        let messages = build_messages(SUPPORT_PERSONA, None, &history, "how are you");
        assert_eq!(ChatRole::User, messages[1].role);
        assert_eq!(ChatRole::Assistant, messages[2].role);
    }

    #[test]
    fn test_journal_digest_truncates() {
        let texts = vec!["a".repeat(250), "short entry".to_owned()];
        let digest = journal_digest(&texts, DIGEST_LIMIT).unwrap();
        let parts: Vec<&str> = digest.split("; ").collect();
        assert_eq!(2, parts.len());
        assert_eq!(DIGEST_LIMIT + 3, parts[0].len());
        assert!(parts[0].ends_with("..."));
        assert_eq!("short entry", parts[1]);
    }

    #[test]
    fn test_journal_digest_empty() {
        assert_eq!(None, journal_digest(&[], DIGEST_LIMIT));
    }
}
