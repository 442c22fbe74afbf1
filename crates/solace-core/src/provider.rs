use async_openai::error::OpenAIError;
use async_trait::async_trait;
use thiserror::Error;
use typed_builder::TypedBuilder;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
    /// Data URL attached to a user message for vision models.
    pub image_url: Option<String>,
}

impl ChatMessage {
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
            image_url: None,
        }
    }

    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
            image_url: None,
        }
    }

    #[must_use]
    pub fn user_with_image(content: impl Into<String>, image_url: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
            image_url: Some(image_url.into()),
        }
    }

    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
            image_url: None,
        }
    }
}

#[derive(TypedBuilder, Debug, Clone)]
pub struct ChatRequest {
    #[builder(setter(into))]
    pub model: String,
    pub messages: Vec<ChatMessage>,
    /// Forces the model into JSON object output mode.
    #[builder(default)]
    pub json_object: bool,
    #[builder(default)]
    pub temperature: Option<f32>,
    #[builder(default)]
    pub max_tokens: Option<u32>,
}

#[derive(TypedBuilder, Debug, Clone)]
pub struct TranscriptionRequest {
    #[builder(setter(into))]
    pub model: String,
    pub audio: Vec<u8>,
    #[builder(setter(into))]
    pub filename: String,
    #[builder(setter(into))]
    pub mime_type: String,
    #[builder(default)]
    pub language: Option<String>,
}

#[derive(TypedBuilder, Debug, Clone)]
pub struct SpeechRequest {
    #[builder(setter(into))]
    pub model: String,
    #[builder(setter(into))]
    pub voice: String,
    #[builder(setter(into))]
    pub text: String,
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error(transparent)]
    Api(#[from] OpenAIError),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("provider returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("empty response from provider")]
    EmptyResponse,
}

/// Seam between the HTTP surface and the model vendor. Handlers only see
/// this trait, so tests can substitute a scripted implementation.
#[async_trait]
pub trait Provider: Send + Sync {
    async fn chat(&self, request: ChatRequest) -> Result<String, ProviderError>;

    async fn transcribe(&self, request: TranscriptionRequest) -> Result<String, ProviderError>;

    async fn synthesize(&self, request: SpeechRequest) -> Result<Vec<u8>, ProviderError>;
}
