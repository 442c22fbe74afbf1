use async_openai::Client;
use async_openai::config::OpenAIConfig;
use async_openai::types::{
    ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
    ChatCompletionRequestMessageContentPartImageArgs, ChatCompletionRequestMessageContentPartTextArgs,
    ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
    ChatCompletionRequestUserMessageContentPart, CreateChatCompletionRequestArgs, ImageUrlArgs, ResponseFormat,
};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use std::error::Error;
use typed_builder::TypedBuilder;

use crate::provider::{ChatRequest, ChatRole, Provider, ProviderError, SpeechRequest, TranscriptionRequest};

pub const DEFAULT_API_BASE: &str = "https://api.groq.com/openai/v1";

#[derive(TypedBuilder, Debug, Clone)]
pub struct GroqConfig {
    #[builder(setter(into))]
    pub api_key: String,
    #[builder(setter(into), default = String::from(DEFAULT_API_BASE))]
    pub api_base: String,
    #[builder(setter(into), default = String::from("llama-3.1-8b-instant"))]
    pub sentiment_model: String,
    #[builder(setter(into), default = String::from("llama-3.3-70b-versatile"))]
    pub vision_model: String,
    #[builder(setter(into), default = String::from("llama-3.1-8b-instant"))]
    pub chat_model: String,
    #[builder(setter(into), default = String::from("whisper-large-v3"))]
    pub transcription_model: String,
    #[builder(setter(into), default = String::from("distil-whisper-large-v3-en"))]
    pub transcription_fallback_model: String,
    #[builder(setter(into), default = String::from("whisper-large-v3-turbo"))]
    pub call_transcription_model: String,
    #[builder(setter(into), default = String::from("playai-tts"))]
    pub tts_model: String,
    #[builder(setter(into), default = String::from("Jennifer-PlayAI"))]
    pub tts_voice: String,
}

/// Speaks the OpenAI-compatible Groq API. Chat goes through the
/// `async-openai` client pointed at the Groq base URL; the audio
/// endpoints are called directly because their multipart and binary
/// shapes are Groq-specific.
pub struct GroqClient {
    config: GroqConfig,
    chat_client: Client<OpenAIConfig>,
    http: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
}

impl GroqClient {
    #[must_use]
    pub fn new(config: GroqConfig) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.api_key)
            .with_api_base(&config.api_base);
        Self {
            chat_client: Client::with_config(openai_config),
            http: reqwest::Client::new(),
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &GroqConfig {
        &self.config
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    tracing::warn!(status = status.as_u16(), body, "groq request failed");
    Err(ProviderError::Status {
        status: status.as_u16(),
        body,
    })
}

fn convert_message(message: crate::provider::ChatMessage) -> Result<ChatCompletionRequestMessage, ProviderError> {
    let converted = match message.role {
        ChatRole::System => ChatCompletionRequestSystemMessageArgs::default()
            .content(message.content)
            .build()?
            .into(),
        ChatRole::Assistant => ChatCompletionRequestAssistantMessageArgs::default()
            .content(message.content)
            .build()?
            .into(),
        ChatRole::User => match message.image_url {
            Some(image_url) => {
                let parts: Vec<ChatCompletionRequestUserMessageContentPart> = vec![
                    ChatCompletionRequestMessageContentPartTextArgs::default()
                        .text(message.content)
                        .build()?
                        .into(),
                    ChatCompletionRequestMessageContentPartImageArgs::default()
                        .image_url(ImageUrlArgs::default().url(image_url).build()?)
                        .build()?
                        .into(),
                ];
                ChatCompletionRequestUserMessageArgs::default()
                    .content(parts)
                    .build()?
                    .into()
            }
            None => ChatCompletionRequestUserMessageArgs::default()
                .content(message.content)
                .build()?
                .into(),
        },
    };
    Ok(converted)
}

#[async_trait]
impl Provider for GroqClient {
    async fn chat(&self, request: ChatRequest) -> Result<String, ProviderError> {
        let messages = request
            .messages
            .into_iter()
            .map(convert_message)
            .collect::<Result<Vec<_>, _>>()?;

        let mut args = CreateChatCompletionRequestArgs::default();
        args.model(&request.model).messages(messages);
        if request.json_object {
            args.response_format(ResponseFormat::JsonObject);
        }
        if let Some(temperature) = request.temperature {
            args.temperature(temperature);
        }
        if let Some(max_tokens) = request.max_tokens {
            args.max_completion_tokens(max_tokens);
        }

        tracing::debug!(model = request.model, "sending chat request");
        let response = self
            .chat_client
            .chat()
            .create(args.build()?)
            .await
            .inspect_err(|error| {
                tracing::warn!(error = error as &dyn Error, "chat completion failed");
            })?;

        let first = response.choices.into_iter().next().ok_or(ProviderError::EmptyResponse)?;
        first.message.content.ok_or(ProviderError::EmptyResponse)
    }

    async fn transcribe(&self, request: TranscriptionRequest) -> Result<String, ProviderError> {
        let part = Part::bytes(request.audio)
            .file_name(request.filename)
            .mime_str(&request.mime_type)?;
        let mut form = Form::new()
            .part("file", part)
            .text("model", request.model.clone())
            .text("response_format", "json");
        if let Some(language) = request.language {
            form = form.text("language", language);
        }

        tracing::debug!(model = request.model, "sending transcription request");
        let response = self
            .http
            .post(format!("{}/audio/transcriptions", self.config.api_base))
            .bearer_auth(&self.config.api_key)
            .multipart(form)
            .send()
            .await?;
        let response = check_status(response).await?;
        let body: TranscriptionResponse = response.json().await?;
        Ok(body.text)
    }

    async fn synthesize(&self, request: SpeechRequest) -> Result<Vec<u8>, ProviderError> {
        tracing::debug!(model = request.model, voice = request.voice, "sending speech request");
        let response = self
            .http
            .post(format!("{}/audio/speech", self.config.api_base))
            .bearer_auth(&self.config.api_key)
            .json(&serde_json::json!({
                "model": request.model,
                "voice": request.voice,
                "input": request.text,
                "response_format": "wav",
            }))
            .send()
            .await?;
        let response = check_status(response).await?;
        Ok(response.bytes().await?.to_vec())
    }
}
