use crate::AppConfig;
use crate::user::ExtractUserId;
use axum::Json;
use axum::extract::multipart::MultipartError;
use axum::extract::{Extension, Multipart};
use axum::response::{IntoResponse, Response};
use axum::routing::{Router, post};
use http::StatusCode;
use serde::Deserialize;
use solace_core::provider::{Provider, ProviderError};
use solace_core::{audio, sentiment, transcribe, vision};
use solace_model::analysis::{AudioAnalysis, TextAnalysis, VisionAnalysis};
use std::sync::Arc;
use thiserror::Error;
use utoipa::ToSchema;

#[derive(Error, Debug)]
pub(crate) enum AiError {
    #[error("Missing or empty field: {0}")]
    MissingField(&'static str),

    #[error("Invalid multipart payload")]
    Multipart(#[from] MultipartError),

    #[error("Transcription is currently unavailable")]
    TranscriptionUnavailable,

    #[error("The analyzer is currently unavailable")]
    Provider(#[from] ProviderError),
}

impl IntoResponse for AiError {
    fn into_response(self) -> Response {
        match self {
            Self::MissingField(_) | Self::Multipart(_) => (StatusCode::BAD_REQUEST, self.to_string()).into_response(),
            Self::TranscriptionUnavailable | Self::Provider(_) => {
                (StatusCode::BAD_GATEWAY, self.to_string()).into_response()
            }
        }
    }
}

pub(crate) fn create_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/text", post(analyze_text))
        .route("/audio", post(analyze_audio))
        .route("/image", post(analyze_image))
        .with_state(())
}

#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct TextPayload {
    pub text: String,
}

#[utoipa::path(
    post,
    path = "/api/ai/text",
    request_body = TextPayload,
    responses(
        (status = OK, description = "Mood and anxiety analysis", body = TextAnalysis),
        (status = BAD_REQUEST, description = "Empty text"),
        (status = BAD_GATEWAY, description = "Analyzer unavailable"),
    ),
    tag = "ai",
    security(("token" = []))
)]
pub(crate) async fn analyze_text(
    ExtractUserId(_user): ExtractUserId,
    Extension(config): Extension<AppConfig>,
    Extension(provider): Extension<Arc<dyn Provider>>,
    Json(payload): Json<TextPayload>,
) -> Result<Json<TextAnalysis>, AiError> {
    if payload.text.trim().is_empty() {
        return Err(AiError::MissingField("text"));
    }
    let analysis = sentiment::analyze_text(
        provider.as_ref(),
        &config.analyzer().sentiment_model,
        &payload.text,
    )
    .await?;
    Ok(Json(analysis))
}

#[utoipa::path(
    post,
    path = "/api/ai/audio",
    responses(
        (status = OK, description = "Transcription with mood analysis", body = AudioAnalysis),
        (status = BAD_REQUEST, description = "Missing audio field"),
        (status = BAD_GATEWAY, description = "Every transcription attempt failed"),
    ),
    tag = "ai",
    security(("token" = []))
)]
pub(crate) async fn analyze_audio(
    ExtractUserId(_user): ExtractUserId,
    Extension(config): Extension<AppConfig>,
    Extension(provider): Extension<Arc<dyn Provider>>,
    mut multipart: Multipart,
) -> Result<Json<AudioAnalysis>, AiError> {
    let mut audio: Option<(Vec<u8>, String, String)> = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some("audio") {
            let filename = field.file_name().unwrap_or("recording.webm").to_owned();
            let mime_type = field.content_type().unwrap_or("audio/webm").to_owned();
            let bytes = field.bytes().await?;
            audio = Some((bytes.to_vec(), filename, mime_type));
        }
    }
    let (bytes, filename, mime_type) = audio.filter(|(bytes, _, _)| !bytes.is_empty()).ok_or(AiError::MissingField("audio"))?;

    let analyzer = config.analyzer();
    let prepared = audio::compress_for_transcription(&bytes).await;
    let transcription = transcribe::transcribe(
        provider.as_ref(),
        &analyzer.transcribe_policy,
        &prepared,
        &filename,
        &mime_type,
    )
    .await;
    if transcription.is_unavailable() {
        return Err(AiError::TranscriptionUnavailable);
    }

    let transcript = transcription.into_text();
    let analysis = sentiment::analyze_text(provider.as_ref(), &analyzer.sentiment_model, &transcript).await?;
    Ok(Json(AudioAnalysis {
        transcription: transcript,
        mood: analysis.mood,
        anxiety_score: analysis.anxiety_score,
    }))
}

#[utoipa::path(
    post,
    path = "/api/ai/image",
    responses(
        (status = OK, description = "Detected objects and emotional impact", body = VisionAnalysis),
        (status = BAD_REQUEST, description = "Missing image field"),
        (status = BAD_GATEWAY, description = "Analyzer unavailable"),
    ),
    tag = "ai",
    security(("token" = []))
)]
pub(crate) async fn analyze_image(
    ExtractUserId(_user): ExtractUserId,
    Extension(config): Extension<AppConfig>,
    Extension(provider): Extension<Arc<dyn Provider>>,
    mut multipart: Multipart,
) -> Result<Json<VisionAnalysis>, AiError> {
    let mut image: Option<(Vec<u8>, String)> = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some("image") {
            let mime_type = field.content_type().unwrap_or("image/jpeg").to_owned();
            let bytes = field.bytes().await?;
            image = Some((bytes.to_vec(), mime_type));
        }
    }
    let (bytes, mime_type) = image.filter(|(bytes, _)| !bytes.is_empty()).ok_or(AiError::MissingField("image"))?;

    let analysis =
        vision::analyze_image(provider.as_ref(), &config.analyzer().vision_model, &bytes, &mime_type).await?;
    Ok(Json(analysis))
}
