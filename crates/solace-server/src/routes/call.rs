use crate::AppConfig;
use crate::user::ExtractUserId;
use axum::Json;
use axum::extract::multipart::MultipartError;
use axum::extract::{Extension, Multipart};
use axum::response::{IntoResponse, Response};
use axum::routing::{Router, post};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use http::StatusCode;
use sea_orm::DatabaseConnection;
use solace_core::chat::{CALL_PERSONA, DIGEST_LIMIT, ReplyRequest, generate_reply, journal_digest};
use solace_core::provider::{Provider, ProviderError};
use solace_core::tts::{Synthesis, synthesize_speech};
use solace_core::{audio, transcribe};
use solace_db::journal::journal_entry::query::Query;
use solace_db::sea_orm::DbErr;
use solace_model::call::{CallReply, ProcessResponse};
use solace_model::chat::ChatRequest;
use std::sync::Arc;
use thiserror::Error;

/// Uploads below this byte count cannot hold audible speech.
const MIN_RECORDING_BYTES: usize = 100;
/// Journal entries woven into the call persona prompt.
const CONTEXT_ENTRIES: u64 = 3;

const CALL_TEMPERATURE: f32 = 0.7;
const CALL_MAX_TOKENS: u32 = 500;

#[derive(Error, Debug)]
pub(crate) enum CallError {
    #[error("Database error.")]
    Db(#[from] DbErr),

    #[error("Invalid multipart payload")]
    Multipart(#[from] MultipartError),

    #[error("Missing required field: audio")]
    MissingAudio,

    #[error("Recording too short to contain speech")]
    TinyRecording,

    #[error("No speech detected in the recording")]
    NoSpeech,

    #[error("Transcription is currently unavailable")]
    TranscriptionUnavailable,

    #[error("The assistant is currently unavailable")]
    Provider(#[from] ProviderError),
}

impl IntoResponse for CallError {
    fn into_response(self) -> Response {
        match self {
            Self::Multipart(_) | Self::MissingAudio | Self::TinyRecording | Self::NoSpeech => {
                (StatusCode::BAD_REQUEST, self.to_string()).into_response()
            }
            Self::TranscriptionUnavailable | Self::Provider(_) => {
                (StatusCode::BAD_GATEWAY, self.to_string()).into_response()
            }
            Self::Db(_) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        }
    }
}

pub(crate) fn create_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/process", post(process_recording))
        .route("/response", post(call_response))
        .with_state(())
}

#[utoipa::path(
    post,
    path = "/api/call/process",
    responses(
        (status = OK, description = "Transcript of the recorded turn", body = ProcessResponse),
        (status = BAD_REQUEST, description = "Tiny recording or no speech"),
        (status = BAD_GATEWAY, description = "Every transcription attempt failed"),
    ),
    tag = "call",
    security(("token" = []))
)]
pub(crate) async fn process_recording(
    ExtractUserId(_user): ExtractUserId,
    Extension(config): Extension<AppConfig>,
    Extension(provider): Extension<Arc<dyn Provider>>,
    mut multipart: Multipart,
) -> Result<Json<ProcessResponse>, CallError> {
    let mut audio: Option<(Vec<u8>, String, String)> = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some("audio") {
            let filename = field.file_name().unwrap_or("turn.webm").to_owned();
            let mime_type = field.content_type().unwrap_or("audio/webm").to_owned();
            let bytes = field.bytes().await?;
            audio = Some((bytes.to_vec(), filename, mime_type));
        }
    }
    let (bytes, filename, mime_type) = audio.ok_or(CallError::MissingAudio)?;
    if bytes.len() < MIN_RECORDING_BYTES {
        return Err(CallError::TinyRecording);
    }

    let prepared = audio::compress_for_transcription(&bytes).await;
    let transcription =
        transcribe::transcribe(provider.as_ref(), config.call_policy(), &prepared, &filename, &mime_type).await;
    if transcription.is_unavailable() {
        return Err(CallError::TranscriptionUnavailable);
    }

    let transcript = transcription.into_text().trim().to_owned();
    if transcript.chars().count() < 2 {
        return Err(CallError::NoSpeech);
    }
    Ok(Json(ProcessResponse { transcript }))
}

#[utoipa::path(
    post,
    path = "/api/call/response",
    request_body = ChatRequest,
    responses(
        (status = OK, description = "Spoken reply for the turn", body = CallReply),
        (status = BAD_GATEWAY, description = "Assistant unavailable"),
    ),
    tag = "call",
    security(("token" = []))
)]
pub(crate) async fn call_response(
    ExtractUserId(user): ExtractUserId,
    Extension(conn): Extension<DatabaseConnection>,
    Extension(config): Extension<AppConfig>,
    Extension(provider): Extension<Arc<dyn Provider>>,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<CallReply>, CallError> {
    let texts = Query::get_recent_texts(&conn, user, CONTEXT_ENTRIES).await?;
    let context = journal_digest(&texts, DIGEST_LIMIT);

    let reply = generate_reply(
        provider.as_ref(),
        ReplyRequest::builder()
            .model(config.chat_model())
            .persona(CALL_PERSONA)
            .context(context)
            .history(&payload.history)
            .message(&payload.message)
            .temperature(Some(CALL_TEMPERATURE))
            .max_tokens(Some(CALL_MAX_TOKENS))
            .build(),
    )
    .await?;

    // Synthesis failure downgrades to browser TTS instead of failing the turn.
    let (audio, use_browser_tts) =
        match synthesize_speech(provider.as_ref(), config.tts_model(), config.tts_voice(), &reply).await {
            Synthesis::Audio(bytes) => (Some(STANDARD.encode(bytes)), false),
            Synthesis::Unavailable => (None, true),
        };

    Ok(Json(CallReply {
        reply,
        audio,
        use_browser_tts,
    }))
}
