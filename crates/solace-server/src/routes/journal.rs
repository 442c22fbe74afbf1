use crate::AppConfig;
use crate::user::ExtractUserId;
use axum::Json;
use axum::extract::multipart::MultipartError;
use axum::extract::{Extension, Multipart, Path};
use axum::response::{IntoResponse, Response};
use axum::routing::{Router, get};
use http::{StatusCode, header};
use sea_orm::DatabaseConnection;
use solace_core::journal::{AudioInput, ImageInput, analyze_entry};
use solace_core::provider::Provider;
use solace_db::journal::journal_entry::mutation::{AnalysisUpdate, Mutation};
use solace_db::journal::journal_entry::query::Query;
use solace_db::journal::journal_media::mutation::NewMedia;
use solace_db::journal::journal_media::query::Query as MediaQuery;
use solace_db::sea_orm::DbErr;
use solace_entity::journal::journal_media::MediaKind;
use solace_model::journal::JournalEntry;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

/// Per-file ceiling for journal attachments.
const MAX_MEDIA_BYTES: usize = 10 * 1024 * 1024;
const MAX_IMAGES: usize = 5;

#[derive(Error, Debug)]
pub(crate) enum JournalError {
    #[error("Database error.")]
    Db(#[from] DbErr),

    #[error("Invalid multipart payload")]
    Multipart(#[from] MultipartError),

    #[error("Missing required field: textEntry")]
    MissingText,

    #[error("At most {MAX_IMAGES} images per entry")]
    TooManyImages,

    #[error("{0} exceeds the size limit")]
    TooLarge(&'static str),

    #[error("Journal entry could not be found")]
    NotFound,

    #[error("This journal entry belongs to another user")]
    Forbidden,

    #[error("Unknown media type")]
    UnknownMediaKind,
}

impl IntoResponse for JournalError {
    fn into_response(self) -> Response {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND.into_response(),
            Self::Forbidden => (StatusCode::FORBIDDEN, self.to_string()).into_response(),
            Self::MissingText | Self::TooManyImages | Self::Multipart(_) | Self::UnknownMediaKind => {
                (StatusCode::BAD_REQUEST, self.to_string()).into_response()
            }
            Self::TooLarge(_) => (StatusCode::PAYLOAD_TOO_LARGE, self.to_string()).into_response(),
            Self::Db(_) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        }
    }
}

pub(crate) fn create_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(list_journal_entries).post(create_journal_entry))
        .route("/{journal_entry}", get(get_journal_entry))
        .route("/{journal_entry}/media/{kind}", get(get_first_journal_media))
        .route("/{journal_entry}/media/{kind}/{index}", get(get_journal_media))
        .with_state(())
}

#[utoipa::path(
    get,
    path = "/api/journals",
    responses(
        (status = OK, description = "List journal entries, newest first", body = [JournalEntry]),
    ),
    tag = "journal",
    security(("token" = []))
)]
pub(crate) async fn list_journal_entries(
    ExtractUserId(user): ExtractUserId,
    Extension(conn): Extension<DatabaseConnection>,
) -> Result<Json<Vec<JournalEntry>>, JournalError> {
    let entries = Query::get_user_journal_entries(&conn, user).await?;
    Ok(Json(entries.into_iter().map(JournalEntry::from).collect()))
}

#[utoipa::path(
    post,
    path = "/api/journals",
    responses(
        (status = CREATED, description = "Created and analyzed journal entry", body = JournalEntry),
        (status = BAD_REQUEST, description = "Missing text or too many images"),
    ),
    tag = "journal",
    security(("token" = []))
)]
pub(crate) async fn create_journal_entry(
    ExtractUserId(user): ExtractUserId,
    Extension(conn): Extension<DatabaseConnection>,
    Extension(config): Extension<AppConfig>,
    Extension(provider): Extension<Arc<dyn Provider>>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, JournalError> {
    let mut text: Option<String> = None;
    let mut images: Vec<NewMedia> = Vec::new();
    let mut audio: Option<NewMedia> = None;

    while let Some(field) = multipart.next_field().await? {
        match field.name() {
            Some("textEntry") => {
                text = Some(field.text().await?);
            }
            Some("images") => {
                if images.len() == MAX_IMAGES {
                    return Err(JournalError::TooManyImages);
                }
                let filename = field.file_name().map(str::to_owned);
                let mime_type = field.content_type().unwrap_or("application/octet-stream").to_owned();
                let bytes = field.bytes().await?;
                if bytes.len() > MAX_MEDIA_BYTES {
                    return Err(JournalError::TooLarge("image"));
                }
                images.push(NewMedia {
                    kind: MediaKind::Image,
                    position: images.len() as i32,
                    filename,
                    mime_type,
                    bytes: bytes.to_vec(),
                });
            }
            Some("audio") => {
                let filename = field.file_name().map(str::to_owned);
                let mime_type = field.content_type().unwrap_or("audio/webm").to_owned();
                let bytes = field.bytes().await?;
                if bytes.len() > MAX_MEDIA_BYTES {
                    return Err(JournalError::TooLarge("audio"));
                }
                audio = Some(NewMedia {
                    kind: MediaKind::Audio,
                    position: 0,
                    filename,
                    mime_type,
                    bytes: bytes.to_vec(),
                });
            }
            _ => {}
        }
    }

    let text = text.filter(|text| !text.trim().is_empty()).ok_or(JournalError::MissingText)?;

    let audio_input = audio.as_ref().map(|media| AudioInput {
        bytes: media.bytes.clone(),
        filename: media.filename.clone().unwrap_or_else(|| "recording.webm".to_owned()),
        mime_type: media.mime_type.clone(),
    });
    let image_input = images.first().map(|media| ImageInput {
        bytes: media.bytes.clone(),
        mime_type: media.mime_type.clone(),
    });

    let mut media = images;
    if let Some(audio) = audio {
        media.push(audio);
    }

    // Phase one: the raw entry is durable before any analyzer runs.
    let (entry, _) = Mutation::create_journal_entry(&conn, user, text.clone(), media).await?;

    let analysis = analyze_entry(provider.as_ref(), config.analyzer(), &text, audio_input, image_input).await;

    let update = AnalysisUpdate {
        text_mood: analysis.text.as_ref().map(|text| text.mood.clone()),
        text_anxiety: analysis.text.as_ref().map(|text| text.anxiety_score),
        audio_transcription: analysis.audio.as_ref().map(|audio| audio.transcription.clone()),
        audio_mood: analysis
            .audio
            .as_ref()
            .and_then(|audio| audio.sentiment.as_ref())
            .map(|sentiment| sentiment.mood.clone()),
        audio_anxiety: analysis
            .audio
            .as_ref()
            .and_then(|audio| audio.sentiment.as_ref())
            .map(|sentiment| sentiment.anxiety_score),
        vision_objects: analysis
            .vision
            .as_ref()
            .map(|vision| serde_json::json!(vision.detected_objects)),
        vision_impact: analysis.vision.as_ref().map(|vision| vision.emotional_impact.clone()),
    };
    Mutation::attach_analysis(&conn, entry.id, update).await?;

    let entry = Query::get_user_journal_entry(&conn, user, entry.id)
        .await?
        .ok_or(JournalError::NotFound)?;
    Ok((StatusCode::CREATED, Json(JournalEntry::from(entry))))
}

#[utoipa::path(
    get,
    path = "/api/journals/{journal_entry}",
    params(("journal_entry" = Uuid, Path, description = "Journal entry id")),
    responses(
        (status = OK, description = "Journal entry", body = JournalEntry),
        (status = FORBIDDEN, description = "Entry belongs to another user"),
        (status = NOT_FOUND, description = "No such entry"),
    ),
    tag = "journal",
    security(("token" = []))
)]
pub(crate) async fn get_journal_entry(
    ExtractUserId(user): ExtractUserId,
    Extension(conn): Extension<DatabaseConnection>,
    Path(journal_entry): Path<Uuid>,
) -> Result<Json<JournalEntry>, JournalError> {
    check_ownership(&conn, user, journal_entry).await?;
    let entry = Query::get_user_journal_entry(&conn, user, journal_entry)
        .await?
        .ok_or(JournalError::NotFound)?;
    Ok(Json(JournalEntry::from(entry)))
}

#[utoipa::path(
    get,
    path = "/api/journals/{journal_entry}/media/{kind}/{index}",
    params(
        ("journal_entry" = Uuid, Path, description = "Journal entry id"),
        ("kind" = String, Path, description = "image or audio"),
        ("index" = i32, Path, description = "Zero-based position"),
    ),
    responses(
        (status = OK, description = "Raw media bytes with the stored content type"),
        (status = NOT_FOUND, description = "No such attachment"),
    ),
    tag = "journal",
    security(("token" = []))
)]
pub(crate) async fn get_journal_media(
    ExtractUserId(user): ExtractUserId,
    Extension(conn): Extension<DatabaseConnection>,
    Path((journal_entry, kind, index)): Path<(Uuid, String, i32)>,
) -> Result<Response, JournalError> {
    serve_media(&conn, user, journal_entry, &kind, index).await
}

#[utoipa::path(
    get,
    path = "/api/journals/{journal_entry}/media/{kind}",
    params(
        ("journal_entry" = Uuid, Path, description = "Journal entry id"),
        ("kind" = String, Path, description = "image or audio"),
    ),
    responses(
        (status = OK, description = "First attachment of that kind"),
        (status = NOT_FOUND, description = "No such attachment"),
    ),
    tag = "journal",
    security(("token" = []))
)]
pub(crate) async fn get_first_journal_media(
    ExtractUserId(user): ExtractUserId,
    Extension(conn): Extension<DatabaseConnection>,
    Path((journal_entry, kind)): Path<(Uuid, String)>,
) -> Result<Response, JournalError> {
    serve_media(&conn, user, journal_entry, &kind, 0).await
}

async fn serve_media(
    conn: &DatabaseConnection,
    user: Uuid,
    journal_entry: Uuid,
    kind: &str,
    index: i32,
) -> Result<Response, JournalError> {
    let kind = match kind {
        "image" => MediaKind::Image,
        "audio" => MediaKind::Audio,
        _ => return Err(JournalError::UnknownMediaKind),
    };
    check_ownership(conn, user, journal_entry).await?;

    let media = MediaQuery::get_entry_media(conn, journal_entry, kind, index)
        .await?
        .ok_or(JournalError::NotFound)?;
    Ok(([(header::CONTENT_TYPE, media.mime_type)], media.bytes).into_response())
}

/// 404 for a missing entry, 403 for someone else's entry.
async fn check_ownership(conn: &DatabaseConnection, user: Uuid, journal_entry: Uuid) -> Result<(), JournalError> {
    let entry = Query::get_journal_entry(conn, journal_entry)
        .await?
        .ok_or(JournalError::NotFound)?;
    if entry.user_id != user {
        return Err(JournalError::Forbidden);
    }
    Ok(())
}
