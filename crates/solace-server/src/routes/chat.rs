use crate::AppConfig;
use crate::user::ExtractUserId;
use axum::Json;
use axum::extract::Extension;
use axum::response::{IntoResponse, Response};
use axum::routing::{Router, get};
use http::StatusCode;
use sea_orm::DatabaseConnection;
use solace_core::chat::{DIGEST_LIMIT, POSITIVITY_PERSONA, ReplyRequest, SUPPORT_PERSONA, generate_reply, journal_digest};
use solace_core::provider::{Provider, ProviderError};
use solace_db::journal::journal_entry::query::Query;
use solace_db::sea_orm::DbErr;
use solace_model::chat::{ChatRequest, ChatResponse};
use std::sync::Arc;
use thiserror::Error;

/// Entries woven into the positivity opener.
const POSITIVITY_ENTRIES: u64 = 7;
/// Entries woven into an ongoing conversation turn.
const CONTEXT_ENTRIES: u64 = 3;

const POSITIVITY_OPENER: &str =
    "Please point out something positive you noticed in my recent journal entries.";

#[derive(Error, Debug)]
pub(crate) enum ChatError {
    #[error("Database error.")]
    Db(#[from] DbErr),

    #[error("The assistant is currently unavailable")]
    Provider(#[from] ProviderError),

    #[error("Missing required field: message")]
    MissingMessage,
}

impl IntoResponse for ChatError {
    fn into_response(self) -> Response {
        match self {
            Self::Db(_) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
            Self::Provider(_) => (StatusCode::BAD_GATEWAY, self.to_string()).into_response(),
            Self::MissingMessage => (StatusCode::BAD_REQUEST, self.to_string()).into_response(),
        }
    }
}

pub(crate) fn create_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(positivity_opener).post(chat_turn))
        .with_state(())
}

#[utoipa::path(
    get,
    path = "/api/positivity-chat",
    responses(
        (status = OK, description = "Positive observation grounded in recent entries", body = ChatResponse),
        (status = BAD_GATEWAY, description = "Assistant unavailable"),
    ),
    tag = "chat",
    security(("token" = []))
)]
pub(crate) async fn positivity_opener(
    ExtractUserId(user): ExtractUserId,
    Extension(conn): Extension<DatabaseConnection>,
    Extension(config): Extension<AppConfig>,
    Extension(provider): Extension<Arc<dyn Provider>>,
) -> Result<Json<ChatResponse>, ChatError> {
    let texts = Query::get_recent_texts(&conn, user, POSITIVITY_ENTRIES).await?;
    let context = journal_digest(&texts, DIGEST_LIMIT);

    let reply = generate_reply(
        provider.as_ref(),
        ReplyRequest::builder()
            .model(config.chat_model())
            .persona(POSITIVITY_PERSONA)
            .context(context)
            .message(POSITIVITY_OPENER)
            .build(),
    )
    .await?;
    Ok(Json(ChatResponse { reply }))
}

#[utoipa::path(
    post,
    path = "/api/positivity-chat",
    request_body = ChatRequest,
    responses(
        (status = OK, description = "Assistant reply", body = ChatResponse),
        (status = BAD_REQUEST, description = "Empty message"),
        (status = BAD_GATEWAY, description = "Assistant unavailable"),
    ),
    tag = "chat",
    security(("token" = []))
)]
pub(crate) async fn chat_turn(
    ExtractUserId(user): ExtractUserId,
    Extension(conn): Extension<DatabaseConnection>,
    Extension(config): Extension<AppConfig>,
    Extension(provider): Extension<Arc<dyn Provider>>,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ChatError> {
    if payload.message.trim().is_empty() {
        return Err(ChatError::MissingMessage);
    }
    let texts = Query::get_recent_texts(&conn, user, CONTEXT_ENTRIES).await?;
    let context = journal_digest(&texts, DIGEST_LIMIT);

    let reply = generate_reply(
        provider.as_ref(),
        ReplyRequest::builder()
            .model(config.chat_model())
            .persona(SUPPORT_PERSONA)
            .context(context)
            .history(&payload.history)
            .message(&payload.message)
            .build(),
    )
    .await?;
    Ok(Json(ChatResponse { reply }))
}
