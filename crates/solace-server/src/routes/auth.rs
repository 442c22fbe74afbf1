use crate::AppConfig;
use crate::auth::{AuthError, hash_password, issue_token, verify_password};
use crate::user::{ExtractUser, ExtractUserId, TOKEN_COOKIE};
use axum::extract::multipart::MultipartError;
use axum::extract::{Extension, Multipart};
use axum::response::{IntoResponse, Response};
use axum::routing::{Router, get, post, put};
use axum::Json;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use http::StatusCode;
use sea_orm::DatabaseConnection;
use solace_db::sea_orm::DbErr;
use solace_db::user::mutation::Mutation;
use solace_db::user::query::Query;
use solace_model::login::Token;
use solace_model::user::{Login, Register, User};
use thiserror::Error;

/// Profile image ceiling.
const MAX_PROFILE_IMAGE: usize = 5 * 1024 * 1024;

#[derive(Error, Debug)]
pub(crate) enum AuthRouteError {
    #[error("Database error.")]
    Db(#[from] DbErr),

    #[error("Authentication error.")]
    Auth(#[from] AuthError),

    #[error("{0} is already taken")]
    Taken(&'static str),

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid multipart payload")]
    Multipart(#[from] MultipartError),

    #[error("{0} exceeds the size limit")]
    TooLarge(&'static str),

    #[error("{0} must be an image")]
    NotAnImage(&'static str),
}

impl IntoResponse for AuthRouteError {
    fn into_response(self) -> Response {
        match self {
            Self::Taken(_) | Self::MissingField(_) | Self::Multipart(_) | Self::NotAnImage(_) => {
                (StatusCode::BAD_REQUEST, self.to_string()).into_response()
            }
            Self::InvalidCredentials => (StatusCode::UNAUTHORIZED, self.to_string()).into_response(),
            Self::TooLarge(_) => (StatusCode::PAYLOAD_TOO_LARGE, self.to_string()).into_response(),
            Self::Db(_) | Self::Auth(_) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        }
    }
}

pub(crate) fn create_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", get(logout))
        .route("/me", get(me))
        .route("/profile", put(update_profile))
        .with_state(())
}

fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((TOKEN_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = Register,
    responses(
        (status = CREATED, description = "Account created", body = Token),
        (status = BAD_REQUEST, description = "Missing field or name/email taken"),
    ),
    tag = "auth"
)]
pub(crate) async fn register(
    Extension(conn): Extension<DatabaseConnection>,
    Extension(config): Extension<AppConfig>,
    jar: CookieJar,
    Json(payload): Json<Register>,
) -> Result<impl IntoResponse, AuthRouteError> {
    if payload.username.trim().is_empty() {
        return Err(AuthRouteError::MissingField("username"));
    }
    if payload.email.trim().is_empty() {
        return Err(AuthRouteError::MissingField("email"));
    }
    if payload.password.is_empty() {
        return Err(AuthRouteError::MissingField("password"));
    }

    if Query::find_user_by_email(&conn, &payload.email).await?.is_some() {
        return Err(AuthRouteError::Taken("email"));
    }
    if Query::find_user_by_username(&conn, &payload.username).await?.is_some() {
        return Err(AuthRouteError::Taken("username"));
    }

    let password_hash = hash_password(&payload.password)?;
    let user = Mutation::create_user(&conn, payload.username, payload.email, password_hash).await?;

    let access_token = issue_token(config.jwt_secret(), user.id, config.token_ttl_secs())?;
    let jar = jar.add(session_cookie(access_token.clone()));
    Ok((
        StatusCode::CREATED,
        jar,
        Json(Token {
            access_token,
            user: user.into(),
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = Login,
    responses(
        (status = OK, description = "Logged in", body = Token),
        (status = UNAUTHORIZED, description = "Invalid email or password"),
    ),
    tag = "auth"
)]
pub(crate) async fn login(
    Extension(conn): Extension<DatabaseConnection>,
    Extension(config): Extension<AppConfig>,
    jar: CookieJar,
    Json(payload): Json<Login>,
) -> Result<impl IntoResponse, AuthRouteError> {
    let user = Query::find_user_by_email(&conn, &payload.email)
        .await?
        .ok_or(AuthRouteError::InvalidCredentials)?;
    if !verify_password(&payload.password, &user.password_hash)? {
        return Err(AuthRouteError::InvalidCredentials);
    }

    let access_token = issue_token(config.jwt_secret(), user.id, config.token_ttl_secs())?;
    let jar = jar.add(session_cookie(access_token.clone()));
    Ok((
        jar,
        Json(Token {
            access_token,
            user: user.into(),
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/api/auth/logout",
    responses(
        (status = NO_CONTENT, description = "Session cookie cleared"),
    ),
    tag = "auth"
)]
pub(crate) async fn logout(jar: CookieJar) -> impl IntoResponse {
    let jar = jar.remove(Cookie::build(TOKEN_COOKIE).path("/").build());
    (jar, StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = OK, description = "Current user", body = User),
        (status = UNAUTHORIZED, description = "Not authenticated"),
    ),
    tag = "auth",
    security(("token" = []))
)]
pub(crate) async fn me(ExtractUser(user): ExtractUser) -> Json<User> {
    Json(user)
}

#[utoipa::path(
    put,
    path = "/api/auth/profile",
    responses(
        (status = OK, description = "Updated user", body = User),
        (status = BAD_REQUEST, description = "Invalid payload"),
        (status = UNAUTHORIZED, description = "Not authenticated"),
    ),
    tag = "auth",
    security(("token" = []))
)]
pub(crate) async fn update_profile(
    ExtractUserId(user_id): ExtractUserId,
    Extension(conn): Extension<DatabaseConnection>,
    mut multipart: Multipart,
) -> Result<Json<User>, AuthRouteError> {
    let mut username: Option<String> = None;
    let mut avatar: Option<(Vec<u8>, String)> = None;

    while let Some(field) = multipart.next_field().await? {
        match field.name() {
            Some("username") => {
                let value = field.text().await?;
                if value.trim().is_empty() {
                    return Err(AuthRouteError::MissingField("username"));
                }
                username = Some(value);
            }
            Some("avatar") => {
                let mime_type = field
                    .content_type()
                    .ok_or(AuthRouteError::NotAnImage("avatar"))?
                    .to_owned();
                if !mime_type.starts_with("image/") {
                    return Err(AuthRouteError::NotAnImage("avatar"));
                }
                let bytes = field.bytes().await?;
                if bytes.len() > MAX_PROFILE_IMAGE {
                    return Err(AuthRouteError::TooLarge("avatar"));
                }
                avatar = Some((bytes.to_vec(), mime_type));
            }
            _ => {}
        }
    }

    let mut user = None;
    if let Some(username) = username {
        let taken = Query::find_user_by_username(&conn, &username)
            .await?
            .is_some_and(|existing| existing.id != user_id);
        if taken {
            return Err(AuthRouteError::Taken("username"));
        }
        user = Some(Mutation::update_username(&conn, user_id, username).await?);
    }
    if let Some((image, mime_type)) = avatar {
        user = Some(Mutation::update_profile_image(&conn, user_id, image, mime_type).await?);
    }

    let user = match user {
        Some(user) => user,
        None => Query::find_user_by_id(&conn, user_id)
            .await?
            .ok_or(DbErr::RecordNotFound("user".to_owned()))?,
    };
    Ok(Json(user.into()))
}
