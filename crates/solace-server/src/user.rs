use crate::AppConfig;
use crate::auth::validate_token;
use axum::extract::FromRequestParts;
use axum::{Extension, RequestPartsExt};
use axum_auth::AuthBearer;
use axum_extra::extract::Cached;
use axum_extra::extract::cookie::CookieJar;
use http::StatusCode;
use http::request::Parts;
use sea_orm::DatabaseConnection;
use solace_db::user::query::Query;
use solace_model::user::User;
use std::error::Error;
use uuid::Uuid;

pub(crate) const TOKEN_COOKIE: &str = "token";

type Rejection = (StatusCode, &'static str);

const UNAUTHORIZED: Rejection = (StatusCode::UNAUTHORIZED, "Authentication required");

#[derive(Clone)]
pub(crate) struct Session {
    user: User,
}

#[derive(Clone)]
pub(crate) struct ExtractUser(pub User);

#[derive(Clone)]
pub(crate) struct ExtractUserId(pub Uuid);

impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = Rejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Bearer header first, the session cookie second. Every failure
        // mode answers the same 401 so nothing leaks about accounts.
        let token = if let Ok(AuthBearer(token)) = parts.extract::<AuthBearer>().await {
            token
        } else {
            let Ok(jar) = parts.extract::<CookieJar>().await;
            match jar.get(TOKEN_COOKIE) {
                Some(cookie) => cookie.value().to_owned(),
                None => return Err(UNAUTHORIZED),
            }
        };

        let Extension::<AppConfig>(config) = parts.extract::<Extension<AppConfig>>().await.map_err(|error| {
            tracing::error!(error = &error as &dyn Error, "app config not found in app data");
            (StatusCode::INTERNAL_SERVER_ERROR, "Server misconfigured")
        })?;
        let Extension::<DatabaseConnection>(conn) =
            parts.extract::<Extension<DatabaseConnection>>().await.map_err(|error| {
                tracing::error!(error = &error as &dyn Error, "database connection not found in app data");
                (StatusCode::INTERNAL_SERVER_ERROR, "Database connection not found")
            })?;

        let user_id = validate_token(config.jwt_secret(), &token).map_err(|_| UNAUTHORIZED)?;

        let user = Query::find_user_by_id(&conn, user_id)
            .await
            .map_err(|_| (StatusCode::INTERNAL_SERVER_ERROR, "Error loading user"))?
            .ok_or(UNAUTHORIZED)?;

        Ok(Self { user: user.into() })
    }
}

impl<S> FromRequestParts<S> for ExtractUser
where
    S: Send + Sync,
{
    type Rejection = Rejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session: Session = Cached::<Session>::from_request_parts(parts, state).await?.0;
        Ok(Self(session.user))
    }
}

impl<S> FromRequestParts<S> for ExtractUserId
where
    S: Send + Sync,
{
    type Rejection = Rejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session: Session = Cached::<Session>::from_request_parts(parts, state).await?.0;
        Ok(Self(session.user.id))
    }
}
