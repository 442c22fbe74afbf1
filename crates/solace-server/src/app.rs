use crate::{AppConfig, routes};
use axum::extract::DefaultBodyLimit;
use axum::{Extension, Router};
use http::{Method, header};
use sea_orm::DatabaseConnection;
use solace_core::provider::Provider;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

/// Generous outer body cap; the per-file ceilings live in the handlers.
const MAX_REQUEST_BYTES: usize = 64 * 1024 * 1024;

pub(crate) fn create_app(
    app_config: AppConfig,
    origins: &[String],
    conn: DatabaseConnection,
    provider: Arc<dyn Provider>,
) -> anyhow::Result<Router> {
    let cors = CorsLayer::new()
        .allow_origin(
            origins
                .iter()
                .map(|origin| origin.parse())
                .collect::<Result<Vec<_>, _>>()?,
        )
        .allow_headers([header::ACCEPT, header::CONTENT_TYPE, header::AUTHORIZATION, header::COOKIE, header::ORIGIN])
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600));

    let app = Router::new()
        .merge(routes::swagger::create_router())
        .nest(
            "/api",
            Router::new()
                .nest("/auth", routes::auth::create_router())
                .nest("/journals", routes::journal::create_router())
                .nest("/ai", routes::ai::create_router())
                .nest("/positivity-chat", routes::chat::create_router())
                .nest("/call", routes::call::create_router())
                .nest("/status", routes::status::create_router())
                .layer(cors),
        )
        .layer(
            // Router layers are called bottom to top
            // ServiceBuilder layers are called top to bottom
            ServiceBuilder::new()
                .layer(DefaultBodyLimit::max(MAX_REQUEST_BYTES))
                .layer(Extension(app_config))
                .layer(Extension(conn))
                .layer(Extension(provider)),
        )
        .with_state(());
    Ok(app)
}
