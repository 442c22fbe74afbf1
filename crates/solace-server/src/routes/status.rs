use crate::AppConfig;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Extension, Json, Router};
use http::StatusCode;
use sea_orm::DatabaseConnection;
use serde_json::json;
use solace_core::status::get_db_status;
use solace_model::status::ComponentStatus;
use tracing::instrument;
use utoipa::ToSchema;

pub(crate) fn create_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route("/", get(get_status)).with_state(())
}

#[derive(Debug, Clone, ToSchema)]
struct Status {
    database: ComponentStatus,
    provider: ComponentStatus,
}

impl Status {
    fn status_code(&self) -> StatusCode {
        if self.database.is_ok() && self.provider.is_ok() {
            StatusCode::OK
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl From<Status> for solace_model::status::Status {
    fn from(val: Status) -> Self {
        solace_model::status::Status {
            database: val.database.into_message(),
            provider: val.provider.into_message(),
        }
    }
}

impl IntoResponse for Status {
    fn into_response(self) -> Response {
        let status_code = self.status_code();
        let status: solace_model::status::Status = self.into();
        (status_code, Json(status)).into_response()
    }
}

#[utoipa::path(
    get,
    path = "/api/status",
    responses(
        (status = OK, description = "Server is ok", body = Status, example = json!( solace_model::status::Status { database: json!("ok"), provider: json!("ok") } )),
    ),
    tag = "util"
)]
#[instrument(skip_all)]
pub(crate) async fn get_status(
    Extension(conn): Extension<DatabaseConnection>,
    Extension(app_config): Extension<AppConfig>,
) -> impl IntoResponse {
    let provider = if app_config.provider_configured() {
        ComponentStatus::ok()
    } else {
        ComponentStatus::from_error_text("no api key configured")
    };

    Status {
        database: get_db_status(&conn, None).await,
        provider,
    }
}
