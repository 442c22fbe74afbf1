use super::{ai, auth, call, chat, journal, status};

use axum::Router;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder};
use utoipa::{Modify, OpenApi, openapi::security::SecurityScheme};
use utoipa_swagger_ui::SwaggerUi;

struct SecurityAddon;

#[derive(OpenApi)]
#[openapi(
    paths(
        status::get_status,
        auth::register,
        auth::login,
        auth::logout,
        auth::me,
        auth::update_profile,
        journal::list_journal_entries,
        journal::create_journal_entry,
        journal::get_journal_entry,
        journal::get_first_journal_media,
        journal::get_journal_media,
        ai::analyze_text,
        ai::analyze_audio,
        ai::analyze_image,
        chat::positivity_opener,
        chat::chat_turn,
        call::process_recording,
        call::call_response,
    ),
    modifiers(&SecurityAddon),
    tags()
)]
struct ApiDoc;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        // we can unwrap safely, since there already are components registered.
        let components = openapi.components.as_mut().expect("components not registered");
        components.add_security_scheme(
            "token",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .description(Some("Api Token"))
                    .build(),
            ),
        );
    }
}

pub(crate) fn create_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
