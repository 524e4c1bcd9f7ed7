use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(crate::api::config_reflector::get_all_config),
    components(
        schemas(axum_helpers::ErrorResponse)
    ),
    info(
        title = "Outlay API",
        version = "0.1.0",
        description = "User management and outbound event forwarding"
    ),
    servers(
        (url = "/api", description = "API base path")
    ),
    nest(
        (path = domain_users::entity::Model::URL, api = domain_users::ApiDoc),
    ),
    tags(
        (name = crate::api::config_reflector::TAG, description = "Configuration diagnostics")
    )
)]
struct BaseApiDoc;

/// Combined document served at `/api-docs/openapi.json`.
///
/// The events paths are already absolute, so that document is merged rather
/// than nested.
pub struct ApiDoc;

impl OpenApi for ApiDoc {
    fn openapi() -> utoipa::openapi::OpenApi {
        let mut doc = BaseApiDoc::openapi();
        doc.merge(domain_events::ApiDoc::openapi());
        doc
    }
}
