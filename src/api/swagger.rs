use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "InfluenceFinder API",
        version = "1.0.0",
        description = "Local influencer discovery.\n\n**Authentication:** sign in at `/api/v1/auth/login` to get an identity token, exchange it at `POST /api/auth/session` for the HTTP-only `session` cookie. Every `/api/v1` route except auth requires that cookie.\n\n**Features:**\n- Live search against the discovery API, cached per city\n- Cached listings with sorting and CSV export\n- AI keyword/category suggestions\n- Admin management of users and cities"
    ),
    paths(
        // Auth & Session
        crate::api::auth::register,
        crate::api::auth::login,
        crate::api::session::create_session,
        crate::api::session::get_session,
        crate::api::session::delete_session,

        // Health & Metrics
        crate::api::health::health_check,
        crate::api::metrics::get_metrics,

        // Influencers
        crate::api::influencers::search_influencers,
        crate::api::suggestions::get_suggestions,

        // Cities
        crate::api::cities::list_cities,
        crate::api::cities::list_city_influencers,
        crate::api::cities::export_city_influencers,

        // Admin
        crate::api::admin::list_users,
        crate::api::admin::update_user_role,
        crate::api::admin::create_city,
        crate::api::admin::delete_city,
    ),
    components(
        schemas(
            crate::services::auth_service::RegisterRequest,
            crate::services::auth_service::LoginRequest,
            crate::services::auth_service::AuthResponse,
            crate::api::session::SessionRequest,
            crate::api::session::SessionResponse,
            crate::api::health::HealthResponse,
            crate::models::Influencer,
            crate::models::Connector,
            crate::models::ConnectorFilter,
            crate::models::SearchParams,
            crate::models::SearchResponse,
            crate::models::SuggestionRequest,
            crate::models::SearchSuggestions,
            crate::models::City,
            crate::models::CreateCityRequest,
            crate::models::UserProfile,
            crate::models::Role,
            crate::models::UpdateRoleRequest,
        )
    ),
    tags(
        (name = "Auth", description = "Email/password sign-up and sign-in issuing short-lived identity tokens."),
        (name = "Session", description = "Identity token to session cookie exchange, session lookup and sign-out."),
        (name = "Health", description = "Health check and Prometheus metrics."),
        (name = "Influencers", description = "Live search and search-term suggestions."),
        (name = "Cities", description = "Cached influencers per city, sorting and CSV export."),
        (name = "Admin", description = "User roles and city management. Admin role required."),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "session_cookie",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                    "session",
                    "HTTP-only session cookie set by POST /api/auth/session",
                ))),
            );
        }
    }
}
