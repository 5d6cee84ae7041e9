use actix_web::{error::JsonPayloadError, web, HttpRequest};

use crate::api;
use crate::middleware::AuthMiddleware;
use crate::utils::AppError;

/// Malformed JSON bodies answer with the same `{success:false,error}` shape as every other error.
fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    log::warn!("⚠️  {} {} invalid body: {}", req.method(), req.path(), err);
    AppError::Validation(format!("Invalid request body: {}", err)).into()
}

/// Registers every route. Shared by `main` and the handler tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        // Health check
        .route("/health", web::get().to(api::health::health_check))
        // Metrics
        .route("/metrics", web::get().to(api::metrics::get_metrics))
        // Auth endpoints
        .service(
            web::scope("/api/v1/auth")
                .route("/register", web::post().to(api::auth::register))
                .route("/login", web::post().to(api::auth::login)),
        )
        // Session cookie
        .service(
            web::resource("/api/auth/session")
                .route(web::post().to(api::session::create_session))
                .route(web::get().to(api::session::get_session))
                .route(web::delete().to(api::session::delete_session)),
        )
        // ==================== PROTECTED (session cookie) ====================
        .service(
            web::scope("/api/v1")
                .wrap(AuthMiddleware)
                .route(
                    "/influencers/search",
                    web::post().to(api::influencers::search_influencers),
                )
                .route("/suggestions", web::post().to(api::suggestions::get_suggestions))
                .route("/cities", web::get().to(api::cities::list_cities))
                .route(
                    "/cities/{name}/influencers",
                    web::get().to(api::cities::list_city_influencers),
                )
                .route(
                    "/cities/{name}/influencers/export",
                    web::get().to(api::cities::export_city_influencers),
                )
                // Admin
                .route("/admin/users", web::get().to(api::admin::list_users))
                .route(
                    "/admin/users/{id}/role",
                    web::patch().to(api::admin::update_user_role),
                )
                .route("/admin/cities", web::post().to(api::admin::create_city))
                .route("/admin/cities/{id}", web::delete().to(api::admin::delete_city)),
        );
}
