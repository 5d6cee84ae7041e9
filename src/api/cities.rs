use actix_web::{http::header, web, HttpResponse};

use crate::app_state::AppState;
use crate::models::{City, Influencer};
use crate::services::city_service::{self, InfluencerListQuery};
use crate::services::export_service;
use crate::utils::AppResult;

#[utoipa::path(
    get,
    path = "/api/v1/cities",
    tag = "Cities",
    responses(
        (status = 200, description = "Cities ordered by name", body = Vec<City>)
    ),
    security(("session_cookie" = []))
)]
pub async fn list_cities(state: web::Data<AppState>) -> HttpResponse {
    let cities = city_service::get_all_cities(state.influencers.as_ref()).await;
    HttpResponse::Ok().json(cities)
}

#[utoipa::path(
    get,
    path = "/api/v1/cities/{name}/influencers",
    tag = "Cities",
    params(
        ("name" = String, Path, description = "City name (case-insensitive)"),
        InfluencerListQuery
    ),
    responses(
        (status = 200, description = "Cached influencers for the city", body = Vec<Influencer>)
    ),
    security(("session_cookie" = []))
)]
pub async fn list_city_influencers(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<InfluencerListQuery>,
) -> HttpResponse {
    let city = path.into_inner();
    let influencers =
        city_service::get_influencers_by_city(state.influencers.as_ref(), &city, &query).await;
    HttpResponse::Ok().json(influencers)
}

#[utoipa::path(
    get,
    path = "/api/v1/cities/{name}/influencers/export",
    tag = "Cities",
    params(
        ("name" = String, Path, description = "City name (case-insensitive)"),
        InfluencerListQuery
    ),
    responses(
        (status = 200, description = "CSV attachment", body = String, content_type = "text/csv"),
        (status = 204, description = "Nothing to export")
    ),
    security(("session_cookie" = []))
)]
pub async fn export_city_influencers(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<InfluencerListQuery>,
) -> AppResult<HttpResponse> {
    let city = path.into_inner();
    let influencers =
        city_service::get_influencers_by_city(state.influencers.as_ref(), &city, &query).await;

    let Some(csv) = export_service::influencers_to_csv(&influencers)? else {
        log::info!("📭 Nothing to export for {}", city);
        return Ok(HttpResponse::NoContent().finish());
    };

    log::info!("📤 Exported {} influencers for {}", influencers.len(), city);
    Ok(HttpResponse::Ok()
        .content_type(export_service::CSV_CONTENT_TYPE)
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!(
                "attachment; filename=\"{}\"",
                export_service::export_filename(&city)
            ),
        ))
        .body(csv))
}
