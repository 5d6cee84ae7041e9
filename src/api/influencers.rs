use actix_web::{web, HttpResponse};

use crate::app_state::AppState;
use crate::models::{SearchParams, SearchResponse};
use crate::services::search_service;
use crate::utils::AppResult;

#[utoipa::path(
    post,
    path = "/api/v1/influencers/search",
    tag = "Influencers",
    request_body = SearchParams,
    responses(
        (status = 200, description = "Influencers saved under the city, followers descending", body = SearchResponse),
        (status = 400, description = "City missing"),
        (status = 500, description = "API key not configured or database failure"),
        (status = 502, description = "Discovery API returned an error"),
        (status = 503, description = "Discovery API unreachable")
    ),
    security(("session_cookie" = []))
)]
pub async fn search_influencers(
    state: web::Data<AppState>,
    params: web::Json<SearchParams>,
) -> AppResult<HttpResponse> {
    let result = search_service::search_influencers(
        &state.discovery,
        state.influencers.as_ref(),
        &params,
    )
    .await;
    state.metrics.record_search(result.is_ok());

    Ok(HttpResponse::Ok().json(SearchResponse { data: result? }))
}
