use actix_web::{web, HttpResponse};

use crate::app_state::AppState;
use crate::models::{SearchSuggestions, SuggestionRequest};

#[utoipa::path(
    post,
    path = "/api/v1/suggestions",
    tag = "Influencers",
    request_body = SuggestionRequest,
    responses(
        (status = 200, description = "Suggestions, or null when none are available", body = SearchSuggestions)
    ),
    security(("session_cookie" = []))
)]
pub async fn get_suggestions(
    state: web::Data<AppState>,
    request: web::Json<SuggestionRequest>,
) -> HttpResponse {
    state.metrics.record_suggestion();
    let suggestions = state.suggestions.get_suggestions(&request.search_term).await;
    HttpResponse::Ok().json(suggestions)
}
