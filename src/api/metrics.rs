use actix_web::{web, HttpResponse};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::app_state::AppState;

/// Counters for outbound searches and suggestions.
#[derive(Debug, Default)]
pub struct Metrics {
    searches_total: AtomicU64,
    search_errors_total: AtomicU64,
    suggestions_total: AtomicU64,
}

impl Metrics {
    pub fn record_search(&self, ok: bool) {
        self.searches_total.fetch_add(1, Ordering::Relaxed);
        if !ok {
            self.search_errors_total.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_suggestion(&self) {
        self.suggestions_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn render(&self) -> String {
        format!(
            "# HELP influencer_searches_total Total number of live influencer searches\n\
             # TYPE influencer_searches_total counter\n\
             influencer_searches_total {}\n\
             \n\
             # HELP influencer_search_errors_total Live searches that ended in an error\n\
             # TYPE influencer_search_errors_total counter\n\
             influencer_search_errors_total {}\n\
             \n\
             # HELP search_suggestions_total Total number of suggestion requests\n\
             # TYPE search_suggestions_total counter\n\
             search_suggestions_total {}\n",
            self.searches_total.load(Ordering::Relaxed),
            self.search_errors_total.load(Ordering::Relaxed),
            self.suggestions_total.load(Ordering::Relaxed),
        )
    }
}

#[utoipa::path(
    get,
    path = "/metrics",
    tag = "Health",
    responses(
        (status = 200, description = "Prometheus metrics", body = String, content_type = "text/plain")
    )
)]
pub async fn get_metrics(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4")
        .body(state.metrics.render())
}
