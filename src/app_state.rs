use std::sync::Arc;

use crate::api::metrics::Metrics;
use crate::config::AuthConfig;
use crate::database::{InfluencerStore, UserStore};
use crate::services::auth_service::JwtKeys;
use crate::services::{DiscoveryClient, SuggestionClient};

/// Everything a handler needs, built once in `main` and shared via `web::Data`.
#[derive(Clone)]
pub struct AppState {
    pub influencers: Arc<dyn InfluencerStore>,
    pub users: Arc<dyn UserStore>,
    pub discovery: DiscoveryClient,
    pub suggestions: SuggestionClient,
    pub keys: JwtKeys,
    pub auth: AuthConfig,
    pub metrics: Arc<Metrics>,
}
