use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// City whose influencers are cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct City {
    pub id: String,
    pub name: String,
    /// Unix timestamp (seconds)
    pub created_at: i64,
}

/// Request para criar cidade (admin)
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCityRequest {
    pub name: String,
}

/// Key used for case-insensitive city lookups.
pub fn city_key(name: &str) -> String {
    name.trim().to_lowercase()
}
