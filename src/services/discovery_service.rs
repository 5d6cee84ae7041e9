// ==================== INFLUENCER DISCOVERY API ====================
// Cliente da API de descoberta (Ylytic via RapidAPI)

use reqwest::StatusCode;
use serde::Deserialize;

use crate::config::DiscoveryConfig;
use crate::models::{
    normalize_handle, Connector, Influencer, SearchParams, NOT_AVAILABLE, PLACEHOLDER_PROFILE_PIC,
};
use crate::utils::{AppError, AppResult};

pub const DISCOVERY_PATH: &str = "/ylytic/admin/api/v1/discovery";
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch data";

// Range maximums at or above these values mean "unbounded" and are not sent.
pub const FOLLOWERS_CEILING: u64 = 10_000_000;
pub const ENGAGEMENT_RATE_CEILING: f64 = 100.0;
pub const POSTS_CEILING: u64 = 5_000;

/// Creator record as returned by the provider.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderCreator {
    pub handle: String,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub followers: Option<f64>,
    #[serde(default)]
    pub posts: Option<f64>,
    #[serde(default)]
    pub engagement: Option<f64>,
    #[serde(default)]
    pub connector: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DiscoveryResponse {
    #[serde(default)]
    creators: Option<Vec<ProviderCreator>>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Builds the provider query parameters, in the order the provider documents them.
pub fn build_discovery_query(params: &SearchParams) -> Vec<(&'static str, String)> {
    let mut query = vec![("current_page", "1".to_string())];

    if let Some(keyword) = non_empty(&params.bio_keyword) {
        query.push(("bio_contains", keyword.to_string()));
    }
    if let Some(connector) = params.connector.and_then(|c| c.connector()) {
        query.push(("connector", connector.as_str().to_string()));
    }
    if let Some(category) = non_empty(&params.category) {
        if !category.eq_ignore_ascii_case("all") {
            query.push(("category", category.to_string()));
        }
    }
    if let Some(country) = non_empty(&params.country) {
        query.push(("country", country.to_string()));
    }
    if let Some(city) = params.city() {
        query.push(("city", city.to_string()));
    }

    if let Some(min) = params.followers_min {
        query.push(("followers_minimum", min.to_string()));
    }
    if let Some(max) = params.followers_max.filter(|max| *max < FOLLOWERS_CEILING) {
        query.push(("followers_maximum", max.to_string()));
    }
    if let Some(min) = params.engagement_rate_min {
        query.push(("engagement_rate_minimum", min.to_string()));
    }
    if let Some(max) = params
        .engagement_rate_max
        .filter(|max| *max < ENGAGEMENT_RATE_CEILING)
    {
        query.push(("engagement_rate_maximum", max.to_string()));
    }
    if let Some(min) = params.posts_min {
        query.push(("posts_minimum", min.to_string()));
    }
    if let Some(max) = params.posts_max.filter(|max| *max < POSTS_CEILING) {
        query.push(("posts_maximum", max.to_string()));
    }

    query
}

pub fn encode_query(pairs: &[(&str, String)]) -> String {
    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Best-effort message from an error body: JSON `message`/`messages`, else the raw text.
pub fn extract_error_message(body: &str, status: StatusCode) -> String {
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(json) => ["message", "messages"]
            .iter()
            .filter_map(|key| json.get(*key))
            .find_map(|value| match value {
                serde_json::Value::Null => None,
                serde_json::Value::String(s) if s.is_empty() => None,
                serde_json::Value::String(s) => Some(s.clone()),
                other => Some(other.to_string()),
            })
            .unwrap_or_else(|| FETCH_FAILED_MESSAGE.to_string()),
        Err(_) if !body.trim().is_empty() => body.trim().to_string(),
        Err(_) => status
            .canonical_reason()
            .unwrap_or(FETCH_FAILED_MESSAGE)
            .to_string(),
    }
}

fn to_count(value: Option<f64>) -> u64 {
    match value {
        Some(v) if v.is_finite() && v > 0.0 => v.round() as u64,
        _ => 0,
    }
}

/// Maps a provider record into the local shape. Unknown connectors are dropped.
pub fn map_creator(creator: ProviderCreator) -> Option<Influencer> {
    let connector = match creator.connector.as_deref().and_then(Connector::parse) {
        Some(connector) => connector,
        None => {
            log::warn!(
                "⚠️  Skipping creator {} with unsupported connector {:?}",
                creator.handle,
                creator.connector
            );
            return None;
        }
    };

    let handle = normalize_handle(&creator.handle).to_string();
    if handle.is_empty() {
        return None;
    }

    Some(Influencer {
        id: handle.clone(),
        username: handle,
        full_name: creator.handle.trim().to_string(),
        biography: creator.bio.unwrap_or_default(),
        followers_count: to_count(creator.followers),
        posts_count: to_count(creator.posts),
        engagement_rate: creator.engagement.filter(|e| e.is_finite()).unwrap_or(0.0),
        connector,
        location_country: creator.country.unwrap_or_default(),
        location_city: non_empty(&creator.city).unwrap_or(NOT_AVAILABLE).to_string(),
        profile_pic_url: PLACEHOLDER_PROFILE_PIC.to_string(),
        category: non_empty(&creator.category)
            .unwrap_or(NOT_AVAILABLE)
            .to_string(),
    })
}

#[derive(Clone)]
pub struct DiscoveryClient {
    http: reqwest::Client,
    config: DiscoveryConfig,
}

impl DiscoveryClient {
    pub fn new(config: DiscoveryConfig) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { http, config })
    }

    /// One GET against the discovery endpoint. A `null` creator list is an empty result.
    pub async fn discover(&self, params: &SearchParams) -> AppResult<Vec<ProviderCreator>> {
        let api_key = self.config.api_key.as_deref().ok_or_else(|| {
            AppError::Configuration("RAPIDAPI_KEY is not set. Please add it to your .env file.".to_string())
        })?;

        let query = encode_query(&build_discovery_query(params));
        let url = format!(
            "{}{}?{}",
            self.config.base_url.trim_end_matches('/'),
            DISCOVERY_PATH,
            query
        );
        log::debug!("🌐 Fetching from URL: {}", url);

        let response = self
            .http
            .get(&url)
            .header("X-RapidAPI-Key", api_key)
            .header("X-RapidAPI-Host", &self.config.api_host)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AppError::Network(format!(
                        "Discovery API timed out after {}s",
                        self.config.timeout.as_secs()
                    ))
                } else {
                    AppError::Network(format!("Failed to reach discovery API: {}", e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = extract_error_message(&body, status);
            log::error!("❌ Discovery API error {}: {} (params: {:?})", status, message, params);
            return Err(AppError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        let body: DiscoveryResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                AppError::Network(format!("Discovery API timed out: {}", e))
            } else {
                log::error!("❌ Invalid discovery API response ({}): {}", status, e);
                AppError::Upstream {
                    status: status.as_u16(),
                    message: FETCH_FAILED_MESSAGE.to_string(),
                }
            }
        })?;

        Ok(body.creators.unwrap_or_default())
    }
}
