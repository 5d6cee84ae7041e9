use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{Connector, Influencer};

/// Connector filter as sent by the search form; `all` disables the filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ConnectorFilter {
    All,
    Instagram,
    Youtube,
}

impl ConnectorFilter {
    pub fn connector(&self) -> Option<Connector> {
        match self {
            ConnectorFilter::All => None,
            ConnectorFilter::Instagram => Some(Connector::Instagram),
            ConnectorFilter::Youtube => Some(Connector::Youtube),
        }
    }
}

/// Filter criteria for a live search. Only `city` is required.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct SearchParams {
    pub city: Option<String>,
    pub country: Option<String>,
    pub category: Option<String>,
    pub connector: Option<ConnectorFilter>,
    pub bio_keyword: Option<String>,
    pub followers_min: Option<u64>,
    pub followers_max: Option<u64>,
    pub engagement_rate_min: Option<f64>,
    pub engagement_rate_max: Option<f64>,
    pub posts_min: Option<u64>,
    pub posts_max: Option<u64>,
}

impl SearchParams {
    /// Trimmed city name, `None` when missing or blank.
    pub fn city(&self) -> Option<&str> {
        self.city.as_deref().map(str::trim).filter(|c| !c.is_empty())
    }
}

/// Successful search payload: `{ "data": [...] }`.
#[derive(Debug, Serialize, ToSchema)]
pub struct SearchResponse {
    pub data: Vec<Influencer>,
}
