use mongodb::bson::Bson;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const PLACEHOLDER_PROFILE_PIC: &str = "https://placehold.co/150x150.png";
pub const NOT_AVAILABLE: &str = "N/A";

/// Social platform a creator profile belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Connector {
    Instagram,
    Youtube,
}

impl Connector {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "instagram" => Some(Connector::Instagram),
            "youtube" => Some(Connector::Youtube),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Connector::Instagram => "instagram",
            Connector::Youtube => "youtube",
        }
    }
}

/// Influencer record as stored per city and returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Influencer {
    /// Handle without the leading `@`; unique within a city
    pub id: String,
    pub username: String,
    pub full_name: String,
    #[serde(default)]
    pub biography: String,
    #[serde(default, deserialize_with = "deserialize_count")]
    pub followers_count: u64,
    #[serde(default, deserialize_with = "deserialize_count")]
    pub posts_count: u64,
    /// Percentage
    #[serde(default, deserialize_with = "deserialize_rate")]
    pub engagement_rate: f64,
    pub connector: Connector,
    #[serde(default)]
    pub location_country: String,
    #[serde(default)]
    pub location_city: String,
    #[serde(default)]
    pub profile_pic_url: String,
    #[serde(default)]
    pub category: String,
}

/// Strips a leading `@` from a provider handle.
pub fn normalize_handle(handle: &str) -> &str {
    let handle = handle.trim();
    handle.strip_prefix('@').unwrap_or(handle)
}

// Numeric columns may come back as int32, int64, double or even strings
// depending on who wrote the document.
fn bson_to_f64(value: Bson) -> Result<f64, String> {
    match value {
        Bson::Int32(n) => Ok(n as f64),
        Bson::Int64(n) => Ok(n as f64),
        Bson::Double(d) => Ok(d),
        Bson::String(s) if s.trim().is_empty() => Ok(0.0),
        Bson::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|e| format!("Invalid number '{}': {}", s, e)),
        Bson::Null | Bson::Undefined => Ok(0.0),
        other => Err(format!("Expected a number, got {:?}", other.element_type())),
    }
}

fn deserialize_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Bson::deserialize(deserializer)?;
    let number = bson_to_f64(value).map_err(serde::de::Error::custom)?;
    if number.is_finite() && number > 0.0 {
        Ok(number.round() as u64)
    } else {
        Ok(0)
    }
}

fn deserialize_rate<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Bson::deserialize(deserializer)?;
    let number = bson_to_f64(value).map_err(serde::de::Error::custom)?;
    Ok(if number.is_finite() { number } else { 0.0 })
}
