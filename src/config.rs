use std::env;
use std::time::Duration;

pub const DEFAULT_DISCOVERY_API_URL: &str = "https://ylytic-influencers-api.p.rapidapi.com";
pub const DEFAULT_DISCOVERY_API_HOST: &str = "ylytic-influencers-api.p.rapidapi.com";
pub const DEFAULT_GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";

/// Settings for the influencer discovery API (RapidAPI).
#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    pub base_url: String,
    pub api_host: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

/// Settings for the Gemini suggestion model.
#[derive(Debug, Clone)]
pub struct SuggestionConfig {
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub jwt_issuer: String,
    /// Marks the session cookie `Secure`.
    pub secure_cookies: bool,
    pub bcrypt_cost: u32,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub allowed_origins: Vec<String>,
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
    pub discovery: DiscoveryConfig,
    pub suggestions: SuggestionConfig,
    pub auth: AuthConfig,
}

impl AppConfig {
    /// Builds the configuration from environment variables (after `.env` is loaded).
    pub fn from_env() -> Result<Self, String> {
        let database_url =
            env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set".to_string())?;

        let port = env::var("PORT")
            .unwrap_or_else(|_| "3002".to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT: {}", e))?;

        let timeout_secs = env::var("HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(10);
        let timeout = Duration::from_secs(timeout_secs);

        let production = env::var("APP_ENV")
            .map(|v| v.eq_ignore_ascii_case("production"))
            .unwrap_or(false);

        let jwt_secret = match non_empty_var("JWT_SECRET") {
            Some(secret) => secret,
            None if production => return Err("JWT_SECRET must be set in production".to_string()),
            None => {
                log::warn!("⚠️  JWT_SECRET not set, using development secret");
                "dev-secret-change-me".to_string()
            }
        };

        let allowed_origins = env::var("ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000,http://127.0.0.1:3000".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port,
            database_url,
            allowed_origins,
            admin_email: non_empty_var("ADMIN_EMAIL"),
            admin_password: non_empty_var("ADMIN_PASSWORD"),
            discovery: DiscoveryConfig {
                base_url: env::var("DISCOVERY_API_URL")
                    .unwrap_or_else(|_| DEFAULT_DISCOVERY_API_URL.to_string()),
                api_host: env::var("DISCOVERY_API_HOST")
                    .unwrap_or_else(|_| DEFAULT_DISCOVERY_API_HOST.to_string()),
                api_key: non_empty_var("RAPIDAPI_KEY"),
                timeout,
            },
            suggestions: SuggestionConfig {
                base_url: env::var("GEMINI_API_URL")
                    .unwrap_or_else(|_| DEFAULT_GEMINI_API_URL.to_string()),
                model: env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_GEMINI_MODEL.to_string()),
                api_key: non_empty_var("GEMINI_API_KEY"),
                timeout,
            },
            auth: AuthConfig {
                jwt_secret,
                jwt_issuer: env::var("JWT_ISSUER")
                    .unwrap_or_else(|_| "influence-finder".to_string()),
                secure_cookies: production,
                bcrypt_cost: bcrypt::DEFAULT_COST,
            },
        })
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}
