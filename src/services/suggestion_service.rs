// ==================== SEARCH SUGGESTIONS (GEMINI) ====================

use serde::Deserialize;
use serde_json::json;

use crate::config::SuggestionConfig;
use crate::models::{SearchSuggestions, CATEGORY_COUNT, KEYWORD_COUNT};
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

pub fn build_prompt(search_term: &str) -> String {
    format!(
        "You are an expert in generating search terms for influencer discovery.\n\
         Given the initial search term provided by the user, suggest relevant keywords and categories \
         that can help them discover more influencers.\n\n\
         Initial Search Term: {}\n\n\
         Provide {} suggested keywords and {} suggested categories.\n\
         Keywords should be specific and related to the search term.\n\
         Categories should be broad and relevant to the search term.\n\n\
         Format your response as a JSON object with \"suggestedKeywords\" and \"suggestedCategories\" arrays.",
        search_term, KEYWORD_COUNT, CATEGORY_COUNT
    )
}

fn request_body(search_term: &str) -> serde_json::Value {
    json!({
        "contents": [{
            "role": "user",
            "parts": [{ "text": build_prompt(search_term) }]
        }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": {
                "type": "OBJECT",
                "properties": {
                    "suggestedKeywords": { "type": "ARRAY", "items": { "type": "STRING" } },
                    "suggestedCategories": { "type": "ARRAY", "items": { "type": "STRING" } }
                },
                "required": ["suggestedKeywords", "suggestedCategories"]
            }
        }
    })
}

#[derive(Clone)]
pub struct SuggestionClient {
    http: reqwest::Client,
    config: SuggestionConfig,
}

impl SuggestionClient {
    pub fn new(config: SuggestionConfig) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { http, config })
    }

    /// Keyword and category ideas for `search_term`. Any failure yields `None`.
    pub async fn get_suggestions(&self, search_term: &str) -> Option<SearchSuggestions> {
        let term = search_term.trim();
        if term.is_empty() {
            return None;
        }

        match self.generate(term).await {
            Ok(suggestions) => {
                log::info!(
                    "✅ {} keywords / {} categories suggested for '{}'",
                    suggestions.suggested_keywords.len(),
                    suggestions.suggested_categories.len(),
                    term
                );
                Some(suggestions)
            }
            Err(e) => {
                log::error!("❌ Error fetching suggestions for '{}': {}", term, e);
                None
            }
        }
    }

    async fn generate(&self, term: &str) -> AppResult<SearchSuggestions> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| AppError::Configuration("GEMINI_API_KEY is not set".to_string()))?;

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        );

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&request_body(term))
            .send()
            .await
            .map_err(|e| AppError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream {
                status: status.as_u16(),
                message: body,
            });
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| AppError::Network(format!("Failed to read model response: {}", e)))?;

        let text = body
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().find_map(|p| p.text))
            .ok_or_else(|| AppError::Upstream {
                status: status.as_u16(),
                message: "Model returned no content".to_string(),
            })?;

        parse_suggestions(&text)
    }
}

/// Parses the model's JSON answer and caps both lists.
pub fn parse_suggestions(text: &str) -> AppResult<SearchSuggestions> {
    let mut suggestions: SearchSuggestions =
        serde_json::from_str(text.trim()).map_err(|e| AppError::Upstream {
            status: 200,
            message: format!("Model returned invalid JSON: {}", e),
        })?;

    suggestions.suggested_keywords.truncate(KEYWORD_COUNT);
    suggestions.suggested_categories.truncate(CATEGORY_COUNT);
    Ok(suggestions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::{
        matchers::{header, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    const MODEL_PATH: &str = "/v1beta/models/test-model:generateContent";

    fn client_for(server: &MockServer, api_key: Option<&str>) -> SuggestionClient {
        SuggestionClient::new(SuggestionConfig {
            base_url: server.uri(),
            model: "test-model".to_string(),
            api_key: api_key.map(String::from),
            timeout: Duration::from_secs(2),
        })
        .unwrap()
    }

    fn model_answer(text: &str) -> serde_json::Value {
        json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": text }] }
            }]
        })
    }

    #[tokio::test]
    async fn test_blank_term_makes_no_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        assert!(client_for(&server, Some("key")).get_suggestions("   ").await.is_none());
    }

    #[tokio::test]
    async fn test_missing_key_returns_none() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        assert!(client_for(&server, None).get_suggestions("vegan food").await.is_none());
    }

    #[tokio::test]
    async fn test_suggestions_are_parsed_and_capped() {
        let server = MockServer::start().await;
        let answer = r#"{
            "suggestedKeywords": ["plant based", "vegan recipes", "meal prep", "tofu", "tempeh", "seitan"],
            "suggestedCategories": ["Food", "Health", "Lifestyle", "Fitness"]
        }"#;

        Mock::given(method("POST"))
            .and(path(MODEL_PATH))
            .and(header("x-goog-api-key", "key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(model_answer(answer)))
            .expect(1)
            .mount(&server)
            .await;

        let suggestions = client_for(&server, Some("key"))
            .get_suggestions("vegan food")
            .await
            .unwrap();

        assert_eq!(suggestions.suggested_keywords.len(), 5);
        assert_eq!(suggestions.suggested_categories, vec!["Food", "Health", "Lifestyle"]);
    }

    #[tokio::test]
    async fn test_error_status_returns_none() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(MODEL_PATH))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        assert!(client_for(&server, Some("key")).get_suggestions("travel").await.is_none());
    }

    #[tokio::test]
    async fn test_unparseable_answer_returns_none() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(MODEL_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(model_answer("not json")))
            .mount(&server)
            .await;

        assert!(client_for(&server, Some("key")).get_suggestions("travel").await.is_none());
    }

    #[test]
    fn test_prompt_mentions_term_and_counts() {
        let prompt = build_prompt("street food");
        assert!(prompt.contains("Initial Search Term: street food"));
        assert!(prompt.contains("Provide 5 suggested keywords and 3 suggested categories."));
    }
}
