use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const KEYWORD_COUNT: usize = 5;
pub const CATEGORY_COUNT: usize = 3;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionRequest {
    pub search_term: String,
}

/// Keyword and category ideas for a search term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchSuggestions {
    pub suggested_keywords: Vec<String>,
    pub suggested_categories: Vec<String>,
}
