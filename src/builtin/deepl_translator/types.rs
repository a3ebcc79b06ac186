//! Wire types of the DeepL translate endpoint.

use serde::{Deserialize, Serialize};

/// Source language value meaning "let DeepL detect it".
pub const AUTO_SOURCE_LANGUAGE: &str = "Auto";

/// Argument of [`super::DeeplTranslator`]'s `invoke`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationArgument {
    pub search_term: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_language: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostBody {
    pub text: Vec<String>,
    pub target_lang: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_lang: Option<String>,
}

impl PostBody {
    pub fn new(search_term: &str, source_language: &str, target_language: &str) -> Self {
        Self {
            text: vec![search_term.to_string()],
            target_lang: target_language.to_string(),
            source_lang: (source_language != AUTO_SOURCE_LANGUAGE)
                .then(|| source_language.to_string()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse {
    pub translations: Vec<ApiTranslation>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiTranslation {
    #[serde(default)]
    pub detected_source_language: Option<String>,
    pub text: String,
}
