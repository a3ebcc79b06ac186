//! Search result types shared between extensions, the host and the UI.
//!
//! Everything in here is plain data: extensions build these values, the host
//! aggregates them and frontends render them. All types serialize to camelCase
//! JSON so they can be handed to a web-based frontend unchanged.

use serde::{Deserialize, Serialize};

/// A reference into the translation registry.
///
/// Frontends use this to re-translate a label when the locale changes without
/// asking the extension to rebuild its items.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TranslationRef {
    pub key: String,
    pub namespace: String,
}

impl TranslationRef {
    pub fn new(key: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            namespace: namespace.into(),
        }
    }
}

/// Icon reference for a result or an extension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    /// `file://` URL of a local asset or a remote `https://` URL.
    pub url: String,
}

impl Image {
    /// Build an image from a local file path.
    pub fn from_file_path(path: &std::path::Path) -> Self {
        Self {
            url: format!("file://{}", path.display()),
        }
    }

    pub fn from_url(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

/// A serializable instruction triggered when the user activates a result.
///
/// `argument` is opaque to everyone except the handler named by `handler_id`.
/// It is always a JSON object carrying an `action` discriminator, because the
/// handler receives nothing else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResultItemAction {
    pub argument: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description_translation: Option<TranslationRef>,
    pub handler_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fluent_icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyboard_shortcut: Option<String>,
}

impl SearchResultItemAction {
    /// Parse the argument as JSON.
    pub fn argument_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::from_str(&self.argument)
    }
}

/// One unit of search output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResultItem {
    /// Stable across rescans for the same logical item.
    pub id: String,
    pub name: String,
    pub description: String,
    pub image: Image,
    pub default_action: SearchResultItemAction,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub additional_actions: Vec<SearchResultItemAction>,
}

impl SearchResultItem {
    /// All actions of this item, default action first.
    pub fn actions(&self) -> impl Iterator<Item = &SearchResultItemAction> {
        std::iter::once(&self.default_action).chain(self.additional_actions.iter())
    }
}
