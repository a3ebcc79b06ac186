//! Built-in action handlers: favorites, URLs and the clipboard.

mod favorites;

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::core::action_utility::{CLIPBOARD_HANDLER_ID, URL_HANDLER_ID};
use crate::core::SearchResultItemAction;
use crate::extensions::{ActionHandler, ExtensionError, ExtensionResult};
use crate::platform::{ClipboardAccess, SystemOpen};

pub use favorites::FavoritesActionHandler;

/// Parse an action argument, failing loudly on anything unexpected.
pub(crate) fn parse_argument<T: DeserializeOwned>(
    handler_id: &str,
    argument: &str,
) -> ExtensionResult<T> {
    serde_json::from_str(argument).map_err(|e| {
        ExtensionError::MalformedArgument(format!("{} handler: {}", handler_id, e))
    })
}

#[derive(Debug, Deserialize)]
#[serde(tag = "action")]
enum UrlArgument {
    Open { url: String },
}

/// Opens URLs with the system default browser.
pub struct UrlActionHandler {
    opener: Arc<dyn SystemOpen>,
}

impl UrlActionHandler {
    pub fn new(opener: Arc<dyn SystemOpen>) -> Self {
        Self { opener }
    }
}

#[async_trait]
impl ActionHandler for UrlActionHandler {
    fn id(&self) -> &str {
        URL_HANDLER_ID
    }

    async fn invoke(&self, action: &SearchResultItemAction) -> ExtensionResult<()> {
        let UrlArgument::Open { url } = parse_argument(self.id(), &action.argument)?;
        if url.trim().is_empty() {
            return Err(ExtensionError::MalformedArgument(
                "Url handler: empty URL".to_string(),
            ));
        }

        tracing::debug!("Opening {}", url);
        self.opener
            .open_url(&url)
            .map_err(|e| ExtensionError::Platform(e.to_string()))
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "action")]
enum ClipboardArgument {
    Copy { text: String },
}

/// Copies text to the system clipboard.
pub struct ClipboardActionHandler {
    clipboard: Arc<dyn ClipboardAccess>,
}

impl ClipboardActionHandler {
    pub fn new(clipboard: Arc<dyn ClipboardAccess>) -> Self {
        Self { clipboard }
    }
}

#[async_trait]
impl ActionHandler for ClipboardActionHandler {
    fn id(&self) -> &str {
        CLIPBOARD_HANDLER_ID
    }

    async fn invoke(&self, action: &SearchResultItemAction) -> ExtensionResult<()> {
        let ClipboardArgument::Copy { text } = parse_argument(self.id(), &action.argument)?;
        self.clipboard
            .set_text(&text)
            .map_err(|e| ExtensionError::Platform(e.to_string()))
    }
}
