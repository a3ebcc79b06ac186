//! A single browser bookmark and its presentation as a search result.

use sha2::{Digest, Sha256};
use url::Url;

use crate::core::action_utility::{
    create_add_to_favorites_action, create_copy_to_clipboard_action, create_open_url_action,
    CopyToClipboardOptions, FavoritesOptions, OpenUrlOptions,
};
use crate::core::{Image, SearchResultItem};

use super::settings::{FaviconApi, SearchResultStyle};

/// Localized labels and icons needed to build an item.
#[derive(Debug, Clone)]
pub struct BookmarkLabels {
    /// Description shown when the URL is not displayed.
    pub description: String,
    pub copy_url: String,
    pub copy_url_translation: (String, String),
    /// Image of bookmarks without a host, e.g. `javascript:` bookmarklets.
    pub fallback_image: Image,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserBookmark {
    pub name: String,
    pub url: String,
}

impl BrowserBookmark {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }

    /// Stable result id derived from the URL.
    pub fn id(&self) -> String {
        let digest = Sha256::digest(self.url.as_bytes());
        format!("{}:{}", super::EXTENSION_ID, hex::encode(digest))
    }

    /// Lowercased host of the URL, used to look up the favicon.
    ///
    /// `None` for URLs without a host.
    pub fn domain(&self) -> Option<String> {
        Url::parse(&self.url)
            .ok()
            .and_then(|url| url.host_str().map(str::to_owned))
    }

    fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            &self.url
        } else {
            &self.name
        }
    }

    pub fn to_search_result_item(
        &self,
        style: SearchResultStyle,
        favicon_api: FaviconApi,
        labels: &BookmarkLabels,
    ) -> SearchResultItem {
        let (name, description) = match style {
            SearchResultStyle::NameOnly => {
                (self.display_name().to_string(), labels.description.clone())
            }
            SearchResultStyle::UrlOnly => (self.url.clone(), labels.description.clone()),
            SearchResultStyle::NameAndUrl => (self.display_name().to_string(), self.url.clone()),
        };

        let id = self.id();
        let (key, namespace) = &labels.copy_url_translation;

        SearchResultItem {
            name,
            description,
            image: match self.domain() {
                Some(domain) => Image::from_url(favicon_api.favicon_url(&domain)),
                None => labels.fallback_image.clone(),
            },
            default_action: create_open_url_action(OpenUrlOptions {
                url: &self.url,
                ..Default::default()
            }),
            additional_actions: vec![
                create_copy_to_clipboard_action(CopyToClipboardOptions {
                    text: &self.url,
                    description: Some(labels.copy_url.as_str()),
                    description_translation: Some((key.as_str(), namespace.as_str())),
                    keyboard_shortcut: Some("Ctrl+C"),
                }),
                create_add_to_favorites_action(FavoritesOptions {
                    id: &id,
                    keyboard_shortcut: None,
                }),
            ],
            id,
        }
    }
}
