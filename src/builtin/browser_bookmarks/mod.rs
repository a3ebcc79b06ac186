//! Browser bookmarks extension.
//!
//! Lists the bookmarks of the configured Chromium-based browser. Each bookmark
//! opens in the default browser and can be copied or added to favorites.

mod bookmark;
mod repository;
mod settings;

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::assets::AssetPathResolver;
use crate::core::{Image, SearchResultItem, TranslationRef};
use crate::extensions::{Author, Extension, ExtensionError, ExtensionResult};
use crate::settings::{extension_setting_key, SettingsManager, SettingsManagerExt};
use crate::translator::{extension_namespace, translations, Translations, Translator};

pub use bookmark::{BookmarkLabels, BrowserBookmark};
pub use repository::{parse_bookmarks, BrowserBookmarkRepository, ChromiumBookmarkRepository};
pub use settings::{Browser, BrowserBookmarksSettings, FaviconApi, SearchResultStyle, SettingKey};

pub const EXTENSION_ID: &str = "BrowserBookmarks";

pub struct BrowserBookmarks {
    author: Author,
    defaults: BrowserBookmarksSettings,
    repository: Arc<dyn BrowserBookmarkRepository>,
    settings: Arc<dyn SettingsManager>,
    assets: Arc<dyn AssetPathResolver>,
    translator: Arc<Translator>,
}

impl BrowserBookmarks {
    pub fn new(
        repository: Arc<dyn BrowserBookmarkRepository>,
        settings: Arc<dyn SettingsManager>,
        assets: Arc<dyn AssetPathResolver>,
        translator: Arc<Translator>,
    ) -> Self {
        Self {
            author: Author {
                name: "Oliver Schwendener".to_string(),
                github_user_name: "oliverschwendener".to_string(),
            },
            defaults: BrowserBookmarksSettings::default(),
            repository,
            settings,
            assets,
            translator,
        }
    }

    fn setting<T: DeserializeOwned>(&self, key: SettingKey, default: T) -> T {
        self.settings
            .get_value(&extension_setting_key(EXTENSION_ID, key.name()), default, false)
    }

    /// Current settings with per-key defaults.
    pub fn current_settings(&self) -> BrowserBookmarksSettings {
        BrowserBookmarksSettings {
            browser: self.setting(SettingKey::Browser, self.defaults.browser),
            search_result_style: self
                .setting(SettingKey::SearchResultStyle, self.defaults.search_result_style),
            favicon_api: self.setting(SettingKey::FaviconApi, self.defaults.favicon_api),
        }
    }

    fn browser_image_path(&self, browser: Browser) -> PathBuf {
        self.assets
            .get_extension_asset_path(EXTENSION_ID, browser.asset_file_name())
    }

    fn labels(&self, browser: Browser) -> ExtensionResult<BookmarkLabels> {
        let t = self.translator.create_instance(&self.get_translations());
        Ok(BookmarkLabels {
            description: t.t("searchResultItem.description")?,
            copy_url: t.t("copyUrlToClipboard")?,
            copy_url_translation: (
                "copyUrlToClipboard".to_string(),
                extension_namespace(EXTENSION_ID),
            ),
            fallback_image: Image::from_file_path(&self.browser_image_path(browser)),
        })
    }
}

#[async_trait]
impl Extension for BrowserBookmarks {
    fn id(&self) -> &str {
        EXTENSION_ID
    }

    fn name(&self) -> &str {
        "Browser Bookmarks"
    }

    fn name_translation(&self) -> TranslationRef {
        TranslationRef::new("extensionName", extension_namespace(EXTENSION_ID))
    }

    fn author(&self) -> &Author {
        &self.author
    }

    async fn get_search_result_items(&self) -> ExtensionResult<Vec<SearchResultItem>> {
        let settings = self.current_settings();
        let labels = self.labels(settings.browser)?;
        let bookmarks = self.repository.get_all(settings.browser).await?;

        let mut seen = HashSet::new();
        let items = bookmarks
            .iter()
            .filter(|bookmark| seen.insert(bookmark.url.as_str()))
            .map(|bookmark| {
                bookmark.to_search_result_item(
                    settings.search_result_style,
                    settings.favicon_api,
                    &labels,
                )
            })
            .collect();

        Ok(items)
    }

    fn is_supported(&self) -> bool {
        true
    }

    fn get_setting_default_value(&self, key: &str) -> ExtensionResult<Value> {
        SettingKey::from_name(key)
            .ok_or_else(|| ExtensionError::UnknownSetting {
                extension: EXTENSION_ID.to_string(),
                key: key.to_string(),
            })?
            .default_value(&self.defaults)
    }

    fn get_setting_keys_triggering_rescan(&self) -> Vec<String> {
        SettingKey::ALL
            .iter()
            .map(|key| extension_setting_key(EXTENSION_ID, key.name()))
            .collect()
    }

    fn get_image(&self) -> Image {
        Image::from_file_path(&self.browser_image_path(self.current_settings().browser))
    }

    fn get_asset_file_path(&self, key: &str) -> ExtensionResult<PathBuf> {
        let browser: Browser = key.parse().map_err(|_| ExtensionError::UnknownAsset {
            extension: EXTENSION_ID.to_string(),
            key: key.to_string(),
        })?;
        Ok(self.browser_image_path(browser))
    }

    fn get_translations(&self) -> Translations {
        translations(&[
            (
                "en-US",
                &[
                    ("extensionName", "Browser Bookmarks"),
                    ("searchResultStyle.nameOnly", "Name only"),
                    ("searchResultStyle.urlOnly", "URL only"),
                    ("searchResultStyle.nameAndUrl", "Name & URL"),
                    ("searchResultItem.description", "Browser Bookmark"),
                    ("copyUrlToClipboard", "Copy URL to clipboard"),
                ],
            ),
            (
                "de-CH",
                &[
                    ("extensionName", "Browserlesezeichen"),
                    ("searchResultStyle.nameOnly", "Nur Name"),
                    ("searchResultStyle.urlOnly", "Nur URL"),
                    ("searchResultStyle.nameAndUrl", "Name & URL"),
                    ("searchResultItem.description", "Browserlesezeichen"),
                    ("copyUrlToClipboard", "URL in Zwischenablage kopieren"),
                ],
            ),
        ])
    }
}
