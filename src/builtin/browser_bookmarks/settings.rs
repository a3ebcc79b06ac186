//! Typed settings of the browser bookmarks extension.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::extensions::ExtensionResult;

/// Chromium-based browsers whose bookmarks can be searched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Browser {
    Arc,
    #[serde(rename = "Brave Browser")]
    BraveBrowser,
    #[serde(rename = "Google Chrome")]
    GoogleChrome,
    #[serde(rename = "Microsoft Edge")]
    MicrosoftEdge,
    #[serde(rename = "Yandex Browser")]
    YandexBrowser,
}

impl Browser {
    pub const ALL: [Browser; 5] = [
        Browser::Arc,
        Browser::BraveBrowser,
        Browser::GoogleChrome,
        Browser::MicrosoftEdge,
        Browser::YandexBrowser,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Browser::Arc => "Arc",
            Browser::BraveBrowser => "Brave Browser",
            Browser::GoogleChrome => "Google Chrome",
            Browser::MicrosoftEdge => "Microsoft Edge",
            Browser::YandexBrowser => "Yandex Browser",
        }
    }

    /// Icon file name in the extension's asset directory.
    pub fn asset_file_name(&self) -> &'static str {
        match self {
            Browser::Arc => "arc.png",
            Browser::BraveBrowser => "brave-browser.png",
            Browser::GoogleChrome => "google-chrome.png",
            Browser::MicrosoftEdge => "microsoft-edge.png",
            Browser::YandexBrowser => "yandex-browser.svg",
        }
    }
}

impl fmt::Display for Browser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Browser {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Browser::ALL
            .into_iter()
            .find(|b| b.as_str() == s)
            .ok_or_else(|| format!("Unknown browser: {}", s))
    }
}

/// How a bookmark is presented in the result list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SearchResultStyle {
    #[default]
    NameOnly,
    UrlOnly,
    NameAndUrl,
}

/// Service used to fetch bookmark favicons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FaviconApi {
    #[default]
    Google,
    DuckDuckGo,
}

impl FaviconApi {
    /// Favicon URL for a domain.
    pub fn favicon_url(&self, domain: &str) -> String {
        match self {
            FaviconApi::Google => format!(
                "https://www.google.com/s2/favicons?domain={}&sz=48",
                urlencoding::encode(domain)
            ),
            FaviconApi::DuckDuckGo => format!(
                "https://icons.duckduckgo.com/ip3/{}.ico",
                urlencoding::encode(domain)
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserBookmarksSettings {
    pub browser: Browser,
    pub search_result_style: SearchResultStyle,
    pub favicon_api: FaviconApi,
}

impl Default for BrowserBookmarksSettings {
    fn default() -> Self {
        Self {
            browser: Browser::GoogleChrome,
            search_result_style: SearchResultStyle::NameOnly,
            favicon_api: FaviconApi::Google,
        }
    }
}

/// Declared settings keys of the extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKey {
    Browser,
    SearchResultStyle,
    FaviconApi,
}

impl SettingKey {
    pub const ALL: [SettingKey; 3] = [
        SettingKey::Browser,
        SettingKey::SearchResultStyle,
        SettingKey::FaviconApi,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SettingKey::Browser => "browser",
            SettingKey::SearchResultStyle => "searchResultStyle",
            SettingKey::FaviconApi => "faviconApi",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        SettingKey::ALL.into_iter().find(|k| k.name() == name)
    }

    /// Default value of this key as stored in the settings store.
    pub fn default_value(&self, defaults: &BrowserBookmarksSettings) -> ExtensionResult<Value> {
        let value = match self {
            SettingKey::Browser => serde_json::to_value(defaults.browser)?,
            SettingKey::SearchResultStyle => serde_json::to_value(defaults.search_result_style)?,
            SettingKey::FaviconApi => serde_json::to_value(defaults.favicon_api)?,
        };
        Ok(value)
    }
}
