//! Reading bookmarks from Chromium profile directories.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;

use crate::extensions::{ExtensionError, ExtensionResult};

use super::bookmark::BrowserBookmark;
use super::settings::Browser;

/// Source of bookmarks for a browser.
#[async_trait]
pub trait BrowserBookmarkRepository: Send + Sync {
    async fn get_all(&self, browser: Browser) -> ExtensionResult<Vec<BrowserBookmark>>;
}

/// Reads the `Default/Bookmarks` JSON file of Chromium-based browsers.
#[derive(Debug, Default, Clone)]
pub struct ChromiumBookmarkRepository {
    overrides: HashMap<Browser, PathBuf>,
}

impl ChromiumBookmarkRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read `browser`'s bookmarks from `path` instead of the profile directory.
    pub fn with_bookmarks_file(mut self, browser: Browser, path: impl Into<PathBuf>) -> Self {
        self.overrides.insert(browser, path.into());
        self
    }

    /// Location of the bookmarks file, `None` if the browser does not exist on
    /// this platform.
    pub fn bookmarks_file(&self, browser: Browser) -> Option<PathBuf> {
        if let Some(path) = self.overrides.get(&browser) {
            return Some(path.clone());
        }
        user_data_dir(browser).map(|dir| dir.join("Default").join("Bookmarks"))
    }
}

#[cfg(target_os = "linux")]
fn user_data_dir(browser: Browser) -> Option<PathBuf> {
    let relative = match browser {
        Browser::Arc => return None,
        Browser::BraveBrowser => "BraveSoftware/Brave-Browser",
        Browser::GoogleChrome => "google-chrome",
        Browser::MicrosoftEdge => "microsoft-edge",
        Browser::YandexBrowser => "yandex-browser",
    };
    dirs::config_dir().map(|dir| dir.join(relative))
}

#[cfg(target_os = "macos")]
fn user_data_dir(browser: Browser) -> Option<PathBuf> {
    let relative = match browser {
        Browser::Arc => "Arc/User Data",
        Browser::BraveBrowser => "BraveSoftware/Brave-Browser",
        Browser::GoogleChrome => "Google/Chrome",
        Browser::MicrosoftEdge => "Microsoft Edge",
        Browser::YandexBrowser => "Yandex/YandexBrowser",
    };
    dirs::data_dir().map(|dir| dir.join(relative))
}

#[cfg(target_os = "windows")]
fn user_data_dir(browser: Browser) -> Option<PathBuf> {
    let relative = match browser {
        Browser::Arc => return None,
        Browser::BraveBrowser => "BraveSoftware/Brave-Browser/User Data",
        Browser::GoogleChrome => "Google/Chrome/User Data",
        Browser::MicrosoftEdge => "Microsoft/Edge/User Data",
        Browser::YandexBrowser => "Yandex/YandexBrowser/User Data",
    };
    dirs::data_local_dir().map(|dir| dir.join(relative))
}

#[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
fn user_data_dir(_browser: Browser) -> Option<PathBuf> {
    None
}

#[async_trait]
impl BrowserBookmarkRepository for ChromiumBookmarkRepository {
    async fn get_all(&self, browser: Browser) -> ExtensionResult<Vec<BrowserBookmark>> {
        let Some(path) = self.bookmarks_file(browser) else {
            tracing::debug!("{} is not available on {}", browser, crate::platform::name());
            return Ok(Vec::new());
        };

        let contents = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("{} bookmarks not found at {:?}", browser, path);
                return Ok(Vec::new());
            }
            Err(e) => return Err(repository_error(&path, e)),
        };

        let bookmarks = parse_bookmarks(&contents).map_err(|e| repository_error(&path, e))?;
        tracing::debug!("Found {} {} bookmarks", bookmarks.len(), browser);
        Ok(bookmarks)
    }
}

fn repository_error(path: &Path, error: impl ToString) -> ExtensionError {
    ExtensionError::Repository {
        path: path.to_path_buf(),
        message: error.to_string(),
    }
}

/// Parse the contents of a Chromium `Bookmarks` file.
pub fn parse_bookmarks(contents: &str) -> Result<Vec<BrowserBookmark>, String> {
    let json: Value = serde_json::from_str(contents).map_err(|e| e.to_string())?;
    let roots = json
        .get("roots")
        .and_then(Value::as_object)
        .ok_or_else(|| "missing 'roots' object".to_string())?;

    let mut bookmarks = Vec::new();
    for root in roots.values() {
        collect_bookmarks(root, &mut bookmarks);
    }
    Ok(bookmarks)
}

fn collect_bookmarks(node: &Value, bookmarks: &mut Vec<BrowserBookmark>) {
    let Some(obj) = node.as_object() else {
        return;
    };

    if let Some(url) = obj.get("url").and_then(Value::as_str) {
        let name = obj.get("name").and_then(Value::as_str).unwrap_or_default();
        bookmarks.push(BrowserBookmark::new(name, url));
    }

    if let Some(children) = obj.get("children").and_then(Value::as_array) {
        for child in children {
            collect_bookmarks(child, bookmarks);
        }
    }
}
