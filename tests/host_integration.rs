//! End-to-end tests of the extension host with the built-in extensions.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::json;

use lumen::assets::{AssetPathResolver, DirectoryAssetPathResolver};
use lumen::builtin::browser_bookmarks::{Browser, ChromiumBookmarkRepository};
use lumen::builtin::{BrowserBookmarks, DeeplTranslator};
use lumen::extensions::ExtensionHostConfig;
use lumen::handlers::{ClipboardActionHandler, FavoritesActionHandler, UrlActionHandler};
use lumen::platform::{ClipboardAccess, SystemOpen};
use lumen::settings::FAVORITES_KEY;
use lumen::{
    DispatchOutcome, ExtensionError, ExtensionHost, JsonFileSettingsManager, LumenResult,
    SettingsManager, SettingsManagerExt, Translator, TranslatorOptions,
};

#[derive(Default)]
struct FakePlatform {
    opened: Mutex<Vec<String>>,
    clipboard: Mutex<String>,
}

impl SystemOpen for FakePlatform {
    fn open_url(&self, url: &str) -> LumenResult<()> {
        self.opened.lock().unwrap().push(url.to_string());
        Ok(())
    }
}

impl ClipboardAccess for FakePlatform {
    fn get_text(&self) -> LumenResult<String> {
        Ok(self.clipboard.lock().unwrap().clone())
    }

    fn set_text(&self, content: &str) -> LumenResult<()> {
        *self.clipboard.lock().unwrap() = content.to_string();
        Ok(())
    }
}

const CHROME_BOOKMARKS: &str = r#"{
    "roots": {
        "bookmark_bar": {
            "name": "Bookmarks bar",
            "children": [
                { "name": "Rust", "url": "https://www.rust-lang.org/" },
                { "name": "Crates", "url": "https://crates.io/" }
            ]
        }
    }
}"#;

const EDGE_BOOKMARKS: &str = r#"{
    "roots": {
        "other": {
            "name": "Other",
            "children": [ { "name": "Docs", "url": "https://docs.rs/" } ]
        }
    }
}"#;

struct Fixture {
    host: Arc<ExtensionHost>,
    settings: Arc<JsonFileSettingsManager>,
    platform: Arc<FakePlatform>,
    _dir: tempfile::TempDir,
}

fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

fn fixture() -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let settings = Arc::new(JsonFileSettingsManager::open(dir.path().join("settings.json")).unwrap());
    let translator = Arc::new(Translator::new(settings.clone(), TranslatorOptions::default()));
    let assets: Arc<dyn AssetPathResolver> =
        Arc::new(DirectoryAssetPathResolver::new(dir.path().join("assets")));
    let platform = Arc::new(FakePlatform::default());

    let repository = ChromiumBookmarkRepository::new()
        .with_bookmarks_file(
            Browser::GoogleChrome,
            write(dir.path(), "chrome.json", CHROME_BOOKMARKS),
        )
        .with_bookmarks_file(
            Browser::MicrosoftEdge,
            write(dir.path(), "edge.json", EDGE_BOOKMARKS),
        );

    let host = Arc::new(ExtensionHost::new(
        ExtensionHostConfig {
            search_timeout: Duration::from_secs(5),
        },
        settings.clone(),
        translator.clone(),
    ));

    host.register_action_handler(Arc::new(FavoritesActionHandler::new(settings.clone())))
        .unwrap();
    host.register_action_handler(Arc::new(UrlActionHandler::new(platform.clone())))
        .unwrap();
    host.register_action_handler(Arc::new(ClipboardActionHandler::new(platform.clone())))
        .unwrap();

    host.register(Arc::new(BrowserBookmarks::new(
        Arc::new(repository),
        settings.clone(),
        assets.clone(),
        translator.clone(),
    )))
    .unwrap();
    host.register(Arc::new(DeeplTranslator::new(
        reqwest::Client::new(),
        "http://127.0.0.1:9/v2/translate",
        assets,
        settings.clone(),
        translator,
    )))
    .unwrap();

    Fixture {
        host,
        settings,
        platform,
        _dir: dir,
    }
}

#[tokio::test]
async fn test_refresh_all_aggregates_in_registration_order() {
    let fixture = fixture();

    let items = fixture.host.refresh_all().await;
    let names: Vec<_> = items.iter().map(|i| i.name.as_str()).collect();

    assert_eq!(names, vec!["Rust", "Crates", "DeepL Translator"]);
    assert_eq!(
        fixture.host.extension_ids(),
        vec!["BrowserBookmarks", "DeeplTranslator"]
    );
    assert_eq!(items[2].id, "DeeplTranslator:invoke");
}

#[tokio::test]
async fn test_setting_change_rescans_only_dependent_extensions() {
    let fixture = fixture();
    fixture.host.refresh_all().await;

    fixture
        .settings
        .set_value("BrowserBookmarks.browser", json!("Microsoft Edge"))
        .unwrap();
    let rescanned = fixture
        .host
        .handle_setting_changed("BrowserBookmarks.browser")
        .await;
    assert_eq!(rescanned, vec!["BrowserBookmarks"]);

    let names: Vec<_> = fixture
        .host
        .search_result_items()
        .await
        .into_iter()
        .map(|i| i.name)
        .collect();
    assert_eq!(names, vec!["Docs", "DeepL Translator"]);

    fixture
        .settings
        .set_value("general.language", json!("de-CH"))
        .unwrap();
    let rescanned = fixture.host.handle_setting_changed("general.language").await;
    assert_eq!(rescanned, vec!["DeeplTranslator"]);

    let items = fixture.host.search_result_items().await;
    assert_eq!(items[1].name, "DeepL Übersetzer");
    // Bookmarks were not rescanned, so they keep the previous locale.
    assert_eq!(items[0].description, "Browser Bookmark");
}

#[tokio::test]
async fn test_settings_listener_applies_changes() {
    let fixture = fixture();
    fixture.host.refresh_all().await;
    let listener = fixture.host.spawn_settings_listener();

    fixture
        .settings
        .set_value("BrowserBookmarks.searchResultStyle", json!("urlOnly"))
        .unwrap();

    let mut names = Vec::new();
    for _ in 0..50 {
        names = fixture
            .host
            .search_result_items()
            .await
            .into_iter()
            .map(|i| i.name)
            .collect();
        if names[0] == "https://www.rust-lang.org/" {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    listener.abort();

    assert_eq!(names[0], "https://www.rust-lang.org/");
}

#[tokio::test]
async fn test_dispatch_bookmark_actions() {
    let fixture = fixture();
    let items = fixture.host.refresh_all().await;
    let rust = &items[0];

    let outcome = fixture
        .host
        .dispatch_action(&rust.default_action)
        .await
        .unwrap();
    assert_eq!(outcome, DispatchOutcome::Handled);
    assert_eq!(
        *fixture.platform.opened.lock().unwrap(),
        vec!["https://www.rust-lang.org/"]
    );

    fixture
        .host
        .dispatch_action(&rust.additional_actions[0])
        .await
        .unwrap();
    assert_eq!(fixture.platform.get_text().unwrap(), "https://www.rust-lang.org/");

    fixture
        .host
        .dispatch_action(&rust.additional_actions[1])
        .await
        .unwrap();
    let favorites: Vec<String> = fixture.settings.get_value(FAVORITES_KEY, Vec::new(), false);
    assert_eq!(favorites, vec![rust.id.clone()]);
}

#[tokio::test]
async fn test_dispatch_invoke_extension_action_opens_view() {
    let fixture = fixture();
    let items = fixture.host.refresh_all().await;

    let outcome = fixture
        .host
        .dispatch_action(&items[2].default_action)
        .await
        .unwrap();
    assert_eq!(
        outcome,
        DispatchOutcome::OpenExtension("DeeplTranslator".to_string())
    );
}

#[tokio::test]
async fn test_invoke_deepl_without_api_key() {
    let fixture = fixture();

    let error = fixture
        .host
        .invoke_extension("DeeplTranslator", json!({ "searchTerm": "Hello" }))
        .await
        .unwrap_err();

    assert!(matches!(error, ExtensionError::MissingSetting(_)));
}

#[tokio::test]
async fn test_settings_persist_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");

    {
        let settings = JsonFileSettingsManager::open(path.clone()).unwrap();
        settings
            .set_value("DeeplTranslator.apiKey", json!("secret"))
            .unwrap();
    }

    let settings = JsonFileSettingsManager::open(path).unwrap();
    let key: Option<String> = settings.get_optional_value("DeeplTranslator.apiKey", true);
    assert_eq!(key.as_deref(), Some("secret"));
}
