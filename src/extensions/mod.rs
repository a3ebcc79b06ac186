//! Extension system for lumen.
//!
//! Every search provider implements the [`Extension`] trait. The
//! [`ExtensionHost`] owns all registered extensions and the built-in
//! [`ActionHandler`]s, aggregates results and routes actions.
//!
//! # Architecture
//!
//! ```text
//! ExtensionHost
//! ├── extensions: Vec<RegisteredExtension>     (registration order)
//! │   ├── extension: Arc<dyn Extension>
//! │   ├── generation: AtomicU64                (last started rescan)
//! │   └── results: RwLock<Vec<SearchResultItem>>
//! ├── handlers: HashMap<handler id, Arc<dyn ActionHandler>>
//! ├── translations: TranslationRegistry        (merged once per extension)
//! └── settings: Arc<dyn SettingsManager>       (change channel -> rescans)
//! ```
//!
//! Results are produced by fanning out one tokio task per supported extension.
//! A failing or panicking extension contributes no items; its siblings are
//! unaffected. Settings changes rescan only the extensions that list the key in
//! [`Extension::get_setting_keys_triggering_rescan`], and a rescan only lands if
//! no newer rescan of the same extension was started in the meantime.

mod error;
mod handler;
mod host;

use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::{Image, SearchResultItem, TranslationRef};
use crate::translator::Translations;

pub use error::{ExtensionError, ExtensionResult};
pub use handler::ActionHandler;
pub use host::{DispatchOutcome, ExtensionHost, ExtensionHostConfig, ExtensionInfo};

/// Unique identifier for an extension.
pub type ExtensionId = String;

/// Attribution metadata of an extension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub name: String,
    pub github_user_name: String,
}

/// The contract every search provider fulfils.
///
/// Extensions are constructed once at startup with their dependencies injected
/// and live for the rest of the process.
#[async_trait]
pub trait Extension: Send + Sync {
    /// Stable id, also the namespace for settings keys and assets.
    fn id(&self) -> &str;

    fn name(&self) -> &str;

    fn name_translation(&self) -> TranslationRef;

    fn author(&self) -> &Author;

    /// Produce the extension's items for the current settings.
    ///
    /// Must not mutate state shared with other extensions.
    async fn get_search_result_items(&self) -> ExtensionResult<Vec<SearchResultItem>>;

    /// Synchronous capability probe, evaluated before every cycle.
    fn is_supported(&self) -> bool;

    /// Default value of a declared setting.
    ///
    /// Fails with [`ExtensionError::UnknownSetting`] for undeclared keys only.
    fn get_setting_default_value(&self, key: &str) -> ExtensionResult<Value>;

    /// Fully-qualified keys whose change requires a rescan of this extension.
    fn get_setting_keys_triggering_rescan(&self) -> Vec<String>;

    fn get_image(&self) -> Image;

    /// Path of an asset variant, e.g. the icon of a specific browser.
    fn get_asset_file_path(&self, key: &str) -> ExtensionResult<PathBuf> {
        Err(ExtensionError::UnknownAsset {
            extension: self.id().to_string(),
            key: key.to_string(),
        })
    }

    /// Static translation table, merged once at registration.
    fn get_translations(&self) -> Translations;

    /// Handle an action addressed to this extension.
    async fn invoke(&self, _argument: Value) -> ExtensionResult<Value> {
        Err(ExtensionError::NotInvokable(self.id().to_string()))
    }
}
