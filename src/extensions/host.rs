//! Extension host - owns all extensions and built-in action handlers.
//!
//! The ExtensionHost is responsible for:
//! - Registering extensions and merging their translations
//! - Fanning out result generation and aggregating the results
//! - Rescanning extensions when a setting they depend on changes
//! - Routing actions to built-in handlers or back to their extension

use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use tokio::sync::{broadcast, RwLock as AsyncRwLock};
use tokio::task::JoinHandle;

use crate::core::action_utility::{ACTION_TRANSLATION_NAMESPACE, INVOKE_ACTION};
use crate::core::{Image, SearchResultItem, SearchResultItemAction, TranslationRef};
use crate::settings::SettingsManager;
use crate::translator::{
    action_translations, extension_namespace, TranslationError, TranslationRegistry, Translator,
};

use super::error::{ExtensionError, ExtensionResult};
use super::handler::ActionHandler;
use super::{Author, Extension, ExtensionId};

/// Configuration for the extension host.
#[derive(Debug, Clone)]
pub struct ExtensionHostConfig {
    /// Maximum time a single extension may take to produce its items.
    pub search_timeout: Duration,
}

impl Default for ExtensionHostConfig {
    fn default() -> Self {
        Self {
            search_timeout: Duration::from_secs(10),
        }
    }
}

/// Summary of a registered extension, for settings pages and the CLI.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionInfo {
    pub id: ExtensionId,
    pub name: String,
    pub name_translation: TranslationRef,
    pub author: Author,
    pub is_supported: bool,
    pub image: Image,
}

/// What happened to a dispatched action.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    /// A built-in handler processed the action.
    Handled,
    /// The frontend should open the extension's own view.
    OpenExtension(ExtensionId),
    /// The owning extension processed the action and returned this value.
    Invoked(Value),
}

/// A registered extension and the results of its latest applied rescan.
struct RegisteredExtension {
    extension: Arc<dyn Extension>,
    /// Generation of the most recently started rescan.
    generation: AtomicU64,
    results: AsyncRwLock<Vec<SearchResultItem>>,
}

impl RegisteredExtension {
    fn new(extension: Arc<dyn Extension>) -> Self {
        Self {
            extension,
            generation: AtomicU64::new(0),
            results: AsyncRwLock::new(Vec::new()),
        }
    }

    fn id(&self) -> &str {
        self.extension.id()
    }

    /// `is_supported` guarded against panicking implementations.
    fn is_supported(&self) -> bool {
        match std::panic::catch_unwind(AssertUnwindSafe(|| self.extension.is_supported())) {
            Ok(supported) => supported,
            Err(_) => {
                tracing::warn!(
                    "Extension '{}' panicked in is_supported, treating as unsupported",
                    self.id()
                );
                false
            }
        }
    }

    fn triggers_rescan(&self, key: &str) -> bool {
        self.extension
            .get_setting_keys_triggering_rescan()
            .iter()
            .any(|k| k == key)
    }

    /// Store `items` unless a newer rescan was started after `generation`.
    async fn apply(&self, generation: u64, items: Vec<SearchResultItem>) -> bool {
        let mut results = self.results.write().await;
        let latest = self.generation.load(Ordering::SeqCst);
        if generation != latest {
            tracing::debug!(
                "Discarding stale results of '{}' (generation {}, latest {})",
                self.id(),
                generation,
                latest
            );
            return false;
        }
        *results = items;
        true
    }
}

/// Run one result cycle for an extension and apply it.
///
/// Returns whether the results were applied.
async fn run_rescan(entry: Arc<RegisteredExtension>, timeout: Duration) -> bool {
    let generation = entry.generation.fetch_add(1, Ordering::SeqCst) + 1;

    if !entry.is_supported() {
        tracing::debug!("Extension '{}' is not supported, clearing results", entry.id());
        entry.apply(generation, Vec::new()).await;
        return false;
    }

    let items = fetch_items(&entry, timeout).await;
    entry.apply(generation, items).await
}

/// Fetch an extension's items in its own task.
///
/// Errors, panics and timeouts are logged and yield no items.
async fn fetch_items(entry: &RegisteredExtension, timeout: Duration) -> Vec<SearchResultItem> {
    let extension = Arc::clone(&entry.extension);
    let handle = tokio::spawn(async move { extension.get_search_result_items().await });
    let abort = handle.abort_handle();

    match tokio::time::timeout(timeout, handle).await {
        Ok(Ok(Ok(items))) => {
            tracing::debug!("Extension '{}' produced {} items", entry.id(), items.len());
            items
        }
        Ok(Ok(Err(e))) => {
            tracing::warn!("Extension '{}' failed to produce results: {}", entry.id(), e);
            Vec::new()
        }
        Ok(Err(e)) => {
            tracing::warn!("Extension '{}' task failed: {}", entry.id(), e);
            Vec::new()
        }
        Err(_) => {
            abort.abort();
            tracing::warn!(
                "Extension '{}' timed out after {:?}",
                entry.id(),
                timeout
            );
            Vec::new()
        }
    }
}

/// The extension host aggregates all extensions behind one query surface.
pub struct ExtensionHost {
    /// Configuration.
    config: ExtensionHostConfig,

    /// Registered extensions in registration order.
    extensions: RwLock<Vec<Arc<RegisteredExtension>>>,

    /// Built-in action handlers by handler id.
    handlers: RwLock<HashMap<String, Arc<dyn ActionHandler>>>,

    settings: Arc<dyn SettingsManager>,

    translator: Arc<Translator>,

    /// Translations of all extensions and built-ins.
    translations: TranslationRegistry,
}

impl ExtensionHost {
    pub fn new(
        config: ExtensionHostConfig,
        settings: Arc<dyn SettingsManager>,
        translator: Arc<Translator>,
    ) -> Self {
        let translations = TranslationRegistry::new();
        translations.merge(ACTION_TRANSLATION_NAMESPACE, action_translations());

        Self {
            config,
            extensions: RwLock::new(Vec::new()),
            handlers: RwLock::new(HashMap::new()),
            settings,
            translator,
            translations,
        }
    }

    /// Register an extension. Ids must be unique across extensions and handlers.
    pub fn register(&self, extension: Arc<dyn Extension>) -> ExtensionResult<()> {
        let id = extension.id().to_string();

        if self.handler(&id).is_some() {
            return Err(ExtensionError::AlreadyRegistered(id));
        }

        let mut extensions = self.extensions.write().unwrap_or_else(|e| e.into_inner());
        if extensions.iter().any(|e| e.id() == id) {
            return Err(ExtensionError::AlreadyRegistered(id));
        }

        self.translations
            .merge(&extension_namespace(&id), extension.get_translations());
        extensions.push(Arc::new(RegisteredExtension::new(extension)));

        tracing::debug!("Registered extension '{}'", id);
        Ok(())
    }

    /// Register a built-in action handler.
    pub fn register_action_handler(&self, handler: Arc<dyn ActionHandler>) -> ExtensionResult<()> {
        let id = handler.id().to_string();

        if self.entry(&id).is_some() {
            return Err(ExtensionError::HandlerAlreadyRegistered(id));
        }

        let mut handlers = self.handlers.write().unwrap_or_else(|e| e.into_inner());
        if handlers.contains_key(&id) {
            return Err(ExtensionError::HandlerAlreadyRegistered(id));
        }
        handlers.insert(id.clone(), handler);

        tracing::debug!("Registered action handler '{}'", id);
        Ok(())
    }

    fn entries(&self) -> Vec<Arc<RegisteredExtension>> {
        self.extensions
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn entry(&self, extension_id: &str) -> Option<Arc<RegisteredExtension>> {
        self.entries().into_iter().find(|e| e.id() == extension_id)
    }

    fn handler(&self, handler_id: &str) -> Option<Arc<dyn ActionHandler>> {
        self.handlers
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(handler_id)
            .cloned()
    }

    /// Ids of all registered extensions in registration order.
    pub fn extension_ids(&self) -> Vec<ExtensionId> {
        self.entries().iter().map(|e| e.id().to_string()).collect()
    }

    pub fn extension(&self, extension_id: &str) -> Option<Arc<dyn Extension>> {
        self.entry(extension_id).map(|e| Arc::clone(&e.extension))
    }

    pub fn extension_infos(&self) -> Vec<ExtensionInfo> {
        self.entries()
            .iter()
            .map(|entry| {
                let extension = &entry.extension;
                ExtensionInfo {
                    id: extension.id().to_string(),
                    name: extension.name().to_string(),
                    name_translation: extension.name_translation(),
                    author: extension.author().clone(),
                    is_supported: entry.is_supported(),
                    image: extension.get_image(),
                }
            })
            .collect()
    }

    /// Regenerate the results of every extension concurrently.
    ///
    /// Returns the aggregated results in registration order.
    pub async fn refresh_all(&self) -> Vec<SearchResultItem> {
        let timeout = self.config.search_timeout;
        let tasks: Vec<JoinHandle<bool>> = self
            .entries()
            .into_iter()
            .map(|entry| tokio::spawn(run_rescan(entry, timeout)))
            .collect();

        for task in tasks {
            if let Err(e) = task.await {
                tracing::warn!("Rescan task failed: {}", e);
            }
        }

        self.search_result_items().await
    }

    /// Rescan a single extension.
    ///
    /// Returns `Ok(false)` when a newer rescan superseded this one or the
    /// extension is not supported.
    pub async fn rescan(&self, extension_id: &str) -> ExtensionResult<bool> {
        let entry = self
            .entry(extension_id)
            .ok_or_else(|| ExtensionError::NotFound(extension_id.to_string()))?;
        Ok(run_rescan(entry, self.config.search_timeout).await)
    }

    /// Rescan every supported extension that depends on `key`.
    ///
    /// Returns the ids of the rescanned extensions.
    pub async fn handle_setting_changed(&self, key: &str) -> Vec<ExtensionId> {
        let affected: Vec<Arc<RegisteredExtension>> = self
            .entries()
            .into_iter()
            .filter(|entry| entry.is_supported() && entry.triggers_rescan(key))
            .collect();

        if affected.is_empty() {
            return Vec::new();
        }

        let ids: Vec<ExtensionId> = affected.iter().map(|e| e.id().to_string()).collect();
        tracing::debug!("Setting '{}' changed, rescanning {:?}", key, ids);

        let timeout = self.config.search_timeout;
        let tasks: Vec<JoinHandle<bool>> = affected
            .into_iter()
            .map(|entry| tokio::spawn(run_rescan(entry, timeout)))
            .collect();
        for task in tasks {
            if let Err(e) = task.await {
                tracing::warn!("Rescan task failed: {}", e);
            }
        }

        ids
    }

    /// Listen for settings changes and rescan affected extensions.
    ///
    /// Each change is handled in its own task, so a slow extension does not
    /// delay rescans of others; overlapping rescans of one extension resolve
    /// to the last started one.
    pub fn spawn_settings_listener(self: &Arc<Self>) -> JoinHandle<()> {
        let host = Arc::clone(self);
        let mut rx = self.settings.subscribe();

        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(change) => {
                        let host = Arc::clone(&host);
                        tokio::spawn(async move {
                            host.handle_setting_changed(&change.key).await;
                        });
                    }
                    Err(broadcast::error::RecvError::Lagged(missed)) => {
                        tracing::warn!("Missed {} settings changes, rescanning everything", missed);
                        let host = Arc::clone(&host);
                        tokio::spawn(async move {
                            host.refresh_all().await;
                        });
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    }

    /// Current aggregated results: registration order, then extension order.
    pub async fn search_result_items(&self) -> Vec<SearchResultItem> {
        let mut all = Vec::new();
        for entry in self.entries() {
            all.extend(entry.results.read().await.iter().cloned());
        }
        all
    }

    /// Find an item in the current results by id.
    pub async fn find_item(&self, item_id: &str) -> Option<SearchResultItem> {
        for entry in self.entries() {
            let results = entry.results.read().await;
            if let Some(item) = results.iter().find(|item| item.id == item_id) {
                return Some(item.clone());
            }
        }
        None
    }

    /// Route an action to its handler.
    ///
    /// Errors are returned to the caller; actions are user-initiated and
    /// failures must be visible.
    pub async fn dispatch_action(
        &self,
        action: &SearchResultItemAction,
    ) -> ExtensionResult<DispatchOutcome> {
        if let Some(handler) = self.handler(&action.handler_id) {
            handler.invoke(action).await?;
            return Ok(DispatchOutcome::Handled);
        }

        if self.entry(&action.handler_id).is_none() {
            return Err(ExtensionError::HandlerNotFound(action.handler_id.clone()));
        }

        let argument = action
            .argument_json()
            .map_err(|e| ExtensionError::MalformedArgument(e.to_string()))?;

        if argument.get("action").and_then(Value::as_str) == Some(INVOKE_ACTION) {
            return Ok(DispatchOutcome::OpenExtension(action.handler_id.clone()));
        }

        self.invoke_extension(&action.handler_id, argument)
            .await
            .map(DispatchOutcome::Invoked)
    }

    /// Invoke an extension directly, e.g. from its own view.
    pub async fn invoke_extension(
        &self,
        extension_id: &str,
        argument: Value,
    ) -> ExtensionResult<Value> {
        let entry = self
            .entry(extension_id)
            .ok_or_else(|| ExtensionError::NotFound(extension_id.to_string()))?;

        if !entry.is_supported() {
            return Err(ExtensionError::NotInvokable(extension_id.to_string()));
        }

        entry.extension.invoke(argument).await
    }

    /// Default value of an extension setting, for settings pages.
    pub fn setting_default_value(&self, extension_id: &str, key: &str) -> ExtensionResult<Value> {
        self.extension(extension_id)
            .ok_or_else(|| ExtensionError::NotFound(extension_id.to_string()))?
            .get_setting_default_value(key)
    }

    /// Translate a reference using the merged translation registry.
    pub fn translate(&self, reference: &TranslationRef) -> Result<String, TranslationError> {
        self.translations.translate(&self.translator, reference)
    }

    pub fn settings(&self) -> &Arc<dyn SettingsManager> {
        &self.settings
    }
}
