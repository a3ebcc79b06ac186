//! lumen - extension-driven desktop search launcher core.
//!
//! Search results come from extensions. The host fans out to every enabled
//! extension, keeps each one's latest results, rescans extensions when a
//! setting they depend on changes, and routes the actions users pick.
//!
//! # Architecture
//!
//! The library is organized into these main modules:
//!
//! - [`core`] - Search result and action types, standard action factories
//! - [`extensions`] - The extension contract and the extension host
//! - [`handlers`] - Built-in action handlers (favorites, URLs, clipboard)
//! - [`builtin`] - Extensions that ship with lumen (browser bookmarks, DeepL)
//! - [`settings`] - Key/value settings store with change notifications
//! - [`translator`] - Locale-aware translation lookups
//! - [`config`] - Configuration loading and management
//! - [`platform`] - Clipboard and system opener abstractions
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use lumen::{Config, ExtensionHost, JsonFileSettingsManager, Translator};
//!
//! let config = Config::load();
//! let settings = Arc::new(JsonFileSettingsManager::open(config.settings_file())?);
//! let translator = Arc::new(Translator::new(settings.clone(), config.translator_options()));
//! let host = Arc::new(ExtensionHost::new(config.host_config(), settings, translator));
//!
//! host.refresh_all().await;
//! for item in host.search_result_items().await {
//!     println!("{}", item.name);
//! }
//! ```

// Public modules
pub mod assets;
pub mod builtin;
pub mod cli;
pub mod config;
pub mod core;
pub mod extensions;
pub mod handlers;
pub mod hotkey;
pub mod platform;
pub mod settings;
pub mod translator;

// Internal modules
mod error;

// Re-export commonly used types for convenience
pub use config::Config;
pub use crate::core::{Image, SearchResultItem, SearchResultItemAction, TranslationRef};
pub use error::{LumenError, LumenResult};
pub use extensions::{
    ActionHandler, DispatchOutcome, Extension, ExtensionError, ExtensionHost, ExtensionResult,
};
pub use settings::{JsonFileSettingsManager, SettingsManager, SettingsManagerExt};
pub use translator::{Translator, TranslatorOptions};
