//! Translation tables and lookups.
//!
//! Every extension ships a [`Translations`] table (locale -> key -> text). The
//! [`Translator`] resolves the active locale from the settings store and turns
//! a table into a [`TranslationLookup`]. What happens when a key or a whole
//! locale is missing is decided by the configured [`MissingKeyPolicy`].

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::TranslationRef;
use crate::settings::{SettingsManager, SettingsManagerExt, GENERAL_LANGUAGE_KEY};

/// Locale tag -> translation key -> localized text.
pub type Translations = BTreeMap<String, BTreeMap<String, String>>;

/// Build a [`Translations`] table from static slices.
pub fn translations(locales: &[(&str, &[(&str, &str)])]) -> Translations {
    locales
        .iter()
        .map(|(locale, entries)| {
            let entries = entries
                .iter()
                .map(|(key, text)| (key.to_string(), text.to_string()))
                .collect();
            (locale.to_string(), entries)
        })
        .collect()
}

/// Behavior when a key is found neither in the active nor the fallback locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingKeyPolicy {
    /// Return the key itself.
    #[default]
    Key,
    /// Return an empty string.
    Empty,
    /// Fail the lookup.
    Error,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TranslationError {
    #[error("Missing translation for '{key}' in locale '{locale}'")]
    MissingKey { key: String, locale: String },

    #[error("No translations for locale '{locale}' or fallback '{fallback}'")]
    MissingLocale { locale: String, fallback: String },

    #[error("Unknown translation namespace '{0}'")]
    UnknownNamespace(String),
}

/// Options for [`Translator`].
#[derive(Debug, Clone)]
pub struct TranslatorOptions {
    /// Locale used when the `general.language` setting is unset.
    pub default_locale: String,
    /// Locale consulted when the active locale lacks a key.
    pub fallback_locale: String,
    pub missing_key_policy: MissingKeyPolicy,
}

impl Default for TranslatorOptions {
    fn default() -> Self {
        Self {
            default_locale: "en-US".to_string(),
            fallback_locale: "en-US".to_string(),
            missing_key_policy: MissingKeyPolicy::Key,
        }
    }
}

/// Resolves translation tables against the current locale.
pub struct Translator {
    settings: Arc<dyn SettingsManager>,
    options: TranslatorOptions,
}

impl Translator {
    pub fn new(settings: Arc<dyn SettingsManager>, options: TranslatorOptions) -> Self {
        Self { settings, options }
    }

    /// The active locale, read from the settings store on every call.
    pub fn current_locale(&self) -> String {
        self.settings.get_value(
            GENERAL_LANGUAGE_KEY,
            self.options.default_locale.clone(),
            false,
        )
    }

    /// Create a lookup for `translations` in the current locale.
    ///
    /// Entries of the fallback locale are used for keys the active locale does
    /// not define.
    pub fn create_instance(&self, translations: &Translations) -> TranslationLookup {
        let locale = self.current_locale();
        let fallback = &self.options.fallback_locale;

        let mut entries = translations.get(fallback).cloned().unwrap_or_default();
        let has_locale = match translations.get(&locale) {
            Some(active) => {
                entries.extend(active.iter().map(|(k, v)| (k.clone(), v.clone())));
                true
            }
            None => false,
        };

        if !has_locale {
            tracing::debug!(
                "No translations for locale '{}', using fallback '{}'",
                locale,
                fallback
            );
        }

        TranslationLookup {
            locale,
            fallback: fallback.clone(),
            has_locale: has_locale || translations.contains_key(fallback),
            entries,
            policy: self.options.missing_key_policy,
        }
    }
}

/// Key lookup bound to one locale.
#[derive(Debug, Clone)]
pub struct TranslationLookup {
    locale: String,
    fallback: String,
    /// Whether either the active or the fallback locale had a table.
    has_locale: bool,
    entries: BTreeMap<String, String>,
    policy: MissingKeyPolicy,
}

impl TranslationLookup {
    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Translate `key`, applying the missing-key policy if it is unknown.
    pub fn t(&self, key: &str) -> Result<String, TranslationError> {
        if let Some(text) = self.entries.get(key) {
            return Ok(text.clone());
        }

        match self.policy {
            MissingKeyPolicy::Key => Ok(key.to_string()),
            MissingKeyPolicy::Empty => Ok(String::new()),
            MissingKeyPolicy::Error if !self.has_locale => Err(TranslationError::MissingLocale {
                locale: self.locale.clone(),
                fallback: self.fallback.clone(),
            }),
            MissingKeyPolicy::Error => Err(TranslationError::MissingKey {
                key: key.to_string(),
                locale: self.locale.clone(),
            }),
        }
    }
}

/// Translation tables of all registered extensions and built-ins, by namespace.
#[derive(Default)]
pub struct TranslationRegistry {
    namespaces: RwLock<BTreeMap<String, Translations>>,
}

impl TranslationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge a table into a namespace. Existing keys are overwritten.
    pub fn merge(&self, namespace: &str, translations: Translations) {
        let mut namespaces = self.namespaces.write().unwrap_or_else(|e| e.into_inner());
        let target = namespaces.entry(namespace.to_string()).or_default();
        for (locale, entries) in translations {
            target.entry(locale).or_default().extend(entries);
        }
    }

    /// Translate a reference with the given translator.
    pub fn translate(
        &self,
        translator: &Translator,
        reference: &TranslationRef,
    ) -> Result<String, TranslationError> {
        let table = self
            .namespaces
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(&reference.namespace)
            .cloned()
            .ok_or_else(|| TranslationError::UnknownNamespace(reference.namespace.clone()))?;

        translator.create_instance(&table).t(&reference.key)
    }
}

/// Namespace under which an extension's translations are registered.
pub fn extension_namespace(extension_id: &str) -> String {
    format!("extension[{}]", extension_id)
}

/// Translations of the standard actions in [`crate::core::action_utility`].
pub fn action_translations() -> Translations {
    translations(&[
        (
            "en-US",
            &[
                ("addToFavorites", "Add to favorites"),
                ("removeFromFavorites", "Remove from favorites"),
                ("openUrl", "Open URL"),
                ("copyToClipboard", "Copy to clipboard"),
            ],
        ),
        (
            "de-CH",
            &[
                ("addToFavorites", "Zu Favoriten hinzufügen"),
                ("removeFromFavorites", "Von Favoriten entfernen"),
                ("openUrl", "URL öffnen"),
                ("copyToClipboard", "In Zwischenablage kopieren"),
            ],
        ),
    ])
}
