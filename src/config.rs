use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::builtin::deepl_translator::DEFAULT_API_URL;
use crate::error::{LumenError, LumenResult};
use crate::extensions::ExtensionHostConfig;
use crate::translator::{MissingKeyPolicy, TranslatorOptions};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub translations: TranslationsConfig,
    pub extensions: ExtensionsConfig,
    pub paths: PathsConfig,
    pub deepl: DeeplConfig,
    pub host: HostConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Locale used until the user picks one in the settings.
    pub locale: String,
    pub fallback_locale: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslationsConfig {
    pub missing_key_policy: MissingKeyPolicy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtensionsConfig {
    /// Ids of the built-in extensions to register.
    pub enabled: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub settings_file: String,
    pub assets_dir: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeeplConfig {
    pub api_url: String,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    pub search_timeout_secs: u64,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            locale: "en-US".to_string(),
            fallback_locale: "en-US".to_string(),
        }
    }
}

impl Default for ExtensionsConfig {
    fn default() -> Self {
        Self {
            enabled: vec![
                "BrowserBookmarks".to_string(),
                "DeeplTranslator".to_string(),
            ],
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            settings_file: config_root().join("settings.json").display().to_string(),
            assets_dir: data_root().join("assets").display().to_string(),
        }
    }
}

impl Default for DeeplConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout_secs: 15,
        }
    }
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            search_timeout_secs: 10,
        }
    }
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> PathBuf {
        config_root().join("config.toml")
    }

    /// Load config from the default location, or return defaults if not found
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Load config from `path`. Unreadable or invalid files fall back to defaults.
    pub fn load_from(path: &Path) -> Self {
        let mut config = if path.exists() {
            match Self::read(path) {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!("Failed to load config from {:?}: {}", path, e);
                    Self::default()
                }
            }
        } else {
            Self::default()
        };

        config.validate();
        config
    }

    fn read(path: &Path) -> LumenResult<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Validate and clamp config values to acceptable ranges
    fn validate(&mut self) {
        // Clamp timeouts to 1 - 120 seconds
        self.host.search_timeout_secs = self.host.search_timeout_secs.clamp(1, 120);
        self.deepl.request_timeout_secs = self.deepl.request_timeout_secs.clamp(1, 120);

        if self.deepl.api_url.trim().is_empty() {
            self.deepl.api_url = DEFAULT_API_URL.to_string();
        }
        if self.general.locale.trim().is_empty() {
            self.general.locale = GeneralConfig::default().locale;
        }
        if self.general.fallback_locale.trim().is_empty() {
            self.general.fallback_locale = GeneralConfig::default().fallback_locale;
        }

        let mut seen = std::collections::HashSet::new();
        self.extensions.enabled.retain(|id| seen.insert(id.clone()));
    }

    /// Save config to `path`
    pub fn save_to(&self, path: &Path) -> LumenResult<()> {
        // Create config directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                LumenError::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn settings_file(&self) -> PathBuf {
        expand_path(&self.paths.settings_file)
    }

    pub fn assets_dir(&self) -> PathBuf {
        expand_path(&self.paths.assets_dir)
    }

    pub fn is_enabled(&self, extension_id: &str) -> bool {
        self.extensions.enabled.iter().any(|id| id == extension_id)
    }

    pub fn translator_options(&self) -> TranslatorOptions {
        TranslatorOptions {
            default_locale: self.general.locale.clone(),
            fallback_locale: self.general.fallback_locale.clone(),
            missing_key_policy: self.translations.missing_key_policy,
        }
    }

    pub fn host_config(&self) -> ExtensionHostConfig {
        ExtensionHostConfig {
            search_timeout: Duration::from_secs(self.host.search_timeout_secs),
        }
    }

    pub fn deepl_request_timeout(&self) -> Duration {
        Duration::from_secs(self.deepl.request_timeout_secs)
    }
}

fn config_root() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| {
            // Fallback: ~ is not expanded by PathBuf, so use dirs::home_dir
            dirs::home_dir()
                .map(|h| h.join(".config"))
                .unwrap_or_else(|| PathBuf::from("/tmp"))
        })
        .join("lumen")
}

fn data_root() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| {
            dirs::home_dir()
                .map(|h| h.join(".local").join("share"))
                .unwrap_or_else(|| PathBuf::from("/tmp"))
        })
        .join("lumen")
}

/// Expand `~` and environment variables in a configured path.
pub fn expand_path(path: &str) -> PathBuf {
    match shellexpand::full(path) {
        Ok(expanded) => PathBuf::from(expanded.into_owned()),
        Err(e) => {
            tracing::warn!("Failed to expand path '{}': {}", path, e);
            PathBuf::from(shellexpand::tilde(path).into_owned())
        }
    }
}
