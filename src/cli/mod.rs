//! CLI commands for lumen.
//!
//! Drives the extension host from a terminal: list results, run actions,
//! invoke extensions and edit settings.

use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use serde_json::Value;

use crate::core::SearchResultItem;
use crate::extensions::{DispatchOutcome, ExtensionHost};
use crate::hotkey::is_valid_hotkey;
use crate::settings::{SettingsManagerExt, GENERAL_HOTKEY_KEY};

#[derive(Parser)]
#[command(name = "lumen")]
#[command(about = "Extension-driven desktop search launcher", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to the config file (default: <config dir>/lumen/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<std::path::PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the search results of all enabled extensions
    Search {
        /// Only show results whose name or description contains this text
        query: Option<String>,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// List registered extensions
    Extensions,

    /// Invoke an extension with a JSON argument
    Invoke {
        /// Extension id, e.g. DeeplTranslator
        id: String,

        /// Argument as JSON, e.g. '{"searchTerm":"Hello","targetLanguage":"DE"}'
        argument: String,
    },

    /// Run an action of a search result
    Dispatch {
        /// Id of the search result
        item_id: String,

        /// Action index: 0 is the default action, 1.. the additional actions
        #[arg(long, default_value_t = 0)]
        action: usize,
    },

    /// Read or write settings
    Settings {
        #[command(subcommand)]
        what: SettingsCommands,
    },

    /// Set the global hotkey (e.g., 'Alt+Space')
    SetHotkey {
        accelerator: String,
    },
}

#[derive(Subcommand)]
pub enum SettingsCommands {
    /// Print a setting, or the extension default if it was never written
    Get { key: String },

    /// Write a setting. Values that are not valid JSON are stored as strings
    Set { key: String, value: String },
}

/// Run a parsed command against a fully wired host.
pub async fn run(command: Commands, host: Arc<ExtensionHost>) -> anyhow::Result<()> {
    match command {
        Commands::Search { query, json } => {
            host.refresh_all().await;
            let items: Vec<_> = host
                .search_result_items()
                .await
                .into_iter()
                .filter(|item| matches_query(item, query.as_deref()))
                .collect();

            if json {
                println!("{}", serde_json::to_string_pretty(&items)?);
            } else {
                for item in &items {
                    println!("{}\t{}\t{}", item.id, item.name, item.description);
                }
            }
        }
        Commands::Extensions => {
            for info in host.extension_infos() {
                let name = host
                    .translate(&info.name_translation)
                    .unwrap_or_else(|_| info.name.clone());
                let status = if info.is_supported {
                    "supported"
                } else {
                    "unsupported"
                };
                println!("{}\t{}\t{}\t{}", info.id, name, info.author.name, status);
            }
        }
        Commands::Invoke { id, argument } => {
            let argument: Value =
                serde_json::from_str(&argument).context("Argument must be valid JSON")?;
            let result = host.invoke_extension(&id, argument).await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Commands::Dispatch { item_id, action } => {
            host.refresh_all().await;
            let item = host
                .find_item(&item_id)
                .await
                .with_context(|| format!("No search result with id '{}'", item_id))?;
            let selected = item
                .actions()
                .nth(action)
                .with_context(|| format!("'{}' has no action #{}", item_id, action))?;

            tracing::info!("Running '{}' on '{}'", selected.description, item.name);
            match host.dispatch_action(selected).await {
                Ok(DispatchOutcome::Handled) => {}
                Ok(DispatchOutcome::OpenExtension(id)) => {
                    println!("Open extension view: {}", id);
                }
                Ok(DispatchOutcome::Invoked(value)) => {
                    println!("{}", serde_json::to_string_pretty(&value)?);
                }
                Err(e) => {
                    tracing::error!("Action failed: {}", e);
                    return Err(e.into());
                }
            }
        }
        Commands::Settings { what } => match what {
            SettingsCommands::Get { key } => match setting_or_default(&host, &key) {
                Some(value) => println!("{}", value),
                None => bail!("Setting '{}' is not set", key),
            },
            SettingsCommands::Set { key, value } => {
                let value = serde_json::from_str(&value).unwrap_or(Value::String(value));
                host.settings().set_value(&key, value)?;
            }
        },
        Commands::SetHotkey { accelerator } => {
            if !is_valid_hotkey(&accelerator) {
                bail!("Invalid hotkey '{}'", accelerator);
            }
            host.settings()
                .set_value(GENERAL_HOTKEY_KEY, Value::String(accelerator.clone()))?;
            println!("Hotkey set to {}", accelerator);
        }
    }

    Ok(())
}

fn matches_query(item: &SearchResultItem, query: Option<&str>) -> bool {
    let Some(query) = query.map(str::to_lowercase) else {
        return true;
    };
    item.name.to_lowercase().contains(&query) || item.description.to_lowercase().contains(&query)
}

/// Stored value of `key`, falling back to the owning extension's default.
fn setting_or_default(host: &ExtensionHost, key: &str) -> Option<Value> {
    if let Some(value) = host.settings().get_optional_value::<Value>(key, false) {
        return Some(value);
    }
    let (extension_id, name) = key.split_once('.')?;
    host.setting_default_value(extension_id, name).ok()
}
