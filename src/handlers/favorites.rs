//! Favorites handler - keeps the list of favorite result ids in the settings store.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::core::action_utility::FAVORITES_HANDLER_ID;
use crate::core::SearchResultItemAction;
use crate::extensions::{ActionHandler, ExtensionError, ExtensionResult};
use crate::settings::{SettingsManager, SettingsManagerExt, FAVORITES_KEY};

use super::parse_argument;

#[derive(Debug, Deserialize)]
#[serde(tag = "action")]
enum FavoritesArgument {
    Add { id: String },
    Remove { id: String },
}

pub struct FavoritesActionHandler {
    settings: Arc<dyn SettingsManager>,
    /// Serializes the read-modify-write of the favorites list.
    update: Mutex<()>,
}

impl FavoritesActionHandler {
    pub fn new(settings: Arc<dyn SettingsManager>) -> Self {
        Self {
            settings,
            update: Mutex::new(()),
        }
    }

    /// Favorite ids in the order they were added.
    pub fn favorites(&self) -> Vec<String> {
        self.settings.get_value(FAVORITES_KEY, Vec::new(), false)
    }

    fn store(&self, favorites: Vec<String>) -> ExtensionResult<()> {
        self.settings
            .set_value(FAVORITES_KEY, serde_json::json!(favorites))
            .map_err(|e| ExtensionError::Settings(e.to_string()))
    }
}

#[async_trait]
impl ActionHandler for FavoritesActionHandler {
    fn id(&self) -> &str {
        FAVORITES_HANDLER_ID
    }

    async fn invoke(&self, action: &SearchResultItemAction) -> ExtensionResult<()> {
        let argument = parse_argument::<FavoritesArgument>(self.id(), &action.argument)?;

        let _guard = self.update.lock().await;
        let mut favorites = self.favorites();

        match argument {
            FavoritesArgument::Add { id } => {
                if favorites.contains(&id) {
                    return Ok(());
                }
                tracing::debug!("Adding '{}' to favorites", id);
                favorites.push(id);
            }
            FavoritesArgument::Remove { id } => {
                let before = favorites.len();
                favorites.retain(|f| f != &id);
                if favorites.len() == before {
                    return Ok(());
                }
                tracing::debug!("Removed '{}' from favorites", id);
            }
        }

        self.store(favorites)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::action_utility::{
        create_add_to_favorites_action, create_remove_from_favorites_action, FavoritesOptions,
    };
    use crate::settings::JsonFileSettingsManager;

    fn options(id: &str) -> FavoritesOptions<'_> {
        FavoritesOptions {
            id,
            keyboard_shortcut: None,
        }
    }

    #[tokio::test]
    async fn test_add_and_remove_favorites() {
        let handler = FavoritesActionHandler::new(Arc::new(JsonFileSettingsManager::in_memory()));

        handler
            .invoke(&create_add_to_favorites_action(options("a")))
            .await
            .unwrap();
        handler
            .invoke(&create_add_to_favorites_action(options("b")))
            .await
            .unwrap();
        // Adding twice keeps a single entry.
        handler
            .invoke(&create_add_to_favorites_action(options("a")))
            .await
            .unwrap();
        assert_eq!(handler.favorites(), vec!["a", "b"]);

        handler
            .invoke(&create_remove_from_favorites_action(options("a")))
            .await
            .unwrap();
        handler
            .invoke(&create_remove_from_favorites_action(options("missing")))
            .await
            .unwrap();
        assert_eq!(handler.favorites(), vec!["b"]);
    }

    #[tokio::test]
    async fn test_unknown_favorites_action_fails() {
        let handler = FavoritesActionHandler::new(Arc::new(JsonFileSettingsManager::in_memory()));
        let mut action = create_add_to_favorites_action(options("a"));
        action.argument = r#"{"action":"Toggle","id":"a"}"#.to_string();

        assert!(matches!(
            handler.invoke(&action).await,
            Err(ExtensionError::MalformedArgument(_))
        ));
        assert!(handler.favorites().is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_adds_keep_every_favorite() {
        let dir = tempfile::tempdir().unwrap();
        let settings =
            Arc::new(JsonFileSettingsManager::open(dir.path().join("settings.json")).unwrap());
        let handler = Arc::new(FavoritesActionHandler::new(settings.clone()));

        let tasks: Vec<_> = (0..16)
            .map(|i| {
                let handler = handler.clone();
                tokio::spawn(async move {
                    let id = format!("item-{}", i);
                    handler
                        .invoke(&create_add_to_favorites_action(options(&id)))
                        .await
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let mut favorites = handler.favorites();
        favorites.sort();
        let mut expected: Vec<_> = (0..16).map(|i| format!("item-{}", i)).collect();
        expected.sort();
        assert_eq!(favorites, expected);

        let stored: Vec<String> = settings.get_value(FAVORITES_KEY, Vec::new(), false);
        assert_eq!(stored.len(), 16);
    }
}
