//! Factories for the standard result actions.
//!
//! Every factory is pure: the same input always produces the same action,
//! byte for byte. Arguments are built as `serde_json::Value` objects, whose
//! keys always serialize in sorted order, so the encoded string is stable.

use serde_json::json;

use super::search_result::{SearchResultItemAction, TranslationRef};

/// Handler id of the built-in favorites handler.
pub const FAVORITES_HANDLER_ID: &str = "Favorites";

/// Handler id of the built-in URL handler.
pub const URL_HANDLER_ID: &str = "Url";

/// Handler id of the built-in clipboard handler.
pub const CLIPBOARD_HANDLER_ID: &str = "Clipboard";

/// Translation namespace for the descriptions of the standard actions.
pub const ACTION_TRANSLATION_NAMESPACE: &str = "searchResultItemAction";

/// Discriminator of the invoke-extension argument.
pub const INVOKE_ACTION: &str = "Invoke";

/// Input for [`create_invoke_extension_action`].
#[derive(Debug, Clone, Copy)]
pub struct InvokeExtensionOptions<'a> {
    pub extension_id: &'a str,
    pub description: &'a str,
    pub fluent_icon: Option<&'a str>,
}

/// Input for the favorites factories.
#[derive(Debug, Clone, Copy)]
pub struct FavoritesOptions<'a> {
    pub id: &'a str,
    pub keyboard_shortcut: Option<&'a str>,
}

/// Input for [`create_open_url_action`].
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenUrlOptions<'a> {
    pub url: &'a str,
    /// Overrides the default "Open URL" label.
    pub description: Option<&'a str>,
    pub keyboard_shortcut: Option<&'a str>,
}

/// Input for [`create_copy_to_clipboard_action`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CopyToClipboardOptions<'a> {
    pub text: &'a str,
    /// Overrides the default "Copy to clipboard" label.
    pub description: Option<&'a str>,
    /// Overrides the default translation reference, used together with `description`.
    pub description_translation: Option<(&'a str, &'a str)>,
    pub keyboard_shortcut: Option<&'a str>,
}

/// Action that hands control to the extension itself (`handler_id == extension_id`).
pub fn create_invoke_extension_action(options: InvokeExtensionOptions<'_>) -> SearchResultItemAction {
    SearchResultItemAction {
        argument: json!({
            "action": INVOKE_ACTION,
            "extensionId": options.extension_id,
        })
        .to_string(),
        description: options.description.to_string(),
        description_translation: None,
        handler_id: options.extension_id.to_string(),
        fluent_icon: Some(options.fluent_icon.unwrap_or("OpenRegular").to_string()),
        keyboard_shortcut: None,
    }
}

pub fn create_add_to_favorites_action(options: FavoritesOptions<'_>) -> SearchResultItemAction {
    SearchResultItemAction {
        argument: json!({ "action": "Add", "id": options.id }).to_string(),
        description: "Add to favorites".to_string(),
        description_translation: Some(TranslationRef::new(
            "addToFavorites",
            ACTION_TRANSLATION_NAMESPACE,
        )),
        handler_id: FAVORITES_HANDLER_ID.to_string(),
        fluent_icon: Some("StarRegular".to_string()),
        keyboard_shortcut: options.keyboard_shortcut.map(str::to_string),
    }
}

pub fn create_remove_from_favorites_action(options: FavoritesOptions<'_>) -> SearchResultItemAction {
    SearchResultItemAction {
        argument: json!({ "action": "Remove", "id": options.id }).to_string(),
        description: "Remove from favorites".to_string(),
        description_translation: Some(TranslationRef::new(
            "removeFromFavorites",
            ACTION_TRANSLATION_NAMESPACE,
        )),
        handler_id: FAVORITES_HANDLER_ID.to_string(),
        fluent_icon: Some("StarOffRegular".to_string()),
        keyboard_shortcut: options.keyboard_shortcut.map(str::to_string),
    }
}

pub fn create_open_url_action(options: OpenUrlOptions<'_>) -> SearchResultItemAction {
    let (description, description_translation) = match options.description {
        Some(description) => (description.to_string(), None),
        None => (
            "Open URL".to_string(),
            Some(TranslationRef::new("openUrl", ACTION_TRANSLATION_NAMESPACE)),
        ),
    };

    SearchResultItemAction {
        argument: json!({ "action": "Open", "url": options.url }).to_string(),
        description,
        description_translation,
        handler_id: URL_HANDLER_ID.to_string(),
        fluent_icon: Some("OpenRegular".to_string()),
        keyboard_shortcut: options.keyboard_shortcut.map(str::to_string),
    }
}

pub fn create_copy_to_clipboard_action(
    options: CopyToClipboardOptions<'_>,
) -> SearchResultItemAction {
    let (description, description_translation) = match options.description {
        Some(description) => (
            description.to_string(),
            options
                .description_translation
                .map(|(key, namespace)| TranslationRef::new(key, namespace)),
        ),
        None => (
            "Copy to clipboard".to_string(),
            Some(TranslationRef::new(
                "copyToClipboard",
                ACTION_TRANSLATION_NAMESPACE,
            )),
        ),
    };

    SearchResultItemAction {
        argument: json!({ "action": "Copy", "text": options.text }).to_string(),
        description,
        description_translation,
        handler_id: CLIPBOARD_HANDLER_ID.to_string(),
        fluent_icon: Some("CopyRegular".to_string()),
        keyboard_shortcut: options.keyboard_shortcut.map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_remove_from_favorites_action() {
        let actual = create_remove_from_favorites_action(FavoritesOptions {
            id: "id_1",
            keyboard_shortcut: Some("test-keyboard-shortcut"),
        });

        let expected = SearchResultItemAction {
            argument: r#"{"action":"Remove","id":"id_1"}"#.to_string(),
            description: "Remove from favorites".to_string(),
            description_translation: Some(TranslationRef::new(
                "removeFromFavorites",
                "searchResultItemAction",
            )),
            handler_id: "Favorites".to_string(),
            fluent_icon: Some("StarOffRegular".to_string()),
            keyboard_shortcut: Some("test-keyboard-shortcut".to_string()),
        };

        assert_eq!(actual, expected);
    }

    #[test]
    fn test_remove_from_favorites_argument_roundtrip() {
        for id in ["", "id_1", "with \"quotes\"", "ünïcödé", "a/b?c=d"] {
            let action = create_remove_from_favorites_action(FavoritesOptions {
                id,
                keyboard_shortcut: None,
            });
            let argument: serde_json::Value = serde_json::from_str(&action.argument).unwrap();
            assert_eq!(argument, json!({ "action": "Remove", "id": id }));
            assert_eq!(action.handler_id, "Favorites");
            assert_eq!(action.fluent_icon.as_deref(), Some("StarOffRegular"));
        }
    }

    #[test]
    fn test_factories_are_deterministic() {
        let options = CopyToClipboardOptions {
            text: "https://example.com",
            ..Default::default()
        };
        assert_eq!(
            create_copy_to_clipboard_action(options).argument,
            create_copy_to_clipboard_action(options).argument
        );
    }

    #[test]
    fn test_create_invoke_extension_action() {
        let action = create_invoke_extension_action(InvokeExtensionOptions {
            extension_id: "DeeplTranslator",
            description: "Open DeepL Translator",
            fluent_icon: None,
        });

        assert_eq!(action.handler_id, "DeeplTranslator");
        assert_eq!(
            action.argument,
            r#"{"action":"Invoke","extensionId":"DeeplTranslator"}"#
        );
        assert_eq!(action.fluent_icon.as_deref(), Some("OpenRegular"));
    }

    #[test]
    fn test_create_add_to_favorites_action() {
        let action = create_add_to_favorites_action(FavoritesOptions {
            id: "id_2",
            keyboard_shortcut: None,
        });
        assert_eq!(action.argument, r#"{"action":"Add","id":"id_2"}"#);
        assert_eq!(action.fluent_icon.as_deref(), Some("StarRegular"));
        assert_eq!(action.keyboard_shortcut, None);
    }

    #[test]
    fn test_open_url_description_override() {
        let action = create_open_url_action(OpenUrlOptions {
            url: "https://example.com",
            description: Some("Open bookmark"),
            keyboard_shortcut: None,
        });
        assert_eq!(action.description, "Open bookmark");
        assert!(action.description_translation.is_none());
        assert_eq!(action.handler_id, "Url");

        let action = create_open_url_action(OpenUrlOptions {
            url: "https://example.com",
            ..Default::default()
        });
        assert_eq!(action.description, "Open URL");
        assert_eq!(
            action.description_translation,
            Some(TranslationRef::new("openUrl", "searchResultItemAction"))
        );
    }
}
