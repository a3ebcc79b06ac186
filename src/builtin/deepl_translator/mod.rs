//! DeepL translator extension.
//!
//! Contributes a single result that opens the translator view. The view calls
//! back through [`Extension::invoke`] with an [`InvocationArgument`] and gets
//! the translated texts as a JSON array.

mod types;

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::assets::AssetPathResolver;
use crate::core::action_utility::{create_invoke_extension_action, InvokeExtensionOptions};
use crate::core::{Image, SearchResultItem, TranslationRef};
use crate::extensions::{Author, Extension, ExtensionError, ExtensionResult};
use crate::settings::{
    extension_setting_key, SettingsManager, SettingsManagerExt, GENERAL_LANGUAGE_KEY,
};
use crate::translator::{extension_namespace, translations, Translations, Translator};

pub use types::{ApiResponse, ApiTranslation, InvocationArgument, PostBody, AUTO_SOURCE_LANGUAGE};

pub const EXTENSION_ID: &str = "DeeplTranslator";

/// Free-tier endpoint of the DeepL API.
pub const DEFAULT_API_URL: &str = "https://api-free.deepl.com/v2/translate";

const API_KEY: &str = "apiKey";
const DEFAULT_SOURCE_LANGUAGE: &str = "defaultSourceLanguage";
const DEFAULT_TARGET_LANGUAGE: &str = "defaultTargetLanguage";

pub struct DeeplTranslator {
    author: Author,
    client: reqwest::Client,
    api_url: String,
    assets: Arc<dyn AssetPathResolver>,
    settings: Arc<dyn SettingsManager>,
    translator: Arc<Translator>,
}

impl DeeplTranslator {
    pub fn new(
        client: reqwest::Client,
        api_url: impl Into<String>,
        assets: Arc<dyn AssetPathResolver>,
        settings: Arc<dyn SettingsManager>,
        translator: Arc<Translator>,
    ) -> Self {
        Self {
            author: Author {
                name: "Oliver Schwendener".to_string(),
                github_user_name: "oliverschwendener".to_string(),
            },
            client,
            api_url: api_url.into(),
            assets,
            settings,
            translator,
        }
    }

    fn string_setting(&self, key: &str) -> ExtensionResult<String> {
        let default = self.get_setting_default_value(key)?;
        let default = default.as_str().unwrap_or_default().to_string();
        Ok(self
            .settings
            .get_value(&extension_setting_key(EXTENSION_ID, key), default, false))
    }

    fn api_key(&self) -> ExtensionResult<String> {
        self.settings
            .get_optional_value::<String>(&extension_setting_key(EXTENSION_ID, API_KEY), true)
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ExtensionError::MissingSetting("Missing DeepL API key".to_string()))
    }

    fn post_body(&self, argument: &InvocationArgument) -> ExtensionResult<PostBody> {
        let source = match &argument.source_language {
            Some(source) => source.clone(),
            None => self.string_setting(DEFAULT_SOURCE_LANGUAGE)?,
        };
        let target = match &argument.target_language {
            Some(target) => target.clone(),
            None => self.string_setting(DEFAULT_TARGET_LANGUAGE)?,
        };
        Ok(PostBody::new(&argument.search_term, &source, &target))
    }

    /// Translate `argument.search_term`, returning the texts in response order.
    pub async fn translate(&self, argument: &InvocationArgument) -> ExtensionResult<Vec<String>> {
        let body = self.post_body(argument)?;
        let api_key = self.api_key()?;

        tracing::debug!(
            "Translating {} text(s) to {}",
            body.text.len(),
            body.target_lang
        );

        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("DeepL-Auth-Key {}", api_key))
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ExtensionError::Remote(format!(
                "DeepL API error: {}",
                response.status()
            )));
        }

        let response: ApiResponse = response.json().await.map_err(|e| {
            ExtensionError::Remote(format!("Failed to parse DeepL response: {}", e))
        })?;

        Ok(response.translations.into_iter().map(|t| t.text).collect())
    }
}

#[async_trait]
impl Extension for DeeplTranslator {
    fn id(&self) -> &str {
        EXTENSION_ID
    }

    fn name(&self) -> &str {
        "DeepL Translator"
    }

    fn name_translation(&self) -> TranslationRef {
        TranslationRef::new("extensionName", extension_namespace(EXTENSION_ID))
    }

    fn author(&self) -> &Author {
        &self.author
    }

    async fn get_search_result_items(&self) -> ExtensionResult<Vec<SearchResultItem>> {
        let t = self.translator.create_instance(&self.get_translations());

        Ok(vec![SearchResultItem {
            id: format!("{}:invoke", EXTENSION_ID),
            name: t.t("searchResultItem.name")?,
            description: t.t("searchResultItem.description")?,
            image: self.get_image(),
            default_action: create_invoke_extension_action(InvokeExtensionOptions {
                extension_id: EXTENSION_ID,
                description: &t.t("searchResultItem.actionDescription")?,
                fluent_icon: Some("OpenRegular"),
            }),
            additional_actions: Vec::new(),
        }])
    }

    fn is_supported(&self) -> bool {
        true
    }

    fn get_setting_default_value(&self, key: &str) -> ExtensionResult<Value> {
        match key {
            API_KEY => Ok(json!("")),
            DEFAULT_SOURCE_LANGUAGE => Ok(json!(AUTO_SOURCE_LANGUAGE)),
            DEFAULT_TARGET_LANGUAGE => Ok(json!("EN-US")),
            _ => Err(ExtensionError::UnknownSetting {
                extension: EXTENSION_ID.to_string(),
                key: key.to_string(),
            }),
        }
    }

    fn get_setting_keys_triggering_rescan(&self) -> Vec<String> {
        vec![GENERAL_LANGUAGE_KEY.to_string()]
    }

    fn get_image(&self) -> Image {
        Image::from_file_path(
            &self
                .assets
                .get_extension_asset_path(EXTENSION_ID, "deepl-logo.svg"),
        )
    }

    fn get_translations(&self) -> Translations {
        translations(&[
            (
                "en-US",
                &[
                    ("extensionName", "DeepL Translator"),
                    ("openAccount", "Open DeepL Account"),
                    ("searchResultItem.description", "Translate with DeepL"),
                    ("searchResultItem.name", "DeepL Translator"),
                    ("searchResultItem.actionDescription", "Open DeepL Translator"),
                ],
            ),
            (
                "de-CH",
                &[
                    ("extensionName", "DeepL Übersetzer"),
                    ("openAccount", "DeepL Account öffnen"),
                    ("searchResultItem.description", "Mit DeepL übersetzen"),
                    ("searchResultItem.name", "DeepL Übersetzer"),
                    ("searchResultItem.actionDescription", "DeepL Übersetzer öffnen"),
                ],
            ),
        ])
    }

    async fn invoke(&self, argument: Value) -> ExtensionResult<Value> {
        let argument: InvocationArgument = serde_json::from_value(argument)
            .map_err(|e| ExtensionError::MalformedArgument(format!("{}: {}", EXTENSION_ID, e)))?;

        let texts = self.translate(&argument).await?;
        Ok(json!(texts))
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::Mutex;

    use axum::extract::State;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::Router;

    use super::*;
    use crate::assets::DirectoryAssetPathResolver;
    use crate::settings::JsonFileSettingsManager;
    use crate::translator::TranslatorOptions;

    #[derive(Debug, Clone)]
    struct RecordedRequest {
        authorization: Option<String>,
        body: Value,
    }

    #[derive(Clone)]
    struct FakeDeepl {
        status: StatusCode,
        response: &'static str,
        requests: Arc<Mutex<Vec<RecordedRequest>>>,
    }

    async fn translate_route(
        State(fake): State<FakeDeepl>,
        headers: HeaderMap,
        body: String,
    ) -> (StatusCode, String) {
        fake.requests.lock().unwrap().push(RecordedRequest {
            authorization: headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
            body: serde_json::from_str(&body).unwrap_or(Value::Null),
        });
        (fake.status, fake.response.to_string())
    }

    /// Start a fake DeepL endpoint, returning its URL and the recorded requests.
    async fn serve(
        status: StatusCode,
        response: &'static str,
    ) -> (String, Arc<Mutex<Vec<RecordedRequest>>>) {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let app = Router::new()
            .route("/v2/translate", post(translate_route))
            .with_state(FakeDeepl {
                status,
                response,
                requests: requests.clone(),
            });

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{}/v2/translate", addr), requests)
    }

    fn extension(api_url: &str, settings: Arc<JsonFileSettingsManager>) -> DeeplTranslator {
        let translator = Arc::new(Translator::new(settings.clone(), TranslatorOptions::default()));
        DeeplTranslator::new(
            reqwest::Client::new(),
            api_url,
            Arc::new(DirectoryAssetPathResolver::new(PathBuf::from("/assets"))),
            settings,
            translator,
        )
    }

    fn settings_with_key() -> Arc<JsonFileSettingsManager> {
        let settings = Arc::new(JsonFileSettingsManager::in_memory());
        settings
            .set_value("DeeplTranslator.apiKey", json!("secret-key"))
            .unwrap();
        settings
    }

    const OK_RESPONSE: &str =
        r#"{"translations":[{"detected_source_language":"EN","text":"Hallo"}]}"#;

    #[tokio::test]
    async fn test_translate_with_auto_source() {
        let (url, requests) = serve(StatusCode::OK, OK_RESPONSE).await;
        let extension = extension(&url, settings_with_key());

        let result = extension
            .invoke(json!({ "searchTerm": "Hello", "targetLanguage": "DE" }))
            .await
            .unwrap();

        assert_eq!(result, json!(["Hallo"]));
        let requests = requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests[0].authorization.as_deref(),
            Some("DeepL-Auth-Key secret-key")
        );
        // Default source language is "Auto", so DeepL detects it.
        assert_eq!(
            requests[0].body,
            json!({ "text": ["Hello"], "target_lang": "DE" })
        );
    }

    #[tokio::test]
    async fn test_translate_with_explicit_source_and_default_target() {
        let (url, requests) = serve(StatusCode::OK, OK_RESPONSE).await;
        let extension = extension(&url, settings_with_key());

        extension
            .invoke(json!({ "searchTerm": "Hello", "sourceLanguage": "EN" }))
            .await
            .unwrap();

        assert_eq!(
            requests.lock().unwrap()[0].body,
            json!({ "text": ["Hello"], "target_lang": "EN-US", "source_lang": "EN" })
        );
    }

    #[tokio::test]
    async fn test_missing_api_key_fails_before_request() {
        let (url, requests) = serve(StatusCode::OK, OK_RESPONSE).await;

        for settings in [Arc::new(JsonFileSettingsManager::in_memory()), {
            let settings = Arc::new(JsonFileSettingsManager::in_memory());
            settings.set_value("DeeplTranslator.apiKey", json!("")).unwrap();
            settings
        }] {
            let error = extension(&url, settings)
                .invoke(json!({ "searchTerm": "Hello" }))
                .await
                .unwrap_err();
            assert_eq!(error.to_string(), "Missing DeepL API key");
        }

        assert!(requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_error_status_is_reported() {
        let (url, _) = serve(StatusCode::FORBIDDEN, "").await;
        let extension = extension(&url, settings_with_key());

        let error = extension
            .invoke(json!({ "searchTerm": "Hello" }))
            .await
            .unwrap_err();

        assert!(matches!(error, ExtensionError::Remote(_)));
        assert!(error.to_string().contains("403 Forbidden"), "{}", error);
    }

    #[tokio::test]
    async fn test_malformed_response() {
        let (url, _) = serve(StatusCode::OK, "not json").await;
        let extension = extension(&url, settings_with_key());

        let error = extension
            .invoke(json!({ "searchTerm": "Hello" }))
            .await
            .unwrap_err();
        assert!(matches!(error, ExtensionError::Remote(_)));
    }

    #[tokio::test]
    async fn test_malformed_argument() {
        let extension = extension(DEFAULT_API_URL, settings_with_key());

        let error = extension.invoke(json!({ "text": "Hello" })).await.unwrap_err();
        assert!(matches!(error, ExtensionError::MalformedArgument(_)));
    }

    #[tokio::test]
    async fn test_single_localized_item() {
        let settings = Arc::new(JsonFileSettingsManager::in_memory());
        settings
            .set_value(GENERAL_LANGUAGE_KEY, json!("de-CH"))
            .unwrap();
        let extension = extension(DEFAULT_API_URL, settings);

        let items = extension.get_search_result_items().await.unwrap();

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, "DeeplTranslator:invoke");
        assert_eq!(items[0].name, "DeepL Übersetzer");
        assert_eq!(items[0].default_action.handler_id, "DeeplTranslator");
        assert_eq!(items[0].default_action.description, "DeepL Übersetzer öffnen");
        assert_eq!(
            items[0].image.url,
            "file:///assets/DeeplTranslator/deepl-logo.svg"
        );
    }

    #[test]
    fn test_settings_and_rescan_keys() {
        let extension = extension(DEFAULT_API_URL, Arc::new(JsonFileSettingsManager::in_memory()));

        assert_eq!(extension.get_setting_default_value("apiKey").unwrap(), json!(""));
        assert_eq!(
            extension
                .get_setting_default_value("defaultSourceLanguage")
                .unwrap(),
            json!("Auto")
        );
        assert_eq!(
            extension
                .get_setting_default_value("defaultTargetLanguage")
                .unwrap(),
            json!("EN-US")
        );
        assert!(extension.get_setting_default_value("browser").is_err());
        assert_eq!(
            extension.get_setting_keys_triggering_rescan(),
            vec!["general.language"]
        );
    }
}
