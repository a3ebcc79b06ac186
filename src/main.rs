//! lumen command line launcher.

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lumen::assets::{AssetPathResolver, DirectoryAssetPathResolver};
use lumen::builtin::browser_bookmarks::ChromiumBookmarkRepository;
use lumen::builtin::{BrowserBookmarks, DeeplTranslator};
use lumen::cli::{self, Cli};
use lumen::handlers::{ClipboardActionHandler, FavoritesActionHandler, UrlActionHandler};
use lumen::platform::{ArboardClipboard, OpenCrateOpener};
use lumen::{Config, Extension, ExtensionHost, JsonFileSettingsManager, SettingsManager, Translator};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lumen=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };

    let settings_file = config.settings_file();
    tracing::debug!("Using settings file {:?}", settings_file);
    let settings: Arc<dyn SettingsManager> = Arc::new(
        JsonFileSettingsManager::open(settings_file).context("Failed to open settings")?,
    );
    let translator = Arc::new(Translator::new(
        settings.clone(),
        config.translator_options(),
    ));
    let assets: Arc<dyn AssetPathResolver> =
        Arc::new(DirectoryAssetPathResolver::new(config.assets_dir()));

    let host = Arc::new(ExtensionHost::new(
        config.host_config(),
        settings.clone(),
        translator.clone(),
    ));

    host.register_action_handler(Arc::new(FavoritesActionHandler::new(settings.clone())))?;
    host.register_action_handler(Arc::new(UrlActionHandler::new(Arc::new(OpenCrateOpener))))?;
    host.register_action_handler(Arc::new(ClipboardActionHandler::new(Arc::new(
        ArboardClipboard::new(),
    ))))?;

    let client = reqwest::Client::builder()
        .timeout(config.deepl_request_timeout())
        .build()
        .context("Failed to build HTTP client")?;

    let extensions: Vec<Arc<dyn Extension>> = vec![
        Arc::new(BrowserBookmarks::new(
            Arc::new(ChromiumBookmarkRepository::new()),
            settings.clone(),
            assets.clone(),
            translator.clone(),
        )),
        Arc::new(DeeplTranslator::new(
            client,
            config.deepl.api_url.clone(),
            assets.clone(),
            settings.clone(),
            translator.clone(),
        )),
    ];

    for extension in extensions {
        if !config.is_enabled(extension.id()) {
            tracing::debug!("Extension '{}' is disabled", extension.id());
            continue;
        }
        host.register(extension)?;
    }

    let listener = host.spawn_settings_listener();
    let result = cli::run(cli.command, host).await;
    listener.abort();

    result
}
