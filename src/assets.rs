//! Resolution of extension asset files (icons, logos).

use std::path::PathBuf;

/// Resolves an extension id and asset file name to a loadable path.
pub trait AssetPathResolver: Send + Sync {
    fn get_extension_asset_path(&self, extension_id: &str, file_name: &str) -> PathBuf;
}

/// Assets laid out as `<assets_dir>/<extension_id>/<file_name>`.
#[derive(Debug, Clone)]
pub struct DirectoryAssetPathResolver {
    assets_dir: PathBuf,
}

impl DirectoryAssetPathResolver {
    pub fn new(assets_dir: PathBuf) -> Self {
        Self { assets_dir }
    }

    pub fn assets_dir(&self) -> &PathBuf {
        &self.assets_dir
    }
}

impl AssetPathResolver for DirectoryAssetPathResolver {
    fn get_extension_asset_path(&self, extension_id: &str, file_name: &str) -> PathBuf {
        self.assets_dir.join(extension_id).join(file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directory_resolver_layout() {
        let resolver = DirectoryAssetPathResolver::new(PathBuf::from("/opt/lumen/assets"));
        assert_eq!(
            resolver.get_extension_asset_path("DeeplTranslator", "deepl-logo.svg"),
            PathBuf::from("/opt/lumen/assets/DeeplTranslator/deepl-logo.svg")
        );
    }
}
