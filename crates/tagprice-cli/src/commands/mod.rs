pub mod batch;
pub mod config;
pub mod process;

use std::path::Path;

use anyhow::Context;
use tracing::debug;

use tagprice_core::TagPriceConfig;

/// Load the configuration named on the command line, else the user's
/// config file if one exists, else the built-in defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<TagPriceConfig> {
    if let Some(path) = config_path {
        return TagPriceConfig::from_file(Path::new(path))
            .with_context(|| format!("Failed to load config from {}", path));
    }

    let default_path = config::default_config_path();
    if default_path.exists() {
        debug!("Using config file {}", default_path.display());
        TagPriceConfig::from_file(&default_path)
            .with_context(|| format!("Failed to load config from {}", default_path.display()))
    } else {
        Ok(TagPriceConfig::default())
    }
}
