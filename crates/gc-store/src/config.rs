use std::fs;
use std::path::Path;

use gc_core::GameConfig;
use serde::Deserialize;

use crate::error::{Result, StoreError};

pub const CONFIG_FILE: &str = "config.toml";

/// Layout of `config.toml`:
///
/// ```toml
/// [game]
/// token_bound = 100
/// spawn_lat = 36.9979
/// spawn_lng = -122.0570
/// ```
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    game: GameConfig,
}

/// Parse and validate a config file's contents.
pub fn parse_config(content: &str) -> Result<GameConfig> {
    let file: ConfigFile =
        toml::from_str(content).map_err(|e| StoreError::Config(e.to_string()))?;
    file.game.validate().map_err(StoreError::Config)?;
    Ok(file.game)
}

/// Read `<base>/config.toml`. A missing file means defaults.
pub fn load_config(base: &Path) -> Result<GameConfig> {
    let path = base.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(GameConfig::default());
    }
    let content = fs::read_to_string(&path).map_err(|e| StoreError::io(&path, e))?;
    let config = parse_config(&content)?;
    tracing::info!("loaded config from {}", path.display());
    Ok(config)
}
