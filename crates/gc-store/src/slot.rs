use std::path::{Path, PathBuf};
use std::{env, fs};

use gc_core::{CacheObserver, Game, GameConfig};

use crate::config::load_config;
use crate::error::{Result, StoreError};
use crate::store::Store;

pub const DEFAULT_SLOT: &str = "default";

/// Default base directory for all geocache storage.
pub fn default_base_dir() -> PathBuf {
    dirs_home().join(".geocache")
}

fn dirs_home() -> PathBuf {
    env::var("HOME")
        .or_else(|_| env::var("USERPROFILE"))
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."))
}

/// Sanitize a slot name for use as a filename.
fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// A named save slot plus the config it is played with.
///
/// Layout:
/// ```text
/// ~/.geocache/
/// ├── config.toml
/// └── saves/
///     ├── default.db
///     └── ...
/// ```
pub struct SlotStore {
    store: Store,
    slot: String,
    config: GameConfig,
}

impl SlotStore {
    /// Open (or create) `slot` under `base_dir`, defaulting to
    /// [`default_base_dir`].
    pub fn open(slot: Option<&str>, base_dir: Option<&Path>) -> Result<Self> {
        let base = base_dir.map(PathBuf::from).unwrap_or_else(default_base_dir);
        let saves_dir = base.join("saves");

        fs::create_dir_all(&saves_dir).map_err(|e| StoreError::io(&saves_dir, e))?;

        let slot = slot
            .map(sanitize_name)
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_SLOT.to_string());
        let config = load_config(&base)?;
        let store = Store::open(&saves_dir.join(format!("{slot}.db")))?;
        tracing::debug!("opened slot '{slot}' in {}", base.display());

        Ok(Self {
            store,
            slot,
            config,
        })
    }

    /// In-memory slot (for testing).
    pub fn open_in_memory(config: GameConfig) -> Result<Self> {
        Ok(Self {
            store: Store::open_in_memory()?,
            slot: "test".to_string(),
            config,
        })
    }

    pub fn slot(&self) -> &str {
        &self.slot
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Resume the saved session, or start a new one, and bring the player's
    /// neighborhood to life.
    pub fn load_game(&self, observer: &mut impl CacheObserver) -> Result<Game> {
        let mut game = match self.store.load_snapshot()? {
            Some(snapshot) => Game::restore(self.config.clone(), snapshot),
            None => {
                tracing::info!("starting a new game in slot '{}'", self.slot);
                Game::new(self.config.clone())
            }
        };
        let report = game.refresh(observer);
        tracing::debug!(
            restored = report.restored,
            generated = report.generated,
            "neighborhood ready"
        );
        Ok(game)
    }

    pub fn save_game(&self, game: &Game) -> Result<()> {
        self.store.save_snapshot(&game.snapshot())
    }

    pub fn import_json_file(&self, path: &Path) -> Result<()> {
        self.store.import_json_file(path)
    }

    pub fn export_json_file(&self, path: &Path) -> Result<()> {
        self.store.export_json_file(path)
    }
}
