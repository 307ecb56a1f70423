use std::fs;
use std::path::Path;

use gc_core::{export_json, import_json};

use crate::error::{Result, StoreError};
use crate::store::Store;

impl Store {
    /// Replace this slot with the contents of a JSON save file.
    pub fn import_json_file(&self, path: &Path) -> Result<()> {
        let json = fs::read_to_string(path).map_err(|e| StoreError::io(path, e))?;
        self.import_json_str(&json)
    }

    pub fn import_json_str(&self, json: &str) -> Result<()> {
        let snapshot =
            import_json(json).map_err(|e| StoreError::InvalidData(format!("invalid JSON: {e}")))?;
        self.save_snapshot(&snapshot)
    }

    pub fn export_json_file(&self, path: &Path) -> Result<()> {
        let json = self.export_json_string()?;
        fs::write(path, json).map_err(|e| StoreError::io(path, e))
    }

    /// Fails on a slot that has never been saved.
    pub fn export_json_string(&self) -> Result<String> {
        let snapshot = self
            .load_snapshot()?
            .ok_or_else(|| StoreError::InvalidData("nothing saved in this slot".to_string()))?;
        export_json(&snapshot)
            .map_err(|e| StoreError::InvalidData(format!("JSON export failed: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gc_core::{Direction, Game, GameConfig, GridPoint};
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn make_game() -> Game {
        let mut rng = SmallRng::seed_from_u64(42);
        let mut game = Game::new(GameConfig::default());
        game.refresh(&mut ());
        game.collect(GridPoint::new(1, 4), &mut rng);
        game.move_player(Direction::West, &mut ());
        game
    }

    #[test]
    fn test_import_export_roundtrip() {
        let store = Store::open_in_memory().unwrap();
        let snapshot = make_game().snapshot();
        store.save_snapshot(&snapshot).unwrap();

        let json = store.export_json_string().unwrap();
        let other = Store::open_in_memory().unwrap();
        other.import_json_str(&json).unwrap();

        assert_eq!(other.load_snapshot().unwrap().unwrap(), snapshot);
    }

    #[test]
    fn test_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("save.json");

        let store = Store::open_in_memory().unwrap();
        store.save_snapshot(&make_game().snapshot()).unwrap();
        store.export_json_file(&path).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["version"], gc_core::CURRENT_VERSION);

        let other = Store::open_in_memory().unwrap();
        other.import_json_file(&path).unwrap();
        assert_eq!(
            other.load_snapshot().unwrap(),
            store.load_snapshot().unwrap()
        );
    }

    #[test]
    fn test_export_empty_slot_fails() {
        let store = Store::open_in_memory().unwrap();
        assert!(store.export_json_string().is_err());
    }

    #[test]
    fn test_import_invalid_json() {
        let store = Store::open_in_memory().unwrap();
        let err = store.import_json_str("{ not json").unwrap_err();
        assert!(matches!(err, StoreError::InvalidData(_)));
    }

    #[test]
    fn test_import_missing_file() {
        let store = Store::open_in_memory().unwrap();
        let err = store
            .import_json_file(Path::new("/nonexistent/save.json"))
            .unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
    }
}
