use std::collections::BTreeMap;
use std::path::Path;

use rusqlite::{Connection, params};

use gc_core::{GameSnapshot, GridPoint, Inventory, LatLng, Memento, Token};

use crate::error::{Result, StoreError};
use crate::schema;

const KEY_PLAYER_LAT: &str = "player_lat";
const KEY_PLAYER_LNG: &str = "player_lng";

/// One save slot in a SQLite database.
pub struct Store {
    conn: Connection,
}

impl Store {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        schema::initialize(&conn)?;
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        schema::initialize(&conn)?;
        Ok(Self { conn })
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    // --- Metadata ---

    pub fn get_metadata(&self, key: &str) -> Result<Option<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT value FROM metadata WHERE key = ?1")?;
        let result = stmt.query_row([key], |row| row.get(0)).ok();
        Ok(result)
    }

    pub fn set_metadata(&self, key: &str, value: &str) -> Result<()> {
        set_metadata_on(&self.conn, key, value)
    }

    // --- Save ---

    /// Replace the slot's contents with `snapshot` in one transaction.
    pub fn save_snapshot(&self, snapshot: &GameSnapshot) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;

        tx.execute_batch(
            "DELETE FROM memento_tokens; DELETE FROM mementos; DELETE FROM inventory;",
        )?;

        set_metadata_on(&tx, KEY_PLAYER_LAT, &snapshot.position.lat.to_string())?;
        set_metadata_on(&tx, KEY_PLAYER_LNG, &snapshot.position.lng.to_string())?;

        {
            let mut memento_stmt =
                tx.prepare("INSERT INTO mementos (cell_i, cell_j) VALUES (?1, ?2)")?;
            let mut token_stmt = tx.prepare(
                "INSERT INTO memento_tokens (cell_i, cell_j, slot, origin_i, origin_j, serial)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;
            for (point, memento) in &snapshot.mementos {
                memento_stmt.execute(params![point.i, point.j])?;
                for (slot, token) in memento.tokens().iter().enumerate() {
                    token_stmt.execute(params![
                        point.i,
                        point.j,
                        slot as i64,
                        token.origin.i,
                        token.origin.j,
                        token.serial,
                    ])?;
                }
            }

            let mut inv_stmt = tx.prepare(
                "INSERT INTO inventory (slot, origin_i, origin_j, serial) VALUES (?1, ?2, ?3, ?4)",
            )?;
            for (slot, token) in snapshot.inventory.tokens().iter().enumerate() {
                inv_stmt.execute(params![
                    slot as i64,
                    token.origin.i,
                    token.origin.j,
                    token.serial
                ])?;
            }
        }

        tx.commit()?;
        tracing::debug!(
            mementos = snapshot.mementos.len(),
            inventory = snapshot.inventory.len(),
            "saved snapshot"
        );
        Ok(())
    }

    // --- Load ---

    /// The saved snapshot, or `None` if this slot has never been saved.
    pub fn load_snapshot(&self) -> Result<Option<GameSnapshot>> {
        let (Some(lat), Some(lng)) = (
            self.get_metadata(KEY_PLAYER_LAT)?,
            self.get_metadata(KEY_PLAYER_LNG)?,
        ) else {
            return Ok(None);
        };
        let position = LatLng::new(parse_coord(&lat)?, parse_coord(&lng)?);

        Ok(Some(GameSnapshot {
            position,
            inventory: self.load_inventory()?,
            mementos: self.load_mementos()?,
        }))
    }

    fn load_inventory(&self) -> Result<Inventory> {
        let mut stmt = self
            .conn
            .prepare("SELECT origin_i, origin_j, serial FROM inventory ORDER BY slot")?;
        let tokens = stmt
            .query_map([], |row| {
                Ok(Token::new(
                    GridPoint::new(row.get(0)?, row.get(1)?),
                    row.get(2)?,
                ))
            })?
            .collect::<std::result::Result<Inventory, _>>()?;
        Ok(tokens)
    }

    fn load_mementos(&self) -> Result<BTreeMap<GridPoint, Memento>> {
        let mut cells: BTreeMap<GridPoint, Vec<Token>> = BTreeMap::new();

        let mut cell_stmt = self.conn.prepare("SELECT cell_i, cell_j FROM mementos")?;
        let points = cell_stmt
            .query_map([], |row| Ok(GridPoint::new(row.get(0)?, row.get(1)?)))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        for point in points {
            cells.insert(point, Vec::new());
        }

        let mut token_stmt = self.conn.prepare(
            "SELECT cell_i, cell_j, origin_i, origin_j, serial
             FROM memento_tokens ORDER BY cell_i, cell_j, slot",
        )?;
        let rows = token_stmt
            .query_map([], |row| {
                let cell = GridPoint::new(row.get(0)?, row.get(1)?);
                let token = Token::new(GridPoint::new(row.get(2)?, row.get(3)?), row.get(4)?);
                Ok((cell, token))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        for (cell, token) in rows {
            cells
                .get_mut(&cell)
                .ok_or_else(|| {
                    StoreError::InvalidData(format!("token {token} in unknown memento {cell}"))
                })?
                .push(token);
        }

        Ok(cells
            .into_iter()
            .map(|(point, tokens)| (point, tokens.into_iter().collect()))
            .collect())
    }

    // --- Stats ---

    pub fn memento_count(&self) -> Result<usize> {
        let n: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM mementos", [], |row| row.get(0))?;
        Ok(n as usize)
    }

    pub fn token_count(&self) -> Result<usize> {
        let n: i64 = self.conn.query_row(
            "SELECT (SELECT COUNT(*) FROM memento_tokens) + (SELECT COUNT(*) FROM inventory)",
            [],
            |row| row.get(0),
        )?;
        Ok(n as usize)
    }

    /// Flush the WAL into the main database file.
    pub fn checkpoint_truncate(&self) -> Result<()> {
        self.conn
            .execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}

fn set_metadata_on(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO metadata (key, value) VALUES (?1, ?2)",
        params![key, value],
    )?;
    Ok(())
}

fn parse_coord(s: &str) -> Result<f64> {
    s.parse()
        .map_err(|e| StoreError::InvalidData(format!("invalid coordinate '{s}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use gc_core::{Direction, Game, GameConfig};
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(42)
    }

    fn make_game() -> Game {
        let mut rng = rng();
        let mut game = Game::new(GameConfig::default());
        game.refresh(&mut ());
        game.collect(GridPoint::new(2, 2), &mut rng);
        game.collect(GridPoint::new(-8, -5), &mut rng);
        game.deposit(GridPoint::new(-8, 4), &mut rng);
        game.move_player(Direction::North, &mut ());
        game
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let store = Store::open_in_memory().unwrap();
        let snapshot = make_game().snapshot();

        store.save_snapshot(&snapshot).unwrap();
        let loaded = store.load_snapshot().unwrap().unwrap();

        assert_eq!(loaded, snapshot);
    }

    #[test]
    fn test_empty_memento_survives() {
        // (-8, 4) spawns with no tokens; its memento still has to exist so
        // the cell is never regenerated
        let store = Store::open_in_memory().unwrap();
        let mut game = Game::new(GameConfig::default());
        game.refresh(&mut ());
        store.save_snapshot(&game.snapshot()).unwrap();

        let loaded = store.load_snapshot().unwrap().unwrap();
        let empty = &loaded.mementos[&GridPoint::new(-8, 4)];
        assert_eq!(empty.token_count(), 0);
        assert_eq!(store.memento_count().unwrap(), 33);
        assert_eq!(store.token_count().unwrap(), 123);
    }

    #[test]
    fn test_load_fresh_slot() {
        let store = Store::open_in_memory().unwrap();
        assert!(store.load_snapshot().unwrap().is_none());
    }

    #[test]
    fn test_save_overwrites_previous() {
        let store = Store::open_in_memory().unwrap();
        let mut game = make_game();
        store.save_snapshot(&game.snapshot()).unwrap();

        let mut rng = rng();
        game.move_player(Direction::South, &mut ());
        game.deposit(GridPoint::new(2, 2), &mut rng);
        store.save_snapshot(&game.snapshot()).unwrap();

        let loaded = store.load_snapshot().unwrap().unwrap();
        assert_eq!(loaded, game.snapshot());
        assert_eq!(store.token_count().unwrap(), game.total_tokens());
    }

    #[test]
    fn test_position_precision() {
        let store = Store::open_in_memory().unwrap();
        let mut game = Game::new(GameConfig::default());
        game.teleport(LatLng::new(36.997_934_1, -122.057_051_7), &mut ());
        store.save_snapshot(&game.snapshot()).unwrap();

        let loaded = store.load_snapshot().unwrap().unwrap();
        assert_eq!(loaded.position, game.position());
    }

    #[test]
    fn test_bad_coordinate() {
        let store = Store::open_in_memory().unwrap();
        store.set_metadata(KEY_PLAYER_LAT, "north-ish").unwrap();
        store.set_metadata(KEY_PLAYER_LNG, "0").unwrap();
        assert!(store.load_snapshot().is_err());
    }

    #[test]
    fn test_metadata() {
        let store = Store::open_in_memory().unwrap();
        assert!(store.get_metadata("foo").unwrap().is_none());
        store.set_metadata("foo", "bar").unwrap();
        assert_eq!(store.get_metadata("foo").unwrap(), Some("bar".to_string()));
        store.set_metadata("foo", "baz").unwrap();
        assert_eq!(store.get_metadata("foo").unwrap(), Some("baz".to_string()));
    }
}
