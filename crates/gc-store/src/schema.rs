use rusqlite::Connection;

use crate::error::Result;

pub const SCHEMA_VERSION: i64 = 1;

pub fn initialize(conn: &Connection) -> Result<()> {
    conn.execute_batch("PRAGMA journal_mode = WAL;")?;
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.pragma_update(None, "busy_timeout", 5000)?;

    // In-memory DBs and fresh files legitimately fail this.
    if conn
        .execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")
        .is_ok()
    {
        tracing::debug!("startup WAL checkpoint complete");
    }

    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS metadata (
            key   TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS mementos (
            cell_i INTEGER NOT NULL,
            cell_j INTEGER NOT NULL,
            PRIMARY KEY (cell_i, cell_j)
        );

        CREATE TABLE IF NOT EXISTS memento_tokens (
            cell_i   INTEGER NOT NULL,
            cell_j   INTEGER NOT NULL,
            slot     INTEGER NOT NULL,
            origin_i INTEGER NOT NULL,
            origin_j INTEGER NOT NULL,
            serial   INTEGER NOT NULL,
            PRIMARY KEY (cell_i, cell_j, slot),
            FOREIGN KEY (cell_i, cell_j) REFERENCES mementos(cell_i, cell_j)
        );

        CREATE TABLE IF NOT EXISTS inventory (
            slot     INTEGER PRIMARY KEY,
            origin_i INTEGER NOT NULL,
            origin_j INTEGER NOT NULL,
            serial   INTEGER NOT NULL
        );

        CREATE UNIQUE INDEX IF NOT EXISTS idx_memento_token_identity
            ON memento_tokens(origin_i, origin_j, serial);
        CREATE UNIQUE INDEX IF NOT EXISTS idx_inventory_token_identity
            ON inventory(origin_i, origin_j, serial);
        ",
    )?;

    conn.execute(
        "INSERT OR REPLACE INTO metadata (key, value) VALUES ('schema_version', ?1)",
        [SCHEMA_VERSION.to_string()],
    )?;

    Ok(())
}

pub fn get_schema_version(conn: &Connection) -> Result<Option<i64>> {
    let mut stmt = conn.prepare("SELECT value FROM metadata WHERE key = 'schema_version'")?;
    let version = stmt
        .query_row([], |row| {
            let v: String = row.get(0)?;
            Ok(v.parse::<i64>().unwrap_or(0))
        })
        .ok();
    Ok(version)
}
