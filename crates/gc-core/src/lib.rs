//! Geocache game model.
//!
//! Grid cells deterministically spawn caches of collectible tokens. When the
//! player moves on, live caches are snapshotted into mementos and restored
//! verbatim on return; only never-visited cells mint new tokens.
//!
//! Zero I/O: persistence and presentation live in other crates.

pub mod board;
pub mod cache;
pub mod config;
pub mod constants;
pub mod game;
pub mod generator;
pub mod grid;
pub mod inventory;
pub mod luck;
pub mod serde_compat;
pub mod time;
pub mod token;

pub use board::{CacheBoard, CacheObserver, RefreshReport};
pub use cache::{Cache, Memento};
pub use config::GameConfig;
pub use constants::{
    CACHE_SPAWN_PROBABILITY, INITIAL_TOKEN_BOUND, MAX_NEIGHBORHOOD_SIZE, MAX_TOKEN_BOUND,
    NEIGHBORHOOD_SIZE, TILE_DEGREES,
};
pub use game::{Direction, Game, GameSnapshot};
pub use generator::Generator;
pub use grid::{CellBounds, Grid, GridPoint, LatLng, ParseGridPointError, neighborhood};
pub use inventory::Inventory;
pub use luck::{KeyPart, luck, seeded_value};
pub use serde_compat::{CURRENT_VERSION, export_json, export_json_at, import_json};
pub use token::Token;
