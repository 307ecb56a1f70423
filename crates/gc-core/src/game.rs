use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::board::{CacheBoard, CacheObserver, RefreshReport};
use crate::cache::{Cache, Memento};
use crate::config::GameConfig;
use crate::grid::{Grid, GridPoint, LatLng};
use crate::inventory::Inventory;
use crate::token::Token;

/// One-tile steps the player can take.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::North => "north",
            Self::South => "south",
            Self::East => "east",
            Self::West => "west",
        }
    }

    /// (dlat, dlng) in tiles.
    fn delta(&self) -> (f64, f64) {
        match self {
            Self::North => (1.0, 0.0),
            Self::South => (-1.0, 0.0),
            Self::East => (0.0, 1.0),
            Self::West => (0.0, -1.0),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "north" | "n" => Ok(Self::North),
            "south" | "s" => Ok(Self::South),
            "east" | "e" => Ok(Self::East),
            "west" | "w" => Ok(Self::West),
            other => Err(format!("unknown direction '{other}'")),
        }
    }
}

/// Everything needed to rebuild a session: where the player stands, what
/// they carry, and every cache the world remembers.
#[derive(Clone, Debug, PartialEq)]
pub struct GameSnapshot {
    pub position: LatLng,
    pub inventory: Inventory,
    pub mementos: BTreeMap<GridPoint, Memento>,
}

/// A player session over a cache board.
#[derive(Clone, Debug)]
pub struct Game {
    config: GameConfig,
    grid: Grid,
    position: LatLng,
    inventory: Inventory,
    board: CacheBoard,
}

impl Game {
    /// Fresh session at the configured spawn point. Nothing is spawned until
    /// the first [`Game::refresh`].
    pub fn new(config: GameConfig) -> Self {
        let position = config.spawn_point();
        Self {
            grid: config.grid(),
            board: CacheBoard::new(config.generator()),
            inventory: Inventory::new(),
            position,
            config,
        }
    }

    /// Rebuild a session from a snapshot. Call [`Game::refresh`] to bring the
    /// player's neighborhood back to life.
    pub fn restore(config: GameConfig, snapshot: GameSnapshot) -> Self {
        Self {
            grid: config.grid(),
            board: CacheBoard::from_mementos(config.generator(), snapshot.mementos),
            inventory: snapshot.inventory,
            position: snapshot.position,
            config,
        }
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            position: self.position,
            inventory: self.inventory.clone(),
            mementos: self.board.mementos_with_active(),
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn board(&self) -> &CacheBoard {
        &self.board
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn position(&self) -> LatLng {
        self.position
    }

    pub fn player_cell(&self) -> GridPoint {
        self.grid.cell_for(self.position)
    }

    pub fn cache(&self, point: GridPoint) -> Option<&Cache> {
        self.board.cache(point)
    }

    /// Respawn the neighborhood around the player.
    pub fn refresh(&mut self, observer: &mut impl CacheObserver) -> RefreshReport {
        let center = self.player_cell();
        self.board
            .refresh_neighborhood(center, self.config.neighborhood_size, observer)
    }

    /// Step one tile and respawn around the new cell.
    pub fn move_player(
        &mut self,
        direction: Direction,
        observer: &mut impl CacheObserver,
    ) -> RefreshReport {
        let (dlat, dlng) = direction.delta();
        self.position.lat += dlat * self.grid.tile_degrees;
        self.position.lng += dlng * self.grid.tile_degrees;
        self.refresh(observer)
    }

    /// Jump to `position`, e.g. from a geolocation fix.
    pub fn teleport(
        &mut self,
        position: LatLng,
        observer: &mut impl CacheObserver,
    ) -> RefreshReport {
        self.position = position;
        self.refresh(observer)
    }

    pub fn collect(&mut self, point: GridPoint, rng: &mut impl Rng) -> Option<Token> {
        self.board.collect(point, &mut self.inventory, rng)
    }

    pub fn deposit(&mut self, point: GridPoint, rng: &mut impl Rng) -> Option<Token> {
        self.board.deposit(point, &mut self.inventory, rng)
    }

    /// Tokens anywhere: live caches, mementos and the inventory.
    pub fn total_tokens(&self) -> usize {
        self.board.total_tokens() + self.inventory.len()
    }
}
