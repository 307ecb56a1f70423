use serde::{Deserialize, Serialize};

use crate::constants::{
    CACHE_SPAWN_PROBABILITY, INITIAL_TOKEN_BOUND, MAX_NEIGHBORHOOD_SIZE, MAX_TOKEN_BOUND,
    NEIGHBORHOOD_SIZE, SPAWN_LAT, SPAWN_LNG, TILE_DEGREES,
};
use crate::generator::Generator;
use crate::grid::{Grid, LatLng};

/// Tunable gameplay parameters. Every field falls back to its constant, so a
/// partial config file is fine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub tile_degrees: f64,
    pub neighborhood_size: i32,
    pub spawn_probability: f64,
    pub token_bound: u32,
    pub spawn_lat: f64,
    pub spawn_lng: f64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            tile_degrees: TILE_DEGREES,
            neighborhood_size: NEIGHBORHOOD_SIZE,
            spawn_probability: CACHE_SPAWN_PROBABILITY,
            token_bound: INITIAL_TOKEN_BOUND,
            spawn_lat: SPAWN_LAT,
            spawn_lng: SPAWN_LNG,
        }
    }
}

impl GameConfig {
    pub fn spawn_point(&self) -> LatLng {
        LatLng::new(self.spawn_lat, self.spawn_lng)
    }

    /// The grid is anchored at the spawn point, so the player starts in
    /// cell (0, 0).
    pub fn grid(&self) -> Grid {
        Grid::new(self.spawn_point(), self.tile_degrees)
    }

    pub fn generator(&self) -> Generator {
        Generator::new(self.spawn_probability, self.token_bound)
    }

    /// Reject settings the grid math cannot work with. Returns the first
    /// problem found.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.tile_degrees.is_finite() && self.tile_degrees > 0.0) {
            return Err(format!(
                "tile_degrees must be a positive number, got {}",
                self.tile_degrees
            ));
        }
        if !(0..=MAX_NEIGHBORHOOD_SIZE).contains(&self.neighborhood_size) {
            return Err(format!(
                "neighborhood_size must be in [0, {MAX_NEIGHBORHOOD_SIZE}], got {}",
                self.neighborhood_size
            ));
        }
        if !(0.0..=1.0).contains(&self.spawn_probability) {
            return Err(format!(
                "spawn_probability must be in [0, 1], got {}",
                self.spawn_probability
            ));
        }
        if self.token_bound > MAX_TOKEN_BOUND {
            return Err(format!(
                "token_bound must be at most {MAX_TOKEN_BOUND}, got {}",
                self.token_bound
            ));
        }
        self.spawn_point()
            .validate()
            .map_err(|e| format!("spawn point: {e}"))
    }
}
