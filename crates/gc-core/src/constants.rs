/// Width and height of one grid cell, in degrees of latitude/longitude.
pub const TILE_DEGREES: f64 = 1e-4;

/// Neighborhood radius in cells around the player's cell.
pub const NEIGHBORHOOD_SIZE: i32 = 8;

/// A cell spawns a cache when its luck falls below this value.
pub const CACHE_SPAWN_PROBABILITY: f64 = 0.1;

/// Upper bound (exclusive) on the number of tokens a fresh cache starts with.
pub const INITIAL_TOKEN_BOUND: u32 = 8;

/// Discriminator mixed into the luck key when sizing a fresh cache.
pub const INITIAL_VALUE_KEY: &str = "initialValue";

/// Where a brand new player starts: Null Island.
pub const SPAWN_LAT: f64 = 0.0;
pub const SPAWN_LNG: f64 = 0.0;

/// Largest accepted neighborhood radius; a refresh scans `(2r)^2` cells.
pub const MAX_NEIGHBORHOOD_SIZE: i32 = 128;

/// Largest accepted token bound; a fresh cache allocates up to this many tokens.
pub const MAX_TOKEN_BOUND: u32 = 10_000;
