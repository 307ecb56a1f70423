use crate::cache::Cache;
use crate::constants::{CACHE_SPAWN_PROBABILITY, INITIAL_TOKEN_BOUND, INITIAL_VALUE_KEY};
use crate::grid::GridPoint;
use crate::luck::seeded_value;
use crate::token::Token;

/// Decides which cells hold caches and what a fresh cache starts with.
/// Stateless: every answer is a pure function of the cell coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Generator {
    pub spawn_probability: f64,
    pub token_bound: u32,
}

impl Default for Generator {
    fn default() -> Self {
        Self::new(CACHE_SPAWN_PROBABILITY, INITIAL_TOKEN_BOUND)
    }
}

impl Generator {
    pub fn new(spawn_probability: f64, token_bound: u32) -> Self {
        Self {
            spawn_probability,
            token_bound,
        }
    }

    pub fn should_spawn(&self, point: GridPoint) -> bool {
        seeded_value(&[point.i.into(), point.j.into()]) < self.spawn_probability
    }

    pub fn initial_value(&self, point: GridPoint) -> f64 {
        seeded_value(&[point.i.into(), point.j.into(), INITIAL_VALUE_KEY.into()])
    }

    pub fn initial_token_count(&self, point: GridPoint) -> u32 {
        token_count_for(self.initial_value(point), self.token_bound)
    }

    /// A never-visited cache at `point`.
    pub fn populate(&self, point: GridPoint) -> Cache {
        Cache::new(point, tokens_for(self.initial_value(point), self.token_bound, point))
    }
}

/// `floor(value * bound)`, for `value` in `[0, 1)`.
pub fn token_count_for(value: f64, bound: u32) -> u32 {
    (value * bound as f64).floor() as u32
}

/// Mint serials `0..floor(value * bound)` at `origin`.
pub fn tokens_for(value: f64, bound: u32, origin: GridPoint) -> Vec<Token> {
    (0..token_count_for(value, bound))
        .map(|serial| Token::new(origin, serial))
        .collect()
}
