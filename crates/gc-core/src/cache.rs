use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::grid::GridPoint;
use crate::token::Token;

/// A spawned cache: the tokens currently held at one cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cache {
    pub point: GridPoint,
    tokens: Vec<Token>,
}

impl Cache {
    pub fn new(point: GridPoint, tokens: Vec<Token>) -> Self {
        Self { point, tokens }
    }

    pub fn empty(point: GridPoint) -> Self {
        Self::new(point, Vec::new())
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    /// Remove a uniformly random token.
    pub fn take_random(&mut self, rng: &mut impl Rng) -> Option<Token> {
        take_random(&mut self.tokens, rng)
    }

    /// Snapshot the token collection.
    pub fn to_memento(&self) -> Memento {
        Memento {
            tokens: self.tokens.clone(),
        }
    }

    /// Rebuild a cache from a snapshot taken at `point`.
    pub fn from_memento(point: GridPoint, memento: Memento) -> Self {
        Self::new(point, memento.tokens)
    }
}

/// Saved state of an evicted cache. Opaque outside this crate: the only way
/// to get tokens back out is to restore it into a [`Cache`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Memento {
    tokens: Vec<Token>,
}

impl Memento {
    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    pub(crate) fn from_tokens(tokens: Vec<Token>) -> Self {
        Self { tokens }
    }

    /// Tokens in the order they were held, for persistence.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }
}

impl FromIterator<Token> for Memento {
    fn from_iter<I: IntoIterator<Item = Token>>(iter: I) -> Self {
        Self::from_tokens(iter.into_iter().collect())
    }
}

pub(crate) fn take_random(tokens: &mut Vec<Token>, rng: &mut impl Rng) -> Option<Token> {
    if tokens.is_empty() {
        return None;
    }
    let idx = rng.random_range(0..tokens.len());
    Some(tokens.remove(idx))
}
