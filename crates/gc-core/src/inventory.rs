use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::cache::take_random;
use crate::token::Token;

/// The player's tokens. Grows by collecting, shrinks by depositing.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inventory {
    tokens: Vec<Token>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub(crate) fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    pub(crate) fn take_random(&mut self, rng: &mut impl Rng) -> Option<Token> {
        take_random(&mut self.tokens, rng)
    }
}

impl FromIterator<Token> for Inventory {
    fn from_iter<I: IntoIterator<Item = Token>>(iter: I) -> Self {
        Self {
            tokens: iter.into_iter().collect(),
        }
    }
}
