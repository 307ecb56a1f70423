use std::fmt;

use serde::{Deserialize, Serialize};

use crate::grid::GridPoint;

/// A collectible token. Identity is the cell it was minted in plus a serial
/// unique within that cell. Serialized as `[originI, originJ, serial]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "(i32, i32, u32)", into = "(i32, i32, u32)")]
pub struct Token {
    pub origin: GridPoint,
    pub serial: u32,
}

impl Token {
    pub fn new(origin: GridPoint, serial: u32) -> Self {
        Self { origin, serial }
    }
}

impl From<(i32, i32, u32)> for Token {
    fn from((i, j, serial): (i32, i32, u32)) -> Self {
        Self::new(GridPoint::new(i, j), serial)
    }
}

impl From<Token> for (i32, i32, u32) {
    fn from(t: Token) -> Self {
        (t.origin.i, t.origin.j, t.serial)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}#{}", self.origin.i, self.origin.j, self.serial)
    }
}
