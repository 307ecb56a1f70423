//! JSON serde for the save-file wire format.
//!
//! The wire format uses camelCase field names, stores tokens as
//! `[originI, originJ, serial]` triples and keys mementos by the canonical
//! `"i,j"` cell encoding.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::cache::Memento;
use crate::game::GameSnapshot;
use crate::grid::{GridPoint, LatLng};
use crate::inventory::Inventory;
use crate::time::now_iso8601;
use crate::token::Token;

pub const CURRENT_VERSION: &str = "1";

// --- Wire format types ---

#[derive(Serialize, Deserialize, Debug)]
pub struct WireSave {
    pub version: String,
    /// When the file was written, ISO-8601 UTC. Informational only.
    #[serde(default)]
    pub timestamp: String,
    pub player: WirePlayer,
    #[serde(default)]
    pub inventory: Vec<Token>,
    #[serde(default)]
    pub mementos: BTreeMap<String, Vec<Token>>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct WirePlayer {
    pub lat: f64,
    pub lng: f64,
}

// --- Conversion: Wire ↔ Domain ---

impl WireSave {
    /// Convert wire format to a domain snapshot. Fails on a version this
    /// build does not know, a player off the globe, or a memento key that is
    /// not `"i,j"`.
    pub fn into_snapshot(self) -> Result<GameSnapshot, String> {
        if self.version != CURRENT_VERSION {
            return Err(format!(
                "unsupported save version '{}' (expected '{CURRENT_VERSION}')",
                self.version
            ));
        }
        let position = LatLng::new(self.player.lat, self.player.lng);
        position.validate()?;

        let mut mementos = BTreeMap::new();
        for (key, tokens) in self.mementos {
            let point: GridPoint = key.parse().map_err(|e| format!("{e}"))?;
            mementos.insert(point, tokens.into_iter().collect::<Memento>());
        }

        Ok(GameSnapshot {
            position,
            inventory: self.inventory.into_iter().collect::<Inventory>(),
            mementos,
        })
    }

    pub fn from_snapshot(snapshot: &GameSnapshot, timestamp: String) -> Self {
        WireSave {
            version: CURRENT_VERSION.to_string(),
            timestamp,
            player: WirePlayer {
                lat: snapshot.position.lat,
                lng: snapshot.position.lng,
            },
            inventory: snapshot.inventory.tokens().to_vec(),
            mementos: snapshot
                .mementos
                .iter()
                .map(|(point, memento)| (point.key(), memento.tokens().to_vec()))
                .collect(),
        }
    }
}

/// Deserialize a save file into a snapshot.
pub fn import_json(json: &str) -> Result<GameSnapshot, serde_json::Error> {
    let wire: WireSave = serde_json::from_str(json)?;
    wire.into_snapshot().map_err(serde::de::Error::custom)
}

/// Serialize a snapshot to the save-file format, stamped with the current time.
pub fn export_json(snapshot: &GameSnapshot) -> Result<String, serde_json::Error> {
    export_json_at(snapshot, &now_iso8601())
}

pub fn export_json_at(
    snapshot: &GameSnapshot,
    timestamp: &str,
) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&WireSave::from_snapshot(snapshot, timestamp.to_string()))
}
