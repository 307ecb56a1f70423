use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::TILE_DEGREES;

/// A cell in the fixed tiling. `i` counts tiles of latitude, `j` of longitude.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridPoint {
    pub i: i32,
    pub j: i32,
}

impl GridPoint {
    pub const fn new(i: i32, j: i32) -> Self {
        Self { i, j }
    }

    /// Canonical `"i,j"` encoding used on the wire and in save files.
    pub fn key(&self) -> String {
        self.to_string()
    }

    /// Shifted by `(di, dj)`, clamped at the edge of the `i32` plane.
    pub fn offset(&self, di: i32, dj: i32) -> Self {
        Self::new(self.i.saturating_add(di), self.j.saturating_add(dj))
    }
}

impl fmt::Display for GridPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.i, self.j)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseGridPointError(String);

impl fmt::Display for ParseGridPointError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid grid point '{}': expected \"i,j\"", self.0)
    }
}

impl std::error::Error for ParseGridPointError {}

impl FromStr for GridPoint {
    type Err = ParseGridPointError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseGridPointError(s.to_string());
        let (i, j) = s.split_once(',').ok_or_else(err)?;
        let i = i.trim().parse().map_err(|_| err())?;
        let j = j.trim().parse().map_err(|_| err())?;
        Ok(Self::new(i, j))
    }
}

/// A position in degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Whether this is a real place on Earth: lat in `[-90, 90]`, lng in
    /// `[-180, 180]`. NaN is never valid.
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lng)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(format!(
                "position ({}, {}) is outside lat [-90, 90] / lng [-180, 180]",
                self.lat, self.lng
            ))
        }
    }
}

impl fmt::Display for LatLng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}, {:.6}", self.lat, self.lng)
    }
}

/// South-west and north-east corners of a cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellBounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

/// Maps positions to cells and back. Cell (0, 0) has its south-west
/// corner at `origin`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Grid {
    pub origin: LatLng,
    pub tile_degrees: f64,
}

impl Default for Grid {
    fn default() -> Self {
        Self::new(LatLng::new(0.0, 0.0), TILE_DEGREES)
    }
}

impl Grid {
    pub fn new(origin: LatLng, tile_degrees: f64) -> Self {
        Self {
            origin,
            tile_degrees,
        }
    }

    /// The cell containing `pos`.
    pub fn cell_for(&self, pos: LatLng) -> GridPoint {
        // Nudge by a fraction of a tile so positions reached by whole-tile
        // steps don't land one cell short through rounding.
        let eps = self.tile_degrees * 1e-6;
        let i = ((pos.lat - self.origin.lat + eps) / self.tile_degrees).floor() as i32;
        let j = ((pos.lng - self.origin.lng + eps) / self.tile_degrees).floor() as i32;
        GridPoint::new(i, j)
    }

    pub fn bounds(&self, point: GridPoint) -> CellBounds {
        let corner = |i: i32, j: i32| {
            LatLng::new(
                self.origin.lat + i as f64 * self.tile_degrees,
                self.origin.lng + j as f64 * self.tile_degrees,
            )
        };
        CellBounds {
            south_west: corner(point.i, point.j),
            north_east: corner(point.i + 1, point.j + 1),
        }
    }
}

/// Cells of the square neighborhood around `center`:
/// `i` in `[center.i - radius, center.i + radius)`, same for `j`.
///
/// The upper bound is exclusive, so the square is not centered on `center`.
/// Yields rows in ascending `i`, then ascending `j`.
pub fn neighborhood(center: GridPoint, radius: i32) -> impl Iterator<Item = GridPoint> {
    let radius = radius.max(0);
    // Near the i32 edges the square is clipped rather than wrapped.
    let span = move |c: i32| c.saturating_sub(radius)..c.saturating_add(radius);
    span(center.i).flat_map(move |i| span(center.j).map(move |j| GridPoint::new(i, j)))
}
