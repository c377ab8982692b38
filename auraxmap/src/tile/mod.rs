//! Tile addressing module
//!
//! Deterministic coordinate math mapping a `(map code, LOD, x, y)` tuple
//! to exactly one static asset, and enumeration of the valid tile grid
//! for each level of detail.
//!
//! # Design
//!
//! Maps are pre-rendered as a three-step LOD pyramid over a logical
//! 8192 px image. LOD 0 is the highest resolution and splits the map
//! into 8×8 tiles; every LOD increment halves the per-axis tile count:
//!
//! ```text
//! LOD 0: 8×8 tiles, 1024 px of map each
//! LOD 1: 4×4 tiles, 2048 px of map each
//! LOD 2: 2×2 tiles, 4096 px of map each
//! LOD 3: 1 tile at (0, 0), the whole map
//! ```
//!
//! Tile indices are centred on the map origin: for a per-axis count `n`
//! the valid range is `[-n/2, n/2 - 1]`, so at LOD 1 the indices run
//! from -2 to 1. LOD 3 is a fixed special case with its single tile at
//! `(0, 0)`; the centred range formula does not apply there.
//!
//! This module is pure: no I/O, no clocks, no global state.

mod types;

pub use types::{AssetPath, TileCoord, TileError, BASE_MAP_SIZE, MAX_LOD, MIN_LOD};

use std::collections::BTreeSet;
use std::path::PathBuf;

/// Returns the per-axis tile count for a level of detail.
///
/// Fails with [`TileError::InvalidLevelOfDetail`] for LODs outside
/// `MIN_LOD..=MAX_LOD`.
#[inline]
pub fn tile_count(lod: u8) -> Result<u32, TileError> {
    if lod > MAX_LOD {
        return Err(TileError::InvalidLevelOfDetail(lod));
    }
    Ok(1 << (MAX_LOD - lod))
}

/// Returns the logical pixel size of one tile at the given level of
/// detail.
#[inline]
pub fn tile_size(lod: u8) -> Result<f64, TileError> {
    Ok(BASE_MAP_SIZE / tile_count(lod)? as f64)
}

/// Checks whether `(x, y)` addresses a tile that exists at the given
/// level of detail.
///
/// At [`MAX_LOD`] only the single tile `(0, 0)` exists. For every other
/// valid LOD both coordinates must lie in the centred half-open range
/// `[-n/2, n/2 - 1]` where `n` is [`tile_count`]. Invalid LODs have no
/// valid tiles at all.
#[inline]
pub fn validate_coordinate(lod: u8, x: i32, y: i32) -> bool {
    let Ok(count) = tile_count(lod) else {
        return false;
    };
    if lod == MAX_LOD {
        return (x, y) == (0, 0);
    }
    let half = (count / 2) as i32;
    let range = -half..half;
    range.contains(&x) && range.contains(&y)
}

/// Returns an iterator over every valid tile coordinate at the given
/// level of detail, in row-major order (south to north, west to east).
pub fn tile_coordinates(lod: u8) -> Result<TileCoordIter, TileError> {
    let count = tile_count(lod)?;
    Ok(TileCoordIter {
        lod,
        count,
        current: 0,
    })
}

/// Iterator over the valid tile grid of one LOD level.
///
/// Yields `count × count` coordinates; the LOD 3 grid is the single
/// `(0, 0)` tile.
#[derive(Debug, Clone)]
pub struct TileCoordIter {
    lod: u8,
    count: u32,
    current: u32,
}

impl Iterator for TileCoordIter {
    type Item = TileCoord;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current >= self.count * self.count {
            return None;
        }
        if self.lod == MAX_LOD {
            self.current += 1;
            return Some(TileCoord {
                lod: self.lod,
                x: 0,
                y: 0,
            });
        }
        let half = (self.count / 2) as i32;
        let row = (self.current / self.count) as i32;
        let col = (self.current % self.count) as i32;
        self.current += 1;
        Some(TileCoord {
            lod: self.lod,
            x: col - half,
            y: row - half,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.count * self.count - self.current) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for TileCoordIter {
    fn len(&self) -> usize {
        (self.count * self.count - self.current) as usize
    }
}

/// Resolves validated tile and hex asset paths for a known set of maps.
///
/// The catalog holds the map codes it will resolve for; everything else
/// is stateless math. Construct it from the loaded continent codes so
/// that unknown-map failures are consistent with the topology actually
/// being served.
#[derive(Debug, Clone)]
pub struct TileCatalog {
    codes: BTreeSet<String>,
}

impl TileCatalog {
    /// Create a catalog resolving assets for the given map codes.
    pub fn new<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            codes: codes.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether the given map code is known to this catalog.
    #[inline]
    pub fn contains(&self, map_code: &str) -> bool {
        self.codes.contains(map_code)
    }

    /// Resolve a tile request to its asset path.
    ///
    /// Returns the path of the tile image relative to the asset root,
    /// e.g. `tile/amerish/lod1_-2_0.jpg`.
    ///
    /// # Errors
    ///
    /// [`TileError::UnknownMap`] if `map_code` is not in the catalog,
    /// [`TileError::InvalidCoordinate`] if no tile exists at the given
    /// LOD and indices.
    pub fn resolve(&self, map_code: &str, lod: u8, x: i32, y: i32) -> Result<AssetPath, TileError> {
        if !self.contains(map_code) {
            return Err(TileError::UnknownMap(map_code.to_owned()));
        }
        if !validate_coordinate(lod, x, y) {
            return Err(TileError::InvalidCoordinate { lod, x, y });
        }
        let mut path = PathBuf::from("tile");
        path.push(map_code);
        path.push(format!("lod{}_{}_{}.jpg", lod, x, y));
        Ok(path)
    }

    /// Resolve the hex outline SVG path for a map, relative to the asset
    /// root, e.g. `hex/amerish.svg`.
    ///
    /// # Errors
    ///
    /// [`TileError::UnknownMap`] if `map_code` is not in the catalog.
    pub fn hex_path(&self, map_code: &str) -> Result<AssetPath, TileError> {
        if !self.contains(map_code) {
            return Err(TileError::UnknownMap(map_code.to_owned()));
        }
        let mut path = PathBuf::from("hex");
        path.push(format!("{}.svg", map_code));
        Ok(path)
    }
}
