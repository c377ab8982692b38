//! Tile coordinate type definitions

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Lowest level of detail index (highest resolution).
pub const MIN_LOD: u8 = 0;

/// Highest level of detail index (lowest resolution, single tile).
pub const MAX_LOD: u8 = 3;

/// Logical pixel size of a fully assembled map at LOD 0.
pub const BASE_MAP_SIZE: f64 = 8192.0;

/// A tile position within the LOD pyramid of one map.
///
/// Coordinates use the map centre as origin, +x east and +y north, and
/// are only meaningful together with their `lod`: the valid index range
/// shrinks as the level of detail decreases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileCoord {
    /// Level of detail, 0 (highest resolution) to [`MAX_LOD`]
    pub lod: u8,
    /// Horizontal tile index, east positive
    pub x: i32,
    /// Vertical tile index, north positive
    pub y: i32,
}

/// Path of a static asset, relative to the asset root directory.
pub type AssetPath = PathBuf;

/// Errors that can occur during tile address resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TileError {
    /// Level of detail outside the supported 0..=MAX_LOD range
    InvalidLevelOfDetail(u8),
    /// Map code does not identify a known continent
    UnknownMap(String),
    /// Coordinates outside the valid index range for the level of detail
    InvalidCoordinate {
        /// Requested level of detail
        lod: u8,
        /// Requested horizontal index
        x: i32,
        /// Requested vertical index
        y: i32,
    },
}

impl fmt::Display for TileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TileError::InvalidLevelOfDetail(lod) => {
                write!(
                    f,
                    "Invalid level of detail: {} (must be between {} and {})",
                    lod, MIN_LOD, MAX_LOD
                )
            }
            TileError::UnknownMap(code) => write!(f, "Unknown map code: '{}'", code),
            TileError::InvalidCoordinate { lod, x, y } => {
                write!(f, "No tile at ({}, {}) for LOD {}", x, y, lod)
            }
        }
    }
}

impl std::error::Error for TileError {}
