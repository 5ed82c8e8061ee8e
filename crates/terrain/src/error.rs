use foundation::math::Sector;
use thiserror::Error;

use crate::tile::TileKey;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TileError {
    #[error("level count must be at least 1, got {0}")]
    InvalidLevelCount(usize),
    #[error("tile dimensions must be at least 1x1, got {width}x{height}")]
    InvalidTileSize { width: u32, height: u32 },
    #[error("level-zero tile delta must be positive, got {latitude}x{longitude}")]
    InvalidTileDelta { latitude: f64, longitude: f64 },
    #[error("level set sector must be ordered and within [-90, 90]x[-180, 180], got {0:?}")]
    InvalidSector(Sector),
    #[error("matrix dimensions must be at least 1x1, got {width}x{height}")]
    InvalidMatrixSize { width: u32, height: u32 },
    #[error("level {level} out of range (levels: {count})")]
    LevelOutOfRange { level: usize, count: usize },
    #[error("invalid tile key {0:?}, expected level.row.column")]
    InvalidKey(String),
    #[error("server address must not be empty")]
    MissingServerAddress,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheError {
    #[error("entry too large for budget: requested={requested} max={max}")]
    BudgetExceeded { requested: usize, max: usize },
    #[error("no evictable entries (all pinned?)")]
    NoEvictableEntries,
    #[error("unknown cache key {0}")]
    UnknownKey(TileKey),
}
