use std::path::PathBuf;

use gesture::GestureError;
use terrain::TileError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid configuration json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("gesture setting `{0}` is out of range")]
    Gesture(&'static str),
    #[error("navigation setting `{0}` is out of range")]
    Navigation(&'static str),
    #[error("tessellation settings rejected: {0}")]
    Tessellation(#[from] TileError),
}

#[derive(Debug, Error)]
pub enum WindowError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Tile(#[from] TileError),
    #[error(transparent)]
    Gesture(#[from] GestureError),
    #[error("viewport must have a positive size, got {width}x{height}")]
    InvalidViewport { width: f64, height: f64 },
}
