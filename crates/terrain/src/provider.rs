use std::collections::BTreeSet;

use crate::tile::TileKey;

/// Receives the tiles a frame wants data for.
///
/// Keys arrive nearest first, so the first ones are the most urgent to load.
pub trait TileDataProvider {
    fn tiles_wanted(&mut self, keys: &[TileKey]);
}

/// Keeps the most recent request, and every key ever asked for.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RecordingTileProvider {
    pub last: Vec<TileKey>,
    pub requests: usize,
    seen: BTreeSet<TileKey>,
}

impl RecordingTileProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_seen(&self, key: &TileKey) -> bool {
        self.seen.contains(key)
    }

    pub fn distinct_keys(&self) -> usize {
        self.seen.len()
    }
}

impl TileDataProvider for RecordingTileProvider {
    fn tiles_wanted(&mut self, keys: &[TileKey]) {
        self.requests += 1;
        self.last = keys.to_vec();
        self.seen.extend(keys.iter().copied());
    }
}
