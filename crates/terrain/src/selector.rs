use globe::DrawContext;
use tracing::trace;

use crate::level::LevelSet;
use crate::tile::Tile;

/// Quad-tree walk that picks the tiles to draw for a view.
#[derive(Debug, Clone)]
pub struct TileSelector {
    pub level_set: LevelSet,
    pub detail_control: f64,
    top_level_tiles: Vec<Tile>,
    visited: usize,
}

impl TileSelector {
    pub fn new(level_set: LevelSet, detail_control: f64) -> Self {
        Self {
            level_set,
            detail_control,
            top_level_tiles: Vec::new(),
            visited: 0,
        }
    }

    /// Tiles visited by the last [`TileSelector::select`].
    pub fn visited(&self) -> usize {
        self.visited
    }

    /// Visible tiles at the resolution the view needs, nearest first.
    pub fn select(&mut self, dc: &DrawContext<'_>) -> Vec<Tile> {
        if self.top_level_tiles.is_empty() {
            self.top_level_tiles = Tile::create_tiles_for_level(self.level_set.first_level());
        }

        self.visited = 0;
        let mut selected = Vec::new();
        let mut top = std::mem::take(&mut self.top_level_tiles);
        for tile in top.iter_mut() {
            self.visited += 1;
            if tile.is_visible(dc) {
                self.add_tile_or_descendants(dc, tile.clone(), &mut selected);
            }
        }
        self.top_level_tiles = top;

        for tile in selected.iter_mut() {
            tile.distance = tile.distance_to(dc, dc.eye_point);
        }
        selected.sort_by(|a, b| {
            a.distance
                .total_cmp(&b.distance)
                .then_with(|| a.key().cmp(&b.key()))
        });
        selected
    }

    fn add_tile_or_descendants(&mut self, dc: &DrawContext<'_>, tile: Tile, out: &mut Vec<Tile>) {
        let level = tile.level.level_number;
        if self.level_set.is_last_level(level) || !tile.must_subdivide(dc, self.detail_control) {
            out.push(tile);
            return;
        }

        let Some(next) = self.level_set.level(level + 1).copied() else {
            out.push(tile);
            return;
        };

        for mut child in tile.subdivide(&next) {
            self.visited += 1;
            if !self.level_set.sector.intersects(&child.sector) {
                trace!(key = %child.key(), "child outside level set sector");
                continue;
            }
            if child.is_visible(dc) {
                self.add_tile_or_descendants(dc, child, out);
            }
        }
    }
}
