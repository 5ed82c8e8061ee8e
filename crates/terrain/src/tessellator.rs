use foundation::math::{Location, Sector, Vec3};
use globe::{DrawContext, SectorGeometry};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::cache::{MemoryBudget, TileCache};
use crate::error::TileError;
use crate::level::LevelSet;
use crate::selector::TileSelector;
use crate::tile::{Tile, TileKey};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TessellationConfig {
    pub sector: Sector,
    /// Level-zero tile size in degrees, both axes.
    pub level_zero_delta: f64,
    pub num_levels: usize,
    pub tile_width: u32,
    pub tile_height: u32,
    pub detail_control: f64,
    pub cache_bytes: usize,
}

impl Default for TessellationConfig {
    fn default() -> Self {
        Self {
            sector: Sector::FULL_SPHERE,
            level_zero_delta: 45.0,
            num_levels: 16,
            tile_width: 32,
            tile_height: 32,
            detail_control: 40.0,
            cache_bytes: 64 * 1024 * 1024,
        }
    }
}

impl TessellationConfig {
    pub fn level_set(&self) -> Result<LevelSet, TileError> {
        LevelSet::new(
            self.sector,
            Location::new(self.level_zero_delta, self.level_zero_delta),
            self.num_levels,
            self.tile_width,
            self.tile_height,
        )
    }
}

/// Sampled surface of one tile. Points are relative to `reference_point`,
/// row-major from the south-west corner.
#[derive(Debug, Clone, PartialEq)]
pub struct TerrainGeometry {
    pub vertical_exaggeration: f64,
    pub reference_point: Vec3,
    pub columns: usize,
    pub points: Vec<Vec3>,
}

impl TerrainGeometry {
    pub fn sample(dc: &DrawContext<'_>, tile: &Tile) -> Self {
        let globe = dc.globe;
        let ve = dc.vertical_exaggeration;
        let s = &tile.sector;
        let columns = tile.level.tile_width as usize + 1;
        let rows = tile.level.tile_height as usize + 1;
        let reference_point = s.compute_center_point(globe, ve);

        let dlat = s.delta_latitude() / (rows - 1) as f64;
        let dlon = s.delta_longitude() / (columns - 1) as f64;
        let mut points = Vec::with_capacity(rows * columns);
        for r in 0..rows {
            let lat = if r == rows - 1 { s.max_latitude } else { s.min_latitude + r as f64 * dlat };
            for c in 0..columns {
                let lon = if c == columns - 1 { s.max_longitude } else { s.min_longitude + c as f64 * dlon };
                let h = globe.elevation_at_location(lat, lon) * ve;
                points.push(globe.compute_point_from_position(lat, lon, h) - reference_point);
            }
        }

        Self {
            vertical_exaggeration: ve,
            reference_point,
            columns,
            points,
        }
    }

    pub fn byte_size(&self) -> usize {
        self.points.len() * std::mem::size_of::<Vec3>()
    }

    /// Model coordinates of the sample at `row`, `column`.
    pub fn point(&self, row: usize, column: usize) -> Option<Vec3> {
        if column >= self.columns {
            return None;
        }
        self.points
            .get(row * self.columns + column)
            .map(|p| *p + self.reference_point)
    }
}

/// Result of one tessellation pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Terrain {
    pub tiles: Vec<Tile>,
    /// Union of the selected tile sectors.
    pub sector: Option<Sector>,
}

impl Terrain {
    pub fn keys(&self) -> Vec<TileKey> {
        self.tiles.iter().map(Tile::key).collect()
    }

    pub fn tile_at(&self, latitude: f64, longitude: f64) -> Option<&Tile> {
        self.tiles
            .iter()
            .find(|t| t.sector.contains_location(latitude, longitude))
    }
}

/// Selects terrain tiles for the view and keeps their sampled geometry in a
/// budgeted cache.
#[derive(Debug)]
pub struct Tessellator {
    selector: TileSelector,
    cache: TileCache<TerrainGeometry>,
}

impl Tessellator {
    pub fn new(config: &TessellationConfig) -> Result<Self, TileError> {
        Ok(Self {
            selector: TileSelector::new(config.level_set()?, config.detail_control),
            cache: TileCache::new(MemoryBudget::new(config.cache_bytes)),
        })
    }

    pub fn level_set(&self) -> &LevelSet {
        &self.selector.level_set
    }

    pub fn detail_control(&self) -> f64 {
        self.selector.detail_control
    }

    pub fn set_detail_control(&mut self, detail_control: f64) {
        self.selector.detail_control = detail_control;
    }

    pub fn geometry(&self, key: &TileKey) -> Option<&TerrainGeometry> {
        self.cache.peek(key)
    }

    pub fn cache(&self) -> &TileCache<TerrainGeometry> {
        &self.cache
    }

    pub fn tessellate(&mut self, dc: &DrawContext<'_>) -> Terrain {
        let tiles = self.selector.select(dc);

        // Geometry of this frame's tiles stays pinned until every tile is built.
        let mut pinned = Vec::new();
        let mut built = 0usize;
        let mut evicted = 0usize;
        for tile in &tiles {
            let key = tile.key();
            let fresh = matches!(
                self.cache.get(&key),
                Some(g) if g.vertical_exaggeration == dc.vertical_exaggeration
            );
            if !fresh {
                let geometry = TerrainGeometry::sample(dc, tile);
                let bytes = geometry.byte_size();
                match self.cache.insert(key, geometry, bytes) {
                    Ok(keys) => evicted += keys.len(),
                    Err(err) => warn!(%key, %err, "terrain geometry not cached"),
                }
                built += 1;
            }
            if self.cache.peek(&key).is_some() && self.cache.pin(&key).is_ok() {
                pinned.push(key);
            }
        }
        for key in &pinned {
            if let Err(err) = self.cache.unpin(key) {
                warn!(%key, %err, "terrain geometry not unpinned");
            }
        }

        let sector = tiles.iter().map(|t| t.sector).reduce(|mut acc, s| {
            acc.union(&s);
            acc
        });

        debug!(
            tiles = tiles.len(),
            visited = self.selector.visited(),
            built,
            evicted,
            cache_bytes = self.cache.used_bytes(),
            "tessellated terrain"
        );

        Terrain { tiles, sector }
    }
}
