use foundation::math::{DEGREES_TO_RADIANS, Location, Sector};
use serde::{Deserialize, Serialize};

use crate::error::TileError;

/// One resolution step of a [`LevelSet`].
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub level_number: usize,
    pub sector: Sector,
    /// Tile size in degrees at this level.
    pub tile_delta: Location,
    pub tile_width: u32,
    pub tile_height: u32,
    /// Radians per texel along a tile's latitude axis.
    pub texel_size: f64,
}

impl Level {
    fn new(level_number: usize, tile_delta: Location, set: &LevelSet) -> Self {
        Self {
            level_number,
            sector: set.sector,
            tile_delta,
            tile_width: set.tile_width,
            tile_height: set.tile_height,
            texel_size: tile_delta.latitude * DEGREES_TO_RADIANS / set.tile_height as f64,
        }
    }

    pub fn is_first_level(&self) -> bool {
        self.level_number == 0
    }
}

/// Multi-resolution tiling of a sector. Each level halves the tile delta of
/// the one before it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelSet {
    pub sector: Sector,
    pub level_zero_delta: Location,
    pub tile_width: u32,
    pub tile_height: u32,
    levels: Vec<Level>,
}

impl LevelSet {
    pub fn new(
        sector: Sector,
        level_zero_delta: Location,
        num_levels: usize,
        tile_width: u32,
        tile_height: u32,
    ) -> Result<Self, TileError> {
        if !is_valid_sector(&sector) {
            return Err(TileError::InvalidSector(sector));
        }
        if num_levels < 1 {
            return Err(TileError::InvalidLevelCount(num_levels));
        }
        if tile_width < 1 || tile_height < 1 {
            return Err(TileError::InvalidTileSize {
                width: tile_width,
                height: tile_height,
            });
        }
        if !(level_zero_delta.latitude > 0.0 && level_zero_delta.longitude > 0.0) {
            return Err(TileError::InvalidTileDelta {
                latitude: level_zero_delta.latitude,
                longitude: level_zero_delta.longitude,
            });
        }

        let mut set = Self {
            sector,
            level_zero_delta,
            tile_width,
            tile_height,
            levels: Vec::with_capacity(num_levels),
        };

        let mut delta = level_zero_delta;
        for n in 0..num_levels {
            let level = Level::new(n, delta, &set);
            set.levels.push(level);
            delta = Location::new(delta.latitude / 2.0, delta.longitude / 2.0);
        }

        Ok(set)
    }

    pub fn num_levels(&self) -> usize {
        self.levels.len()
    }

    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    pub fn level(&self, level_number: usize) -> Option<&Level> {
        self.levels.get(level_number)
    }

    pub fn first_level(&self) -> &Level {
        &self.levels[0]
    }

    pub fn last_level(&self) -> &Level {
        &self.levels[self.levels.len() - 1]
    }

    pub fn is_last_level(&self, level_number: usize) -> bool {
        level_number + 1 == self.levels.len()
    }

    /// Coarsest level whose texels are no larger than `texel_size` radians,
    /// or the last level when none is fine enough.
    pub fn level_for_texel_size(&self, texel_size: f64) -> &Level {
        let last = self.last_level();
        if last.texel_size >= texel_size {
            return last;
        }
        self.levels
            .iter()
            .find(|l| l.texel_size <= texel_size)
            .unwrap_or(last)
    }
}

fn is_valid_sector(s: &Sector) -> bool {
    (-90.0..=90.0).contains(&s.min_latitude)
        && (-90.0..=90.0).contains(&s.max_latitude)
        && (-180.0..=180.0).contains(&s.min_longitude)
        && (-180.0..=180.0).contains(&s.max_longitude)
        && s.min_latitude <= s.max_latitude
        && s.min_longitude <= s.max_longitude
}
