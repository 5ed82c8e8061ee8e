use foundation::math::Sector;
use serde::{Deserialize, Serialize};

use crate::error::TileError;

/// A fixed grid of tiles over a sector, addressed from the top-left corner.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileMatrix {
    pub sector: Sector,
    pub matrix_width: u32,
    pub matrix_height: u32,
    pub tile_width: u32,
    pub tile_height: u32,
    pub degrees_per_pixel: f64,
}

impl TileMatrix {
    pub fn new(
        sector: Sector,
        matrix_width: u32,
        matrix_height: u32,
        tile_width: u32,
        tile_height: u32,
    ) -> Result<Self, TileError> {
        if matrix_width < 1 || matrix_height < 1 {
            return Err(TileError::InvalidMatrixSize {
                width: matrix_width,
                height: matrix_height,
            });
        }
        if tile_width < 1 || tile_height < 1 {
            return Err(TileError::InvalidTileSize {
                width: tile_width,
                height: tile_height,
            });
        }
        let degrees_per_pixel =
            sector.delta_latitude() / (matrix_height as f64 * tile_height as f64);
        Ok(Self {
            sector,
            matrix_width,
            matrix_height,
            tile_width,
            tile_height,
            degrees_per_pixel,
        })
    }

    /// Sector of the tile at `row` (counted from the top) and `column`.
    pub fn tile_sector(&self, row: u32, column: u32) -> Sector {
        let dlat = self.sector.delta_latitude() / self.matrix_height as f64;
        let dlon = self.sector.delta_longitude() / self.matrix_width as f64;
        let max_lat = self.sector.max_latitude - dlat * row as f64;
        let min_lon = self.sector.min_longitude + dlon * column as f64;
        Sector::new(max_lat - dlat, max_lat, min_lon, min_lon + dlon)
    }

    pub fn tile_count(&self) -> u64 {
        self.matrix_width as u64 * self.matrix_height as u64
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileMatrixSet {
    pub sector: Sector,
    pub entries: Vec<TileMatrix>,
}

impl TileMatrixSet {
    pub fn new(sector: Sector, entries: Vec<TileMatrix>) -> Self {
        Self { sector, entries }
    }

    /// A pyramid whose matrix dimensions double at each level.
    pub fn from_tile_pyramid(
        sector: Sector,
        matrix_width: u32,
        matrix_height: u32,
        tile_width: u32,
        tile_height: u32,
        num_levels: usize,
    ) -> Result<Self, TileError> {
        if num_levels < 1 {
            return Err(TileError::InvalidLevelCount(num_levels));
        }
        let mut entries = Vec::with_capacity(num_levels);
        let (mut w, mut h) = (matrix_width, matrix_height);
        for _ in 0..num_levels {
            entries.push(TileMatrix::new(sector, w, h, tile_width, tile_height)?);
            w = w.saturating_mul(2);
            h = h.saturating_mul(2);
        }
        Ok(Self { sector, entries })
    }

    pub fn index_of_matrix_nearest(&self, degrees_per_pixel: f64) -> Option<usize> {
        self.entries
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                (a.degrees_per_pixel - degrees_per_pixel)
                    .abs()
                    .total_cmp(&(b.degrees_per_pixel - degrees_per_pixel).abs())
            })
            .map(|(i, _)| i)
    }
}

#[cfg(test)]
mod tests {
    use super::{TileMatrix, TileMatrixSet};
    use crate::error::TileError;
    use foundation::math::Sector;
    use pretty_assertions::assert_eq;

    #[test]
    fn rows_count_from_the_top() {
        let m = TileMatrix::new(Sector::FULL_SPHERE, 2, 1, 256, 256).unwrap();
        assert_eq!(m.tile_sector(0, 0), Sector::new(-90.0, 90.0, -180.0, 0.0));
        assert_eq!(m.tile_sector(0, 1), Sector::new(-90.0, 90.0, 0.0, 180.0));

        let m = TileMatrix::new(Sector::FULL_SPHERE, 4, 2, 256, 256).unwrap();
        assert_eq!(m.tile_sector(0, 0), Sector::new(0.0, 90.0, -180.0, -90.0));
        assert_eq!(m.tile_sector(1, 3), Sector::new(-90.0, 0.0, 90.0, 180.0));
        assert_eq!(m.degrees_per_pixel, 180.0 / 512.0);
        assert_eq!(m.tile_count(), 8);
    }

    #[test]
    fn pyramid_doubles_and_finds_nearest_resolution() {
        let set = TileMatrixSet::from_tile_pyramid(Sector::FULL_SPHERE, 2, 1, 256, 256, 4).unwrap();
        let dims: Vec<(u32, u32)> = set
            .entries
            .iter()
            .map(|m| (m.matrix_width, m.matrix_height))
            .collect();
        assert_eq!(dims, vec![(2, 1), (4, 2), (8, 4), (16, 8)]);

        let dpp2 = set.entries[2].degrees_per_pixel;
        assert_eq!(set.index_of_matrix_nearest(dpp2 * 1.1), Some(2));
        assert_eq!(set.index_of_matrix_nearest(100.0), Some(0));
        assert_eq!(set.index_of_matrix_nearest(0.0), Some(3));
        assert_eq!(TileMatrixSet::new(Sector::FULL_SPHERE, vec![]).index_of_matrix_nearest(1.0), None);
    }

    #[test]
    fn rejects_empty_dimensions() {
        assert_eq!(
            TileMatrix::new(Sector::FULL_SPHERE, 0, 1, 256, 256),
            Err(TileError::InvalidMatrixSize { width: 0, height: 1 })
        );
        assert!(TileMatrixSet::from_tile_pyramid(Sector::FULL_SPHERE, 1, 1, 256, 256, 0).is_err());
    }
}
