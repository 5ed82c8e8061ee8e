use std::fmt;
use std::str::FromStr;

use foundation::bounds::Aabb3;
use foundation::math::{Sector, Vec3};
use globe::{DrawContext, SectorGeometry};
use serde::{Deserialize, Serialize};

use crate::error::TileError;
use crate::level::Level;

/// Identity of a tile within a level set. The text form is `level.row.column`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TileKey {
    pub level: usize,
    pub row: u32,
    pub column: u32,
}

impl TileKey {
    pub fn new(level: usize, row: u32, column: u32) -> Self {
        Self { level, row, column }
    }
}

impl fmt::Display for TileKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.level, self.row, self.column)
    }
}

impl FromStr for TileKey {
    type Err = TileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || TileError::InvalidKey(s.to_string());
        let mut parts = s.split('.');
        let level = parts.next().ok_or_else(bad)?.parse().map_err(|_| bad())?;
        let row = parts.next().ok_or_else(bad)?.parse().map_err(|_| bad())?;
        let column = parts.next().ok_or_else(bad)?.parse().map_err(|_| bad())?;
        if parts.next().is_some() {
            return Err(bad());
        }
        Ok(TileKey { level, row, column })
    }
}

/// Row of the tile grid containing `latitude`. The grid's top edge maps to
/// the last row instead of one past it.
pub fn compute_row(delta: f64, latitude: f64) -> u32 {
    let mut row = ((latitude + 90.0) / delta).floor();
    if latitude == 90.0 && row > 0.0 {
        row -= 1.0;
    }
    row.max(0.0) as u32
}

pub fn compute_column(delta: f64, longitude: f64) -> u32 {
    let mut col = ((longitude + 180.0) / delta).floor();
    if longitude == 180.0 && col > 0.0 {
        col -= 1.0;
    }
    col.max(0.0) as u32
}

/// Last row touched by a sector whose top edge is `max_latitude`.
pub fn compute_last_row(delta: f64, max_latitude: f64) -> u32 {
    if max_latitude + 90.0 < delta {
        return 0;
    }
    ((max_latitude + 90.0) / delta - 1.0).ceil().max(0.0) as u32
}

pub fn compute_last_column(delta: f64, max_longitude: f64) -> u32 {
    if max_longitude + 180.0 < delta {
        return 0;
    }
    ((max_longitude + 180.0) / delta - 1.0).ceil().max(0.0) as u32
}

/// Sector covered by the tile at `row`, `column` of `level`.
pub fn compute_sector(level: &Level, row: u32, column: u32) -> Sector {
    let dlat = level.tile_delta.latitude;
    let dlon = level.tile_delta.longitude;
    let min_lat = -90.0 + row as f64 * dlat;
    let min_lon = -180.0 + column as f64 * dlon;
    Sector::new(min_lat, min_lat + dlat, min_lon, min_lon + dlon)
}

/// A cell of the quad-tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    pub sector: Sector,
    pub level: Level,
    pub row: u32,
    pub column: u32,
    /// Distance from the eye, filled in during selection.
    pub distance: f64,
    extent: Option<(f64, Aabb3)>,
}

impl Tile {
    pub fn new(sector: Sector, level: Level, row: u32, column: u32) -> Self {
        Self {
            sector,
            level,
            row,
            column,
            distance: 0.0,
            extent: None,
        }
    }

    pub fn key(&self) -> TileKey {
        TileKey::new(self.level.level_number, self.row, self.column)
    }

    pub fn texel_size(&self) -> f64 {
        self.level.texel_size
    }

    /// Every tile of `level` that touches the level's sector, row-major from
    /// the south-west.
    pub fn create_tiles_for_level(level: &Level) -> Vec<Tile> {
        let dlat = level.tile_delta.latitude;
        let dlon = level.tile_delta.longitude;
        let sector = level.sector;

        let first_row = compute_row(dlat, sector.min_latitude);
        let last_row = compute_last_row(dlat, sector.max_latitude);
        let first_col = compute_column(dlon, sector.min_longitude);
        let last_col = compute_last_column(dlon, sector.max_longitude);

        let rows = (last_row + 1).saturating_sub(first_row) as usize;
        let cols = (last_col + 1).saturating_sub(first_col) as usize;
        let mut tiles = Vec::with_capacity(rows * cols);
        for row in first_row..=last_row {
            for col in first_col..=last_col {
                tiles.push(Tile::new(compute_sector(level, row, col), *level, row, col));
            }
        }
        tiles
    }

    /// The four children on `next_level`: SW, SE, NW, NE.
    pub fn subdivide(&self, next_level: &Level) -> [Tile; 4] {
        let s = &self.sector;
        let mid_lat = s.centroid_latitude();
        let mid_lon = s.centroid_longitude();
        let r = self.row * 2;
        let c = self.column * 2;
        let lvl = *next_level;

        [
            Tile::new(
                Sector::new(s.min_latitude, mid_lat, s.min_longitude, mid_lon),
                lvl,
                r,
                c,
            ),
            Tile::new(
                Sector::new(s.min_latitude, mid_lat, mid_lon, s.max_longitude),
                lvl,
                r,
                c + 1,
            ),
            Tile::new(
                Sector::new(mid_lat, s.max_latitude, s.min_longitude, mid_lon),
                lvl,
                r + 1,
                c,
            ),
            Tile::new(
                Sector::new(mid_lat, s.max_latitude, mid_lon, s.max_longitude),
                lvl,
                r + 1,
                c + 1,
            ),
        ]
    }

    pub fn distance_to(&self, dc: &DrawContext<'_>, point: Vec3) -> f64 {
        self.sector
            .distance_to(dc.globe, dc.vertical_exaggeration, point)
    }

    /// True when the tile's texels are coarser on screen than `detail_control`
    /// pixels allow.
    pub fn must_subdivide(&self, dc: &DrawContext<'_>, detail_control: f64) -> bool {
        let cell_size = dc.globe.equatorial_radius() * self.texel_size();
        let distance = self.distance_to(dc, dc.eye_point);
        let pixel_size = dc.pixel_size_at_distance(distance);
        cell_size > (detail_control * pixel_size).max(0.5)
    }

    /// Bounding box of the terrain under the tile, recomputed when the
    /// vertical exaggeration changes.
    pub fn extent(&mut self, dc: &DrawContext<'_>) -> Aabb3 {
        match self.extent {
            Some((ve, aabb)) if ve == dc.vertical_exaggeration => aabb,
            _ => {
                let aabb = self
                    .sector
                    .compute_extent(dc.globe, dc.vertical_exaggeration);
                self.extent = Some((dc.vertical_exaggeration, aabb));
                aabb
            }
        }
    }

    pub fn is_visible(&mut self, dc: &DrawContext<'_>) -> bool {
        let extent = self.extent(dc);
        dc.frustum.intersects_aabb(&extent)
    }
}

#[cfg(test)]
mod tests {
    use super::{Tile, TileKey, compute_column, compute_last_row, compute_row, compute_sector};
    use crate::level::LevelSet;
    use foundation::math::{Location, Position, Sector};
    use globe::{Camera, ConstantElevation, DrawContext, Globe, Projection};
    use pretty_assertions::assert_eq;

    fn levels() -> LevelSet {
        LevelSet::new(Sector::FULL_SPHERE, Location::new(45.0, 45.0), 4, 32, 32).unwrap()
    }

    #[test]
    fn key_text_form_round_trips() {
        let k = TileKey::new(3, 12, 7);
        assert_eq!(k.to_string(), "3.12.7");
        assert_eq!("3.12.7".parse::<TileKey>().unwrap(), k);
        assert!("3.12".parse::<TileKey>().is_err());
        assert!("3.12.7.1".parse::<TileKey>().is_err());
        assert!("a.b.c".parse::<TileKey>().is_err());
    }

    #[test]
    fn grid_edges_map_to_the_last_cell() {
        assert_eq!(compute_row(45.0, 90.0), 3);
        assert_eq!(compute_row(45.0, -90.0), 0);
        assert_eq!(compute_row(45.0, 0.0), 2);
        assert_eq!(compute_column(45.0, 180.0), 7);
        assert_eq!(compute_last_row(45.0, 90.0), 3);
        assert_eq!(compute_last_row(45.0, -60.0), 0);
        assert_eq!(compute_last_row(45.0, 1.0), 2);
    }

    #[test]
    fn level_zero_covers_the_sphere_with_4_by_8_tiles() {
        let set = levels();
        let tiles = Tile::create_tiles_for_level(set.first_level());
        assert_eq!(tiles.len(), 32);
        assert_eq!(tiles[0].sector, Sector::new(-90.0, -45.0, -180.0, -135.0));
        assert_eq!(tiles[31].key(), TileKey::new(0, 3, 7));
        assert_eq!(tiles[31].sector, Sector::new(45.0, 90.0, 135.0, 180.0));
    }

    #[test]
    fn inverted_level_sector_yields_no_tiles() {
        let mut level = *levels().first_level();
        level.sector = Sector::new(10.0, -10.0, 0.0, 10.0);
        assert!(Tile::create_tiles_for_level(&level).is_empty());
    }

    #[test]
    fn children_partition_the_parent() {
        let set = levels();
        let parent = Tile::new(
            compute_sector(set.first_level(), 2, 4),
            *set.first_level(),
            2,
            4,
        );
        let children = parent.subdivide(set.level(1).unwrap());

        let keys: Vec<TileKey> = children.iter().map(Tile::key).collect();
        assert_eq!(
            keys,
            vec![
                TileKey::new(1, 4, 8),
                TileKey::new(1, 4, 9),
                TileKey::new(1, 5, 8),
                TileKey::new(1, 5, 9),
            ]
        );

        let mut union = children[0].sector;
        for c in &children[1..] {
            union.union(&c.sector);
        }
        assert_eq!(union, parent.sector);

        let area: f64 = children
            .iter()
            .map(|c| c.sector.delta_latitude() * c.sector.delta_longitude())
            .sum();
        assert_eq!(area, parent.sector.delta_latitude() * parent.sector.delta_longitude());

        for c in &children {
            assert_eq!(compute_sector(set.level(1).unwrap(), c.row, c.column), c.sector);
        }
    }

    #[test]
    fn near_tiles_subdivide_and_far_tiles_do_not() {
        let set = levels();
        let g = Globe::wgs84();
        let cam = Camera::new(Position::new(0.0, 0.0, 100_000.0));
        let dc = DrawContext::new(&g, &cam, Projection::default(), 1.0);

        let under = Tile::new(Sector::new(0.0, 45.0, 0.0, 45.0), *set.first_level(), 2, 4);
        assert!(under.must_subdivide(&dc, 40.0));

        let far_cam = Camera::new(Position::new(0.0, 0.0, 1.0e9));
        let far_dc = DrawContext::new(&g, &far_cam, Projection::default(), 1.0);
        assert!(!under.must_subdivide(&far_dc, 40.0));
    }

    #[test]
    fn extent_is_cached_per_exaggeration() {
        let set = levels();
        let mut g = Globe::wgs84();
        g.set_elevation_model(Box::new(ConstantElevation(100.0)));
        let cam = Camera::new(Position::new(20.0, 20.0, 1.0e6));
        let dc = DrawContext::new(&g, &cam, Projection::default(), 1.0);
        let mut t = Tile::new(Sector::new(0.0, 45.0, 0.0, 45.0), *set.first_level(), 2, 4);
        let a = t.extent(&dc);
        assert_eq!(t.extent(&dc), a);
        assert!(t.is_visible(&dc));

        let dc2 = DrawContext::new(&g, &cam, Projection::default(), 50.0);
        assert!(t.extent(&dc2) != a);
    }
}
