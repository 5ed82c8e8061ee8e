use foundation::math::Sector;

/// Source of terrain heights in meters above the ellipsoid.
///
/// Implementations are external (elevation coverages, cached tiles); the
/// globe only needs point queries and per-sector extremes for tile bounds.
pub trait ElevationModel: std::fmt::Debug {
    fn elevation_at(&self, latitude: f64, longitude: f64) -> f64;

    /// `(min, max)` elevation inside the sector.
    fn min_and_max_elevations(&self, sector: &Sector) -> (f64, f64);
}

/// Bare ellipsoid.
#[derive(Debug, Default, Copy, Clone)]
pub struct ZeroElevation;

impl ElevationModel for ZeroElevation {
    fn elevation_at(&self, _latitude: f64, _longitude: f64) -> f64 {
        0.0
    }

    fn min_and_max_elevations(&self, _sector: &Sector) -> (f64, f64) {
        (0.0, 0.0)
    }
}

/// Flat plateau at a fixed height.
#[derive(Debug, Copy, Clone)]
pub struct ConstantElevation(pub f64);

impl ElevationModel for ConstantElevation {
    fn elevation_at(&self, _latitude: f64, _longitude: f64) -> f64 {
        self.0
    }

    fn min_and_max_elevations(&self, _sector: &Sector) -> (f64, f64) {
        (self.0, self.0)
    }
}
