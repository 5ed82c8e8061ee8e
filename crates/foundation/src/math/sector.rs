use serde::{Deserialize, Serialize};

use super::{DEGREES_TO_RADIANS, Location};
use crate::error::GeometryError;

/// Axis-aligned latitude/longitude rectangle in degrees.
///
/// Longitudes are expected pre-normalized to [-180, 180]; nothing here wraps
/// them. Set operations mutate in place and return `&mut Self` for chaining.
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sector {
    pub min_latitude: f64,
    pub max_latitude: f64,
    pub min_longitude: f64,
    pub max_longitude: f64,
}

impl Sector {
    pub const ZERO: Sector = Sector::new(0.0, 0.0, 0.0, 0.0);
    pub const FULL_SPHERE: Sector = Sector::new(-90.0, 90.0, -180.0, 180.0);

    pub const fn new(
        min_latitude: f64,
        max_latitude: f64,
        min_longitude: f64,
        max_longitude: f64,
    ) -> Self {
        Self {
            min_latitude,
            max_latitude,
            min_longitude,
            max_longitude,
        }
    }

    /// Smallest sector containing every location.
    pub fn bounding(locations: &[Location]) -> Result<Self, GeometryError> {
        let mut s = Sector::ZERO;
        s.set_to_bounding_sector(locations)?;
        Ok(s)
    }

    /// Bounding sectors for a location set that straddles the antimeridian.
    ///
    /// Returns `[eastern, western]` halves, or `None` when the locations
    /// collapse to a single point.
    pub fn split_bounding_sectors(
        locations: &[Location],
    ) -> Result<Option<[Sector; 2]>, GeometryError> {
        if locations.len() < 2 {
            return Err(GeometryError::TooFewLocations {
                required: 2,
                got: locations.len(),
            });
        }

        let mut min_lat = 90.0_f64;
        let mut max_lat = -90.0_f64;
        let mut min_lon = 180.0_f64;
        let mut max_lon = -180.0_f64;
        let mut last: Option<&Location> = None;

        for loc in locations {
            min_lat = min_lat.min(loc.latitude);
            max_lat = max_lat.max(loc.latitude);

            let lon = loc.longitude;
            if lon >= 0.0 && lon < min_lon {
                min_lon = lon;
            }
            if lon <= 0.0 && lon > max_lon {
                max_lon = lon;
            }

            if let Some(prev) = last
                && signum(lon) != signum(prev.longitude)
                && (lon - prev.longitude).abs() < 180.0
            {
                // The path crosses the prime meridian as well.
                min_lon = 0.0;
                max_lon = 0.0;
            }
            last = Some(loc);
        }

        if min_lat == max_lat && min_lon == max_lon {
            return Ok(None);
        }

        Ok(Some([
            Sector::new(min_lat, max_lat, min_lon, 180.0),
            Sector::new(min_lat, max_lat, -180.0, max_lon),
        ]))
    }

    pub fn copy_from(&mut self, other: &Sector) -> &mut Self {
        *self = *other;
        self
    }

    /// True when the sector has no latitude extent or no longitude extent.
    pub fn is_empty(&self) -> bool {
        self.min_latitude == self.max_latitude || self.min_longitude == self.max_longitude
    }

    pub fn delta_latitude(&self) -> f64 {
        self.max_latitude - self.min_latitude
    }

    pub fn delta_longitude(&self) -> f64 {
        self.max_longitude - self.min_longitude
    }

    pub fn centroid_latitude(&self) -> f64 {
        0.5 * (self.min_latitude + self.max_latitude)
    }

    pub fn centroid_longitude(&self) -> f64 {
        0.5 * (self.min_longitude + self.max_longitude)
    }

    pub fn centroid(&self) -> Location {
        Location::new(self.centroid_latitude(), self.centroid_longitude())
    }

    pub fn min_latitude_radians(&self) -> f64 {
        self.min_latitude * DEGREES_TO_RADIANS
    }

    pub fn max_latitude_radians(&self) -> f64 {
        self.max_latitude * DEGREES_TO_RADIANS
    }

    pub fn min_longitude_radians(&self) -> f64 {
        self.min_longitude * DEGREES_TO_RADIANS
    }

    pub fn max_longitude_radians(&self) -> f64 {
        self.max_longitude * DEGREES_TO_RADIANS
    }

    pub fn set_to_bounding_sector(
        &mut self,
        locations: &[Location],
    ) -> Result<&mut Self, GeometryError> {
        if locations.len() < 2 {
            return Err(GeometryError::TooFewLocations {
                required: 2,
                got: locations.len(),
            });
        }

        let mut out = Sector::new(90.0, -90.0, 180.0, -180.0);
        for loc in locations {
            out.min_latitude = out.min_latitude.min(loc.latitude);
            out.max_latitude = out.max_latitude.max(loc.latitude);
            out.min_longitude = out.min_longitude.min(loc.longitude);
            out.max_longitude = out.max_longitude.max(loc.longitude);
        }
        *self = out;
        Ok(self)
    }

    /// Overlap including shared edges.
    pub fn intersects(&self, other: &Sector) -> bool {
        self.min_longitude <= other.max_longitude
            && self.max_longitude >= other.min_longitude
            && self.min_latitude <= other.max_latitude
            && self.max_latitude >= other.min_latitude
    }

    /// Overlap excluding shared edges.
    pub fn overlaps(&self, other: &Sector) -> bool {
        self.min_longitude < other.max_longitude
            && self.max_longitude > other.min_longitude
            && self.min_latitude < other.max_latitude
            && self.max_latitude > other.min_latitude
    }

    pub fn contains(&self, other: &Sector) -> bool {
        self.min_latitude <= other.min_latitude
            && self.max_latitude >= other.max_latitude
            && self.min_longitude <= other.min_longitude
            && self.max_longitude >= other.max_longitude
    }

    pub fn contains_location(&self, latitude: f64, longitude: f64) -> bool {
        self.min_latitude <= latitude
            && self.max_latitude >= latitude
            && self.min_longitude <= longitude
            && self.max_longitude >= longitude
    }

    /// Clip to `other`. A dimension with no overlap collapses onto its
    /// minimum, leaving an empty sector.
    pub fn intersection(&mut self, other: &Sector) -> &mut Self {
        self.min_latitude = self.min_latitude.max(other.min_latitude);
        self.max_latitude = self.max_latitude.min(other.max_latitude);
        self.min_longitude = self.min_longitude.max(other.min_longitude);
        self.max_longitude = self.max_longitude.min(other.max_longitude);

        if self.max_latitude < self.min_latitude {
            self.max_latitude = self.min_latitude;
        }
        if self.max_longitude < self.min_longitude {
            self.max_longitude = self.min_longitude;
        }
        self
    }

    pub fn union(&mut self, other: &Sector) -> &mut Self {
        self.min_latitude = self.min_latitude.min(other.min_latitude);
        self.max_latitude = self.max_latitude.max(other.max_latitude);
        self.min_longitude = self.min_longitude.min(other.min_longitude);
        self.max_longitude = self.max_longitude.max(other.max_longitude);
        self
    }

    /// Corners in the order SW, SE, NE, NW.
    pub fn corners(&self) -> [Location; 4] {
        [
            Location::new(self.min_latitude, self.min_longitude),
            Location::new(self.min_latitude, self.max_longitude),
            Location::new(self.max_latitude, self.max_longitude),
            Location::new(self.max_latitude, self.min_longitude),
        ]
    }
}

fn signum(v: f64) -> i8 {
    if v > 0.0 {
        1
    } else if v < 0.0 {
        -1
    } else {
        0
    }
}
