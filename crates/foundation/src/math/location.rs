use serde::{Deserialize, Serialize};

use super::{
    DEGREES_TO_RADIANS, RADIANS_TO_DEGREES, normalized_degrees_latitude,
    normalized_degrees_longitude,
};

/// Geographic location in degrees.
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    pub const ZERO: Location = Location {
        latitude: 0.0,
        longitude: 0.0,
    };

    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Angular distance along the great circle, in radians (haversine).
    pub fn great_circle_distance(&self, other: &Location) -> f64 {
        let lat1 = self.latitude * DEGREES_TO_RADIANS;
        let lat2 = other.latitude * DEGREES_TO_RADIANS;
        let dlat = lat2 - lat1;
        let dlon = (other.longitude - self.longitude) * DEGREES_TO_RADIANS;

        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
        2.0 * a.sqrt().clamp(0.0, 1.0).asin()
    }

    /// Initial azimuth (degrees clockwise from north) towards `other`.
    pub fn great_circle_azimuth(&self, other: &Location) -> f64 {
        let lat1 = self.latitude * DEGREES_TO_RADIANS;
        let lat2 = other.latitude * DEGREES_TO_RADIANS;
        let dlon = (other.longitude - self.longitude) * DEGREES_TO_RADIANS;
        if lat1 == lat2 && dlon == 0.0 {
            return 0.0;
        }

        let y = lat2.cos() * dlon.sin();
        let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * dlon.cos();
        normalized_degrees_longitude(y.atan2(x) * RADIANS_TO_DEGREES)
    }

    /// Location reached by travelling `distance` radians along the great
    /// circle that starts here with the given azimuth.
    pub fn great_circle_location(&self, azimuth: f64, distance: f64) -> Location {
        if distance == 0.0 {
            return *self;
        }

        let lat1 = self.latitude * DEGREES_TO_RADIANS;
        let lon1 = self.longitude * DEGREES_TO_RADIANS;
        let az = azimuth * DEGREES_TO_RADIANS;
        let (sin_d, cos_d) = distance.sin_cos();

        let end_lat = (lat1.sin() * cos_d + lat1.cos() * sin_d * az.cos()).asin();
        let end_lon = lon1
            + (az.sin() * sin_d * lat1.cos()).atan2(cos_d - lat1.sin() * end_lat.sin());

        if end_lat.is_nan() || end_lon.is_nan() {
            return *self;
        }

        Location::new(
            normalized_degrees_latitude(end_lat * RADIANS_TO_DEGREES),
            normalized_degrees_longitude(end_lon * RADIANS_TO_DEGREES),
        )
    }

    /// Straight interpolation in lat/lon space.
    pub fn interpolate_linear(&self, other: &Location, amount: f64) -> Location {
        Location::new(
            self.latitude + (other.latitude - self.latitude) * amount,
            self.longitude + (other.longitude - self.longitude) * amount,
        )
    }
}

/// Geographic position: a location plus altitude in meters.
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
}

impl Position {
    pub const ZERO: Position = Position {
        latitude: 0.0,
        longitude: 0.0,
        altitude: 0.0,
    };

    pub fn new(latitude: f64, longitude: f64, altitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            altitude,
        }
    }

    pub fn location(&self) -> Location {
        Location::new(self.latitude, self.longitude)
    }
}

impl From<Location> for Position {
    fn from(loc: Location) -> Self {
        Position::new(loc.latitude, loc.longitude, 0.0)
    }
}
