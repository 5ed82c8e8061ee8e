//! Degree/radian helpers.
//!
//! All angles in the engine's public API are degrees. Normalization folds
//! values into the canonical ranges used by the navigation code:
//! longitudes and headings into (-180, 180], latitudes into [-90, 90].

pub const DEGREES_TO_RADIANS: f64 = std::f64::consts::PI / 180.0;
pub const RADIANS_TO_DEGREES: f64 = 180.0 / std::f64::consts::PI;

/// Fold an angle into (-180, 180]. Idempotent.
pub fn normalized_degrees(degrees: f64) -> f64 {
    let angle = degrees % 360.0;
    if angle > 180.0 {
        angle - 360.0
    } else if angle <= -180.0 {
        angle + 360.0
    } else {
        angle
    }
}

/// Reflect a latitude over the poles into [-90, 90].
///
/// 100 becomes 80 and -100 becomes -80, matching travel over a pole.
pub fn normalized_degrees_latitude(degrees: f64) -> f64 {
    let lat = degrees % 180.0;
    if lat > 90.0 {
        180.0 - lat
    } else if lat < -90.0 {
        -180.0 - lat
    } else {
        lat
    }
}

pub fn normalized_degrees_longitude(degrees: f64) -> f64 {
    normalized_degrees(degrees)
}

pub fn normalized_radians(radians: f64) -> f64 {
    normalized_degrees(radians * RADIANS_TO_DEGREES) * DEGREES_TO_RADIANS
}

pub fn normalized_radians_latitude(radians: f64) -> f64 {
    normalized_degrees_latitude(radians * RADIANS_TO_DEGREES) * DEGREES_TO_RADIANS
}

pub fn normalized_radians_longitude(radians: f64) -> f64 {
    normalized_degrees_longitude(radians * RADIANS_TO_DEGREES) * DEGREES_TO_RADIANS
}

pub fn is_valid_latitude(degrees: f64) -> bool {
    (-90.0..=90.0).contains(&degrees)
}

pub fn is_valid_longitude(degrees: f64) -> bool {
    (-180.0..=180.0).contains(&degrees)
}

/// Clamp a latitude into [-90, 90] without reflecting it.
pub fn clamp_latitude(degrees: f64) -> f64 {
    degrees.clamp(-90.0, 90.0)
}

/// Wrap a longitude into [-180, 180].
pub fn wrap_longitude(degrees: f64) -> f64 {
    normalized_degrees(degrees)
}

/// Degrees-minutes-seconds text, e.g. `45° 30’ 18.0”`.
pub fn to_dms_string(degrees: f64) -> String {
    let sign = if degrees < 0.0 { "-" } else { "" };
    let total = degrees.abs();
    let mut d = total.floor();
    let rem = (total - d) * 60.0;
    let mut m = rem.floor();
    let mut s = ((rem - m) * 60.0 * 10.0).round() / 10.0;
    if s >= 60.0 {
        s = 0.0;
        m += 1.0;
    }
    if m >= 60.0 {
        m = 0.0;
        d += 1.0;
    }
    format!("{sign}{d}\u{00B0} {m}\u{2019} {s:.1}\u{201D}")
}

/// Degrees-decimal-minutes text, e.g. `45° 30.30’`.
pub fn to_dm_string(degrees: f64) -> String {
    let sign = if degrees < 0.0 { "-" } else { "" };
    let total = degrees.abs();
    let mut d = total.floor();
    let mut m = ((total - d) * 60.0 * 100.0).round() / 100.0;
    if m >= 60.0 {
        m = 0.0;
        d += 1.0;
    }
    format!("{sign}{d}\u{00B0} {m:.2}\u{2019}")
}

/// Linear interpolation between two angles along the shortest arc.
pub fn interpolate_degrees(amount: f64, a: f64, b: f64) -> f64 {
    let delta = normalized_degrees(b - a);
    normalized_degrees(a + delta * amount)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn normalized_degrees_stays_in_half_open_range() {
        for d in [-1080.0, -540.0, -360.0, -180.0, -179.5, -1.0, 0.0, 90.0, 180.0, 181.0, 359.0, 725.0] {
            let n = normalized_degrees(d);
            assert!(n > -180.0 && n <= 180.0, "{d} -> {n}");
        }
        assert_eq!(normalized_degrees(-180.0), 180.0);
        assert_eq!(normalized_degrees(540.0), 180.0);
        assert_close(normalized_degrees(190.0), -170.0, 1e-12);
        assert_close(normalized_degrees(-190.0), 170.0, 1e-12);
    }

    #[test]
    fn normalized_degrees_is_idempotent() {
        for d in [-725.3, -180.0, -12.0, 0.0, 33.3, 180.0, 270.0, 1000.1] {
            let once = normalized_degrees(d);
            assert_eq!(normalized_degrees(once), once);
        }
    }

    #[test]
    fn latitude_reflects_over_poles() {
        assert_close(normalized_degrees_latitude(100.0), 80.0, 1e-12);
        assert_close(normalized_degrees_latitude(-100.0), -80.0, 1e-12);
        assert_close(normalized_degrees_latitude(45.0), 45.0, 1e-12);
        assert_close(normalized_degrees_latitude(90.0), 90.0, 1e-12);
    }

    #[test]
    fn validity_checks_are_inclusive() {
        assert!(is_valid_latitude(90.0));
        assert!(!is_valid_latitude(90.01));
        assert!(is_valid_longitude(-180.0));
        assert!(!is_valid_longitude(180.5));
    }

    #[test]
    fn dms_formatting() {
        assert_eq!(to_dms_string(45.505), "45\u{00B0} 30\u{2019} 18.0\u{201D}");
        assert_eq!(to_dm_string(-10.5), "-10\u{00B0} 30.00\u{2019}");
    }

    #[test]
    fn interpolation_takes_short_way_across_dateline() {
        assert_close(interpolate_degrees(0.5, 170.0, -170.0), 180.0, 1e-9);
    }
}
