//! Great-circle math shared by the index, the feature extractor and the target.

use crate::models::LatLonRad;

/// Mean Earth radius used for every meters <-> radians conversion.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Convert a ground distance in meters into a central angle in radians.
pub fn meters_to_radians(meters: f64) -> f64 {
    meters / EARTH_RADIUS_M
}

pub fn radians_to_meters(angle: f64) -> f64 {
    angle * EARTH_RADIUS_M
}

/// Central angle between two points given in radians (haversine formula).
pub fn haversine_angle(a: LatLonRad, b: LatLonRad) -> f64 {
    let dphi = b.lat - a.lat;
    let dlambda = b.lon - a.lon;
    let h = (dphi / 2.0).sin().powi(2) + a.lat.cos() * b.lat.cos() * (dlambda / 2.0).sin().powi(2);
    2.0 * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Ground distance in meters between two degree-valued positions. A thin
/// wrapper over [`haversine_angle`] for callers holding raw coordinates.
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let a = LatLonRad {
        lat: lat1.to_radians(),
        lon: lon1.to_radians(),
    };
    let b = LatLonRad {
        lat: lat2.to_radians(),
        lon: lon2.to_radians(),
    };
    radians_to_meters(haversine_angle(a, b))
}

/// Position on the unit sphere. Straight-line (chord) distance between two
/// such vectors grows monotonically with their central angle, which is what
/// lets an ordinary Euclidean R-tree answer great-circle radius queries.
pub fn to_unit_vector(point: LatLonRad) -> [f64; 3] {
    let cos_lat = point.lat.cos();
    [
        cos_lat * point.lon.cos(),
        cos_lat * point.lon.sin(),
        point.lat.sin(),
    ]
}

/// Chord length on the unit sphere subtending `angle` radians.
pub fn chord_length(angle: f64) -> f64 {
    2.0 * (angle.min(std::f64::consts::PI) / 2.0).sin()
}

/// Point reached by travelling `distance_m` from `origin` along the initial
/// bearing `bearing_rad` (0 = north, clockwise). Test fixtures use it to place
/// obstacles at exact great-circle distances.
#[cfg(test)]
pub(crate) fn destination(origin: LatLonRad, distance_m: f64, bearing_rad: f64) -> LatLonRad {
    let delta = meters_to_radians(distance_m);
    let (sin_phi, cos_phi) = origin.lat.sin_cos();
    let (sin_delta, cos_delta) = delta.sin_cos();

    let sin_lat = (sin_phi * cos_delta + cos_phi * sin_delta * bearing_rad.cos()).clamp(-1.0, 1.0);
    let lon = origin.lon
        + (bearing_rad.sin() * sin_delta * cos_phi).atan2(cos_delta - sin_phi * sin_lat);
    LatLonRad {
        lat: sin_lat.asin(),
        lon,
    }
}
