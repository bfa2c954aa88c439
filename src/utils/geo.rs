//! Great-circle distance for nearest-region lookups

/// Mean Earth radius (km)
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance between two lat/lon points in kilometres
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let dlat = (lat2 - lat1).to_radians();
    let dlon = (lon2 - lon1).to_radians();

    let a = (dlat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_zero_distance() {
        assert_eq!(haversine_km(18.5204, 73.8567, 18.5204, 73.8567), 0.0);
    }

    #[test]
    fn test_pune_to_solapur() {
        // Roughly 235 km by great circle
        let d = haversine_km(18.5204, 73.8567, 17.6599, 75.9064);
        assert_relative_eq!(d, 235.0, epsilon = 10.0);
    }

    #[test]
    fn test_symmetric() {
        let a = haversine_km(16.705, 74.2433, 21.0077, 75.5626);
        let b = haversine_km(21.0077, 75.5626, 16.705, 74.2433);
        assert_relative_eq!(a, b, epsilon = 1e-9);
    }
}
