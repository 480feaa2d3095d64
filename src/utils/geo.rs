/// Calculate distance between two coordinates using Haversine formula
/// Returns distance in kilometers
pub fn haversine_distance(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    const EARTH_RADIUS_KM: f64 = 6371.0;

    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lng = (lng2 - lng1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_KM * c
}

/// Check if a pickup point is within the matching radius of a position
pub fn is_within_radius(
    lat: f64,
    lng: f64,
    center_lat: f64,
    center_lng: f64,
    max_radius_km: f64,
) -> bool {
    haversine_distance(lat, lng, center_lat, center_lng) <= max_radius_km
}

/// Reject coordinates outside the valid lat/lng domain (including NaN)
pub fn is_valid_coordinate(lat: f64, lng: f64) -> bool {
    lat.is_finite() && lng.is_finite() && (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lng)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haversine_sao_paulo_campinas() {
        // São Paulo center
        let sao_paulo = (-23.5505, -46.6333);
        // Campinas center
        let campinas = (-22.9099, -47.0626);

        let distance = haversine_distance(sao_paulo.0, sao_paulo.1, campinas.0, campinas.1);
        // Should be approximately 80-90 km
        assert!(distance > 70.0 && distance < 100.0);
    }

    #[test]
    fn test_within_radius() {
        let driver = (-23.5505, -46.6333); // São Paulo
        let nearby = (-23.56, -46.64);     // A few blocks away

        assert!(is_within_radius(nearby.0, nearby.1, driver.0, driver.1, 20.0));

        let campinas = (-22.9099, -47.0626);
        assert!(!is_within_radius(campinas.0, campinas.1, driver.0, driver.1, 20.0));
    }

    #[test]
    fn test_coordinate_validation() {
        assert!(is_valid_coordinate(-23.5505, -46.6333));
        assert!(!is_valid_coordinate(91.0, 0.0));
        assert!(!is_valid_coordinate(0.0, -181.0));
        assert!(!is_valid_coordinate(f64::NAN, 0.0));
    }
}
