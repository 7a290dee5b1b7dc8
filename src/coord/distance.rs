//! Great-circle distance

use crate::constants::geo::EARTH_RADIUS_KM;
use crate::coord::Coordinate;

/// Calculate the distance between two points in kilometres (Haversine formula)
///
/// # Arguments
/// * `a` - First point
/// * `b` - Second point
///
/// # Returns
/// Distance in kilometres on a sphere of mean Earth radius
pub fn haversine_km(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let delta_lat = (b.lat - a.lat).to_radians();
    let delta_lng = (b.lng - a.lng).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const PONSONBY: Coordinate = Coordinate { lat: -36.8560, lng: 174.7445 };
    const TAKAPUNA: Coordinate = Coordinate { lat: -36.7878, lng: 174.7730 };
    const WELLINGTON: Coordinate = Coordinate { lat: -41.2865, lng: 174.7762 };

    #[test]
    fn test_same_point_is_zero() {
        assert_eq!(haversine_km(PONSONBY, PONSONBY), 0.0);
        assert_eq!(haversine_km(WELLINGTON, WELLINGTON), 0.0);
    }

    #[test]
    fn test_symmetry() {
        let pairs = [
            (PONSONBY, TAKAPUNA),
            (PONSONBY, WELLINGTON),
            (Coordinate::new(89.9, -179.9), Coordinate::new(-89.9, 179.9)),
        ];
        for (a, b) in pairs {
            assert_relative_eq!(haversine_km(a, b), haversine_km(b, a), epsilon = 1e-9);
        }
    }

    #[test]
    fn test_known_distances() {
        // Ponsonby to Takapuna across the harbour is roughly 8 km
        let d = haversine_km(PONSONBY, TAKAPUNA);
        assert!(d > 7.0 && d < 9.0, "got {}", d);

        // Auckland to Wellington is roughly 490 km as the crow flies
        let d = haversine_km(PONSONBY, WELLINGTON);
        assert!(d > 470.0 && d < 510.0, "got {}", d);
    }

    #[test]
    fn test_one_degree_of_latitude() {
        let d = haversine_km(Coordinate::new(0.0, 0.0), Coordinate::new(1.0, 0.0));
        assert_relative_eq!(d, 111.195, epsilon = 0.01);
    }
}
