use crate::entities::City;

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Calculate distance between two coordinates using Haversine formula
/// Returns distance in kilometers
pub fn haversine_distance(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lng = (lng2 - lng1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Great-circle distance between two city centers, in kilometers
pub fn distance_between(from: &City, to: &City) -> f64 {
    haversine_distance(from.lat, from.lng, to.lat, to.lng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::city::{find_city, CITIES};

    #[test]
    fn test_haversine_tunis_sousse() {
        let tunis = find_city("Tunis").unwrap();
        let sousse = find_city("Sousse").unwrap();

        let distance = distance_between(tunis, sousse);
        // Should be approximately 110-125 km
        assert!(distance > 100.0 && distance < 130.0);
    }

    #[test]
    fn test_haversine_symmetric() {
        for a in CITIES {
            for b in CITIES {
                let there = distance_between(a, b);
                let back = distance_between(b, a);
                assert!((there - back).abs() < 1e-9, "{} <-> {}", a.name, b.name);
            }
        }
    }

    #[test]
    fn test_haversine_same_point_is_zero() {
        for c in CITIES {
            assert_eq!(distance_between(c, c), 0.0);
        }
    }
}
