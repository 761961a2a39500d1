//! Great-circle distance between two coordinates.

use crate::types::Coordinate;

/// Earth radius used by the haversine formula.
///
/// 6373 km, not the 6371 km mean radius. Reported distances are expected to
/// match earlier releases of this tool to the hundredth of a kilometre.
pub const EARTH_RADIUS_KM: f64 = 6373.0;

/// Haversine distance in kilometres between `a` and `b`.
///
/// NaN inputs propagate to a NaN result.
#[must_use]
pub fn haversine_km(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let dlat = lat2 - lat1;
    let dlon = b.longitude.to_radians() - a.longitude.to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;

    const MONTREAL: Coordinate = Coordinate {
        latitude: 45.5017,
        longitude: -73.5673,
    };
    const QUEBEC_CITY: Coordinate = Coordinate {
        latitude: 46.8139,
        longitude: -71.2080,
    };

    #[test]
    fn distance_to_self_is_zero() {
        assert!(haversine_km(MONTREAL, MONTREAL).abs() < f64::EPSILON);
    }

    #[test]
    fn distance_is_symmetric() {
        let there = haversine_km(MONTREAL, QUEBEC_CITY);
        let back = haversine_km(QUEBEC_CITY, MONTREAL);
        assert!((there - back).abs() < 1e-9, "{there} != {back}");
    }

    #[test]
    fn montreal_to_quebec_city_is_about_233_km() {
        let d = haversine_km(MONTREAL, QUEBEC_CITY);
        assert!((230.0..237.0).contains(&d), "unexpected distance {d}");
    }

    #[test]
    fn one_degree_of_latitude_matches_radius() {
        let a = Coordinate {
            latitude: 0.0,
            longitude: 0.0,
        };
        let b = Coordinate {
            latitude: 1.0,
            longitude: 0.0,
        };
        let expected = EARTH_RADIUS_KM * 1.0_f64.to_radians();
        assert!((haversine_km(a, b) - expected).abs() < 1e-9);
    }

    #[test]
    fn nan_propagates() {
        let bad = Coordinate {
            latitude: f64::NAN,
            longitude: 0.0,
        };
        assert!(haversine_km(bad, MONTREAL).is_nan());
    }
}
