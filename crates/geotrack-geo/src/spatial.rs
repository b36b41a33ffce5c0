use geo::{Bearing, Centroid, Distance, Haversine, MultiPoint, Point};
use geotrack_core::models::{BoundingBox, Coordinate};

/// Mean earth radius in kilometers
pub const EARTH_RADIUS_KM: f64 = 6371.0;

fn to_point(coord: Coordinate) -> Point<f64> {
    // geo points are (x = lon, y = lat)
    Point::new(coord.lon, coord.lat)
}

/// Great-circle distance between two coordinates in kilometers
pub fn haversine_km(a: Coordinate, b: Coordinate) -> f64 {
    Haversine.distance(to_point(a), to_point(b)) / 1000.0
}

/// Initial bearing from `from` to `to`, clockwise from north in `[0, 360)`
pub fn bearing_degrees(from: Coordinate, to: Coordinate) -> f64 {
    let bearing = Haversine.bearing(to_point(from), to_point(to)).rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if bearing >= 360.0 {
        0.0
    } else {
        bearing
    }
}

/// Smallest box containing every point within `radius_km` of `center`.
///
/// Latitudes are clamped to the poles and longitudes to the antimeridian, so
/// near the antimeridian the box misses points on the far side. Use
/// [`search_boxes_around`] when those must be found.
pub fn bounding_box_around(center: Coordinate, radius_km: f64) -> BoundingBox {
    let (min_lat, max_lat, lon_delta) = radius_extent(center, radius_km);
    BoundingBox::new(
        min_lat,
        (center.lon - lon_delta).max(-180.0),
        max_lat,
        (center.lon + lon_delta).min(180.0),
    )
}

/// Boxes that together contain every point within `radius_km` of `center`.
///
/// A circle that crosses the antimeridian is split into one box on each side,
/// so every returned box passes `validate_bbox`.
pub fn search_boxes_around(center: Coordinate, radius_km: f64) -> Vec<BoundingBox> {
    let (min_lat, max_lat, lon_delta) = radius_extent(center, radius_km);
    let west = center.lon - lon_delta;
    let east = center.lon + lon_delta;

    if lon_delta >= 180.0 {
        vec![BoundingBox::new(min_lat, -180.0, max_lat, 180.0)]
    } else if west < -180.0 {
        vec![
            BoundingBox::new(min_lat, -180.0, max_lat, east),
            BoundingBox::new(min_lat, west + 360.0, max_lat, 180.0),
        ]
    } else if east > 180.0 {
        vec![
            BoundingBox::new(min_lat, west, max_lat, 180.0),
            BoundingBox::new(min_lat, -180.0, max_lat, east - 360.0),
        ]
    } else {
        vec![BoundingBox::new(min_lat, west, max_lat, east)]
    }
}

/// Clamped latitude span and unclamped longitude half-width of a radius
fn radius_extent(center: Coordinate, radius_km: f64) -> (f64, f64, f64) {
    let lat_delta = (radius_km / EARTH_RADIUS_KM).to_degrees();
    let min_lat = (center.lat - lat_delta).max(-90.0);
    let max_lat = (center.lat + lat_delta).min(90.0);

    // Longitude degrees shrink with latitude; use the widest latitude in the box
    let widest = min_lat.abs().max(max_lat.abs());
    let lon_delta = if widest >= 89.999 {
        180.0
    } else {
        lat_delta / widest.to_radians().cos()
    };
    (min_lat, max_lat, lon_delta)
}

/// Arithmetic centroid of a set of coordinates, `None` when empty
pub fn centroid(coords: &[Coordinate]) -> Option<Coordinate> {
    let points: MultiPoint<f64> = coords.iter().copied().map(to_point).collect();
    points.centroid().map(|p| Coordinate::new(p.y(), p.x()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haversine_zero() {
        let a = Coordinate::new(9.0, 38.7);
        assert_eq!(haversine_km(a, a), 0.0);
    }

    #[test]
    fn test_haversine_one_degree_latitude() {
        let a = Coordinate::new(0.0, 0.0);
        let b = Coordinate::new(1.0, 0.0);
        let d = haversine_km(a, b);
        assert!((d - 111.19).abs() < 0.1, "got {}", d);
    }

    #[test]
    fn test_haversine_addis_to_adama() {
        let addis = Coordinate::new(9.0054, 38.7636);
        let adama = Coordinate::new(8.5400, 39.2700);
        let d = haversine_km(addis, adama);
        assert!(d > 70.0 && d < 80.0, "got {}", d);
    }

    #[test]
    fn test_bearing_cardinal_directions() {
        let origin = Coordinate::new(0.0, 0.0);
        assert!(bearing_degrees(origin, Coordinate::new(1.0, 0.0)).abs() < 1e-6);
        assert!((bearing_degrees(origin, Coordinate::new(0.0, 1.0)) - 90.0).abs() < 1e-6);
        assert!((bearing_degrees(origin, Coordinate::new(-1.0, 0.0)) - 180.0).abs() < 1e-6);
        assert!((bearing_degrees(origin, Coordinate::new(0.0, -1.0)) - 270.0).abs() < 1e-6);
    }

    #[test]
    fn test_bounding_box_contains_radius() {
        let center = Coordinate::new(9.0, 38.7);
        let bbox = bounding_box_around(center, 5.0);
        assert!(bbox.contains(center));

        // Points 4.9 km away in each direction stay inside
        let north = Coordinate::new(9.0 + (4.9 / EARTH_RADIUS_KM).to_degrees(), 38.7);
        assert!(bbox.contains(north));
        let east_lon = 38.7 + (4.9 / EARTH_RADIUS_KM).to_degrees() / 9.0_f64.to_radians().cos();
        assert!(bbox.contains(Coordinate::new(9.0, east_lon)));
    }

    #[test]
    fn test_bounding_box_clamped_at_pole() {
        let bbox = bounding_box_around(Coordinate::new(89.99, 0.0), 50.0);
        assert_eq!(bbox.max_lat, 90.0);
        assert_eq!(bbox.min_lon, -180.0);
        assert_eq!(bbox.max_lon, 180.0);
    }

    #[test]
    fn test_search_boxes_split_at_antimeridian() {
        let boxes = search_boxes_around(Coordinate::new(0.0, 179.99), 10.0);
        assert_eq!(boxes.len(), 2);
        assert!(boxes.iter().any(|b| b.contains(Coordinate::new(0.0, -179.99))));
        assert!(boxes.iter().any(|b| b.contains(Coordinate::new(0.0, 179.95))));
        assert!(boxes.iter().all(|b| b.min_lon <= b.max_lon));

        let west = search_boxes_around(Coordinate::new(0.0, -179.99), 10.0);
        assert!(west.iter().any(|b| b.contains(Coordinate::new(0.0, 179.99))));

        assert_eq!(search_boxes_around(Coordinate::new(9.0, 38.7), 5.0).len(), 1);
        assert_eq!(search_boxes_around(Coordinate::new(89.99, 0.0), 50.0).len(), 1);
    }

    #[test]
    fn test_centroid() {
        assert!(centroid(&[]).is_none());

        let c = centroid(&[Coordinate::new(0.0, 0.0), Coordinate::new(2.0, 4.0)]).unwrap();
        assert!((c.lat - 1.0).abs() < 1e-12);
        assert!((c.lon - 2.0).abs() < 1e-12);
    }
}
