use geotrack_core::error::{GeotrackError, Result};
use geotrack_core::models::{BoundingBox, GeofenceZone, Position};

/// Validate a latitude/longitude pair
pub fn validate_coordinate(lat: f64, lon: f64) -> Result<()> {
    if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
        return Err(GeotrackError::validation(
            "latitude",
            format!("{} is outside [-90, 90]", lat),
        ));
    }
    if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
        return Err(GeotrackError::validation(
            "longitude",
            format!("{} is outside [-180, 180]", lon),
        ));
    }
    Ok(())
}

/// Validate a strictly positive, finite radius
pub fn validate_radius(field: &str, radius_km: f64) -> Result<()> {
    if !radius_km.is_finite() || radius_km <= 0.0 {
        return Err(GeotrackError::validation(
            field,
            format!("must be a positive number of kilometers, got {}", radius_km),
        ));
    }
    Ok(())
}

/// Validate a driver position report, including optional motion metadata
pub fn validate_position(position: &Position) -> Result<()> {
    validate_coordinate(position.latitude, position.longitude)?;

    if let Some(speed) = position.speed_kmh {
        if !speed.is_finite() || speed < 0.0 {
            return Err(GeotrackError::validation(
                "speed_kmh",
                format!("must be non-negative, got {}", speed),
            ));
        }
    }

    if let Some(heading) = position.heading_degrees {
        if !heading.is_finite() || !(0.0..360.0).contains(&heading) {
            return Err(GeotrackError::validation(
                "heading_degrees",
                format!("{} is outside [0, 360)", heading),
            ));
        }
    }

    if let Some(accuracy) = position.accuracy_meters {
        if !accuracy.is_finite() || accuracy < 0.0 {
            return Err(GeotrackError::validation(
                "accuracy_meters",
                format!("must be non-negative, got {}", accuracy),
            ));
        }
    }

    Ok(())
}

/// Validate a geofence zone before it is registered
pub fn validate_zone(zone: &GeofenceZone) -> Result<()> {
    validate_coordinate(zone.center_lat, zone.center_long)?;
    validate_radius("radius_km", zone.radius_km)
}

/// Validate a query box. Boxes crossing the antimeridian are rejected.
pub fn validate_bbox(bbox: &BoundingBox) -> Result<()> {
    validate_coordinate(bbox.min_lat, bbox.min_lon)?;
    validate_coordinate(bbox.max_lat, bbox.max_lon)?;

    if bbox.min_lat > bbox.max_lat {
        return Err(GeotrackError::validation(
            "bbox",
            format!("min_lat {} is greater than max_lat {}", bbox.min_lat, bbox.max_lat),
        ));
    }
    if bbox.min_lon > bbox.max_lon {
        return Err(GeotrackError::validation(
            "bbox",
            format!(
                "min_lon {} is greater than max_lon {} \
                 (antimeridian-crossing boxes are not supported)",
                bbox.min_lon, bbox.max_lon
            ),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use geotrack_core::models::{Coordinate, DeliveryId, DriverId};

    #[test]
    fn test_coordinate_ranges() {
        assert!(validate_coordinate(90.0, 180.0).is_ok());
        assert!(validate_coordinate(-90.0, -180.0).is_ok());
        assert!(validate_coordinate(90.0001, 0.0).is_err());
        assert!(validate_coordinate(0.0, -180.5).is_err());
        assert!(validate_coordinate(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_position_metadata() {
        let base = Position::new(DriverId(1), 9.0, 38.7, Utc::now());
        assert!(validate_position(&base).is_ok());

        let negative_speed = base.clone().with_motion(-1.0, 90.0);
        assert!(validate_position(&negative_speed).is_err());

        let full_circle = base.clone().with_motion(10.0, 360.0);
        let err = validate_position(&full_circle).unwrap_err();
        assert!(err.to_string().contains("heading_degrees"));

        let bad_accuracy = base.with_accuracy(-3.0);
        assert!(validate_position(&bad_accuracy).is_err());
    }

    #[test]
    fn test_zone_radius() {
        let zone = GeofenceZone::new(DriverId(1), DeliveryId(2), Coordinate::new(9.0, 38.7), 0.0);
        assert!(validate_zone(&zone).unwrap_err().is_validation());

        let zone = GeofenceZone::new(DriverId(1), DeliveryId(2), Coordinate::new(9.0, 38.7), 1.0);
        assert!(validate_zone(&zone).is_ok());
    }

    #[test]
    fn test_bbox_ordering() {
        assert!(validate_bbox(&BoundingBox::new(8.9, 38.6, 9.1, 38.8)).is_ok());
        assert!(validate_bbox(&BoundingBox::new(9.1, 38.6, 8.9, 38.8)).is_err());
        assert!(validate_bbox(&BoundingBox::new(0.0, 179.0, 1.0, -179.0)).is_err());
    }
}
