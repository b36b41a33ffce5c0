use geojson::{Feature, FeatureCollection, Geometry, Value};
use geotrack_core::models::Position;
use serde_json::{Map, Value as JsonValue};

use crate::state::AppState;

/// Builds the live driver map for dashboards
pub struct MapService;

impl MapService {
    /// Online drivers as a GeoJSON FeatureCollection
    pub fn online_drivers(state: &AppState) -> FeatureCollection {
        drivers_to_geojson(&state.tracking.online_drivers())
    }
}

/// Convert positions to Point features carrying the report metadata
pub fn drivers_to_geojson(positions: &[Position]) -> FeatureCollection {
    let features = positions.iter().map(position_feature).collect();

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

fn position_feature(position: &Position) -> Feature {
    let mut properties = Map::new();
    properties.insert("driver_id".to_string(), JsonValue::from(position.driver_id.0));
    properties.insert(
        "observed_at".to_string(),
        JsonValue::from(position.observed_at.to_rfc3339()),
    );

    if let Some(delivery_id) = position.delivery_id {
        properties.insert("delivery_id".to_string(), JsonValue::from(delivery_id.0));
    }
    if let Some(speed) = position.speed_kmh {
        properties.insert("speed_kmh".to_string(), JsonValue::from(speed));
    }
    if let Some(heading) = position.heading_degrees {
        properties.insert("heading_degrees".to_string(), JsonValue::from(heading));
    }

    Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::Point(vec![position.longitude, position.latitude]))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}
