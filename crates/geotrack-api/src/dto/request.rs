use chrono::{DateTime, Utc};
use geotrack_core::error::{GeotrackError, Result};
use geotrack_core::models::{
    BoundingBox, Coordinate, DeliveryStatus, DriverId, GeofenceZone, PartnerId, RouteRequest,
    TimeRange, TransportMode, Waypoint,
};
use geotrack_engine::HeatmapQuery;
use geotrack_geo::validation::validate_coordinate;
use serde::Deserialize;

/// Box query parameters: `?min_lat&min_lon&max_lat&max_lon`
#[derive(Debug, Deserialize)]
pub struct BboxParams {
    pub min_lat: f64,
    pub min_lon: f64,
    pub max_lat: f64,
    pub max_lon: f64,
}

impl BboxParams {
    pub fn to_bbox(&self) -> BoundingBox {
        BoundingBox::new(self.min_lat, self.min_lon, self.max_lat, self.max_lon)
    }
}

#[derive(Debug, Deserialize)]
pub struct NearbyParams {
    pub lat: f64,
    pub lon: f64,
    #[serde(default = "default_nearby_radius_km")]
    pub radius_km: f64,
}

fn default_nearby_radius_km() -> f64 {
    5.0
}

/// Cluster query parameters; `bbox` is `min_lat,min_lon,max_lat,max_lon`
#[derive(Debug, Default, Deserialize)]
pub struct ClusterParams {
    pub radius_km: Option<f64>,
    pub bbox: Option<String>,
}

impl ClusterParams {
    pub fn parse_bbox(&self) -> Result<Option<BoundingBox>> {
        let Some(raw) = &self.bbox else {
            return Ok(None);
        };

        let values = raw
            .split(',')
            .map(|part| part.trim().parse::<f64>())
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| GeotrackError::validation("bbox", e.to_string()))?;

        match values.as_slice() {
            [min_lat, min_lon, max_lat, max_lon] => {
                Ok(Some(BoundingBox::new(*min_lat, *min_lon, *max_lat, *max_lon)))
            }
            _ => Err(GeotrackError::validation(
                "bbox",
                format!("expected 4 comma-separated numbers, got {}", values.len()),
            )),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct HeatmapParams {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub region: Option<String>,
    pub subregion: Option<String>,
}

impl From<HeatmapParams> for HeatmapQuery {
    fn from(params: HeatmapParams) -> Self {
        let mut query = HeatmapQuery::new(TimeRange::new(params.start, params.end));
        query.region = params.region;
        query.subregion = params.subregion;
        query
    }
}

/// Route request body
#[derive(Debug, Deserialize)]
pub struct RouteRequestBody {
    pub origin: WaypointBody,
    pub destination: WaypointBody,
    #[serde(default)]
    pub waypoints: Vec<WaypointBody>,
    #[serde(default)]
    pub transport_mode: Option<String>,
    #[serde(default)]
    pub optimize: bool,
    #[serde(default)]
    pub include_traffic: bool,
}

#[derive(Debug, Deserialize)]
pub struct WaypointBody {
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub address: Option<String>,
}

impl From<WaypointBody> for Waypoint {
    fn from(body: WaypointBody) -> Self {
        Waypoint {
            location: Coordinate::new(body.lat, body.lon),
            label: body.address,
        }
    }
}

impl TryFrom<RouteRequestBody> for RouteRequest {
    type Error = GeotrackError;

    fn try_from(body: RouteRequestBody) -> Result<Self> {
        let mode = match body.transport_mode.as_deref() {
            Some(name) => name.parse()?,
            None => TransportMode::default(),
        };

        Ok(RouteRequest::new(body.origin.into(), body.destination.into())
            .with_stops(body.waypoints.into_iter().map(Waypoint::from).collect())
            .with_mode(mode)
            .optimized(body.optimize)
            .with_traffic(body.include_traffic))
    }
}

/// Geofence registration body
pub type GeofenceRequest = GeofenceZone;

/// Delivery status change body.
///
/// `subregion` and `dropoff` only matter for `DELIVERED`, where they place the
/// completed delivery on the heatmap.
#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: DeliveryStatus,
    #[serde(default)]
    pub driver_id: Option<DriverId>,
    #[serde(default)]
    pub partner_id: Option<PartnerId>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub subregion: Option<String>,
    #[serde(default)]
    pub dropoff: Option<Coordinate>,
    #[serde(default)]
    pub message: Option<String>,
}

impl StatusRequest {
    pub fn validate(&self) -> Result<()> {
        if let Some(dropoff) = self.dropoff {
            validate_coordinate(dropoff.lat, dropoff.lon)?;
        }
        Ok(())
    }
}
