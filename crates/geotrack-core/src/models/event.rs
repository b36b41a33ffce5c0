//! Events fanned out to realtime observers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{Alert, DeliveryId, DeliveryStatusUpdate, DriverId, PartnerId, Position};
use crate::error::GeotrackError;

/// Topic an observer subscribes to
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Subject {
    Driver(DriverId),
    Delivery(DeliveryId),
    Partner(PartnerId),
    Region(String),
}

impl Subject {
    /// Build a subject from a kind name and identifier, e.g. `("driver", "42")`
    pub fn parse(kind: &str, id: &str) -> Result<Self, GeotrackError> {
        let numeric = || {
            id.parse::<u64>().map_err(|_| {
                let reason = format!("'{}' is not a numeric {} id", id, kind);
                GeotrackError::validation("subject", reason)
            })
        };
        match kind {
            "driver" => Ok(Subject::Driver(DriverId(numeric()?))),
            "delivery" => Ok(Subject::Delivery(DeliveryId(numeric()?))),
            "partner" => Ok(Subject::Partner(PartnerId(numeric()?))),
            "region" if !id.is_empty() => Ok(Subject::Region(id.to_string())),
            _ => Err(GeotrackError::validation(
                "subject",
                format!("unknown subject '{}:{}'", kind, id),
            )),
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Subject::Driver(id) => write!(f, "driver:{}", id),
            Subject::Delivery(id) => write!(f, "delivery:{}", id),
            Subject::Partner(id) => write!(f, "partner:{}", id),
            Subject::Region(name) => write!(f, "region:{}", name),
        }
    }
}

impl FromStr for Subject {
    type Err = GeotrackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, id) = s.split_once(':').ok_or_else(|| {
            GeotrackError::validation("subject", format!("expected 'kind:id', got '{}'", s))
        })?;
        Subject::parse(kind, id)
    }
}

impl From<Subject> for String {
    fn from(subject: Subject) -> Self {
        subject.to_string()
    }
}

impl TryFrom<String> for Subject {
    type Error = GeotrackError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// What happened
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventPayload {
    DriverLocationUpdate(Position),
    GeofenceAlert(Alert),
    DeliveryStatusUpdate(DeliveryStatusUpdate),
}

/// An event as delivered to subscribers of a subject
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchEvent {
    pub subject: Subject,
    pub published_at: DateTime<Utc>,
    #[serde(flatten)]
    pub payload: EventPayload,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subject_display_and_parse() {
        let subject = Subject::Delivery(DeliveryId(12));
        assert_eq!(subject.to_string(), "delivery:12");
        assert_eq!("delivery:12".parse::<Subject>().unwrap(), subject);
        assert_eq!(
            "region:Addis Ababa".parse::<Subject>().unwrap(),
            Subject::Region("Addis Ababa".to_string())
        );
    }

    #[test]
    fn test_subject_rejects_garbage() {
        assert!("driver:abc".parse::<Subject>().is_err());
        assert!("truck:1".parse::<Subject>().is_err());
        assert!("driver".parse::<Subject>().is_err());
        assert!("region:".parse::<Subject>().is_err());
    }

    #[test]
    fn test_event_wire_format() {
        let position = Position::new(DriverId(3), 9.0, 38.7, Utc::now());
        let event = DispatchEvent {
            subject: Subject::Driver(DriverId(3)),
            published_at: Utc::now(),
            payload: EventPayload::DriverLocationUpdate(position),
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "DRIVER_LOCATION_UPDATE");
        assert_eq!(value["subject"], "driver:3");
        assert_eq!(value["payload"]["driver_id"], 3);
    }
}
