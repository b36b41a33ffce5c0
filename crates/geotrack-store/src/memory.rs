//! In-memory delivery collaborators for development and testing.

use async_trait::async_trait;
use dashmap::DashMap;
use geotrack_core::error::Result;
use geotrack_core::models::{
    ActiveDelivery, DeliveryId, DeliveryRecord, DeliveryStatus, DeliveryStatusUpdate, DriverId,
    TimeRange,
};
use geotrack_core::ports::{DeliveryDirectory, DeliveryHistory};
use std::sync::Arc;

/// In-memory implementation of DeliveryDirectory
#[derive(Debug, Clone, Default)]
pub struct MemoryDeliveryDirectory {
    deliveries: Arc<DashMap<DeliveryId, ActiveDelivery>>,
}

impl MemoryDeliveryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a delivery
    pub fn upsert(&self, delivery: ActiveDelivery) {
        self.deliveries.insert(delivery.delivery_id, delivery);
    }

    /// Change the status of a known delivery, returning false when unknown
    pub fn set_status(&self, id: DeliveryId, status: DeliveryStatus) -> bool {
        match self.deliveries.get_mut(&id) {
            Some(mut delivery) => {
                delivery.status = status;
                true
            }
            None => false,
        }
    }

    pub fn remove(&self, id: DeliveryId) -> Option<ActiveDelivery> {
        self.deliveries.remove(&id).map(|(_, delivery)| delivery)
    }

    pub fn get(&self, id: DeliveryId) -> Option<ActiveDelivery> {
        self.deliveries.get(&id).map(|d| d.value().clone())
    }

    /// Record a delivery assigned to `driver_id` as pending unless it is already known.
    ///
    /// Returns true when the delivery was added.
    pub fn register(&self, id: DeliveryId, driver_id: DriverId) -> bool {
        let mut added = false;
        self.deliveries.entry(id).or_insert_with(|| {
            added = true;
            ActiveDelivery {
                delivery_id: id,
                status: DeliveryStatus::Pending,
                assigned_driver_id: Some(driver_id),
                partner_id: None,
                region: None,
            }
        });
        added
    }

    /// Apply a status change, creating the delivery if it is unknown.
    ///
    /// Fields the update leaves out keep their stored values.
    pub fn apply_update(&self, update: &DeliveryStatusUpdate) -> ActiveDelivery {
        let mut entry = self
            .deliveries
            .entry(update.delivery_id)
            .or_insert_with(|| ActiveDelivery {
                delivery_id: update.delivery_id,
                status: update.status,
                assigned_driver_id: None,
                partner_id: None,
                region: None,
            });

        let delivery = entry.value_mut();
        delivery.status = update.status;
        if update.driver_id.is_some() {
            delivery.assigned_driver_id = update.driver_id;
        }
        if update.partner_id.is_some() {
            delivery.partner_id = update.partner_id;
        }
        if let Some(region) = &update.region {
            delivery.region = Some(region.clone());
        }
        delivery.clone()
    }

    pub fn len(&self) -> usize {
        self.deliveries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deliveries.is_empty()
    }
}

#[async_trait]
impl DeliveryDirectory for MemoryDeliveryDirectory {
    async fn get_active_delivery(&self, id: DeliveryId) -> Result<Option<ActiveDelivery>> {
        Ok(self.deliveries.get(&id).map(|d| d.value().clone()))
    }
}

/// In-memory implementation of DeliveryHistory
#[derive(Debug, Clone, Default)]
pub struct MemoryDeliveryHistory {
    records: Arc<DashMap<DeliveryId, DeliveryRecord>>,
}

impl MemoryDeliveryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completed delivery
    pub fn record(&self, record: DeliveryRecord) {
        self.records.insert(record.delivery_id, record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl DeliveryHistory for MemoryDeliveryHistory {
    async fn query_deliveries(
        &self,
        region: Option<&str>,
        range: TimeRange,
    ) -> Result<Vec<DeliveryRecord>> {
        let mut records: Vec<DeliveryRecord> = self
            .records
            .iter()
            .filter(|r| range.contains(r.completed_at))
            .filter(|r| region.map_or(true, |wanted| r.region == wanted))
            .map(|r| r.value().clone())
            .collect();
        records.sort_by_key(|r| r.delivery_id);
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use geotrack_core::models::PartnerId;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, hour, 0, 0).unwrap()
    }

    fn record(id: u64, region: &str, hour: u32) -> DeliveryRecord {
        DeliveryRecord {
            delivery_id: DeliveryId(id),
            region: region.to_string(),
            subregion: "01".to_string(),
            completed_at: at(hour),
            dropoff: None,
        }
    }

    #[tokio::test]
    async fn test_directory_lookup() {
        let directory = MemoryDeliveryDirectory::new();
        directory.upsert(ActiveDelivery {
            delivery_id: DeliveryId(5),
            status: DeliveryStatus::InTransit,
            assigned_driver_id: Some(DriverId(1)),
            partner_id: None,
            region: Some("Bole".to_string()),
        });

        let found = directory.get_active_delivery(DeliveryId(5)).await.unwrap().unwrap();
        assert_eq!(found.status, DeliveryStatus::InTransit);
        assert!(directory.get_active_delivery(DeliveryId(6)).await.unwrap().is_none());

        assert!(directory.set_status(DeliveryId(5), DeliveryStatus::Delivered));
        assert!(!directory.set_status(DeliveryId(6), DeliveryStatus::Delivered));
        let found = directory.get_active_delivery(DeliveryId(5)).await.unwrap().unwrap();
        assert!(found.status.is_terminal());
    }

    #[test]
    fn test_status_update_merges_with_known_delivery() {
        let directory = MemoryDeliveryDirectory::new();
        assert!(directory.register(DeliveryId(8), DriverId(3)));
        assert!(!directory.register(DeliveryId(8), DriverId(4)));
        assert_eq!(directory.get(DeliveryId(8)).unwrap().status, DeliveryStatus::Pending);

        let merged = directory.apply_update(&DeliveryStatusUpdate {
            delivery_id: DeliveryId(8),
            status: DeliveryStatus::InTransit,
            driver_id: None,
            partner_id: Some(PartnerId(2)),
            region: Some("Yeka".to_string()),
            message: None,
            updated_at: at(9),
        });
        assert_eq!(merged.status, DeliveryStatus::InTransit);
        assert_eq!(merged.assigned_driver_id, Some(DriverId(3)));
        assert_eq!(merged.partner_id, Some(PartnerId(2)));
        assert_eq!(directory.get(DeliveryId(8)), Some(merged));
    }

    #[test]
    fn test_status_update_creates_unknown_delivery() {
        let directory = MemoryDeliveryDirectory::new();
        let created = directory.apply_update(&DeliveryStatusUpdate {
            delivery_id: DeliveryId(9),
            status: DeliveryStatus::PickedUp,
            driver_id: Some(DriverId(5)),
            partner_id: None,
            region: None,
            message: Some("left the warehouse".to_string()),
            updated_at: at(9),
        });
        assert_eq!(created.assigned_driver_id, Some(DriverId(5)));
        assert_eq!(directory.len(), 1);
    }

    #[tokio::test]
    async fn test_history_window_is_half_open() {
        let history = MemoryDeliveryHistory::new();
        history.record(record(1, "Bole", 8));
        history.record(record(2, "Bole", 10));
        history.record(record(3, "Yeka", 9));

        let range = TimeRange::new(at(8), at(10));
        let all = history.query_deliveries(None, range).await.unwrap();
        let ids: Vec<_> = all.iter().map(|r| r.delivery_id).collect();
        assert_eq!(ids, vec![DeliveryId(1), DeliveryId(3)]);

        let bole = history.query_deliveries(Some("Bole"), range).await.unwrap();
        assert_eq!(bole.len(), 1);
    }
}
