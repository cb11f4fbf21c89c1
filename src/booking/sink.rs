//! Booking record sink seam and the in-memory store behind booking history.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use super::record::BookingRecord;

/// Receipt from the sink that a record was stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Acknowledgement {
    pub booking_id: Uuid,
    pub stored_at: DateTime<Utc>,
}

/// The sink could not store a record
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct SinkError(pub String);

#[async_trait]
pub trait BookingSink: Send + Sync {
    async fn submit(&self, record: BookingRecord) -> Result<Acknowledgement, SinkError>;
}

/// Keeps finalized bookings in memory
#[derive(Debug, Default)]
pub struct InMemoryBookingStore {
    records: RwLock<Vec<BookingRecord>>,
}

impl InMemoryBookingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A user's bookings, newest first
    pub async fn list_for_user(&self, user_id: Uuid) -> Vec<BookingRecord> {
        let mut records: Vec<BookingRecord> = self
            .records
            .read()
            .await
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        records
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl BookingSink for InMemoryBookingStore {
    async fn submit(&self, record: BookingRecord) -> Result<Acknowledgement, SinkError> {
        let mut records = self.records.write().await;
        // Resubmission after a lost acknowledgement stores nothing new
        if records.iter().any(|r| r.id == record.id) {
            debug!("Booking {} already stored", record.id);
            return Ok(Acknowledgement {
                booking_id: record.id,
                stored_at: Utc::now(),
            });
        }

        let ack = Acknowledgement {
            booking_id: record.id,
            stored_at: Utc::now(),
        };
        info!(
            "Stored booking {} ({}) for user {}",
            record.reference, record.id, record.user_id
        );
        records.push(record);
        Ok(ack)
    }
}
