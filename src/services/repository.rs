use std::sync::Arc;

use crate::errors::AppError;
use crate::models::{Booking, BookingDraft, BookingRecord};
use crate::store::DocumentStore;

/// Maps bookings to and from store documents. Every failure is logged here
/// and handed back to the caller; nothing is retried.
#[derive(Clone)]
pub struct BookingRepository {
    store: Arc<dyn DocumentStore>,
}

impl BookingRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn list_all(&self) -> Result<Vec<Booking>, AppError> {
        let documents = self
            .store
            .list_all()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "failed to fetch bookings"))?;

        let mut bookings = Vec::with_capacity(documents.len());
        for doc in documents {
            if !doc.data.is_object() {
                tracing::warn!(booking_id = %doc.id, "skipping booking document that is not an object");
                continue;
            }
            match serde_json::from_value::<BookingRecord>(doc.data) {
                Ok(record) => bookings.push(Booking::from_record(doc.id, record)),
                Err(e) => {
                    tracing::warn!(booking_id = %doc.id, error = %e, "skipping malformed booking")
                }
            }
        }
        Ok(bookings)
    }

    pub async fn create(&self, draft: &BookingDraft) -> Result<Booking, AppError> {
        let record = draft.to_record();
        let id = self
            .store
            .add(encode(&record)?)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "failed to create booking"))?;

        tracing::info!(booking_id = %id, "booking added");
        Ok(Booking::from_record(id, record))
    }

    pub async fn update(&self, id: &str, draft: &BookingDraft) -> Result<Booking, AppError> {
        let record = draft.to_record();
        self.store
            .set(id, encode(&record)?)
            .await
            .inspect_err(|e| tracing::error!(booking_id = %id, error = %e, "failed to update booking"))?;

        tracing::info!(booking_id = %id, "booking updated");
        Ok(Booking::from_record(id, record))
    }

    pub async fn delete(&self, id: &str) -> Result<(), AppError> {
        self.store
            .delete(id)
            .await
            .inspect_err(|e| tracing::error!(booking_id = %id, error = %e, "failed to delete booking"))?;

        tracing::info!(booking_id = %id, "booking deleted");
        Ok(())
    }
}

fn encode(record: &BookingRecord) -> Result<serde_json::Value, AppError> {
    serde_json::to_value(record).map_err(|e| AppError::StoreUnavailable(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controllers::view::{price_text, status_tone, StatusTone, PRICE_UNAVAILABLE};
    use crate::models::{BookingStatus, ClockInput, DraftTime, Period, Price};
    use crate::store::MemoryStore;

    fn draft() -> BookingDraft {
        BookingDraft {
            customer_name: "Jane".to_string(),
            booking_date: "2024-05-01".to_string(),
            booking_time: DraftTime {
                start: ClockInput { time: "02:00".to_string(), period: Period::PM },
                end: ClockInput { time: "03:00".to_string(), period: Period::PM },
            },
            price: "50".to_string(),
            status: BookingStatus::Confirmed,
            mobile_number: "555-1234".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_writes_joined_times() {
        let store = Arc::new(MemoryStore::new());
        let repo = BookingRepository::new(store.clone());

        let booking = repo.create(&draft()).await.unwrap();
        assert!(!booking.booking_id.is_empty());
        assert_eq!(booking.booking_time.start, "02:00 PM");

        let stored = store.list_all().await.unwrap();
        assert_eq!(stored[0].id, booking.booking_id);
        assert_eq!(stored[0].data["booking_time"]["end"], "03:00 PM");
        assert!(stored[0].data.get("booking_id").is_none());
    }

    #[tokio::test]
    async fn test_list_attaches_ids_and_skips_malformed() {
        let store = Arc::new(MemoryStore::new());
        store
            .insert(
                "abc",
                serde_json::json!({
                    "customer_name": "Omar",
                    "booking_date": "2024-06-02",
                    "booking_time": {"start": "09:00 AM", "end": "10:00 AM"},
                    "price": 20,
                    "status": "Pending",
                    "mobile_number": "555-0000"
                }),
            )
            .unwrap();
        store.insert("broken", serde_json::json!(["not", "a", "booking"])).unwrap();

        let bookings = BookingRepository::new(store).list_all().await.unwrap();
        assert_eq!(bookings.len(), 1);
        assert_eq!(bookings[0].booking_id, "abc");
        assert_eq!(bookings[0].price, Price::Number(20.0));
        assert_eq!(bookings[0].status, BookingStatus::Pending);
    }

    #[tokio::test]
    async fn test_list_keeps_incomplete_documents() {
        let store = Arc::new(MemoryStore::new());
        store
            .insert(
                "null-price",
                serde_json::json!({
                    "customer_name": "Ravi",
                    "booking_date": "2024-07-04",
                    "booking_time": {"start": "10:00 AM", "end": "11:00 AM"},
                    "price": null,
                    "status": "Confirmed",
                    "mobile_number": "555-2222"
                }),
            )
            .unwrap();
        store
            .insert(
                "no-mobile",
                serde_json::json!({
                    "customer_name": "Mei",
                    "booking_date": "2024-07-05",
                    "booking_time": {"start": "01:00 PM", "end": "02:00 PM"},
                    "price": false,
                    "status": "No-show"
                }),
            )
            .unwrap();

        let bookings = BookingRepository::new(store).list_all().await.unwrap();
        assert_eq!(bookings.len(), 2);
        assert_eq!(bookings[0].booking_id, "null-price");
        assert_eq!(bookings[1].booking_id, "no-mobile");
        assert_eq!(bookings[1].mobile_number, "");
        for booking in &bookings {
            assert_eq!(price_text(&booking.price), PRICE_UNAVAILABLE);
        }
        assert_eq!(status_tone(&bookings[1].status), StatusTone::Red);
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_are_not_found() {
        let repo = BookingRepository::new(Arc::new(MemoryStore::new()));

        assert!(matches!(repo.update("gone", &draft()).await, Err(AppError::NotFound(_))));
        assert!(matches!(repo.delete("gone").await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_outage_is_reported() {
        let store = Arc::new(MemoryStore::new());
        store.set_unavailable(true);
        let repo = BookingRepository::new(store);

        assert!(matches!(repo.list_all().await, Err(AppError::StoreUnavailable(_))));
        assert!(matches!(repo.create(&draft()).await, Err(AppError::StoreUnavailable(_))));
    }
}
