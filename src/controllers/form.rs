use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use crate::errors::AppError;
use crate::models::{Booking, BookingDraft, BookingStatus, Period};
use crate::services::repository::BookingRepository;

/// One edit to a single draft field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldUpdate {
    CustomerName(String),
    BookingDate(String),
    StartTime(String),
    StartPeriod(Period),
    EndTime(String),
    EndPeriod(Period),
    Price(String),
    Status(BookingStatus),
    MobileNumber(String),
}

impl FieldUpdate {
    fn apply(self, draft: &mut BookingDraft) {
        match self {
            FieldUpdate::CustomerName(v) => draft.customer_name = v,
            FieldUpdate::BookingDate(v) => draft.booking_date = v,
            FieldUpdate::StartTime(v) => draft.booking_time.start.time = v,
            FieldUpdate::StartPeriod(p) => draft.booking_time.start.period = p,
            FieldUpdate::EndTime(v) => draft.booking_time.end.time = v,
            FieldUpdate::EndPeriod(p) => draft.booking_time.end.period = p,
            FieldUpdate::Price(v) => draft.price = v,
            FieldUpdate::Status(s) => draft.status = s,
            FieldUpdate::MobileNumber(v) => draft.mobile_number = v,
        }
    }
}

/// Draft state for adding a booking, or editing `target`.
pub struct BookingFormController {
    repository: BookingRepository,
    target: Option<Booking>,
    draft: watch::Sender<BookingDraft>,
}

impl BookingFormController {
    pub fn new(repository: BookingRepository, target: Option<Booking>) -> Self {
        let initial = target
            .as_ref()
            .map(BookingDraft::from_booking)
            .unwrap_or_default();
        let (draft, _) = watch::channel(initial);
        Self {
            repository,
            target,
            draft,
        }
    }

    pub fn is_editing(&self) -> bool {
        self.target.is_some()
    }

    pub fn draft(&self) -> BookingDraft {
        self.draft.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<BookingDraft> {
        self.draft.subscribe()
    }

    pub fn changes(&self) -> WatchStream<BookingDraft> {
        WatchStream::new(self.subscribe())
    }

    pub fn set_field(&self, update: FieldUpdate) {
        self.draft.send_modify(|draft| update.apply(draft));
    }

    /// Validates, then writes the draft: `update` when editing, `create`
    /// otherwise. `on_saved` receives the stored booking, id included. On any
    /// failure the draft is left as it was.
    pub async fn submit<F>(&self, on_saved: F) -> Result<(), AppError>
    where
        F: FnOnce(Booking),
    {
        let draft = self.draft();
        if let Err(e) = draft.validate() {
            tracing::warn!(error = %e, "booking form incomplete");
            return Err(e);
        }

        let saved = match &self.target {
            Some(target) => self.repository.update(&target.booking_id, &draft).await?,
            None => self.repository.create(&draft).await?,
        };
        on_saved(saved);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::models::{BookingTime, Price};
    use crate::store::{DocumentStore, MemoryStore};

    fn fill(form: &BookingFormController) {
        for update in [
            FieldUpdate::CustomerName("Jane".to_string()),
            FieldUpdate::BookingDate("2024-05-01".to_string()),
            FieldUpdate::StartTime("02:00".to_string()),
            FieldUpdate::StartPeriod(Period::PM),
            FieldUpdate::EndTime("03:00".to_string()),
            FieldUpdate::EndPeriod(Period::PM),
            FieldUpdate::Price("50".to_string()),
            FieldUpdate::MobileNumber("555-1234".to_string()),
        ] {
            form.set_field(update);
        }
    }

    #[test]
    fn test_new_form_defaults() {
        let repo = BookingRepository::new(Arc::new(MemoryStore::new()));
        let form = BookingFormController::new(repo, None);
        let draft = form.draft();
        assert!(!form.is_editing());
        assert_eq!(draft.status, BookingStatus::Confirmed);
        assert_eq!(draft.booking_time.start.period, Period::AM);
        assert_eq!(draft.booking_time.end.period, Period::AM);
        assert!(draft.customer_name.is_empty());
    }

    #[test]
    fn test_time_updates_leave_siblings() {
        let repo = BookingRepository::new(Arc::new(MemoryStore::new()));
        let form = BookingFormController::new(repo, None);

        form.set_field(FieldUpdate::StartTime("08:15".to_string()));
        form.set_field(FieldUpdate::EndPeriod(Period::PM));

        let time = form.draft().booking_time;
        assert_eq!(time.start.time, "08:15");
        assert_eq!(time.start.period, Period::AM);
        assert_eq!(time.end.time, "");
        assert_eq!(time.end.period, Period::PM);
    }

    #[test]
    fn test_edit_form_splits_times() {
        let repo = BookingRepository::new(Arc::new(MemoryStore::new()));
        let target = Booking {
            booking_id: "b1".to_string(),
            booking_time: BookingTime {
                start: "02:30 PM".to_string(),
                end: "04:00".to_string(),
            },
            price: Price::Number(75.0),
            ..Default::default()
        };
        let form = BookingFormController::new(repo, Some(target));
        let draft = form.draft();
        assert!(form.is_editing());
        assert_eq!(draft.booking_time.start.time, "02:30");
        assert_eq!(draft.booking_time.start.period, Period::PM);
        assert_eq!(draft.booking_time.end.period, Period::AM);
        assert_eq!(draft.price, "75");
    }

    #[tokio::test]
    async fn test_submit_creates() {
        let store = Arc::new(MemoryStore::new());
        let form = BookingFormController::new(BookingRepository::new(store.clone()), None);
        fill(&form);

        let mut saved = None;
        form.submit(|b| saved = Some(b)).await.unwrap();

        let saved = saved.unwrap();
        assert_eq!(saved.booking_time.start, "02:00 PM");
        assert_eq!(saved.booking_time.end, "03:00 PM");
        assert_eq!(store.add_calls(), 1);
        assert_eq!(store.list_all().await.unwrap()[0].id, saved.booking_id);
    }

    #[tokio::test]
    async fn test_incomplete_draft_never_reaches_store() {
        let store = Arc::new(MemoryStore::new());
        let form = BookingFormController::new(BookingRepository::new(store.clone()), None);
        form.set_field(FieldUpdate::CustomerName("Jane".to_string()));

        let mut called = false;
        let err = form.submit(|_| called = true).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationFailed(_)));
        assert!(!called);
        assert_eq!(store.add_calls(), 0);
    }

    #[tokio::test]
    async fn test_failed_submit_keeps_draft() {
        let store = Arc::new(MemoryStore::new());
        let form = BookingFormController::new(BookingRepository::new(store.clone()), None);
        fill(&form);
        let before = form.draft();

        store.set_unavailable(true);
        let mut called = false;
        let err = form.submit(|_| called = true).await.unwrap_err();
        assert!(matches!(err, AppError::StoreUnavailable(_)));
        assert!(!called);
        assert_eq!(form.draft(), before);
    }

    #[tokio::test]
    async fn test_submit_updates_target() {
        let store = Arc::new(MemoryStore::new());
        let repo = BookingRepository::new(store.clone());
        let creator = BookingFormController::new(repo.clone(), None);
        fill(&creator);
        let mut created = None;
        creator.submit(|b| created = Some(b)).await.unwrap();
        let created = created.unwrap();

        let editor = BookingFormController::new(repo, Some(created.clone()));
        editor.set_field(FieldUpdate::Status(BookingStatus::Cancelled));
        let mut updated = None;
        editor.submit(|b| updated = Some(b)).await.unwrap();

        let updated = updated.unwrap();
        assert_eq!(updated.booking_id, created.booking_id);
        assert_eq!(updated.status, BookingStatus::Cancelled);
        assert_eq!(store.set_calls(), 1);
        assert_eq!(store.list_all().await.unwrap()[0].data["status"], "Cancelled");
    }
}
