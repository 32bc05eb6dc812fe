use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use super::form::BookingFormController;
use super::view::{self, BookingRow, EMPTY_MESSAGE};
use crate::errors::AppError;
use crate::models::Booking;
use crate::services::repository::BookingRepository;

#[derive(Debug, Clone, Default, PartialEq)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Loaded,
    Failed(String),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListState {
    /// In arrival order; see [`ListState::sorted_bookings`] for display order.
    pub bookings: Vec<Booking>,
    pub form_visible: bool,
    pub editing_target: Option<Booking>,
    pub load: LoadState,
    /// Message of the most recent failed delete or submit.
    pub last_error: Option<String>,
}

impl ListState {
    pub fn sorted_bookings(&self) -> Vec<Booking> {
        view::sort_bookings(&self.bookings)
    }

    pub fn rows(&self) -> Vec<BookingRow> {
        view::rows(&self.bookings)
    }

    /// Shown in place of the list once a fetch succeeded with nothing in it.
    pub fn empty_message(&self) -> Option<&'static str> {
        match self.load {
            LoadState::Failed(_) => None,
            _ if self.bookings.is_empty() => Some(EMPTY_MESSAGE),
            _ => None,
        }
    }
}

/// Holds the booking collection and reconciles it after each confirmed write,
/// so a write never triggers a refetch.
pub struct BookingListController {
    repository: BookingRepository,
    state: watch::Sender<ListState>,
}

impl BookingListController {
    pub fn new(repository: BookingRepository) -> Self {
        let (state, _) = watch::channel(ListState::default());
        Self { repository, state }
    }

    pub fn state(&self) -> ListState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ListState> {
        self.state.subscribe()
    }

    pub fn changes(&self) -> WatchStream<ListState> {
        WatchStream::new(self.subscribe())
    }

    /// Fetches the collection. Only the first call does anything.
    pub async fn mount(&self) -> Result<(), AppError> {
        let first = self.state.send_if_modified(|state| {
            if state.load == LoadState::Idle {
                state.load = LoadState::Loading;
                true
            } else {
                false
            }
        });
        if !first {
            return Ok(());
        }

        match self.repository.list_all().await {
            Ok(bookings) => {
                self.state.send_modify(|state| {
                    state.bookings = bookings;
                    state.load = LoadState::Loaded;
                });
                Ok(())
            }
            Err(e) => {
                self.state.send_modify(|state| {
                    state.bookings.clear();
                    state.load = LoadState::Failed(e.to_string());
                });
                Err(e)
            }
        }
    }

    pub fn start_add(&self) {
        self.state.send_modify(|state| {
            state.editing_target = None;
            state.form_visible = true;
        });
    }

    pub fn start_edit(&self, booking: Booking) {
        self.state.send_modify(|state| {
            state.editing_target = Some(booking);
            state.form_visible = true;
        });
    }

    /// Hides the form and forgets the edit target.
    pub fn cancel_form(&self) {
        self.state.send_modify(|state| {
            state.form_visible = false;
            state.editing_target = None;
        });
    }

    /// A form for the current target, if the form is showing.
    pub fn form(&self) -> Option<BookingFormController> {
        let state = self.state.borrow();
        state.form_visible.then(|| {
            BookingFormController::new(self.repository.clone(), state.editing_target.clone())
        })
    }

    /// Deletes remotely first; the local entry goes only once that succeeded.
    pub async fn on_delete(&self, id: &str) -> Result<(), AppError> {
        match self.repository.delete(id).await {
            Ok(()) => {
                self.state.send_modify(|state| {
                    state.bookings.retain(|b| b.booking_id != id);
                    state.last_error = None;
                });
                Ok(())
            }
            Err(e) => {
                self.state.send_modify(|state| state.last_error = Some(e.to_string()));
                Err(e)
            }
        }
    }

    /// Folds a saved booking back into the collection and closes the form.
    pub fn on_submit_result(&self, booking: Booking) {
        self.state.send_modify(|state| {
            match state.editing_target.take() {
                Some(target) => {
                    let saved = Booking {
                        booking_id: target.booking_id,
                        ..booking
                    };
                    match state.bookings.iter_mut().find(|b| b.booking_id == saved.booking_id) {
                        Some(slot) => *slot = saved,
                        None => {
                            tracing::warn!(booking_id = %saved.booking_id, "edited booking no longer listed")
                        }
                    }
                }
                None => {
                    let mut booking = booking;
                    if booking.booking_id.is_empty() {
                        booking.booking_id = display_id(&state.bookings);
                    }
                    match state.bookings.iter_mut().find(|b| b.booking_id == booking.booking_id) {
                        Some(slot) => *slot = booking,
                        None => state.bookings.push(booking),
                    }
                }
            }
            state.form_visible = false;
            state.last_error = None;
        });
    }

    pub fn report_error(&self, error: &AppError) {
        self.state.send_modify(|state| state.last_error = Some(error.to_string()));
    }
}

/// `B001`, `B002`, ... skipping ids already in use.
fn display_id(bookings: &[Booking]) -> String {
    (bookings.len() + 1..)
        .map(|n| format!("B{n:03}"))
        .find(|id| !bookings.iter().any(|b| &b.booking_id == id))
        .unwrap_or_default()
}
