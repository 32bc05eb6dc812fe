//! Observable state holders for the booking screens.
//!
//! Controllers keep their state in a `tokio::sync::watch` channel. A
//! presentation layer reads a snapshot, or subscribes and redraws on change.

pub mod form;
pub mod list;
pub mod view;

pub use form::{BookingFormController, FieldUpdate};
pub use list::{BookingListController, ListState, LoadState};
pub use view::{BookingRow, StatusTone};
