pub mod booking;
pub mod draft;
pub mod session;

pub use booking::{Booking, BookingRecord, BookingStatus, BookingTime, Price};
pub use draft::{BookingDraft, ClockInput, DraftField, DraftTime, Period};
pub use session::{Principal, SessionState};
