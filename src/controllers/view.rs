//! Derived presentation of bookings: display order and per-row text.

use std::cmp::Reverse;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::Serialize;

use crate::models::{Booking, BookingStatus, Period, Price};

pub const EMPTY_MESSAGE: &str = "No bookings available.";
pub const PRICE_UNAVAILABLE: &str = "N/A";
pub const INVALID_DATE: &str = "Invalid Date";

/// Parses `"HH:MM[:SS] [AM|PM]"`.
///
/// A period only shifts hours 1 through 12; `"14:00 PM"` (a 24-hour value
/// from a time input followed by its period) stays 14:00. Anything else,
/// including a third token or an unknown period, is unparseable.
pub fn parse_clock(value: &str) -> Option<NaiveTime> {
    let mut parts = value.split_whitespace();
    let clock = parts.next()?;
    let period = match parts.next() {
        Some(raw) => Some(Period::parse(&raw.to_ascii_uppercase())?),
        None => None,
    };
    if parts.next().is_some() {
        return None;
    }

    let time = NaiveTime::parse_from_str(clock, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(clock, "%H:%M:%S"))
        .ok()?;

    match period {
        Some(period) if (1..=12).contains(&time.hour()) => {
            let hour = match period {
                Period::AM => time.hour() % 12,
                Period::PM => time.hour() % 12 + 12,
            };
            time.with_hour(hour)
        }
        _ => Some(time),
    }
}

pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

/// The booking's date combined with its start time.
pub fn starts_at(booking: &Booking) -> Option<NaiveDateTime> {
    let date = parse_date(&booking.booking_date)?;
    let time = parse_clock(&booking.booking_time.start)?;
    Some(date.and_time(time))
}

/// Newest start first. Bookings whose start cannot be parsed go last. The
/// sort is stable, so equal keys keep their incoming order.
pub fn sort_bookings(bookings: &[Booking]) -> Vec<Booking> {
    let mut sorted = bookings.to_vec();
    sorted.sort_by_cached_key(|b| Reverse(starts_at(b)));
    sorted
}

pub fn day_of_week(date: &str) -> String {
    parse_date(date)
        .map(|d| d.format("%A").to_string())
        .unwrap_or_else(|| INVALID_DATE.to_string())
}

pub fn price_text(price: &Price) -> String {
    match price.amount() {
        Some(amount) => format!("${amount:.2}"),
        None => PRICE_UNAVAILABLE.to_string(),
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StatusTone {
    Green,
    Yellow,
    Red,
}

pub fn status_tone(status: &BookingStatus) -> StatusTone {
    match status {
        BookingStatus::Confirmed => StatusTone::Green,
        BookingStatus::Pending => StatusTone::Yellow,
        BookingStatus::Cancelled | BookingStatus::Other(_) => StatusTone::Red,
    }
}

/// One rendered entry of the booking list.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BookingRow {
    pub booking_id: String,
    pub customer_name: String,
    pub booking_date: String,
    pub day_of_week: String,
    pub booking_time: String,
    pub price: String,
    pub mobile_number: String,
    pub status: BookingStatus,
    pub status_tone: StatusTone,
}

impl From<&Booking> for BookingRow {
    fn from(b: &Booking) -> Self {
        Self {
            booking_id: b.booking_id.clone(),
            customer_name: b.customer_name.clone(),
            booking_date: b.booking_date.clone(),
            day_of_week: day_of_week(&b.booking_date),
            booking_time: b.booking_time.display(),
            price: price_text(&b.price),
            mobile_number: b.mobile_number.clone(),
            status: b.status.clone(),
            status_tone: status_tone(&b.status),
        }
    }
}

/// Display rows in display order.
pub fn rows(bookings: &[Booking]) -> Vec<BookingRow> {
    sort_bookings(bookings).iter().map(BookingRow::from).collect()
}
