use std::fmt;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

use super::booking::{Booking, BookingRecord, BookingStatus, BookingTime, Price};
use crate::errors::AppError;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum Period {
    #[default]
    AM,
    PM,
}

impl Period {
    pub fn as_str(&self) -> &'static str {
        match self {
            Period::AM => "AM",
            Period::PM => "PM",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "AM" => Some(Period::AM),
            "PM" => Some(Period::PM),
            _ => None,
        }
    }
}

/// One edited end of a booking's time range: the clock value and its period.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClockInput {
    pub time: String,
    pub period: Period,
}

impl ClockInput {
    /// Splits a persisted `"<time> <period>"` on the first space. A missing or
    /// unrecognised period becomes `AM`, so `"02:30"` does not round-trip.
    pub fn split(persisted: &str) -> Self {
        let mut parts = persisted.split(' ');
        let time = parts.next().unwrap_or_default().to_string();
        let period = parts.next().and_then(Period::parse).unwrap_or_default();
        Self { time, period }
    }

    pub fn join(&self) -> String {
        format!("{} {}", self.time, self.period.as_str())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DraftTime {
    pub start: ClockInput,
    pub end: ClockInput,
}

/// A required draft field, in form order.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum DraftField {
    CustomerName,
    BookingDate,
    StartTime,
    EndTime,
    Price,
    MobileNumber,
}

impl DraftField {
    pub fn as_str(&self) -> &'static str {
        match self {
            DraftField::CustomerName => "customer_name",
            DraftField::BookingDate => "booking_date",
            DraftField::StartTime => "booking_time.start",
            DraftField::EndTime => "booking_time.end",
            DraftField::Price => "price",
            DraftField::MobileNumber => "mobile_number",
        }
    }
}

impl fmt::Display for DraftField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The editable form of a booking, before it is written to the store.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BookingDraft {
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub booking_date: String,
    #[serde(default)]
    pub booking_time: DraftTime,
    #[serde(default, deserialize_with = "price_input")]
    pub price: String,
    #[serde(default, deserialize_with = "status_choice")]
    pub status: BookingStatus,
    #[serde(default)]
    pub mobile_number: String,
}

fn status_choice<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BookingStatus, D::Error> {
    match BookingStatus::deserialize(deserializer)? {
        BookingStatus::Other(s) => Err(D::Error::custom(format!("unknown status `{s}`"))),
        status => Ok(status),
    }
}

fn price_input<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Price::deserialize(deserializer).map(|p| p.as_input())
}

impl BookingDraft {
    pub fn from_booking(booking: &Booking) -> Self {
        Self {
            customer_name: booking.customer_name.clone(),
            booking_date: booking.booking_date.clone(),
            booking_time: DraftTime {
                start: ClockInput::split(&booking.booking_time.start),
                end: ClockInput::split(&booking.booking_time.end),
            },
            price: booking.price.as_input(),
            status: booking.status.clone(),
            mobile_number: booking.mobile_number.clone(),
        }
    }

    /// Names of required fields that are still blank, in form order.
    pub fn missing_fields(&self) -> Vec<DraftField> {
        let required = [
            (DraftField::CustomerName, &self.customer_name),
            (DraftField::BookingDate, &self.booking_date),
            (DraftField::StartTime, &self.booking_time.start.time),
            (DraftField::EndTime, &self.booking_time.end.time),
            (DraftField::Price, &self.price),
            (DraftField::MobileNumber, &self.mobile_number),
        ];
        required
            .into_iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(field, _)| field)
            .collect()
    }

    pub fn validate(&self) -> Result<(), AppError> {
        let missing = self.missing_fields();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(AppError::ValidationFailed(missing))
        }
    }

    /// The persisted shape, with each time pair joined back into one string.
    pub fn to_record(&self) -> BookingRecord {
        BookingRecord {
            customer_name: self.customer_name.clone(),
            booking_date: self.booking_date.clone(),
            booking_time: BookingTime {
                start: self.booking_time.start.join(),
                end: self.booking_time.end.join(),
            },
            price: Price::Text(self.price.clone()),
            status: self.status.clone(),
            mobile_number: self.mobile_number.clone(),
        }
    }
}
