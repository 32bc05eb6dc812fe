use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum BookingStatus {
    #[default]
    Confirmed,
    Pending,
    Cancelled,
    /// Any other status text found on a stored document.
    Other(String),
}

impl BookingStatus {
    pub fn as_str(&self) -> &str {
        match self {
            BookingStatus::Confirmed => "Confirmed",
            BookingStatus::Pending => "Pending",
            BookingStatus::Cancelled => "Cancelled",
            BookingStatus::Other(s) => s,
        }
    }

    /// One of the three selectable statuses, or `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Confirmed" => Some(BookingStatus::Confirmed),
            "Pending" => Some(BookingStatus::Pending),
            "Cancelled" => Some(BookingStatus::Cancelled),
            _ => None,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, BookingStatus::Other(_))
    }
}

impl Serialize for BookingStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for BookingStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::Null => BookingStatus::default(),
            Value::String(s) => BookingStatus::parse(&s).unwrap_or(BookingStatus::Other(s)),
            other => BookingStatus::Other(other.to_string()),
        })
    }
}

/// Reads any JSON value as text: strings as-is, `null` as empty, anything
/// else in its JSON form.
fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    })
}

fn lenient_time<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BookingTime, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// A price exactly as it sits in the store: either a JSON number or the raw
/// text typed into the form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Price {
    Number(f64),
    Text(String),
    /// `null`, a boolean, or anything else that is not a price.
    Other(Value),
}

impl Price {
    /// The numeric amount, if there is a finite one.
    pub fn amount(&self) -> Option<f64> {
        let value = match self {
            Price::Number(n) => Some(*n),
            Price::Text(s) => s.trim().parse::<f64>().ok(),
            Price::Other(_) => None,
        };
        value.filter(|v| v.is_finite())
    }

    /// Text suitable for an editable input field.
    pub fn as_input(&self) -> String {
        match self {
            Price::Number(n) => n.to_string(),
            Price::Text(s) => s.clone(),
            Price::Other(Value::Null) => String::new(),
            Price::Other(v) => v.to_string(),
        }
    }
}

impl Default for Price {
    fn default() -> Self {
        Price::Text(String::new())
    }
}

/// Start and end, each persisted as `"<time> <period>"`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct BookingTime {
    #[serde(deserialize_with = "lenient_text")]
    pub start: String,
    #[serde(deserialize_with = "lenient_text")]
    pub end: String,
}

impl BookingTime {
    pub fn display(&self) -> String {
        format!("{} - {}", self.start, self.end)
    }
}

/// The document body written to the store. Carries no id; the store owns that.
///
/// Reading is forgiving: a missing or mistyped field falls back to something
/// displayable so a stored booking is never lost from the list.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BookingRecord {
    #[serde(deserialize_with = "lenient_text")]
    pub customer_name: String,
    #[serde(deserialize_with = "lenient_text")]
    pub booking_date: String,
    #[serde(deserialize_with = "lenient_time")]
    pub booking_time: BookingTime,
    pub price: Price,
    pub status: BookingStatus,
    #[serde(deserialize_with = "lenient_text")]
    pub mobile_number: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Booking {
    pub booking_id: String,
    pub customer_name: String,
    pub booking_date: String,
    pub booking_time: BookingTime,
    pub price: Price,
    pub status: BookingStatus,
    pub mobile_number: String,
}

impl Booking {
    pub fn from_record(booking_id: impl Into<String>, record: BookingRecord) -> Self {
        Self {
            booking_id: booking_id.into(),
            customer_name: record.customer_name,
            booking_date: record.booking_date,
            booking_time: record.booking_time,
            price: record.price,
            status: record.status,
            mobile_number: record.mobile_number,
        }
    }

    pub fn to_record(&self) -> BookingRecord {
        BookingRecord {
            customer_name: self.customer_name.clone(),
            booking_date: self.booking_date.clone(),
            booking_time: self.booking_time.clone(),
            price: self.price.clone(),
            status: self.status.clone(),
            mobile_number: self.mobile_number.clone(),
        }
    }
}
