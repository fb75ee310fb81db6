use chrono::{DateTime, Local, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::errors::TrackerError;

/// Date-only input format for records: two-digit day, two-digit month,
/// four-digit year, e.g. "21.12.2021".
pub const DATE_FORMAT: &str = "%d.%m.%Y";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitStatus {
    NotReached,
    Reached,
    Exceeded,
}

/// One logged amount with an annotation and a timestamp. Immutable after
/// construction; the timestamp is always a normalized date-time, never the
/// raw input text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    amount: i64,
    note: String,
    timestamp: DateTime<Local>,
}

impl Record {
    /// The timestamp is taken at every call, not once per process.
    pub fn new(amount: i64, note: String) -> Self {
        Self::with_timestamp(amount, note, Local::now())
    }

    pub fn with_timestamp(amount: i64, note: String, timestamp: DateTime<Local>) -> Self {
        Self {
            amount,
            note,
            timestamp,
        }
    }

    /// Parses a `DATE_FORMAT` date at local midnight. Malformed input is an
    /// error naming the offending text, never silently coerced.
    pub fn from_date_str(amount: i64, note: String, date: &str) -> Result<Self, TrackerError> {
        let parsed =
            NaiveDate::parse_from_str(date, DATE_FORMAT).map_err(|source| {
                TrackerError::InvalidDate {
                    input: date.to_string(),
                    source,
                }
            })?;
        let timestamp = parsed
            .and_time(NaiveTime::MIN)
            .and_local_timezone(Local)
            .earliest()
            .unwrap();
        Ok(Self::with_timestamp(amount, note, timestamp))
    }

    pub fn amount(&self) -> i64 {
        self.amount
    }

    pub fn note(&self) -> &str {
        &self.note
    }

    pub fn timestamp(&self) -> DateTime<Local> {
        self.timestamp
    }
}

/// Exchange-rate payload as published by the provider: a `Valute` mapping
/// keyed by uppercase three-letter code. Fields we do not consume are
/// ignored; the raw payload is cached verbatim on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateTable {
    #[serde(rename = "Valute")]
    valute: HashMap<String, Quote>,
}

impl RateTable {
    pub fn quote(&self, code: &str) -> Option<&Quote> {
        self.valute.get(code)
    }

    pub fn codes(&self) -> Vec<&String> {
        self.valute.keys().collect()
    }

    pub fn len(&self) -> usize {
        self.valute.len()
    }

    pub fn is_empty(&self) -> bool {
        self.valute.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Quote {
    char_code: String,
    nominal: u32,
    name: String,
    value: f64,
}

impl Quote {
    pub fn char_code(&self) -> &str {
        &self.char_code
    }

    pub fn nominal(&self) -> u32 {
        self.nominal
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// Rubles per one unit of the foreign currency. The provider quotes
    /// `Value` rubles per `Nominal` units (100 for small-denomination
    /// currencies), so the raw value has to be normalized.
    pub fn unit_value(&self) -> f64 {
        self.value / f64::from(self.nominal)
    }
}
