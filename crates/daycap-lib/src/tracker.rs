use chrono::{Datelike, Duration, Local};
use std::cmp::Ordering;
use tracing::debug;

use crate::data_structures::{LimitStatus, Record};

/// Shared day-limit bookkeeping: an append-only record list with today,
/// trailing-week, and remaining-allowance aggregation. The reporting types
/// hold one of these and add their own phrasing on top.
///
/// Not synchronized. Callers in a concurrent environment must wrap the
/// tracker in their own lock.
#[derive(Debug, Clone)]
pub struct LimitTracker {
    limit: i64,
    records: Vec<Record>,
}

impl LimitTracker {
    pub fn new(limit: i64) -> Self {
        Self {
            limit,
            records: Vec::new(),
        }
    }

    /// Appends without validation: negative, zero, and oversized amounts
    /// are all accepted, and nothing is ever removed.
    pub fn add_record(&mut self, record: Record) {
        debug!(amount = record.amount(), note = record.note(), "record added");
        self.records.push(record);
    }

    pub fn limit(&self) -> i64 {
        self.limit
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sum of amounts logged "today". Only the day-of-month is compared,
    /// so a record from another month on the same day number still counts.
    /// Known quirk, kept until the product decides otherwise.
    pub fn today_total(&self) -> i64 {
        let current_day = Local::now().day();
        self.records
            .iter()
            .filter(|record| record.timestamp().day() == current_day)
            .map(Record::amount)
            .sum()
    }

    /// Sum of amounts with a timestamp strictly after (now − 7 days).
    /// Unlike `today_total`, this compares full timestamps.
    pub fn week_total(&self) -> i64 {
        let week_ago = Local::now() - Duration::days(7);
        self.records
            .iter()
            .filter(|record| record.timestamp() > week_ago)
            .map(Record::amount)
            .sum()
    }

    /// Signed remaining allowance for today and its status. The first
    /// element is `limit − today_total` in all three cases, so it goes
    /// negative once the limit is exceeded.
    pub fn remaining(&self) -> (i64, LimitStatus) {
        let today_total = self.today_total();
        let status = match today_total.cmp(&self.limit) {
            Ordering::Greater => LimitStatus::Exceeded,
            Ordering::Equal => LimitStatus::Reached,
            Ordering::Less => LimitStatus::NotReached,
        };
        (self.limit - today_total, status)
    }
}
