use tracing::debug;

use crate::data_structures::{LimitStatus, RateTable, Record};
use crate::errors::TrackerError;
use crate::rates::ExchangeRateCache;
use crate::tracker::LimitTracker;

/// Limits and raw amounts are always stored and aggregated in rubles.
pub const HOME_CURRENCY: &str = "rub";

/// Presentation names for the codes worth localizing; anything else is
/// displayed as its uppercase code.
const CURRENCY_NAMES: &[(&str, &str)] = &[("usd", "USD"), ("eur", "Euro"), ("rub", "руб")];

/// Money reporting over a day-limit tracker, with the remaining balance
/// convertible into any currency the rate provider publishes.
pub struct SpendingTracker {
    tracker: LimitTracker,
    rates: ExchangeRateCache,
}

impl SpendingTracker {
    pub fn new(limit: i64, rates: ExchangeRateCache) -> Self {
        Self {
            tracker: LimitTracker::new(limit),
            rates,
        }
    }

    pub fn add_record(&mut self, record: Record) {
        self.tracker.add_record(record);
    }

    pub fn tracker(&self) -> &LimitTracker {
        &self.tracker
    }

    pub fn describe_today(&self) -> String {
        format!("Сегодня потрачено {} руб.", self.tracker.today_total())
    }

    pub fn describe_week(&self) -> String {
        format!(
            "За последнюю неделю потрачено {} руб.",
            self.tracker.week_total()
        )
    }

    /// Remaining-balance report in the requested currency.
    ///
    /// The code is validated case-insensitively against the provider's
    /// table plus the home currency before anything else; an unknown code
    /// is a typed error whose Display text lists the valid options. A
    /// limit reached exactly gets the terse reply with no conversion;
    /// under and over the limit both convert `abs(remaining)`.
    pub fn spending_status(&self, currency_code: &str) -> Result<String, TrackerError> {
        let table = self.rates.fetch()?;
        let code = currency_code.to_lowercase();

        let rate = if code == HOME_CURRENCY {
            1.0
        } else {
            match table.quote(&code.to_uppercase()) {
                Some(quote) => quote.unit_value(),
                None => return Err(invalid_currency(currency_code, &table)),
            }
        };

        let (remaining, status) = self.tracker.remaining();
        debug!(remaining, ?status, currency = %code, "spending status computed");

        match status {
            LimitStatus::Reached => Ok("Денег нет, держись.".to_string()),
            LimitStatus::NotReached => {
                let converted = round_to_cents(remaining.abs() as f64 / rate);
                Ok(format!(
                    "На сегодня осталось {} {}.",
                    converted,
                    display_name(&code)
                ))
            }
            LimitStatus::Exceeded => {
                let converted = round_to_cents(remaining.abs() as f64 / rate);
                Ok(format!(
                    "Денег нет, держись: твой долг - {} {}.",
                    converted,
                    display_name(&code)
                ))
            }
        }
    }
}

fn invalid_currency(requested: &str, table: &RateTable) -> TrackerError {
    let mut available: Vec<String> = table
        .codes()
        .into_iter()
        .map(|code| code.to_lowercase())
        .collect();
    available.push(HOME_CURRENCY.to_string());
    available.sort();
    TrackerError::InvalidCurrency {
        requested: requested.to_string(),
        available,
    }
}

fn display_name(code_lower: &str) -> String {
    CURRENCY_NAMES
        .iter()
        .find(|(code, _)| *code == code_lower)
        .map(|(_, name)| (*name).to_string())
        .unwrap_or_else(|| code_lower.to_uppercase())
}

/// Two decimal places, half away from zero (0.125 becomes 0.13). This is
/// plain f64 rounding, not banker's rounding, and the two differ at exact
/// half-cent boundaries.
fn round_to_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}
