pub mod calories;
pub mod data_structures;
pub mod errors;
pub mod logging;
pub mod rates;
pub mod spending;
pub mod tracker;

pub use calories::CalorieTracker;
pub use data_structures::{LimitStatus, Quote, RateTable, Record, DATE_FORMAT};
pub use errors::TrackerError;
pub use logging::{init_logging, LogConfig};
pub use rates::{CbrProvider, ExchangeRateCache, RateProvider, RATES_URL};
pub use spending::{SpendingTracker, HOME_CURRENCY};
pub use tracker::LimitTracker;

pub use anyhow::Result;
pub use chrono::{DateTime, Local};

pub mod prelude {
    pub use crate::calories::CalorieTracker;
    pub use crate::data_structures::{LimitStatus, Record};
    pub use crate::rates::ExchangeRateCache;
    pub use crate::spending::SpendingTracker;
    pub use crate::tracker::LimitTracker;
    pub use anyhow::Result;
}
