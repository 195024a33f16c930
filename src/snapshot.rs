//! Immutable exchange rate snapshot for one base currency.

use crate::error::FetchError;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// A timestamped table of exchange rates against a single base currency.
///
/// Snapshots are immutable once constructed. A refresh builds a new snapshot
/// and swaps the cache's reference to it, so concurrent readers always see a
/// fully-old or fully-new table, never a mix.
#[derive(Debug, Clone)]
pub struct RateSnapshot {
    base: String,
    rates: HashMap<String, f64>,
    fetched_at: DateTime<Utc>,
}

impl RateSnapshot {
    /// Validates and builds a snapshot from provider data.
    ///
    /// Every rate must be strictly positive and finite, and the base
    /// currency's own rate must be exactly 1.0 (it is inserted if the
    /// provider omitted it).
    pub fn new(
        base: &str,
        mut rates: HashMap<String, f64>,
        fetched_at: DateTime<Utc>,
    ) -> Result<Self, FetchError> {
        if rates.is_empty() {
            return Err(FetchError::Parse("empty rates table".to_string()));
        }
        for (code, rate) in &rates {
            if !rate.is_finite() || *rate <= 0.0 {
                return Err(FetchError::Parse(format!(
                    "non-positive or non-finite rate {rate} for {code}"
                )));
            }
        }
        match rates.get(base).copied() {
            Some(rate) if rate != 1.0 => {
                return Err(FetchError::Parse(format!(
                    "base currency {base} has rate {rate}, expected 1.0"
                )));
            }
            Some(_) => {}
            None => {
                rates.insert(base.to_string(), 1.0);
            }
        }
        Ok(RateSnapshot {
            base: base.to_string(),
            rates,
            fetched_at,
        })
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Rate for `code` against the base currency, or `None` if the code is
    /// absent from this snapshot.
    pub fn rate(&self, code: &str) -> Option<f64> {
        self.rates.get(code).copied()
    }

    pub fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }
}
