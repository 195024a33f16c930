//! Composition root tying metadata, cache and engine together.

use crate::cache::RateCache;
use crate::engine;
use crate::error::ConvertError;
use crate::metadata::CurrencyMetadata;
use chrono::{DateTime, Utc};

/// One row of the combined rates table: static metadata joined with the live
/// rate, where one exists, from the current snapshot.
#[derive(Debug, Clone)]
pub struct RateRow {
    pub code: String,
    pub name: String,
    pub symbol: String,
    pub rate: Option<f64>,
}

/// The conversion surface the consuming layer talks to.
///
/// Constructed once with its dependencies injected; read paths opportunistically
/// kick off a background refresh and serve whatever snapshot is installed.
pub struct ConversionService {
    metadata: CurrencyMetadata,
    cache: RateCache,
}

impl ConversionService {
    pub fn new(metadata: CurrencyMetadata, cache: RateCache) -> Self {
        ConversionService { metadata, cache }
    }

    pub fn cache(&self) -> &RateCache {
        &self.cache
    }

    /// Known currencies as `(code, display name)`, ascending by code.
    pub fn names(&self) -> Vec<(String, String)> {
        self.metadata.names()
    }

    pub fn name(&self, code: &str) -> Result<&str, ConvertError> {
        self.metadata.name(code)
    }

    pub fn symbol(&self, code: &str) -> Result<&str, ConvertError> {
        self.metadata.symbol(code)
    }

    /// Time of the last successful rate fetch, `None` before the first one.
    /// Like the other cache-backed reads, this opportunistically kicks off a
    /// background refresh so lookup-only consumers still warm the rates.
    pub async fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.cache.trigger_refresh();
        self.cache.last_updated().await
    }

    /// Converts `amount` between two currency codes using the current
    /// snapshot. Fails with `RatesUnavailable` only before the first
    /// successful fetch; a stale snapshot still serves.
    pub async fn convert(&self, from: &str, to: &str, amount: f64) -> Result<f64, ConvertError> {
        self.cache.trigger_refresh();
        let snapshot = self
            .cache
            .current_snapshot()
            .await
            .ok_or(ConvertError::RatesUnavailable)?;
        engine::convert(&snapshot, from, to, amount)
    }

    /// Convenience projection over metadata plus the current snapshot: one
    /// row per known currency, with `rate` set when the snapshot carries that
    /// code. Fails with `RatesUnavailable` before the first successful fetch.
    pub async fn rates_table(&self) -> Result<Vec<RateRow>, ConvertError> {
        self.cache.trigger_refresh();
        let snapshot = self
            .cache
            .current_snapshot()
            .await
            .ok_or(ConvertError::RatesUnavailable)?;

        Ok(self
            .names()
            .into_iter()
            .map(|(code, name)| {
                let symbol = self
                    .metadata
                    .symbol(&code)
                    .unwrap_or_default()
                    .to_string();
                let rate = snapshot.rate(&code);
                RateRow {
                    code,
                    name,
                    symbol,
                    rate,
                }
            })
            .collect())
    }
}
