//! Rate provider abstraction for the application.

use crate::error::FetchError;
use crate::snapshot::RateSnapshot;
use async_trait::async_trait;

/// Fetches a full rate table for one base currency from an external service.
///
/// Implementations issue exactly one outbound request per call with a bounded
/// timeout and do no caching or retrying; both belong to the cache layer.
#[async_trait]
pub trait RateProvider: Send + Sync {
    async fn fetch(&self, base: &str) -> Result<RateSnapshot, FetchError>;
}
