//! Capability interface for exchange data sources.

use async_trait::async_trait;

use crate::error::FetchError;

/// A single-operation data source.
///
/// Implementations split the request (`fetch`) from a pure transform of the
/// raw response into a domain value, so the core can be driven with canned
/// inputs and no network.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Domain value produced by a successful fetch.
    type Output: Send;

    /// Perform the request and decode it.
    async fn fetch(&self) -> Result<Self::Output, FetchError>;

    /// Short label used in logs and metrics.
    fn name(&self) -> &'static str;
}
