//! Mock fetcher for unit testing.
//!
//! This module provides a fetcher that returns canned values without making
//! real network requests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::FetchError;

use super::fetcher::Fetcher;

/// Configuration for mock fetcher behavior.
#[derive(Debug, Clone, Default)]
pub struct MockConfig {
    /// Whether to fail with an unexpected-status error.
    pub fail_status: Option<u16>,
    /// Whether to fail with a malformed-body error.
    pub fail_malformed: bool,
    /// Simulated latency in milliseconds.
    pub latency_ms: u64,
}

/// Fetcher returning a clone of a canned value.
#[derive(Debug, Clone)]
pub struct MockFetcher<T> {
    /// Mock configuration.
    config: MockConfig,
    /// Value returned on success.
    value: Arc<Mutex<T>>,
    /// Number of completed `fetch` calls.
    calls: Arc<AtomicUsize>,
}

impl<T: Clone + Send + 'static> MockFetcher<T> {
    /// Create a mock that always succeeds with `value`.
    pub fn new(value: T) -> Self {
        Self::with_config(value, MockConfig::default())
    }

    /// Create a mock with custom configuration.
    pub fn with_config(value: T, config: MockConfig) -> Self {
        Self {
            config,
            value: Arc::new(Mutex::new(value)),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Replace the canned value.
    pub fn set_value(&self, value: T) {
        if let Ok(mut guard) = self.value.lock() {
            *guard = value;
        }
    }

    /// Number of times `fetch` has been called.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<T: Clone + Send + 'static> Fetcher for MockFetcher<T> {
    type Output = T;

    async fn fetch(&self) -> Result<T, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.config.latency_ms > 0 {
            tokio::time::sleep(std::time::Duration::from_millis(self.config.latency_ms)).await;
        }

        if let Some(status) = self.config.fail_status {
            return Err(FetchError::UnexpectedStatus {
                url: "mock://".to_string(),
                status,
            });
        }

        if self.config.fail_malformed {
            return Err(FetchError::Malformed("mock malformed body".to_string()));
        }

        self.value
            .lock()
            .map(|v| v.clone())
            .map_err(|_| FetchError::Malformed("mock value lock poisoned".to_string()))
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
