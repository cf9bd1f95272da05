//! Poloniex REST client and the two fetchers the scanner needs.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::config::Config;
use crate::error::FetchError;
use crate::metrics;

use super::fetcher::Fetcher;
use super::types::{Quote, QuoteSnapshot};

/// Poloniex public REST API client.
#[derive(Debug, Clone)]
pub struct PoloniexClient {
    /// HTTP client for API requests.
    http: reqwest::Client,
    /// Markets (tradeable symbols) endpoint.
    markets_url: String,
    /// 24h ticker (bid/ask) endpoint.
    ticker_url: String,
}

/// One record of the markets endpoint. Unknown fields are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct MarketRecord {
    /// Exchange symbol, e.g. `BTC_USDT`.
    pub symbol: String,
    /// Trading state, e.g. `NORMAL`.
    #[serde(default)]
    pub state: Option<String>,
}

impl PoloniexClient {
    /// Create a client from config.
    pub fn new(config: &Config) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.http_timeout_ms))
            .connect_timeout(Duration::from_secs(5))
            .tcp_nodelay(true)
            .build()?;

        Ok(Self {
            http,
            markets_url: config.markets_url.clone(),
            ticker_url: config.ticker_url.clone(),
        })
    }

    /// Get the markets endpoint URL.
    pub fn markets_url(&self) -> &str {
        &self.markets_url
    }

    /// Get the ticker endpoint URL.
    pub fn ticker_url(&self) -> &str {
        &self.ticker_url
    }

    /// GET `url` and return the body text, failing on any non-success status.
    #[instrument(skip(self))]
    pub async fn get_body(&self, url: &str) -> Result<String, FetchError> {
        let start = Instant::now();
        let response = self.http.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            warn!(status = %status, "Exchange returned non-success status");
            return Err(FetchError::UnexpectedStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        metrics::record_fetch_latency(start, url);
        debug!(bytes = body.len(), "Fetched response body");

        Ok(body)
    }
}

/// Fetches the symbols currently open for trading.
#[derive(Debug, Clone)]
pub struct TradeableSymbols {
    client: PoloniexClient,
    tradeable_state: String,
}

impl TradeableSymbols {
    /// Create the fetcher. Only markets in `tradeable_state` are kept.
    pub fn new(client: PoloniexClient, tradeable_state: impl Into<String>) -> Self {
        Self {
            client,
            tradeable_state: tradeable_state.into(),
        }
    }
}

#[async_trait]
impl Fetcher for TradeableSymbols {
    type Output = Vec<String>;

    #[instrument(skip(self), fields(state = %self.tradeable_state))]
    async fn fetch(&self) -> Result<Vec<String>, FetchError> {
        let body = self.client.get_body(self.client.markets_url()).await?;
        unroll_symbols(&body, &self.tradeable_state)
    }

    fn name(&self) -> &'static str {
        "tradeable_symbols"
    }
}

/// Fetches a bid/ask snapshot for every symbol.
#[derive(Debug, Clone)]
pub struct TickerPrices {
    client: PoloniexClient,
}

impl TickerPrices {
    /// Create the fetcher.
    pub fn new(client: PoloniexClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Fetcher for TickerPrices {
    type Output = QuoteSnapshot;

    #[instrument(skip(self))]
    async fn fetch(&self) -> Result<QuoteSnapshot, FetchError> {
        let body = self.client.get_body(self.client.ticker_url()).await?;
        unroll_quotes(&body)
    }

    fn name(&self) -> &'static str {
        "ticker_prices"
    }
}

/// Decode a markets payload into the symbols whose state is `tradeable_state`.
///
/// Payload order is preserved.
pub fn unroll_symbols(body: &str, tradeable_state: &str) -> Result<Vec<String>, FetchError> {
    let records: Vec<MarketRecord> = serde_json::from_str(body)
        .map_err(|e| FetchError::Malformed(format!("markets payload: {}", e)))?;

    let total = records.len();
    let symbols: Vec<String> = records
        .into_iter()
        .filter(|r| r.state.as_deref() == Some(tradeable_state))
        .map(|r| r.symbol)
        .collect();

    debug!(total, tradeable = symbols.len(), "Unrolled market symbols");
    Ok(symbols)
}

/// Decode a ticker payload into a quote snapshot.
///
/// Records without a usable `symbol`/`bid`/`ask` are skipped; their symbol
/// then has no quote.
pub fn unroll_quotes(body: &str) -> Result<QuoteSnapshot, FetchError> {
    let records: Vec<Value> = serde_json::from_str(body)
        .map_err(|e| FetchError::Malformed(format!("ticker payload: {}", e)))?;

    let mut quotes = Vec::with_capacity(records.len());
    let mut skipped = 0usize;

    for record in records {
        match serde_json::from_value::<Quote>(record) {
            Ok(quote) => quotes.push(quote),
            Err(e) => {
                skipped += 1;
                debug!(error = %e, "Skipping unusable ticker record");
            }
        }
    }

    if skipped > 0 {
        warn!(skipped, kept = quotes.len(), "Some ticker records had no usable bid/ask");
    }

    Ok(QuoteSnapshot::new(quotes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn unroll_symbols_filters_by_state() {
        let body = r#"[
            {"symbol":"BTC_USDT","state":"NORMAL","baseCurrencyName":"BTC"},
            {"symbol":"XMR_BTC","state":"OFFLINE"},
            {"symbol":"ETH_USDT","state":"NORMAL"},
            {"symbol":"DOGE_USDT"}
        ]"#;

        let symbols = unroll_symbols(body, "NORMAL").unwrap();
        assert_eq!(symbols, vec!["BTC_USDT", "ETH_USDT"]);
    }

    #[test]
    fn unroll_symbols_rejects_non_array() {
        let err = unroll_symbols(r#"{"code":500}"#, "NORMAL").unwrap_err();
        assert!(matches!(err, FetchError::Malformed(_)));
    }

    #[test]
    fn unroll_quotes_skips_records_without_prices() {
        let body = r#"[
            {"symbol":"BTC_USDT","bid":"100","ask":"101","close":"100.4"},
            {"symbol":"ETH_USDT","bid":"7.5"},
            {"symbol":"ETH_BTC","bid":0.05,"ask":0.051}
        ]"#;

        let snapshot = unroll_quotes(body).unwrap();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.quotes[0], Quote::new("BTC_USDT", dec!(100), dec!(101)));
        assert_eq!(snapshot.quotes[1].symbol, "ETH_BTC");
        assert_eq!(snapshot.quotes[1].ask, dec!(0.051));
    }

    #[test]
    fn unroll_quotes_rejects_garbage() {
        assert!(matches!(
            unroll_quotes("<html>busy</html>"),
            Err(FetchError::Malformed(_))
        ));
    }

    #[test]
    fn client_creation_works() {
        let config = Config::default();
        let client = PoloniexClient::new(&config).unwrap();
        assert_eq!(client.markets_url(), "https://api.poloniex.com/markets");
        assert_eq!(
            client.ticker_url(),
            "https://api.poloniex.com/markets/ticker24h"
        );
    }
}
