//! Integration tests for the triangle scanner.
//!
//! The offline tests drive the full pipeline through `MockFetcher`.
//! Tests marked `#[ignore]` hit the real Poloniex API.
//! Run them with: cargo test --test integration -- --ignored

use std::collections::HashSet;

use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;

use triarb::config::Config;
use triarb::error::FetchError;
use triarb::market::{
    parse_pairs, unroll_quotes, unroll_symbols, Fetcher, MockConfig, MockFetcher, Pair,
    PoloniexClient, Quote, QuoteSnapshot, TickerPrices, TradeableSymbols,
};
use triarb::store;
use triarb::triangle::{
    join_all, structure_triangles, DedupStrategy, FormattedTriangle, StructureOptions, VertexSet,
};

const MARKETS_BODY: &str = r#"[
    {"symbol":"BTC_USDT","state":"NORMAL"},
    {"symbol":"ETH_USDT","state":"NORMAL"},
    {"symbol":"ETH_BTC","state":"NORMAL"},
    {"symbol":"TRX_USDT","state":"NORMAL"},
    {"symbol":"TRX_BTC","state":"NORMAL"},
    {"symbol":"TRX_ETH","state":"POST_ONLY"},
    {"symbol":"XMR_EUR","state":"NORMAL"}
]"#;

const TICKER_BODY: &str = r#"[
    {"symbol":"BTC_USDT","bid":"100","ask":"101"},
    {"symbol":"ETH_USDT","bid":"5","ask":"5.1"},
    {"symbol":"ETH_BTC","bid":"0.05","ask":"0.051"},
    {"symbol":"TRX_USDT","bid":"0.1","ask":"0.11"}
]"#;

fn symbols() -> Vec<String> {
    unroll_symbols(MARKETS_BODY, "NORMAL").unwrap()
}

fn vertex_sets(triangles: &[FormattedTriangle]) -> HashSet<VertexSet> {
    triangles.iter().filter_map(FormattedTriangle::vertex_set).collect()
}

#[tokio::test]
async fn pipeline_structures_persists_and_prices() {
    let symbol_source = MockFetcher::new(symbols());
    let quote_source = MockFetcher::new(unroll_quotes(TICKER_BODY).unwrap());

    let pairs = parse_pairs(&symbol_source.fetch().await.unwrap()).unwrap();
    let triangles = structure_triangles(&pairs, StructureOptions::default());

    // TRX_ETH is not tradeable, so only two triangles close.
    let expected: HashSet<VertexSet> = [
        VertexSet::from_coins(["BTC", "ETH", "USDT"]).unwrap(),
        VertexSet::from_coins(["BTC", "TRX", "USDT"]).unwrap(),
    ]
    .into_iter()
    .collect();
    assert_eq!(vertex_sets(&triangles), expected);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out/triangles.json");
    store::save(&path, &triangles).unwrap();
    let reloaded = store::load(&path).unwrap();
    assert_eq!(reloaded, triangles);

    let snapshot = quote_source.fetch().await.unwrap();
    let priced = join_all(&reloaded, &snapshot);
    assert_eq!(priced.len(), 2);

    let full = priced
        .iter()
        .find(|p| p.triangle.vertex_set().unwrap().contains("ETH"))
        .unwrap();
    assert_eq!(full.prices.len(), 6);

    // TRX_BTC has no quote: its leg contributes no keys at all.
    let partial = priced
        .iter()
        .find(|p| p.triangle.vertex_set().unwrap().contains("TRX"))
        .unwrap();
    assert_eq!(partial.prices.len(), 4);
    for (label, symbol) in partial.triangle.legs() {
        let has_bid = partial.prices.contains_key(&format!("{label}_bid"));
        let has_ask = partial.prices.contains_key(&format!("{label}_ask"));
        assert_eq!(has_bid, has_ask);
        assert_eq!(has_bid, symbol != "TRX_BTC");
    }
}

#[test]
fn every_triangle_is_closed_and_made_of_input_pairs() {
    let pairs = parse_pairs(&symbols()).unwrap();

    for strategy in [DedupStrategy::Canonical, DedupStrategy::FirstSeen] {
        let triangles = structure_triangles(
            &pairs,
            StructureOptions {
                strategy,
                parallel: false,
            },
        );

        for triangle in &triangles {
            let legs = triangle.pairs();
            assert!(legs.iter().all(|leg| pairs.contains(leg)));

            let vertices = triangle.vertex_set().unwrap();
            for coin in vertices.coins() {
                let degree = legs.iter().filter(|leg| leg.contains(coin)).count();
                assert_eq!(degree, 2, "{coin} in {}", triangle.combined);
            }
        }

        assert_eq!(vertex_sets(&triangles).len(), triangles.len());
    }
}

#[test]
fn canonical_output_is_stable_across_runs_and_orderings() {
    let pairs = parse_pairs(&symbols()).unwrap();
    let mut shuffled = pairs.clone();
    shuffled.rotate_left(3);

    let options = StructureOptions::default();
    let first = structure_triangles(&pairs, options);
    let second = structure_triangles(&pairs, options);
    let rotated = structure_triangles(&shuffled, options);

    assert_eq!(first, second);
    assert_eq!(first, rotated);
}

#[test]
fn three_pairs_close_one_triangle() {
    let pairs = vec![
        Pair::new("BTC", "USDT"),
        Pair::new("ETH", "USDT"),
        Pair::new("BTC", "ETH"),
    ];
    let triangles = structure_triangles(&pairs, StructureOptions::default());
    assert_eq!(triangles.len(), 1);
    assert_eq!(
        triangles[0].vertex_set(),
        VertexSet::from_coins(["BTC", "ETH", "USDT"])
    );
}

#[test]
fn price_join_against_single_quote() {
    let pairs = vec![
        Pair::new("BTC", "USDT"),
        Pair::new("ETH", "USDT"),
        Pair::new("BTC", "ETH"),
    ];
    let triangles = structure_triangles(
        &pairs,
        StructureOptions {
            strategy: DedupStrategy::FirstSeen,
            parallel: false,
        },
    );
    assert_eq!(triangles[0].pair_a, "BTC_USDT");

    let snapshot = QuoteSnapshot::new(vec![Quote::new("BTC_USDT", dec!(100), dec!(101))]);
    let priced = join_all(&triangles, &snapshot);

    assert_eq!(priced[0].prices.len(), 2);
    assert_eq!(priced[0].prices["pair_a_bid"], dec!(100));
    assert_eq!(priced[0].prices["pair_a_ask"], dec!(101));
}

#[tokio::test]
async fn failed_fetch_is_an_error_not_an_empty_result() {
    let source = MockFetcher::with_config(
        Vec::<String>::new(),
        MockConfig {
            fail_status: Some(503),
            ..Default::default()
        },
    );

    match source.fetch().await {
        Err(FetchError::UnexpectedStatus { status, .. }) => assert_eq!(status, 503),
        other => panic!("expected status error, got {:?}", other),
    }
}

/// Fetch live tradeable symbols from Poloniex.
#[tokio::test]
#[ignore = "requires network access to api.poloniex.com"]
async fn live_tradeable_symbols() {
    let config = Config::default();
    let client = PoloniexClient::new(&config).unwrap();
    let symbols = TradeableSymbols::new(client, config.tradeable_state.clone())
        .fetch()
        .await
        .unwrap();

    assert!(!symbols.is_empty());
    let pairs = parse_pairs(&symbols).unwrap();
    let triangles = structure_triangles(&pairs, StructureOptions::default());
    println!("{} pairs, {} triangles", pairs.len(), triangles.len());
}

/// Fetch a live quote snapshot from Poloniex.
#[tokio::test]
#[ignore = "requires network access to api.poloniex.com"]
async fn live_quote_snapshot() {
    let config = Config::default();
    let client = PoloniexClient::new(&config).unwrap();
    let snapshot = TickerPrices::new(client).fetch().await.unwrap();

    assert!(!snapshot.is_empty());
    println!("{} quotes at {}", snapshot.len(), snapshot.captured_at);
}
