//! Fixture data through scan, construction, pricing, gating and journaling

use assert_matches::assert_matches;
use chrono::{NaiveDate, TimeZone, Utc};
use common::{OptionSide, Ticker};
use config::{OcoConfig, ScannerFilters};
use market_data::{fetch_bulk, nearest_expiry_on_or_after, OptionChainProvider, StaticMarketData};
use trade_engine::{
    expiry_for_dte, recommend_trade, validate_trade_at, EngineError, FeeModel, InMemoryTradeStore,
    JournalStats, ScannerEngine, TradeLogEntry, TradeRecommendationRequest, TradeStore,
};

const FIXTURE: &str = r#"{
    "market_data": [
        { "ticker": "AAPL", "price": 150.0, "iv_rank": 40.0, "ema10": 155.0, "rsi14": 50.0 },
        { "ticker": "MSFT", "price": 410.0, "iv_rank": 38.0, "ema10": 400.0, "rsi14": 70.0 },
        { "ticker": "NFLX", "price": 600.0, "iv_rank": 50.0, "ema10": 610.0, "rsi14": 48.0,
          "earnings_date": "2024-03-14" },
        { "ticker": "XYZ", "price": 0.0 }
    ],
    "chains": [
        {
            "ticker": "AAPL",
            "expiry": "2024-03-12",
            "calls": [
                { "strike": 157.5, "bid": 0.95, "ask": 1.05, "delta": 0.24 },
                { "strike": 160.0, "bid": 0.55, "ask": 0.61, "delta": 0.16 },
                { "strike": 162.5, "bid": 0.40, "ask": 0.46, "delta": 0.11 },
                { "strike": 165.0, "bid": 0.20, "ask": 0.26, "delta": 0.06 }
            ],
            "puts": [
                { "strike": 140.0, "bid": 0.50, "ask": 0.60, "delta": -0.15 },
                { "strike": 135.0, "bid": 0.20, "ask": 0.30, "delta": -0.07 }
            ]
        }
    ]
}"#;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()
}

fn tickers() -> Vec<Ticker> {
    ["AAPL", "MSFT", "NFLX", "XYZ", "GHOST"]
        .into_iter()
        .map(Ticker::new)
        .collect()
}

#[tokio::test]
async fn test_scan_ranks_fixture_universe() {
    let provider = StaticMarketData::from_json(FIXTURE).unwrap();
    let fetch = fetch_bulk(&provider, &tickers()).await;
    assert_eq!(fetch.failure_count(), 1);

    let engine = ScannerEngine::new(ScannerFilters::default()).unwrap();
    let results = engine.scan_tickers_at(&tickers(), &fetch.into_map(), today());

    let ranked: Vec<(&str, i32, bool)> = results
        .iter()
        .map(|r| (r.ticker.as_str(), r.score, r.passes))
        .collect();

    assert_eq!(
        ranked,
        vec![
            ("AAPL", 45, true),
            ("MSFT", 40, true),
            ("XYZ", 0, false),
            ("GHOST", 0, false),
            ("NFLX", -5, false),
        ]
    );
    assert_eq!(results[3].reasons, vec!["invalid or missing price data".to_string()]);
}

#[tokio::test]
async fn test_recommend_validate_and_journal() {
    let provider = StaticMarketData::from_json(FIXTURE).unwrap();
    let filters = ScannerFilters::default();
    let ticker = Ticker::new("AAPL");

    let expirations = provider.expirations(&ticker).await.unwrap();
    let expiry =
        nearest_expiry_on_or_after(&expirations, expiry_for_dte(today(), filters.min_dte)).unwrap();
    let chain = provider.option_chain(&ticker, expiry).await.unwrap();

    let request = TradeRecommendationRequest {
        ticker: ticker.clone(),
        side: OptionSide::Call,
        dte: 8,
        target_delta: filters.target_delta,
        width: filters.spread_width.as_f64(),
    };
    let rec = recommend_trade(&chain, &request, &FeeModel::default(), &OcoConfig::default(), today())
        .unwrap();

    assert_eq!(rec.spread.short_leg.strike, 160.0);
    assert_eq!(rec.spread.long_leg.strike, 162.5);
    assert!((rec.spread.net_credit - 0.15).abs() < 1e-9);
    assert!((rec.spread.max_risk + rec.spread.net_credit - 2.5).abs() < 1e-9);
    assert_eq!(rec.dte, 8);

    let snapshot = fetch_bulk(&provider, &[ticker.clone()]).await.snapshots.remove(0);
    let verdict = validate_trade_at(&ticker, &snapshot, &rec.trade_data(), today());
    assert_eq!(verdict.score, 95);
    assert!(verdict.passes);

    let store = InMemoryTradeStore::new();
    let opened_at = Utc.with_ymd_and_hms(2024, 3, 4, 15, 0, 0).unwrap();
    let entry = TradeLogEntry::from_recommendation(&rec, opened_at).with_provider("static");
    let id = entry.id;
    store.append(entry).await.unwrap();

    store.close(id, 0.05, None, opened_at).await.unwrap();
    let stats = JournalStats::from_entries(&store.list().await.unwrap());
    assert_eq!(stats.closed_trades, 1);
}

#[tokio::test]
async fn test_put_side_cannot_be_built_at_width() {
    let provider = StaticMarketData::from_json(FIXTURE).unwrap();
    let ticker = Ticker::new("AAPL");
    let expiry = provider.expirations(&ticker).await.unwrap()[0];
    let chain = provider.option_chain(&ticker, expiry).await.unwrap();

    let request = TradeRecommendationRequest {
        ticker,
        side: OptionSide::Put,
        dte: 8,
        target_delta: 0.16,
        width: 2.5,
    };

    assert_matches!(
        recommend_trade(&chain, &request, &FeeModel::default(), &OcoConfig::default(), today()),
        Err(EngineError::NoMatchingLongLeg { short_strike, .. }) if short_strike == 140.0
    );
}
