//! End-to-end tests: raw rows in, regression summary out.

use approx::assert_relative_eq;
use chrono::{Datelike, NaiveDate, Weekday};
use porto::data::{DailyObservation, DateRange, ExchangeMap, Fundamental, InMemoryProvider};
use porto::factors::{FactorCategory, FactorColumn};
use porto::{PipelineConfig, RecordingObserver, Stage, analyze_country};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Weekday price rows from 2016-01-04 through 2020-01-31.
fn prices(id: &str, close: impl Fn(f64) -> f64, shares: f64, dividend: f64) -> Vec<DailyObservation> {
    let mut rows = Vec::new();
    let mut day = date(2016, 1, 4);
    let mut t = 0.0;
    while day <= date(2020, 1, 31) {
        if !matches!(day.weekday(), Weekday::Sat | Weekday::Sun) {
            let price = close(t);
            let mut row = DailyObservation::empty("170", id, day);
            row.close_price = price;
            row.adj_close_price = price;
            row.trading_volume = 1000.0 + 10.0 * (t % 17.0);
            row.adj_trading_volume = row.trading_volume;
            row.shares_outstanding = shares;
            row.market_capitalization = price * shares;
            row.dividend_per_share = dividend;
            rows.push(row);
            t += 1.0;
        }
        day = day.succ_opt().unwrap();
    }
    rows
}

fn statement(id: &str, fiscal_year: i32, scale: f64) -> Fundamental {
    let mut row = Fundamental::empty("170", id, fiscal_year, date(fiscal_year, 12, 31));
    row.assets = 1000.0 * scale;
    row.revenue = 800.0 * scale;
    row.operating_income = 90.0 * scale;
    row.ebitda = 120.0 * scale;
    row.cash_flow = 70.0 * scale;
    row
}

fn provider() -> InMemoryProvider {
    let mut rows = prices("KR001", |t| 100.0 + 10.0 * (t / 10.0).sin() + 0.05 * t, 50.0, 1.0);
    rows.extend(prices("KR002", |t| 50.0 + 3.0 * (t / 7.0).cos() + 0.02 * t, 80.0, 0.5));
    // a security on an exchange of another country never enters the run
    rows.extend(prices("JP001", |t| 10.0 + 0.01 * t, 10.0, 0.0).into_iter().map(|mut r| {
        r.exchange = "999".to_string();
        r
    }));

    let statements = vec![
        statement("KR001", 2016, 1.0),
        statement("KR001", 2017, 1.1),
        statement("KR002", 2016, 2.0),
        statement("KR002", 2017, 2.6),
    ];
    InMemoryProvider::new(rows, statements)
}

fn exchanges() -> ExchangeMap {
    ExchangeMap::from_csv_reader("exchange,country\n170,Korea\n999,Japan\n".as_bytes()).unwrap()
}

fn range() -> DateRange {
    DateRange::new(date(2016, 1, 1), date(2020, 12, 31)).unwrap()
}

#[test]
fn test_two_security_run() {
    let mut recorder = RecordingObserver::new();
    let analysis = analyze_country(
        &provider(),
        &exchanges(),
        "Korea",
        range(),
        &PipelineConfig::default(),
        &mut recorder,
    )
    .unwrap();

    // only 2019 has every factor: momentum needs 36 months back and 12 forward
    assert_eq!(analysis.panel.len(), 2);
    assert!(analysis.panel.keys().iter().all(|k| k.year == 2019 && k.exchange == "170"));

    // two members per cross-section z-score to plus or minus 1/sqrt(2)
    let size = analysis.panel.column(FactorColumn::MarketCapitalization);
    assert_relative_eq!(size[0].abs(), std::f64::consts::FRAC_1_SQRT_2, epsilon = 1e-12);
    assert_relative_eq!(size[0], -size[1], epsilon = 1e-12);

    let summary = analysis.summary();
    assert_eq!(summary.observations, 2);
    assert!(summary.observations <= analysis.panel.len());
    assert!(summary.rank >= 1);
    assert!(!summary.coefficients.is_empty());
    assert!(summary.coefficient(FactorColumn::MarketCapitalization).is_some());
    assert!(summary.coefficient(FactorColumn::Return1yLater).is_none());
    // every panel column except the dependent is either a regressor or dropped
    assert_eq!(
        summary.coefficients.len() + summary.dropped_columns.len(),
        FactorColumn::COUNT - 1
    );

    let report = &analysis.report;
    assert_eq!(report.stages[0].stage, Stage::FetchPrices);
    assert_eq!(report.stages[1].stage, Stage::FetchFundamentals);
    assert_eq!(report.rows(Stage::FetchFundamentals), Some(4));
    assert_eq!(report.rows(Stage::Merge), Some(2));
    assert_eq!(report.rows(Stage::Regression), Some(2));
    assert!(report.rows(Stage::Factor(FactorCategory::Size)).unwrap() >= 10);
    assert_eq!(report.first_empty(), None);
    assert_eq!(recorder.reports(), report.stages.as_slice());
}

#[test]
fn test_forward_return_matches_prices() {
    let analysis = analyze_country(
        &provider(),
        &exchanges(),
        "Korea",
        range(),
        &PipelineConfig::default(),
        &mut porto::NoopObserver,
    )
    .unwrap();

    // normalized dependent values of the two securities are opposite
    let forward = analysis.panel.column(FactorColumn::Return1yLater);
    assert_relative_eq!(forward[0], -forward[1], epsilon = 1e-12);
    assert_eq!(analysis.fit.residuals.len(), 2);
}

#[test]
fn test_late_snapshot_month_leaves_no_momentum() {
    // July 2019 would need July 2020 for the forward return
    let config: PipelineConfig = serde_json::from_str(r#"{"snapshot_month": 7}"#).unwrap();
    let mut recorder = RecordingObserver::new();
    let result = analyze_country(
        &provider(),
        &exchanges(),
        "Korea",
        range(),
        &config,
        &mut recorder,
    );

    assert!(result.is_err());
    let momentum = recorder
        .reports()
        .iter()
        .find(|r| r.stage == Stage::Factor(FactorCategory::Momentum))
        .unwrap();
    assert_eq!(momentum.rows, 0);
}
