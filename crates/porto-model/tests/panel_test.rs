//! Integration tests for normalizing, filtering and regressing a factor panel.

use approx::assert_relative_eq;
use porto_data::SecurityYear;
use porto_factors::FactorColumn;
use porto_model::{
    CrossSectionalNormalizer, FactorPanel, ModelError, OlsRegressor, PanelRow, SignificanceFilter,
};

/// Twelve securities in one cross-section where the forward return is a
/// linear function of size and book ratio. Every other column is constant,
/// except the one-month momentum which is missing for a quarter of the rows.
fn synthetic_panel(year: i32) -> FactorPanel {
    FactorPanel::from_rows((0..12).map(|i| {
        let mut row: PanelRow = [1.0; FactorColumn::COUNT];
        let size = 100.0 + 10.0 * i as f64;
        let pbr = ((i * i) % 7) as f64;
        row[FactorColumn::MarketCapitalization.index()] = size;
        row[FactorColumn::Pbr.index()] = pbr;
        if i < 3 {
            row[FactorColumn::Momentum1m.index()] = f64::NAN;
        } else {
            row[FactorColumn::Momentum1m.index()] = i as f64;
        }
        row[FactorColumn::Return1yLater.index()] = 0.01 * size + 0.03 * pbr;
        (SecurityYear::new("170", format!("KR{i:03}"), year), row)
    }))
}

#[test]
fn test_full_regression_workflow() {
    let mut panel = synthetic_panel(2020);
    CrossSectionalNormalizer.normalize(&mut panel);

    // constant columns collapse to missing after scaling
    assert!(panel.value(0, FactorColumn::Assets).unwrap().is_nan());
    assert_relative_eq!(panel.missing_fraction(FactorColumn::Momentum1m), 0.25);

    let design = SignificanceFilter::default().apply(&panel).unwrap();
    assert_eq!(
        design.regressors,
        vec![FactorColumn::MarketCapitalization, FactorColumn::Pbr]
    );
    assert!(design.dropped.contains(&FactorColumn::Momentum1m));
    assert!(design.dropped.contains(&FactorColumn::Assets));
    // dropping a sparse column never costs rows
    assert_eq!(design.observations(), 12);

    let fit = OlsRegressor.fit(&design).unwrap();
    let summary = &fit.summary;
    assert_eq!(summary.rank, 2);
    assert_relative_eq!(summary.df_resid, 10.0);
    assert_relative_eq!(summary.r_squared, 1.0, epsilon = 1e-9);
    assert!(
        summary
            .coefficient(FactorColumn::MarketCapitalization)
            .unwrap()
            .coefficient
            > 0.0
    );
    assert!(summary.coefficient(FactorColumn::Momentum1m).is_none());
}

#[test]
fn test_groups_are_normalized_independently() {
    let mut panel = FactorPanel::from_rows(
        synthetic_panel(2019)
            .iter()
            .chain(synthetic_panel(2020).iter())
            .map(|(k, r)| (k.clone(), *r)),
    );
    assert_eq!(panel.len(), 24);
    CrossSectionalNormalizer.normalize(&mut panel);

    let first_2019 = panel.value(0, FactorColumn::MarketCapitalization).unwrap();
    let first_2020 = panel.value(12, FactorColumn::MarketCapitalization).unwrap();
    assert_eq!(panel.keys()[12].year, 2020);
    assert_relative_eq!(first_2019, first_2020, epsilon = 1e-12);
}

#[test]
fn test_sparse_dependent_aborts() {
    let mut panel = synthetic_panel(2020);
    let rows: Vec<_> = panel
        .iter()
        .enumerate()
        .map(|(i, (k, r))| {
            let mut row = *r;
            if i % 2 == 0 {
                row[FactorColumn::Return1yLater.index()] = f64::NAN;
            }
            (k.clone(), row)
        })
        .collect();
    panel = FactorPanel::from_rows(rows);

    match SignificanceFilter::default().apply(&panel) {
        Err(ModelError::DependentDropped {
            missing_fraction, ..
        }) => assert_relative_eq!(missing_fraction, 0.5),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn test_panel_frame_layout() {
    let frame = synthetic_panel(2020).to_dataframe().unwrap();
    assert_eq!(frame.height(), 12);
    assert_eq!(frame.width(), 3 + FactorColumn::COUNT);
    assert!(frame.column("return_1y_later").is_ok());
}
