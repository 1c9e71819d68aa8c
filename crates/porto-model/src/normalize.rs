//! Cross-sectional z-scoring within (exchange, year) groups.

use crate::panel::FactorPanel;
use porto_factors::FactorColumn;
use std::collections::BTreeMap;

/// Mean and sample standard deviation of the non-missing values.
///
/// The deviation is `NaN` with fewer than two values.
pub fn mean_std(values: impl IntoIterator<Item = f64>) -> (f64, f64) {
    let present: Vec<f64> = values.into_iter().filter(|v| !v.is_nan()).collect();
    let n = present.len();
    if n == 0 {
        return (f64::NAN, f64::NAN);
    }
    let mean = present.iter().sum::<f64>() / n as f64;
    if n < 2 {
        return (mean, f64::NAN);
    }
    let ss: f64 = present.iter().map(|v| (v - mean).powi(2)).sum();
    (mean, (ss / (n - 1) as f64).sqrt())
}

/// Replace every value by its z-score within the slice.
///
/// A single value or a zero spread yields `NaN`.
pub fn zscore(values: &[f64]) -> Vec<f64> {
    let (mean, std) = mean_std(values.iter().copied());
    values.iter().map(|v| (v - mean) / std).collect()
}

/// Z-scores every panel column within each (exchange, year) cross-section.
///
/// Missing values stay missing and are skipped by the mean and deviation.
/// Keys are never scaled.
#[derive(Debug, Clone, Copy, Default)]
pub struct CrossSectionalNormalizer;

impl CrossSectionalNormalizer {
    /// Row indices of every (exchange, year) group.
    pub fn groups(&self, panel: &FactorPanel) -> BTreeMap<(String, i32), Vec<usize>> {
        let mut groups: BTreeMap<(String, i32), Vec<usize>> = BTreeMap::new();
        for (i, key) in panel.keys().iter().enumerate() {
            groups
                .entry((key.exchange.clone(), key.year))
                .or_default()
                .push(i);
        }
        groups
    }

    /// Normalize the panel in place.
    pub fn normalize(&self, panel: &mut FactorPanel) {
        let groups = self.groups(panel);
        let rows = panel.rows_mut();
        for members in groups.values() {
            for column in FactorColumn::ALL {
                let c = column.index();
                let (mean, std) = mean_std(members.iter().map(|&i| rows[i][c]));
                for &i in members {
                    rows[i][c] = (rows[i][c] - mean) / std;
                }
            }
        }
    }
}
