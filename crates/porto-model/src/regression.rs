//! Missing-value filtering and the no-intercept OLS fit of the forward return.

use crate::error::{ModelError, Result};
use crate::linalg::symmetric_pinv;
use crate::panel::FactorPanel;
use ndarray::{Array1, Array2};
use porto_data::SecurityYear;
use porto_factors::FactorColumn;
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, StudentsT};

/// Drops columns with too many missing values, then incomplete rows.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SignificanceFilter {
    /// Columns whose missing share reaches this fraction are dropped (default: 0.20)
    pub max_missing_fraction: f64,
}

impl Default for SignificanceFilter {
    fn default() -> Self {
        Self {
            max_missing_fraction: 0.20,
        }
    }
}

/// Complete-case regression inputs.
#[derive(Debug, Clone)]
pub struct DesignMatrix {
    /// Keys of the retained rows
    pub keys: Vec<SecurityYear>,
    /// Regressor columns, in panel order
    pub regressors: Vec<FactorColumn>,
    /// Columns dropped for missing values
    pub dropped: Vec<FactorColumn>,
    /// Regressor values (rows x regressors)
    pub x: Array2<f64>,
    /// Forward returns
    pub y: Array1<f64>,
}

impl DesignMatrix {
    /// Number of complete rows.
    pub fn observations(&self) -> usize {
        self.y.len()
    }
}

impl SignificanceFilter {
    /// Create a filter with an explicit threshold in `[0, 1]`.
    pub fn new(max_missing_fraction: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&max_missing_fraction) {
            return Err(ModelError::InvalidParameter(format!(
                "missing fraction threshold must be within [0, 1], got {max_missing_fraction}"
            )));
        }
        Ok(Self {
            max_missing_fraction,
        })
    }

    /// Whether a column with the given missing share is dropped.
    pub fn drops(&self, missing_fraction: f64) -> bool {
        missing_fraction >= self.max_missing_fraction
    }

    /// Build the design matrix from a panel.
    ///
    /// Column dropping happens first, so a sparse column never costs rows.
    /// Rows are then kept only if every retained column is finite.
    pub fn apply(&self, panel: &FactorPanel) -> Result<DesignMatrix> {
        if panel.is_empty() {
            return Err(ModelError::InsufficientData {
                rows: 0,
                regressors: 0,
            });
        }

        let mut retained = Vec::new();
        let mut dropped = Vec::new();
        for column in FactorColumn::ALL {
            let fraction = panel.missing_fraction(column);
            if self.drops(fraction) {
                if column.is_dependent() {
                    return Err(ModelError::DependentDropped {
                        column: column.name(),
                        missing_fraction: fraction,
                    });
                }
                dropped.push(column);
            } else {
                retained.push(column);
            }
        }
        let regressors: Vec<FactorColumn> =
            retained.iter().copied().filter(|c| !c.is_dependent()).collect();

        let complete: Vec<usize> = panel
            .rows()
            .iter()
            .enumerate()
            .filter(|(_, row)| retained.iter().all(|c| row[c.index()].is_finite()))
            .map(|(i, _)| i)
            .collect();

        if complete.is_empty() || regressors.is_empty() {
            return Err(ModelError::InsufficientData {
                rows: complete.len(),
                regressors: regressors.len(),
            });
        }

        let rows = panel.rows();
        let x = Array2::from_shape_fn((complete.len(), regressors.len()), |(i, j)| {
            rows[complete[i]][regressors[j].index()]
        });
        let y = complete
            .iter()
            .map(|&i| rows[i][FactorColumn::DEPENDENT.index()])
            .collect();
        let keys = complete.iter().map(|&i| panel.keys()[i].clone()).collect();

        Ok(DesignMatrix {
            keys,
            regressors,
            dropped,
            x,
            y,
        })
    }
}

/// Estimate of one regressor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoefficientEstimate {
    /// Regressor
    pub factor: FactorColumn,
    /// Coefficient
    pub coefficient: f64,
    /// Standard error
    pub std_error: f64,
    /// t-statistic
    pub t_statistic: f64,
    /// Two-sided p-value
    pub p_value: f64,
}

impl CoefficientEstimate {
    /// Whether the p-value is below `level`.
    pub fn is_significant(&self, level: f64) -> bool {
        self.p_value < level
    }
}

/// Coefficient table and fit diagnostics.
#[derive(Debug, Clone, Serialize)]
pub struct RegressionSummary {
    /// Dependent variable
    pub dependent: FactorColumn,
    /// One estimate per regressor, in panel order
    pub coefficients: Vec<CoefficientEstimate>,
    /// Rows used in the fit
    pub observations: usize,
    /// Numerical rank of the design matrix
    pub rank: usize,
    /// Residual degrees of freedom
    pub df_resid: f64,
    /// Residual variance
    pub residual_variance: f64,
    /// Uncentered R-squared (no intercept)
    pub r_squared: f64,
    /// Columns dropped for missing values
    pub dropped_columns: Vec<FactorColumn>,
}

impl RegressionSummary {
    /// Estimate of `factor`, if it was a regressor.
    pub fn coefficient(&self, factor: FactorColumn) -> Option<&CoefficientEstimate> {
        self.coefficients.iter().find(|c| c.factor == factor)
    }

    /// Estimates with p-value below `level`.
    pub fn significant(&self, level: f64) -> impl Iterator<Item = &CoefficientEstimate> {
        self.coefficients
            .iter()
            .filter(move |c| c.is_significant(level))
    }
}

/// A fitted model: the summary plus per-row fitted values and residuals.
#[derive(Debug, Clone)]
pub struct OlsFit {
    /// Coefficient table and diagnostics
    pub summary: RegressionSummary,
    /// Keys of the rows used
    pub keys: Vec<SecurityYear>,
    /// Fitted forward returns
    pub fitted: Array1<f64>,
    /// Residuals
    pub residuals: Array1<f64>,
}

/// Ordinary least squares without intercept.
///
/// The normal equations are solved with an eigen-decomposition
/// pseudo-inverse; with no residual degrees of freedom every standard error,
/// t-statistic and p-value is `NaN`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OlsRegressor;

impl OlsRegressor {
    /// Fit `y` on `x`.
    pub fn fit(&self, design: &DesignMatrix) -> Result<OlsFit> {
        let (n, k) = design.x.dim();
        if n == 0 || k == 0 {
            return Err(ModelError::InsufficientData {
                rows: n,
                regressors: k,
            });
        }
        if design.y.len() != n {
            return Err(ModelError::DimensionMismatch {
                expected: n,
                actual: design.y.len(),
            });
        }

        let x = &design.x;
        let y = &design.y;
        let xtx = x.t().dot(x);
        let pinv = symmetric_pinv(&xtx)?;
        let beta = pinv.inverse.dot(&x.t().dot(y));

        let fitted = x.dot(&beta);
        let residuals = y - &fitted;
        let rss = residuals.dot(&residuals);
        let tss = y.dot(y);

        let df_resid = n.saturating_sub(pinv.rank) as f64;
        let residual_variance = if df_resid > 0.0 {
            rss / df_resid
        } else {
            f64::NAN
        };
        let t_dist = StudentsT::new(0.0, 1.0, df_resid).ok();

        let coefficients = design
            .regressors
            .iter()
            .enumerate()
            .map(|(j, &factor)| {
                let coefficient = beta[j];
                let std_error = (residual_variance * pinv.inverse[[j, j]]).sqrt();
                let t_statistic = coefficient / std_error;
                let p_value = match &t_dist {
                    Some(dist) if t_statistic.is_finite() => {
                        2.0 * (1.0 - dist.cdf(t_statistic.abs()))
                    }
                    Some(_) if t_statistic.is_infinite() => 0.0,
                    _ => f64::NAN,
                };
                CoefficientEstimate {
                    factor,
                    coefficient,
                    std_error,
                    t_statistic,
                    p_value,
                }
            })
            .collect();

        Ok(OlsFit {
            summary: RegressionSummary {
                dependent: FactorColumn::DEPENDENT,
                coefficients,
                observations: n,
                rank: pinv.rank,
                df_resid,
                residual_variance,
                r_squared: 1.0 - rss / tss,
                dropped_columns: design.dropped.clone(),
            },
            keys: design.keys.clone(),
            fitted,
            residuals,
        })
    }
}
