//! Text rendering of a regression summary.

use chrono::NaiveDate;
use porto_model::{CoefficientEstimate, RegressionSummary};

/// Stars for the conventional significance levels: `***` below 1%, `**`
/// below 5%, `*` below 10%. Missing p-values get none.
pub fn significance_stars(p_value: f64) -> &'static str {
    if p_value < 0.01 {
        "***"
    } else if p_value < 0.05 {
        "**"
    } else if p_value < 0.10 {
        "*"
    } else {
        ""
    }
}

/// A regression summary with a title and an optional sample period.
#[derive(Debug, Clone)]
pub struct RegressionReport<'a> {
    title: String,
    period: Option<(NaiveDate, NaiveDate)>,
    summary: &'a RegressionSummary,
}

impl<'a> RegressionReport<'a> {
    /// Create a report for `summary`.
    pub fn new(title: impl Into<String>, summary: &'a RegressionSummary) -> Self {
        Self {
            title: title.into(),
            period: None,
            summary,
        }
    }

    /// Set the sample period shown in the header.
    pub const fn with_period(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.period = Some((start, end));
        self
    }

    /// The rendered summary.
    pub const fn summary(&self) -> &RegressionSummary {
        self.summary
    }

    fn dropped(&self) -> String {
        if self.summary.dropped_columns.is_empty() {
            "none".to_string()
        } else {
            self.summary
                .dropped_columns
                .iter()
                .map(|c| c.name())
                .collect::<Vec<_>>()
                .join(", ")
        }
    }

    fn ascii_row(estimate: &CoefficientEstimate) -> String {
        format!(
            "{:<28} {:>12.6} {:>12.6} {:>9.3} {:>8.4} {}\n",
            estimate.factor.name(),
            estimate.coefficient,
            estimate.std_error,
            estimate.t_statistic,
            estimate.p_value,
            significance_stars(estimate.p_value)
        )
    }

    /// Render as a fixed-width text table.
    pub fn to_ascii_table(&self) -> String {
        let s = self.summary;
        let mut output = String::new();

        output.push_str(&format!("\nFactor Regression: {}\n", self.title));
        if let Some((start, end)) = self.period {
            output.push_str(&format!("Period: {start} to {end}\n"));
        }
        output.push_str(&"=".repeat(80));
        output.push('\n');
        output.push_str(&format!("  Dependent:          {}\n", s.dependent));
        output.push_str(&format!("  Observations:       {}\n", s.observations));
        output.push_str(&format!("  Rank:               {}\n", s.rank));
        output.push_str(&format!("  Residual df:        {}\n", s.df_resid));
        output.push_str(&format!("  R² (uncentered):    {:.4}\n", s.r_squared));
        output.push_str(&format!("  Dropped columns:    {}\n", self.dropped()));
        output.push_str(&"-".repeat(80));
        output.push('\n');
        output.push_str(&format!(
            "{:<28} {:>12} {:>12} {:>9} {:>8}\n",
            "Factor", "Coef", "Std Err", "t", "P>|t|"
        ));
        output.push_str(&"-".repeat(80));
        output.push('\n');
        for estimate in &s.coefficients {
            output.push_str(&Self::ascii_row(estimate));
        }
        output.push_str(&"-".repeat(80));
        output.push('\n');
        output.push_str("Significance: *** p<0.01, ** p<0.05, * p<0.10\n");
        output
    }

    /// Render as Markdown.
    pub fn to_markdown(&self) -> String {
        let s = self.summary;
        let mut output = String::new();

        output.push_str(&format!("# Factor Regression: {}\n\n", self.title));
        if let Some((start, end)) = self.period {
            output.push_str(&format!("**Period:** {start} to {end}\n\n"));
        }

        output.push_str("## Fit\n\n");
        output.push_str(&format!("- **Dependent:** `{}`\n", s.dependent));
        output.push_str(&format!("- **Observations:** {}\n", s.observations));
        output.push_str(&format!("- **Rank:** {}\n", s.rank));
        output.push_str(&format!("- **Residual df:** {}\n", s.df_resid));
        output.push_str(&format!("- **R² (uncentered):** {:.4}\n", s.r_squared));
        output.push_str(&format!("- **Dropped columns:** {}\n\n", self.dropped()));

        output.push_str("## Coefficients\n\n");
        output.push_str("| Factor | Category | Coefficient | Std. Error | t | p-value | |\n");
        output.push_str("|--------|----------|------------:|-----------:|--:|--------:|-|\n");
        for e in &s.coefficients {
            output.push_str(&format!(
                "| `{}` | {} | {:.6} | {:.6} | {:.3} | {:.4} | {} |\n",
                e.factor.name(),
                e.factor.category(),
                e.coefficient,
                e.std_error,
                e.t_statistic,
                e.p_value,
                significance_stars(e.p_value)
            ));
        }
        output.push_str("\n*** p<0.01, ** p<0.05, * p<0.10\n");
        output
    }
}
