//! Analysis aggregation for a [`Selection`].
//!
//! Each selection shape has its own pure aggregator:
//!
//! | Selection | Aggregator | Summary |
//! |-----------|------------|---------|
//! | rows | [`rows::analyze_rows`] | totals, averages, per-ad cost comparison |
//! | columns | [`columns::analyze_columns`] | per-metric average / high / low |
//! | cells | [`cells::analyze_cells`] | cell, metric and ad counts |
//!
//! Every aggregator returns an [`AnalysisResult`]: a summary, chart-ready records
//! holding only primitive fields, and four templated [`Insight`]s. Empty input
//! yields zeroed summaries, never an error.
//!
//! ## Usage
//!
//! ```rust
//! use adlens_core::analytics::analyze;
//! use adlens_core::config::AnalysisConfig;
//! use adlens_core::selection::Selection;
//!
//! let result = analyze(&Selection::rows(vec![]), &AnalysisConfig::default());
//! assert_eq!(result.insights.len(), 4);
//! ```

pub mod cells;
pub mod columns;
pub mod rows;

pub use cells::{analyze_cells, CellChartPoint, CellsSummary};
pub use columns::{analyze_columns, ColumnSummary, ColumnsSummary, MetricChartPoint};
pub use rows::{analyze_rows, RowChartPoint, RowComparison, RowsSummary};

use crate::config::AnalysisConfig;
use crate::selection::Selection;
use serde::Serialize;

/// Computed output for a selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub summary: Summary,
    pub chart_data: ChartData,
    pub insights: Vec<Insight>,
}

/// Aggregate record, shaped by the selection kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Summary {
    Rows(RowsSummary),
    Columns(ColumnsSummary),
    Cells(CellsSummary),
}

/// Records handed directly to the charting layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ChartData {
    Rows(Vec<RowChartPoint>),
    Columns(Vec<MetricChartPoint>),
    Cells(Vec<CellChartPoint>),
}

impl ChartData {
    pub fn len(&self) -> usize {
        match self {
            ChartData::Rows(points) => points.len(),
            ChartData::Columns(points) => points.len(),
            ChartData::Cells(points) => points.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Category of an insight statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Performance,
    Opportunity,
    Efficiency,
    Analysis,
    Correlation,
    Optimization,
    Benchmark,
    Precision,
    Variance,
    Outliers,
    Patterns,
}

/// Accent color tag the panel renders an insight card with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightColor {
    Blue,
    Green,
    Yellow,
    Purple,
    Red,
}

/// A short, templated qualitative statement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insight {
    #[serde(rename = "type")]
    pub kind: InsightKind,
    pub title: String,
    pub description: String,
    pub color: InsightColor,
}

impl Insight {
    pub(crate) fn new(
        kind: InsightKind,
        title: &str,
        description: impl Into<String>,
        color: InsightColor,
    ) -> Self {
        Self {
            kind,
            title: title.to_string(),
            description: description.into(),
            color,
        }
    }
}

/// Run the aggregator matching the selection's shape.
pub fn analyze(selection: &Selection, config: &AnalysisConfig) -> AnalysisResult {
    tracing::debug!(
        kind = %selection.kind(),
        size = selection.len(),
        "Analyzing selection"
    );
    match selection {
        Selection::Rows { ads } => analyze_rows(ads, config),
        Selection::Columns { metrics, ads } => analyze_columns(metrics, ads),
        Selection::Cells { cells } => analyze_cells(cells),
    }
}

/// Sum in input order, starting from +0.0.
pub(crate) fn sum(values: impl IntoIterator<Item = f64>) -> f64 {
    values.into_iter().fold(0.0, |acc, v| acc + v)
}

/// Arithmetic mean, or `None` for no values.
pub(crate) fn mean(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let (total, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(total, count), v| (total + v, count + 1));
    if count == 0 {
        None
    } else {
        Some(total / count as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::SelectedCell;

    #[test]
    fn test_dispatch_matches_selection_kind() {
        let config = AnalysisConfig::default();

        let rows = analyze(&Selection::rows(vec![]), &config);
        assert!(matches!(rows.summary, Summary::Rows(_)));

        let columns = analyze(&Selection::columns(vec![], vec![]), &config);
        assert!(matches!(columns.summary, Summary::Columns(_)));

        let cells = analyze(
            &Selection::cells(vec![SelectedCell::new("1", "ctr", 1.0)]),
            &config,
        );
        assert!(matches!(cells.summary, Summary::Cells(_)));
        assert_eq!(cells.chart_data.len(), 1);
    }

    #[test]
    fn test_mean_and_sum() {
        assert_eq!(mean(Vec::<f64>::new()), None);
        assert_eq!(mean(vec![1.0, 2.0, 6.0]), Some(3.0));
        assert_eq!(sum(Vec::<f64>::new()), 0.0);
        assert!(sum(Vec::<f64>::new()).is_sign_positive());
    }

    #[test]
    fn test_summary_serializes_with_type_tag() {
        let result = analyze(&Selection::cells(vec![]), &AnalysisConfig::default());
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["summary"]["type"], "cells");
        assert_eq!(json["summary"]["totalCells"], 0);
        assert!(json["chartData"].as_array().unwrap().is_empty());
        assert_eq!(json["insights"][0]["type"], "precision");
    }
}
