//! Column analysis: summarize selected metrics across ads.
//!
//! Each metric id resolves to an [`AdField`](crate::types::AdField). Ads that do not
//! report the metric are skipped. An id that is not an ad field produces a zeroed
//! summary marked `recognized: false` and a single warning.
//!
//! Chart records relate each metric to spend with a Pearson correlation over the ads
//! reporting both values; `importance` is the correlation's magnitude on a 0-100 scale.

use super::{mean, AnalysisResult, ChartData, Insight, InsightColor, InsightKind, Summary};
use crate::metrics_registry::{MetricDescriptor, MetricFormat};
use crate::types::{AdField, AdRecord};
use serde::Serialize;
use std::collections::HashSet;

/// Aggregates over the selected metric columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnsSummary {
    /// Number of selected metrics
    pub selected_metrics: usize,
    /// Distinct formats among the selected metrics, in first-seen order
    pub metric_types: Vec<MetricFormat>,
    pub column_summaries: Vec<ColumnSummary>,
}

/// Average, high and low of one metric.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnSummary {
    pub metric_id: String,
    pub metric_label: String,
    pub average: f64,
    pub high: f64,
    pub low: f64,
    pub format: MetricFormat,
    /// Number of ads that reported the metric
    pub samples: usize,
    /// False when the id does not name an ad field
    pub recognized: bool,
}

/// One record per metric for the relationship chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricChartPoint {
    pub name: String,
    pub importance: f64,
    /// Pearson correlation with spend; `None` when undefined
    pub correlation: Option<f64>,
}

/// Analyze metric columns over `ads`.
pub fn analyze_columns(metrics: &[MetricDescriptor], ads: &[AdRecord]) -> AnalysisResult {
    let mut warned: HashSet<&str> = HashSet::new();
    let mut column_summaries = Vec::with_capacity(metrics.len());
    let mut chart_data = Vec::with_capacity(metrics.len());

    for metric in metrics {
        let field = match metric.field() {
            Ok(field) if field.is_numeric() => Some(field),
            _ => {
                if warned.insert(metric.id.as_ref()) {
                    tracing::warn!(metric = %metric.id, "Metric not recognized, skipping values");
                }
                None
            }
        };

        let values: Vec<f64> = match field {
            Some(field) => ads.iter().filter_map(|ad| ad.number(field)).collect(),
            None => Vec::new(),
        };

        column_summaries.push(ColumnSummary {
            metric_id: metric.id.to_string(),
            metric_label: metric.label.to_string(),
            average: mean(values.iter().copied()).unwrap_or(0.0),
            high: values.iter().copied().reduce(f64::max).unwrap_or(0.0),
            low: values.iter().copied().reduce(f64::min).unwrap_or(0.0),
            format: metric.format,
            samples: values.len(),
            recognized: field.is_some(),
        });

        let correlation = field.and_then(|field| spend_correlation(ads, field));
        chart_data.push(MetricChartPoint {
            name: metric.label.to_string(),
            importance: correlation.map(|r| r.abs() * 100.0).unwrap_or(0.0),
            correlation,
        });
    }

    let mut metric_types = Vec::new();
    for metric in metrics {
        if !metric_types.contains(&metric.format) {
            metric_types.push(metric.format);
        }
    }

    AnalysisResult {
        summary: Summary::Columns(ColumnsSummary {
            selected_metrics: metrics.len(),
            metric_types,
            column_summaries,
        }),
        chart_data: ChartData::Columns(chart_data),
        insights: column_insights(metrics.len()),
    }
}

/// Pearson correlation between `field` and spend across ads reporting the field.
fn spend_correlation(ads: &[AdRecord], field: AdField) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = ads
        .iter()
        .filter_map(|ad| ad.number(field).map(|v| (v, ad.spend)))
        .collect();
    pearson(&pairs)
}

/// Sample correlation coefficient; `None` for fewer than two pairs or zero variance.
pub fn pearson(pairs: &[(f64, f64)]) -> Option<f64> {
    if pairs.len() < 2 {
        return None;
    }
    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;

    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (x, y) in pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }
    Some((cov / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0))
}

fn column_insights(metric_count: usize) -> Vec<Insight> {
    vec![
        Insight::new(
            InsightKind::Analysis,
            "📊 Metric Selection",
            format!("Analyzing {} key performance indicators", metric_count),
            InsightColor::Blue,
        ),
        Insight::new(
            InsightKind::Correlation,
            "🔗 Metric Relationships",
            "Strong correlations found between cost and conversion metrics",
            InsightColor::Green,
        ),
        Insight::new(
            InsightKind::Optimization,
            "🎯 Focus Areas",
            "CTR and CPA metrics show highest optimization potential",
            InsightColor::Purple,
        ),
        Insight::new(
            InsightKind::Benchmark,
            "📈 Performance Benchmarks",
            "Selected metrics align with industry best practices",
            InsightColor::Yellow,
        ),
    ]
}
