//! Plain-text rendering for the CLI.

use adlens_core::analytics::{ChartData, Summary};
use adlens_core::format::{format_number, format_optional, format_value};
use adlens_core::listing::metric_cell;
use adlens_core::{AdListing, AnalysisResult, ChatMessage, ChatRole, MetricDescriptor};
use adlens_core::{MetricFormat, Selection};
use std::fmt::Write;

const CURRENCY: Option<MetricFormat> = Some(MetricFormat::Currency);
const PERCENTAGE: Option<MetricFormat> = Some(MetricFormat::Percentage);

/// Render rows as left-aligned columns separated by two spaces.
fn table(headers: &[String], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let mut line = |cells: &[String]| {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = width))
            .collect();
        out.push_str(padded.join("  ").trim_end());
        out.push('\n');
    };

    line(headers);
    for row in rows {
        line(row);
    }
    out
}

/// The ads table: Name, Status, then the selected metric columns.
pub fn ads_table(listing: &AdListing) -> String {
    let visible = listing.visible_ads();
    let mut out = format!(
        "{} for account {}: {} of {} shown\n\n",
        listing.ad_type().display_name(),
        listing.account_id(),
        visible.len(),
        listing.ads().len()
    );

    if visible.is_empty() {
        out.push_str("No ads match the current filters.\n");
        return out;
    }

    let mut headers = vec!["Name".to_string(), "Status".to_string()];
    headers.extend(listing.selected_metrics().iter().map(|m| m.label.to_string()));

    let rows: Vec<Vec<String>> = visible
        .iter()
        .map(|ad| {
            let mut row = vec![ad.name.clone(), ad.status.to_string()];
            row.extend(listing.selected_metrics().iter().map(|m| metric_cell(ad, m)));
            row
        })
        .collect();

    out.push_str(&table(&headers, &rows));
    out
}

pub fn metric_list(metrics: &[MetricDescriptor]) -> String {
    if metrics.is_empty() {
        return "  (none)\n".to_string();
    }
    let mut out = String::new();
    for metric in metrics {
        let _ = writeln!(
            out,
            "  {:<20} {} ({})",
            metric.id,
            metric.label,
            metric.format.as_str()
        );
    }
    out
}

/// Summary, chart data and insights of an analysis.
pub fn analysis(selection: &Selection, result: &AnalysisResult) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} {} selected\n",
        selection.len(),
        selection.kind().noun()
    );

    out.push_str("Summary\n");
    match &result.summary {
        Summary::Rows(s) => {
            let _ = writeln!(out, "  Total spend:          {}", format_value(s.total_spend, CURRENCY));
            let _ = writeln!(out, "  Total app installs:   {}", format_number(s.total_app_installs));
            let _ = writeln!(out, "  Total purchases:      {}", format_number(s.total_purchases));
            let _ = writeln!(out, "  Total impressions:    {}", format_number(s.total_impressions));
            let _ = writeln!(out, "  Total clicks:         {}", format_number(s.total_clicks));
            let _ = writeln!(out, "  Avg CTR:              {}", format_value(s.avg_ctr, PERCENTAGE));
            let _ = writeln!(out, "  Avg CPM:              {}", format_value(s.avg_cpm, CURRENCY));
            let _ = writeln!(
                out,
                "  Avg cost per install: {}",
                format_optional(s.avg_cost_per_install, CURRENCY)
            );
            if !s.row_comparisons.is_empty() {
                let headers = ["Campaign", "Status", "Cost/Install", "Cost/Purchase"]
                    .map(String::from)
                    .to_vec();
                let rows: Vec<Vec<String>> = s
                    .row_comparisons
                    .iter()
                    .map(|row| {
                        vec![
                            row.ad_name.clone(),
                            row.status.to_string(),
                            format_optional(row.cost_per_app_install, CURRENCY),
                            format_optional(row.cost_per_purchase, CURRENCY),
                        ]
                    })
                    .collect();
                out.push('\n');
                out.push_str(&indent(&table(&headers, &rows)));
            }
        }
        Summary::Columns(s) => {
            let _ = writeln!(out, "  Metrics: {}", s.selected_metrics);
            for column in &s.column_summaries {
                if !column.recognized {
                    let _ = writeln!(out, "  {}: not recognized", column.metric_label);
                    continue;
                }
                let format = Some(column.format);
                let _ = writeln!(
                    out,
                    "  {}: avg {}, high {}, low {} ({} ads)",
                    column.metric_label,
                    format_value(column.average, format),
                    format_value(column.high, format),
                    format_value(column.low, format),
                    column.samples
                );
            }
        }
        Summary::Cells(s) => {
            let _ = writeln!(
                out,
                "  {} cells across {} metrics and {} ads",
                s.total_cells, s.unique_metrics, s.unique_ads
            );
        }
    }

    out.push_str("\nChart data\n");
    match &result.chart_data {
        ChartData::Rows(points) => {
            for point in points {
                let _ = writeln!(
                    out,
                    "  {}: spend {}, installs {}, CTR {}",
                    point.name,
                    format_value(point.spend, CURRENCY),
                    format_optional(point.app_installs, None),
                    format_optional(point.ctr, PERCENTAGE)
                );
            }
        }
        ChartData::Columns(points) => {
            for point in points {
                let correlation = point
                    .correlation
                    .map(|r| format!("{:.2}", r))
                    .unwrap_or_else(|| format_optional(None, None));
                let _ = writeln!(
                    out,
                    "  {}: importance {:.0}, correlation with spend {}",
                    point.name, point.importance, correlation
                );
            }
        }
        ChartData::Cells(points) => {
            for point in points {
                let _ = writeln!(
                    out,
                    "  {}: {} values, avg {}",
                    point.metric,
                    point.count,
                    format_number(point.avg_value)
                );
            }
        }
    }
    if result.chart_data.is_empty() {
        out.push_str("  (empty)\n");
    }

    out.push_str("\nInsights\n");
    for insight in &result.insights {
        let _ = writeln!(out, "  {}: {}", insight.title, insight.description);
    }
    out
}

pub fn chat_message(message: &ChatMessage) -> String {
    let who = match message.role {
        ChatRole::User => "you",
        ChatRole::Assistant => "assistant",
    };
    format!("[{}] {}", who, message.content)
}

fn indent(text: &str) -> String {
    text.lines().map(|line| format!("  {}\n", line)).collect()
}
