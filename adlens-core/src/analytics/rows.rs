//! Row analysis: aggregate a set of ads.
//!
//! Absent optional values are skipped, never counted as zero. Averages are taken over
//! the ads that report the field. Average cost per install is `None` when the ads
//! report no installs at all.
//!
//! ## Insights
//!
//! 1. Top performer: first ad with the highest CTR
//! 2. Optimization opportunity: number of paused ads
//! 3. Budget concentration: share of spend used by the top spenders (by count)
//! 4. Needs attention: first ad with the lowest CTR

use super::{mean, sum, AnalysisResult, ChartData, Insight, InsightColor, InsightKind, Summary};
use crate::config::AnalysisConfig;
use crate::format::truncate_name;
use crate::types::{AdRecord, AdStatus};
use serde::Serialize;

/// Aggregates over the selected ads.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowsSummary {
    pub total_spend: f64,
    pub total_app_installs: f64,
    pub total_purchases: f64,
    pub total_impressions: f64,
    pub total_clicks: f64,
    #[serde(rename = "avgCTR")]
    pub avg_ctr: f64,
    #[serde(rename = "avgCPM")]
    pub avg_cpm: f64,
    /// `None` when the ads report zero installs
    pub avg_cost_per_install: Option<f64>,
    pub row_comparisons: Vec<RowComparison>,
}

/// Per-ad cost figures for side-by-side comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowComparison {
    pub ad_id: String,
    pub ad_name: String,
    pub cost_per_app_install: Option<f64>,
    pub cost_per_purchase: Option<f64>,
    pub status: AdStatus,
}

/// One bar group per ad.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowChartPoint {
    /// Ad name, truncated for axis labels
    pub name: String,
    pub spend: f64,
    pub app_installs: Option<f64>,
    pub purchases: Option<f64>,
    pub ctr: Option<f64>,
    pub cpm: Option<f64>,
    pub cost_per_app_install: Option<f64>,
}

/// Analyze a set of ads. The input order is left untouched.
pub fn analyze_rows(ads: &[AdRecord], config: &AnalysisConfig) -> AnalysisResult {
    let total_spend = sum(ads.iter().map(|ad| ad.spend));
    let total_app_installs = sum(ads.iter().filter_map(|ad| ad.app_installs));
    let total_purchases = sum(ads.iter().filter_map(|ad| ad.purchases));
    let total_impressions = sum(ads.iter().filter_map(|ad| ad.impressions));
    let total_clicks = sum(ads.iter().filter_map(|ad| ad.clicks));
    let avg_ctr = mean(ads.iter().filter_map(|ad| ad.ctr)).unwrap_or(0.0);
    let avg_cpm = mean(ads.iter().filter_map(|ad| ad.cpm)).unwrap_or(0.0);

    let avg_cost_per_install = if total_app_installs > 0.0 {
        Some(total_spend / total_app_installs)
    } else {
        None
    };

    let row_comparisons = ads
        .iter()
        .map(|ad| RowComparison {
            ad_id: ad.id.clone(),
            ad_name: ad.name.clone(),
            cost_per_app_install: ad.cost_per_app_install,
            cost_per_purchase: ad.cost_per_purchase,
            status: ad.status,
        })
        .collect();

    let chart_data = ads
        .iter()
        .map(|ad| RowChartPoint {
            name: truncate_name(&ad.name, config.chart_name_max_chars),
            spend: ad.spend,
            app_installs: ad.app_installs,
            purchases: ad.purchases,
            ctr: ad.ctr,
            cpm: ad.cpm,
            cost_per_app_install: ad.cost_per_app_install,
        })
        .collect();

    AnalysisResult {
        summary: Summary::Rows(RowsSummary {
            total_spend,
            total_app_installs,
            total_purchases,
            total_impressions,
            total_clicks,
            avg_ctr,
            avg_cpm,
            avg_cost_per_install,
            row_comparisons,
        }),
        chart_data: ChartData::Rows(chart_data),
        insights: row_insights(ads, config.top_spender_share),
    }
}

/// First ad with the strictly highest (or lowest) CTR; ties keep input order.
fn ctr_extreme(ads: &[AdRecord], better: impl Fn(f64, f64) -> bool) -> Option<(&AdRecord, f64)> {
    ads.iter()
        .filter_map(|ad| ad.ctr.map(|ctr| (ad, ctr)))
        .fold(None, |best, (ad, ctr)| match best {
            Some((_, best_ctr)) if !better(ctr, best_ctr) => best,
            _ => Some((ad, ctr)),
        })
}

/// Percentage of total spend used by the top `share` of ads (count rounded up).
pub fn budget_concentration(ads: &[AdRecord], share: f64) -> f64 {
    let total_spend = sum(ads.iter().map(|ad| ad.spend));
    if total_spend <= 0.0 {
        return 0.0;
    }

    let mut spends: Vec<f64> = ads.iter().map(|ad| ad.spend).collect();
    spends.sort_by(|a, b| b.total_cmp(a));
    let top_count = (ads.len() as f64 * share).ceil() as usize;
    let top_spend = sum(spends.into_iter().take(top_count));

    top_spend / total_spend * 100.0
}

fn row_insights(ads: &[AdRecord], share: f64) -> Vec<Insight> {
    let best = ctr_extreme(ads, |candidate, current| candidate > current);
    let worst = ctr_extreme(ads, |candidate, current| candidate < current);
    let paused_count = ads
        .iter()
        .filter(|ad| ad.status == AdStatus::Paused)
        .count();
    let concentration = budget_concentration(ads, share);

    let top_description = match best {
        Some((ad, ctr)) => format!("{} leads with {:.2}% CTR", ad.name, ctr),
        None => "No campaigns report CTR yet".to_string(),
    };
    let attention_description = match worst {
        Some((ad, ctr)) => format!("{} has lowest CTR at {:.2}%", ad.name, ctr),
        None => "No campaigns report CTR yet".to_string(),
    };

    vec![
        Insight::new(
            InsightKind::Performance,
            "🏆 Top Performer",
            top_description,
            InsightColor::Blue,
        ),
        Insight::new(
            InsightKind::Opportunity,
            "⚠️ Optimization Opportunity",
            format!("{} paused campaigns could be reactivated", paused_count),
            InsightColor::Yellow,
        ),
        Insight::new(
            InsightKind::Efficiency,
            "💰 Budget Concentration",
            format!(
                "Top {:.0}% of campaigns use {:.0}% of budget",
                (share * 100.0).round(),
                concentration.round()
            ),
            InsightColor::Purple,
        ),
        Insight::new(
            InsightKind::Performance,
            "📉 Needs Attention",
            attention_description,
            InsightColor::Red,
        ),
    ]
}
