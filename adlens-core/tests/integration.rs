//! Integration tests for the adlens listing and analysis pipeline
//!
//! These tests load fixture accounts from `tests/fixtures/accounts/` through the
//! directory provider and drive them through filtering, selection and analysis.

use adlens_core::analytics::{ChartData, Summary};
use adlens_core::config::{AnalysisConfig, FilterConfig};
use adlens_core::filter::apply_condition;
use adlens_core::format::format_value;
use adlens_core::metrics_registry::{additional_metrics, available_metrics, default_metrics};
use adlens_core::{
    analyze, filter_ads, AdListing, AdProvider, AdRecord, AdType, DirectoryProvider,
    FilterCondition, MetricFormat, Selection, SpendRange,
};
use std::path::PathBuf;

/// Get the path to a fixture file
fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn provider() -> DirectoryProvider {
    DirectoryProvider::new(fixture_path("accounts"))
}

fn acme_static() -> Vec<AdRecord> {
    provider()
        .load_ads("acme", AdType::Static)
        .expect("fixture loads")
}

fn ids(ads: &[AdRecord]) -> Vec<&str> {
    ads.iter().map(|ad| ad.id.as_str()).collect()
}

// ============================================
// Provider
// ============================================

#[test]
fn test_directory_provider_lists_fixture_accounts() {
    let accounts = provider().accounts().unwrap();
    assert_eq!(accounts, vec!["acme", "globex"]);

    let globex = provider().load_ads("globex", AdType::Static).unwrap();
    assert!(globex.is_empty());
    let globex_video = provider().load_ads("globex", AdType::Video).unwrap();
    assert!(globex_video.is_empty());
}

// ============================================
// Filtering
// ============================================

#[test]
fn test_filter_identity_when_inert() {
    let ads = acme_static();
    let out = filter_ads(&ads, "", "all", SpendRange::new(0.0, 50_000.0).unwrap(), &[]).unwrap();
    assert_eq!(out, ads);
}

#[test]
fn test_filter_preserves_order() {
    let ads = acme_static();
    let out = filter_ads(&ads, "", "active", SpendRange::unbounded(), &[]).unwrap();
    assert_eq!(ids(&out), vec!["s1", "s3", "s5"]);
}

#[test]
fn test_spend_range_bounds_are_inclusive() {
    let ads = acme_static();
    let out = filter_ads(&ads, "", "all", SpendRange::new(100.0, 600.0).unwrap(), &[]).unwrap();
    assert_eq!(out.len(), 5);

    let out = filter_ads(&ads, "", "all", SpendRange::new(101.0, 599.0).unwrap(), &[]).unwrap();
    assert!(out.is_empty());
}

#[test]
fn test_conditions_intersect() {
    let ads = acme_static();
    let range = SpendRange::unbounded();

    let high_ctr = FilterCondition::new("ctr", "greater_than", "2");
    let cheap_cpm = FilterCondition::new("cpm", "less_than", "11.5");

    let a = filter_ads(&ads, "", "all", range, &[high_ctr.clone()]).unwrap();
    assert_eq!(ids(&a), vec!["s2", "s3"]);
    let b = filter_ads(&ads, "", "all", range, &[cheap_cpm.clone()]).unwrap();
    assert_eq!(ids(&b), vec!["s1", "s3"]);

    let both = filter_ads(&ads, "", "all", range, &[high_ctr, cheap_cpm]).unwrap();
    assert_eq!(ids(&both), vec!["s3"]);
}

#[test]
fn test_missing_field_fails_closed() {
    let ads = acme_static();
    // s4 reports no ctr; neither side of the comparison admits it
    for op in ["greater_than", "less_than", "is_not", "not_contains"] {
        let condition = FilterCondition::new("ctr", op, "100").compile().unwrap().unwrap();
        assert!(!apply_condition(&ads[3], &condition), "{} admitted missing ctr", op);
    }
}

#[test]
fn test_text_conditions_on_fixture() {
    let video = provider().load_ads("acme", AdType::Video).unwrap();
    let out = filter_ads(
        &video,
        "",
        "all",
        SpendRange::unbounded(),
        &[FilterCondition::new("callToAction", "contains", "INSTALL")],
    )
    .unwrap();
    assert_eq!(ids(&out), vec!["v1"]);
}

// ============================================
// Analysis
// ============================================

#[test]
fn test_row_analysis_end_to_end() {
    // acme spends sit below the static listing's default floor
    let config = FilterConfig {
        default_spend_min: Some(0.0),
        ..FilterConfig::default()
    };
    let listing = AdListing::load(&provider(), "acme", AdType::Static, &config)
        .expect("listing loads");
    let result = analyze(&listing.analyze_selected(), &AnalysisConfig::default());

    match &result.summary {
        Summary::Rows(summary) => {
            assert_eq!(summary.total_spend, 1000.0);
            assert_eq!(summary.total_app_installs, 45.0);
            assert_eq!(summary.row_comparisons.len(), 5);
        }
        other => panic!("expected rows summary, got {:?}", other),
    }

    let descriptions: Vec<&str> = result
        .insights
        .iter()
        .map(|insight| insight.description.as_str())
        .collect();
    assert_eq!(
        descriptions,
        vec![
            "Retargeting Carousel leads with 4.80% CTR",
            "1 paused campaigns could be reactivated",
            "Top 20% of campaigns use 60% of budget",
            "Flagship Product Hero Image has lowest CTR at 1.20%",
        ]
    );

    match &result.chart_data {
        ChartData::Rows(points) => assert_eq!(points[4].name, "Flagship Product Her..."),
        other => panic!("expected row chart data, got {:?}", other),
    }
}

#[test]
fn test_total_spend_is_exact_sum() {
    let ads = acme_static();
    let expected: f64 = ads.iter().fold(0.0, |acc, ad| acc + ad.spend);
    let result = analyze(&Selection::rows(ads), &AnalysisConfig::default());
    match result.summary {
        Summary::Rows(summary) => assert_eq!(summary.total_spend, expected),
        other => panic!("expected rows summary, got {:?}", other),
    }
}

#[test]
fn test_cell_selection_fixture() {
    let json = std::fs::read_to_string(fixture_path("selections/cells.json")).unwrap();
    let selection = Selection::from_json(&json).unwrap();
    let result = analyze(&selection, &AnalysisConfig::default());

    match &result.chart_data {
        ChartData::Cells(points) => {
            assert_eq!(points.len(), 2);
            assert_eq!(points[0].metric, "ctr");
            assert_eq!(points[0].count, 2);
            assert_eq!(points[0].avg_value, 3.0);
        }
        other => panic!("expected cell chart data, got {:?}", other),
    }
}

#[test]
fn test_column_selection_fixture_flags_unknown_metric() {
    let json = std::fs::read_to_string(fixture_path("selections/columns.json")).unwrap();
    let selection = Selection::from_json(&json).unwrap();
    let result = analyze(&selection, &AnalysisConfig::default());

    match &result.summary {
        Summary::Columns(summary) => {
            let spend = &summary.column_summaries[0];
            assert!(spend.recognized);
            assert_eq!((spend.average, spend.high, spend.low), (200.0, 300.0, 100.0));

            let roas = &summary.column_summaries[1];
            assert!(!roas.recognized);
            assert_eq!(roas.samples, 0);
        }
        other => panic!("expected columns summary, got {:?}", other),
    }
}

#[test]
fn test_empty_inputs_are_safe() {
    let config = AnalysisConfig::default();
    for selection in [
        Selection::rows(vec![]),
        Selection::columns(vec![], vec![]),
        Selection::cells(vec![]),
    ] {
        let result = analyze(&selection, &config);
        assert!(result.chart_data.is_empty());
        assert_eq!(result.insights.len(), 4);
        serde_json::to_string(&result).expect("result serializes");
    }
}

// ============================================
// Registry and formatting
// ============================================

#[test]
fn test_available_metrics_never_repeat_selected() {
    for ad_type in [AdType::Video, AdType::Static] {
        let mut selected = default_metrics(ad_type);
        for metric in additional_metrics(ad_type) {
            let available = available_metrics(ad_type, &selected);
            assert!(available.iter().any(|m| m.id == metric.id));
            assert!(available
                .iter()
                .all(|m| !selected.iter().any(|s| s.id == m.id)));
            selected.push(metric);
        }
        assert!(available_metrics(ad_type, &selected).is_empty());
    }
}

#[test]
fn test_formatter_shapes() {
    let currency = format_value(1234.5, Some(MetricFormat::Currency));
    assert_eq!(currency, "$1,234.50");
    assert_eq!(format_value(12.345, Some(MetricFormat::Percentage)), "12.35%");
    assert_eq!(format_value(125000.0, Some(MetricFormat::Number)), "125,000");
}
