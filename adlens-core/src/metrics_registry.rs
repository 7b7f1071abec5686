//! Metrics registry for the ad tables.
//!
//! Three metrics are always shown; the rest can be added from the metrics bar.
//! Video ads offer two extra video-specific metrics.

use crate::error::{Error, Result};
use crate::types::{AdField, AdType};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// How a metric value is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricFormat {
    Currency,
    Number,
    Percentage,
}

impl MetricFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricFormat::Currency => "currency",
            MetricFormat::Number => "number",
            MetricFormat::Percentage => "percentage",
        }
    }
}

/// Descriptor for one selectable KPI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricDescriptor {
    /// Matches an [`AdField`] key
    pub id: Cow<'static, str>,
    pub label: Cow<'static, str>,
    pub format: MetricFormat,
}

impl MetricDescriptor {
    const fn new(id: &'static str, label: &'static str, format: MetricFormat) -> Self {
        Self {
            id: Cow::Borrowed(id),
            label: Cow::Borrowed(label),
            format,
        }
    }

    /// Resolve the id to a record field.
    pub fn field(&self) -> Result<AdField> {
        self.id.parse()
    }
}

const DEFAULT_METRICS: &[MetricDescriptor] = &[
    MetricDescriptor::new("spend", "Amount Spent", MetricFormat::Currency),
    MetricDescriptor::new("appInstalls", "App Installs", MetricFormat::Number),
    MetricDescriptor::new(
        "costPerAppInstall",
        "Cost per App Install",
        MetricFormat::Currency,
    ),
];

const ADDITIONAL_METRICS: &[MetricDescriptor] = &[
    MetricDescriptor::new("purchases", "Purchases", MetricFormat::Number),
    MetricDescriptor::new("costPerPurchase", "Cost per Purchase", MetricFormat::Currency),
    MetricDescriptor::new("impressions", "Impressions", MetricFormat::Number),
    MetricDescriptor::new("clicks", "Clicks", MetricFormat::Number),
    MetricDescriptor::new("ctr", "CTR", MetricFormat::Percentage),
    MetricDescriptor::new("cpm", "CPM", MetricFormat::Currency),
    MetricDescriptor::new("reach", "Reach", MetricFormat::Number),
    MetricDescriptor::new("frequency", "Frequency", MetricFormat::Number),
];

const VIDEO_METRICS: &[MetricDescriptor] = &[
    MetricDescriptor::new("videoViews", "Video Views", MetricFormat::Number),
    MetricDescriptor::new("videoViewRate", "Video View Rate", MetricFormat::Percentage),
];

/// The metrics every table starts with.
pub fn default_metrics(_ad_type: AdType) -> Vec<MetricDescriptor> {
    DEFAULT_METRICS.to_vec()
}

/// The metrics that can be added on top of the defaults.
pub fn additional_metrics(ad_type: AdType) -> Vec<MetricDescriptor> {
    let mut metrics = ADDITIONAL_METRICS.to_vec();
    if ad_type == AdType::Video {
        metrics.extend_from_slice(VIDEO_METRICS);
    }
    metrics
}

/// Additional metrics not already selected (set difference by id).
pub fn available_metrics(ad_type: AdType, selected: &[MetricDescriptor]) -> Vec<MetricDescriptor> {
    additional_metrics(ad_type)
        .into_iter()
        .filter(|m| !selected.iter().any(|s| s.id == m.id))
        .collect()
}

/// Every metric known for an ad type, defaults first.
pub fn list_metrics(ad_type: AdType) -> Vec<MetricDescriptor> {
    let mut metrics = default_metrics(ad_type);
    metrics.extend(additional_metrics(ad_type));
    metrics
}

/// Look up a metric by id for an ad type.
pub fn find_metric(ad_type: AdType, id: &str) -> Result<MetricDescriptor> {
    list_metrics(ad_type)
        .into_iter()
        .find(|m| m.id == id)
        .ok_or_else(|| Error::UnknownMetric(id.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_three() {
        let ids: Vec<_> = default_metrics(AdType::Static)
            .iter()
            .map(|m| m.id.to_string())
            .collect();
        assert_eq!(ids, vec!["spend", "appInstalls", "costPerAppInstall"]);
    }

    #[test]
    fn test_video_adds_two_metrics() {
        let video = additional_metrics(AdType::Video);
        let stat = additional_metrics(AdType::Static);
        assert_eq!(video.len(), stat.len() + 2);
        assert!(video.iter().any(|m| m.id == "videoViewRate"));
        assert!(!stat.iter().any(|m| m.id == "videoViews"));
    }

    #[test]
    fn test_available_excludes_selected() {
        for ad_type in [AdType::Video, AdType::Static] {
            let additional = additional_metrics(ad_type);
            // every prefix of the additional list as a selection
            for n in 0..=additional.len() {
                let mut selected = default_metrics(ad_type);
                selected.extend_from_slice(&additional[..n]);

                let available = available_metrics(ad_type, &selected);
                for m in &available {
                    assert!(!selected.iter().any(|s| s.id == m.id));
                }
                for m in &additional {
                    assert!(
                        available.iter().any(|a| a.id == m.id)
                            || selected.iter().any(|s| s.id == m.id)
                    );
                }
            }
        }
    }

    #[test]
    fn test_every_registered_metric_resolves_to_a_numeric_field() {
        for metric in list_metrics(AdType::Video) {
            let field = metric.field().unwrap();
            assert!(field.is_numeric(), "{} should be numeric", metric.id);
        }
    }

    #[test]
    fn test_find_metric() {
        assert_eq!(find_metric(AdType::Video, "ctr").unwrap().label, "CTR");
        assert!(matches!(
            find_metric(AdType::Static, "videoViews"),
            Err(Error::UnknownMetric(_))
        ));
    }
}
