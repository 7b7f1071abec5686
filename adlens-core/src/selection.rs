//! What the user picked for deeper analysis.
//!
//! A [`Selection`] is rebuilt on every "Analyze Selected" action and never stored.
//! Exactly one shape is populated, which the enum guarantees.

use crate::error::{Error, Result};
use crate::metrics_registry::MetricDescriptor;
use crate::types::{validate_collection, AdRecord};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One table cell: an ad's value for one metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedCell {
    pub ad_id: String,
    pub metric_id: String,
    pub value: f64,
}

impl SelectedCell {
    pub fn new(ad_id: impl Into<String>, metric_id: impl Into<String>, value: f64) -> Self {
        Self {
            ad_id: ad_id.into(),
            metric_id: metric_id.into(),
            value,
        }
    }
}

/// The rows, columns or cells chosen for analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Selection {
    /// Whole ads, in table order
    Rows {
        #[serde(rename = "selectedAds")]
        ads: Vec<AdRecord>,
    },
    /// Metric columns, evaluated over the ads visible when they were picked
    Columns {
        #[serde(rename = "selectedMetrics")]
        metrics: Vec<MetricDescriptor>,
        #[serde(rename = "selectedAds", default)]
        ads: Vec<AdRecord>,
    },
    /// Individual cells
    Cells {
        #[serde(rename = "selectedCells")]
        cells: Vec<SelectedCell>,
    },
}

/// Discriminant of a [`Selection`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionKind {
    Rows,
    Columns,
    Cells,
}

impl SelectionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SelectionKind::Rows => "rows",
            SelectionKind::Columns => "columns",
            SelectionKind::Cells => "cells",
        }
    }

    /// Plural noun used in chat prompts
    pub fn noun(&self) -> &'static str {
        match self {
            SelectionKind::Rows => "campaigns",
            SelectionKind::Columns => "metrics",
            SelectionKind::Cells => "data points",
        }
    }
}

impl fmt::Display for SelectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Selection {
    pub fn rows(ads: Vec<AdRecord>) -> Self {
        Selection::Rows { ads }
    }

    pub fn columns(metrics: Vec<MetricDescriptor>, ads: Vec<AdRecord>) -> Self {
        Selection::Columns { metrics, ads }
    }

    pub fn cells(cells: Vec<SelectedCell>) -> Self {
        Selection::Cells { cells }
    }

    pub fn kind(&self) -> SelectionKind {
        match self {
            Selection::Rows { .. } => SelectionKind::Rows,
            Selection::Columns { .. } => SelectionKind::Columns,
            Selection::Cells { .. } => SelectionKind::Cells,
        }
    }

    /// Number of selected items of the selection's own kind.
    pub fn len(&self) -> usize {
        match self {
            Selection::Rows { ads } => ads.len(),
            Selection::Columns { metrics, .. } => metrics.len(),
            Selection::Cells { cells } => cells.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Parse a selection payload such as `{"type": "rows", "selectedAds": [...]}`.
    ///
    /// Carried ads are held to the same rules as loaded ones: valid records, unique ids.
    pub fn from_json(json: &str) -> Result<Self> {
        let selection: Selection =
            serde_json::from_str(json).map_err(|e| Error::InvalidSelection(e.to_string()))?;
        match &selection {
            Selection::Rows { ads } | Selection::Columns { ads, .. } => {
                validate_collection(ads).map_err(|e| Error::InvalidSelection(e.to_string()))?
            }
            Selection::Cells { .. } => {}
        }
        Ok(selection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AdStatus;

    #[test]
    fn test_kind_and_len() {
        let rows = Selection::rows(vec![
            AdRecord::new("1", "A", AdStatus::Active, 1.0),
            AdRecord::new("2", "B", AdStatus::Active, 2.0),
        ]);
        assert_eq!(rows.kind(), SelectionKind::Rows);
        assert_eq!(rows.len(), 2);

        let cells = Selection::cells(vec![]);
        assert_eq!(cells.kind(), SelectionKind::Cells);
        assert!(cells.is_empty());
    }

    #[test]
    fn test_from_json_tagged_shape() {
        let sel = Selection::from_json(
            r#"{"type":"cells","selectedCells":[{"adId":"1","metricId":"ctr","value":2.5}]}"#,
        )
        .unwrap();
        assert_eq!(
            sel,
            Selection::cells(vec![SelectedCell::new("1", "ctr", 2.5)])
        );
    }

    #[test]
    fn test_from_json_rejects_missing_variant() {
        assert!(matches!(
            Selection::from_json(r#"{"type":"rows"}"#),
            Err(Error::InvalidSelection(_))
        ));
        assert!(matches!(
            Selection::from_json(r#"{"selectedAds":[]}"#),
            Err(Error::InvalidSelection(_))
        ));
    }

    #[test]
    fn test_from_json_validates_carried_ads() {
        let negative = r#"{"type":"rows","selectedAds":[
            {"id":"1","name":"A","status":"active","spend":-5}]}"#;
        assert!(matches!(
            Selection::from_json(negative),
            Err(Error::InvalidSelection(_))
        ));

        let duplicate = r#"{"type":"columns","selectedMetrics":[],"selectedAds":[
            {"id":"1","name":"A","status":"active","spend":1},
            {"id":"1","name":"B","status":"paused","spend":2}]}"#;
        assert!(matches!(
            Selection::from_json(duplicate),
            Err(Error::InvalidSelection(_))
        ));
    }
}
