//! Listing page state for one account and ad type.
//!
//! [`AdListing`] holds what a video or static ad listing shows: the loaded ads, the
//! current search/status/spend/condition filters, and the metric columns. It is the
//! caller of the filter evaluator and the builder of [`Selection`]s.

use crate::config::FilterConfig;
use crate::error::{Error, Result};
use crate::filter::{AdFilter, FilterCondition, SpendRange, StatusFilter};
use crate::format::format_optional;
use crate::metrics_registry::{available_metrics, default_metrics, find_metric, MetricDescriptor};
use crate::provider::AdProvider;
use crate::selection::{SelectedCell, Selection};
use crate::types::{validate_collection, AdField, AdRecord, AdType};

/// State of an ad listing page.
#[derive(Debug, Clone)]
pub struct AdListing {
    account_id: String,
    ad_type: AdType,
    ads: Vec<AdRecord>,
    filter: AdFilter,
    /// Applied conditions as authored, for display
    conditions: Vec<FilterCondition>,
    selected_metrics: Vec<MetricDescriptor>,
    /// What "reset filters" opens the spend range to
    full_spend_range: SpendRange,
}

impl AdListing {
    /// Build a listing over `ads` with the configured default filters.
    pub fn new(
        account_id: impl Into<String>,
        ad_type: AdType,
        ads: Vec<AdRecord>,
        config: &FilterConfig,
    ) -> Result<Self> {
        validate_collection(&ads)?;
        let spend_range = config.default_spend_range(ad_type)?;
        let full_spend_range = config.full_spend_range()?;
        Ok(Self {
            account_id: account_id.into(),
            ad_type,
            ads,
            filter: AdFilter {
                spend_range,
                ..AdFilter::default()
            },
            conditions: Vec::new(),
            selected_metrics: default_metrics(ad_type),
            full_spend_range,
        })
    }

    /// Load an account's ads from `provider`.
    pub fn load(
        provider: &dyn AdProvider,
        account_id: &str,
        ad_type: AdType,
        config: &FilterConfig,
    ) -> Result<Self> {
        let ads = provider.load_ads(account_id, ad_type)?;
        Self::new(account_id, ad_type, ads, config)
    }

    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    pub fn ad_type(&self) -> AdType {
        self.ad_type
    }

    /// Every loaded ad, unfiltered.
    pub fn ads(&self) -> &[AdRecord] {
        &self.ads
    }

    pub fn search_term(&self) -> &str {
        &self.filter.search_term
    }

    pub fn status_filter(&self) -> StatusFilter {
        self.filter.status
    }

    pub fn spend_range(&self) -> SpendRange {
        self.filter.spend_range
    }

    pub fn conditions(&self) -> &[FilterCondition] {
        &self.conditions
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.filter.search_term = term.into();
    }

    /// Set the status selector from `"all"` or a status name.
    pub fn set_status_filter(&mut self, status: &str) -> Result<()> {
        self.filter.status = status.parse()?;
        Ok(())
    }

    /// Apply the advanced filter dialog: keep only complete conditions and store
    /// them with the new spend range.
    ///
    /// Fails without changing state when a condition names an unknown field.
    pub fn apply_advanced_filter(
        &mut self,
        conditions: Vec<FilterCondition>,
        spend_range: SpendRange,
    ) -> Result<()> {
        let mut kept = Vec::with_capacity(conditions.len());
        let mut compiled = Vec::with_capacity(conditions.len());
        for condition in conditions {
            if let Some(c) = condition.compile()? {
                compiled.push(c);
                kept.push(condition);
            }
        }

        tracing::debug!(
            conditions = kept.len(),
            min = spend_range.min,
            max = spend_range.max,
            "Applied advanced filter"
        );
        self.conditions = kept;
        self.filter.conditions = compiled;
        self.filter.spend_range = spend_range;
        Ok(())
    }

    /// Clear conditions and open the spend range to the slider's full extent.
    pub fn reset_filters(&mut self) {
        self.conditions.clear();
        self.filter.conditions.clear();
        self.filter.spend_range = self.full_spend_range;
    }

    /// Ads passing every filter, in load order.
    pub fn visible_ads(&self) -> Vec<&AdRecord> {
        self.filter.apply(&self.ads)
    }

    pub fn selected_metrics(&self) -> &[MetricDescriptor] {
        &self.selected_metrics
    }

    /// Additional metrics that are not shown yet.
    pub fn available_metrics(&self) -> Vec<MetricDescriptor> {
        available_metrics(self.ad_type, &self.selected_metrics)
    }

    /// Show a metric column. Returns `false` when it is already shown.
    pub fn add_metric(&mut self, metric: MetricDescriptor) -> bool {
        if self.selected_metrics.iter().any(|m| m.id == metric.id) {
            return false;
        }
        self.selected_metrics.push(metric);
        true
    }

    /// Show a metric column by registry id.
    pub fn add_metric_id(&mut self, id: &str) -> Result<bool> {
        let metric = find_metric(self.ad_type, id)?;
        Ok(self.add_metric(metric))
    }

    /// Hide a metric column. Returns `false` when it was not shown.
    pub fn remove_metric(&mut self, id: &str) -> bool {
        let before = self.selected_metrics.len();
        self.selected_metrics.retain(|m| m.id != id);
        self.selected_metrics.len() != before
    }

    /// "Analyze Selected": every visible ad as a row selection.
    pub fn analyze_selected(&self) -> Selection {
        Selection::rows(self.visible_ads().into_iter().cloned().collect())
    }

    /// Column selection over the visible ads.
    pub fn select_columns<S: AsRef<str>>(&self, metric_ids: &[S]) -> Result<Selection> {
        let metrics = metric_ids
            .iter()
            .map(|id| find_metric(self.ad_type, id.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        let ads = self.visible_ads().into_iter().cloned().collect();
        Ok(Selection::columns(metrics, ads))
    }

    /// Cell selection from `(ad id, metric id)` pairs.
    ///
    /// Values are read from the visible ads. Pairs naming a hidden ad or an absent
    /// value are skipped; a metric id that is not a numeric field is an error.
    pub fn select_cells<A, M>(&self, pairs: &[(A, M)]) -> Result<Selection>
    where
        A: AsRef<str>,
        M: AsRef<str>,
    {
        let visible = self.visible_ads();
        let mut cells = Vec::with_capacity(pairs.len());
        for (ad_id, metric_id) in pairs {
            let (ad_id, metric_id) = (ad_id.as_ref(), metric_id.as_ref());
            let field: AdField = metric_id.parse()?;
            if !field.is_numeric() {
                return Err(Error::UnknownMetric(metric_id.to_string()));
            }
            let value = visible
                .iter()
                .find(|ad| ad.id == ad_id)
                .and_then(|ad| ad.number(field));
            match value {
                Some(value) => cells.push(SelectedCell::new(ad_id, metric_id, value)),
                None => tracing::debug!(ad_id, metric_id, "Skipping cell without a value"),
            }
        }
        Ok(Selection::cells(cells))
    }
}

/// Table text for one ad and metric column; "N/A" when the ad lacks the value.
pub fn metric_cell(ad: &AdRecord, metric: &MetricDescriptor) -> String {
    let value = metric.field().ok().and_then(|field| ad.number(field));
    format_optional(value, Some(metric.format))
}
