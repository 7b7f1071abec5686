//! Ad filter evaluation for the listing pages.
//!
//! An ad is visible iff every predicate holds:
//!
//! 1. its name contains the search term (case-insensitive; empty matches all)
//! 2. the status selector is `all` or equals its status
//! 3. its spend lies in the closed spend range
//! 4. every applied condition passes (logical AND; an empty list passes)
//!
//! Conditions are authored as strings ([`FilterCondition`]) and compiled once into
//! [`CompiledCondition`]s, which resolve the field name through [`AdField`].
//!
//! ## Condition semantics
//!
//! | Operator | Comparison |
//! |----------|------------|
//! | `is` / `is_not` | lowercase string equality |
//! | `contains` / `not_contains` | lowercase substring |
//! | `greater_than` / `less_than` | numeric; unparseable sides never match |
//! | anything else | passes |
//!
//! A condition whose field is absent on an ad fails for every operator.

use crate::error::{Error, Result};
use crate::types::{AdField, AdRecord, AdStatus, FieldValue};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================
// Spend range
// ============================================

/// Closed interval `[min, max]` bounding an ad's spend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpendRange {
    pub min: f64,
    pub max: f64,
}

impl SpendRange {
    /// Create a range, rejecting `min > max` and non-finite bounds.
    pub fn new(min: f64, max: f64) -> Result<Self> {
        if !min.is_finite() || !max.is_finite() || min > max {
            return Err(Error::InvalidSpendRange { min, max });
        }
        Ok(Self { min, max })
    }

    /// Range that admits any spend.
    pub fn unbounded() -> Self {
        Self {
            min: 0.0,
            max: f64::MAX,
        }
    }

    /// Inclusive on both ends.
    pub fn contains(&self, spend: f64) -> bool {
        self.min <= spend && spend <= self.max
    }
}

impl Default for SpendRange {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: 10_000.0,
        }
    }
}

// ============================================
// Status selector
// ============================================

/// The status dropdown: everything, or a single status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(AdStatus),
}

impl StatusFilter {
    pub fn matches(&self, status: AdStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => *wanted == status,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s == "all" {
            return Ok(StatusFilter::All);
        }
        s.parse::<AdStatus>()
            .map(StatusFilter::Only)
            .map_err(|_| Error::InvalidFilter(format!("unknown status filter: {}", s)))
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusFilter::All => write!(f, "all"),
            StatusFilter::Only(status) => write!(f, "{}", status),
        }
    }
}

// ============================================
// Conditions
// ============================================

/// Comparison operator of a condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operator {
    Is,
    IsNot,
    Contains,
    NotContains,
    GreaterThan,
    LessThan,
    /// Any other operator text. Conditions using it always pass.
    Unrecognized(String),
}

impl Operator {
    /// Parse operator text; never fails.
    pub fn parse(s: &str) -> Self {
        match s {
            "is" => Operator::Is,
            "is_not" => Operator::IsNot,
            "contains" => Operator::Contains,
            "not_contains" => Operator::NotContains,
            "greater_than" => Operator::GreaterThan,
            "less_than" => Operator::LessThan,
            other => Operator::Unrecognized(other.to_string()),
        }
    }
}

/// One user-authored predicate, as edited in the filter dialog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCondition {
    /// List key for the dialog; carries no meaning
    pub id: String,
    pub field: String,
    pub operator: String,
    pub value: String,
}

impl FilterCondition {
    /// Create a condition with a fresh id.
    pub fn new(field: impl Into<String>, operator: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            field: field.into(),
            operator: operator.into(),
            value: value.into(),
        }
    }

    /// A condition with an empty field, operator or value always passes.
    pub fn is_inert(&self) -> bool {
        self.field.is_empty() || self.operator.is_empty() || self.value.is_empty()
    }

    /// Resolve the field name and operator.
    ///
    /// Returns `Ok(None)` for inert conditions and `Error::UnknownField` when the
    /// field is not an ad attribute.
    pub fn compile(&self) -> Result<Option<CompiledCondition>> {
        if self.is_inert() {
            return Ok(None);
        }
        let field = self.field.parse::<AdField>()?;
        Ok(Some(CompiledCondition {
            field,
            operator: Operator::parse(&self.operator),
            value: self.value.clone(),
        }))
    }
}

impl FromStr for FilterCondition {
    type Err = Error;

    /// Parse `"field operator value"`; the value may contain spaces.
    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.trim().splitn(3, char::is_whitespace);
        match (parts.next(), parts.next(), parts.next()) {
            (Some(field), Some(op), Some(value)) if !field.is_empty() && !op.is_empty() => {
                Ok(FilterCondition::new(field, op, value.trim()))
            }
            _ => Err(Error::InvalidFilter(format!(
                "expected \"field operator value\", got {:?}",
                s
            ))),
        }
    }
}

/// A condition with its field resolved, ready to evaluate.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledCondition {
    pub field: AdField,
    pub operator: Operator,
    pub value: String,
}

/// Evaluate one condition against an ad.
pub fn apply_condition(ad: &AdRecord, condition: &CompiledCondition) -> bool {
    let Some(actual) = ad.field(condition.field) else {
        return false;
    };

    let text = || actual.to_string().to_lowercase();
    let wanted = condition.value.to_lowercase();

    match &condition.operator {
        Operator::Is => text() == wanted,
        Operator::IsNot => text() != wanted,
        Operator::Contains => text().contains(&wanted),
        Operator::NotContains => !text().contains(&wanted),
        Operator::GreaterThan => compare_numbers(actual, &condition.value, |a, b| a > b),
        Operator::LessThan => compare_numbers(actual, &condition.value, |a, b| a < b),
        Operator::Unrecognized(_) => true,
    }
}

fn compare_numbers(actual: FieldValue<'_>, wanted: &str, cmp: impl Fn(f64, f64) -> bool) -> bool {
    let actual = match actual {
        FieldValue::Number(n) => Some(n),
        FieldValue::Text(s) => coerce_number(s),
    };
    match (actual, coerce_number(wanted)) {
        (Some(a), Some(b)) => cmp(a, b),
        _ => false,
    }
}

/// Numeric coercion for comparisons; `None` stands for NaN.
///
/// Only finite decimal text is a number, so `inf` and `infinity` never match.
fn coerce_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

// ============================================
// Composite filter
// ============================================

/// All filter inputs of a listing page, validated.
#[derive(Debug, Clone, Default)]
pub struct AdFilter {
    pub search_term: String,
    pub status: StatusFilter,
    pub spend_range: SpendRange,
    pub conditions: Vec<CompiledCondition>,
}

impl AdFilter {
    /// Build a filter from raw page inputs.
    ///
    /// Inert conditions are dropped; an unknown field name is an error.
    pub fn new(
        search_term: &str,
        status_filter: &str,
        spend_range: SpendRange,
        conditions: &[FilterCondition],
    ) -> Result<Self> {
        let status = status_filter.parse()?;
        let mut compiled = Vec::with_capacity(conditions.len());
        for condition in conditions {
            if let Some(c) = condition.compile()? {
                compiled.push(c);
            }
        }
        Ok(Self {
            search_term: search_term.to_string(),
            status,
            spend_range,
            conditions: compiled,
        })
    }

    pub fn matches(&self, ad: &AdRecord) -> bool {
        let matches_search = self.search_term.is_empty()
            || ad
                .name
                .to_lowercase()
                .contains(&self.search_term.to_lowercase());
        matches_search
            && self.status.matches(ad.status)
            && self.spend_range.contains(ad.spend)
            && self.conditions.iter().all(|c| apply_condition(ad, c))
    }

    /// Stable filter: surviving ads keep their relative order.
    pub fn apply<'a>(&self, ads: &'a [AdRecord]) -> Vec<&'a AdRecord> {
        let visible: Vec<_> = ads.iter().filter(|ad| self.matches(ad)).collect();
        tracing::debug!(
            total = ads.len(),
            visible = visible.len(),
            conditions = self.conditions.len(),
            status = %self.status,
            "Applied ad filter"
        );
        visible
    }
}

/// Filter `ads` by the raw page inputs, returning the visible subset in input order.
pub fn filter_ads(
    ads: &[AdRecord],
    search_term: &str,
    status_filter: &str,
    spend_range: SpendRange,
    conditions: &[FilterCondition],
) -> Result<Vec<AdRecord>> {
    let filter = AdFilter::new(search_term, status_filter, spend_range, conditions)?;
    Ok(filter.apply(ads).into_iter().cloned().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ad(id: &str, name: &str, status: AdStatus, spend: f64) -> AdRecord {
        AdRecord::new(id, name, status, spend)
    }

    fn sample() -> Vec<AdRecord> {
        vec![
            ad("1", "Summer Collection Video", AdStatus::Active, 2450.0)
                .with_metric(AdField::Ctr, 2.6),
            ad("2", "Brand Awareness Video", AdStatus::Active, 1890.0)
                .with_metric(AdField::Ctr, 2.5),
            ad("3", "Product Demo Video", AdStatus::Paused, 3200.0).with_metric(AdField::Ctr, 3.0),
            ad("4", "Holiday Special Video", AdStatus::Completed, 5600.0),
        ]
    }

    fn compiled(field: &str, op: &str, value: &str) -> CompiledCondition {
        FilterCondition::new(field, op, value)
            .compile()
            .unwrap()
            .unwrap()
    }

    fn ids(ads: &[AdRecord]) -> Vec<&str> {
        ads.iter().map(|a| a.id.as_str()).collect()
    }

    #[test]
    fn test_inert_filters_are_identity() {
        let ads = sample();
        let out = filter_ads(&ads, "", "all", SpendRange::new(0.0, f64::MAX).unwrap(), &[]).unwrap();
        assert_eq!(out, ads);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let ads = sample();
        let out = filter_ads(&ads, "VIDEO", "all", SpendRange::unbounded(), &[]).unwrap();
        assert_eq!(out.len(), 4);
        let out = filter_ads(&ads, "demo", "all", SpendRange::unbounded(), &[]).unwrap();
        assert_eq!(ids(&out), vec!["3"]);
    }

    #[test]
    fn test_status_filter() {
        let ads = sample();
        let out = filter_ads(&ads, "", "active", SpendRange::unbounded(), &[]).unwrap();
        assert_eq!(ids(&out), vec!["1", "2"]);
        assert!(matches!(
            filter_ads(&ads, "", "archived", SpendRange::unbounded(), &[]),
            Err(Error::InvalidFilter(_))
        ));
    }

    #[test]
    fn test_spend_range_is_inclusive() {
        let ads = sample();
        let out = filter_ads(&ads, "", "all", SpendRange::new(1890.0, 3200.0).unwrap(), &[]).unwrap();
        assert_eq!(ids(&out), vec!["1", "2", "3"]);

        let out = filter_ads(&ads, "", "all", SpendRange::new(1891.0, 3199.0).unwrap(), &[]).unwrap();
        assert_eq!(ids(&out), vec!["1"]);
    }

    #[test]
    fn test_spend_range_validation() {
        assert!(SpendRange::new(10.0, 5.0).is_err());
        assert!(SpendRange::new(f64::NAN, 5.0).is_err());
        assert!(SpendRange::new(5.0, 5.0).unwrap().contains(5.0));
    }

    #[test]
    fn test_string_operators() {
        let ads = sample();
        let first = &ads[0];
        assert!(apply_condition(first, &compiled("name", "is", "summer collection video")));
        assert!(!apply_condition(first, &compiled("name", "is_not", "SUMMER COLLECTION VIDEO")));
        assert!(apply_condition(first, &compiled("name", "contains", "collect")));
        assert!(apply_condition(first, &compiled("name", "not_contains", "holiday")));
        assert!(apply_condition(first, &compiled("status", "is", "Active")));
        // numbers compare through their natural text form
        assert!(apply_condition(first, &compiled("ctr", "is", "2.6")));
        assert!(apply_condition(first, &compiled("spend", "contains", "245")));
    }

    #[test]
    fn test_numeric_operators() {
        let ads = sample();
        assert!(apply_condition(&ads[2], &compiled("ctr", "greater_than", "2.9")));
        assert!(!apply_condition(&ads[2], &compiled("ctr", "less_than", "3")));
        assert!(apply_condition(&ads[1], &compiled("spend", "less_than", "1890.5")));
        // non-numeric never compares
        assert!(!apply_condition(&ads[0], &compiled("name", "greater_than", "1")));
        assert!(!apply_condition(&ads[0], &compiled("ctr", "greater_than", "abc")));
        assert!(!apply_condition(&ads[0], &compiled("ctr", "less_than", "abc")));
    }

    #[test]
    fn test_infinity_text_is_not_a_number() {
        let ads = sample();
        for value in ["inf", "infinity", "-inf", "NaN"] {
            assert!(!apply_condition(&ads[0], &compiled("ctr", "less_than", value)));
            assert!(!apply_condition(&ads[0], &compiled("ctr", "greater_than", value)));
        }
        assert!(apply_condition(&ads[0], &compiled("ctr", "less_than", "1e3")));
    }

    #[test]
    fn test_missing_field_fails_closed() {
        let ads = sample();
        let holiday = &ads[3];
        for op in ["is", "is_not", "contains", "not_contains", "greater_than", "less_than"] {
            assert!(
                !apply_condition(holiday, &compiled("ctr", op, "1")),
                "operator {} should fail on a missing field",
                op
            );
        }
    }

    #[test]
    fn test_unrecognized_operator_passes() {
        let ads = sample();
        let c = compiled("ctr", "between", "1");
        assert_eq!(c.operator, Operator::Unrecognized("between".to_string()));
        assert!(apply_condition(&ads[0], &c));
    }

    #[test]
    fn test_inert_condition_compiles_to_none() {
        assert!(FilterCondition::new("", "is", "x").compile().unwrap().is_none());
        assert!(FilterCondition::new("name", "", "x").compile().unwrap().is_none());
        assert!(FilterCondition::new("name", "is", "").compile().unwrap().is_none());
        // inert conditions never reach field resolution
        assert!(FilterCondition::new("adsetName", "is", "").compile().unwrap().is_none());
    }

    #[test]
    fn test_unknown_field_is_an_error() {
        let err = FilterCondition::new("adsetName", "is", "x").compile().unwrap_err();
        assert!(matches!(err, Error::UnknownField(_)));
    }

    #[test]
    fn test_conditions_are_anded() {
        let ads = sample();
        let by_name = FilterCondition::new("name", "contains", "brand");
        let by_ctr = FilterCondition::new("ctr", "greater_than", "2.55");

        let only_name = filter_ads(&ads, "", "all", SpendRange::unbounded(), &[by_name.clone()]).unwrap();
        let only_ctr = filter_ads(&ads, "", "all", SpendRange::unbounded(), &[by_ctr.clone()]).unwrap();
        assert_eq!(ids(&only_name), vec!["2"]);
        assert_eq!(ids(&only_ctr), vec!["1", "3"]);

        let both = filter_ads(&ads, "", "all", SpendRange::unbounded(), &[by_name, by_ctr]).unwrap();
        assert!(both.is_empty());
    }

    #[test]
    fn test_filter_preserves_order() {
        let ads = sample();
        let filter = AdFilter::new("o", "all", SpendRange::unbounded(), &[]).unwrap();
        let out = filter.apply(&ads);
        let positions: Vec<_> = out
            .iter()
            .map(|a| ads.iter().position(|b| b.id == a.id).unwrap())
            .collect();
        let mut sorted = positions.clone();
        sorted.sort();
        assert_eq!(positions, sorted);
    }

    #[test]
    fn test_parse_condition_text() {
        let c: FilterCondition = "name contains Summer Sale".parse().unwrap();
        assert_eq!(c.field, "name");
        assert_eq!(c.operator, "contains");
        assert_eq!(c.value, "Summer Sale");
        assert!("name".parse::<FilterCondition>().is_err());
    }

    #[test]
    fn test_condition_ids_are_unique() {
        let a = FilterCondition::new("name", "is", "x");
        let b = FilterCondition::new("name", "is", "x");
        assert_ne!(a.id, b.id);
    }
}
