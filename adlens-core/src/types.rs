//! Core domain types for adlens
//!
//! These types model one ad account's creatives as the listing pages see them.
//!
//! ## Terminology
//!
//! | Term | Definition |
//! |------|------------|
//! | **Account** | An advertising account; owns video and static ads |
//! | **Ad** | One creative with a performance snapshot ([`AdRecord`]) |
//! | **Field** | A named attribute of an ad, addressed through [`AdField`] |
//! | **Metric** | A numeric field the tables can show as a column |
//!
//! Optional numeric fields are `None` when the ad type does not report them. They are
//! rendered as "N/A" and are never folded into aggregates as zero.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

// ============================================
// Ad type and status
// ============================================

/// Creative format of an ad; decides which metrics are offered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdType {
    Video,
    Static,
}

impl AdType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdType::Video => "video",
            AdType::Static => "static",
        }
    }

    /// Returns the display name used in page headings
    pub fn display_name(&self) -> &'static str {
        match self {
            AdType::Video => "Video Ads",
            AdType::Static => "Static Ads",
        }
    }
}

impl fmt::Display for AdType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AdType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "video" => Ok(AdType::Video),
            "static" => Ok(AdType::Static),
            _ => Err(Error::InvalidFilter(format!("unknown ad type: {}", s))),
        }
    }
}

/// Delivery status of an ad
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdStatus {
    Active,
    Paused,
    Completed,
}

impl AdStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdStatus::Active => "active",
            AdStatus::Paused => "paused",
            AdStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for AdStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AdStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "active" => Ok(AdStatus::Active),
            "paused" => Ok(AdStatus::Paused),
            "completed" => Ok(AdStatus::Completed),
            _ => Err(Error::InvalidFilter(format!("unknown status: {}", s))),
        }
    }
}

// ============================================
// Ad record
// ============================================

/// One advertising creative's performance snapshot.
///
/// `spend` is always present and non-negative (see [`AdRecord::validate`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdRecord {
    /// Unique within a collection
    pub id: String,
    pub name: String,
    pub status: AdStatus,
    /// Amount spent, in currency units
    pub spend: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_installs: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_per_app_install: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purchases: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_per_purchase: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impressions: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clicks: Option<f64>,
    /// Click-through rate, already in percent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ctr: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpm: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reach: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<f64>,

    // Video-only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_views: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_view_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub watch_time: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_rate: Option<f64>,

    // Display-only details
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_to_action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engagement_time: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub likes: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shares: Option<f64>,
}

impl AdRecord {
    /// Create a record with only the required attributes set.
    pub fn new(id: impl Into<String>, name: impl Into<String>, status: AdStatus, spend: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            status,
            spend,
            app_installs: None,
            cost_per_app_install: None,
            purchases: None,
            cost_per_purchase: None,
            impressions: None,
            clicks: None,
            ctr: None,
            cpm: None,
            reach: None,
            frequency: None,
            video_views: None,
            video_view_rate: None,
            watch_time: None,
            completion_rate: None,
            video_url: None,
            script: None,
            call_to_action: None,
            engagement_time: None,
            likes: None,
            comments: None,
            shares: None,
        }
    }

    /// Set a numeric field. Text fields are left untouched.
    pub fn with_metric(mut self, field: AdField, value: f64) -> Self {
        if field == AdField::Spend {
            self.spend = value;
        } else if let Some(slot) = self.optional_number_mut(field) {
            *slot = Some(value);
        }
        self
    }

    /// Read a field through the explicit field enum.
    ///
    /// Returns `None` when an optional field is absent on this ad.
    pub fn field(&self, field: AdField) -> Option<FieldValue<'_>> {
        match field {
            AdField::Id => Some(FieldValue::Text(&self.id)),
            AdField::Name => Some(FieldValue::Text(&self.name)),
            AdField::Status => Some(FieldValue::Text(self.status.as_str())),
            AdField::VideoUrl => self.video_url.as_deref().map(FieldValue::Text),
            AdField::Script => self.script.as_deref().map(FieldValue::Text),
            AdField::CallToAction => self.call_to_action.as_deref().map(FieldValue::Text),
            numeric => self.number(numeric).map(FieldValue::Number),
        }
    }

    /// Read a numeric field; text fields and absent values yield `None`.
    pub fn number(&self, field: AdField) -> Option<f64> {
        match field {
            AdField::Spend => Some(self.spend),
            AdField::AppInstalls => self.app_installs,
            AdField::CostPerAppInstall => self.cost_per_app_install,
            AdField::Purchases => self.purchases,
            AdField::CostPerPurchase => self.cost_per_purchase,
            AdField::Impressions => self.impressions,
            AdField::Clicks => self.clicks,
            AdField::Ctr => self.ctr,
            AdField::Cpm => self.cpm,
            AdField::Reach => self.reach,
            AdField::Frequency => self.frequency,
            AdField::VideoViews => self.video_views,
            AdField::VideoViewRate => self.video_view_rate,
            AdField::WatchTime => self.watch_time,
            AdField::CompletionRate => self.completion_rate,
            AdField::EngagementTime => self.engagement_time,
            AdField::Likes => self.likes,
            AdField::Comments => self.comments,
            AdField::Shares => self.shares,
            AdField::Id
            | AdField::Name
            | AdField::Status
            | AdField::VideoUrl
            | AdField::Script
            | AdField::CallToAction => None,
        }
    }

    fn optional_number_mut(&mut self, field: AdField) -> Option<&mut Option<f64>> {
        let slot = match field {
            AdField::AppInstalls => &mut self.app_installs,
            AdField::CostPerAppInstall => &mut self.cost_per_app_install,
            AdField::Purchases => &mut self.purchases,
            AdField::CostPerPurchase => &mut self.cost_per_purchase,
            AdField::Impressions => &mut self.impressions,
            AdField::Clicks => &mut self.clicks,
            AdField::Ctr => &mut self.ctr,
            AdField::Cpm => &mut self.cpm,
            AdField::Reach => &mut self.reach,
            AdField::Frequency => &mut self.frequency,
            AdField::VideoViews => &mut self.video_views,
            AdField::VideoViewRate => &mut self.video_view_rate,
            AdField::WatchTime => &mut self.watch_time,
            AdField::CompletionRate => &mut self.completion_rate,
            AdField::EngagementTime => &mut self.engagement_time,
            AdField::Likes => &mut self.likes,
            AdField::Comments => &mut self.comments,
            AdField::Shares => &mut self.shares,
            _ => return None,
        };
        Some(slot)
    }

    /// Check the record invariants: non-empty id and finite, non-negative spend.
    pub fn validate(&self) -> Result<()> {
        if self.id.is_empty() {
            return Err(Error::InvalidRecord {
                id: self.name.clone(),
                message: "id must not be empty".to_string(),
            });
        }
        if !self.spend.is_finite() || self.spend < 0.0 {
            return Err(Error::InvalidRecord {
                id: self.id.clone(),
                message: format!("spend must be a non-negative number, got {}", self.spend),
            });
        }
        Ok(())
    }
}

/// Validate every record and require ids to be unique within the collection.
pub fn validate_collection(ads: &[AdRecord]) -> Result<()> {
    let mut seen = HashSet::with_capacity(ads.len());
    for ad in ads {
        ad.validate()?;
        if !seen.insert(ad.id.as_str()) {
            return Err(Error::InvalidRecord {
                id: ad.id.clone(),
                message: "duplicate id in collection".to_string(),
            });
        }
    }
    Ok(())
}

// ============================================
// Field addressing
// ============================================

/// A value read from an [`AdRecord`] field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    Number(f64),
}

impl fmt::Display for FieldValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => write!(f, "{}", s),
            FieldValue::Number(n) => write!(f, "{}", n),
        }
    }
}

/// Every addressable attribute of an [`AdRecord`].
///
/// Filter conditions and metric ids resolve to this enum at the boundary, so an
/// unknown name is reported once instead of silently reading nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AdField {
    Id,
    Name,
    Status,
    Spend,
    AppInstalls,
    CostPerAppInstall,
    Purchases,
    CostPerPurchase,
    Impressions,
    Clicks,
    Ctr,
    Cpm,
    Reach,
    Frequency,
    VideoViews,
    VideoViewRate,
    WatchTime,
    CompletionRate,
    VideoUrl,
    Script,
    CallToAction,
    EngagementTime,
    Likes,
    Comments,
    Shares,
}

impl AdField {
    pub const ALL: [AdField; 25] = [
        AdField::Id,
        AdField::Name,
        AdField::Status,
        AdField::Spend,
        AdField::AppInstalls,
        AdField::CostPerAppInstall,
        AdField::Purchases,
        AdField::CostPerPurchase,
        AdField::Impressions,
        AdField::Clicks,
        AdField::Ctr,
        AdField::Cpm,
        AdField::Reach,
        AdField::Frequency,
        AdField::VideoViews,
        AdField::VideoViewRate,
        AdField::WatchTime,
        AdField::CompletionRate,
        AdField::VideoUrl,
        AdField::Script,
        AdField::CallToAction,
        AdField::EngagementTime,
        AdField::Likes,
        AdField::Comments,
        AdField::Shares,
    ];

    /// Returns the record key for this field (camelCase, as in the data files)
    pub fn as_str(&self) -> &'static str {
        match self {
            AdField::Id => "id",
            AdField::Name => "name",
            AdField::Status => "status",
            AdField::Spend => "spend",
            AdField::AppInstalls => "appInstalls",
            AdField::CostPerAppInstall => "costPerAppInstall",
            AdField::Purchases => "purchases",
            AdField::CostPerPurchase => "costPerPurchase",
            AdField::Impressions => "impressions",
            AdField::Clicks => "clicks",
            AdField::Ctr => "ctr",
            AdField::Cpm => "cpm",
            AdField::Reach => "reach",
            AdField::Frequency => "frequency",
            AdField::VideoViews => "videoViews",
            AdField::VideoViewRate => "videoViewRate",
            AdField::WatchTime => "watchTime",
            AdField::CompletionRate => "completionRate",
            AdField::VideoUrl => "videoUrl",
            AdField::Script => "script",
            AdField::CallToAction => "callToAction",
            AdField::EngagementTime => "engagementTime",
            AdField::Likes => "likes",
            AdField::Comments => "comments",
            AdField::Shares => "shares",
        }
    }

    /// Whether the field holds a number rather than text
    pub fn is_numeric(&self) -> bool {
        !matches!(
            self,
            AdField::Id
                | AdField::Name
                | AdField::Status
                | AdField::VideoUrl
                | AdField::Script
                | AdField::CallToAction
        )
    }
}

impl fmt::Display for AdField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AdField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        AdField::ALL
            .iter()
            .copied()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| Error::UnknownField(s.to_string()))
    }
}
