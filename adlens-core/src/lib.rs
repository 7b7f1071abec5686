//! # adlens-core
//!
//! Core library for adlens - ad account analytics for video and static creatives.
//!
//! This library provides:
//! - Domain types for ads, fields and metrics
//! - Ad filtering for listing pages
//! - Selection-driven analysis (rows, columns, cells)
//! - A templated chat assistant with a cancellable deferred reply
//! - Value formatting, configuration and logging infrastructure
//!
//! ## Architecture
//!
//! Data flows through a single pass per user action:
//! - **Provider:** an [`AdProvider`] loads an account's ads
//! - **Listing:** [`AdListing`] filters them into the visible set
//! - **Analysis:** a [`Selection`] of the visible data becomes an [`AnalysisResult`]
//!
//! ## Example
//!
//! ```rust
//! use adlens_core::{analyze, AdListing, AdType, Config, SeedProvider};
//!
//! let config = Config::default();
//! let mut listing = AdListing::load(&SeedProvider, "1", AdType::Video, &config.filter)
//!     .expect("seed account loads");
//! listing.set_status_filter("active").expect("valid status");
//!
//! let result = analyze(&listing.analyze_selected(), &config.analysis);
//! assert_eq!(result.insights.len(), 4);
//! ```

// Re-export commonly used items at the crate root
pub use analytics::{analyze, AnalysisResult, Insight};
pub use chat::{ChatMessage, ChatRole, ChatSession};
pub use config::Config;
pub use error::{Error, Result};
pub use filter::{filter_ads, AdFilter, FilterCondition, SpendRange, StatusFilter};
pub use listing::AdListing;
pub use metrics_registry::{MetricDescriptor, MetricFormat};
pub use provider::{AdProvider, DirectoryProvider, SeedProvider};
pub use selection::{SelectedCell, Selection, SelectionKind};
pub use types::*;

// Public modules
pub mod analytics;
pub mod chat;
pub mod config;
pub mod error;
pub mod filter;
pub mod format;
pub mod listing;
pub mod logging;
pub mod metrics_registry;
pub mod provider;
pub mod selection;
pub mod types;
