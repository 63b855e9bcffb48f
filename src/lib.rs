//! Filtering, charting and export for collections of social-media posts.
//!
//! The core ([`filter`], [`chart`], [`export`]) is pure and synchronous: it
//! takes a slice of [`Post`] values and returns new data. [`mock`] supplies
//! synthetic posts and [`dashboard`] ties a search session to the core.

pub mod chart;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod export;
pub mod filter;
pub mod mock;
pub mod sentiment;
pub mod stats;
pub mod types;
pub mod view;

pub use chart::{ChartDatum, ChartMode};
pub use config::{Config, ConfigBuilder};
pub use dashboard::Dashboard;
pub use error::{Error, Result};
pub use export::ExportFormat;
pub use filter::{
    DateRange, EngagementRange, FilterCriteria, FilterResult, PostFilter, SentimentFilter,
};
pub use mock::{MockSource, PostSource};
pub use sentiment::SentimentLabel;
pub use stats::Stats;
pub use types::{Author, Post, PostBuilder};

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::chart::{ChartDatum, ChartMode};
    pub use crate::config::{Config, ConfigBuilder};
    pub use crate::dashboard::Dashboard;
    pub use crate::error::{Error, Result};
    pub use crate::export::ExportFormat;
    pub use crate::filter::{FilterCriteria, SentimentFilter};
    pub use crate::mock::{MockSource, PostSource};
    pub use crate::sentiment::SentimentLabel;
    pub use crate::types::{Author, Post};
}
