//! Conjunctive post filtering by date range, sentiment and engagement.
//!
//! All three tests must pass for a post to be kept. Inverted bounds
//! (`start > end`, `min > max`) are not rejected; they simply match nothing.

use crate::error::{Error, Result};
use crate::sentiment::SentimentLabel;
use crate::types::{parse_timestamp, Post};
use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};
use std::fmt;
use std::str::FromStr;

/// Filter result indicating whether a post should be kept
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterResult {
    Keep,
    FilterOut,
}

/// Filter trait for filtering posts
pub trait PostFilter {
    fn should_keep(&self, post: &Post) -> FilterResult;
}

/// Inclusive range of instants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// Last representable instant of `date`
fn end_of_day(date: NaiveDate) -> Option<DateTime<Utc>> {
    date.and_hms_nano_opt(23, 59, 59, 999_999_999).map(|dt| dt.and_utc())
}

fn parse_day(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

impl DateRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Calendar-day range: from the first instant of `start` to the last instant of `end` (UTC)
    pub fn days(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start: start_of_day(start),
            end: end_of_day(end).unwrap_or(DateTime::<Utc>::MAX_UTC),
        }
    }

    /// The `days` calendar days ending with `today`, inclusive of both ends
    pub fn last_days(days: u32, today: NaiveDate) -> Self {
        let start = today
            .checked_sub_days(Days::new(u64::from(days)))
            .unwrap_or(NaiveDate::MIN);
        Self::days(start, today)
    }

    /// Parse bounds given either as `YYYY-MM-DD` days or as RFC 3339 instants
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        Ok(Self {
            start: parse_start_bound(start)?,
            end: parse_end_bound(end)?,
        })
    }

    pub fn contains(&self, timestamp: DateTime<Utc>) -> bool {
        self.start <= timestamp && timestamp <= self.end
    }
}

/// Parse a range start: a bare day means its first instant
pub fn parse_start_bound(s: &str) -> Result<DateTime<Utc>> {
    match parse_day(s) {
        Some(day) => Ok(start_of_day(day)),
        None => parse_timestamp(s),
    }
}

/// Parse a range end: a bare day means its last instant
pub fn parse_end_bound(s: &str) -> Result<DateTime<Utc>> {
    match parse_day(s) {
        Some(day) => end_of_day(day).ok_or_else(|| Error::InvalidTimestamp(s.to_string())),
        None => parse_timestamp(s),
    }
}

/// Sentiment selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SentimentFilter {
    #[default]
    All,
    Only(SentimentLabel),
}

impl SentimentFilter {
    pub fn accepts(&self, label: SentimentLabel) -> bool {
        match self {
            SentimentFilter::All => true,
            SentimentFilter::Only(wanted) => *wanted == label,
        }
    }
}

impl fmt::Display for SentimentFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SentimentFilter::All => f.write_str("all"),
            SentimentFilter::Only(label) => write!(f, "{}", label),
        }
    }
}

impl FromStr for SentimentFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(SentimentFilter::All);
        }
        s.parse::<SentimentLabel>()
            .map(SentimentFilter::Only)
            .map_err(|_| Error::UnknownVariant {
                kind: "sentiment filter",
                value: s.to_string(),
                allowed: "all, positive, neutral, negative",
            })
    }
}

/// Inclusive range over combined engagement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngagementRange {
    pub min: u64,
    pub max: u64,
}

impl EngagementRange {
    pub fn new(min: u64, max: u64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, engagement: u64) -> bool {
        self.min <= engagement && engagement <= self.max
    }
}

impl Default for EngagementRange {
    fn default() -> Self {
        Self { min: 0, max: 10_000 }
    }
}

/// Filter criteria applied to a post collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterCriteria {
    pub date_range: DateRange,
    pub sentiment: SentimentFilter,
    pub engagement: EngagementRange,
}

impl FilterCriteria {
    /// Default criteria anchored on `today`: the last 7 days, any sentiment,
    /// engagement 0 to 10,000
    pub fn default_for(today: NaiveDate) -> Self {
        Self {
            date_range: DateRange::last_days(7, today),
            sentiment: SentimentFilter::All,
            engagement: EngagementRange::default(),
        }
    }

    pub fn with_date_range(mut self, date_range: DateRange) -> Self {
        self.date_range = date_range;
        self
    }

    pub fn with_sentiment(mut self, sentiment: SentimentFilter) -> Self {
        self.sentiment = sentiment;
        self
    }

    pub fn with_engagement(mut self, engagement: EngagementRange) -> Self {
        self.engagement = engagement;
        self
    }
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self::default_for(Utc::now().date_naive())
    }
}

impl PostFilter for FilterCriteria {
    fn should_keep(&self, post: &Post) -> FilterResult {
        if !self.date_range.contains(post.created_at()) {
            return FilterResult::FilterOut;
        }

        if !self.sentiment.accepts(post.sentiment_label()) {
            return FilterResult::FilterOut;
        }

        if !self.engagement.contains(post.engagement()) {
            return FilterResult::FilterOut;
        }

        FilterResult::Keep
    }
}

/// Check whether a single post passes all criteria
pub fn matches(post: &Post, criteria: &FilterCriteria) -> bool {
    criteria.should_keep(post) == FilterResult::Keep
}

/// Keep the posts that pass `criteria`, preserving input order
pub fn filter_all(posts: &[Post], criteria: &FilterCriteria) -> Vec<Post> {
    let kept: Vec<Post> = posts
        .iter()
        .filter(|post| matches(post, criteria))
        .cloned()
        .collect();

    tracing::debug!(total = posts.len(), kept = kept.len(), "filtered posts");
    kept
}
