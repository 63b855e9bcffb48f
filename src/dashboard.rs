use crate::chart::{self, ChartDatum, ChartMode};
use crate::error::Result;
use crate::export::{self, ExportFormat};
use crate::filter::{self, FilterCriteria};
use crate::mock::PostSource;
use crate::stats::Stats;
use crate::types::Post;

/// A browsing session: the posts of the latest search plus the current filters.
///
/// Every view (listing, chart, export, stats) is computed from the filtered
/// posts on demand; nothing derived is cached.
#[derive(Debug, Clone)]
pub struct Dashboard {
    query: Option<String>,
    posts: Vec<Post>,
    criteria: FilterCriteria,
}

impl Dashboard {
    /// Create an empty session with the given filters
    pub fn new(criteria: FilterCriteria) -> Self {
        Self {
            query: None,
            posts: Vec::new(),
            criteria,
        }
    }

    /// Run a search and replace the current posts with its results
    pub fn load<S: PostSource>(&mut self, source: &mut S, query: &str) -> Result<usize> {
        let posts = source.search(query)?;
        Ok(self.replace(query, posts))
    }

    /// Replace the current posts, e.g. with results fetched elsewhere
    pub fn replace(&mut self, query: &str, posts: Vec<Post>) -> usize {
        tracing::debug!(query, count = posts.len(), "replacing session posts");
        self.query = Some(query.trim().to_string());
        self.posts = posts;
        self.posts.len()
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// All posts of the latest search, unfiltered
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn set_criteria(&mut self, criteria: FilterCriteria) {
        self.criteria = criteria;
    }

    /// Posts passing the current filters, in search order
    pub fn filtered(&self) -> Vec<Post> {
        filter::filter_all(&self.posts, &self.criteria)
    }

    pub fn chart(&self, mode: ChartMode) -> Vec<ChartDatum> {
        chart::aggregate(mode, &self.filtered())
    }

    pub fn export(&self, format: ExportFormat) -> Result<String> {
        export::encode(format, &self.filtered())
    }

    pub fn stats(&self) -> Stats {
        Stats::from_posts(&self.filtered())
    }
}
