//! Synthetic post source standing in for a real search service.

use crate::error::{Error, Result};
use crate::sentiment::SentimentLabel;
use crate::types::{Author, Post};
use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};

/// Default number of posts returned per search
pub const DEFAULT_COUNT: usize = 25;

/// Posts are spread over this many days before the anchor instant
const WINDOW_DAYS: i64 = 7;

const AUTHORS: [(&str, &str); 8] = [
    ("Alex Chen", "alexchen_dev"),
    ("Sarah Johnson", "sarahj_crypto"),
    ("Mike Rodriguez", "mike_blockchain"),
    ("Emma Wilson", "emmaw_defi"),
    ("David Kim", "davidk_web3"),
    ("Lisa Zhang", "lisaz_nft"),
    ("Tom Anderson", "toma_crypto"),
    ("Rachel Green", "rachelg_dao"),
];

const TEMPLATES: [&str; 10] = [
    "Just discovered {q} and I'm impressed by the innovation! 🚀",
    "{q} is changing the game in ways we never imagined. Bullish! 📈",
    "Not sure about {q} yet. Need to see more real-world adoption. 🤔",
    "{q} has some interesting use cases, but the market is still volatile. ⚠️",
    "The technology behind {q} is fascinating. Great potential ahead! 💡",
    "{q} community is growing strong. Love the engagement! 💪",
    "Concerns about {q} scalability issues. Hope they address this soon. 🔧",
    "{q} partnership announcements are exciting! Big things coming. 🤝",
    "{q} price action is wild today. HODL or sell? 🎢",
    "Research shows {q} adoption is accelerating. Interesting trends! 📊",
];

/// Anything that can answer a search query with posts
pub trait PostSource {
    fn search(&mut self, query: &str) -> Result<Vec<Post>>;
}

/// Generates plausible posts for any query
#[derive(Debug, Clone)]
pub struct MockSource {
    rng: StdRng,
    count: usize,
    as_of: Option<DateTime<Utc>>,
    latency: std::time::Duration,
}

impl MockSource {
    /// Source seeded from the OS, anchored on the current time
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_os_rng())
    }

    /// Reproducible source: the same seed, anchor and count always yield the same posts
    pub fn seeded(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            rng,
            count: DEFAULT_COUNT,
            as_of: None,
            latency: std::time::Duration::ZERO,
        }
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    /// Anchor generated timestamps on a fixed instant instead of "now"
    pub fn with_as_of(mut self, as_of: DateTime<Utc>) -> Self {
        self.as_of = Some(as_of);
        self
    }

    /// Delay applied by [`MockSource::search_with_latency`]
    pub fn with_latency(mut self, latency: std::time::Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Search after the configured simulated network delay
    pub async fn search_with_latency(&mut self, query: &str) -> Result<Vec<Post>> {
        if !self.latency.is_zero() {
            tracing::debug!(
                latency_ms = self.latency.as_millis() as u64,
                "simulating search latency"
            );
            tokio::time::sleep(self.latency).await;
        }
        self.search(query)
    }

    fn generate_post(&mut self, query: &str, index: usize, as_of: DateTime<Utc>) -> Result<Post> {
        let (name, username) = *AUTHORS.choose(&mut self.rng).unwrap_or(&AUTHORS[0]);
        let template = *TEMPLATES.choose(&mut self.rng).unwrap_or(&TEMPLATES[0]);
        let label = *SentimentLabel::ALL
            .choose(&mut self.rng)
            .unwrap_or(&SentimentLabel::Neutral);

        let base = f64::from(self.rng.random_range(0..1000u32));
        let multiplier = match label {
            SentimentLabel::Positive => 1.5,
            SentimentLabel::Neutral => 1.0,
            SentimentLabel::Negative => 0.7,
        };
        let scaled = base * multiplier;

        let likes = (scaled * self.rng.random::<f64>()).floor() as u64;
        let reposts = (scaled * 0.3 * self.rng.random::<f64>()).floor() as u64;
        let replies = (scaled * 0.2 * self.rng.random::<f64>()).floor() as u64;

        // Scores stay inside the label's band so the derived label matches
        let score = match label {
            SentimentLabel::Positive => 0.7 + self.rng.random::<f64>() * 0.3,
            SentimentLabel::Neutral => 0.4 + self.rng.random::<f64>() * 0.2,
            SentimentLabel::Negative => self.rng.random::<f64>() * 0.3,
        };

        let window_ms = WINDOW_DAYS * 24 * 60 * 60 * 1000;
        let offset_ms = self.rng.random_range(0..window_ms);
        let created_at = as_of - Duration::milliseconds(offset_ms);

        Post::builder(format!("tweet_{}_{}", as_of.timestamp_millis(), index), created_at)
            .text(template.replace("{q}", query))
            .author(Author::new(format!("user_{}", username), name, username))
            .likes(likes)
            .reposts(reposts)
            .replies(replies)
            .sentiment_score(score)
            .build()
    }
}

impl Default for MockSource {
    fn default() -> Self {
        Self::new()
    }
}

impl PostSource for MockSource {
    fn search(&mut self, query: &str) -> Result<Vec<Post>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(Error::EmptyQuery);
        }

        let as_of = self.as_of.unwrap_or_else(Utc::now);
        let posts = (0..self.count)
            .map(|i| self.generate_post(query, i, as_of))
            .collect::<Result<Vec<_>>>()?;

        tracing::info!(query, count = posts.len(), "generated mock posts");
        Ok(posts)
    }
}
