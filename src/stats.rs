use crate::sentiment::SentimentLabel;
use crate::types::Post;
use serde::Serialize;

/// Summary totals over a post collection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stats {
    pub total_posts: usize,
    pub total_likes: u64,
    pub total_reposts: u64,
    pub total_replies: u64,
    /// Mean sentiment score, `None` when there are no posts
    pub average_sentiment: Option<f64>,
}

impl Stats {
    pub fn from_posts(posts: &[Post]) -> Self {
        let sum = |count: fn(&Post) -> u64| posts.iter().map(count).fold(0u64, u64::saturating_add);

        let average_sentiment = if posts.is_empty() {
            None
        } else {
            let total: f64 = posts.iter().map(Post::sentiment_score).sum();
            Some(total / posts.len() as f64)
        };

        Self {
            total_posts: posts.len(),
            total_likes: sum(Post::like_count),
            total_reposts: sum(Post::repost_count),
            total_replies: sum(Post::reply_count),
            average_sentiment,
        }
    }

    /// Label of the average score, using the same thresholds as single posts
    pub fn average_label(&self) -> Option<SentimentLabel> {
        self.average_sentiment.map(SentimentLabel::from_score)
    }
}

/// Compact count formatting: `1.2M`, `3.4K`, or the plain number below 1000
pub fn format_number(n: u64) -> String {
    if n >= 1_000_000 {
        format!("{:.1}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.1}K", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}
