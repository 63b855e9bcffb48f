//! Sentiment labels and the keyword-based placeholder analyzer.
//!
//! The label of a post is never stored on its own: it is always derived from
//! the score through [`SentimentLabel::from_score`].

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Scores strictly above this are positive
pub const POSITIVE_THRESHOLD: f64 = 0.6;
/// Scores strictly below this are negative
pub const NEGATIVE_THRESHOLD: f64 = 0.4;

const POSITIVE_WORDS: &[&str] = &[
    "great",
    "amazing",
    "love",
    "excellent",
    "fantastic",
    "bullish",
    "impressed",
    "exciting",
];

const NEGATIVE_WORDS: &[&str] = &[
    "bad",
    "terrible",
    "hate",
    "awful",
    "disappointing",
    "bearish",
    "concerns",
    "issues",
];

/// Sentiment label type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

impl SentimentLabel {
    /// All labels, in display order
    pub const ALL: [SentimentLabel; 3] = [
        SentimentLabel::Positive,
        SentimentLabel::Neutral,
        SentimentLabel::Negative,
    ];

    /// Derive a label from a score: > 0.6 positive, < 0.4 negative, otherwise neutral
    pub fn from_score(score: f64) -> Self {
        if score > POSITIVE_THRESHOLD {
            SentimentLabel::Positive
        } else if score < NEGATIVE_THRESHOLD {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "positive",
            SentimentLabel::Neutral => "neutral",
            SentimentLabel::Negative => "negative",
        }
    }

    /// Capitalized name, used for chart buckets and summaries
    pub fn display_name(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "Positive",
            SentimentLabel::Neutral => "Neutral",
            SentimentLabel::Negative => "Negative",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "😊",
            SentimentLabel::Neutral => "😐",
            SentimentLabel::Negative => "😞",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SentimentLabel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "positive" => Ok(SentimentLabel::Positive),
            "neutral" => Ok(SentimentLabel::Neutral),
            "negative" => Ok(SentimentLabel::Negative),
            _ => Err(Error::UnknownVariant {
                kind: "sentiment label",
                value: s.to_string(),
                allowed: "positive, neutral, negative",
            }),
        }
    }
}

/// Check that a score is usable as a sentiment score
pub fn validate_score(score: f64) -> Result<f64> {
    if score.is_finite() && (0.0..=1.0).contains(&score) {
        Ok(score)
    } else {
        Err(Error::InvalidSentimentScore(score))
    }
}

/// Result of running the keyword analyzer over a text
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Analysis {
    pub score: f64,
    pub label: SentimentLabel,
}

/// Placeholder sentiment analysis.
///
/// Every space-separated word starts from a neutral 0.5 baseline and moves the
/// score by 0.1 when it contains a positive or negative keyword. The result is
/// clamped to [0, 1].
pub fn analyze(text: &str) -> Analysis {
    let lowered = text.to_lowercase();
    let mut net: i32 = 0;

    for word in lowered.split(' ') {
        if POSITIVE_WORDS.iter().any(|pos| word.contains(pos)) {
            net += 1;
        }
        if NEGATIVE_WORDS.iter().any(|neg| word.contains(neg)) {
            net -= 1;
        }
    }

    let score = (0.5 + 0.1 * f64::from(net)).clamp(0.0, 1.0);

    Analysis {
        score,
        label: SentimentLabel::from_score(score),
    }
}
