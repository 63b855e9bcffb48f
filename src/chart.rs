//! Chart data aggregation over a post collection.
//!
//! Every mode returns an empty sequence for an empty input, which the view
//! layer renders as "no data".

use crate::error::{Error, Result};
use crate::sentiment::SentimentLabel;
use crate::types::Post;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// A named, valued bucket produced for visualization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartDatum {
    pub name: String,
    pub value: u64,
    #[serde(rename = "sortKey", default, skip_serializing_if = "Option::is_none")]
    pub sort_key: Option<String>,
}

impl ChartDatum {
    pub fn new(name: impl Into<String>, value: u64) -> Self {
        Self {
            name: name.into(),
            value,
            sort_key: None,
        }
    }

    pub fn with_sort_key(mut self, key: impl Into<String>) -> Self {
        self.sort_key = Some(key.into());
        self
    }
}

/// Aggregation mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartMode {
    #[default]
    EngagementHistogram,
    SentimentDistribution,
    DailyVolume,
}

impl ChartMode {
    pub const ALL: [ChartMode; 3] = [
        ChartMode::EngagementHistogram,
        ChartMode::SentimentDistribution,
        ChartMode::DailyVolume,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChartMode::EngagementHistogram => "histogram",
            ChartMode::SentimentDistribution => "sentiment",
            ChartMode::DailyVolume => "volume",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ChartMode::EngagementHistogram => "Engagement Distribution",
            ChartMode::SentimentDistribution => "Sentiment Distribution",
            ChartMode::DailyVolume => "Tweet Volume Over Time",
        }
    }
}

impl fmt::Display for ChartMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "histogram" | "engagement" | "bar" => Ok(ChartMode::EngagementHistogram),
            "sentiment" | "pie" => Ok(ChartMode::SentimentDistribution),
            "volume" | "daily" | "line" => Ok(ChartMode::DailyVolume),
            _ => Err(Error::UnknownVariant {
                kind: "chart mode",
                value: s.to_string(),
                allowed: "histogram, sentiment, volume",
            }),
        }
    }
}

/// Engagement bucket with inclusive bounds; `max: None` is unbounded
struct Bucket {
    name: &'static str,
    min: u64,
    max: Option<u64>,
}

const BUCKET_COUNT: usize = 5;

const ENGAGEMENT_BUCKETS: [Bucket; BUCKET_COUNT] = [
    Bucket {
        name: "0-10",
        min: 0,
        max: Some(10),
    },
    Bucket {
        name: "11-50",
        min: 11,
        max: Some(50),
    },
    Bucket {
        name: "51-100",
        min: 51,
        max: Some(100),
    },
    Bucket {
        name: "101-500",
        min: 101,
        max: Some(500),
    },
    Bucket {
        name: "500+",
        min: 501,
        max: None,
    },
];

impl Bucket {
    fn contains(&self, engagement: u64) -> bool {
        engagement >= self.min && self.max.map_or(true, |max| engagement <= max)
    }
}

/// Run the aggregation for `mode`
pub fn aggregate(mode: ChartMode, posts: &[Post]) -> Vec<ChartDatum> {
    let data = match mode {
        ChartMode::EngagementHistogram => engagement_histogram(posts),
        ChartMode::SentimentDistribution => sentiment_distribution(posts),
        ChartMode::DailyVolume => daily_volume(posts),
    };
    tracing::debug!(
        mode = %mode,
        posts = posts.len(),
        buckets = data.len(),
        "aggregated chart data"
    );
    data
}

/// Count posts per engagement bucket: 0-10, 11-50, 51-100, 101-500, 500+.
/// Non-empty input always yields all five buckets in that order.
pub fn engagement_histogram(posts: &[Post]) -> Vec<ChartDatum> {
    if posts.is_empty() {
        return Vec::new();
    }

    let mut counts = [0u64; BUCKET_COUNT];
    for post in posts {
        let engagement = post.engagement();
        if let Some(idx) = ENGAGEMENT_BUCKETS
            .iter()
            .position(|b| b.contains(engagement))
        {
            counts[idx] += 1;
        }
    }

    ENGAGEMENT_BUCKETS
        .iter()
        .zip(counts)
        .map(|(bucket, count)| ChartDatum::new(bucket.name, count))
        .collect()
}

/// Count posts per sentiment label, in the fixed order positive, neutral,
/// negative. Labels without posts are omitted.
pub fn sentiment_distribution(posts: &[Post]) -> Vec<ChartDatum> {
    let mut counts: BTreeMap<SentimentLabel, u64> = BTreeMap::new();
    for post in posts {
        *counts.entry(post.sentiment_label()).or_insert(0) += 1;
    }

    SentimentLabel::ALL
        .iter()
        .filter_map(|label| {
            counts
                .get(label)
                .map(|count| ChartDatum::new(label.display_name(), *count))
        })
        .collect()
}

/// Display label for a day key, e.g. `3/4/2025`
pub fn day_label(day: NaiveDate) -> String {
    day.format("%-m/%-d/%Y").to_string()
}

/// Count posts per UTC calendar day, ascending by day.
///
/// The ISO date is the grouping and sort key; `name` is only a display label.
pub fn daily_volume(posts: &[Post]) -> Vec<ChartDatum> {
    let mut counts: BTreeMap<NaiveDate, u64> = BTreeMap::new();
    for post in posts {
        *counts.entry(post.created_at().date_naive()).or_insert(0) += 1;
    }

    counts
        .into_iter()
        .map(|(day, count)| {
            ChartDatum::new(day_label(day), count)
                .with_sort_key(day.format("%Y-%m-%d").to_string())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn post_with(engagement: u64, score: f64, day: u32, hour: u32) -> Post {
        Post::builder(
            format!("p{}-{}-{}", engagement, day, hour),
            Utc.with_ymd_and_hms(2025, 3, day, hour, 0, 0).unwrap(),
        )
        .likes(engagement)
        .sentiment_score(score)
        .build()
        .unwrap()
    }

    fn values(data: &[ChartDatum]) -> Vec<(&str, u64)> {
        data.iter().map(|d| (d.name.as_str(), d.value)).collect()
    }

    #[test]
    fn test_histogram_scenario() {
        let mut posts = Vec::new();
        posts.extend((0..5).map(|_| post_with(3, 0.5, 1, 0)));
        posts.extend((0..4).map(|_| post_with(50, 0.5, 1, 0)));
        posts.extend((0..3).map(|_| post_with(501, 0.5, 1, 0)));

        let data = engagement_histogram(&posts);
        assert_eq!(
            values(&data),
            vec![("0-10", 5), ("11-50", 4), ("51-100", 0), ("101-500", 0), ("500+", 3)]
        );
        assert!(data.iter().all(|d| d.sort_key.is_none()));
    }

    #[test]
    fn test_histogram_boundaries() {
        let cases = [
            (10, "0-10"),
            (11, "11-50"),
            (50, "11-50"),
            (51, "51-100"),
            (100, "51-100"),
            (101, "101-500"),
            (500, "101-500"),
            (501, "500+"),
            (u64::MAX, "500+"),
        ];

        for (engagement, expected) in cases {
            let data = engagement_histogram(&[post_with(engagement, 0.5, 1, 0)]);
            let hits: Vec<&str> = data
                .iter()
                .filter(|d| d.value == 1)
                .map(|d| d.name.as_str())
                .collect();
            assert_eq!(hits, vec![expected], "engagement {}", engagement);
        }
    }

    #[test]
    fn test_sentiment_distribution_fixed_order_omits_empty() {
        let posts = vec![
            post_with(1, 0.1, 1, 0),
            post_with(1, 0.9, 1, 0),
            post_with(1, 0.2, 1, 0),
            post_with(1, 0.95, 1, 0),
        ];
        let data = sentiment_distribution(&posts);
        assert_eq!(values(&data), vec![("Positive", 2), ("Negative", 2)]);
    }

    #[test]
    fn test_daily_volume_sorted_by_day() {
        let posts = vec![
            post_with(1, 0.5, 12, 9),
            post_with(1, 0.5, 3, 23),
            post_with(1, 0.5, 12, 1),
            post_with(1, 0.5, 3, 0),
            post_with(1, 0.5, 10, 5),
        ];
        let data = daily_volume(&posts);

        assert_eq!(values(&data), vec![("3/3/2025", 2), ("3/10/2025", 1), ("3/12/2025", 2)]);
        let keys: Vec<&str> = data.iter().filter_map(|d| d.sort_key.as_deref()).collect();
        assert_eq!(keys, vec!["2025-03-03", "2025-03-10", "2025-03-12"]);
    }

    #[test]
    fn test_empty_input_yields_empty_output() {
        for mode in ChartMode::ALL {
            assert!(aggregate(mode, &[]).is_empty(), "{} should be empty", mode);
        }
    }

    #[test]
    fn test_parse_mode() {
        assert_eq!("bar".parse::<ChartMode>().unwrap(), ChartMode::EngagementHistogram);
        assert_eq!("Pie".parse::<ChartMode>().unwrap(), ChartMode::SentimentDistribution);
        assert_eq!("line".parse::<ChartMode>().unwrap(), ChartMode::DailyVolume);
        assert!(matches!(
            "scatter".parse::<ChartMode>(),
            Err(Error::UnknownVariant { .. })
        ));
    }

    #[test]
    fn test_datum_json_shape() {
        let datum = ChartDatum::new("3/4/2025", 2).with_sort_key("2025-03-04");
        let json = serde_json::to_string(&datum).unwrap();
        assert_eq!(json, r#"{"name":"3/4/2025","value":2,"sortKey":"2025-03-04"}"#);

        let json = serde_json::to_string(&ChartDatum::new("0-10", 0)).unwrap();
        assert_eq!(json, r#"{"name":"0-10","value":0}"#);
    }
}
