use crate::error::{Error, Result};
use crate::sentiment::{self, SentimentLabel};
use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

/// Parse an ISO-8601 / RFC 3339 instant into UTC
pub fn parse_timestamp(timestamp_str: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(timestamp_str.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| Error::InvalidTimestamp(timestamp_str.to_string()))
}

/// Format an instant the way posts carry it on the wire: `2025-03-04T05:06:07.089Z`
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Author of a post
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Author {
    pub id: String,
    pub name: String,
    pub username: String,
}

impl Author {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        username: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            username: username.into(),
        }
    }
}

/// A single social-media post with its engagement counts and sentiment score.
///
/// Posts are immutable once built. The sentiment label is derived from the
/// score on read, so the two can never drift apart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PostRecord", into = "PostRecord")]
pub struct Post {
    id: String,
    text: String,
    author: Author,
    created_at: DateTime<Utc>,
    like_count: u64,
    repost_count: u64,
    reply_count: u64,
    sentiment_score: f64,
}

impl Post {
    /// Start building a post
    pub fn builder(id: impl Into<String>, created_at: DateTime<Utc>) -> PostBuilder {
        PostBuilder::new(id, created_at)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn author(&self) -> &Author {
        &self.author
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn like_count(&self) -> u64 {
        self.like_count
    }

    pub fn repost_count(&self) -> u64 {
        self.repost_count
    }

    pub fn reply_count(&self) -> u64 {
        self.reply_count
    }

    pub fn sentiment_score(&self) -> f64 {
        self.sentiment_score
    }

    pub fn sentiment_label(&self) -> SentimentLabel {
        SentimentLabel::from_score(self.sentiment_score)
    }

    /// Combined like + repost + reply count
    pub fn engagement(&self) -> u64 {
        self.like_count
            .saturating_add(self.repost_count)
            .saturating_add(self.reply_count)
    }
}

/// Builder for [`Post`]
#[derive(Debug, Clone)]
pub struct PostBuilder {
    id: String,
    text: String,
    author: Author,
    created_at: DateTime<Utc>,
    like_count: u64,
    repost_count: u64,
    reply_count: u64,
    sentiment_score: f64,
}

impl PostBuilder {
    pub fn new(id: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            text: String::new(),
            author: Author::default(),
            created_at,
            like_count: 0,
            repost_count: 0,
            reply_count: 0,
            sentiment_score: 0.5,
        }
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn author(mut self, author: Author) -> Self {
        self.author = author;
        self
    }

    pub fn likes(mut self, count: u64) -> Self {
        self.like_count = count;
        self
    }

    pub fn reposts(mut self, count: u64) -> Self {
        self.repost_count = count;
        self
    }

    pub fn replies(mut self, count: u64) -> Self {
        self.reply_count = count;
        self
    }

    pub fn sentiment_score(mut self, score: f64) -> Self {
        self.sentiment_score = score;
        self
    }

    /// Validate and build the post. Timestamps are truncated to milliseconds,
    /// the precision of the wire format.
    pub fn build(self) -> Result<Post> {
        let sentiment_score = sentiment::validate_score(self.sentiment_score)?;

        Ok(Post {
            id: self.id,
            text: self.text,
            author: self.author,
            created_at: self.created_at.trunc_subsecs(3),
            like_count: self.like_count,
            repost_count: self.repost_count,
            reply_count: self.reply_count,
            sentiment_score,
        })
    }
}

/// Flat wire representation of a post, used by the structured-text export
#[derive(Debug, Clone, Serialize, Deserialize)]
struct PostRecord {
    tweet_id: String,
    text: String,
    author_id: String,
    author_name: String,
    author_username: String,
    created_at: String,
    like_count: u64,
    retweet_count: u64,
    reply_count: u64,
    sentiment_score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sentiment_label: Option<SentimentLabel>,
}

impl From<Post> for PostRecord {
    fn from(post: Post) -> Self {
        let sentiment_label = Some(post.sentiment_label());
        PostRecord {
            tweet_id: post.id,
            text: post.text,
            author_id: post.author.id,
            author_name: post.author.name,
            author_username: post.author.username,
            created_at: format_timestamp(&post.created_at),
            like_count: post.like_count,
            retweet_count: post.repost_count,
            reply_count: post.reply_count,
            sentiment_score: post.sentiment_score,
            sentiment_label,
        }
    }
}

impl TryFrom<PostRecord> for Post {
    type Error = Error;

    fn try_from(record: PostRecord) -> Result<Self> {
        let created_at = parse_timestamp(&record.created_at)?;
        let score = sentiment::validate_score(record.sentiment_score)?;
        let derived = SentimentLabel::from_score(score);

        if let Some(stored) = record.sentiment_label {
            if stored != derived {
                return Err(Error::SentimentMismatch {
                    id: record.tweet_id,
                    score,
                    stored: stored.to_string(),
                    derived: derived.to_string(),
                });
            }
        }

        Post::builder(record.tweet_id, created_at)
            .text(record.text)
            .author(Author::new(
                record.author_id,
                record.author_name,
                record.author_username,
            ))
            .likes(record.like_count)
            .reposts(record.retweet_count)
            .replies(record.reply_count)
            .sentiment_score(score)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> Post {
        Post::builder("tweet_1", Utc.with_ymd_and_hms(2025, 3, 4, 5, 6, 7).unwrap())
            .text("hello")
            .author(Author::new("user_a", "Alex Chen", "alexchen_dev"))
            .likes(10)
            .reposts(3)
            .replies(2)
            .sentiment_score(0.75)
            .build()
            .unwrap()
    }

    #[test]
    fn test_engagement_and_label() {
        let post = sample();
        assert_eq!(post.engagement(), 15);
        assert_eq!(post.sentiment_label(), SentimentLabel::Positive);
    }

    #[test]
    fn test_build_rejects_bad_score() {
        let result = Post::builder("x", Utc::now()).sentiment_score(1.5).build();
        assert!(matches!(result, Err(Error::InvalidSentimentScore(_))));
    }

    #[test]
    fn test_build_truncates_to_millis() {
        let ts = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
            + chrono::Duration::nanoseconds(123_456_789);
        let post = Post::builder("x", ts).build().unwrap();
        assert_eq!(format_timestamp(&post.created_at()), "2025-01-01T00:00:00.123Z");
    }

    #[test]
    fn test_wire_field_names() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value["tweet_id"], "tweet_1");
        assert_eq!(value["author_username"], "alexchen_dev");
        assert_eq!(value["created_at"], "2025-03-04T05:06:07.000Z");
        assert_eq!(value["retweet_count"], 3);
        assert_eq!(value["sentiment_label"], "positive");
    }

    #[test]
    fn test_decode_flags_label_mismatch() {
        let json = r#"{
            "tweet_id": "t1", "text": "", "author_id": "a", "author_name": "A",
            "author_username": "a", "created_at": "2025-01-01T00:00:00.000Z",
            "like_count": 0, "retweet_count": 0, "reply_count": 0,
            "sentiment_score": 0.9, "sentiment_label": "negative"
        }"#;
        let err = serde_json::from_str::<Post>(json).unwrap_err();
        assert!(err.to_string().contains("disagrees"));
    }

    #[test]
    fn test_decode_derives_missing_label() {
        let json = r#"{
            "tweet_id": "t1", "text": "", "author_id": "a", "author_name": "A",
            "author_username": "a", "created_at": "2025-01-01T00:00:00Z",
            "like_count": 1, "retweet_count": 0, "reply_count": 0,
            "sentiment_score": 0.1
        }"#;
        let post: Post = serde_json::from_str(json).unwrap();
        assert_eq!(post.sentiment_label(), SentimentLabel::Negative);
    }

    #[test]
    fn test_decode_rejects_malformed_timestamp() {
        let json = r#"{
            "tweet_id": "t1", "text": "", "author_id": "a", "author_name": "A",
            "author_username": "a", "created_at": "yesterday",
            "like_count": 1, "retweet_count": 0, "reply_count": 0,
            "sentiment_score": 0.5
        }"#;
        let err = serde_json::from_str::<Post>(json).unwrap_err();
        assert!(err.to_string().contains("Invalid timestamp"));
    }
}
