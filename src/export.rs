//! Delimited-text (CSV) and structured-text (JSON) encodings of a post collection.
//!
//! Encoding is all-or-nothing: a document is produced in full before anything
//! is written to disk.

use crate::error::{Error, Result};
use crate::types::{format_timestamp, Post};
use chrono::NaiveDate;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

const CSV_HEADERS: [&str; 10] = [
    "Tweet ID",
    "Text",
    "Author Name",
    "Author Username",
    "Created At",
    "Likes",
    "Retweets",
    "Replies",
    "Sentiment Score",
    "Sentiment Label",
];

/// Export format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv;charset=utf-8",
            ExportFormat::Json => "application/json;charset=utf-8",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "csv" | "delimited-text" => Ok(ExportFormat::Csv),
            "json" | "structured-text" => Ok(ExportFormat::Json),
            _ => Err(Error::UnknownVariant {
                kind: "export format",
                value: s.to_string(),
                allowed: "csv, json",
            }),
        }
    }
}

/// Always quote, doubling embedded quotes
fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

/// Quote only when the field would otherwise break the row
fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        quote(field)
    } else {
        field.to_string()
    }
}

fn csv_row(post: &Post) -> String {
    let author = post.author();
    [
        escape(post.id()),
        quote(post.text()),
        escape(&author.name),
        escape(&author.username),
        format_timestamp(&post.created_at()),
        post.like_count().to_string(),
        post.repost_count().to_string(),
        post.reply_count().to_string(),
        format!("{:.3}", post.sentiment_score()),
        post.sentiment_label().to_string(),
    ]
    .join(",")
}

/// Encode posts as CSV: a header row, then one row per post, joined by `\n`.
/// The text column is always quoted; the score has three decimals.
pub fn to_csv(posts: &[Post]) -> String {
    std::iter::once(CSV_HEADERS.join(","))
        .chain(posts.iter().map(csv_row))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Encode posts as pretty-printed JSON (2-space indent)
pub fn to_json(posts: &[Post]) -> Result<String> {
    Ok(serde_json::to_string_pretty(posts)?)
}

/// Decode a JSON export back into posts
pub fn from_json(json: &str) -> Result<Vec<Post>> {
    Ok(serde_json::from_str(json)?)
}

/// Encode posts in the requested format
pub fn encode(format: ExportFormat, posts: &[Post]) -> Result<String> {
    match format {
        ExportFormat::Csv => Ok(to_csv(posts)),
        ExportFormat::Json => to_json(posts),
    }
}

/// File name for an export made on `date`, e.g. `tweets_2025-03-04.csv`
pub fn export_filename(format: ExportFormat, date: NaiveDate) -> String {
    format!("tweets_{}.{}", date.format("%Y-%m-%d"), format.extension())
}

/// Encode posts and write them to `dir`, returning the written path
pub fn save(dir: &Path, format: ExportFormat, posts: &[Post], date: NaiveDate) -> Result<PathBuf> {
    let document = encode(format, posts)?;

    fs::create_dir_all(dir)?;
    let path = dir.join(export_filename(format, date));
    fs::write(&path, document)?;

    tracing::info!(
        path = %path.display(),
        posts = posts.len(),
        mime = format.mime_type(),
        "exported posts"
    );
    Ok(path)
}
