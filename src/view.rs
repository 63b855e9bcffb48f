//! Plain-text rendering used by the command-line front end.

use crate::chart::{ChartDatum, ChartMode};
use crate::stats::{format_number, Stats};
use crate::types::Post;
use chrono::{DateTime, Utc};

const BAR_WIDTH: u64 = 40;

/// Short human date, e.g. `Mar 4, 05:06 AM`
pub fn format_date(timestamp: &DateTime<Utc>) -> String {
    timestamp.format("%b %-d, %I:%M %p").to_string()
}

/// Render one post as a small text card
pub fn render_post(post: &Post) -> String {
    let author = post.author();
    let label = post.sentiment_label();
    format!(
        "@{} ({}) · {}\n{}\n♥ {}  ⟳ {}  ↩ {}  {} {} ({:.3})",
        author.username,
        author.name,
        format_date(&post.created_at()),
        post.text(),
        format_number(post.like_count()),
        format_number(post.repost_count()),
        format_number(post.reply_count()),
        label.emoji(),
        label,
        post.sentiment_score(),
    )
}

pub fn render_stats(stats: &Stats) -> String {
    let average = stats
        .average_label()
        .map(|label| label.display_name())
        .unwrap_or("n/a");

    format!(
        "Total Tweets: {}\nTotal Likes: {}\nTotal Retweets: {}\nTotal Replies: {}\nAvg Sentiment: {}",
        format_number(stats.total_posts as u64),
        format_number(stats.total_likes),
        format_number(stats.total_reposts),
        format_number(stats.total_replies),
        average,
    )
}

/// Render chart data as a horizontal bar chart under the mode's title
pub fn render_chart(mode: ChartMode, data: &[ChartDatum]) -> String {
    let mut out = String::from(mode.title());

    if data.is_empty() {
        out.push_str("\nNo data available for visualization");
        return out;
    }

    let name_width = data
        .iter()
        .map(|d| d.name.chars().count())
        .max()
        .unwrap_or(0);
    let max_value = data.iter().map(|d| d.value).max().unwrap_or(0);

    for datum in data {
        let bar_len = if max_value == 0 {
            0
        } else {
            (datum.value * BAR_WIDTH).div_ceil(max_value)
        };
        out.push_str(&format!(
            "\n{:<width$} | {} {}",
            datum.name,
            "█".repeat(bar_len as usize),
            datum.value,
            width = name_width,
        ));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Author;
    use chrono::TimeZone;

    #[test]
    fn test_format_date() {
        let ts = Utc.with_ymd_and_hms(2025, 3, 4, 17, 6, 0).unwrap();
        assert_eq!(format_date(&ts), "Mar 4, 05:06 PM");
    }

    #[test]
    fn test_render_post() {
        let post = Post::builder("t1", Utc.with_ymd_and_hms(2025, 3, 4, 5, 6, 0).unwrap())
            .text("gm")
            .author(Author::new("u1", "Alex Chen", "alexchen_dev"))
            .likes(1500)
            .reposts(2)
            .sentiment_score(0.2)
            .build()
            .unwrap();

        insta::assert_snapshot!(render_post(&post), @r"
        @alexchen_dev (Alex Chen) · Mar 4, 05:06 AM
        gm
        ♥ 1.5K  ⟳ 2  ↩ 0  😞 negative (0.200)
        ");
    }

    #[test]
    fn test_render_chart() {
        let data = vec![
            ChartDatum::new("0-10", 2),
            ChartDatum::new("11-50", 1),
            ChartDatum::new("500+", 0),
        ];
        let rendered = render_chart(ChartMode::EngagementHistogram, &data);
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines[0], "Engagement Distribution");
        assert_eq!(lines[1], format!("0-10  | {} 2", "█".repeat(40)));
        assert_eq!(lines[2], format!("11-50 | {} 1", "█".repeat(20)));
        assert_eq!(lines[3], "500+  |  0");
    }

    #[test]
    fn test_render_empty_chart() {
        assert_eq!(
            render_chart(ChartMode::DailyVolume, &[]),
            "Tweet Volume Over Time\nNo data available for visualization"
        );
    }
}
