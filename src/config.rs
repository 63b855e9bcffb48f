use crate::chart::ChartMode;
use crate::error::{Error, Result};
use crate::export::ExportFormat;
use crate::filter::{
    parse_end_bound, parse_start_bound, DateRange, EngagementRange, FilterCriteria,
    SentimentFilter,
};
use crate::mock::{MockSource, DEFAULT_COUNT};
use crate::types::parse_timestamp;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable consulted for the export directory
pub const OUTPUT_DIR_ENV: &str = "TWEETMINER_OUT_DIR";

/// Upper bound on posts per mock search
const MAX_COUNT: usize = 10_000;

/// Days covered by the default date range, ending today
const DEFAULT_RANGE_DAYS: u32 = 7;

/// Configuration for a dashboard session
#[derive(Debug, Clone)]
pub struct Config {
    pub count: usize,
    pub seed: Option<u64>,
    pub as_of: Option<DateTime<Utc>>,
    pub latency_ms: u64,
    pub criteria: FilterCriteria,
    pub chart_mode: ChartMode,
    pub export_format: ExportFormat,
    pub output_dir: PathBuf,
}

impl Config {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.count == 0 {
            return Err(Error::Config("Post count must be at least 1".to_string()));
        }

        if self.count > MAX_COUNT {
            return Err(Error::Config(format!(
                "Post count {} exceeds the maximum of {}",
                self.count, MAX_COUNT
            )));
        }

        if self.output_dir.exists() && !self.output_dir.is_dir() {
            return Err(Error::Config(format!(
                "Output path is not a directory: {}",
                self.output_dir.display()
            )));
        }

        Ok(())
    }

    /// Build the mock source described by this configuration
    pub fn mock_source(&self) -> MockSource {
        let source = match self.seed {
            Some(seed) => MockSource::seeded(seed),
            None => MockSource::new(),
        };
        let source = source
            .with_count(self.count)
            .with_latency(std::time::Duration::from_millis(self.latency_ms));

        match self.as_of {
            Some(as_of) => source.with_as_of(as_of),
            None => source,
        }
    }
}

/// Filter section of a configuration file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileFilters {
    pub from: Option<String>,
    pub to: Option<String>,
    pub sentiment: Option<String>,
    pub min_engagement: Option<u64>,
    pub max_engagement: Option<u64>,
}

/// Configuration file contents (YAML); every key is optional
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub count: Option<usize>,
    pub seed: Option<u64>,
    pub as_of: Option<String>,
    pub latency_ms: Option<u64>,
    #[serde(default)]
    pub filters: FileFilters,
    pub chart: Option<String>,
    pub export: Option<String>,
    pub output_dir: Option<PathBuf>,
}

/// Load and parse a YAML configuration file
pub fn load_config(config_path: &Path) -> Result<FileConfig> {
    let contents = fs::read_to_string(config_path)?;
    let config = serde_yaml::from_str(&contents)?;
    tracing::debug!(path = %config_path.display(), "loaded configuration file");
    Ok(config)
}

/// Resolve the export directory: explicit value, then environment, then the working directory
pub fn default_output_dir(explicit: Option<PathBuf>) -> PathBuf {
    explicit
        .or_else(|| std::env::var_os(OUTPUT_DIR_ENV).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Builder for creating configurations
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    count: usize,
    seed: Option<u64>,
    as_of: Option<DateTime<Utc>>,
    latency_ms: u64,
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
    sentiment: SentimentFilter,
    engagement: EngagementRange,
    chart_mode: ChartMode,
    export_format: ExportFormat,
    output_dir: Option<PathBuf>,
}

impl ConfigBuilder {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self {
            count: DEFAULT_COUNT,
            seed: None,
            as_of: None,
            latency_ms: 0,
            from: None,
            to: None,
            sentiment: SentimentFilter::All,
            engagement: EngagementRange::default(),
            chart_mode: ChartMode::default(),
            export_format: ExportFormat::default(),
            output_dir: None,
        }
    }

    /// Apply every key present in a configuration file
    pub fn file(mut self, file: FileConfig) -> Result<Self> {
        if let Some(count) = file.count {
            self = self.count(count);
        }
        if let Some(seed) = file.seed {
            self = self.seed(seed);
        }
        if let Some(as_of) = file.as_of {
            self = self.as_of_str(&as_of)?;
        }
        if let Some(latency_ms) = file.latency_ms {
            self = self.latency_ms(latency_ms);
        }
        if let Some(from) = file.filters.from {
            self = self.from_date_str(&from)?;
        }
        if let Some(to) = file.filters.to {
            self = self.to_date_str(&to)?;
        }
        if let Some(sentiment) = file.filters.sentiment {
            self = self.sentiment_str(&sentiment)?;
        }
        if let Some(min) = file.filters.min_engagement {
            self = self.min_engagement(min);
        }
        if let Some(max) = file.filters.max_engagement {
            self = self.max_engagement(max);
        }
        if let Some(chart) = file.chart {
            self = self.chart_mode_str(&chart)?;
        }
        if let Some(export) = file.export {
            self = self.export_format_str(&export)?;
        }
        if let Some(dir) = file.output_dir {
            self = self.output_dir(dir);
        }
        Ok(self)
    }

    /// Load a YAML file and apply it
    pub fn config_file(self, path: &Path) -> Result<Self> {
        self.file(load_config(path)?)
    }

    pub fn count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Anchor instant for generated posts and the default date range
    pub fn as_of(mut self, as_of: DateTime<Utc>) -> Self {
        self.as_of = Some(as_of);
        self
    }

    pub fn as_of_str(self, as_of: &str) -> Result<Self> {
        Ok(self.as_of(parse_timestamp(as_of)?))
    }

    pub fn latency_ms(mut self, latency_ms: u64) -> Self {
        self.latency_ms = latency_ms;
        self
    }

    /// Set the range start from a `YYYY-MM-DD` day or an RFC 3339 instant
    pub fn from_date_str(mut self, from: &str) -> Result<Self> {
        self.from = Some(parse_start_bound(from)?);
        Ok(self)
    }

    /// Set the range end from a `YYYY-MM-DD` day or an RFC 3339 instant
    pub fn to_date_str(mut self, to: &str) -> Result<Self> {
        self.to = Some(parse_end_bound(to)?);
        Ok(self)
    }

    pub fn sentiment(mut self, sentiment: SentimentFilter) -> Self {
        self.sentiment = sentiment;
        self
    }

    pub fn sentiment_str(mut self, sentiment: &str) -> Result<Self> {
        self.sentiment = sentiment.parse()?;
        Ok(self)
    }

    pub fn min_engagement(mut self, min: u64) -> Self {
        self.engagement.min = min;
        self
    }

    pub fn max_engagement(mut self, max: u64) -> Self {
        self.engagement.max = max;
        self
    }

    pub fn chart_mode(mut self, mode: ChartMode) -> Self {
        self.chart_mode = mode;
        self
    }

    pub fn chart_mode_str(mut self, mode: &str) -> Result<Self> {
        self.chart_mode = mode.parse()?;
        Ok(self)
    }

    pub fn export_format(mut self, format: ExportFormat) -> Self {
        self.export_format = format;
        self
    }

    pub fn export_format_str(mut self, format: &str) -> Result<Self> {
        self.export_format = format.parse()?;
        Ok(self)
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    /// Build the final configuration.
    ///
    /// Missing range bounds default to the last seven days ending on the
    /// anchor day (today when no anchor is set).
    pub fn build(self) -> Result<Config> {
        let today = self.as_of.unwrap_or_else(Utc::now).date_naive();
        let default_range = DateRange::last_days(DEFAULT_RANGE_DAYS, today);

        let date_range = DateRange::new(
            self.from.unwrap_or(default_range.start),
            self.to.unwrap_or(default_range.end),
        );

        let config = Config {
            count: self.count,
            seed: self.seed,
            as_of: self.as_of,
            latency_ms: self.latency_ms,
            criteria: FilterCriteria {
                date_range,
                sentiment: self.sentiment,
                engagement: self.engagement,
            },
            chart_mode: self.chart_mode,
            export_format: self.export_format,
            output_dir: default_output_dir(self.output_dir),
        };

        config.validate()?;
        Ok(config)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sentiment::SentimentLabel;
    use chrono::{NaiveDate, TimeZone};

    fn anchor() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_defaults_anchor_on_as_of() {
        let config = ConfigBuilder::new().as_of(anchor()).build().unwrap();
        let expected = DateRange::days(
            NaiveDate::from_ymd_opt(2025, 3, 3).unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
        );

        assert_eq!(config.count, DEFAULT_COUNT);
        assert_eq!(config.criteria.date_range, expected);
        assert_eq!(config.criteria.sentiment, SentimentFilter::All);
        assert_eq!(config.criteria.engagement, EngagementRange::new(0, 10_000));
        assert_eq!(config.chart_mode, ChartMode::EngagementHistogram);
        assert_eq!(config.export_format, ExportFormat::Csv);
    }

    #[test]
    fn test_string_setters() {
        let config = ConfigBuilder::new()
            .from_date_str("2025-03-01")
            .unwrap()
            .to_date_str("2025-03-02")
            .unwrap()
            .sentiment_str("neutral")
            .unwrap()
            .chart_mode_str("pie")
            .unwrap()
            .export_format_str("json")
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(
            config.criteria.date_range.start,
            Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap()
        );
        assert_eq!(
            config.criteria.sentiment,
            SentimentFilter::Only(SentimentLabel::Neutral)
        );
        assert_eq!(config.chart_mode, ChartMode::SentimentDistribution);
        assert_eq!(config.export_format, ExportFormat::Json);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(ConfigBuilder::new().count(0).build().is_err());
        assert!(ConfigBuilder::new().count(MAX_COUNT + 1).build().is_err());
        assert!(ConfigBuilder::new().chart_mode_str("radar").is_err());
        assert!(ConfigBuilder::new().export_format_str("xml").is_err());
        assert!(ConfigBuilder::new().from_date_str("last week").is_err());
    }

    #[test]
    fn test_far_future_end_day() {
        let config = ConfigBuilder::new()
            .as_of(anchor())
            .to_date_str("+262142-12-31")
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(config.criteria.date_range.end.date_naive(), NaiveDate::MAX);
    }

    #[test]
    fn test_yaml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tweetminer.yml");
        fs::write(
            &path,
            "count: 40\nseed: 9\nas_of: 2025-03-10T12:00:00Z\nfilters:\n  sentiment: positive\n  min_engagement: 5\nchart: volume\nexport: json\noutput_dir: out\n",
        )
        .unwrap();

        let config = ConfigBuilder::new()
            .config_file(&path)
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(config.count, 40);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.as_of, Some(anchor()));
        assert_eq!(config.criteria.engagement.min, 5);
        assert_eq!(config.chart_mode, ChartMode::DailyVolume);
        assert_eq!(config.output_dir, PathBuf::from("out"));
    }

    #[test]
    fn test_yaml_unknown_key_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.yml");
        fs::write(&path, "colour: blue\n").unwrap();
        assert!(matches!(
            ConfigBuilder::new().config_file(&path),
            Err(Error::Yaml(_))
        ));
    }
}
