use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use tweetminer::prelude::*;
use tweetminer::{export, sentiment, view, Stats};

/// Browse, filter, chart and export social-media posts
#[derive(Parser, Debug)]
#[command(name = "tweetminer")]
#[command(about = "Filter, chart and export synthetic social-media posts")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

/// Options shared by every command that runs a search
#[derive(Args, Debug)]
struct SessionArgs {
    /// Keyword, hashtag or @username to search for
    query: String,

    /// YAML configuration file; flags override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of posts to generate (default: 25)
    #[arg(long)]
    count: Option<usize>,

    /// Seed for reproducible results
    #[arg(long)]
    seed: Option<u64>,

    /// Anchor instant (RFC 3339) for generated posts and the default date range
    #[arg(long = "as-of")]
    as_of: Option<String>,

    /// Range start: YYYY-MM-DD or RFC 3339 (default: 7 days ago)
    #[arg(long)]
    from: Option<String>,

    /// Range end: YYYY-MM-DD or RFC 3339 (default: today)
    #[arg(long)]
    to: Option<String>,

    /// Sentiment: all, positive, neutral or negative
    #[arg(long)]
    sentiment: Option<String>,

    /// Minimum combined likes + reposts + replies
    #[arg(long = "min-engagement")]
    min_engagement: Option<u64>,

    /// Maximum combined likes + reposts + replies
    #[arg(long = "max-engagement")]
    max_engagement: Option<u64>,

    /// Simulated search latency in milliseconds
    #[arg(long = "latency-ms")]
    latency_ms: Option<u64>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search and list the posts passing the filters
    Search {
        #[command(flatten)]
        session: SessionArgs,

        /// Print the filtered posts as JSON
        #[arg(long)]
        json: bool,

        /// Show at most this many posts
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Search and aggregate the filtered posts into chart data
    Chart {
        #[command(flatten)]
        session: SessionArgs,

        /// Chart mode: histogram, sentiment or volume
        #[arg(long)]
        mode: Option<String>,

        /// Print the chart data as JSON
        #[arg(long)]
        json: bool,
    },

    /// Search and export the filtered posts
    Export {
        #[command(flatten)]
        session: SessionArgs,

        /// Export format: csv or json
        #[arg(long)]
        format: Option<String>,

        /// Output directory (default: TWEETMINER_OUT_DIR env var, or the current directory)
        #[arg(long)]
        out: Option<PathBuf>,

        /// Write the document to stdout instead of a file
        #[arg(long)]
        stdout: bool,
    },

    /// Score a text with the keyword sentiment analyzer
    Analyze {
        /// Text to analyze
        #[arg(num_args = 1..)]
        text: Vec<String>,
    },
}

fn print_available_commands() {
    println!("Available commands:");
    println!("  search   Search and list the posts passing the filters");
    println!("  chart    Search and aggregate the filtered posts into chart data");
    println!("  export   Search and export the filtered posts");
    println!("  analyze  Score a text with the keyword sentiment analyzer");
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Layer configuration: defaults, then the config file, then flags
fn build_config(session: &SessionArgs) -> anyhow::Result<Config> {
    let mut builder = match &session.config {
        Some(path) => ConfigBuilder::new().config_file(path)?,
        None => ConfigBuilder::new(),
    };

    if let Some(count) = session.count {
        builder = builder.count(count);
    }
    if let Some(seed) = session.seed {
        builder = builder.seed(seed);
    }
    if let Some(as_of) = &session.as_of {
        builder = builder.as_of_str(as_of)?;
    }
    if let Some(from) = &session.from {
        builder = builder.from_date_str(from)?;
    }
    if let Some(to) = &session.to {
        builder = builder.to_date_str(to)?;
    }
    if let Some(sentiment) = &session.sentiment {
        builder = builder.sentiment_str(sentiment)?;
    }
    if let Some(min) = session.min_engagement {
        builder = builder.min_engagement(min);
    }
    if let Some(max) = session.max_engagement {
        builder = builder.max_engagement(max);
    }
    if let Some(latency_ms) = session.latency_ms {
        builder = builder.latency_ms(latency_ms);
    }

    Ok(builder.build()?)
}

/// Run the search described by the configuration and load it into a dashboard
async fn open_dashboard(config: &Config, query: &str) -> anyhow::Result<Dashboard> {
    let mut source = config.mock_source();
    let posts = source.search_with_latency(query).await?;

    let mut dashboard = Dashboard::new(config.criteria);
    dashboard.replace(query, posts);
    Ok(dashboard)
}

async fn run_search_command(
    session: SessionArgs,
    json: bool,
    limit: Option<usize>,
) -> anyhow::Result<()> {
    let config = build_config(&session)?;
    let dashboard = open_dashboard(&config, &session.query).await?;
    let filtered = dashboard.filtered();

    if json {
        println!("{}", export::to_json(&filtered)?);
        return Ok(());
    }

    println!("Results ({} tweets)", filtered.len());
    println!("Showing filtered results for \"{}\"", session.query.trim());
    println!();
    println!("{}", view::render_stats(&Stats::from_posts(&filtered)));

    if filtered.is_empty() {
        println!();
        println!("No tweets match your current filters. Try adjusting your criteria.");
        return Ok(());
    }

    let shown = limit.unwrap_or(filtered.len());
    for post in filtered.iter().take(shown) {
        println!();
        println!("{}", view::render_post(post));
    }

    Ok(())
}

async fn run_chart_command(
    session: SessionArgs,
    mode: Option<String>,
    json: bool,
) -> anyhow::Result<()> {
    let config = build_config(&session)?;

    let mode = match mode {
        Some(mode) => mode.parse::<ChartMode>()?,
        None => config.chart_mode,
    };

    let dashboard = open_dashboard(&config, &session.query).await?;
    let data = dashboard.chart(mode);

    if json {
        println!("{}", serde_json::to_string_pretty(&data)?);
    } else {
        println!("{}", view::render_chart(mode, &data));
    }

    Ok(())
}

async fn run_export_command(
    session: SessionArgs,
    format: Option<String>,
    out: Option<PathBuf>,
    stdout: bool,
) -> anyhow::Result<()> {
    let config = build_config(&session)?;

    let format = match format {
        Some(format) => format.parse::<ExportFormat>()?,
        None => config.export_format,
    };
    let out_dir = out.unwrap_or_else(|| config.output_dir.clone());

    let dashboard = open_dashboard(&config, &session.query).await?;
    let filtered = dashboard.filtered();
    if filtered.is_empty() {
        tracing::warn!("no posts match the current filters; exporting an empty document");
    }

    if stdout {
        println!("{}", export::encode(format, &filtered)?);
        return Ok(());
    }

    let today = config
        .as_of
        .unwrap_or_else(chrono::Utc::now)
        .date_naive();
    let path = export::save(&out_dir, format, &filtered, today)?;
    eprintln!("✓ Exported {} tweets", filtered.len());
    println!("{}", path.display());

    Ok(())
}

fn run_analyze_command(text: Vec<String>) -> anyhow::Result<()> {
    let text = text.join(" ");
    let analysis = sentiment::analyze(&text);
    println!(
        "{} {} ({:.3})",
        analysis.label.emoji(),
        analysis.label,
        analysis.score
    );
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Some(Command::Search {
            session,
            json,
            limit,
        }) => run_search_command(session, json, limit).await,
        Some(Command::Chart {
            session,
            mode,
            json,
        }) => run_chart_command(session, mode, json).await,
        Some(Command::Export {
            session,
            format,
            out,
            stdout,
        }) => run_export_command(session, format, out, stdout).await,
        Some(Command::Analyze { text }) => run_analyze_command(text),
        None => {
            print_available_commands();
            Ok(())
        }
    }
}
