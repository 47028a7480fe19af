//! CLI entry point for the Paris fashion-house trends tool.
//!
//! `scrape` collects the house list; `trends`, `seasons` and `related` read
//! it back and query Google Trends. Failures are logged and the run carries
//! on with whatever data is left.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use fashion_trends::analyzers::batch::collect_batched;
use fashion_trends::analyzers::pacing::FixedDelay;
use fashion_trends::analyzers::related::collect_related;
use fashion_trends::analyzers::season::{
    SeasonOptions, analyze_seasons, default_fashion_weeks, load_fashion_weeks,
};
use fashion_trends::analyzers::types::{
    BatchQuery, Coverage, FashionWeek, SeasonScope, SkipReason,
};
use fashion_trends::collector::collect_houses;
use fashion_trends::config::{
    BROWSER_USER_AGENT, COLLECTOR_TIMEOUT, DEFAULT_BATCH_DELAY_SECS, DEFAULT_BATCH_SIZE,
    DEFAULT_DATA_DIR, DEFAULT_TIMEFRAME, HOUSES_FILE, LISTING_URL, OVERALL_TRENDS_FILE,
    SEASON_TRENDS_FILE, TrendsSettings,
};
use fashion_trends::fetch::{BasicClient, WithHeader};
use fashion_trends::output::{
    print_houses, print_ranking, print_related, print_top_brands, read_lines, save_lines,
    save_table,
};
use fashion_trends::trends::{GoogleTrends, MAX_KEYWORDS, TrendsSource};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// Related-query entries printed per list.
const RELATED_SHOWN: usize = 5;

#[derive(Parser)]
#[command(name = "fashion_trends")]
#[command(about = "Gauge search interest in Paris fashion houses", long_about = None)]
struct Cli {
    /// Directory holding the house list and exported tables
    #[arg(long, global = true, default_value = DEFAULT_DATA_DIR)]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct BatchArgs {
    /// Brands compared in one trends query (1 to 5)
    #[arg(short, long, default_value_t = DEFAULT_BATCH_SIZE, value_parser = parse_batch_size)]
    batch_size: usize,

    /// Seconds to wait between consecutive trends queries
    #[arg(short = 'w', long, default_value_t = DEFAULT_BATCH_DELAY_SECS)]
    delay_secs: u64,

    /// Country code to restrict results to (empty = worldwide)
    #[arg(short, long, default_value = "")]
    geo: String,
}

fn parse_batch_size(s: &str) -> std::result::Result<usize, String> {
    let size: usize = s.parse().map_err(|e| format!("`{s}` is not a number: {e}"))?;
    if !(1..=MAX_KEYWORDS).contains(&size) {
        return Err(format!("must be between 1 and {MAX_KEYWORDS}, got {size}"));
    }
    Ok(size)
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape fashion-house names from the FHCM listing page
    Scrape {
        /// Listing page URL
        #[arg(long, default_value = LISTING_URL)]
        url: String,

        /// File name to write the house list to
        #[arg(short, long, default_value = HOUSES_FILE)]
        output: String,
    },
    /// Collect interest over time for every house
    Trends {
        /// File name of the house list
        #[arg(short, long, default_value = HOUSES_FILE)]
        input: String,

        /// File name to write the combined table to
        #[arg(short, long, default_value = OVERALL_TRENDS_FILE)]
        output: String,

        /// Trends timeframe, e.g. "today 12-m" or "2024-01-01 2024-06-30"
        #[arg(short, long, default_value = DEFAULT_TIMEFRAME)]
        timeframe: String,

        #[command(flatten)]
        batch: BatchArgs,
    },
    /// Rank houses by interest during Paris Fashion Weeks
    Seasons {
        /// File name of the house list
        #[arg(short, long, default_value = HOUSES_FILE)]
        input: String,

        /// File name to write the season table to
        #[arg(short, long, default_value = SEASON_TRENDS_FILE)]
        output: String,

        /// JSON file replacing the built-in season table
        #[arg(short, long)]
        periods: Option<PathBuf>,

        /// Evaluate every season instead of stopping at the first with data
        #[arg(long, default_value_t = false)]
        all: bool,

        /// Also fetch related queries for the top brands
        #[arg(long, default_value_t = false)]
        related: bool,

        #[command(flatten)]
        batch: BatchArgs,
    },
    /// Show top and rising searches related to one brand
    Related {
        brand: String,

        #[arg(short, long, default_value = DEFAULT_TIMEFRAME)]
        timeframe: String,

        #[arg(short, long, default_value = "")]
        geo: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/fashion_trends.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("fashion_trends.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();
    let data_dir = cli.data_dir;

    match cli.command {
        Commands::Scrape { url, output } => scrape(&data_dir, &url, &output).await?,
        Commands::Trends {
            input,
            output,
            timeframe,
            batch,
        } => {
            let Some(houses) = load_houses(&data_dir.join(input)) else {
                return Ok(());
            };
            let trends = connect_trends().await?;
            overall_trends(&trends, &houses, &data_dir, &output, timeframe, &batch).await?;
        }
        Commands::Seasons {
            input,
            output,
            periods,
            all,
            related,
            batch,
        } => {
            let Some(houses) = load_houses(&data_dir.join(input)) else {
                return Ok(());
            };
            let weeks = match periods {
                Some(path) => load_fashion_weeks(&path)?,
                None => default_fashion_weeks()?,
            };
            let scope = if all {
                SeasonScope::All
            } else {
                SeasonScope::FirstWithData
            };
            let trends = connect_trends().await?;
            season_trends(
                &trends, &houses, &weeks, scope, related, &data_dir, &output, &batch,
            )
            .await?;
        }
        Commands::Related {
            brand,
            timeframe,
            geo,
        } => {
            let trends = connect_trends().await?;
            match trends.related_queries(&brand, &timeframe, &geo).await {
                Ok(related) => print_related(&brand, &related, RELATED_SHOWN),
                Err(e) => error!(brand = %brand, error = %e, "Failed to collect related queries"),
            }
        }
    }

    Ok(())
}

/// Scrapes the listing page and saves whatever names were found.
#[tracing::instrument(skip(data_dir))]
async fn scrape(data_dir: &Path, url: &str, output: &str) -> Result<()> {
    info!("Scraping Paris fashion houses");
    let client = WithHeader::user_agent(
        BasicClient::with_timeout(COLLECTOR_TIMEOUT)?,
        BROWSER_USER_AGENT,
    )?;

    let houses = match collect_houses(&client, url).await {
        Ok(houses) => houses,
        Err(e) => {
            error!(error = %e, "Failed to fetch the listing page");
            Vec::new()
        }
    };
    print_houses(&houses);

    if let Err(e) = save_lines(data_dir, output, &houses) {
        error!(error = %e, "Failed to save fashion houses");
    }
    Ok(())
}

/// Reads the house list; `None` when there is nothing to analyze.
fn load_houses(path: &Path) -> Option<Vec<String>> {
    let houses = match read_lines(path) {
        Ok(houses) => houses,
        Err(e) => {
            error!(path = %path.display(), error = %e, "Failed to read fashion houses");
            Vec::new()
        }
    };
    if houses.is_empty() {
        info!("No fashion houses to analyze. Exiting.");
        return None;
    }
    info!(count = houses.len(), "Fashion houses loaded");
    Some(houses)
}

/// Builds the run's trends client and opens a session.
async fn connect_trends() -> Result<GoogleTrends<WithHeader<BasicClient>>> {
    let settings = TrendsSettings::from_env();
    let http = WithHeader::user_agent(
        BasicClient::with_timeout(settings.timeout)?,
        BROWSER_USER_AGENT,
    )?;
    let mut trends = GoogleTrends::new(http, settings);

    if let Err(e) = trends.refresh_cookie().await {
        warn!(error = %e, "Could not open a Google Trends session, continuing without cookie");
    }
    Ok(trends)
}

async fn overall_trends<S: TrendsSource>(
    trends: &S,
    houses: &[String],
    data_dir: &Path,
    output: &str,
    timeframe: String,
    batch: &BatchArgs,
) -> Result<()> {
    let query = BatchQuery {
        batch_size: batch.batch_size,
        timeframe,
        geo: batch.geo.clone(),
    };
    let pacer = FixedDelay::from_secs(batch.delay_secs);

    let outcome = collect_batched(trends, &pacer, houses, &query).await?;

    match outcome.coverage() {
        Coverage::Complete => {}
        Coverage::Partial => warn!(
            failed = outcome.failures.len(),
            groups = outcome.groups,
            "Some groups returned no data because their query failed"
        ),
        Coverage::NoData => info!("Trends returned no data"),
        Coverage::Failed => error!(groups = outcome.groups, "Every trends query failed"),
    }
    if outcome.table.is_empty() {
        return Ok(());
    }

    if let Err(e) = save_table(data_dir, output, &outcome.table) {
        error!(error = %e, "Failed to save trends data");
    }
    print_ranking(
        &format!("Overall average interest ({})", query.timeframe),
        &outcome.table.ranking(),
    );
    Ok(())
}

#[allow(clippy::too_many_arguments)]
async fn season_trends<S: TrendsSource>(
    trends: &S,
    houses: &[String],
    weeks: &[FashionWeek],
    scope: SeasonScope,
    with_related: bool,
    data_dir: &Path,
    output: &str,
    batch: &BatchArgs,
) -> Result<()> {
    let pacer = FixedDelay::from_secs(batch.delay_secs);
    let options = SeasonOptions {
        batch_size: batch.batch_size,
        geo: batch.geo.clone(),
        scope,
    };

    let report = analyze_seasons(trends, &pacer, houses, weeks, &options).await?;

    for skip in &report.skipped {
        match &skip.reason {
            SkipReason::Invalid(e) => warn!(season = %skip.season, error = %e, "Season not analyzed"),
            SkipReason::NoData => info!(season = %skip.season, "Season had no data"),
            SkipReason::Failed(failures) => {
                warn!(season = %skip.season, failed = failures.len(), "Season queries failed")
            }
        }
    }

    let Some(first) = report.first() else {
        info!("No season yielded trends data");
        return Ok(());
    };

    if let Err(e) = save_table(data_dir, output, &first.table) {
        error!(error = %e, "Failed to save season trends data");
    }

    for season in &report.rankings {
        print_ranking(
            &format!("Fashion Week average interest ({})", season.season),
            &season.ranking,
        );
        print_top_brands(&season.season, &season.top_brands);
    }

    if with_related {
        info!("Collecting related queries for top brands");
        let results = collect_related(
            trends,
            &pacer,
            &first.top_brands,
            DEFAULT_TIMEFRAME,
            &batch.geo,
        )
        .await;
        for entry in results {
            match entry.related {
                Ok(related) => print_related(&entry.brand, &related, RELATED_SHOWN),
                Err(e) => error!(brand = %entry.brand, error = %e, "Failed to collect related queries"),
            }
        }
    }

    Ok(())
}
