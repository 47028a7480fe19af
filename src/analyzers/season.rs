//! Interest during Paris Fashion Week periods.

use std::path::Path;

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::analyzers::batch::collect_batched;
use crate::analyzers::pacing::Pacer;
use crate::analyzers::types::{
    BatchQuery, Coverage, FashionWeek, SeasonRanking, SeasonReport, SeasonScope, SeasonSkip,
    SkipReason,
};
use crate::config::{DEFAULT_BATCH_SIZE, TOP_BRANDS};
use crate::error::{Error, Result};
use crate::trends::TrendsSource;

/// Built-in season table as `(label, start, end)`, most recent first.
///
/// A/W 2025 ends before it starts; it is kept as recorded and rejected by
/// [`FashionWeek::validate`].
pub const FASHION_WEEKS: &[(&str, &str, &str)] = &[
    ("S/S 2025", "2025-09-29", "2025-10-07"),
    ("A/W 2025", "2025-03-23", "2025-03-11"),
    ("S/S 2024", "2024-09-23", "2024-10-01"),
    ("A/W 2024", "2024-02-26", "2024-03-05"),
    ("S/S 2023", "2023-09-25", "2023-10-03"),
    ("A/W 2023", "2023-02-27", "2023-03-07"),
    ("S/S 2022", "2022-09-26", "2022-10-04"),
    ("A/W 2022", "2022-02-28", "2022-03-08"),
];

impl FashionWeek {
    pub fn new(label: impl Into<String>, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            label: label.into(),
            start,
            end,
        }
    }

    /// Parses `YYYY-MM-DD` dates. Does not check their order.
    pub fn parse(label: &str, start: &str, end: &str) -> Result<Self> {
        let date = |s: &str| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| Error::Malformed {
                context: format!("period {label}"),
                reason: format!("{s}: {e}"),
            })
        };
        Ok(Self::new(label, date(start)?, date(end)?))
    }

    /// Trends timeframe `start end`, always in configured order.
    pub fn timeframe(&self) -> String {
        format!(
            "{} {}",
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d")
        )
    }

    /// Rejects periods whose end precedes their start.
    pub fn validate(&self) -> Result<()> {
        if self.end < self.start {
            return Err(Error::InvalidPeriod {
                label: self.label.clone(),
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }
}

pub fn default_fashion_weeks() -> Result<Vec<FashionWeek>> {
    FASHION_WEEKS
        .iter()
        .map(|(label, start, end)| FashionWeek::parse(label, start, end))
        .collect()
}

/// Loads a season table from a JSON array of `{"label", "start", "end"}`.
pub fn load_fashion_weeks(path: &Path) -> Result<Vec<FashionWeek>> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Options for [`analyze_seasons`].
#[derive(Debug, Clone)]
pub struct SeasonOptions {
    pub batch_size: usize,
    pub geo: String,
    pub scope: SeasonScope,
}

impl Default for SeasonOptions {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            geo: String::new(),
            scope: SeasonScope::default(),
        }
    }
}

/// Ranks `brands` by mean interest during each season of `weeks`, in order.
///
/// With [`SeasonScope::FirstWithData`] the run ends at the first season
/// whose table is not empty; later seasons are never queried. Invalid
/// periods are reported in [`SeasonReport::skipped`] without a query.
/// Consecutive seasons are separated by one pause.
///
/// # Errors
///
/// Only [`Error::InvalidBatchSize`].
pub async fn analyze_seasons<S, P>(
    source: &S,
    pacer: &P,
    brands: &[String],
    weeks: &[FashionWeek],
    options: &SeasonOptions,
) -> Result<SeasonReport>
where
    S: TrendsSource + ?Sized,
    P: Pacer + ?Sized,
{
    let mut report = SeasonReport::default();
    let mut queried = false;

    for week in weeks {
        info!(season = %week.label, start = %week.start, end = %week.end, "Analyzing trends");

        if let Err(error) = week.validate() {
            warn!(season = %week.label, error = %error, "Skipping invalid period");
            report.skipped.push(SeasonSkip {
                season: week.label.clone(),
                reason: SkipReason::Invalid(error),
            });
            continue;
        }

        if queried {
            pacer.pause().await;
        }
        queried = !brands.is_empty();

        let query = BatchQuery {
            batch_size: options.batch_size,
            timeframe: week.timeframe(),
            geo: options.geo.clone(),
        };
        let outcome = collect_batched(source, pacer, brands, &query).await?;

        if outcome.table.is_empty() {
            let reason = match outcome.coverage() {
                Coverage::NoData => SkipReason::NoData,
                _ => SkipReason::Failed(outcome.failures),
            };
            info!(season = %week.label, "No data for season");
            report.skipped.push(SeasonSkip {
                season: week.label.clone(),
                reason,
            });
            continue;
        }

        let ranking = outcome.table.ranking();
        let top_brands: Vec<String> = ranking
            .iter()
            .take(TOP_BRANDS)
            .map(|r| r.brand.clone())
            .collect();
        info!(season = %week.label, top = %top_brands.join(", "), "Top brands");

        report.rankings.push(SeasonRanking {
            season: week.label.clone(),
            table: outcome.table,
            ranking,
            top_brands,
            failures: outcome.failures,
        });

        if options.scope == SeasonScope::FirstWithData {
            break;
        }
    }

    Ok(report)
}
