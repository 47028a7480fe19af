//! Result types produced by the batch and season analyzers.

use chrono::NaiveDate;
use serde::Deserialize;

use crate::config::{DEFAULT_BATCH_SIZE, DEFAULT_TIMEFRAME};
use crate::error::Error;
use crate::table::{BrandInterest, InterestTable};

/// Parameters shared by every group of a batch run.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchQuery {
    pub batch_size: usize,
    pub timeframe: String,
    pub geo: String,
}

impl Default for BatchQuery {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            timeframe: DEFAULT_TIMEFRAME.to_string(),
            geo: String::new(),
        }
    }
}

/// A group whose query failed; its brands are absent from the table.
#[derive(Debug)]
pub struct GroupFailure {
    pub brands: Vec<String>,
    pub error: Error,
}

/// How much of a batch run produced data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coverage {
    /// Every group answered and at least one had data.
    Complete,
    /// Some groups failed, the others produced data.
    Partial,
    /// Nothing failed, but no group had data.
    NoData,
    /// Every group failed.
    Failed,
}

/// Combined result of a batch run.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub table: InterestTable,
    pub groups: usize,
    pub failures: Vec<GroupFailure>,
}

impl BatchOutcome {
    pub fn coverage(&self) -> Coverage {
        let failed = self.failures.len();
        match (self.table.is_empty(), failed) {
            (false, 0) => Coverage::Complete,
            (false, _) => Coverage::Partial,
            (true, 0) => Coverage::NoData,
            (true, n) if n == self.groups => Coverage::Failed,
            // Some groups answered with nothing and the rest failed.
            (true, _) => Coverage::Partial,
        }
    }
}

/// A named date range, e.g. one Paris Fashion Week.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FashionWeek {
    pub label: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Whether the season analyzer stops at the first season with data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeasonScope {
    #[default]
    FirstWithData,
    All,
}

/// Interest during one season and the brands ranked by it.
#[derive(Debug)]
pub struct SeasonRanking {
    pub season: String,
    pub table: InterestTable,
    pub ranking: Vec<BrandInterest>,
    pub top_brands: Vec<String>,
    pub failures: Vec<GroupFailure>,
}

/// Why a season produced no ranking.
#[derive(Debug)]
pub enum SkipReason {
    /// The period itself is unusable; it was never queried.
    Invalid(Error),
    NoData,
    /// Every group query failed.
    Failed(Vec<GroupFailure>),
}

#[derive(Debug)]
pub struct SeasonSkip {
    pub season: String,
    pub reason: SkipReason,
}

/// Everything one season-analysis run evaluated, in evaluation order.
#[derive(Debug, Default)]
pub struct SeasonReport {
    pub rankings: Vec<SeasonRanking>,
    pub skipped: Vec<SeasonSkip>,
}

impl SeasonReport {
    /// First season that yielded data.
    pub fn first(&self) -> Option<&SeasonRanking> {
        self.rankings.first()
    }
}
