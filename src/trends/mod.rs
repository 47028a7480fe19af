//! Search-interest sources.
//!
//! [`TrendsSource`] is what the analyzers query; [`GoogleTrends`] implements it
//! against the Google Trends web endpoints.

mod google;

pub use google::{GoogleTrends, MAX_KEYWORDS};

use async_trait::async_trait;

use crate::error::Result;
use crate::table::InterestTable;

/// One search term associated with a brand, with its relative weight.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedQuery {
    pub query: String,
    pub value: i64,
}

/// Searches associated with a brand: the most frequent ones ("top") and
/// the fastest growing ones ("rising").
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RelatedQueries {
    pub top: Vec<RankedQuery>,
    pub rising: Vec<RankedQuery>,
}

impl RelatedQueries {
    pub fn is_empty(&self) -> bool {
        self.top.is_empty() && self.rising.is_empty()
    }
}

/// A provider of search-interest data.
///
/// `timeframe` uses the provider's syntax (`today 12-m`, or two dates
/// `YYYY-MM-DD YYYY-MM-DD`); an empty `geo` means worldwide.
#[async_trait]
pub trait TrendsSource: Send + Sync {
    /// Interest over time, one column per keyword in `keywords` order.
    /// No data is an empty table, not an error.
    async fn interest_over_time(
        &self,
        keywords: &[String],
        timeframe: &str,
        geo: &str,
    ) -> Result<InterestTable>;

    /// Top and rising searches related to `keyword`.
    async fn related_queries(&self, keyword: &str, timeframe: &str, geo: &str)
    -> Result<RelatedQueries>;
}
