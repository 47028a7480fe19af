//! In-memory trends source and pacer for analyzer tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};

use crate::analyzers::pacing::Pacer;
use crate::error::Result;
use crate::table::InterestTable;
use crate::trends::{RelatedQueries, TrendsSource};

#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub keywords: Vec<String>,
    pub timeframe: String,
    pub geo: String,
}

type Responder = dyn Fn(&[String], &str) -> Result<InterestTable> + Send + Sync;
type RelatedResponder = dyn Fn(&str) -> Result<RelatedQueries> + Send + Sync;

pub struct MockSource {
    calls: Mutex<Vec<Call>>,
    related_calls: Mutex<Vec<String>>,
    respond: Box<Responder>,
    related: Box<RelatedResponder>,
}

impl MockSource {
    pub fn new(respond: impl Fn(&[String], &str) -> Result<InterestTable> + Send + Sync + 'static) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            related_calls: Mutex::new(Vec::new()),
            respond: Box::new(respond),
            related: Box::new(|_| Ok(RelatedQueries::default())),
        }
    }

    /// Every keyword gets `rows` samples equal to its name's length.
    pub fn by_name_length(rows: usize) -> Self {
        Self::new(move |keywords, _| {
            Ok(table_for(keywords, rows, |name, _| name.chars().count() as u32))
        })
    }

    pub fn with_related(
        mut self,
        related: impl Fn(&str) -> Result<RelatedQueries> + Send + Sync + 'static,
    ) -> Self {
        self.related = Box::new(related);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn related_calls(&self) -> Vec<String> {
        self.related_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl TrendsSource for MockSource {
    async fn interest_over_time(
        &self,
        keywords: &[String],
        timeframe: &str,
        geo: &str,
    ) -> Result<InterestTable> {
        self.calls.lock().unwrap().push(Call {
            keywords: keywords.to_vec(),
            timeframe: timeframe.to_string(),
            geo: geo.to_string(),
        });
        (self.respond)(keywords, timeframe)
    }

    async fn related_queries(&self, keyword: &str, _timeframe: &str, _geo: &str) -> Result<RelatedQueries> {
        self.related_calls.lock().unwrap().push(keyword.to_string());
        (self.related)(keyword)
    }
}

/// Daily table from 2024-10-01 with one column per keyword.
pub fn table_for(keywords: &[String], rows: usize, value: impl Fn(&str, usize) -> u32) -> InterestTable {
    let start = Utc.with_ymd_and_hms(2024, 10, 1, 0, 0, 0).unwrap();
    let index = (0..rows).map(|i| start + Duration::days(i as i64)).collect();
    let mut table = InterestTable::with_index(index);
    for keyword in keywords {
        table
            .push_column(keyword.as_str(), (0..rows).map(|row| Some(value(keyword, row))).collect())
            .unwrap();
    }
    table
}

pub fn names(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

#[derive(Default)]
pub struct CountingPacer(AtomicUsize);

impl CountingPacer {
    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Pacer for CountingPacer {
    async fn pause(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}
