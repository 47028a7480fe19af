use tracing::{debug, info, warn};

use crate::analyzers::pacing::Pacer;
use crate::analyzers::types::{BatchOutcome, BatchQuery, GroupFailure};
use crate::error::{Error, Result};
use crate::table::InterestTable;
use crate::trends::TrendsSource;

/// Queries interest over time for `brands` in consecutive groups of
/// `query.batch_size`, pausing between groups, and joins the results.
///
/// A failing group is logged and recorded in [`BatchOutcome::failures`];
/// the remaining groups are still queried. Duplicate brands keep the
/// column from the first group that returned them.
///
/// # Errors
///
/// Only [`Error::InvalidBatchSize`] for a batch size of zero.
#[tracing::instrument(skip_all, fields(brands = brands.len(), timeframe = %query.timeframe))]
pub async fn collect_batched<S, P>(
    source: &S,
    pacer: &P,
    brands: &[String],
    query: &BatchQuery,
) -> Result<BatchOutcome>
where
    S: TrendsSource + ?Sized,
    P: Pacer + ?Sized,
{
    if query.batch_size == 0 {
        return Err(Error::InvalidBatchSize);
    }

    let mut tables = Vec::new();
    let mut failures = Vec::new();
    let mut groups = 0;

    for (i, group) in brands.chunks(query.batch_size).enumerate() {
        if i > 0 {
            pacer.pause().await;
        }
        groups += 1;
        info!(group = i + 1, brands = %group.join(", "), "Collecting interest over time");

        match source
            .interest_over_time(group, &query.timeframe, &query.geo)
            .await
        {
            Ok(table) if table.is_empty() => {
                debug!(group = i + 1, "No data for group");
            }
            Ok(table) => tables.push(table),
            Err(error) => {
                warn!(group = i + 1, error = %error, "Trends query failed");
                failures.push(GroupFailure {
                    brands: group.to_vec(),
                    error,
                });
            }
        }
    }

    let table = InterestTable::concat(tables);
    info!(
        groups,
        failed = failures.len(),
        rows = table.row_count(),
        columns = table.column_count(),
        "Batch collection finished"
    );

    Ok(BatchOutcome {
        table,
        groups,
        failures,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::testing::{CountingPacer, MockSource, names, table_for};
    use crate::analyzers::types::Coverage;

    fn query(batch_size: usize) -> BatchQuery {
        BatchQuery {
            batch_size,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_twelve_brands_in_groups_of_five() {
        let brands: Vec<String> = (1..=12).map(|i| format!("Brand {i:02}")).collect();
        let source = MockSource::by_name_length(3);
        let pacer = CountingPacer::default();

        let outcome = collect_batched(&source, &pacer, &brands, &query(5)).await.unwrap();

        let sizes: Vec<usize> = source.calls().iter().map(|c| c.keywords.len()).collect();
        assert_eq!(sizes, vec![5, 5, 2]);
        assert_eq!(pacer.count(), 2);
        assert_eq!(outcome.groups, 3);
        assert_eq!(outcome.table.column_count(), 12);
        assert_eq!(outcome.coverage(), Coverage::Complete);
    }

    #[tokio::test]
    async fn test_groups_preserve_input_order() {
        let brands = names(&["A", "B", "C", "D", "E", "F", "G"]);
        let source = MockSource::by_name_length(1);

        collect_batched(&source, &CountingPacer::default(), &brands, &query(3))
            .await
            .unwrap();

        let calls = source.calls();
        assert_eq!(calls[0].keywords, names(&["A", "B", "C"]));
        assert_eq!(calls[1].keywords, names(&["D", "E", "F"]));
        assert_eq!(calls[2].keywords, names(&["G"]));
        assert!(calls.iter().all(|c| c.timeframe == "today 12-m" && c.geo.is_empty()));
    }

    #[tokio::test]
    async fn test_two_brands_end_to_end() {
        let brands = names(&["Chanel", "Dior"]);
        let source = MockSource::new(|keywords, _| {
            Ok(table_for(keywords, 6, |name, row| match name {
                "Chanel" => 50 + row as u32,
                _ => 10 * row as u32,
            }))
        });

        let outcome = collect_batched(&source, &CountingPacer::default(), &brands, &query(1))
            .await
            .unwrap();

        let table = &outcome.table;
        assert_eq!(table.row_count(), 6);
        assert_eq!(table.column_count(), 2);
        assert_eq!(
            table.column("Chanel").unwrap().values,
            (50..56u32).map(Some).collect::<Vec<_>>()
        );
        assert_eq!(
            table.column("Dior").unwrap().values,
            (0..6u32).map(|r| Some(r * 10)).collect::<Vec<_>>()
        );
    }

    #[tokio::test]
    async fn test_duplicate_brand_keeps_first_group_values() {
        let brands = names(&["Loewe", "Celine", "Loewe"]);
        let source = MockSource::new(|keywords, _| {
            let first = keywords[0] == "Loewe" && keywords.len() == 2;
            Ok(table_for(keywords, 2, move |_, _| if first { 7 } else { 99 }))
        });

        let outcome = collect_batched(&source, &CountingPacer::default(), &brands, &query(2))
            .await
            .unwrap();

        assert_eq!(outcome.table.column_count(), 2);
        assert_eq!(
            outcome.table.column("Loewe").unwrap().values,
            vec![Some(7), Some(7)]
        );
    }

    #[tokio::test]
    async fn test_failed_group_does_not_abort() {
        let brands = names(&["A", "B", "C", "D"]);
        let source = MockSource::new(|keywords, _| {
            if keywords[0] == "A" {
                Err(Error::RateLimited {
                    url: "https://trends.example/api/explore".to_string(),
                })
            } else {
                Ok(table_for(keywords, 4, |_, _| 1))
            }
        });
        let pacer = CountingPacer::default();

        let outcome = collect_batched(&source, &pacer, &brands, &query(2)).await.unwrap();

        assert_eq!(source.calls().len(), 2);
        assert_eq!(pacer.count(), 1);
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].brands, names(&["A", "B"]));
        assert!(outcome.table.column("A").is_none());
        assert!(outcome.table.column("C").is_some());
        assert_eq!(outcome.coverage(), Coverage::Partial);
    }

    #[tokio::test]
    async fn test_all_groups_failing() {
        let brands = names(&["A", "B"]);
        let source = MockSource::new(|_, _| {
            Err(Error::Malformed {
                context: "test".to_string(),
                reason: "boom".to_string(),
            })
        });

        let outcome = collect_batched(&source, &CountingPacer::default(), &brands, &query(1))
            .await
            .unwrap();

        assert!(outcome.table.is_empty());
        assert_eq!(outcome.coverage(), Coverage::Failed);
    }

    #[tokio::test]
    async fn test_no_data_is_not_failure() {
        let brands = names(&["A", "B"]);
        let source = MockSource::new(|_, _| Ok(InterestTable::default()));

        let outcome = collect_batched(&source, &CountingPacer::default(), &brands, &query(5))
            .await
            .unwrap();

        assert!(outcome.table.is_empty());
        assert!(outcome.failures.is_empty());
        assert_eq!(outcome.coverage(), Coverage::NoData);
    }

    #[tokio::test]
    async fn test_empty_brand_list() {
        let source = MockSource::by_name_length(1);
        let pacer = CountingPacer::default();

        let outcome = collect_batched(&source, &pacer, &[], &query(5)).await.unwrap();

        assert!(source.calls().is_empty());
        assert_eq!(pacer.count(), 0);
        assert_eq!(outcome.groups, 0);
        assert_eq!(outcome.coverage(), Coverage::NoData);
    }

    #[tokio::test]
    async fn test_zero_batch_size_rejected() {
        let source = MockSource::by_name_length(1);
        let result = collect_batched(&source, &CountingPacer::default(), &names(&["A"]), &query(0)).await;
        assert!(matches!(result, Err(Error::InvalidBatchSize)));
        assert!(source.calls().is_empty());
    }
}
