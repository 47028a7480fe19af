use tracing::{info, warn};

use crate::analyzers::pacing::Pacer;
use crate::error::Result;
use crate::trends::{RelatedQueries, TrendsSource};

/// Related searches for one brand.
pub struct BrandRelated {
    pub brand: String,
    pub related: Result<RelatedQueries>,
}

/// Fetches related queries for each brand in turn, pausing between brands.
/// A failure for one brand is kept in its entry and does not stop the rest.
#[tracing::instrument(skip_all, fields(brands = brands.len(), timeframe = %timeframe))]
pub async fn collect_related<S, P>(
    source: &S,
    pacer: &P,
    brands: &[String],
    timeframe: &str,
    geo: &str,
) -> Vec<BrandRelated>
where
    S: TrendsSource + ?Sized,
    P: Pacer + ?Sized,
{
    let mut results = Vec::with_capacity(brands.len());
    for (i, brand) in brands.iter().enumerate() {
        if i > 0 {
            pacer.pause().await;
        }

        let related = source.related_queries(brand, timeframe, geo).await;
        match &related {
            Ok(r) => info!(brand = %brand, top = r.top.len(), rising = r.rising.len(), "Related queries collected"),
            Err(e) => warn!(brand = %brand, error = %e, "Related queries failed"),
        }
        results.push(BrandRelated {
            brand: brand.clone(),
            related,
        });
    }
    results
}
