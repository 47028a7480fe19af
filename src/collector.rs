//! Scrapes fashion-house names from the FHCM listing page.

use scraper::{Html, Selector};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::fetch::{HttpClient, fetch_text};

/// Anchors whose `class` attribute is exactly `house offscreen` hold one
/// house name each. Reordered or extended class lists do not match.
///
/// ```html
/// <a href="/fr/maison/anrealage" class="house offscreen" data-img="...">ANREALAGE</a>
/// ```
pub const HOUSE_SELECTOR: &str = r#"a[class="house offscreen"]"#;

/// Fetches the listing at `url` and extracts the house names in page order.
///
/// # Errors
///
/// Transport failures and non-success statuses are returned as errors; a
/// page without any marker anchors is `Ok` with an empty list.
#[tracing::instrument(skip(client))]
pub async fn collect_houses<C: HttpClient + ?Sized>(client: &C, url: &str) -> Result<Vec<String>> {
    let html = fetch_text(client, url).await?;
    debug!(bytes = html.len(), "Listing page received");

    let houses = parse_houses(&html)?;
    info!(count = houses.len(), "Fashion houses extracted");
    Ok(houses)
}

/// Extracts the trimmed text of every marker anchor, duplicates included.
pub fn parse_houses(html: &str) -> Result<Vec<String>> {
    let document = Html::parse_document(html);
    let selector = Selector::parse(HOUSE_SELECTOR).map_err(|e| Error::Malformed {
        context: "house selector".to_string(),
        reason: e.to_string(),
    })?;

    Ok(document
        .select(&selector)
        .map(|a| a.text().collect::<String>().trim().to_string())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(anchors: &str) -> String {
        format!(
            r#"<!DOCTYPE html><html><body><div class="houses">{anchors}</div></body></html>"#
        )
    }

    #[test]
    fn test_parse_houses_in_document_order() {
        let html = listing(
            r#"<a href="/fr/maison/anrealage" class="house offscreen" data-ww="3">ANREALAGE</a>
               <a href="/fr/maison/chanel" class="house offscreen">  CHANEL
               </a>
               <a href="/fr/maison/dior" class="house offscreen">Dior</a>"#,
        );

        let houses = parse_houses(&html).unwrap();
        assert_eq!(houses, vec!["ANREALAGE", "CHANEL", "Dior"]);
    }

    #[test]
    fn test_parse_houses_ignores_reordered_classes() {
        let html = listing(
            r#"<a class="house offscreen">Kept</a>
               <a class="offscreen house">Reordered</a>"#,
        );
        assert_eq!(parse_houses(&html).unwrap(), vec!["Kept"]);
    }

    #[test]
    fn test_parse_houses_ignores_extra_classes() {
        let html = listing(
            r#"<a class="house offscreen emerg">Extra</a>
               <a class="featured house offscreen">Featured</a>
               <a class="house offscreen">Kept</a>"#,
        );
        assert_eq!(parse_houses(&html).unwrap(), vec!["Kept"]);
    }

    #[test]
    fn test_parse_houses_requires_both_classes() {
        let html = listing(
            r#"<a class="house shown">Shown</a>
               <a class="offscreen">Hidden</a>
               <div class="house offscreen">Not an anchor</div>
               <a class="house offscreen">Kept</a>"#,
        );

        assert_eq!(parse_houses(&html).unwrap(), vec!["Kept"]);
    }

    #[test]
    fn test_parse_houses_keeps_duplicates() {
        let html = listing(
            r#"<a class="house offscreen">Loewe</a><a class="house offscreen">Loewe</a>"#,
        );
        assert_eq!(parse_houses(&html).unwrap(), vec!["Loewe", "Loewe"]);
    }

    #[test]
    fn test_parse_houses_nested_text() {
        let html = listing(r#"<a class="house offscreen"><span>Maison</span> Margiela</a>"#);
        assert_eq!(parse_houses(&html).unwrap(), vec!["Maison Margiela"]);
    }

    #[test]
    fn test_parse_houses_without_marker_is_empty() {
        let html = listing(r#"<a class="brand">Chanel</a>"#);
        assert!(parse_houses(&html).unwrap().is_empty());
        assert!(parse_houses("").unwrap().is_empty());
    }
}
