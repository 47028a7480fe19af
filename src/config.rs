//! Fixed locations, defaults and the trends client settings.

use std::time::Duration;

/// Listing page of the houses taking part in Paris Fashion Week.
pub const LISTING_URL: &str = "https://www.fhcm.paris/en/paris-fashion-week/maisons";

pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

pub const COLLECTOR_TIMEOUT: Duration = Duration::from_secs(10);

pub const DEFAULT_DATA_DIR: &str = "data";
pub const HOUSES_FILE: &str = "paris_fashion_houses.csv";
pub const OVERALL_TRENDS_FILE: &str = "overall_fashion_trends_data.csv";
pub const SEASON_TRENDS_FILE: &str = "fw_fashion_trends_data.csv";

pub const DEFAULT_TIMEFRAME: &str = "today 12-m";
pub const DEFAULT_BATCH_SIZE: usize = 5;
pub const DEFAULT_BATCH_DELAY_SECS: u64 = 2;

/// Number of brands reported as "top" for a season.
pub const TOP_BRANDS: usize = 10;

pub const TRENDS_BASE_URL: &str = "https://trends.google.com/trends";

/// Connection settings for the Google Trends client.
///
/// `hl` is the interface locale; its last two characters double as the
/// country used when requesting the session cookie. `tz` is the offset in
/// minutes Google applies to returned timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendsSettings {
    pub base_url: String,
    pub hl: String,
    pub tz: i32,
    pub category: u32,
    pub property: String,
    pub timeout: Duration,
}

impl Default for TrendsSettings {
    fn default() -> Self {
        Self {
            base_url: TRENDS_BASE_URL.to_string(),
            hl: "en-US".to_string(),
            tz: 360,
            category: 0,
            property: String::new(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl TrendsSettings {
    /// Defaults overridden by `TRENDS_BASE_URL`, `TRENDS_HL` and `TRENDS_TZ`.
    ///
    /// An unparsable `TRENDS_TZ` is ignored.
    pub fn from_env() -> Self {
        let mut settings = Self::default();
        if let Ok(url) = std::env::var("TRENDS_BASE_URL") {
            settings.base_url = url.trim_end_matches('/').to_string();
        }
        if let Ok(hl) = std::env::var("TRENDS_HL") {
            settings.hl = hl;
        }
        if let Some(tz) = std::env::var("TRENDS_TZ").ok().and_then(|v| v.parse().ok()) {
            settings.tz = tz;
        }
        settings
    }

    /// Country code sent when fetching the session cookie (`en-US` → `US`).
    pub fn cookie_geo(&self) -> &str {
        let start = self.hl.len().saturating_sub(2);
        self.hl.get(start..).unwrap_or("US")
    }
}
