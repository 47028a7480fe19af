use async_trait::async_trait;
use chrono::DateTime;
use reqwest::header::{COOKIE, HeaderValue, SET_COOKIE};
use reqwest::{Method, Request, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::TrendsSettings;
use crate::error::{Error, Result};
use crate::fetch::{HttpClient, read_text, send};
use crate::table::InterestTable;
use crate::trends::{RankedQuery, RelatedQueries, TrendsSource};

/// Google rejects explore requests comparing more terms than this.
pub const MAX_KEYWORDS: usize = 5;

const EXPLORE_PATH: &str = "api/explore";
const MULTILINE_PATH: &str = "api/widgetdata/multiline";
const RELATED_PATH: &str = "api/widgetdata/relatedsearches";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExploreRequest<'a> {
    comparison_item: Vec<ComparisonItem<'a>>,
    category: u32,
    property: &'a str,
}

#[derive(Serialize)]
struct ComparisonItem<'a> {
    keyword: &'a str,
    time: &'a str,
    geo: &'a str,
}

#[derive(Deserialize)]
struct ExploreResponse {
    #[serde(default)]
    widgets: Vec<Widget>,
}

/// A chart on the explore page. `request` is echoed back verbatim together
/// with `token` to fetch the chart's data.
#[derive(Debug, Deserialize)]
struct Widget {
    id: String,
    #[serde(default)]
    token: String,
    #[serde(default)]
    request: Value,
}

impl Widget {
    fn keyword(&self) -> Option<&str> {
        self.request
            .pointer("/restriction/complexKeywordsRestriction/keyword/0/value")
            .and_then(Value::as_str)
    }
}

#[derive(Deserialize)]
struct MultilineResponse {
    default: Timeline,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Timeline {
    #[serde(default)]
    timeline_data: Vec<TimelinePoint>,
}

/// One sample: unix seconds and one score per compared keyword.
#[derive(Deserialize)]
struct TimelinePoint {
    time: String,
    #[serde(default)]
    value: Vec<u32>,
}

#[derive(Deserialize)]
struct RelatedResponse {
    default: RankedLists,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RankedLists {
    #[serde(default)]
    ranked_list: Vec<RankedList>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RankedList {
    #[serde(default)]
    ranked_keyword: Vec<RankedQueryWire>,
}

#[derive(Deserialize)]
struct RankedQueryWire {
    query: String,
    value: i64,
}

/// Google Trends client.
///
/// Construct once per run and share by reference. Call
/// [`GoogleTrends::refresh_cookie`] first: without the session cookie Google
/// answers most data requests with 429.
pub struct GoogleTrends<C> {
    http: C,
    settings: TrendsSettings,
    cookie: Option<HeaderValue>,
}

impl<C: HttpClient> GoogleTrends<C> {
    pub fn new(http: C, settings: TrendsSettings) -> Self {
        Self {
            http,
            settings,
            cookie: None,
        }
    }

    /// Fetches the explore page and keeps its `NID` cookie for later requests.
    ///
    /// Returns whether a cookie was found.
    pub async fn refresh_cookie(&mut self) -> Result<bool> {
        let url = self.url("explore/", &[("geo", self.settings.cookie_geo().to_string())])?;
        let resp = send(&self.http, Request::new(Method::GET, url)).await?;

        let nid = resp
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .filter_map(|c| c.split(';').next())
            .find(|pair| pair.trim_start().starts_with("NID="))
            .map(str::trim);

        match nid {
            Some(pair) => {
                let value = HeaderValue::from_str(pair)
                    .map_err(|e| Error::InvalidHeader(format!("{COOKIE}: {e}")))?;
                self.cookie = Some(value);
                info!("Google Trends session cookie acquired");
                Ok(true)
            }
            None => {
                warn!("Google Trends did not set a session cookie");
                Ok(false)
            }
        }
    }

    fn url(&self, path: &str, params: &[(&str, String)]) -> Result<Url> {
        let base = format!("{}/{}", self.settings.base_url.trim_end_matches('/'), path);
        Url::parse_with_params(&base, params).map_err(|e| Error::InvalidUrl {
            url: base,
            reason: e.to_string(),
        })
    }

    async fn call<T: DeserializeOwned>(&self, method: Method, url: Url) -> Result<T> {
        let context = url.path().to_string();
        let mut req = Request::new(method, url);
        if let Some(cookie) = &self.cookie {
            req.headers_mut().insert(COOKIE, cookie.clone());
        }

        let resp = send(&self.http, req).await?;
        let body = read_text(resp).await?;
        let json = strip_xssi(&body).ok_or_else(|| Error::Malformed {
            context: context.clone(),
            reason: "no JSON object in body".to_string(),
        })?;
        debug!(endpoint = %context, bytes = json.len(), "Trends response received");
        Ok(serde_json::from_str(json)?)
    }

    async fn explore(&self, keywords: &[String], timeframe: &str, geo: &str) -> Result<Vec<Widget>> {
        let payload = ExploreRequest {
            comparison_item: keywords
                .iter()
                .map(|k| ComparisonItem {
                    keyword: k,
                    time: timeframe,
                    geo,
                })
                .collect(),
            category: self.settings.category,
            property: &self.settings.property,
        };
        let url = self.url(
            EXPLORE_PATH,
            &[
                ("hl", self.settings.hl.clone()),
                ("tz", self.settings.tz.to_string()),
                ("req", serde_json::to_string(&payload)?),
            ],
        )?;

        let resp: ExploreResponse = self.call(Method::POST, url).await?;
        Ok(resp.widgets)
    }

    async fn widget_data<T: DeserializeOwned>(&self, path: &str, widget: &Widget) -> Result<T> {
        let url = self.url(
            path,
            &[
                ("req", serde_json::to_string(&widget.request)?),
                ("token", widget.token.clone()),
                ("tz", self.settings.tz.to_string()),
            ],
        )?;
        self.call(Method::GET, url).await
    }
}

#[async_trait]
impl<C: HttpClient> TrendsSource for GoogleTrends<C> {
    #[tracing::instrument(skip(self))]
    async fn interest_over_time(
        &self,
        keywords: &[String],
        timeframe: &str,
        geo: &str,
    ) -> Result<InterestTable> {
        if keywords.len() > MAX_KEYWORDS {
            return Err(Error::TooManyKeywords {
                count: keywords.len(),
                limit: MAX_KEYWORDS,
            });
        }
        if keywords.is_empty() {
            return Ok(InterestTable::default());
        }

        let widgets = self.explore(keywords, timeframe, geo).await?;
        let widget = widgets
            .iter()
            .find(|w| w.id == "TIMESERIES")
            .ok_or_else(|| Error::Malformed {
                context: EXPLORE_PATH.to_string(),
                reason: "no TIMESERIES widget".to_string(),
            })?;

        let resp: MultilineResponse = self.widget_data(MULTILINE_PATH, widget).await?;
        timeline_to_table(keywords, resp.default.timeline_data)
    }

    #[tracing::instrument(skip(self))]
    async fn related_queries(
        &self,
        keyword: &str,
        timeframe: &str,
        geo: &str,
    ) -> Result<RelatedQueries> {
        let widgets = self.explore(&[keyword.to_string()], timeframe, geo).await?;
        let Some(widget) = widgets
            .iter()
            .find(|w| w.id.contains("RELATED_QUERIES") && w.keyword() == Some(keyword))
        else {
            debug!("No related-queries widget for keyword");
            return Ok(RelatedQueries::default());
        };

        let resp: RelatedResponse = self.widget_data(RELATED_PATH, widget).await?;
        let mut lists = resp.default.ranked_list.into_iter().map(|list| {
            list.ranked_keyword
                .into_iter()
                .map(|k| RankedQuery {
                    query: k.query,
                    value: k.value,
                })
                .collect::<Vec<_>>()
        });

        Ok(RelatedQueries {
            top: lists.next().unwrap_or_default(),
            rising: lists.next().unwrap_or_default(),
        })
    }
}

/// Drops the anti-XSSI prefix (`)]}'` and friends) Google puts before JSON.
fn strip_xssi(body: &str) -> Option<&str> {
    body.find('{').map(|start| &body[start..])
}

/// Builds a table from timeline samples, sorted by date, one column per
/// keyword. The per-sample partial flag is not carried over.
fn timeline_to_table(keywords: &[String], points: Vec<TimelinePoint>) -> Result<InterestTable> {
    if points.is_empty() {
        return Ok(InterestTable::default());
    }

    let mut rows = Vec::with_capacity(points.len());
    for point in points {
        let secs: i64 = point.time.parse().map_err(|_| Error::Malformed {
            context: MULTILINE_PATH.to_string(),
            reason: format!("bad timestamp {:?}", point.time),
        })?;
        let date = DateTime::from_timestamp(secs, 0).ok_or_else(|| Error::Malformed {
            context: MULTILINE_PATH.to_string(),
            reason: format!("timestamp out of range: {secs}"),
        })?;
        if point.value.len() != keywords.len() {
            return Err(Error::Malformed {
                context: MULTILINE_PATH.to_string(),
                reason: format!(
                    "{} values for {} keywords",
                    point.value.len(),
                    keywords.len()
                ),
            });
        }
        rows.push((date, point.value));
    }
    rows.sort_by_key(|(date, _)| *date);

    let mut table = InterestTable::with_index(rows.iter().map(|(date, _)| *date).collect());
    for (i, keyword) in keywords.iter().enumerate() {
        table.push_column(keyword.as_str(), rows.iter().map(|(_, v)| Some(v[i])).collect())?;
    }
    Ok(table)
}
