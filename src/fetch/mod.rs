mod basic;
mod client;
mod header;

pub use basic::BasicClient;
pub use client::HttpClient;
pub use header::WithHeader;

use crate::error::{Error, Result};
use reqwest::{Method, Request, Response, StatusCode, Url};
use tracing::debug;

/// Parses `url`, reporting failures as [`Error::InvalidUrl`].
pub fn parse_url(url: &str) -> Result<Url> {
    url.parse::<Url>().map_err(|e| Error::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })
}

/// Sends `req` and turns non-success statuses into errors.
///
/// 429 becomes [`Error::RateLimited`]; any other non-2xx status becomes
/// [`Error::Status`].
pub async fn send<C: HttpClient + ?Sized>(client: &C, req: Request) -> Result<Response> {
    let url = req.url().to_string();
    debug!(method = %req.method(), url = %url, "Sending request");

    let resp = client
        .execute(req)
        .await
        .map_err(|source| Error::Http {
            url: url.clone(),
            source,
        })?;

    let status = resp.status();
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(Error::RateLimited { url });
    }
    if !status.is_success() {
        return Err(Error::Status { url, status });
    }
    Ok(resp)
}

/// Reads a response body as text.
pub async fn read_text(resp: Response) -> Result<String> {
    let url = resp.url().to_string();
    resp.text()
        .await
        .map_err(|source| Error::Http { url, source })
}

/// GETs `url` and returns the body of a successful response.
pub async fn fetch_text<C: HttpClient + ?Sized>(client: &C, url: &str) -> Result<String> {
    let req = Request::new(Method::GET, parse_url(url)?);
    let resp = send(client, req).await?;
    read_text(resp).await
}
