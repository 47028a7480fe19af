use crate::error::{Error, Result};
use crate::fetch::client::HttpClient;
use async_trait::async_trait;
use reqwest::header::{HeaderName, HeaderValue, USER_AGENT};

/// An [`HttpClient`] wrapper that sets one fixed header on every request,
/// replacing any value already present.
pub struct WithHeader<C> {
    pub inner: C,
    name: HeaderName,
    value: HeaderValue,
}

impl<C> WithHeader<C> {
    pub fn new(inner: C, name: &str, value: &str) -> Result<Self> {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| Error::InvalidHeader(format!("{name}: {e}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| Error::InvalidHeader(format!("{name}: {e}")))?;
        Ok(Self { inner, name, value })
    }

    /// Identifies requests with the given `User-Agent` string.
    pub fn user_agent(inner: C, agent: &str) -> Result<Self> {
        Self::new(inner, USER_AGENT.as_str(), agent)
    }
}

#[async_trait]
impl<C: HttpClient> HttpClient for WithHeader<C> {
    async fn execute(&self, mut req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        req.headers_mut()
            .insert(self.name.clone(), self.value.clone());
        self.inner.execute(req).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::BasicClient;

    #[test]
    fn test_rejects_invalid_header_name() {
        let result = WithHeader::new(BasicClient::new(), "bad header", "x");
        assert!(matches!(result, Err(Error::InvalidHeader(_))));
    }

    #[test]
    fn test_rejects_invalid_header_value() {
        let result = WithHeader::user_agent(BasicClient::new(), "line\nbreak");
        assert!(matches!(result, Err(Error::InvalidHeader(_))));
    }

    #[test]
    fn test_user_agent_header_name() {
        let client = WithHeader::user_agent(BasicClient::new(), "agent/1.0").unwrap();
        assert_eq!(client.name, USER_AGENT);
        assert_eq!(client.value, "agent/1.0");
    }
}
