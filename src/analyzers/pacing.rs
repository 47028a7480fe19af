//! Pacing between consecutive trends queries.

use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// Decides how long to wait before the next query of a batch run.
#[async_trait]
pub trait Pacer: Send + Sync {
    async fn pause(&self);
}

/// Waits the same amount of time before every query after the first.
#[derive(Debug, Clone, Copy)]
pub struct FixedDelay(pub Duration);

impl FixedDelay {
    pub fn from_secs(secs: u64) -> Self {
        Self(Duration::from_secs(secs))
    }

    /// No waiting at all.
    pub fn none() -> Self {
        Self(Duration::ZERO)
    }
}

#[async_trait]
impl Pacer for FixedDelay {
    async fn pause(&self) {
        if self.0.is_zero() {
            return;
        }
        debug!(delay_ms = self.0.as_millis() as u64, "Pausing before next query");
        tokio::time::sleep(self.0).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fixed_delay_sleeps() {
        let start = std::time::Instant::now();
        FixedDelay(Duration::from_millis(30)).pause().await;
        assert!(start.elapsed() >= Duration::from_millis(30));
    }

    #[tokio::test]
    async fn test_none_returns_immediately() {
        let start = std::time::Instant::now();
        FixedDelay::none().pause().await;
        assert!(start.elapsed() < Duration::from_secs(1));
    }
}
