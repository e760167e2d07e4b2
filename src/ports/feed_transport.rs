use async_trait::async_trait;

use crate::error::Result;

/// Retrieves one raw calendar feed body from its source URL.
#[async_trait]
pub trait FeedTransport: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String>;
}
