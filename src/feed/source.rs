//! Collaborator traits at the feed boundary. Retrieval and serialization are
//! supplied by the embedding application; the pipeline only depends on these
//! contracts.

use async_trait::async_trait;

use super::types::{Feed, FeedItem};
use crate::error::Result;

/// Retrieves and parses an upstream feed. Failures surface as
/// [`Error::FeedUnavailable`]; this layer performs no retries.
///
/// [`Error::FeedUnavailable`]: crate::Error::FeedUnavailable
#[async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Feed>;
}

#[async_trait]
impl<T: FeedSource + ?Sized> FeedSource for std::sync::Arc<T> {
    async fn fetch(&self, url: &str) -> Result<Feed> {
        (**self).fetch(url).await
    }
}

/// Serializes the surviving items back into output feed content.
pub trait FeedWriter: Send + Sync {
    fn assemble(&self, feed: &Feed, items: &[FeedItem]) -> anyhow::Result<String>;
}
