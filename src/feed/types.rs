//! Structured feed document types, independent of any wire format.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A fetched feed document, as handed over by a `FeedSource` implementation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Feed {
    pub title: Option<String>,
    pub link: Option<String>,
    pub items: Vec<FeedItem>,
}

/// One feed entry. The publish instant is optional; callers substitute an
/// explicit per-mode fallback when it is missing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeedItem {
    pub id: Option<String>,
    pub title: Option<String>,
    pub link: Option<String>,
    pub published: Option<DateTime<Utc>>,
    pub categories: Vec<String>,
    pub author: Option<String>,
    pub body: Option<String>,
}

impl FeedItem {
    pub fn published_or(&self, fallback: DateTime<Utc>) -> DateTime<Utc> {
        self.published.unwrap_or(fallback)
    }
}

/// Assembled output content plus the mime type inferred from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedResult {
    pub content: String,
    pub mime_type: &'static str,
}

impl FeedResult {
    pub fn new(content: String) -> Self {
        let mime_type = if content.contains("<rss") {
            "application/rss+xml"
        } else if content.trim_start().starts_with('{') {
            "application/feed+json"
        } else {
            "application/atom+xml"
        };

        Self { content, mime_type }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_type_is_sniffed_from_content() {
        assert_eq!(
            FeedResult::new("<rss version=\"2.0\"/>".to_string()).mime_type,
            "application/rss+xml"
        );
        assert_eq!(
            FeedResult::new("{\"version\":\"https://jsonfeed.org/version/1.1\"}".to_string())
                .mime_type,
            "application/feed+json"
        );
        assert_eq!(
            FeedResult::new("<feed xmlns=\"http://www.w3.org/2005/Atom\"/>".to_string()).mime_type,
            "application/atom+xml"
        );
    }
}
