//! JSON Feed 1.1 output writer.

use serde::Serialize;

use super::source::FeedWriter;
use super::types::{Feed, FeedItem};

const JSON_FEED_VERSION: &str = "https://jsonfeed.org/version/1.1";

#[derive(Serialize)]
struct JsonFeedDocument<'a> {
    version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    home_page_url: Option<&'a str>,
    items: Vec<JsonFeedEntry<'a>>,
}

#[derive(Serialize)]
struct JsonFeedEntry<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    content_text: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    date_published: Option<String>,
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    tags: &'a [String],
    #[serde(skip_serializing_if = "Vec::is_empty")]
    authors: Vec<JsonFeedAuthor<'a>>,
}

#[derive(Serialize)]
struct JsonFeedAuthor<'a> {
    name: &'a str,
}

/// Emits the filtered feed as a JSON Feed 1.1 document.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFeedWriter;

impl FeedWriter for JsonFeedWriter {
    fn assemble(&self, feed: &Feed, items: &[FeedItem]) -> anyhow::Result<String> {
        let document = JsonFeedDocument {
            version: JSON_FEED_VERSION,
            title: feed.title.as_deref(),
            home_page_url: feed.link.as_deref(),
            items: items
                .iter()
                .map(|item| JsonFeedEntry {
                    id: item.id.as_deref(),
                    url: item.link.as_deref(),
                    title: item.title.as_deref(),
                    content_text: item.body.as_deref(),
                    date_published: item.published.map(|d| d.to_rfc3339()),
                    tags: &item.categories,
                    authors: item
                        .author
                        .as_deref()
                        .map(|name| vec![JsonFeedAuthor { name }])
                        .unwrap_or_default(),
                })
                .collect(),
        };

        Ok(serde_json::to_string(&document)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn assembles_selected_items_only() {
        let feed = Feed {
            title: Some("Example".to_string()),
            link: Some("https://example.com".to_string()),
            items: vec![FeedItem::default(), FeedItem::default()],
        };
        let selected = [FeedItem {
            id: Some("1".to_string()),
            title: Some("Kept".to_string()),
            published: Some(Utc.with_ymd_and_hms(2021, 5, 28, 6, 0, 0).unwrap()),
            categories: vec!["News".to_string()],
            ..Default::default()
        }];

        let content = JsonFeedWriter.assemble(&feed, &selected).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();

        assert_eq!(value["version"], JSON_FEED_VERSION);
        assert_eq!(value["title"], "Example");
        assert_eq!(value["items"].as_array().unwrap().len(), 1);
        assert_eq!(value["items"][0]["title"], "Kept");
        assert_eq!(value["items"][0]["tags"][0], "News");
    }
}
