//! Feed document model and the collaborator traits around it.

mod json;
mod source;
mod types;

pub use self::json::JsonFeedWriter;
pub use self::source::{FeedSource, FeedWriter};
pub use self::types::{Feed, FeedItem, FeedResult};
