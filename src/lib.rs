pub mod cache;
pub mod error;
pub mod feed;
pub mod logging;
pub mod request;
pub mod schedule;
pub mod service;

pub use error::{Error, Result};
pub use request::{Mode, ScheduleRequest};
pub use service::FeedService;

pub const TARGET_WEB_REQUEST: &str = "web_request";
pub const TARGET_CACHE: &str = "cache";
pub const TARGET_SCHEDULE: &str = "schedule";
