//! The filtering pipeline: cache lookup, fetch, mode-specific selection,
//! category filter, ordering, limit, cache store.

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::cache::Cache;
use crate::error::Result;
use crate::feed::{FeedItem, FeedResult, FeedSource, FeedWriter};
use crate::request::{Mode, ScheduleRequest};
use crate::schedule::clock::Clock;
use crate::schedule::{boundary, parser};
use crate::{TARGET_CACHE, TARGET_SCHEDULE, TARGET_WEB_REQUEST};

/// Orchestrates one request end to end over injected collaborators. The
/// service itself is stateless with respect to requests; concurrent calls
/// share nothing but the collaborators.
pub struct FeedService<S, C, W, K> {
    source: S,
    cache: C,
    writer: W,
    clock: K,
}

impl<S, C, W, K> FeedService<S, C, W, K>
where
    S: FeedSource,
    C: Cache,
    W: FeedWriter,
    K: Clock,
{
    pub fn new(source: S, cache: C, writer: W, clock: K) -> Self {
        Self {
            source,
            cache,
            writer,
            clock,
        }
    }

    pub async fn process(&self, request: &ScheduleRequest) -> Result<FeedResult> {
        let fingerprint = request.fingerprint();

        // Only Delay mode caches: its output is stable until the next
        // boundary crossing, which also supplies the expiry instant.
        if request.mode() == Mode::Delay {
            match self.cache.get(&fingerprint).await {
                Ok(Some(content)) => {
                    debug!(target: TARGET_CACHE, "serving {} from cache", request.url());
                    return Ok(FeedResult::new(content));
                }
                Ok(None) => {}
                Err(err) => {
                    warn!(
                        target: TARGET_CACHE,
                        "cache read failed for {}, treating as miss: {}", fingerprint, err
                    );
                }
            }
        }

        let feed = self.source.fetch(request.url()).await?;
        let windows = parser::unpack(request.when(), request.mode())?;
        let now = self.clock.now_utc();
        let tz = request.timezone();

        let mut cache_until = None;

        let items: Vec<FeedItem> = match request.mode() {
            Mode::Delay => {
                let boundary = boundary::last_boundary_before(now, &windows, tz);
                cache_until = Some(boundary::next_boundary_after(now, &windows, tz));
                debug!(
                    target: TARGET_SCHEDULE,
                    "publishing items up to {} for {}", boundary, request.url()
                );
                // Undated items compare as the boundary itself, so they are
                // always eligible here.
                feed.items
                    .iter()
                    .filter(|item| item.published_or(boundary) <= boundary)
                    .cloned()
                    .collect()
            }
            Mode::Include => feed
                .items
                .iter()
                .filter(|item| boundary::is_within_window(item.published_or(now), &windows, tz))
                .cloned()
                .collect(),
            Mode::Exclude => feed
                .items
                .iter()
                .filter(|item| !boundary::is_within_window(item.published_or(now), &windows, tz))
                .cloned()
                .collect(),
        };

        let items = filter_and_limit(items, request, now);
        info!(
            target: TARGET_WEB_REQUEST,
            "publishing {} of {} items for {}",
            items.len(),
            feed.items.len(),
            request.url()
        );

        let content = self.writer.assemble(&feed, &items)?;

        if request.mode() == Mode::Delay {
            if let Some(expires) = cache_until {
                if let Err(err) = self.cache.put(&fingerprint, expires, &content).await {
                    warn!(
                        target: TARGET_CACHE,
                        "cache write failed for {}: {}", fingerprint, err
                    );
                }
            }
        }

        Ok(FeedResult::new(content))
    }
}

/// Category filter, chronology enforcement and limit truncation, applied in
/// that order. Inclusion and exclusion terms both apply when both are given.
fn filter_and_limit(
    mut items: Vec<FeedItem>,
    request: &ScheduleRequest,
    now: DateTime<Utc>,
) -> Vec<FeedItem> {
    if !request.categories().is_empty() {
        let include: Vec<&str> = request
            .categories()
            .iter()
            .filter(|c| !c.starts_with('!'))
            .map(String::as_str)
            .collect();
        let exclude: Vec<&str> = request
            .categories()
            .iter()
            .filter_map(|c| c.strip_prefix('!'))
            .collect();

        if !include.is_empty() {
            items.retain(|item| {
                item.categories
                    .iter()
                    .any(|c| include.contains(&c.as_str()))
            });
        }

        if !exclude.is_empty() {
            items.retain(|item| {
                item.categories
                    .iter()
                    .all(|c| !exclude.contains(&c.as_str()))
            });
        }
    }

    if request.enforce_chronology() {
        items.sort_by(|a, b| b.published_or(now).cmp(&a.published_or(now)));
    }

    if request.limit() > 0 {
        items.truncate(request.limit());
    }

    items
}
