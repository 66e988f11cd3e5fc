use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use tracing::{debug, info};

use crate::cache::{ResultCache, SelectionKey};
use crate::catalog::CatalogProvider;
use crate::error::{AppError, Result};
use crate::models::SelectionResult;
use crate::selector::{seeded_shuffle, select_daily_index};

pub const DAY_IN_MS: i64 = 24 * 60 * 60 * 1000;

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
];

/// Parse a client-supplied date, falling back to `now`.
///
/// An absent or unparseable date is not an error: the caller simply gets
/// today's puzzle. Dates without an offset are read as UTC.
pub fn parse_date_or_now(input: Option<&str>, now: DateTime<Utc>) -> DateTime<Utc> {
    let Some(raw) = input.map(str::trim).filter(|s| !s.is_empty()) else {
        return now;
    };

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return parsed.with_timezone(&Utc);
    }
    if let Ok(parsed) = DateTime::parse_from_rfc2822(raw) {
        return parsed.with_timezone(&Utc);
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, format) {
            return parsed.and_utc();
        }
    }
    if let Some(midnight) = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
    {
        return midnight.and_utc();
    }

    debug!("Unparseable date {:?}, using current time", raw);
    now
}

/// Whole days since the Unix epoch, floored for pre-epoch timestamps.
pub fn full_days_since_epoch(timestamp: DateTime<Utc>) -> i64 {
    timestamp.timestamp_millis().div_euclid(DAY_IN_MS)
}

/// Resolves the daily answer for a playlist, memoizing per (playlist, day).
#[derive(Clone)]
pub struct DailySelector {
    provider: Arc<dyn CatalogProvider>,
    cache: Arc<ResultCache>,
}

impl DailySelector {
    pub fn new(provider: Arc<dyn CatalogProvider>, cache: Arc<ResultCache>) -> Self {
        Self { provider, cache }
    }

    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }

    pub async fn resolve(
        &self,
        playlist_id: &str,
        date_input: Option<&str>,
    ) -> Result<SelectionResult> {
        let timestamp = parse_date_or_now(date_input, Utc::now());
        self.resolve_for_day(playlist_id, full_days_since_epoch(timestamp)).await
    }

    pub async fn resolve_for_day(
        &self,
        playlist_id: &str,
        full_days_since_epoch: i64,
    ) -> Result<SelectionResult> {
        let key = SelectionKey::new(playlist_id, full_days_since_epoch);

        if let Some(cached) = self.cache.get(&key) {
            debug!("Getting result from cache for {}", key);
            return Ok(cached);
        }

        debug!("Getting result fresh for {}", key);
        let fresh = self.resolve_fresh(&key).await?;
        self.cache.put(key, fresh.clone());
        Ok(fresh)
    }

    async fn resolve_fresh(&self, key: &SelectionKey) -> Result<SelectionResult> {
        let playlist_id = key.playlist_id.as_str();
        let (options, playlist) = tokio::try_join!(
            self.provider.fetch_all_tracks(playlist_id),
            self.provider.fetch_playlist_meta(playlist_id),
        )?;

        if options.is_empty() {
            return Err(AppError::ZeroTracks {
                playlist_id: playlist_id.to_string(),
            });
        }

        let index = select_daily_index(key.full_days_since_epoch, options.len());
        let answer = seeded_shuffle(&options, playlist_id).swap_remove(index);

        info!(
            "Selected answer {} for playlist {} on day {} from {} {} tracks",
            answer.id,
            playlist_id,
            key.full_days_since_epoch,
            options.len(),
            self.provider.name()
        );

        // options stay in catalog order; only the answer comes from the shuffle
        Ok(SelectionResult {
            answer,
            options,
            playlist,
        })
    }
}
