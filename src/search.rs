use std::sync::Arc;

use tracing::debug;

use crate::catalog::CatalogProvider;
use crate::error::{AppError, Result};
use crate::models::SearchResponse;

pub const DEFAULT_SEARCH_LIMIT: u32 = 10;
pub const MAX_SEARCH_LIMIT: u32 = 100;

/// Normalize raw paging parameters.
///
/// A missing, non-numeric or negative offset becomes 0. A limit outside
/// `1..=100` becomes 10.
pub fn normalize_paging(offset: Option<&str>, limit: Option<&str>) -> (u32, u32) {
    let offset = offset
        .and_then(|raw| raw.trim().parse::<i64>().ok())
        .filter(|value| *value >= 0)
        .and_then(|value| u32::try_from(value).ok())
        .unwrap_or(0);

    let limit = limit
        .and_then(|raw| raw.trim().parse::<i64>().ok())
        .filter(|value| (1..=MAX_SEARCH_LIMIT as i64).contains(value))
        .map(|value| value as u32)
        .unwrap_or(DEFAULT_SEARCH_LIMIT);

    (offset, limit)
}

/// How a raw search query is interpreted against a catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchQuery {
    PlaylistId(String),
    PlaylistUrl(String),
    Text(String),
}

impl SearchQuery {
    pub fn classify(provider: &dyn CatalogProvider, query: &str) -> Self {
        if provider.is_playlist_id(query) {
            SearchQuery::PlaylistId(query.trim().to_string())
        } else if let Some(id) = provider.playlist_id_from_url(query) {
            SearchQuery::PlaylistUrl(id)
        } else {
            SearchQuery::Text(query.to_string())
        }
    }
}

#[derive(Clone)]
pub struct PlaylistSearch {
    provider: Arc<dyn CatalogProvider>,
}

impl PlaylistSearch {
    pub fn new(provider: Arc<dyn CatalogProvider>) -> Self {
        Self { provider }
    }

    pub async fn search(
        &self,
        query: Option<&str>,
        offset: u32,
        limit: u32,
    ) -> Result<SearchResponse> {
        let query = query.filter(|q| !q.is_empty()).ok_or(AppError::MissingQuery)?;

        match SearchQuery::classify(self.provider.as_ref(), query) {
            SearchQuery::PlaylistId(id) | SearchQuery::PlaylistUrl(id) => {
                debug!("Search query resolved to playlist {}", id);
                let summary = self.provider.fetch_playlist_summary(&id).await?;
                Ok(SearchResponse::single(summary))
            }
            SearchQuery::Text(text) => {
                let page = self.provider.search_playlists(&text, offset, limit).await?;
                Ok(SearchResponse { playlists: page })
            }
        }
    }
}
