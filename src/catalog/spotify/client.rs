use async_trait::async_trait;
use rspotify::{
    ClientCredsSpotify, Credentials,
    model::{PlayableItem, PlaylistId, SearchResult, SearchType},
    prelude::*,
};
use tracing::{debug, info};

use crate::catalog::spotify::models::{
    playlist_meta, summary_from_full, summary_from_simplified, track_from_spotify,
};
use crate::catalog::{CatalogProvider, last_path_segment};
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::{Playlist, PlaylistPage, PlaylistSummary, Track};

const MAX_SPOTIFY_PAGE_LIMIT: u32 = 100;
const SPOTIFY_PLAYLIST_URL_PREFIX: &str = "https://open.spotify.com/playlist/";
const SPOTIFY_PLAYLIST_URI_PREFIX: &str = "spotify:playlist:";

/// Spotify Web API catalog using client credentials.
/// Only public playlists are reachable.
pub struct SpotifyClient {
    client: ClientCredsSpotify,
}

impl SpotifyClient {
    pub async fn new(config: &Config) -> Result<Self> {
        if config.spotify_client_id.is_empty() || config.spotify_client_secret.is_empty() {
            return Err(AppError::Config(
                "SPOTIFY_CLIENT_ID and SPOTIFY_CLIENT_SECRET must be set".into(),
            ));
        }

        let creds = Credentials::new(&config.spotify_client_id, &config.spotify_client_secret);
        let client = ClientCredsSpotify::new(creds);

        client.request_token().await?;
        info!("Authenticated with Spotify using client credentials");

        Ok(Self { client })
    }

    fn parse_id(playlist_id: &str) -> Result<PlaylistId<'static>> {
        PlaylistId::from_id(playlist_id)
            .map(|id| id.into_static())
            .map_err(|_| AppError::NotFound(playlist_id.to_string()))
    }
}

/// Spotify ids are 22 base-62 characters.
pub fn is_spotify_id(value: &str) -> bool {
    value.len() == 22 && value.chars().all(|c| c.is_ascii_alphanumeric())
}

/// Accepts `https://open.spotify.com/playlist/<id>[?si=...]` and `spotify:playlist:<id>`.
pub fn spotify_playlist_id_from_url(value: &str) -> Option<String> {
    if let Some(id) = value.strip_prefix(SPOTIFY_PLAYLIST_URI_PREFIX) {
        return Some(id.to_string()).filter(|id| !id.is_empty());
    }
    if !value.contains(SPOTIFY_PLAYLIST_URL_PREFIX) {
        return None;
    }
    last_path_segment(value)
}

#[async_trait]
impl CatalogProvider for SpotifyClient {
    async fn fetch_all_tracks(&self, playlist_id: &str) -> Result<Vec<Track>> {
        let id = Self::parse_id(playlist_id)?;
        let mut tracks = Vec::new();
        let mut offset = 0;

        loop {
            let page = self
                .client
                .playlist_items_manual(
                    id.clone(),
                    None,
                    None,
                    Some(MAX_SPOTIFY_PAGE_LIMIT),
                    Some(offset),
                )
                .await?;

            for item in &page.items {
                match &item.track {
                    Some(PlayableItem::Track(track)) => match track_from_spotify(track) {
                        Some(mapped) => tracks.push(mapped),
                        None => debug!("Skipping unplayable track: {}", track.name),
                    },
                    _ => debug!("Skipping non-track playlist item"),
                }
            }

            offset += MAX_SPOTIFY_PAGE_LIMIT;
            if offset >= page.total {
                break;
            }
        }

        info!(
            "Fetched {} usable tracks from Spotify playlist {}",
            tracks.len(),
            playlist_id
        );
        Ok(tracks)
    }

    async fn fetch_playlist_meta(&self, playlist_id: &str) -> Result<Playlist> {
        let id = Self::parse_id(playlist_id)?;
        let playlist = self.client.playlist(id, None, None).await?;
        Ok(playlist_meta(&playlist))
    }

    async fn fetch_playlist_summary(&self, playlist_id: &str) -> Result<PlaylistSummary> {
        let id = Self::parse_id(playlist_id)?;
        let playlist = self.client.playlist(id, None, None).await?;
        Ok(summary_from_full(&playlist))
    }

    async fn search_playlists(
        &self,
        query: &str,
        offset: u32,
        limit: u32,
    ) -> Result<PlaylistPage> {
        let result = self
            .client
            .search(
                query,
                SearchType::Playlist,
                None,
                None,
                Some(limit),
                Some(offset),
            )
            .await?;

        match result {
            SearchResult::Playlists(page) => Ok(PlaylistPage {
                items: page.items.iter().map(summary_from_simplified).collect(),
                offset: page.offset,
                total: page.total,
            }),
            _ => Err(AppError::UpstreamUnavailable(
                "Spotify returned an unexpected search result type".into(),
            )),
        }
    }

    fn is_playlist_id(&self, query: &str) -> bool {
        is_spotify_id(query)
    }

    fn playlist_id_from_url(&self, query: &str) -> Option<String> {
        spotify_playlist_id_from_url(query)
    }

    fn name(&self) -> &'static str {
        "spotify"
    }
}
