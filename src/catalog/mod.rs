pub mod deezer;
pub mod spotify;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::{Playlist, PlaylistPage, PlaylistSummary, Track};

pub use deezer::DeezerClient;
pub use spotify::SpotifyClient;

/// Music catalog the game draws its tracks from.
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Every usable track of the playlist, in catalog order.
    async fn fetch_all_tracks(&self, playlist_id: &str) -> Result<Vec<Track>>;

    async fn fetch_playlist_meta(&self, playlist_id: &str) -> Result<Playlist>;

    async fn fetch_playlist_summary(&self, playlist_id: &str) -> Result<PlaylistSummary>;

    async fn search_playlists(&self, query: &str, offset: u32, limit: u32)
    -> Result<PlaylistPage>;

    /// Whether the raw query is a bare playlist id for this catalog.
    fn is_playlist_id(&self, query: &str) -> bool;

    /// Extract the playlist id from a playlist URL, if the query is one.
    fn playlist_id_from_url(&self, query: &str) -> Option<String>;

    fn name(&self) -> &'static str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Deezer,
    Spotify,
}

impl FromStr for ProviderKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "deezer" => Ok(ProviderKind::Deezer),
            "spotify" => Ok(ProviderKind::Spotify),
            other => Err(AppError::Config(format!(
                "Unknown catalog provider: {}",
                other
            ))),
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderKind::Deezer => write!(f, "deezer"),
            ProviderKind::Spotify => write!(f, "spotify"),
        }
    }
}

/// Build the provider selected by `config`.
pub async fn connect(config: &Config) -> Result<Arc<dyn CatalogProvider>> {
    match config.provider {
        ProviderKind::Deezer => Ok(Arc::new(DeezerClient::new(config)?)),
        ProviderKind::Spotify => Ok(Arc::new(SpotifyClient::new(config).await?)),
    }
}

/// Last path segment of a playlist URL, ignoring any query string.
pub(crate) fn last_path_segment(url_str: &str) -> Option<String> {
    let url = url::Url::parse(url_str).ok()?;
    url.path_segments()?
        .filter(|segment| !segment.is_empty())
        .next_back()
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_kind_parse() {
        assert_eq!("deezer".parse::<ProviderKind>().unwrap(), ProviderKind::Deezer);
        assert_eq!(" Spotify ".parse::<ProviderKind>().unwrap(), ProviderKind::Spotify);
        assert!("tidal".parse::<ProviderKind>().is_err());
    }

    #[test]
    fn test_last_path_segment() {
        assert_eq!(
            last_path_segment(
                "https://open.spotify.com/playlist/1p3I3zrVPmJXbmYUcA7kJz?si=iNcr5LgOSG-JMLU6D-o84A"
            ),
            Some("1p3I3zrVPmJXbmYUcA7kJz".to_string())
        );
        assert_eq!(
            last_path_segment("https://www.deezer.com/fr/playlist/908622995"),
            Some("908622995".to_string())
        );
        assert_eq!(last_path_segment("not a url"), None);
    }
}
