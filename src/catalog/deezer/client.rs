use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::alerts::Alerter;
use crate::catalog::deezer::models::{DeezerApiError, DeezerApiPlaylist};
use crate::catalog::{CatalogProvider, last_path_segment};
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::{Playlist, PlaylistPage, PlaylistSummary, Track};

const DEEZER_API_BASE: &str = "https://deezerdevs-deezer.p.rapidapi.com";
const DEEZER_API_HOST: &str = "deezerdevs-deezer.p.rapidapi.com";
const DEEZER_SEARCH_DOCS: &str = "https://developers.deezer.com/api/search";

/// Deezer's "no data" exception code.
const DEEZER_NO_DATA: i64 = 800;

pub struct DeezerClient {
    http_client: Client,
    api_key: String,
    alerter: Alerter,
}

impl DeezerClient {
    pub fn new(config: &Config) -> Result<Self> {
        let http_client = Client::builder().timeout(config.http_timeout).build()?;

        if config.deezer_rapidapi_key.is_empty() {
            warn!("X_RAPIDAPI_KEY_DEEZER is empty, Deezer requests will likely be rejected");
        }

        Ok(Self {
            http_client,
            api_key: config.deezer_rapidapi_key.clone(),
            alerter: Alerter::from_config(config),
        })
    }

    async fn get_playlist(&self, playlist_id: &str) -> Result<DeezerApiPlaylist> {
        let url = format!(
            "{}/playlist/{}",
            DEEZER_API_BASE,
            urlencoding::encode(playlist_id)
        );

        let response = self
            .http_client
            .get(&url)
            .header("x-rapidapi-key", &self.api_key)
            .header("x-rapidapi-host", DEEZER_API_HOST)
            .send()
            .await
            .map_err(|e| AppError::UpstreamUnavailable(format!("Deezer request failed: {}", e)))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(AppError::NotFound(playlist_id.to_string()));
        }
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::UpstreamUnavailable(format!(
                "Deezer returned {}: {}",
                status, error_text
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| AppError::DeezerApi(format!("Failed to parse playlist response: {}", e)))?;

        parse_playlist_body(playlist_id, body)
    }
}

/// Deezer reports failures as 200 responses with an `error` object.
pub(crate) fn parse_playlist_body(
    playlist_id: &str,
    mut body: Value,
) -> Result<DeezerApiPlaylist> {
    if let Some(error) = body.get_mut("error").map(Value::take) {
        let error: DeezerApiError = serde_json::from_value(error)?;
        if error.code == DEEZER_NO_DATA {
            return Err(AppError::NotFound(playlist_id.to_string()));
        }
        return Err(AppError::UpstreamUnavailable(format!(
            "Deezer {} ({}): {}",
            error.kind, error.code, error.message
        )));
    }

    Ok(serde_json::from_value(body)?)
}

/// Deezer playlist ids are plain integers.
pub fn is_deezer_id(value: &str) -> bool {
    !value.trim().is_empty() && value.trim().parse::<u64>().is_ok()
}

/// Accepts `https://www.deezer.com/<locale>/playlist/<digits>`.
pub fn deezer_playlist_id_from_url(value: &str) -> Option<String> {
    let url = url::Url::parse(value).ok()?;
    if url.scheme() != "https" || url.host_str()? != "www.deezer.com" {
        return None;
    }
    if url.query().is_some() || url.fragment().is_some() {
        return None;
    }

    let segments: Vec<&str> = url.path_segments()?.collect();
    match segments.as_slice() {
        [locale, kind, id]
            if locale.len() == 2
                && locale.chars().all(|c| c.is_ascii_alphabetic())
                && kind.eq_ignore_ascii_case("playlist")
                && !id.is_empty()
                && id.chars().all(|c| c.is_ascii_digit()) =>
        {
            last_path_segment(value)
        }
        _ => None,
    }
}

#[async_trait]
impl CatalogProvider for DeezerClient {
    async fn fetch_all_tracks(&self, playlist_id: &str) -> Result<Vec<Track>> {
        let playlist = self.get_playlist(playlist_id).await?;
        let tracks = playlist.usable_tracks();
        info!(
            "Fetched {} usable tracks from Deezer playlist {}",
            tracks.len(),
            playlist_id
        );
        Ok(tracks)
    }

    async fn fetch_playlist_meta(&self, playlist_id: &str) -> Result<Playlist> {
        Ok(self.get_playlist(playlist_id).await?.to_meta())
    }

    async fn fetch_playlist_summary(&self, playlist_id: &str) -> Result<PlaylistSummary> {
        Ok(self.get_playlist(playlist_id).await?.to_summary())
    }

    async fn search_playlists(
        &self,
        query: &str,
        _offset: u32,
        _limit: u32,
    ) -> Result<PlaylistPage> {
        let text = "The functionality to search for playlists is not yet provided by deezer.com";
        debug!("Rejecting Deezer playlist search for {:?}", query);
        self.alerter
            .notify(&format!("({}) {}", DEEZER_SEARCH_DOCS, text))
            .await;
        Err(AppError::Unsupported(text.to_string()))
    }

    fn is_playlist_id(&self, query: &str) -> bool {
        is_deezer_id(query)
    }

    fn playlist_id_from_url(&self, query: &str) -> Option<String> {
        deezer_playlist_id_from_url(query)
    }

    fn name(&self) -> &'static str {
        "deezer"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_is_deezer_id() {
        assert!(is_deezer_id("908622995"));
        assert!(is_deezer_id(" 42 "));
        assert!(!is_deezer_id(""));
        assert!(!is_deezer_id("best of 90s"));
        assert!(!is_deezer_id("1p3I3zrVPmJXbmYUcA7kJz"));
    }

    #[test]
    fn test_deezer_playlist_url() {
        assert_eq!(
            deezer_playlist_id_from_url("https://www.deezer.com/fr/playlist/908622995"),
            Some("908622995".to_string())
        );
        assert_eq!(
            deezer_playlist_id_from_url("https://WWW.DEEZER.COM/EN/PLAYLIST/123"),
            Some("123".to_string())
        );
        assert_eq!(
            deezer_playlist_id_from_url("https://www.deezer.com/playlist/908622995"),
            None
        );
        assert_eq!(
            deezer_playlist_id_from_url("https://www.deezer.com/fr/album/908622995"),
            None
        );
        assert_eq!(
            deezer_playlist_id_from_url("https://open.spotify.com/playlist/1p3I3zrVPmJXbmYUcA7kJz"),
            None
        );
        assert_eq!(deezer_playlist_id_from_url("rock classics"), None);
    }

    #[test]
    fn test_error_body_no_data_is_not_found() {
        let body = json!({
            "error": { "type": "DataException", "message": "no data", "code": 800 }
        });
        match parse_playlist_body("1", body) {
            Err(AppError::NotFound(id)) => assert_eq!(id, "1"),
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_error_body_other_is_upstream() {
        let body = json!({
            "error": { "type": "Exception", "message": "Quota limit exceeded", "code": 4 }
        });
        assert!(matches!(
            parse_playlist_body("1", body),
            Err(AppError::UpstreamUnavailable(_))
        ));
    }

    #[test]
    fn test_playlist_body_parses() {
        let body = json!({ "id": 5, "title": "Five", "picture_xl": "https://xl" });
        let playlist = parse_playlist_body("5", body).unwrap();
        assert_eq!(playlist.to_meta().image_url, "https://xl");
    }

    #[test]
    fn test_playlist_body_with_uploaded_track() {
        let body = json!({
            "id": 1,
            "title": "Mixed",
            "tracks": {
                "data": [
                    {
                        "id": 3135556,
                        "title": "Wonderwall",
                        "preview": "https://cdns-preview/1.mp3",
                        "type": "track",
                        "artist": { "id": 7, "name": "Oasis" }
                    },
                    {
                        "id": -1530938472,
                        "title": "my_upload.mp3",
                        "preview": "",
                        "type": "track",
                        "artist": { "id": 0, "name": "" }
                    }
                ]
            }
        });

        let tracks = parse_playlist_body("1", body).unwrap().usable_tracks();
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].id, "3135556");
    }

    #[tokio::test]
    async fn test_search_is_unsupported() {
        let config = Config::mock(crate::catalog::ProviderKind::Deezer);
        let client = DeezerClient::new(&config).unwrap();
        assert!(matches!(
            client.search_playlists("rock", 0, 10).await,
            Err(AppError::Unsupported(_))
        ));
    }
}
