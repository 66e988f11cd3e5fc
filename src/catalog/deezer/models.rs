use chrono::{DateTime, Datelike};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::models::{Artist, Image, Owner, Playlist, PlaylistSummary, Track};

#[derive(Debug, Deserialize)]
pub struct DeezerApiError {
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub code: i64,
}

#[derive(Debug, Deserialize)]
pub struct DeezerApiPlaylist {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub picture: Option<String>,
    #[serde(default)]
    pub picture_small: Option<String>,
    #[serde(default)]
    pub picture_medium: Option<String>,
    #[serde(default)]
    pub picture_big: Option<String>,
    #[serde(default)]
    pub picture_xl: Option<String>,
    #[serde(default)]
    pub creator: Option<DeezerApiCreator>,
    #[serde(default)]
    pub tracks: Option<DeezerApiTrackList>,
}

#[derive(Debug, Deserialize)]
pub struct DeezerApiCreator {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DeezerApiTrackList {
    /// Raw entries, parsed one by one so a malformed entry only drops itself.
    #[serde(default)]
    pub data: Vec<Value>,
}

#[derive(Debug, Deserialize)]
pub struct DeezerApiTrack {
    /// Negative for user-uploaded files.
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub preview: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub time_add: Option<i64>,
    pub artist: DeezerApiArtist,
    #[serde(default)]
    pub album: Option<DeezerApiAlbum>,
}

#[derive(Debug, Deserialize)]
pub struct DeezerApiArtist {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct DeezerApiAlbum {
    #[serde(default)]
    pub cover_xl: Option<String>,
}

impl DeezerApiTrack {
    /// Deezer tracks are usable when they are real tracks with a preview clip.
    pub fn is_usable(&self) -> bool {
        self.kind.as_deref() == Some("track")
            && self.preview.as_deref().is_some_and(|p| !p.is_empty())
    }

    pub fn into_track(self) -> Track {
        // time_add is when the track joined the playlist, not its release.
        let year = self
            .time_add
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .map(|added| added.year())
            .unwrap_or_default();

        Track::new(
            self.id.to_string(),
            self.title,
            vec![Artist {
                id: self.artist.id.to_string(),
                name: self.artist.name,
            }],
            year,
            self.preview.unwrap_or_default(),
            self.album.and_then(|a| a.cover_xl).unwrap_or_default(),
        )
    }
}

impl DeezerApiPlaylist {
    pub fn usable_tracks(self) -> Vec<Track> {
        self.tracks
            .map(|list| list.data)
            .unwrap_or_default()
            .into_iter()
            .filter(|entry| !entry.is_null())
            .filter_map(|entry| match serde_json::from_value::<DeezerApiTrack>(entry) {
                Ok(track) => Some(track),
                Err(e) => {
                    debug!("Skipping unreadable Deezer track entry: {}", e);
                    None
                }
            })
            .filter(DeezerApiTrack::is_usable)
            .map(DeezerApiTrack::into_track)
            .collect()
    }

    pub fn to_meta(&self) -> Playlist {
        Playlist {
            id: self.id.to_string(),
            name: self.title.clone(),
            image_url: self.picture_xl.clone().unwrap_or_default(),
        }
    }

    pub fn to_summary(&self) -> PlaylistSummary {
        let images = [
            &self.picture,
            &self.picture_small,
            &self.picture_medium,
            &self.picture_big,
            &self.picture_xl,
        ]
        .into_iter()
        .flatten()
        .map(|url| Image { url: url.clone() })
        .collect();

        PlaylistSummary {
            id: self.id.to_string(),
            images,
            name: self.title.clone(),
            description: self.description.clone().unwrap_or_default(),
            owner: Owner {
                display_name: self
                    .creator
                    .as_ref()
                    .and_then(|c| c.name.clone())
                    .unwrap_or_default(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_playlist() -> DeezerApiPlaylist {
        serde_json::from_value(json!({
            "id": 908622995,
            "title": "Best of 90s",
            "description": "Throwbacks",
            "picture": "https://img/p.jpg",
            "picture_small": "https://img/s.jpg",
            "picture_medium": "https://img/m.jpg",
            "picture_big": "https://img/b.jpg",
            "picture_xl": "https://img/xl.jpg",
            "creator": { "id": 1, "name": "deezer" },
            "tracks": {
                "data": [
                    {
                        "id": 3135556,
                        "title": "Wonderwall",
                        "preview": "https://cdns-preview/1.mp3",
                        "type": "track",
                        "time_add": 1_600_000_000,
                        "artist": { "id": 7, "name": "Oasis" },
                        "album": { "cover_xl": "https://cover/1.jpg" }
                    },
                    null,
                    {
                        "id": 2,
                        "title": "No Preview",
                        "preview": "",
                        "type": "track",
                        "artist": { "id": 8, "name": "Nobody" }
                    },
                    {
                        "id": 3,
                        "title": "Some Episode",
                        "preview": "https://cdns-preview/3.mp3",
                        "type": "episode",
                        "artist": { "id": 9, "name": "Podcaster" }
                    }
                ]
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_usable_tracks_filter_and_map() {
        let tracks = sample_playlist().usable_tracks();
        assert_eq!(tracks.len(), 1);

        let track = &tracks[0];
        assert_eq!(track.id, "3135556");
        assert_eq!(track.name, "Wonderwall");
        assert_eq!(track.formatted, "Oasis - Wonderwall");
        assert_eq!(track.artists.list[0].id, "7");
        assert_eq!(track.year, 2020);
        assert_eq!(track.preview_url, "https://cdns-preview/1.mp3");
        assert_eq!(track.img_src, "https://cover/1.jpg");
    }

    #[test]
    fn test_meta_uses_title_and_xl_picture() {
        let meta = sample_playlist().to_meta();
        assert_eq!(meta.id, "908622995");
        assert_eq!(meta.name, "Best of 90s");
        assert_eq!(meta.image_url, "https://img/xl.jpg");
    }

    #[test]
    fn test_summary_lists_pictures_in_order() {
        let summary = sample_playlist().to_summary();
        assert_eq!(summary.id, "908622995");
        assert_eq!(summary.owner.display_name, "deezer");
        let urls: Vec<_> = summary.images.iter().map(|i| i.url.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "https://img/p.jpg",
                "https://img/s.jpg",
                "https://img/m.jpg",
                "https://img/b.jpg",
                "https://img/xl.jpg"
            ]
        );
    }

    #[test]
    fn test_odd_entries_do_not_drop_the_playlist() {
        let playlist: DeezerApiPlaylist = serde_json::from_value(json!({
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
                    },
                    {
                        "id": -42,
                        "title": "Uploaded with preview",
                        "preview": "https://cdns-preview/u.mp3",
                        "type": "track",
                        "artist": { "id": -1, "name": "Me" }
                    },
                    { "id": "not-a-number", "type": "track" },
                    "garbage"
                ]
            }
        }))
        .unwrap();

        let ids: Vec<_> = playlist
            .usable_tracks()
            .into_iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(ids, vec!["3135556", "-42"]);
    }

    #[test]
    fn test_playlist_without_tracks() {
        let playlist: DeezerApiPlaylist =
            serde_json::from_value(json!({ "id": 1, "title": "Empty" })).unwrap();
        assert!(playlist.to_summary().images.is_empty());
        assert!(playlist.usable_tracks().is_empty());
    }
}
