use rspotify::model::{FullPlaylist, FullTrack, Image as SpotifyImage, SimplifiedPlaylist};
use rspotify::prelude::*;

use crate::models::{Artist, Image, Owner, Playlist, PlaylistSummary, Track};

/// Spotify lists images largest first; the game wants the smallest.
pub fn last_image_url(images: &[SpotifyImage]) -> String {
    images.last().map(|i| i.url.clone()).unwrap_or_default()
}

/// Year from an album release date (`YYYY`, `YYYY-MM` or `YYYY-MM-DD`).
pub fn release_year(release_date: Option<&str>) -> i32 {
    release_date
        .and_then(|date| date.split('-').next())
        .and_then(|year| year.parse().ok())
        .unwrap_or_default()
}

/// Tracks without an id or a preview clip cannot be played in the game.
pub fn track_from_spotify(track: &FullTrack) -> Option<Track> {
    let id = track.id.as_ref()?.id().to_string();
    let preview_url = track.preview_url.clone().filter(|url| !url.is_empty())?;

    let artists = track
        .artists
        .iter()
        .map(|a| Artist {
            id: a.id.as_ref().map(|id| id.id().to_string()).unwrap_or_default(),
            name: a.name.clone(),
        })
        .collect();

    Some(Track::new(
        id,
        track.name.clone(),
        artists,
        release_year(track.album.release_date.as_deref()),
        preview_url,
        last_image_url(&track.album.images),
    ))
}

pub fn playlist_meta(playlist: &FullPlaylist) -> Playlist {
    Playlist {
        id: playlist.id.id().to_string(),
        name: playlist.name.clone(),
        image_url: last_image_url(&playlist.images),
    }
}

fn summary_images(images: &[SpotifyImage]) -> Vec<Image> {
    images
        .iter()
        .map(|i| Image { url: i.url.clone() })
        .collect()
}

pub fn summary_from_full(playlist: &FullPlaylist) -> PlaylistSummary {
    PlaylistSummary {
        id: playlist.id.id().to_string(),
        images: summary_images(&playlist.images),
        name: playlist.name.clone(),
        description: playlist.description.clone().unwrap_or_default(),
        owner: Owner {
            display_name: playlist.owner.display_name.clone().unwrap_or_default(),
        },
    }
}

pub fn summary_from_simplified(playlist: &SimplifiedPlaylist) -> PlaylistSummary {
    PlaylistSummary {
        id: playlist.id.id().to_string(),
        images: summary_images(&playlist.images),
        name: playlist.name.clone(),
        // SimplifiedPlaylist carries no description
        description: String::new(),
        owner: Owner {
            display_name: playlist.owner.display_name.clone().unwrap_or_default(),
        },
    }
}
