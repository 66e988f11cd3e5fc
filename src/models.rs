use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artist {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artists {
    pub list: Vec<Artist>,
    pub formatted: String,
}

impl Artists {
    pub fn new(list: Vec<Artist>) -> Self {
        let formatted = list
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        Self { list, formatted }
    }
}

/// A guessable track, normalized from whichever catalog supplied it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    pub id: String,
    pub name: String,
    pub formatted: String,
    pub year: i32,
    pub preview_url: String,
    pub img_src: String,
    pub artists: Artists,
}

impl Track {
    pub fn new(
        id: String,
        name: String,
        artists: Vec<Artist>,
        year: i32,
        preview_url: String,
        img_src: String,
    ) -> Self {
        let artists = Artists::new(artists);
        let formatted = format!("{} - {}", artists.formatted, name);
        Self {
            id,
            name,
            formatted,
            year,
            preview_url,
            img_src,
            artists,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Playlist {
    /// Upstream id; not part of the response body.
    #[serde(skip)]
    pub id: String,
    pub name: String,
    pub image_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionResult {
    pub answer: Track,
    pub options: Vec<Track>,
    pub playlist: Playlist,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    pub display_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistSummary {
    pub id: String,
    pub images: Vec<Image>,
    pub name: String,
    pub description: String,
    pub owner: Owner,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistPage {
    pub items: Vec<PlaylistSummary>,
    pub offset: u32,
    pub total: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub playlists: PlaylistPage,
}

impl SearchResponse {
    pub fn single(summary: PlaylistSummary) -> Self {
        Self {
            playlists: PlaylistPage {
                items: vec![summary],
                offset: 0,
                total: 1,
            },
        }
    }
}

#[cfg(test)]
impl Track {
    pub fn mock(id: &str, name: &str, artist: &str) -> Self {
        Self::new(
            id.to_string(),
            name.to_string(),
            vec![Artist {
                id: format!("artist-{}", id),
                name: artist.to_string(),
            }],
            1999,
            format!("https://cdn.example.com/preview/{}.mp3", id),
            format!("https://cdn.example.com/cover/{}.jpg", id),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_track_formats_all_artists() {
        let track = Track::new(
            "1".to_string(),
            "Under Pressure".to_string(),
            vec![
                Artist {
                    id: "a".to_string(),
                    name: "Queen".to_string(),
                },
                Artist {
                    id: "b".to_string(),
                    name: "David Bowie".to_string(),
                },
            ],
            1981,
            "https://p".to_string(),
            "https://i".to_string(),
        );

        assert_eq!(track.artists.formatted, "Queen, David Bowie");
        assert_eq!(track.formatted, "Queen, David Bowie - Under Pressure");
    }

    #[test]
    fn test_selection_result_serializes_camel_case() {
        let track = Track::mock("1", "Song", "Artist");
        let result = SelectionResult {
            answer: track.clone(),
            options: vec![track],
            playlist: Playlist {
                id: "42".to_string(),
                name: "Hits".to_string(),
                image_url: "https://img".to_string(),
            },
        };

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["answer"]["previewUrl"], "https://cdn.example.com/preview/1.mp3");
        assert_eq!(value["answer"]["imgSrc"], "https://cdn.example.com/cover/1.jpg");
        assert_eq!(value["answer"]["artists"]["formatted"], "Artist");
        assert_eq!(value["playlist"]["imageUrl"], "https://img");
        assert!(value["playlist"].get("id").is_none());
    }
}
