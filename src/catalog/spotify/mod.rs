pub mod client;
pub mod models;

pub use client::{SpotifyClient, is_spotify_id, spotify_playlist_id_from_url};
