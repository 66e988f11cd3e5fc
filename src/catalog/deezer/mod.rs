pub mod client;
pub mod models;

pub use client::{DeezerClient, deezer_playlist_id_from_url, is_deezer_id};
