use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Spotify API error: {0}")]
    SpotifyApi(#[from] rspotify::ClientError),

    #[error("Deezer API error: {0}")]
    DeezerApi(String),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Playlist not found: {0}")]
    NotFound(String),

    #[error("Upstream catalog unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Playlist {playlist_id} has no playable tracks")]
    ZeroTracks { playlist_id: String },

    #[error("No search query")]
    MissingQuery,

    #[error("Unsupported operation: {0}")]
    Unsupported(String),
}

impl AppError {
    /// Status code used when the error reaches the HTTP boundary.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::MissingQuery => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = json!({
            "error": {
                "status": status.as_u16(),
                "message": self.to_string(),
            }
        });
        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
