pub mod alerts;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod daily;
pub mod error;
pub mod models;
pub mod search;
pub mod selector;
pub mod server;

pub use alerts::Alerter;
pub use cache::{ResultCache, SelectionKey};
pub use catalog::{CatalogProvider, DeezerClient, ProviderKind, SpotifyClient};
pub use config::Config;
pub use daily::DailySelector;
pub use error::{AppError, Result};
pub use models::{Playlist, PlaylistSummary, SearchResponse, SelectionResult, Track};
pub use search::PlaylistSearch;
pub use selector::{seeded_shuffle, select_daily_index};
