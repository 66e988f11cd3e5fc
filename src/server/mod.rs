pub mod handlers;

use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::alerts::Alerter;
use crate::cache::ResultCache;
use crate::catalog::CatalogProvider;
use crate::daily::DailySelector;
use crate::error::Result;
use crate::search::PlaylistSearch;

#[derive(Clone)]
pub struct AppState {
    pub selector: DailySelector,
    pub search: PlaylistSearch,
    pub alerter: Alerter,
}

impl AppState {
    /// One cache per process, shared by every request this instance serves.
    pub fn new(provider: Arc<dyn CatalogProvider>, alerter: Alerter) -> Self {
        Self {
            selector: DailySelector::new(provider.clone(), Arc::new(ResultCache::new())),
            search: PlaylistSearch::new(provider),
            alerter,
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/get-song", get(handlers::get_song))
        .route("/search-playlists", get(handlers::search_playlists))
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn serve(state: AppState, bind_addr: &str) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, create_router(state)).await?;
    Ok(())
}
