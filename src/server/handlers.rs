use std::collections::HashMap;

use axum::{
    extract::{Query, State},
    http::{HeaderMap, Uri, header},
    response::{IntoResponse, Json, Response},
};
use serde_json::{Value, json};
use tracing::{error, info};

use crate::error::{AppError, Result};
use crate::models::SelectionResult;
use crate::search::normalize_paging;
use crate::server::AppState;

const SEARCH_CACHE_CONTROL: &str = "public, max-age=86400";

/// Value of the `sid` cookie, if the client sent one.
pub fn session_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == "sid")
        .map(|(_, value)| value.to_string())
}

pub async fn get_song(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
    uri: Uri,
) -> Result<Json<SelectionResult>> {
    let user_session_id = session_id(&headers);
    // An empty id is passed through and left for the catalog to reject.
    let playlist_id = params.get("playlist-id").map(String::as_str).unwrap_or("");
    let date = params.get("date").map(String::as_str);

    match state.selector.resolve(playlist_id, date).await {
        Ok(result) => {
            info!(
                event = "get-song:200",
                user_session_id = user_session_id.as_deref().unwrap_or(""),
                playlist_id,
                answer = %result.answer.id,
            );
            Ok(Json(result))
        }
        Err(e) => {
            error!(
                event = "get-song:500",
                user_session_id = user_session_id.as_deref().unwrap_or(""),
                playlist_id,
                error = %e,
            );
            state
                .alerter
                .notify(&format!(
                    "({})get-song:500:{}",
                    user_session_id.unwrap_or_default(),
                    uri
                ))
                .await;
            Err(e)
        }
    }
}

pub async fn search_playlists(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Result<Response> {
    let user_session_id = session_id(&headers);
    let (offset, limit) = normalize_paging(
        params.get("offset").map(String::as_str),
        params.get("limit").map(String::as_str),
    );

    match state
        .search
        .search(params.get("q").map(String::as_str), offset, limit)
        .await
    {
        Ok(results) => {
            info!(
                event = "search-playlists:200",
                user_session_id = user_session_id.as_deref().unwrap_or(""),
                total = results.playlists.total,
            );
            Ok((
                [(header::CACHE_CONTROL, SEARCH_CACHE_CONTROL)],
                Json(results),
            )
                .into_response())
        }
        Err(AppError::MissingQuery) => {
            info!(
                event = "search-playlists:400",
                user_session_id = user_session_id.as_deref().unwrap_or(""),
            );
            Err(AppError::MissingQuery)
        }
        Err(e) => {
            error!(
                event = "search-playlists:500",
                user_session_id = user_session_id.as_deref().unwrap_or(""),
                error = %e,
            );
            Err(e)
        }
    }
}

pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
