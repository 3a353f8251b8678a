//! Route handlers.
//!
//! Extractor rejections are taken as `Result`s so that malformed input is
//! reported through [`ApiError`] like every other failure.

use crate::dto::{
    HealthResponse, IdQuery, ListSongsQuery, LyricsQuery, MessageResponse, UpdateSongRequest,
    TOTAL_COUNT_HEADER,
};
use crate::error::ApiError;
use crate::AppState;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use core_library::db::health_check;
use core_library::models::{NewSong, Song};
use core_service::{CreatedSong, LyricsPage};
use tracing::warn;

type ApiResult<T> = Result<T, ApiError>;

/// GET /
pub async fn home() -> &'static str {
    "Welcome to the homepage!"
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> Response {
    match health_check(&state.pool).await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "ok".to_string(),
            }),
        )
            .into_response(),
        Err(e) => {
            warn!(error = %e, "Health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    status: "unavailable".to_string(),
                }),
            )
                .into_response()
        }
    }
}

/// POST /songs/create
pub async fn create_song(
    State(state): State<AppState>,
    body: Result<Json<NewSong>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<CreatedSong>)> {
    let Json(new_song) = body?;
    let created = state.service.create_song(new_song).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /songs/update
pub async fn update_song(
    State(state): State<AppState>,
    body: Result<Json<UpdateSongRequest>, JsonRejection>,
) -> ApiResult<Json<Song>> {
    let Json(request) = body?;
    let song = state
        .service
        .update_song(request.id, &request.new_group_name, &request.new_song_name)
        .await?;
    Ok(Json(song))
}

/// GET /songs/info?id=
pub async fn get_song(
    State(state): State<AppState>,
    query: Result<Query<IdQuery>, QueryRejection>,
) -> ApiResult<Json<Song>> {
    let Query(IdQuery { id }) = query?;
    let song = state.service.get_song(id).await?;
    Ok(Json(song))
}

/// DELETE /songs/delete?id=
pub async fn delete_song(
    State(state): State<AppState>,
    query: Result<Query<IdQuery>, QueryRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let Query(IdQuery { id }) = query?;
    let message = state.service.delete_song(id).await?;
    Ok(Json(MessageResponse::new(message)))
}

/// GET /songs?group_name=&song_name=&release_date=&limit=&offset=
///
/// The total number of matches, ignoring the window, is returned in the
/// `X-Total-Count` header.
pub async fn list_songs(
    State(state): State<AppState>,
    query: Result<Query<ListSongsQuery>, QueryRejection>,
) -> ApiResult<Response> {
    let Query(query) = query?;
    if query.limit == Some(0) {
        return Err(ApiError::bad_request("limit must be at least 1"));
    }

    let filter = query.filter();
    let songs = state
        .service
        .list_songs(&filter, query.page_request())
        .await?;
    let total = state.service.count_songs(&filter).await?;

    let mut response = Json(songs).into_response();
    response
        .headers_mut()
        .insert(TOTAL_COUNT_HEADER, HeaderValue::from(total));
    Ok(response)
}

/// GET /songs/{id}/lyrics?page=&limit=
pub async fn get_lyrics(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    query: Result<Query<LyricsQuery>, QueryRejection>,
) -> ApiResult<Json<LyricsPage>> {
    let Path(id) = path?;
    let Query(query) = query?;

    if query.page() == 0 {
        return Err(ApiError::bad_request("page must be at least 1"));
    }
    if query.limit() == 0 {
        return Err(ApiError::bad_request("limit must be at least 1"));
    }

    let lyrics = state
        .service
        .get_lyrics_page(id, query.page(), query.limit())
        .await?;
    Ok(Json(lyrics))
}
