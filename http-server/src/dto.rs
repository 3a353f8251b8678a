//! Request and response bodies that have no domain counterpart.

use chrono::NaiveDate;
use core_library::models::SongFilter;
use core_library::repositories::{PageRequest, DEFAULT_LIMIT};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// Default lyrics page when the query omits it.
pub const DEFAULT_LYRICS_PAGE: u32 = 1;

/// Default couplets per lyrics page when the query omits it.
pub const DEFAULT_LYRICS_LIMIT: u32 = 10;

/// Header carrying the unwindowed match count on list responses.
pub const TOTAL_COUNT_HEADER: &str = "x-total-count";

#[derive(Debug, Deserialize)]
pub struct IdQuery {
    pub id: i64,
}

#[derive(Debug, Deserialize)]
pub struct UpdateSongRequest {
    pub id: i64,
    pub new_group_name: String,
    pub new_song_name: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListSongsQuery {
    pub group_name: Option<String>,
    pub song_name: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub release_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub limit: Option<u32>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub offset: Option<u32>,
}

impl ListSongsQuery {
    pub fn filter(&self) -> SongFilter {
        SongFilter {
            group_name: self.group_name.clone(),
            song_name: self.song_name.clone(),
            release_date: self.release_date,
        }
    }

    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(
            self.limit.unwrap_or(DEFAULT_LIMIT),
            self.offset.unwrap_or(0),
        )
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct LyricsQuery {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub page: Option<u32>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub limit: Option<u32>,
}

impl LyricsQuery {
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(DEFAULT_LYRICS_PAGE)
    }

    pub fn limit(&self) -> u32 {
        self.limit.unwrap_or(DEFAULT_LYRICS_LIMIT)
    }
}

/// An empty query value (`?limit=`) counts as absent; anything else must
/// parse.
fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(de::Error::custom),
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}
