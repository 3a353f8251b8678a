//! # Track Info Enrichment
//!
//! Looks up release metadata for a song from an external track-info
//! endpoint so that songs created without a release date or link can be
//! filled in.
//!
//! The endpoint answers `GET {base}/search?song=..&artist=..` with
//!
//! ```json
//! { "Release Date": "2006-07-16", "Spotify URL": "https://open.spotify.com/track/..." }
//! ```
//!
//! Lookups are best-effort: the service logs failures and carries on.

use crate::error::{CoreError, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const USER_AGENT: &str = concat!("songs-server/", env!("CARGO_PKG_VERSION"));

/// Release metadata found for a song.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackInfo {
    pub release_date: Option<NaiveDate>,
    pub link: Option<String>,
}

impl TrackInfo {
    pub fn is_empty(&self) -> bool {
        self.release_date.is_none() && self.link.is_none()
    }
}

/// Source of release metadata for songs.
#[async_trait]
pub trait TrackInfoProvider: Send + Sync {
    /// Look up `song_name` by `artist`.
    ///
    /// # Errors
    /// Returns [`CoreError::Enrichment`] on transport failures, non-200
    /// responses and malformed bodies.
    async fn fetch_track_info(&self, song_name: &str, artist: &str) -> Result<TrackInfo>;
}

#[derive(Debug, Deserialize)]
struct TrackInfoResponse {
    #[serde(rename = "Release Date", default)]
    release_date: String,
    #[serde(rename = "Spotify URL", default)]
    spotify_url: String,
}

impl From<TrackInfoResponse> for TrackInfo {
    fn from(response: TrackInfoResponse) -> Self {
        let release_date = match NaiveDate::parse_from_str(response.release_date.trim(), "%Y-%m-%d")
        {
            Ok(date) => Some(date),
            Err(_) => {
                if !response.release_date.trim().is_empty() {
                    debug!(value = %response.release_date, "Ignoring unparseable release date");
                }
                None
            }
        };

        let link = Some(response.spotify_url.trim().to_string()).filter(|url| !url.is_empty());

        Self { release_date, link }
    }
}

/// reqwest-backed [`TrackInfoProvider`].
pub struct HttpTrackInfoProvider {
    client: Client,
    base_url: String,
}

impl HttpTrackInfoProvider {
    /// Create a provider for the endpoint rooted at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .connect_timeout(CONNECT_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| CoreError::Enrichment(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self::with_client(client, base_url))
    }

    /// Use a preconfigured client.
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }
}

#[async_trait]
impl TrackInfoProvider for HttpTrackInfoProvider {
    async fn fetch_track_info(&self, song_name: &str, artist: &str) -> Result<TrackInfo> {
        let url = format!("{}/search", self.base_url);
        debug!(%url, song = song_name, artist, "Requesting track info");

        let response = self
            .client
            .get(&url)
            .query(&[("song", song_name), ("artist", artist)])
            .send()
            .await
            .map_err(|e| CoreError::Enrichment(format!("Request failed: {}", e)))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(CoreError::Enrichment(format!(
                "Received non-200 response: {}",
                status
            )));
        }

        let body: TrackInfoResponse = response
            .json()
            .await
            .map_err(|e| CoreError::Enrichment(format!("Malformed response body: {}", e)))?;

        Ok(body.into())
    }
}
