//! # Song Service
//!
//! Orchestrates song operations on top of a [`SongRepository`].
//!
//! Every operation is tagged with an `op` name in its log events. Repository
//! failures are logged at error level and returned wrapped in
//! [`CoreError::Library`] with the same tag.

use crate::enrichment::TrackInfoProvider;
use crate::error::{CoreError, Result};
use crate::lyrics::LyricsPage;
use core_library::models::{NewSong, Song, SongFilter};
use core_library::repositories::{PageRequest, SongRepository};
use core_library::LibraryError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Result of creating a song.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedSong {
    pub id: i64,
    pub message: String,
}

/// Song catalog operations.
#[derive(Clone)]
pub struct SongService {
    repository: Arc<dyn SongRepository>,
    track_info: Option<Arc<dyn TrackInfoProvider>>,
}

impl SongService {
    pub fn new(repository: Arc<dyn SongRepository>) -> Self {
        Self {
            repository,
            track_info: None,
        }
    }

    /// Fill in missing release dates and links on create from `provider`.
    pub fn with_track_info(mut self, provider: Arc<dyn TrackInfoProvider>) -> Self {
        self.track_info = Some(provider);
        self
    }

    /// Create a song.
    ///
    /// When a track-info provider is configured and the song arrives without
    /// a release date or link, the provider is asked for them first. Lookup
    /// failures are logged and do not fail the create.
    ///
    /// # Errors
    /// - `InvalidInput` if the group or song name is blank
    /// - `AlreadyExists` (via [`CoreError::kind`]) if the pair is taken
    pub async fn create_song(&self, mut new_song: NewSong) -> Result<CreatedSong> {
        const OP: &str = "service.song.CreateSong";
        debug!(op = OP, group = %new_song.group_name, song = %new_song.song_name, "Creating song");

        new_song.validate().map_err(|(field, message)| {
            warn!(op = OP, field, error = %message, "Song rejected");
            CoreError::InvalidInput {
                field: field.to_string(),
                message,
            }
        })?;

        self.enrich(&mut new_song).await;

        let song = self
            .repository
            .save(&new_song)
            .await
            .map_err(|e| failed(OP, e))?;

        info!(op = OP, id = song.id, "Song created");
        Ok(CreatedSong {
            id: song.id,
            message: format!("Successfully created song id: {}", song.id),
        })
    }

    /// Rename a song's group and title.
    pub async fn update_song(
        &self,
        id: i64,
        new_group_name: &str,
        new_song_name: &str,
    ) -> Result<Song> {
        const OP: &str = "service.song.UpdateSong";
        debug!(op = OP, id, "Updating song");

        let song = self
            .repository
            .update(id, new_group_name, new_song_name)
            .await
            .map_err(|e| failed(OP, e))?;

        info!(op = OP, id, "Song updated");
        Ok(song)
    }

    pub async fn get_song(&self, id: i64) -> Result<Song> {
        const OP: &str = "service.song.GetSong";
        debug!(op = OP, id, "Fetching song");

        let song = self
            .repository
            .get_by_id(id)
            .await
            .map_err(|e| failed(OP, e))?;

        info!(op = OP, id, "Song found");
        Ok(song)
    }

    /// Delete a song, returning the repository's confirmation message.
    pub async fn delete_song(&self, id: i64) -> Result<String> {
        const OP: &str = "service.song.DeleteSong";
        debug!(op = OP, id, "Deleting song");

        let message = self
            .repository
            .remove(id)
            .await
            .map_err(|e| failed(OP, e))?;

        info!(op = OP, id, "Song deleted");
        Ok(message)
    }

    /// List songs matching `filter`, newest first.
    pub async fn list_songs(
        &self,
        filter: &SongFilter,
        page_request: PageRequest,
    ) -> Result<Vec<Song>> {
        const OP: &str = "service.song.ListSongs";
        debug!(
            op = OP,
            ?filter,
            limit = page_request.limit(),
            offset = page_request.offset(),
            "Listing songs"
        );

        let songs = self
            .repository
            .get_all(filter, page_request)
            .await
            .map_err(|e| failed(OP, e))?;

        info!(op = OP, count = songs.len(), "Songs fetched");
        Ok(songs)
    }

    /// Number of songs matching `filter`, ignoring any window.
    pub async fn count_songs(&self, filter: &SongFilter) -> Result<i64> {
        const OP: &str = "service.song.CountSongs";

        let total = self
            .repository
            .count(filter)
            .await
            .map_err(|e| failed(OP, e))?;

        debug!(op = OP, total, "Songs counted");
        Ok(total)
    }

    /// Fetch page `page` (1-based) of `limit` couplets of a song's lyrics.
    ///
    /// # Errors
    /// - `NotFound` if the song does not exist
    /// - `InvalidInput` if `page` or `limit` is zero
    /// - `OutOfRange` if the page starts past the last couplet
    pub async fn get_lyrics_page(&self, id: i64, page: u32, limit: u32) -> Result<LyricsPage> {
        const OP: &str = "service.song.GetLyricsPage";
        debug!(op = OP, id, page, limit, "Fetching lyrics page");

        let song = self
            .repository
            .get_by_id(id)
            .await
            .map_err(|e| failed(OP, e))?;

        let lyrics = LyricsPage::from_song(&song, page, limit).map_err(|e| {
            warn!(op = OP, id, error = %e, "Lyrics page rejected");
            e
        })?;

        info!(
            op = OP,
            id,
            page,
            returned = lyrics.couplets.len(),
            total = lyrics.total,
            "Lyrics retrieved"
        );
        Ok(lyrics)
    }

    async fn enrich(&self, new_song: &mut NewSong) {
        let Some(provider) = &self.track_info else {
            return;
        };
        if new_song.release_date.is_some() && !new_song.link.is_empty() {
            return;
        }

        match provider
            .fetch_track_info(&new_song.song_name, &new_song.group_name)
            .await
        {
            Ok(info) => {
                let found = !info.is_empty();
                if new_song.release_date.is_none() {
                    new_song.release_date = info.release_date;
                }
                if new_song.link.is_empty() {
                    if let Some(link) = info.link {
                        new_song.link = link;
                    }
                }
                debug!(
                    song = %new_song.song_name,
                    found,
                    "Track info lookup finished"
                );
            }
            Err(e) => {
                warn!(
                    song = %new_song.song_name,
                    group = %new_song.group_name,
                    error = %e,
                    "Track info lookup failed, creating song without it"
                );
            }
        }
    }
}

fn failed(op: &'static str, source: LibraryError) -> CoreError {
    error!(op, error = %source, "Repository operation failed");
    CoreError::library(op, source)
}
