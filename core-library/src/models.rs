//! Domain models for the song library
//!
//! This module contains the song entity, its creation input and the
//! query-time filter, with validation and database mapping.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Separator between couplets in a song's lyrics.
pub const COUPLET_SEPARATOR: &str = "\n\n";

// =============================================================================
// Song
// =============================================================================

/// A song in the catalog.
///
/// `id` is assigned by the store on insert and never changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Song {
    pub id: i64,
    pub group_name: String,
    #[sqlx(rename = "song_title")]
    pub song_name: String,
    pub release_date: Option<NaiveDate>,
    pub lyrics: String,
    pub link: String,
}

impl Song {
    /// Split the lyrics into couplets.
    ///
    /// Empty lyrics yield a single empty couplet, the same as splitting any
    /// other string without a separator.
    ///
    /// ```
    /// use core_library::models::Song;
    ///
    /// let song = Song {
    ///     id: 1,
    ///     group_name: "Muse".into(),
    ///     song_name: "Supermassive Black Hole".into(),
    ///     release_date: None,
    ///     lyrics: "Ooh baby\n\nI thought I was a fool".into(),
    ///     link: String::new(),
    /// };
    /// assert_eq!(song.couplets(), vec!["Ooh baby", "I thought I was a fool"]);
    /// ```
    pub fn couplets(&self) -> Vec<&str> {
        self.lyrics.split(COUPLET_SEPARATOR).collect()
    }

    /// Normalize a string for searching (lowercase, trimmed)
    pub fn normalize(s: &str) -> String {
        s.trim().to_lowercase()
    }
}

// =============================================================================
// NewSong
// =============================================================================

/// Input for creating a song. The store assigns the id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSong {
    pub group_name: String,
    pub song_name: String,
    #[serde(default)]
    pub release_date: Option<NaiveDate>,
    #[serde(default)]
    pub lyrics: String,
    #[serde(default)]
    pub link: String,
}

impl NewSong {
    pub fn new(group_name: impl Into<String>, song_name: impl Into<String>) -> Self {
        Self {
            group_name: group_name.into(),
            song_name: song_name.into(),
            ..Self::default()
        }
    }

    pub fn with_release_date(mut self, release_date: NaiveDate) -> Self {
        self.release_date = Some(release_date);
        self
    }

    pub fn with_lyrics(mut self, lyrics: impl Into<String>) -> Self {
        self.lyrics = lyrics.into();
        self
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = link.into();
        self
    }

    /// Validate creation input.
    ///
    /// Returns the offending field and a message on failure.
    pub fn validate(&self) -> Result<(), (&'static str, String)> {
        validate_names(&self.group_name, &self.song_name)
    }
}

/// Both halves of the song identity must be non-blank.
pub fn validate_names(group_name: &str, song_name: &str) -> Result<(), (&'static str, String)> {
    if group_name.trim().is_empty() {
        return Err(("group_name", "Group name cannot be empty".to_string()));
    }

    if song_name.trim().is_empty() {
        return Err(("song_name", "Song name cannot be empty".to_string()));
    }

    Ok(())
}

// =============================================================================
// SongFilter
// =============================================================================

/// Query-time filter for listing songs. Absent (or blank) fields do not
/// constrain the result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongFilter {
    /// Case-insensitive substring of the group name
    pub group_name: Option<String>,
    /// Case-insensitive substring of the song name
    pub song_name: Option<String>,
    /// Exact release date
    pub release_date: Option<NaiveDate>,
}

impl SongFilter {
    pub fn with_group_name(mut self, group_name: impl Into<String>) -> Self {
        self.group_name = Some(group_name.into());
        self
    }

    pub fn with_song_name(mut self, song_name: impl Into<String>) -> Self {
        self.song_name = Some(song_name.into());
        self
    }

    pub fn with_release_date(mut self, release_date: NaiveDate) -> Self {
        self.release_date = Some(release_date);
        self
    }
}
