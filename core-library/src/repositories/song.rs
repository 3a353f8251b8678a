//! Song repository trait and implementation

use crate::error::{LibraryError, Result};
use crate::models::{validate_names, NewSong, Song, SongFilter};
use crate::query::SongQuery;
use crate::repositories::PageRequest;
use async_trait::async_trait;
use sqlx::{query_as, SqlitePool};
use tracing::debug;

/// Song repository interface for data access operations
#[async_trait]
pub trait SongRepository: Send + Sync {
    /// Insert a new song and return it with its store-assigned id
    ///
    /// # Errors
    /// Returns error if:
    /// - A song with the same group and name already exists (`AlreadyExists`)
    /// - Group or song name is blank (`InvalidInput`)
    /// - Database error occurs
    async fn save(&self, song: &NewSong) -> Result<Song>;

    /// Find a song by its ID
    ///
    /// # Errors
    /// Returns `NotFound` if no song has this id
    async fn get_by_id(&self, id: i64) -> Result<Song>;

    /// Rename a song's group and title; every other field is left untouched
    ///
    /// # Errors
    /// Returns error if:
    /// - Song does not exist (`NotFound`)
    /// - The new pair collides with another song (`AlreadyExists`)
    /// - Group or song name is blank (`InvalidInput`)
    async fn update(&self, id: i64, new_group_name: &str, new_song_name: &str) -> Result<Song>;

    /// Delete a song by ID, returning a confirmation message
    ///
    /// # Errors
    /// Returns `NotFound` if no song has this id
    async fn remove(&self, id: i64) -> Result<String>;

    /// List songs matching a filter, newest id first
    ///
    /// Returns an empty list when nothing matches.
    async fn get_all(&self, filter: &SongFilter, page_request: PageRequest) -> Result<Vec<Song>>;

    /// Count songs matching a filter
    async fn count(&self, filter: &SongFilter) -> Result<i64>;
}

/// SQLite implementation of SongRepository
pub struct SqliteSongRepository {
    pool: SqlitePool,
}

impl SqliteSongRepository {
    /// Create a new SQLite song repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SongRepository for SqliteSongRepository {
    async fn save(&self, song: &NewSong) -> Result<Song> {
        song.validate().map_err(invalid_input)?;

        let saved = query_as::<_, Song>(
            r#"
            INSERT INTO songs (
                group_name, song_title, normalized_group_name, normalized_song_title,
                release_date, lyrics, link
            ) VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING id, group_name, song_title, release_date, lyrics, link
            "#,
        )
        .bind(&song.group_name)
        .bind(&song.song_name)
        .bind(Song::normalize(&song.group_name))
        .bind(Song::normalize(&song.song_name))
        .bind(song.release_date)
        .bind(&song.lyrics)
        .bind(&song.link)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, &song.group_name, &song.song_name))?;

        debug!(id = saved.id, "Song inserted");
        Ok(saved)
    }

    async fn get_by_id(&self, id: i64) -> Result<Song> {
        query_as::<_, Song>(
            "SELECT id, group_name, song_title, release_date, lyrics, link FROM songs WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| LibraryError::song_not_found(id))
    }

    async fn update(&self, id: i64, new_group_name: &str, new_song_name: &str) -> Result<Song> {
        validate_names(new_group_name, new_song_name).map_err(invalid_input)?;

        let result = sqlx::query(
            r#"
            UPDATE songs SET
                group_name = ?, song_title = ?,
                normalized_group_name = ?, normalized_song_title = ?
            WHERE id = ?
            "#,
        )
        .bind(new_group_name)
        .bind(new_song_name)
        .bind(Song::normalize(new_group_name))
        .bind(Song::normalize(new_song_name))
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, new_group_name, new_song_name))?;

        if result.rows_affected() == 0 {
            return Err(LibraryError::song_not_found(id));
        }

        self.get_by_id(id).await
    }

    async fn remove(&self, id: i64) -> Result<String> {
        let result = sqlx::query("DELETE FROM songs WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(LibraryError::song_not_found(id));
        }

        Ok(format!("Successfully deleted song id: {}", id))
    }

    async fn get_all(&self, filter: &SongFilter, page_request: PageRequest) -> Result<Vec<Song>> {
        let query = SongQuery::from_filter(filter);
        debug!(
            filtered = !query.is_unfiltered(),
            limit = page_request.limit(),
            offset = page_request.offset(),
            "Listing songs"
        );
        let mut select = query.select(page_request);

        let songs = select
            .build_query_as::<Song>()
            .fetch_all(&self.pool)
            .await?;

        Ok(songs)
    }

    async fn count(&self, filter: &SongFilter) -> Result<i64> {
        let mut count = SongQuery::from_filter(filter).count();

        let total: (i64,) = count
            .build_query_as::<(i64,)>()
            .fetch_one(&self.pool)
            .await?;

        Ok(total.0)
    }
}

fn invalid_input((field, message): (&'static str, String)) -> LibraryError {
    LibraryError::InvalidInput {
        field: field.to_string(),
        message,
    }
}

/// The unique (group_name, song_title) index is what enforces song identity;
/// surface its violation as `AlreadyExists`.
fn map_unique_violation(err: sqlx::Error, group_name: &str, song_name: &str) -> LibraryError {
    let is_unique_violation = err
        .as_database_error()
        .is_some_and(|db_err| db_err.is_unique_violation());

    if is_unique_violation {
        LibraryError::AlreadyExists {
            group_name: group_name.to_string(),
            song_name: song_name.to_string(),
        }
    } else {
        LibraryError::Database(err)
    }
}
