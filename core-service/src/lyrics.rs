//! Couplet pagination over song lyrics.

use crate::error::{CoreError, Result};
use core_library::models::{Song, COUPLET_SEPARATOR};
use serde::{Deserialize, Serialize};

/// One page of a song's lyrics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LyricsPage {
    pub song_id: i64,
    pub title: String,
    pub group: String,
    pub page: u32,
    pub limit: u32,
    /// Total couplets in the song, not in this page
    pub total: usize,
    pub couplets: Vec<String>,
}

impl LyricsPage {
    /// Cut page `page` of `limit` couplets out of the song's lyrics.
    pub fn from_song(song: &Song, page: u32, limit: u32) -> Result<Self> {
        let (couplets, total) = paginate_couplets(&song.lyrics, page, limit)?;

        Ok(Self {
            song_id: song.id,
            title: song.song_name.clone(),
            group: song.group_name.clone(),
            page,
            limit,
            total,
            couplets,
        })
    }
}

/// Split `lyrics` into couplets and return the 1-based `page` of at most
/// `limit` of them, together with the total couplet count.
///
/// A page starting exactly at the end of the lyrics is empty; one starting
/// past it is [`CoreError::OutOfRange`].
///
/// ```
/// use core_service::paginate_couplets;
///
/// let lyrics = "A\n\nB\n\nC";
/// let (couplets, total) = paginate_couplets(lyrics, 2, 2).unwrap();
/// assert_eq!(couplets, vec!["C"]);
/// assert_eq!(total, 3);
/// ```
pub fn paginate_couplets(lyrics: &str, page: u32, limit: u32) -> Result<(Vec<String>, usize)> {
    if page == 0 {
        return Err(CoreError::InvalidInput {
            field: "page".to_string(),
            message: "Page must be at least 1".to_string(),
        });
    }
    if limit == 0 {
        return Err(CoreError::InvalidInput {
            field: "limit".to_string(),
            message: "Limit must be at least 1".to_string(),
        });
    }

    let couplets: Vec<&str> = lyrics.split(COUPLET_SEPARATOR).collect();
    let total = couplets.len();

    let start = (page as usize - 1).saturating_mul(limit as usize);
    if start > total {
        return Err(CoreError::OutOfRange { page, limit, total });
    }
    let end = start.saturating_add(limit as usize).min(total);

    let window = couplets[start..end].iter().map(|c| c.to_string()).collect();
    Ok((window, total))
}
