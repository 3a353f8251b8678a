//! Song catalog service layer.
//!
//! Sits between the HTTP transport and the repository: orchestrates song
//! CRUD, paginates lyrics into couplet pages, and optionally enriches new
//! songs with release data looked up from a track-info endpoint.
//!
//! ```ignore
//! use core_service::SongService;
//! use std::sync::Arc;
//!
//! let service = SongService::new(Arc::new(SqliteSongRepository::new(pool)))
//!     .with_track_info(Arc::new(HttpTrackInfoProvider::new(base_url)?));
//!
//! let page = service.get_lyrics_page(id, 1, 10).await?;
//! ```

pub mod enrichment;
pub mod error;
pub mod lyrics;
pub mod songs;

pub use enrichment::{HttpTrackInfoProvider, TrackInfo, TrackInfoProvider};
pub use error::{CoreError, ErrorKind, Result};
pub use lyrics::{paginate_couplets, LyricsPage};
pub use songs::{CreatedSong, SongService};
