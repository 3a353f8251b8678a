//! # Repository Pattern Implementation
//!
//! Data access for the song catalog.
//!
//! - `SongRepository` defines the interface the service layer depends on
//! - `SqliteSongRepository` implements it with sqlx over SQLite
//! - List queries take a `PageRequest` limit/offset window

pub mod pagination;
pub mod song;

pub use pagination::{PageRequest, DEFAULT_LIMIT, MAX_LIMIT};
pub use song::{SongRepository, SqliteSongRepository};
