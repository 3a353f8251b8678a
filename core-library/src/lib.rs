//! # Song Library Module
//!
//! Owns the song catalog database and provides the repository used by the
//! service layer.
//!
//! ## Overview
//!
//! This module manages:
//! - SQLite connection pooling and embedded migrations
//! - The `Song` domain model and its filter/input types
//! - `SongRepository`, with a sqlx-backed SQLite implementation
//! - Parameterized filter queries with limit/offset windows

pub mod db;
pub mod error;
pub mod models;
pub mod query;
pub mod repositories;

pub use error::{LibraryError, Result};
