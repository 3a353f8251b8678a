//! # Core Runtime Module
//!
//! Provides foundational runtime infrastructure for the song library service:
//! - Logging and tracing infrastructure
//! - Configuration management (builder + environment loading)
//!
//! ## Overview
//!
//! This crate contains the runtime utilities that the other crates depend on.
//! Nothing in here is global: the binary builds a [`config::CoreConfig`] and a
//! [`logging::LoggingConfig`] once at startup and hands them down explicitly.

pub mod config;
pub mod error;
pub mod logging;

pub use error::{Error, Result};
