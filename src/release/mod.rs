//! Remote release index
//!
//! # Modules
//!
//! - [`index`]: `ReleaseIndex` trait for listing releases
//! - [`github`]: GitHub Releases API implementation
//! - [`types`]: `ReleaseEntry` and per-platform asset selection
//! - [`error`]: Index error types

pub mod error;
pub mod github;
pub mod index;
pub mod types;
