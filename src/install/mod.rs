//! Tool acquisition layer
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  Installer  │────▶│ ReleaseIndex│────▶│   Matcher   │
//! │ (get_tool)  │     │   (list)    │     │  (resolve)  │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!        │
//!        ▼
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  ToolCache  │◀────│   Extract   │◀────│ Downloader  │
//! │(find/commit)│     │ (staging)   │     │ (temp file) │
//! └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`installer`]: `Installer::get_tool`, the entry point callers use
//! - [`cache`]: On-disk tool cache with `.complete` markers
//! - [`download`]: `Downloader` trait and HTTP implementation
//! - [`extract`]: Archive extraction into a staging directory
//! - [`error`]: Installation error taxonomy

pub mod cache;
pub mod download;
pub mod error;
pub mod extract;
pub mod installer;

pub use cache::{CacheSlot, ToolCache};
pub use error::{AcquireError, InstallError};
pub use installer::Installer;
