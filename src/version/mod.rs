//! Version resolution layer
//!
//! Turns a user-supplied specifier ("0.5", "0.x", "0.5.0") and the versions
//! known to exist into the single best concrete version.
//!
//! # Modules
//!
//! - [`specifier`]: Parsing of partial/wildcard version specifiers
//! - [`matcher`]: Highest-match selection over available versions
//! - [`semver`]: Release tag normalisation into concrete versions
//! - [`error`]: Specifier parse errors

pub mod error;
pub mod matcher;
pub mod semver;
pub mod specifier;
