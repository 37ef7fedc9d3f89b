//! Version specifier parsing
//!
//! Supports partial version matching:
//! - 0.5.0 matches only 0.5.0
//! - 0.5 and 0.5.x match 0.5.0, 0.5.3, etc.
//! - 0.x matches 0.1.0, 0.5.3, etc.

use std::fmt;
use std::str::FromStr;

use semver::Version;

use crate::version::error::SpecifierError;

/// A version prefix with 1-3 fixed numeric components.
///
/// Omitted components and wildcards (`x`, `X`, `*`) both match any value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionSpecifier {
    pub major: u64,
    pub minor: Option<u64>,
    pub patch: Option<u64>,
}

impl VersionSpecifier {
    pub fn parse(input: &str) -> Result<Self, SpecifierError> {
        let trimmed = input.trim();
        let body = trimmed.strip_prefix('v').unwrap_or(trimmed);
        if body.is_empty() {
            return Err(SpecifierError::Empty);
        }

        let parts: Vec<&str> = body.split('.').collect();
        if parts.len() > 3 {
            return Err(SpecifierError::TooManyComponents(input.to_string()));
        }

        let mut fixed = Vec::with_capacity(3);
        let mut wildcard_seen = false;
        for part in parts {
            match parse_component(part, input)? {
                Some(value) if !wildcard_seen => fixed.push(value),
                Some(_) => return Err(SpecifierError::FixedAfterWildcard(input.to_string())),
                None => wildcard_seen = true,
            }
        }

        let Some(&major) = fixed.first() else {
            return Err(SpecifierError::MissingMajor(input.to_string()));
        };

        Ok(Self {
            major,
            minor: fixed.get(1).copied(),
            patch: fixed.get(2).copied(),
        })
    }

    /// Whether the version agrees with every fixed component of this specifier
    pub fn matches(&self, version: &Version) -> bool {
        version.major == self.major
            && self.minor.is_none_or(|minor| version.minor == minor)
            && self.patch.is_none_or(|patch| version.patch == patch)
    }

    /// The concrete version named by a fully fixed specifier ("0.5.0")
    pub fn as_exact(&self) -> Option<Version> {
        Some(Version::new(self.major, self.minor?, self.patch?))
    }
}

impl FromStr for VersionSpecifier {
    type Err = SpecifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for VersionSpecifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.major)?;
        match (self.minor, self.patch) {
            (Some(minor), Some(patch)) => write!(f, ".{minor}.{patch}"),
            (Some(minor), None) => write!(f, ".{minor}.x"),
            _ => write!(f, ".x"),
        }
    }
}

/// Returns Some(value) for a numeric component, None for a wildcard.
fn parse_component(part: &str, input: &str) -> Result<Option<u64>, SpecifierError> {
    if matches!(part, "x" | "X" | "*") {
        return Ok(None);
    }
    let invalid = || SpecifierError::InvalidComponent {
        specifier: input.to_string(),
        component: part.to_string(),
    };
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    if part.len() > 1 && part.starts_with('0') {
        return Err(invalid());
    }
    part.parse().map(Some).map_err(|_| invalid())
}
