use semver::Version;
use thiserror::Error;

use crate::platform::Platform;
use crate::release::error::IndexError;

#[derive(Debug, Error)]
pub enum InstallError {
    #[error("Release index for {tool} unavailable: {source}")]
    IndexUnavailable {
        tool: String,
        #[source]
        source: IndexError,
    },

    #[error("No {tool} release matches version {specifier}")]
    VersionNotFound { tool: String, specifier: String },

    #[error("{tool} {version} has no release asset for {platform}")]
    AssetNotFound {
        tool: String,
        version: Version,
        platform: Platform,
    },

    #[error("Failed to acquire {tool} {version}: {source}")]
    AcquisitionFailed {
        tool: String,
        version: Version,
        #[source]
        source: AcquireError,
    },
}

#[derive(Debug, Error)]
pub enum AcquireError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Download of {url} failed with status {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to extract {archive}: {reason}")]
    Extract { archive: String, reason: String },
}
