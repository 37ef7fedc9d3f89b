use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use semver::Version;
use tempfile::TempDir;
use tracing::{debug, info, warn};

use crate::platform::Arch;
use crate::version::semver::parse_concrete_version;

/// Suffix of the sibling file certifying that a cache entry is fully installed
pub const COMPLETE_MARKER_SUFFIX: &str = ".complete";

/// Prefix of in-progress extraction directories next to cache entries
const STAGING_PREFIX: &str = ".staging-";

/// Staging directories untouched for this long are left over from a crashed install
const STALE_STAGING_AGE: Duration = Duration::from_secs(60 * 60);

/// State of one `(tool, version, arch)` cache slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheSlot {
    /// No usable entry; a directory may exist but lacks its completeness marker
    Absent,
    /// A fully installed entry at the given directory
    Complete(PathBuf),
}

/// On-disk tool cache laid out as `<root>/<tool>/<version>/<arch>/`
/// with a sibling `<arch>.complete` marker per finished install.
#[derive(Debug, Clone)]
pub struct ToolCache {
    root: PathBuf,
}

impl ToolCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn entry_path(&self, tool: &str, version: &Version, arch: Arch) -> PathBuf {
        self.root
            .join(tool)
            .join(version.to_string())
            .join(arch.cache_name())
    }

    pub fn marker_path(&self, tool: &str, version: &Version, arch: Arch) -> PathBuf {
        let mut marker: OsString = self.entry_path(tool, version, arch).into_os_string();
        marker.push(COMPLETE_MARKER_SUFFIX);
        PathBuf::from(marker)
    }

    /// Look up a cache entry. Only entries with a completeness marker are returned.
    pub fn find(&self, tool: &str, version: &Version, arch: Arch) -> CacheSlot {
        let entry = self.entry_path(tool, version, arch);
        let marker = self.marker_path(tool, version, arch);

        if marker.exists() && entry.is_dir() {
            debug!(path = %entry.display(), "Cache hit");
            CacheSlot::Complete(entry)
        } else {
            if entry.exists() {
                debug!(path = %entry.display(), "Ignoring cache entry without completeness marker");
            }
            CacheSlot::Absent
        }
    }

    /// Versions of `tool` with a complete entry for `arch`, ascending
    pub fn installed_versions(&self, tool: &str, arch: Arch) -> Vec<Version> {
        let tool_dir = self.root.join(tool);
        let Ok(entries) = fs::read_dir(&tool_dir) else {
            return Vec::new();
        };

        let mut versions: Vec<Version> = entries
            .filter_map(Result::ok)
            .filter_map(|entry| entry.file_name().to_str().and_then(parse_concrete_version))
            .filter(|version| matches!(self.find(tool, version, arch), CacheSlot::Complete(_)))
            .collect();
        versions.sort();
        versions
    }

    /// Create a fresh staging directory next to the entries of `version`,
    /// on the same filesystem so promotion is a rename.
    pub fn staging_dir(&self, tool: &str, version: &Version) -> io::Result<TempDir> {
        let parent = self.root.join(tool).join(version.to_string());
        fs::create_dir_all(&parent)?;
        remove_stale_staging(&parent, STALE_STAGING_AGE);
        tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .tempdir_in(parent)
    }

    /// Promote a fully extracted staging directory into the cache, then mark it complete.
    ///
    /// The marker is written only after the rename succeeds, so an
    /// interrupted commit leaves at most a marker-less directory.
    /// A complete entry is never replaced; the staging directory is discarded instead.
    pub fn commit(
        &self,
        tool: &str,
        version: &Version,
        arch: Arch,
        staging: TempDir,
    ) -> io::Result<PathBuf> {
        let entry = self.entry_path(tool, version, arch);
        let marker = self.marker_path(tool, version, arch);

        if marker.exists() && entry.is_dir() {
            debug!(path = %entry.display(), "Cache entry already complete, discarding staging");
            return Ok(entry);
        }
        if marker.exists() {
            fs::remove_file(&marker)?;
        }
        if entry.exists() {
            warn!(path = %entry.display(), "Replacing incomplete cache entry");
            fs::remove_dir_all(&entry)?;
        }

        let staged = staging.keep();
        if let Err(e) = fs::rename(&staged, &entry) {
            let _ = fs::remove_dir_all(&staged);
            return Err(e);
        }
        fs::write(&marker, "")?;

        info!(path = %entry.display(), "Cached {} {}", tool, version);
        Ok(entry)
    }
}

/// Remove `.staging-*` directories under `parent` older than `max_age`.
fn remove_stale_staging(parent: &Path, max_age: Duration) {
    let Ok(entries) = fs::read_dir(parent) else {
        return;
    };
    let now = SystemTime::now();

    for entry in entries.filter_map(Result::ok) {
        if !entry.file_name().to_string_lossy().starts_with(STAGING_PREFIX) {
            continue;
        }
        let stale = entry
            .metadata()
            .and_then(|meta| meta.modified())
            .ok()
            .and_then(|modified| now.duration_since(modified).ok())
            .is_some_and(|age| age >= max_age);
        if stale {
            let path = entry.path();
            warn!(path = %path.display(), "Removing stale staging directory");
            if let Err(e) = fs::remove_dir_all(&path) {
                warn!("Failed to remove {}: {}", path.display(), e);
            }
        }
    }
}
