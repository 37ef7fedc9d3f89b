//! Tool acquisition entry point
//!
//! `get_tool` runs one resolution per call:
//! local cache -> release index -> matcher -> cache -> asset -> download/extract -> commit.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use semver::Version;
use tracing::{debug, info};

use crate::config::{InstallerConfig, ToolSpec};
use crate::install::cache::{CacheSlot, ToolCache};
use crate::install::download::{Downloader, HttpDownloader};
use crate::install::error::{AcquireError, InstallError};
use crate::install::extract::extract_archive;
use crate::platform::Platform;
use crate::release::github::GitHubReleaseIndex;
use crate::release::index::ReleaseIndex;
use crate::release::types::{ReleaseAsset, ReleaseEntry};
use crate::version::matcher::resolve;
use crate::version::specifier::VersionSpecifier;

/// Resolves version specifiers for one tool and installs it into the tool cache
pub struct Installer {
    tool: ToolSpec,
    config: InstallerConfig,
    platform: Platform,
    cache: ToolCache,
    index: Arc<dyn ReleaseIndex>,
    downloader: Arc<dyn Downloader>,
}

impl Installer {
    pub fn new(
        tool: ToolSpec,
        config: InstallerConfig,
        platform: Platform,
        index: Arc<dyn ReleaseIndex>,
        downloader: Arc<dyn Downloader>,
    ) -> Self {
        let cache = ToolCache::new(config.cache_root.clone());
        Self {
            tool,
            config,
            platform,
            cache,
            index,
            downloader,
        }
    }

    /// Installer backed by the GitHub Releases API at `api_url`
    pub fn github(
        tool: ToolSpec,
        config: InstallerConfig,
        platform: Platform,
        api_url: &str,
        token: Option<String>,
    ) -> Self {
        let index = GitHubReleaseIndex::new(api_url, &tool.owner).with_token(token);
        Self::new(
            tool,
            config,
            platform,
            Arc::new(index),
            Arc::new(HttpDownloader::new()),
        )
    }

    pub fn cache(&self) -> &ToolCache {
        &self.cache
    }

    /// Resolve `specifier` and return the directory holding the tool's executable,
    /// downloading it into the cache when no complete entry exists.
    pub async fn get_tool(&self, specifier: &str) -> Result<PathBuf, InstallError> {
        let parsed = VersionSpecifier::parse(specifier).map_err(|e| {
            debug!("Rejecting version specifier {:?}: {}", specifier, e);
            self.version_not_found(specifier)
        })?;

        if let Some(path) = self.find_installed(&parsed) {
            info!(path = %path.display(), "Using cached {} for {}", self.tool.name, specifier);
            return Ok(path);
        }

        let release = self.resolve_release(&parsed, specifier).await?;
        let version = release.version.clone();
        info!("Resolved {} {} to {}", self.tool.name, specifier, version);

        if let CacheSlot::Complete(path) = self.find(&version) {
            return Ok(path);
        }

        let asset = release
            .asset_for(&self.platform)
            .ok_or_else(|| InstallError::AssetNotFound {
                tool: self.tool.name.clone(),
                version: version.clone(),
                platform: self.platform,
            })?;

        self.acquire(&version, &asset)
            .await
            .map_err(|source| InstallError::AcquisitionFailed {
                tool: self.tool.name.clone(),
                version,
                source,
            })
    }

    fn find(&self, version: &Version) -> CacheSlot {
        self.cache.find(&self.tool.name, version, self.platform.arch)
    }

    /// Serve the specifier from complete cache entries without touching the network
    fn find_installed(&self, specifier: &VersionSpecifier) -> Option<PathBuf> {
        if let Some(exact) = specifier.as_exact() {
            if let CacheSlot::Complete(path) = self.find(&exact) {
                return Some(path);
            }
        }
        if !self.config.prefer_cached {
            return None;
        }

        let installed = self
            .cache
            .installed_versions(&self.tool.name, self.platform.arch);
        let version = resolve(specifier, &installed)?;
        match self.find(&version) {
            CacheSlot::Complete(path) => Some(path),
            CacheSlot::Absent => None,
        }
    }

    async fn resolve_release(
        &self,
        specifier: &VersionSpecifier,
        raw: &str,
    ) -> Result<ReleaseEntry, InstallError> {
        let releases = self
            .index
            .list_releases(&self.tool.name)
            .await
            .map_err(|source| InstallError::IndexUnavailable {
                tool: self.tool.name.clone(),
                source,
            })?;
        debug!(count = releases.len(), "Fetched release index");

        let version = resolve(specifier, releases.iter().map(|release| &release.version))
            .ok_or_else(|| self.version_not_found(raw))?;

        releases
            .into_iter()
            .find(|release| release.version == version)
            .ok_or_else(|| self.version_not_found(raw))
    }

    async fn acquire(
        &self,
        version: &Version,
        asset: &ReleaseAsset,
    ) -> Result<PathBuf, AcquireError> {
        tokio::fs::create_dir_all(&self.config.temp_root).await?;
        let download_dir = tempfile::Builder::new()
            .prefix("setup-go-actions-")
            .tempdir_in(&self.config.temp_root)?;
        let file_name = Path::new(&asset.name)
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_else(|| "asset".into());
        let archive = download_dir.path().join(file_name);

        info!(url = %asset.url, "Downloading {} {}", self.tool.name, version);
        self.downloader.download(&asset.url, &archive).await?;

        let cache = self.cache.clone();
        let tool = self.tool.name.clone();
        let version = version.clone();
        let arch = self.platform.arch;
        let asset_name = asset.name.clone();
        let executable = self.platform.executable_name(&self.tool.binary);

        tokio::task::spawn_blocking(move || -> Result<PathBuf, AcquireError> {
            let staging = cache.staging_dir(&tool, &version)?;
            extract_archive(&archive, &asset_name, staging.path(), &executable)?;
            Ok(cache.commit(&tool, &version, arch, staging)?)
        })
        .await
        .map_err(|e| AcquireError::Io(io::Error::other(e)))?
    }

    fn version_not_found(&self, specifier: &str) -> InstallError {
        InstallError::VersionNotFound {
            tool: self.tool.name.clone(),
            specifier: specifier.to_string(),
        }
    }
}
