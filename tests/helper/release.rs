//! Release index and tool cache test utilities

use std::fs;
use std::path::{Path, PathBuf};

use flate2::Compression;
use flate2::write::GzEncoder;
use mockito::{Matcher, Mock, ServerGuard};
use semver::Version;
use serde_json::json;
use tempfile::TempDir;

use setup_go_actions::config::{InstallerConfig, ToolSpec};
use setup_go_actions::install::{Installer, ToolCache};
use setup_go_actions::platform::{Arch, Os, Platform};

pub const TOOL: &str = "go-actions";
pub const RELEASES_PATH: &str = "/repos/variantdev/go-actions/releases";

pub fn platform() -> Platform {
    Platform::new(Os::Linux, Arch::X64)
}

/// Temporary cache and temp roots for one test
pub struct TestEnv {
    _temp_dir: TempDir,
    pub config: InstallerConfig,
}

impl TestEnv {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let config = InstallerConfig {
            cache_root: temp_dir.path().join("runner").join("tools"),
            temp_root: temp_dir.path().join("runner").join("temp"),
            prefer_cached: true,
        };
        Self {
            _temp_dir: temp_dir,
            config,
        }
    }

    pub fn cache(&self) -> ToolCache {
        ToolCache::new(&self.config.cache_root)
    }

    pub fn installer(&self, server: &ServerGuard) -> Installer {
        Installer::github(
            ToolSpec::default(),
            self.config.clone(),
            platform(),
            &server.url(),
            None,
        )
    }

    pub fn variant_dir(&self, version: &str) -> PathBuf {
        self.cache()
            .entry_path(TOOL, &Version::parse(version).unwrap(), Arch::X64)
    }

    pub fn marker(&self, version: &str) -> PathBuf {
        self.cache()
            .marker_path(TOOL, &Version::parse(version).unwrap(), Arch::X64)
    }

    /// Create a cache entry by hand, optionally with its completeness marker
    pub fn seed(&self, version: &str, complete: bool) -> PathBuf {
        let dir = self.variant_dir(version);
        fs::create_dir_all(&dir).unwrap();
        if complete {
            fs::write(self.marker(version), "hello").unwrap();
        }
        dir
    }
}

pub fn asset_name(version: &str) -> String {
    format!("actions_{version}_linux_amd64.tar.gz")
}

pub fn asset_path(version: &str) -> String {
    format!("/download/v{version}/{}", asset_name(version))
}

/// A gzipped tarball holding an `actions` executable
pub fn actions_tar_gz() -> Vec<u8> {
    let encoder = GzEncoder::new(Vec::new(), Compression::default());
    let mut builder = tar::Builder::new(encoder);
    let content = b"#!/bin/sh\necho actions\n";
    let mut header = tar::Header::new_gnu();
    header.set_size(content.len() as u64);
    header.set_mode(0o755);
    header.set_cksum();
    builder
        .append_data(&mut header, "actions", &content[..])
        .unwrap();
    builder.into_inner().unwrap().finish().unwrap()
}

/// GitHub Releases API body listing `versions`, with assets served by `server`
pub fn releases_body(server: &ServerGuard, versions: &[&str]) -> String {
    let releases: Vec<_> = versions
        .iter()
        .map(|version| {
            json!({
                "tag_name": format!("v{version}"),
                "draft": false,
                "assets": [
                    {
                        "name": format!("actions_{version}_checksums.txt"),
                        "browser_download_url": format!("{}/download/v{version}/checksums.txt", server.url()),
                    },
                    {
                        "name": asset_name(version),
                        "browser_download_url": format!("{}{}", server.url(), asset_path(version)),
                    },
                    {
                        "name": format!("actions_{version}_darwin_amd64.tar.gz"),
                        "browser_download_url": format!("{}/download/v{version}/darwin.tar.gz", server.url()),
                    }
                ]
            })
        })
        .collect();
    serde_json::Value::Array(releases).to_string()
}

pub async fn mock_releases(server: &mut ServerGuard, versions: &[&str]) -> Mock {
    let body = releases_body(server, versions);
    server
        .mock("GET", RELEASES_PATH)
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create_async()
        .await
}

pub async fn mock_asset(server: &mut ServerGuard, version: &str) -> Mock {
    server
        .mock("GET", asset_path(version).as_str())
        .with_status(200)
        .with_header("content-type", "application/octet-stream")
        .with_body(actions_tar_gz())
        .create_async()
        .await
}

pub fn assert_installed(dir: &Path, marker: &Path) {
    assert!(marker.exists(), "missing marker {}", marker.display());
    assert!(dir.join("actions").is_file(), "missing binary in {}", dir.display());
}
