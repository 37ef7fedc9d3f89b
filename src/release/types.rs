use indexmap::IndexMap;
use semver::Version;

use crate::platform::Platform;

/// File extensions that mark an asset as an installable archive
const ARCHIVE_EXTENSIONS: &[&str] = &[".tar.gz", ".tgz", ".zip"];

/// Asset extensions that never carry the tool itself
const AUXILIARY_EXTENSIONS: &[&str] = &[
    ".sha256", ".sha512", ".md5", ".sig", ".asc", ".pem", ".sbom", ".txt", ".json",
];

/// A downloadable artifact attached to a release
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseAsset {
    pub name: String,
    pub url: String,
}

/// A published release and its downloadable assets, keyed by asset name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseEntry {
    pub version: Version,
    pub assets: IndexMap<String, String>,
}

impl ReleaseEntry {
    pub fn new(version: Version, assets: IndexMap<String, String>) -> Self {
        Self { version, assets }
    }

    /// Select the asset built for `platform`.
    ///
    /// Asset names are matched on the Go `_{os}_{arch}` fragment
    /// (e.g. `actions_0.5.0_linux_amd64.tar.gz`). Archives win over bare
    /// binaries; checksum and signature files are never selected.
    pub fn asset_for(&self, platform: &Platform) -> Option<ReleaseAsset> {
        let suffix = platform.asset_suffix();
        let candidates: Vec<(&String, &String)> = self
            .assets
            .iter()
            .filter(|(name, _)| name.contains(&suffix))
            .filter(|(name, _)| !has_extension(name, AUXILIARY_EXTENSIONS))
            .collect();

        candidates
            .iter()
            .find(|(name, _)| has_extension(name, ARCHIVE_EXTENSIONS))
            .or_else(|| candidates.first())
            .map(|(name, url)| ReleaseAsset {
                name: name.to_string(),
                url: url.to_string(),
            })
    }
}

fn has_extension(name: &str, extensions: &[&str]) -> bool {
    let lower = name.to_ascii_lowercase();
    extensions.iter().any(|ext| lower.ends_with(ext))
}
