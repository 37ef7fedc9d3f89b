use semver::Version;

/// Strip the `v` prefix release tags usually carry ("v0.5.0" -> "0.5.0").
pub fn normalize_version(version: &str) -> &str {
    version.strip_prefix('v').unwrap_or(version)
}

/// Parse a release tag or directory name into a concrete version.
///
/// Only strict `major.minor.patch` versions qualify. Partial versions,
/// pre-releases and build metadata are rejected because they never name
/// a published stable release.
///
/// Examples:
/// - "v0.5.0" -> Version(0, 5, 0)
/// - "0.5.0" -> Version(0, 5, 0)
/// - "0.5" -> None
/// - "1.0.0-rc.1" -> None
pub fn parse_concrete_version(version: &str) -> Option<Version> {
    let parsed = Version::parse(normalize_version(version)).ok()?;
    (parsed.pre.is_empty() && parsed.build.is_empty()).then_some(parsed)
}
