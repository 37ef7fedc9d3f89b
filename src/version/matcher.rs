//! Resolves a version specifier to the highest matching concrete version

use semver::Version;
use tracing::debug;

use crate::version::specifier::VersionSpecifier;

/// Select the highest version agreeing with the specifier's fixed components.
///
/// Returns None if no available version matches.
pub fn resolve<'a, I>(specifier: &VersionSpecifier, available: I) -> Option<Version>
where
    I: IntoIterator<Item = &'a Version>,
{
    available
        .into_iter()
        .filter(|version| specifier.matches(version))
        .max()
        .cloned()
}

/// Match a raw specifier string against available versions.
///
/// An unparseable specifier matches nothing. An exact specifier still has
/// to be present in `available`.
pub fn match_version(specifier: &str, available: &[Version]) -> Option<Version> {
    match VersionSpecifier::parse(specifier) {
        Ok(parsed) => resolve(&parsed, available),
        Err(e) => {
            debug!("Unparseable version specifier {:?}: {}", specifier, e);
            None
        }
    }
}
