//! Release archive extraction
//!
//! The archive type is chosen from the asset name: `.tar.gz`/`.tgz`, `.zip`,
//! anything else is treated as the bare executable.

use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;

use flate2::read::GzDecoder;
use tar::Archive;
use tracing::debug;

use crate::install::error::AcquireError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveKind {
    TarGz,
    Zip,
    Binary,
}

impl ArchiveKind {
    pub fn from_asset_name(name: &str) -> Self {
        let lower = name.to_ascii_lowercase();
        if lower.ends_with(".tar.gz") || lower.ends_with(".tgz") {
            ArchiveKind::TarGz
        } else if lower.ends_with(".zip") {
            ArchiveKind::Zip
        } else {
            ArchiveKind::Binary
        }
    }
}

/// Extract `archive` into `dest` and verify `executable` ended up at its top level.
pub fn extract_archive(
    archive: &Path,
    asset_name: &str,
    dest: &Path,
    executable: &str,
) -> Result<(), AcquireError> {
    let kind = ArchiveKind::from_asset_name(asset_name);
    debug!(?kind, archive = %archive.display(), dest = %dest.display(), "Extracting asset");

    let extract_error = |reason: String| AcquireError::Extract {
        archive: asset_name.to_string(),
        reason,
    };

    match kind {
        ArchiveKind::TarGz => {
            let decoder = GzDecoder::new(BufReader::new(File::open(archive)?));
            Archive::new(decoder)
                .unpack(dest)
                .map_err(|e| extract_error(e.to_string()))?;
        }
        ArchiveKind::Zip => {
            let mut zip = zip::ZipArchive::new(BufReader::new(File::open(archive)?))
                .map_err(|e| extract_error(e.to_string()))?;
            zip.extract(dest).map_err(|e| extract_error(e.to_string()))?;
        }
        ArchiveKind::Binary => {
            fs::copy(archive, dest.join(executable))?;
        }
    }

    let binary = dest.join(executable);
    if !binary.is_file() {
        return Err(extract_error(format!("{executable} not found in archive")));
    }
    make_executable(&binary)?;

    Ok(())
}

#[cfg(unix)]
fn make_executable(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    let mut perms = fs::metadata(path)?.permissions();
    perms.set_mode(perms.mode() | 0o755);
    fs::set_permissions(path, perms)
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> std::io::Result<()> {
    Ok(())
}
