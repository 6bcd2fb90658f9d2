//! Package content fingerprinting
//!
//! A fingerprint digests the metadata of every non-hidden file beneath a
//! package directory: relative path, size in bytes, and modification time.
//! Two fingerprints are equal iff every file's triple matches.
//!
//! This is deliberately a metadata fingerprint, not a byte-content hash: it
//! is cheap to compute but can miss a change when a tool rewrites a file
//! while preserving its size and mtime, and it is sensitive to filesystem
//! clock granularity.

use std::path::Path;
use std::time::UNIX_EPOCH;

use sha2::{Digest, Sha256};
use walkdir::WalkDir;

use crate::error::CacheError;

/// Compute the fingerprint of a package directory.
///
/// Hidden files are skipped and hidden directories are pruned from the
/// traversal entirely. Files that disappear or refuse metadata mid-walk are
/// skipped rather than failing the fingerprint.
pub fn compute(package_dir: &Path) -> Result<String, CacheError> {
    let mut file_infos: Vec<String> = Vec::new();

    let walker = WalkDir::new(package_dir).into_iter().filter_entry(|entry| {
        let hidden = entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with('.'));
        !hidden || entry.path() == package_dir
    });

    for entry in walker {
        let entry = entry.map_err(|e| CacheError::Fingerprint {
            path: package_dir.to_path_buf(),
            error: e.to_string(),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }

        let Ok(metadata) = entry.metadata() else {
            continue;
        };
        let mtime_nanos = metadata
            .modified()
            .ok()
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .map_or(0, |d| d.as_nanos());

        let rel_path = entry
            .path()
            .strip_prefix(package_dir)
            .unwrap_or(entry.path());
        file_infos.push(format!(
            "{}:{}:{}",
            rel_path.display(),
            metadata.len(),
            mtime_nanos
        ));
    }

    // Sort so the digest is independent of traversal order.
    file_infos.sort_unstable();

    let mut hasher = Sha256::new();
    hasher.update(file_infos.join("|").as_bytes());
    Ok(hex::encode(hasher.finalize()))
}
