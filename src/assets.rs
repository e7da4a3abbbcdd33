//! Deployment content source
//!
//! Scans the local asset directory and fingerprints its contents. The
//! fingerprint goes onto the deployment resource so the engine re-runs the
//! upload exactly when the content changes. Files are uploaded verbatim,
//! so the walk applies no ignore rules and includes hidden files.

use std::fs;
use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use sha2::{Digest, Sha256};

use crate::error::{SiteError, SiteResult};

/// What the deployment knows about its source directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetManifest {
    pub source: PathBuf,
    pub object_count: usize,

    /// `sha256:` digest over relative paths and file contents, in sorted
    /// path order so the value is stable across platforms
    pub fingerprint: String,
}

impl AssetManifest {
    /// Scan `source`, which must exist. An empty directory is a valid
    /// (if empty) deployment source.
    pub fn scan(source: &Path) -> SiteResult<Self> {
        if !source.is_dir() {
            return Err(SiteError::AssetSourceMissing {
                path: source.to_path_buf(),
            });
        }

        let mut files = Vec::new();
        for entry in WalkBuilder::new(source).standard_filters(false).build() {
            let entry = entry.map_err(|e| std::io::Error::other(e.to_string()))?;
            let path = entry.path();
            if path.is_file() {
                let relative = path
                    .strip_prefix(source)
                    .unwrap_or(path)
                    .to_string_lossy()
                    .replace('\\', "/");
                files.push((relative, path.to_path_buf()));
            }
        }
        files.sort_by(|a, b| a.0.cmp(&b.0));

        let mut hasher = Sha256::new();
        for (relative, path) in &files {
            hasher.update(relative.as_bytes());
            hasher.update([0u8]);
            hasher.update(fs::read(path)?);
            hasher.update([0u8]);
        }

        Ok(Self {
            source: source.to_path_buf(),
            object_count: files.len(),
            fingerprint: format!("sha256:{:x}", hasher.finalize()),
        })
    }

    /// Manifest for a source that has not been scanned, used when auditing
    /// the declaration without site content present
    pub fn empty(source: &Path) -> Self {
        Self {
            source: source.to_path_buf(),
            object_count: 0,
            fingerprint: Self::empty_fingerprint(),
        }
    }

    /// Digest of zero files
    pub fn empty_fingerprint() -> String {
        format!("sha256:{:x}", Sha256::new().finalize())
    }
}
