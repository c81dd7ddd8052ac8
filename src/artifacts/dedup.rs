//! Artifact deduplication
//!
//! Runs once after every traversal pass has finished. Files under the
//! artifact directory are hashed (SHA-256 of their raw bytes); when two
//! files share a hash, the one with the shorter file name is kept and the
//! other deleted. Equal-length names keep whichever was seen first, in
//! sorted path order.
//!
//! A file is only deleted after the copy being kept has been confirmed to
//! still exist, so re-running over a partially processed directory never
//! removes the last copy of any content.

use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

/// What a deduplication pass did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DedupReport {
    /// Files hashed
    pub files_scanned: usize,

    /// Files deleted as duplicates
    pub removed: Vec<PathBuf>,

    /// Total size of the deleted files
    pub bytes_freed: u64,
}

/// Hex-encoded SHA-256 of a file's contents
pub fn content_checksum(path: &Path) -> io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher)?;
    Ok(hex::encode(hasher.finalize()))
}

/// Removes duplicate files under `dir`, keeping one name per content hash
///
/// Unreadable files are logged and skipped; only listing the directory
/// tree itself can fail the pass.
pub fn deduplicate(dir: &Path) -> io::Result<DedupReport> {
    let mut files = Vec::new();
    collect_files(dir, &mut files)?;
    files.sort();

    let mut report = DedupReport::default();
    let mut kept_by_checksum: HashMap<String, PathBuf> = HashMap::new();

    for path in files {
        let checksum = match content_checksum(&path) {
            Ok(checksum) => checksum,
            Err(e) => {
                tracing::warn!("Skipping {} during dedup: {}", path.display(), e);
                continue;
            }
        };
        report.files_scanned += 1;

        let Some(kept) = kept_by_checksum.get(&checksum).cloned() else {
            kept_by_checksum.insert(checksum, path);
            continue;
        };

        let (keep, duplicate) = if name_len(&path) < name_len(&kept) {
            (path, kept)
        } else {
            (kept, path)
        };

        if !keep.is_file() {
            tracing::warn!(
                "Copy {} vanished, keeping {}",
                keep.display(),
                duplicate.display()
            );
            kept_by_checksum.insert(checksum, duplicate);
            continue;
        }

        let size = fs::metadata(&duplicate).map(|m| m.len()).unwrap_or(0);
        match fs::remove_file(&duplicate) {
            Ok(()) => {
                tracing::debug!(
                    "Removed {} (duplicate of {})",
                    duplicate.display(),
                    keep.display()
                );
                report.bytes_freed += size;
                report.removed.push(duplicate);
            }
            Err(e) => {
                tracing::warn!("Failed to remove {}: {}", duplicate.display(), e);
            }
        }
        kept_by_checksum.insert(checksum, keep);
    }

    tracing::info!(
        "Dedup scanned {} files, removed {} ({} bytes)",
        report.files_scanned,
        report.removed.len(),
        report.bytes_freed
    );

    Ok(report)
}

/// Recursively lists regular files below `dir`
fn collect_files(dir: &Path, files: &mut Vec<PathBuf>) -> io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let file_type = entry.file_type()?;
        if file_type.is_dir() {
            collect_files(&entry.path(), files)?;
        } else if file_type.is_file() {
            files.push(entry.path());
        }
    }
    Ok(())
}

fn name_len(path: &Path) -> usize {
    path.file_name()
        .map(|name| name.to_string_lossy().chars().count())
        .unwrap_or(0)
}
