use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::debug;
use walkdir::WalkDir;

use crate::media::MediaType;

/// Result of listing all input directories
#[derive(Debug)]
pub struct ScanResult {
    /// Photos and videos, sorted by path
    pub media: Vec<PathBuf>,
    /// Files with an unrecognized extension
    pub ignored: usize,
}

impl ScanResult {
    pub fn count(&self, media_type: MediaType) -> usize {
        self.media
            .iter()
            .filter(|p| MediaType::from_path(p) == media_type)
            .count()
    }
}

/// List the files of every input directory, keeping `.jpg` and `.mp4`.
pub fn scan_inputs(inputs: &[PathBuf], recursive: bool) -> anyhow::Result<ScanResult> {
    let mut media = Vec::new();
    let mut ignored = 0;

    for input in inputs {
        let listing = if recursive {
            walk_files(input)
        } else {
            list_files(input)
        };
        let files = listing.with_context(|| format!("cannot list {}", input.display()))?;

        for path in files {
            if MediaType::from_path(&path) == MediaType::Unknown {
                debug!("ignoring {}", path.display());
                ignored += 1;
            } else {
                media.push(path);
            }
        }
    }

    media.sort();
    media.dedup();

    Ok(ScanResult { media, ignored })
}

fn list_files(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() {
            files.push(path);
        }
    }
    Ok(files)
}

fn walk_files(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).follow_links(true) {
        let entry = entry?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}
