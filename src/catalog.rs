//! Track catalog discovery
//!
//! The catalog is built once at start up from a directory of audio files and
//! handed to the player. Titles are the file names with the extension stripped.

use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

const AUDIO_EXTENSIONS: &[&str] = &["mp3", "flac", "ogg", "wav", "m4a"];

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("no audio files found in {0}")]
    Empty(PathBuf),
    #[error("failed to scan {path}: {source}")]
    Scan {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

/// A playable entry in the catalog
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Track {
    pub title: String,
    pub source: PathBuf,
}

impl Track {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let source = path.into();
        let title = source
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .unwrap_or_else(|| source.display().to_string());
        Self { title, source }
    }
}

/// Non-empty, ordered list of tracks
#[derive(Clone, Debug)]
pub struct Catalog {
    tracks: Vec<Track>,
}

impl Catalog {
    pub fn new(tracks: Vec<Track>, origin: &Path) -> Result<Self, CatalogError> {
        if tracks.is_empty() {
            return Err(CatalogError::Empty(origin.to_path_buf()));
        }
        Ok(Self { tracks })
    }

    /// Scan `dir` (non-recursively) for audio files, sorted by file name.
    pub fn discover(dir: &Path) -> Result<Self, CatalogError> {
        let mut tracks = Vec::new();

        for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
            let entry = entry.map_err(|source| CatalogError::Scan {
                path: dir.to_path_buf(),
                source,
            })?;

            if !entry.file_type().is_file() || !is_audio_file(entry.path()) {
                continue;
            }

            tracing::trace!(path = %entry.path().display(), "Catalog entry found");
            tracks.push(Track::from_path(entry.path()));
        }

        tracing::info!(dir = %dir.display(), count = tracks.len(), "Track catalog built");
        Self::new(tracks, dir)
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }
}

fn is_audio_file(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| AUDIO_EXTENSIONS.contains(&ext.as_str()))
}
