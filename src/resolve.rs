//! Locating and decoding the source artwork for one game.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageReader};
use zip::result::ZipError;
use zip::ZipArchive;

use crate::console::game_identifier;
use crate::error::{ArtgenError, Result};

/// Loose-file suffixes, in lookup priority order.
pub const LOOSE_EXTENSIONS: &[&str] = &[".png", ".gif", ".jpg"];

/// Upper bound on the buffer reserved from an entry's declared size.
const MAX_ENTRY_PREALLOC: usize = 16 * 1024 * 1024;

/// Where artwork for a console comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtworkSource {
    Archive { path: PathBuf },
    Loose { dir: PathBuf },
}

impl ArtworkSource {
    /// Find and decode the artwork for `game`.
    ///
    /// Every file handle and the archive reader are dropped before this
    /// returns, whatever the outcome.
    pub fn resolve(&self, console: &str, game: &str) -> Result<DynamicImage> {
        match self {
            Self::Archive { path } => resolve_from_archive(path, console, game),
            Self::Loose { dir } => resolve_from_dir(dir, console, game),
        }
    }
}

fn resolve_from_dir(dir: &Path, console: &str, game: &str) -> Result<DynamicImage> {
    for ext in LOOSE_EXTENSIONS {
        let candidate = dir.join(format!("{game}{ext}"));
        if !candidate.is_file() {
            continue;
        }
        match decode_file(&candidate) {
            Ok(img) => {
                tracing::debug!(path = %candidate.display(), "using loose artwork");
                return Ok(img);
            }
            Err(err) => {
                tracing::debug!(path = %candidate.display(), %err, "skipping undecodable artwork");
            }
        }
    }
    Err(ArtgenError::not_found(console, game))
}

fn decode_file(path: &Path) -> image::ImageResult<DynamicImage> {
    // The extension only picks the candidate; the format comes from the bytes.
    ImageReader::open(path)?.with_guessed_format()?.decode()
}

fn resolve_from_archive(path: &Path, console: &str, game: &str) -> Result<DynamicImage> {
    let unavailable = |source: ZipError| ArtgenError::ArchiveUnavailable {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(|e| unavailable(ZipError::Io(e)))?;
    let mut archive = ZipArchive::new(BufReader::new(file)).map_err(unavailable)?;

    for index in 0..archive.len() {
        let mut entry = archive.by_index(index).map_err(unavailable)?;
        if entry.is_dir() || game_identifier(entry.name()) != game {
            continue;
        }

        tracing::debug!(archive = %path.display(), entry = entry.name(), "using archived artwork");
        // The declared size comes from the archive header and is untrusted.
        let hint = usize::try_from(entry.size()).map_or(0, |n| n.min(MAX_ENTRY_PREALLOC));
        let mut bytes = Vec::with_capacity(hint);
        entry
            .read_to_end(&mut bytes)
            .map_err(|e| unavailable(ZipError::Io(e)))?;
        return image::load_from_memory(&bytes).map_err(|source| {
            ArtgenError::UndecodableArtwork {
                entry: entry.name().to_string(),
                source,
            }
        });
    }

    Err(ArtgenError::not_found(console, game))
}
