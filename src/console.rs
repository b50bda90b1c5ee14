//! Per-console storage layout.
//!
//! A console is resolved either from loose image files under the media
//! directory, or from a single shared archive of title screens.

use std::path::{Path, PathBuf};

use crate::resolve::ArtworkSource;

/// Name of the per-console output directory inside the ROM directory.
pub const OUTPUT_DIR: &str = "imgs";

/// How artwork for a console is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleKind {
    /// Artwork lives in one archive in the extras directory.
    ArchiveBacked,
    /// Artwork lives in `<media>/<console>/<game>.{png,gif,jpg}`.
    FilesystemBacked,
}

impl ConsoleKind {
    pub fn classify(console: &str, archive_consoles: &[String]) -> Self {
        if archive_consoles.iter().any(|c| c == console) {
            Self::ArchiveBacked
        } else {
            Self::FilesystemBacked
        }
    }
}

/// Root directories shared by every console of a run.
#[derive(Debug, Clone)]
pub struct Layout {
    pub rom_root: PathBuf,
    pub media_root: PathBuf,
    pub extras_dir: PathBuf,
    pub archive_name: String,
    pub archive_consoles: Vec<String>,
}

/// Directories resolved for a single console.
#[derive(Debug, Clone)]
pub struct ConsolePaths {
    pub console: String,
    pub rom_dir: PathBuf,
    pub output_dir: PathBuf,
    pub source: ArtworkSource,
}

impl Layout {
    pub fn for_console(&self, console: &str) -> ConsolePaths {
        let rom_dir = self.rom_root.join(console);
        let output_dir = rom_dir.join(OUTPUT_DIR);
        let source = match ConsoleKind::classify(console, &self.archive_consoles) {
            ConsoleKind::ArchiveBacked => ArtworkSource::Archive {
                path: self.extras_dir.join(&self.archive_name),
            },
            ConsoleKind::FilesystemBacked => ArtworkSource::Loose {
                dir: self.media_root.join(console),
            },
        };
        ConsolePaths {
            console: console.to_string(),
            rom_dir,
            output_dir,
            source,
        }
    }
}

/// Strip the extension (text after the last `.`) from the base name of `name`.
///
/// `/` is treated as a separator so archive entry paths reduce to their
/// file name.
pub fn game_identifier(name: &str) -> &str {
    let base = name.rsplit('/').next().unwrap_or(name);
    match base.rfind('.') {
        Some(idx) => &base[..idx],
        None => base,
    }
}

/// Same as [`game_identifier`] for a filesystem path.
pub fn game_identifier_for_path(path: &Path) -> Option<&str> {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(game_identifier)
}
