//! Per-console batch: one preview PNG per ROM file.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use globset::GlobSet;
use image::ImageFormat;
use walkdir::WalkDir;

use crate::compose::compose;
use crate::console::{game_identifier, game_identifier_for_path, ConsolePaths, Layout};
use crate::error::{ArtgenError, Result};

/// Receives the outcome of every game in a batch.
pub trait Reporter {
    fn created(&mut self, console: &str, game: &str, output: &Path);
    fn failed(&mut self, console: &str, game: &str, error: &ArtgenError);
}

/// Logs one line per game through `tracing`.
#[derive(Debug, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn created(&mut self, console: &str, game: &str, output: &Path) {
        tracing::info!("created image for {console}/{game} in {}", output.display());
    }

    fn failed(&mut self, console: &str, game: &str, error: &ArtgenError) {
        tracing::warn!("can't generate image for {console}/{game}: {error}");
    }
}

/// Keeps every outcome in memory.
#[derive(Debug, Default)]
pub struct CollectingReporter {
    pub created: Vec<(String, String, PathBuf)>,
    pub failed: Vec<(String, String, String)>,
}

impl Reporter for CollectingReporter {
    fn created(&mut self, console: &str, game: &str, output: &Path) {
        self.created
            .push((console.to_string(), game.to_string(), output.to_path_buf()));
    }

    fn failed(&mut self, console: &str, game: &str, error: &ArtgenError) {
        self.failed
            .push((console.to_string(), game.to_string(), error.to_string()));
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub created: usize,
    pub failed: usize,
    pub skipped: usize,
}

pub struct BatchRunner {
    layout: Layout,
    ignore: GlobSet,
}

impl BatchRunner {
    pub fn new(layout: Layout) -> Self {
        Self {
            layout,
            ignore: GlobSet::empty(),
        }
    }

    /// Skip ROM-directory files whose name matches any of these globs.
    pub fn with_ignore(mut self, ignore: GlobSet) -> Self {
        self.ignore = ignore;
        self
    }

    /// Generate previews for every ROM of `console`.
    ///
    /// Per-game failures go to `reporter` and the batch carries on. Only an
    /// unlistable ROM directory fails the call.
    pub fn run(&self, console: &str, reporter: &mut dyn Reporter) -> Result<BatchSummary> {
        let paths = self.layout.for_console(console);
        let roms = list_roms(&paths.rom_dir, &self.ignore)?;
        tracing::debug!(console, count = roms.len(), rom_dir = %paths.rom_dir.display(), "listed ROMs");

        match fs::create_dir(&paths.output_dir) {
            Ok(()) => {}
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => {}
            Err(err) => {
                tracing::warn!(dir = %paths.output_dir.display(), %err, "can't create output directory");
            }
        }

        let mut summary = BatchSummary::default();
        for rom in &roms {
            let game = match game_identifier_for_path(rom) {
                Some("") => {
                    tracing::debug!(path = %rom.display(), "no usable game name, skipping");
                    summary.skipped += 1;
                    continue;
                }
                Some(game) => game,
                None => {
                    let lossy = rom
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_default();
                    summary.failed += 1;
                    reporter.failed(
                        console,
                        game_identifier(&lossy),
                        &ArtgenError::UnusableRomName { path: rom.clone() },
                    );
                    continue;
                }
            };

            match render_game(&paths, game) {
                Ok(output) => {
                    summary.created += 1;
                    reporter.created(console, game, &output);
                }
                Err(err) => {
                    summary.failed += 1;
                    reporter.failed(console, game, &err);
                }
            }
        }
        Ok(summary)
    }
}

fn render_game(paths: &ConsolePaths, game: &str) -> Result<PathBuf> {
    let artwork = paths.source.resolve(&paths.console, game)?;
    let canvas = compose(&artwork)?;

    let output = paths.output_dir.join(format!("{game}.png"));
    canvas
        .save_with_format(&output, ImageFormat::Png)
        .map_err(|source| ArtgenError::OutputWriteFailed {
            path: output.clone(),
            source,
        })?;
    Ok(output)
}

/// Non-directory entries directly inside `dir`, sorted by file name.
fn list_roms(dir: &Path, ignore: &GlobSet) -> Result<Vec<PathBuf>> {
    let unreadable = |source: io::Error| ArtgenError::DirectoryUnreadable {
        path: dir.to_path_buf(),
        source,
    };

    if !fs::metadata(dir).map_err(unreadable)?.is_dir() {
        return Err(unreadable(io::Error::other("not a directory")));
    }

    let mut roms = Vec::new();
    let walker = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) if err.depth() == 0 => return Err(unreadable(err.into())),
            Err(err) => {
                tracing::warn!(%err, "skipping unreadable ROM entry");
                continue;
            }
        };
        if entry.file_type().is_dir() {
            continue;
        }
        if ignore.is_match(entry.file_name()) {
            tracing::trace!(path = %entry.path().display(), "ignored");
            continue;
        }
        roms.push(entry.into_path());
    }
    Ok(roms)
}

#[cfg(test)]
mod tests {
    use globset::{Glob, GlobSetBuilder};
    use image::{ImageFormat, RgbImage};
    use tempfile::tempdir;

    use super::*;

    fn layout(root: &Path) -> Layout {
        Layout {
            rom_root: root.to_path_buf(),
            media_root: root.join("media"),
            extras_dir: root.join("extras"),
            archive_name: "titles.zip".to_string(),
            archive_consoles: vec!["mame2000".to_string()],
        }
    }

    #[test]
    fn list_roms_skips_directories_and_sorts() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("imgs")).unwrap();
        fs::write(dir.path().join("b.gb"), b"").unwrap();
        fs::write(dir.path().join("a.gb"), b"").unwrap();

        let roms = list_roms(dir.path(), &GlobSet::empty()).unwrap();
        let names: Vec<_> = roms
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, ["a.gb", "b.gb"]);
    }

    #[test]
    fn list_roms_honors_ignore_globs() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("Tetris.gb"), b"").unwrap();
        fs::write(dir.path().join("Tetris.srm"), b"").unwrap();

        let mut builder = GlobSetBuilder::new();
        builder.add(Glob::new("*.srm").unwrap());
        let roms = list_roms(dir.path(), &builder.build().unwrap()).unwrap();
        assert_eq!(roms, [dir.path().join("Tetris.gb")]);
    }

    #[test]
    fn list_roms_on_file_is_unreadable() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("gb");
        fs::write(&file, b"").unwrap();
        let err = list_roms(&file, &GlobSet::empty()).unwrap_err();
        assert!(matches!(err, ArtgenError::DirectoryUnreadable { .. }));
    }

    #[test]
    fn dotfiles_are_skipped_not_rendered() {
        let dir = tempdir().unwrap();
        let rom_dir = dir.path().join("gb");
        fs::create_dir_all(dir.path().join("media/gb")).unwrap();
        fs::create_dir_all(&rom_dir).unwrap();
        fs::write(rom_dir.join(".hidden"), b"").unwrap();
        fs::write(rom_dir.join("Tetris.gb"), b"").unwrap();
        RgbImage::new(4, 4)
            .save_with_format(dir.path().join("media/gb/Tetris.png"), ImageFormat::Png)
            .unwrap();

        let mut reporter = CollectingReporter::default();
        let summary = BatchRunner::new(layout(dir.path()))
            .run("gb", &mut reporter)
            .unwrap();
        assert_eq!(
            summary,
            BatchSummary {
                created: 1,
                failed: 0,
                skipped: 1
            }
        );
        assert!(rom_dir.join("imgs/Tetris.png").is_file());
        assert!(!rom_dir.join("imgs/.png").exists());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn non_utf8_rom_names_are_reported_as_failures() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = tempdir().unwrap();
        let rom_dir = dir.path().join("gb");
        fs::create_dir_all(&rom_dir).unwrap();
        fs::write(rom_dir.join(OsStr::from_bytes(b"Pok\xe9mon.gb")), b"").unwrap();

        let mut reporter = CollectingReporter::default();
        let summary = BatchRunner::new(layout(dir.path()))
            .run("gb", &mut reporter)
            .unwrap();
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.skipped, 0);
        assert_eq!(reporter.failed.len(), 1);
        assert_eq!(reporter.failed[0].1, "Pok\u{fffd}mon");
        assert!(reporter.failed[0].2.contains("not valid UTF-8"));
    }

    #[test]
    fn missing_output_dir_parent_does_not_create_rom_dir() {
        let dir = tempdir().unwrap();
        let mut reporter = CollectingReporter::default();
        let err = BatchRunner::new(layout(dir.path()))
            .run("gba", &mut reporter)
            .unwrap_err();
        assert!(matches!(err, ArtgenError::DirectoryUnreadable { .. }));
        assert!(!dir.path().join("gba").exists());
    }
}
