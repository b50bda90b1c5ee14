use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::Deserialize;

use crate::console::Layout;
use crate::error::{ArtgenError, Result};

pub const DEFAULT_CONFIG_FILE: &str = "artgen.toml";
pub const DEFAULT_MEDIA_DIR: &str = "media";
pub const DEFAULT_ARCHIVE_NAME: &str = "titles.zip";
pub const DEFAULT_CONSOLES: &[&str] = &["gb", "gbc", "gba", "arcade", "mame2000"];
pub const DEFAULT_ARCHIVE_CONSOLES: &[&str] = &["mame2000"];

/// Contents of `artgen.toml`. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub rom_dir: Option<PathBuf>,
    pub media_dir: Option<PathBuf>,
    pub extras_dir: Option<PathBuf>,
    pub consoles: Option<Vec<String>>,
    pub archive_name: Option<String>,
    pub archive_consoles: Option<Vec<String>>,
    pub ignore: Vec<String>,
}

impl FileConfig {
    pub fn parse(text: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Read `path`. A missing file yields the defaults unless `required`.
    pub fn load(path: &Path, required: bool) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(text) => Self::parse(&text).map_err(|source| ArtgenError::ConfigParse {
                path: path.to_path_buf(),
                source,
            }),
            Err(err) if err.kind() == io::ErrorKind::NotFound && !required => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                Ok(Self::default())
            }
            Err(source) => Err(ArtgenError::ConfigRead {
                path: path.to_path_buf(),
                source,
            }),
        }
    }
}

/// Values given on the command line; they win over the file.
#[derive(Debug, Default)]
pub struct Overrides {
    pub rom_dir: Option<PathBuf>,
    pub media_dir: Option<PathBuf>,
    pub extras_dir: Option<PathBuf>,
    pub consoles: Option<String>,
}

/// Fully merged run settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub rom_dir: PathBuf,
    pub media_dir: PathBuf,
    pub extras_dir: PathBuf,
    pub consoles: Vec<String>,
    pub archive_name: String,
    pub archive_consoles: Vec<String>,
    pub ignore: Vec<String>,
}

impl Settings {
    pub fn merge(file: FileConfig, cli: Overrides) -> Result<Self> {
        let rom_dir = cli
            .rom_dir
            .or(file.rom_dir)
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or(ArtgenError::MissingRomDir)?;

        let consoles = match cli.consoles {
            Some(list) => parse_console_list(&list),
            None => file
                .consoles
                .unwrap_or_else(|| to_strings(DEFAULT_CONSOLES)),
        };

        Ok(Self {
            rom_dir,
            media_dir: cli
                .media_dir
                .or(file.media_dir)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_MEDIA_DIR)),
            extras_dir: cli.extras_dir.or(file.extras_dir).unwrap_or_default(),
            consoles,
            archive_name: file
                .archive_name
                .unwrap_or_else(|| DEFAULT_ARCHIVE_NAME.to_string()),
            archive_consoles: file
                .archive_consoles
                .unwrap_or_else(|| to_strings(DEFAULT_ARCHIVE_CONSOLES)),
            ignore: file.ignore,
        })
    }

    /// The media dir hangs off the ROM root unless given as an absolute path.
    pub fn layout(&self) -> Layout {
        Layout {
            rom_root: self.rom_dir.clone(),
            media_root: self.rom_dir.join(&self.media_dir),
            extras_dir: self.extras_dir.clone(),
            archive_name: self.archive_name.clone(),
            archive_consoles: self.archive_consoles.clone(),
        }
    }

    pub fn ignore_set(&self) -> Result<GlobSet> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &self.ignore {
            builder.add(Glob::new(pattern).map_err(ArtgenError::IgnorePattern)?);
        }
        builder.build().map_err(ArtgenError::IgnorePattern)
    }
}

/// Split a comma-separated console list, trimming blanks.
pub fn parse_console_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect()
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
