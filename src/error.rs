use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, ArtgenError>;

#[derive(thiserror::Error, Debug)]
pub enum ArtgenError {
    #[error("archive {path} is unavailable: {source}")]
    ArchiveUnavailable {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("no artwork found for {console}/{game}")]
    ArtworkNotFound { console: String, game: String },

    #[error("archive entry {entry} could not be decoded: {source}")]
    UndecodableArtwork {
        entry: String,
        #[source]
        source: image::ImageError,
    },

    #[error("source image has degenerate dimensions {width}x{height}")]
    InvalidSource { width: u32, height: u32 },

    #[error("cannot list ROM directory {path}: {source}")]
    DirectoryUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write {path}: {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("ROM file name {path} is not valid UTF-8")]
    UnusableRomName { path: PathBuf },

    #[error("cannot read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("bad ignore pattern: {0}")]
    IgnorePattern(#[source] globset::Error),

    #[error("--rom-dir not set")]
    MissingRomDir,
}

impl ArtgenError {
    pub fn not_found(console: impl Into<String>, game: impl Into<String>) -> Self {
        Self::ArtworkNotFound {
            console: console.into(),
            game: game.into(),
        }
    }
}
