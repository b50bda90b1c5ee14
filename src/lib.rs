//! Composite cover art and title screens into fixed-size 640x480 preview
//! images for a handheld game front-end.
//!
//! For each console, every ROM file gets `imgs/<game>.png` next to it, built
//! from `<media>/<console>/<game>.{png,gif,jpg}` or, for archive-backed
//! consoles, from the matching entry of a shared `titles.zip`.

pub mod batch;
pub mod compose;
pub mod config;
pub mod console;
pub mod error;
pub mod resolve;

pub use batch::{BatchRunner, BatchSummary, CollectingReporter, Reporter, TracingReporter};
pub use compose::{compose, Canvas, Geometry};
pub use config::{FileConfig, Overrides, Settings};
pub use console::{ConsoleKind, Layout};
pub use error::{ArtgenError, Result};
pub use resolve::ArtworkSource;
