use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use globset::GlobSet;
use tracing::Level;

use artgen::config::DEFAULT_CONFIG_FILE;
use artgen::{BatchRunner, FileConfig, Overrides, Settings, TracingReporter};

#[derive(Parser, Debug)]
#[command(name = "artgen")]
#[command(about = "Composite cover art into 640x480 game preview images.", long_about = None)]
struct Cli {
    /// Root directory of all ROMs, one subdirectory per console
    #[arg(long)]
    rom_dir: Option<PathBuf>,

    /// Artwork directory, relative to the ROM root [default: media]
    #[arg(long)]
    media_dir: Option<PathBuf>,

    /// Directory holding titles.zip for archive-backed consoles
    #[arg(long, alias = "mame-extras")]
    extras_dir: Option<PathBuf>,

    /// Comma-separated consoles to process [default: gb,gbc,gba,arcade,mame2000]
    #[arg(long)]
    consoles: Option<String>,

    /// Config file [default: artgen.toml, optional]
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let (settings, ignore) = match load_settings(cli) {
        Ok(loaded) => loaded,
        Err(err) => {
            eprintln!("{err:#}");
            return ExitCode::FAILURE;
        }
    };

    let runner = BatchRunner::new(settings.layout()).with_ignore(ignore);
    for console in &settings.consoles {
        let mut reporter = TracingReporter;
        match runner.run(console, &mut reporter) {
            Ok(summary) => tracing::info!(
                console = console.as_str(),
                created = summary.created,
                failed = summary.failed,
                skipped = summary.skipped,
                "console done"
            ),
            Err(err) => tracing::error!("can't process console {console}: {err}"),
        }
    }

    ExitCode::SUCCESS
}

fn load_settings(cli: Cli) -> Result<(Settings, GlobSet)> {
    let (config_path, required) = match cli.config {
        Some(path) => (path, true),
        None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
    };
    let file = FileConfig::load(&config_path, required).context("loading config")?;

    let settings = Settings::merge(
        file,
        Overrides {
            rom_dir: cli.rom_dir,
            media_dir: cli.media_dir,
            extras_dir: cli.extras_dir,
            consoles: cli.consoles,
        },
    )?;
    let ignore = settings.ignore_set().context("compiling ignore patterns")?;
    tracing::debug!(?settings, "settings resolved");
    Ok((settings, ignore))
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .init();
}
