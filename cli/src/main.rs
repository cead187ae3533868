//! Blockboard CLI - line-driven sprint board on top of [`blockboard_engine`].
//!
//! ```text
//! main() -> Board::demo(config) -> read line -> Board::execute() -> print
//! ```
//!
//! Commands: `show`, `click <ref> [mod]`, `drag <task>`, `hover <task>`,
//! `drop`, `cancel`, `undo`, `history`, `quit`.

mod board;

use anyhow::Result;
use std::{
    fs::{self, File, OpenOptions},
    io::{self, BufRead, Write, stdin, stdout},
    path::{Path, PathBuf},
    sync::Mutex,
};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use blockboard_engine::BoardConfig;

use crate::board::Board;

/// Route tracing to the first writable log file. Stdout carries the board,
/// so when no file can be opened events are filtered but never printed.
fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(env_filter);

    let mut failures = Vec::new();
    let Some((log_path, file)) = log_file_candidates()
        .into_iter()
        .find_map(|path| match open_append(&path) {
            Ok(file) => Some((path, file)),
            Err(e) => {
                failures.push(format!("{}: {e}", path.display()));
                None
            }
        })
    else {
        registry.init();
        return;
    };

    registry
        .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        .init();
    tracing::info!(path = %log_path.display(), "Logging initialized");
    for failure in failures {
        tracing::warn!("Skipped log file {failure}");
    }
}

fn open_append(path: &Path) -> io::Result<File> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// `logs/blockboard.log` next to the config file, then under the working
/// directory.
fn log_file_candidates() -> Vec<PathBuf> {
    let file_name = Path::new("logs").join("blockboard.log");
    BoardConfig::path()
        .as_deref()
        .and_then(Path::parent)
        .map(|dir| dir.join(&file_name))
        .into_iter()
        .chain([Path::new(".blockboard").join(&file_name)])
        .collect()
}

fn load_config() -> BoardConfig {
    match BoardConfig::load() {
        Ok(config) => config.unwrap_or_default(),
        Err(err) => {
            tracing::warn!(path = %err.path().display(), %err, "Ignoring unreadable config");
            BoardConfig::default()
        }
    }
}

fn main() -> Result<()> {
    init_tracing();

    let config = load_config();
    let mut board = Board::demo(&config)?;

    let mut out = stdout();
    write!(out, "{}", board.render())?;
    out.flush()?;

    for line in stdin().lock().lines() {
        let line = line?;
        match board.execute(&line) {
            Ok(true) => {}
            Ok(false) => break,
            Err(err) => {
                tracing::warn!(command = %line.trim(), %err, "Command failed");
                println!("error: {err:#}");
            }
        }
        out.flush()?;
    }

    tracing::info!("Session ended");
    Ok(())
}
