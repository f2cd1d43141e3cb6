//! Command-line and environment configuration for the `estante` binary.

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::{Parser, ValueEnum};
use directories::BaseDirs;

use crate::models::Actor;

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".estante-virtual";
/// Log file name stored inside the application data directory.
const LOG_FILE_NAME: &str = "estante.log";

/// Backend holding the review records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StoreKind {
    /// Plain in-process vector.
    Memory,
    /// Embedded SQLite connection, opened in memory.
    Sqlite,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "estante", version, about = "Terminal front end for a small library")]
pub struct Config {
    /// Nickname of the acting user. `admin` and `bibliotecario` carry
    /// administrator and librarian rights.
    #[arg(long, env = "ESTANTE_USER", default_value = Actor::ADMIN_NICKNAME)]
    pub user: String,

    /// Backend for review records.
    #[arg(long, env = "ESTANTE_STORE", value_enum, default_value_t = StoreKind::Memory)]
    pub store: StoreKind,

    /// Start with empty stores instead of the sample records.
    #[arg(long)]
    pub no_seed: bool,

    /// Where to write the log. Defaults to ~/.estante-virtual/estante.log.
    #[arg(long, env = "ESTANTE_LOG")]
    pub log_file: Option<PathBuf>,

    /// Minimum level written to the log (trace, debug, info, warn, error).
    #[arg(long, env = "ESTANTE_LOG_LEVEL", default_value = "info")]
    pub log_level: tracing::Level,
}

impl Config {
    pub fn actor(&self) -> Actor {
        Actor::from_nickname(self.user.trim())
    }

    pub fn seed(&self) -> bool {
        !self.no_seed
    }

    /// Resolve the log path, falling back to the data directory in the
    /// user's home.
    pub fn log_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.log_file {
            return Ok(path.clone());
        }
        let base_dirs =
            BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
        Ok(base_dirs.home_dir().join(DATA_DIR_NAME).join(LOG_FILE_NAME))
    }
}
