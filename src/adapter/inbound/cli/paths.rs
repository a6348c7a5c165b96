//! Path utilities for strikebook.
//!
//! The configuration file lives at `~/.strikebook/config.toml` unless
//! `--config` says otherwise.

use std::path::PathBuf;

/// Returns the strikebook home directory (`~/.strikebook/`).
pub fn home_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".strikebook")
}

/// Returns the default config file path (`~/.strikebook/config.toml`).
pub fn default_config() -> PathBuf {
    home_dir().join("config.toml")
}
