//! XDG Base Directory support.
//!
//! Resolves where docrag keeps its configuration file and its
//! vector database on Linux/Unix systems.

use std::env;
use std::fs;
use std::path::PathBuf;

/// XDG directory structure for docrag
#[derive(Debug, Clone)]
pub struct XdgDirs {
    pub config_dir: PathBuf,
    pub data_dir: PathBuf,
}

impl XdgDirs {
    /// Resolve directories.
    ///
    /// Priority order (highest to lowest):
    /// 1. Explicit `DOCRAG_*_DIR` env vars
    /// 2. `XDG_*_HOME` environment variables
    /// 3. XDG defaults (`~/.config`, `~/.local/share`)
    pub fn new() -> Self {
        Self {
            config_dir: Self::resolve("DOCRAG_CONFIG_DIR", "XDG_CONFIG_HOME", &[".config"]),
            data_dir: Self::resolve(
                "DOCRAG_DATA_DIR",
                "XDG_DATA_HOME",
                &[".local", "share"],
            ),
        }
    }

    fn resolve(explicit_var: &str, xdg_var: &str, home_default: &[&str]) -> PathBuf {
        if let Ok(dir) = env::var(explicit_var) {
            return PathBuf::from(dir);
        }

        if let Ok(xdg) = env::var(xdg_var) {
            return PathBuf::from(xdg).join("docrag");
        }

        let mut path = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        for part in home_default {
            path.push(part);
        }
        path.join("docrag")
    }

    /// Config file path
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    /// Default vector database location
    pub fn vector_db_dir(&self) -> PathBuf {
        self.data_dir.join("vector_db")
    }

    /// Create the directories if they don't exist
    pub fn ensure_dirs_exist(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.config_dir)?;
        fs::create_dir_all(self.vector_db_dir())?;
        Ok(())
    }

    pub fn log_paths(&self) {
        tracing::debug!("XDG directories resolved:");
        tracing::debug!("  Config: {:?}", self.config_dir);
        tracing::debug!("  Data: {:?}", self.data_dir);
        tracing::debug!("  Config file: {:?}", self.config_file());
        tracing::debug!("  Vector DB: {:?}", self.vector_db_dir());
    }
}

impl Default for XdgDirs {
    fn default() -> Self {
        Self::new()
    }
}
