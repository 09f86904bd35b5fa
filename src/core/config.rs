use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use crate::core::errors::{Error, Result};

/// Process-wide settings, read-only after startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Canonical sandbox root; every request is confined to it.
    pub root: PathBuf,
    /// Display name of the root in breadcrumb trails.
    pub label: String,
    pub listen_addr: SocketAddr,
}

impl Config {
    /// Canonicalizes `root` up front. A root that cannot be resolved is a
    /// startup failure, not a per-request one.
    pub fn new(
        root: impl AsRef<Path>,
        label: impl Into<String>,
        listen_addr: SocketAddr,
    ) -> Result<Self> {
        let root = root.as_ref();
        let root = fs::canonicalize(root).map_err(|e| {
            Error::Config(format!(
                "sandbox root '{}' cannot be canonicalized: {e}",
                root.display()
            ))
        })?;
        if !root.is_dir() {
            return Err(Error::Config(format!(
                "sandbox root '{}' is not a directory",
                root.display()
            )));
        }
        Ok(Self {
            root,
            label: label.into(),
            listen_addr,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn addr() -> SocketAddr {
        "127.0.0.1:0".parse().unwrap()
    }

    #[test]
    fn canonicalizes_root_at_startup() {
        let dir = TempDir::new().unwrap();
        let config = Config::new(dir.path(), "storage", addr()).unwrap();
        assert_eq!(config.root, fs::canonicalize(dir.path()).unwrap());
        assert_eq!(config.label, "storage");
    }

    #[test]
    fn missing_root_is_a_config_error() {
        let dir = TempDir::new().unwrap();
        let result = Config::new(dir.path().join("absent"), "storage", addr());
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn file_root_is_a_config_error() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("plain.txt");
        fs::write(&file, "x").unwrap();
        let result = Config::new(&file, "storage", addr());
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
