//! Saving and loading the whole portal.
//!
//! The portal is written as a single JSON document with a format version.
//! Loading never leaves a half-populated store: the file is parsed in full
//! before anything is replaced.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use super::{Inconsistency, Portal};

/// Version written to, and required from, portal files.
pub const FORMAT_VERSION: u32 = 1;

/// Errors that can occur when saving or loading a portal file.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    /// Reading or writing the file failed
    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not a valid portal document
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The file was written by an incompatible version
    #[error("unsupported portal format version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    /// The file parsed but its entities do not fit together
    #[error(transparent)]
    Inconsistent(#[from] Inconsistency),
}

#[derive(Serialize)]
struct SavedPortalRef<'a> {
    format_version: u32,
    portal: &'a Portal,
}

#[derive(Deserialize)]
struct SavedPortal {
    format_version: u32,
    portal: Portal,
}

/// Configuration for a portal file.
#[derive(Debug, Clone)]
pub struct PersistConfig {
    /// Path to the portal file.
    pub path: PathBuf,
    /// Whether to pretty-print the JSON.
    pub pretty: bool,
}

impl PersistConfig {
    /// Create a config for the given path, writing compact JSON.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            pretty: false,
        }
    }

    /// Set whether to pretty-print.
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

impl Default for PersistConfig {
    fn default() -> Self {
        Self::new("portal.json")
    }
}

/// A portal file on disk.
#[derive(Debug, Clone)]
pub struct PortalFile {
    config: PersistConfig,
}

impl PortalFile {
    pub fn new(config: PersistConfig) -> Self {
        Self { config }
    }

    /// Get the file path.
    pub fn path(&self) -> &Path {
        &self.config.path
    }

    /// Write the portal, creating parent directories if needed.
    pub fn save(&self, portal: &Portal) -> Result<(), PersistError> {
        let path = &self.config.path;
        let doc = SavedPortalRef {
            format_version: FORMAT_VERSION,
            portal,
        };
        let json = if self.config.pretty {
            serde_json::to_string_pretty(&doc)?
        } else {
            serde_json::to_string(&doc)?
        };

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|source| PersistError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        std::fs::write(path, json).map_err(|source| PersistError::Io {
            path: path.clone(),
            source,
        })?;

        info!(path = %path.display(), races = portal.races.len(), "saved portal");
        Ok(())
    }

    /// Read a portal.
    pub fn load(&self) -> Result<Portal, PersistError> {
        let path = &self.config.path;
        let contents = std::fs::read_to_string(path).map_err(|source| PersistError::Io {
            path: path.clone(),
            source,
        })?;
        let saved: SavedPortal = serde_json::from_str(&contents)?;

        if saved.format_version != FORMAT_VERSION {
            return Err(PersistError::UnsupportedVersion {
                found: saved.format_version,
                expected: FORMAT_VERSION,
            });
        }
        saved.portal.check_integrity()?;

        info!(path = %path.display(), races = saved.portal.races.len(), "loaded portal");
        Ok(saved.portal)
    }
}

impl Portal {
    /// Save to `path` as compact JSON.
    pub fn save(&self, path: impl Into<PathBuf>) -> Result<(), PersistError> {
        PortalFile::new(PersistConfig::new(path)).save(self)
    }

    /// Load a portal from `path`.
    pub fn load(path: impl Into<PathBuf>) -> Result<Portal, PersistError> {
        PortalFile::new(PersistConfig::new(path)).load()
    }

    /// Replace this portal's contents with those saved at `path`.
    ///
    /// On error the portal is left unchanged.
    pub fn load_into(&mut self, path: impl Into<PathBuf>) -> Result<(), PersistError> {
        *self = Portal::load(path)?;
        Ok(())
    }
}
