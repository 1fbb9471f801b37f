//! Decoder configuration

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{PlaylistError, Result};
use crate::types::ListType;

pub use crate::timestamp::TimestampMode;

/// Options controlling how manifests are decoded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeOptions {
    /// Fail on malformed tag values instead of coercing them
    pub strict: bool,

    /// Program date-time grammar
    pub timestamps: TimestampMode,

    /// Initial segment capacity of autodetected media playlists
    pub media_capacity: usize,

    /// Window size of autodetected media playlists (0 = unbounded)
    pub media_window: usize,

    /// Playlist type assumed when no master-only or media-only tag is found
    pub fallback_type: Option<ListType>,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            strict: false,
            timestamps: TimestampMode::Lenient,
            media_capacity: 1024,
            media_window: 0,
            fallback_type: Some(ListType::Media),
        }
    }
}

impl DecodeOptions {
    /// Default options with the given strictness
    pub fn new(strict: bool) -> Self {
        Self {
            strict,
            ..Default::default()
        }
    }

    /// Parse options from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| PlaylistError::Config(e.to_string()))
    }

    /// Load options from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| PlaylistError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
    }

    /// Save options to a TOML file
    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| PlaylistError::Config(e.to_string()))?;
        std::fs::write(path.as_ref(), content)
            .map_err(|e| PlaylistError::Config(format!("{}: {}", path.as_ref().display(), e)))?;
        Ok(())
    }
}
