//! Playlist models
//!
//! This module holds the two playlist types and their rendering:
//! - Master playlist with variants and alternative renditions
//! - Media playlist with a sliding segment window

pub(crate) mod master;
pub(crate) mod media;
pub(crate) mod window;

pub use master::MasterPlaylist;
pub use media::MediaPlaylist;
pub use window::{EvictionPolicy, SegmentWindow};

use std::fmt::Display;

/// Builder for a rendered attribute list
#[derive(Default)]
pub(crate) struct AttributeList {
    items: Vec<String>,
}

impl AttributeList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unquoted value, quoted anyway when it would not survive re-parsing
    pub fn plain(&mut self, name: &str, value: impl Display) -> &mut Self {
        let value = value.to_string();
        if needs_quotes(&value) {
            return self.quoted(name, &value);
        }
        self.items.push(format!("{}={}", name, value));
        self
    }

    pub fn quoted(&mut self, name: &str, value: &str) -> &mut Self {
        self.items.push(format!("{}=\"{}\"", name, value));
        self
    }

    pub fn opt_plain(&mut self, name: &str, value: Option<impl Display>) -> &mut Self {
        if let Some(value) = value {
            self.plain(name, value);
        }
        self
    }

    pub fn opt_quoted(&mut self, name: &str, value: Option<&str>) -> &mut Self {
        if let Some(value) = value {
            self.quoted(name, value);
        }
        self
    }

    pub fn build(&self) -> String {
        self.items.join(",")
    }
}

fn needs_quotes(value: &str) -> bool {
    value.contains(',') || value.trim() != value
}

/// Render a duration in seconds
///
/// Three decimals when that is exact, otherwise the shortest form that
/// parses back to the same value.
pub(crate) fn format_duration(duration: f64) -> String {
    let fixed = format!("{:.3}", duration);
    if fixed.parse::<f64>().ok() == Some(duration) {
        fixed
    } else {
        duration.to_string()
    }
}
