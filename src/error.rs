use thiserror::Error;

/// Main error type for playlist decoding and mutation
#[derive(Error, Debug)]
pub enum PlaylistError {
    /// A standard I/O error from the stream supplying the manifest
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Strict mode: the first non-blank line is not `#EXTM3U`
    #[error("Missing leading #EXTM3U marker")]
    NoExtM3u,

    /// Strict mode: a recognized tag carries a value that cannot be parsed
    #[error("Malformed {tag} value {value:?}: {reason}")]
    MalformedTag {
        tag: &'static str,
        value: String,
        reason: String,
    },

    /// A registered custom tag decoder rejected its line
    #[error("Custom tag {tag} decoding failed: {source}")]
    CustomTag {
        tag: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A media playlist window cannot be larger than its capacity
    #[error("Window size {window_size} exceeds capacity {capacity}")]
    WindowExceedsCapacity { window_size: usize, capacity: usize },

    /// Autodetection found no master-only or media-only tag and no fallback applies
    #[error("Can't detect playlist type")]
    UndetectableType,

    /// Segments cannot be appended to a closed (VOD) media playlist
    #[error("Media playlist is closed")]
    Closed,

    /// A program date-time value could not be parsed
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// Decode options could not be loaded or saved
    #[error("Configuration error: {0}")]
    Config(String),
}

impl PlaylistError {
    pub(crate) fn malformed(tag: &'static str, value: &str, reason: impl ToString) -> Self {
        PlaylistError::MalformedTag {
            tag,
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }

    /// True for errors that only strict decoding reports
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            PlaylistError::NoExtM3u | PlaylistError::MalformedTag { .. }
        )
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, PlaylistError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_message() {
        let err = PlaylistError::malformed("EXTINF", "abc", "invalid float literal");
        assert_eq!(
            err.to_string(),
            "Malformed EXTINF value \"abc\": invalid float literal"
        );
        assert!(err.is_format_error());
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "eof");
        let err: PlaylistError = io.into();
        assert!(matches!(err, PlaylistError::Io(_)));
        assert!(!err.is_format_error());
    }
}
