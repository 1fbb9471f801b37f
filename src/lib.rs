//! HLS playlist decoding and encoding
//!
//! Reads master and media playlists (strict or lenient), lets producers
//! mutate media playlists as a sliding live window, and renders both types
//! back to text.

// Lazily compiled static regex.
macro_rules! regex {
    ($re:literal $(,)?) => {{
        static RE: std::sync::OnceLock<regex::Regex> = std::sync::OnceLock::new();
        RE.get_or_init(|| regex::Regex::new($re).unwrap())
    }};
}

pub(crate) mod config;
pub(crate) mod cue;
pub(crate) mod custom;
pub(crate) mod decode;
pub(crate) mod error;
pub(crate) mod playlist;
pub mod timestamp;
pub(crate) mod types;

#[cfg(test)]
pub(crate) mod tests;

pub use config::{DecodeOptions, TimestampMode};
pub use cue::{CueType, Scte, ScteSyntax};
pub use custom::{CustomDecoder, CustomTag, CustomTags, RawTag, RawTagDecoder, TagScope};
pub use decode::{decode_from, decode_with, decode_with_options, Playlist};
pub use error::{PlaylistError, Result};
pub use playlist::{EvictionPolicy, MasterPlaylist, MediaPlaylist, SegmentWindow};
pub use types::{
    Alternative, AlternativeType, ByteRange, ClosedCaptions, Key, ListType, Map, MediaSegment,
    MediaType, StartPoint, Variant, VariantParams, YesNo,
};
