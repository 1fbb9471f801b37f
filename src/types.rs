//! Playlist entity types

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use crate::cue::Scte;
use crate::custom::CustomTags;

/// Concrete playlist type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListType {
    Master,
    Media,
}

impl fmt::Display for ListType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListType::Master => write!(f, "master"),
            ListType::Media => write!(f, "media"),
        }
    }
}

/// `EXT-X-PLAYLIST-TYPE` value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    Event,
    Vod,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Event => "EVENT",
            MediaType::Vod => "VOD",
        }
    }

    pub(crate) fn from_attr(value: &str) -> Option<Self> {
        match value {
            "EVENT" => Some(MediaType::Event),
            "VOD" => Some(MediaType::Vod),
            _ => None,
        }
    }
}

/// An explicit `YES` or `NO` attribute
///
/// Used as `Option<YesNo>` so an absent attribute stays distinct from `NO`.
/// Lenient decoding keeps any other value verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum YesNo {
    Yes,
    No,
    Other(String),
}

impl YesNo {
    pub fn as_str(&self) -> &str {
        match self {
            YesNo::Yes => "YES",
            YesNo::No => "NO",
            YesNo::Other(value) => value,
        }
    }

    pub fn is_yes(&self) -> bool {
        matches!(self, YesNo::Yes)
    }

    pub(crate) fn from_attr(value: &str) -> Option<Self> {
        match value {
            "YES" => Some(YesNo::Yes),
            "NO" => Some(YesNo::No),
            _ => None,
        }
    }
}

impl From<bool> for YesNo {
    fn from(value: bool) -> Self {
        if value {
            YesNo::Yes
        } else {
            YesNo::No
        }
    }
}

/// `TYPE` of an `EXT-X-MEDIA` rendition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlternativeType {
    Audio,
    Video,
    Subtitles,
    ClosedCaptions,
    /// Unknown value kept verbatim by non-strict decoding
    Other(String),
}

impl Default for AlternativeType {
    fn default() -> Self {
        AlternativeType::Other(String::new())
    }
}

impl AlternativeType {
    pub fn as_str(&self) -> &str {
        match self {
            AlternativeType::Audio => "AUDIO",
            AlternativeType::Video => "VIDEO",
            AlternativeType::Subtitles => "SUBTITLES",
            AlternativeType::ClosedCaptions => "CLOSED-CAPTIONS",
            AlternativeType::Other(value) => value,
        }
    }

    pub(crate) fn from_attr(value: &str) -> Option<Self> {
        match value {
            "AUDIO" => Some(AlternativeType::Audio),
            "VIDEO" => Some(AlternativeType::Video),
            "SUBTITLES" => Some(AlternativeType::Subtitles),
            "CLOSED-CAPTIONS" => Some(AlternativeType::ClosedCaptions),
            _ => None,
        }
    }
}

/// `CLOSED-CAPTIONS` reference of a variant
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClosedCaptions {
    /// The literal `NONE`: the variant has no captions at all
    Disabled,
    /// A caption rendition group-id
    Group(String),
}

impl ClosedCaptions {
    pub fn as_str(&self) -> &str {
        match self {
            ClosedCaptions::Disabled => "NONE",
            ClosedCaptions::Group(id) => id,
        }
    }

    /// The referenced group-id, if any
    pub fn group_id(&self) -> Option<&str> {
        match self {
            ClosedCaptions::Disabled => None,
            ClosedCaptions::Group(id) => Some(id),
        }
    }

    pub(crate) fn from_attr(value: &str) -> Self {
        if value == "NONE" {
            ClosedCaptions::Disabled
        } else {
            ClosedCaptions::Group(value.to_string())
        }
    }
}

/// Sub-range of a resource, `<length>[@<offset>]`
///
/// Without an offset the range starts right after the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub length: u64,
    pub offset: Option<u64>,
}

impl ByteRange {
    pub fn new(length: u64, offset: Option<u64>) -> Self {
        Self { length, offset }
    }
}

impl FromStr for ByteRange {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.split_once('@') {
            Some((length, offset)) => Ok(ByteRange {
                length: length.trim().parse()?,
                offset: Some(offset.trim().parse()?),
            }),
            None => Ok(ByteRange {
                length: s.parse()?,
                offset: None,
            }),
        }
    }
}

impl fmt::Display for ByteRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.offset {
            Some(offset) => write!(f, "{}@{}", self.length, offset),
            None => write!(f, "{}", self.length),
        }
    }
}

/// `EXT-X-KEY` encryption parameters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Key {
    pub method: String,
    pub uri: Option<String>,
    pub iv: Option<String>,
    pub keyformat: Option<String>,
    pub keyformatversions: Option<String>,
}

/// `EXT-X-MAP` media initialization section
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Map {
    pub uri: String,
    pub byte_range: Option<ByteRange>,
}

/// `EXT-X-START` preferred start point
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StartPoint {
    /// Seconds from the start (or, when negative, from the end) of the playlist
    pub time_offset: f64,
    pub precise: bool,
}

/// An `EXT-X-MEDIA` rendition
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Alternative {
    pub group_id: String,
    pub media_type: AlternativeType,
    pub uri: Option<String>,
    pub language: Option<String>,
    pub name: String,
    pub default: bool,
    pub autoselect: Option<YesNo>,
    pub forced: Option<YesNo>,
    pub characteristics: Option<String>,
    pub subtitles: Option<String>,
    pub channels: Option<String>,
    pub instream_id: Option<String>,
}

/// Parameters of an `EXT-X-STREAM-INF` or `EXT-X-I-FRAME-STREAM-INF` entry
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VariantParams {
    pub program_id: Option<u32>,
    pub bandwidth: u64,
    pub average_bandwidth: Option<u64>,
    pub codecs: Option<String>,
    pub resolution: Option<String>,
    pub frame_rate: Option<f64>,
    pub hdcp_level: Option<String>,
    pub video_range: Option<String>,
    pub audio: Option<String>,
    pub video: Option<String>,
    pub subtitles: Option<String>,
    pub closed_captions: Option<ClosedCaptions>,
    pub name: Option<String>,
    /// Entry comes from `EXT-X-I-FRAME-STREAM-INF`
    pub iframe: bool,
    /// Alternatives whose group-id matches one of the group references
    pub alternatives: Vec<Alternative>,
}

impl VariantParams {
    /// Whether `group_id` is one of this variant's rendition references
    pub fn references_group(&self, group_id: &str) -> bool {
        [&self.audio, &self.video, &self.subtitles]
            .into_iter()
            .any(|r| r.as_deref() == Some(group_id))
            || self
                .closed_captions
                .as_ref()
                .and_then(ClosedCaptions::group_id)
                == Some(group_id)
    }
}

/// A variant stream of a master playlist
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Variant {
    pub uri: String,
    pub params: VariantParams,
}

/// A media segment
///
/// The sequence id is owned by the playlist that holds the segment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MediaSegment {
    pub(crate) seq_id: u64,
    pub uri: String,
    /// Seconds
    pub duration: f64,
    pub title: String,
    pub byte_range: Option<ByteRange>,
    /// Preceded by `EXT-X-DISCONTINUITY`
    pub discontinuity: bool,
    pub program_date_time: Option<DateTime<FixedOffset>>,
    pub key: Option<Key>,
    pub map: Option<Map>,
    pub cue: Option<Scte>,
    pub custom: CustomTags,
}

impl MediaSegment {
    pub fn new(uri: impl Into<String>, duration: f64) -> Self {
        Self {
            uri: uri.into(),
            duration,
            ..Default::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Media sequence number
    pub fn seq_id(&self) -> u64 {
        self.seq_id
    }
}
