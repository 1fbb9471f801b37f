//! Line classification

use crate::types::ListType;

/// Tags with built-in handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Tag {
    ExtM3u,
    Version,
    IndependentSegments,
    Start,
    // master
    StreamInf,
    IFrameStreamInf,
    Media,
    // media
    TargetDuration,
    MediaSequence,
    DiscontinuitySequence,
    PlaylistType,
    EndList,
    IFramesOnly,
    Key,
    Map,
    ProgramDateTime,
    ByteRange,
    Discontinuity,
    ExtInf,
    Scte35,
    OatclsScte35,
    CueOut,
    CueOutCont,
    CueIn,
}

/// Which playlist type a tag belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Category {
    Shared,
    Master,
    Media,
}

impl Category {
    pub fn list_type(self) -> Option<ListType> {
        match self {
            Category::Shared => None,
            Category::Master => Some(ListType::Master),
            Category::Media => Some(ListType::Media),
        }
    }
}

impl Tag {
    /// Look up a tag by its name (the part between `#` and `:`)
    ///
    /// Exact lookup, so `EXT-X-DISCONTINUITY` and
    /// `EXT-X-DISCONTINUITY-SEQUENCE` never shadow each other.
    pub fn from_name(name: &str) -> Option<Tag> {
        let tag = match name {
            "EXTM3U" => Tag::ExtM3u,
            "EXT-X-VERSION" => Tag::Version,
            "EXT-X-INDEPENDENT-SEGMENTS" => Tag::IndependentSegments,
            "EXT-X-START" => Tag::Start,
            "EXT-X-STREAM-INF" => Tag::StreamInf,
            "EXT-X-I-FRAME-STREAM-INF" => Tag::IFrameStreamInf,
            "EXT-X-MEDIA" => Tag::Media,
            "EXT-X-TARGETDURATION" => Tag::TargetDuration,
            "EXT-X-MEDIA-SEQUENCE" => Tag::MediaSequence,
            "EXT-X-DISCONTINUITY-SEQUENCE" => Tag::DiscontinuitySequence,
            "EXT-X-PLAYLIST-TYPE" => Tag::PlaylistType,
            "EXT-X-ENDLIST" => Tag::EndList,
            "EXT-X-I-FRAMES-ONLY" => Tag::IFramesOnly,
            "EXT-X-KEY" => Tag::Key,
            "EXT-X-MAP" => Tag::Map,
            "EXT-X-PROGRAM-DATE-TIME" => Tag::ProgramDateTime,
            "EXT-X-BYTERANGE" => Tag::ByteRange,
            "EXT-X-DISCONTINUITY" => Tag::Discontinuity,
            "EXTINF" => Tag::ExtInf,
            "EXT-SCTE35" => Tag::Scte35,
            "EXT-OATCLS-SCTE35" => Tag::OatclsScte35,
            "EXT-X-CUE-OUT" => Tag::CueOut,
            "EXT-X-CUE-OUT-CONT" => Tag::CueOutCont,
            "EXT-X-CUE-IN" => Tag::CueIn,
            _ => return None,
        };
        Some(tag)
    }

    pub fn name(self) -> &'static str {
        match self {
            Tag::ExtM3u => "EXTM3U",
            Tag::Version => "EXT-X-VERSION",
            Tag::IndependentSegments => "EXT-X-INDEPENDENT-SEGMENTS",
            Tag::Start => "EXT-X-START",
            Tag::StreamInf => "EXT-X-STREAM-INF",
            Tag::IFrameStreamInf => "EXT-X-I-FRAME-STREAM-INF",
            Tag::Media => "EXT-X-MEDIA",
            Tag::TargetDuration => "EXT-X-TARGETDURATION",
            Tag::MediaSequence => "EXT-X-MEDIA-SEQUENCE",
            Tag::DiscontinuitySequence => "EXT-X-DISCONTINUITY-SEQUENCE",
            Tag::PlaylistType => "EXT-X-PLAYLIST-TYPE",
            Tag::EndList => "EXT-X-ENDLIST",
            Tag::IFramesOnly => "EXT-X-I-FRAMES-ONLY",
            Tag::Key => "EXT-X-KEY",
            Tag::Map => "EXT-X-MAP",
            Tag::ProgramDateTime => "EXT-X-PROGRAM-DATE-TIME",
            Tag::ByteRange => "EXT-X-BYTERANGE",
            Tag::Discontinuity => "EXT-X-DISCONTINUITY",
            Tag::ExtInf => "EXTINF",
            Tag::Scte35 => "EXT-SCTE35",
            Tag::OatclsScte35 => "EXT-OATCLS-SCTE35",
            Tag::CueOut => "EXT-X-CUE-OUT",
            Tag::CueOutCont => "EXT-X-CUE-OUT-CONT",
            Tag::CueIn => "EXT-X-CUE-IN",
        }
    }

    pub fn category(self) -> Category {
        match self {
            Tag::ExtM3u | Tag::Version | Tag::IndependentSegments | Tag::Start => {
                Category::Shared
            }
            Tag::StreamInf | Tag::IFrameStreamInf | Tag::Media => Category::Master,
            _ => Category::Media,
        }
    }
}

/// One classified input line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Line<'a> {
    Blank,
    Tag { tag: Tag, value: Option<&'a str> },
    /// `#`-prefixed but not a built-in tag: a comment or a custom tag
    Other(&'a str),
    Uri(&'a str),
}

/// Classify a line that has already been trimmed
pub(crate) fn classify(line: &str) -> Line<'_> {
    if line.is_empty() {
        return Line::Blank;
    }
    let Some(body) = line.strip_prefix('#') else {
        return Line::Uri(line);
    };
    let (name, value) = match body.split_once(':') {
        Some((name, value)) => (name, Some(value)),
        None => (body, None),
    };
    match Tag::from_name(name) {
        Some(tag) => Line::Tag { tag, value },
        None => Line::Other(line),
    }
}
