//! Sample manifests and test doubles

use std::error::Error;
use std::fmt::Write;

use crate::custom::{CustomDecoder, CustomTag, TagScope};

macro_rules! sample {
    ($name:literal) => {
        include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/sample-playlists/", $name))
    };
}

pub const MASTER: &str = sample!("master.m3u8");
pub const MASTER_WITH_ALTERNATIVES: &str = sample!("master-with-alternatives.m3u8");
pub const MASTER_CC_NONE: &str = sample!("master-with-closed-captions-eq-none.m3u8");
pub const MASTER_IFRAME: &str = sample!("master-with-i-frame-stream-inf.m3u8");
pub const MASTER_STREAM_INF_NAME: &str = sample!("master-with-stream-inf-name.m3u8");
pub const MASTER_INDEPENDENT_SEGMENTS: &str = sample!("master-with-independent-segments.m3u8");
pub const MASTER_MULTIPLE_CODECS: &str = sample!("master-with-multiple-codecs.m3u8");
pub const MASTER_APPLE: &str = sample!("master-apple.m3u8");
pub const MASTER_HLSV7: &str = sample!("master-with-hlsv7.m3u8");
pub const MASTER_CUSTOM_TAGS: &str = sample!("master-playlist-with-custom-tags.m3u8");

pub const WOWZA_VOD: &str = sample!("wowza-vod-chunklist.m3u8");
pub const MEDIA_BYTERANGE: &str = sample!("media-playlist-with-byterange.m3u8");
pub const MEDIA_OATCLS: &str = sample!("media-playlist-with-oatcls-scte35.m3u8");
pub const MEDIA_SCTE35: &str = sample!("media-playlist-with-scte35.m3u8");
pub const MEDIA_SCTE35_CUE_ONLY: &str = sample!("media-playlist-with-scte35-1.m3u8");
pub const WIDEVINE_BITRATE: &str = sample!("widevine-bitrate.m3u8");
pub const MEDIA_DISCONTINUITY: &str = sample!("media-playlist-with-discontinuity.m3u8");
pub const MEDIA_DISCONTINUITY_SEQ: &str = sample!("media-playlist-with-discontinuity-seq.m3u8");
pub const MEDIA_DISCONTINUITY_AT_START: &str = sample!("media-with-discontinuity-at-start.m3u8");
pub const MEDIA_PROGRAM_DATE_TIME: &str = sample!("media-playlist-with-program-date-time.m3u8");
pub const MEDIA_START_TIME: &str = sample!("media-playlist-with-start-time.m3u8");
pub const MEDIA_CUSTOM_TAGS: &str = sample!("media-playlist-with-custom-tags.m3u8");
pub const MEDIA_KEY_AND_MAP: &str = sample!("media-playlist-with-key-and-map.m3u8");

/// Every sample, for tests that run over all of them
pub fn all_samples() -> Vec<(&'static str, &'static str)> {
    vec![
        ("master", MASTER),
        ("master-with-alternatives", MASTER_WITH_ALTERNATIVES),
        ("master-with-closed-captions-eq-none", MASTER_CC_NONE),
        ("master-with-i-frame-stream-inf", MASTER_IFRAME),
        ("master-with-stream-inf-name", MASTER_STREAM_INF_NAME),
        ("master-with-independent-segments", MASTER_INDEPENDENT_SEGMENTS),
        ("master-with-multiple-codecs", MASTER_MULTIPLE_CODECS),
        ("master-apple", MASTER_APPLE),
        ("master-with-hlsv7", MASTER_HLSV7),
        ("master-playlist-with-custom-tags", MASTER_CUSTOM_TAGS),
        ("wowza-vod-chunklist", WOWZA_VOD),
        ("media-playlist-with-byterange", MEDIA_BYTERANGE),
        ("media-playlist-with-oatcls-scte35", MEDIA_OATCLS),
        ("media-playlist-with-scte35", MEDIA_SCTE35),
        ("media-playlist-with-scte35-1", MEDIA_SCTE35_CUE_ONLY),
        ("widevine-bitrate", WIDEVINE_BITRATE),
        ("media-playlist-with-discontinuity", MEDIA_DISCONTINUITY),
        ("media-playlist-with-discontinuity-seq", MEDIA_DISCONTINUITY_SEQ),
        ("media-with-discontinuity-at-start", MEDIA_DISCONTINUITY_AT_START),
        ("media-playlist-with-program-date-time", MEDIA_PROGRAM_DATE_TIME),
        ("media-playlist-with-start-time", MEDIA_START_TIME),
        ("media-playlist-with-custom-tags", MEDIA_CUSTOM_TAGS),
        ("media-playlist-with-key-and-map", MEDIA_KEY_AND_MAP),
    ]
}

/// A live-style media playlist with `count` ten second segments
pub fn generated_media(count: usize) -> String {
    let mut text = String::from("#EXTM3U\n#EXT-X-VERSION:3\n#EXT-X-TARGETDURATION:10\n#EXT-X-MEDIA-SEQUENCE:0\n");
    for n in 0..count {
        let _ = write!(text, "#EXTINF:10.000,\nsegment{}.ts\n", n);
    }
    text
}

/// Custom tag that renders a fixed line
#[derive(Debug, Clone)]
pub struct MockTag {
    name: String,
    encoded: String,
}

impl CustomTag for MockTag {
    fn tag_name(&self) -> &str {
        &self.name
    }

    fn encode(&self) -> Option<String> {
        Some(self.encoded.clone())
    }
}

/// Decoder producing [`MockTag`]s, or failing with `error` when set
#[derive(Debug, Clone)]
pub struct MockDecoder {
    pub name: &'static str,
    pub scope: TagScope,
    pub encoded: &'static str,
    pub error: Option<&'static str>,
}

impl MockDecoder {
    pub fn new(name: &'static str, scope: TagScope, encoded: &'static str) -> Self {
        Self {
            name,
            scope,
            encoded,
            error: None,
        }
    }

    pub fn failing(name: &'static str, scope: TagScope, error: &'static str) -> Self {
        Self {
            name,
            scope,
            encoded: "",
            error: Some(error),
        }
    }
}

impl CustomDecoder for MockDecoder {
    fn tag_name(&self) -> &str {
        self.name
    }

    fn scope(&self) -> TagScope {
        self.scope
    }

    fn decode(&self, _line: &str) -> Result<Box<dyn CustomTag>, Box<dyn Error + Send + Sync>> {
        if let Some(error) = self.error {
            return Err(error.into());
        }
        Ok(Box::new(MockTag {
            name: self.name.to_string(),
            encoded: self.encoded.to_string(),
        }))
    }
}
