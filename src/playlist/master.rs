//! Master playlist
//!
//! Variants in document order plus every `EXT-X-MEDIA` rendition. Each
//! variant also carries the renditions its group references resolve to.

use std::fmt;
use std::io::Read;
use std::sync::Arc;

use bytes::Bytes;

use super::AttributeList;
use crate::config::DecodeOptions;
use crate::custom::{CustomDecoder, CustomTags};
use crate::decode;
use crate::error::Result;
use crate::types::{Alternative, Variant, VariantParams, YesNo};

const DEFAULT_VERSION: u8 = 3;

/// A master playlist
#[derive(Debug, Clone)]
pub struct MasterPlaylist {
    pub variants: Vec<Variant>,
    /// Every rendition in document order
    pub alternatives: Vec<Alternative>,
    /// Playlist-level custom tags
    pub custom: CustomTags,
    pub(crate) version: u8,
    independent_segments: bool,
    decoders: Vec<Arc<dyn CustomDecoder>>,
}

impl Default for MasterPlaylist {
    fn default() -> Self {
        Self::new()
    }
}

impl MasterPlaylist {
    pub fn new() -> Self {
        Self {
            variants: Vec::new(),
            alternatives: Vec::new(),
            custom: CustomTags::new(),
            version: DEFAULT_VERSION,
            independent_segments: false,
            decoders: Vec::new(),
        }
    }

    /// Register custom tag decoders used by subsequent decodes
    pub fn with_custom_decoders(mut self, decoders: Vec<Arc<dyn CustomDecoder>>) -> Self {
        self.decoders = decoders;
        self
    }

    pub fn custom_decoders(&self) -> &[Arc<dyn CustomDecoder>] {
        &self.decoders
    }

    /// Decode a manifest into this playlist
    pub fn decode_from<R: Read>(&mut self, reader: R, strict: bool) -> Result<()> {
        self.decode_with_options(reader, &DecodeOptions::new(strict))
    }

    pub fn decode_with_options<R: Read>(&mut self, reader: R, options: &DecodeOptions) -> Result<()> {
        let text = decode::read_input(reader)?;
        decode::decode_master(self, &text, options)
    }

    pub fn version(&self) -> u8 {
        self.version
    }

    pub fn set_version(&mut self, version: u8) {
        self.version = version;
    }

    pub fn independent_segments(&self) -> bool {
        self.independent_segments
    }

    pub fn set_independent_segments(&mut self, yes: bool) {
        self.independent_segments = yes;
    }

    /// Add a variant stream
    pub fn append(&mut self, uri: impl Into<String>, params: VariantParams) {
        self.variants.push(Variant {
            uri: uri.into(),
            params,
        });
    }

    /// Add a rendition to the playlist-level list
    pub fn add_alternative(&mut self, alternative: Alternative) {
        self.alternatives.push(alternative);
    }

    /// Attach to each variant the renditions its group references name
    pub fn resolve_alternatives(&mut self) {
        for variant in &mut self.variants {
            variant.params.alternatives = self
                .alternatives
                .iter()
                .filter(|alt| variant.params.references_group(&alt.group_id))
                .cloned()
                .collect();
        }
    }

    /// Render as playlist text
    pub fn encode(&self) -> Bytes {
        Bytes::from(self.render())
    }

    /// Playlist-level renditions followed by any only attached to a variant
    fn all_alternatives(&self) -> Vec<&Alternative> {
        let mut all: Vec<&Alternative> = self.alternatives.iter().collect();
        for alt in self.variants.iter().flat_map(|v| &v.params.alternatives) {
            if !all.contains(&alt) {
                all.push(alt);
            }
        }
        all
    }

    fn render(&self) -> String {
        let mut output = String::new();

        // Header
        output.push_str("#EXTM3U\n");
        output.push_str(&format!("#EXT-X-VERSION:{}\n", self.version));
        if self.independent_segments {
            output.push_str("#EXT-X-INDEPENDENT-SEGMENTS\n");
        }
        self.custom.write_to(&mut output);

        // Renditions
        for alt in self.all_alternatives() {
            output.push_str(&format!("#EXT-X-MEDIA:{}\n", media_attributes(alt)));
        }

        // Variants
        for variant in &self.variants {
            let params = &variant.params;
            if params.iframe {
                output.push_str(&format!(
                    "#EXT-X-I-FRAME-STREAM-INF:{}\n",
                    iframe_attributes(params, &variant.uri).build()
                ));
            } else {
                output.push_str(&format!(
                    "#EXT-X-STREAM-INF:{}\n",
                    stream_attributes(params).build()
                ));
                output.push_str(&variant.uri);
                output.push('\n');
            }
        }

        output
    }
}

fn media_attributes(alt: &Alternative) -> String {
    let mut attrs = AttributeList::new();
    if !alt.media_type.as_str().is_empty() {
        attrs.plain("TYPE", alt.media_type.as_str());
    }
    attrs
        .quoted("GROUP-ID", &alt.group_id)
        .opt_quoted("LANGUAGE", alt.language.as_deref())
        .quoted("NAME", &alt.name)
        .plain("DEFAULT", if alt.default { "YES" } else { "NO" })
        .opt_plain("AUTOSELECT", alt.autoselect.as_ref().map(YesNo::as_str))
        .opt_plain("FORCED", alt.forced.as_ref().map(YesNo::as_str))
        .opt_quoted("INSTREAM-ID", alt.instream_id.as_deref())
        .opt_quoted("CHARACTERISTICS", alt.characteristics.as_deref())
        .opt_quoted("SUBTITLES", alt.subtitles.as_deref())
        .opt_quoted("CHANNELS", alt.channels.as_deref())
        .opt_quoted("URI", alt.uri.as_deref())
        .build()
}

fn stream_attributes(params: &VariantParams) -> AttributeList {
    let mut attrs = AttributeList::new();
    attrs
        .opt_plain("PROGRAM-ID", params.program_id)
        .plain("BANDWIDTH", params.bandwidth)
        .opt_plain("AVERAGE-BANDWIDTH", params.average_bandwidth)
        .opt_quoted("CODECS", params.codecs.as_deref())
        .opt_plain("RESOLUTION", params.resolution.as_deref())
        .opt_quoted("AUDIO", params.audio.as_deref())
        .opt_quoted("VIDEO", params.video.as_deref())
        .opt_quoted("SUBTITLES", params.subtitles.as_deref());
    match &params.closed_captions {
        Some(cc) if cc.group_id().is_none() => {
            attrs.plain("CLOSED-CAPTIONS", cc.as_str());
        }
        Some(cc) => {
            attrs.quoted("CLOSED-CAPTIONS", cc.as_str());
        }
        None => {}
    }
    attrs
        .opt_quoted("NAME", params.name.as_deref())
        .opt_plain("FRAME-RATE", params.frame_rate)
        .opt_plain("VIDEO-RANGE", params.video_range.as_deref())
        .opt_plain("HDCP-LEVEL", params.hdcp_level.as_deref());
    attrs
}

/// Same attributes as a stream entry, with the playlist URI inline
fn iframe_attributes(params: &VariantParams, uri: &str) -> AttributeList {
    let mut attrs = stream_attributes(params);
    attrs.quoted("URI", uri);
    attrs
}

impl fmt::Display for MasterPlaylist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl PartialEq for MasterPlaylist {
    fn eq(&self, other: &Self) -> bool {
        self.version == other.version
            && self.independent_segments == other.independent_segments
            && self.variants == other.variants
            && self.alternatives == other.alternatives
            && self.custom == other.custom
    }
}
