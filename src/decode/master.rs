//! Master playlist line handling

use std::sync::Arc;

use tracing::trace;

use super::attributes;
use super::engine::{Ctx, LineSink};
use super::tag::Tag;
use crate::custom::{CustomTag, TagScope};
use crate::error::Result;
use crate::playlist::MasterPlaylist;
use crate::types::{Alternative, AlternativeType, ClosedCaptions, Variant, VariantParams, YesNo};

pub(crate) struct MasterSink<'p> {
    playlist: &'p mut MasterPlaylist,
    /// `EXT-X-STREAM-INF` waiting for its URI line
    pending: Option<VariantParams>,
}

impl<'p> MasterSink<'p> {
    pub fn new(playlist: &'p mut MasterPlaylist) -> Self {
        Self {
            playlist,
            pending: None,
        }
    }
}

fn yes_no(ctx: &Ctx<'_>, value: &str) -> Result<Option<YesNo>> {
    match YesNo::from_attr(value) {
        Some(v) => Ok(Some(v)),
        None => ctx
            .recover(Tag::Media, value, "expected YES or NO")
            .map(|_| Some(YesNo::Other(value.to_string()))),
    }
}

fn parse_alternative(ctx: &Ctx<'_>, value: &str) -> Result<Alternative> {
    let mut alt = Alternative::default();
    for (name, v) in attributes::parse(value) {
        match name {
            "TYPE" => {
                alt.media_type = match AlternativeType::from_attr(v) {
                    Some(media_type) => media_type,
                    None => {
                        ctx.recover(Tag::Media, v, "unknown media type")?;
                        AlternativeType::Other(v.to_string())
                    }
                }
            }
            "GROUP-ID" => alt.group_id = v.to_string(),
            "LANGUAGE" => alt.language = Some(v.to_string()),
            "NAME" => alt.name = v.to_string(),
            "DEFAULT" => alt.default = yes_no(ctx, v)?.is_some_and(|d| d.is_yes()),
            "AUTOSELECT" => alt.autoselect = yes_no(ctx, v)?,
            "FORCED" => alt.forced = yes_no(ctx, v)?,
            "CHARACTERISTICS" => alt.characteristics = Some(v.to_string()),
            "SUBTITLES" => alt.subtitles = Some(v.to_string()),
            "CHANNELS" => alt.channels = Some(v.to_string()),
            "INSTREAM-ID" => alt.instream_id = Some(v.to_string()),
            "URI" => alt.uri = Some(v.to_string()),
            _ => {}
        }
    }
    Ok(alt)
}

/// Parse `EXT-X-STREAM-INF` / `EXT-X-I-FRAME-STREAM-INF` attributes
///
/// Also returns the `URI` attribute, which only the i-frame form carries.
fn parse_variant(ctx: &Ctx<'_>, tag: Tag, value: &str) -> Result<(VariantParams, Option<String>)> {
    let mut params = VariantParams {
        iframe: tag == Tag::IFrameStreamInf,
        ..Default::default()
    };
    let mut uri = None;
    for (name, v) in attributes::parse(value) {
        match name {
            "PROGRAM-ID" => params.program_id = Some(ctx.number(tag, v)?),
            "BANDWIDTH" => params.bandwidth = ctx.number(tag, v)?,
            "AVERAGE-BANDWIDTH" => params.average_bandwidth = Some(ctx.number(tag, v)?),
            "CODECS" => params.codecs = Some(v.to_string()),
            "RESOLUTION" => params.resolution = Some(v.to_string()),
            "FRAME-RATE" => params.frame_rate = Some(ctx.float(tag, v)?),
            "HDCP-LEVEL" => params.hdcp_level = Some(v.to_string()),
            "VIDEO-RANGE" => params.video_range = Some(v.to_string()),
            "AUDIO" => params.audio = Some(v.to_string()),
            "VIDEO" => params.video = Some(v.to_string()),
            "SUBTITLES" => params.subtitles = Some(v.to_string()),
            "CLOSED-CAPTIONS" => params.closed_captions = Some(ClosedCaptions::from_attr(v)),
            "NAME" => params.name = Some(v.to_string()),
            "URI" => uri = Some(v.to_string()),
            _ => {}
        }
    }
    Ok((params, uri))
}

impl LineSink for MasterSink<'_> {
    fn on_tag(&mut self, ctx: &Ctx<'_>, tag: Tag, value: Option<&str>) -> Result<()> {
        match tag {
            Tag::IndependentSegments => {
                self.playlist.set_independent_segments(true);
                return Ok(());
            }
            Tag::Version | Tag::StreamInf | Tag::IFrameStreamInf | Tag::Media => {}
            _ => {
                trace!(tag = tag.name(), "ignoring tag in master playlist");
                return Ok(());
            }
        }

        let Some(value) = ctx.required(tag, value)? else {
            return Ok(());
        };
        match tag {
            Tag::Version => self.playlist.version = ctx.number(tag, value)?,
            Tag::Media => {
                let alt = parse_alternative(ctx, value)?;
                self.playlist.add_alternative(alt);
            }
            Tag::StreamInf => {
                if self.pending.is_some() {
                    ctx.recover(tag, value, "previous EXT-X-STREAM-INF has no URI")?;
                }
                let (params, _) = parse_variant(ctx, tag, value)?;
                self.pending = Some(params);
            }
            Tag::IFrameStreamInf => {
                let (params, uri) = parse_variant(ctx, tag, value)?;
                match uri {
                    Some(uri) => self.playlist.variants.push(Variant { uri, params }),
                    None => ctx.recover(tag, value, "missing URI")?,
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn on_uri(&mut self, _ctx: &Ctx<'_>, uri: &str) -> Result<()> {
        match self.pending.take() {
            Some(params) => self.playlist.append(uri, params),
            None => trace!(uri, "ignoring URI without EXT-X-STREAM-INF"),
        }
        Ok(())
    }

    fn on_custom(&mut self, _scope: TagScope, name: String, tag: Arc<dyn CustomTag>) {
        self.playlist.custom.insert(name, tag);
    }

    fn finish(&mut self, _ctx: &Ctx<'_>) -> Result<()> {
        self.playlist.resolve_alternatives();
        Ok(())
    }
}
