//! Media playlist line handling

use std::sync::Arc;

use chrono::{DateTime, FixedOffset};
use tracing::trace;

use super::attributes;
use super::engine::{Ctx, LineSink};
use super::tag::Tag;
use crate::cue::{self, Scte};
use crate::custom::{CustomTag, CustomTags, TagScope};
use crate::error::Result;
use crate::playlist::MediaPlaylist;
use crate::timestamp;
use crate::types::{ByteRange, Key, Map, MediaSegment, MediaType, StartPoint, YesNo};

/// Segment tags seen since the last URI line
#[derive(Default)]
struct PendingSegment {
    duration: f64,
    title: String,
    byte_range: Option<ByteRange>,
    discontinuity: bool,
    program_date_time: Option<DateTime<FixedOffset>>,
    cue: Option<Scte>,
    custom: CustomTags,
}

pub(crate) struct MediaSink<'p> {
    playlist: &'p mut MediaPlaylist,
    pending: PendingSegment,
    /// Sticky until replaced
    key: Option<Key>,
    map: Option<Map>,
}

impl<'p> MediaSink<'p> {
    pub fn new(playlist: &'p mut MediaPlaylist) -> Self {
        let key = playlist.window.back().and_then(|s| s.key.clone());
        let map = playlist.window.back().and_then(|s| s.map.clone());
        Self {
            playlist,
            pending: PendingSegment::default(),
            key,
            map,
        }
    }

    fn on_extinf(&mut self, ctx: &Ctx<'_>, value: &str) -> Result<()> {
        let (duration, title) = match value.split_once(',') {
            Some((duration, title)) => (duration, title),
            None => {
                ctx.recover(Tag::ExtInf, value, "missing comma after duration")?;
                (value, "")
            }
        };
        self.pending.duration = ctx.float(Tag::ExtInf, duration)?;
        self.pending.title = title.trim().to_string();
        Ok(())
    }

    fn on_start(&mut self, ctx: &Ctx<'_>, value: &str) -> Result<()> {
        let mut offset = None;
        let mut precise = false;
        for (name, v) in attributes::parse(value) {
            match name {
                "TIME-OFFSET" => offset = Some(ctx.float(Tag::Start, v)?),
                "PRECISE" => precise = YesNo::from_attr(v).is_some_and(|p| p.is_yes()),
                _ => {}
            }
        }
        match offset {
            Some(time_offset) => {
                self.playlist.start = Some(StartPoint {
                    time_offset,
                    precise,
                })
            }
            None => ctx.recover(Tag::Start, value, "missing TIME-OFFSET")?,
        }
        Ok(())
    }

    fn on_key(&mut self, ctx: &Ctx<'_>, value: &str) -> Result<()> {
        let mut key = Key::default();
        for (name, v) in attributes::parse(value) {
            match name {
                "METHOD" => key.method = v.to_string(),
                "URI" => key.uri = Some(v.to_string()),
                "IV" => key.iv = Some(v.to_string()),
                "KEYFORMAT" => key.keyformat = Some(v.to_string()),
                "KEYFORMATVERSIONS" => key.keyformatversions = Some(v.to_string()),
                _ => {}
            }
        }
        if key.method.is_empty() {
            return ctx.recover(Tag::Key, value, "missing METHOD");
        }
        self.key = if key.method == "NONE" { None } else { Some(key) };
        Ok(())
    }

    fn on_map(&mut self, ctx: &Ctx<'_>, value: &str) -> Result<()> {
        let mut map = Map::default();
        let mut has_uri = false;
        for (name, v) in attributes::parse(value) {
            match name {
                "URI" => {
                    map.uri = v.to_string();
                    has_uri = true;
                }
                "BYTERANGE" => match v.parse::<ByteRange>() {
                    Ok(range) => map.byte_range = Some(range),
                    Err(e) => ctx.recover(Tag::Map, v, e)?,
                },
                _ => {}
            }
        }
        if !has_uri {
            return ctx.recover(Tag::Map, value, "missing URI");
        }
        self.map = Some(map);
        Ok(())
    }
}

impl LineSink for MediaSink<'_> {
    fn on_tag(&mut self, ctx: &Ctx<'_>, tag: Tag, value: Option<&str>) -> Result<()> {
        // tags without a value
        match tag {
            Tag::EndList => {
                self.playlist.closed = true;
                return Ok(());
            }
            Tag::IndependentSegments => {
                self.playlist.independent_segments = true;
                return Ok(());
            }
            Tag::IFramesOnly => {
                self.playlist.iframes_only = true;
                return Ok(());
            }
            Tag::Discontinuity => {
                self.pending.discontinuity = true;
                return Ok(());
            }
            Tag::CueIn => {
                self.pending.cue = Some(cue::cue_in());
                return Ok(());
            }
            Tag::StreamInf | Tag::IFrameStreamInf | Tag::Media => {
                trace!(tag = tag.name(), "ignoring master playlist tag");
                return Ok(());
            }
            _ => {}
        }

        let Some(value) = ctx.required(tag, value)? else {
            return Ok(());
        };
        match tag {
            Tag::Version => self.playlist.version = ctx.number(tag, value)?,
            Tag::TargetDuration => self.playlist.target_duration = ctx.float(tag, value)?,
            Tag::MediaSequence => {
                let sequence = ctx.number(tag, value)?;
                self.playlist.window.set_first_seq(sequence);
            }
            Tag::DiscontinuitySequence => {
                self.playlist.discontinuity_sequence = ctx.number(tag, value)?
            }
            Tag::PlaylistType => match MediaType::from_attr(value.trim()) {
                Some(media_type) => self.playlist.media_type = Some(media_type),
                None => ctx.recover(tag, value, "expected VOD or EVENT")?,
            },
            Tag::Start => self.on_start(ctx, value)?,
            Tag::Key => self.on_key(ctx, value)?,
            Tag::Map => self.on_map(ctx, value)?,
            Tag::ProgramDateTime => match timestamp::parse(ctx.timestamps, value) {
                Ok(ts) => self.pending.program_date_time = Some(ts),
                Err(e) => ctx.recover(tag, value, e)?,
            },
            Tag::ByteRange => match value.parse::<ByteRange>() {
                Ok(range) => self.pending.byte_range = Some(range),
                Err(e) => ctx.recover(tag, value, e)?,
            },
            Tag::ExtInf => self.on_extinf(ctx, value)?,
            Tag::Scte35 => self.pending.cue = Some(cue::decode_scte35(ctx, value)?),
            Tag::OatclsScte35 => self.pending.cue = Some(cue::decode_oatcls(value)),
            Tag::CueOut => {
                let pending = self.pending.cue.take();
                self.pending.cue = Some(cue::decode_cue_out(ctx, pending, value)?);
            }
            Tag::CueOutCont => self.pending.cue = Some(cue::decode_cue_out_cont(ctx, value)?),
            _ => {}
        }
        Ok(())
    }

    fn on_uri(&mut self, ctx: &Ctx<'_>, uri: &str) -> Result<()> {
        if self.playlist.window.next_seq().is_none() {
            let sequence = self.playlist.window.first_seq().to_string();
            ctx.recover(Tag::MediaSequence, &sequence, "no sequence id left for segment")?;
        }
        let pending = std::mem::take(&mut self.pending);
        let segment = MediaSegment {
            seq_id: 0,
            uri: uri.to_string(),
            duration: pending.duration,
            title: pending.title,
            byte_range: pending.byte_range,
            discontinuity: pending.discontinuity,
            program_date_time: pending.program_date_time,
            key: self.key.clone(),
            map: self.map.clone(),
            cue: pending.cue,
            custom: pending.custom,
        };
        self.playlist.window.push_unbounded(segment);
        Ok(())
    }

    fn on_custom(&mut self, scope: TagScope, name: String, tag: Arc<dyn CustomTag>) {
        match scope {
            TagScope::Playlist => self.playlist.custom.insert(name, tag),
            TagScope::Segment => self.pending.custom.insert(name, tag),
        };
    }

    fn finish(&mut self, _ctx: &Ctx<'_>) -> Result<()> {
        if !self.pending.custom.is_empty() || self.pending.cue.is_some() {
            trace!("dropping segment tags with no URI");
        }
        Ok(())
    }
}
