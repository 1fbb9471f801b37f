//! Manifest decoding
//!
//! Input is read in full, split into lines and classified. Lines are then
//! fed to a master or media sink which accumulates tags until a URI line
//! commits a variant or segment.
//!
//! Entry points:
//! - [`MasterPlaylist::decode_from`] / [`MediaPlaylist::decode_from`] when
//!   the caller knows the type
//! - [`decode_from`] and friends to autodetect it

pub(crate) mod attributes;
pub(crate) mod engine;
pub(crate) mod master;
pub(crate) mod media;
pub(crate) mod tag;

use std::fmt;
use std::io::Read;
use std::str::FromStr;
use std::sync::Arc;

use bytes::Bytes;
use tracing::debug;

pub(crate) use engine::read_input;

use crate::config::DecodeOptions;
use crate::custom::CustomDecoder;
use crate::error::{PlaylistError, Result};
use crate::playlist::{MasterPlaylist, MediaPlaylist};
use crate::types::ListType;
use engine::{detect_type, run, Ctx};

/// A decoded playlist of either type
#[derive(Debug, Clone, PartialEq)]
pub enum Playlist {
    Master(MasterPlaylist),
    Media(MediaPlaylist),
}

impl Playlist {
    pub fn list_type(&self) -> ListType {
        match self {
            Playlist::Master(_) => ListType::Master,
            Playlist::Media(_) => ListType::Media,
        }
    }

    pub fn as_master(&self) -> Option<&MasterPlaylist> {
        match self {
            Playlist::Master(p) => Some(p),
            Playlist::Media(_) => None,
        }
    }

    pub fn as_media(&self) -> Option<&MediaPlaylist> {
        match self {
            Playlist::Media(p) => Some(p),
            Playlist::Master(_) => None,
        }
    }

    pub fn into_master(self) -> Option<MasterPlaylist> {
        match self {
            Playlist::Master(p) => Some(p),
            Playlist::Media(_) => None,
        }
    }

    pub fn into_media(self) -> Option<MediaPlaylist> {
        match self {
            Playlist::Media(p) => Some(p),
            Playlist::Master(_) => None,
        }
    }

    /// Render as playlist text
    pub fn encode(&self) -> Bytes {
        match self {
            Playlist::Master(p) => p.encode(),
            Playlist::Media(p) => p.encode(),
        }
    }
}

impl fmt::Display for Playlist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Playlist::Master(p) => fmt::Display::fmt(p, f),
            Playlist::Media(p) => fmt::Display::fmt(p, f),
        }
    }
}

/// Non-strict autodetecting decode
impl FromStr for Playlist {
    type Err = PlaylistError;

    fn from_str(s: &str) -> Result<Self> {
        decode_text(s, &DecodeOptions::default(), Vec::new()).map(|(p, _)| p)
    }
}

/// Decode a manifest of unknown type
pub fn decode_from<R: Read>(reader: R, strict: bool) -> Result<(Playlist, ListType)> {
    decode_with_options(reader, &DecodeOptions::new(strict), Vec::new())
}

/// Decode a manifest of unknown type with custom tag decoders
pub fn decode_with<R: Read>(
    reader: R,
    strict: bool,
    decoders: Vec<Arc<dyn CustomDecoder>>,
) -> Result<(Playlist, ListType)> {
    decode_with_options(reader, &DecodeOptions::new(strict), decoders)
}

pub fn decode_with_options<R: Read>(
    reader: R,
    options: &DecodeOptions,
    decoders: Vec<Arc<dyn CustomDecoder>>,
) -> Result<(Playlist, ListType)> {
    let text = read_input(reader)?;
    decode_text(&text, options, decoders)
}

fn decode_text(
    text: &str,
    options: &DecodeOptions,
    decoders: Vec<Arc<dyn CustomDecoder>>,
) -> Result<(Playlist, ListType)> {
    let list_type = detect_type(text)
        .or(options.fallback_type)
        .ok_or(PlaylistError::UndetectableType)?;
    debug!(%list_type, strict = options.strict, "autodetected playlist type");

    match list_type {
        ListType::Master => {
            let mut playlist = MasterPlaylist::new().with_custom_decoders(decoders);
            decode_master(&mut playlist, text, options)?;
            Ok((Playlist::Master(playlist), list_type))
        }
        ListType::Media => {
            let mut playlist = MediaPlaylist::new(options.media_window, options.media_capacity)?
                .with_custom_decoders(decoders);
            decode_media(&mut playlist, text, options)?;
            // complete playlists don't slide
            if playlist.is_closed() || playlist.media_type.is_some() {
                playlist.set_window_size(0)?;
            }
            Ok((Playlist::Media(playlist), list_type))
        }
    }
}

pub(crate) fn decode_master(
    playlist: &mut MasterPlaylist,
    text: &str,
    options: &DecodeOptions,
) -> Result<()> {
    let decoders = playlist.custom_decoders().to_vec();
    let ctx = Ctx::new(options, &decoders);
    run(text, &ctx, &mut master::MasterSink::new(playlist))?;
    debug!(
        variants = playlist.variants.len(),
        alternatives = playlist.alternatives.len(),
        "decoded master playlist"
    );
    Ok(())
}

pub(crate) fn decode_media(
    playlist: &mut MediaPlaylist,
    text: &str,
    options: &DecodeOptions,
) -> Result<()> {
    let decoders = playlist.custom_decoders().to_vec();
    let ctx = Ctx::new(options, &decoders);
    run(text, &ctx, &mut media::MediaSink::new(playlist))?;
    debug!(
        segments = playlist.count(),
        media_sequence = playlist.media_sequence(),
        closed = playlist.is_closed(),
        "decoded media playlist"
    );
    Ok(())
}
