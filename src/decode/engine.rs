//! Line driver shared by master and media decoding

use std::fmt;
use std::io::Read;
use std::str::FromStr;
use std::sync::Arc;

use tracing::{trace, warn};

use crate::config::{DecodeOptions, TimestampMode};
use crate::custom::{CustomDecoder, CustomTag, TagScope};
use crate::decode::tag::{classify, Line, Tag};
use crate::error::{PlaylistError, Result};
use crate::types::ListType;

const BOM: char = '\u{feff}';

/// Per-decode settings handed to every line handler
pub(crate) struct Ctx<'a> {
    pub strict: bool,
    pub timestamps: TimestampMode,
    decoders: &'a [Arc<dyn CustomDecoder>],
}

impl<'a> Ctx<'a> {
    pub fn new(options: &DecodeOptions, decoders: &'a [Arc<dyn CustomDecoder>]) -> Self {
        Self {
            strict: options.strict,
            timestamps: options.timestamps,
            decoders,
        }
    }

    /// Report a malformed value: an error in strict mode, a warning otherwise
    pub fn recover(&self, tag: Tag, value: &str, reason: impl fmt::Display) -> Result<()> {
        if self.strict {
            return Err(PlaylistError::malformed(tag.name(), value, reason));
        }
        warn!(tag = tag.name(), value, %reason, "ignoring malformed tag value");
        Ok(())
    }

    /// The tag value, or `None` (after [`Ctx::recover`]) if the tag has none
    pub fn required<'v>(&self, tag: Tag, value: Option<&'v str>) -> Result<Option<&'v str>> {
        match value {
            Some(v) => Ok(Some(v)),
            None => self.recover(tag, "", "missing value").map(|_| None),
        }
    }

    /// Parse a number, falling back to zero in non-strict mode
    pub fn number<T>(&self, tag: Tag, raw: &str) -> Result<T>
    where
        T: FromStr + Default,
        T::Err: fmt::Display,
    {
        match raw.trim().parse::<T>() {
            Ok(v) => Ok(v),
            Err(e) => {
                self.recover(tag, raw, e)?;
                Ok(T::default())
            }
        }
    }

    pub fn float(&self, tag: Tag, raw: &str) -> Result<f64> {
        let value: f64 = self.number(tag, raw)?;
        if value.is_finite() {
            Ok(value)
        } else {
            self.recover(tag, raw, "not a finite number")?;
            Ok(0.0)
        }
    }

    /// Run the first registered decoder matching `line`
    fn custom(&self, line: &str) -> Result<Option<(TagScope, String, Arc<dyn CustomTag>)>> {
        let Some(decoder) = self.decoders.iter().find(|d| d.matches(line)) else {
            return Ok(None);
        };
        let tag = decoder
            .decode(line)
            .map_err(|source| PlaylistError::CustomTag {
                tag: decoder.tag_name().to_string(),
                source,
            })?;
        Ok(Some((
            decoder.scope(),
            decoder.tag_name().to_string(),
            Arc::from(tag),
        )))
    }
}

/// Receives classified lines for one playlist type
pub(crate) trait LineSink {
    fn on_tag(&mut self, ctx: &Ctx<'_>, tag: Tag, value: Option<&str>) -> Result<()>;

    fn on_uri(&mut self, ctx: &Ctx<'_>, uri: &str) -> Result<()>;

    fn on_custom(&mut self, scope: TagScope, name: String, tag: Arc<dyn CustomTag>);

    fn finish(&mut self, ctx: &Ctx<'_>) -> Result<()>;
}

/// Read the whole stream as text. Invalid UTF-8 is replaced, not rejected.
pub(crate) fn read_input<R: Read>(mut reader: R) -> Result<String> {
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf)?;
    Ok(match String::from_utf8(buf) {
        Ok(text) => text,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    })
}

fn lines(text: &str) -> impl Iterator<Item = &str> {
    text.split('\n')
        .enumerate()
        .map(|(n, line)| {
            if n == 0 {
                line.trim_start_matches(BOM).trim()
            } else {
                line.trim()
            }
        })
}

/// Feed every line of `text` to `sink`
pub(crate) fn run<S: LineSink>(text: &str, ctx: &Ctx<'_>, sink: &mut S) -> Result<()> {
    let mut seen_marker = false;
    for line in lines(text) {
        let line = classify(line);
        if line == Line::Blank {
            continue;
        }
        if !seen_marker {
            seen_marker = true;
            let is_marker = matches!(line, Line::Tag { tag: Tag::ExtM3u, .. });
            if ctx.strict && !is_marker {
                return Err(PlaylistError::NoExtM3u);
            }
        }

        match line {
            Line::Blank | Line::Tag { tag: Tag::ExtM3u, .. } => {}
            Line::Tag { tag, value } => sink.on_tag(ctx, tag, value)?,
            Line::Uri(uri) => sink.on_uri(ctx, uri)?,
            Line::Other(line) => match ctx.custom(line)? {
                Some((scope, name, tag)) => sink.on_custom(scope, name, tag),
                None => trace!(line, "ignoring unknown tag"),
            },
        }
    }

    if ctx.strict && !seen_marker {
        return Err(PlaylistError::NoExtM3u);
    }
    sink.finish(ctx)
}

/// The type fixed by the first master-only or media-only tag
pub(crate) fn detect_type(text: &str) -> Option<ListType> {
    lines(text)
        .filter_map(|line| match classify(line) {
            Line::Tag { tag, .. } => tag.category().list_type(),
            _ => None,
        })
        .next()
}
