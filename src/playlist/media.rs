//! Media playlist
//!
//! Segments live in a [`SegmentWindow`]. Producers append segments and the
//! window either grows (VOD, events) or slides (live). Rendering a live
//! playlist only writes the segments inside the current window.

use std::fmt;
use std::io::Read;
use std::sync::Arc;

use bytes::Bytes;
use tracing::debug;

use super::window::SegmentWindow;
use super::{format_duration, AttributeList};
use crate::config::DecodeOptions;
use crate::custom::{CustomDecoder, CustomTags};
use crate::decode;
use crate::error::{PlaylistError, Result};
use crate::timestamp;
use crate::types::{Key, Map, MediaSegment, MediaType, StartPoint};

const DEFAULT_VERSION: u8 = 3;

/// A media playlist
#[derive(Debug, Clone)]
pub struct MediaPlaylist {
    /// Upper bound on segment duration in seconds
    pub target_duration: f64,
    pub discontinuity_sequence: u64,
    pub media_type: Option<MediaType>,
    pub start: Option<StartPoint>,
    pub independent_segments: bool,
    pub iframes_only: bool,
    /// Playlist-level custom tags
    pub custom: CustomTags,
    pub(crate) version: u8,
    pub(crate) closed: bool,
    pub(crate) window: SegmentWindow,
    next_discontinuity: bool,
    duration_as_int: bool,
    decoders: Vec<Arc<dyn CustomDecoder>>,
}

impl MediaPlaylist {
    /// Create an empty playlist
    ///
    /// `window_size` 0 keeps every segment; otherwise appends beyond the
    /// window evict the oldest segment. Fails when the window is larger
    /// than `capacity`.
    pub fn new(window_size: usize, capacity: usize) -> Result<Self> {
        Ok(Self {
            target_duration: 0.0,
            discontinuity_sequence: 0,
            media_type: None,
            start: None,
            independent_segments: false,
            iframes_only: false,
            custom: CustomTags::new(),
            version: DEFAULT_VERSION,
            closed: false,
            window: SegmentWindow::new(window_size, capacity)?,
            next_discontinuity: false,
            duration_as_int: false,
            decoders: Vec::new(),
        })
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
        decode::decode_media(self, &text, options)
    }

    pub fn version(&self) -> u8 {
        self.version
    }

    pub fn set_version(&mut self, version: u8) {
        self.version = version;
    }

    /// Sequence number of the oldest held segment
    pub fn media_sequence(&self) -> u64 {
        self.window.first_seq()
    }

    /// Set the media sequence and renumber every held segment
    pub fn set_media_sequence(&mut self, sequence: u64) {
        self.window.set_first_seq(sequence);
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Mark the playlist as complete (`EXT-X-ENDLIST`)
    pub fn close(&mut self) {
        self.closed = true;
    }

    /// Append a segment built from its parts
    pub fn append(&mut self, uri: impl Into<String>, duration: f64, title: impl Into<String>) -> Result<()> {
        self.append_segment(MediaSegment::new(uri, duration).with_title(title))
    }

    /// Append a segment, evicting the oldest one if the live window is full
    ///
    /// The sequence id of `segment` is assigned here.
    pub fn append_segment(&mut self, mut segment: MediaSegment) -> Result<()> {
        if self.closed {
            return Err(PlaylistError::Closed);
        }
        if std::mem::take(&mut self.next_discontinuity) {
            segment.discontinuity = true;
        }
        if segment.duration > self.target_duration {
            self.target_duration = segment.duration;
        }
        if let Some(evicted) = self.window.push(segment) {
            self.evicted(&evicted);
        }
        Ok(())
    }

    /// Remove the oldest segment
    pub fn remove_oldest(&mut self) -> Result<Option<MediaSegment>> {
        if self.closed {
            return Err(PlaylistError::Closed);
        }
        let evicted = self.window.pop_front();
        if let Some(segment) = &evicted {
            self.evicted(segment);
        }
        Ok(evicted)
    }

    fn evicted(&mut self, segment: &MediaSegment) {
        if segment.discontinuity {
            self.discontinuity_sequence = self.discontinuity_sequence.saturating_add(1);
        }
        debug!(
            seq_id = segment.seq_id(),
            media_sequence = self.window.first_seq(),
            "segment left the live window"
        );
    }

    /// Flag the next appended segment as a discontinuity
    pub fn set_discontinuity(&mut self) {
        self.next_discontinuity = true;
    }

    /// Number of segments currently held
    pub fn count(&self) -> usize {
        self.window.len()
    }

    pub fn window_size(&self) -> usize {
        self.window.window_size()
    }

    pub fn set_window_size(&mut self, window_size: usize) -> Result<()> {
        self.window.set_window_size(window_size)
    }

    pub fn capacity(&self) -> usize {
        self.window.capacity()
    }

    /// Held segments, oldest first
    pub fn segments(&self) -> impl DoubleEndedIterator<Item = &MediaSegment> + ExactSizeIterator {
        self.window.iter()
    }

    /// Segment at position `index` in the window (0 = oldest)
    pub fn segment(&self, index: usize) -> Option<&MediaSegment> {
        self.window.get(index)
    }

    pub fn segment_mut(&mut self, index: usize) -> Option<&mut MediaSegment> {
        self.window.get_mut(index)
    }

    pub fn last_segment_mut(&mut self) -> Option<&mut MediaSegment> {
        self.window.back_mut()
    }

    /// Render durations as whole seconds (rounded up)
    pub fn duration_as_int(&mut self, yes: bool) {
        self.duration_as_int = yes;
    }

    /// Sum of all held segment durations
    pub fn total_duration(&self) -> f64 {
        self.window.iter().map(|s| s.duration).sum()
    }

    /// Render as playlist text
    pub fn encode(&self) -> Bytes {
        Bytes::from(self.render())
    }

    /// Segments to render: the whole buffer unless a live window is active
    fn visible(&self) -> impl Iterator<Item = &MediaSegment> {
        let window = self.window.window_size();
        let skip = if window > 0 && !self.closed {
            self.window.len().saturating_sub(window)
        } else {
            0
        };
        self.window.iter().skip(skip)
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
        if let Some(media_type) = self.media_type {
            output.push_str(&format!("#EXT-X-PLAYLIST-TYPE:{}\n", media_type.as_str()));
        }
        let first_seq = self
            .visible()
            .next()
            .map(MediaSegment::seq_id)
            .unwrap_or_else(|| self.window.first_seq());
        output.push_str(&format!("#EXT-X-MEDIA-SEQUENCE:{}\n", first_seq));
        output.push_str(&format!(
            "#EXT-X-TARGETDURATION:{}\n",
            self.target_duration.ceil() as u64
        ));
        if let Some(start) = &self.start {
            let mut attrs = AttributeList::new();
            attrs.plain("TIME-OFFSET", start.time_offset);
            if start.precise {
                attrs.plain("PRECISE", "YES");
            }
            output.push_str(&format!("#EXT-X-START:{}\n", attrs.build()));
        }
        if self.discontinuity_sequence != 0 {
            output.push_str(&format!(
                "#EXT-X-DISCONTINUITY-SEQUENCE:{}\n",
                self.discontinuity_sequence
            ));
        }
        if self.iframes_only {
            output.push_str("#EXT-X-I-FRAMES-ONLY\n");
        }

        // Segments
        let mut key: Option<&Key> = None;
        let mut map: Option<&Map> = None;
        for segment in self.visible() {
            if let Some(cue) = &segment.cue {
                cue.write_to(&mut output);
            }
            if segment.key.as_ref() != key {
                match &segment.key {
                    Some(k) => write_key(&mut output, k),
                    None => output.push_str("#EXT-X-KEY:METHOD=NONE\n"),
                }
                key = segment.key.as_ref();
            }
            if segment.discontinuity {
                output.push_str("#EXT-X-DISCONTINUITY\n");
            }
            if let Some(m) = &segment.map {
                if map != Some(m) {
                    write_map(&mut output, m);
                    map = Some(m);
                }
            }
            if let Some(pdt) = &segment.program_date_time {
                output.push_str(&format!(
                    "#EXT-X-PROGRAM-DATE-TIME:{}\n",
                    timestamp::format(pdt)
                ));
            }
            if let Some(range) = &segment.byte_range {
                output.push_str(&format!("#EXT-X-BYTERANGE:{}\n", range));
            }
            segment.custom.write_to(&mut output);
            let duration = if self.duration_as_int {
                format!("{}", segment.duration.ceil() as i64)
            } else {
                format_duration(segment.duration)
            };
            output.push_str(&format!("#EXTINF:{},{}\n", duration, segment.title));
            output.push_str(&segment.uri);
            output.push('\n');
        }

        // End list
        if self.closed {
            output.push_str("#EXT-X-ENDLIST\n");
        }

        output
    }
}

fn write_key(output: &mut String, key: &Key) {
    let attrs = AttributeList::new()
        .plain("METHOD", &key.method)
        .opt_quoted("URI", key.uri.as_deref())
        .opt_plain("IV", key.iv.as_deref())
        .opt_quoted("KEYFORMAT", key.keyformat.as_deref())
        .opt_quoted("KEYFORMATVERSIONS", key.keyformatversions.as_deref())
        .build();
    output.push_str(&format!("#EXT-X-KEY:{}\n", attrs));
}

fn write_map(output: &mut String, map: &Map) {
    let range = map.byte_range.map(|r| r.to_string());
    let attrs = AttributeList::new()
        .quoted("URI", &map.uri)
        .opt_quoted("BYTERANGE", range.as_deref())
        .build();
    output.push_str(&format!("#EXT-X-MAP:{}\n", attrs));
}

impl fmt::Display for MediaPlaylist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Playlists are equal when everything that is rendered is equal
impl PartialEq for MediaPlaylist {
    fn eq(&self, other: &Self) -> bool {
        self.version == other.version
            && self.target_duration.ceil() == other.target_duration.ceil()
            && self.media_sequence() == other.media_sequence()
            && self.discontinuity_sequence == other.discontinuity_sequence
            && self.media_type == other.media_type
            && self.closed == other.closed
            && self.start == other.start
            && self.independent_segments == other.independent_segments
            && self.iframes_only == other.iframes_only
            && self.custom == other.custom
            && self.segments().eq(other.segments())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::custom::RawTag;
    use crate::types::ByteRange;

    #[test]
    fn test_new_window_exceeds_capacity() {
        assert!(matches!(
            MediaPlaylist::new(2, 1),
            Err(PlaylistError::WindowExceedsCapacity { .. })
        ));
        assert!(MediaPlaylist::new(0, 0).is_ok());
    }

    #[test]
    fn test_append_assigns_ids() {
        let mut p = MediaPlaylist::new(0, 2).unwrap();
        p.set_media_sequence(10);
        for n in 0..5 {
            p.append(format!("s{}.ts", n), 5.0, "").unwrap();
        }
        assert_eq!(p.count(), 5);
        let ids: Vec<u64> = p.segments().map(|s| s.seq_id()).collect();
        assert_eq!(ids, vec![10, 11, 12, 13, 14]);
        assert_eq!(p.target_duration, 5.0);
    }

    #[test]
    fn test_sliding_window() {
        let mut p = MediaPlaylist::new(3, 10).unwrap();
        for n in 0..5 {
            p.append(format!("s{}.ts", n), 4.0, "").unwrap();
            assert!(p.count() <= 3);
        }
        assert_eq!(p.media_sequence(), 2);
        assert_eq!(p.segment(0).unwrap().uri, "s2.ts");

        let text = p.to_string();
        assert!(text.contains("#EXT-X-MEDIA-SEQUENCE:2\n"));
        assert!(!text.contains("s1.ts"));
        assert!(text.contains("s4.ts"));
    }

    #[test]
    fn test_eviction_bumps_discontinuity_sequence() {
        let mut p = MediaPlaylist::new(2, 2).unwrap();
        p.append("a.ts", 4.0, "").unwrap();
        p.set_discontinuity();
        p.append("b.ts", 4.0, "").unwrap();
        p.append("c.ts", 4.0, "").unwrap();
        assert_eq!(p.discontinuity_sequence, 0);
        p.append("d.ts", 4.0, "").unwrap();
        assert_eq!(p.discontinuity_sequence, 1);
        assert_eq!(p.media_sequence(), 2);
    }

    #[test]
    fn test_closed_rejects_append() {
        let mut p = MediaPlaylist::new(0, 1).unwrap();
        p.append("a.ts", 4.0, "").unwrap();
        p.close();
        assert!(matches!(p.append("b.ts", 4.0, ""), Err(PlaylistError::Closed)));
        assert!(matches!(p.remove_oldest(), Err(PlaylistError::Closed)));
        assert_eq!(p.count(), 1);
        assert!(p.to_string().ends_with("#EXT-X-ENDLIST\n"));
    }

    #[test]
    fn test_remove_oldest() {
        let mut p = MediaPlaylist::new(0, 4).unwrap();
        p.append("a.ts", 4.0, "").unwrap();
        p.append("b.ts", 4.0, "").unwrap();
        let removed = p.remove_oldest().unwrap().unwrap();
        assert_eq!(removed.uri, "a.ts");
        assert_eq!(p.media_sequence(), 1);
        assert_eq!(p.segment(0).unwrap().seq_id(), 1);
    }

    #[test]
    fn test_discontinuity_applies_to_next_append() {
        let mut p = MediaPlaylist::new(0, 4).unwrap();
        p.append("a.ts", 4.0, "").unwrap();
        p.set_discontinuity();
        p.append("b.ts", 4.0, "").unwrap();
        p.append("c.ts", 4.0, "").unwrap();
        let flags: Vec<bool> = p.segments().map(|s| s.discontinuity).collect();
        assert_eq!(flags, vec![false, true, false]);
        assert!(p.to_string().contains("#EXT-X-DISCONTINUITY\n#EXTINF:4.000,\nb.ts\n"));
    }

    #[test]
    fn test_duration_as_int() {
        let mut p = MediaPlaylist::new(0, 4).unwrap();
        p.append("ad0.ts", 10.0, "").unwrap();
        p.append("ad1.ts", 7.975, "").unwrap();
        p.duration_as_int(true);
        let text = p.to_string();
        assert!(text.contains("#EXTINF:10,\nad0.ts\n"));
        assert!(text.contains("#EXTINF:8,\nad1.ts\n"));
        assert!(text.contains("#EXT-X-TARGETDURATION:10\n"));
    }

    #[test]
    fn test_render_header_order() {
        let mut p = MediaPlaylist::new(0, 4).unwrap();
        p.append("a.ts", 9.5, "first").unwrap();
        assert_eq!(
            p.to_string(),
            "#EXTM3U\n#EXT-X-VERSION:3\n#EXT-X-MEDIA-SEQUENCE:0\n#EXT-X-TARGETDURATION:10\n#EXTINF:9.500,first\na.ts\n"
        );
        assert_eq!(p.encode(), Bytes::from(p.to_string()));
    }

    #[test]
    fn test_render_segment_tags() {
        let mut p = MediaPlaylist::new(0, 4).unwrap();
        let key = Key {
            method: "AES-128".to_string(),
            uri: Some("https://example.com/key".to_string()),
            ..Default::default()
        };
        let map = Map {
            uri: "init.mp4".to_string(),
            byte_range: Some(ByteRange::new(720, Some(0))),
        };

        let mut a = MediaSegment::new("a.ts", 4.0);
        a.key = Some(key.clone());
        a.map = Some(map.clone());
        a.byte_range = Some(ByteRange::new(75232, None));
        a.custom.insert("#X-A:", Arc::new(RawTag::new("#X-A:", "#X-A:1")));
        let mut b = MediaSegment::new("a.ts", 4.0);
        b.key = Some(key);
        b.map = Some(map);
        let c = MediaSegment::new("c.ts", 4.0);
        p.append_segment(a).unwrap();
        p.append_segment(b).unwrap();
        p.append_segment(c).unwrap();

        let text = p.to_string();
        assert_eq!(text.matches("#EXT-X-KEY:METHOD=AES-128").count(), 1);
        assert!(text.contains(r#"#EXT-X-KEY:METHOD=AES-128,URI="https://example.com/key""#));
        assert_eq!(text.matches("#EXT-X-MAP:").count(), 1);
        assert!(text.contains(r#"#EXT-X-MAP:URI="init.mp4",BYTERANGE="720@0""#));
        assert!(text.contains("#EXT-X-BYTERANGE:75232\n#X-A:1\n#EXTINF:4.000,\na.ts\n"));
        assert!(text.contains("#EXT-X-KEY:METHOD=NONE\n#EXTINF:4.000,\nc.ts\n"));
    }

    #[test]
    fn test_start_and_flags() {
        let mut p = MediaPlaylist::new(0, 1).unwrap();
        p.start = Some(StartPoint {
            time_offset: 8.0,
            precise: true,
        });
        p.media_type = Some(MediaType::Vod);
        p.iframes_only = true;
        p.independent_segments = true;
        p.discontinuity_sequence = 2;
        let text = p.to_string();
        assert!(text.contains("#EXT-X-START:TIME-OFFSET=8,PRECISE=YES\n"));
        assert!(text.contains("#EXT-X-PLAYLIST-TYPE:VOD\n"));
        assert!(text.contains("#EXT-X-I-FRAMES-ONLY\n"));
        assert!(text.contains("#EXT-X-INDEPENDENT-SEGMENTS\n"));
        assert!(text.contains("#EXT-X-DISCONTINUITY-SEQUENCE:2\n"));
    }
}
