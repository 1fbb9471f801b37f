//! Custom tag extension
//!
//! Tags the decoder does not know can be handled by registering a
//! [`CustomDecoder`]. Each decoder matches lines by a literal prefix and
//! produces a [`CustomTag`] value that is stored on the playlist or on the
//! segment being accumulated. Values render themselves back to text.

use std::error::Error;
use std::fmt;
use std::sync::Arc;

/// Where a decoded custom tag is attached
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagScope {
    Playlist,
    Segment,
}

/// A decoded custom tag value
pub trait CustomTag: fmt::Debug + Send + Sync {
    /// Name the value is stored under
    fn tag_name(&self) -> &str;

    /// Line to write back, or `None` to omit the tag when rendering
    fn encode(&self) -> Option<String>;
}

/// Decoder for one custom tag
///
/// Registered decoders are shared between playlists and must be immutable.
pub trait CustomDecoder: fmt::Debug + Send + Sync {
    /// Literal line prefix this decoder handles, e.g. `#X-AD-BREAK:`
    fn tag_name(&self) -> &str;

    fn scope(&self) -> TagScope;

    /// Decode a full tag line. An error aborts the whole decode.
    fn decode(&self, line: &str) -> Result<Box<dyn CustomTag>, Box<dyn Error + Send + Sync>>;

    fn matches(&self, line: &str) -> bool {
        line.starts_with(self.tag_name())
    }
}

/// Tag-name keyed custom values in insertion order
#[derive(Debug, Clone, Default)]
pub struct CustomTags {
    entries: Vec<(String, Arc<dyn CustomTag>)>,
}

impl CustomTags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a value, replacing (in place) any value under the same name
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        tag: Arc<dyn CustomTag>,
    ) -> Option<Arc<dyn CustomTag>> {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => Some(std::mem::replace(existing, tag)),
            None => {
                self.entries.push((name, tag));
                None
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn CustomTag>> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, t)| t)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn remove(&mut self, name: &str) -> Option<Arc<dyn CustomTag>> {
        let pos = self.entries.iter().position(|(n, _)| n == name)?;
        Some(self.entries.remove(pos).1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<dyn CustomTag>)> {
        self.entries.iter().map(|(n, t)| (n.as_str(), t))
    }

    pub(crate) fn write_to(&self, out: &mut String) {
        for (_, tag) in &self.entries {
            if let Some(line) = tag.encode() {
                out.push_str(&line);
                out.push('\n');
            }
        }
    }
}

/// Values are compared by name and rendered form
impl PartialEq for CustomTags {
    fn eq(&self, other: &Self) -> bool {
        self.entries.len() == other.entries.len()
            && self
                .entries
                .iter()
                .zip(&other.entries)
                .all(|((a, x), (b, y))| a == b && x.encode() == y.encode())
    }
}

/// A custom tag kept as its raw line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTag {
    name: String,
    line: String,
}

impl RawTag {
    pub fn new(name: impl Into<String>, line: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            line: line.into(),
        }
    }

    pub fn line(&self) -> &str {
        &self.line
    }
}

impl CustomTag for RawTag {
    fn tag_name(&self) -> &str {
        &self.name
    }

    fn encode(&self) -> Option<String> {
        Some(self.line.clone())
    }
}

/// Decoder that stores matching lines verbatim as [`RawTag`]s
#[derive(Debug, Clone)]
pub struct RawTagDecoder {
    prefix: String,
    scope: TagScope,
}

impl RawTagDecoder {
    pub fn new(prefix: impl Into<String>, scope: TagScope) -> Self {
        Self {
            prefix: prefix.into(),
            scope,
        }
    }
}

impl CustomDecoder for RawTagDecoder {
    fn tag_name(&self) -> &str {
        &self.prefix
    }

    fn scope(&self) -> TagScope {
        self.scope
    }

    fn decode(&self, line: &str) -> Result<Box<dyn CustomTag>, Box<dyn Error + Send + Sync>> {
        Ok(Box::new(RawTag::new(self.prefix.clone(), line)))
    }
}
