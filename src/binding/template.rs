//! Key Template Module
//!
//! Decodes `/`-separated key templates into concrete store keys.
//!
//! A template such as `profile/:account_id/tier` has literal segments and
//! placeholder segments. Placeholders start with `:` and name an attribute
//! of the record. Decoding replaces every placeholder with the attribute's
//! string form and joins the segments with `:`, so the example decodes to
//! `profile:42:tier` for an account with id 42.

use std::fmt;

use crate::binding::Record;
use crate::error::{KeyCacheError, Result};

// == Public Constants ==
/// Separator between segments in a template
pub const SEGMENT_SEPARATOR: char = '/';

/// Leading character marking a placeholder segment
pub const PLACEHOLDER_SENTINEL: char = ':';

/// Separator between segments in a decoded store key
pub const KEY_SEPARATOR: &str = ":";

// == Segment ==
/// One `/`-delimited piece of a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Copied into the key verbatim
    Literal(String),
    /// Replaced by the named attribute of the record
    Placeholder(String),
}

impl Segment {
    fn parse(raw: &str) -> Self {
        match raw.strip_prefix(PLACEHOLDER_SENTINEL) {
            Some(name) => Segment::Placeholder(name.to_string()),
            None => Segment::Literal(raw.to_string()),
        }
    }

    /// Resolves the segment against a record.
    fn resolve<R: Record>(&self, record: &R) -> Result<String> {
        match self {
            Segment::Literal(text) => Ok(text.clone()),
            Segment::Placeholder(name) => record.attribute(name).ok_or_else(|| {
                KeyCacheError::ResolverNotFound(format!("{}{}", PLACEHOLDER_SENTINEL, name))
            }),
        }
    }
}

// == Key Template ==
/// A parsed, immutable key template.
///
/// Parsing splits once on `/`; trailing empty segments are dropped while
/// leading and interior empty segments are kept, so `a//b` decodes to
/// `a::b` and `a/b/` decodes to `a:b`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyTemplate {
    raw: String,
    segments: Vec<Segment>,
}

impl KeyTemplate {
    // == Constructor ==
    /// Parses a template string.
    pub fn parse(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let mut segments: Vec<Segment> = raw.split(SEGMENT_SEPARATOR).map(Segment::parse).collect();
        while matches!(segments.last(), Some(Segment::Literal(text)) if text.is_empty()) {
            segments.pop();
        }
        Self { raw, segments }
    }

    // == Accessors ==
    /// The template exactly as written.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Parsed segments with trailing empty ones removed.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Names of the attributes referenced by placeholder segments, in order.
    pub fn placeholders(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Placeholder(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    // == Decode ==
    /// Builds the store key for one record.
    ///
    /// Fails with `ResolverNotFound` naming the first placeholder the record
    /// cannot resolve. Decoding has no side effects.
    pub fn decode<R: Record>(&self, record: &R) -> Result<String> {
        let parts = self
            .segments
            .iter()
            .map(|segment| segment.resolve(record))
            .collect::<Result<Vec<_>>>()?;
        Ok(parts.join(KEY_SEPARATOR))
    }
}

impl fmt::Display for KeyTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl From<&str> for KeyTemplate {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

// == Decode ==
/// Parses `template` and decodes it for `record` in one step.
pub fn decode<R: Record>(template: &str, record: &R) -> Result<String> {
    KeyTemplate::parse(template).decode(record)
}
