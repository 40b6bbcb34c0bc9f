//! Note addresses - URI-style identifiers for stored data
//!
//! Format: `<scheme>://<segment>[/<segment>...]`
//!
//! Examples:
//! - `noted://notes` - the whole notes collection
//! - `noted://notes/42` - the single note with identifier 42
//!
//! Parsing is purely syntactic; whether an address actually names the
//! collection or an item is decided by [`crate::registry::resolve`].

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A parsed, otherwise opaque address.
///
/// Addresses are the external identifiers of the storage layer: every
/// operation takes one, insert returns one, and change notifications
/// carry one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NoteUri {
    /// The part before `://`, e.g. `noted`
    pub scheme: String,
    /// Path segments after `://`, split on `/`; empty segments are kept
    pub segments: Vec<String>,
}

impl NoteUri {
    /// Build an address from its parts.
    pub fn new<S, I, T>(scheme: S, segments: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            scheme: scheme.into(),
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse an address string.
    ///
    /// Accepts any `<scheme>://<path>` shape; addresses that parse but do
    /// not name the collection or an item are rejected later, at
    /// resolution time. Anything without the `://` separator (or with an
    /// empty or slash-bearing scheme) is unrecognized outright.
    pub fn parse(uri: &str) -> Result<Self> {
        let (scheme, path) = uri
            .split_once("://")
            .ok_or_else(|| Error::UnrecognizedAddress(uri.to_string()))?;

        if scheme.is_empty() || scheme.contains('/') {
            return Err(Error::UnrecognizedAddress(uri.to_string()));
        }

        Ok(Self {
            scheme: scheme.to_string(),
            segments: path.split('/').map(str::to_string).collect(),
        })
    }

    /// Convert back to the canonical string form.
    pub fn to_uri_string(&self) -> String {
        format!("{}://{}", self.scheme, self.segments.join("/"))
    }

    /// A copy of this address with one more trailing segment.
    ///
    /// This is how item addresses are derived from the collection root.
    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment.into());
        Self {
            scheme: self.scheme.clone(),
            segments,
        }
    }

    /// The trailing path segment, if any.
    pub fn last_segment(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }
}

impl fmt::Display for NoteUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_uri_string())
    }
}

impl FromStr for NoteUri {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for NoteUri {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_uri_string())
    }
}

impl<'de> Deserialize<'de> for NoteUri {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NoteUri::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_roundtrip() {
        let uri = NoteUri::new("noted", ["notes", "42"]);
        let uri_str = uri.to_uri_string();
        assert_eq!(uri_str, "noted://notes/42");

        let parsed = NoteUri::parse(&uri_str).unwrap();
        assert_eq!(parsed, uri);
    }

    #[test]
    fn test_parse_extracts_parts() {
        let uri = NoteUri::parse("noted://notes").unwrap();
        assert_eq!(uri.scheme, "noted");
        assert_eq!(uri.segments, vec!["notes"]);
        assert_eq!(uri.last_segment(), Some("notes"));
    }

    #[test]
    fn test_empty_segments_are_kept() {
        let uri = NoteUri::parse("noted://notes/").unwrap();
        assert_eq!(uri.segments, vec!["notes", ""]);
    }

    #[test]
    fn test_invalid_addresses() {
        assert!(NoteUri::parse("notes").is_err());
        assert!(NoteUri::parse("").is_err());
        assert!(NoteUri::parse("://notes").is_err());
        assert!(NoteUri::parse("noted:/notes").is_err());
    }

    #[test]
    fn test_query_and_fragment_are_ordinary_bytes() {
        // No query-string or fragment support: `?` and `#` stay inside
        // the segment text.
        let uri = NoteUri::parse("noted://notes?x=1").unwrap();
        assert_eq!(uri.segments, vec!["notes?x=1"]);

        let uri = NoteUri::parse("noted://notes/1#2").unwrap();
        assert_eq!(uri.segments, vec!["notes", "1#2"]);
    }

    #[test]
    fn test_child_appends_segment() {
        let root = NoteUri::new("noted", ["notes"]);
        let item = root.child("7");
        assert_eq!(item.to_uri_string(), "noted://notes/7");
    }

    #[test]
    fn test_serde_uses_string_form() {
        let uri = NoteUri::new("noted", ["notes", "7"]);
        let json = serde_json::to_string(&uri).unwrap();
        assert_eq!(json, r#""noted://notes/7""#);

        let back: NoteUri = serde_json::from_str(&json).unwrap();
        assert_eq!(back, uri);
    }
}
