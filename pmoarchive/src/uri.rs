//! Minimal URI type shared by local archive identities and remote candidates
//!
//! A [`Uri`] is `scheme:[//authority]path` where `path` is kept in its
//! percent-encoded form. Local archive URIs have no authority (`asma:/a/b`),
//! remote candidates do (`http://asma.atari.org/asma/a/b`).

use crate::{ArchiveError, Result};
use percent_encoding::{
    AsciiSet, CONTROLS, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode,
};
use std::{fmt, str::FromStr};

/// Characters escaped in a path segment of a URI.
pub(crate) const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// Everything but RFC 3986 unreserved characters and the `/` separator.
pub(crate) const STRICT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'/')
    .remove(b'_')
    .remove(b'~');

pub(crate) fn encode_segment(segment: &str, set: &'static AsciiSet) -> String {
    utf8_percent_encode(segment, set).to_string()
}

/// Joins segments with `/`, each one percent-encoded with `set`.
pub(crate) fn encode_path(segments: &[String], set: &'static AsciiSet) -> String {
    segments
        .iter()
        .map(|s| encode_segment(s, set))
        .collect::<Vec<_>>()
        .join("/")
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Uri {
    scheme: String,
    authority: Option<String>,
    path: String,
}

impl Uri {
    /// Builds a URI from already encoded parts.
    pub fn new(scheme: &str, authority: Option<&str>, path: impl Into<String>) -> Self {
        Self {
            scheme: scheme.to_ascii_lowercase(),
            authority: authority.map(str::to_string),
            path: path.into(),
        }
    }

    /// Builds an authority-less URI (`scheme:/a/b`) from raw segments.
    pub fn from_segments(scheme: &str, segments: &[String]) -> Self {
        let path = if segments.is_empty() {
            String::new()
        } else {
            format!("/{}", encode_path(segments, SEGMENT))
        };
        Self::new(scheme, None, path)
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn authority(&self) -> Option<&str> {
        self.authority.as_deref()
    }

    /// Encoded path, including leading and trailing separators if any.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Decoded, non-empty path segments.
    pub fn path_segments(&self) -> Vec<String> {
        self.path
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| percent_decode_str(s).decode_utf8_lossy().into_owned())
            .collect()
    }
}

fn is_valid_scheme(scheme: &str) -> bool {
    let mut chars = scheme.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

impl FromStr for Uri {
    type Err = ArchiveError;

    fn from_str(s: &str) -> Result<Self> {
        let (scheme, rest) = s
            .split_once(':')
            .ok_or_else(|| ArchiveError::InvalidUri(s.to_string()))?;
        if !is_valid_scheme(scheme) {
            return Err(ArchiveError::InvalidUri(s.to_string()));
        }
        let (authority, path) = match rest.strip_prefix("//") {
            Some(hier) => match hier.find('/') {
                Some(i) => (Some(&hier[..i]), &hier[i..]),
                None => (Some(hier), ""),
            },
            None => (None, rest),
        };
        Ok(Self::new(scheme, authority, path))
    }
}

impl fmt::Display for Uri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.scheme)?;
        if let Some(authority) = &self.authority {
            write!(f, "//{}", authority)?;
        }
        f.write_str(&self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_local() {
        let uri: Uri = "asma:/Games/Commando.sap".parse().unwrap();
        assert_eq!(uri.scheme(), "asma");
        assert_eq!(uri.authority(), None);
        assert_eq!(uri.path_segments(), vec!["Games", "Commando.sap"]);
    }

    #[test]
    fn test_parse_root_and_odd_paths() {
        let root: Uri = "scene:".parse().unwrap();
        assert!(root.path_segments().is_empty());
        let odd: Uri = "scene://".parse().unwrap();
        assert!(odd.path_segments().is_empty());
        let doubled: Uri = "scene:/a//b/".parse().unwrap();
        assert_eq!(doubled.path_segments(), vec!["a", "b"]);
    }

    #[test]
    fn test_parse_remote() {
        let uri: Uri = "https://archive.scene.org/pub/music/".parse().unwrap();
        assert_eq!(uri.scheme(), "https");
        assert_eq!(uri.authority(), Some("archive.scene.org"));
        assert_eq!(uri.path(), "/pub/music/");
        assert_eq!(uri.to_string(), "https://archive.scene.org/pub/music/");
    }

    #[test]
    fn test_invalid_scheme() {
        assert!("no scheme here".parse::<Uri>().is_err());
        assert!("1abc:/x".parse::<Uri>().is_err());
        assert!(":/x".parse::<Uri>().is_err());
    }

    #[test]
    fn test_segments_are_escaped_and_decoded() {
        let segments = vec!["games".to_string(), "Commando[CPC] 1.ay".to_string()];
        let uri = Uri::from_segments("ay", &segments);
        assert_eq!(uri.to_string(), "ay:/games/Commando%5BCPC%5D%201.ay");
        assert_eq!(uri.path_segments(), segments);
    }

    #[test]
    fn test_strict_encoding() {
        assert_eq!(encode_segment("A b[c]~-_.", STRICT), "A%20b%5Bc%5D~-_.");
        assert_eq!(encode_segment("games/x[1].ay", STRICT), "games/x%5B1%5D.ay");
    }
}
