//! Archive backends and the paths navigating them
//!
//! All backends share one representation, an [`Archive`] tag plus a list of
//! decoded segments; backend-specific rules are matched on the tag.

use crate::uri::Uri;
use std::fmt;

/// Online archive backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Archive {
    /// Atari SAP Music Archive. Category-rooted (`Composers/`, `Games/`...).
    Asma,
    /// scene.org file archive, `music/` subtree. Category-rooted, accepts
    /// absolute and multi-segment child names.
    Scene,
    /// Aminet `mods/` subtree. Every file is an `.lha` package.
    Aminet,
    /// AY music archive. Anything with an extension is a file.
    Ay,
}

impl Archive {
    pub const ALL: [Archive; 4] = [Archive::Asma, Archive::Scene, Archive::Aminet, Archive::Ay];

    /// Scheme token of the backend URIs.
    pub fn scheme(self) -> &'static str {
        match self {
            Archive::Asma => "asma",
            Archive::Scene => "scene",
            Archive::Aminet => "aminet",
            Archive::Ay => "ay",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Archive::Asma => "Atari SAP Music Archive",
            Archive::Scene => "scene.org",
            Archive::Aminet => "Aminet",
            Archive::Ay => "AY Riders archive",
        }
    }

    pub fn from_scheme(scheme: &str) -> Option<Archive> {
        Archive::ALL
            .into_iter()
            .find(|archive| archive.scheme().eq_ignore_ascii_case(scheme))
    }

    fn is_file(self, segments: &[String]) -> bool {
        let Some(last) = segments.last() else {
            return false;
        };
        match self {
            Archive::Aminet => last.to_ascii_lowercase().ends_with(".lha"),
            // the first level is always a category, never a file
            Archive::Asma | Archive::Scene => segments.len() >= 2 && has_short_extension(last),
            Archive::Ay => last.contains('.'),
        }
    }

    fn child_segments(self, segments: &[String], name: &str) -> Vec<String> {
        match self {
            Archive::Scene => {
                let (mut result, relative) = match name.strip_prefix('/') {
                    Some(absolute) => (Vec::new(), absolute),
                    None => (segments.to_vec(), name),
                };
                result.extend(
                    relative
                        .split('/')
                        .filter(|s| !s.is_empty())
                        .map(str::to_string),
                );
                result
            }
            _ => {
                let mut result = segments.to_vec();
                result.push(name.to_string());
                result
            }
        }
    }
}

impl fmt::Display for Archive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.scheme())
    }
}

/// Extension after the final `.` is 1 to 3 characters long.
fn has_short_extension(name: &str) -> bool {
    match name.rfind('.') {
        Some(dot) => (1..=3).contains(&name[dot + 1..].chars().count()),
        None => false,
    }
}

/// A location inside an archive. Immutable; navigation returns new paths.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArchivePath {
    archive: Archive,
    segments: Vec<String>,
}

impl ArchivePath {
    /// Root of `archive`.
    pub fn create(archive: Archive) -> Self {
        Self {
            archive,
            segments: Vec::new(),
        }
    }

    /// Parses `uri` as a path of `archive`.
    ///
    /// Returns `None` when the scheme belongs to another backend so callers can
    /// try the next one.
    pub fn parse(archive: Archive, uri: &Uri) -> Option<Self> {
        if !uri.scheme().eq_ignore_ascii_case(archive.scheme()) {
            return None;
        }
        Some(Self {
            archive,
            segments: uri.path_segments(),
        })
    }

    /// Parses `uri` with whichever backend owns its scheme.
    pub fn resolve(uri: &Uri) -> Option<Self> {
        Archive::ALL
            .into_iter()
            .find_map(|archive| Self::parse(archive, uri))
    }

    pub fn archive(&self) -> Archive {
        self.archive
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn uri(&self) -> Uri {
        Uri::from_segments(self.archive.scheme(), &self.segments)
    }

    /// Raw segments joined with `/`, empty for the root.
    pub fn local_id(&self) -> String {
        self.segments.join("/")
    }

    /// Last segment, empty for the root.
    pub fn name(&self) -> &str {
        self.segments.last().map(String::as_str).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn is_file(&self) -> bool {
        self.archive.is_file(&self.segments)
    }

    pub fn parent(&self) -> Option<Self> {
        let (_, rest) = self.segments.split_last()?;
        Some(Self {
            archive: self.archive,
            segments: rest.to_vec(),
        })
    }

    pub fn child(&self, name: &str) -> Self {
        Self {
            archive: self.archive,
            segments: self.archive.child_segments(&self.segments, name),
        }
    }
}

impl fmt::Display for ArchivePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.uri().fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(archive: Archive, local: &str) -> ArchivePath {
        local
            .split('/')
            .fold(ArchivePath::create(archive), |p, s| p.child(s))
    }

    #[test]
    fn test_short_extension() {
        assert!(has_short_extension("a.mp3"));
        assert!(has_short_extension("a.s"));
        assert!(!has_short_extension("a."));
        assert!(!has_short_extension("a.flac"));
        assert!(!has_short_extension("readme"));
    }

    #[test]
    fn test_aminet_is_file() {
        assert!(path(Archive::Aminet, "mods/chip/tune.LHA").is_file());
        assert!(path(Archive::Aminet, "tune.lha").is_file());
        assert!(!path(Archive::Aminet, "mods/chip").is_file());
        assert!(!path(Archive::Aminet, "mods/chip/tune.mod").is_file());
    }

    #[test]
    fn test_asma_is_file() {
        assert!(path(Archive::Asma, "Composers/Hubbard_Rob/Commando.sap").is_file());
        assert!(path(Archive::Asma, "Games/Commando.sap").is_file());
        assert!(!path(Archive::Asma, "Commando.sap").is_file());
        assert!(!path(Archive::Asma, "Composers/Hubbard_Rob").is_file());
    }

    #[test]
    fn test_ay_is_file() {
        assert!(path(Archive::Ay, "Commando.ay").is_file());
        assert!(!path(Archive::Ay, "games").is_file());
    }

    #[test]
    fn test_root_is_not_file() {
        for archive in Archive::ALL {
            assert!(!ArchivePath::create(archive).is_file());
        }
    }

    #[test]
    fn test_from_scheme() {
        assert_eq!(Archive::from_scheme("SCENE"), Some(Archive::Scene));
        assert_eq!(Archive::from_scheme("modland"), None);
    }
}
