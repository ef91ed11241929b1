//! Remote fetch candidates of archive paths
//!
//! Each path maps to an ordered list of URIs: the CDN mirror first (when one
//! is configured and the backend is mirrored), the origin host last.
//! Directories carry a trailing `/` in their remote form, files and roots
//! do not.

use crate::{
    ArchiveError, Result,
    path::{Archive, ArchivePath},
    uri::{self, Uri},
};
use pmoconfig::Config;

const ASMA_HOST: &str = "asma.atari.org";
const ASMA_PATH: &str = "/asma/";
const SCENE_HOST: &str = "archive.scene.org";
const SCENE_PATH: &str = "/pub/music/";
const AMINET_HOST: &str = "aminet.net";
const AMINET_PATH: &str = "/mods/";
const AY_HOST: &str = "abrimaal.pro-e.pl";
const AY_PATH: &str = "/ayon/";

/// CDN path builder.
///
/// Mirror URIs are `<base>/browse/<scheme>/<path>` for browsable trees and
/// `<base>/download/<scheme>/<path>` for download-only ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Mirror {
    base: Option<Uri>,
}

impl Mirror {
    pub fn new(base: Uri) -> Self {
        Self { base: Some(base) }
    }

    /// No mirror: only origin candidates are produced.
    pub fn disabled() -> Self {
        Self { base: None }
    }

    /// Builds the mirror from `archive.mirror.*` settings.
    pub fn from_config(config: &Config) -> Result<Self> {
        match config.get_mirror_base_url() {
            Some(url) => {
                let base: Uri = url.parse()?;
                if base.authority().is_none() {
                    return Err(ArchiveError::InvalidUri(url));
                }
                tracing::debug!(mirror = %base, "Using CDN mirror");
                Ok(Self::new(base))
            }
            None => {
                tracing::info!("No CDN mirror configured, using origin hosts only");
                Ok(Self::disabled())
            }
        }
    }

    pub fn base(&self) -> Option<&Uri> {
        self.base.as_ref()
    }

    pub fn browse(&self, scheme: &str, path: &str) -> Option<Uri> {
        self.at("browse", scheme, path)
    }

    pub fn download(&self, scheme: &str, path: &str) -> Option<Uri> {
        self.at("download", scheme, path)
    }

    fn at(&self, kind: &str, scheme: &str, path: &str) -> Option<Uri> {
        let base = self.base.as_ref()?;
        let prefix = base.path().trim_end_matches('/');
        Some(Uri::new(
            base.scheme(),
            base.authority(),
            format!("{prefix}/{kind}/{scheme}/{path}"),
        ))
    }
}

/// Produces the ordered fetch candidates of archive paths.
#[derive(Debug, Clone, Default)]
pub struct RemoteUriResolver {
    mirror: Mirror,
}

impl RemoteUriResolver {
    pub fn new(mirror: Mirror) -> Self {
        Self { mirror }
    }

    pub fn mirror(&self) -> &Mirror {
        &self.mirror
    }

    pub fn resolve(&self, path: &ArchivePath) -> Vec<Uri> {
        path.remote_uris(&self.mirror)
    }
}

impl ArchivePath {
    /// Remote candidates of this path, mirror first, origin last.
    pub fn remote_uris(&self, mirror: &Mirror) -> Vec<Uri> {
        let scheme = self.archive().scheme();
        let (mirrored, origin) = match self.archive() {
            Archive::Asma => {
                let p = self.remote_path(uri::SEGMENT);
                (
                    mirror.browse(scheme, &p),
                    Uri::new("http", Some(ASMA_HOST), format!("{ASMA_PATH}{p}")),
                )
            }
            Archive::Scene => {
                let p = self.remote_path(uri::SEGMENT);
                (
                    mirror.browse(scheme, &format!("music/{p}")),
                    Uri::new("https", Some(SCENE_HOST), format!("{SCENE_PATH}{p}")),
                )
            }
            Archive::Aminet => {
                let p = self.remote_path(uri::SEGMENT);
                (
                    mirror.download(scheme, &format!("mods/{p}")),
                    Uri::new("http", Some(AMINET_HOST), format!("{AMINET_PATH}{p}")),
                )
            }
            // not mirrored; the origin only accepts fully escaped names
            Archive::Ay => {
                let p = self.remote_path(uri::STRICT);
                (None, Uri::new("http", Some(AY_HOST), format!("{AY_PATH}{p}")))
            }
        };
        mirrored.into_iter().chain(std::iter::once(origin)).collect()
    }

    fn remote_path(&self, set: &'static percent_encoding::AsciiSet) -> String {
        let mut path = uri::encode_path(self.segments(), set);
        if !self.is_empty() && !self.is_file() {
            path.push('/');
        }
        path
    }
}
