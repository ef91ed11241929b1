//! # PMOArchive
//!
//! Virtual filesystem over online music archives.
//!
//! Every archive (ASMA, scene.org, Aminet, AY) is exposed as a tree of
//! [`ArchivePath`]s identified by a scheme-qualified [`Uri`] such as
//! `asma:/Composers/Hubbard_Rob/Commando.sap`.
//!
//! ## Features
//!
//! - **Path model**: one [`Archive`] variant per backend, sharing the same
//!   navigation contract (`parse`, `parent`, `child`, `is_file`).
//! - **Remote resolution**: [`RemoteUriResolver`] lists the fetch candidates of a
//!   path, CDN [`Mirror`] first and origin host last.
//! - **Cache first**: [`ArchiveResolver`] checks the `pmocache` tiers before any
//!   network attempt and persists what it downloads.
//! - **Connectivity gate**: [`ConnectivityMonitor`] tracks reachability and
//!   notifies subscribers on transitions.
//! - **Listings**: [`listing::sorted_children`] orders names the way people
//!   expect (`track2` before `track10`).
//!
//! ## Usage
//!
//! ```rust
//! use pmoarchive::{Archive, ArchivePath, Mirror, RemoteUriResolver, Uri};
//!
//! let uri: Uri = "asma:/Composers/Hubbard_Rob/Commando.sap".parse()?;
//! let path = ArchivePath::resolve(&uri).expect("known scheme");
//! assert_eq!(path.archive(), Archive::Asma);
//! assert!(path.is_file());
//!
//! let resolver = RemoteUriResolver::new(Mirror::new("https://cdn.example.org".parse()?));
//! let candidates = resolver.resolve(&path);
//! assert_eq!(
//!     candidates[1].to_string(),
//!     "http://asma.atari.org/asma/Composers/Hubbard_Rob/Commando.sap"
//! );
//! # Ok::<(), pmoarchive::ArchiveError>(())
//! ```

pub mod connectivity;
pub mod listing;
pub mod logs;
pub mod path;
pub mod remote;
pub mod resolver;
pub mod uri;

pub use connectivity::{
    ConnectivityCallback, ConnectivityMonitor, InterfaceProbe, ReachabilityProbe, Subscription,
};
pub use path::{Archive, ArchivePath};
pub use remote::{Mirror, RemoteUriResolver};
pub use resolver::{ArchiveResolver, RemoteFetcher};
pub use uri::Uri;

/// Error types for archive operations
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("Invalid URI: {0}")]
    InvalidUri(String),

    #[error("Not a file: {0}")]
    NotAFile(String),

    #[error("Network unavailable")]
    NetworkUnavailable,

    #[error("Failed to fetch {uri}: {reason}")]
    Transport { uri: String, reason: String },

    #[error("No remote candidate for {0}")]
    NoCandidate(String),

    #[error("Cache error: {0}")]
    Cache(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type for archive operations
pub type Result<T> = std::result::Result<T, ArchiveError>;
