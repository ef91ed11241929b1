//! Cache-first retrieval of archive files
//!
//! [`ArchiveResolver`] ties the pieces together: the cache tiers are checked
//! first, then, if the network is reachable, each remote candidate is tried in
//! order through a [`RemoteFetcher`]. What gets downloaded is written back to
//! the cache placeholder.

use crate::{
    ArchiveError, ArchivePath, ConnectivityMonitor, Mirror, RemoteUriResolver, Result, Uri,
};
use async_trait::async_trait;
use pmocache::{CacheConfigExt, CacheLocation, CacheTier};
use pmoconfig::Config;
use std::sync::Arc;

/// HTTP transport used to download remote candidates.
///
/// Implementations report failures as [`ArchiveError::Transport`]; the
/// resolver then moves on to the next candidate.
#[async_trait]
pub trait RemoteFetcher: Send + Sync {
    async fn fetch(&self, uri: &Uri) -> Result<Vec<u8>>;
}

pub struct ArchiveResolver {
    remote: RemoteUriResolver,
    cache: Arc<dyn CacheTier>,
    connectivity: Arc<ConnectivityMonitor>,
    fetcher: Arc<dyn RemoteFetcher>,
}

impl ArchiveResolver {
    pub fn new(
        remote: RemoteUriResolver,
        cache: Arc<dyn CacheTier>,
        connectivity: Arc<ConnectivityMonitor>,
        fetcher: Arc<dyn RemoteFetcher>,
    ) -> Self {
        Self {
            remote,
            cache,
            connectivity,
            fetcher,
        }
    }

    /// Builds a resolver using the configured mirror and cache tiers.
    pub fn from_config(
        config: &Config,
        connectivity: Arc<ConnectivityMonitor>,
        fetcher: Arc<dyn RemoteFetcher>,
    ) -> Result<Self> {
        let mirror = Mirror::from_config(config)?;
        Ok(Self::new(
            RemoteUriResolver::new(mirror),
            config.create_cache_tier(),
            connectivity,
            fetcher,
        ))
    }

    pub fn remote(&self) -> &RemoteUriResolver {
        &self.remote
    }

    pub fn connectivity(&self) -> &Arc<ConnectivityMonitor> {
        &self.connectivity
    }

    /// Looks `path` up in the cache tiers, off the async worker threads.
    pub async fn lookup(&self, path: &ArchivePath) -> Result<Option<CacheLocation>> {
        let cache = self.cache.clone();
        let scheme = path.archive().scheme();
        let id = path.local_id();
        tokio::task::spawn_blocking(move || cache.create_nested(scheme).find(&[id.as_str()]))
            .await
            .map_err(|e| ArchiveError::Cache(e.to_string()))
    }

    /// Returns the content of the file at `path`.
    pub async fn fetch(&self, path: &ArchivePath) -> Result<Vec<u8>> {
        if !path.is_file() {
            return Err(ArchiveError::NotAFile(path.to_string()));
        }

        let mut location = self.lookup(path).await?;
        if let Some(CacheLocation::File(file)) = &location {
            tracing::debug!(path = %path, file = %file.display(), "Serving from cache");
            return Ok(tokio::fs::read(file).await?);
        }

        if !self.connectivity.is_available() {
            return Err(ArchiveError::NetworkUnavailable);
        }

        let mut last_error = None;
        for uri in self.remote.resolve(path) {
            match self.fetcher.fetch(&uri).await {
                Ok(data) => {
                    tracing::debug!(path = %path, uri = %uri, size = data.len(), "Fetched remote file");
                    match location.take() {
                        Some(placeholder) => self.persist(placeholder, &data).await,
                        None => tracing::debug!(path = %path, "No cache tier available, not persisted"),
                    }
                    return Ok(data);
                }
                Err(e) => {
                    tracing::warn!(path = %path, uri = %uri, "Remote candidate failed: {}", e);
                    last_error = Some(e);
                }
            }
        }
        Err(last_error.unwrap_or_else(|| ArchiveError::NoCandidate(path.to_string())))
    }

    async fn persist(&self, location: CacheLocation, data: &[u8]) {
        let data = data.to_vec();
        let result = tokio::task::spawn_blocking(move || pmocache::store(&location, &data)).await;
        match result {
            Ok(Ok(stored)) => tracing::debug!(file = %stored.display(), "Cached remote file"),
            Ok(Err(e)) => tracing::warn!("Failed to cache remote file: {}", e),
            Err(e) => tracing::warn!("Cache write task failed: {}", e),
        }
    }
}

impl std::fmt::Debug for ArchiveResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArchiveResolver")
            .field("remote", &self.remote)
            .field("cache", &self.cache)
            .field("connectivity", &self.connectivity)
            .finish()
    }
}
