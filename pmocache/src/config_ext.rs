//! Extension pour construire la chaîne de tiers de cache depuis pmoconfig
//!
//! Ce module fournit le trait `CacheConfigExt` qui ajoute à `pmoconfig::Config`
//! la création du tier de cache configuré (`host.cache.tiers`).

use crate::{CacheTier, CompositeCacheTier, PersistentCacheTier, StubCacheTier};
use anyhow::Result;
use pmoconfig::Config;
use std::{path::PathBuf, sync::Arc};

/// Trait d'extension pour ajouter la gestion du cache à pmoconfig
///
/// # Exemple
///
/// ```rust,ignore
/// use pmoconfig::get_config;
/// use pmocache::CacheConfigExt;
///
/// let config = get_config();
/// let cache = config.create_cache_tier();
/// let asma = cache.create_nested("asma");
/// ```
pub trait CacheConfigExt {
    /// Récupère les répertoires des tiers, résolus par rapport au répertoire
    /// de configuration, par ordre de priorité
    fn get_cache_tier_paths(&self) -> Result<Vec<PathBuf>>;

    /// Crée le tier de cache configuré
    ///
    /// Ne retourne jamais d'erreur : sans répertoire utilisable, le cache
    /// se dégrade en [`StubCacheTier`] avec un avertissement.
    fn create_cache_tier(&self) -> Arc<dyn CacheTier>;
}

impl CacheConfigExt for Config {
    fn get_cache_tier_paths(&self) -> Result<Vec<PathBuf>> {
        Ok(self
            .get_cache_tier_dirs()?
            .iter()
            .map(|dir| PathBuf::from(self.resolve_path(dir)))
            .collect())
    }

    fn create_cache_tier(&self) -> Arc<dyn CacheTier> {
        match self.get_cache_tier_paths() {
            Ok(paths) => build_cache_tier(&paths),
            Err(e) => {
                tracing::warn!("Failed to read cache configuration: {}, caching disabled", e);
                Arc::new(StubCacheTier)
            }
        }
    }
}

/// Construit la chaîne de tiers à partir d'une liste de répertoires
///
/// Les répertoires non inscriptibles sont ignorés (avertissement). Un seul
/// répertoire utilisable donne un [`PersistentCacheTier`], plusieurs un
/// [`CompositeCacheTier`], aucun un [`StubCacheTier`].
pub fn build_cache_tier(dirs: &[PathBuf]) -> Arc<dyn CacheTier> {
    let mut tiers: Vec<Arc<dyn CacheTier>> = Vec::with_capacity(dirs.len());
    for dir in dirs {
        match Config::validate_dir(dir) {
            Ok(()) => {
                tracing::info!(directory = %dir.display(), "Using cache tier");
                tiers.push(Arc::new(PersistentCacheTier::new(dir.clone())));
            }
            Err(e) => {
                tracing::warn!(directory = %dir.display(), "Skipping unusable cache tier: {}", e);
            }
        }
    }

    match tiers.len() {
        0 => {
            tracing::warn!("No writable cache directory, caching disabled");
            Arc::new(StubCacheTier)
        }
        1 => tiers.remove(0),
        _ => Arc::new(CompositeCacheTier::new(tiers)),
    }
}
