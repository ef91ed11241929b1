//! Tier de cache adossé à un répertoire réel
//!
//! Chaque identifiant est un chemin relatif au répertoire du tier : un segment
//! d'identifiant correspond à un niveau de répertoire.

use crate::{CacheLocation, CacheTier, StubCacheTier};
use std::{
    path::{Component, Path, PathBuf},
    sync::Arc,
};

/// Tier de cache persistant sur disque
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistentCacheTier {
    /// Répertoire racine du tier (pas forcément encore créé)
    dir: PathBuf,
}

impl PersistentCacheTier {
    /// Crée un tier sur le répertoire `dir`
    ///
    /// Le répertoire n'est pas créé : il le sera à la première écriture
    /// (voir [`crate::store`]).
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Construit le chemin d'un identifiant dans le tier
    ///
    /// Retourne `None` pour un identifiant vide, absolu ou remontant (`..`).
    fn entry_path(&self, id: &str) -> Option<PathBuf> {
        let relative = Path::new(id);
        let mut has_normal = false;
        for component in relative.components() {
            match component {
                Component::Normal(_) => has_normal = true,
                Component::CurDir => {}
                _ => return None,
            }
        }
        has_normal.then(|| self.dir.join(relative))
    }
}

impl CacheTier for PersistentCacheTier {
    fn find(&self, ids: &[&str]) -> Option<CacheLocation> {
        let mut placeholder = None;
        for id in ids {
            let Some(path) = self.entry_path(id) else {
                tracing::debug!(id = %id, dir = %self.dir.display(), "Ignoring invalid cache id");
                continue;
            };
            if path.is_file() {
                tracing::trace!(path = %path.display(), "Cache hit");
                return Some(CacheLocation::File(path));
            }
            if placeholder.is_none() && !path.is_dir() {
                placeholder = Some(CacheLocation::Placeholder(path));
            }
        }
        placeholder
    }

    fn create_nested(&self, id: &str) -> Arc<dyn CacheTier> {
        match self.entry_path(id) {
            Some(dir) => Arc::new(PersistentCacheTier::new(dir)),
            None => {
                tracing::warn!(id = %id, dir = %self.dir.display(), "Invalid nested cache id, caching disabled");
                Arc::new(StubCacheTier)
            }
        }
    }
}
