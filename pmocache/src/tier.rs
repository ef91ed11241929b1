use std::{
    fmt::Debug,
    path::{Path, PathBuf},
    sync::Arc,
};

/// Résultat d'une recherche dans un tier de cache
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheLocation {
    /// Fichier régulier présent dans le cache
    File(PathBuf),
    /// Emplacement libre où l'artefact peut être écrit
    Placeholder(PathBuf),
}

impl CacheLocation {
    pub fn path(&self) -> &Path {
        match self {
            CacheLocation::File(path) | CacheLocation::Placeholder(path) => path,
        }
    }

    pub fn is_file(&self) -> bool {
        matches!(self, CacheLocation::File(_))
    }

    pub fn into_path(self) -> PathBuf {
        match self {
            CacheLocation::File(path) | CacheLocation::Placeholder(path) => path,
        }
    }
}

/// Trait commun à tous les tiers de cache
///
/// Les recherches sont des entrées/sorties bloquantes : à appeler hors des
/// threads sensibles à la latence (ex: `tokio::task::spawn_blocking`).
pub trait CacheTier: Send + Sync + Debug {
    /// Cherche un artefact parmi des identifiants candidats, par ordre de priorité
    ///
    /// Le premier identifiant correspondant à un fichier existant l'emporte.
    /// À défaut, le premier emplacement inscriptible est retourné.
    fn find(&self, ids: &[&str]) -> Option<CacheLocation>;

    /// Retourne un tier du même type, un niveau plus profond
    fn create_nested(&self, id: &str) -> Arc<dyn CacheTier>;
}
