use crate::{CacheLocation, CacheTier};
use std::sync::Arc;

/// Tier sans stockage
///
/// Utilisé lorsqu'aucun répertoire inscriptible n'est disponible :
/// toutes les recherches échouent silencieusement.
#[derive(Debug, Clone, Copy, Default)]
pub struct StubCacheTier;

impl CacheTier for StubCacheTier {
    fn find(&self, _ids: &[&str]) -> Option<CacheLocation> {
        None
    }

    fn create_nested(&self, _id: &str) -> Arc<dyn CacheTier> {
        Arc::new(StubCacheTier)
    }
}
