use crate::{CacheLocation, CacheTier};
use std::sync::Arc;

/// Tier composé de plusieurs tiers classés par priorité décroissante
/// (ex: carte amovible avant stockage interne)
///
/// Un fichier présent dans n'importe quel tier l'emporte toujours sur un
/// emplacement libre, même si ce dernier appartient à un tier plus prioritaire.
/// Entre deux fichiers, le tier le plus prioritaire gagne ; entre deux
/// emplacements libres aussi, ce qui fait de lui la cible des écritures.
#[derive(Debug, Clone)]
pub struct CompositeCacheTier {
    tiers: Vec<Arc<dyn CacheTier>>,
}

impl CompositeCacheTier {
    pub fn new(tiers: Vec<Arc<dyn CacheTier>>) -> Self {
        Self { tiers }
    }

    pub fn tiers(&self) -> &[Arc<dyn CacheTier>] {
        &self.tiers
    }
}

impl CacheTier for CompositeCacheTier {
    fn find(&self, ids: &[&str]) -> Option<CacheLocation> {
        let mut placeholder = None;
        for tier in &self.tiers {
            match tier.find(ids) {
                Some(found @ CacheLocation::File(_)) => return Some(found),
                Some(free) => {
                    if placeholder.is_none() {
                        placeholder = Some(free);
                    }
                }
                None => {}
            }
        }
        placeholder
    }

    fn create_nested(&self, id: &str) -> Arc<dyn CacheTier> {
        let nested = self.tiers.iter().map(|tier| tier.create_nested(id)).collect();
        Arc::new(CompositeCacheTier::new(nested))
    }
}
