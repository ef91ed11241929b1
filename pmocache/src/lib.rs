//! # pmocache - Cache disque hiérarchisé pour PMOArchive
//!
//! Cette crate fournit les tiers de cache utilisés pour conserver localement
//! les fichiers récupérés depuis les archives distantes.
//!
//! ## Vue d'ensemble
//!
//! Un tier répond à une seule question : pour une liste ordonnée d'identifiants
//! candidats, où se trouve l'artefact ?
//!
//! - [`CacheLocation::File`] : le fichier est présent, on peut le lire
//! - [`CacheLocation::Placeholder`] : absent, mais on peut l'écrire à cet endroit
//! - `None` : aucun emplacement utilisable
//!
//! ## Architecture
//!
//! ```text
//! CacheTier (trait)
//!     ├── PersistentCacheTier  - répertoire réel sur disque
//!     ├── StubCacheTier        - aucun stockage, ne trouve jamais rien
//!     └── CompositeCacheTier   - plusieurs tiers par ordre de priorité
//! ```
//!
//! ## Utilisation
//!
//! ```rust,no_run
//! use pmocache::{CacheLocation, CacheTier, CompositeCacheTier, PersistentCacheTier};
//! use std::sync::Arc;
//!
//! let cache = CompositeCacheTier::new(vec![
//!     Arc::new(PersistentCacheTier::new("/mnt/sdcard/cache")),
//!     Arc::new(PersistentCacheTier::new("/var/cache/pmoarchive")),
//! ]);
//!
//! let asma = cache.create_nested("asma");
//! match asma.find(&["Composers/Hubbard_Rob/Commando.sap"]) {
//!     Some(CacheLocation::File(path)) => println!("En cache: {}", path.display()),
//!     Some(CacheLocation::Placeholder(path)) => {
//!         pmocache::store(&CacheLocation::Placeholder(path), b"...")?;
//!     }
//!     None => println!("Pas de cache disponible"),
//! }
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! ## Structure des fichiers
//!
//! ```text
//! cache/
//! ├── asma/                         # create_nested("asma")
//! │   └── Composers/Hubbard_Rob/
//! │       └── Commando.sap          # find(["Composers/Hubbard_Rob/Commando.sap"])
//! └── aminet/
//! ```

pub mod composite;
pub mod persistent;
pub mod store;
pub mod stub;
pub mod tier;

#[cfg(feature = "pmoconfig")]
pub mod config_ext;

pub use composite::CompositeCacheTier;
pub use persistent::PersistentCacheTier;
pub use store::store;
pub use stub::StubCacheTier;
pub use tier::{CacheLocation, CacheTier};

#[cfg(feature = "pmoconfig")]
pub use config_ext::{build_cache_tier, CacheConfigExt};
