//! Utilitaires partagés par les crates PMOArchive.
//!
//! # Modules
//!
//! - [`natural_order`] : comparaison "naturelle" des noms affichés dans les listings
//!   (les séquences de chiffres sont comparées par valeur numérique)
//! - [`ip_utils`] : détection des interfaces réseau, utilisée pour savoir si une
//!   tentative d'accès distant a un sens
//!
//! # Exemple
//!
//! ```
//! use pmoutils::sort_natural;
//!
//! let mut names = vec!["track10.sap", "track2.sap", "Track1.sap"];
//! sort_natural(&mut names);
//! assert_eq!(names, ["Track1.sap", "track2.sap", "track10.sap"]);
//! ```
mod ip_utils;
pub mod natural_order;

pub use ip_utils::{guess_local_ip, has_network_interface};
pub use natural_order::{NaturalKey, natural_cmp, sort_natural};
