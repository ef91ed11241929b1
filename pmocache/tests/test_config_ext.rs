#![cfg(feature = "pmoconfig")]

use pmocache::{build_cache_tier, CacheConfigExt, CacheLocation};
use pmoconfig::Config;
use std::path::PathBuf;

#[test]
fn test_no_usable_dir_gives_stub() {
    let file = tempfile::NamedTempFile::new().unwrap();
    // un fichier ne peut pas servir de répertoire
    let tier = build_cache_tier(&[file.path().to_path_buf()]);
    assert_eq!(tier.find(&["a"]), None);
}

#[test]
fn test_unusable_dirs_are_skipped() {
    let file = tempfile::NamedTempFile::new().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let tier = build_cache_tier(&[file.path().to_path_buf(), dir.path().to_path_buf()]);
    assert_eq!(
        tier.find(&["a"]),
        Some(CacheLocation::Placeholder(dir.path().join("a")))
    );
}

#[test]
fn test_config_tiers_are_relative_to_config_dir() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::load_config(dir.path().to_str().unwrap()).unwrap();
    config
        .set_cache_tier_dirs(vec!["removable".to_string(), "internal".to_string()])
        .unwrap();

    let paths = config.get_cache_tier_paths().unwrap();
    assert_eq!(
        paths,
        vec![dir.path().join("removable"), dir.path().join("internal")]
    );

    let tier = config.create_cache_tier();
    assert_eq!(
        tier.find(&["x"]),
        Some(CacheLocation::Placeholder(PathBuf::from(&paths[0]).join("x")))
    );
}
