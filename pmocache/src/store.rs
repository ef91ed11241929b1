//! Écriture d'un artefact dans le cache

use crate::CacheLocation;
use anyhow::{anyhow, Result};
use std::{
    ffi::OsString,
    fs,
    io::Write,
    path::{Path, PathBuf},
};

/// Écrit `data` à l'emplacement `location` et retourne le chemin final
///
/// Les répertoires parents sont créés si nécessaire. Les données sont d'abord
/// écrites dans un fichier temporaire unique du même répertoire puis renommées,
/// de sorte qu'un lecteur ne voit jamais de fichier partiel, même si plusieurs
/// écritures visent le même emplacement.
pub fn store(location: &CacheLocation, data: &[u8]) -> Result<PathBuf> {
    let path = location.path();
    let file_name = path
        .file_name()
        .ok_or_else(|| anyhow!("Invalid cache location: {}", path.display()))?;
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    let mut prefix = OsString::from(".");
    prefix.push(file_name);
    prefix.push(".");
    let mut partial = tempfile::Builder::new()
        .prefix(&prefix)
        .suffix(".part")
        .tempfile_in(parent)?;
    partial.write_all(data)?;
    partial.as_file().sync_all()?;
    partial.persist(path).map_err(|e| e.error)?;

    tracing::debug!(path = %path.display(), size = data.len(), "Stored cache entry");
    Ok(path.to_path_buf())
}
