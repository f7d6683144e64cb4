//! On-disk layout: three co-located JSON artifacts per store directory,
//! written through after every mutating call. Saving then loading must
//! reproduce identical search results.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use ragstore_core::error::{Result, StoreError};
use ragstore_core::types::ChunkMetadata;

use crate::index::FlatIndex;

const INDEX_FILE: &str = "index.json";
const METADATA_FILE: &str = "metadata.json";
const DOCUMENTS_FILE: &str = "documents.json";

/// The (index, documents, metadata) triple. Positions are aligned across
/// all three; the store only ever mutates them together under its lock.
#[derive(Debug, Default)]
pub(crate) struct StoreState {
    pub index: FlatIndex,
    pub documents: Vec<String>,
    pub metadata: Vec<ChunkMetadata>,
}

pub(crate) fn save(dir: &Path, state: &StoreState) -> Result<()> {
    fs::create_dir_all(dir)?;
    write_artifact(&dir.join(INDEX_FILE), &state.index)?;
    write_artifact(&dir.join(METADATA_FILE), &state.metadata)?;
    write_artifact(&dir.join(DOCUMENTS_FILE), &state.documents)?;
    Ok(())
}

/// Load all three artifacts as a unit. `Ok(None)` means a fresh store (one
/// or more artifacts missing); a parse failure or a length disagreement is
/// `PersistenceCorrupt`.
pub(crate) fn load(dir: &Path) -> Result<Option<StoreState>> {
    let index_path = dir.join(INDEX_FILE);
    let metadata_path = dir.join(METADATA_FILE);
    let documents_path = dir.join(DOCUMENTS_FILE);
    if !(index_path.exists() && metadata_path.exists() && documents_path.exists()) {
        return Ok(None);
    }

    let index: FlatIndex = read_artifact(&index_path)?;
    let metadata: Vec<ChunkMetadata> = read_artifact(&metadata_path)?;
    let documents: Vec<String> = read_artifact(&documents_path)?;
    if documents.len() != metadata.len() || documents.len() != index.len() {
        return Err(StoreError::PersistenceCorrupt(format!(
            "artifact lengths disagree: {} vectors, {} metadata rows, {} documents",
            index.len(),
            metadata.len(),
            documents.len()
        )));
    }
    Ok(Some(StoreState { index, documents, metadata }))
}

// Write via a sibling temp file and rename, so a crash mid-write leaves the
// previous artifact intact.
fn write_artifact<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let tmp = tmp_path(path);
    fs::write(&tmp, serde_json::to_vec(value)?)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

fn read_artifact<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let bytes = fs::read(path)?;
    serde_json::from_slice(&bytes)
        .map_err(|e| StoreError::PersistenceCorrupt(format!("{}: {}", path.display(), e)))
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
