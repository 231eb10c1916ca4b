use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use directories::BaseDirs;
use serde::{Deserialize, Serialize};

use crate::domain::Species;
use crate::error::KiraError;

pub const GENE_INFO_TABLE: &str = "gene_info";
pub const KEGG_CONV_TABLE: &str = "kegg_conv";

/// Cache of downloaded mapping tables, one directory per organism code.
#[derive(Debug, Clone)]
pub struct Store {
    cache_root: Utf8PathBuf,
}

impl Store {
    pub fn new() -> Result<Self, KiraError> {
        let cache_root = BaseDirs::new()
            .and_then(|dirs| {
                Utf8PathBuf::from_path_buf(
                    dirs.home_dir().join(".cache").join("kira-pathway-translator"),
                )
                .ok()
            })
            .ok_or_else(|| {
                KiraError::Filesystem("unable to resolve cache directory".to_string())
            })?;
        Ok(Self { cache_root })
    }

    pub fn new_with_root(cache_root: Utf8PathBuf) -> Self {
        Self { cache_root }
    }

    pub fn cache_root(&self) -> &Utf8Path {
        &self.cache_root
    }

    pub fn species_dir(&self, species: &Species) -> Utf8PathBuf {
        self.cache_root.join("mappings").join(&species.organism_code)
    }

    pub fn gene_info_path(&self, species: &Species) -> Utf8PathBuf {
        self.species_dir(species).join("gene_info.tsv.gz")
    }

    pub fn kegg_conv_path(&self, species: &Species) -> Utf8PathBuf {
        self.species_dir(species).join("ncbi-geneid.tsv")
    }

    pub fn metadata_path(&self, species: &Species, table: &str) -> Utf8PathBuf {
        self.cache_root
            .join("metadata")
            .join(&species.organism_code)
            .join(format!("{table}.json"))
    }

    pub fn ensure_cache_root(&self) -> Result<(), KiraError> {
        fs::create_dir_all(self.cache_root.as_std_path())
            .map_err(|err| KiraError::Filesystem(err.to_string()))
    }

    pub fn exists(&self, path: &Utf8Path) -> bool {
        path.as_std_path().exists()
    }

    pub fn write_metadata(path: &Utf8Path, metadata: &Metadata) -> Result<(), KiraError> {
        let content = serde_json::to_vec_pretty(metadata)
            .map_err(|err| KiraError::Filesystem(err.to_string()))?;
        Self::write_bytes_atomic(path, &content)
    }

    pub fn read_metadata(path: &Utf8Path) -> Result<Option<Metadata>, KiraError> {
        if !path.as_std_path().exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path.as_std_path())
            .map_err(|err| KiraError::Filesystem(err.to_string()))?;
        let metadata = serde_json::from_str(&content)
            .map_err(|err| KiraError::Filesystem(err.to_string()))?;
        Ok(Some(metadata))
    }

    /// Writes through a temp file in the destination directory, then
    /// renames it into place.
    pub fn write_bytes_atomic(path: &Utf8Path, content: &[u8]) -> Result<(), KiraError> {
        let parent = path
            .parent()
            .ok_or_else(|| KiraError::Filesystem("invalid destination path".to_string()))?;
        fs::create_dir_all(parent.as_std_path())
            .map_err(|err| KiraError::Filesystem(err.to_string()))?;
        let temp = tempfile::Builder::new()
            .prefix("kira-pt-file")
            .tempfile_in(parent.as_std_path())
            .map_err(|err| KiraError::Filesystem(err.to_string()))?;
        fs::write(temp.path(), content).map_err(|err| KiraError::Filesystem(err.to_string()))?;
        temp.persist(path.as_std_path())
            .map_err(|err| KiraError::Filesystem(err.to_string()))?;
        Ok(())
    }

    pub fn rename_into_place(from: &Utf8Path, to: &Utf8Path) -> Result<(), KiraError> {
        if to.as_std_path().exists() {
            fs::remove_file(to.as_std_path())
                .map_err(|err| KiraError::Filesystem(err.to_string()))?;
        }
        fs::rename(from.as_std_path(), to.as_std_path())
            .map_err(|err| KiraError::Filesystem(err.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    pub source: String,
    pub species: String,
    pub table: String,
    pub downloaded_at: String,
    pub tool: String,
    pub resolved_path: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_paths() {
        let store = Store::new_with_root(Utf8PathBuf::from("/tmp/kira-pt-cache"));
        let human = Species::human();

        assert!(store.gene_info_path(&human).ends_with("mappings/hsa/gene_info.tsv.gz"));
        assert!(store.kegg_conv_path(&human).ends_with("mappings/hsa/ncbi-geneid.tsv"));
        assert!(
            store
                .metadata_path(&human, KEGG_CONV_TABLE)
                .ends_with("metadata/hsa/kegg_conv.json")
        );
    }
}
