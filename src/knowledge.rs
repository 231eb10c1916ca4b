use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::time::Duration;

use camino::Utf8PathBuf;
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde::Serialize;
use tracing::info;

use crate::domain::Species;
use crate::error::KiraError;
use crate::store::{GENE_INFO_TABLE, KEGG_CONV_TABLE, Metadata, Store};

pub trait KnowledgeClient: Send + Sync {
    fn download_kegg_conv(&self, species: &Species, destination: &Path) -> Result<(), KiraError>;
    fn download_gene_info(&self, species: &Species, destination: &Path) -> Result<(), KiraError>;
}

pub fn kegg_conv_url(species: &Species) -> String {
    format!("https://rest.kegg.jp/conv/{}/ncbi-geneid", species.organism_code)
}

/// NCBI publishes per-organism `gene_info` files only for some groups; the
/// mammals are the ones the built-in species need.
pub fn gene_info_url(species: &Species) -> Result<String, KiraError> {
    match species.taxon_id {
        9606 | 10090 | 10116 => Ok(format!(
            "https://ftp.ncbi.nlm.nih.gov/gene/DATA/GENE_INFO/Mammalia/{}.gene_info.gz",
            species.scientific_name.replace(' ', "_")
        )),
        _ => Err(KiraError::UnsupportedDownload(species.to_string())),
    }
}

#[derive(Clone)]
pub struct KnowledgeHttpClient {
    client: Client,
}

impl KnowledgeHttpClient {
    pub fn new() -> Result<Self, KiraError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&format!("kira-pt/{}", env!("CARGO_PKG_VERSION")))
                .map_err(|err| KiraError::Filesystem(err.to_string()))?,
        );
        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|err| KiraError::KnowledgeHttp(err.to_string()))?;
        Ok(Self { client })
    }

    fn download(&self, url: &str, destination: &Path) -> Result<(), KiraError> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|err| KiraError::KnowledgeHttp(err.to_string()))?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response
                .text()
                .unwrap_or_else(|_| "mapping table request failed".to_string());
            return Err(KiraError::KnowledgeStatus { status, message });
        }
        let bytes = response
            .bytes()
            .map_err(|err| KiraError::KnowledgeHttp(err.to_string()))?;
        if let Some(parent) = destination.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|err| KiraError::Filesystem(err.to_string()))?;
        }
        let mut file =
            File::create(destination).map_err(|err| KiraError::Filesystem(err.to_string()))?;
        file.write_all(&bytes)
            .map_err(|err| KiraError::Filesystem(err.to_string()))?;
        Ok(())
    }
}

impl KnowledgeClient for KnowledgeHttpClient {
    fn download_kegg_conv(&self, species: &Species, destination: &Path) -> Result<(), KiraError> {
        self.download(&kegg_conv_url(species), destination)
    }

    fn download_gene_info(&self, species: &Species, destination: &Path) -> Result<(), KiraError> {
        self.download(&gene_info_url(species)?, destination)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FetchResult {
    pub items: Vec<FetchItemResult>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FetchItemResult {
    pub species: String,
    pub table: String,
    pub source: String,
    pub action: String,
    pub cache_path: String,
}

/// Makes both mapping tables of `species` available in the store,
/// downloading only what is missing unless `force` is set.
pub fn fetch_mappings<K: KnowledgeClient>(
    store: &Store,
    client: &K,
    species: &Species,
    force: bool,
) -> Result<FetchResult, KiraError> {
    store.ensure_cache_root()?;
    let tables = [
        (KEGG_CONV_TABLE, store.kegg_conv_path(species), kegg_conv_url(species)),
        (GENE_INFO_TABLE, store.gene_info_path(species), gene_info_url(species)?),
    ];

    let mut items = Vec::new();
    for (table, path, url) in tables {
        let action = if store.exists(&path) && !force {
            "cache"
        } else {
            let partial = Utf8PathBuf::from(format!("{path}.part"));
            match table {
                KEGG_CONV_TABLE => client.download_kegg_conv(species, partial.as_std_path())?,
                _ => client.download_gene_info(species, partial.as_std_path())?,
            }
            Store::rename_into_place(&partial, &path)?;
            Store::write_metadata(
                &store.metadata_path(species, table),
                &Metadata {
                    source: url.clone(),
                    species: species.organism_code.clone(),
                    table: table.to_string(),
                    downloaded_at: chrono::Utc::now().to_rfc3339(),
                    tool: format!("kira-pt/{}", env!("CARGO_PKG_VERSION")),
                    resolved_path: path.to_string(),
                },
            )?;
            info!(table, species = %species.organism_code, path = %path, "downloaded mapping table");
            "download"
        };
        items.push(FetchItemResult {
            species: species.organism_code.clone(),
            table: table.to_string(),
            source: url,
            action: action.to_string(),
            cache_path: path.to_string(),
        });
    }
    Ok(FetchResult { items })
}
