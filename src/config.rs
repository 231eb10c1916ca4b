use std::fs;
use std::path::PathBuf;

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

use crate::convert::ConversionOptions;
use crate::domain::Species;
use crate::error::KiraError;

pub const DEFAULT_CONFIG_FILE: &str = "kira-pt.json";
pub const DEFAULT_OUTPUT_DIR: &str = "pws";
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub schema_version: Option<u32>,
    #[serde(default)]
    pub species: Option<SpeciesEntry>,
    #[serde(default)]
    pub mappings: Option<MappingPaths>,
    #[serde(default)]
    pub output_dir: Option<String>,
    #[serde(default)]
    pub single_mode: Option<bool>,
    #[serde(default)]
    pub write_entry_extended: Option<bool>,
    #[serde(default)]
    pub augment_original_pathway: Option<bool>,
    #[serde(default)]
    pub add_self_reactions: Option<bool>,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(untagged)]
pub enum SpeciesEntry {
    Shorthand(String),
    Detailed(Species),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct MappingPaths {
    #[serde(default)]
    pub gene_symbols: Option<Utf8PathBuf>,
    #[serde(default)]
    pub gene_ids: Option<Utf8PathBuf>,
}

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub schema_version: u32,
    pub species: Option<Species>,
    pub mappings: MappingPaths,
    pub output_dir: Utf8PathBuf,
    pub options: ConversionOptions,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            species: None,
            mappings: MappingPaths::default(),
            output_dir: Utf8PathBuf::from(DEFAULT_OUTPUT_DIR),
            options: ConversionOptions::default(),
        }
    }
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads the given config file, or `kira-pt.json` from the working
    /// directory when present. No config at all yields the defaults.
    pub fn resolve(path: Option<&str>) -> Result<ResolvedConfig, KiraError> {
        let config_path = match path {
            Some(path) => PathBuf::from(path),
            None => PathBuf::from(DEFAULT_CONFIG_FILE),
        };

        if path.is_none() && !config_path.exists() {
            return Ok(ResolvedConfig::default());
        }

        let content = fs::read_to_string(&config_path)
            .map_err(|_| KiraError::ConfigRead(config_path.clone()))?;
        let config: Config = serde_json::from_str(&content)
            .map_err(|err| KiraError::ConfigParse(err.to_string()))?;

        Self::resolve_config(config)
    }

    pub fn resolve_config(config: Config) -> Result<ResolvedConfig, KiraError> {
        let schema_version = config.schema_version.unwrap_or(SCHEMA_VERSION);
        if schema_version != SCHEMA_VERSION {
            return Err(KiraError::ConfigParse(format!(
                "unsupported schema_version {schema_version}, expected {SCHEMA_VERSION}"
            )));
        }

        let species = match config.species {
            Some(SpeciesEntry::Shorthand(value)) => Some(value.parse()?),
            Some(SpeciesEntry::Detailed(species)) => Some(species),
            None => None,
        };

        Ok(ResolvedConfig {
            schema_version,
            species,
            mappings: config.mappings.unwrap_or_default(),
            output_dir: config
                .output_dir
                .map(Utf8PathBuf::from)
                .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_OUTPUT_DIR)),
            options: ConversionOptions {
                single_mode: config.single_mode.unwrap_or(false),
                write_entry_extended: config.write_entry_extended.unwrap_or(false),
                augment_original_pathway: config.augment_original_pathway.unwrap_or(false),
                add_self_reactions: config.add_self_reactions.unwrap_or(false),
            },
        })
    }
}
