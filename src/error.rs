use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum KiraError {
    #[error("unsupported BioPAX level: {0}")]
    UnsupportedSchema(String),

    #[error("could not read pathway model {path}: {message}")]
    ModelUnavailable { path: String, message: String },

    #[error("failed to initialize {mapper} mapper for species '{species}': {message}")]
    MapperInit {
        mapper: &'static str,
        species: String,
        message: String,
    },

    #[error("identifier lookup failed: {0}")]
    MappingLookup(String),

    #[error("unknown species: {0}")]
    UnknownSpecies(String),

    #[error("pathway not found in model: {0}")]
    PathwayNotFound(String),

    #[error("augment mode requires an existing target pathway")]
    MissingAugmentTarget,

    #[error("failed to read config file at {0}")]
    ConfigRead(PathBuf),

    #[error("failed to parse JSON config: {0}")]
    ConfigParse(String),

    #[error("no species configured (use --species or the config file)")]
    MissingSpecies,

    #[error("filesystem error: {0}")]
    Filesystem(String),

    #[error("mapping table request failed: {0}")]
    KnowledgeHttp(String),

    #[error("mapping table source returned status {status}: {message}")]
    KnowledgeStatus { status: u16, message: String },

    #[error("no mapping table download available for species: {0}")]
    UnsupportedDownload(String),
}
