use std::fs;
use std::io::{self, Write};

use camino::{Utf8Path, Utf8PathBuf};
use serde::Serialize;
use tracing::debug;

use crate::error::KiraError;
use crate::graph::AugmentationTally;
use crate::kgml::KeggPathway;
use crate::knowledge::FetchResult;
use crate::model::PathwaySummary;
use crate::store::Store;

/// Persists one unit per translated pathway.
pub trait PathwayWriter {
    fn write(&self, pathway: &KeggPathway, extended: bool) -> Result<Utf8PathBuf, KiraError>;
}

/// Writes `<org><number>.json` files into a directory.
#[derive(Debug, Clone)]
pub struct JsonPathwayWriter {
    directory: Utf8PathBuf,
}

impl JsonPathwayWriter {
    pub fn new(directory: Utf8PathBuf) -> Self {
        Self { directory }
    }

    pub fn directory(&self) -> &Utf8Path {
        &self.directory
    }
}

impl PathwayWriter for JsonPathwayWriter {
    fn write(&self, pathway: &KeggPathway, extended: bool) -> Result<Utf8PathBuf, KiraError> {
        let path = self.directory.join(pathway.file_name());
        let content = if extended {
            serde_json::to_vec_pretty(pathway)
        } else {
            let mut plain = pathway.clone();
            for entry in &mut plain.entries {
                entry.graphics_name = None;
            }
            serde_json::to_vec_pretty(&plain)
        }
        .map_err(|err| KiraError::Filesystem(err.to_string()))?;
        Store::write_bytes_atomic(&path, &content)?;
        debug!(path = %path, "wrote pathway");
        Ok(path)
    }
}

/// Reads a pathway previously written by [`JsonPathwayWriter`], e.g. the
/// target of augment mode.
pub fn read_pathway(path: &Utf8Path) -> Result<KeggPathway, KiraError> {
    let content = fs::read_to_string(path.as_std_path())
        .map_err(|err| KiraError::Filesystem(format!("read {path}: {err}")))?;
    serde_json::from_str(&content).map_err(|err| KiraError::Filesystem(format!("parse {path}: {err}")))
}

#[derive(Debug, Clone, Serialize)]
pub struct ConvertResult {
    pub model: String,
    pub level: String,
    pub species: String,
    pub written: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AugmentResult {
    pub model: String,
    pub target: String,
    pub entries: usize,
    pub relations: usize,
    pub tally: AugmentationTally,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListResult {
    pub model: String,
    pub level: String,
    pub pathways: Vec<PathwaySummary>,
}

pub struct JsonOutput;

impl JsonOutput {
    pub fn print_convert(result: &ConvertResult) -> io::Result<()> {
        Self::print_json(result)
    }

    pub fn print_augment(result: &AugmentResult) -> io::Result<()> {
        Self::print_json(result)
    }

    pub fn print_list(result: &ListResult) -> io::Result<()> {
        Self::print_json(result)
    }

    pub fn print_fetch(result: &FetchResult) -> io::Result<()> {
        Self::print_json(result)
    }

    pub fn print_json<T: Serialize>(value: &T) -> io::Result<()> {
        let json = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
        let mut stdout = io::stdout();
        stdout.write_all(json.as_bytes())?;
        stdout.write_all(b"\n")?;
        Ok(())
    }
}
