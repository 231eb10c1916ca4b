use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};

use camino::Utf8Path;
use flate2::read::GzDecoder;
use tracing::{debug, info};

use crate::domain::Species;
use crate::error::KiraError;

/// Gene symbol to NCBI gene id lookup. `Ok(None)` means "no mapping";
/// `Err` is reserved for transport or configuration failures.
pub trait SymbolToGeneId {
    fn map(&self, symbol: &str) -> Result<Option<u64>, KiraError>;
}

/// NCBI gene id to KEGG gene identifier lookup, same contract as
/// [`SymbolToGeneId`].
pub trait GeneIdToKegg {
    fn map(&self, gene_id: u64, species: &Species) -> Result<Option<String>, KiraError>;
}

impl<T: SymbolToGeneId + ?Sized> SymbolToGeneId for &T {
    fn map(&self, symbol: &str) -> Result<Option<u64>, KiraError> {
        (**self).map(symbol)
    }
}

impl<T: GeneIdToKegg + ?Sized> GeneIdToKegg for &T {
    fn map(&self, gene_id: u64, species: &Species) -> Result<Option<String>, KiraError> {
        (**self).map(gene_id, species)
    }
}

#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    by_symbol: HashMap<String, u64>,
}

impl SymbolTable {
    pub fn from_pairs<I, K>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, u64)>,
        K: AsRef<str>,
    {
        let by_symbol = pairs
            .into_iter()
            .map(|(symbol, id)| (normalize_symbol(symbol.as_ref()), id))
            .collect();
        Self { by_symbol }
    }

    /// Loads an NCBI `gene_info` table, keeping rows of the given species.
    /// Official symbols take precedence over synonyms.
    pub fn from_gene_info(path: &Utf8Path, species: &Species) -> Result<Self, KiraError> {
        let init_err = |message: String| KiraError::MapperInit {
            mapper: "gene symbol",
            species: species.organism_code.clone(),
            message,
        };
        let reader = open_table(path).map_err(|err| init_err(format!("{path}: {err}")))?;

        let mut by_symbol = HashMap::new();
        let mut synonyms = Vec::new();
        for line in reader.lines() {
            let line = line.map_err(|err| init_err(format!("{path}: {err}")))?;
            if line.starts_with('#') || line.trim().is_empty() {
                continue;
            }
            let columns = line.split('\t').collect::<Vec<_>>();
            if columns.len() < 5 {
                return Err(init_err(format!("{path}: malformed row '{line}'")));
            }
            if columns[0].parse::<u32>().ok() != Some(species.taxon_id) {
                continue;
            }
            let Ok(gene_id) = columns[1].parse::<u64>() else {
                return Err(init_err(format!("{path}: invalid gene id '{}'", columns[1])));
            };
            by_symbol.insert(normalize_symbol(columns[2]), gene_id);
            if columns[4] != "-" {
                synonyms.extend(
                    columns[4]
                        .split('|')
                        .map(|synonym| (normalize_symbol(synonym), gene_id)),
                );
            }
        }
        for (synonym, gene_id) in synonyms {
            by_symbol.entry(synonym).or_insert(gene_id);
        }

        info!(table = %path, species = %species.organism_code, symbols = by_symbol.len(), "loaded gene symbol table");
        Ok(Self { by_symbol })
    }

    pub fn len(&self) -> usize {
        self.by_symbol.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_symbol.is_empty()
    }
}

impl SymbolToGeneId for SymbolTable {
    fn map(&self, symbol: &str) -> Result<Option<u64>, KiraError> {
        Ok(self.by_symbol.get(&normalize_symbol(symbol)).copied())
    }
}

#[derive(Debug, Clone, Default)]
pub struct KeggGeneTable {
    by_gene: HashMap<u64, String>,
}

impl KeggGeneTable {
    pub fn from_pairs<I, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (u64, V)>,
        V: Into<String>,
    {
        let by_gene = pairs
            .into_iter()
            .map(|(id, kegg)| (id, kegg.into()))
            .collect();
        Self { by_gene }
    }

    /// Loads a KEGG REST `conv` table (`ncbi-geneid:<id>\t<org>:<gene>`, in
    /// either column order).
    pub fn from_kegg_conv(path: &Utf8Path, species: &Species) -> Result<Self, KiraError> {
        let init_err = |message: String| KiraError::MapperInit {
            mapper: "gene id to KEGG",
            species: species.organism_code.clone(),
            message,
        };
        let reader = open_table(path).map_err(|err| init_err(format!("{path}: {err}")))?;

        let mut by_gene = HashMap::new();
        for line in reader.lines() {
            let line = line.map_err(|err| init_err(format!("{path}: {err}")))?;
            if line.trim().is_empty() {
                continue;
            }
            let Some((left, right)) = line.split_once('\t') else {
                return Err(init_err(format!("{path}: malformed row '{line}'")));
            };
            let (ncbi, kegg) = if left.starts_with("ncbi-geneid:") {
                (left, right)
            } else {
                (right, left)
            };
            let Some(gene_id) = ncbi
                .strip_prefix("ncbi-geneid:")
                .and_then(|id| id.trim().parse::<u64>().ok())
            else {
                return Err(init_err(format!("{path}: malformed row '{line}'")));
            };
            by_gene.insert(gene_id, kegg.trim().to_string());
        }

        info!(table = %path, species = %species.organism_code, genes = by_gene.len(), "loaded gene id to KEGG table");
        Ok(Self { by_gene })
    }

    pub fn len(&self) -> usize {
        self.by_gene.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_gene.is_empty()
    }
}

impl GeneIdToKegg for KeggGeneTable {
    /// A hit for another organism means the table was loaded for the wrong
    /// species; that is a lookup failure, not a miss.
    fn map(&self, gene_id: u64, species: &Species) -> Result<Option<String>, KiraError> {
        let Some(kegg_id) = self.by_gene.get(&gene_id) else {
            debug!(gene_id, species = %species.organism_code, "no KEGG id for gene");
            return Ok(None);
        };
        match kegg_id.split_once(':') {
            Some((organism, _)) if organism != species.organism_code => {
                Err(KiraError::MappingLookup(format!(
                    "gene {gene_id} maps to {kegg_id}, not an {} gene",
                    species.organism_code
                )))
            }
            _ => Ok(Some(kegg_id.clone())),
        }
    }
}

/// Loads both lookup tables for a run. Any failure here is fatal for the
/// run, before a single pathway is processed.
pub fn load_tables(
    gene_symbols: &Utf8Path,
    gene_ids: &Utf8Path,
    species: &Species,
) -> Result<(SymbolTable, KeggGeneTable), KiraError> {
    let symbols = SymbolTable::from_gene_info(gene_symbols, species)?;
    let genes = KeggGeneTable::from_kegg_conv(gene_ids, species)?;
    Ok((symbols, genes))
}

fn normalize_symbol(symbol: &str) -> String {
    symbol.trim().to_uppercase()
}

fn open_table(path: &Utf8Path) -> std::io::Result<Box<dyn BufRead>> {
    let file = File::open(path.as_std_path())?;
    if path.extension() == Some("gz") {
        Ok(Box::new(BufReader::new(GzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbol_lookup_ignores_case() {
        let table = SymbolTable::from_pairs([("BRCA1", 672)]);
        assert_eq!(table.map("brca1").unwrap(), Some(672));
        assert_eq!(table.map("BRCA2").unwrap(), None);
    }

    #[test]
    fn kegg_lookup_by_gene_id() {
        let table = KeggGeneTable::from_pairs([(672, "hsa:672")]);
        let human = Species::human();
        assert_eq!(table.map(672, &human).unwrap().as_deref(), Some("hsa:672"));
        assert_eq!(table.map(1, &human).unwrap(), None);
    }
}
