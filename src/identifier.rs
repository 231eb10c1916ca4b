//! Resolution of multi-database cross references into one KEGG name.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::counters::CounterRegistry;
use crate::domain::{IdentifierBag, IdentifierDatabase, Species};
use crate::mapper::{GeneIdToKegg, SymbolToGeneId};

/// Rewrites tried, in order, when a gene symbol has no direct mapping. Each
/// applies only if the current candidate contains the character, so a symbol
/// is looked up at most three times.
const SYMBOL_MUTATIONS: [(char, &str); 2] = [('-', ""), (' ', "_")];

static KEGG_PREFIXES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        (r"^C\d{5}$", "cpd:"),
        (r"^D\d{5}$", "dr:"),
        (r"^G\d{5}$", "gl:"),
        (r"^K\d{5}$", "ko:"),
        (r"^R\d{5}$", "rn:"),
        (r"^\d+\.(\d+|-)\.(\d+|-)\.(\d+|-)$", "ec:"),
        (r"^(map|ko|ec|rn|[a-z]{3,4})\d{5}$", "path:"),
    ]
    .into_iter()
    .map(|(pattern, prefix)| (Regex::new(pattern).expect("valid KEGG prefix pattern"), prefix))
    .collect()
});

/// Prepends the KEGG database prefix matching the shape of `id`. Anything
/// unrecognised, including bare gene numbers, is treated as a gene of the
/// species.
pub fn append_kegg_prefix(id: &str, species: &Species) -> String {
    let id = id.trim();
    if id.contains(':') {
        return id.to_string();
    }
    let upper = id.to_uppercase();
    for (pattern, prefix) in KEGG_PREFIXES.iter() {
        if *prefix == "path:" {
            if pattern.is_match(id) {
                return format!("{prefix}{id}");
            }
        } else if pattern.is_match(&upper) {
            return format!("{prefix}{upper}");
        }
    }
    format!("{}:{id}", species.organism_code)
}

/// Outcome of resolving one entity. Placeholders are unique only within the
/// run that drew them and never identify anything outside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedName {
    Kegg(String),
    Placeholder(String),
}

impl ResolvedName {
    pub fn as_str(&self) -> &str {
        match self {
            ResolvedName::Kegg(name) | ResolvedName::Placeholder(name) => name,
        }
    }

    pub fn into_string(self) -> String {
        match self {
            ResolvedName::Kegg(name) | ResolvedName::Placeholder(name) => name,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, ResolvedName::Placeholder(_))
    }
}

pub struct IdentifierResolver<'a, S, G> {
    symbols: &'a S,
    genes: &'a G,
}

impl<'a, S: SymbolToGeneId, G: GeneIdToKegg> IdentifierResolver<'a, S, G> {
    pub fn new(symbols: &'a S, genes: &'a G) -> Self {
        Self { symbols, genes }
    }

    /// Resolves the cross references of one entity into a space-joined list of
    /// prefixed KEGG identifiers, in insertion order. Entities without any
    /// usable identifier get a fresh `unknown<N>` placeholder.
    pub fn resolve_kegg_name(
        &self,
        identifiers: &IdentifierBag,
        species: &Species,
        counters: &mut CounterRegistry,
    ) -> String {
        self.resolve(identifiers, species, counters).into_string()
    }

    /// Same as [`Self::resolve_kegg_name`], keeping track of whether the name
    /// is a run-local placeholder.
    pub fn resolve(
        &self,
        identifiers: &IdentifierBag,
        species: &Species,
        counters: &mut CounterRegistry,
    ) -> ResolvedName {
        let mut ids = Vec::new();
        for database in IdentifierDatabase::KEGG {
            for id in identifiers.get(database).into_iter().flatten() {
                push_unique(&mut ids, id.trim().to_string());
            }
        }

        let gene_ids = match identifiers.get(IdentifierDatabase::EntrezGene) {
            Some(gene_ids) => gene_ids.iter().cloned().collect::<Vec<_>>(),
            None => identifiers
                .get(IdentifierDatabase::GeneSymbol)
                .and_then(|symbols| {
                    self.resolve_gene_id_for_symbols(symbols.iter().map(String::as_str))
                })
                .filter(|gene_id| *gene_id > 0)
                .map(|gene_id| vec![gene_id.to_string()])
                .unwrap_or_default(),
        };

        for gene_id in gene_ids {
            match gene_id.trim().parse::<u64>() {
                Ok(gene_id) => push_unique(&mut ids, self.map_gene_id_to_kegg(gene_id, species)),
                Err(_) => debug!(gene_id = %gene_id, "skipping non-numeric gene id"),
            }
        }

        let mut prefixed = Vec::with_capacity(ids.len());
        for id in ids.into_iter().filter(|id| !id.is_empty()) {
            push_unique(&mut prefixed, append_kegg_prefix(&id, species));
        }

        if prefixed.is_empty() {
            ResolvedName::Placeholder(counters.next_unknown_name())
        } else {
            ResolvedName::Kegg(prefixed.join(" "))
        }
    }

    /// Maps the first resolvable symbol to a gene id, retrying each symbol
    /// with hyphens removed and then spaces replaced by underscores. `None`
    /// is a normal outcome, not an error.
    pub fn resolve_gene_id_for_symbols<'s>(
        &self,
        symbols: impl IntoIterator<Item = &'s str>,
    ) -> Option<u64> {
        for symbol in symbols {
            let mut candidate = symbol.to_string();
            if let Some(gene_id) = self.lookup_symbol(&candidate) {
                return Some(gene_id);
            }
            for (needle, replacement) in SYMBOL_MUTATIONS {
                if !candidate.contains(needle) {
                    continue;
                }
                candidate = candidate.replace(needle, replacement);
                if let Some(gene_id) = self.lookup_symbol(&candidate) {
                    debug!(symbol, candidate = %candidate, gene_id, "gene symbol resolved after rewrite");
                    return Some(gene_id);
                }
            }
            debug!(symbol, "gene symbol not found");
        }
        None
    }

    /// Falls back to `<organism>:<gene id>` when the gene has no KEGG mapping
    /// or the lookup fails.
    pub fn map_gene_id_to_kegg(&self, gene_id: u64, species: &Species) -> String {
        match self.genes.map(gene_id, species) {
            Ok(Some(kegg_id)) => kegg_id,
            Ok(None) => format!("{}:{gene_id}", species.organism_code),
            Err(err) => {
                warn!(
                    gene_id,
                    species = %species.organism_code,
                    error = %err,
                    "could not map gene id to a KEGG id, using organism:gene id instead"
                );
                format!("{}:{gene_id}", species.organism_code)
            }
        }
    }

    fn lookup_symbol(&self, symbol: &str) -> Option<u64> {
        match self.symbols.map(symbol) {
            Ok(found) => found,
            Err(err) => {
                warn!(symbol, error = %err, "error while mapping gene symbol");
                None
            }
        }
    }
}

fn push_unique(ids: &mut Vec<String>, id: String) {
    if !ids.contains(&id) {
        ids.push(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixes_by_identifier_shape() {
        let human = Species::human();
        assert_eq!(append_kegg_prefix("C00031", &human), "cpd:C00031");
        assert_eq!(append_kegg_prefix("d00123", &human), "dr:D00123");
        assert_eq!(append_kegg_prefix("G00001", &human), "gl:G00001");
        assert_eq!(append_kegg_prefix("K04371", &human), "ko:K04371");
        assert_eq!(append_kegg_prefix("2.7.11.24", &human), "ec:2.7.11.24");
        assert_eq!(append_kegg_prefix("hsa04010", &human), "path:hsa04010");
        assert_eq!(append_kegg_prefix("5594", &human), "hsa:5594");
        assert_eq!(append_kegg_prefix("cpd:C00031", &human), "cpd:C00031");
    }
}
