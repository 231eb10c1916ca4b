use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::KiraError;

/// Organism a conversion run targets. Supplied by the caller and never
/// mutated by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Species {
    pub scientific_name: String,
    pub common_name_suffix: String,
    pub common_name: String,
    pub organism_code: String,
    pub taxon_id: u32,
}

impl Species {
    pub fn new(
        scientific_name: &str,
        common_name_suffix: &str,
        common_name: &str,
        organism_code: &str,
        taxon_id: u32,
    ) -> Self {
        Self {
            scientific_name: scientific_name.to_string(),
            common_name_suffix: common_name_suffix.to_string(),
            common_name: common_name.to_string(),
            organism_code: organism_code.to_string(),
            taxon_id,
        }
    }

    pub fn builtin() -> Vec<Species> {
        vec![
            Species::new("Homo sapiens", "_HUMAN", "Human", "hsa", 9606),
            Species::new("Mus musculus", "_MOUSE", "Mouse", "mmu", 10090),
            Species::new("Rattus norvegicus", "_RAT", "Rat", "rno", 10116),
            Species::new(
                "Enterococcus faecalis",
                "_ENTFA",
                "Enterococcus",
                "efa",
                226185,
            ),
        ]
    }

    pub fn human() -> Species {
        Species::new("Homo sapiens", "_HUMAN", "Human", "hsa", 9606)
    }

    pub fn code(&self) -> &str {
        &self.organism_code
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.scientific_name, self.organism_code)
    }
}

impl FromStr for Species {
    type Err = KiraError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let query = value.trim();
        let taxon = query.parse::<u32>().ok();
        Species::builtin()
            .into_iter()
            .find(|species| {
                species.organism_code.eq_ignore_ascii_case(query)
                    || species.common_name.eq_ignore_ascii_case(query)
                    || species.scientific_name.eq_ignore_ascii_case(query)
                    || Some(species.taxon_id) == taxon
            })
            .ok_or_else(|| KiraError::UnknownSpecies(value.to_string()))
    }
}

/// External databases an entity may carry cross references for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum IdentifierDatabase {
    #[serde(rename = "KEGG_Compound")]
    KeggCompound,
    #[serde(rename = "KEGG_Drug")]
    KeggDrug,
    #[serde(rename = "KEGG_Genes")]
    KeggGenes,
    #[serde(rename = "KEGG_Glycan")]
    KeggGlycan,
    #[serde(rename = "KEGG_Orthology")]
    KeggOrthology,
    EntrezGene,
    GeneSymbol,
    UniProt,
    ChEBI,
}

impl IdentifierDatabase {
    /// Databases whose identifiers are already KEGG identifiers.
    pub const KEGG: [IdentifierDatabase; 5] = [
        IdentifierDatabase::KeggCompound,
        IdentifierDatabase::KeggDrug,
        IdentifierDatabase::KeggGenes,
        IdentifierDatabase::KeggGlycan,
        IdentifierDatabase::KeggOrthology,
    ];
}

/// Cross references of one source entity, grouped by database. Set
/// semantics: duplicates collapse and order is irrelevant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentifierBag(BTreeMap<IdentifierDatabase, BTreeSet<String>>);

impl IdentifierBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, database: IdentifierDatabase, id: impl Into<String>) {
        self.0.entry(database).or_default().insert(id.into());
    }

    pub fn with(mut self, database: IdentifierDatabase, id: impl Into<String>) -> Self {
        self.insert(database, id);
        self
    }

    pub fn get(&self, database: IdentifierDatabase) -> Option<&BTreeSet<String>> {
        self.0.get(&database).filter(|ids| !ids.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.0.values().all(BTreeSet::is_empty)
    }
}

/// The two BioPAX levels the engine translates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SchemaLevel {
    Level2,
    Level3,
}

impl SchemaLevel {
    pub fn from_level(level: u8) -> Result<Self, KiraError> {
        match level {
            2 => Ok(SchemaLevel::Level2),
            3 => Ok(SchemaLevel::Level3),
            other => Err(KiraError::UnsupportedSchema(format!("L{other}"))),
        }
    }
}

impl fmt::Display for SchemaLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaLevel::Level2 => write!(f, "L2"),
            SchemaLevel::Level3 => write!(f, "L3"),
        }
    }
}
