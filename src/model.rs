//! Already-parsed BioPAX models, as handed over by the OWL reader.

use std::fs;

use camino::Utf8Path;
use serde::{Deserialize, Serialize};

use crate::domain::{IdentifierBag, SchemaLevel};
use crate::error::KiraError;
use crate::provenance::{ProvenanceRecord, SourceProvenance, extract_provenance};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Protein,
    Dna,
    Rna,
    SmallMolecule,
    Complex,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceEntity {
    pub kind: EntityKind,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub xrefs: IdentifierBag,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionKind {
    Conversion,
    Control,
    MolecularInteraction,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceInteraction {
    pub kind: InteractionKind,
    #[serde(default)]
    pub left: Vec<SourceEntity>,
    #[serde(default)]
    pub right: Vec<SourceEntity>,
    #[serde(default)]
    pub subtype: Option<String>,
    #[serde(default)]
    pub reversible: bool,
}

/// `dataSource` of a level 2 pathway.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataSource {
    #[serde(default)]
    pub name: Vec<String>,
    #[serde(default)]
    pub comment: Vec<String>,
}

impl ProvenanceRecord for DataSource {
    fn names(&self) -> &[String] {
        &self.name
    }

    fn comments(&self) -> &[String] {
        &self.comment
    }
}

/// `Provenance` of a level 3 pathway.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Provenance {
    #[serde(default)]
    pub name: Vec<String>,
    #[serde(default)]
    pub comment: Vec<String>,
}

impl ProvenanceRecord for Provenance {
    fn names(&self) -> &[String] {
        &self.name
    }

    fn comments(&self) -> &[String] {
        &self.comment
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Level2Pathway {
    #[serde(default)]
    pub rdf_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub data_source: Vec<DataSource>,
    #[serde(default)]
    pub interactions: Vec<SourceInteraction>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Level3Pathway {
    #[serde(default)]
    pub rdf_id: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub standard_name: Option<String>,
    #[serde(default)]
    pub names: Vec<String>,
    #[serde(default)]
    pub data_source: Vec<Provenance>,
    #[serde(default)]
    pub interactions: Vec<SourceInteraction>,
}

pub trait PathwayNameExtractor {
    fn pathway_name(&self) -> Option<String>;
}

pub trait ProvenanceExtractor {
    fn source_provenance(&self) -> SourceProvenance;
}

/// What the translator needs from a pathway element, independent of the
/// BioPAX level it came from.
pub trait PathwayElement: PathwayNameExtractor + ProvenanceExtractor {
    /// Stable record identifier (the RDF id), when the element has one.
    fn record_id(&self) -> Option<&str>;
    fn interactions(&self) -> &[SourceInteraction];
}

impl PathwayNameExtractor for Level2Pathway {
    fn pathway_name(&self) -> Option<String> {
        self.name.clone().filter(|name| !name.is_empty())
    }
}

impl ProvenanceExtractor for Level2Pathway {
    fn source_provenance(&self) -> SourceProvenance {
        extract_provenance(&self.data_source)
    }
}

impl PathwayElement for Level2Pathway {
    fn record_id(&self) -> Option<&str> {
        self.rdf_id.as_deref()
    }

    fn interactions(&self) -> &[SourceInteraction] {
        &self.interactions
    }
}

impl PathwayNameExtractor for Level3Pathway {
    fn pathway_name(&self) -> Option<String> {
        self.display_name
            .clone()
            .filter(|name| !name.is_empty())
            .or_else(|| self.standard_name.clone().filter(|name| !name.is_empty()))
            .or_else(|| name_without_blanks(&self.names))
    }
}

impl ProvenanceExtractor for Level3Pathway {
    fn source_provenance(&self) -> SourceProvenance {
        extract_provenance(&self.data_source)
    }
}

impl PathwayElement for Level3Pathway {
    fn record_id(&self) -> Option<&str> {
        self.rdf_id.as_deref()
    }

    fn interactions(&self) -> &[SourceInteraction] {
        &self.interactions
    }
}

/// Prefers the last blank-free name (the first entry is usually the long
/// form), falling back to the first name.
pub fn name_without_blanks(names: &[String]) -> Option<String> {
    names
        .iter()
        .skip(1)
        .rev()
        .find(|name| !name.is_empty() && !name.contains(' '))
        .or_else(|| names.first())
        .filter(|name| !name.is_empty())
        .cloned()
}

/// A whole model folded into a single pathway element.
#[derive(Debug, Clone)]
pub struct MergedPathway {
    provenance: SourceProvenance,
    interactions: Vec<SourceInteraction>,
}

impl MergedPathway {
    pub fn from_elements<'a, P, I>(elements: I) -> Self
    where
        P: PathwayElement + ?Sized + 'a,
        I: IntoIterator<Item = &'a P>,
    {
        let mut provenance = SourceProvenance::default();
        let mut interactions = Vec::new();
        for element in elements {
            let current = element.source_provenance();
            if !current.source_label.is_empty() {
                provenance.source_label = current.source_label;
            }
            if !current.link.is_empty() {
                provenance.link = current.link;
            }
            interactions.extend(element.interactions().iter().cloned());
        }
        Self {
            provenance,
            interactions,
        }
    }
}

impl PathwayNameExtractor for MergedPathway {
    fn pathway_name(&self) -> Option<String> {
        None
    }
}

impl ProvenanceExtractor for MergedPathway {
    fn source_provenance(&self) -> SourceProvenance {
        self.provenance.clone()
    }
}

impl PathwayElement for MergedPathway {
    fn record_id(&self) -> Option<&str> {
        None
    }

    fn interactions(&self) -> &[SourceInteraction] {
        &self.interactions
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SchemaPathways {
    Level2(Vec<Level2Pathway>),
    Level3(Vec<Level3Pathway>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PathwayModel {
    /// Leading text of the source document, used to recover its comment.
    pub header: String,
    pub pathways: SchemaPathways,
}

#[derive(Debug, Deserialize)]
struct RawModel {
    level: u8,
    #[serde(default)]
    header: String,
    #[serde(default)]
    pathways: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathwaySummary {
    pub record_id: Option<String>,
    pub name: Option<String>,
}

impl PathwayModel {
    pub fn level(&self) -> SchemaLevel {
        match self.pathways {
            SchemaPathways::Level2(_) => SchemaLevel::Level2,
            SchemaPathways::Level3(_) => SchemaLevel::Level3,
        }
    }

    pub fn from_json_file(path: &Utf8Path) -> Result<Self, KiraError> {
        let content = fs::read_to_string(path.as_std_path()).map_err(|err| {
            KiraError::ModelUnavailable {
                path: path.to_string(),
                message: err.to_string(),
            }
        })?;
        Self::from_json_str(&content, path.as_str())
    }

    /// Parses a model; levels other than 2 and 3 are rejected.
    pub fn from_json_str(content: &str, origin: &str) -> Result<Self, KiraError> {
        let unavailable = |message: String| KiraError::ModelUnavailable {
            path: origin.to_string(),
            message,
        };
        let raw: RawModel =
            serde_json::from_str(content).map_err(|err| unavailable(err.to_string()))?;
        let pathways = match SchemaLevel::from_level(raw.level)? {
            SchemaLevel::Level2 => SchemaPathways::Level2(
                parse_pathways(raw.pathways).map_err(|err| unavailable(err.to_string()))?,
            ),
            SchemaLevel::Level3 => SchemaPathways::Level3(
                parse_pathways(raw.pathways).map_err(|err| unavailable(err.to_string()))?,
            ),
        };
        Ok(Self {
            header: raw.header,
            pathways,
        })
    }

    /// Pathway elements of either level behind the level-independent view.
    pub fn elements(&self) -> Vec<&dyn PathwayElement> {
        match &self.pathways {
            SchemaPathways::Level2(pathways) => pathways
                .iter()
                .map(|pathway| pathway as &dyn PathwayElement)
                .collect(),
            SchemaPathways::Level3(pathways) => pathways
                .iter()
                .map(|pathway| pathway as &dyn PathwayElement)
                .collect(),
        }
    }

    pub fn summaries(&self) -> Vec<PathwaySummary> {
        self.elements()
            .into_iter()
            .map(|pathway| PathwaySummary {
                record_id: pathway.record_id().map(str::to_string),
                name: pathway.pathway_name(),
            })
            .collect()
    }
}

fn parse_pathways<T: for<'de> Deserialize<'de>>(
    values: Vec<serde_json::Value>,
) -> Result<Vec<T>, serde_json::Error> {
    values.into_iter().map(serde_json::from_value).collect()
}
