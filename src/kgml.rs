//! KEGG-style pathway graph produced by the translation.

use std::fmt;

use serde::{Deserialize, Serialize};

pub const ORIGIN_FORMAT: &str = "BioPax";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    Gene,
    Compound,
    Group,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: u32,
    /// Space-separated KEGG identifiers, or an `unknown<N>` placeholder.
    pub name: String,
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub graphics_name: Option<String>,
}

impl Entry {
    pub fn shares_identifier_with(&self, name: &str) -> bool {
        name.split_whitespace()
            .any(|candidate| self.name.split_whitespace().any(|id| id == candidate))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RelationType {
    ECrel,
    PPrel,
    GErel,
    PCrel,
    #[serde(rename = "maplink")]
    Maplink,
}

impl fmt::Display for RelationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelationType::ECrel => write!(f, "ECrel"),
            RelationType::PPrel => write!(f, "PPrel"),
            RelationType::GErel => write!(f, "GErel"),
            RelationType::PCrel => write!(f, "PCrel"),
            RelationType::Maplink => write!(f, "maplink"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubType {
    pub name: String,
    pub value: String,
}

impl SubType {
    /// Builds a subtype with the KGML arrow notation for known names.
    pub fn named(name: &str) -> Self {
        let name = name.trim().to_lowercase();
        let value = match name.as_str() {
            "activation" | "expression" => "-->",
            "inhibition" | "repression" => "--|",
            "indirect effect" => "..>",
            "state change" => "...",
            "binding/association" => "---",
            "dissociation" => "-+-",
            "missing interaction" => "-/-",
            "phosphorylation" => "+p",
            "dephosphorylation" => "-p",
            "glycosylation" => "+g",
            "ubiquitination" => "+u",
            "methylation" => "+m",
            other => other,
        }
        .to_string();
        Self { name, value }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relation {
    pub entry1: u32,
    pub entry2: u32,
    #[serde(rename = "type")]
    pub relation_type: RelationType,
    #[serde(default)]
    pub subtypes: Vec<SubType>,
}

impl Relation {
    pub fn has_subtype(&self, name: &str) -> bool {
        self.subtypes.iter().any(|subtype| subtype.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reaction {
    pub name: String,
    pub reversible: bool,
    pub substrates: Vec<String>,
    pub products: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeggPathway {
    /// Source database label followed by the pathway number.
    pub name: String,
    pub org: String,
    pub number: u32,
    pub title: String,
    #[serde(default)]
    pub comment: String,
    pub origin_format: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub entries: Vec<Entry>,
    #[serde(default)]
    pub relations: Vec<Relation>,
    #[serde(default)]
    pub reactions: Vec<Reaction>,
}

impl KeggPathway {
    pub fn new(name: String, org: &str, number: u32, title: String) -> Self {
        Self {
            name,
            org: org.to_string(),
            number,
            title,
            comment: String::new(),
            origin_format: ORIGIN_FORMAT.to_string(),
            link: None,
            image: None,
            entries: Vec::new(),
            relations: Vec::new(),
            reactions: Vec::new(),
        }
    }

    pub fn set_link(&mut self, link: &str) {
        self.link = Some(link.to_string()).filter(|link| !link.is_empty());
    }

    pub fn entry_by_name(&self, name: &str) -> Option<&Entry> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    /// First entry sharing at least one identifier with `name`.
    pub fn entry_matching(&self, name: &str) -> Option<&Entry> {
        self.entries
            .iter()
            .find(|entry| entry.shares_identifier_with(name))
    }

    pub fn relation_mut(&mut self, entry1: u32, entry2: u32) -> Option<&mut Relation> {
        self.relations
            .iter_mut()
            .find(|relation| relation.entry1 == entry1 && relation.entry2 == entry2)
    }

    /// Source database label, i.e. the name without its trailing number.
    pub fn source_label(&self) -> &str {
        self.name
            .strip_suffix(&self.number.to_string())
            .unwrap_or(&self.name)
    }

    /// `<org><number>_<label>.json`, or `<org><number>.json` when the
    /// pathway has no source label. Label characters outside `[A-Za-z0-9-]`
    /// become `_`.
    pub fn file_name(&self) -> String {
        let label = self
            .source_label()
            .chars()
            .map(|ch| if ch.is_ascii_alphanumeric() || ch == '-' { ch } else { '_' })
            .collect::<String>();
        if label.is_empty() {
            format!("{}{:05}.json", self.org, self.number)
        } else {
            format!("{}{:05}_{label}.json", self.org, self.number)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subtype_arrow_notation() {
        assert_eq!(SubType::named("Activation").value, "-->");
        assert_eq!(SubType::named("inhibition").value, "--|");
        assert_eq!(SubType::named("custom").value, "custom");
    }

    #[test]
    fn entry_matches_on_any_shared_identifier() {
        let entry = Entry {
            id: 1,
            name: "hsa:5594 hsa:5595".to_string(),
            entry_type: EntryType::Gene,
            graphics_name: None,
        };
        assert!(entry.shares_identifier_with("hsa:5595"));
        assert!(entry.shares_identifier_with("ko:K04371 hsa:5594"));
        assert!(!entry.shares_identifier_with("hsa:1"));
    }

    #[test]
    fn empty_link_is_omitted() {
        let mut pathway = KeggPathway::new("BioCarta9717".to_string(), "hsa", 9717, "x".into());
        pathway.set_link("");
        assert_eq!(pathway.link, None);
        assert_eq!(pathway.file_name(), "hsa09717_BioCarta.json");
    }

    #[test]
    fn file_name_keeps_sources_apart() {
        let nci = KeggPathway::new("NCI-Nature Curated9717".to_string(), "hsa", 9717, "x".into());
        assert_eq!(nci.source_label(), "NCI-Nature Curated");
        assert_eq!(nci.file_name(), "hsa09717_NCI-Nature_Curated.json");

        let unlabelled = KeggPathway::new("100000".to_string(), "mmu", 100_000, "x".into());
        assert_eq!(unlabelled.source_label(), "");
        assert_eq!(unlabelled.file_name(), "mmu100000.json");
    }
}
