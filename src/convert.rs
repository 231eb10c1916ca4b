use std::sync::LazyLock;

use camino::Utf8Path;
use regex::Regex;
use serde::Serialize;
use tracing::{debug, info};

use crate::counters::CounterRegistry;
use crate::domain::Species;
use crate::error::KiraError;
use crate::graph::{AugmentationTally, PathwayGraphBuilder};
use crate::identifier::IdentifierResolver;
use crate::kgml::KeggPathway;
use crate::mapper::{GeneIdToKegg, SymbolToGeneId};
use crate::model::{MergedPathway, PathwayElement, PathwayModel};
use crate::pathway::build_pathway_instance;

static RDFS_COMMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<rdfs:comment.*?">(.*?)</rdfs:comment>"#).expect("valid rdfs:comment pattern")
});

/// Inner text of the first `<rdfs:comment ...">...</rdfs:comment>` line, or
/// an empty string.
pub fn extract_rdfs_comment(document: &str) -> String {
    document
        .lines()
        .find_map(|line| RDFS_COMMENT.captures(line))
        .and_then(|captures| captures.get(1))
        .map(|inner| inner.as_str().to_string())
        .unwrap_or_default()
}

/// File name without directory and extension, used as the pathway name in
/// single mode.
pub fn model_base_name(path: &Utf8Path) -> String {
    path.file_stem().unwrap_or(path.as_str()).to_string()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConversionOptions {
    /// Merge the whole model into one pathway instead of one per element.
    pub single_mode: bool,
    /// Handed to the writer untouched.
    pub write_entry_extended: bool,
    pub augment_original_pathway: bool,
    pub add_self_reactions: bool,
}

/// One conversion run: owns the run-scoped counters and the augmentation
/// tally, so every run needs its own converter.
pub struct Converter<S: SymbolToGeneId, G: GeneIdToKegg> {
    symbols: S,
    genes: G,
    species: Species,
    options: ConversionOptions,
    counters: CounterRegistry,
    tally: AugmentationTally,
}

impl<S: SymbolToGeneId, G: GeneIdToKegg> Converter<S, G> {
    pub fn new(symbols: S, genes: G, species: Species, options: ConversionOptions) -> Self {
        Self {
            symbols,
            genes,
            species,
            options,
            counters: CounterRegistry::new(),
            tally: AugmentationTally::default(),
        }
    }

    pub fn options(&self) -> ConversionOptions {
        self.options
    }

    pub fn species(&self) -> &Species {
        &self.species
    }

    pub fn tally(&self) -> AugmentationTally {
        self.tally
    }

    /// Lazily translates a model: one pathway per element, or a single
    /// pathway named `base_name` in single mode. Consuming the sequence again
    /// means calling this again, which draws fresh counter values.
    pub fn translate<'c>(
        &'c mut self,
        model: &'c PathwayModel,
        base_name: &str,
    ) -> Result<Translation<'c, S, G>, KiraError> {
        if self.options.augment_original_pathway {
            return Err(KiraError::MissingAugmentTarget);
        }
        let comment = extract_rdfs_comment(&model.header);
        let elements = model.elements();
        info!(
            level = %model.level(),
            pathways = elements.len(),
            single_mode = self.options.single_mode,
            "translating model"
        );

        let units = if self.options.single_mode {
            Units::Merged {
                merged: Some(MergedPathway::from_elements(elements)),
                name: base_name.to_string(),
            }
        } else {
            Units::Elements(elements.into_iter())
        };
        Ok(Translation {
            converter: self,
            comment,
            units,
        })
    }

    /// Translates only the pathway whose name (case-insensitive) or record id
    /// equals `name`.
    pub fn translate_named(
        &mut self,
        model: &PathwayModel,
        name: &str,
    ) -> Result<KeggPathway, KiraError> {
        let comment = extract_rdfs_comment(&model.header);
        let element = model
            .elements()
            .into_iter()
            .find(|element| {
                element
                    .pathway_name()
                    .is_some_and(|candidate| candidate.eq_ignore_ascii_case(name))
                    || element.record_id() == Some(name)
            })
            .ok_or_else(|| KiraError::PathwayNotFound(name.to_string()))?;
        Ok(self.translate_element(element, &comment, None))
    }

    /// Adds the model's relations to `target`; no entries or reactions are
    /// created. Returns the run's tally so far.
    pub fn augment(
        &mut self,
        model: &PathwayModel,
        target: &mut KeggPathway,
    ) -> Result<AugmentationTally, KiraError> {
        if !self.options.augment_original_pathway {
            debug!("augment called without augment mode, enabling it for this run");
            self.options.augment_original_pathway = true;
        }
        let entries_before = target.entries.len();
        let resolver = IdentifierResolver::new(&self.symbols, &self.genes);
        let builder =
            PathwayGraphBuilder::new(resolver, &self.species, self.options.add_self_reactions);
        let elements = model.elements();

        if self.options.single_mode {
            let merged = MergedPathway::from_elements(elements);
            builder.augment(
                target,
                merged.interactions(),
                &mut self.counters,
                &mut self.tally,
            );
        } else {
            for element in elements {
                builder.augment(
                    target,
                    element.interactions(),
                    &mut self.counters,
                    &mut self.tally,
                );
            }
        }
        debug_assert_eq!(entries_before, target.entries.len());

        info!(
            pathway = %target.name,
            new_added_relations = self.tally.new_added_relations,
            self_relation = self.tally.self_relation,
            added_sub_types = self.tally.added_sub_types,
            "augmented pathway"
        );
        Ok(self.tally)
    }

    fn translate_element<P: PathwayElement + ?Sized>(
        &mut self,
        element: &P,
        comment: &str,
        override_name: Option<&str>,
    ) -> KeggPathway {
        let mut pathway = build_pathway_instance(
            comment,
            element,
            &self.species,
            override_name,
            &mut self.counters,
        );
        let resolver = IdentifierResolver::new(&self.symbols, &self.genes);
        let builder =
            PathwayGraphBuilder::new(resolver, &self.species, self.options.add_self_reactions);
        builder.populate(&mut pathway, element.interactions(), &mut self.counters);
        info!(
            pathway = %pathway.name,
            title = %pathway.title,
            entries = pathway.entries.len(),
            relations = pathway.relations.len(),
            reactions = pathway.reactions.len(),
            "translated pathway"
        );
        pathway
    }
}

enum Units<'c> {
    Elements(std::vec::IntoIter<&'c dyn PathwayElement>),
    Merged {
        merged: Option<MergedPathway>,
        name: String,
    },
}

/// Finite, single-pass sequence of translated pathways.
pub struct Translation<'c, S: SymbolToGeneId, G: GeneIdToKegg> {
    converter: &'c mut Converter<S, G>,
    comment: String,
    units: Units<'c>,
}

impl<S: SymbolToGeneId, G: GeneIdToKegg> Iterator for Translation<'_, S, G> {
    type Item = KeggPathway;

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.units {
            Units::Elements(elements) => {
                let element = elements.next()?;
                Some(self.converter.translate_element(element, &self.comment, None))
            }
            Units::Merged { merged, name } => {
                let merged = merged.take()?;
                Some(
                    self.converter
                        .translate_element(&merged, &self.comment, Some(name.as_str())),
                )
            }
        }
    }
}
