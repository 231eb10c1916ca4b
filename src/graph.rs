//! Entries, relations and reactions of a translated pathway.

use serde::Serialize;
use tracing::debug;

use crate::counters::CounterRegistry;
use crate::domain::Species;
use crate::identifier::IdentifierResolver;
use crate::kgml::{Entry, EntryType, KeggPathway, Reaction, Relation, RelationType, SubType};
use crate::mapper::{GeneIdToKegg, SymbolToGeneId};
use crate::model::{EntityKind, InteractionKind, SourceEntity, SourceInteraction};

/// Side effects of augment mode; counters only ever grow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AugmentationTally {
    pub new_added_relations: u32,
    pub self_relation: u32,
    pub added_sub_types: u32,
}

#[derive(Debug, Clone, Copy)]
struct Endpoint {
    id: u32,
    entry_type: EntryType,
}

pub struct PathwayGraphBuilder<'a, S, G> {
    resolver: IdentifierResolver<'a, S, G>,
    species: &'a Species,
    add_self_reactions: bool,
}

impl<'a, S: SymbolToGeneId, G: GeneIdToKegg> PathwayGraphBuilder<'a, S, G> {
    pub fn new(
        resolver: IdentifierResolver<'a, S, G>,
        species: &'a Species,
        add_self_reactions: bool,
    ) -> Self {
        Self {
            resolver,
            species,
            add_self_reactions,
        }
    }

    /// Adds entries, reactions and relations for `interactions` to a freshly
    /// built pathway.
    pub fn populate(
        &self,
        pathway: &mut KeggPathway,
        interactions: &[SourceInteraction],
        counters: &mut CounterRegistry,
    ) {
        for interaction in interactions {
            let left = self.entries_for(pathway, &interaction.left, counters);
            let right = self.entries_for(pathway, &interaction.right, counters);

            if interaction.kind == InteractionKind::Conversion {
                let reaction = Reaction {
                    name: counters.next_reaction_name(),
                    reversible: interaction.reversible,
                    substrates: entry_names(pathway, &left),
                    products: entry_names(pathway, &right),
                };
                pathway.reactions.push(reaction);
                continue;
            }

            for source in &left {
                for target in &right {
                    if source.id == target.id && !self.add_self_reactions {
                        debug!(entry = source.id, pathway = %pathway.name, "skipping self relation");
                        continue;
                    }
                    add_relation(pathway, *source, *target, interaction.subtype.as_deref());
                }
            }
        }
    }

    /// Adds relations and subtypes to an existing pathway without creating
    /// entries or reactions. Endpoints that match no existing entry drop the
    /// pair.
    pub fn augment(
        &self,
        target: &mut KeggPathway,
        interactions: &[SourceInteraction],
        counters: &mut CounterRegistry,
        tally: &mut AugmentationTally,
    ) {
        for interaction in interactions {
            if interaction.kind == InteractionKind::Conversion {
                debug!(pathway = %target.name, "conversions add no relations in augment mode");
                continue;
            }
            let left = self.matching_entries(target, &interaction.left, counters);
            let right = self.matching_entries(target, &interaction.right, counters);

            for source in &left {
                for other in &right {
                    if source.id == other.id {
                        tally.self_relation += 1;
                        if !self.add_self_reactions {
                            continue;
                        }
                    }
                    let subtype = interaction.subtype.as_deref().map(SubType::named);
                    match target.relation_mut(source.id, other.id) {
                        Some(relation) => {
                            if let Some(subtype) = subtype {
                                if !relation.has_subtype(&subtype.name) {
                                    relation.subtypes.push(subtype);
                                    tally.added_sub_types += 1;
                                }
                            }
                        }
                        None => {
                            let subtypes = subtype.into_iter().collect::<Vec<_>>();
                            tally.added_sub_types += subtypes.len() as u32;
                            tally.new_added_relations += 1;
                            target.relations.push(Relation {
                                entry1: source.id,
                                entry2: other.id,
                                relation_type: relation_type(source.entry_type, other.entry_type),
                                subtypes,
                            });
                        }
                    }
                }
            }
        }
    }

    fn entries_for(
        &self,
        pathway: &mut KeggPathway,
        participants: &[SourceEntity],
        counters: &mut CounterRegistry,
    ) -> Vec<Endpoint> {
        participants
            .iter()
            .map(|participant| {
                let name = self
                    .resolver
                    .resolve_kegg_name(&participant.xrefs, self.species, counters);
                if let Some(entry) = pathway.entry_by_name(&name) {
                    return Endpoint {
                        id: entry.id,
                        entry_type: entry.entry_type,
                    };
                }
                let entry = Entry {
                    id: counters.next_entry_id(),
                    name,
                    entry_type: entry_type(participant.kind),
                    graphics_name: participant.display_name.clone(),
                };
                let endpoint = Endpoint {
                    id: entry.id,
                    entry_type: entry.entry_type,
                };
                pathway.entries.push(entry);
                endpoint
            })
            .collect()
    }

    fn matching_entries(
        &self,
        pathway: &KeggPathway,
        participants: &[SourceEntity],
        counters: &mut CounterRegistry,
    ) -> Vec<Endpoint> {
        participants
            .iter()
            .filter_map(|participant| {
                let name = self
                    .resolver
                    .resolve(&participant.xrefs, self.species, counters);
                if name.is_placeholder() {
                    debug!(name = %name.as_str(), pathway = %pathway.name, "participant without identifiers matches no existing entry");
                    return None;
                }
                let found = pathway.entry_matching(name.as_str()).map(|entry| Endpoint {
                    id: entry.id,
                    entry_type: entry.entry_type,
                });
                if found.is_none() {
                    debug!(name = %name.as_str(), pathway = %pathway.name, "no existing entry for participant");
                }
                found
            })
            .collect()
    }
}

fn add_relation(pathway: &mut KeggPathway, source: Endpoint, target: Endpoint, subtype: Option<&str>) {
    let subtype = subtype.map(SubType::named);
    if let Some(relation) = pathway.relation_mut(source.id, target.id) {
        if let Some(subtype) = subtype {
            if !relation.has_subtype(&subtype.name) {
                relation.subtypes.push(subtype);
            }
        }
        return;
    }
    pathway.relations.push(Relation {
        entry1: source.id,
        entry2: target.id,
        relation_type: relation_type(source.entry_type, target.entry_type),
        subtypes: subtype.into_iter().collect(),
    });
}

fn entry_names(pathway: &KeggPathway, endpoints: &[Endpoint]) -> Vec<String> {
    endpoints
        .iter()
        .filter_map(|endpoint| {
            pathway
                .entries
                .iter()
                .find(|entry| entry.id == endpoint.id)
                .map(|entry| entry.name.clone())
        })
        .collect()
}

fn entry_type(kind: EntityKind) -> EntryType {
    match kind {
        EntityKind::Protein | EntityKind::Dna | EntityKind::Rna => EntryType::Gene,
        EntityKind::SmallMolecule => EntryType::Compound,
        EntityKind::Complex => EntryType::Group,
        EntityKind::Other => EntryType::Other,
    }
}

fn relation_type(source: EntryType, target: EntryType) -> RelationType {
    if source == EntryType::Compound || target == EntryType::Compound {
        RelationType::PCrel
    } else {
        RelationType::PPrel
    }
}
