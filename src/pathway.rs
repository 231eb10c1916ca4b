use tracing::{debug, warn};

use crate::counters::{CounterRegistry, UNKNOWN_NAME};
use crate::domain::Species;
use crate::kgml::KeggPathway;
use crate::model::PathwayElement;

/// Parses the numeric suffix after the last underscore of a record id, e.g.
/// `http://pid.nci.nih.gov/biopaxpid_9717` yields `9717`.
pub fn extract_pathway_number(record_id: &str) -> Option<u32> {
    let (_, suffix) = record_id.rsplit_once('_')?;
    if suffix.is_empty() || !suffix.chars().all(|ch| ch.is_ascii_digit()) {
        return None;
    }
    suffix.parse().ok()
}

/// Number for a pathway element; never fails, elements without a usable
/// record id draw from the fallback counter.
pub fn pathway_number(record_id: Option<&str>, counters: &mut CounterRegistry) -> u32 {
    if let Some(number) = record_id.and_then(extract_pathway_number) {
        return number;
    }
    let number = counters.next_fallback_pathway_number();
    match record_id {
        Some(record_id) => {
            warn!(record_id, number, "no pathway number in record id, using fallback")
        }
        None => debug!(number, "pathway element without record id, using fallback number"),
    }
    number
}

/// Creates the target pathway for one source element. The title is
/// `override_name` when non-empty, else the element's own name, else
/// `unknown`.
pub fn build_pathway_instance<P: PathwayElement + ?Sized>(
    comment: &str,
    element: &P,
    species: &Species,
    override_name: Option<&str>,
    counters: &mut CounterRegistry,
) -> KeggPathway {
    let number = pathway_number(element.record_id(), counters);
    let provenance = element.source_provenance();
    let title = override_name
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .or_else(|| element.pathway_name())
        .unwrap_or_else(|| UNKNOWN_NAME.to_string());

    let mut pathway = KeggPathway::new(
        format!("{}{number}", provenance.source_label),
        &species.organism_code,
        number,
        title,
    );
    pathway.comment = comment.to_string();
    pathway.set_link(&provenance.link);

    if pathway.link.is_none() && provenance.source_label.to_lowercase().contains("biocarta") {
        if let Some((link, image)) = biocarta_links(&pathway.title, species) {
            pathway.link = Some(link);
            pathway.image = Some(image);
        }
    }
    pathway
}

/// Page and image of a BioCarta pathway diagram. Only human and mouse have
/// diagrams, and only names containing "pathway" can be linked.
pub fn biocarta_links(pathway_name: &str, species: &Species) -> Option<(String, String)> {
    if pathway_name.is_empty() || !pathway_name.contains("pathway") {
        return None;
    }
    let prefix = match species.organism_code.as_str() {
        "hsa" => "h",
        "mmu" => "m",
        _ => return None,
    };
    let link_name = pathway_name.replace("pathway", "Pathway");
    Some((
        format!("http://www.biocarta.com/pathfiles/{prefix}_{link_name}.asp"),
        format!("http://www.biocarta.com/pathfiles/{prefix}_{link_name}.gif"),
    ))
}
