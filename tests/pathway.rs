use kira_pathway_translator::counters::CounterRegistry;
use kira_pathway_translator::domain::Species;
use kira_pathway_translator::model::{DataSource, Level2Pathway, Level3Pathway, Provenance};
use kira_pathway_translator::pathway::{build_pathway_instance, pathway_number};
use kira_pathway_translator::provenance::{SourceProvenance, extract_provenance};

fn data_source(name: &[&str], comment: &[&str]) -> DataSource {
    DataSource {
        name: name.iter().map(|value| value.to_string()).collect(),
        comment: comment.iter().map(|value| value.to_string()).collect(),
    }
}

#[test]
fn pathway_number_prefers_record_suffix() {
    let mut counters = CounterRegistry::new();
    assert_eq!(pathway_number(Some("http://example.org/bp_9717"), &mut counters), 9717);
    assert_eq!(pathway_number(Some("http://example.org/bp"), &mut counters), 100_000);
    assert_eq!(pathway_number(Some("http://example.org/bp"), &mut counters), 100_001);
    assert_eq!(pathway_number(None, &mut counters), 100_002);
}

#[test]
fn provenance_takes_last_non_empty_per_field() {
    let records = vec![
        data_source(&["A"], &["link1"]),
        data_source(&[], &["link2"]),
    ];
    let provenance = extract_provenance(&records);
    assert_eq!(provenance.source_label, "A");
    assert_eq!(provenance.link, "link2");

    let records = vec![data_source(&["A"], &[]), data_source(&["B", "C"], &[])];
    let provenance = extract_provenance(&records);
    assert_eq!(provenance.source_label, "B");
    assert_eq!(provenance.link, "");

    let none: Vec<DataSource> = Vec::new();
    assert_eq!(extract_provenance(&none), SourceProvenance::default());
}

#[test]
fn instance_uses_provenance_and_element_name() {
    let element = Level2Pathway {
        rdf_id: Some("http://www.reactome.org/biopax#pathway_109581".to_string()),
        name: Some("Apoptosis".to_string()),
        data_source: vec![data_source(&["Reactome"], &["http://www.reactome.org"])],
        interactions: Vec::new(),
    };
    let mut counters = CounterRegistry::new();
    let pathway = build_pathway_instance(
        "exported",
        &element,
        &Species::human(),
        None,
        &mut counters,
    );

    assert_eq!(pathway.name, "Reactome109581");
    assert_eq!(pathway.number, 109581);
    assert_eq!(pathway.org, "hsa");
    assert_eq!(pathway.title, "Apoptosis");
    assert_eq!(pathway.comment, "exported");
    assert_eq!(pathway.origin_format, "BioPax");
    assert_eq!(pathway.link.as_deref(), Some("http://www.reactome.org"));
    assert_eq!(pathway.image, None);
    assert!(pathway.entries.is_empty());
}

#[test]
fn override_name_wins_unless_empty() {
    let element = Level3Pathway {
        rdf_id: Some("http://example.org/bp_12".to_string()),
        display_name: Some("element name".to_string()),
        data_source: vec![Provenance {
            name: vec!["Src".to_string()],
            comment: Vec::new(),
        }],
        ..Default::default()
    };
    let human = Species::human();
    let mut counters = CounterRegistry::new();

    let named = build_pathway_instance("", &element, &human, Some("X"), &mut counters);
    assert_eq!(named.title, "X");
    assert_eq!(named.name, "Src12");

    let fallback = build_pathway_instance("", &element, &human, Some(""), &mut counters);
    assert_eq!(fallback.title, "element name");
}

#[test]
fn nameless_element_is_titled_unknown() {
    let element = Level3Pathway::default();
    let mut counters = CounterRegistry::new();
    let pathway = build_pathway_instance("", &element, &Species::human(), None, &mut counters);

    assert_eq!(pathway.title, "unknown");
    assert_eq!(pathway.name, "100000");
    assert_eq!(pathway.link, None);
    assert_eq!(counters.next_unknown_name(), "unknown1");
}

#[test]
fn biocarta_pathways_link_to_their_diagram() {
    let element = Level3Pathway {
        rdf_id: Some("http://pid.nci.nih.gov/biopaxpid_9717".to_string()),
        display_name: Some("wntpathway".to_string()),
        data_source: vec![Provenance {
            name: vec!["BioCarta".to_string()],
            comment: Vec::new(),
        }],
        ..Default::default()
    };
    let mut counters = CounterRegistry::new();
    let pathway = build_pathway_instance("", &element, &Species::human(), None, &mut counters);

    assert_eq!(
        pathway.link.as_deref(),
        Some("http://www.biocarta.com/pathfiles/h_wntPathway.asp")
    );
    assert_eq!(
        pathway.image.as_deref(),
        Some("http://www.biocarta.com/pathfiles/h_wntPathway.gif")
    );
}
