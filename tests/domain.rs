use kira_pathway_translator::domain::{IdentifierBag, IdentifierDatabase, SchemaLevel, Species};

#[test]
fn builtin_species_table() {
    let codes = Species::builtin()
        .into_iter()
        .map(|species| species.organism_code)
        .collect::<Vec<_>>();
    assert_eq!(codes, ["hsa", "mmu", "rno", "efa"]);

    let efa: Species = "Enterococcus faecalis".parse().unwrap();
    assert_eq!(efa.taxon_id, 226185);
    assert_eq!(efa.common_name_suffix, "_ENTFA");
    assert_eq!(efa.to_string(), "Enterococcus faecalis (efa)");
}

#[test]
fn identifier_bag_reads_database_names() {
    let bag: IdentifierBag = serde_json::from_str(
        r#"{"KEGG_Compound": ["C00031"], "EntrezGene": ["7471", "7471"], "UniProt": []}"#,
    )
    .unwrap();
    assert!(bag.get(IdentifierDatabase::KeggCompound).unwrap().contains("C00031"));
    assert_eq!(bag.get(IdentifierDatabase::EntrezGene).unwrap().len(), 1);
    assert!(bag.get(IdentifierDatabase::UniProt).is_none());
    assert!(!bag.is_empty());
    assert!(IdentifierBag::new().is_empty());
}

#[test]
fn schema_level_labels() {
    assert_eq!(SchemaLevel::Level2.to_string(), "L2");
    assert_eq!(SchemaLevel::from_level(2).unwrap(), SchemaLevel::Level2);
}
