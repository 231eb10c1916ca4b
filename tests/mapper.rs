use std::fs::File;
use std::io::Write;

use assert_matches::assert_matches;
use camino::{Utf8Path, Utf8PathBuf};
use flate2::Compression;
use flate2::write::GzEncoder;

use kira_pathway_translator::domain::Species;
use kira_pathway_translator::error::KiraError;
use kira_pathway_translator::mapper::{
    GeneIdToKegg, KeggGeneTable, SymbolTable, SymbolToGeneId, load_tables,
};

fn fixture(name: &str) -> Utf8PathBuf {
    Utf8PathBuf::from(format!("{}/tests/fixtures/{name}", env!("CARGO_MANIFEST_DIR")))
}

#[test]
fn gene_info_keeps_rows_of_the_species() {
    let human = Species::human();
    let table = SymbolTable::from_gene_info(&fixture("gene_info.tsv"), &human).unwrap();

    assert_eq!(table.map("BRCA1").unwrap(), Some(672));
    assert_eq!(table.map("brcc1").unwrap(), Some(672));
    assert_eq!(table.map("Wnt1").unwrap(), Some(7471));
    assert_eq!(table.map("HLA-DRB1").unwrap(), Some(3123));
    assert_eq!(table.map("Int-1").unwrap(), None);

    let mouse: Species = "mmu".parse().unwrap();
    let table = SymbolTable::from_gene_info(&fixture("gene_info.tsv"), &mouse).unwrap();
    assert_eq!(table.map("WNT1").unwrap(), Some(22408));
    assert_eq!(table.len(), 2);
}

#[test]
fn official_symbols_beat_synonyms() {
    let table = SymbolTable::from_gene_info(&fixture("gene_info.tsv"), &Species::human()).unwrap();
    assert_eq!(table.map("INT1").unwrap(), Some(9999));
}

#[test]
fn kegg_conv_accepts_either_column_order() {
    let human = Species::human();
    let table = KeggGeneTable::from_kegg_conv(&fixture("kegg_conv.tsv"), &human).unwrap();

    assert_eq!(table.len(), 3);
    assert_eq!(table.map(672, &human).unwrap().as_deref(), Some("hsa:672"));
    assert_eq!(table.map(8321, &human).unwrap().as_deref(), Some("hsa:8321"));
    assert_eq!(table.map(596, &human).unwrap(), None);
}

#[test]
fn gzipped_tables_are_decoded() {
    let temp = tempfile::tempdir().unwrap();
    let path = Utf8Path::from_path(temp.path()).unwrap().join("conv.tsv.gz");
    let mut encoder = GzEncoder::new(File::create(&path).unwrap(), Compression::default());
    encoder.write_all(b"ncbi-geneid:7471\thsa:7471\n").unwrap();
    encoder.finish().unwrap();

    let human = Species::human();
    let table = KeggGeneTable::from_kegg_conv(&path, &human).unwrap();
    assert_eq!(table.map(7471, &human).unwrap().as_deref(), Some("hsa:7471"));
}

#[test]
fn unusable_tables_fail_initialization() {
    let human = Species::human();
    let err = load_tables(
        Utf8Path::new("/nonexistent/gene_info.tsv"),
        &fixture("kegg_conv.tsv"),
        &human,
    )
    .unwrap_err();
    assert_matches!(err, KiraError::MapperInit { mapper: "gene symbol", .. });

    let temp = tempfile::tempdir().unwrap();
    let path = Utf8Path::from_path(temp.path()).unwrap().join("conv.tsv");
    std::fs::write(&path, "ncbi-geneid:abc\thsa:1\n").unwrap();
    let err = KeggGeneTable::from_kegg_conv(&path, &human).unwrap_err();
    assert_matches!(err, KiraError::MapperInit { species, .. } if species == "hsa");
}

#[test]
fn load_tables_from_fixtures() {
    let (symbols, genes) = load_tables(
        &fixture("gene_info.tsv"),
        &fixture("kegg_conv.tsv"),
        &Species::human(),
    )
    .unwrap();
    assert!(!symbols.is_empty());
    assert!(!genes.is_empty());
}

#[test]
fn kegg_table_of_another_organism_is_a_lookup_failure() {
    let table = KeggGeneTable::from_kegg_conv(&fixture("kegg_conv.tsv"), &Species::human()).unwrap();
    let mouse: Species = "mmu".parse().unwrap();

    assert_matches!(table.map(672, &mouse), Err(KiraError::MappingLookup(_)));
    assert_eq!(table.map(596, &mouse).unwrap(), None);
}
