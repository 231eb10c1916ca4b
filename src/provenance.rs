use serde::Serialize;

/// A data-source record of either BioPAX level: a set of names and a set of
/// comments, in the order the model lists them.
pub trait ProvenanceRecord {
    fn names(&self) -> &[String];
    fn comments(&self) -> &[String];
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SourceProvenance {
    pub source_label: String,
    pub link: String,
}

/// Folds data-source records into one label/link pair. Each field is taken
/// from the last record whose corresponding set is non-empty; missing data
/// leaves the field empty.
pub fn extract_provenance<'a, R, I>(records: I) -> SourceProvenance
where
    R: ProvenanceRecord + 'a,
    I: IntoIterator<Item = &'a R>,
{
    let mut provenance = SourceProvenance::default();
    for record in records {
        if let Some(name) = record.names().first() {
            provenance.source_label = name.clone();
        }
        if let Some(comment) = record.comments().first() {
            provenance.link = comment.clone();
        }
    }
    provenance
}
