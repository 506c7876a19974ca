//! Core schema model types.
//!
//! These types represent the VoID description of an endpoint as typed Rust
//! data. They are built once per generation run by the extractor, held only
//! in memory, and consumed once by the synthesizer; after extraction they
//! are never mutated.

use std::collections::HashMap;

use indexmap::IndexMap;

/// Ordered property map for one subject class: property IRI → target IRIs.
///
/// A target is either another subject-class IRI present in the enclosing
/// [`SchemaGraph`] (a cross-reference to another generated struct) or a
/// leaf IRI (an XSD datatype, or a class that was filtered out).
pub type PropertyTargets = IndexMap<String, Vec<String>>;

/// Normalized schema graph: subject class IRI → properties → targets.
///
/// Insertion order is first-seen order from the endpoint's result rows and
/// is preserved all the way into the synthesized source, so an unchanged
/// VoID description regenerates byte-identical output.
#[derive(Debug, Default, Clone)]
pub struct SchemaGraph {
    classes: IndexMap<String, PropertyTargets>,
}

impl SchemaGraph {
    /// Creates an empty schema graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Ensures an entry exists for `(subject, property)`, creating an empty
    /// target list if needed. Rows that carry no object information still
    /// declare the property itself.
    pub fn touch(&mut self, subject: &str, property: &str) {
        self.classes
            .entry(subject.to_owned())
            .or_default()
            .entry(property.to_owned())
            .or_default();
    }

    /// Appends an object-class target for `(subject, property)` unless that
    /// exact target is already recorded for the pair.
    pub fn record_class_target(&mut self, subject: &str, property: &str, object_class: &str) {
        let targets = self
            .classes
            .entry(subject.to_owned())
            .or_default()
            .entry(property.to_owned())
            .or_default();
        if !targets.iter().any(|t| t == object_class) {
            targets.push(object_class.to_owned());
        }
    }

    /// Appends an object-datatype target for `(subject, property)`.
    pub fn record_datatype_target(&mut self, subject: &str, property: &str, datatype: &str) {
        self.classes
            .entry(subject.to_owned())
            .or_default()
            .entry(property.to_owned())
            .or_default()
            .push(datatype.to_owned());
    }

    /// Returns true if `iri` is a subject class of this schema, i.e. a
    /// class the synthesizer will emit a struct for.
    #[must_use]
    pub fn contains_class(&self, iri: &str) -> bool {
        self.classes.contains_key(iri)
    }

    /// Returns the property map for a subject class, if present.
    #[must_use]
    pub fn properties(&self, subject: &str) -> Option<&PropertyTargets> {
        self.classes.get(subject)
    }

    /// Iterates subject classes in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyTargets)> {
        self.classes.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of subject classes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Returns true if no subject class was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

/// Mapping from IRI (class or property) → derived Rust identifier.
///
/// Entries are first-seen-wins: once an IRI has an identifier, rows seen
/// later never overwrite it, so row order cannot change the output.
#[derive(Debug, Default, Clone)]
pub struct LabelTable {
    identifiers: HashMap<String, String>,
}

impl LabelTable {
    /// Creates an empty label table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `identifier` for `iri` unless the IRI is already labeled.
    pub fn record(&mut self, iri: &str, identifier: String) {
        self.identifiers.entry(iri.to_owned()).or_insert(identifier);
    }

    /// Looks up the identifier derived for an IRI.
    #[must_use]
    pub fn identifier(&self, iri: &str) -> Option<&str> {
        self.identifiers.get(iri).map(String::as_str)
    }

    /// Returns true if the IRI already has an identifier.
    #[must_use]
    pub fn contains(&self, iri: &str) -> bool {
        self.identifiers.contains_key(iri)
    }
}

/// Vocabulary namespaces whose classes are never turned into structs.
///
/// These describe the dataset rather than its domain: OWL, RDF(S), VoID and
/// its extension vocabulary, SHACL, and the SPARQL service description.
pub const IGNORED_NAMESPACES: &[&str] = &[
    iris::OWL,
    iris::RDF,
    iris::RDFS,
    iris::VOID,
    iris::VOID_EXT,
    iris::SH,
    iris::SD,
];

/// Classes excluded from generation: the fixed vocabulary namespaces plus
/// caller-supplied class IRIs.
///
/// An excluded subject class is dropped from the [`SchemaGraph`] entirely.
/// It may still appear as a *target* of some property, where it degrades to
/// a leaf (raw-IRI) value.
#[derive(Debug, Default, Clone)]
pub struct IgnoreSet {
    classes: Vec<String>,
}

impl IgnoreSet {
    /// Builds an ignore set from caller-supplied class IRIs.
    #[must_use]
    pub fn new(classes: Vec<String>) -> Self {
        Self { classes }
    }

    /// Returns true if the class IRI is excluded, either by namespace or by
    /// explicit request.
    #[must_use]
    pub fn ignores(&self, iri: &str) -> bool {
        IGNORED_NAMESPACES.iter().any(|ns| iri.starts_with(ns))
            || self.classes.iter().any(|c| c == iri)
    }
}

/// Standard IRI constants used across the pipeline.
pub mod iris {
    /// OWL namespace.
    pub const OWL: &str = "http://www.w3.org/2002/07/owl#";
    /// RDF namespace.
    pub const RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
    /// RDFS namespace.
    pub const RDFS: &str = "http://www.w3.org/2000/01/rdf-schema#";
    /// XSD namespace — a property targeting any IRI under it degrades to a
    /// string-valued accessor.
    pub const XSD: &str = "http://www.w3.org/2001/XMLSchema#";
    /// SHACL namespace.
    pub const SH: &str = "http://www.w3.org/ns/shacl#";
    /// SPARQL service description namespace.
    pub const SD: &str = "http://www.w3.org/ns/sparql-service-description#";
    /// VoID namespace.
    pub const VOID: &str = "http://rdfs.org/ns/void#";
    /// VoID extension namespace (datatype partitions).
    pub const VOID_EXT: &str = "http://purl.org/query/voidext#";

    /// `rdfs:Resource` — default type of a hand-constructed entity.
    pub const RDFS_RESOURCE: &str = "http://www.w3.org/2000/01/rdf-schema#Resource";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_targets_deduplicate() {
        let mut schema = SchemaGraph::new();
        schema.record_class_target("ex:Protein", "ex:encodedBy", "ex:Gene");
        schema.record_class_target("ex:Protein", "ex:encodedBy", "ex:Gene");
        let targets = schema
            .properties("ex:Protein")
            .and_then(|props| props.get("ex:encodedBy"));
        assert_eq!(targets, Some(&vec!["ex:Gene".to_owned()]));
    }

    #[test]
    fn subject_order_is_first_seen() {
        let mut schema = SchemaGraph::new();
        schema.touch("ex:B", "ex:p");
        schema.touch("ex:A", "ex:p");
        schema.touch("ex:B", "ex:q");
        let order: Vec<&str> = schema.iter().map(|(iri, _)| iri).collect();
        assert_eq!(order, vec!["ex:B", "ex:A"]);
    }

    #[test]
    fn labels_are_first_seen_wins() {
        let mut labels = LabelTable::new();
        labels.record("ex:Protein", "Protein".to_owned());
        labels.record("ex:Protein", "ProteinRenamed".to_owned());
        assert_eq!(labels.identifier("ex:Protein"), Some("Protein"));
    }

    #[test]
    fn ignore_set_matches_namespaces_and_classes() {
        let ignore = IgnoreSet::new(vec!["http://example.org/Secret".to_owned()]);
        assert!(ignore.ignores("http://www.w3.org/2002/07/owl#Class"));
        assert!(ignore.ignores("http://rdfs.org/ns/void#Dataset"));
        assert!(ignore.ignores("http://example.org/Secret"));
        assert!(!ignore.ignores("http://example.org/Protein"));
    }
}
