//! Entity generation: RDF class → struct, property → lazy accessor.
//!
//! Walks the schema graph in first-seen order and emits one struct per
//! subject class. Every property becomes a memoized accessor over a
//! `OnceCell` slot; the slot type is chosen from the property's ordered
//! target list — raw strings, instances of one generated struct, or a
//! union enum with a raw-IRI fallback.

use std::collections::HashSet;
use std::fmt::Write as FmtWrite;

use indexmap::IndexMap;
use voidgen_schema::model::iris;
use voidgen_schema::{LabelTable, SchemaGraph};

use crate::emit::RustFile;
use crate::SynthesisError;

/// Synthesized module source plus what went into it.
#[derive(Debug)]
pub struct Synthesis {
    /// The generated `lib.rs` text.
    pub source: String,
    /// Number of entity structs emitted.
    pub struct_count: usize,
    /// Number of property accessors emitted.
    pub accessor_count: usize,
    /// Number of distinct union value enums emitted.
    pub union_count: usize,
}

/// Return shape of one property accessor, chosen from the ordered target
/// list.
enum AccessorShape<'a> {
    /// Raw lexical values of the predicate.
    Strings,
    /// Instances of one generated struct.
    Entity(&'a str),
    /// One of several candidate structs, with a raw-IRI fallback. Candidate
    /// order is target-list order.
    Union(Vec<&'a str>),
}

/// Picks the accessor shape for a property's targets.
///
/// Any XSD target (or no target at all) degrades the whole property to raw
/// strings — literal partitions carry no typing the generated code could
/// act on. A sole target that is a generated class gets a strict entity
/// accessor; several targets with at least one generated class get the
/// union treatment; anything else is strings again.
fn accessor_shape<'a>(schema: &SchemaGraph, targets: &'a [String]) -> AccessorShape<'a> {
    if targets.is_empty() || targets.iter().any(|t| t.starts_with(iris::XSD)) {
        return AccessorShape::Strings;
    }
    let candidates: Vec<&str> = targets
        .iter()
        .filter(|t| schema.contains_class(t))
        .map(String::as_str)
        .collect();
    match (targets.len(), candidates.as_slice()) {
        (1, &[single]) => AccessorShape::Entity(single),
        (_, []) => AccessorShape::Strings,
        _ => AccessorShape::Union(candidates),
    }
}

/// One property prepared for emission.
struct PreparedAccessor<'a> {
    property_iri: &'a str,
    slot: String,
    slot_type: String,
    shape: AccessorShape<'a>,
}

/// Synthesizes the generated module for `schema` against `endpoint_url`.
///
/// # Errors
///
/// [`SynthesisError::MissingLabel`] if an IRI in the graph has no entry in
/// `labels` — impossible when both came out of extraction together.
pub fn synthesize(
    schema: &SchemaGraph,
    labels: &LabelTable,
    endpoint_url: &str,
) -> Result<Synthesis, SynthesisError> {
    let mut f = RustFile::new(&format!(
        "Typed client for the SPARQL endpoint at <{endpoint_url}>.\n\nGenerated by voidgen from the endpoint's VoID description; do not edit."
    ));
    f.line("mod sparql;");
    f.blank();
    f.line("pub use sparql::{query_sparql, EntityError, SparqlEntity, SparqlResults, SPARQL_ENDPOINT};");
    f.blank();
    f.line("use once_cell::unsync::OnceCell;");
    f.blank();

    // union enum name → candidate struct identifiers, in first-need order
    let mut unions: IndexMap<String, Vec<String>> = IndexMap::new();
    let mut struct_count = 0;
    let mut accessor_count = 0;

    for (class_iri, properties) in schema.iter() {
        let struct_name = ident(labels, class_iri)?;
        let mut accessors = Vec::with_capacity(properties.len());
        // Field names the struct already uses; properties whose identifier
        // is taken get trailing underscores until unique.
        let mut taken: HashSet<String> =
            ["entity", "iri", "new"].map(str::to_owned).into_iter().collect();

        for (property_iri, targets) in properties {
            let shape = accessor_shape(schema, targets);
            let slot = claim_slot(&mut taken, ident(labels, property_iri)?);
            let slot_type = match &shape {
                AccessorShape::Strings => "String".to_owned(),
                AccessorShape::Entity(target) => ident(labels, target)?.to_owned(),
                AccessorShape::Union(candidates) => {
                    let variants: Vec<String> = candidates
                        .iter()
                        .map(|c| ident(labels, c).map(str::to_owned))
                        .collect::<Result<_, _>>()?;
                    let name = variants.join("Or");
                    unions.entry(name.clone()).or_insert(variants);
                    name
                }
            };
            accessors.push(PreparedAccessor {
                property_iri,
                slot,
                slot_type,
                shape,
            });
        }

        generate_struct(&mut f, class_iri, struct_name, &accessors);
        struct_count += 1;
        accessor_count += accessors.len();
    }

    for (name, variants) in &unions {
        generate_union(&mut f, name, variants);
    }

    Ok(Synthesis {
        source: f.finish(),
        struct_count,
        accessor_count,
        union_count: unions.len(),
    })
}

/// Looks up the identifier derived for an IRI during extraction.
fn ident<'a>(labels: &'a LabelTable, iri: &str) -> Result<&'a str, SynthesisError> {
    labels
        .identifier(iri)
        .ok_or_else(|| SynthesisError::MissingLabel {
            iri: iri.to_owned(),
        })
}

/// Reserves a unique field/method name within one struct.
fn claim_slot(taken: &mut HashSet<String>, base: &str) -> String {
    let mut name = base.to_owned();
    while !taken.insert(name.clone()) {
        name.push('_');
    }
    name
}

/// Emits one entity struct with its constructor and accessors.
fn generate_struct(
    f: &mut RustFile,
    class_iri: &str,
    struct_name: &str,
    accessors: &[PreparedAccessor<'_>],
) {
    f.doc_comment(&format!("`{class_iri}`"));
    f.line("#[derive(Debug)]");
    let _ = writeln!(f.buf, "pub struct {struct_name} {{");
    f.line("    entity: SparqlEntity,");
    for acc in accessors {
        let _ = writeln!(f.buf, "    {}: OnceCell<Vec<{}>>,", acc.slot, acc.slot_type);
    }
    f.line("}");
    f.blank();

    let _ = writeln!(f.buf, "impl {struct_name} {{");
    f.indented_doc_comment("IRI of the RDF class this struct was generated from.");
    let _ = writeln!(f.buf, "    pub const TYPE: &'static str = \"{class_iri}\";");
    f.blank();

    f.indented_doc_comment(
        "Binds `iri`, verifying a resource with this IRI and type exists\nat the endpoint.\n\n# Errors\n\nReturns [`EntityError::TypeMismatch`] when the endpoint knows no\nsuch resource; transport failures propagate.",
    );
    f.line("    pub fn new(iri: impl Into<String>) -> Result<Self, EntityError> {");
    f.line("        Ok(Self {");
    f.line("            entity: SparqlEntity::with_type(iri, Self::TYPE)?,");
    for acc in accessors {
        let _ = writeln!(f.buf, "            {}: OnceCell::new(),", acc.slot);
    }
    f.line("        })");
    f.line("    }");
    f.blank();

    f.indented_doc_comment("IRI of this resource.");
    f.line("    pub fn iri(&self) -> &str {");
    f.line("        self.entity.iri()");
    f.line("    }");

    for acc in accessors {
        f.blank();
        generate_accessor(f, acc);
    }
    f.line("}");
    f.blank();
}

/// Emits one lazy accessor. The slot is populated on first call and reused
/// afterwards; a populated-but-empty slot means the predicate was queried
/// and had no values.
fn generate_accessor(f: &mut RustFile, acc: &PreparedAccessor<'_>) {
    let PreparedAccessor {
        property_iri,
        slot,
        slot_type,
        shape,
    } = acc;
    match shape {
        AccessorShape::Strings => {
            f.indented_doc_comment(&format!(
                "Raw values of `{property_iri}`, fetched once on first access.\n\n# Errors\n\nReturns [`EntityError::NoValue`] when the lookup fails."
            ));
            let _ = writeln!(
                f.buf,
                "    pub fn {slot}(&self) -> Result<&[String], EntityError> {{"
            );
            let _ = writeln!(f.buf, "        self.{slot}");
            let _ = writeln!(
                f.buf,
                "            .get_or_try_init(|| self.entity.predicate_values(\"{property_iri}\"))"
            );
            f.line("            .map(Vec::as_slice)");
            f.line("    }");
        }
        AccessorShape::Entity(_) => {
            f.indented_doc_comment(&format!(
                "Values of `{property_iri}` as [`{slot_type}`] instances, fetched\nonce on first access.\n\n# Errors\n\nReturns [`EntityError::NoValue`] when the lookup fails and\n[`EntityError::TypeMismatch`] when a value is not a `{slot_type}`."
            ));
            let _ = writeln!(
                f.buf,
                "    pub fn {slot}(&self) -> Result<&[{slot_type}], EntityError> {{"
            );
            let _ = writeln!(f.buf, "        self.{slot}");
            f.line("            .get_or_try_init(|| {");
            f.line("                self.entity");
            let _ = writeln!(
                f.buf,
                "                    .predicate_values(\"{property_iri}\")?"
            );
            f.line("                    .into_iter()");
            let _ = writeln!(f.buf, "                    .map({slot_type}::new)");
            f.line("                    .collect()");
            f.line("            })");
            f.line("            .map(Vec::as_slice)");
            f.line("    }");
        }
        AccessorShape::Union(_) => {
            f.indented_doc_comment(&format!(
                "Values of `{property_iri}`, each resolved against the declared\nclasses, fetched once on first access.\n\n# Errors\n\nReturns [`EntityError::NoValue`] when the lookup fails; values\nmatching none of the classes are kept as raw IRIs instead of\nfailing."
            ));
            let _ = writeln!(
                f.buf,
                "    pub fn {slot}(&self) -> Result<&[{slot_type}], EntityError> {{"
            );
            let _ = writeln!(f.buf, "        self.{slot}");
            f.line("            .get_or_try_init(|| {");
            f.line("                self.entity");
            let _ = writeln!(
                f.buf,
                "                    .predicate_values(\"{property_iri}\")?"
            );
            f.line("                    .into_iter()");
            let _ = writeln!(f.buf, "                    .map({slot_type}::resolve)");
            f.line("                    .collect()");
            f.line("            })");
            f.line("            .map(Vec::as_slice)");
            f.line("    }");
        }
    }
}

/// Emits one union value enum and its resolution order.
fn generate_union(f: &mut RustFile, name: &str, variants: &[String]) {
    // A candidate class named `Resource` claims the fallback's usual name.
    let fallback = if variants.iter().any(|v| v == "Resource") {
        "Iri"
    } else {
        "Resource"
    };

    f.doc_comment(&format!(
        "One value of a property declared with classes {}: the first\nclass the resource verifies as, else the raw IRI.",
        variants.join(", ")
    ));
    f.line("#[derive(Debug)]");
    let _ = writeln!(f.buf, "pub enum {name} {{");
    for variant in variants {
        f.indented_doc_comment(&format!("Value typed as [`{variant}`]."));
        let _ = writeln!(f.buf, "    {variant}({variant}),");
    }
    f.indented_doc_comment("Value matching none of the declared classes.");
    let _ = writeln!(f.buf, "    {fallback}(String),");
    f.line("}");
    f.blank();

    let _ = writeln!(f.buf, "impl {name} {{");
    f.line("    fn resolve(iri: String) -> Result<Self, EntityError> {");
    for variant in variants {
        let _ = writeln!(f.buf, "        match {variant}::new(iri.clone()) {{");
        let _ = writeln!(
            f.buf,
            "            Ok(value) => return Ok(Self::{variant}(value)),"
        );
        f.line("            Err(EntityError::TypeMismatch { .. }) => {}");
        f.line("            Err(err) => return Err(err),");
        f.line("        }");
    }
    let _ = writeln!(f.buf, "        Ok(Self::{fallback}(iri))");
    f.line("    }");
    f.line("}");
    f.blank();
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENDPOINT: &str = "https://sparql.example.org/";

    fn protein_gene_schema() -> (SchemaGraph, LabelTable) {
        let mut schema = SchemaGraph::new();
        schema.record_class_target(
            "http://example.org/Protein",
            "http://example.org/encodedBy",
            "http://example.org/Gene",
        );
        schema.record_datatype_target(
            "http://example.org/Protein",
            "http://example.org/mass",
            "http://www.w3.org/2001/XMLSchema#float",
        );
        schema.touch("http://example.org/Gene", "http://example.org/label");

        let mut labels = LabelTable::new();
        labels.record("http://example.org/Protein", "Protein".to_owned());
        labels.record("http://example.org/Gene", "Gene".to_owned());
        labels.record("http://example.org/encodedBy", "encoded_by".to_owned());
        labels.record("http://example.org/mass", "mass".to_owned());
        labels.record("http://example.org/label", "label".to_owned());
        (schema, labels)
    }

    #[test]
    fn entity_and_string_accessors() {
        let (schema, labels) = protein_gene_schema();
        let synthesis = synthesize(&schema, &labels, ENDPOINT).expect("labels are complete");
        let source = &synthesis.source;

        assert!(source.contains("pub struct Protein {"));
        assert!(source.contains("pub const TYPE: &'static str = \"http://example.org/Protein\";"));
        assert!(source.contains("pub fn encoded_by(&self) -> Result<&[Gene], EntityError>"));
        assert!(source.contains("pub fn mass(&self) -> Result<&[String], EntityError>"));
        assert!(source.contains("pub struct Gene {"));
        assert_eq!(synthesis.struct_count, 2);
        assert_eq!(synthesis.accessor_count, 3);
        assert_eq!(synthesis.union_count, 0);
    }

    #[test]
    fn xsd_target_always_degrades_to_strings() {
        let mut schema = SchemaGraph::new();
        schema.record_class_target(
            "http://example.org/Protein",
            "http://example.org/mixed",
            "http://example.org/Gene",
        );
        schema.record_datatype_target(
            "http://example.org/Protein",
            "http://example.org/mixed",
            "http://www.w3.org/2001/XMLSchema#string",
        );
        schema.touch("http://example.org/Gene", "http://example.org/label");

        let (_, mut labels) = protein_gene_schema();
        labels.record("http://example.org/mixed", "mixed".to_owned());

        let synthesis = synthesize(&schema, &labels, ENDPOINT).expect("labels are complete");
        assert!(synthesis
            .source
            .contains("pub fn mixed(&self) -> Result<&[String], EntityError>"));
        assert_eq!(synthesis.union_count, 0);
    }

    #[test]
    fn unknown_sole_target_degrades_to_strings() {
        // The target class was filtered out, so no struct exists for it.
        let mut schema = SchemaGraph::new();
        schema.record_class_target(
            "http://example.org/Protein",
            "http://example.org/seenIn",
            "http://example.org/Sample",
        );
        let mut labels = LabelTable::new();
        labels.record("http://example.org/Protein", "Protein".to_owned());
        labels.record("http://example.org/seenIn", "seen_in".to_owned());

        let synthesis = synthesize(&schema, &labels, ENDPOINT).expect("labels are complete");
        assert!(synthesis
            .source
            .contains("pub fn seen_in(&self) -> Result<&[String], EntityError>"));
    }

    #[test]
    fn self_reference_is_an_ordinary_entity_accessor() {
        let mut schema = SchemaGraph::new();
        schema.record_class_target(
            "http://example.org/Person",
            "http://example.org/knows",
            "http://example.org/Person",
        );
        let mut labels = LabelTable::new();
        labels.record("http://example.org/Person", "Person".to_owned());
        labels.record("http://example.org/knows", "knows".to_owned());

        let synthesis = synthesize(&schema, &labels, ENDPOINT).expect("labels are complete");
        let source = &synthesis.source;
        assert!(source.contains("pub struct Person {"));
        assert!(source.contains("knows: OnceCell<Vec<Person>>,"));
        assert!(source.contains("pub fn knows(&self) -> Result<&[Person], EntityError>"));
    }

    #[test]
    fn union_tries_candidates_in_target_order_then_keeps_raw_iri() {
        let mut schema = SchemaGraph::new();
        schema.record_class_target(
            "http://example.org/Reaction",
            "http://example.org/catalyzedBy",
            "http://example.org/Gene",
        );
        schema.record_class_target(
            "http://example.org/Reaction",
            "http://example.org/catalyzedBy",
            "http://example.org/Protein",
        );
        schema.touch("http://example.org/Gene", "http://example.org/label");
        schema.touch("http://example.org/Protein", "http://example.org/label");

        let (_, mut labels) = protein_gene_schema();
        labels.record("http://example.org/Reaction", "Reaction".to_owned());
        labels.record("http://example.org/catalyzedBy", "catalyzed_by".to_owned());

        let synthesis = synthesize(&schema, &labels, ENDPOINT).expect("labels are complete");
        let source = &synthesis.source;

        assert!(source
            .contains("pub fn catalyzed_by(&self) -> Result<&[GeneOrProtein], EntityError>"));
        assert!(source.contains("pub enum GeneOrProtein {"));
        assert!(source.contains("Resource(String),"));
        // Gene is declared first, so it is tried first.
        let gene_try = source.find("match Gene::new(iri.clone())").expect("gene try");
        let protein_try = source
            .find("match Protein::new(iri.clone())")
            .expect("protein try");
        assert!(gene_try < protein_try);
        assert!(source.contains("Err(EntityError::TypeMismatch { .. }) => {}"));
        assert!(source.contains("Ok(Self::Resource(iri))"));
        assert_eq!(synthesis.union_count, 1);
    }

    #[test]
    fn union_with_no_known_candidate_degrades_to_strings() {
        let mut schema = SchemaGraph::new();
        schema.record_class_target(
            "http://example.org/Protein",
            "http://example.org/seenIn",
            "http://example.org/Sample",
        );
        schema.record_class_target(
            "http://example.org/Protein",
            "http://example.org/seenIn",
            "http://example.org/Tissue",
        );
        let mut labels = LabelTable::new();
        labels.record("http://example.org/Protein", "Protein".to_owned());
        labels.record("http://example.org/seenIn", "seen_in".to_owned());

        let synthesis = synthesize(&schema, &labels, ENDPOINT).expect("labels are complete");
        assert!(synthesis
            .source
            .contains("pub fn seen_in(&self) -> Result<&[String], EntityError>"));
        assert_eq!(synthesis.union_count, 0);
    }

    #[test]
    fn duplicate_method_names_within_a_class_stay_unique() {
        let mut schema = SchemaGraph::new();
        schema.touch("http://example.org/Protein", "http://example.org/name");
        schema.touch("http://example.org/Protein", "http://other.org/name");
        let mut labels = LabelTable::new();
        labels.record("http://example.org/Protein", "Protein".to_owned());
        labels.record("http://example.org/name", "name".to_owned());
        labels.record("http://other.org/name", "name".to_owned());

        let synthesis = synthesize(&schema, &labels, ENDPOINT).expect("labels are complete");
        let source = &synthesis.source;
        assert!(source.contains("pub fn name(&self)"));
        assert!(source.contains("pub fn name_(&self)"));
    }

    #[test]
    fn output_is_deterministic() {
        let (schema, labels) = protein_gene_schema();
        let first = synthesize(&schema, &labels, ENDPOINT).expect("labels are complete");
        let second = synthesize(&schema, &labels, ENDPOINT).expect("labels are complete");
        assert_eq!(first.source, second.source);
    }

    #[test]
    fn missing_label_is_a_programming_error() {
        let mut schema = SchemaGraph::new();
        schema.touch("http://example.org/Protein", "http://example.org/mass");
        let labels = LabelTable::new();
        let err = synthesize(&schema, &labels, ENDPOINT)
            .err()
            .expect("missing label must fail");
        assert!(matches!(err, SynthesisError::MissingLabel { .. }));
    }
}
