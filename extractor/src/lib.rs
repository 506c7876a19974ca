//! Schema extraction from a SPARQL endpoint's VoID description.
//!
//! The `voidgen-extractor` crate issues one SPARQL query against an
//! endpoint, retrieving every property partition and linkset the endpoint
//! declares about itself, and folds the flat result rows into a
//! [`SchemaGraph`] plus a [`LabelTable`]. Identifier collisions between
//! subject classes and empty descriptions are detected here and abort the
//! run.
//!
//! The folding step ([`fold_description`]) is a pure function over a parsed
//! result set, so everything but the network call itself is testable
//! offline.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod client;

use std::collections::HashMap;
use std::time::Duration;

use thiserror::Error;
use voidgen_schema::{naming, IgnoreSet, LabelTable, NameError, SchemaGraph};

pub use client::{query_sparql, BindingRow, SparqlResults, SparqlValue};

/// The single query retrieving the endpoint's VoID self-description: one
/// row per (subject class, property, object class/datatype) combination
/// declared by a property partition or a linkset. Label fields are
/// optional; rows may be partial.
pub const VOID_DESCRIPTION_QUERY: &str = r#"PREFIX rdfs: <http://www.w3.org/2000/01/rdf-schema#>
PREFIX void: <http://rdfs.org/ns/void#>
PREFIX void-ext: <http://ldf.fi/void-ext#>
SELECT DISTINCT ?subjectClassLabel ?subjectClass ?prop ?propLabel ?objectClass ?objectClassLabel ?objectDatatype
WHERE {
  {
    ?cp void:class ?subjectClass ;
        void:entities ?subjectsCount ;
        void:propertyPartition ?pp .
    OPTIONAL { ?subjectClass rdfs:label ?subjectClassLabel }
    ?pp void:property ?prop .
    OPTIONAL { ?prop rdfs:label ?propLabel }
    OPTIONAL {
        {
            ?pp void:classPartition [ void:class ?objectClass ] .
            OPTIONAL { ?objectClass rdfs:label ?objectClassLabel }
        } UNION {
            ?pp void-ext:datatypePartition [ void-ext:datatype ?objectDatatype ] .
        }
    }
  } UNION {
    ?linkset void:subjectsTarget [ void:class ?subjectClass ] ;
      void:linkPredicate ?prop ;
      void:objectsTarget [ void:class ?objectClass ] .
  }
}"#;

/// Extraction failures. The first two are the user-facing taxonomy; the
/// rest wrap the wire layer.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The endpoint declares no usable VoID description after filtering.
    #[error("no VoID description found in endpoint {endpoint}")]
    EmptySchema {
        /// The queried endpoint.
        endpoint: String,
    },

    /// Two distinct subject classes derive the same struct identifier.
    /// Resolved by excluding one of them with `--ignore-class`.
    #[error("classes <{first}> and <{second}> both map to `{identifier}`; exclude one of them with --ignore-class")]
    NameCollision {
        /// The shared identifier.
        identifier: String,
        /// Class IRI that claimed the identifier first.
        first: String,
        /// Class IRI that collided with it.
        second: String,
    },

    /// A label or IRI yields no valid identifier.
    #[error(transparent)]
    Name(#[from] NameError),

    /// The HTTP exchange failed or the endpoint answered non-success.
    #[error("SPARQL request to {endpoint} failed")]
    Transport {
        /// The queried endpoint.
        endpoint: String,
        /// Underlying HTTP error.
        #[source]
        source: reqwest::Error,
    },

    /// The response body is not a SPARQL JSON result set.
    #[error("endpoint {endpoint} returned an invalid SPARQL result set")]
    Decode {
        /// The queried endpoint.
        endpoint: String,
        /// Underlying decode error.
        #[source]
        source: serde_json::Error,
    },
}

/// Queries `endpoint_url` for its VoID description and folds it into a
/// schema graph and label table.
///
/// # Errors
///
/// [`ExtractError::EmptySchema`] when nothing usable is declared,
/// [`ExtractError::NameCollision`] when two subject classes format to the
/// same identifier, plus transport and decode failures from the query
/// itself.
pub fn extract_schema(
    endpoint_url: &str,
    ignore: &IgnoreSet,
    timeout: Option<Duration>,
) -> Result<(SchemaGraph, LabelTable), ExtractError> {
    let results = client::query_sparql(VOID_DESCRIPTION_QUERY, endpoint_url, false, timeout)?;
    let rows = results.results.map(|r| r.bindings).unwrap_or_default();
    fold_description(endpoint_url, &rows, ignore)
}

/// Folds VoID result rows into `(SchemaGraph, LabelTable)`.
///
/// Row order only determines insertion order; identifiers are
/// first-seen-wins, so re-running against an unchanged description is
/// deterministic regardless of labels repeating across rows.
///
/// # Errors
///
/// See [`extract_schema`].
pub fn fold_description(
    endpoint_url: &str,
    rows: &[BindingRow],
    ignore: &IgnoreSet,
) -> Result<(SchemaGraph, LabelTable), ExtractError> {
    let mut schema = SchemaGraph::new();
    let mut labels = LabelTable::new();
    // identifier → first subject class IRI that claimed it
    let mut claimed: HashMap<String, String> = HashMap::new();

    for row in rows {
        let Some(subject) = row.get("subjectClass") else {
            continue;
        };
        let subject = subject.value.as_str();
        if ignore.ignores(subject) {
            continue;
        }

        // The effective identifier is first-seen-wins — the subject may
        // already be labeled from an earlier row, or from appearing as an
        // object class.
        let identifier = if let Some(existing) = labels.identifier(subject) {
            existing.to_owned()
        } else {
            let computed = identifier_for(row, "subjectClassLabel", subject, true)?;
            labels.record(subject, computed.clone());
            computed
        };
        match claimed.get(&identifier) {
            Some(first) if first != subject => {
                return Err(ExtractError::NameCollision {
                    identifier,
                    first: first.clone(),
                    second: subject.to_owned(),
                });
            }
            Some(_) => {}
            None => {
                claimed.insert(identifier, subject.to_owned());
            }
        }

        let Some(prop) = row.get("prop") else {
            continue;
        };
        let prop = prop.value.as_str();
        if !labels.contains(prop) {
            let identifier = identifier_for(row, "propLabel", prop, false)?;
            labels.record(prop, identifier);
        }
        schema.touch(subject, prop);

        if let Some(object_class) = row.get("objectClass") {
            let object_class = object_class.value.as_str();
            schema.record_class_target(subject, prop, object_class);
            if !labels.contains(object_class) {
                let identifier = identifier_for(row, "objectClassLabel", object_class, true)?;
                labels.record(object_class, identifier);
            }
        }
        if let Some(datatype) = row.get("objectDatatype") {
            schema.record_datatype_target(subject, prop, &datatype.value);
        }
    }

    if schema.is_empty() {
        return Err(ExtractError::EmptySchema {
            endpoint: endpoint_url.to_owned(),
        });
    }
    Ok((schema, labels))
}

/// Derives the identifier for an IRI from its label binding when present,
/// else from the IRI itself.
fn identifier_for(
    row: &BindingRow,
    label_var: &str,
    iri: &str,
    as_struct: bool,
) -> Result<String, NameError> {
    let source = row.get(label_var).map_or(iri, |label| label.value.as_str());
    if as_struct {
        naming::struct_identifier(source)
    } else {
        naming::method_identifier(source)
    }
}
