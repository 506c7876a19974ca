//! The fixed runtime helper emitted next to the generated structs.
//!
//! The helper is a template, not synthesized logic: its only variable part
//! is the endpoint URL baked into `SPARQL_ENDPOINT`, which every generated
//! constructor uses so consumers never pass the endpoint explicitly.

/// Placeholder substituted with the generating endpoint URL.
pub const ENDPOINT_PLACEHOLDER: &str = "__VOIDGEN_ENDPOINT__";

/// Returns the `sparql.rs` helper module bound to `endpoint_url`.
#[must_use]
pub fn runtime_module(endpoint_url: &str) -> String {
    RUNTIME_TEMPLATE.replace(ENDPOINT_PLACEHOLDER, endpoint_url)
}

/// The helper source. Kept in lockstep with the wire contract of
/// `voidgen-extractor`: same request shape, same result-set model.
const RUNTIME_TEMPLATE: &str = r##"//! SPARQL runtime shared by the generated entity structs.
//!
//! Generated by voidgen from the endpoint's VoID description; do not edit.

use std::collections::HashMap;
use std::time::Duration;

use reqwest::header::ACCEPT;
use serde::Deserialize;
use thiserror::Error;

/// Endpoint every generated struct queries.
pub const SPARQL_ENDPOINT: &str = "__VOIDGEN_ENDPOINT__";

const SPARQL_RESULTS_JSON: &str = "application/sparql-results+json";

/// Errors surfaced by entity constructors and accessors.
#[derive(Debug, Error)]
pub enum EntityError {
    /// The HTTP exchange with the endpoint failed.
    #[error("SPARQL request to {endpoint} failed")]
    Transport {
        /// The queried endpoint.
        endpoint: String,
        /// Underlying HTTP error.
        #[source]
        source: reqwest::Error,
    },
    /// The endpoint answered with something other than SPARQL JSON results.
    #[error("endpoint {endpoint} returned an invalid SPARQL result set")]
    Decode {
        /// The queried endpoint.
        endpoint: String,
        /// Underlying decode error.
        #[source]
        source: serde_json::Error,
    },
    /// No resource with the requested IRI and type exists at the endpoint.
    #[error("no resource <{iri}> with type <{type_iri}> in endpoint {endpoint}")]
    TypeMismatch {
        /// The requested resource IRI.
        iri: String,
        /// The type the resource was expected to have.
        type_iri: String,
        /// The queried endpoint.
        endpoint: String,
    },
    /// A predicate lookup failed.
    #[error("no value found for predicate <{predicate}> on <{iri}>")]
    NoValue {
        /// The looked-up predicate.
        predicate: String,
        /// The subject resource.
        iri: String,
        /// What went wrong underneath.
        #[source]
        source: Box<EntityError>,
    },
}

/// A decoded SPARQL JSON result set: `boolean` for ASK, `results` for
/// SELECT.
#[derive(Debug, Clone, Deserialize)]
pub struct SparqlResults {
    /// ASK answer.
    #[serde(default)]
    pub boolean: Option<bool>,
    /// SELECT bindings.
    #[serde(default)]
    pub results: Option<SparqlBindings>,
}

/// The `results` member of a SELECT result set.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SparqlBindings {
    /// Binding rows, in the order the endpoint returned them.
    #[serde(default)]
    pub bindings: Vec<HashMap<String, SparqlValue>>,
}

/// A bound RDF term.
#[derive(Debug, Clone, Deserialize)]
pub struct SparqlValue {
    /// Lexical form of the term.
    pub value: String,
}

/// Executes a SPARQL query and decodes the JSON result set.
///
/// Sends a GET with a `query` URL parameter by default, or a POST with a
/// form-encoded body when `post` is set. `timeout` is handed straight to
/// the HTTP client; `None` keeps the client default.
pub fn query_sparql(
    query: &str,
    endpoint_url: &str,
    post: bool,
    timeout: Option<Duration>,
) -> Result<SparqlResults, EntityError> {
    let transport = |source| EntityError::Transport {
        endpoint: endpoint_url.to_owned(),
        source,
    };

    let mut builder = reqwest::blocking::Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    let client = builder.build().map_err(transport)?;

    let request = if post {
        client
            .post(endpoint_url)
            .header(ACCEPT, SPARQL_RESULTS_JSON)
            .form(&[("query", query)])
    } else {
        client
            .get(endpoint_url)
            .header(ACCEPT, SPARQL_RESULTS_JSON)
            .query(&[("query", query)])
    };

    let body = request
        .send()
        .and_then(reqwest::blocking::Response::error_for_status)
        .and_then(|response| response.text())
        .map_err(transport)?;

    serde_json::from_str(&body).map_err(|source| EntityError::Decode {
        endpoint: endpoint_url.to_owned(),
        source,
    })
}

/// Handle on one RDF resource at the generated endpoint.
#[derive(Debug, Clone)]
pub struct SparqlEntity {
    iri: String,
    type_iri: String,
    endpoint: String,
}

impl SparqlEntity {
    /// Binds `iri` as a generic `rdfs:Resource`.
    ///
    /// # Errors
    ///
    /// [`EntityError::TypeMismatch`] when the endpoint knows no such
    /// resource; transport failures propagate.
    pub fn new(iri: impl Into<String>) -> Result<Self, EntityError> {
        Self::with_type(iri, "http://www.w3.org/2000/01/rdf-schema#Resource")
    }

    /// Binds `iri`, verifying a resource with this IRI and `type_iri`
    /// exists at the endpoint.
    ///
    /// # Errors
    ///
    /// [`EntityError::TypeMismatch`] when the existence check answers
    /// false; transport failures propagate.
    pub fn with_type(iri: impl Into<String>, type_iri: &str) -> Result<Self, EntityError> {
        let entity = Self {
            iri: iri.into(),
            type_iri: type_iri.to_owned(),
            endpoint: SPARQL_ENDPOINT.to_owned(),
        };
        let ask = format!("ASK WHERE {{ <{}> a <{}> . }}", entity.iri, entity.type_iri);
        let answer = query_sparql(&ask, &entity.endpoint, false, None)?;
        if answer.boolean == Some(true) {
            Ok(entity)
        } else {
            Err(EntityError::TypeMismatch {
                iri: entity.iri,
                type_iri: entity.type_iri,
                endpoint: entity.endpoint,
            })
        }
    }

    /// IRI of this resource.
    pub fn iri(&self) -> &str {
        &self.iri
    }

    /// Type IRI this resource was verified against.
    pub fn type_iri(&self) -> &str {
        &self.type_iri
    }

    /// Fetches all values of `predicate` for this resource, in binding
    /// order, as lexical forms.
    ///
    /// # Errors
    ///
    /// [`EntityError::NoValue`] wrapping whatever made the lookup fail.
    pub fn predicate_values(&self, predicate: &str) -> Result<Vec<String>, EntityError> {
        let query = format!(
            "SELECT ?value WHERE {{ <{}> <{}> ?value }}",
            self.iri, predicate
        );
        let results =
            query_sparql(&query, &self.endpoint, false, None).map_err(|source| {
                EntityError::NoValue {
                    predicate: predicate.to_owned(),
                    iri: self.iri.clone(),
                    source: Box::new(source),
                }
            })?;
        Ok(results
            .results
            .map(|r| r.bindings)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|mut row| row.remove("value").map(|term| term.value))
            .collect())
    }
}
"##;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_is_substituted() {
        let module = runtime_module("https://sparql.example.org/");
        assert!(module.contains("pub const SPARQL_ENDPOINT: &str = \"https://sparql.example.org/\";"));
        assert!(!module.contains(ENDPOINT_PLACEHOLDER));
    }

    #[test]
    fn helper_contract_is_present() {
        let module = runtime_module("https://sparql.example.org/");
        assert!(module.contains("pub struct SparqlEntity"));
        assert!(module.contains("pub fn with_type"));
        assert!(module.contains("pub fn predicate_values"));
        assert!(module.contains("ASK WHERE"));
        assert!(module.contains("application/sparql-results+json"));
    }
}
