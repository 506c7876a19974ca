//! Blocking SPARQL protocol client.
//!
//! One function, [`query_sparql`], sends a query to an endpoint and decodes
//! the SPARQL JSON results format. SELECT results arrive as ordered binding
//! rows, ASK results as a bare boolean.

use std::collections::HashMap;
use std::time::Duration;

use reqwest::header::ACCEPT;
use serde::Deserialize;

use crate::ExtractError;

/// Media type of the SPARQL JSON results format.
pub const SPARQL_RESULTS_JSON: &str = "application/sparql-results+json";

/// A decoded SPARQL JSON result set.
///
/// `boolean` is bound for ASK queries, `results` for SELECT queries.
#[derive(Debug, Clone, Deserialize)]
pub struct SparqlResults {
    /// Variable names declared by the query.
    #[serde(default)]
    pub head: SparqlHead,
    /// ASK answer.
    #[serde(default)]
    pub boolean: Option<bool>,
    /// SELECT bindings.
    #[serde(default)]
    pub results: Option<SparqlBindings>,
}

/// The `head` member of a result set.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SparqlHead {
    /// Projected variable names.
    #[serde(default)]
    pub vars: Vec<String>,
}

/// The `results` member of a SELECT result set.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SparqlBindings {
    /// Binding rows, in the order the endpoint returned them.
    #[serde(default)]
    pub bindings: Vec<BindingRow>,
}

/// One binding row: variable name → bound term. Unbound variables are
/// simply absent.
pub type BindingRow = HashMap<String, SparqlValue>;

/// A bound RDF term.
#[derive(Debug, Clone, Deserialize)]
pub struct SparqlValue {
    /// Term kind: `uri`, `literal`, or `bnode`.
    #[serde(rename = "type")]
    pub value_type: String,
    /// Lexical form of the term.
    pub value: String,
    /// Literal datatype IRI, if any.
    #[serde(default)]
    pub datatype: Option<String>,
    /// Literal language tag, if any.
    #[serde(default, rename = "xml:lang")]
    pub lang: Option<String>,
}

impl SparqlValue {
    /// Convenience constructor for an IRI term.
    #[must_use]
    pub fn uri(value: &str) -> Self {
        Self {
            value_type: "uri".to_owned(),
            value: value.to_owned(),
            datatype: None,
            lang: None,
        }
    }

    /// Convenience constructor for a plain literal term.
    #[must_use]
    pub fn literal(value: &str) -> Self {
        Self {
            value_type: "literal".to_owned(),
            value: value.to_owned(),
            datatype: None,
            lang: None,
        }
    }
}

/// Executes a SPARQL query against an endpoint and decodes the JSON result
/// set.
///
/// Sends a GET with a `query` URL parameter by default, or a POST with a
/// form-encoded body when `post` is set. `timeout` is handed straight to
/// the HTTP client; `None` keeps the client default.
///
/// # Errors
///
/// [`ExtractError::Transport`] when the HTTP exchange fails or the endpoint
/// answers with a non-success status, [`ExtractError::Decode`] when the
/// body is not a SPARQL JSON result set.
pub fn query_sparql(
    query: &str,
    endpoint_url: &str,
    post: bool,
    timeout: Option<Duration>,
) -> Result<SparqlResults, ExtractError> {
    let transport = |source| ExtractError::Transport {
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

    serde_json::from_str(&body).map_err(|source| ExtractError::Decode {
        endpoint: endpoint_url.to_owned(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_select_results() {
        let body = r#"{
            "head": { "vars": ["subjectClass", "prop"] },
            "results": { "bindings": [
                {
                    "subjectClass": { "type": "uri", "value": "http://example.org/Protein" },
                    "prop": { "type": "uri", "value": "http://example.org/mass" }
                }
            ] }
        }"#;
        let results: SparqlResults = serde_json::from_str(body).expect("valid result set");
        assert_eq!(results.head.vars.len(), 2);
        let bindings = results.results.map(|r| r.bindings).unwrap_or_default();
        assert_eq!(bindings.len(), 1);
        assert_eq!(
            bindings[0].get("subjectClass").map(|v| v.value.as_str()),
            Some("http://example.org/Protein")
        );
        assert!(results.boolean.is_none());
    }

    #[test]
    fn decodes_ask_results() {
        let body = r#"{ "head": {}, "boolean": true }"#;
        let results: SparqlResults = serde_json::from_str(body).expect("valid result set");
        assert_eq!(results.boolean, Some(true));
        assert!(results.results.is_none());
    }

    #[test]
    fn partial_rows_leave_variables_unbound() {
        let body = r#"{
            "head": { "vars": ["subjectClass", "subjectClassLabel"] },
            "results": { "bindings": [
                { "subjectClass": { "type": "uri", "value": "http://example.org/Gene" } }
            ] }
        }"#;
        let results: SparqlResults = serde_json::from_str(body).expect("valid result set");
        let bindings = results.results.map(|r| r.bindings).unwrap_or_default();
        assert!(bindings[0].contains_key("subjectClass"));
        assert!(!bindings[0].contains_key("subjectClassLabel"));
    }
}
