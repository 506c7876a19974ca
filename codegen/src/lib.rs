//! voidgen code synthesizer.
//!
//! Consumes the `(SchemaGraph, LabelTable)` pair produced by
//! `voidgen-extractor` and writes a complete client crate: one struct per
//! subject class with lazy accessors ([`entities`]), the fixed SPARQL
//! runtime helper bound to the endpoint ([`runtime`]), and the packaging
//! files written once and never clobbered ([`packaging`]).

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod emit;
pub mod entities;
pub mod packaging;
pub mod runtime;

use std::path::Path;

use anyhow::{bail, Result};
use thiserror::Error;
use voidgen_schema::{LabelTable, SchemaGraph};

pub use entities::{synthesize, Synthesis};

/// Report of what was generated.
#[derive(Debug, Default)]
pub struct GenerationReport {
    /// Number of entity structs generated.
    pub struct_count: usize,
    /// Number of property accessors generated.
    pub accessor_count: usize,
    /// Number of union value enums generated.
    pub union_count: usize,
    /// Files written this run, relative to the output folder.
    pub files: Vec<String>,
}

/// Synthesis failures. Extraction guarantees these never fire for a
/// `(SchemaGraph, LabelTable)` pair it produced together.
#[derive(Debug, Error)]
pub enum SynthesisError {
    /// An IRI in the schema graph has no identifier in the label table.
    #[error("no identifier recorded for <{iri}>; schema and label table disagree")]
    MissingLabel {
        /// The unlabeled IRI.
        iri: String,
    },
}

/// Generates the complete client crate for `schema` into `out_dir`.
///
/// The folder basename becomes the crate name. `src/lib.rs` and
/// `src/sparql.rs` are always overwritten; `Cargo.toml`, `README.md`, and
/// `LICENSE.txt` are written only if absent.
///
/// # Errors
///
/// Returns an error if the output folder has no usable crate name, if
/// synthesis hits a missing label, or if any file cannot be written.
pub fn generate(
    schema: &SchemaGraph,
    labels: &LabelTable,
    endpoint_url: &str,
    out_dir: &Path,
) -> Result<GenerationReport> {
    let crate_name = crate_name(out_dir)?;
    let synthesis = entities::synthesize(schema, labels, endpoint_url)?;

    let mut report = GenerationReport {
        struct_count: synthesis.struct_count,
        accessor_count: synthesis.accessor_count,
        union_count: synthesis.union_count,
        files: Vec::new(),
    };

    emit::write_file(&out_dir.join("src").join("lib.rs"), &synthesis.source)?;
    report.files.push("src/lib.rs".to_owned());

    let helper = runtime::runtime_module(endpoint_url);
    emit::write_file(&out_dir.join("src").join("sparql.rs"), &helper)?;
    report.files.push("src/sparql.rs".to_owned());

    let packaging_files = [
        ("Cargo.toml", packaging::manifest(&crate_name, endpoint_url)),
        ("README.md", packaging::readme(&crate_name, endpoint_url)),
        ("LICENSE.txt", packaging::license().to_owned()),
    ];
    for (name, content) in packaging_files {
        if packaging::write_if_absent(&out_dir.join(name), &content)? {
            report.files.push(name.to_owned());
        }
    }

    Ok(report)
}

/// Derives the crate name from the output folder's basename.
fn crate_name(out_dir: &Path) -> Result<String> {
    let Some(name) = out_dir.file_name().and_then(|n| n.to_str()) else {
        bail!("output folder {} has no usable name", out_dir.display());
    };
    if name.is_empty()
        || !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        bail!("output folder name {name:?} is not a valid crate name; use letters, digits, - and _");
    }
    Ok(name.to_owned())
}
