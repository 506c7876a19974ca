//! Normalized schema model for a SPARQL endpoint's VoID description.
//!
//! The `voidgen-schema` crate holds the data that flows between extraction
//! and code synthesis: a [`SchemaGraph`] mapping each subject class to its
//! properties and their target classes/datatypes, a [`LabelTable`] mapping
//! every IRI to its derived Rust identifier, and an [`IgnoreSet`] of
//! vocabulary namespaces and caller-excluded classes. The [`naming`] module
//! implements the deterministic IRI/label → identifier rules shared by both
//! sides.
//!
//! # Entry Point
//!
//! ```
//! use voidgen_schema::SchemaGraph;
//!
//! let mut schema = SchemaGraph::new();
//! schema.record_class_target(
//!     "http://example.org/Protein",
//!     "http://example.org/encodedBy",
//!     "http://example.org/Gene",
//! );
//! assert!(schema.contains_class("http://example.org/Protein"));
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod model;
pub mod naming;

pub use model::{IgnoreSet, LabelTable, PropertyTargets, SchemaGraph};
pub use naming::NameError;
