//! `voidgen` — Generates a typed Rust client crate from a SPARQL endpoint's
//! VoID description.
//!
//! **Outputs** (under `--out`):
//! - `src/lib.rs` — one struct per described RDF class, lazy accessors
//! - `src/sparql.rs` — runtime helper bound to the endpoint
//! - `Cargo.toml`, `README.md`, `LICENSE.txt` — written only if absent
//!
//! **Usage:**
//! ```text
//! voidgen <endpoint-url> [--out <path>] [--ignore-class <iri>]... [--timeout <seconds>]
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use voidgen_schema::IgnoreSet;

/// Generate a typed Rust client crate from a SPARQL endpoint's VoID
/// description.
#[derive(Parser)]
#[command(
    name = "voidgen",
    about = "Generate a typed Rust client crate from a SPARQL endpoint's VoID description"
)]
struct Args {
    /// SPARQL endpoint URL to generate a client for.
    endpoint: String,

    /// Output folder for the generated crate; its basename becomes the
    /// crate name.
    #[arg(long, default_value = "generated-client")]
    out: PathBuf,

    /// Class IRI to exclude from generation; repeat to exclude several.
    /// This is also how identifier collisions between two classes are
    /// resolved.
    #[arg(long = "ignore-class", short = 'i', value_name = "IRI")]
    ignore_class: Vec<String>,

    /// Timeout in seconds for the VoID description query.
    #[arg(long, value_name = "SECONDS")]
    timeout: Option<u64>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    println!(
        "Generating Rust client for {} in the {} folder",
        args.endpoint,
        args.out.display()
    );

    let ignore = IgnoreSet::new(args.ignore_class);
    let timeout = args.timeout.map(Duration::from_secs);
    let (schema, labels) = voidgen_extractor::extract_schema(&args.endpoint, &ignore, timeout)?;

    println!("Extracted {} classes from the VoID description", schema.len());

    let report = voidgen_codegen::generate(&schema, &labels, &args.endpoint, &args.out)?;

    println!(
        "Generated {} structs, {} accessors, {} union value types",
        report.struct_count, report.accessor_count, report.union_count
    );
    println!("Files written ({}):", report.files.len());
    for file in &report.files {
        println!("  {file}");
    }
    println!("Generation complete.");
    Ok(())
}
