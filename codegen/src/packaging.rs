//! Packaging artifacts for the generated crate.
//!
//! The manifest, README, and license are written exactly once: re-runs
//! regenerate the source modules but never clobber packaging files the
//! user may have edited.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Returns the generated crate's `Cargo.toml`.
#[must_use]
pub fn manifest(crate_name: &str, endpoint_url: &str) -> String {
    format!(
        r#"[package]
name = "{crate_name}"
version = "0.1.0"
edition = "2021"
description = "Typed client for the SPARQL endpoint at {endpoint_url}"
license-file = "LICENSE.txt"

[dependencies]
once_cell = "1"
reqwest = {{ version = "0.12", features = ["blocking", "json"] }}
serde = {{ version = "1", features = ["derive"] }}
serde_json = "1"
thiserror = "1"
"#
    )
}

/// Returns the generated crate's `README.md`.
#[must_use]
pub fn readme(crate_name: &str, endpoint_url: &str) -> String {
    format!(
        "# {crate_name}\n\nRust client crate for the SPARQL endpoint available at {endpoint_url}.\n\nGenerated by voidgen from the endpoint's VoID description. Each struct\nrepresents one RDF class; accessors query the endpoint on first use and\nmemoize the result.\n"
    )
}

/// Returns the generated crate's license text.
#[must_use]
pub fn license() -> &'static str {
    "MIT License\n\nCopyright (c) 2024-present the voidgen contributors\n\nPermission is hereby granted, free of charge, to any person obtaining a copy\nof this software and associated documentation files (the \"Software\"), to deal\nin the Software without restriction, including without limitation the rights\nto use, copy, modify, merge, publish, distribute, sublicense, and/or sell\ncopies of the Software, and to permit persons to whom the Software is\nfurnished to do so, subject to the following conditions:\n\nThe above copyright notice and this permission notice shall be included in all\ncopies or substantial portions of the Software.\n\nTHE SOFTWARE IS PROVIDED \"AS IS\", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR\nIMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,\nFITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE\nAUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER\nLIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,\nOUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE\nSOFTWARE.\n"
}

/// Writes `content` to `path` unless the file already exists. Returns true
/// if the file was written.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or the file cannot
/// be written.
pub fn write_if_absent(path: &Path, content: &str) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    fs::write(path, content).with_context(|| format!("Failed to write file: {}", path.display()))?;
    Ok(true)
}
