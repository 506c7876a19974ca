//! Source-file emission helpers.
//!
//! Generated files are assembled line by line into a [`RustFile`] buffer;
//! callers write directly into [`RustFile::buf`] with `writeln!` for
//! formatted lines and use the helpers for the common shapes.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// A Rust source file under construction.
pub struct RustFile {
    /// The accumulated source text.
    pub buf: String,
}

impl RustFile {
    /// Starts a file with a `//!` header; each line of `header` becomes one
    /// header line, followed by a blank separator.
    #[must_use]
    pub fn new(header: &str) -> Self {
        let mut buf = String::with_capacity(16 * 1024);
        for line in header.lines() {
            if line.is_empty() {
                buf.push_str("//!\n");
            } else {
                buf.push_str("//! ");
                buf.push_str(line);
                buf.push('\n');
            }
        }
        buf.push('\n');
        Self { buf }
    }

    /// Appends one line verbatim.
    pub fn line(&mut self, line: &str) {
        self.buf.push_str(line);
        self.buf.push('\n');
    }

    /// Appends a blank line.
    pub fn blank(&mut self) {
        self.buf.push('\n');
    }

    /// Appends a `///` doc comment, one marker per line of `text`.
    pub fn doc_comment(&mut self, text: &str) {
        self.comment_lines(text, "");
    }

    /// Appends a `///` doc comment indented one level, for items inside an
    /// impl or struct body.
    pub fn indented_doc_comment(&mut self, text: &str) {
        self.comment_lines(text, "    ");
    }

    fn comment_lines(&mut self, text: &str, indent: &str) {
        for line in text.lines() {
            self.buf.push_str(indent);
            if line.is_empty() {
                self.buf.push_str("///\n");
            } else {
                self.buf.push_str("/// ");
                self.buf.push_str(line);
                self.buf.push('\n');
            }
        }
    }

    /// Returns the finished source text with a single trailing newline.
    #[must_use]
    pub fn finish(mut self) -> String {
        while self.buf.ends_with("\n\n") {
            self.buf.pop();
        }
        self.buf
    }
}

/// Writes a source file, creating parent directories as needed.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or the file cannot
/// be written.
pub fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    fs::write(path, content).with_context(|| format!("Failed to write file: {}", path.display()))?;
    Ok(())
}
