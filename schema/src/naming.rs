//! IRI/label → Rust identifier mapping.
//!
//! Deterministic rules shared by extraction (which records identifiers in
//! the [`LabelTable`](crate::LabelTable)) and synthesis (which only reads
//! them back). Uniqueness is *not* guaranteed here — two IRIs with the same
//! local name map to the same identifier, and the extractor fails the run
//! when that happens between two subject classes.

use thiserror::Error;

/// A label or IRI that cannot be turned into a Rust identifier.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NameError {
    /// Nothing is left of the input after stripping punctuation, e.g. an
    /// IRI whose fragment is entirely non-alphanumeric.
    #[error("cannot derive an identifier from {input:?}: empty after stripping; label the resource in the endpoint or exclude it with --ignore-class")]
    EmptyLabel {
        /// The offending label or IRI.
        input: String,
    },
}

/// Extracts the local name: the substring after the last `#`, else after
/// the last `/`, else the whole input.
#[must_use]
pub fn local_name(input: &str) -> &str {
    if let Some(pos) = input.rfind('#') {
        &input[pos + 1..]
    } else if let Some(pos) = input.rfind('/') {
        &input[pos + 1..]
    } else {
        input
    }
}

/// Derives a struct-style (PascalCase) identifier from a class label or IRI.
///
/// Multi-word labels are CamelCased word by word; single-word labels are
/// stripped of separators and capitalized. Punctuation that survives is
/// dropped, a leading digit is escaped with `_`, and `Self` gets a trailing
/// `_` since it is reserved.
///
/// # Errors
///
/// Returns [`NameError::EmptyLabel`] if nothing identifier-like remains.
pub fn struct_identifier(label: &str) -> Result<String, NameError> {
    let local = local_name(label);
    let cased = if local.contains(' ') {
        local.split_whitespace().map(capitalize).collect::<String>()
    } else {
        capitalize(&local.replace([' ', '-', '_'], ""))
    };
    let mut ident = sanitize(&cased, label)?;
    if ident == "Self" {
        ident.push('_');
    }
    Ok(ident)
}

/// Derives a method-style (snake_case) identifier from a property label or
/// IRI.
///
/// Spaces and hyphens become underscores; camelCase boundaries become
/// underscores as well, so an unlabeled `ex:encodedBy` still yields the
/// idiomatic `encoded_by`. Rust keywords get a trailing `_`.
///
/// # Errors
///
/// Returns [`NameError::EmptyLabel`] if nothing identifier-like remains.
pub fn method_identifier(label: &str) -> Result<String, NameError> {
    let local = local_name(label);
    let mut cased = String::with_capacity(local.len() + 4);
    let mut prev: Option<char> = None;
    for ch in local.chars() {
        if ch == ' ' || ch == '-' {
            cased.push('_');
        } else if ch.is_uppercase() {
            // Underscore only at a lower→upper boundary, so runs of
            // uppercase ("DNA") stay one word.
            if prev.is_some_and(|p| p.is_lowercase() || p.is_ascii_digit()) {
                cased.push('_');
            }
            cased.extend(ch.to_lowercase());
        } else {
            cased.push(ch);
        }
        prev = Some(ch);
    }
    let ident = sanitize(&cased, label)?;
    Ok(escape_keyword(ident))
}

/// First character uppercased, the rest lowercased.
fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Drops everything outside `[A-Za-z0-9_]`, escapes a leading digit, and
/// rejects empty results.
fn sanitize(candidate: &str, original: &str) -> Result<String, NameError> {
    let mut ident: String = candidate
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();
    if ident.chars().all(|c| c == '_') {
        return Err(NameError::EmptyLabel {
            input: original.to_owned(),
        });
    }
    if ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    Ok(ident)
}

/// Appends `_` to identifiers that collide with Rust keywords.
fn escape_keyword(ident: String) -> String {
    match ident.as_str() {
        "type" | "self" | "super" | "crate" | "mod" | "fn" | "pub" | "use" | "let" | "mut"
        | "ref" | "as" | "in" | "for" | "if" | "else" | "match" | "return" | "struct" | "enum"
        | "trait" | "impl" | "where" | "loop" | "while" | "break" | "continue" | "move" | "box"
        | "dyn" | "true" | "false" | "const" | "static" | "unsafe" | "extern" | "async"
        | "await" => {
            let mut escaped = ident;
            escaped.push('_');
            escaped
        }
        _ => ident,
    }
}
