//! # Error Suggestions
//!
//! Helper functions for generating error messages with hints. Errors should
//! tell users what went wrong AND how to fix it.
//!
//! ```rust,ignore
//! use crate::suggestions;
//!
//! // Instead of:
//! anyhow::bail!("Document file not found: {}", path.display());
//!
//! // Use:
//! return Err(suggestions::document_not_found(path));
//! ```

use std::path::Path;

/// Generate an error for when a document file is not found.
pub fn document_not_found(path: &Path) -> anyhow::Error {
    anyhow::anyhow!(
        "Document file not found: {path}\n\n\
         hint: Check the path and current working directory\n\
         hint: Pass the core document first, extension files via --platform/--theme",
        path = path.display()
    )
}

/// Generate an error for an unrecognized document kind.
///
/// Includes a did-you-mean suggestion when a close match exists.
pub fn unknown_document_kind(kind: &str) -> anyhow::Error {
    let valid_kinds = ["core", "platform-extension", "theme-override"];

    let suggestion = find_similar(kind, &valid_kinds);
    let did_you_mean = suggestion
        .map(|s| format!("\nhint: Did you mean '{s}'?"))
        .unwrap_or_default();

    anyhow::anyhow!(
        "Unknown document kind: {kind}{did_you_mean}\n\n\
         Valid kinds are: {kinds}\n\
         hint: Omit --kind to detect it from the file's shape",
        kinds = valid_kinds.join(", ")
    )
}

/// Generate an error for a file whose shape matches no document kind.
pub fn undetectable_document(path: &Path) -> anyhow::Error {
    anyhow::anyhow!(
        "Could not detect the document kind of {path}\n\n\
         hint: Core documents carry tokens, tokenCollections, dimensions and platforms\n\
         hint: Extension files carry systemId plus platformId or themeId\n\
         hint: Pass --kind to parse the file as a specific kind",
        path = path.display()
    )
}

/// Generate an error for when no session state exists yet.
pub fn session_not_initialized() -> anyhow::Error {
    anyhow::anyhow!(
        "No session state found\n\n\
         hint: Run 'token-loom switch core' against a repository root first\n\
         hint: Use --state-file to point at an existing state file"
    )
}

/// Generate an error for a platform or theme id the core does not declare.
pub fn source_not_declared(source_type: &str, id: &str, declared: &[String]) -> anyhow::Error {
    let candidates: Vec<&str> = declared.iter().map(String::as_str).collect();
    let suggestion = find_similar(id, &candidates);
    let did_you_mean = suggestion
        .map(|s| format!("\nhint: Did you mean '{s}'?"))
        .unwrap_or_default();

    anyhow::anyhow!(
        "The core document declares no {source_type} '{id}'{did_you_mean}\n\n\
         hint: Run 'token-loom info' to list the declared platforms and themes"
    )
}

/// Find a similar string from a list of candidates using edit distance.
///
/// Returns Some(candidate) if a close match is found (edit distance <= 2).
fn find_similar<'a>(input: &str, candidates: &[&'a str]) -> Option<&'a str> {
    candidates
        .iter()
        .filter_map(|&candidate| {
            let distance = edit_distance(input, candidate);
            if distance <= 2 && distance < input.len() {
                Some((candidate, distance))
            } else {
                None
            }
        })
        .min_by_key(|(_, distance)| *distance)
        .map(|(candidate, _)| candidate)
}

/// Calculate the Levenshtein edit distance between two strings.
fn edit_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let a_len = a_chars.len();
    let b_len = b_chars.len();

    if a_len == 0 {
        return b_len;
    }
    if b_len == 0 {
        return a_len;
    }

    let mut matrix = vec![vec![0usize; b_len + 1]; a_len + 1];

    for (i, row) in matrix.iter_mut().enumerate() {
        row[0] = i;
    }
    for (j, cell) in matrix[0].iter_mut().enumerate() {
        *cell = j;
    }

    for i in 1..=a_len {
        for j in 1..=b_len {
            let cost = if a_chars[i - 1] == b_chars[j - 1] {
                0
            } else {
                1
            };
            matrix[i][j] = (matrix[i - 1][j] + 1)
                .min(matrix[i][j - 1] + 1)
                .min(matrix[i - 1][j - 1] + cost);
        }
    }

    matrix[a_len][b_len]
}
