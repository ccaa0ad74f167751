//! # Error Handling
//!
//! This module defines the centralized error handling mechanism for
//! `token-loom`. It uses the `thiserror` library to create a comprehensive
//! `Error` enum that covers all anticipated failure modes, providing clear
//! and descriptive error messages.
//!
//! ## Error taxonomy
//!
//! - **`Structural`**: the input is not a well-formed document of the claimed
//!   kind (wrong JSON shape, missing required top-level fields). Fatal for
//!   the current operation; callers must not proceed to merge or diff.
//! - **`Validation`**: the document is well-formed but semantically invalid
//!   (dangling reference, cardinality violation). Carries every accumulated
//!   message; the operation aborts with prior state retained.
//! - **`CrossDocumentMismatch`**: a `systemId`/`platformId`/`themeId`
//!   disagreement between a source document and the core document. Always
//!   fatal to the load step that produced it.
//! - **`Conflict`**: a concurrent write detected by the repository
//!   collaborator (HTTP-409 class). Retried automatically with exponential
//!   backoff before being surfaced.
//! - **`NotFound`**: a referenced repository, file, platform, or theme is
//!   absent. The operation aborts with no partial state.
//! - **`SwitchInProgress`**: a second source switch was requested while one
//!   is already in flight; the request is rejected rather than interleaved.
//!
//! The remaining variants cover storage, locking, and wrapped I/O and JSON
//! failures. The validator and the merge engine never *return* these errors
//! for semantically invalid input — they produce result values — so anything
//! propagating as `Error` marks a boundary failure, not a validation outcome.

use thiserror::Error;

/// Main error type for token-loom operations
#[derive(Error, Debug)]
pub enum Error {
    /// The input is not a well-formed document of the claimed kind.
    ///
    /// Raised only at parse boundaries; downstream engines may assume their
    /// inputs are structurally sound.
    #[error("Structural error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    Structural {
        message: String,
        /// Optional hint for how to fix the malformed document
        hint: Option<String>,
    },

    /// The document is well-formed but semantically invalid.
    ///
    /// Carries every accumulated violation message.
    #[error("Validation failed: {}", errors.join("; "))]
    Validation { errors: Vec<String> },

    /// An identity field disagrees between a source document and core.
    #[error("Cross-document mismatch on {field}: expected '{expected}', found '{actual}'")]
    CrossDocumentMismatch {
        field: String,
        expected: String,
        actual: String,
    },

    /// A concurrent modification was detected while writing a file.
    #[error("Conflict writing {path}: {message}")]
    Conflict { path: String, message: String },

    /// A referenced repository, file, platform, or theme does not exist.
    #[error("Not found: {kind} '{id}'")]
    NotFound { kind: String, id: String },

    /// A source switch was requested while another is still in flight.
    #[error("A source switch is already in progress; retry once it completes")]
    SwitchInProgress,

    /// The persistent key-value store returned unusable data.
    #[error("Storage error for key '{key}': {message}")]
    Storage { key: String, message: String },

    /// A link-cardinality rule was violated before any fetch was attempted.
    #[error("Repository link rejected: {message}")]
    LinkCardinality { message: String },

    /// An error indicating that a mutex or other lock has been poisoned.
    #[error("Lock poisoned: {context}")]
    LockPoisoned { context: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON serialization error, wrapped from `serde_json::Error`.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A URL parsing error, wrapped from `url::ParseError`.
    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),
}

impl Error {
    /// Build a `Structural` error without a hint.
    pub fn structural(message: impl Into<String>) -> Self {
        Error::Structural {
            message: message.into(),
            hint: None,
        }
    }

    /// Build a `NotFound` error for a named entity kind.
    pub fn not_found(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Error::NotFound {
            kind: kind.into(),
            id: id.into(),
        }
    }

    /// Whether the error is retryable (currently only write conflicts).
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Conflict { .. })
    }
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
