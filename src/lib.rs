//! # Token Loom Library
//!
//! This library provides the core functionality for managing layered design
//! token systems. It is designed to be used by the `token-loom` command-line
//! tool but can also be embedded into other applications that need to merge,
//! diff, or validate token documents.
//!
//! ## Quick Example
//!
//! ```
//! use token_loom::document::{parse_document, DocumentKind};
//! use token_loom::{merge, validator};
//!
//! let core = r#"{
//!     "systemId": "design-system",
//!     "tokens": [],
//!     "tokenCollections": [],
//!     "dimensions": [],
//!     "platforms": []
//! }"#;
//!
//! let document = parse_document(core, DocumentKind::Core).unwrap();
//! let system = document.as_core().unwrap();
//!
//! // Validate, then compute the merged view (no extension layers here).
//! let result = validator::validate_document(&document, None);
//! assert!(result.is_valid);
//!
//! let merged = merge::merge(system, None, None);
//! assert!(merged.system().tokens.is_empty());
//! ```
//!
//! ## Core Concepts
//!
//! The library is built around a few key concepts:
//!
//! - **Documents (`model`, `document`)**: the three document kinds — the core
//!   token system, per-platform extension files, and per-theme override
//!   files — plus the tagged envelope and shape detection that classify raw
//!   JSON exactly once at the boundary.
//! - **Merge (`merge`)**: computes the read-only merged view, applying the
//!   platform layer before the theme layer and honoring platform omissions.
//! - **Diff (`diff`)**: structured change lists between document versions,
//!   matched by entity id so array reordering never reads as churn.
//! - **Validation (`validator`)**: accumulates every referential-integrity
//!   and cross-document error into one result instead of failing fast.
//! - **Sessions (`store`, `context`, `source`)**: the persistent slots of an
//!   editing session and the source manager that switches between documents
//!   without losing unsaved work silently.
//! - **Repositories (`remote`, `links`)**: the client trait for external
//!   repository storage, conflict-aware retries, and the coordinator that
//!   tracks links between document roles and repositories.
//!
//! ## Execution Flow
//!
//! A typical session runs through the `source::SourceManager`:
//!
//! 1.  **Load**: fetch and parse the initial document, snapshot it.
//! 2.  **Edit**: local edits accumulate against the snapshot.
//! 3.  **Review**: diff the edits, summarize them per entity type.
//! 4.  **Save or switch**: persist with conflict retries, or switch sources
//!     after an explicit confirmation when edits would be discarded.
//!
//! The merged view is recomputed from its inputs on every change; it is
//! never edited directly and never persisted as a source of truth.

pub mod cache;
pub mod context;
pub mod diff;
pub mod document;
pub mod error;
pub mod links;
pub mod merge;
pub mod model;
pub mod output;
pub mod remote;
pub mod source;
pub mod store;
pub mod suggestions;
pub mod validator;

pub use error::{Error, Result};

#[cfg(test)]
mod diff_proptest;
