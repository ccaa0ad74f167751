//! # Validate Command Implementation
//!
//! This module implements the `validate` subcommand, which checks a token
//! document for referential-integrity problems without modifying anything.
//!
//! ## Functionality
//!
//! - **Kind Detection**: Detects whether the file is a core document, a
//!   platform extension, or a theme override from its shape, unless `--kind`
//!   pins it explicitly.
//! - **Structural Parsing**: Rejects files that are not well-formed
//!   documents of the requested kind.
//! - **Semantic Validation**: Accumulates every dangling reference, ordering
//!   inconsistency, and cardinality problem into one report instead of
//!   stopping at the first.
//! - **Cross-Document Validation**: With `--core`, extension files are also
//!   checked against the core document they extend.
//!
//! This command is a safe, read-only operation.

use anyhow::Result;
use clap::Args;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use token_loom::document::{detect_document_kind, parse_document, DocumentKind};
use token_loom::output::{emoji, OutputConfig};
use token_loom::suggestions;
use token_loom::validator;

/// Validate a token document file
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Path to the document file to validate.
    pub file: PathBuf,

    /// Document kind (core, platform-extension, theme-override).
    ///
    /// When omitted, the kind is detected from the file's shape.
    #[arg(long, value_name = "KIND")]
    pub kind: Option<String>,

    /// Core document to validate an extension file against.
    #[arg(long, value_name = "FILE")]
    pub core: Option<PathBuf>,
}

/// Read and classify a document file.
pub(crate) fn load_document(
    path: &Path,
    kind_flag: Option<&str>,
) -> Result<token_loom::document::SourceDocument> {
    if !path.exists() {
        return Err(suggestions::document_not_found(path));
    }
    let content = std::fs::read_to_string(path)?;

    let kind = match kind_flag {
        Some(raw) => {
            DocumentKind::from_str(raw).map_err(|_| suggestions::unknown_document_kind(raw))?
        }
        None => {
            let value: serde_json::Value = serde_json::from_str(&content)
                .map_err(|e| anyhow::anyhow!("{} is not valid JSON: {}", path.display(), e))?;
            detect_document_kind(&value).ok_or_else(|| suggestions::undetectable_document(path))?
        }
    };

    Ok(parse_document(&content, kind)?)
}

/// Execute the `validate` command.
///
/// # Arguments
/// * `args` - The command arguments
/// * `color_flag` - The value of the global --color flag ("always", "never", or "auto")
pub fn execute(args: ValidateArgs, color_flag: &str) -> Result<()> {
    let out = OutputConfig::from_env_and_flag(color_flag);
    println!(
        "{} Validating document: {}",
        emoji(&out, "🔍", "[SCAN]"),
        args.file.display()
    );

    let document = load_document(&args.file, args.kind.as_deref())?;
    println!(
        "{} Parsed as a {} document",
        emoji(&out, "✅", "[OK]"),
        document.kind()
    );

    let core = match &args.core {
        Some(path) => {
            let core_doc = load_document(path, Some("core"))?;
            Some(core_doc.as_core().cloned().ok_or_else(|| {
                anyhow::anyhow!("--core file {} is not a core document", path.display())
            })?)
        }
        None => None,
    };

    if document.kind() != DocumentKind::Core && core.is_none() {
        println!(
            "{} No core document given; cross-document checks need --core",
            emoji(&out, "⚠️", "[WARN]")
        );
    }

    let result = validator::validate_document(&document, core.as_ref());

    if result.is_valid {
        println!("{} Document is valid", emoji(&out, "✅", "[OK]"));
        return Ok(());
    }

    println!(
        "\n{} Found {} problem(s):",
        emoji(&out, "❌", "[ERR]"),
        result.errors.len()
    );
    for error in &result.errors {
        println!("   - {}", error);
    }
    Err(anyhow::anyhow!("Document validation failed"))
}
