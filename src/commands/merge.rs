//! # Merge Command Implementation
//!
//! This module implements the `merge` subcommand, which computes the merged
//! view of a core token document with optional platform-extension and
//! theme-override layers.
//!
//! The platform layer always applies before the theme layer. Every input is
//! validated before merging; an invalid layer aborts the merge rather than
//! producing a view that mixes valid and broken data.
//!
//! The merged view is written as plain JSON to stdout (or `--output`), so it
//! can be piped into formatters and exporters.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use token_loom::document::SourceDocument;
use token_loom::merge;
use token_loom::output::{emoji, OutputConfig};
use token_loom::validator;

use super::validate::load_document;

/// Compute the merged view of a core document and its extension layers
#[derive(Args, Debug)]
pub struct MergeArgs {
    /// Path to the core document.
    pub core: PathBuf,

    /// Platform extension file to apply.
    #[arg(long, value_name = "FILE")]
    pub platform: Option<PathBuf>,

    /// Theme override file to apply (after the platform layer).
    #[arg(long, value_name = "FILE")]
    pub theme: Option<PathBuf>,

    /// Write the merged view to a file instead of stdout.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Emit compact JSON instead of pretty-printed.
    #[arg(long)]
    pub compact: bool,
}

/// Execute the `merge` command.
pub fn execute(args: MergeArgs, color_flag: &str) -> Result<()> {
    let out = OutputConfig::from_env_and_flag(color_flag);

    let core_doc = load_document(&args.core, Some("core"))?;
    let core = core_doc
        .as_core()
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("{} is not a core document", args.core.display()))?;
    check_valid(&core_doc, None, &args.core)?;

    let platform = match &args.platform {
        Some(path) => {
            let doc = load_document(path, Some("platform-extension"))?;
            check_valid(&doc, Some(&core), path)?;
            doc.as_platform_extension().cloned()
        }
        None => None,
    };

    let theme = match &args.theme {
        Some(path) => {
            let doc = load_document(path, Some("theme-override"))?;
            check_valid(&doc, Some(&core), path)?;
            doc.as_theme_override().cloned()
        }
        None => None,
    };

    let merged = merge::merge(&core, platform.as_ref(), theme.as_ref());
    let system = merged.into_system();

    let rendered = if args.compact {
        serde_json::to_string(&system)?
    } else {
        serde_json::to_string_pretty(&system)?
    };

    match &args.output {
        Some(path) => {
            std::fs::write(path, rendered)?;
            println!(
                "{} Wrote merged view ({} tokens) to {}",
                emoji(&out, "✅", "[OK]"),
                system.tokens.len(),
                path.display()
            );
        }
        None => println!("{}", rendered),
    }
    Ok(())
}

fn check_valid(
    document: &SourceDocument,
    core: Option<&token_loom::model::TokenSystem>,
    path: &std::path::Path,
) -> Result<()> {
    let result = validator::validate_document(document, core);
    if result.is_valid {
        return Ok(());
    }
    Err(anyhow::anyhow!(
        "{} is not valid:\n   - {}",
        path.display(),
        result.errors.join("\n   - ")
    ))
}
