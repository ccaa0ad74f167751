//! # Diff Command Implementation
//!
//! This module implements the `diff` subcommand, which shows the structured
//! changes between two versions of a token document. Entities are matched by
//! id, so reordering an array never reads as churn.
//!
//! ## Exit Codes
//!
//! Returns 0 when the documents are equivalent and 1 when changes exist,
//! mirroring `git diff --exit-code`. Errors (bad files, malformed JSON)
//! also exit non-zero with a message on stderr.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use token_loom::diff::{self, Change, ChangeType};
use token_loom::output::{emoji, OutputConfig};

use super::validate::load_document;

/// Show the changes between two versions of a document
#[derive(Args, Debug)]
pub struct DiffArgs {
    /// The older version of the document.
    pub before: PathBuf,

    /// The newer version of the document.
    pub after: PathBuf,

    /// Document kind for both files (detected from shape when omitted).
    #[arg(long, value_name = "KIND")]
    pub kind: Option<String>,

    /// Print only per-entity-type counts.
    #[arg(long)]
    pub summary: bool,

    /// Emit the change list as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Execute the `diff` command.
pub fn execute(args: DiffArgs, color_flag: &str) -> Result<()> {
    let out = OutputConfig::from_env_and_flag(color_flag);

    let before = load_document(&args.before, args.kind.as_deref())?;
    let after = load_document(&args.after, args.kind.as_deref())?;

    let changes = diff::diff_documents(&before, &after);

    if changes.is_empty() {
        println!("{} No changes", emoji(&out, "✅", "[OK]"));
        return Ok(());
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&changes)?);
    } else if args.summary {
        print_summary(&changes);
    } else {
        for change in &changes {
            print_change(&out, change);
        }
        println!();
        print_summary(&changes);
    }

    // Mirrors `git diff --exit-code`: changes are a distinct exit status.
    std::process::exit(1);
}

fn print_change(out: &OutputConfig, change: &Change) {
    let marker = match change.change_type {
        ChangeType::Added => emoji(out, "➕", "[+]"),
        ChangeType::Modified => emoji(out, "✏️", "[~]"),
        ChangeType::Deleted => emoji(out, "➖", "[-]"),
    };
    println!(
        "{} {} {} ({})",
        marker, change.entity_type, change.entity_id, change.path
    );
}

fn print_summary(changes: &[Change]) {
    let summary = diff::summarize(changes);
    println!("{} change(s):", summary.total);
    for (entity_type, counts) in &summary.by_entity_type {
        println!(
            "   {}: {} added, {} modified, {} deleted",
            entity_type, counts.added, counts.modified, counts.deleted
        );
    }
}
