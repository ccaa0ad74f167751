//! # Info Command Implementation
//!
//! This module implements the `info` subcommand, which reports on the
//! current editing session: the active source, unsaved changes, the sources
//! the core document declares, and analytics over the merged view.
//!
//! This command is a safe, read-only operation.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use token_loom::diff;
use token_loom::document::SourceDocument;
use token_loom::links::compute_analytics;
use token_loom::merge;
use token_loom::output::{emoji, OutputConfig};
use token_loom::store::{FileStore, SnapshotStore};
use token_loom::suggestions;

/// Show the session state, declared sources, and merge analytics
#[derive(Args, Debug)]
pub struct InfoArgs {
    /// Session state file.
    ///
    /// Defaults to the platform data directory (e.g.
    /// `~/.local/share/token-loom/state.json` on Linux).
    /// Can also be set with the `TOKEN_LOOM_STATE` environment variable.
    #[arg(long, value_name = "FILE", env = "TOKEN_LOOM_STATE")]
    pub state_file: Option<PathBuf>,
}

/// Execute the `info` command.
pub fn execute(args: InfoArgs, color_flag: &str) -> Result<()> {
    let out = OutputConfig::from_env_and_flag(color_flag);

    let path = args.state_file.unwrap_or_else(FileStore::default_path);
    if !path.exists() {
        return Err(suggestions::session_not_initialized());
    }
    let store = SnapshotStore::with_store(Box::new(FileStore::open(&path)?));

    let context = store
        .source_context()?
        .ok_or_else(suggestions::session_not_initialized)?;

    println!("{} Session", emoji(&out, "📋", "[SESSION]"));
    println!("   State file: {}", path.display());
    println!("   Active source: {}", context.source_type);
    if let Some(id) = &context.source_id {
        println!("   Source id: {}", id);
    }
    if let Some(coords) = &context.source_repository {
        println!(
            "   Repository: {} @ {} ({})",
            coords.repo_full_name, coords.branch, coords.file_path
        );
    }
    if let Some(at) = context.last_loaded_at {
        println!("   Last loaded: {} (unix)", at);
    }

    let snapshot = store.source_snapshot()?;
    let edits = store.local_edits()?;
    let changes = match (&snapshot, &edits) {
        (Some(snapshot), Some(edits)) => diff::diff_documents(snapshot, edits),
        _ => Vec::new(),
    };
    if changes.is_empty() {
        println!("   Local changes: none");
    } else {
        let summary = diff::summarize(&changes);
        println!("   Local changes: {} unsaved", summary.total);
        for (entity_type, counts) in &summary.by_entity_type {
            println!(
                "      {}: {} added, {} modified, {} deleted",
                entity_type, counts.added, counts.modified, counts.deleted
            );
        }
    }

    let Some(core) = store.core_data()? else {
        println!(
            "\n{} No core data loaded yet",
            emoji(&out, "⚠️", "[WARN]")
        );
        return Ok(());
    };

    println!("\n{} Core document", emoji(&out, "📦", "[CORE]"));
    println!("   System: {}", core.system_id);
    if let Some(name) = &core.system_name {
        println!("   Name: {}", name);
    }
    println!("   Tokens: {}", core.tokens.len());
    println!("   Dimensions: {}", core.dimensions.len());

    if !core.platforms.is_empty() {
        println!("   Platforms:");
        for platform in &core.platforms {
            println!("      {} ({})", platform.display_name, platform.id);
        }
    }
    if !core.themes.is_empty() {
        println!("   Themes:");
        for theme in &core.themes {
            let marker = if theme.is_default { " [default]" } else { "" };
            println!("      {} ({}){}", theme.display_name, theme.id, marker);
        }
    }

    // Analytics over the merged view with the edited layer applied.
    let (platform, theme) = match &edits {
        Some(SourceDocument::PlatformExtension(ext)) => (Some(ext.clone()), None),
        Some(SourceDocument::ThemeOverride(ov)) => (None, Some(ov.clone())),
        _ => (None, None),
    };
    let merged = merge::merge(&core, platform.as_ref(), theme.as_ref());
    let analytics = compute_analytics(&core, platform.as_ref(), theme.as_ref(), &merged);

    println!("\n{} Merged view", emoji(&out, "📊", "[STATS]"));
    println!("   Total tokens: {}", analytics.total_tokens);
    println!("   Overridden: {}", analytics.overridden_tokens);
    println!("   New from platform: {}", analytics.new_tokens);
    println!("   Omitted (no mode values): {}", analytics.omitted_tokens);

    Ok(())
}
