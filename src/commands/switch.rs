//! # Switch Command Implementation
//!
//! This module implements the `switch` subcommand, which moves the editing
//! session between the core document and platform/theme extension files.
//!
//! When the session carries unsaved local edits, the user is shown the
//! change count and asked to confirm before the edits are discarded; `--yes`
//! answers the prompt non-interactively. A declined prompt leaves the
//! session exactly as it was.
//!
//! The repository backend is a local directory tree (`--root`): repository
//! names map to subdirectories, so `acme/design-ios` with file `ext.json`
//! resolves to `<root>/acme/design-ios/ext.json`.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;
use std::str::FromStr;

use dialoguer::Confirm;
use token_loom::context::SourceType;
use token_loom::output::{emoji, OutputConfig};
use token_loom::remote::LocalDirectoryClient;
use token_loom::source::{SourceManager, SwitchOutcome};
use token_loom::store::{FileStore, SnapshotStore};
use token_loom::suggestions;

use super::validate::load_document;

/// Switch the editing session to a different source document
#[derive(Args, Debug)]
pub struct SwitchArgs {
    /// The source to switch to: core, platform, or theme.
    pub source_type: String,

    /// The platform or theme id (required for extension sources).
    pub id: Option<String>,

    /// Root directory the repository names resolve under.
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub root: PathBuf,

    /// Session state file.
    #[arg(long, value_name = "FILE", env = "TOKEN_LOOM_STATE")]
    pub state_file: Option<PathBuf>,

    /// Seed the session by loading this core document file first.
    #[arg(long, value_name = "FILE")]
    pub load: Option<PathBuf>,

    /// Discard unsaved local edits without prompting.
    #[arg(short, long)]
    pub yes: bool,
}

/// Execute the `switch` command.
pub fn execute(args: SwitchArgs, color_flag: &str) -> Result<()> {
    let out = OutputConfig::from_env_and_flag(color_flag);

    let source_type = SourceType::from_str(&args.source_type)?;
    let path = args.state_file.unwrap_or_else(FileStore::default_path);
    let store = SnapshotStore::with_store(Box::new(FileStore::open(&path)?));
    let client = LocalDirectoryClient::new(&args.root);
    let mut manager = SourceManager::new(store, Box::new(client));

    if let Some(core_path) = &args.load {
        let document = load_document(core_path, Some("core"))?;
        let core = document.as_core().cloned().ok_or_else(|| {
            anyhow::anyhow!("{} is not a core document", core_path.display())
        })?;
        manager.load_core(core)?;
        println!(
            "{} Loaded core document from {}",
            emoji(&out, "📦", "[LOAD]"),
            core_path.display()
        );
    }

    // Catch unknown ids before the fetch so the hint can name alternatives.
    if let (Some(id), Some(core)) = (&args.id, manager.store().core_data()?) {
        match source_type {
            SourceType::Platform if core.platform(id).is_none() => {
                let declared: Vec<String> = core.platforms.iter().map(|p| p.id.clone()).collect();
                return Err(suggestions::source_not_declared("platform", id, &declared));
            }
            SourceType::Theme if core.theme(id).is_none() => {
                let declared: Vec<String> = core.themes.iter().map(|t| t.id.clone()).collect();
                return Err(suggestions::source_not_declared("theme", id, &declared));
            }
            _ => {}
        }
    }

    let assume_yes = args.yes;
    let mut confirm = |changes: &[token_loom::diff::Change]| {
        if assume_yes {
            return true;
        }
        Confirm::new()
            .with_prompt(format!(
                "Discard {} unsaved change(s) and switch source?",
                changes.len()
            ))
            .default(false)
            .interact()
            .unwrap_or(false)
    };

    let outcome = manager.switch_source(source_type, args.id.as_deref(), &mut confirm)?;

    match outcome {
        SwitchOutcome::Switched => {
            println!(
                "{} Switched to {}{}",
                emoji(&out, "✅", "[OK]"),
                source_type,
                args.id.map(|id| format!(" ({})", id)).unwrap_or_default()
            );
        }
        SwitchOutcome::Cancelled => {
            println!(
                "{} Switch cancelled; local edits kept",
                emoji(&out, "⚠️", "[CANCELLED]")
            );
        }
    }
    Ok(())
}
