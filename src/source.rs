//! # Source Switching and Edit Session Management
//!
//! [`SourceManager`] owns the lifecycle of the editing session: which source
//! document is active, the pristine snapshot it was loaded from, the user's
//! local edits, and the merged view derived from all of it. It is the single
//! writer of the local-edits slot; every mutation of session state flows
//! through here so the four persistent slots stay mutually consistent.
//!
//! ## Switching
//!
//! A switch is a small state machine with three outcomes: switched,
//! cancelled, or failed. Only one switch may be in flight at a time; a
//! re-entrant request is rejected outright rather than queued. When the
//! session carries unsaved local edits, the caller-supplied confirmation
//! callback is consulted with the concrete change list before anything is
//! discarded — a session with no edits switches silently. Commits are
//! all-or-nothing: until the new document has been fetched, parsed, and
//! validated, no slot is written, so a cancelled or failed switch leaves
//! every slot byte-identical.

use crate::context::{RepositoryCoordinates, SourceContext, SourceType};
use crate::diff::{self, Change, ChangeSummary};
use crate::document::{parse_document, DocumentKind, SourceDocument};
use crate::error::{Error, Result};
use crate::merge;
use crate::model::{MergedSystem, TokenSystem};
use crate::remote::{write_with_retry, FileCommit, RepositoryClient, RetryPolicy};
use crate::store::SnapshotStore;
use crate::validator::{self, ValidationResult};

/// How a switch request ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchOutcome {
    /// The new source is loaded and the session points at it.
    Switched,
    /// The user declined to discard local edits; nothing changed.
    Cancelled,
}

/// Coordinates the snapshot store, the repository client, and the merge
/// engine for one editing session.
pub struct SourceManager {
    store: SnapshotStore,
    client: Box<dyn RepositoryClient>,
    retry: RetryPolicy,
    switch_in_flight: bool,
}

impl SourceManager {
    pub fn new(store: SnapshotStore, client: Box<dyn RepositoryClient>) -> Self {
        Self {
            store,
            client,
            retry: RetryPolicy::default(),
            switch_in_flight: false,
        }
    }

    /// Override the write retry schedule (tests use a zero-delay policy).
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Read access to the session's persistent slots.
    pub fn store(&self) -> &SnapshotStore {
        &self.store
    }

    /// Seed the session with a core document already in hand.
    ///
    /// Sets all four slots consistently: core data, snapshot, local edits
    /// (initially identical to the snapshot), and the recomputed merged view.
    pub fn load_core(&mut self, system: TokenSystem) -> Result<()> {
        let document = SourceDocument::Core(system.clone());
        let merged = merge::merge(&system, None, None);

        self.store.set_core_data(&system)?;
        self.store.set_source_snapshot(&document)?;
        self.store.set_local_edits(&document)?;
        self.store.set_merged_data(&merged)?;

        let mut context = self
            .store
            .source_context()?
            .unwrap_or_else(SourceContext::new_core);
        context.source_type = SourceType::Core;
        context.source_id = None;
        context.edit_mode = false;
        context.has_local_changes = false;
        context.touch();
        self.store.set_source_context(&context)?;
        Ok(())
    }

    /// Replace the local-edits slot with the caller's working copy.
    ///
    /// The only write path for local edits; marks the session as editing and
    /// refreshes the context's `has_local_changes` flag from an actual diff
    /// against the snapshot.
    pub fn update_local_edits(&mut self, edits: SourceDocument) -> Result<()> {
        self.store.set_local_edits(&edits)?;

        let has_changes = !self.get_changes()?.is_empty();
        if let Some(mut context) = self.store.source_context()? {
            context.edit_mode = true;
            context.has_local_changes = has_changes;
            self.store.set_source_context(&context)?;
        }
        Ok(())
    }

    /// The concrete changes between the pristine snapshot and local edits.
    pub fn get_changes(&self) -> Result<Vec<Change>> {
        let snapshot = self.store.source_snapshot()?;
        let edits = self.store.local_edits()?;
        Ok(match (snapshot, edits) {
            (Some(snapshot), Some(edits)) => diff::diff_documents(&snapshot, &edits),
            _ => Vec::new(),
        })
    }

    /// Per-entity-type counts over [`get_changes`](Self::get_changes).
    pub fn get_change_summary(&self) -> Result<ChangeSummary> {
        Ok(diff::summarize(&self.get_changes()?))
    }

    /// Validate a document against the session's stored core data.
    pub fn validate_data(&self, document: &SourceDocument) -> Result<ValidationResult> {
        let core = self.store.core_data()?;
        Ok(validator::validate_document(document, core.as_ref()))
    }

    /// Recompute the merged view from the current slots.
    ///
    /// Always recomputed from core data plus the local-edits layer, never
    /// read back from the merged slot, so callers cannot observe staleness.
    /// The freshly computed view is persisted as a side effect.
    pub fn compute_merged_data(&mut self) -> Result<Option<MergedSystem>> {
        let edits = self.store.local_edits()?;

        let merged = match &edits {
            Some(SourceDocument::Core(system)) => Some(merge::merge(system, None, None)),
            Some(SourceDocument::PlatformExtension(ext)) => self
                .store
                .core_data()?
                .map(|core| merge::merge(&core, Some(ext), None)),
            Some(SourceDocument::ThemeOverride(ov)) => self
                .store
                .core_data()?
                .map(|core| merge::merge(&core, None, Some(ov))),
            None => self
                .store
                .core_data()?
                .map(|core| merge::merge(&core, None, None)),
        };

        if let Some(merged) = &merged {
            self.store.set_merged_data(merged)?;
        }
        Ok(merged)
    }

    /// Switch the session to a different source document.
    ///
    /// `confirm` is called with the unsaved changes when there are any; a
    /// `false` return cancels the switch with every slot untouched. At most
    /// one switch may be in flight; a re-entrant call fails with
    /// [`Error::SwitchInProgress`].
    pub fn switch_source(
        &mut self,
        source_type: SourceType,
        source_id: Option<&str>,
        confirm: &mut dyn FnMut(&[Change]) -> bool,
    ) -> Result<SwitchOutcome> {
        if self.switch_in_flight {
            return Err(Error::SwitchInProgress);
        }
        self.switch_in_flight = true;
        let outcome = self.perform_switch(source_type, source_id, confirm);
        self.switch_in_flight = false;
        outcome
    }

    fn perform_switch(
        &mut self,
        source_type: SourceType,
        source_id: Option<&str>,
        confirm: &mut dyn FnMut(&[Change]) -> bool,
    ) -> Result<SwitchOutcome> {
        let changes = self.get_changes()?;
        if !changes.is_empty() && !confirm(&changes) {
            log::info!("source switch cancelled with {} unsaved changes", changes.len());
            return Ok(SwitchOutcome::Cancelled);
        }

        // Everything fallible happens before the first slot write.
        let (document, coordinates) = self.fetch_target(source_type, source_id)?;

        let core = match &document {
            SourceDocument::Core(system) => system.clone(),
            _ => self
                .store
                .core_data()?
                .ok_or_else(|| Error::not_found("core data", "session store"))?,
        };
        check_identity(&document, &core, source_id)?;
        let result = validator::validate_document(&document, Some(&core));
        if !result.is_valid {
            return Err(Error::Validation {
                errors: result.errors,
            });
        }

        let merged = match &document {
            SourceDocument::Core(system) => merge::merge(system, None, None),
            SourceDocument::PlatformExtension(ext) => merge::merge(&core, Some(ext), None),
            SourceDocument::ThemeOverride(ov) => merge::merge(&core, None, Some(ov)),
        };

        // Commit: snapshot and edits start out identical for the new source.
        self.store.set_core_data(&core)?;
        self.store.set_source_snapshot(&document)?;
        self.store.set_local_edits(&document)?;
        self.store.set_merged_data(&merged)?;

        let mut context = self
            .store
            .source_context()?
            .unwrap_or_else(SourceContext::new_core);
        context.source_type = source_type;
        context.source_id = source_id.map(str::to_string);
        context.source_repository = coordinates;
        context.edit_mode = false;
        context.has_local_changes = false;
        context.touch();
        self.store.set_source_context(&context)?;

        log::info!(
            "switched source to {}{}",
            source_type,
            source_id.map(|id| format!(" ({})", id)).unwrap_or_default()
        );
        Ok(SwitchOutcome::Switched)
    }

    /// Locate and fetch the target document without touching any slot.
    fn fetch_target(
        &self,
        source_type: SourceType,
        source_id: Option<&str>,
    ) -> Result<(SourceDocument, Option<RepositoryCoordinates>)> {
        match source_type {
            SourceType::Core => {
                let context = self.store.source_context()?.unwrap_or_default();
                if let Some(coords) = context.core_repository {
                    let document = self.fetch_document(&coords, DocumentKind::Core)?;
                    return Ok((document, Some(coords)));
                }
                // No core repository on record: fall back to the stored core.
                let core = self
                    .store
                    .core_data()?
                    .ok_or_else(|| Error::not_found("core data", "session store"))?;
                Ok((SourceDocument::Core(core), None))
            }
            SourceType::Platform => {
                let id = source_id
                    .ok_or_else(|| Error::structural("a platform switch requires a platform id"))?;
                let coords = self.resolve_extension(DocumentKind::PlatformExtension, id)?;
                let document = self.fetch_document(&coords, DocumentKind::PlatformExtension)?;
                Ok((document, Some(coords)))
            }
            SourceType::Theme => {
                let id = source_id
                    .ok_or_else(|| Error::structural("a theme switch requires a theme id"))?;
                let coords = self.resolve_extension(DocumentKind::ThemeOverride, id)?;
                let document = self.fetch_document(&coords, DocumentKind::ThemeOverride)?;
                Ok((document, Some(coords)))
            }
        }
    }

    /// Resolve an extension's coordinates: session links first, then the
    /// core document's own repository wiring.
    fn resolve_extension(
        &self,
        kind: DocumentKind,
        source_id: &str,
    ) -> Result<RepositoryCoordinates> {
        for link in self.store.repository_links()? {
            if link.link_type == kind && link.id == source_id {
                return Ok(RepositoryCoordinates {
                    repo_full_name: link.repository_uri,
                    file_path: link.file_path,
                    branch: link.branch,
                });
            }
        }

        if let Some(core) = self.store.core_data()? {
            if kind == DocumentKind::PlatformExtension {
                if let Some(file_ref) = core.platform_extension_files.get(source_id) {
                    return Ok(RepositoryCoordinates {
                        repo_full_name: file_ref.repository_uri.clone(),
                        file_path: file_ref.file_path.clone(),
                        branch: file_ref.branch.clone(),
                    });
                }
            }
            for linked in &core.linked_repositories {
                if linked.link_type == kind.to_string() && linked.id == source_id {
                    return Ok(RepositoryCoordinates {
                        repo_full_name: linked.repository_uri.clone(),
                        file_path: linked.file_path.clone(),
                        branch: linked.branch.clone(),
                    });
                }
            }
        }

        Err(Error::not_found(&format!("{} source", kind), source_id))
    }

    fn fetch_document(
        &self,
        coords: &RepositoryCoordinates,
        kind: DocumentKind,
    ) -> Result<SourceDocument> {
        let fetched = self.client.get_file_content(
            &coords.repo_full_name,
            &coords.file_path,
            &coords.branch,
        )?;
        parse_document(&fetched.content, kind)
    }

    /// Persist the local edits to their repository, retrying conflicts.
    ///
    /// On success the snapshot is advanced to the saved content and the
    /// change flag cleared. On failure the local edits are left untouched so
    /// nothing is lost.
    pub fn save_changes(&mut self, commit_message: &str) -> Result<FileCommit> {
        let edits = self
            .store
            .local_edits()?
            .ok_or_else(|| Error::not_found("local edits", "session store"))?;

        let context = self.store.source_context()?.unwrap_or_default();
        let coords = match context.source_type {
            SourceType::Core => context.core_repository.clone(),
            _ => context.source_repository.clone(),
        }
        .ok_or_else(|| Error::not_found("source repository", context.source_type.to_string()))?;

        let content = document_payload(&edits)?;
        let commit = write_with_retry(
            self.client.as_mut(),
            &coords.repo_full_name,
            &coords.file_path,
            &content,
            &coords.branch,
            commit_message,
            self.retry,
        )?;

        self.store.set_source_snapshot(&edits)?;
        let mut context = context;
        context.edit_mode = false;
        context.has_local_changes = false;
        self.store.set_source_context(&context)?;
        Ok(commit)
    }
}

/// Identity fields must agree before any deeper validation runs. A fetched
/// extension belonging to another system, or answering for a different
/// platform/theme than the one requested, is always fatal to the load.
fn check_identity(
    document: &SourceDocument,
    core: &TokenSystem,
    source_id: Option<&str>,
) -> Result<()> {
    let (system_id, own_id, id_field) = match document {
        SourceDocument::Core(_) => return Ok(()),
        SourceDocument::PlatformExtension(ext) => {
            (&ext.system_id, &ext.platform_id, "platformId")
        }
        SourceDocument::ThemeOverride(ov) => (&ov.system_id, &ov.theme_id, "themeId"),
    };

    if system_id != &core.system_id {
        return Err(Error::CrossDocumentMismatch {
            field: "systemId".to_string(),
            expected: core.system_id.clone(),
            actual: system_id.clone(),
        });
    }
    if let Some(requested) = source_id {
        if own_id != requested {
            return Err(Error::CrossDocumentMismatch {
                field: id_field.to_string(),
                expected: requested.to_string(),
                actual: own_id.clone(),
            });
        }
    }
    Ok(())
}

/// Serialize a document's payload (without the envelope tag) for storage in
/// its repository file.
fn document_payload(document: &SourceDocument) -> Result<String> {
    let raw = match document {
        SourceDocument::Core(system) => serde_json::to_string_pretty(system)?,
        SourceDocument::PlatformExtension(ext) => serde_json::to_string_pretty(ext)?,
        SourceDocument::ThemeOverride(ov) => serde_json::to_string_pretty(ov)?,
    };
    Ok(raw)
}
