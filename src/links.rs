//! # Multi-Repository Coordination
//!
//! Tracks the links between logical document roles (core, platform
//! extension, theme override) and external repository coordinates, enforces
//! link-cardinality rules, and keeps the merged view and its analytics
//! summary current as linked data changes.
//!
//! ## Cardinality
//!
//! Rules are enforced *before* any network fetch is attempted:
//! - while the active document is a core document, only platform-extension
//!   links may be added;
//! - while the active document is a platform or theme extension, only a
//!   single core link may be added.
//!
//! ## Loading
//!
//! Loading a link fetches the file, runs shape detection on the raw JSON,
//! and warns (non-fatal) when the detected kind disagrees with the link's
//! declared role — a misfiled document should be visible, not silently
//! accepted or hard-rejected. The content is then parsed as the requested
//! kind, validated, and stored keyed by its role. Every successful
//! add/remove/load recomputes the merged view and invalidates the analytics
//! cache wholesale.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::cache::{CacheKey, TtlCache};
use crate::document::{detect_document_kind, parse_document, DocumentKind, SourceDocument};
use crate::error::{Error, Result};
use crate::merge;
use crate::model::{MergedSystem, TokenSystem};
use crate::remote::RepositoryClient;
use crate::validator;

/// Lifecycle state of one repository link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkStatus {
    Linked,
    Loading,
    Error,
    Synced,
}

/// A link between a document role and external repository coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryLink {
    pub id: String,
    #[serde(rename = "type")]
    pub link_type: DocumentKind,
    pub repository_uri: String,
    #[serde(default = "crate::model::default_branch")]
    pub branch: String,
    pub file_path: String,
    pub status: LinkStatus,
}

impl RepositoryLink {
    pub fn new(
        id: impl Into<String>,
        link_type: DocumentKind,
        repository_uri: impl Into<String>,
        branch: impl Into<String>,
        file_path: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            link_type,
            repository_uri: repository_uri.into(),
            branch: branch.into(),
            file_path: file_path.into(),
            status: LinkStatus::Linked,
        }
    }
}

/// Summary statistics over the current merged view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeAnalytics {
    pub total_tokens: usize,
    /// Core tokens whose definition or values were replaced by a layer.
    pub overridden_tokens: usize,
    /// Tokens introduced by the platform layer, absent from core.
    pub new_tokens: usize,
    /// Tokens left with no mode values after platform omissions.
    pub omitted_tokens: usize,
    pub platform_count: usize,
    pub theme_count: usize,
}

/// Compute the analytics summary for a core document and its merged view.
pub fn compute_analytics(
    core: &TokenSystem,
    platform: Option<&crate::model::PlatformExtension>,
    theme: Option<&crate::model::ThemeOverrideFile>,
    merged: &MergedSystem,
) -> MergeAnalytics {
    let mut overridden = std::collections::HashSet::new();
    let mut new_tokens = 0usize;

    if let Some(ext) = platform {
        for token in &ext.token_overrides {
            if core.token(&token.id).is_some() {
                overridden.insert(token.id.as_str());
            } else {
                new_tokens += 1;
            }
        }
    }
    if let Some(ov) = theme {
        for token_override in &ov.token_overrides {
            if core.token(&token_override.token_id).is_some() {
                overridden.insert(token_override.token_id.as_str());
            }
        }
    }

    let omitted = merged
        .system()
        .tokens
        .iter()
        .filter(|t| {
            t.values_by_mode.is_empty()
                && core
                    .token(&t.id)
                    .is_some_and(|c| !c.values_by_mode.is_empty())
        })
        .count();

    MergeAnalytics {
        total_tokens: merged.system().tokens.len(),
        overridden_tokens: overridden.len(),
        new_tokens,
        omitted_tokens: omitted,
        platform_count: core.platforms.len(),
        theme_count: core.themes.len(),
    }
}

/// Coordinates document roles across linked repositories.
///
/// Explicitly constructed and owned by the caller; a composition root holds
/// one instance per editing session.
pub struct MultiRepositoryCoordinator {
    client: Box<dyn RepositoryClient>,
    /// The role of the document the session is editing; drives cardinality.
    active_kind: DocumentKind,
    links: Vec<RepositoryLink>,
    documents: HashMap<DocumentKind, SourceDocument>,
    analytics_cache: TtlCache<MergeAnalytics>,
}

impl MultiRepositoryCoordinator {
    pub fn new(client: Box<dyn RepositoryClient>, active_kind: DocumentKind) -> Self {
        Self {
            client,
            active_kind,
            links: Vec::new(),
            documents: HashMap::new(),
            analytics_cache: TtlCache::new(),
        }
    }

    /// Seed the core document directly (sessions that start from local
    /// core data rather than a core link).
    pub fn set_core(&mut self, core: TokenSystem) {
        self.documents
            .insert(DocumentKind::Core, SourceDocument::Core(core));
        self.invalidate_derived();
    }

    pub fn links(&self) -> &[RepositoryLink] {
        &self.links
    }

    pub fn link(&self, id: &str) -> Option<&RepositoryLink> {
        self.links.iter().find(|l| l.id == id)
    }

    /// Register a link. Cardinality and URI checks run before any fetch.
    pub fn add_link(&mut self, link: RepositoryLink) -> Result<()> {
        self.check_cardinality(link.link_type)?;
        validate_repository_uri(&link.repository_uri)?;

        if self.links.iter().any(|l| l.id == link.id) {
            return Err(Error::LinkCardinality {
                message: format!("a link with id '{}' already exists", link.id),
            });
        }

        self.links.push(link);
        self.invalidate_derived();
        Ok(())
    }

    fn check_cardinality(&self, link_type: DocumentKind) -> Result<()> {
        match self.active_kind {
            DocumentKind::Core => {
                if link_type != DocumentKind::PlatformExtension {
                    return Err(Error::LinkCardinality {
                        message: format!(
                            "a core document may only link platform extensions, not {}",
                            link_type
                        ),
                    });
                }
            }
            DocumentKind::PlatformExtension | DocumentKind::ThemeOverride => {
                if link_type != DocumentKind::Core {
                    return Err(Error::LinkCardinality {
                        message: format!(
                            "an extension document may only link a core document, not {}",
                            link_type
                        ),
                    });
                }
                if self
                    .links
                    .iter()
                    .any(|l| l.link_type == DocumentKind::Core)
                {
                    return Err(Error::LinkCardinality {
                        message: "an extension document may hold a single core link".to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Remove a link and drop its loaded document.
    pub fn remove_link(&mut self, id: &str) -> Result<()> {
        let position = self
            .links
            .iter()
            .position(|l| l.id == id)
            .ok_or_else(|| Error::not_found("repository link", id))?;
        let removed = self.links.remove(position);
        self.documents.remove(&removed.link_type);
        self.invalidate_derived();
        Ok(())
    }

    /// Fetch, type-check, validate, and store the document behind a link.
    pub fn load_link(&mut self, id: &str) -> Result<()> {
        let link = self
            .links
            .iter()
            .find(|l| l.id == id)
            .cloned()
            .ok_or_else(|| Error::not_found("repository link", id))?;

        self.set_status(id, LinkStatus::Loading);

        let outcome = self.fetch_and_store(&link);
        match outcome {
            Ok(()) => {
                self.set_status(id, LinkStatus::Synced);
                self.invalidate_derived();
                Ok(())
            }
            Err(err) => {
                self.set_status(id, LinkStatus::Error);
                Err(err)
            }
        }
    }

    fn fetch_and_store(&mut self, link: &RepositoryLink) -> Result<()> {
        let fetched =
            self.client
                .get_file_content(&link.repository_uri, &link.file_path, &link.branch)?;

        let raw: serde_json::Value =
            serde_json::from_str(&fetched.content).map_err(|e| Error::Structural {
                message: format!("linked file is not valid JSON: {}", e),
                hint: None,
            })?;

        // Non-fatal: a misfiled document is worth a warning, and the parse
        // below will fail anyway if the shapes are truly incompatible.
        match detect_document_kind(&raw) {
            Some(detected) if detected != link.link_type => {
                log::warn!(
                    "link '{}' declares {} but the file looks like {}",
                    link.id,
                    link.link_type,
                    detected
                );
            }
            None => {
                log::warn!(
                    "link '{}': could not detect document kind from file shape",
                    link.id
                );
            }
            _ => {}
        }

        let document = parse_document(&fetched.content, link.link_type)?;

        let core = self
            .documents
            .get(&DocumentKind::Core)
            .and_then(|d| d.as_core())
            .cloned();
        let result = validator::validate_document(&document, core.as_ref());
        if !result.is_valid {
            return Err(Error::Validation {
                errors: result.errors,
            });
        }

        self.documents.insert(link.link_type, document);
        Ok(())
    }

    fn set_status(&mut self, id: &str, status: LinkStatus) {
        if let Some(link) = self.links.iter_mut().find(|l| l.id == id) {
            link.status = status;
        }
    }

    /// Drop derived results; recomputation is lazy.
    fn invalidate_derived(&mut self) {
        if let Err(e) = self.analytics_cache.invalidate_all() {
            log::warn!("analytics cache invalidation failed: {}", e);
        }
    }

    /// The current merged view across loaded documents, if a core is loaded.
    pub fn merged_view(&self) -> Option<MergedSystem> {
        let core = self
            .documents
            .get(&DocumentKind::Core)
            .and_then(|d| d.as_core())?;
        let platform = self
            .documents
            .get(&DocumentKind::PlatformExtension)
            .and_then(|d| d.as_platform_extension());
        let theme = self
            .documents
            .get(&DocumentKind::ThemeOverride)
            .and_then(|d| d.as_theme_override());
        Some(merge::merge(core, platform, theme))
    }

    /// Analytics over the current merged view, cached with a fixed TTL.
    pub fn analytics(&self) -> Result<Option<MergeAnalytics>> {
        let Some(core) = self
            .documents
            .get(&DocumentKind::Core)
            .and_then(|d| d.as_core())
        else {
            return Ok(None);
        };
        let platform = self
            .documents
            .get(&DocumentKind::PlatformExtension)
            .and_then(|d| d.as_platform_extension());
        let theme = self
            .documents
            .get(&DocumentKind::ThemeOverride)
            .and_then(|d| d.as_theme_override());

        let fingerprint = serde_json::to_string(&self.documents.values().collect::<Vec<_>>())
            .unwrap_or_default();
        let key = CacheKey::new(
            &self.active_kind.to_string(),
            core.system_id.as_str(),
            &fingerprint,
        );

        let merged = merge::merge(core, platform, theme);
        let analytics = self
            .analytics_cache
            .get_or_compute(key, || compute_analytics(core, platform, theme, &merged))?;
        Ok(Some(analytics))
    }
}

/// Accepts absolute URLs and `owner/repo` shorthand.
fn validate_repository_uri(uri: &str) -> Result<()> {
    if uri.contains("://") {
        url::Url::parse(uri)?;
        return Ok(());
    }
    if uri.split('/').filter(|s| !s.is_empty()).count() >= 2 {
        return Ok(());
    }
    Err(Error::Structural {
        message: format!("'{}' is not a repository URI", uri),
        hint: Some("use an absolute URL or owner/repo shorthand".to_string()),
    })
}
