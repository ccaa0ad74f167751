//! # Source Context and Session Addressing
//!
//! [`SourceContext`] records which logical role (core, platform, theme) is
//! being edited, where the core and active source documents live, and the
//! session's edit flags. It is created on session start (or restored from
//! the persistent store), mutated only by the source manager on source
//! switches, and cleared on explicit reset.
//!
//! URL query parameters are the externally addressable form of this state:
//! `repo`, `path`, `branch` (default `main`), `platform`, `theme`. Both
//! [`parse_url_parameters`] and [`determine_source_type`] are pure functions
//! over a string-keyed map, so hosts can bootstrap a session from any
//! parameter source.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// The logical role currently being edited or viewed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Core,
    Platform,
    Theme,
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SourceType::Core => "core",
            SourceType::Platform => "platform",
            SourceType::Theme => "theme",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for SourceType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s {
            "core" => Ok(SourceType::Core),
            "platform" => Ok(SourceType::Platform),
            "theme" => Ok(SourceType::Theme),
            other => Err(Error::Structural {
                message: format!("unknown source type '{}'", other),
                hint: Some("expected one of: core, platform, theme".to_string()),
            }),
        }
    }
}

/// Where a document lives in an external repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryCoordinates {
    pub repo_full_name: String,
    pub file_path: String,
    pub branch: String,
}

/// Per-session state describing the active source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceContext {
    pub source_type: SourceType,
    /// The platform or theme id when the source is an extension; `None` for
    /// core.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub core_repository: Option<RepositoryCoordinates>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_repository: Option<RepositoryCoordinates>,
    /// True while the session holds a mediated working copy; set by the
    /// source manager's edit path, cleared on load, save, and switch.
    #[serde(default)]
    pub edit_mode: bool,
    #[serde(default)]
    pub has_local_changes: bool,
    /// Unix seconds of the last successful source load.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_loaded_at: Option<u64>,
}

impl SourceContext {
    /// Fresh session context pointing at the core document.
    pub fn new_core() -> Self {
        Self {
            source_type: SourceType::Core,
            source_id: None,
            core_repository: None,
            source_repository: None,
            edit_mode: false,
            has_local_changes: false,
            last_loaded_at: None,
        }
    }

    /// Stamp the context with the current wall-clock time.
    pub fn touch(&mut self) {
        self.last_loaded_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .ok()
            .map(|d| d.as_secs());
    }
}

impl Default for SourceContext {
    fn default() -> Self {
        Self::new_core()
    }
}

/// The query parameters the engine consumes for session bootstrap.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UrlParameters {
    pub repo: Option<String>,
    pub path: Option<String>,
    pub branch: String,
    pub platform: Option<String>,
    pub theme: Option<String>,
}

/// Extract the recognized parameters from a string-keyed map.
///
/// Unrecognized keys are ignored; `branch` defaults to `main`.
pub fn parse_url_parameters(params: &HashMap<String, String>) -> UrlParameters {
    UrlParameters {
        repo: params.get("repo").cloned(),
        path: params.get("path").cloned(),
        branch: params
            .get("branch")
            .cloned()
            .unwrap_or_else(|| "main".to_string()),
        platform: params.get("platform").cloned(),
        theme: params.get("theme").cloned(),
    }
}

/// Decide the initial source type and id from parsed parameters.
///
/// Theme beats platform beats core, matching the specificity of the layers.
pub fn determine_source_type(params: &UrlParameters) -> (SourceType, Option<String>) {
    if let Some(theme) = &params.theme {
        return (SourceType::Theme, Some(theme.clone()));
    }
    if let Some(platform) = &params.platform {
        return (SourceType::Platform, Some(platform.clone()));
    }
    (SourceType::Core, None)
}

/// Build the initial session context from URL parameters.
pub fn context_from_parameters(params: &UrlParameters) -> SourceContext {
    let (source_type, source_id) = determine_source_type(params);
    let coordinates = params.repo.as_ref().map(|repo| RepositoryCoordinates {
        repo_full_name: repo.clone(),
        file_path: params.path.clone().unwrap_or_default(),
        branch: params.branch.clone(),
    });

    SourceContext {
        source_type,
        source_id,
        core_repository: coordinates.clone(),
        source_repository: coordinates,
        edit_mode: false,
        has_local_changes: false,
        last_loaded_at: None,
    }
}
