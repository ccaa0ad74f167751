//! # Document Envelope and Kind Detection
//!
//! Raw JSON fetched from a repository is classified exactly once, at the
//! boundary, into a tagged [`SourceDocument`] envelope. Downstream code
//! switches on the explicit [`DocumentKind`] discriminant instead of
//! re-sniffing field presence at every call site.
//!
//! Detection is shape-based and intentionally loose — it exists to catch a
//! file stored under the wrong link role, not to validate the document.
//! Structural soundness is serde's job in [`parse_document`]; semantic
//! soundness is the validator's.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::model::{PlatformExtension, ThemeOverrideFile, TokenSystem};

/// The role a document plays in the layered system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DocumentKind {
    Core,
    PlatformExtension,
    ThemeOverride,
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DocumentKind::Core => "core",
            DocumentKind::PlatformExtension => "platform-extension",
            DocumentKind::ThemeOverride => "theme-override",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for DocumentKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "core" => Ok(DocumentKind::Core),
            "platform-extension" => Ok(DocumentKind::PlatformExtension),
            "theme-override" => Ok(DocumentKind::ThemeOverride),
            other => Err(Error::Structural {
                message: format!("unknown document kind '{}'", other),
                hint: Some(
                    "expected one of: core, platform-extension, theme-override".to_string(),
                ),
            }),
        }
    }
}

/// A parsed document tagged with its kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "kebab-case")]
pub enum SourceDocument {
    Core(TokenSystem),
    PlatformExtension(PlatformExtension),
    ThemeOverride(ThemeOverrideFile),
}

impl SourceDocument {
    /// The explicit discriminant of this document.
    pub fn kind(&self) -> DocumentKind {
        match self {
            SourceDocument::Core(_) => DocumentKind::Core,
            SourceDocument::PlatformExtension(_) => DocumentKind::PlatformExtension,
            SourceDocument::ThemeOverride(_) => DocumentKind::ThemeOverride,
        }
    }

    /// The `systemId` every document kind carries.
    pub fn system_id(&self) -> &str {
        match self {
            SourceDocument::Core(sys) => &sys.system_id,
            SourceDocument::PlatformExtension(ext) => &ext.system_id,
            SourceDocument::ThemeOverride(ov) => &ov.system_id,
        }
    }

    /// The id of the layer this document belongs to: the platform or theme
    /// id for extension documents, `None` for core.
    pub fn source_id(&self) -> Option<&str> {
        match self {
            SourceDocument::Core(_) => None,
            SourceDocument::PlatformExtension(ext) => Some(&ext.platform_id),
            SourceDocument::ThemeOverride(ov) => Some(&ov.theme_id),
        }
    }

    pub fn as_core(&self) -> Option<&TokenSystem> {
        match self {
            SourceDocument::Core(sys) => Some(sys),
            _ => None,
        }
    }

    pub fn as_platform_extension(&self) -> Option<&PlatformExtension> {
        match self {
            SourceDocument::PlatformExtension(ext) => Some(ext),
            _ => None,
        }
    }

    pub fn as_theme_override(&self) -> Option<&ThemeOverrideFile> {
        match self {
            SourceDocument::ThemeOverride(ov) => Some(ov),
            _ => None,
        }
    }
}

/// Guess the kind of a raw JSON document from its field shape.
///
/// Returns `None` when no known shape matches. Core is checked first since
/// a core document also carries `systemId`.
pub fn detect_document_kind(value: &serde_json::Value) -> Option<DocumentKind> {
    let obj = value.as_object()?;

    let has = |key: &str| obj.contains_key(key);

    if has("tokenCollections") && has("dimensions") && has("tokens") && has("platforms") {
        return Some(DocumentKind::Core);
    }
    if has("systemId") && has("platformId") && has("version") {
        return Some(DocumentKind::PlatformExtension);
    }
    if has("systemId") && has("themeId") && has("tokenOverrides") {
        return Some(DocumentKind::ThemeOverride);
    }
    None
}

/// Parse a raw JSON string as a document of the requested kind.
///
/// Serde failures are converted to [`Error::Structural`]; callers at the
/// load boundary catch these and turn them into load-failure results rather
/// than letting them escape past the API surface.
pub fn parse_document(content: &str, kind: DocumentKind) -> Result<SourceDocument> {
    let value: serde_json::Value = serde_json::from_str(content).map_err(|e| Error::Structural {
        message: format!("document is not valid JSON: {}", e),
        hint: None,
    })?;

    if !value.is_object() {
        return Err(Error::Structural {
            message: format!("expected a JSON object for a {} document", kind),
            hint: None,
        });
    }

    let structural = |e: serde_json::Error| Error::Structural {
        message: format!("document is not a well-formed {} document: {}", kind, e),
        hint: None,
    };

    match kind {
        DocumentKind::Core => {
            let system: TokenSystem = serde_json::from_value(value).map_err(structural)?;
            Ok(SourceDocument::Core(system))
        }
        DocumentKind::PlatformExtension => {
            let ext: PlatformExtension = serde_json::from_value(value).map_err(structural)?;
            Ok(SourceDocument::PlatformExtension(ext))
        }
        DocumentKind::ThemeOverride => {
            let ov: ThemeOverrideFile = serde_json::from_value(value).map_err(structural)?;
            Ok(SourceDocument::ThemeOverride(ov))
        }
    }
}
