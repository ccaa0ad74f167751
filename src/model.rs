//! # Document Data Model
//!
//! This module defines the data structures that represent the three document
//! kinds managed by `token-loom`: the core token system, per-platform
//! extension files, and per-theme override files. All structures round-trip
//! through JSON with camelCase field names, matching the documents stored in
//! repositories.
//!
//! ## Key Components
//!
//! - **`TokenSystem`**: the authoritative core dataset — tokens, collections,
//!   dimensions, platforms, themes, taxonomies, value types, component
//!   properties, algorithms, and repository wiring.
//!
//! - **`PlatformExtension`**: overrides and additions scoped to one platform,
//!   including omitted modes and dimensions that are removed from the merged
//!   view.
//!
//! - **`ThemeOverrideFile`**: per-theme replacements of token mode-values.
//!   A theme override never introduces new tokens and never touches any
//!   token field other than `valuesByMode`.
//!
//! - **`MergedSystem`**: the computed, read-only combination of the three
//!   layers. Produced exclusively by the merge engine and never persisted as
//!   a source of truth.
//!
//! Optional collections default to empty on deserialization so that older or
//! minimal documents parse without noise; semantic requirements (for example
//! "exactly one default theme") are the validator's concern, not serde's.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A design token value for one set of mode coordinates.
///
/// A value is either an alias pointing at another token or a literal JSON
/// value (color string, number, shadow object, and so on). The two shapes
/// are distinguished purely by field presence in the JSON documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TokenValue {
    /// A reference to another token's value.
    Alias {
        #[serde(rename = "tokenId")]
        token_id: String,
    },
    /// A raw value of the token's resolved value type.
    Literal { value: serde_json::Value },
}

/// One entry of a token's per-mode value table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueByMode {
    /// The mode coordinates this value applies to (one id per dimension).
    #[serde(default)]
    pub mode_ids: Vec<String>,
    /// The value itself, literal or alias.
    pub value: TokenValue,
}

/// A reference from a token to a taxonomy term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxonomyRef {
    pub taxonomy_id: String,
    pub term_id: String,
}

/// A single design token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    pub id: String,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// The value type this token resolves to; must name an entry in the
    /// core document's `resolvedValueTypes`.
    pub resolved_value_type_id: String,
    /// Optional owning collection; the collection must support the token's
    /// value type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_collection_id: Option<String>,
    #[serde(default)]
    pub taxonomies: Vec<TaxonomyRef>,
    #[serde(default)]
    pub themeable: bool,
    #[serde(default)]
    pub private: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default)]
    pub values_by_mode: Vec<ValueByMode>,
}

/// A named grouping of tokens constrained to a set of value types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenCollection {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub resolved_value_type_ids: Vec<String>,
}

/// One mode of a dimension (e.g. "light" within "color-scheme").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mode {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimension_id: Option<String>,
}

/// An axis of variation (color scheme, contrast, density, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dimension {
    pub id: String,
    pub display_name: String,
    #[serde(default)]
    pub modes: Vec<Mode>,
    #[serde(default)]
    pub resolved_value_type_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_mode: Option<String>,
    #[serde(default)]
    pub required: bool,
}

/// A delivery platform declared by the core document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Platform {
    pub id: String,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub syntax_patterns: Option<serde_json::Value>,
}

/// A theme declared by the core document. Exactly one theme must be marked
/// default; the validator enforces this.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    pub id: String,
    pub display_name: String,
    #[serde(default)]
    pub is_default: bool,
}

/// One term within a taxonomy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxonomyTerm {
    pub id: String,
    pub name: String,
}

/// A classification axis for tokens, with its terms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Taxonomy {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub terms: Vec<TaxonomyTerm>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_value_type_ids: Option<Vec<String>>,
}

/// A value type that tokens, dimensions, and collections may resolve to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedValueType {
    pub id: String,
    pub display_name: String,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub value_type: Option<String>,
}

/// An option of a list-kind component property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentPropertyOption {
    pub id: String,
    pub name: String,
}

/// The type-specific payload of a component property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ComponentPropertyKind {
    /// A list property: at least one option, and a default naming one of them.
    #[serde(rename_all = "camelCase")]
    List {
        #[serde(default)]
        options: Vec<ComponentPropertyOption>,
        default: String,
    },
    /// A boolean property: no options, boolean default.
    #[serde(rename_all = "camelCase")]
    Boolean {
        #[serde(default)]
        default: bool,
    },
}

/// A configurable property exposed by components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentProperty {
    pub id: String,
    pub display_name: String,
    #[serde(flatten)]
    pub kind: ComponentPropertyKind,
}

/// A grouping for components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentCategory {
    pub id: String,
    pub name: String,
}

/// A UI component tracked by the system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_category_id: Option<String>,
}

/// A variable of an algorithm, carrying per-mode values like a token does.
///
/// Expression evaluation is an external collaborator concern; the engine
/// only stores and overrides the variable tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlgorithmVariable {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub values_by_mode: Vec<ValueByMode>,
}

/// A formula/algorithm definition referenced by generated tokens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Algorithm {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub variables: Vec<AlgorithmVariable>,
}

/// A repository linked to the system for one document role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedRepository {
    pub id: String,
    #[serde(rename = "type")]
    pub link_type: String,
    pub repository_uri: String,
    #[serde(default = "default_branch")]
    pub branch: String,
    pub file_path: String,
}

/// Default Git branch for repository references.
pub fn default_branch() -> String {
    "main".to_string()
}

/// Where a platform's extension file lives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionFileRef {
    pub repository_uri: String,
    #[serde(default = "default_branch")]
    pub branch: String,
    pub file_path: String,
}

/// Figma export configuration. Only `fileColorProfile` may be overridden by
/// a platform extension; every other field is core-owned and passes through
/// the merge untouched.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FigmaConfiguration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_color_profile: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// The authoritative core dataset, before any platform or theme overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenSystem {
    pub system_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default)]
    pub tokens: Vec<Token>,
    #[serde(default)]
    pub token_collections: Vec<TokenCollection>,
    #[serde(default)]
    pub dimensions: Vec<Dimension>,
    /// Display/merge order of dimensions. Must be a permutation of the
    /// dimension ids; the merge engine reconstructs it when missing.
    #[serde(default)]
    pub dimension_order: Vec<String>,
    #[serde(default)]
    pub platforms: Vec<Platform>,
    #[serde(default)]
    pub themes: Vec<Theme>,
    #[serde(default)]
    pub taxonomies: Vec<Taxonomy>,
    #[serde(default)]
    pub taxonomy_order: Vec<String>,
    #[serde(default)]
    pub resolved_value_types: Vec<ResolvedValueType>,
    #[serde(default)]
    pub component_properties: Vec<ComponentProperty>,
    #[serde(default)]
    pub component_categories: Vec<ComponentCategory>,
    #[serde(default)]
    pub components: Vec<Component>,
    #[serde(default)]
    pub algorithms: Vec<Algorithm>,
    #[serde(default)]
    pub linked_repositories: Vec<LinkedRepository>,
    /// Inline per-platform extension payloads, keyed by platform id.
    #[serde(default)]
    pub platform_extensions: BTreeMap<String, serde_json::Value>,
    /// Locations of externally stored extension files, keyed by platform id.
    #[serde(default)]
    pub platform_extension_files: BTreeMap<String, ExtensionFileRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub figma_configuration: Option<FigmaConfiguration>,
}

impl TokenSystem {
    /// Look up a declared platform by id.
    pub fn platform(&self, id: &str) -> Option<&Platform> {
        self.platforms.iter().find(|p| p.id == id)
    }

    /// Look up a declared theme by id.
    pub fn theme(&self, id: &str) -> Option<&Theme> {
        self.themes.iter().find(|t| t.id == id)
    }

    /// Look up a token by id.
    pub fn token(&self, id: &str) -> Option<&Token> {
        self.tokens.iter().find(|t| t.id == id)
    }

    /// All mode ids declared across every dimension.
    pub fn mode_ids(&self) -> Vec<&str> {
        self.dimensions
            .iter()
            .flat_map(|d| d.modes.iter().map(|m| m.id.as_str()))
            .collect()
    }
}

/// A replacement of one algorithm variable's per-mode values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlgorithmVariableOverride {
    pub algorithm_id: String,
    pub variable_id: String,
    #[serde(default)]
    pub values_by_mode: Vec<ValueByMode>,
}

/// A per-platform extension document, identified by `(systemId, platformId)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformExtension {
    pub system_id: String,
    pub platform_id: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub figma_file_key: Option<String>,
    /// Full token replacements or additions, keyed by token id.
    #[serde(default)]
    pub token_overrides: Vec<Token>,
    #[serde(default)]
    pub algorithm_variable_overrides: Vec<AlgorithmVariableOverride>,
    /// Mode ids removed from every token's value table in the merged view.
    #[serde(default)]
    pub omitted_modes: Vec<String>,
    /// Dimension ids removed from the merged view entirely.
    #[serde(default)]
    pub omitted_dimensions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub syntax_patterns: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_formatters: Option<serde_json::Value>,
    /// Platform-level override of the core figma color profile. The only
    /// figma configuration field a platform may change.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_color_profile: Option<String>,
}

/// One theme-level replacement of a token's mode values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeTokenOverride {
    pub token_id: String,
    #[serde(default)]
    pub values_by_mode: Vec<ValueByMode>,
}

/// A per-theme override document, identified by `(systemId, themeId)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeOverrideFile {
    pub system_id: String,
    pub theme_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default)]
    pub token_overrides: Vec<ThemeTokenOverride>,
}

/// The materialized view: core with platform overrides then theme overrides
/// applied, in that order.
///
/// Only the merge engine constructs this type; consumers treat it as
/// read-only and recompute rather than mutate. It is never persisted as a
/// source of truth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedSystem {
    system: TokenSystem,
}

impl MergedSystem {
    pub(crate) fn new(system: TokenSystem) -> Self {
        Self { system }
    }

    /// Read access to the merged view.
    pub fn system(&self) -> &TokenSystem {
        &self.system
    }

    /// Consume the wrapper, e.g. to serialize the merged view.
    pub fn into_system(self) -> TokenSystem {
        self.system
    }
}
