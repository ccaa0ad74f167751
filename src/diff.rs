//! # Change/Diff Engine
//!
//! Compares a source snapshot against the user's local edits and produces a
//! classified list of [`Change`]s: additions, modifications, and deletions,
//! one per affected entity id per collection. The engine is pure and
//! order-insensitive — insertion order inside the underlying arrays is
//! irrelevant; only set membership and per-id equality matter.
//!
//! ## Dispatch
//!
//! A deep-equality check runs first: structurally identical documents yield
//! an empty change list. Otherwise the comparison dispatches on the explicit
//! [`SourceDocument`] kind. Documents of different kinds (an ungoverned
//! comparison) collapse into a single whole-document `modified` change.
//!
//! ## Array-diff-by-id
//!
//! The core routine is generic over the entity type and its id accessor:
//! build an id → item map per side, classify ids present only on one side as
//! added/deleted, and ids present on both with unequal values as modified.
//! `BTreeMap` keeps the output deterministic without a sort pass.
//!
//! Deep equality is the derived structural `PartialEq` — type-aware, no
//! coercion, and without a cycle guard, since inputs originate from
//! deserialized JSON documents and are acyclic.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::document::SourceDocument;
use crate::model::{PlatformExtension, ThemeOverrideFile, TokenSystem};

/// Classification of a single difference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    Added,
    Modified,
    Deleted,
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChangeType::Added => "added",
            ChangeType::Modified => "modified",
            ChangeType::Deleted => "deleted",
        };
        write!(f, "{}", name)
    }
}

/// One classified difference between snapshot and local edits, scoped to a
/// single entity. A change never spans entity types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Change {
    #[serde(rename = "type")]
    pub change_type: ChangeType,
    /// Dotted location of the entity, e.g. `tokens.token-primary`.
    pub path: String,
    pub entity_type: String,
    pub entity_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_value: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_value: Option<serde_json::Value>,
}

/// Per-entity-type counts of a change list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityCounts {
    pub added: usize,
    pub modified: usize,
    pub deleted: usize,
}

/// Aggregated view of a change list, keyed by entity type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeSummary {
    pub by_entity_type: BTreeMap<String, EntityCounts>,
    pub total: usize,
}

/// Aggregate a change list into per-entity-type counts.
pub fn summarize(changes: &[Change]) -> ChangeSummary {
    let mut summary = ChangeSummary::default();
    for change in changes {
        let counts = summary
            .by_entity_type
            .entry(change.entity_type.clone())
            .or_default();
        match change.change_type {
            ChangeType::Added => counts.added += 1,
            ChangeType::Modified => counts.modified += 1,
            ChangeType::Deleted => counts.deleted += 1,
        }
    }
    summary.total = changes.len();
    summary
}

/// Compare two tagged documents and classify every difference.
pub fn diff_documents(snapshot: &SourceDocument, edits: &SourceDocument) -> Vec<Change> {
    if snapshot == edits {
        return Vec::new();
    }

    match (snapshot, edits) {
        (SourceDocument::Core(old), SourceDocument::Core(new)) => diff_token_systems(old, new),
        (SourceDocument::PlatformExtension(old), SourceDocument::PlatformExtension(new)) => {
            diff_platform_extensions(old, new)
        }
        (SourceDocument::ThemeOverride(old), SourceDocument::ThemeOverride(new)) => {
            diff_theme_overrides(old, new)
        }
        // Kinds disagree: the shapes are not comparable entity-by-entity, so
        // fall back to one whole-document change.
        (old, new) => vec![Change {
            change_type: ChangeType::Modified,
            path: String::new(),
            entity_type: "document".to_string(),
            entity_id: "document".to_string(),
            old_value: Some(to_json(old)),
            new_value: Some(to_json(new)),
        }],
    }
}

fn to_json<T: Serialize>(value: &T) -> serde_json::Value {
    serde_json::to_value(value).unwrap_or(serde_json::Value::Null)
}

/// Generic set-difference-plus-equality diff over id-keyed arrays.
///
/// O(n) with hashing; output ordered by id via `BTreeMap` so results are
/// stable regardless of input array order.
fn diff_by_id<'a, T, F>(
    entity_type: &str,
    collection: &str,
    old: &'a [T],
    new: &'a [T],
    id_of: F,
) -> Vec<Change>
where
    T: Serialize + PartialEq,
    F: Fn(&'a T) -> String,
{
    let old_map: BTreeMap<String, &T> = old.iter().map(|item| (id_of(item), item)).collect();
    let new_map: BTreeMap<String, &T> = new.iter().map(|item| (id_of(item), item)).collect();

    let all_ids: BTreeSet<&String> = old_map.keys().chain(new_map.keys()).collect();

    let mut changes = Vec::new();
    for id in all_ids {
        let path = format!("{}.{}", collection, id);
        match (old_map.get(id), new_map.get(id)) {
            (Some(old_item), None) => changes.push(Change {
                change_type: ChangeType::Deleted,
                path,
                entity_type: entity_type.to_string(),
                entity_id: id.clone(),
                old_value: Some(to_json(old_item)),
                new_value: None,
            }),
            (None, Some(new_item)) => changes.push(Change {
                change_type: ChangeType::Added,
                path,
                entity_type: entity_type.to_string(),
                entity_id: id.clone(),
                old_value: None,
                new_value: Some(to_json(new_item)),
            }),
            (Some(old_item), Some(new_item)) if old_item != new_item => changes.push(Change {
                change_type: ChangeType::Modified,
                path,
                entity_type: entity_type.to_string(),
                entity_id: id.clone(),
                old_value: Some(to_json(old_item)),
                new_value: Some(to_json(new_item)),
            }),
            _ => {}
        }
    }
    changes
}

/// Key-diff over map-shaped fields.
fn diff_by_key<V: Serialize + PartialEq>(
    entity_type: &str,
    collection: &str,
    old: &BTreeMap<String, V>,
    new: &BTreeMap<String, V>,
) -> Vec<Change> {
    let all_keys: BTreeSet<&String> = old.keys().chain(new.keys()).collect();

    let mut changes = Vec::new();
    for key in all_keys {
        let path = format!("{}.{}", collection, key);
        match (old.get(key), new.get(key)) {
            (Some(old_value), None) => changes.push(Change {
                change_type: ChangeType::Deleted,
                path,
                entity_type: entity_type.to_string(),
                entity_id: key.clone(),
                old_value: Some(to_json(old_value)),
                new_value: None,
            }),
            (None, Some(new_value)) => changes.push(Change {
                change_type: ChangeType::Added,
                path,
                entity_type: entity_type.to_string(),
                entity_id: key.clone(),
                old_value: None,
                new_value: Some(to_json(new_value)),
            }),
            (Some(old_value), Some(new_value)) if old_value != new_value => {
                changes.push(Change {
                    change_type: ChangeType::Modified,
                    path,
                    entity_type: entity_type.to_string(),
                    entity_id: key.clone(),
                    old_value: Some(to_json(old_value)),
                    new_value: Some(to_json(new_value)),
                })
            }
            _ => {}
        }
    }
    changes
}

/// Single `modified` change for a scalar or ordering field whose value
/// differs, keyed by the field name itself.
fn diff_whole_value<T: Serialize + PartialEq>(field: &str, old: &T, new: &T) -> Vec<Change> {
    if old == new {
        return Vec::new();
    }
    vec![Change {
        change_type: ChangeType::Modified,
        path: field.to_string(),
        entity_type: field.to_string(),
        entity_id: field.to_string(),
        old_value: Some(to_json(old)),
        new_value: Some(to_json(new)),
    }]
}

fn diff_token_systems(old: &TokenSystem, new: &TokenSystem) -> Vec<Change> {
    let mut changes = Vec::new();

    changes.extend(diff_by_id("token", "tokens", &old.tokens, &new.tokens, |t| {
        t.id.clone()
    }));
    changes.extend(diff_by_id(
        "tokenCollection",
        "tokenCollections",
        &old.token_collections,
        &new.token_collections,
        |c| c.id.clone(),
    ));
    changes.extend(diff_by_id(
        "dimension",
        "dimensions",
        &old.dimensions,
        &new.dimensions,
        |d| d.id.clone(),
    ));
    changes.extend(diff_by_id(
        "platform",
        "platforms",
        &old.platforms,
        &new.platforms,
        |p| p.id.clone(),
    ));
    changes.extend(diff_by_id("theme", "themes", &old.themes, &new.themes, |t| {
        t.id.clone()
    }));
    changes.extend(diff_by_id(
        "resolvedValueType",
        "resolvedValueTypes",
        &old.resolved_value_types,
        &new.resolved_value_types,
        |t| t.id.clone(),
    ));
    changes.extend(diff_by_id(
        "taxonomy",
        "taxonomies",
        &old.taxonomies,
        &new.taxonomies,
        |t| t.id.clone(),
    ));
    changes.extend(diff_by_id(
        "algorithm",
        "algorithms",
        &old.algorithms,
        &new.algorithms,
        |a| a.id.clone(),
    ));
    changes.extend(diff_by_id(
        "componentProperty",
        "componentProperties",
        &old.component_properties,
        &new.component_properties,
        |p| p.id.clone(),
    ));
    changes.extend(diff_by_id(
        "componentCategory",
        "componentCategories",
        &old.component_categories,
        &new.component_categories,
        |c| c.id.clone(),
    ));
    changes.extend(diff_by_id(
        "component",
        "components",
        &old.components,
        &new.components,
        |c| c.id.clone(),
    ));
    changes.extend(diff_by_id(
        "linkedRepository",
        "linkedRepositories",
        &old.linked_repositories,
        &new.linked_repositories,
        |l| l.id.clone(),
    ));

    changes.extend(diff_by_key(
        "platformExtension",
        "platformExtensions",
        &old.platform_extensions,
        &new.platform_extensions,
    ));
    changes.extend(diff_by_key(
        "platformExtensionFile",
        "platformExtensionFiles",
        &old.platform_extension_files,
        &new.platform_extension_files,
    ));

    changes.extend(diff_whole_value(
        "taxonomyOrder",
        &old.taxonomy_order,
        &new.taxonomy_order,
    ));
    changes.extend(diff_whole_value(
        "dimensionOrder",
        &old.dimension_order,
        &new.dimension_order,
    ));
    changes.extend(diff_whole_value(
        "figmaConfiguration",
        &old.figma_configuration,
        &new.figma_configuration,
    ));

    // Header fields are not part of the reference collection list, but a
    // rename-only edit still has to show up as a change.
    changes.extend(diff_whole_value(
        "systemHeader",
        &(&old.system_id, &old.system_name, &old.version),
        &(&new.system_id, &new.system_name, &new.version),
    ));

    changes
}

fn diff_platform_extensions(old: &PlatformExtension, new: &PlatformExtension) -> Vec<Change> {
    let mut changes = Vec::new();

    changes.extend(diff_by_id(
        "tokenOverride",
        "tokenOverrides",
        &old.token_overrides,
        &new.token_overrides,
        |t| t.id.clone(),
    ));
    changes.extend(diff_by_id(
        "algorithmVariableOverride",
        "algorithmVariableOverrides",
        &old.algorithm_variable_overrides,
        &new.algorithm_variable_overrides,
        |o| format!("{}::{}", o.algorithm_id, o.variable_id),
    ));

    changes.extend(diff_whole_value(
        "omittedModes",
        &old.omitted_modes,
        &new.omitted_modes,
    ));
    changes.extend(diff_whole_value(
        "omittedDimensions",
        &old.omitted_dimensions,
        &new.omitted_dimensions,
    ));
    changes.extend(diff_whole_value(
        "syntaxPatterns",
        &old.syntax_patterns,
        &new.syntax_patterns,
    ));
    changes.extend(diff_whole_value(
        "valueFormatters",
        &old.value_formatters,
        &new.value_formatters,
    ));
    changes.extend(diff_whole_value(
        "extensionHeader",
        &(
            &old.system_id,
            &old.platform_id,
            &old.version,
            &old.figma_file_key,
            &old.file_color_profile,
        ),
        &(
            &new.system_id,
            &new.platform_id,
            &new.version,
            &new.figma_file_key,
            &new.file_color_profile,
        ),
    ));

    changes
}

fn diff_theme_overrides(old: &ThemeOverrideFile, new: &ThemeOverrideFile) -> Vec<Change> {
    let mut changes = Vec::new();

    changes.extend(diff_by_id(
        "tokenOverride",
        "tokenOverrides",
        &old.token_overrides,
        &new.token_overrides,
        |t| t.token_id.clone(),
    ));
    changes.extend(diff_whole_value(
        "overrideHeader",
        &(&old.system_id, &old.theme_id, &old.version),
        &(&new.system_id, &new.theme_id, &new.version),
    ));

    changes
}
