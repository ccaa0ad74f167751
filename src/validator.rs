//! # Schema and Cross-Reference Validation
//!
//! Pure validation over parsed documents. Every check accumulates: a single
//! pass reports all violations it can see rather than stopping at the first,
//! so a round-trip with a misconfigured document surfaces the full repair
//! list at once.
//!
//! Validation never fails with an `Error` for well-typed input — the outcome
//! is always a [`ValidationResult`]. Structural problems (wrong JSON shape)
//! are caught earlier, at [`crate::document::parse_document`].
//!
//! ## Check groups
//!
//! Core documents:
//! 1. `resolvedValueTypes` must be non-empty when tokens exist. When this
//!    fails, checks that depend on the known-type set are skipped (they
//!    would only echo the same root cause per entity).
//! 2. Tokens: known value type, alias targets exist, owning collection
//!    exists and supports the token's type.
//! 3. Dimensions: valid value types; `dimensionOrder` is a permutation of
//!    the dimension ids.
//! 4. Collections and taxonomies: valid value types, at least one taxonomy
//!    term, `taxonomyOrder` ids exist.
//! 5. Themes: exactly one default.
//! 6. Component properties: unique ids, list defaults name a declared option.
//!
//! Extension documents additionally run cross-document checks against the
//! core: `systemId` equality, declared platform/theme id, override targets,
//! omitted mode/dimension ids, and a semver-parseable `version`.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::document::SourceDocument;
use crate::model::{
    ComponentPropertyKind, PlatformExtension, ThemeOverrideFile, Token, TokenSystem, TokenValue,
};

/// The outcome of validating one document (or one document against core).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

impl ValidationResult {
    /// A passing result with no errors.
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
        }
    }

    /// Build a result from accumulated error messages.
    pub fn from_errors(errors: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }
}

/// Validate a tagged document, running cross-document checks when a core
/// document is supplied.
///
/// Extension documents require `core`; validating one without it reports a
/// single error rather than silently skipping the cross-document group.
pub fn validate_document(doc: &SourceDocument, core: Option<&TokenSystem>) -> ValidationResult {
    match doc {
        SourceDocument::Core(system) => validate_token_system(system),
        SourceDocument::PlatformExtension(ext) => match core {
            Some(core) => validate_platform_extension(ext, core),
            None => ValidationResult::from_errors(vec![
                "platform extension cannot be validated without a core document".to_string(),
            ]),
        },
        SourceDocument::ThemeOverride(ov) => match core {
            Some(core) => validate_theme_override(ov, core),
            None => ValidationResult::from_errors(vec![
                "theme override cannot be validated without a core document".to_string(),
            ]),
        },
    }
}

/// Validate a core token system document.
pub fn validate_token_system(system: &TokenSystem) -> ValidationResult {
    let mut errors = Vec::new();

    let known_types: HashSet<&str> = system
        .resolved_value_types
        .iter()
        .map(|t| t.id.as_str())
        .collect();

    // Categorical precondition: type-dependent checks are meaningless when
    // the type registry is empty, so they are skipped below.
    let types_available = !known_types.is_empty();
    if !types_available && !system.tokens.is_empty() {
        errors.push("resolvedValueTypes must not be empty when tokens are defined".to_string());
    }

    let token_ids: HashSet<&str> = system.tokens.iter().map(|t| t.id.as_str()).collect();

    for token in &system.tokens {
        check_token(token, system, &known_types, &token_ids, types_available, &mut errors);
    }

    for dimension in &system.dimensions {
        if dimension.resolved_value_type_ids.is_empty() {
            errors.push(format!(
                "dimension '{}' has no resolvedValueTypeIds",
                dimension.id
            ));
        } else if types_available {
            for type_id in &dimension.resolved_value_type_ids {
                if !known_types.contains(type_id.as_str()) {
                    errors.push(format!(
                        "dimension '{}' references unknown resolved value type '{}'",
                        dimension.id, type_id
                    ));
                }
            }
        }
    }

    check_dimension_order(system, &mut errors);

    for collection in &system.token_collections {
        if collection.resolved_value_type_ids.is_empty() {
            errors.push(format!(
                "token collection '{}' has no resolvedValueTypeIds",
                collection.id
            ));
        } else if types_available {
            for type_id in &collection.resolved_value_type_ids {
                if !known_types.contains(type_id.as_str()) {
                    errors.push(format!(
                        "token collection '{}' references unknown resolved value type '{}'",
                        collection.id, type_id
                    ));
                }
            }
        }
    }

    check_taxonomies(system, &known_types, types_available, &mut errors);
    check_themes(system, &mut errors);
    check_component_properties(system, &mut errors);

    ValidationResult::from_errors(errors)
}

fn check_token(
    token: &Token,
    system: &TokenSystem,
    known_types: &HashSet<&str>,
    token_ids: &HashSet<&str>,
    types_available: bool,
    errors: &mut Vec<String>,
) {
    if token.resolved_value_type_id.is_empty() {
        errors.push(format!("token '{}' has no resolvedValueTypeId", token.id));
    } else if types_available && !known_types.contains(token.resolved_value_type_id.as_str()) {
        errors.push(format!(
            "token '{}' references unknown resolved value type '{}'",
            token.id, token.resolved_value_type_id
        ));
    }

    for entry in &token.values_by_mode {
        if let TokenValue::Alias { token_id } = &entry.value {
            if !token_ids.contains(token_id.as_str()) {
                errors.push(format!(
                    "token '{}' aliases unknown token '{}'",
                    token.id, token_id
                ));
            }
        }
    }

    if let Some(collection_id) = &token.token_collection_id {
        match system
            .token_collections
            .iter()
            .find(|c| &c.id == collection_id)
        {
            Some(collection) => {
                if types_available
                    && !collection
                        .resolved_value_type_ids
                        .contains(&token.resolved_value_type_id)
                {
                    errors.push(format!(
                        "token '{}' has type '{}' which collection '{}' does not support",
                        token.id, token.resolved_value_type_id, collection_id
                    ));
                }
            }
            None => {
                errors.push(format!(
                    "token '{}' references unknown collection '{}'",
                    token.id, collection_id
                ));
            }
        }
    }
}

fn check_dimension_order(system: &TokenSystem, errors: &mut Vec<String>) {
    // An absent order is legal; the merge engine reconstructs it.
    if system.dimension_order.is_empty() {
        return;
    }

    let dimension_ids: HashSet<&str> = system.dimensions.iter().map(|d| d.id.as_str()).collect();
    let mut seen: HashSet<&str> = HashSet::new();

    for id in &system.dimension_order {
        if !seen.insert(id.as_str()) {
            errors.push(format!("dimensionOrder contains duplicate id '{}'", id));
        }
        if !dimension_ids.contains(id.as_str()) {
            errors.push(format!(
                "dimensionOrder references unknown dimension '{}'",
                id
            ));
        }
    }

    for id in &dimension_ids {
        if !seen.contains(id) {
            errors.push(format!("dimensionOrder is missing dimension '{}'", id));
        }
    }
}

fn check_taxonomies(
    system: &TokenSystem,
    known_types: &HashSet<&str>,
    types_available: bool,
    errors: &mut Vec<String>,
) {
    for taxonomy in &system.taxonomies {
        if taxonomy.terms.is_empty() {
            errors.push(format!("taxonomy '{}' has no terms", taxonomy.id));
        }
        if types_available {
            if let Some(type_ids) = &taxonomy.resolved_value_type_ids {
                for type_id in type_ids {
                    if !known_types.contains(type_id.as_str()) {
                        errors.push(format!(
                            "taxonomy '{}' references unknown resolved value type '{}'",
                            taxonomy.id, type_id
                        ));
                    }
                }
            }
        }
    }

    let taxonomy_ids: HashSet<&str> = system.taxonomies.iter().map(|t| t.id.as_str()).collect();
    for id in &system.taxonomy_order {
        if !taxonomy_ids.contains(id.as_str()) {
            errors.push(format!("taxonomyOrder references unknown taxonomy '{}'", id));
        }
    }
}

fn check_themes(system: &TokenSystem, errors: &mut Vec<String>) {
    if system.themes.is_empty() {
        return;
    }
    let default_count = system.themes.iter().filter(|t| t.is_default).count();
    if default_count != 1 {
        errors.push(format!(
            "exactly one theme must be marked default, found {}",
            default_count
        ));
    }
}

fn check_component_properties(system: &TokenSystem, errors: &mut Vec<String>) {
    let mut seen_ids: HashSet<&str> = HashSet::new();

    for property in &system.component_properties {
        if !seen_ids.insert(property.id.as_str()) {
            errors.push(format!("duplicate component property id '{}'", property.id));
        }

        if let ComponentPropertyKind::List { options, default } = &property.kind {
            if options.is_empty() {
                errors.push(format!(
                    "list component property '{}' has no options",
                    property.id
                ));
            }

            let mut option_ids: HashSet<&str> = HashSet::new();
            for option in options {
                if !option_ids.insert(option.id.as_str()) {
                    errors.push(format!(
                        "component property '{}' has duplicate option id '{}'",
                        property.id, option.id
                    ));
                }
            }

            if !options.is_empty() && !option_ids.contains(default.as_str()) {
                errors.push(format!(
                    "component property '{}' default '{}' does not name an option",
                    property.id, default
                ));
            }
        }
    }
}

/// Validate a platform extension against its core document.
pub fn validate_platform_extension(
    ext: &PlatformExtension,
    core: &TokenSystem,
) -> ValidationResult {
    let mut errors = Vec::new();

    if ext.system_id != core.system_id {
        errors.push(format!(
            "systemId mismatch: extension declares '{}' but core is '{}'",
            ext.system_id, core.system_id
        ));
    }

    if core.platform(&ext.platform_id).is_none() {
        errors.push(format!(
            "platform '{}' is not declared in the core document",
            ext.platform_id
        ));
    }

    if semver::Version::parse(&ext.version).is_err() {
        errors.push(format!(
            "version '{}' is not a valid semantic version",
            ext.version
        ));
    }

    // Overrides with ids unknown to core are additions, not errors; their
    // value types still have to come from core's registry.
    let known_types: HashSet<&str> = core
        .resolved_value_types
        .iter()
        .map(|t| t.id.as_str())
        .collect();
    for token in &ext.token_overrides {
        if !known_types.is_empty() && !known_types.contains(token.resolved_value_type_id.as_str())
        {
            errors.push(format!(
                "token override '{}' references unknown resolved value type '{}'",
                token.id, token.resolved_value_type_id
            ));
        }
    }

    let algorithm_ids: HashSet<&str> = core.algorithms.iter().map(|a| a.id.as_str()).collect();
    for var_override in &ext.algorithm_variable_overrides {
        if !algorithm_ids.contains(var_override.algorithm_id.as_str()) {
            errors.push(format!(
                "algorithm variable override references unknown algorithm '{}'",
                var_override.algorithm_id
            ));
        }
    }

    let mode_ids: HashSet<&str> = core.mode_ids().into_iter().collect();
    for mode_id in &ext.omitted_modes {
        if !mode_ids.contains(mode_id.as_str()) {
            errors.push(format!("omittedModes references unknown mode '{}'", mode_id));
        }
    }

    let dimension_ids: HashSet<&str> = core.dimensions.iter().map(|d| d.id.as_str()).collect();
    for dimension_id in &ext.omitted_dimensions {
        if !dimension_ids.contains(dimension_id.as_str()) {
            errors.push(format!(
                "omittedDimensions references unknown dimension '{}'",
                dimension_id
            ));
        }
    }

    ValidationResult::from_errors(errors)
}

/// Validate a theme override file against its core document.
pub fn validate_theme_override(ov: &ThemeOverrideFile, core: &TokenSystem) -> ValidationResult {
    let mut errors = Vec::new();

    if ov.system_id != core.system_id {
        errors.push(format!(
            "systemId mismatch: override declares '{}' but core is '{}'",
            ov.system_id, core.system_id
        ));
    }

    if core.theme(&ov.theme_id).is_none() {
        errors.push(format!(
            "theme '{}' is not declared in the core document",
            ov.theme_id
        ));
    }

    // A theme patches existing tokens only; unknown targets are dangling.
    for token_override in &ov.token_overrides {
        if core.token(&token_override.token_id).is_none() {
            errors.push(format!(
                "token override targets unknown token '{}'",
                token_override.token_id
            ));
        }
    }

    ValidationResult::from_errors(errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn core_fixture() -> TokenSystem {
        serde_json::from_value(json!({
            "systemId": "design-system",
            "resolvedValueTypes": [
                {"id": "color", "displayName": "Color"},
                {"id": "spacing", "displayName": "Spacing"}
            ],
            "tokenCollections": [
                {"id": "collection-brand", "name": "Brand", "resolvedValueTypeIds": ["color"]}
            ],
            "dimensions": [
                {
                    "id": "dim-scheme",
                    "displayName": "Color Scheme",
                    "resolvedValueTypeIds": ["color"],
                    "modes": [
                        {"id": "mode-light", "name": "Light"},
                        {"id": "mode-dark", "name": "Dark"}
                    ]
                }
            ],
            "dimensionOrder": ["dim-scheme"],
            "platforms": [{"id": "platform-ios", "displayName": "iOS"}],
            "themes": [
                {"id": "theme-default", "displayName": "Default", "isDefault": true},
                {"id": "theme-dark", "displayName": "Dark"}
            ],
            "algorithms": [{"id": "alg-scale", "name": "Scale", "variables": []}],
            "tokens": [
                {
                    "id": "token-primary",
                    "displayName": "Primary",
                    "resolvedValueTypeId": "color",
                    "tokenCollectionId": "collection-brand",
                    "valuesByMode": [
                        {"modeIds": ["mode-light"], "value": {"value": "#0055ff"}}
                    ]
                }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_valid_core_passes() {
        let result = validate_token_system(&core_fixture());
        assert!(result.is_valid, "unexpected errors: {:?}", result.errors);
    }

    #[test]
    fn test_tokens_without_value_types_fail() {
        let mut system = core_fixture();
        system.resolved_value_types.clear();
        let result = validate_token_system(&system);
        assert!(!result.is_valid);
        assert!(result
            .errors
            .iter()
            .any(|e| e.contains("resolvedValueTypes must not be empty")));
        // Type-dependent checks are skipped, so the token's now-unknown type
        // is not reported a second time.
        assert!(!result.errors.iter().any(|e| e.contains("unknown resolved value type")));
    }

    #[test]
    fn test_unknown_token_type_reported() {
        let mut system = core_fixture();
        system.tokens[0].resolved_value_type_id = "elevation".to_string();
        let result = validate_token_system(&system);
        assert!(!result.is_valid);
        assert!(result
            .errors
            .iter()
            .any(|e| e.contains("unknown resolved value type 'elevation'")));
    }

    #[test]
    fn test_dangling_alias_reported() {
        let mut system = core_fixture();
        system.tokens[0].values_by_mode[0].value = TokenValue::Alias {
            token_id: "token-missing".to_string(),
        };
        let result = validate_token_system(&system);
        assert!(result
            .errors
            .iter()
            .any(|e| e.contains("aliases unknown token 'token-missing'")));
    }

    #[test]
    fn test_collection_type_support_checked() {
        let mut system = core_fixture();
        // Collection only supports colors; retype the token as spacing.
        system.tokens[0].resolved_value_type_id = "spacing".to_string();
        let result = validate_token_system(&system);
        assert!(result
            .errors
            .iter()
            .any(|e| e.contains("collection 'collection-brand' does not support")));
    }

    #[test]
    fn test_unknown_collection_reported() {
        let mut system = core_fixture();
        system.tokens[0].token_collection_id = Some("collection-missing".to_string());
        let result = validate_token_system(&system);
        assert!(result
            .errors
            .iter()
            .any(|e| e.contains("unknown collection 'collection-missing'")));
    }

    #[test]
    fn test_dimension_order_duplicate_fails() {
        let mut system = core_fixture();
        system.dimension_order = vec!["dim-scheme".to_string(), "dim-scheme".to_string()];
        let result = validate_token_system(&system);
        assert!(result
            .errors
            .iter()
            .any(|e| e.contains("duplicate id 'dim-scheme'")));
    }

    #[test]
    fn test_dimension_order_unknown_id_fails() {
        let mut system = core_fixture();
        system.dimension_order.push("dim-ghost".to_string());
        let result = validate_token_system(&system);
        assert!(result
            .errors
            .iter()
            .any(|e| e.contains("unknown dimension 'dim-ghost'")));
    }

    #[test]
    fn test_dimension_order_missing_id_fails() {
        let mut system = core_fixture();
        system.dimensions.push(
            serde_json::from_value(json!({
                "id": "dim-density",
                "displayName": "Density",
                "resolvedValueTypeIds": ["spacing"],
                "modes": [{"id": "mode-compact", "name": "Compact"}]
            }))
            .unwrap(),
        );
        // Order still lists only dim-scheme.
        let result = validate_token_system(&system);
        assert!(result
            .errors
            .iter()
            .any(|e| e.contains("missing dimension 'dim-density'")));
    }

    #[test]
    fn test_dimension_order_permutation_passes() {
        let mut system = core_fixture();
        system.dimensions.push(
            serde_json::from_value(json!({
                "id": "dim-density",
                "displayName": "Density",
                "resolvedValueTypeIds": ["spacing"],
                "modes": [{"id": "mode-compact", "name": "Compact"}]
            }))
            .unwrap(),
        );
        // Reversed relative to the declared dimensions; still a complete
        // permutation, so it must validate cleanly.
        system.dimension_order = vec!["dim-density".to_string(), "dim-scheme".to_string()];
        let result = validate_token_system(&system);
        assert!(result.is_valid, "unexpected errors: {:?}", result.errors);
    }

    #[test]
    fn test_empty_dimension_order_is_legal() {
        let mut system = core_fixture();
        system.dimension_order.clear();
        let result = validate_token_system(&system);
        assert!(result.is_valid, "unexpected errors: {:?}", result.errors);
    }

    #[test]
    fn test_theme_default_cardinality() {
        let mut system = core_fixture();
        system.themes[1].is_default = true;
        let result = validate_token_system(&system);
        assert!(result
            .errors
            .iter()
            .any(|e| e.contains("exactly one theme must be marked default, found 2")));

        system.themes[0].is_default = false;
        system.themes[1].is_default = false;
        let result = validate_token_system(&system);
        assert!(result
            .errors
            .iter()
            .any(|e| e.contains("found 0")));
    }

    #[test]
    fn test_taxonomy_without_terms_fails() {
        let mut system = core_fixture();
        system.taxonomies.push(
            serde_json::from_value(json!({"id": "tax-usage", "name": "Usage", "terms": []}))
                .unwrap(),
        );
        let result = validate_token_system(&system);
        assert!(result.errors.iter().any(|e| e.contains("has no terms")));
    }

    #[test]
    fn test_taxonomy_order_unknown_id_fails() {
        let mut system = core_fixture();
        system.taxonomy_order.push("tax-ghost".to_string());
        let result = validate_token_system(&system);
        assert!(result
            .errors
            .iter()
            .any(|e| e.contains("unknown taxonomy 'tax-ghost'")));
    }

    #[test]
    fn test_component_property_rules() {
        let mut system = core_fixture();
        system.component_properties = serde_json::from_value(json!([
            {
                "id": "prop-size",
                "displayName": "Size",
                "type": "list",
                "options": [
                    {"id": "opt-s", "name": "Small"},
                    {"id": "opt-s", "name": "Small again"}
                ],
                "default": "opt-m"
            },
            {"id": "prop-size", "displayName": "Shadowed", "type": "boolean", "default": false}
        ]))
        .unwrap();

        let result = validate_token_system(&system);
        assert!(result
            .errors
            .iter()
            .any(|e| e.contains("duplicate component property id 'prop-size'")));
        assert!(result
            .errors
            .iter()
            .any(|e| e.contains("duplicate option id 'opt-s'")));
        assert!(result
            .errors
            .iter()
            .any(|e| e.contains("default 'opt-m' does not name an option")));
    }

    #[test]
    fn test_errors_accumulate_across_groups() {
        let mut system = core_fixture();
        system.tokens[0].resolved_value_type_id = "elevation".to_string();
        system.dimension_order.push("dim-ghost".to_string());
        system.themes[1].is_default = true;
        let result = validate_token_system(&system);
        assert!(result.errors.len() >= 3, "errors: {:?}", result.errors);
    }

    fn extension_fixture() -> PlatformExtension {
        serde_json::from_value(json!({
            "systemId": "design-system",
            "platformId": "platform-ios",
            "version": "1.2.0",
            "omittedModes": ["mode-dark"],
            "omittedDimensions": []
        }))
        .unwrap()
    }

    #[test]
    fn test_valid_platform_extension_passes() {
        let result = validate_platform_extension(&extension_fixture(), &core_fixture());
        assert!(result.is_valid, "unexpected errors: {:?}", result.errors);
    }

    #[test]
    fn test_platform_extension_system_id_mismatch() {
        let mut ext = extension_fixture();
        ext.system_id = "other".to_string();
        let result = validate_platform_extension(&ext, &core_fixture());
        assert!(result
            .errors
            .iter()
            .any(|e| e.contains("systemId mismatch")));
    }

    #[test]
    fn test_platform_extension_unknown_platform() {
        let mut ext = extension_fixture();
        ext.platform_id = "platform-watch".to_string();
        let result = validate_platform_extension(&ext, &core_fixture());
        assert!(result
            .errors
            .iter()
            .any(|e| e.contains("platform 'platform-watch' is not declared")));
    }

    #[test]
    fn test_platform_extension_bad_version() {
        let mut ext = extension_fixture();
        ext.version = "one-point-oh".to_string();
        let result = validate_platform_extension(&ext, &core_fixture());
        assert!(result
            .errors
            .iter()
            .any(|e| e.contains("not a valid semantic version")));
    }

    #[test]
    fn test_platform_extension_unknown_omitted_ids() {
        let mut ext = extension_fixture();
        ext.omitted_modes.push("mode-ghost".to_string());
        ext.omitted_dimensions.push("dim-ghost".to_string());
        let result = validate_platform_extension(&ext, &core_fixture());
        assert!(result
            .errors
            .iter()
            .any(|e| e.contains("unknown mode 'mode-ghost'")));
        assert!(result
            .errors
            .iter()
            .any(|e| e.contains("unknown dimension 'dim-ghost'")));
    }

    #[test]
    fn test_platform_extension_unknown_algorithm() {
        let mut ext = extension_fixture();
        ext.algorithm_variable_overrides = serde_json::from_value(json!([
            {"algorithmId": "alg-ghost", "variableId": "var-1", "valuesByMode": []}
        ]))
        .unwrap();
        let result = validate_platform_extension(&ext, &core_fixture());
        assert!(result
            .errors
            .iter()
            .any(|e| e.contains("unknown algorithm 'alg-ghost'")));
    }

    #[test]
    fn test_platform_override_addition_is_not_an_error() {
        let mut ext = extension_fixture();
        ext.token_overrides = serde_json::from_value(json!([{
            "id": "token-ios-only",
            "displayName": "iOS Only",
            "resolvedValueTypeId": "color",
            "valuesByMode": []
        }]))
        .unwrap();
        let result = validate_platform_extension(&ext, &core_fixture());
        assert!(result.is_valid, "unexpected errors: {:?}", result.errors);
    }

    #[test]
    fn test_theme_override_checks() {
        let core = core_fixture();
        let ov: ThemeOverrideFile = serde_json::from_value(json!({
            "systemId": "design-system",
            "themeId": "theme-dark",
            "tokenOverrides": [
                {"tokenId": "token-primary", "valuesByMode": []},
                {"tokenId": "token-missing", "valuesByMode": []}
            ]
        }))
        .unwrap();

        let result = validate_theme_override(&ov, &core);
        assert!(!result.is_valid);
        assert!(result
            .errors
            .iter()
            .any(|e| e.contains("unknown token 'token-missing'")));
    }

    #[test]
    fn test_theme_override_unknown_theme() {
        let ov: ThemeOverrideFile = serde_json::from_value(json!({
            "systemId": "design-system",
            "themeId": "theme-ghost",
            "tokenOverrides": []
        }))
        .unwrap();
        let result = validate_theme_override(&ov, &core_fixture());
        assert!(result
            .errors
            .iter()
            .any(|e| e.contains("theme 'theme-ghost' is not declared")));
    }

    #[test]
    fn test_validate_document_dispatch() {
        let core = core_fixture();
        let doc = SourceDocument::Core(core.clone());
        assert!(validate_document(&doc, None).is_valid);

        let ext_doc = SourceDocument::PlatformExtension(extension_fixture());
        assert!(validate_document(&ext_doc, Some(&core)).is_valid);
        // Extensions need a core to validate against.
        assert!(!validate_document(&ext_doc, None).is_valid);
    }
}
