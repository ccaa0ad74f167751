//! Property-based tests for the diff and merge engines.
//!
//! The generators build small arbitrary token systems; the properties pin
//! the engine invariants that unit tests only sample: reflexivity and
//! order-insensitivity of the diff, determinism and input-purity of the
//! merge.

use proptest::prelude::*;

use crate::diff::{self, ChangeType};
use crate::document::SourceDocument;
use crate::merge;
use crate::model::{PlatformExtension, Token, TokenSystem, TokenValue, ValueByMode};

fn arb_token_id() -> impl Strategy<Value = String> {
    "[a-z]{3,8}".prop_map(|s| format!("token-{}", s))
}

fn arb_token() -> impl Strategy<Value = Token> {
    (arb_token_id(), "#[0-9a-f]{6}", any::<bool>()).prop_map(|(id, color, themeable)| Token {
        id: id.clone(),
        display_name: id,
        description: None,
        resolved_value_type_id: "color".to_string(),
        token_collection_id: None,
        taxonomies: vec![],
        themeable,
        private: false,
        status: None,
        values_by_mode: vec![ValueByMode {
            mode_ids: vec![],
            value: TokenValue::Literal {
                value: serde_json::Value::String(color),
            },
        }],
    })
}

/// A system with unique token ids (duplicate ids are a validation concern,
/// not a diff concern).
fn arb_system() -> impl Strategy<Value = TokenSystem> {
    proptest::collection::btree_map(arb_token_id(), arb_token(), 0..12).prop_map(|tokens| {
        let mut system: TokenSystem =
            serde_json::from_value(serde_json::json!({"systemId": "design-system"})).unwrap();
        system.tokens = tokens
            .into_iter()
            .map(|(id, mut token)| {
                token.id = id;
                token
            })
            .collect();
        system
    })
}

fn arb_extension() -> impl Strategy<Value = PlatformExtension> {
    proptest::collection::vec(arb_token(), 0..6).prop_map(|overrides| PlatformExtension {
        system_id: "design-system".to_string(),
        platform_id: "platform-ios".to_string(),
        version: "1.0.0".to_string(),
        figma_file_key: None,
        token_overrides: overrides,
        algorithm_variable_overrides: vec![],
        omitted_modes: vec![],
        omitted_dimensions: vec![],
        syntax_patterns: None,
        value_formatters: None,
        file_color_profile: None,
    })
}

proptest! {
    #[test]
    fn diff_of_identical_documents_is_empty(system in arb_system()) {
        let doc = SourceDocument::Core(system);
        prop_assert!(diff::diff_documents(&doc, &doc.clone()).is_empty());
    }

    #[test]
    fn diff_is_order_insensitive(system in arb_system()) {
        let mut reversed = system.clone();
        reversed.tokens.reverse();
        let old = SourceDocument::Core(system);
        let new = SourceDocument::Core(reversed);
        prop_assert!(diff::diff_documents(&old, &new).is_empty());
    }

    #[test]
    fn adding_one_token_yields_one_added_change(system in arb_system()) {
        let mut edited = system.clone();
        edited.tokens.push(Token {
            id: "token-zz-sentinel".to_string(),
            display_name: "Sentinel".to_string(),
            description: None,
            resolved_value_type_id: "color".to_string(),
            token_collection_id: None,
            taxonomies: vec![],
            themeable: false,
            private: false,
            status: None,
            values_by_mode: vec![],
        });

        let changes = diff::diff_documents(
            &SourceDocument::Core(system),
            &SourceDocument::Core(edited),
        );
        prop_assert_eq!(changes.len(), 1);
        prop_assert_eq!(changes[0].change_type, ChangeType::Added);
        prop_assert_eq!(changes[0].entity_id.as_str(), "token-zz-sentinel");
    }

    #[test]
    fn merge_is_deterministic(system in arb_system(), ext in arb_extension()) {
        let first = merge::merge(&system, Some(&ext), None);
        let second = merge::merge(&system, Some(&ext), None);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn merge_never_mutates_inputs(system in arb_system(), ext in arb_extension()) {
        let system_before = system.clone();
        let ext_before = ext.clone();
        let _ = merge::merge(&system, Some(&ext), None);
        prop_assert_eq!(system, system_before);
        prop_assert_eq!(ext, ext_before);
    }

    #[test]
    fn merged_token_count_is_core_plus_additions(system in arb_system(), ext in arb_extension()) {
        let merged = merge::merge(&system, Some(&ext), None);
        let additions = ext
            .token_overrides
            .iter()
            .map(|t| t.id.as_str())
            .collect::<std::collections::BTreeSet<_>>()
            .iter()
            .filter(|id| system.token(id).is_none())
            .count();
        prop_assert_eq!(merged.system().tokens.len(), system.tokens.len() + additions);
    }
}
