//! # Layered Merge Engine
//!
//! Combines a core document with at most one platform extension and at most
//! one theme override into a single [`MergedSystem`]. The merge is a pure
//! function of its three inputs: deterministic, side-effect free, and total
//! on validated documents. Inputs are never mutated; the engine works on a
//! clone of the core.
//!
//! ## Layer order
//!
//! Platform is always applied before theme. This is a hard invariant:
//! platform-level mode and dimension exclusions must already be in effect
//! when theme-level token lookups run, so a theme can only patch what the
//! platform layer left visible.
//!
//! ## Override semantics
//!
//! - A platform token override replaces the whole token by id (no
//!   field-level merging) or appends it as a new token.
//! - A platform algorithm variable override replaces that variable's
//!   `valuesByMode` wholesale.
//! - A theme token override patches `valuesByMode` only; every other field
//!   keeps its platform-merged value, and a theme never adds tokens.
//! - `figmaConfiguration` is core-owned except for `fileColorProfile`,
//!   which a platform (and only a platform) may override.

use std::collections::HashSet;

use crate::model::{MergedSystem, PlatformExtension, ThemeOverrideFile, TokenSystem};

/// Merge the three layers into one consistent view.
///
/// `merge(core, None, None)` is a plain (order-repaired) copy of core.
pub fn merge(
    core: &TokenSystem,
    platform: Option<&PlatformExtension>,
    theme: Option<&ThemeOverrideFile>,
) -> MergedSystem {
    let mut result = core.clone();

    repair_dimension_order(&mut result);

    if let Some(ext) = platform {
        apply_platform_extension(&mut result, ext);
    }

    if let Some(ov) = theme {
        apply_theme_override(&mut result, ov);
    }

    // Post-condition: never hand out a view whose order disagrees with its
    // dimension list.
    if !dimension_order_consistent(&result) {
        result.dimension_order = result.dimensions.iter().map(|d| d.id.clone()).collect();
    }

    MergedSystem::new(result)
}

/// Rebuild a missing or empty `dimensionOrder` from the declared dimension
/// order, so downstream consumers never see an absent ordering.
fn repair_dimension_order(system: &mut TokenSystem) {
    if system.dimension_order.is_empty() {
        system.dimension_order = system.dimensions.iter().map(|d| d.id.clone()).collect();
    }
}

fn dimension_order_consistent(system: &TokenSystem) -> bool {
    if system.dimension_order.len() != system.dimensions.len() {
        return false;
    }
    let ids: HashSet<&str> = system.dimensions.iter().map(|d| d.id.as_str()).collect();
    system
        .dimension_order
        .iter()
        .all(|id| ids.contains(id.as_str()))
}

fn apply_platform_extension(system: &mut TokenSystem, ext: &PlatformExtension) {
    // The platform may override the color profile only; every other figma
    // configuration field stays core-owned.
    if let Some(profile) = &ext.file_color_profile {
        system
            .figma_configuration
            .get_or_insert_with(Default::default)
            .file_color_profile = Some(profile.clone());
    }

    for override_token in &ext.token_overrides {
        match system
            .tokens
            .iter_mut()
            .find(|t| t.id == override_token.id)
        {
            Some(existing) => *existing = override_token.clone(),
            None => system.tokens.push(override_token.clone()),
        }
    }

    for var_override in &ext.algorithm_variable_overrides {
        let variable = system
            .algorithms
            .iter_mut()
            .find(|a| a.id == var_override.algorithm_id)
            .and_then(|a| {
                a.variables
                    .iter_mut()
                    .find(|v| v.id == var_override.variable_id)
            });
        if let Some(variable) = variable {
            variable.values_by_mode = var_override.values_by_mode.clone();
        }
    }

    if !ext.omitted_modes.is_empty() {
        let omitted: HashSet<&str> = ext.omitted_modes.iter().map(String::as_str).collect();
        for token in &mut system.tokens {
            token
                .values_by_mode
                .retain(|entry| !entry.mode_ids.iter().any(|m| omitted.contains(m.as_str())));
        }
    }

    if !ext.omitted_dimensions.is_empty() {
        let omitted: HashSet<&str> = ext.omitted_dimensions.iter().map(String::as_str).collect();
        // List and order are removed together; dropping one without the
        // other would leave an inconsistent view.
        system.dimensions.retain(|d| !omitted.contains(d.id.as_str()));
        system
            .dimension_order
            .retain(|id| !omitted.contains(id.as_str()));
    }
}

fn apply_theme_override(system: &mut TokenSystem, ov: &ThemeOverrideFile) {
    for token_override in &ov.token_overrides {
        // Locate-and-patch: only valuesByMode changes, and a token the
        // platform layer removed or never produced is skipped.
        if let Some(token) = system
            .tokens
            .iter_mut()
            .find(|t| t.id == token_override.token_id)
        {
            token.values_by_mode = token_override.values_by_mode.clone();
        }
    }
}
