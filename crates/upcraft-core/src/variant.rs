//! Recipe variant generation.
//!
//! Expands each base recipe into the full cross-product of permitted
//! building x starting tier x modifier loadout, annotating every variant
//! with its consumption vector and its productivity-scaled production
//! distribution. Eager and bounded: tier counts and slot counts are small
//! constants, and the external solver, not this enumeration, is the
//! practical bottleneck.

use crate::catalog::{BuildingDef, Catalog, RecipeDef};
use crate::config::PlanConfig;
use crate::error::ConfigurationError;
use crate::id::{BuildingId, ItemAtQuality, QualityTier, RecipeId};
use crate::modifier::{LoadoutPolicy, ModifierLoadout, enumerate_loadouts};
use crate::quality::QualityTransition;
use std::collections::BTreeMap;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Upper bound on the total productivity bonus of one stage, modifiers
/// and building intrinsics combined.
pub const MAX_PRODUCTIVITY_BONUS: f64 = 3.0;

/// The stable identity of a variant: (starting tier, base recipe,
/// building, quality-modifier count, productivity-modifier count).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VariantKey {
    pub tier: QualityTier,
    pub recipe: RecipeId,
    pub building: BuildingId,
    pub quality_count: u8,
    pub prod_count: u8,
}

/// One fully specified production step -- the atomic decision unit of the
/// linear program. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeVariant {
    pub key: VariantKey,
    /// Items consumed per unit of activity, attached to the starting tier.
    pub consumption: Vec<(ItemAtQuality, f64)>,
    /// Items produced per unit of activity, spread over the reachable
    /// tiers and already scaled by the productivity multiplier.
    pub production: Vec<(ItemAtQuality, f64)>,
}

impl RecipeVariant {
    pub fn module_count(&self) -> u32 {
        u32::from(self.key.quality_count) + u32::from(self.key.prod_count)
    }
}

/// Expand every permitted base recipe into its variants for this run.
/// Variants whose vectors are identical after ceiling clamping are
/// deduplicated, keeping the cheapest loadout.
pub fn generate_variants(
    catalog: &Catalog,
    config: &PlanConfig,
) -> Result<Vec<RecipeVariant>, ConfigurationError> {
    let transition = QualityTransition::from_spec(config.quality_modifier)?;
    let prod_bonus = config.prod_modifier.bonus();

    let mut selected: Vec<(RecipeId, &RecipeDef, &BuildingDef)> = Vec::new();
    for (id, recipe) in catalog.recipes() {
        if !config.recipe_filter.permits(&id) || !config.building_filter.permits(&recipe.building)
        {
            continue;
        }
        let building = catalog
            .building(recipe.building)
            .ok_or(ConfigurationError::InvalidBuildingRef(recipe.building))?;
        // A full quality loadout must keep the aggregate advance chance
        // strictly below 1, or the transition distribution over-counts.
        if transition.advance_chance(building.module_slots) >= 1.0 {
            return Err(ConfigurationError::QualityChanceSaturated {
                slots: building.module_slots,
                chance: config.quality_modifier.bonus(),
            });
        }
        selected.push((id, recipe, building));
    }

    #[cfg(feature = "parallel")]
    let groups: Vec<Vec<RecipeVariant>> = selected
        .par_iter()
        .map(|&(id, recipe, building)| expand_recipe(config, &transition, prod_bonus, id, recipe, building))
        .collect();
    #[cfg(not(feature = "parallel"))]
    let groups: Vec<Vec<RecipeVariant>> = selected
        .iter()
        .map(|&(id, recipe, building)| expand_recipe(config, &transition, prod_bonus, id, recipe, building))
        .collect();

    let variants: Vec<RecipeVariant> = groups.into_iter().flatten().collect();
    tracing::debug!(
        recipes = selected.len(),
        variants = variants.len(),
        "expanded recipe variants"
    );
    Ok(variants)
}

/// All variants of a single base recipe, deduplicated within the recipe.
fn expand_recipe(
    config: &PlanConfig,
    transition: &QualityTransition,
    prod_bonus: f64,
    id: RecipeId,
    recipe: &RecipeDef,
    building: &BuildingDef,
) -> Vec<RecipeVariant> {
    let policy = if recipe.is_recycling {
        LoadoutPolicy::MaxQuality
    } else {
        LoadoutPolicy::Free
    };
    let allow_prod = recipe.allow_productivity && building.accepts_productivity;
    let loadouts = enumerate_loadouts(building.module_slots, allow_prod, policy);

    let mut variants = Vec::new();
    for tier in QualityTier::up_to(config.max_quality) {
        for &loadout in &loadouts {
            let candidate = build_variant(
                config, transition, prod_bonus, id, recipe, building, tier, loadout,
            );
            push_deduped(&mut variants, candidate);
        }
    }
    variants
}

#[allow(clippy::too_many_arguments)]
fn build_variant(
    config: &PlanConfig,
    transition: &QualityTransition,
    prod_bonus: f64,
    id: RecipeId,
    recipe: &RecipeDef,
    building: &BuildingDef,
    tier: QualityTier,
    loadout: ModifierLoadout,
) -> RecipeVariant {
    // Productivity scales amounts uniformly; it never reshapes the
    // quality distribution. The total bonus is capped.
    let bonus = (f64::from(loadout.prod_count) * prod_bonus + building.base_prod_bonus)
        .min(MAX_PRODUCTIVITY_BONUS);
    let multiplier = 1.0 + bonus;

    let mut consumption: BTreeMap<ItemAtQuality, f64> = BTreeMap::new();
    for entry in &recipe.ingredients {
        *consumption
            .entry(ItemAtQuality::new(entry.item, tier))
            .or_insert(0.0) += entry.amount;
    }

    let dist = transition.distribution(loadout.quality_count, tier, config.max_quality);
    let mut production: BTreeMap<ItemAtQuality, f64> = BTreeMap::new();
    for entry in &recipe.results {
        for &(out_tier, p) in &dist {
            *production
                .entry(ItemAtQuality::new(entry.item, out_tier))
                .or_insert(0.0) += entry.amount * p * multiplier;
        }
    }

    RecipeVariant {
        key: VariantKey {
            tier,
            recipe: id,
            building: recipe.building,
            quality_count: loadout.quality_count,
            prod_count: loadout.prod_count,
        },
        consumption: consumption.into_iter().collect(),
        production: production.into_iter().collect(),
    }
}

/// Keep only one variant per distinct (tier, consumption, production)
/// triple, preferring the one with fewer installed modifiers.
fn push_deduped(variants: &mut Vec<RecipeVariant>, candidate: RecipeVariant) {
    if let Some(existing) = variants.iter_mut().find(|v| {
        v.key.tier == candidate.key.tier
            && v.consumption == candidate.consumption
            && v.production == candidate.production
    }) {
        if candidate.module_count() < existing.module_count() {
            *existing = candidate;
        }
    } else {
        variants.push(candidate);
    }
}
