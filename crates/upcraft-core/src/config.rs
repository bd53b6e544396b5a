//! Run configuration for one solve invocation.
//!
//! A [`PlanConfig`] is constructed by the caller (typically from a plan
//! file), validated once against the catalog, and then treated as
//! immutable for the rest of the solve.

use crate::catalog::Catalog;
use crate::error::ConfigurationError;
use crate::id::{BuildingId, ItemAtQuality, QualityTier, RecipeId};
use crate::modifier::{ModifierKind, ModifierSpec};
use std::collections::HashSet;
use std::hash::Hash;

/// An external input the plan may draw from freely, at a per-unit cost.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputSource {
    pub node: ItemAtQuality,
    pub cost: f64,
}

/// The single requested output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Demand {
    pub node: ItemAtQuality,
    pub amount: f64,
    /// Require exact production instead of at-least.
    pub exact: bool,
}

/// What happens to outputs that are neither the target nor an input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ByproductPolicy {
    /// Surplus is absorbed by a zero-cost sink.
    Void,
    /// Surplus must be consumed by some other variant in the model, or the
    /// model is infeasible.
    #[default]
    MustRecycle,
}

/// Objective cost coefficients. The caller decides what to minimize.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostWeights {
    /// Multiplier on the per-unit costs of external inputs.
    pub resource: f64,
    /// Cost per installed modifier, rate-weighted.
    pub module: f64,
    /// Cost per unit of variant activity.
    pub building: f64,
}

impl CostWeights {
    /// Pure input efficiency: minimize raw inputs only.
    pub fn inputs() -> Self {
        Self {
            resource: 1.0,
            module: 0.0,
            building: 0.0,
        }
    }

    /// Fewest modifiers: inputs are free.
    pub fn modules() -> Self {
        Self {
            resource: 0.0,
            module: 1.0,
            building: 0.0,
        }
    }

    /// Fewest building-instances of activity.
    pub fn buildings() -> Self {
        Self {
            resource: 0.0,
            module: 0.0,
            building: 1.0,
        }
    }
}

impl Default for CostWeights {
    fn default() -> Self {
        Self::inputs()
    }
}

/// An optional allow-list or deny-list over ids. Setting both is a
/// configuration error.
#[derive(Debug, Clone, Default)]
pub struct IdFilter<T> {
    pub allow: Option<HashSet<T>>,
    pub deny: Option<HashSet<T>>,
}

impl<T: Eq + Hash> IdFilter<T> {
    pub fn none() -> Self {
        Self {
            allow: None,
            deny: None,
        }
    }

    pub fn allowing(ids: HashSet<T>) -> Self {
        Self {
            allow: Some(ids),
            deny: None,
        }
    }

    pub fn denying(ids: HashSet<T>) -> Self {
        Self {
            allow: None,
            deny: Some(ids),
        }
    }

    fn is_conflicting(&self) -> bool {
        self.allow.is_some() && self.deny.is_some()
    }

    pub fn permits(&self, id: &T) -> bool {
        match (&self.allow, &self.deny) {
            (Some(allow), _) => allow.contains(id),
            (None, Some(deny)) => !deny.contains(id),
            (None, None) => true,
        }
    }
}

/// Everything a single solve needs besides the catalog.
#[derive(Debug, Clone)]
pub struct PlanConfig {
    pub quality_modifier: ModifierSpec,
    pub prod_modifier: ModifierSpec,
    /// The unlocked quality ceiling C.
    pub max_quality: QualityTier,
    pub inputs: Vec<InputSource>,
    pub demand: Demand,
    pub costs: CostWeights,
    pub byproducts: ByproductPolicy,
    pub recipe_filter: IdFilter<RecipeId>,
    pub building_filter: IdFilter<BuildingId>,
}

impl PlanConfig {
    /// Check this configuration against a catalog. Everything here is
    /// detected before any model construction starts.
    pub fn validate(&self, catalog: &Catalog) -> Result<(), ConfigurationError> {
        if self.quality_modifier.kind() != ModifierKind::Quality {
            return Err(ConfigurationError::WrongModifierKind {
                expected: ModifierKind::Quality,
                got: self.quality_modifier.kind(),
            });
        }
        if self.prod_modifier.kind() != ModifierKind::Productivity {
            return Err(ConfigurationError::WrongModifierKind {
                expected: ModifierKind::Productivity,
                got: self.prod_modifier.kind(),
            });
        }
        if self.demand.node.tier > self.max_quality {
            return Err(ConfigurationError::TargetAboveCeiling {
                target: self.demand.node.tier,
                ceiling: self.max_quality,
            });
        }
        if !(self.demand.amount > 0.0) {
            return Err(ConfigurationError::DemandNotPositive {
                amount: self.demand.amount,
            });
        }
        if self.recipe_filter.is_conflicting() {
            return Err(ConfigurationError::ConflictingRecipeFilter);
        }
        if self.building_filter.is_conflicting() {
            return Err(ConfigurationError::ConflictingBuildingFilter);
        }

        if catalog.item(self.demand.node.item).is_none() {
            return Err(ConfigurationError::InvalidItemRef(self.demand.node.item));
        }
        for input in &self.inputs {
            if catalog.item(input.node.item).is_none() {
                return Err(ConfigurationError::InvalidItemRef(input.node.item));
            }
            if input.node.tier > self.max_quality {
                return Err(ConfigurationError::InputAboveCeiling {
                    tier: input.node.tier,
                    ceiling: self.max_quality,
                });
            }
        }
        for set in [&self.recipe_filter.allow, &self.recipe_filter.deny] {
            for &id in set.iter().flat_map(|s| s.iter()) {
                if catalog.recipe(id).is_none() {
                    return Err(ConfigurationError::InvalidRecipeRef(id));
                }
            }
        }
        for set in [&self.building_filter.allow, &self.building_filter.deny] {
            for &id in set.iter().flat_map(|s| s.iter()) {
                if catalog.building(id).is_none() {
                    return Err(ConfigurationError::InvalidBuildingRef(id));
                }
            }
        }
        Ok(())
    }
}
