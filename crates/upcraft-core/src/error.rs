//! Error types for plan construction and solving.
//!
//! Three kinds, matching how failures surface in practice:
//! [`ConfigurationError`] for contradictory or malformed run parameters
//! (detected before any model is built), `ModelInfeasible` for a model
//! whose demand is provably unreachable from the external inputs, and
//! [`SolverFailure`] for outcomes reported by the external LP engine.
//! No error is ever downgraded to a default value.

use crate::id::{BuildingId, ItemId, QualityTier, RecipeId};
use crate::modifier::ModifierKind;

/// Contradictory or malformed run parameters. Fatal; surfaced verbatim.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigurationError {
    /// Modifier tier outside the supported 1..=3 range.
    #[error("modifier tier {tier} out of range 1..=3")]
    ModifierTierOutOfRange { tier: u8 },

    /// Modifier quality level outside the supported 0..=4 range.
    #[error("modifier quality level {level} out of range 0..=4")]
    ModifierQualityOutOfRange { level: u8 },

    /// A modifier of the wrong kind was supplied (e.g. a productivity
    /// modifier where a quality modifier is required).
    #[error("expected a {expected:?} modifier, got {got:?}")]
    WrongModifierKind {
        expected: ModifierKind,
        got: ModifierKind,
    },

    /// The requested output tier is above the unlocked ceiling. Never
    /// silently clamped.
    #[error("target quality tier {} exceeds unlocked ceiling {}", target.0, ceiling.0)]
    TargetAboveCeiling {
        target: QualityTier,
        ceiling: QualityTier,
    },

    /// An external input sits above the unlocked ceiling.
    #[error("input quality tier {} exceeds unlocked ceiling {}", tier.0, ceiling.0)]
    InputAboveCeiling {
        tier: QualityTier,
        ceiling: QualityTier,
    },

    /// Both an allow-list and a deny-list were set for recipes.
    #[error("both allowed and disallowed recipe sets are configured")]
    ConflictingRecipeFilter,

    /// Both an allow-list and a deny-list were set for buildings.
    #[error("both allowed and disallowed building sets are configured")]
    ConflictingBuildingFilter,

    /// The demand amount must be strictly positive.
    #[error("demand amount {amount} is not positive")]
    DemandNotPositive { amount: f64 },

    /// A full quality loadout would push the aggregate tier-advance
    /// chance to 1 or beyond, which the transition model cannot express.
    #[error(
        "{slots} modifier slots with a per-modifier chance of {chance} saturate the advance probability"
    )]
    QualityChanceSaturated { slots: u8, chance: f64 },

    /// An item id does not exist in the catalog.
    #[error("invalid item reference: {0:?}")]
    InvalidItemRef(ItemId),

    /// A recipe id does not exist in the catalog.
    #[error("invalid recipe reference: {0:?}")]
    InvalidRecipeRef(RecipeId),

    /// A building id does not exist in the catalog.
    #[error("invalid building reference: {0:?}")]
    InvalidBuildingRef(BuildingId),
}

/// A failure reported by the external LP engine. The formulation is
/// deterministic, so these are never retried.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SolverFailure {
    /// The engine proved the constraint system infeasible.
    #[error("the linear program is infeasible")]
    Infeasible,

    /// The objective is unbounded below.
    #[error("the linear program is unbounded")]
    Unbounded,

    /// A numerical failure inside the engine.
    #[error("numerical failure in the solver: {0}")]
    Numerical(String),
}

/// Any error a solve invocation can produce.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlanError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// No chain of recipe variants connects the allowed external inputs to
    /// the named node. Detected by the reachability check, before the
    /// solver is ever invoked.
    #[error("model infeasible: no production chain supplies {node}")]
    ModelInfeasible { node: String },

    #[error(transparent)]
    Solver(#[from] SolverFailure),
}
