//! Upcraft Core -- the quality-upgrade production optimizer.
//!
//! This crate formulates tiered quality crafting as a minimum-cost flow
//! problem over (item, quality tier) nodes and solves it with an exact
//! linear-programming backend, selecting the recipe variants, modifier
//! loadouts, and external inputs that satisfy a quality-tiered demand at
//! minimum cost.
//!
//! # Pipeline
//!
//! A call to [`solve_plan`] runs five fixed stages:
//!
//! 1. **Validate** -- [`config::PlanConfig::validate`] rejects contradictory
//!    parameters (tiers above the ceiling, conflicting filters, ...).
//! 2. **Expand** -- [`variant::generate_variants`] crosses every permitted
//!    recipe with its starting tiers and modifier loadouts, computing each
//!    variant's quality distribution and productivity multiplier.
//! 3. **Model** -- [`model::build_model`] assembles one flow-conservation
//!    row per node and one column per variant, supply, and sink.
//! 4. **Solve** -- [`solve::solve`] lowers the program onto `microlp`.
//! 5. **Interpret** -- [`solution::interpret`] maps activities back to
//!    named recipes, inputs, and byproducts.
//!
//! # Key Types
//!
//! - [`catalog::Catalog`] -- Immutable registry of items, recipes, and
//!   buildings (frozen once built).
//! - [`config::PlanConfig`] -- One optimization run: modifiers, inputs,
//!   demand, cost weights, filters.
//! - [`quality::QualityTransition`] -- The per-craft tier-advance
//!   distribution.
//! - [`solution::PlanSolution`] -- The optimizer's answer.

pub mod catalog;
pub mod config;
pub mod error;
pub mod id;
pub mod model;
pub mod modifier;
pub mod quality;
pub mod solution;
pub mod solve;
pub mod variant;

pub use catalog::{Catalog, CatalogBuilder};
pub use config::PlanConfig;
pub use error::{ConfigurationError, PlanError, SolverFailure};
pub use id::{BuildingId, ItemAtQuality, ItemId, QualityTier, RecipeId};
pub use solution::PlanSolution;

/// Run the full pipeline on one configuration.
pub fn solve_plan(catalog: &Catalog, config: &PlanConfig) -> Result<PlanSolution, PlanError> {
    config.validate(catalog)?;
    let variants = variant::generate_variants(catalog, config)?;
    let lp = model::build_model(catalog, config, &variants)?;
    let raw = solve::solve(&lp)?;
    Ok(solution::interpret(&lp, &variants, &raw))
}
