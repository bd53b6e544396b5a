//! Interpretation of raw engine output as a production plan.

use crate::id::ItemAtQuality;
use crate::model::{ColumnKind, LinearProgram};
use crate::solve::RawSolution;
use crate::variant::{RecipeVariant, VariantKey};

/// Activities below this are solver noise, not plan content.
const ACTIVITY_EPSILON: f64 = 1e-9;

/// One active variant and its rate.
#[derive(Debug, Clone, PartialEq)]
pub struct VariantUsage {
    pub key: VariantKey,
    pub rate: f64,
}

/// One external input actually drawn on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputUsage {
    pub node: ItemAtQuality,
    pub rate: f64,
}

/// One node where surplus is discarded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ByproductUsage {
    pub node: ItemAtQuality,
    pub rate: f64,
}

/// The optimizer's answer: the objective plus every nonzero activity,
/// grouped by meaning. Rates are per unit of demanded output flow.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanSolution {
    pub objective_value: f64,
    pub inputs: Vec<InputUsage>,
    pub variants: Vec<VariantUsage>,
    pub byproducts: Vec<ByproductUsage>,
    /// Activity-weighted count of installed modifiers across the plan.
    pub total_modules: f64,
    /// Activity-weighted count of running production steps.
    pub total_buildings: f64,
}

/// Map engine activities back through the column table, dropping noise.
pub fn interpret(
    lp: &LinearProgram,
    variants: &[RecipeVariant],
    raw: &RawSolution,
) -> PlanSolution {
    let mut inputs = Vec::new();
    let mut used = Vec::new();
    let mut byproducts = Vec::new();
    let mut total_modules = 0.0;
    let mut total_buildings = 0.0;

    for (column, &rate) in lp.columns.iter().zip(&raw.values) {
        if rate <= ACTIVITY_EPSILON {
            continue;
        }
        match column.kind {
            ColumnKind::Variant(index) => {
                let variant = &variants[index];
                total_modules += rate * f64::from(variant.module_count());
                total_buildings += rate;
                used.push(VariantUsage {
                    key: variant.key,
                    rate,
                });
            }
            ColumnKind::Supply(node) => inputs.push(InputUsage { node, rate }),
            ColumnKind::Sink(node) => byproducts.push(ByproductUsage { node, rate }),
        }
    }

    PlanSolution {
        objective_value: raw.objective_value,
        inputs,
        variants: used,
        byproducts,
        total_modules,
        total_buildings,
    }
}
