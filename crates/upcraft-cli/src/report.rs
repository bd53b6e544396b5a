//! Solution rendering: human-readable plan report and CSV export.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;
use upcraft_core::catalog::Catalog;
use upcraft_core::id::RecipeId;
use upcraft_core::solution::{PlanSolution, VariantUsage};

/// Render the plan as a machine-layout style report: inputs first, then
/// active variants grouped by recipe with per-tier loadout annotations.
pub fn write_report<W: Write>(
    out: &mut W,
    catalog: &Catalog,
    plan: &PlanSolution,
) -> std::io::Result<()> {
    writeln!(out, "objective: {:.4}", plan.objective_value)?;

    if !plan.inputs.is_empty() {
        writeln!(out)?;
        writeln!(out, "inputs:")?;
        for input in &plan.inputs {
            writeln!(
                out,
                "  {:<28} {:>12.4}",
                catalog.node_label(input.node),
                input.rate
            )?;
        }
    }

    let mut by_recipe: BTreeMap<RecipeId, Vec<&VariantUsage>> = BTreeMap::new();
    for usage in &plan.variants {
        by_recipe.entry(usage.key.recipe).or_default().push(usage);
    }

    writeln!(out)?;
    writeln!(out, "plan:")?;
    for (recipe_id, mut usages) in by_recipe {
        let recipe_name = catalog
            .recipe(recipe_id)
            .map_or_else(|| format!("recipe{}", recipe_id.0), |r| r.name.clone());
        writeln!(out, "  {recipe_name}:")?;
        usages.sort_by_key(|u| (u.key.tier, u.key.quality_count, u.key.prod_count));
        for usage in usages {
            writeln!(
                out,
                "    {:<12} {}Q {}P {:>12.4}",
                usage.key.tier.name(),
                usage.key.quality_count,
                usage.key.prod_count,
                usage.rate
            )?;
        }
    }

    if !plan.byproducts.is_empty() {
        writeln!(out)?;
        writeln!(out, "discarded byproducts:")?;
        for byproduct in &plan.byproducts {
            writeln!(
                out,
                "  {:<28} {:>12.4}",
                catalog.node_label(byproduct.node),
                byproduct.rate
            )?;
        }
    }

    writeln!(out)?;
    writeln!(
        out,
        "totals: {:.4} modifiers, {:.4} production steps",
        plan.total_modules, plan.total_buildings
    )?;
    Ok(())
}

/// Export the active variant table as CSV, one row per variant.
pub fn export_csv(path: &Path, catalog: &Catalog, plan: &PlanSolution) -> csv::Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record([
        "recipe",
        "quality",
        "building",
        "quality_modules",
        "prod_modules",
        "rate",
    ])?;
    for usage in &plan.variants {
        let recipe_name = catalog
            .recipe(usage.key.recipe)
            .map_or_else(|| format!("recipe{}", usage.key.recipe.0), |r| r.name.clone());
        let building_name = catalog
            .building(usage.key.building)
            .map_or_else(|| format!("building{}", usage.key.building.0), |b| b.name.clone());
        writer.write_record([
            recipe_name,
            usage.key.tier.name().into_owned(),
            building_name,
            usage.key.quality_count.to_string(),
            usage.key.prod_count.to_string(),
            format!("{:.6}", usage.rate),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use upcraft_core::catalog::{CatalogBuilder, RecipeEntry};
    use upcraft_core::id::{ItemAtQuality, QualityTier};
    use upcraft_core::solution::InputUsage;
    use upcraft_core::variant::VariantKey;

    fn fixture() -> (Catalog, PlanSolution) {
        let mut b = CatalogBuilder::new();
        let ore = b.register_item("ore");
        let plate = b.register_item("plate");
        let furnace = b.register_building("furnace", 4, 0.0, true);
        let smelt = b.register_recipe(
            "smelt",
            furnace,
            vec![RecipeEntry {
                item: ore,
                amount: 1.0,
            }],
            vec![RecipeEntry {
                item: plate,
                amount: 1.0,
            }],
            true,
            false,
        );
        let catalog = b.build().unwrap();
        let plan = PlanSolution {
            objective_value: 12.5,
            inputs: vec![InputUsage {
                node: ItemAtQuality::new(ore, QualityTier(0)),
                rate: 12.5,
            }],
            variants: vec![upcraft_core::solution::VariantUsage {
                key: VariantKey {
                    tier: QualityTier(0),
                    recipe: smelt,
                    building: furnace,
                    quality_count: 2,
                    prod_count: 2,
                },
                rate: 12.5,
            }],
            byproducts: vec![],
            total_modules: 50.0,
            total_buildings: 12.5,
        };
        (catalog, plan)
    }

    #[test]
    fn report_names_recipes_and_tiers() {
        let (catalog, plan) = fixture();
        let mut buffer = Vec::new();
        write_report(&mut buffer, &catalog, &plan).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.contains("objective: 12.5000"));
        assert!(text.contains("smelt:"));
        assert!(text.contains("normal"));
        assert!(text.contains("2Q 2P"));
        assert!(text.contains("normal__ore"));
    }
}
