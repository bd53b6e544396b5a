//! Resolution pipeline: reads a plan file, resolves name references, and
//! builds the catalog plus run configuration.
//!
//! Format is detected from the file extension (RON/JSON/TOML). Each recipe
//! line synthesizes its own building carrying the slot count and any flat
//! productivity bonus, so the core never sees file-level recipe knobs.

use crate::schema::{MinimizeData, MinimizePreset, PlanFile, RecipeData};
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use upcraft_core::catalog::{Catalog, CatalogBuilder, CatalogError, RecipeEntry};
use upcraft_core::config::{
    ByproductPolicy, CostWeights, Demand, IdFilter, InputSource, PlanConfig,
};
use upcraft_core::error::ConfigurationError;
use upcraft_core::id::{ItemAtQuality, QualityTier, RecipeId};
use upcraft_core::modifier::{ModifierKind, ModifierSpec};

// ===========================================================================
// Errors
// ===========================================================================

/// Errors that can occur while loading a plan file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    /// The file has an extension we don't support.
    #[error("unsupported format for file: {file}")]
    UnsupportedFormat { file: PathBuf },

    /// A deserialization error occurred.
    #[error("parse error in {file}: {detail}")]
    Parse { file: PathBuf, detail: String },

    /// A name reference could not be resolved.
    #[error("unresolved {expected_kind} reference '{name}'")]
    UnresolvedRef {
        name: String,
        expected_kind: &'static str,
    },

    /// A duplicate name was found.
    #[error("duplicate {kind} name '{name}'")]
    DuplicateName { kind: &'static str, name: String },

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The resolved parameters contradict each other.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// The resolved catalog is malformed.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

// ===========================================================================
// Format detection
// ===========================================================================

/// Supported plan file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Ron,
    Toml,
    Json,
}

/// Detect the format of a file based on its extension.
pub fn detect_format(path: &Path) -> Result<Format, ConfigLoadError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("ron") => Ok(Format::Ron),
        Some("toml") => Ok(Format::Toml),
        Some("json") => Ok(Format::Json),
        _ => Err(ConfigLoadError::UnsupportedFormat {
            file: path.to_path_buf(),
        }),
    }
}

/// Read a file and deserialize it according to its format.
fn deserialize_file<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigLoadError> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;

    match format {
        Format::Ron => ron::from_str(&content).map_err(|e| ConfigLoadError::Parse {
            file: path.to_path_buf(),
            detail: e.to_string(),
        }),
        Format::Json => serde_json::from_str(&content).map_err(|e| ConfigLoadError::Parse {
            file: path.to_path_buf(),
            detail: e.to_string(),
        }),
        Format::Toml => toml::from_str(&content).map_err(|e| ConfigLoadError::Parse {
            file: path.to_path_buf(),
            detail: e.to_string(),
        }),
    }
}

// ===========================================================================
// Resolution
// ===========================================================================

/// A fully resolved plan, ready to solve.
#[derive(Debug)]
pub struct ResolvedPlan {
    pub catalog: Catalog,
    pub config: PlanConfig,
}

/// Load and resolve a plan file.
pub fn load_plan(path: &Path) -> Result<ResolvedPlan, ConfigLoadError> {
    let file: PlanFile = deserialize_file(path)?;
    resolve_plan(&file)
}

/// Resolve a deserialized plan file into core types. Name references are
/// checked here; parameter consistency is checked by the core validator.
pub fn resolve_plan(file: &PlanFile) -> Result<ResolvedPlan, ConfigLoadError> {
    let mut builder = CatalogBuilder::new();

    let mut seen_items: HashSet<&str> = HashSet::new();
    for name in &file.items {
        if !seen_items.insert(name) {
            return Err(ConfigLoadError::DuplicateName {
                kind: "item",
                name: name.clone(),
            });
        }
        builder.register_item(name);
    }

    let mut seen_recipes: HashSet<&str> = HashSet::new();
    for recipe in &file.recipes {
        if !seen_recipes.insert(&recipe.key) {
            return Err(ConfigLoadError::DuplicateName {
                kind: "recipe",
                name: recipe.key.clone(),
            });
        }
        register_recipe(&mut builder, recipe)?;
    }

    let catalog = builder.build()?;
    let config = resolve_config(&catalog, file)?;
    config.validate(&catalog)?;
    Ok(ResolvedPlan { catalog, config })
}

/// Each recipe gets its own synthesized building: the file's slot count
/// and flat bonus live there, and recycling stages refuse productivity
/// modifiers at the building level.
fn register_recipe(
    builder: &mut CatalogBuilder,
    recipe: &RecipeData,
) -> Result<(), ConfigLoadError> {
    let building = builder.register_building(
        &recipe.key,
        recipe.module_slots,
        recipe.additional_prod,
        !recipe.is_recycling,
    );
    let ingredients = resolve_entries(builder, &recipe.ingredients)?;
    let results = resolve_entries(builder, &recipe.results)?;
    builder.register_recipe(
        &recipe.key,
        building,
        ingredients,
        results,
        recipe.allow_productivity,
        recipe.is_recycling,
    );
    Ok(())
}

fn resolve_entries(
    builder: &CatalogBuilder,
    entries: &[crate::schema::EntryData],
) -> Result<Vec<RecipeEntry>, ConfigLoadError> {
    entries
        .iter()
        .map(|entry| {
            let item = builder
                .item_id(&entry.name)
                .ok_or_else(|| ConfigLoadError::UnresolvedRef {
                    name: entry.name.clone(),
                    expected_kind: "item",
                })?;
            Ok(RecipeEntry {
                item,
                amount: entry.amount,
            })
        })
        .collect()
}

fn resolve_config(catalog: &Catalog, file: &PlanFile) -> Result<PlanConfig, ConfigLoadError> {
    // File tiers are zero-based; modifier hardware tiers are 1-based.
    let quality_modifier = ModifierSpec::new(
        ModifierKind::Quality,
        file.quality_module_tier.saturating_add(1),
        file.quality_module_quality_level,
    )?;
    let prod_modifier = ModifierSpec::new(
        ModifierKind::Productivity,
        file.prod_module_tier.saturating_add(1),
        file.prod_module_quality_level,
    )?;
    let max_quality = QualityTier(file.max_quality_unlocked);

    let mut inputs = Vec::with_capacity(file.inputs.len());
    for input in &file.inputs {
        let item = catalog
            .item_id(&input.name)
            .ok_or_else(|| ConfigLoadError::UnresolvedRef {
                name: input.name.clone(),
                expected_kind: "item",
            })?;
        inputs.push(InputSource {
            node: ItemAtQuality::new(item, QualityTier(input.quality)),
            cost: input.cost,
        });
    }

    let output_item =
        catalog
            .item_id(&file.output.item_id)
            .ok_or_else(|| ConfigLoadError::UnresolvedRef {
                name: file.output.item_id.clone(),
                expected_kind: "item",
            })?;
    let output_tier = file
        .output
        .quality
        .map_or(max_quality, QualityTier);
    let demand = Demand {
        node: ItemAtQuality::new(output_item, output_tier),
        amount: file.output.amount,
        exact: file.output.exact,
    };

    let costs = match &file.minimize {
        MinimizeData::Preset(MinimizePreset::Inputs) => CostWeights::inputs(),
        MinimizeData::Preset(MinimizePreset::Modules) => CostWeights::modules(),
        MinimizeData::Preset(MinimizePreset::Buildings) => CostWeights::buildings(),
        MinimizeData::Weights {
            resource,
            module,
            building,
        } => CostWeights {
            resource: *resource,
            module: *module,
            building: *building,
        },
    };

    let recipe_filter = IdFilter {
        allow: file
            .allowed_recipes
            .as_deref()
            .map(|names| resolve_recipe_set(catalog, names))
            .transpose()?,
        deny: file
            .disallowed_recipes
            .as_deref()
            .map(|names| resolve_recipe_set(catalog, names))
            .transpose()?,
    };

    Ok(PlanConfig {
        quality_modifier,
        prod_modifier,
        max_quality,
        inputs,
        demand,
        costs,
        byproducts: if file.allow_byproducts {
            ByproductPolicy::Void
        } else {
            ByproductPolicy::MustRecycle
        },
        recipe_filter,
        building_filter: IdFilter::none(),
    })
}

fn resolve_recipe_set(
    catalog: &Catalog,
    names: &[String],
) -> Result<HashSet<RecipeId>, ConfigLoadError> {
    names
        .iter()
        .map(|name| {
            catalog
                .recipe_id(name)
                .ok_or_else(|| ConfigLoadError::UnresolvedRef {
                    name: name.clone(),
                    expected_kind: "recipe",
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAN_TOML: &str = r#"
        quality_module_tier = 2
        quality_module_quality_level = 4
        prod_module_tier = 2
        prod_module_quality_level = 4
        max_quality_unlocked = 4
        items = ["ore", "plate"]

        [[inputs]]
        name = "ore"

        [output]
        item_id = "plate"
        amount = 1.0

        [[recipes]]
        key = "smelt"
        module_slots = 4
        ingredients = [{ name = "ore", amount = 1.0 }]
        results = [{ name = "plate", amount = 1.0 }]

        [[recipes]]
        key = "recycle-plate"
        module_slots = 4
        is_recycling = true
        allow_productivity = false
        ingredients = [{ name = "plate", amount = 1.0 }]
        results = [{ name = "ore", amount = 0.25 }]
    "#;

    fn parse(toml_text: &str) -> Result<ResolvedPlan, ConfigLoadError> {
        let file: PlanFile = toml::from_str(toml_text).unwrap();
        resolve_plan(&file)
    }

    #[test]
    fn zero_based_tiers_map_to_hardware_tiers() {
        let plan = parse(PLAN_TOML).unwrap();
        // File tier 2 is hardware tier 3, whose level-4 advance chance
        // is the strongest in the table.
        assert!((plan.config.quality_modifier.bonus() - 0.062).abs() < 1e-12);
        assert!((plan.config.prod_modifier.bonus() - 0.25).abs() < 1e-12);
    }

    #[test]
    fn output_quality_defaults_to_ceiling() {
        let plan = parse(PLAN_TOML).unwrap();
        assert_eq!(plan.config.demand.node.tier, QualityTier(4));
        assert_eq!(plan.config.max_quality, QualityTier(4));
    }

    #[test]
    fn recycling_recipe_gets_a_non_productivity_building() {
        let plan = parse(PLAN_TOML).unwrap();
        let id = plan.catalog.recipe_id("recycle-plate").unwrap();
        let recipe = plan.catalog.recipe(id).unwrap();
        let building = plan.catalog.building(recipe.building).unwrap();
        assert!(!building.accepts_productivity);
        assert!(recipe.is_recycling);
    }

    #[test]
    fn unknown_ingredient_is_an_unresolved_ref() {
        let text = PLAN_TOML.replace("{ name = \"ore\", amount = 1.0 }", "{ name = \"oer\", amount = 1.0 }");
        match parse(&text) {
            Err(ConfigLoadError::UnresolvedRef { name, .. }) => assert_eq!(name, "oer"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn duplicate_recipe_key_is_rejected() {
        let text = PLAN_TOML.replace("key = \"recycle-plate\"", "key = \"smelt\"");
        assert!(matches!(
            parse(&text),
            Err(ConfigLoadError::DuplicateName { kind: "recipe", .. })
        ));
    }

    #[test]
    fn conflicting_recipe_lists_fail_validation() {
        // Top-level keys must precede the tables.
        let text = format!(
            "allowed_recipes = [\"smelt\"]\ndisallowed_recipes = [\"recycle-plate\"]\n{PLAN_TOML}"
        );
        assert!(matches!(
            parse(&text),
            Err(ConfigLoadError::Configuration(
                ConfigurationError::ConflictingRecipeFilter
            ))
        ));
    }
}
