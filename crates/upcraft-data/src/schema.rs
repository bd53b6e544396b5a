//! Serde structs for the on-disk plan file.
//!
//! These define the external record shape: all quality and tier fields are
//! zero-based integers (0 = lowest). They are deserialized from RON, JSON,
//! or TOML and then resolved into core types by the loader.

use serde::Deserialize;

/// A complete optimization run as written in a plan file.
#[derive(Debug, Clone, Deserialize)]
pub struct PlanFile {
    /// Quality-modifier tier, zero-based (0 = tier 1 hardware).
    pub quality_module_tier: u8,
    /// Quality level of the installed quality modifiers, zero-based.
    pub quality_module_quality_level: u8,
    /// Productivity-modifier tier, zero-based.
    pub prod_module_tier: u8,
    /// Quality level of the installed productivity modifiers, zero-based.
    pub prod_module_quality_level: u8,
    /// Highest unlocked quality tier, zero-based.
    pub max_quality_unlocked: u8,
    pub items: Vec<String>,
    pub inputs: Vec<InputData>,
    pub output: OutputData,
    #[serde(default)]
    pub minimize: MinimizeData,
    /// When true, surplus at any non-input non-output node may be voided.
    #[serde(default)]
    pub allow_byproducts: bool,
    #[serde(default)]
    pub allowed_recipes: Option<Vec<String>>,
    #[serde(default)]
    pub disallowed_recipes: Option<Vec<String>>,
    pub recipes: Vec<RecipeData>,
}

/// One purchasable external input.
#[derive(Debug, Clone, Deserialize)]
pub struct InputData {
    pub name: String,
    /// Tier the input arrives at, zero-based. Defaults to lowest.
    #[serde(default)]
    pub quality: u8,
    /// Cost per unit drawn; weighted by the resource cost weight.
    #[serde(default = "default_cost")]
    pub cost: f64,
}

fn default_cost() -> f64 {
    1.0
}

/// The demanded output.
#[derive(Debug, Clone, Deserialize)]
pub struct OutputData {
    pub item_id: String,
    pub amount: f64,
    /// Requested tier, zero-based. Defaults to the unlocked ceiling.
    #[serde(default)]
    pub quality: Option<u8>,
    /// Require exactly `amount` instead of at least `amount`.
    #[serde(default)]
    pub exact: bool,
}

/// Objective selection: a named preset or explicit weights.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MinimizeData {
    Preset(MinimizePreset),
    Weights {
        #[serde(default)]
        resource: f64,
        #[serde(default)]
        module: f64,
        #[serde(default)]
        building: f64,
    },
}

impl Default for MinimizeData {
    fn default() -> Self {
        MinimizeData::Preset(MinimizePreset::Inputs)
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MinimizePreset {
    Inputs,
    Modules,
    Buildings,
}

/// A base recipe definition in a plan file.
#[derive(Debug, Clone, Deserialize)]
pub struct RecipeData {
    pub key: String,
    #[serde(default = "default_true")]
    pub allow_productivity: bool,
    pub module_slots: u8,
    /// Extra flat productivity bonus (research, machine intrinsics).
    #[serde(default)]
    pub additional_prod: f64,
    /// Recycling stages run a fixed all-quality loadout and reject
    /// productivity modifiers.
    #[serde(default)]
    pub is_recycling: bool,
    pub ingredients: Vec<EntryData>,
    pub results: Vec<EntryData>,
}

fn default_true() -> bool {
    true
}

/// One (item, amount) line of a recipe.
#[derive(Debug, Clone, Deserialize)]
pub struct EntryData {
    pub name: String,
    pub amount: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimize_accepts_preset_and_weights() {
        let preset: MinimizeData = serde_json::from_str("\"modules\"").unwrap();
        assert!(matches!(
            preset,
            MinimizeData::Preset(MinimizePreset::Modules)
        ));

        let weights: MinimizeData =
            serde_json::from_str(r#"{"resource": 1.0, "module": 0.5}"#).unwrap();
        match weights {
            MinimizeData::Weights {
                resource,
                module,
                building,
            } => {
                assert_eq!(resource, 1.0);
                assert_eq!(module, 0.5);
                assert_eq!(building, 0.0);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn recipe_defaults_fill_in() {
        let recipe: RecipeData = toml::from_str(
            r#"
            key = "smelt"
            module_slots = 2
            ingredients = [{ name = "ore", amount = 1.0 }]
            results = [{ name = "plate", amount = 1.0 }]
            "#,
        )
        .unwrap();
        assert!(recipe.allow_productivity);
        assert!(!recipe.is_recycling);
        assert_eq!(recipe.additional_prod, 0.0);
    }
}
