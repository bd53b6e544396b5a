//! Static catalog of items, base recipes, and crafting buildings.
//!
//! Built once via [`CatalogBuilder`], validated, then frozen. The model
//! builder consults it by reference during a solve; nothing here is
//! ambient global state.

use crate::id::{BuildingId, ItemAtQuality, ItemId, RecipeId};
use std::collections::HashMap;

/// An item definition.
#[derive(Debug, Clone)]
pub struct ItemDef {
    pub name: String,
}

/// One ingredient or result entry of a base recipe. Amounts are
/// quality-agnostic; quality attaches when variants are generated.
#[derive(Debug, Clone)]
pub struct RecipeEntry {
    pub item: ItemId,
    pub amount: f64,
}

/// A base recipe, before expansion into tier/loadout variants.
#[derive(Debug, Clone)]
pub struct RecipeDef {
    pub name: String,
    pub building: BuildingId,
    pub ingredients: Vec<RecipeEntry>,
    pub results: Vec<RecipeEntry>,
    pub allow_productivity: bool,
    /// Recycling stages run a fixed all-quality loadout.
    pub is_recycling: bool,
}

/// A crafting building definition.
#[derive(Debug, Clone)]
pub struct BuildingDef {
    pub name: String,
    pub module_slots: u8,
    /// Built-in productivity bonus, stacked with modifier bonuses.
    pub base_prod_bonus: f64,
    /// Whether productivity modifiers fit at all (recyclers accept only
    /// quality modifiers).
    pub accepts_productivity: bool,
}

/// Builder for constructing an immutable Catalog.
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    items: Vec<ItemDef>,
    item_name_to_id: HashMap<String, ItemId>,
    recipes: Vec<RecipeDef>,
    recipe_name_to_id: HashMap<String, RecipeId>,
    buildings: Vec<BuildingDef>,
    building_name_to_id: HashMap<String, BuildingId>,
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an item. Returns its ID.
    pub fn register_item(&mut self, name: &str) -> ItemId {
        let id = ItemId(self.items.len() as u32);
        self.items.push(ItemDef {
            name: name.to_string(),
        });
        self.item_name_to_id.insert(name.to_string(), id);
        id
    }

    /// Register a building. Returns its ID.
    pub fn register_building(
        &mut self,
        name: &str,
        module_slots: u8,
        base_prod_bonus: f64,
        accepts_productivity: bool,
    ) -> BuildingId {
        let id = BuildingId(self.buildings.len() as u32);
        self.buildings.push(BuildingDef {
            name: name.to_string(),
            module_slots,
            base_prod_bonus,
            accepts_productivity,
        });
        self.building_name_to_id.insert(name.to_string(), id);
        id
    }

    /// Register a base recipe. Returns its ID.
    #[allow(clippy::too_many_arguments)]
    pub fn register_recipe(
        &mut self,
        name: &str,
        building: BuildingId,
        ingredients: Vec<RecipeEntry>,
        results: Vec<RecipeEntry>,
        allow_productivity: bool,
        is_recycling: bool,
    ) -> RecipeId {
        let id = RecipeId(self.recipes.len() as u32);
        self.recipes.push(RecipeDef {
            name: name.to_string(),
            building,
            ingredients,
            results,
            allow_productivity,
            is_recycling,
        });
        self.recipe_name_to_id.insert(name.to_string(), id);
        id
    }

    /// Lookup an item ID by name.
    pub fn item_id(&self, name: &str) -> Option<ItemId> {
        self.item_name_to_id.get(name).copied()
    }

    /// Lookup a building ID by name.
    pub fn building_id(&self, name: &str) -> Option<BuildingId> {
        self.building_name_to_id.get(name).copied()
    }

    /// Finalize and build the immutable catalog. Validates that every
    /// recipe reference resolves and that amounts are positive.
    pub fn build(self) -> Result<Catalog, CatalogError> {
        for recipe in &self.recipes {
            if recipe.building.0 as usize >= self.buildings.len() {
                return Err(CatalogError::InvalidBuildingRef(recipe.building));
            }
            for entry in recipe.ingredients.iter().chain(recipe.results.iter()) {
                if entry.item.0 as usize >= self.items.len() {
                    return Err(CatalogError::InvalidItemRef(entry.item));
                }
                if entry.amount <= 0.0 || !entry.amount.is_finite() {
                    return Err(CatalogError::InvalidAmount {
                        recipe: recipe.name.clone(),
                        amount: entry.amount,
                    });
                }
            }
        }

        Ok(Catalog {
            items: self.items,
            item_name_to_id: self.item_name_to_id,
            recipes: self.recipes,
            recipe_name_to_id: self.recipe_name_to_id,
            buildings: self.buildings,
        })
    }
}

/// Immutable catalog. Frozen after build(). Passed by reference into the
/// model builder; discarded after the solve.
#[derive(Debug)]
pub struct Catalog {
    items: Vec<ItemDef>,
    item_name_to_id: HashMap<String, ItemId>,
    recipes: Vec<RecipeDef>,
    recipe_name_to_id: HashMap<String, RecipeId>,
    buildings: Vec<BuildingDef>,
}

impl Catalog {
    pub fn item(&self, id: ItemId) -> Option<&ItemDef> {
        self.items.get(id.0 as usize)
    }

    pub fn recipe(&self, id: RecipeId) -> Option<&RecipeDef> {
        self.recipes.get(id.0 as usize)
    }

    pub fn building(&self, id: BuildingId) -> Option<&BuildingDef> {
        self.buildings.get(id.0 as usize)
    }

    pub fn item_id(&self, name: &str) -> Option<ItemId> {
        self.item_name_to_id.get(name).copied()
    }

    pub fn recipe_id(&self, name: &str) -> Option<RecipeId> {
        self.recipe_name_to_id.get(name).copied()
    }

    pub fn recipes(&self) -> impl Iterator<Item = (RecipeId, &RecipeDef)> {
        self.recipes
            .iter()
            .enumerate()
            .map(|(i, r)| (RecipeId(i as u32), r))
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn recipe_count(&self) -> usize {
        self.recipes.len()
    }

    pub fn building_count(&self) -> usize {
        self.buildings.len()
    }

    /// Render a flow node for reports and diagnostics. The only place a
    /// composite key becomes a string.
    pub fn node_label(&self, node: ItemAtQuality) -> String {
        let item = self
            .item(node.item)
            .map(|i| i.name.as_str())
            .unwrap_or("<unknown item>");
        format!("{}__{}", node.tier.name(), item)
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CatalogError {
    #[error("invalid item reference: {0:?}")]
    InvalidItemRef(ItemId),
    #[error("invalid building reference: {0:?}")]
    InvalidBuildingRef(BuildingId),
    #[error("recipe '{recipe}' has non-positive amount {amount}")]
    InvalidAmount { recipe: String, amount: f64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_builder() -> CatalogBuilder {
        let mut b = CatalogBuilder::new();
        let ore = b.register_item("iron_ore");
        let plate = b.register_item("iron_plate");
        let smelter = b.register_building("smelter", 4, 0.0, true);
        b.register_recipe(
            "smelt_iron",
            smelter,
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
        b
    }

    #[test]
    fn register_and_build() {
        let catalog = setup_builder().build().unwrap();
        assert_eq!(catalog.item_count(), 2);
        assert_eq!(catalog.recipe_count(), 1);
        assert_eq!(catalog.building_count(), 1);
    }

    #[test]
    fn lookup_by_name() {
        let catalog = setup_builder().build().unwrap();
        assert!(catalog.item_id("iron_ore").is_some());
        assert!(catalog.item_id("nonexistent").is_none());
        assert!(catalog.recipe_id("smelt_iron").is_some());
    }

    #[test]
    fn invalid_item_ref_fails_build() {
        let mut b = CatalogBuilder::new();
        let building = b.register_building("m", 2, 0.0, true);
        b.register_recipe(
            "bad",
            building,
            vec![RecipeEntry {
                item: ItemId(999),
                amount: 1.0,
            }],
            vec![],
            false,
            false,
        );
        assert!(matches!(
            b.build(),
            Err(CatalogError::InvalidItemRef(ItemId(999)))
        ));
    }

    #[test]
    fn invalid_building_ref_fails_build() {
        let mut b = CatalogBuilder::new();
        b.register_recipe("bad", BuildingId(7), vec![], vec![], false, false);
        assert!(matches!(
            b.build(),
            Err(CatalogError::InvalidBuildingRef(BuildingId(7)))
        ));
    }

    #[test]
    fn non_positive_amount_fails_build() {
        let mut b = CatalogBuilder::new();
        let item = b.register_item("x");
        let building = b.register_building("m", 2, 0.0, true);
        b.register_recipe(
            "bad",
            building,
            vec![RecipeEntry { item, amount: 0.0 }],
            vec![],
            false,
            false,
        );
        assert!(matches!(b.build(), Err(CatalogError::InvalidAmount { .. })));
    }

    #[test]
    fn node_label_renders_tier_and_item() {
        use crate::id::{ItemAtQuality, QualityTier};
        let catalog = setup_builder().build().unwrap();
        let plate = catalog.item_id("iron_plate").unwrap();
        let label = catalog.node_label(ItemAtQuality::new(plate, QualityTier(4)));
        assert_eq!(label, "legendary__iron_plate");
    }
}
