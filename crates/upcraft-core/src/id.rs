use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Identifies an item in the catalog. Cheap to copy and compare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ItemId(pub u32);

/// Identifies a base recipe in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RecipeId(pub u32);

/// Identifies a crafting building in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BuildingId(pub u32);

/// An ordered quality rank, 0 = lowest. Never negative by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct QualityTier(pub u8);

/// Conventional names for the first five tiers, used only when rendering.
const TIER_NAMES: [&str; 5] = ["normal", "uncommon", "rare", "epic", "legendary"];

impl QualityTier {
    pub const LOWEST: QualityTier = QualityTier(0);

    pub fn next(self) -> QualityTier {
        QualityTier(self.0 + 1)
    }

    /// Display name for the tier. Tiers beyond the conventional five render
    /// as `q<n>`.
    pub fn name(self) -> Cow<'static, str> {
        match TIER_NAMES.get(self.0 as usize) {
            Some(name) => Cow::Borrowed(name),
            None => Cow::Owned(format!("q{}", self.0)),
        }
    }

    /// Iterate tiers 0..=ceiling.
    pub fn up_to(ceiling: QualityTier) -> impl Iterator<Item = QualityTier> {
        (0..=ceiling.0).map(QualityTier)
    }
}

/// An (item, quality tier) pair -- the unit of flow and the key of one
/// balance constraint in the model. String rendering happens only at the
/// output boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ItemAtQuality {
    pub item: ItemId,
    pub tier: QualityTier,
}

impl ItemAtQuality {
    pub fn new(item: ItemId, tier: QualityTier) -> Self {
        Self { item, tier }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiers_are_totally_ordered() {
        assert!(QualityTier(0) < QualityTier(1));
        assert!(QualityTier(3) < QualityTier(4));
        assert_eq!(QualityTier(2), QualityTier(2));
    }

    #[test]
    fn tier_names() {
        assert_eq!(QualityTier(0).name(), "normal");
        assert_eq!(QualityTier(4).name(), "legendary");
        assert_eq!(QualityTier(7).name(), "q7");
    }

    #[test]
    fn up_to_is_inclusive() {
        let tiers: Vec<_> = QualityTier::up_to(QualityTier(2)).collect();
        assert_eq!(tiers, vec![QualityTier(0), QualityTier(1), QualityTier(2)]);
    }

    #[test]
    fn item_at_quality_is_a_map_key() {
        use std::collections::HashMap;
        let mut map = HashMap::new();
        map.insert(ItemAtQuality::new(ItemId(0), QualityTier(4)), 1.0);
        assert_eq!(map[&ItemAtQuality::new(ItemId(0), QualityTier(4))], 1.0);
    }
}
