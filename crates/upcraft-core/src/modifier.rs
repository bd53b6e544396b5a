//! Modifier specifications and per-stage loadout enumeration.
//!
//! A modifier occupies one building slot and is either quality-boosting
//! (raises the chance a crafted unit lands at a higher tier) or
//! productivity-boosting (raises output quantity uniformly). The bonus
//! magnitude is a pure function of (kind, tier, quality level).

use crate::error::ConfigurationError;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Modifier specs
// ---------------------------------------------------------------------------

/// What a modifier boosts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModifierKind {
    Quality,
    Productivity,
}

/// Per-modifier tier-advance chance, indexed by [tier-1][quality_level].
const QUALITY_CHANCES: [[f64; 5]; 3] = [
    [0.01, 0.013, 0.016, 0.019, 0.025],
    [0.02, 0.026, 0.032, 0.038, 0.05],
    [0.025, 0.032, 0.04, 0.047, 0.062],
];

/// Per-modifier productivity bonus, indexed by [tier-1][quality_level].
const PROD_BONUSES: [[f64; 5]; 3] = [
    [0.04, 0.05, 0.06, 0.07, 0.10],
    [0.06, 0.07, 0.09, 0.11, 0.15],
    [0.10, 0.13, 0.16, 0.19, 0.25],
];

/// A fully specified modifier: kind, tier (1..=3) and the quality level of
/// the modifier item itself (0..=4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModifierSpec {
    kind: ModifierKind,
    tier: u8,
    quality_level: u8,
}

impl ModifierSpec {
    /// Validates the tier and quality level ranges.
    pub fn new(kind: ModifierKind, tier: u8, quality_level: u8) -> Result<Self, ConfigurationError> {
        if !(1..=3).contains(&tier) {
            return Err(ConfigurationError::ModifierTierOutOfRange { tier });
        }
        if quality_level > 4 {
            return Err(ConfigurationError::ModifierQualityOutOfRange {
                level: quality_level,
            });
        }
        Ok(Self {
            kind,
            tier,
            quality_level,
        })
    }

    pub fn kind(&self) -> ModifierKind {
        self.kind
    }

    /// Per-unit bonus: tier-advance chance for quality modifiers, yield
    /// bonus for productivity modifiers. Increases in both tier and
    /// quality level.
    pub fn bonus(&self) -> f64 {
        let table = match self.kind {
            ModifierKind::Quality => &QUALITY_CHANCES,
            ModifierKind::Productivity => &PROD_BONUSES,
        };
        table[(self.tier - 1) as usize][self.quality_level as usize]
    }
}

// ---------------------------------------------------------------------------
// Loadouts
// ---------------------------------------------------------------------------

/// A slot assignment for one crafting stage: how many quality and how many
/// productivity modifiers are installed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModifierLoadout {
    pub quality_count: u8,
    pub prod_count: u8,
}

impl ModifierLoadout {
    pub fn total(&self) -> u8 {
        self.quality_count + self.prod_count
    }
}

/// How a stage's loadout is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadoutPolicy {
    /// Enumerate every feasible loadout; the optimizer picks.
    Free,
    /// Fixed loadout: every slot holds a quality modifier. Used for
    /// recycling stages, which accept only quality modifiers.
    MaxQuality,
}

/// All valid (quality_count, prod_count) pairs for a stage with `slots`
/// slots. Includes the empty loadout. Never yields a productivity count
/// above zero when `allow_productivity` is false. O(slots^2) pairs.
pub fn enumerate_loadouts(
    slots: u8,
    allow_productivity: bool,
    policy: LoadoutPolicy,
) -> Vec<ModifierLoadout> {
    match policy {
        LoadoutPolicy::MaxQuality => vec![ModifierLoadout {
            quality_count: slots,
            prod_count: 0,
        }],
        LoadoutPolicy::Free => {
            let mut loadouts = Vec::new();
            for quality_count in 0..=slots {
                let max_prod = if allow_productivity {
                    slots - quality_count
                } else {
                    0
                };
                for prod_count in 0..=max_prod {
                    loadouts.push(ModifierLoadout {
                        quality_count,
                        prod_count,
                    });
                }
            }
            loadouts
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bonus_increases_with_tier_and_level() {
        for kind in [ModifierKind::Quality, ModifierKind::Productivity] {
            for tier in 1..=3u8 {
                for level in 0..=4u8 {
                    let spec = ModifierSpec::new(kind, tier, level).unwrap();
                    if tier < 3 {
                        let up = ModifierSpec::new(kind, tier + 1, level).unwrap();
                        assert!(up.bonus() > spec.bonus());
                    }
                    if level < 4 {
                        let up = ModifierSpec::new(kind, tier, level + 1).unwrap();
                        assert!(up.bonus() > spec.bonus());
                    }
                }
            }
        }
    }

    #[test]
    fn top_tier_values_match_reference_tables() {
        let q = ModifierSpec::new(ModifierKind::Quality, 3, 4).unwrap();
        assert_eq!(q.bonus(), 0.062);
        let p = ModifierSpec::new(ModifierKind::Productivity, 3, 4).unwrap();
        assert_eq!(p.bonus(), 0.25);
    }

    #[test]
    fn invalid_modifier_ranges_rejected() {
        assert!(matches!(
            ModifierSpec::new(ModifierKind::Quality, 0, 0),
            Err(ConfigurationError::ModifierTierOutOfRange { tier: 0 })
        ));
        assert!(matches!(
            ModifierSpec::new(ModifierKind::Quality, 4, 0),
            Err(ConfigurationError::ModifierTierOutOfRange { tier: 4 })
        ));
        assert!(matches!(
            ModifierSpec::new(ModifierKind::Productivity, 1, 5),
            Err(ConfigurationError::ModifierQualityOutOfRange { level: 5 })
        ));
    }

    #[test]
    fn enumeration_respects_slot_bound() {
        for slots in 0..=8u8 {
            for allow in [false, true] {
                for loadout in enumerate_loadouts(slots, allow, LoadoutPolicy::Free) {
                    assert!(loadout.total() <= slots);
                    if !allow {
                        assert_eq!(loadout.prod_count, 0);
                    }
                }
            }
        }
    }

    #[test]
    fn enumeration_counts() {
        // With productivity: triangular number (S+1)(S+2)/2. Without: S+1.
        let s = 4u8;
        let with = enumerate_loadouts(s, true, LoadoutPolicy::Free);
        assert_eq!(with.len(), 15);
        let without = enumerate_loadouts(s, false, LoadoutPolicy::Free);
        assert_eq!(without.len(), 5);
    }

    #[test]
    fn enumeration_includes_empty_loadout() {
        let loadouts = enumerate_loadouts(4, true, LoadoutPolicy::Free);
        assert!(loadouts.contains(&ModifierLoadout::default()));
    }

    #[test]
    fn max_quality_policy_yields_single_fixed_loadout() {
        let loadouts = enumerate_loadouts(4, false, LoadoutPolicy::MaxQuality);
        assert_eq!(
            loadouts,
            vec![ModifierLoadout {
                quality_count: 4,
                prod_count: 0
            }]
        );
    }
}
