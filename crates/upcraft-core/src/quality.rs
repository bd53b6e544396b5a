//! Quality transition model.
//!
//! Each installed quality modifier contributes a per-unit tier-advance
//! chance; `k` modifiers aggregate linearly to `k * chance`, which must
//! stay below 1. `k` is bounded by the building's slot count, and the
//! variant generator rejects slot counts that would saturate the chance.
//! Of the advancing mass, 90% lands exactly one tier above the starting
//! tier and each further tier keeps a 10% share of the remainder, so the
//! distribution concentrates on the starting tier and the one above it.
//! Mass that would land above the unlocked ceiling folds into the ceiling
//! tier -- an explicit modeling rule, not error suppression.

use crate::error::ConfigurationError;
use crate::id::QualityTier;
use crate::modifier::{ModifierKind, ModifierSpec};

/// Chance that an advancing craft jumps one tier further.
pub const JUMP_CHANCE: f64 = 0.1;

/// The per-stage quality transition model, parameterized by one quality
/// modifier spec.
#[derive(Debug, Clone, Copy)]
pub struct QualityTransition {
    chance_per_modifier: f64,
}

impl QualityTransition {
    /// Build from a modifier spec, which must be of the Quality kind.
    pub fn from_spec(spec: ModifierSpec) -> Result<Self, ConfigurationError> {
        if spec.kind() != ModifierKind::Quality {
            return Err(ConfigurationError::WrongModifierKind {
                expected: ModifierKind::Quality,
                got: spec.kind(),
            });
        }
        Ok(Self {
            chance_per_modifier: spec.bonus(),
        })
    }

    /// Aggregate tier-advance chance for `count` installed modifiers.
    pub fn advance_chance(&self, count: u8) -> f64 {
        f64::from(count) * self.chance_per_modifier
    }

    /// Probability distribution of the output tier for a craft starting at
    /// `start` with `count` quality modifiers and unlocked ceiling
    /// `ceiling`. Requires an aggregate advance chance below 1 (callers
    /// expanding variants reject saturating slot counts). Support is
    /// within [start, ceiling]; probabilities sum to exactly 1
    /// (above-ceiling mass folds into the ceiling tier). Entries with
    /// zero probability are omitted.
    pub fn distribution(
        &self,
        count: u8,
        start: QualityTier,
        ceiling: QualityTier,
    ) -> Vec<(QualityTier, f64)> {
        if start >= ceiling {
            // No further tiers to advance to.
            return vec![(start, 1.0)];
        }

        let advance = self.advance_chance(count);
        let mut dist = Vec::with_capacity((ceiling.0 - start.0 + 1) as usize);
        if advance < 1.0 {
            dist.push((start, 1.0 - advance));
        }
        if advance > 0.0 {
            let mut tier = start.next();
            let mut mass = advance * (1.0 - JUMP_CHANCE);
            while tier < ceiling {
                dist.push((tier, mass));
                mass *= JUMP_CHANCE;
                tier = tier.next();
            }
            // Whatever remains after the 90/10 splits folds into the ceiling.
            let below_ceiling = (ceiling.0 - start.0 - 1) as i32;
            dist.push((ceiling, advance * JUMP_CHANCE.powi(below_ceiling)));
        }
        dist
    }
}
