//! Boost streak and the fire tiers it puts on attacks

use serde::{Deserialize, Serialize};

use super::instance::MoveSet;
use super::moves::Strength;

/// Damage tier shown on an attack button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FireState {
    #[default]
    None,
    Small,
    Big,
}

impl FireState {
    pub fn boost_multiplier(self) -> f64 {
        match self {
            Self::None => 1.0,
            Self::Small => 1.2,
            Self::Big => 1.35,
        }
    }
}

/// Consecutive landed-hit streak
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoostLevel {
    #[default]
    None = 0,
    Small = 1,
    Big = 2,
}

impl BoostLevel {
    /// Level after another landed boostable hit; wraps after `Big`
    pub fn next(self) -> Self {
        match self {
            Self::None => Self::Small,
            Self::Small => Self::Big,
            Self::Big => Self::None,
        }
    }
}

/// Advance the streak after a round and repaint the fire on every attack.
///
/// A miss, or a landed attack that cannot boost, clears all fire and leaves
/// the level where it was. Resetting the level on a miss is up to the caller.
pub fn update_after_round(
    moves: &mut MoveSet,
    attack_landed: bool,
    previous_attack_can_boost: bool,
    current_level: BoostLevel,
) -> BoostLevel {
    if !attack_landed || !previous_attack_can_boost {
        paint_fire(moves, BoostLevel::None);
        return current_level;
    }

    let level = current_level.next();
    paint_fire(moves, level);
    level
}

/// Set fire states for the given level
pub fn paint_fire(moves: &mut MoveSet, level: BoostLevel) {
    for attack in moves.attacks_mut() {
        let fire = match level {
            BoostLevel::None => FireState::None,
            // Hard attacks sit out the first tier; non-boosting ones get
            // the bigger flame to compensate
            BoostLevel::Small => match attack.def.position.strength() {
                Strength::Hard => FireState::None,
                _ if attack.def.can_boost => FireState::Small,
                _ => FireState::Big,
            },
            BoostLevel::Big => FireState::Big,
        };
        attack.set_fire_state(fire);
    }
}
