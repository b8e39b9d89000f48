//! Round records - what each player locked in and how it went

use serde::Serialize;

use crate::error::{EngineError, EngineResult};
use crate::util::time::{round_tenth, unix_millis};

use super::boost::FireState;
use super::instance::MoveSet;
use super::moves::{AttackDef, DefenseDef};
use super::resolver::AttackResult;

/// Flat speed bonus for whoever holds the speed boost
pub const SPEED_BOOST_MULTIPLIER: f64 = 1.1;

/// Attack locked in for a round, with the fire it carried
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChosenAttack {
    pub def: AttackDef,
    pub fire_state: FireState,
}

/// A player's locked-in moves for one round. `None` means no attack or no
/// defense this round.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct RoundChoice {
    pub attack: Option<ChosenAttack>,
    pub defense: Option<DefenseDef>,
}

impl RoundChoice {
    /// Capture whatever is currently selected
    pub fn from_moves(moves: &MoveSet) -> Self {
        Self {
            attack: moves.selected_attack().map(|a| ChosenAttack {
                def: a.def,
                fire_state: a.fire_state(),
            }),
            defense: moves.selected_defense().map(|d| d.def),
        }
    }

    /// Effective speed, rounded to one decimal. No attack means speed 0.
    pub fn speed(&self, has_speed_boost: bool) -> f64 {
        let move_speed = self.attack.map(|a| a.def.speed).unwrap_or(0.0);
        let speed_multiplier = self.defense.map(|d| d.speed_multiplier).unwrap_or(1.0);
        let boost = if has_speed_boost {
            SPEED_BOOST_MULTIPLIER
        } else {
            1.0
        };
        round_tenth(move_speed * speed_multiplier * boost)
    }
}

/// One entry of a player's round history
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Round {
    pub id: u32,
    /// Whether the player held the speed boost going into this round
    pub has_speed_boost: bool,
    pub choice: RoundChoice,
    pub speed: f64,
    /// Outcome of this player's own attack
    attack_result: Option<AttackResult>,
    /// Outcome of the attack this player received
    defend_result: Option<AttackResult>,
    sealed_at: Option<u64>,
}

impl Round {
    pub fn new(id: u32, has_speed_boost: bool) -> Self {
        Self {
            id,
            has_speed_boost,
            choice: RoundChoice::default(),
            speed: 0.0,
            attack_result: None,
            defend_result: None,
            sealed_at: None,
        }
    }

    pub fn attack_result(&self) -> Option<&AttackResult> {
        self.attack_result.as_ref()
    }

    pub fn defend_result(&self) -> Option<&AttackResult> {
        self.defend_result.as_ref()
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed_at.is_some()
    }

    /// Lock the choice in before resolution
    pub(crate) fn lock(&mut self, choice: RoundChoice) -> EngineResult<()> {
        self.ensure_open()?;
        self.choice = choice;
        self.speed = choice.speed(self.has_speed_boost);
        Ok(())
    }

    /// Write both outcomes and freeze the record. A player who died before
    /// acting has no attack outcome.
    pub(crate) fn seal(
        &mut self,
        attack_result: Option<AttackResult>,
        defend_result: Option<AttackResult>,
    ) -> EngineResult<()> {
        self.ensure_open()?;
        self.attack_result = attack_result;
        self.defend_result = defend_result;
        self.sealed_at = Some(unix_millis());
        Ok(())
    }

    fn ensure_open(&self) -> EngineResult<()> {
        if self.is_sealed() {
            return Err(EngineError::RoundSealed { round: self.id });
        }
        Ok(())
    }
}
