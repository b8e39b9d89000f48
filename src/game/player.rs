//! Player combat state

use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::error::{EngineError, EngineResult, SelectionRejection};

use super::animation::Fighter;
use super::boost::{BoostLevel, FireState};
use super::instance::{MoveSet, MoveState};
use super::moves::{Loadout, Move};
use super::r#match::MatchPhase;
use super::resolver::{apply_damage, AttackResult};
use super::round::{Round, RoundChoice};

/// Which side of the match a player occupies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerSlot {
    One,
    Two,
}

impl PlayerSlot {
    pub const BOTH: [PlayerSlot; 2] = [Self::One, Self::Two];

    /// Position in the match's player array
    pub fn index(self) -> usize {
        match self {
            Self::One => 0,
            Self::Two => 1,
        }
    }

    pub fn other(self) -> Self {
        match self {
            Self::One => Self::Two,
            Self::Two => Self::One,
        }
    }
}

/// Player state in a match (authoritative)
#[derive(Debug, Clone)]
pub struct Player {
    pub user_id: Uuid,
    pub slot: PlayerSlot,
    pub display_name: String,
    pub fighter: Fighter,

    hp: f64,
    max_hp: f64,
    boost_level: BoostLevel,
    has_speed_boost: bool,

    /// Round history, index = round id - 1
    rounds: Vec<Round>,
    moves: MoveSet,
}

impl Player {
    pub fn new(
        slot: PlayerSlot,
        display_name: impl Into<String>,
        fighter: Fighter,
        loadout: Loadout,
        max_hp: f64,
    ) -> Self {
        Self {
            user_id: Uuid::new_v4(),
            slot,
            display_name: display_name.into(),
            fighter,
            hp: max_hp,
            max_hp,
            boost_level: BoostLevel::None,
            has_speed_boost: false,
            rounds: Vec::new(),
            moves: MoveSet::from_loadout(loadout),
        }
    }

    pub fn hp(&self) -> f64 {
        self.hp
    }

    pub fn max_hp(&self) -> f64 {
        self.max_hp
    }

    pub fn is_dead(&self) -> bool {
        self.hp <= 0.0
    }

    pub fn boost_level(&self) -> BoostLevel {
        self.boost_level
    }

    pub fn has_speed_boost(&self) -> bool {
        self.has_speed_boost
    }

    pub fn moves(&self) -> &MoveSet {
        &self.moves
    }

    pub fn rounds(&self) -> &[Round] {
        &self.rounds
    }

    pub fn round(&self, id: u32) -> Option<&Round> {
        id.checked_sub(1).and_then(|i| self.rounds.get(i as usize))
    }

    pub fn current_round(&self) -> Option<&Round> {
        self.rounds.last()
    }

    /// Select a move by catalog id
    pub fn select(&mut self, move_id: &str) -> EngineResult<Move> {
        let mv = Move::from_id(move_id)
            .ok_or_else(|| self.rejection(move_id, SelectionRejection::UnknownMove))?;
        self.moves
            .select(mv)
            .map_err(|reason| self.rejection(move_id, reason))?;
        Ok(mv)
    }

    pub(crate) fn moves_mut(&mut self) -> &mut MoveSet {
        &mut self.moves
    }

    pub(crate) fn rejection(&self, move_id: &str, reason: SelectionRejection) -> EngineError {
        EngineError::InvalidSelection {
            player: self.slot,
            move_id: move_id.to_string(),
            reason,
        }
    }

    pub(crate) fn take_damage(&mut self, amount: f64) {
        let (new_hp, _) = apply_damage(self.hp, amount);
        self.hp = new_hp;
    }

    pub(crate) fn set_boost_level(&mut self, level: BoostLevel) {
        self.boost_level = level;
    }

    pub(crate) fn set_speed_boost(&mut self, has_speed_boost: bool) {
        self.has_speed_boost = has_speed_boost;
    }

    /// Open the next round record
    pub(crate) fn start_round(&mut self) {
        let id = self.rounds.len() as u32 + 1;
        self.rounds.push(Round::new(id, self.has_speed_boost));
    }

    /// Lock the current selection into the open round
    pub(crate) fn lock_choice(&mut self) -> EngineResult<RoundChoice> {
        let choice = RoundChoice::from_moves(&self.moves);
        let round = self.open_round()?;
        round.lock(choice)?;
        Ok(choice)
    }

    /// Write the open round's outcomes
    pub(crate) fn seal_round(
        &mut self,
        attack_result: Option<AttackResult>,
        defend_result: Option<AttackResult>,
    ) -> EngineResult<()> {
        self.open_round()?.seal(attack_result, defend_result)
    }

    fn open_round(&mut self) -> EngineResult<&mut Round> {
        match self.rounds.last_mut() {
            Some(round) => Ok(round),
            None => {
                warn!(player = %self.user_id, "No round started yet");
                Err(EngineError::NotInProgress {
                    phase: MatchPhase::Starting,
                })
            }
        }
    }

    /// Back to full HP with fresh moves and no history
    pub(crate) fn prepare_for_rematch(&mut self) {
        self.hp = self.max_hp;
        self.boost_level = BoostLevel::None;
        self.moves.restart();
        self.rounds.clear();
    }

    pub fn snapshot(&self) -> PlayerSnapshot {
        let attacks = self.moves.attacks().iter().map(|a| MoveSnapshot {
            id: a.def.kind.id(),
            state: a.state(),
            current_cooldown: a.current_cooldown(),
            fire_state: Some(a.fire_state()),
        });
        let defenses = self.moves.defenses().iter().map(|d| MoveSnapshot {
            id: d.def.kind.id(),
            state: d.state(),
            current_cooldown: d.current_cooldown(),
            fire_state: None,
        });

        PlayerSnapshot {
            user_id: self.user_id,
            slot: self.slot,
            fighter: self.fighter,
            hp: self.hp,
            max_hp: self.max_hp,
            boost_level: self.boost_level,
            has_speed_boost: self.has_speed_boost,
            moves: attacks.chain(defenses).collect(),
        }
    }
}

/// Player state for UI binding
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerSnapshot {
    pub user_id: Uuid,
    pub slot: PlayerSlot,
    pub fighter: Fighter,
    pub hp: f64,
    pub max_hp: f64,
    pub boost_level: BoostLevel,
    pub has_speed_boost: bool,
    pub moves: Vec<MoveSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoveSnapshot {
    pub id: &'static str,
    pub state: MoveState,
    pub current_cooldown: u32,
    /// Attacks only
    pub fire_state: Option<FireState>,
}
