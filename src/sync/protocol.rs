//! Peer protocol message definitions
//! Only move positions cross the wire; each peer re-runs the resolver
//! locally and compares outcomes.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::game::moves::{AttackPosition, DefensePosition};
use crate::game::player::{Player, PlayerSlot};
use crate::game::r#match::RoundReport;
use crate::game::resolver::AttackResult;
use crate::game::round::RoundChoice;

/// Damage values closer than this are considered equal across peers
pub const DAMAGE_TOLERANCE: f64 = 1e-6;

/// One player's locked-in positions for a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedMove {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attack_position: Option<AttackPosition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defense_position: Option<DefensePosition>,
}

impl From<&RoundChoice> for SelectedMove {
    fn from(choice: &RoundChoice) -> Self {
        Self {
            attack_position: choice.attack.map(|a| a.def.position),
            defense_position: choice.defense.map(|d| d.position),
        }
    }
}

/// Per-player document synced to the peer, one entry per sealed round
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerDocument {
    pub selected_moves: Vec<SelectedMove>,
}

impl PlayerDocument {
    pub fn from_player(player: &Player) -> Self {
        Self {
            selected_moves: player
                .rounds()
                .iter()
                .filter(|r| r.is_sealed())
                .map(|r| SelectedMove::from(&r.choice))
                .collect(),
        }
    }

    /// Payload of a round by id
    pub fn round(&self, id: u32) -> Option<&SelectedMove> {
        id.checked_sub(1)
            .and_then(|i| self.selected_moves.get(i as usize))
    }
}

/// One strike of a resolved round, as compared between peers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrikeDigest {
    pub attacker: PlayerSlot,
    pub result: AttackResult,
}

/// Summary of a resolved round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeDigest {
    pub round: u32,
    /// In resolution order
    pub strikes: Vec<StrikeDigest>,
}

impl From<&RoundReport> for OutcomeDigest {
    fn from(report: &RoundReport) -> Self {
        Self {
            round: report.round,
            strikes: report
                .strikes
                .iter()
                .map(|s| StrikeDigest {
                    attacker: s.attacker,
                    result: s.result,
                })
                .collect(),
        }
    }
}

/// Messages exchanged between peers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PeerMsg {
    /// A player's positions for a round
    Selection {
        round: u32,
        player: PlayerSlot,
        selected: SelectedMove,
    },

    /// The sender's local resolution of a round
    Outcome { digest: OutcomeDigest },

    /// Request a rematch
    Rematch,

    /// Leave the match
    Leave,
}

/// Compare a local resolution against the peer's
pub fn verify_outcome(local: &OutcomeDigest, remote: &OutcomeDigest) -> EngineResult<()> {
    let desync = |detail: String| EngineError::Desync {
        round: local.round,
        detail,
    };

    if local.round != remote.round {
        return Err(desync(format!("peer reported round {}", remote.round)));
    }
    if local.strikes.len() != remote.strikes.len() {
        return Err(desync(format!(
            "{} strike(s) locally, {} on peer",
            local.strikes.len(),
            remote.strikes.len()
        )));
    }

    for (mine, theirs) in local.strikes.iter().zip(&remote.strikes) {
        if mine.attacker != theirs.attacker {
            return Err(desync(format!(
                "attack order differs: {:?} locally, {:?} on peer",
                mine.attacker, theirs.attacker
            )));
        }
        if !same_result(&mine.result, &theirs.result) {
            return Err(desync(format!(
                "{:?} strike resolved to {:?} locally, {:?} on peer",
                mine.attacker, mine.result, theirs.result
            )));
        }
    }
    Ok(())
}

fn same_result(a: &AttackResult, b: &AttackResult) -> bool {
    match (a, b) {
        (AttackResult::NoAttack, AttackResult::NoAttack) => true,
        (AttackResult::Miss, AttackResult::Miss) => true,
        (AttackResult::Damage(x), AttackResult::Damage(y))
        | (AttackResult::Kill(x), AttackResult::Kill(y)) => (x - y).abs() < DAMAGE_TOLERANCE,
        _ => false,
    }
}
