//! Engine error taxonomy

use serde::Serialize;

use crate::game::r#match::MatchPhase;
use crate::game::player::PlayerSlot;

/// Why a move selection was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SelectionRejection {
    /// The id does not name any catalog move
    UnknownMove,
    /// The move exists but is not part of this player's loadout
    NotOwned,
    /// The move is cooling down for this many more rounds
    OnCooldown { remaining: u32 },
}

impl std::fmt::Display for SelectionRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownMove => write!(f, "unknown move"),
            Self::NotOwned => write!(f, "move not in loadout"),
            Self::OnCooldown { remaining } => {
                write!(f, "move on cooldown for {} more round(s)", remaining)
            }
        }
    }
}

/// Errors surfaced by the combat engine
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    #[error("Invalid selection of `{move_id}` by {player:?}: {reason}")]
    InvalidSelection {
        player: PlayerSlot,
        move_id: String,
        reason: SelectionRejection,
    },

    #[error("Round is resolving, selection buffered out")]
    Buffering,

    #[error("Operation not allowed while match is {phase:?}")]
    NotInProgress { phase: MatchPhase },

    #[error("Round {round} is already sealed")]
    RoundSealed { round: u32 },

    #[error("Round {round} desynced from peer: {detail}")]
    Desync { round: u32, detail: String },
}

impl EngineError {
    /// True for errors the UI recovers from by re-prompting the player
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::InvalidSelection { .. } | Self::Buffering)
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
