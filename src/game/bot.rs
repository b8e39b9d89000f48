//! Offline opponent

use rand::seq::IteratorRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::sync::protocol::SelectedMove;

use super::instance::MoveSet;
use super::moves::DefensePosition;

/// Picks a random available attack and a random available side dash
pub struct MoveBot {
    rng: ChaCha8Rng,
}

impl MoveBot {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn pick(&mut self, moves: &MoveSet) -> SelectedMove {
        let attack_position = moves
            .available_attacks()
            .map(|a| a.def.position)
            .choose(&mut self.rng);
        let defense_position = moves
            .available_defenses()
            .map(|d| d.def.position)
            .filter(|p| matches!(p, DefensePosition::Left | DefensePosition::Right))
            .choose(&mut self.rng);

        SelectedMove {
            attack_position,
            defense_position,
        }
    }
}
