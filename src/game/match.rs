//! Match state and round lifecycle
//!
//! `MatchState` is pure and synchronous: selections, countdown ticks and
//! round resolution all run to completion. Timers and clip playback live in
//! the async runner.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::{EngineConfig, MatchSettings};
use crate::error::{EngineError, EngineResult};
use crate::sync::protocol::SelectedMove;

use super::animation::{defender_animation, delay_for_defending_animation, AnimationType};
use super::boost::{update_after_round, BoostLevel};
use super::moves::Move;
use super::player::{Player, PlayerSlot, PlayerSnapshot};
use super::resolver::{resolve, AttackResult};
use super::round::RoundChoice;

/// Match phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPhase {
    /// Created, speed boost not drawn yet
    Starting,
    /// Selection window open, countdown running
    Gaming,
    /// Round resolved, clips playing back; selections are buffered out
    Resolving,
    /// A player is dead
    GameOver,
}

/// One attack as played back by the renderer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrikeReport {
    pub attacker: PlayerSlot,
    pub defender: PlayerSlot,
    /// Attacker's effective speed this round
    pub attacker_speed: f64,
    pub result: AttackResult,
    pub attacker_animation: Option<AnimationType>,
    pub defender_animation: Option<AnimationType>,
    /// Seconds after the attacker's clip starts before the defender's does
    pub defender_delay: f64,
    /// Seconds after round playback starts before this strike begins
    pub start_offset: f64,
    /// Seconds until both clips of this strike have finished
    pub duration: f64,
}

impl StrikeReport {
    fn new(
        attacker: &Player,
        defender: &Player,
        choice: &RoundChoice,
        result: AttackResult,
        start_offset: f64,
    ) -> Self {
        let attacker_animation = choice.attack.map(|a| a.def.animation);
        let defender_clip = attacker_animation
            .and_then(|clip| defender_animation(clip, attacker.fighter, &result));
        let defender_delay = match (attacker_animation, defender_clip) {
            (Some(attack), Some(reaction)) => {
                delay_for_defending_animation(reaction, attack, attacker.fighter, defender.fighter)
            }
            _ => 0.0,
        };
        let attack_length = attacker_animation
            .map(|clip| clip.duration(attacker.fighter))
            .unwrap_or(0.0);
        let reaction_length = defender_clip
            .map(|clip| defender_delay + clip.duration(defender.fighter))
            .unwrap_or(0.0);

        Self {
            attacker: attacker.slot,
            defender: defender.slot,
            attacker_speed: attacker.current_round().map(|r| r.speed).unwrap_or(0.0),
            result,
            attacker_animation,
            defender_animation: defender_clip,
            defender_delay,
            start_offset,
            duration: attack_length.max(reaction_length),
        }
    }
}

/// Everything the renderer needs to play back one resolved round
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoundReport {
    pub round: u32,
    /// In resolution order; the second strike is missing when the first kills
    pub strikes: Vec<StrikeReport>,
    /// Start delay of the second strike, the first attacker's clip length
    pub second_attacker_delay: f64,
    pub second_attacker_damage_reduction: f64,
    /// Who holds the speed boost going into the next round
    pub speed_boost_holder: Option<PlayerSlot>,
    pub winner: Option<PlayerSlot>,
    pub players: [PlayerSnapshot; 2],
}

impl RoundReport {
    pub fn first_attacker(&self) -> Option<PlayerSlot> {
        self.strikes.first().map(|s| s.attacker)
    }

    pub fn strike_by(&self, attacker: PlayerSlot) -> Option<&StrikeReport> {
        self.strikes.iter().find(|s| s.attacker == attacker)
    }

    /// Seconds until every clip of the round has finished
    pub fn playback_seconds(&self) -> f64 {
        self.strikes
            .iter()
            .map(|s| s.start_offset + s.duration)
            .fold(0.0, f64::max)
    }
}

/// Match state (owned by the match task)
pub struct MatchState {
    pub id: Uuid,
    pub seed: u64,
    phase: MatchPhase,
    players: [Player; 2],
    rng: ChaCha8Rng,
    round_seconds: u32,
    time_remaining: u32,
    current_round: u32,
    winner: Option<PlayerSlot>,
}

impl MatchState {
    pub fn new(id: Uuid, settings: &MatchSettings, one: Player, two: Player) -> Self {
        Self {
            id,
            seed: settings.seed,
            phase: MatchPhase::Starting,
            players: [one, two],
            rng: ChaCha8Rng::seed_from_u64(settings.seed),
            round_seconds: settings.round_seconds.max(1),
            time_remaining: 0,
            current_round: 0,
            winner: None,
        }
    }

    /// Local player in slot One against the enemy in slot Two
    pub fn from_config(id: Uuid, config: &EngineConfig) -> Self {
        let hp = config.match_settings.starting_hp;
        let one = Player::new(
            PlayerSlot::One,
            "Player",
            config.player_fighter,
            config.player_loadout,
            hp,
        );
        let two = Player::new(
            PlayerSlot::Two,
            "Enemy",
            config.enemy_fighter,
            config.enemy_loadout,
            hp,
        );
        Self::new(id, &config.match_settings, one, two)
    }

    pub fn phase(&self) -> MatchPhase {
        self.phase
    }

    pub fn player(&self, slot: PlayerSlot) -> &Player {
        &self.players[slot.index()]
    }

    pub fn players(&self) -> &[Player; 2] {
        &self.players
    }

    /// Id of the round currently open for selection (0 before start)
    pub fn current_round(&self) -> u32 {
        self.current_round
    }

    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    pub fn winner(&self) -> Option<PlayerSlot> {
        self.winner
    }

    pub fn snapshots(&self) -> [PlayerSnapshot; 2] {
        [self.players[0].snapshot(), self.players[1].snapshot()]
    }

    pub fn speed_boost_holder(&self) -> Option<PlayerSlot> {
        self.players
            .iter()
            .find(|p| p.has_speed_boost())
            .map(|p| p.slot)
    }

    /// Draw the speed boost holder and open round 1
    pub fn start(&mut self) -> EngineResult<()> {
        if self.phase != MatchPhase::Starting {
            return Err(EngineError::NotInProgress { phase: self.phase });
        }
        self.begin();
        Ok(())
    }

    /// Reset both players and start over; valid from any phase
    pub fn rematch(&mut self) {
        for player in &mut self.players {
            player.prepare_for_rematch();
        }
        self.winner = None;
        self.current_round = 0;
        self.phase = MatchPhase::Starting;
        info!(match_id = %self.id, "Rematch");
        self.begin();
    }

    fn begin(&mut self) {
        let holder = if self.rng.gen_bool(0.5) {
            PlayerSlot::One
        } else {
            PlayerSlot::Two
        };
        for player in &mut self.players {
            player.set_speed_boost(player.slot == holder);
            player.start_round();
        }
        self.current_round = 1;
        self.time_remaining = self.round_seconds;
        self.phase = MatchPhase::Gaming;

        info!(
            match_id = %self.id,
            seed = self.seed,
            speed_boost = ?holder,
            "Match started"
        );
    }

    /// Select a move by catalog id for the open round
    pub fn select_move(&mut self, slot: PlayerSlot, move_id: &str) -> EngineResult<Move> {
        self.ensure_selecting()?;
        let result = self.players[slot.index()].select(move_id);
        match &result {
            Ok(mv) => debug!(match_id = %self.id, player = ?slot, mv = %mv, "Move selected"),
            Err(err) => {
                debug!(match_id = %self.id, player = ?slot, error = %err, "Selection rejected")
            }
        }
        result
    }

    /// Replace a player's selection with a wire payload. Absent positions
    /// mean no attack or no defense. A rejected payload leaves the previous
    /// selection in place.
    pub fn apply_selected_move(
        &mut self,
        slot: PlayerSlot,
        selected: &SelectedMove,
    ) -> EngineResult<()> {
        self.ensure_selecting()?;
        let player = &mut self.players[slot.index()];
        let saved = player.moves().clone();
        let result = fill_selection(player, selected);
        if result.is_err() {
            *player.moves_mut() = saved;
        }
        result
    }

    /// Advance the countdown by one unit; resolves the round when it runs out
    pub fn tick(&mut self) -> EngineResult<Option<RoundReport>> {
        match self.phase {
            MatchPhase::Gaming => {}
            MatchPhase::GameOver => {
                warn!(match_id = %self.id, "Tick on a finished match");
                return Err(EngineError::NotInProgress { phase: self.phase });
            }
            MatchPhase::Starting | MatchPhase::Resolving => return Ok(None),
        }

        self.time_remaining = self.time_remaining.saturating_sub(1);
        if self.time_remaining > 0 {
            return Ok(None);
        }

        debug!(match_id = %self.id, round = self.current_round, "Round timer expired");
        self.resolve_round().map(Some)
    }

    /// Reopen selection after playback; restarts the countdown
    pub fn open_selection(&mut self) -> EngineResult<()> {
        match self.phase {
            MatchPhase::Resolving => {
                self.phase = MatchPhase::Gaming;
                self.time_remaining = self.round_seconds;
                info!(match_id = %self.id, round = self.current_round, "Round started");
                Ok(())
            }
            MatchPhase::Gaming => Ok(()),
            phase => Err(EngineError::NotInProgress { phase }),
        }
    }

    /// Resolve a specific round from both players' wire payloads
    pub fn resolve_round_with(
        &mut self,
        round: u32,
        one: &SelectedMove,
        two: &SelectedMove,
    ) -> EngineResult<RoundReport> {
        if self.players[0].round(round).is_some_and(|r| r.is_sealed()) {
            return Err(EngineError::RoundSealed { round });
        }
        if round != self.current_round {
            return Err(EngineError::Desync {
                round,
                detail: format!("local match is on round {}", self.current_round),
            });
        }

        let saved = self.players[0].moves().clone();
        self.apply_selected_move(PlayerSlot::One, one)?;
        if let Err(err) = self.apply_selected_move(PlayerSlot::Two, two) {
            *self.players[0].moves_mut() = saved;
            return Err(err);
        }
        self.resolve_round()
    }

    /// Resolve the open round with whatever is selected right now
    pub fn resolve_round(&mut self) -> EngineResult<RoundReport> {
        if self.phase != MatchPhase::Gaming {
            warn!(
                match_id = %self.id,
                phase = ?self.phase,
                "Resolve requested outside the selection window"
            );
            return Err(EngineError::NotInProgress { phase: self.phase });
        }

        let round = self.current_round;
        let choice_one = self.players[0].lock_choice()?;
        let choice_two = self.players[1].lock_choice()?;
        let first = self.first_attacker(&choice_one, &choice_two);
        let (first_choice, second_choice) = match first {
            PlayerSlot::One => (choice_one, choice_two),
            PlayerSlot::Two => (choice_two, choice_one),
        };

        let (a, b) = ordered(&mut self.players, first);

        // First strike
        let first_result = resolve(&first_choice, &second_choice, b.hp(), 1.0);
        b.take_damage(first_result.damage().unwrap_or(0.0));
        settle_boost(a, &first_choice, &first_result);
        if first_result.did_attack_land() {
            a.set_speed_boost(true);
            b.set_speed_boost(false);
        }

        let damage_reduction = first_choice
            .attack
            .map(|x| x.def.damage_reduction)
            .unwrap_or(1.0);
        let second_delay = first_choice
            .attack
            .map(|x| x.def.animation.duration(a.fighter))
            .unwrap_or(0.0);
        let mut strikes = vec![StrikeReport::new(a, b, &first_choice, first_result, 0.0)];

        // Second strike, only if the defender survived
        let second_result = if b.is_dead() {
            None
        } else {
            let result = resolve(&second_choice, &first_choice, a.hp(), damage_reduction);
            a.take_damage(result.damage().unwrap_or(0.0));
            settle_boost(b, &second_choice, &result);
            if !first_result.did_attack_land() && result.did_attack_land() {
                b.set_speed_boost(true);
                a.set_speed_boost(false);
            }
            strikes.push(StrikeReport::new(b, a, &second_choice, result, second_delay));
            Some(result)
        };

        a.seal_round(Some(first_result), second_result)?;
        b.seal_round(second_result, Some(first_result))?;

        let winner = if b.is_dead() {
            Some(a.slot)
        } else if a.is_dead() {
            Some(b.slot)
        } else {
            None
        };

        for strike in &strikes {
            debug!(
                match_id = %self.id,
                round,
                attacker = ?strike.attacker,
                speed = strike.attacker_speed,
                result = ?strike.result,
                "Strike resolved"
            );
        }

        match winner {
            Some(slot) => {
                self.winner = Some(slot);
                self.phase = MatchPhase::GameOver;
                info!(match_id = %self.id, round, winner = ?slot, "Game over");
            }
            None => {
                for player in &mut self.players {
                    player.moves_mut().advance_round();
                    player.start_round();
                }
                self.current_round += 1;
                self.phase = MatchPhase::Resolving;
            }
        }

        info!(
            match_id = %self.id,
            round,
            first = ?first,
            hp_one = self.players[0].hp(),
            hp_two = self.players[1].hp(),
            "Round resolved"
        );

        Ok(RoundReport {
            round,
            strikes,
            second_attacker_delay: second_delay,
            second_attacker_damage_reduction: damage_reduction,
            speed_boost_holder: self.speed_boost_holder(),
            winner,
            players: self.snapshots(),
        })
    }

    /// Strictly faster player goes first; a tie goes to the speed boost
    /// holder, then to slot One
    fn first_attacker(&self, one: &RoundChoice, two: &RoundChoice) -> PlayerSlot {
        let [p1, p2] = &self.players;
        let speed_one = one.speed(p1.has_speed_boost());
        let speed_two = two.speed(p2.has_speed_boost());

        if speed_one > speed_two {
            PlayerSlot::One
        } else if speed_two > speed_one {
            PlayerSlot::Two
        } else if p2.has_speed_boost() && !p1.has_speed_boost() {
            PlayerSlot::Two
        } else {
            PlayerSlot::One
        }
    }

    fn ensure_selecting(&self) -> EngineResult<()> {
        match self.phase {
            MatchPhase::Gaming => Ok(()),
            MatchPhase::Resolving => Err(EngineError::Buffering),
            phase => Err(EngineError::NotInProgress { phase }),
        }
    }
}

/// Split the players into (first attacker, second attacker)
fn ordered(players: &mut [Player; 2], first: PlayerSlot) -> (&mut Player, &mut Player) {
    let [one, two] = players;
    match first {
        PlayerSlot::One => (one, two),
        PlayerSlot::Two => (two, one),
    }
}

/// Clear, then select by position
fn fill_selection(player: &mut Player, selected: &SelectedMove) -> EngineResult<()> {
    player.moves_mut().clear_selection();
    if let Some(position) = selected.attack_position {
        player
            .moves_mut()
            .select_attack_at(position)
            .map_err(|reason| {
                player.rejection(&format!("attack position {}", position.code()), reason)
            })?;
    }
    if let Some(position) = selected.defense_position {
        player
            .moves_mut()
            .select_defense_at(position)
            .map_err(|reason| {
                player.rejection(&format!("defense position {}", position.code()), reason)
            })?;
    }
    Ok(())
}

/// Boost streak after a strike; anything but a landed hit ends the streak
fn settle_boost(player: &mut Player, choice: &RoundChoice, result: &AttackResult) {
    let landed = result.did_attack_land();
    let can_boost = choice.attack.map(|a| a.def.can_boost).unwrap_or(false);
    let current = player.boost_level();
    let level = update_after_round(player.moves_mut(), landed, can_boost, current);
    player.set_boost_level(if landed { level } else { BoostLevel::None });
}
