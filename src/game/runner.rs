//! Async match driver - round countdown, clip playback and app lifecycle

use std::pin::Pin;

use serde::Serialize;
use tokio::sync::{broadcast, mpsc};
use tokio::time::{interval_at, sleep, Instant, Interval, MissedTickBehavior, Sleep};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::sync::protocol::SelectedMove;
use crate::util::time::{secs, ROUND_TICK};

use super::bot::MoveBot;
use super::player::{PlayerSlot, PlayerSnapshot};
use super::r#match::{MatchPhase, MatchState, RoundReport};

/// Input to a running match
#[derive(Debug, Clone)]
pub enum MatchCommand {
    /// Select a move by catalog id
    Select { player: PlayerSlot, move_id: String },
    /// Replace a selection with a peer's wire payload
    Submit {
        player: PlayerSlot,
        selected: SelectedMove,
    },
    /// App went to the background; all timers stop
    Pause,
    Resume,
    Rematch,
    /// Tear the match down
    Exit,
}

/// Output of a running match
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MatchEvent {
    RoundStarted {
        round: u32,
        seconds: u32,
        players: [PlayerSnapshot; 2],
    },
    Countdown {
        round: u32,
        seconds_remaining: u32,
    },
    SelectionRejected {
        player: PlayerSlot,
        reason: String,
    },
    RoundResolved {
        report: RoundReport,
    },
    GameOver {
        winner: PlayerSlot,
        rounds: u32,
    },
    Paused,
    Resumed,
    Ended,
}

/// Handle to a running match
#[derive(Clone)]
pub struct MatchHandle {
    pub id: Uuid,
    pub command_tx: mpsc::Sender<MatchCommand>,
    pub event_tx: broadcast::Sender<MatchEvent>,
}

impl MatchHandle {
    pub fn subscribe(&self) -> broadcast::Receiver<MatchEvent> {
        self.event_tx.subscribe()
    }

    /// Returns false once the match task has gone away
    pub async fn send(&self, command: MatchCommand) -> bool {
        self.command_tx.send(command).await.is_ok()
    }
}

/// The match task
pub struct GameMatch {
    state: MatchState,
    command_rx: mpsc::Receiver<MatchCommand>,
    event_tx: broadcast::Sender<MatchEvent>,
    bots: Vec<(PlayerSlot, MoveBot)>,
    countdown: Interval,
    playback: Pin<Box<Sleep>>,
    playing: bool,
    paused: bool,
}

impl GameMatch {
    pub fn new(state: MatchState) -> (Self, MatchHandle) {
        let (command_tx, command_rx) = mpsc::channel(64);
        let (event_tx, _) = broadcast::channel(256);

        let handle = MatchHandle {
            id: state.id,
            command_tx,
            event_tx: event_tx.clone(),
        };

        let mut countdown = interval_at(Instant::now() + ROUND_TICK, ROUND_TICK);
        countdown.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let game_match = Self {
            state,
            command_rx,
            event_tx,
            bots: Vec::new(),
            countdown,
            playback: Box::pin(sleep(ROUND_TICK)),
            playing: false,
            paused: false,
        };

        (game_match, handle)
    }

    /// Let a bot pick for this slot at the start of every round
    pub fn with_bot(mut self, slot: PlayerSlot, bot: MoveBot) -> Self {
        self.bots.push((slot, bot));
        self
    }

    /// Run until exited or every handle is dropped
    pub async fn run(mut self) {
        if self.state.phase() == MatchPhase::Starting {
            if let Err(err) = self.state.start() {
                warn!(match_id = %self.state.id, error = %err, "Match failed to start");
                return;
            }
        }
        info!(match_id = %self.state.id, "Match runner started");
        self.open_round();

        loop {
            tokio::select! {
                command = self.command_rx.recv() => match command {
                    Some(MatchCommand::Exit) => {
                        info!(match_id = %self.state.id, "Match exited");
                        break;
                    }
                    Some(command) => self.handle_command(command),
                    None => {
                        info!(match_id = %self.state.id, "All handles dropped, ending match");
                        break;
                    }
                },

                _ = self.countdown.tick(), if self.counting_down() => {
                    self.handle_tick();
                }

                _ = self.playback.as_mut(), if self.playing && !self.paused => {
                    self.playing = false;
                    if let Err(err) = self.state.open_selection() {
                        warn!(
                            match_id = %self.state.id,
                            error = %err,
                            "Could not reopen selection"
                        );
                        continue;
                    }
                    self.open_round();
                }
            }
        }

        let _ = self.event_tx.send(MatchEvent::Ended);
    }

    fn counting_down(&self) -> bool {
        !self.paused && self.state.phase() == MatchPhase::Gaming
    }

    fn handle_command(&mut self, command: MatchCommand) {
        match command {
            MatchCommand::Select { player, move_id } => {
                if let Err(err) = self.state.select_move(player, &move_id) {
                    self.reject(player, err.to_string());
                }
            }
            MatchCommand::Submit { player, selected } => {
                if let Err(err) = self.state.apply_selected_move(player, &selected) {
                    self.reject(player, err.to_string());
                }
            }
            MatchCommand::Pause => {
                if !self.paused {
                    self.paused = true;
                    info!(match_id = %self.state.id, "Match paused");
                    let _ = self.event_tx.send(MatchEvent::Paused);
                }
            }
            MatchCommand::Resume => {
                if self.paused {
                    self.paused = false;
                    // Full second before the next countdown tick
                    self.countdown.reset();
                    info!(match_id = %self.state.id, "Match resumed");
                    let _ = self.event_tx.send(MatchEvent::Resumed);
                }
            }
            MatchCommand::Rematch => {
                self.playing = false;
                self.state.rematch();
                self.open_round();
            }
            MatchCommand::Exit => {}
        }
    }

    fn handle_tick(&mut self) {
        match self.state.tick() {
            Ok(Some(report)) => self.play_back(report),
            Ok(None) => {
                let _ = self.event_tx.send(MatchEvent::Countdown {
                    round: self.state.current_round(),
                    seconds_remaining: self.state.time_remaining(),
                });
            }
            Err(err) => warn!(match_id = %self.state.id, error = %err, "Tick failed"),
        }
    }

    fn play_back(&mut self, report: RoundReport) {
        let playback = secs(report.playback_seconds());
        let round = report.round;
        let winner = report.winner;
        let _ = self.event_tx.send(MatchEvent::RoundResolved { report });

        match winner {
            Some(winner) => {
                let _ = self.event_tx.send(MatchEvent::GameOver {
                    winner,
                    rounds: round,
                });
            }
            None => {
                debug!(match_id = %self.state.id, round, ?playback, "Playing back round");
                self.playback.as_mut().reset(Instant::now() + playback);
                self.playing = true;
            }
        }
    }

    /// Bots pick, countdown restarts and the UI is told
    fn open_round(&mut self) {
        for (slot, bot) in &mut self.bots {
            let pick = bot.pick(self.state.player(*slot).moves());
            if let Err(err) = self.state.apply_selected_move(*slot, &pick) {
                warn!(match_id = %self.state.id, player = ?slot, error = %err, "Bot pick rejected");
            }
        }
        self.countdown.reset();

        let _ = self.event_tx.send(MatchEvent::RoundStarted {
            round: self.state.current_round(),
            seconds: self.state.time_remaining(),
            players: self.state.snapshots(),
        });
    }

    fn reject(&self, player: PlayerSlot, reason: String) {
        debug!(match_id = %self.state.id, player = ?player, reason = %reason, "Selection rejected");
        let _ = self.event_tx.send(MatchEvent::SelectionRejected { player, reason });
    }
}
