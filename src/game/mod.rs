//! Combat engine modules

pub mod animation;
pub mod boost;
pub mod bot;
pub mod instance;
pub mod r#match;
pub mod moves;
pub mod player;
pub mod resolver;
pub mod round;
pub mod runner;

pub use bot::MoveBot;
pub use r#match::{MatchPhase, MatchState, RoundReport, StrikeReport};
pub use player::{Player, PlayerSlot, PlayerSnapshot};
pub use resolver::AttackResult;
pub use runner::{GameMatch, MatchCommand, MatchEvent, MatchHandle};
