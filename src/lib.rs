//! Fight Engine - deterministic turn resolution for a two-player fighting game
//!
//! Each round both players lock in an attack and a defensive dash. The faster
//! player strikes first, the survivor answers with a damped counter, and the
//! engine reports results plus the clip timings the renderer needs to line
//! both impacts up.

pub mod config;
pub mod error;
pub mod game;
pub mod sync;
pub mod util;

pub use config::{EngineConfig, MatchSettings};
pub use error::{EngineError, EngineResult};
