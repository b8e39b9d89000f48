//! Configuration module - environment variable parsing

use std::env;
use std::str::FromStr;

use crate::game::animation::Fighter;
use crate::game::moves::Loadout;
use crate::util::time::unix_millis;

/// Seconds on the round countdown when nothing is configured
pub const DEFAULT_ROUND_SECONDS: u32 = 5;
/// Starting (and maximum) HP when nothing is configured
pub const DEFAULT_STARTING_HP: f64 = 100.0;
/// Round cap for the demo binary
pub const DEFAULT_MAX_ROUNDS: u32 = 100;

/// Settings a single match needs
#[derive(Clone, Debug, PartialEq)]
pub struct MatchSettings {
    /// Countdown length in timer ticks (one tick per second)
    pub round_seconds: u32,
    /// HP both players start with and are restored to on rematch
    pub starting_hp: f64,
    /// Seed for every random draw in the match
    pub seed: u64,
}

impl Default for MatchSettings {
    fn default() -> Self {
        Self {
            round_seconds: DEFAULT_ROUND_SECONDS,
            starting_hp: DEFAULT_STARTING_HP,
            seed: 0,
        }
    }
}

/// Engine configuration loaded from environment variables
#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    pub match_settings: MatchSettings,

    /// Fighter rig for the local player
    pub player_fighter: Fighter,
    /// Fighter rig for the opponent
    pub enemy_fighter: Fighter,
    pub player_loadout: Loadout,
    pub enemy_loadout: Loadout,

    /// Demo binary stops a match after this many rounds
    pub max_rounds: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            match_settings: MatchSettings::default(),
            player_fighter: Fighter::Samuel,
            enemy_fighter: Fighter::Clara,
            player_loadout: Loadout::Punches,
            enemy_loadout: Loadout::Punches,
            max_rounds: DEFAULT_MAX_ROUNDS,
        }
    }
}

impl EngineConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        Ok(Self {
            log_level: env::var("LOG_LEVEL").unwrap_or(defaults.log_level),

            match_settings: MatchSettings {
                round_seconds: parse_var("ROUND_SECONDS")?
                    .unwrap_or(DEFAULT_ROUND_SECONDS)
                    .max(1),
                starting_hp: parse_var("STARTING_HP")?.unwrap_or(DEFAULT_STARTING_HP),
                // Wall clock keeps demo runs varied unless pinned
                seed: parse_var("MATCH_SEED")?.unwrap_or_else(unix_millis),
            },

            player_fighter: parse_var("PLAYER_FIGHTER")?.unwrap_or(defaults.player_fighter),
            enemy_fighter: parse_var("ENEMY_FIGHTER")?.unwrap_or(defaults.enemy_fighter),
            player_loadout: parse_var("PLAYER_LOADOUT")?.unwrap_or(defaults.player_loadout),
            enemy_loadout: parse_var("ENEMY_LOADOUT")?.unwrap_or(defaults.enemy_loadout),

            max_rounds: parse_var("MAX_ROUNDS")?.unwrap_or(DEFAULT_MAX_ROUNDS),
        })
    }
}

/// Parse an optional environment variable, failing only on malformed values
fn parse_var<T: FromStr>(key: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { key, value }),
        Err(_) => Ok(None),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value `{value}` for environment variable {key}")]
    Invalid { key: &'static str, value: String },
}
