//! Fight Sim - plays an offline bot-vs-bot match on the real round timer
//!
//! Every round is logged as it resolves; set `RUST_LOG=debug` for the full
//! JSON round reports.

use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use fight_engine::config::EngineConfig;
use fight_engine::game::{GameMatch, MatchCommand, MatchEvent, MatchState, MoveBot, PlayerSlot};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = EngineConfig::from_env()?;

    init_tracing(&config.log_level);

    let seed = config.match_settings.seed;
    info!(
        seed,
        player = %config.player_fighter,
        enemy = %config.enemy_fighter,
        round_seconds = config.match_settings.round_seconds,
        "Starting Fight Sim"
    );

    let state = MatchState::from_config(Uuid::new_v4(), &config);
    let (game_match, handle) = GameMatch::new(state);
    let game_match = game_match
        .with_bot(PlayerSlot::One, MoveBot::new(seed.wrapping_add(1)))
        .with_bot(PlayerSlot::Two, MoveBot::new(seed.wrapping_add(2)));

    let mut events = handle.subscribe();
    let runner = tokio::spawn(game_match.run());

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                handle.send(MatchCommand::Exit).await;
                break;
            }

            event = events.recv() => match event {
                Ok(MatchEvent::RoundResolved { report }) => {
                    let [one, two] = &report.players;
                    info!(
                        round = report.round,
                        first = ?report.first_attacker(),
                        hp_one = one.hp,
                        hp_two = two.hp,
                        "Round resolved"
                    );
                    debug!(report = %serde_json::to_string(&report)?, "Round report");

                    if report.winner.is_none() && report.round >= config.max_rounds {
                        warn!(max_rounds = config.max_rounds, "Round cap reached, stopping match");
                        handle.send(MatchCommand::Exit).await;
                    }
                }
                Ok(MatchEvent::GameOver { winner, rounds }) => {
                    info!(winner = ?winner, rounds, "Game over");
                    handle.send(MatchCommand::Exit).await;
                }
                Ok(MatchEvent::Ended) | Err(RecvError::Closed) => break,
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Event log lagging");
                }
            },
        }
    }

    runner.await?;
    info!("Fight Sim finished");
    Ok(())
}

/// Initialize tracing/logging
fn init_tracing(log_level: &str) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

/// Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, stopping match");
        }
        _ = terminate => {
            info!("Received terminate signal, stopping match");
        }
    }
}
