//! Async match runner on a paused clock

use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time::{sleep, timeout, Instant};
use uuid::Uuid;

use fight_engine::config::EngineConfig;
use fight_engine::game::{
    AttackResult, GameMatch, MatchCommand, MatchEvent, MatchHandle, MatchState, MoveBot,
    PlayerSlot, RoundReport,
};

fn spawn_match(
    bots: bool,
) -> (
    MatchHandle,
    broadcast::Receiver<MatchEvent>,
    tokio::task::JoinHandle<()>,
) {
    let mut config = EngineConfig::default();
    config.match_settings.seed = 77;

    let state = MatchState::from_config(Uuid::new_v4(), &config);
    let (mut game_match, handle) = GameMatch::new(state);
    if bots {
        game_match = game_match
            .with_bot(PlayerSlot::One, MoveBot::new(1))
            .with_bot(PlayerSlot::Two, MoveBot::new(2));
    }

    let events = handle.subscribe();
    let task = tokio::spawn(game_match.run());
    (handle, events, task)
}

async fn next_report(events: &mut broadcast::Receiver<MatchEvent>) -> RoundReport {
    loop {
        if let MatchEvent::RoundResolved { report } = events.recv().await.unwrap() {
            return report;
        }
    }
}

#[tokio::test(start_paused = true)]
async fn round_resolves_when_countdown_runs_out() {
    let (_handle, mut events, _task) = spawn_match(false);
    let started = Instant::now();

    match events.recv().await.unwrap() {
        MatchEvent::RoundStarted { round, seconds, .. } => {
            assert_eq!(round, 1);
            assert_eq!(seconds, 5);
        }
        other => panic!("unexpected event {:?}", other),
    }

    let mut remaining = Vec::new();
    let report = loop {
        match events.recv().await.unwrap() {
            MatchEvent::Countdown {
                seconds_remaining, ..
            } => remaining.push(seconds_remaining),
            MatchEvent::RoundResolved { report } => break report,
            other => panic!("unexpected event {:?}", other),
        }
    };

    assert_eq!(remaining, vec![4, 3, 2, 1]);
    assert!(started.elapsed() >= Duration::from_secs(5));
    assert_eq!(report.round, 1);
    assert!(report.strikes.iter().all(|s| s.result == AttackResult::NoAttack));
}

#[tokio::test(start_paused = true)]
async fn selections_feed_the_next_resolution() {
    let (handle, mut events, _task) = spawn_match(false);
    assert!(
        handle
            .send(MatchCommand::Select {
                player: PlayerSlot::One,
                move_id: "rightPunchLight".to_string(),
            })
            .await
    );
    handle
        .send(MatchCommand::Select {
            player: PlayerSlot::Two,
            move_id: "forward".to_string(),
        })
        .await;

    let report = next_report(&mut events).await;
    assert_eq!(report.first_attacker(), Some(PlayerSlot::One));
    assert_eq!(report.strikes[0].result, AttackResult::Damage(10.0));
    assert_eq!(report.players[1].hp, 90.0);
}

#[tokio::test(start_paused = true)]
async fn bad_selection_is_reported() {
    let (handle, mut events, _task) = spawn_match(false);
    handle
        .send(MatchCommand::Select {
            player: PlayerSlot::Two,
            move_id: "headbutt".to_string(),
        })
        .await;

    loop {
        if let MatchEvent::SelectionRejected { player, reason } = events.recv().await.unwrap() {
            assert_eq!(player, PlayerSlot::Two);
            assert!(reason.contains("headbutt"));
            break;
        }
    }
}

#[tokio::test(start_paused = true)]
async fn pause_stops_the_countdown() {
    let (handle, mut events, _task) = spawn_match(false);
    handle.send(MatchCommand::Pause).await;
    sleep(Duration::from_secs(30)).await;

    let mut seen = Vec::new();
    while let Ok(event) = events.try_recv() {
        seen.push(event);
    }
    assert!(matches!(
        seen.as_slice(),
        [MatchEvent::RoundStarted { .. }, MatchEvent::Paused]
    ));

    handle.send(MatchCommand::Resume).await;
    let report = next_report(&mut events).await;
    assert_eq!(report.round, 1);
}

#[tokio::test(start_paused = true)]
async fn bots_play_to_game_over_and_rematch() {
    let (handle, mut events, _task) = spawn_match(true);

    let (winner, rounds) = loop {
        if let MatchEvent::GameOver { winner, rounds } = events.recv().await.unwrap() {
            break (winner, rounds);
        }
    };
    assert!(rounds >= 1);

    handle.send(MatchCommand::Rematch).await;
    loop {
        match events.recv().await.unwrap() {
            MatchEvent::RoundStarted { round, players, .. } => {
                assert_eq!(round, 1);
                assert!(players.iter().all(|p| p.hp == p.max_hp));
                break;
            }
            MatchEvent::RoundResolved { report } => {
                panic!("round {} resolved after game over, winner {:?}", report.round, winner)
            }
            _ => {}
        }
    }
}

#[tokio::test(start_paused = true)]
async fn exit_and_dropped_handles_end_the_task() {
    let (handle, mut events, task) = spawn_match(true);
    next_report(&mut events).await;
    handle.send(MatchCommand::Exit).await;

    loop {
        if let MatchEvent::Ended = events.recv().await.unwrap() {
            break;
        }
    }
    timeout(Duration::from_secs(1), task).await.unwrap().unwrap();

    let (handle, _events, task) = spawn_match(false);
    drop(handle);
    timeout(Duration::from_secs(1), task).await.unwrap().unwrap();
}
