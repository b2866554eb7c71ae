//! End-to-end autoplay: the periodic task drives the game through the
//! same entry point as manual input and halts exactly at terminal.

use std::time::Duration;

use twenty48_core::{Game, GameConfig, MemoryStore, SharedGame};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn shared_game(size: usize, interval_ms: u64, seed: u64) -> SharedGame {
    let config = GameConfig {
        size,
        autoplay_interval_ms: interval_ms,
        ..GameConfig::default()
    };
    SharedGame::new(Game::from_seed(config, Box::new(MemoryStore::new()), seed))
}

#[tokio::test]
async fn autoplay_runs_a_small_board_to_terminal() {
    init_logging();
    // A 2x2 board dead-ends within a few dozen moves, so the loop gets to
    // observe the terminal transition quickly.
    let shared = shared_game(2, 1, 42);
    shared.initialize().await;

    assert!(shared.start_autoplay().await);
    for _ in 0..1_000 {
        if shared.is_over().await {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    assert!(shared.is_over().await, "autoplay never reached terminal");
    assert!(!shared.is_autoplaying().await);
    assert!(shared.available_moves().await.is_empty());
    let state = shared.game_state().await;
    assert!(state.over);
    // Terminal means full: no empty cells on the final board.
    assert!(state.board.iter().flatten().all(|&v| v != 0));
}

#[tokio::test]
async fn start_is_rejected_while_active_or_over() {
    init_logging();
    // Long period: no tick fires during this test.
    let shared = shared_game(4, 60_000, 7);
    shared.initialize().await;

    assert!(shared.start_autoplay().await);
    assert!(!shared.start_autoplay().await, "double start must fail");
    shared.stop_autoplay().await;

    // Force a finished game; starting must be refused.
    shared
        .with_game(|game| {
            let mut snapshot = game.game_state();
            snapshot.over = true;
            game.restore_state(&snapshot).unwrap();
        })
        .await;
    assert!(!shared.start_autoplay().await);
}

#[tokio::test]
async fn stop_is_idempotent_and_restartable() {
    init_logging();
    let shared = shared_game(4, 60_000, 11);
    shared.initialize().await;

    // Stopping while inactive is a no-op.
    shared.stop_autoplay().await;
    assert!(!shared.is_autoplaying().await);

    assert!(shared.start_autoplay().await);
    assert!(shared.is_autoplaying().await);
    shared.stop_autoplay().await;
    shared.stop_autoplay().await;
    assert!(!shared.is_autoplaying().await);
    assert!(!shared.is_over().await);

    // A clean stop leaves the game restartable.
    assert!(shared.start_autoplay().await);
    shared.stop_autoplay().await;
}

#[tokio::test]
async fn manual_moves_share_the_entry_point_with_autoplay() {
    init_logging();
    let shared = shared_game(4, 60_000, 13);
    shared.initialize().await;
    assert!(shared.start_autoplay().await);

    // Manual input goes through the same lock while autoplay is armed.
    let dir = shared.available_moves().await[0];
    let report = shared.attempt_move(dir).await.unwrap();
    assert_eq!(report.direction, dir);

    shared.stop_autoplay().await;
}

#[tokio::test]
async fn initialize_stops_autoplay_first() {
    init_logging();
    let shared = shared_game(4, 60_000, 17);
    shared.initialize().await;
    assert!(shared.start_autoplay().await);
    shared.initialize().await;
    assert!(!shared.is_autoplaying().await);
    // Fresh board: exactly two tiles.
    let state = shared.game_state().await;
    let occupied = state.board.iter().flatten().filter(|&&v| v != 0).count();
    assert_eq!(occupied, 2);
}
