// Tests for the replay module
//
// Tests the core functionality of the replay engine including:
// - Loading JSONL log files
// - Replaying individual ticks
// - Validating expected moves
// - Generating statistics

use slither_bot::config::Config;
use slither_bot::policy::DecisionReason;
use slither_bot::replay::ReplayEngine;
use slither_bot::types::Direction;
use std::path::PathBuf;

/// Helper function to get the path to test fixtures
fn fixture_path(filename: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(filename)
}

fn engine() -> ReplayEngine {
    ReplayEngine::new(Config::default_hardcoded(), false)
}

#[test]
fn test_load_log_file_skips_blank_lines() {
    let entries = engine()
        .load_log_file(fixture_path("short_game.jsonl"))
        .expect("Failed to load short_game.jsonl");

    assert_eq!(entries.len(), 5, "Expected 5 log entries");
    assert_eq!(entries[0].game_tick, 0);
    assert_eq!(entries[0].chosen_move, Direction::Right);
    assert_eq!(entries[2].reason, DecisionReason::NoLegalMove);
    assert_eq!(entries[2].state.board.obstacles.len(), 4);
}

#[test]
fn test_load_missing_file_fails() {
    assert!(engine()
        .load_log_file(fixture_path("does_not_exist.jsonl"))
        .is_err());
}

#[test]
fn test_replay_reproduces_deterministic_ticks() {
    let engine = engine();
    let entries = engine
        .load_log_file(fixture_path("short_game.jsonl"))
        .unwrap();

    let results = engine.replay_all(&entries);

    // Tick 4 names a player that is not on the board and is skipped
    assert_eq!(results.len(), 4);
    for result in &results[..3] {
        assert!(result.matches, "tick {} should match", result.game_tick);
        assert_eq!(result.original_reason, result.replayed_reason);
    }
    assert_eq!(results[3].replayed_reason, DecisionReason::Random);
}

#[test]
fn test_random_ticks_replay_the_same_way_twice() {
    let engine = engine();
    let entries = engine
        .load_log_file(fixture_path("short_game.jsonl"))
        .unwrap();

    let first = engine.replay_entry(&entries[3]).unwrap();
    let second = engine.replay_entry(&entries[3]).unwrap();
    assert_eq!(first.replayed_move, second.replayed_move);
}

#[test]
fn test_replay_specific_turns() {
    let engine = engine();
    let entries = engine
        .load_log_file(fixture_path("short_game.jsonl"))
        .unwrap();

    let results = engine.replay_turns(&entries, &[0, 2]).unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[1].replayed_move, Direction::Down);

    assert!(engine.replay_turns(&entries, &[99]).is_err());
}

#[test]
fn test_validate_expected_moves() {
    let engine = engine();
    let entries = engine
        .load_log_file(fixture_path("short_game.jsonl"))
        .unwrap();

    assert!(engine
        .validate_expected_moves(
            &entries,
            &[
                (0, vec![Direction::Right]),
                (2, vec![Direction::Down, Direction::Left]),
            ]
        )
        .is_ok());

    let err = engine
        .validate_expected_moves(&entries, &[(1, vec![Direction::Up])])
        .unwrap_err();
    assert!(err.contains("Tick 1"));

    assert!(engine
        .validate_expected_moves(&entries, &[(42, vec![Direction::Up])])
        .is_err());
}

#[test]
fn test_stats_from_fixture() {
    let engine = engine();
    let entries = engine
        .load_log_file(fixture_path("short_game.jsonl"))
        .unwrap();
    let results = engine.replay_all(&entries);
    let stats = engine.generate_stats(&results);

    assert_eq!(stats.total_turns, 4);
    assert!(stats.matches >= 3);
    assert_eq!(stats.mismatches, stats.random_mismatches);
}
