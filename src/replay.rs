// Replay module for analyzing logged game states and debugging decision-making
//
// This module provides functionality to:
// 1. Parse JSONL debug logs
// 2. Replay the decision engine on historical states
// 3. Compare logged vs replayed moves
// 4. Generate analysis reports

use log::{info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Instant;

use crate::config::Config;
use crate::game_map::GameMap;
use crate::policy::{decide_move, Decision, DecisionReason};
use crate::types::{Direction, GameState};

/// Represents a single log entry from the debug JSONL file
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LogEntry {
    pub game_tick: u32,
    pub chosen_move: Direction,
    pub reason: DecisionReason,
    pub state: GameState,
    pub timestamp: String,
}

/// Result of replaying a single tick
#[derive(Debug, Clone)]
pub struct ReplayResult {
    pub game_tick: u32,
    pub original_move: Direction,
    pub replayed_move: Direction,
    pub matches: bool,
    pub original_reason: DecisionReason,
    pub replayed_reason: DecisionReason,
    pub computation_time_ms: u128,
}

impl ReplayResult {
    /// A mismatch where either side came from the random fallback says little
    pub fn is_random_mismatch(&self) -> bool {
        !self.matches
            && (self.original_reason == DecisionReason::Random
                || self.replayed_reason == DecisionReason::Random)
    }
}

/// Statistics for a complete replay session
#[derive(Debug, Default)]
pub struct ReplayStats {
    pub total_turns: usize,
    pub matches: usize,
    pub mismatches: usize,
    pub random_mismatches: usize,
    pub match_rate: f64,
}

/// Replay engine for analyzing debug logs
pub struct ReplayEngine {
    config: Config,
    verbose: bool,
}

impl ReplayEngine {
    /// Creates a new replay engine with the given configuration
    pub fn new(config: Config, verbose: bool) -> Self {
        ReplayEngine { config, verbose }
    }

    /// Loads all log entries from a JSONL file
    pub fn load_log_file<P: AsRef<Path>>(&self, log_path: P) -> Result<Vec<LogEntry>, String> {
        let file =
            File::open(log_path.as_ref()).map_err(|e| format!("Failed to open log file: {}", e))?;

        let reader = BufReader::new(file);
        let mut entries = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| format!("Failed to read line {}: {}", line_num + 1, e))?;

            if line.trim().is_empty() {
                continue;
            }

            let entry: LogEntry = serde_json::from_str(&line)
                .map_err(|e| format!("Failed to parse JSON on line {}: {}", line_num + 1, e))?;

            entries.push(entry);
        }

        info!("Loaded {} log entries", entries.len());
        Ok(entries)
    }

    /// Runs the decision engine on a single snapshot.
    /// The random fallback is seeded with the tick so replays are repeatable.
    pub fn replay_state(&self, state: &GameState) -> Result<(Decision, u128), String> {
        let map = GameMap::from_state(state)?;
        let mut rng = StdRng::seed_from_u64(u64::from(state.game_tick));

        let start_time = Instant::now();
        let decision = decide_move(&map, &self.config.strategy, &mut rng);
        Ok((decision, start_time.elapsed().as_millis()))
    }

    /// Replays a single log entry and compares the result
    pub fn replay_entry(&self, entry: &LogEntry) -> Result<ReplayResult, String> {
        if self.verbose {
            info!("Replaying tick {}...", entry.game_tick);
        }

        let (decision, computation_time) = self.replay_state(&entry.state)?;
        let matches = entry.chosen_move == decision.direction;

        let result = ReplayResult {
            game_tick: entry.game_tick,
            original_move: entry.chosen_move,
            replayed_move: decision.direction,
            matches,
            original_reason: entry.reason,
            replayed_reason: decision.reason,
            computation_time_ms: computation_time,
        };

        if self.verbose {
            if matches {
                info!(
                    "Tick {}: ✓ MATCH - {} ({}, time: {}ms)",
                    entry.game_tick,
                    decision.direction,
                    decision.reason.as_str(),
                    computation_time
                );
            } else {
                warn!(
                    "Tick {}: ✗ MISMATCH - Original: {} ({}), Replayed: {} ({}, time: {}ms)",
                    entry.game_tick,
                    entry.chosen_move,
                    entry.reason.as_str(),
                    decision.direction,
                    decision.reason.as_str(),
                    computation_time
                );
            }
        }

        Ok(result)
    }

    /// Replays all entries in a log file
    pub fn replay_all(&self, entries: &[LogEntry]) -> Vec<ReplayResult> {
        entries
            .iter()
            .filter_map(|entry| match self.replay_entry(entry) {
                Ok(result) => Some(result),
                Err(e) => {
                    warn!("Failed to replay tick {}: {}", entry.game_tick, e);
                    None
                }
            })
            .collect()
    }

    /// Replays specific ticks from a log file
    pub fn replay_turns(
        &self,
        entries: &[LogEntry],
        ticks: &[u32],
    ) -> Result<Vec<ReplayResult>, String> {
        let mut results = Vec::new();

        for tick in ticks {
            let entry = entries
                .iter()
                .find(|e| e.game_tick == *tick)
                .ok_or_else(|| format!("Tick {} not found in log file", tick))?;

            match self.replay_entry(entry) {
                Ok(result) => results.push(result),
                Err(e) => {
                    warn!("Failed to replay tick {}: {}", tick, e);
                }
            }
        }

        Ok(results)
    }

    /// Generates statistics from replay results
    pub fn generate_stats(&self, results: &[ReplayResult]) -> ReplayStats {
        let total_turns = results.len();
        let matches = results.iter().filter(|r| r.matches).count();
        let mismatches = total_turns - matches;
        let random_mismatches = results.iter().filter(|r| r.is_random_mismatch()).count();
        let match_rate = if total_turns > 0 {
            (matches as f64 / total_turns as f64) * 100.0
        } else {
            0.0
        };

        ReplayStats {
            total_turns,
            matches,
            mismatches,
            random_mismatches,
            match_rate,
        }
    }

    /// Prints a detailed report of replay results
    pub fn print_report(&self, results: &[ReplayResult]) {
        let stats = self.generate_stats(results);

        println!("\n═══════════════════════════════════════════════════════════");
        println!("                    REPLAY REPORT");
        println!("═══════════════════════════════════════════════════════════");
        println!("Total Ticks:    {}", stats.total_turns);
        println!("Matches:        {} ({:.1}%)", stats.matches, stats.match_rate);
        println!(
            "Mismatches:     {} ({} involve a random move)",
            stats.mismatches, stats.random_mismatches
        );
        println!("═══════════════════════════════════════════════════════════\n");

        if !results.is_empty() {
            let avg_time: f64 = results
                .iter()
                .map(|r| r.computation_time_ms as f64)
                .sum::<f64>()
                / results.len() as f64;
            let max_time = results
                .iter()
                .map(|r| r.computation_time_ms)
                .max()
                .unwrap_or(0);

            println!("Average Computation Time:   {:.1}ms", avg_time);
            println!("Slowest Tick:               {}ms\n", max_time);
        }

        let mismatches: Vec<_> = results.iter().filter(|r| !r.matches).collect();
        if !mismatches.is_empty() {
            println!("═══════════════════════════════════════════════════════════");
            println!("                  DETAILED MISMATCHES");
            println!("═══════════════════════════════════════════════════════════");

            for result in mismatches {
                println!(
                    "Tick {}: {} ({}) → {} ({}, time: {}ms)",
                    result.game_tick,
                    result.original_move,
                    result.original_reason.as_str(),
                    result.replayed_move,
                    result.replayed_reason.as_str(),
                    result.computation_time_ms
                );
            }
            println!();
        }
    }

    /// Validates that specific expected moves were made
    pub fn validate_expected_moves(
        &self,
        entries: &[LogEntry],
        expected_moves: &[(u32, Vec<Direction>)], // (tick, acceptable_moves)
    ) -> Result<(), String> {
        for (tick, acceptable) in expected_moves {
            let entry = entries
                .iter()
                .find(|e| e.game_tick == *tick)
                .ok_or_else(|| format!("Tick {} not found in log", tick))?;

            if !acceptable.contains(&entry.chosen_move) {
                return Err(format!(
                    "Tick {}: Expected one of {:?}, but got {}",
                    tick,
                    acceptable.iter().map(|d| d.as_str()).collect::<Vec<_>>(),
                    entry.chosen_move
                ));
            }
        }

        Ok(())
    }
}
