// Debug logging module for asynchronous decision logging
//
// This module provides fire-and-forget async logging to avoid blocking
// the move response. Each tick's snapshot and decision is written to a JSONL file
// that the replay tool can read back.

use log::error;
use std::sync::Arc;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::policy::Decision;
use crate::replay::LogEntry;
use crate::types::GameState;

/// Shared debug logger state
/// Uses Arc<Mutex<File>> to allow concurrent async writes from multiple tasks
#[derive(Clone)]
pub struct DebugLogger {
    file: Arc<Mutex<Option<File>>>,
    enabled: bool,
}

impl DebugLogger {
    /// Creates a new debug logger
    /// If enabled is true, initializes the log file (truncating if it exists)
    pub async fn new(enabled: bool, log_file_path: &str) -> Self {
        if !enabled {
            return Self::disabled();
        }

        match OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(log_file_path)
            .await
        {
            Ok(file) => {
                log::info!("Debug logging enabled: {}", log_file_path);
                DebugLogger {
                    file: Arc::new(Mutex::new(Some(file))),
                    enabled: true,
                }
            }
            Err(e) => {
                error!("Failed to create debug log file '{}': {}", log_file_path, e);
                Self::disabled()
            }
        }
    }

    /// Creates a disabled debug logger (no-op)
    pub fn disabled() -> Self {
        DebugLogger {
            file: Arc::new(Mutex::new(None)),
            enabled: false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Logs a move decision asynchronously (fire-and-forget)
    /// This spawns a tokio task that writes to the file without blocking
    pub fn log_move(&self, state: GameState, decision: &Decision) {
        if !self.enabled {
            return;
        }

        let entry = Self::entry(state, decision);

        let file_handle = self.file.clone();
        tokio::spawn(async move {
            Self::write_entry(file_handle, entry).await;
        });
    }

    fn entry(state: GameState, decision: &Decision) -> LogEntry {
        LogEntry {
            game_tick: state.game_tick,
            chosen_move: decision.direction,
            reason: decision.reason,
            state,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Appends one entry as a JSON line and flushes
    async fn write_entry(file_handle: Arc<Mutex<Option<File>>>, entry: LogEntry) {
        let mut file_guard = file_handle.lock().await;

        let Some(file) = file_guard.as_mut() else {
            return;
        };

        match serde_json::to_string(&entry) {
            Ok(json_line) => {
                let line_with_newline = format!("{}\n", json_line);
                if let Err(e) = file.write_all(line_with_newline.as_bytes()).await {
                    error!("Failed to write debug log entry: {}", e);
                } else if let Err(e) = file.flush().await {
                    error!("Failed to flush debug log: {}", e);
                }
            }
            Err(e) => {
                error!("Failed to serialize debug log entry: {}", e);
            }
        }
    }

    /// Writes an entry and waits for it to land. Used by tests and tools that
    /// need the file contents right away.
    pub async fn log_move_now(&self, state: GameState, decision: &Decision) {
        if !self.enabled {
            return;
        }

        let entry = Self::entry(state, decision);
        Self::write_entry(self.file.clone(), entry).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::policy::DecisionReason;
    use crate::replay::ReplayEngine;
    use crate::types::{Board, Coord, Direction, Snake};

    fn state(tick: u32) -> GameState {
        GameState {
            game_id: "g".to_string(),
            game_tick: tick,
            player_id: "me".to_string(),
            board: Board {
                width: 5,
                height: 5,
                food: vec![],
                obstacles: vec![],
                snakes: vec![Snake {
                    id: "me".to_string(),
                    name: "me".to_string(),
                    body: vec![Coord::new(2, 2)],
                }],
            },
        }
    }

    #[tokio::test]
    async fn test_logged_entries_can_be_loaded_back() {
        let path = std::env::temp_dir().join(format!(
            "slither_debug_logger_{}.jsonl",
            std::process::id()
        ));
        let path_str = path.to_string_lossy().to_string();

        let logger = DebugLogger::new(true, &path_str).await;
        assert!(logger.is_enabled());

        let decision = Decision {
            direction: Direction::Left,
            reason: DecisionReason::Random,
            path: None,
        };
        logger.log_move_now(state(0), &decision).await;
        logger.log_move_now(state(1), &decision).await;

        let engine = ReplayEngine::new(Config::default_hardcoded(), false);
        let entries = engine.load_log_file(&path).expect("log should load");
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].game_tick, 1);
        assert_eq!(entries[0].chosen_move, Direction::Left);

        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn test_disabled_logger_is_noop() {
        let logger = DebugLogger::new(false, "unused.jsonl").await;
        assert!(!logger.is_enabled());
        let decision = Decision {
            direction: Direction::Up,
            reason: DecisionReason::Food,
            path: None,
        };
        logger.log_move(state(0), &decision);
        logger.log_move_now(state(0), &decision).await;
        assert!(!std::path::Path::new("unused.jsonl").exists());
    }
}
