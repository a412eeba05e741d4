// Bot facade used by the transport layer
//
// The transport calls one method per server event. Move requests run the
// synchronous decision engine on a blocking thread under the tick budget; lifecycle
// events only update a per-game session record that the engine never reads.

use log::{debug, error, info, warn};
use parking_lot::Mutex;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;

use crate::config::Config;
use crate::debug_logger::DebugLogger;
use crate::game_map::GameMap;
use crate::policy::{decide_move, Decision, DecisionReason};
use crate::types::{Direction, GameEnded, GameStarting, GameState, SnakeDead};

/// What the bot knows about the game in progress
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GameSession {
    pub game_id: Option<String>,
    pub player_count: u32,
    pub width: i32,
    pub height: i32,
    pub deaths: Vec<SnakeDead>,
    pub moves_made: u32,
}

impl GameSession {
    /// Opponents still alive according to the death notifications seen so far
    pub fn opponents_remaining(&self, player_id: &str) -> u32 {
        let dead_opponents = self
            .deaths
            .iter()
            .filter(|d| d.player_id != player_id)
            .count() as u32;
        self.player_count
            .saturating_sub(1)
            .saturating_sub(dead_opponents)
    }
}

/// Snake bot with an event-per-method API
/// Takes static configuration and keeps only the current game's session record
pub struct Bot {
    config: Config,
    session: Mutex<GameSession>,
    debug_logger: DebugLogger,
}

impl Bot {
    /// Creates a new Bot instance with the given configuration
    ///
    /// # Arguments
    /// * `config` - Static configuration that does not change during the bot's lifetime
    pub fn new(config: Config) -> Self {
        Bot {
            config,
            session: Mutex::new(GameSession::default()),
            debug_logger: DebugLogger::disabled(),
        }
    }

    /// Creates a bot whose decision log follows the `[debug]` section of `config`
    pub async fn from_config(config: Config) -> Self {
        let debug_logger =
            DebugLogger::new(config.debug.enabled, &config.debug.log_file_path).await;
        Bot::new(config).with_debug_logger(debug_logger)
    }

    /// Attaches a decision logger
    pub fn with_debug_logger(mut self, debug_logger: DebugLogger) -> Self {
        self.debug_logger = debug_logger;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Snapshot of the current game session
    pub fn session(&self) -> GameSession {
        self.session.lock().clone()
    }

    /// Called when a game is about to start; clears everything from the previous game
    pub fn on_game_starting(&self, event: &GameStarting) {
        info!(
            "GAME STARTING {} ({} players, {}x{})",
            event.game_id, event.player_count, event.width, event.height
        );

        *self.session.lock() = GameSession {
            game_id: Some(event.game_id.clone()),
            player_count: event.player_count,
            width: event.width,
            height: event.height,
            ..GameSession::default()
        };
    }

    /// Called when any snake dies
    pub fn on_snake_dead(&self, event: &SnakeDead) {
        info!(
            "SNAKE DEAD {} at ({},{}) on tick {}: {:?}",
            event.player_id, event.x, event.y, event.game_tick, event.death_reason
        );

        let mut session = self.session.lock();
        session.deaths.push(event.clone());
        debug!("{} deaths recorded this game", session.deaths.len());
    }

    /// Called when the game is over
    pub fn on_game_ended(&self, event: &GameEnded) {
        let moves = self.session.lock().moves_made;
        match &event.winner_id {
            Some(winner) => info!(
                "GAME OVER {} on tick {}, winner {} ({} moves made)",
                event.game_id, event.game_tick, winner, moves
            ),
            None => info!(
                "GAME OVER {} on tick {}, no winner ({} moves made)",
                event.game_id, event.game_tick, moves
            ),
        }

        *self.session.lock() = GameSession::default();
    }

    /// Move used when the engine cannot answer in time: first legal direction, or
    /// the configured fallback
    fn emergency_decision(&self, map: Option<&GameMap>) -> Decision {
        let legal = map.and_then(|m| m.legal_moves().first().copied());
        Decision {
            direction: legal.unwrap_or(self.config.strategy.fallback_direction),
            reason: if legal.is_some() {
                DecisionReason::Random
            } else {
                DecisionReason::NoLegalMove
            },
            path: None,
        }
    }

    /// Computes the next move for the snapshot
    ///
    /// The engine runs on tokio's blocking pool and is awaited for at most the
    /// effective budget. A move is always returned: if the snapshot is unusable,
    /// the task fails or the budget runs out, the emergency decision is used.
    pub async fn get_move(&self, state: &GameState) -> Direction {
        let start_time = Instant::now();

        debug!("Tick {}: Computing move", state.game_tick);

        let map = match GameMap::from_state(state) {
            Ok(map) => map,
            Err(e) => {
                warn!("Tick {}: unusable snapshot: {}", state.game_tick, e);
                return self.emergency_decision(None).direction;
            }
        };

        let emergency = self.emergency_decision(Some(&map));
        let budget = Duration::from_millis(self.config.timing.effective_budget_ms());

        let decision = if budget.is_zero() {
            warn!(
                "Tick {}: no time left after network overhead, sending emergency move",
                state.game_tick
            );
            emergency
        } else {
            let strategy = self.config.strategy.clone();
            let task = tokio::task::spawn_blocking(move || {
                decide_move(&map, &strategy, &mut rand::rng())
            });
            finish_within(state.game_tick, task, budget, emergency).await
        };

        info!(
            "Tick {}: Chose {} ({}, cost: {}, time: {}ms)",
            state.game_tick,
            decision.direction,
            decision.reason.as_str(),
            decision.path.as_ref().map_or(0, |p| p.cost),
            start_time.elapsed().as_millis()
        );

        self.session.lock().moves_made += 1;
        self.debug_logger.log_move(state.clone(), &decision);

        decision.direction
    }
}

/// Waits for the engine task for at most `budget`; a failed or late task yields
/// `emergency`. A late task is left to finish on its own.
async fn finish_within(
    game_tick: u32,
    task: JoinHandle<Decision>,
    budget: Duration,
    emergency: Decision,
) -> Decision {
    match tokio::time::timeout(budget, task).await {
        Ok(Ok(decision)) => decision,
        Ok(Err(e)) => {
            error!("Tick {}: decision task failed: {}", game_tick, e);
            emergency
        }
        Err(_) => {
            warn!(
                "Tick {}: decision exceeded {}ms budget",
                game_tick,
                budget.as_millis()
            );
            emergency
        }
    }
}
