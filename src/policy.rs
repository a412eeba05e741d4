// Per-tick decision policy
//
// Priority order: no legal move -> fixed fallback, close food -> eat, any trap
// path -> approach an opponent's head, otherwise a random legal move.

use log::{debug, info};
use rand::seq::IndexedRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::StrategyConfig;
use crate::game_map::GameMap;
use crate::lookahead::filter_paths;
use crate::pathfinding::PathResult;
use crate::selectors::{food_paths, trap_paths};
use crate::types::Direction;

/// Which branch of the policy produced the move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionReason {
    NoLegalMove,
    Food,
    Trap,
    Random,
}

impl DecisionReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionReason::NoLegalMove => "no_legal_move",
            DecisionReason::Food => "food",
            DecisionReason::Trap => "trap",
            DecisionReason::Random => "random",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub direction: Direction,
    pub reason: DecisionReason,
    /// Path followed, for food and trap decisions
    pub path: Option<PathResult>,
}

/// Runs the lookahead filter over `paths` when enabled.
/// If every candidate would be discarded the unfiltered list is returned.
fn apply_lookahead(
    map: &GameMap,
    paths: Vec<PathResult>,
    strategy: &StrategyConfig,
) -> Vec<PathResult> {
    let depth = match strategy.lookahead() {
        Some(depth) if !paths.is_empty() => depth,
        _ => return paths,
    };

    let kept = filter_paths(map, &paths, depth, strategy.min_safety_score);
    if kept.is_empty() {
        info!(
            "Lookahead discarded all {} candidates, keeping them unfiltered",
            paths.len()
        );
        paths
    } else {
        kept
    }
}

/// Direction of the first step along `path`, if the player can take it
fn first_move(map: &GameMap, path: &PathResult) -> Option<Direction> {
    let next = path.first_step()?;
    map.player_head()
        .direction_to(&next)
        .filter(|&dir| map.can_move(dir))
}

/// Chooses the move for this tick. `rng` only drives the final random fallback.
pub fn decide_move<R: Rng + ?Sized>(
    map: &GameMap,
    strategy: &StrategyConfig,
    rng: &mut R,
) -> Decision {
    let legal = map.legal_moves();
    if legal.is_empty() {
        return Decision {
            direction: strategy.fallback_direction,
            reason: DecisionReason::NoLegalMove,
            path: None,
        };
    }

    let food = apply_lookahead(map, food_paths(map, strategy.min_safety_score), strategy);
    if let Some(best) = food.into_iter().next() {
        if best.cost < strategy.max_food_distance {
            if let Some(direction) = first_move(map, &best) {
                return Decision {
                    direction,
                    reason: DecisionReason::Food,
                    path: Some(best),
                };
            }
        } else {
            debug!(
                "Best food path costs {} (limit {}), looking for a trap",
                best.cost, strategy.max_food_distance
            );
        }
    }

    let trap = apply_lookahead(map, trap_paths(map, strategy.min_safety_score), strategy);
    if let Some(best) = trap.into_iter().next() {
        if let Some(direction) = first_move(map, &best) {
            return Decision {
                direction,
                reason: DecisionReason::Trap,
                path: Some(best),
            };
        }
    }

    let direction = legal
        .choose(rng)
        .copied()
        .unwrap_or(strategy.fallback_direction);

    Decision {
        direction,
        reason: DecisionReason::Random,
        path: None,
    }
}
