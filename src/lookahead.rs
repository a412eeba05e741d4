// Depth-limited lookahead over candidate paths
//
// Each candidate is checked by stepping the player one tile along it and asking
// whether food or trap options remain from there. Candidates sharing a first step
// share the verdict, so a level costs at most four successor checks.

use std::collections::HashMap;

use log::debug;

use crate::game_map::GameMap;
use crate::pathfinding::PathResult;
use crate::selectors::{food_paths, trap_paths};
use crate::types::Coord;

/// Whether a snapshot still offers follow-up options.
///
/// At depth 0 either a food or a trap path is enough. Deeper, both the food and
/// the trap candidates must each keep at least one surviving continuation.
pub fn survives(map: &GameMap, depth: u8, min_safety: f64) -> bool {
    let food = food_paths(map, min_safety);

    if depth == 0 {
        return !food.is_empty() || !trap_paths(map, min_safety).is_empty();
    }

    if filter_paths(map, &food, depth - 1, min_safety).is_empty() {
        return false;
    }
    let trap = trap_paths(map, min_safety);
    !filter_paths(map, &trap, depth - 1, min_safety).is_empty()
}

/// Keeps the candidates whose first step leads somewhere with follow-up options.
/// Order is preserved.
pub fn filter_paths(
    map: &GameMap,
    paths: &[PathResult],
    depth: u8,
    min_safety: f64,
) -> Vec<PathResult> {
    let mut verdicts: HashMap<Coord, bool> = HashMap::new();
    let kept: Vec<PathResult> = paths
        .iter()
        .filter(|path| match path.first_step() {
            Some(next) => *verdicts
                .entry(next)
                .or_insert_with(|| survives(&map.advance_player(next), depth, min_safety)),
            None => false,
        })
        .cloned()
        .collect();

    debug!(
        "Lookahead depth {}: kept {} of {} paths ({} successors checked)",
        depth,
        kept.len(),
        paths.len(),
        verdicts.len()
    );
    kept
}
