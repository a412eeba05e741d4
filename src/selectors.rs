// Candidate destination selection
//
// Both selectors produce paths from the player's head, ranked safest first.

use log::debug;

use crate::game_map::GameMap;
use crate::pathfinding::{PathResult, SearchTree};
use crate::types::Coord;

/// Computes a path to every destination (in the given order), drops degenerate and
/// unsafe ones, and stable-sorts the rest by safety, highest first.
///
/// One search tree from the head serves all destinations.
pub fn paths_to_destinations(
    map: &GameMap,
    destinations: &[Coord],
    min_safety: f64,
) -> Vec<PathResult> {
    if destinations.is_empty() {
        return Vec::new();
    }
    let tree = SearchTree::grow(map, map.player_head());

    let mut paths: Vec<PathResult> = destinations
        .iter()
        .map(|&dest| tree.path_to(map, dest))
        .filter(|p| p.path.len() > 1 && p.safety > min_safety)
        .collect();

    paths.sort_by(|a, b| b.safety.total_cmp(&a.safety));
    paths
}

/// Food tiles ordered by Manhattan distance from the player's head, nearest first.
/// Equal distances keep row-major discovery order.
pub fn food_by_distance(map: &GameMap) -> Vec<Coord> {
    let head = map.player_head();
    let mut food = map.food_tiles();
    food.sort_by_key(|c| head.manhattan_distance(c));
    food
}

/// Paths to reachable food, safest first
pub fn food_paths(map: &GameMap, min_safety: f64) -> Vec<PathResult> {
    let food = food_by_distance(map);
    let paths = paths_to_destinations(map, &food, min_safety);
    debug!("Food: {} tiles, {} usable paths", food.len(), paths.len());
    paths
}

/// Free tiles next to opponent heads, farthest from the player first.
///
/// Checking the farthest opponents first is a tunable heuristic kept from the
/// bot's original behaviour; the final ranking is by safety anyway.
pub fn trap_destinations(map: &GameMap) -> Vec<Coord> {
    let head = map.player_head();
    let mut targets: Vec<Coord> = map
        .opponents()
        .filter_map(|s| s.head())
        .flat_map(|opponent_head| map.free_neighbors(&opponent_head))
        .collect();

    targets.sort_by_key(|c| std::cmp::Reverse(head.manhattan_distance(c)));
    targets
}

/// Paths to tiles adjacent to an opponent's head, safest first
pub fn trap_paths(map: &GameMap, min_safety: f64) -> Vec<PathResult> {
    let targets = trap_destinations(map);
    let paths = paths_to_destinations(map, &targets, min_safety);
    debug!("Trap: {} targets, {} usable paths", targets.len(), paths.len());
    paths
}
