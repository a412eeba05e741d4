// Breadth-first shortest path search with a path safety metric

use std::collections::{HashMap, VecDeque};

use log::trace;

use crate::game_map::GameMap;
use crate::types::Coord;

/// Cost reported for a destination that cannot be reached
pub const UNREACHABLE: i32 = -1;

/// A path from start (inclusive) to destination (inclusive)
#[derive(Debug, Clone, PartialEq)]
pub struct PathResult {
    pub path: Vec<Coord>,
    /// Hop count, or `UNREACHABLE`
    pub cost: i32,
    /// Relative ranking signal, higher ranks safer. See `safety_score`.
    pub safety: f64,
}

impl PathResult {
    pub fn unreachable() -> Self {
        PathResult {
            path: Vec::new(),
            cost: UNREACHABLE,
            safety: 0.0,
        }
    }

    pub fn is_reachable(&self) -> bool {
        self.cost != UNREACHABLE
    }

    pub fn destination(&self) -> Option<Coord> {
        self.path.last().copied()
    }

    /// The tile this path enters first
    pub fn first_step(&self) -> Option<Coord> {
        self.path.get(1).copied()
    }
}

/// True if `coord` is within one tile of an opponent's head
fn is_next_to_opponent_head(map: &GameMap, coord: &Coord) -> bool {
    map.opponents()
        .filter_map(|s| s.head())
        .any(|head| head.manhattan_distance(coord) <= 1)
}

/// Finds a minimum hop path from `start` to `destination`.
///
/// Neighbours are expanded in `Direction::all()` order so ties always resolve to the
/// first discovered path. From the start tile only, neighbours that touch an
/// opponent's head are skipped to avoid an immediate head-on collision.
pub fn shortest_path(map: &GameMap, start: Coord, destination: Coord) -> PathResult {
    let mut queue = VecDeque::from([start]);
    let mut parents: HashMap<Coord, Option<Coord>> = HashMap::new();
    parents.insert(start, None);

    while let Some(current) = queue.pop_front() {
        if current == destination {
            return found(map, backtrack(&parents, current));
        }
        expand(map, start, current, &mut parents, &mut queue);
    }

    trace!("No path from {} to {}", start, destination);
    PathResult::unreachable()
}

/// Breadth-first search tree covering everything reachable from one start tile.
///
/// Uses the same expansion order and first-step rule as `shortest_path`, so
/// `path_to` returns exactly what `shortest_path` would for every destination while
/// the grid is only searched once.
#[derive(Debug, Clone)]
pub struct SearchTree {
    start: Coord,
    parents: HashMap<Coord, Option<Coord>>,
}

impl SearchTree {
    pub fn grow(map: &GameMap, start: Coord) -> Self {
        let mut queue = VecDeque::from([start]);
        let mut parents: HashMap<Coord, Option<Coord>> = HashMap::new();
        parents.insert(start, None);

        while let Some(current) = queue.pop_front() {
            expand(map, start, current, &mut parents, &mut queue);
        }

        trace!("Search tree from {} covers {} tiles", start, parents.len());
        SearchTree { start, parents }
    }

    pub fn start(&self) -> Coord {
        self.start
    }

    pub fn reaches(&self, coord: &Coord) -> bool {
        self.parents.contains_key(coord)
    }

    pub fn path_to(&self, map: &GameMap, destination: Coord) -> PathResult {
        if !self.reaches(&destination) {
            return PathResult::unreachable();
        }
        found(map, backtrack(&self.parents, destination))
    }
}

/// Queues the undiscovered free neighbours of `current`
fn expand(
    map: &GameMap,
    start: Coord,
    current: Coord,
    parents: &mut HashMap<Coord, Option<Coord>>,
    queue: &mut VecDeque<Coord>,
) {
    for next in current.neighbors() {
        if parents.contains_key(&next) || !map.is_tile_free(&next) {
            continue;
        }
        if current == start && is_next_to_opponent_head(map, &next) {
            continue;
        }
        parents.insert(next, Some(current));
        queue.push_back(next);
    }
}

fn found(map: &GameMap, path: Vec<Coord>) -> PathResult {
    let safety = safety_score(map, &path);
    PathResult {
        cost: path.len() as i32 - 1,
        path,
        safety,
    }
}

fn backtrack(parents: &HashMap<Coord, Option<Coord>>, end: Coord) -> Vec<Coord> {
    let mut path = vec![end];
    let mut current = end;
    while let Some(&Some(prev)) = parents.get(&current) {
        path.push(prev);
        current = prev;
    }
    path.reverse();
    path
}

/// Counts free tiles beside the path: for every step, the free neighbours of the
/// entered tile that lie at a right angle to the direction of travel.
pub fn free_neighbors_along(map: &GameMap, path: &[Coord]) -> usize {
    path.windows(2)
        .filter_map(|step| {
            step[0]
                .direction_to(&step[1])
                .map(|dir| (step[1], dir.perpendicular()))
        })
        .map(|(tile, sides)| {
            sides
                .iter()
                .filter(|side| map.is_tile_free(&tile.translate(**side)))
                .count()
        })
        .sum()
}

/// Maps a path length and its side room to a ranking score.
///
/// Short paths (two tiles or fewer) get a bounded score in [0, 1]. Longer paths get
/// `len * 4 / free`, which is unbounded above. A longer path with no side room at
/// all scores 0 instead of dividing by zero.
pub fn normalize_safety(path_len: usize, free: usize) -> f64 {
    if path_len <= 2 {
        return match free {
            0 => 0.0,
            1 => 0.5,
            2 => 0.9,
            _ => 1.0,
        };
    }

    if free == 0 {
        return 0.0;
    }

    (path_len * 4) as f64 / free as f64
}

pub fn safety_score(map: &GameMap, path: &[Coord]) -> f64 {
    normalize_safety(path.len(), free_neighbors_along(map, path))
}
