// Read-only board snapshot used by the decision engine
//
// A GameMap is built once per tick from the GameState handed over by the transport
// layer. Everything except the player's own snake lives behind an Arc so that the
// "what if I step there" snapshots created during lookahead only copy the one snake
// that actually changes.

use std::collections::HashSet;
use std::sync::Arc;

use crate::types::{Board, Coord, Direction, GameState, Snake, TileType};

/// Parts of the board that never change while a decision is being computed
#[derive(Debug)]
struct Layout {
    width: i32,
    height: i32,
    /// Food in row-major discovery order
    food: Vec<Coord>,
    obstacles: HashSet<Coord>,
    opponents: Vec<Snake>,
    /// Every segment of every live opponent
    opponent_cells: HashSet<Coord>,
    /// Opponent segments that will still be there next tick
    opponent_blocked: HashSet<Coord>,
}

/// Immutable per-tick board snapshot
#[derive(Debug, Clone)]
pub struct GameMap {
    layout: Arc<Layout>,
    player: Snake,
    player_blocked: HashSet<Coord>,
}

/// Cells of a snake that stay occupied next tick.
/// The tail moves away unless the snake is a single segment.
fn blocked_cells(snake: &Snake) -> impl Iterator<Item = Coord> + '_ {
    let keep = if snake.len() > 1 {
        snake.len() - 1
    } else {
        snake.len()
    };
    snake.body[..keep].iter().copied()
}

impl GameMap {
    /// Builds the snapshot for the snake identified by `state.player_id`
    pub fn from_state(state: &GameState) -> Result<Self, String> {
        Self::new(&state.board, &state.player_id)
    }

    pub fn new(board: &Board, player_id: &str) -> Result<Self, String> {
        let player = board
            .snakes
            .iter()
            .find(|s| s.id == player_id)
            .ok_or_else(|| format!("Snake with id '{}' not found in board state", player_id))?;

        if !player.is_alive() {
            return Err(format!("Snake with id '{}' is dead", player_id));
        }

        let opponents: Vec<Snake> = board
            .snakes
            .iter()
            .filter(|s| s.id != player_id && s.is_alive())
            .cloned()
            .collect();

        let opponent_cells = opponents
            .iter()
            .flat_map(|s| s.body.iter().copied())
            .collect();
        let opponent_blocked = opponents.iter().flat_map(blocked_cells).collect();

        let mut food = board.food.clone();
        food.sort_by_key(|c| (c.y, c.x));
        food.dedup();

        let layout = Layout {
            width: board.width,
            height: board.height,
            food,
            obstacles: board.obstacles.iter().copied().collect(),
            opponents,
            opponent_cells,
            opponent_blocked,
        };

        Ok(GameMap {
            layout: Arc::new(layout),
            player_blocked: blocked_cells(player).collect(),
            player: player.clone(),
        })
    }

    pub fn width(&self) -> i32 {
        self.layout.width
    }

    pub fn height(&self) -> i32 {
        self.layout.height
    }

    pub fn player(&self) -> &Snake {
        &self.player
    }

    pub fn player_id(&self) -> &str {
        &self.player.id
    }

    /// The player's head. The constructor guarantees the body is non-empty.
    pub fn player_head(&self) -> Coord {
        self.player.body[0]
    }

    /// Live snakes other than the player
    pub fn opponents(&self) -> impl Iterator<Item = &Snake> {
        self.layout.opponents.iter()
    }

    /// All live snakes, player first
    pub fn snakes(&self) -> impl Iterator<Item = &Snake> {
        std::iter::once(&self.player).chain(self.layout.opponents.iter())
    }

    pub fn is_out_of_bounds(&self, coord: &Coord) -> bool {
        coord.is_out_of_bounds(self.layout.width, self.layout.height)
    }

    fn is_food(&self, coord: &Coord) -> bool {
        self.layout
            .food
            .binary_search_by_key(&(coord.y, coord.x), |c| (c.y, c.x))
            .is_ok()
    }

    fn is_snake_segment(&self, coord: &Coord) -> bool {
        self.layout.opponent_cells.contains(coord) || self.player.body.contains(coord)
    }

    pub fn tile_type(&self, coord: &Coord) -> TileType {
        if self.is_out_of_bounds(coord) {
            TileType::OutOfBounds
        } else if self.layout.obstacles.contains(coord) {
            TileType::Obstacle
        } else if self.is_snake_segment(coord) {
            TileType::Snake
        } else if self.is_food(coord) {
            TileType::Food
        } else {
            TileType::Empty
        }
    }

    /// True iff the tile can be entered next tick
    pub fn is_tile_free(&self, coord: &Coord) -> bool {
        !self.is_out_of_bounds(coord)
            && !self.layout.obstacles.contains(coord)
            && !self.layout.opponent_blocked.contains(coord)
            && !self.player_blocked.contains(coord)
    }

    /// Free orthogonal neighbours of a tile, in `Direction::all()` order
    pub fn free_neighbors(&self, coord: &Coord) -> Vec<Coord> {
        coord
            .neighbors()
            .into_iter()
            .filter(|c| self.is_tile_free(c))
            .collect()
    }

    /// Whether the player can move in `dir` without colliding immediately
    pub fn can_move(&self, dir: Direction) -> bool {
        self.is_tile_free(&self.player_head().translate(dir))
    }

    pub fn legal_moves(&self) -> Vec<Direction> {
        Direction::all()
            .into_iter()
            .filter(|&dir| self.can_move(dir))
            .collect()
    }

    /// Food tiles that are still food (not covered by a snake), row-major order
    pub fn food_tiles(&self) -> Vec<Coord> {
        self.layout
            .food
            .iter()
            .filter(|c| !self.is_snake_segment(c))
            .copied()
            .collect()
    }

    /// Snapshot in which the player's head has advanced to `next`.
    /// The body grows by one segment; only the player's snake is copied.
    pub fn advance_player(&self, next: Coord) -> GameMap {
        let mut player = self.player.clone();
        player.body.insert(0, next);

        GameMap {
            layout: Arc::clone(&self.layout),
            player_blocked: blocked_cells(&player).collect(),
            player,
        }
    }

    /// True when both snapshots share the same immutable board layout
    pub fn shares_layout_with(&self, other: &GameMap) -> bool {
        Arc::ptr_eq(&self.layout, &other.layout)
    }
}
