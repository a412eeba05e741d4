// Game boundary types and grid geometry
//
// Everything the transport layer hands to the engine is defined here, along with
// the coordinate and direction primitives the engine works in.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 2D coordinate on the board
/// Origin is the top-left tile; `y` grows downwards.
#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub const fn new(x: i32, y: i32) -> Self {
        Coord { x, y }
    }

    /// Returns the coordinate one step away in the given direction
    pub fn translate(&self, dir: Direction) -> Coord {
        dir.apply(self)
    }

    /// Calculates Manhattan distance between two coordinates
    pub fn manhattan_distance(&self, other: &Coord) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    /// Checks if a coordinate is out of bounds
    pub fn is_out_of_bounds(&self, width: i32, height: i32) -> bool {
        self.x < 0 || self.x >= width || self.y < 0 || self.y >= height
    }

    /// Direction that leads from `self` to an orthogonally adjacent `other`.
    /// Returns None when the two coordinates are not neighbours.
    pub fn direction_to(&self, other: &Coord) -> Option<Direction> {
        Direction::all()
            .into_iter()
            .find(|dir| dir.apply(self) == *other)
    }

    /// The four orthogonal neighbours, in `Direction::all()` order
    pub fn neighbors(&self) -> [Coord; 4] {
        Direction::all().map(|dir| dir.apply(self))
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

/// Represents the four possible movement directions for a snake
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Returns all possible directions.
    /// This order is the tie-breaking order for every search in the engine.
    pub fn all() -> [Direction; 4] {
        [Direction::Up, Direction::Down, Direction::Left, Direction::Right]
    }

    /// Converts direction to string representation for API response
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }

    /// Calculates the next coordinate when moving in this direction
    pub fn apply(&self, coord: &Coord) -> Coord {
        match self {
            Direction::Up => Coord { x: coord.x, y: coord.y - 1 },
            Direction::Down => Coord { x: coord.x, y: coord.y + 1 },
            Direction::Left => Coord { x: coord.x - 1, y: coord.y },
            Direction::Right => Coord { x: coord.x + 1, y: coord.y },
        }
    }

    pub fn is_horizontal(&self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }

    /// The two directions at a right angle to this one
    pub fn perpendicular(&self) -> [Direction; 2] {
        if self.is_horizontal() {
            [Direction::Up, Direction::Down]
        } else {
            [Direction::Left, Direction::Right]
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            "left" => Ok(Direction::Left),
            "right" => Ok(Direction::Right),
            _ => Err(format!("Invalid direction: {}", s)),
        }
    }
}

/// Classification of a single board cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileType {
    Empty,
    Food,
    Obstacle,
    Snake,
    OutOfBounds,
}

/// Snake as reported by the game server, body ordered head first
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Snake {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub body: Vec<Coord>,
}

impl Snake {
    pub fn head(&self) -> Option<Coord> {
        self.body.first().copied()
    }

    pub fn tail(&self) -> Option<Coord> {
        self.body.last().copied()
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Dead snakes stay in the snapshot with an empty body
    pub fn is_alive(&self) -> bool {
        !self.body.is_empty()
    }
}

/// Board state including dimensions, food, obstacles and snakes
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Board {
    pub width: i32,
    pub height: i32,
    #[serde(default)]
    pub food: Vec<Coord>,
    #[serde(default)]
    pub obstacles: Vec<Coord>,
    pub snakes: Vec<Snake>,
}

/// Complete per-tick snapshot received from the transport layer
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub game_id: String,
    pub game_tick: u32,
    pub player_id: String,
    pub board: Board,
}

/// Notification that a new game is about to start
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GameStarting {
    pub game_id: String,
    pub player_count: u32,
    pub width: i32,
    pub height: i32,
}

/// Why a snake left the game
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeathReason {
    CollisionWithWall,
    CollisionWithObstacle,
    CollisionWithSnake,
    CollisionWithItself,
    HeadOnCollision,
}

/// Notification that a snake died
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SnakeDead {
    pub player_id: String,
    pub death_reason: DeathReason,
    pub x: i32,
    pub y: i32,
    pub game_tick: u32,
}

/// Notification that the game is over
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GameEnded {
    pub game_id: String,
    pub winner_id: Option<String>,
    pub game_tick: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_follows_screen_axes() {
        let c = Coord::new(2, 2);
        assert_eq!(c.translate(Direction::Up), Coord::new(2, 1));
        assert_eq!(c.translate(Direction::Down), Coord::new(2, 3));
        assert_eq!(c.translate(Direction::Left), Coord::new(1, 2));
        assert_eq!(c.translate(Direction::Right), Coord::new(3, 2));
    }

    #[test]
    fn test_direction_to_adjacent_and_non_adjacent() {
        let c = Coord::new(4, 4);
        for dir in Direction::all() {
            assert_eq!(c.direction_to(&c.translate(dir)), Some(dir));
        }
        assert_eq!(c.direction_to(&Coord::new(5, 5)), None);
        assert_eq!(c.direction_to(&c), None);
    }

    #[test]
    fn test_out_of_bounds() {
        assert!(Coord::new(-1, 0).is_out_of_bounds(5, 5));
        assert!(Coord::new(0, 5).is_out_of_bounds(5, 5));
        assert!(!Coord::new(4, 4).is_out_of_bounds(5, 5));
    }

    #[test]
    fn test_parse_direction() {
        assert_eq!("up".parse::<Direction>().unwrap(), Direction::Up);
        assert_eq!("Down".parse::<Direction>().unwrap(), Direction::Down);
        assert_eq!("LEFT".parse::<Direction>().unwrap(), Direction::Left);
        assert_eq!(" right ".parse::<Direction>().unwrap(), Direction::Right);
        assert!("invalid".parse::<Direction>().is_err());
    }

    #[test]
    fn test_game_state_deserializes_from_camel_case() {
        let json = r#"{
            "gameId": "g1",
            "gameTick": 3,
            "playerId": "me",
            "board": {
                "width": 5,
                "height": 5,
                "food": [{"x": 1, "y": 1}],
                "snakes": [{"id": "me", "name": "rusty", "body": [{"x": 0, "y": 0}]}]
            }
        }"#;
        let state: GameState = serde_json::from_str(json).unwrap();
        assert_eq!(state.game_tick, 3);
        assert!(state.board.obstacles.is_empty());
        assert_eq!(state.board.snakes[0].head(), Some(Coord::new(0, 0)));
    }

    #[test]
    fn test_snake_dead_deserializes() {
        let json = r#"{"playerId":"p2","deathReason":"HEAD_ON_COLLISION","x":3,"y":4,"gameTick":17}"#;
        let event: SnakeDead = serde_json::from_str(json).unwrap();
        assert_eq!(event.death_reason, DeathReason::HeadOnCollision);
        assert_eq!(event.game_tick, 17);
    }
}
