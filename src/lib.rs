// Library exports for the snake bot
// The transport layer and the replay tool both drive the engine through these modules

pub mod bot;
pub mod config;
pub mod debug_logger;
pub mod game_map;
pub mod lookahead;
pub mod pathfinding;
pub mod policy;
pub mod replay;
pub mod selectors;
pub mod types;
