pub mod grid_world;

pub use grid_world::{ActionSet, GridConfig, GridWorld, Move, Position};
