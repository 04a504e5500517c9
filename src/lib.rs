//! **mazes** is a maze generation, visualisation and route finding library.
//!
//! Mazes live on a rectangular boolean [`grid::Grid`] where `true` is a wall and `false`
//! an open corridor. [`generators::generate`] carves a perfect maze with a randomized
//! depth first backtracker and [`pathing::shortest_path`] finds the shortest route from
//! the grid's start point (top left) to its end point (bottom right).

pub mod coordinates;
pub mod errors;
pub mod generators;
pub mod grid;
pub mod grid_displays;
pub mod pathing;
pub mod persistence;
pub mod renderers;
pub mod units;
mod utils;
