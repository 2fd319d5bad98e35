//! Core connect-N game logic: variable-size board with gravity and victory
//! detection, player ids with turn rotation, and the live game state.

mod board;
mod player;
mod state;

pub use board::{Board, Cell, Coord, Grid, WinLine, EMPTY};
pub use player::Player;
pub use state::{GameOutcome, GameState, Placement};
