//! Game sessions: seats, the turn trigger, and statistics over a series of
//! games.

mod session;
mod stats;

pub use session::{Seat, Session, Turn};
pub use stats::{GameRecord, MatchStats};
