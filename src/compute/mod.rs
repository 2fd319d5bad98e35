//! Boundary between the live game and the move advisor: a snapshot request
//! goes to a worker thread, one ranked column list (or an error) comes back,
//! and failures degrade to a random legal move.

mod channel;
mod message;

pub use channel::{resolve_column, ComputeChannel, PendingRecommendation};
pub use message::{AdvisorReply, AdvisorRequest};
