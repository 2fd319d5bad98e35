//! Computer players: random playouts, the tiered move advisor, and the
//! `Agent` trait the session drives.

mod advisor;
mod agent;
mod monte_carlo;
mod random;
mod simulator;

pub use advisor::{AdvisorConfig, Analysis, BlockPlacement, ColumnScore, MoveAdvisor};
pub use agent::Agent;
pub use monte_carlo::MonteCarloAgent;
pub use random::{random_legal_column, RandomAgent};
pub use simulator::{OutcomeTally, Playout, Simulator};
