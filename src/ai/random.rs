use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::agent::Agent;
use crate::game::{Board, GameState};

/// Pick a legal column uniformly at random, or `None` on a full board.
pub fn random_legal_column<R: Rng + ?Sized>(board: &Board, rng: &mut R) -> Option<usize> {
    let options = board.legal_columns();
    if options.is_empty() {
        return None;
    }
    Some(options[rng.random_range(0..options.len())])
}

/// An agent that selects uniformly at random from legal actions.
pub struct RandomAgent {
    rng: StdRng,
}

impl RandomAgent {
    pub fn new() -> Self {
        RandomAgent {
            rng: StdRng::from_os_rng(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        RandomAgent {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl Agent for RandomAgent {
    fn select_action(&mut self, state: &GameState) -> Option<usize> {
        if state.is_terminal() {
            return None;
        }
        random_legal_column(state.board(), &mut self.rng)
    }

    fn name(&self) -> &str {
        "Random"
    }
}
