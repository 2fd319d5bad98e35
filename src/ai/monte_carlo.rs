use rand::rngs::StdRng;
use rand::SeedableRng;

use super::advisor::AdvisorConfig;
use super::agent::Agent;
use crate::compute::{resolve_column, AdvisorRequest, ComputeChannel};
use crate::game::GameState;

/// Computer player backed by the move advisor on a worker thread.
///
/// Falls back to a random legal column whenever the advisor fails, so a turn
/// always produces a move while one is possible.
pub struct MonteCarloAgent {
    channel: ComputeChannel,
    fallback_rng: StdRng,
}

impl MonteCarloAgent {
    pub fn new(config: AdvisorConfig) -> Self {
        let fallback_rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed ^ 0x5eed),
            None => StdRng::from_os_rng(),
        };
        MonteCarloAgent {
            channel: ComputeChannel::new(config),
            fallback_rng,
        }
    }
}

impl Agent for MonteCarloAgent {
    fn select_action(&mut self, state: &GameState) -> Option<usize> {
        if state.is_terminal() {
            return None;
        }
        let request = AdvisorRequest::new(state.board(), state.current_player());
        let reply = self.channel.submit(request).wait();
        resolve_column(state.board(), reply, &mut self.fallback_rng)
    }

    fn name(&self) -> &str {
        "Monte Carlo"
    }
}
