//! Move recommendation: immediate threats, a two-ply safety check, and Monte
//! Carlo scoring of every remaining column.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use tracing::{debug, warn};

use super::simulator::{OutcomeTally, Simulator};
use crate::game::{Board, GameOutcome, Player};

/// Where columns that block an opponent's immediate win are placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockPlacement {
    /// Blocks follow the Monte Carlo ranking.
    #[default]
    AfterRollouts,
    /// Blocks come right after the current player's own winning columns.
    BeforeRollouts,
}

/// Advisor configuration.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AdvisorConfig {
    pub rollouts_per_column: u32,
    pub threads: usize,
    pub block_placement: BlockPlacement,
    pub seed: Option<u64>,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        AdvisorConfig {
            rollouts_per_column: 2000,
            threads: 1,
            block_placement: BlockPlacement::AfterRollouts,
            seed: None,
        }
    }
}

/// Rollout results for one candidate column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnScore {
    pub column: usize,
    pub tally: OutcomeTally,
}

/// Everything the advisor worked out for one position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Analysis {
    /// Columns that win on the spot for the player to move.
    pub own_wins: Vec<usize>,
    /// Columns where another player would win on their next move.
    pub blocks: Vec<usize>,
    /// Columns that let the opponent win by playing on top.
    pub unsafe_columns: Vec<usize>,
    /// Monte Carlo scores, best first for the player to move.
    pub scores: Vec<ColumnScore>,
    pub block_placement: BlockPlacement,
}

impl Analysis {
    /// Flatten the tiers into a single preference order without repeats.
    pub fn columns(&self) -> Vec<usize> {
        let ranked = self.scores.iter().map(|score| score.column).filter(|col| {
            !self.own_wins.contains(col)
                && !self.blocks.contains(col)
                && !self.unsafe_columns.contains(col)
        });

        let mut out: Vec<usize> = Vec::with_capacity(self.scores.len() + self.own_wins.len());
        let mut push = |col: usize| {
            if !out.contains(&col) {
                out.push(col);
            }
        };

        self.own_wins.iter().copied().for_each(&mut push);
        match self.block_placement {
            BlockPlacement::AfterRollouts => {
                ranked.for_each(&mut push);
                self.blocks.iter().copied().for_each(&mut push);
            }
            BlockPlacement::BeforeRollouts => {
                self.blocks.iter().copied().for_each(&mut push);
                ranked.for_each(&mut push);
            }
        }
        self.unsafe_columns.iter().copied().for_each(&mut push);
        out
    }
}

/// Ranks the columns of a position for the player to move.
///
/// Randomness is drawn from the injected `R`; each candidate column gets its
/// own generator seeded from it, so a seeded advisor is reproducible no matter
/// how many threads run the rollouts.
pub struct MoveAdvisor<R: Rng = StdRng> {
    config: AdvisorConfig,
    rng: R,
}

impl MoveAdvisor<StdRng> {
    /// Seeded from `config.seed` when present, otherwise from OS entropy.
    pub fn new(config: AdvisorConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        MoveAdvisor { config, rng }
    }

    pub fn seeded(config: AdvisorConfig, seed: u64) -> Self {
        MoveAdvisor {
            config,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl<R: Rng> MoveAdvisor<R> {
    pub fn with_rng(config: AdvisorConfig, rng: R) -> Self {
        MoveAdvisor { config, rng }
    }

    pub fn config(&self) -> &AdvisorConfig {
        &self.config
    }

    /// Columns for `current` to play, most preferred first.
    ///
    /// Returns an empty list when the board is full.
    pub fn recommend(&mut self, board: &Board, current: Player) -> Vec<usize> {
        self.analyze(board, current).columns()
    }

    /// Run every tier and keep the intermediate results.
    pub fn analyze(&mut self, board: &Board, current: Player) -> Analysis {
        let legal = board.legal_columns();
        let mut analysis = Analysis {
            block_placement: self.config.block_placement,
            ..Analysis::default()
        };
        if legal.is_empty() {
            return analysis;
        }
        debug_assert!(current.id() <= board.n_players());

        for player in Player::all(board.n_players()) {
            for col in winning_columns(board, player, &legal) {
                if player == current {
                    analysis.own_wins.push(col);
                } else if !analysis.blocks.contains(&col) {
                    analysis.blocks.push(col);
                }
            }
        }

        if board.n_players() == 2 {
            analysis.unsafe_columns = unsafe_columns(board, current, &legal)
                .into_iter()
                .filter(|col| !analysis.own_wins.contains(col) && !analysis.blocks.contains(col))
                .collect();
        }

        let candidates: Vec<usize> = legal
            .iter()
            .copied()
            .filter(|col| !analysis.own_wins.contains(col))
            .collect();
        let mut scores = self.score_columns(board, current, &candidates);
        // Stable: equal scores keep column order
        scores.sort_by(|a, b| b.tally.wins(current).cmp(&a.tally.wins(current)));
        analysis.scores = scores;

        debug!(
            player = current.id(),
            own_wins = ?analysis.own_wins,
            blocks = ?analysis.blocks,
            unsafe_columns = ?analysis.unsafe_columns,
            "threat tiers"
        );
        for score in &analysis.scores {
            debug!(column = score.column, tally = ?score.tally.counts(), "rollouts");
        }

        analysis
    }

    fn score_columns(
        &mut self,
        board: &Board,
        current: Player,
        columns: &[usize],
    ) -> Vec<ColumnScore> {
        let rollouts = self.config.rollouts_per_column;
        let jobs: Vec<(usize, u64)> = columns
            .iter()
            .map(|&col| (col, self.rng.random()))
            .collect();
        if jobs.is_empty() {
            return Vec::new();
        }

        let score = |&(col, seed): &(usize, u64)| score_column(board, current, col, rollouts, seed);

        let threads = self.config.threads.clamp(1, jobs.len());
        if threads == 1 {
            return jobs.iter().map(score).collect();
        }

        match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
            // Indexed collect keeps column order
            Ok(pool) => pool.install(|| jobs.par_iter().map(score).collect()),
            Err(err) => {
                warn!(error = %err, "rollout pool unavailable, scoring on one thread");
                jobs.iter().map(score).collect()
            }
        }
    }
}

/// Legal columns where `player` would connect immediately.
fn winning_columns(board: &Board, player: Player, legal: &[usize]) -> Vec<usize> {
    legal
        .iter()
        .copied()
        .filter(|&col| board.probe(player, col).is_ok_and(|line| !line.is_empty()))
        .collect()
}

/// Columns where playing `current` hands the next player a win directly on top.
/// Only meaningful for two players.
fn unsafe_columns(board: &Board, current: Player, legal: &[usize]) -> Vec<usize> {
    let opponent = current.next(board.n_players());
    let mut scratch = board.snapshot();
    let mut out = Vec::new();
    for &col in legal {
        scratch.restore_from(board);
        if scratch.insert(current, col).is_err() || scratch.free_row(col).is_none() {
            continue;
        }
        if scratch
            .probe(opponent, col)
            .is_ok_and(|line| !line.is_empty())
        {
            out.push(col);
        }
    }
    out
}

/// Play `rollouts` random games after `current` drops a token into `column`.
fn score_column(
    board: &Board,
    current: Player,
    column: usize,
    rollouts: u32,
    seed: u64,
) -> ColumnScore {
    let n_players = board.n_players();
    let next = current.next(n_players);
    let mut simulator = Simulator::with_rng(StdRng::seed_from_u64(seed));
    let mut scratch = board.snapshot();
    let mut tally = OutcomeTally::new(n_players);

    for _ in 0..rollouts {
        scratch.restore_from(board);
        match scratch.insert(current, column) {
            Ok(line) if !line.is_empty() => tally.record(GameOutcome::Winner(current)),
            Ok(_) => tally.record(simulator.playout(&mut scratch, next).outcome),
            Err(_) => break,
        }
    }

    ColumnScore { column, tally }
}
