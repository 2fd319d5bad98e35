//! Random playouts: finish a game with uniformly random legal moves.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::game::{Board, GameOutcome, Player, WinLine};

/// Result of one playout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playout {
    pub outcome: GameOutcome,
    pub line: WinLine,
}

/// Wins per player plus ties, indexed `0..=n_players` with ties at 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutcomeTally {
    counts: Vec<u32>,
}

impl OutcomeTally {
    pub fn new(n_players: u8) -> Self {
        OutcomeTally {
            counts: vec![0; n_players as usize + 1],
        }
    }

    pub fn record(&mut self, outcome: GameOutcome) {
        let idx = match outcome {
            GameOutcome::Winner(player) => player.id() as usize,
            GameOutcome::Draw => 0,
        };
        if let Some(count) = self.counts.get_mut(idx) {
            *count += 1;
        }
    }

    pub fn wins(&self, player: Player) -> u32 {
        self.counts.get(player.id() as usize).copied().unwrap_or(0)
    }

    pub fn ties(&self) -> u32 {
        self.counts[0]
    }

    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }

    /// Raw counts, ties first.
    pub fn counts(&self) -> &[u32] {
        &self.counts
    }

    /// Fraction of recorded games `player` won.
    pub fn win_rate(&self, player: Player) -> f32 {
        match self.total() {
            0 => 0.0,
            total => self.wins(player) as f32 / total as f32,
        }
    }
}

/// Plays random games on boards handed to it.
///
/// The simulator owns only its random source; every board it plays on belongs
/// to the caller and is expected to be a disposable copy.
pub struct Simulator<R: Rng = StdRng> {
    rng: R,
}

impl Simulator<StdRng> {
    pub fn new() -> Self {
        Simulator {
            rng: StdRng::from_os_rng(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Simulator {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for Simulator<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> Simulator<R> {
    pub fn with_rng(rng: R) -> Self {
        Simulator { rng }
    }

    /// Play random moves on `board`, starting with `starting_player`, until
    /// somebody connects or the board fills up.
    pub fn playout(&mut self, board: &mut Board, starting_player: Player) -> Playout {
        let n_players = board.n_players();
        let mut player = starting_player;
        loop {
            let options = board.legal_columns();
            if options.is_empty() {
                return Playout {
                    outcome: GameOutcome::Draw,
                    line: WinLine::none(),
                };
            }
            let col = options[self.rng.random_range(0..options.len())];
            match board.insert(player, col) {
                Ok(line) if !line.is_empty() => {
                    return Playout {
                        outcome: GameOutcome::Winner(player),
                        line,
                    };
                }
                Ok(_) => player = player.next(n_players),
                // Only reachable with a player id the board does not know
                Err(_) => {
                    return Playout {
                        outcome: GameOutcome::Draw,
                        line: WinLine::none(),
                    };
                }
            }
        }
    }
}
