use std::collections::VecDeque;
use std::fmt;

use crate::game::{GameOutcome, Player};

/// Result of a single finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameRecord {
    pub outcome: GameOutcome,
    pub length: usize,
}

/// Series tracker: lifetime totals plus rolling-window rates.
pub struct MatchStats {
    n_players: u8,
    recent: VecDeque<GameRecord>,
    capacity: usize,
    totals: Vec<u64>, // lifetime, index 0 = draws
}

impl MatchStats {
    pub fn with_capacity(n_players: u8, capacity: usize) -> Self {
        MatchStats {
            n_players,
            recent: VecDeque::with_capacity(capacity),
            capacity,
            totals: vec![0; n_players as usize + 1],
        }
    }

    pub fn new(n_players: u8) -> Self {
        Self::with_capacity(n_players, 100)
    }

    pub fn record(&mut self, record: GameRecord) {
        let idx = match record.outcome {
            GameOutcome::Winner(player) => player.id() as usize,
            GameOutcome::Draw => 0,
        };
        if let Some(total) = self.totals.get_mut(idx) {
            *total += 1;
        }
        self.recent.push_back(record);
        if self.recent.len() > self.capacity {
            self.recent.pop_front();
        }
    }

    /// Lifetime number of recorded games.
    pub fn total_games(&self) -> u64 {
        self.totals.iter().sum()
    }

    /// Lifetime wins of `player`.
    pub fn wins(&self, player: Player) -> u64 {
        self.totals.get(player.id() as usize).copied().unwrap_or(0)
    }

    pub fn draws(&self) -> u64 {
        self.totals[0]
    }

    fn rate(&self, last_n: usize, pred: impl Fn(&GameRecord) -> bool) -> f32 {
        let n = self.recent.len().min(last_n);
        if n == 0 {
            return 0.0;
        }
        let hits = self.recent.iter().rev().take(n).filter(|r| pred(r)).count();
        hits as f32 / n as f32
    }

    /// Win rate for `player` in the last N games.
    pub fn win_rate(&self, player: Player, last_n: usize) -> f32 {
        self.rate(last_n, |r| r.outcome == GameOutcome::Winner(player))
    }

    /// Draw rate in the last N games.
    pub fn draw_rate(&self, last_n: usize) -> f32 {
        self.rate(last_n, |r| r.outcome == GameOutcome::Draw)
    }

    /// Average game length over the last N games.
    pub fn average_game_length(&self, last_n: usize) -> f32 {
        let n = self.recent.len().min(last_n);
        if n == 0 {
            return 0.0;
        }
        let total: usize = self.recent.iter().rev().take(n).map(|r| r.length).sum();
        total as f32 / n as f32
    }
}

impl fmt::Display for MatchStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "games: {}", self.total_games())?;
        for player in Player::all(self.n_players) {
            writeln!(f, "{}: {} wins", player.name(), self.wins(player))?;
        }
        writeln!(f, "draws: {}", self.draws())?;
        write!(
            f,
            "avg length (last {}): {:.1}",
            self.recent.len(),
            self.average_game_length(self.capacity)
        )
    }
}
