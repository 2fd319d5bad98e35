use std::fmt;

use super::board::Cell;

/// A player id in `1..=n_players`. Cell value `0` is reserved for empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Player(u8);

impl Player {
    /// The player who opens every game.
    pub const FIRST: Player = Player(1);

    /// Wrap a raw id. Returns `None` for `0`, which marks an empty cell.
    pub fn new(id: u8) -> Option<Player> {
        if id == 0 {
            None
        } else {
            Some(Player(id))
        }
    }

    pub fn id(self) -> u8 {
        self.0
    }

    /// The value this player leaves in a board cell.
    pub fn to_cell(self) -> Cell {
        self.0
    }

    /// The player who moves after this one in an `n_players` game.
    pub fn next(self, n_players: u8) -> Player {
        Player(self.0 % n_players + 1)
    }

    /// All players of an `n_players` game in turn order.
    pub fn all(n_players: u8) -> impl Iterator<Item = Player> {
        (1..=n_players).map(Player)
    }

    /// Get player name for display
    pub fn name(self) -> String {
        format!("Player {}", self.0)
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
