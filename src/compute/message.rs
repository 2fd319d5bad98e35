use serde::{Deserialize, Serialize};

use crate::error::{AdvisorError, BoardError};
use crate::game::{Board, Grid, Player};

/// Self-contained snapshot sent to the advisor worker.
///
/// On the wire the fields are camelCase; the browser client's `nCols`,
/// `nRows` and `field` names are accepted as well.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvisorRequest {
    #[serde(alias = "nCols")]
    pub cols: usize,
    #[serde(alias = "nRows")]
    pub rows: usize,
    pub n_players: u8,
    pub connect_n: usize,
    /// Rows of cells, row 0 at the bottom.
    #[serde(alias = "field")]
    pub board_state: Grid,
    pub current_player: u8,
}

/// One reply per request: ranked columns, most preferred first.
pub type AdvisorReply = Result<Vec<usize>, AdvisorError>;

impl AdvisorRequest {
    /// Snapshot `board` with `current` to move.
    pub fn new(board: &Board, current: Player) -> Self {
        AdvisorRequest {
            cols: board.cols(),
            rows: board.rows(),
            n_players: board.n_players(),
            connect_n: board.connect_n(),
            board_state: board.grid(),
            current_player: current.id(),
        }
    }

    /// Rebuild a private board and the player to move from the payload.
    pub fn decode(&self) -> Result<(Board, Player), AdvisorError> {
        // The grid must match the declared shape before anything is allocated
        if let Some(bad) = self
            .board_state
            .iter()
            .map(Vec::len)
            .find(|&len| len != self.cols)
            .or((self.board_state.len() != self.rows).then_some(self.cols))
        {
            return Err(BoardError::GridShape {
                rows: self.board_state.len(),
                cols: bad,
                expected_rows: self.rows,
                expected_cols: self.cols,
            }
            .into());
        }
        let mut board = Board::new(self.cols, self.rows, self.n_players, self.connect_n)?;
        board.restore(&self.board_state)?;
        let player = Player::new(self.current_player)
            .filter(|player| player.id() <= self.n_players)
            .ok_or(AdvisorError::InvalidPlayer {
                player: self.current_player,
                players: self.n_players,
            })?;
        Ok((board, player))
    }

    pub fn from_json(text: &str) -> Result<Self, AdvisorError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json(&self) -> Result<String, AdvisorError> {
        Ok(serde_json::to_string(self)?)
    }
}
