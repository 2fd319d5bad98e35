use super::{Board, Player, WinLine};
use crate::error::MoveError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameOutcome {
    Winner(Player),
    Draw,
}

/// Where a token landed and what it did to the game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub player: Player,
    pub column: usize,
    pub row: usize,
    pub line: WinLine,
    pub outcome: Option<GameOutcome>,
}

/// The live game: board, player to move, and result once decided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    board: Board,
    current_player: Player,
    outcome: Option<GameOutcome>,
    winning_line: WinLine,
    moves_played: usize,
}

impl GameState {
    /// Start a game on `board` with player 1 to move.
    pub fn new(board: Board) -> Self {
        Self::resume(board, Player::FIRST)
    }

    /// Initial state on the classic 7x6 board.
    pub fn initial() -> Self {
        Self::new(Board::standard())
    }

    /// Continue from an arbitrary position with `current_player` to move.
    ///
    /// A board that already holds a line starts finished with that line's
    /// owner as winner; a full board without one starts drawn.
    pub fn resume(board: Board, current_player: Player) -> Self {
        let winning_line = board.find_line();
        let outcome = match winning_line.coords().first() {
            Some(at) => Player::new(board.get(at.row, at.col)).map(GameOutcome::Winner),
            None if board.is_full() => Some(GameOutcome::Draw),
            None => None,
        };
        GameState {
            moves_played: board.token_count(),
            board,
            current_player,
            outcome,
            winning_line,
        }
    }

    /// Get current player
    pub fn current_player(&self) -> Player {
        self.current_player
    }

    /// Get reference to board
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Get game outcome if game is over
    pub fn outcome(&self) -> Option<GameOutcome> {
        self.outcome
    }

    /// Tokens that decided the game; empty unless somebody won.
    pub fn winning_line(&self) -> &WinLine {
        &self.winning_line
    }

    pub fn moves_played(&self) -> usize {
        self.moves_played
    }

    /// Check if game is over
    pub fn is_terminal(&self) -> bool {
        self.outcome.is_some()
    }

    /// Get list of legal columns (not full)
    pub fn legal_actions(&self) -> Vec<usize> {
        if self.is_terminal() {
            return Vec::new();
        }
        self.board.legal_columns()
    }

    /// Apply a move and return new state (immutable)
    pub fn apply_move(&self, column: usize) -> Result<GameState, MoveError> {
        let mut next = self.clone();
        next.apply_move_mut(column)?;
        Ok(next)
    }

    /// Apply move mutably
    pub fn apply_move_mut(&mut self, column: usize) -> Result<Placement, MoveError> {
        if self.is_terminal() {
            return Err(MoveError::GameOver);
        }

        let player = self.current_player;
        let landing = self.board.free_row(column);
        let line = self.board.insert(player, column)?;
        // insert succeeded, so the column had a free row
        let row = landing.unwrap_or_default();

        // A winning move ends the game even when it also fills the board
        if !line.is_empty() {
            self.outcome = Some(GameOutcome::Winner(player));
            self.winning_line = line.clone();
        } else if self.board.is_full() {
            self.outcome = Some(GameOutcome::Draw);
        }

        self.current_player = player.next(self.board.n_players());
        self.moves_played += 1;

        Ok(Placement {
            player,
            column,
            row,
            line,
            outcome: self.outcome,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BoardError;

    fn p(id: u8) -> Player {
        Player::new(id).unwrap()
    }

    #[test]
    fn test_initial_state() {
        let state = GameState::initial();
        assert_eq!(state.current_player(), Player::FIRST);
        assert!(!state.is_terminal());
        assert_eq!(state.legal_actions().len(), 7);
        assert_eq!(state.moves_played(), 0);
    }

    #[test]
    fn test_apply_move() {
        let state = GameState::initial();
        let new_state = state.apply_move(3).unwrap();

        assert_eq!(new_state.current_player(), p(2));
        assert_eq!(new_state.board().get(0, 3), 1);
        // Original untouched
        assert_eq!(state.board().token_count(), 0);
    }

    #[test]
    fn test_placement_reports_row() {
        let mut state = GameState::initial();
        state.apply_move_mut(2).unwrap();
        let placement = state.apply_move_mut(2).unwrap();
        assert_eq!(placement.player, p(2));
        assert_eq!(placement.row, 1);
        assert!(placement.line.is_empty());
        assert_eq!(placement.outcome, None);
    }

    #[test]
    fn test_win_detection() {
        let mut state = GameState::initial();

        // Player 1 wins with horizontal line
        for col in 0..4 {
            state = state.apply_move(col).unwrap(); // Player 1
            if col < 3 {
                state = state.apply_move(col).unwrap(); // Player 2 (row above)
            }
        }

        assert!(state.is_terminal());
        assert_eq!(state.outcome(), Some(GameOutcome::Winner(p(1))));
        assert_eq!(state.winning_line().len(), 4);
        assert!(state.legal_actions().is_empty());
        assert_eq!(state.apply_move(5), Err(MoveError::GameOver));
    }

    #[test]
    fn test_resume_detects_existing_winner() {
        let mut board = Board::standard();
        for col in 0..3 {
            board.insert(p(2), col).unwrap();
            board.insert(p(1), col).unwrap();
        }
        board.insert(p(2), 3).unwrap();
        // Player 2 holds the bottom row
        let state = GameState::resume(board.clone(), p(1));
        assert!(state.is_terminal());
        assert_eq!(state.outcome(), Some(GameOutcome::Winner(p(2))));
        assert_eq!(state.winning_line().len(), 4);
        assert!(state.legal_actions().is_empty());
        assert_eq!(state.moves_played(), 7);

        let mut open = Board::standard();
        open.insert(p(1), 3).unwrap();
        let state = GameState::resume(open, p(2));
        assert!(!state.is_terminal());
        assert!(state.winning_line().is_empty());
    }

    #[test]
    fn test_three_players_rotate() {
        let board = Board::new(7, 6, 3, 4).unwrap();
        let mut state = GameState::new(board);
        let order: Vec<u8> = (0..4)
            .map(|col| state.apply_move_mut(col).unwrap().player.id())
            .collect();
        assert_eq!(order, vec![1, 2, 3, 1]);
    }

    #[test]
    fn test_draw() {
        let board = Board::new(2, 2, 2, 3).unwrap();
        let mut state = GameState::new(board);
        for col in [0, 0, 1, 1] {
            state.apply_move_mut(col).unwrap();
        }
        assert_eq!(state.outcome(), Some(GameOutcome::Draw));
        assert!(state.winning_line().is_empty());
    }

    #[test]
    fn test_full_column_is_rejected() {
        let board = Board::new(3, 1, 2, 2).unwrap();
        let mut state = GameState::new(board);
        state.apply_move_mut(0).unwrap();
        assert_eq!(
            state.apply_move_mut(0),
            Err(MoveError::Board(BoardError::ColumnFull(0)))
        );
        assert_eq!(state.current_player(), p(2));
    }
}
