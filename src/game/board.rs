use std::fmt;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use super::player::Player;
use crate::error::BoardError;

/// Cell contents: [`EMPTY`] or a player id.
pub type Cell = u8;

pub const EMPTY: Cell = 0;

/// Cells as a list of rows, row 0 at the bottom.
pub type Grid = Vec<Vec<Cell>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coord {
    pub row: usize,
    pub col: usize,
}

impl Coord {
    pub const fn new(row: usize, col: usize) -> Self {
        Coord { row, col }
    }
}

/// Coordinates of the tokens that won a game, or empty if nobody won.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WinLine(Vec<Coord>);

impl WinLine {
    pub fn none() -> Self {
        WinLine(Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn coords(&self) -> &[Coord] {
        &self.0
    }

    pub fn into_coords(self) -> Vec<Coord> {
        self.0
    }
}

/// Connect-N board with gravity: tokens stack from row 0 upward.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    cols: usize,
    rows: usize,
    n_players: u8,
    connect_n: usize,
    cells: Vec<Cell>, // row-major, row 0 first
}

impl Board {
    /// Create a new empty board
    pub fn new(
        cols: usize,
        rows: usize,
        n_players: u8,
        connect_n: usize,
    ) -> Result<Self, BoardError> {
        let invalid = BoardError::InvalidDimensions {
            cols,
            rows,
            players: n_players,
            connect_n,
        };
        if cols == 0 || rows == 0 || n_players < 2 || connect_n < 2 {
            return Err(invalid);
        }
        // Cell count must be addressable with isize offsets
        let len = match cols.checked_mul(rows) {
            Some(len) if len <= isize::MAX as usize => len,
            _ => return Err(invalid),
        };
        Ok(Board {
            cols,
            rows,
            n_players,
            connect_n,
            cells: vec![EMPTY; len],
        })
    }

    /// Classic 7 columns x 6 rows, two players, four in a row.
    pub fn standard() -> Self {
        Board {
            cols: 7,
            rows: 6,
            n_players: 2,
            connect_n: 4,
            cells: vec![EMPTY; 42],
        }
    }

    /// Build a board holding a copy of `grid`. Dimensions come from the grid.
    pub fn from_grid(grid: &[Vec<Cell>], n_players: u8, connect_n: usize) -> Result<Self, BoardError> {
        let rows = grid.len();
        let cols = grid.first().map_or(0, Vec::len);
        let mut board = Board::new(cols, rows, n_players, connect_n)?;
        board.restore(grid)?;
        Ok(board)
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn n_players(&self) -> u8 {
        self.n_players
    }

    pub fn connect_n(&self) -> usize {
        self.connect_n
    }

    fn index(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    /// Get the cell at a specific position. Row 0 is the bottom.
    pub fn get(&self, row: usize, col: usize) -> Cell {
        self.cells[self.index(row, col)]
    }

    /// Check if a column is full. Columns outside the board count as full.
    pub fn is_column_full(&self, col: usize) -> bool {
        col >= self.cols || self.get(self.rows - 1, col) != EMPTY
    }

    /// Columns that can still take a token, ascending. Empty on a full board.
    pub fn legal_columns(&self) -> Vec<usize> {
        (0..self.cols)
            .filter(|&col| !self.is_column_full(col))
            .collect()
    }

    /// Check if the board is completely full
    pub fn is_full(&self) -> bool {
        (0..self.cols).all(|col| self.is_column_full(col))
    }

    /// Lowest empty row of `col`, or `None` if the column has no slot left.
    pub fn free_row(&self, col: usize) -> Option<usize> {
        if col >= self.cols {
            return None;
        }
        (0..self.rows).find(|&row| self.get(row, col) == EMPTY)
    }

    pub fn token_count(&self) -> usize {
        self.cells.iter().filter(|&&cell| cell != EMPTY).count()
    }

    fn landing_row(&self, player: Player, col: usize) -> Result<usize, BoardError> {
        if col >= self.cols {
            return Err(BoardError::InvalidColumn {
                col,
                cols: self.cols,
            });
        }
        if player.id() > self.n_players {
            return Err(BoardError::UnknownPlayer {
                player: player.id(),
                players: self.n_players,
            });
        }
        self.free_row(col).ok_or(BoardError::ColumnFull(col))
    }

    /// Drop `player`'s token into `col` and report the line it completed.
    ///
    /// Returns an empty [`WinLine`] when the game continues. A failed insert
    /// leaves the board untouched.
    pub fn insert(&mut self, player: Player, col: usize) -> Result<WinLine, BoardError> {
        let row = self.landing_row(player, col)?;
        let idx = self.index(row, col);
        self.cells[idx] = player.to_cell();
        Ok(self.line_through(Coord::new(row, col), player.to_cell()))
    }

    /// The line `insert(player, col)` would return, without placing anything.
    pub fn probe(&self, player: Player, col: usize) -> Result<WinLine, BoardError> {
        let row = self.landing_row(player, col)?;
        Ok(self.line_through(Coord::new(row, col), player.to_cell()))
    }

    /// Re-check the topmost token of `col` for a winning line.
    ///
    /// Lines are searched vertically, horizontally, then along the rising and
    /// falling diagonals; the first complete one wins. Empty or out-of-range
    /// columns yield an empty line.
    pub fn detect_victory(&self, col: usize) -> WinLine {
        if col >= self.cols {
            return WinLine::none();
        }
        match (0..self.rows).rev().find(|&row| self.get(row, col) != EMPTY) {
            Some(row) => self.line_through(Coord::new(row, col), self.get(row, col)),
            None => WinLine::none(),
        }
    }

    /// Any completed line on the board, found by checking every token.
    ///
    /// Columns are visited left to right and rows bottom up; the first line
    /// found is returned.
    pub fn find_line(&self) -> WinLine {
        (0..self.cols)
            .flat_map(|col| (0..self.rows).map(move |row| Coord::new(row, col)))
            .filter(|at| self.get(at.row, at.col) != EMPTY)
            .map(|at| self.line_through(at, self.get(at.row, at.col)))
            .find(|line| !line.is_empty())
            .unwrap_or_default()
    }

    /// Search every direction through `anchor`, treating the anchor cell as
    /// holding `value` whatever the grid says.
    fn line_through(&self, anchor: Coord, value: Cell) -> WinLine {
        // No line can be longer than the board is wide or tall
        if self.connect_n > self.rows.max(self.cols) {
            return WinLine::none();
        }
        let reach = isize::try_from(self.connect_n - 1).unwrap_or(isize::MAX);
        // Nothing sits above the anchor, so the vertical scan only looks down.
        let scans: [((isize, isize), RangeInclusive<isize>); 4] = [
            ((1, 0), -reach..=0),
            ((0, 1), -reach..=reach),
            ((1, 1), -reach..=reach),
            ((1, -1), -reach..=reach),
        ];
        scans
            .into_iter()
            .find_map(|(step, span)| self.scan(anchor, value, step, span))
            .unwrap_or_default()
    }

    /// Steps `k` along `d` from `pos` that stay inside `0..len`.
    fn on_board(pos: usize, len: usize, d: isize) -> RangeInclusive<isize> {
        let pos = pos as isize;
        let last = len as isize - 1;
        match d {
            1 => -pos..=last - pos,
            -1 => pos - last..=pos,
            _ => isize::MIN..=isize::MAX,
        }
    }

    fn scan(
        &self,
        anchor: Coord,
        value: Cell,
        (d_row, d_col): (isize, isize),
        span: RangeInclusive<isize>,
    ) -> Option<WinLine> {
        let rows = Self::on_board(anchor.row, self.rows, d_row);
        let cols = Self::on_board(anchor.col, self.cols, d_col);
        let lo = (*span.start()).max(*rows.start()).max(*cols.start());
        let hi = (*span.end()).min(*rows.end()).min(*cols.end());

        let mut run = Vec::with_capacity(self.connect_n);
        for k in lo..=hi {
            let row = (anchor.row as isize + k * d_row) as usize;
            let col = (anchor.col as isize + k * d_col) as usize;
            let cell = if row == anchor.row && col == anchor.col {
                value
            } else {
                self.get(row, col)
            };
            if cell == value {
                run.push(Coord::new(row, col));
                if run.len() == self.connect_n {
                    return Some(WinLine(run));
                }
            } else {
                run.clear();
            }
        }
        None
    }

    /// Independent deep copy.
    pub fn snapshot(&self) -> Board {
        self.clone()
    }

    /// Replace the cells with a copy of `grid`, keeping the allocation.
    ///
    /// The grid must match this board's shape, hold only known player ids and
    /// respect gravity. On error the board is left as it was.
    pub fn restore(&mut self, grid: &[Vec<Cell>]) -> Result<(), BoardError> {
        if grid.len() != self.rows || grid.iter().any(|row| row.len() != self.cols) {
            return Err(BoardError::GridShape {
                rows: grid.len(),
                cols: grid
                    .iter()
                    .map(Vec::len)
                    .find(|&len| len != self.cols)
                    .unwrap_or(self.cols),
                expected_rows: self.rows,
                expected_cols: self.cols,
            });
        }
        for (row, cells) in grid.iter().enumerate() {
            for (col, &cell) in cells.iter().enumerate() {
                if cell > self.n_players {
                    return Err(BoardError::UnknownPlayer {
                        player: cell,
                        players: self.n_players,
                    });
                }
                if cell != EMPTY && row > 0 && grid[row - 1][col] == EMPTY {
                    return Err(BoardError::FloatingToken { row, col });
                }
            }
        }
        for (dst, src) in self.cells.chunks_mut(self.cols).zip(grid) {
            dst.copy_from_slice(src);
        }
        Ok(())
    }

    /// Rewind to `other`'s state, reusing this board's allocation.
    pub fn restore_from(&mut self, other: &Board) {
        self.cols = other.cols;
        self.rows = other.rows;
        self.n_players = other.n_players;
        self.connect_n = other.connect_n;
        self.cells.clone_from(&other.cells);
    }

    /// Owned copy of the cells, row 0 first.
    pub fn grid(&self) -> Grid {
        self.cells.chunks(self.cols).map(<[Cell]>::to_vec).collect()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in (0..self.rows).rev() {
            write!(f, "|")?;
            for col in 0..self.cols {
                match self.get(row, col) {
                    EMPTY => write!(f, "{:>3}", ".")?,
                    id => write!(f, "{:>3}", id)?,
                }
            }
            writeln!(f, " |")?;
        }
        write!(f, " ")?;
        for col in 0..self.cols {
            write!(f, "{:>3}", col)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(id: u8) -> Player {
        Player::new(id).unwrap()
    }

    fn coords(pairs: &[(usize, usize)]) -> Vec<Coord> {
        pairs.iter().map(|&(row, col)| Coord::new(row, col)).collect()
    }

    /// Full grid without any line of four: pairs of rows alternate the
    /// checkerboard phase.
    fn drawn_grid(cols: usize, rows: usize) -> Grid {
        (0..rows)
            .map(|row| (0..cols).map(|col| 1 + ((row / 2 + col) % 2) as Cell).collect())
            .collect()
    }

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::standard();
        for row in 0..board.rows() {
            for col in 0..board.cols() {
                assert_eq!(board.get(row, col), EMPTY);
            }
        }
        assert_eq!(board.legal_columns(), vec![0, 1, 2, 3, 4, 5, 6]);
        assert_eq!(board.token_count(), 0);
    }

    #[test]
    fn test_invalid_dimensions() {
        assert!(matches!(
            Board::new(0, 6, 2, 4),
            Err(BoardError::InvalidDimensions { .. })
        ));
        assert!(Board::new(7, 0, 2, 4).is_err());
        assert!(Board::new(7, 6, 1, 4).is_err());
        assert!(Board::new(7, 6, 2, 1).is_err());
        assert!(Board::new(2, 2, 2, 9).is_ok());
    }

    #[test]
    fn test_insert_stacks_from_bottom() {
        let mut board = Board::standard();

        assert_eq!(board.free_row(3), Some(0));
        assert!(board.insert(p(1), 3).unwrap().is_empty());
        assert_eq!(board.get(0, 3), 1);

        assert_eq!(board.free_row(3), Some(1));
        board.insert(p(2), 3).unwrap();
        assert_eq!(board.get(1, 3), 2);
        assert_eq!(board.free_row(3), Some(2));
    }

    #[test]
    fn test_column_full() {
        let mut board = Board::standard();
        for i in 0..board.rows() {
            board.insert(p(1 + (i % 2) as u8), 0).unwrap();
        }

        assert!(board.is_column_full(0));
        assert_eq!(board.free_row(0), None);
        assert!(!board.legal_columns().contains(&0));

        let before = board.clone();
        assert_eq!(board.insert(p(2), 0), Err(BoardError::ColumnFull(0)));
        assert_eq!(board, before);
    }

    #[test]
    fn test_invalid_column_and_player() {
        let mut board = Board::standard();
        assert_eq!(
            board.insert(p(1), 7),
            Err(BoardError::InvalidColumn { col: 7, cols: 7 })
        );
        assert_eq!(
            board.insert(p(3), 0),
            Err(BoardError::UnknownPlayer {
                player: 3,
                players: 2
            })
        );
        assert_eq!(board.token_count(), 0);
        assert_eq!(board.free_row(7), None);
    }

    #[test]
    fn test_vertical_win_six_by_seven() {
        let mut board = Board::new(6, 7, 2, 4).unwrap();
        for _ in 0..3 {
            assert!(board.insert(p(1), 0).unwrap().is_empty());
        }
        let line = board.insert(p(1), 0).unwrap();
        assert_eq!(line.len(), 4);
        assert_eq!(line.coords(), coords(&[(0, 0), (1, 0), (2, 0), (3, 0)]).as_slice());
    }

    #[test]
    fn test_horizontal_win() {
        let mut board = Board::standard();
        for col in 0..3 {
            assert!(board.insert(p(1), col).unwrap().is_empty());
        }
        let line = board.insert(p(1), 3).unwrap();
        assert_eq!(line.coords(), coords(&[(0, 0), (0, 1), (0, 2), (0, 3)]).as_slice());

        // Anchoring in the middle of the line finds the same cells
        board.insert(p(2), 1).unwrap();
        assert!(board.detect_victory(1).is_empty());
        assert_eq!(board.detect_victory(2), line);
    }

    #[test]
    fn test_long_run_includes_anchor() {
        let mut board = Board::standard();
        for col in [1, 2, 4, 5, 6] {
            board.insert(p(1), col).unwrap();
        }
        // Closing the gap makes a run of six; the first four cells are reported
        let line = board.insert(p(1), 3).unwrap();
        assert_eq!(line.coords(), coords(&[(0, 1), (0, 2), (0, 3), (0, 4)]).as_slice());
        assert!(line.coords().contains(&Coord::new(0, 3)));
    }

    #[test]
    fn test_diagonal_up_win() {
        let mut board = Board::standard();
        board.insert(p(1), 0).unwrap();

        board.insert(p(2), 1).unwrap();
        board.insert(p(1), 1).unwrap();

        board.insert(p(2), 2).unwrap();
        board.insert(p(2), 2).unwrap();
        board.insert(p(1), 2).unwrap();

        board.insert(p(2), 3).unwrap();
        board.insert(p(2), 3).unwrap();
        assert!(board.insert(p(2), 3).unwrap().is_empty());
        let line = board.insert(p(1), 3).unwrap();

        assert_eq!(line.coords(), coords(&[(0, 0), (1, 1), (2, 2), (3, 3)]).as_slice());
    }

    #[test]
    fn test_diagonal_down_win() {
        let mut board = Board::standard();
        board.insert(p(1), 6).unwrap();

        board.insert(p(2), 5).unwrap();
        board.insert(p(1), 5).unwrap();

        board.insert(p(2), 4).unwrap();
        board.insert(p(2), 4).unwrap();
        board.insert(p(1), 4).unwrap();

        board.insert(p(2), 3).unwrap();
        board.insert(p(2), 3).unwrap();
        board.insert(p(2), 3).unwrap();
        let line = board.insert(p(1), 3).unwrap();

        assert_eq!(line.coords(), coords(&[(0, 6), (1, 5), (2, 4), (3, 3)]).as_slice());
    }

    #[test]
    fn test_no_win_with_three() {
        let mut board = Board::standard();
        for col in 0..3 {
            board.insert(p(1), col).unwrap();
        }
        assert!(board.detect_victory(1).is_empty());
    }

    #[test]
    fn test_detect_victory_on_empty_or_missing_column() {
        let board = Board::standard();
        assert!(board.detect_victory(0).is_empty());
        assert!(board.detect_victory(42).is_empty());
    }

    #[test]
    fn test_connect_n_longer_than_board() {
        let mut board = Board::new(3, 3, 2, 5).unwrap();
        for col in 0..3 {
            for _ in 0..3 {
                assert!(board.insert(p(1), col).unwrap().is_empty());
            }
        }
        assert!(board.is_full());
        assert!(board.legal_columns().is_empty());
    }

    #[test]
    fn test_connect_n_far_above_board_size() {
        for connect_n in [20_000_000, usize::MAX] {
            let mut board = Board::new(7, 6, 2, connect_n).unwrap();
            for _ in 0..6 {
                assert!(board.insert(p(1), 0).unwrap().is_empty());
            }
            assert!(board.probe(p(2), 1).unwrap().is_empty());
            assert!(board.detect_victory(0).is_empty());
        }
    }

    #[test]
    fn test_connect_n_equal_to_width() {
        let mut board = Board::new(5, 2, 2, 5).unwrap();
        for col in 0..4 {
            assert!(board.insert(p(1), col).unwrap().is_empty());
        }
        let line = board.insert(p(1), 4).unwrap();
        assert_eq!(line.coords(), &(0..5).map(|c| Coord::new(0, c)).collect::<Vec<_>>()[..]);
    }

    #[test]
    fn test_dimensions_that_overflow_are_rejected() {
        assert!(matches!(
            Board::new(1 << 62, 8, 2, 4),
            Err(BoardError::InvalidDimensions { .. })
        ));
        assert!(matches!(
            Board::new(usize::MAX, usize::MAX, 2, 4),
            Err(BoardError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_find_line_sees_buried_lines() {
        let grid = vec![
            vec![2, 2, 2, 2, 1, 0, 0],
            vec![1, 1, 2, 1, 1, 0, 0],
            vec![0, 0, 0, 0, 0, 0, 0],
            vec![0, 0, 0, 0, 0, 0, 0],
            vec![0, 0, 0, 0, 0, 0, 0],
            vec![0, 0, 0, 0, 0, 0, 0],
        ];
        let board = Board::from_grid(&grid, 2, 4).unwrap();
        // No column's top token is part of the line
        assert!((0..7).all(|col| board.detect_victory(col).is_empty()));
        let line = board.find_line();
        assert_eq!(line.coords(), &[
            Coord::new(0, 0),
            Coord::new(0, 1),
            Coord::new(0, 2),
            Coord::new(0, 3),
        ]);
        assert_eq!(board.get(0, 0), 2);

        assert!(Board::standard().find_line().is_empty());
    }

    #[test]
    fn test_probe_does_not_mutate() {
        let mut board = Board::standard();
        for col in 0..3 {
            board.insert(p(2), col).unwrap();
        }
        let before = board.clone();

        let line = board.probe(p(2), 3).unwrap();
        assert_eq!(line.len(), 4);
        assert!(board.probe(p(1), 3).unwrap().is_empty());
        assert_eq!(board, before);

        assert_eq!(board.insert(p(2), 3).unwrap(), line);
    }

    #[test]
    fn test_full_board_without_line_is_a_tie() {
        let grid = drawn_grid(6, 7);
        let mut board = Board::new(6, 7, 2, 4).unwrap();
        for (row, cells) in grid.iter().enumerate() {
            for (col, &cell) in cells.iter().enumerate() {
                assert_eq!(board.free_row(col), Some(row));
                let line = board.insert(p(cell), col).unwrap();
                assert!(line.is_empty(), "unexpected line at ({row}, {col})");
            }
        }
        assert!(board.legal_columns().is_empty());
        assert!(board.is_full());
        for col in 0..board.cols() {
            assert!(board.detect_victory(col).is_empty());
        }
        assert_eq!(board.grid(), grid);
    }

    #[test]
    fn test_snapshot_is_independent() {
        let mut board = Board::standard();
        board.insert(p(1), 2).unwrap();
        let mut copy = board.snapshot();
        copy.insert(p(2), 2).unwrap();

        assert_eq!(board.token_count(), 1);
        assert_eq!(copy.token_count(), 2);
    }

    #[test]
    fn test_restore_and_restore_from() {
        let mut board = Board::standard();
        board.insert(p(1), 0).unwrap();
        let saved = board.grid();
        let base = board.snapshot();

        board.insert(p(2), 0).unwrap();
        board.insert(p(1), 5).unwrap();
        board.restore(&saved).unwrap();
        assert_eq!(board, base);

        board.insert(p(2), 6).unwrap();
        board.restore_from(&base);
        assert_eq!(board, base);
    }

    #[test]
    fn test_restore_rejects_bad_grids() {
        let mut board = Board::new(3, 2, 2, 2).unwrap();
        board.insert(p(1), 1).unwrap();
        let before = board.clone();

        assert!(matches!(
            board.restore(&vec![vec![0; 3]]),
            Err(BoardError::GridShape { rows: 1, .. })
        ));
        assert_eq!(
            board.restore(&vec![vec![0, 3, 0], vec![0, 0, 0]]),
            Err(BoardError::UnknownPlayer {
                player: 3,
                players: 2
            })
        );
        assert_eq!(
            board.restore(&vec![vec![0, 0, 0], vec![1, 0, 0]]),
            Err(BoardError::FloatingToken { row: 1, col: 0 })
        );
        assert_eq!(board, before);
    }

    #[test]
    fn test_three_player_rotation_on_board() {
        let mut board = Board::new(5, 5, 3, 3).unwrap();
        assert!(board.insert(p(3), 4).unwrap().is_empty());
        assert!(board.insert(p(4), 0).is_err());
        board.insert(p(3), 3).unwrap();
        let line = board.insert(p(3), 2).unwrap();
        assert_eq!(line.coords(), coords(&[(0, 2), (0, 3), (0, 4)]).as_slice());
    }

    #[test]
    fn test_display_renders_top_row_first() {
        let mut board = Board::new(3, 2, 2, 2).unwrap();
        board.insert(p(1), 0).unwrap();
        board.insert(p(2), 0).unwrap();
        let text = board.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "|  2  .  . |");
        assert_eq!(lines[1], "|  1  .  . |");
        assert_eq!(lines[2], "   0  1  2");
    }
}
