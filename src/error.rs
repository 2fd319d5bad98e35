use std::path::PathBuf;

/// Errors raised by board construction and token placement.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error(
        "invalid board dimensions: {cols} columns x {rows} rows, {players} players, connect {connect_n}"
    )]
    InvalidDimensions {
        cols: usize,
        rows: usize,
        players: u8,
        connect_n: usize,
    },

    #[error("column {0} is full")]
    ColumnFull(usize),

    #[error("column {col} is out of range (board has {cols} columns)")]
    InvalidColumn { col: usize, cols: usize },

    #[error("player {player} is not in 1..={players}")]
    UnknownPlayer { player: u8, players: u8 },

    #[error("grid is {rows}x{cols}, expected {expected_rows}x{expected_cols}")]
    GridShape {
        rows: usize,
        cols: usize,
        expected_rows: usize,
        expected_cols: usize,
    },

    #[error("token at row {row}, column {col} sits above an empty cell")]
    FloatingToken { row: usize, col: usize },
}

/// Errors raised when applying a move to a live game.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error(transparent)]
    Board(#[from] BoardError),

    #[error("the game is already over")]
    GameOver,

    #[error("player {0} is not controlled by a human")]
    NotHumanTurn(u8),

    #[error("player {0} is not controlled by the computer")]
    NotComputerTurn(u8),
}

/// Reasons the move advisor could not produce a recommendation.
///
/// None of these are fatal to a game: callers fall back to a random legal
/// column.
#[derive(Debug, thiserror::Error)]
pub enum AdvisorError {
    #[error("invalid advisor request: {0}")]
    InvalidRequest(#[from] BoardError),

    #[error("player {player} cannot move on a board for {players} players")]
    InvalidPlayer { player: u8, players: u8 },

    #[error("failed to spawn advisor worker: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("advisor worker terminated without a reply")]
    WorkerLost,

    #[error("malformed advisor payload: {0}")]
    Payload(#[from] serde_json::Error),
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}
