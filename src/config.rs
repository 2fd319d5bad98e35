use std::path::Path;

use tracing::warn;

use crate::ai::AdvisorConfig;
use crate::error::{BoardError, ConfigError};
use crate::game::Board;

/// Board shape and rules.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub cols: usize,
    pub rows: usize,
    pub players: u8,
    pub connect_n: usize,
}

impl Default for BoardConfig {
    fn default() -> Self {
        BoardConfig {
            cols: 7,
            rows: 6,
            players: 2,
            connect_n: 4,
        }
    }
}

impl BoardConfig {
    pub fn build(&self) -> Result<Board, BoardError> {
        Board::new(self.cols, self.rows, self.players, self.connect_n)
    }
}

/// Seat assignment for interactive games.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub human_players: Vec<u8>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            human_players: vec![1],
        }
    }
}

/// Top-level application configuration, loadable from TOML.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub board: BoardConfig,
    pub advisor: AdvisorConfig,
    pub session: SessionConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            warn!(path = %path.display(), "config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.board.cols == 0 {
            return Err(ConfigError::Validation("board.cols must be > 0".into()));
        }
        if self.board.rows == 0 {
            return Err(ConfigError::Validation("board.rows must be > 0".into()));
        }
        if self.board.players < 2 {
            return Err(ConfigError::Validation(
                "board.players must be >= 2".into(),
            ));
        }
        if self.board.connect_n < 2 {
            return Err(ConfigError::Validation(
                "board.connect_n must be >= 2".into(),
            ));
        }

        if self.advisor.rollouts_per_column == 0 {
            return Err(ConfigError::Validation(
                "advisor.rollouts_per_column must be >= 1".into(),
            ));
        }
        if self.advisor.threads == 0 {
            return Err(ConfigError::Validation(
                "advisor.threads must be >= 1".into(),
            ));
        }

        if let Some(&id) = self
            .session
            .human_players
            .iter()
            .find(|&&id| id == 0 || id > self.board.players)
        {
            return Err(ConfigError::Validation(format!(
                "session.human_players: {} is not in 1..={}",
                id, self.board.players
            )));
        }

        Ok(())
    }

    /// Generate a TOML string with all default values (useful for creating
    /// example config files).
    pub fn default_toml() -> String {
        toml::to_string_pretty(&AppConfig::default()).unwrap_or_default()
    }
}
