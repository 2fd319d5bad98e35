use tracing::info;

use crate::ai::{Agent, MonteCarloAgent};
use crate::config::AppConfig;
use crate::error::{BoardError, MoveError};
use crate::game::{Board, GameOutcome, GameState, Placement, Player};

/// Who controls a player id.
pub enum Seat {
    Human,
    Computer(Box<dyn Agent>),
}

/// What the owner of the game should do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Turn {
    /// Wait for a column from a person.
    AwaitingInput(Player),
    /// Ask the seat's agent for a column.
    Computing(Player),
    Finished(GameOutcome),
}

/// A live game plus the seats that play it.
pub struct Session {
    state: GameState,
    seats: Vec<Seat>,
}

impl Session {
    /// Start a game on `board`; `seat_for` is called once per player id.
    pub fn new(board: Board, seat_for: impl FnMut(Player) -> Seat) -> Self {
        let seats = Player::all(board.n_players()).map(seat_for).collect();
        Session {
            state: GameState::new(board),
            seats,
        }
    }

    /// Board and seats from configuration: listed humans, Monte Carlo agents
    /// everywhere else.
    pub fn from_config(config: &AppConfig) -> Result<Self, BoardError> {
        let board = config.board.build()?;
        let humans = &config.session.human_players;
        Ok(Session::new(board, |player| {
            if humans.contains(&player.id()) {
                Seat::Human
            } else {
                Seat::Computer(Box::new(MonteCarloAgent::new(config.advisor.clone())))
            }
        }))
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    fn seat_index(&self, player: Player) -> usize {
        player.id() as usize - 1
    }

    /// Name of whoever controls `player`.
    pub fn seat_name(&self, player: Player) -> &str {
        match &self.seats[self.seat_index(player)] {
            Seat::Human => "Human",
            Seat::Computer(agent) => agent.name(),
        }
    }

    /// The turn trigger: report who must act now.
    pub fn advance(&self) -> Turn {
        if let Some(outcome) = self.state.outcome() {
            return Turn::Finished(outcome);
        }
        let player = self.state.current_player();
        match self.seats[self.seat_index(player)] {
            Seat::Human => Turn::AwaitingInput(player),
            Seat::Computer(_) => Turn::Computing(player),
        }
    }

    /// Apply a column chosen by the human whose turn it is.
    pub fn submit(&mut self, column: usize) -> Result<Placement, MoveError> {
        match self.advance() {
            Turn::AwaitingInput(_) => self.apply(column),
            Turn::Computing(player) => Err(MoveError::NotHumanTurn(player.id())),
            Turn::Finished(_) => Err(MoveError::GameOver),
        }
    }

    /// Let the computer seat to move pick and play exactly one column.
    pub fn play_computer_turn(&mut self) -> Result<Placement, MoveError> {
        let player = match self.advance() {
            Turn::Computing(player) => player,
            Turn::AwaitingInput(player) => return Err(MoveError::NotComputerTurn(player.id())),
            Turn::Finished(_) => return Err(MoveError::GameOver),
        };
        let idx = self.seat_index(player);
        let column = match &mut self.seats[idx] {
            Seat::Computer(agent) => agent.select_action(&self.state),
            Seat::Human => None,
        };
        match column {
            Some(column) => self.apply(column),
            None => Err(MoveError::GameOver),
        }
    }

    /// Run computer turns until the game ends. Stops with
    /// [`MoveError::NotComputerTurn`] if a human seat comes up.
    pub fn play_out(&mut self) -> Result<GameOutcome, MoveError> {
        loop {
            match self.advance() {
                Turn::Finished(outcome) => return Ok(outcome),
                Turn::AwaitingInput(player) => {
                    return Err(MoveError::NotComputerTurn(player.id()))
                }
                Turn::Computing(_) => {
                    self.play_computer_turn()?;
                }
            }
        }
    }

    fn apply(&mut self, column: usize) -> Result<Placement, MoveError> {
        let placement = self.state.apply_move_mut(column)?;
        info!(
            player = placement.player.id(),
            column = placement.column,
            row = placement.row,
            "token placed"
        );
        match placement.outcome {
            Some(GameOutcome::Winner(player)) => {
                info!(player = player.id(), line = ?placement.line.coords(), "game won")
            }
            Some(GameOutcome::Draw) => info!("game drawn"),
            None => {}
        }
        Ok(placement)
    }
}
