use crate::game::GameState;

/// Anything that can choose a column for the player to move.
pub trait Agent: Send {
    /// Select a column for `state.current_player()`.
    ///
    /// Returns `None` only when the game offers no legal column.
    fn select_action(&mut self, state: &GameState) -> Option<usize>;

    /// Return the agent's display name.
    fn name(&self) -> &str;
}
