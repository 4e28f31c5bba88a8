use crate::board::{Board, BoardError, Move};
use crate::piece::Color;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use thiserror::Error;

/// Plies after which an undecided game is drawn.
pub const DEFAULT_MAX_PLIES: usize = 1000;

#[derive(Debug, Error)]
pub enum GameError {
    #[error("Invalid move: {0}")]
    InvalidMove(String),
    #[error("Game already over")]
    GameOver,
    #[error("No move to undo")]
    NothingToUndo,
    #[error(transparent)]
    Board(#[from] BoardError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    WhiteWins,
    BlackWins,
    Draw,
}

impl GameResult {
    pub fn winner(&self) -> Option<Color> {
        match self {
            GameResult::WhiteWins => Some(Color::White),
            GameResult::BlackWins => Some(Color::Black),
            GameResult::Draw => None,
        }
    }

    fn win_for(color: Color) -> Self {
        match color {
            Color::White => GameResult::WhiteWins,
            Color::Black => GameResult::BlackWins,
        }
    }
}

impl Board {
    /// Checkmate or stalemate for the side to move, if the position is terminal.
    pub fn outcome(&self) -> Option<GameResult> {
        if !self.all_legal_moves().is_empty() {
            return None;
        }
        if self.is_check(true) {
            Some(GameResult::win_for(self.side_to_move().opponent()))
        } else {
            Some(GameResult::Draw)
        }
    }
}

/// A game in progress: the board plus everything needed to validate, undo and end it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Game {
    board: Board,
    history: Vec<Move>,
    /// Board before each move in `history`, for undo.
    snapshots: Vec<Board>,
    result: Option<GameResult>,
    max_plies: usize,
    /// Track position hashes and their occurrence counts for threefold repetition
    position_history: HashMap<u64, usize>,
}

impl Game {
    /// A new game from the standard opening.
    pub fn new() -> Self {
        Self::from_board(Board::starting_position())
    }

    /// A game continuing from an arbitrary position.
    pub fn from_board(board: Board) -> Self {
        let mut game = Game {
            board,
            history: Vec::new(),
            snapshots: Vec::new(),
            result: None,
            max_plies: DEFAULT_MAX_PLIES,
            position_history: HashMap::new(),
        };

        // Record the initial position
        game.record_position();
        game.check_game_end();

        game
    }

    pub fn with_max_plies(mut self, max_plies: usize) -> Self {
        self.max_plies = max_plies;
        self.check_game_end();
        self
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn side_to_move(&self) -> Color {
        self.board.side_to_move()
    }

    pub fn result(&self) -> Option<GameResult> {
        self.result
    }

    pub fn is_game_over(&self) -> bool {
        self.result.is_some()
    }

    pub fn move_count(&self) -> usize {
        self.history.len()
    }

    pub fn history(&self) -> &[Move] {
        &self.history
    }

    /// Get all legal moves for the side to move
    pub fn legal_moves(&self) -> Vec<Move> {
        if self.is_game_over() {
            return Vec::new();
        }
        self.board.all_legal_moves()
    }

    /// Make a move and update the game state
    pub fn make_move(&mut self, mv: Move) -> Result<(), GameError> {
        if self.is_game_over() {
            return Err(GameError::GameOver);
        }

        // Validate the move
        if !self.board.is_legal(mv) {
            return Err(GameError::InvalidMove(format!("Move {} is not legal", mv)));
        }

        let before = self.board.clone();
        self.board.apply_move(mv)?;
        self.snapshots.push(before);
        self.history.push(mv);

        // Record position and check for repetition or mate
        self.record_position();
        self.check_game_end();

        Ok(())
    }

    /// Take back the last move, reopening the game if it had ended.
    pub fn undo(&mut self) -> Result<Move, GameError> {
        let (Some(previous), Some(mv)) = (self.snapshots.pop(), self.history.pop()) else {
            return Err(GameError::NothingToUndo);
        };

        let hash = self.hash_position();
        if let Some(count) = self.position_history.get_mut(&hash) {
            *count -= 1;
            if *count == 0 {
                self.position_history.remove(&hash);
            }
        }

        self.board = previous;
        self.result = None;
        self.check_game_end();
        Ok(mv)
    }

    /// How many times the current position has occurred.
    pub fn repetition_count(&self) -> usize {
        self.position_history
            .get(&self.hash_position())
            .copied()
            .unwrap_or(0)
    }

    /// Hash of the squares, the side to move and any pending forced move
    fn hash_position(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.board.to_board_string().hash(&mut hasher);
        self.board.side_to_move().hash(&mut hasher);
        self.board.forced_move().hash(&mut hasher);
        hasher.finish()
    }

    /// Record the current position in the history
    fn record_position(&mut self) {
        let hash = self.hash_position();
        *self.position_history.entry(hash).or_insert(0) += 1;
    }

    fn check_game_end(&mut self) {
        if let Some(outcome) = self.board.outcome() {
            self.result = Some(outcome);
            return;
        }

        // Threefold repetition or running out of plies is a draw
        if self.repetition_count() >= 3 || self.history.len() >= self.max_plies {
            self.result = Some(GameResult::Draw);
        }
    }

    pub fn display_board(&self) -> String {
        self.board.display_board()
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Position, board_from};

    fn mv(from: (usize, usize), to: (usize, usize)) -> Move {
        Move::new(Position::new(from.0, from.1), Position::new(to.0, to.1))
    }

    /// Helper: bare kings in opposite corners
    fn bare_kings() -> Game {
        Game::from_board(board_from(&[(9, 0, 'k'), (0, 9, 'K')], Color::White))
    }

    #[test]
    fn test_new_game() {
        let game = Game::new();
        assert_eq!(game.side_to_move(), Color::White);
        assert_eq!(game.legal_moves().len(), 100);
        assert!(!game.is_game_over());
        assert_eq!(game.repetition_count(), 1);
    }

    #[test]
    fn test_illegal_move_rejected() {
        let mut game = Game::new();
        let result = game.make_move(mv((8, 0), (4, 0)));
        assert!(matches!(result, Err(GameError::InvalidMove(_))));
        let result = game.make_move(mv((1, 0), (2, 0)));
        assert!(matches!(result, Err(GameError::InvalidMove(_))));
        assert_eq!(game.move_count(), 0);
    }

    #[test]
    fn test_make_and_undo_move() {
        let mut game = Game::new();
        game.make_move(mv((8, 4), (6, 4))).unwrap();
        assert_eq!(game.move_count(), 1);
        assert_eq!(game.side_to_move(), Color::Black);

        assert_eq!(game.undo().unwrap(), mv((8, 4), (6, 4)));
        assert_eq!(game.board(), &Board::starting_position());
        assert_eq!(game.repetition_count(), 1);
        assert!(matches!(game.undo(), Err(GameError::NothingToUndo)));
    }

    #[test]
    fn test_checkmate_ends_game() {
        let mut game = Game::from_board(board_from(
            &[(1, 9, 'm'), (5, 8, 'm'), (0, 0, 'K'), (9, 0, 'k')],
            Color::White,
        ));
        game.make_move(mv((5, 8), (0, 8))).unwrap();
        assert_eq!(game.result(), Some(GameResult::WhiteWins));
        assert!(game.legal_moves().is_empty());
        assert!(matches!(
            game.make_move(mv((9, 0), (9, 1))),
            Err(GameError::GameOver)
        ));

        game.undo().unwrap();
        assert!(!game.is_game_over());
    }

    #[test]
    fn test_stalemate_is_a_draw() {
        let game = Game::from_board(board_from(
            &[(0, 0, 'K'), (1, 9, 'm'), (9, 1, 'm'), (9, 9, 'k')],
            Color::Black,
        ));
        assert_eq!(game.result(), Some(GameResult::Draw));
        assert_eq!(game.result().and_then(|r| r.winner()), None);
    }

    #[test]
    fn test_threefold_repetition() {
        let mut game = bare_kings();
        let shuffle = [
            mv((9, 0), (9, 1)),
            mv((0, 9), (0, 8)),
            mv((9, 1), (9, 0)),
            mv((0, 8), (0, 9)),
        ];
        for m in shuffle {
            game.make_move(m).unwrap();
        }
        assert_eq!(game.repetition_count(), 2);
        assert!(!game.is_game_over());

        for m in shuffle {
            game.make_move(m).unwrap();
        }
        assert_eq!(game.repetition_count(), 3);
        assert_eq!(game.result(), Some(GameResult::Draw));
    }

    #[test]
    fn test_ply_limit() {
        let mut game = bare_kings().with_max_plies(2);
        game.make_move(mv((9, 0), (9, 1))).unwrap();
        assert!(!game.is_game_over());
        game.make_move(mv((0, 9), (0, 8))).unwrap();
        assert_eq!(game.result(), Some(GameResult::Draw));
    }

    #[test]
    fn test_missing_king_surfaces_as_board_error() {
        let err: GameError = BoardError::MissingKing(Color::White).into();
        assert_eq!(err.to_string(), "White has no king on the board");
    }
}
