use crate::codec;
use crate::piece::{Color, Piece, PieceKind};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

pub const BOARD_SIZE: usize = 10;
pub const SQUARE_COUNT: usize = BOARD_SIZE * BOARD_SIZE;

/// Standard opening: black on rows 0-1, white on rows 8-9.
pub const STARTING_POSITION: &str = "RDOZAKCFDRPPPPPPPPPP                                                            pppppppppprdozakcfdr";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Position { row, col }
    }

    pub fn is_valid(&self) -> bool {
        self.row < BOARD_SIZE && self.col < BOARD_SIZE
    }

    /// The square `(dr, dc)` away, if it is on the board.
    pub fn offset(&self, dr: i32, dc: i32) -> Option<Position> {
        let row = self.row as i32 + dr;
        let col = self.col as i32 + dc;
        if (0..BOARD_SIZE as i32).contains(&row) && (0..BOARD_SIZE as i32).contains(&col) {
            Some(Position::new(row as usize, col as usize))
        } else {
            None
        }
    }

    /// All 100 squares in row-major order.
    pub fn all() -> impl Iterator<Item = Position> {
        (0..SQUARE_COUNT).map(|i| Position::new(i / BOARD_SIZE, i % BOARD_SIZE))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub from: Position,
    pub to: Position,
}

impl Move {
    pub fn new(from: Position, to: Position) -> Self {
        Move { from, to }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("Board string must be exactly 100 characters long, not {len}")]
    MalformedBoardString { len: usize },
    #[error("Unrecognized square symbol {symbol:?} at {position}")]
    UnrecognizedSquareSymbol { symbol: char, position: Position },
    #[error("Unrecognized square value {value} at {position}")]
    UnrecognizedSquareValue { value: i32, position: Position },
    #[error("Promotion square {0} is not on the first or last row")]
    InvalidPromotionSquare(Position),
    #[error("No piece to move at {0}")]
    IllegalMoveRequested(Position),
    #[error("{0} has no king on the board")]
    MissingKing(Color),
}

pub type Squares = [[Option<Piece>; BOARD_SIZE]; BOARD_SIZE];

/// The 10x10 grid, whose turn it is, and any pending forced move.
///
/// Cloning a board yields an independent copy with an empty legal-move cache.
#[derive(Debug, Serialize, Deserialize)]
#[serde(try_from = "BoardRecord", into = "BoardRecord")]
pub struct Board {
    squares: Squares,
    side_to_move: Color,
    /// Square of the piece that must move next after a double-hop capture.
    forced_move: Option<Position>,
    legal_cache: RefCell<HashMap<Position, Vec<Position>>>,
}

impl Board {
    /// A board with no pieces.
    pub fn empty(side_to_move: Color) -> Self {
        Self::from_squares([[None; BOARD_SIZE]; BOARD_SIZE], side_to_move)
    }

    pub(crate) fn from_squares(squares: Squares, side_to_move: Color) -> Self {
        Board {
            squares,
            side_to_move,
            forced_move: None,
            legal_cache: RefCell::new(HashMap::new()),
        }
    }

    /// The default opening position, white to move.
    pub fn starting_position() -> Self {
        let (squares, _) = codec::squares_from_symbols(STARTING_POSITION);
        Self::from_squares(squares, Color::White)
    }

    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    pub fn set_side_to_move(&mut self, side: Color) {
        self.side_to_move = side;
        self.invalidate();
    }

    pub fn forced_move(&self) -> Option<Position> {
        self.forced_move
    }

    pub(crate) fn set_forced_move(&mut self, forced: Option<Position>) {
        self.forced_move = forced;
        self.invalidate();
    }

    pub fn piece_at(&self, pos: Position) -> Option<Piece> {
        if pos.is_valid() {
            self.squares[pos.row][pos.col]
        } else {
            None
        }
    }

    pub fn is_empty(&self, pos: Position) -> bool {
        self.piece_at(pos).is_none()
    }

    /// True when `pos` holds a piece of the other color than `color`.
    pub fn is_opponent(&self, pos: Position, color: Color) -> bool {
        self.piece_at(pos).is_some_and(|p| p.color != color)
    }

    /// Puts `piece` on `pos`, replacing whatever was there.
    pub fn place(&mut self, pos: Position, piece: Option<Piece>) {
        if pos.is_valid() {
            self.squares[pos.row][pos.col] = piece;
            self.invalidate();
        }
    }

    /// Removes and returns the piece on `pos`.
    pub fn remove(&mut self, pos: Position) -> Option<Piece> {
        if !pos.is_valid() {
            return None;
        }
        let piece = self.squares[pos.row][pos.col].take();
        self.invalidate();
        piece
    }

    /// Occupied squares in row-major order.
    pub fn pieces(&self) -> impl Iterator<Item = (Position, Piece)> + '_ {
        Position::all().filter_map(|pos| self.piece_at(pos).map(|piece| (pos, piece)))
    }

    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = (Position, Piece)> + '_ {
        self.pieces().filter(move |(_, piece)| piece.color == color)
    }

    pub fn king_position(&self, color: Color) -> Result<Position, BoardError> {
        self.pieces_of(color)
            .find(|(_, piece)| piece.kind == PieceKind::King)
            .map(|(pos, _)| pos)
            .ok_or(BoardError::MissingKing(color))
    }

    pub fn advance_turn(&mut self) {
        self.side_to_move = self.side_to_move.opponent();
        self.invalidate();
    }

    /// Runs every piece's tick hook. Eggs that reach zero hatch into chickens.
    pub fn tick_all_pieces(&mut self) {
        for row in self.squares.iter_mut() {
            for square in row.iter_mut() {
                let Some(piece) = square.as_mut() else {
                    continue;
                };
                piece.on_turn_tick();
                if piece.is_ready_to_hatch() {
                    let color = piece.color;
                    *square = Some(Piece::new(PieceKind::Chicken, color).moved());
                }
            }
        }
        self.invalidate();
    }

    /// Signed sum of piece values; positive favours white.
    pub fn material_difference(&self) -> i32 {
        self.pieces().map(|(_, piece)| piece.value()).sum()
    }

    pub(crate) fn cached_legal_moves(&self, origin: Position) -> Option<Vec<Position>> {
        self.legal_cache.borrow().get(&origin).cloned()
    }

    pub(crate) fn cache_legal_moves(&self, origin: Position, moves: Vec<Position>) {
        self.legal_cache.borrow_mut().insert(origin, moves);
    }

    fn invalidate(&mut self) {
        self.legal_cache.get_mut().clear();
    }

    /// Text grid with row and column indices, using the board string symbols.
    pub fn display_board(&self) -> String {
        let mut result = String::new();
        result.push_str(&format!("[{} to move]\n", self.side_to_move));
        result.push_str("   ");
        for col in 0..BOARD_SIZE {
            result.push_str(&format!("{:2} ", col));
        }
        result.push('\n');

        for row in 0..BOARD_SIZE {
            result.push_str(&format!("{:2} ", row));
            for col in 0..BOARD_SIZE {
                let c = match self.squares[row][col] {
                    Some(piece) => codec::symbol_for(&piece),
                    None => '.',
                };
                result.push_str(&format!(" {} ", c));
            }
            result.push('\n');
        }

        result
    }
}

impl Clone for Board {
    fn clone(&self) -> Self {
        Board {
            squares: self.squares,
            side_to_move: self.side_to_move,
            forced_move: self.forced_move,
            legal_cache: RefCell::new(HashMap::new()),
        }
    }
}

impl PartialEq for Board {
    fn eq(&self, other: &Self) -> bool {
        self.squares == other.squares
            && self.side_to_move == other.side_to_move
            && self.forced_move == other.forced_move
    }
}

impl Eq for Board {}

impl Default for Board {
    fn default() -> Self {
        Self::starting_position()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_board())
    }
}

/// Wire form of a board: the 100-character string plus turn state.
#[derive(Serialize, Deserialize)]
struct BoardRecord {
    squares: String,
    side_to_move: Color,
    #[serde(default)]
    forced_move: Option<Position>,
}

impl TryFrom<BoardRecord> for Board {
    type Error = BoardError;

    fn try_from(record: BoardRecord) -> Result<Self, Self::Error> {
        let mut board = Board::from_board_string(&record.squares, record.side_to_move)?;
        board.forced_move = record.forced_move;
        Ok(board)
    }
}

impl From<Board> for BoardRecord {
    fn from(board: Board) -> Self {
        BoardRecord {
            squares: board.to_board_string(),
            side_to_move: board.side_to_move,
            forced_move: board.forced_move,
        }
    }
}

/// Builds a board from `(row, col, symbol)` placements on an otherwise empty grid.
#[cfg(test)]
pub(crate) fn board_from(placements: &[(usize, usize, char)], side_to_move: Color) -> Board {
    let mut symbols = vec![' '; SQUARE_COUNT];
    for &(row, col, symbol) in placements {
        symbols[row * BOARD_SIZE + col] = symbol;
    }
    let symbols: String = symbols.into_iter().collect();
    match Board::from_board_string(&symbols, side_to_move) {
        Ok(board) => board,
        Err(e) => panic!("bad test board: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_stays_on_board() {
        let corner = Position::new(0, 9);
        assert_eq!(corner.offset(1, -1), Some(Position::new(1, 8)));
        assert_eq!(corner.offset(-1, 0), None);
        assert_eq!(corner.offset(0, 1), None);
        assert!(!Position::new(10, 0).is_valid());
        assert_eq!(Position::all().count(), SQUARE_COUNT);
    }

    #[test]
    fn test_starting_position_layout() {
        let board = Board::starting_position();
        assert_eq!(board.side_to_move(), Color::White);
        assert_eq!(board.king_position(Color::White), Ok(Position::new(9, 5)));
        assert_eq!(board.king_position(Color::Black), Ok(Position::new(0, 5)));
        assert_eq!(board.pieces().count(), 40);
        assert_eq!(board.material_difference(), 0);

        let chicken = board.piece_at(Position::new(9, 2)).unwrap();
        assert_eq!(chicken.kind, PieceKind::Chicken);
        assert!(chicken.has_moved);
    }

    #[test]
    fn test_missing_king_is_reported() {
        let board = Board::empty(Color::White);
        assert_eq!(
            board.king_position(Color::Black),
            Err(BoardError::MissingKing(Color::Black))
        );
    }

    #[test]
    fn test_tick_hatches_eggs_into_moved_chickens() {
        let mut board = Board::empty(Color::White);
        let pos = Position::new(4, 4);
        board.place(pos, Some(Piece::egg(Color::Black, 1)));
        board.place(Position::new(5, 5), Some(Piece::egg(Color::White, 3)));
        board.tick_all_pieces();

        let hatched = board.piece_at(pos).unwrap();
        assert_eq!(hatched.kind, PieceKind::Chicken);
        assert_eq!(hatched.color, Color::Black);
        assert!(hatched.has_moved);
        assert_eq!(
            board.piece_at(Position::new(5, 5)).unwrap().hatch_countdown,
            2
        );
    }

    #[test]
    fn test_clone_is_independent_and_uncached() {
        let board = Board::starting_position();
        board.cache_legal_moves(Position::new(8, 0), vec![Position::new(7, 0)]);

        let mut copy = board.clone();
        assert!(copy.cached_legal_moves(Position::new(8, 0)).is_none());
        copy.remove(Position::new(8, 0));
        copy.advance_turn();

        assert!(board.piece_at(Position::new(8, 0)).is_some());
        assert_eq!(board.side_to_move(), Color::White);
        assert_ne!(board, copy);
    }

    #[test]
    fn test_mutation_clears_cache() {
        let mut board = Board::starting_position();
        board.cache_legal_moves(Position::new(8, 0), vec![Position::new(7, 0)]);
        board.place(Position::new(5, 5), None);
        assert!(board.cached_legal_moves(Position::new(8, 0)).is_none());
    }

    #[test]
    fn test_board_serializes_as_board_string() {
        let board = Board::starting_position();
        let json = serde_json::to_string(&board).unwrap();
        assert!(json.contains(STARTING_POSITION));

        let restored: Board = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, board);

        let bad = r#"{"squares":"kK","side_to_move":"White"}"#;
        assert!(serde_json::from_str::<Board>(bad).is_err());
    }

    #[test]
    fn test_display_board_uses_symbols() {
        let text = Board::starting_position().display_board();
        assert!(text.starts_with("[White to move]"));
        assert!(text.contains(" K "));
        assert!(text.contains(" k "));
    }
}
