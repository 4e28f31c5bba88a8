//! Board string and integer grid encodings.
//!
//! String: 100 symbols, row-major, lowercase white and uppercase black, space
//! for an empty square. Integer grid: sign is color, magnitude is the piece code
//! from [`Piece::as_int`].
//!
//! Both formats are lossy in places the symbol table has no room for: a moved
//! king or rook always exports as unmoved, an immortal chicken exports as a
//! plain moved chicken, and `i` imports as an immortal *pawn* while an immortal
//! panda exports as `i`.

use crate::board::{BOARD_SIZE, Board, BoardError, Position, SQUARE_COUNT, Squares};
use crate::piece::{Color, EGG_INCUBATION, Piece, PieceKind};
use rand::Rng;
use rand::seq::{SliceRandom, index};

pub type IntGrid = [[i32; BOARD_SIZE]; BOARD_SIZE];

/// Black egg symbols, indexed by `countdown - 1`.
const BLACK_EGG_SYMBOLS: [char; 6] = ['!', '"', '|', '$', '%', '^'];

/// Everything a random position may hold besides the two kings.
const RANDOM_POSITION_SYMBOLS: &str = "pe/rcdfahozxvj654321PE?RCDFAHOZXVJ^%$|\"!";

/// Decodes one board-string symbol. `Ok(None)` is an empty square.
pub fn piece_from_symbol(symbol: char, position: Position) -> Result<Option<Piece>, BoardError> {
    if symbol.is_whitespace() {
        return Ok(None);
    }
    let color = if symbol.is_lowercase() {
        Color::White
    } else {
        Color::Black
    };

    let piece = match symbol {
        '(' => Piece::new(PieceKind::King, Color::White).moved(),
        ')' => Piece::new(PieceKind::King, Color::Black).moved(),
        '/' => Piece::new(PieceKind::Pawn, Color::White).moved(),
        '?' => Piece::new(PieceKind::Pawn, Color::Black).moved(),
        '1'..='6' => {
            let countdown = symbol.to_digit(10).unwrap_or(1) as u8;
            Piece::egg(Color::White, countdown)
        }
        _ => {
            if let Some(index) = BLACK_EGG_SYMBOLS.iter().position(|&c| c == symbol) {
                Piece::egg(Color::Black, index as u8 + 1)
            } else {
                match symbol.to_ascii_lowercase() {
                    'k' => Piece::new(PieceKind::King, color),
                    'p' => Piece::new(PieceKind::Pawn, color),
                    'e' => Piece {
                        en_passant_eligible: true,
                        ..Piece::new(PieceKind::Pawn, color).moved()
                    },
                    'r' => Piece::new(PieceKind::Rook, color),
                    'm' => Piece::new(PieceKind::Rook, color).moved(),
                    'c' => Piece::new(PieceKind::Cleric, color),
                    'd' => Piece::new(PieceKind::Dog, color),
                    'f' => Piece::new(PieceKind::Frog, color),
                    'a' => Piece::new(PieceKind::Panda, color),
                    // Historical alias: decodes to an immortal pawn, not a panda.
                    'i' => Piece {
                        immortal: true,
                        ..Piece::new(PieceKind::Pawn, color)
                    },
                    'h' => Piece::new(PieceKind::Chicken, color),
                    'o' => Piece::new(PieceKind::Chicken, color).moved(),
                    'z' => Piece::new(PieceKind::Blob0, color),
                    'x' => Piece::new(PieceKind::Blob1, color),
                    'v' => Piece::new(PieceKind::Blob2, color),
                    'j' => Piece::new(PieceKind::Blob3, color),
                    _ => return Err(BoardError::UnrecognizedSquareSymbol { symbol, position }),
                }
            }
        }
    };
    Ok(Some(piece))
}

/// Encodes a piece as its board-string symbol.
pub fn symbol_for(piece: &Piece) -> char {
    let white = piece.color == Color::White;
    let letter = match piece.kind {
        PieceKind::King => 'k',
        PieceKind::Pawn => {
            if !piece.has_moved {
                'p'
            } else if piece.en_passant_eligible {
                'e'
            } else {
                return if white { '/' } else { '?' };
            }
        }
        PieceKind::Rook => 'r',
        PieceKind::Cleric => 'c',
        PieceKind::Dog => 'd',
        PieceKind::Frog => 'f',
        PieceKind::Panda => {
            if piece.immortal {
                'i'
            } else {
                'a'
            }
        }
        PieceKind::Chicken => {
            if piece.has_moved {
                'o'
            } else {
                'h'
            }
        }
        PieceKind::Blob0 => 'z',
        PieceKind::Blob1 => 'x',
        PieceKind::Blob2 => 'v',
        PieceKind::Blob3 => 'j',
        PieceKind::Egg => {
            let countdown = piece.hatch_countdown.clamp(1, EGG_INCUBATION);
            return if white {
                char::from(b'0' + countdown)
            } else {
                BLACK_EGG_SYMBOLS[usize::from(countdown) - 1]
            };
        }
    };
    if white { letter } else { letter.to_ascii_uppercase() }
}

/// Decodes one signed integer code. `Ok(None)` is an empty square.
pub fn piece_from_code(code: i32, position: Position) -> Result<Option<Piece>, BoardError> {
    let color = if code > 0 { Color::White } else { Color::Black };
    let piece = match code.abs() {
        0 => return Ok(None),
        1 => Piece::new(PieceKind::Pawn, color),
        2 => Piece {
            en_passant_eligible: true,
            ..Piece::new(PieceKind::Pawn, color).moved()
        },
        3 => Piece::new(PieceKind::Pawn, color).moved(),
        4 => Piece::new(PieceKind::Rook, color),
        5 => Piece::new(PieceKind::Rook, color).moved(),
        6 => Piece::new(PieceKind::King, color),
        7 => Piece::new(PieceKind::King, color).moved(),
        8 => Piece::new(PieceKind::Dog, color),
        9 => Piece::new(PieceKind::Frog, color),
        10 => Piece::new(PieceKind::Cleric, color),
        11 => Piece::new(PieceKind::Panda, color),
        12 => Piece {
            immortal: true,
            ..Piece::new(PieceKind::Panda, color)
        },
        13 => Piece::new(PieceKind::Chicken, color),
        14 => Piece::new(PieceKind::Chicken, color).moved(),
        15 => Piece {
            immortal: true,
            ..Piece::new(PieceKind::Chicken, color).moved()
        },
        n @ 16..=21 => Piece::egg(color, (22 - n) as u8),
        22 => Piece::new(PieceKind::Blob0, color),
        23 => Piece::new(PieceKind::Blob1, color),
        24 => Piece::new(PieceKind::Blob2, color),
        25 => Piece::new(PieceKind::Blob3, color),
        _ => return Err(BoardError::UnrecognizedSquareValue { value: code, position }),
    };
    Ok(Some(piece))
}

pub fn code_for(piece: Option<&Piece>) -> i32 {
    piece.map_or(0, |p| p.color.sign() * p.as_int())
}

/// The piece a pawn turns into on reaching `position`.
///
/// Row 0 promotes to white, row 9 to black; the column picks the kind.
pub fn promotion_piece(position: Position) -> Result<Piece, BoardError> {
    let color = match position.row {
        0 => Color::White,
        9 => Color::Black,
        _ => return Err(BoardError::InvalidPromotionSquare(position)),
    };
    let piece = match position.col {
        0 | 9 => Piece::new(PieceKind::Rook, color).moved(),
        1 | 8 => Piece::new(PieceKind::Dog, color),
        2 => Piece::new(PieceKind::Chicken, color).moved(),
        3 => Piece::new(PieceKind::Blob0, color),
        4 | 5 => Piece::new(PieceKind::Panda, color),
        6 => Piece::new(PieceKind::Cleric, color),
        7 => Piece::new(PieceKind::Frog, color),
        _ => return Err(BoardError::InvalidPromotionSquare(position)),
    };
    Ok(piece)
}

/// Decodes up to 100 symbols, collecting per-square failures instead of stopping.
pub(crate) fn squares_from_symbols(symbols: &str) -> (Squares, Vec<BoardError>) {
    let mut squares: Squares = [[None; BOARD_SIZE]; BOARD_SIZE];
    let mut warnings = Vec::new();
    for (pos, symbol) in Position::all().zip(symbols.chars()) {
        match piece_from_symbol(symbol, pos) {
            Ok(piece) => squares[pos.row][pos.col] = piece,
            Err(e) => warnings.push(e),
        }
    }
    (squares, warnings)
}

impl Board {
    /// Decodes a board string, returning the board and any per-square problems.
    ///
    /// Unrecognized symbols become empty squares. Only a wrong length fails.
    pub fn parse_board_string(
        symbols: &str,
        side_to_move: Color,
    ) -> Result<(Board, Vec<BoardError>), BoardError> {
        let len = symbols.chars().count();
        if len != SQUARE_COUNT {
            return Err(BoardError::MalformedBoardString { len });
        }
        let (squares, warnings) = squares_from_symbols(symbols);
        Ok((Board::from_squares(squares, side_to_move), warnings))
    }

    /// A random position with exactly one king per side and neither side in check.
    ///
    /// Each square draws uniformly from the piece symbols plus `empty_weight`
    /// blanks, so a larger weight gives a sparser board. Draws that leave
    /// either king attacked are thrown away.
    pub fn random_position<R: Rng + ?Sized>(
        rng: &mut R,
        empty_weight: usize,
        side_to_move: Color,
    ) -> Board {
        let mut pool: Vec<char> = RANDOM_POSITION_SYMBOLS.chars().collect();
        pool.extend(std::iter::repeat_n(' ', empty_weight));
        loop {
            let mut symbols: Vec<char> = (0..SQUARE_COUNT)
                .map(|_| *pool.choose(rng).unwrap_or(&' '))
                .collect();
            let kings = index::sample(rng, SQUARE_COUNT, 2);
            symbols[kings.index(0)] = 'k';
            symbols[kings.index(1)] = 'K';

            let symbols: String = symbols.into_iter().collect();
            let (squares, _) = squares_from_symbols(&symbols);
            let board = Board::from_squares(squares, side_to_move);
            if !board.is_color_in_check(Color::White, true)
                && !board.is_color_in_check(Color::Black, true)
            {
                return board;
            }
        }
    }

    pub fn from_board_string(symbols: &str, side_to_move: Color) -> Result<Board, BoardError> {
        Self::parse_board_string(symbols, side_to_move).map(|(board, _)| board)
    }

    pub fn to_board_string(&self) -> String {
        Position::all()
            .map(|pos| self.piece_at(pos).map_or(' ', |piece| symbol_for(&piece)))
            .collect()
    }

    /// Decodes an integer grid, returning the board and any per-square problems.
    pub fn parse_int_grid(grid: &IntGrid, side_to_move: Color) -> (Board, Vec<BoardError>) {
        let mut squares: Squares = [[None; BOARD_SIZE]; BOARD_SIZE];
        let mut warnings = Vec::new();
        for pos in Position::all() {
            match piece_from_code(grid[pos.row][pos.col], pos) {
                Ok(piece) => squares[pos.row][pos.col] = piece,
                Err(e) => warnings.push(e),
            }
        }
        (Board::from_squares(squares, side_to_move), warnings)
    }

    pub fn from_int_grid(grid: &IntGrid, side_to_move: Color) -> Board {
        Self::parse_int_grid(grid, side_to_move).0
    }

    pub fn to_int_grid(&self) -> IntGrid {
        let mut grid = [[0; BOARD_SIZE]; BOARD_SIZE];
        for (pos, piece) in self.pieces() {
            grid[pos.row][pos.col] = code_for(Some(&piece));
        }
        grid
    }
}
